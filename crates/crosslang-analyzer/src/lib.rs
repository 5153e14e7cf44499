pub mod bridge;
pub mod document;
pub mod progress;
pub mod server;
pub mod text_pos;
pub mod workspace;

pub use bridge::{CrossLanguageResolver, ResolveOptions, SourceError, SourceResult, SymbolSource};
pub use document::DocumentStore;
pub use server::CrossLangServer;
pub use workspace::{WorkspaceScope, WorkspaceSource};
