//! Cross-language symbol correspondence engine.
//!
//! Given a position in a Go or TypeScript document, the engine classifies the
//! symbol under the cursor, derives the names it would carry in the other
//! language, scores declarations found in sibling files, and expands the best
//! matches into references or implementations.
//!
//! Everything here is stateless: symbol trees, candidates, and scores are
//! rebuilt from the [`SymbolSource`] on every request.

pub mod classify;
pub mod guard;
pub mod matchers;
pub mod model;
pub mod naming;
pub mod readiness;
pub mod resolve;
pub mod scan;
pub mod scope;
pub mod shapes;
pub mod source;

pub use classify::{Classification, classify};
pub use guard::{GuardToken, ReentrancyGuard};
pub use model::{
    Candidate, EnumConstInfo, EnumTypeInfo, FieldInfo, InterfaceInfo, Language, Symbol, SymbolInfo, SymbolKind,
};
pub use readiness::ReadinessPolicy;
pub use resolve::{CrossLanguageResolver, ResolveOptions, ResolveSession};
pub use source::{SourceError, SourceResult, SymbolSource};
