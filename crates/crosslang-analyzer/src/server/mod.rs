pub(crate) mod handler;
pub mod settings;
pub(crate) mod state;

pub use state::CrossLangServer;
