use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use tokio::sync::RwLock;
use tower_lsp::{Client, lsp_types::WorkspaceFolder};

use crate::{
    bridge::CrossLanguageResolver,
    document::DocumentStore,
    server::settings::ServerSettings,
    workspace::{WorkspaceScope, WorkspaceSource},
};

/// The crosslang-analyzer backend that implements the Language Server Protocol.
pub struct CrossLangServer {
    pub(crate) client: Client,

    /// Open editor buffers, shared with the workspace source.
    pub(crate) document_store: Arc<DocumentStore>,

    pub(crate) source: Arc<WorkspaceSource>,

    /// Cross-language engine; owns the reentrancy guard.
    pub(crate) resolver: Arc<CrossLanguageResolver<WorkspaceSource>>,

    /// Workspace root folders, populated during `initialize`.
    pub(crate) workspace_roots: RwLock<Vec<WorkspaceFolder>>,

    /// Monotonic generation for navigation requests.
    ///
    /// Bumped when a request is admitted and whenever buffers or settings
    /// change, so a scan over stale input stops early.
    pub(crate) request_generation: Arc<AtomicU64>,

    pub(crate) settings: Arc<RwLock<ServerSettings>>,
}

impl CrossLangServer {
    pub fn new(client: Client) -> Self {
        let document_store = Arc::new(DocumentStore::new());
        let source = Arc::new(WorkspaceSource::new(Arc::clone(&document_store)));
        let resolver = Arc::new(CrossLanguageResolver::new(Arc::clone(&source)));

        Self {
            client,
            document_store,
            source,
            resolver,
            workspace_roots: RwLock::new(Vec::new()),
            request_generation: Arc::new(AtomicU64::new(0)),
            settings: Arc::new(RwLock::new(ServerSettings::default())),
        }
    }

    /// Start a new generation and return it.
    pub(crate) fn bump_generation(&self) -> u64 {
        self.request_generation.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub(crate) async fn settings_snapshot(&self) -> ServerSettings {
        self.settings.read().await.clone()
    }

    pub(crate) async fn apply_settings(
        &self,
        settings: ServerSettings,
    ) {
        *self.settings.write().await = settings;
        self.refresh_scope().await;
    }

    /// Push the current roots and excluded paths to the workspace source.
    pub(crate) async fn refresh_scope(&self) {
        let roots = self
            .workspace_roots
            .read()
            .await
            .iter()
            .filter_map(|folder| folder.uri.to_file_path().ok())
            .collect::<Vec<_>>();
        let exclude_paths = self.settings.read().await.workspace.exclude_paths.clone();
        self.source.set_scope(WorkspaceScope::new(roots, &exclude_paths));
    }
}
