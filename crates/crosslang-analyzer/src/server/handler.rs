use std::{panic::AssertUnwindSafe, sync::atomic::Ordering};

use futures::FutureExt;
use tower_lsp::{LanguageServer, jsonrpc::Result, lsp_types::*};
use tracing::{debug, info};

use crate::{
    progress::ProgressToken,
    server::{settings::ServerSettings, state::CrossLangServer},
};

const CLIENT_NOTIFICATION_PREFIX: &str = "crosslang-analyzer:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Navigation {
    References,
    Implementations,
    Counterparts,
}

impl Navigation {
    fn title(self) -> &'static str {
        match self {
            Navigation::References => "References",
            Navigation::Implementations => "Implementations",
            Navigation::Counterparts => "Definition",
        }
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for CrossLangServer {
    async fn initialize(
        &self,
        params: InitializeParams,
    ) -> Result<InitializeResult> {
        info!("Initializing crosslang-analyzer...");

        if let Some(folders) = params.workspace_folders {
            *self.workspace_roots.write().await = folders;
        } else if let Some(root) = params.root_uri {
            *self.workspace_roots.write().await = vec![WorkspaceFolder {
                uri: root,
                name: "root".to_string(),
            }];
        }

        let initial_settings = ServerSettings::from_lsp_payload(params.initialization_options.as_ref());
        self.apply_settings(initial_settings).await;

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::FULL)),
                definition_provider: Some(OneOf::Left(true)),
                implementation_provider: Some(ImplementationProviderCapability::Simple(true)),
                references_provider: Some(OneOf::Left(true)),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "crosslang-analyzer".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(
        &self,
        _: InitializedParams,
    ) {
        let roots = self.workspace_roots.read().await.len();
        info!("crosslang-analyzer initialized with {roots} workspace root(s)");
    }

    async fn did_change_configuration(
        &self,
        params: DidChangeConfigurationParams,
    ) {
        let current = self.settings_snapshot().await;
        let merged = current.merged_with_payload(&params.settings);
        if merged == current {
            return;
        }
        self.apply_settings(merged).await;
        self.bump_generation();
        info!("Applied updated crosslang-analyzer settings");
    }

    async fn shutdown(&self) -> Result<()> {
        info!("Shutting down crosslang-analyzer");
        Ok(())
    }

    async fn did_open(
        &self,
        params: DidOpenTextDocumentParams,
    ) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;
        let filename = short_name(&uri);
        info!("Opened {filename} (v{version}, {} bytes)", params.text_document.text.len());

        if self.settings_snapshot().await.logging.level.allows_info() {
            let _ = AssertUnwindSafe(
                self.client.log_message(MessageType::INFO, prefixed_client_message(format!("Opened {filename}"))),
            )
            .catch_unwind()
            .await;
        }
        self.document_store.open(uri, params.text_document.text, version);
    }

    async fn did_change(
        &self,
        params: DidChangeTextDocumentParams,
    ) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;
        if self.document_store.is_open(&uri) {
            self.document_store.apply_changes(&uri, params.content_changes, version);
        } else if let Some(change) = params.content_changes.into_iter().last() {
            self.document_store.open(uri, change.text, version);
        }
        self.bump_generation();
    }

    async fn did_close(
        &self,
        params: DidCloseTextDocumentParams,
    ) {
        debug!("Closed {}", short_name(&params.text_document.uri));
        self.document_store.close(&params.text_document.uri);
        self.bump_generation();
    }

    async fn goto_definition(
        &self,
        params: GotoDefinitionParams,
    ) -> Result<Option<GotoDefinitionResponse>> {
        let uri = params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;
        let locations = self.navigate(Navigation::Counterparts, &uri, position).await;
        Ok(non_empty(locations).map(GotoDefinitionResponse::Array))
    }

    async fn goto_implementation(
        &self,
        params: GotoDefinitionParams,
    ) -> Result<Option<GotoDefinitionResponse>> {
        let uri = params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;
        let locations = self.navigate(Navigation::Implementations, &uri, position).await;
        Ok(non_empty(locations).map(GotoDefinitionResponse::Array))
    }

    async fn references(
        &self,
        params: ReferenceParams,
    ) -> Result<Option<Vec<Location>>> {
        let uri = params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;
        Ok(non_empty(self.navigate(Navigation::References, &uri, position).await))
    }
}

impl CrossLangServer {
    /// Run one cross-language request with progress reporting.
    ///
    /// Only an admitted request takes a generation, so a request refused by
    /// the reentrancy guard leaves the running one alone. An edit or settings
    /// change while the request runs supersedes it; a superseded request
    /// reports nothing even if it finished.
    async fn navigate(
        &self,
        navigation: Navigation,
        uri: &Url,
        position: Position,
    ) -> Vec<Location> {
        let title = navigation.title();
        let options = self.settings_snapshot().await.resolve_options();
        let Some(session) = self.resolver.begin(&options) else {
            debug!("{title} for {} not admitted", short_name(uri));
            return Vec::new();
        };
        let generation = self.bump_generation();
        let gen_ref = self.request_generation.clone();
        let is_cancelled = move || gen_ref.load(Ordering::Relaxed) != generation;

        let progress =
            ProgressToken::begin(&self.client, title, Some(format!("Matching {}…", short_name(uri)))).await;
        let start = std::time::Instant::now();
        let locations = match navigation {
            Navigation::References => session.references(uri, position, &is_cancelled).await,
            Navigation::Implementations => session.implementations(uri, position, &is_cancelled).await,
            Navigation::Counterparts => session.counterparts(uri, position, &is_cancelled).await,
        };
        drop(session);
        let elapsed = start.elapsed();

        if is_cancelled() {
            debug!("{title} for {} superseded ({elapsed:?})", short_name(uri));
            progress.end(Some("Cancelled".to_string())).await;
            return Vec::new();
        }

        debug!(
            "{title} {}:{}:{} → {} location(s) ({elapsed:?})",
            short_name(uri),
            position.line + 1,
            position.character + 1,
            locations.len()
        );
        let end_message = match locations.len() {
            0 => "No counterpart found".to_string(),
            count => format!("{count} location(s)"),
        };
        progress.end(Some(end_message)).await;
        locations
    }
}

fn non_empty(locations: Vec<Location>) -> Option<Vec<Location>> {
    (!locations.is_empty()).then_some(locations)
}

fn short_name(uri: &Url) -> String {
    uri.path().rsplit('/').next().unwrap_or(uri.path()).to_owned()
}

fn prefixed_client_message(message: impl AsRef<str>) -> String {
    format!("{CLIENT_NOTIFICATION_PREFIX} {}", message.as_ref())
}
