//! Cross-language search is limited to files in the same directory.

use tower_lsp::lsp_types::Url;
use tracing::{debug, warn};

use crate::bridge::{model::Language, source::SymbolSource};

/// Files next to `uri` written in `target`, sorted, never including `uri`.
///
/// Subdirectories and parent directories are not searched.
pub async fn sibling_files<S: SymbolSource + ?Sized>(
    source: &S,
    uri: &Url,
    target: Language,
) -> Vec<Url> {
    let Ok(path) = uri.to_file_path() else {
        debug!("[scope] {uri} is not a file URI");
        return Vec::new();
    };
    let Some(dir) = path.parent() else {
        return Vec::new();
    };

    match source.list_sibling_files(dir, target.extensions()).await {
        Ok(mut files) => {
            files.retain(|file| file != uri);
            files.sort();
            files.dedup();
            debug!("[scope] {} {} sibling(s) next to {}", files.len(), target.label(), dir.display());
            files
        },
        Err(error) => {
            warn!("[scope] listing {} failed: {error}", dir.display());
            Vec::new()
        },
    }
}
