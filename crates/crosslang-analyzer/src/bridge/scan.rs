//! Candidate scanning, scoring, and top-tier selection.

use tower_lsp::lsp_types::Url;
use tracing::{debug, warn};

use crate::bridge::{
    matchers::MatchContext,
    model::{Candidate, Symbol, SymbolKind, load_symbols},
    source::SymbolSource,
};

/// Struct / interface pair whose names are identical.
pub const SHAPE_EXACT_SCORE: u32 = 100;
/// Struct / interface pair matched only through the casing conversion.
pub const SHAPE_CONVERTED_SCORE: u32 = 90;
/// Categories matched by identical name only (enum constants and types).
pub const EXACT_NAME_SCORE: u32 = 100;

#[derive(Debug, Clone)]
pub struct ScanRequest<'a> {
    /// Name of the symbol being matched, unconverted.
    pub source_name: &'a str,
    /// From [`candidate_names`](crate::bridge::naming::candidate_names); the converted name comes first.
    pub accepted_names: &'a [String],
    pub source_kind: SymbolKind,
    pub source_exported: bool,
    pub strict_export: bool,
}

/// Which target kind a source kind may pair with.
///
/// Functions pair with functions. A Go struct pairs with a TypeScript
/// interface and a property-only TypeScript interface (or type alias) pairs
/// with a Go struct.
pub fn routes_to(
    source_kind: SymbolKind,
    candidate_kind: SymbolKind,
) -> bool {
    match source_kind {
        SymbolKind::Function => candidate_kind == SymbolKind::Function,
        SymbolKind::Interface | SymbolKind::Variable | SymbolKind::TypeAlias => candidate_kind == SymbolKind::Struct,
        SymbolKind::Struct => candidate_kind == SymbolKind::Interface,
        _ => false,
    }
}

/// Name/export score for function-like candidates.
///
/// | exact converted name | same export | score |
/// |---|---|---|
/// | yes | yes | 3 |
/// | no  | yes | 2 |
/// | yes | no  | 1 |
/// | no  | no  | 0 |
pub fn score(
    candidate_name: &str,
    accepted_names: &[String],
    candidate_exported: bool,
    source_exported: bool,
) -> u32 {
    let exact = accepted_names.first().is_some_and(|name| name == candidate_name);
    let same_export = candidate_exported == source_exported;
    match (exact, same_export) {
        (true, true) => 3,
        (false, true) => 2,
        (true, false) => 1,
        (false, false) => 0,
    }
}

/// Score for struct / interface pairs. Both sides are always exported, so
/// export parity never varies and only the name form counts.
pub fn shape_score(
    candidate_name: &str,
    source_name: &str,
) -> u32 {
    if candidate_name == source_name {
        SHAPE_EXACT_SCORE
    } else {
        SHAPE_CONVERTED_SCORE
    }
}

/// Acceptance test and score for one top-level symbol.
pub fn evaluate(
    symbol: &Symbol,
    request: &ScanRequest<'_>,
) -> Option<u32> {
    if !routes_to(request.source_kind, symbol.kind) {
        return None;
    }
    if !request.accepted_names.iter().any(|name| *name == symbol.name) {
        return None;
    }

    let structural = matches!(symbol.kind, SymbolKind::Struct | SymbolKind::Interface);
    if structural {
        if !symbol.exported {
            return None;
        }
        return Some(shape_score(&symbol.name, request.source_name));
    }

    if request.strict_export && symbol.exported != request.source_exported {
        return None;
    }
    Some(score(&symbol.name, request.accepted_names, symbol.exported, request.source_exported))
}

pub async fn scan<S: SymbolSource + ?Sized>(
    ctx: &MatchContext<'_, S>,
    files: &[Url],
    request: &ScanRequest<'_>,
) -> Vec<Candidate> {
    collect_top_level(ctx, files, |symbol| evaluate(symbol, request)).await
}

/// Run `select` over the top-level symbols of every file.
///
/// A file whose symbols cannot be loaded is logged and skipped. The loop
/// stops early once the request is cancelled.
pub async fn collect_top_level<S, F>(
    ctx: &MatchContext<'_, S>,
    files: &[Url],
    mut select: F,
) -> Vec<Candidate>
where
    S: SymbolSource + ?Sized,
    F: FnMut(&Symbol) -> Option<u32> + Send,
{
    let mut candidates = Vec::new();
    for file in files {
        if ctx.cancelled() {
            debug!("[scan] cancelled before {file}");
            break;
        }
        let symbols = match load_symbols(ctx.source, file).await {
            Ok(symbols) => symbols,
            Err(error) => {
                warn!("[scan] skipping {file}: {error}");
                continue;
            },
        };
        for symbol in symbols {
            if let Some(score) = select(&symbol) {
                candidates.push(Candidate::new(symbol, score));
            }
        }
    }
    candidates
}

/// Every candidate tied at the highest score, in scan order.
pub fn select_top(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates.sort_by(|a, b| b.score.cmp(&a.score));
    let Some(best) = candidates.first().map(|candidate| candidate.score) else {
        return candidates;
    };
    candidates.retain(|candidate| candidate.score == best);
    candidates
}

#[cfg(test)]
#[path = "../../tests/src/bridge/scan_tests.rs"]
mod tests;
