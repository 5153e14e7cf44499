use crate::bridge::{
    matchers::{MatchContext, target_files},
    model::{Candidate, SymbolInfo},
    naming::candidate_names,
    scan::{ScanRequest, scan, select_top},
    source::SymbolSource,
};

/// Top-level functions in sibling files whose name is the casing-converted
/// (or identical) name, best score only.
pub async fn match_function<S: SymbolSource + ?Sized>(
    ctx: &MatchContext<'_, S>,
    info: &SymbolInfo,
) -> Vec<Candidate> {
    let target = info.language.counterpart();
    let files = target_files(ctx, &info.location.uri, target).await;
    if files.is_empty() {
        return Vec::new();
    }

    let names = candidate_names(&info.name, target);
    let request = ScanRequest {
        source_name: &info.name,
        accepted_names: &names,
        source_kind: info.kind,
        source_exported: info.exported,
        strict_export: ctx.strict_export,
    };
    select_top(scan(ctx, &files, &request).await)
}
