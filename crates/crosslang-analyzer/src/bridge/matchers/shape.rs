use crate::bridge::{
    matchers::{MatchContext, target_files},
    model::{Candidate, InterfaceInfo, Language, SymbolKind},
    naming::candidate_names,
    scan::{ScanRequest, scan, select_top},
    source::SymbolSource,
};

/// Data shapes: a Go struct against an exported TypeScript interface, or a
/// property-only TypeScript interface / type alias against an exported Go
/// struct.
pub async fn match_shape<S: SymbolSource + ?Sized>(
    ctx: &MatchContext<'_, S>,
    info: &InterfaceInfo,
) -> Vec<Candidate> {
    let target = info.symbol.language.counterpart();
    let files = target_files(ctx, &info.uri, target).await;
    if files.is_empty() {
        return Vec::new();
    }

    let source_kind = match info.symbol.language {
        Language::Go => SymbolKind::Struct,
        Language::TypeScript => SymbolKind::Interface,
    };
    let names = candidate_names(&info.name, target);
    let request = ScanRequest {
        source_name: &info.name,
        accepted_names: &names,
        source_kind,
        source_exported: info.is_exported,
        strict_export: ctx.strict_export,
    };
    select_top(scan(ctx, &files, &request).await)
}
