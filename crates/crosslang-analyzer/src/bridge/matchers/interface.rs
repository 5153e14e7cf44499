use crate::bridge::{
    matchers::{MatchContext, target_files},
    model::{Candidate, InterfaceInfo, Symbol, SymbolKind},
    naming::candidate_names,
    scan::{SHAPE_EXACT_SCORE, collect_top_level, score, select_top},
    source::SymbolSource,
};

/// Behavioural interfaces are paired by identical name; both sides must
/// declare methods and the target must be exported.
pub async fn match_interface<S: SymbolSource + ?Sized>(
    ctx: &MatchContext<'_, S>,
    info: &InterfaceInfo,
) -> Vec<Candidate> {
    if !info.has_methods {
        return Vec::new();
    }
    let target = info.symbol.language.counterpart();
    let files = target_files(ctx, &info.uri, target).await;
    if files.is_empty() {
        return Vec::new();
    }

    let candidates = collect_top_level(ctx, &files, |symbol| {
        (is_exported_interface_named(symbol, &info.name) && symbol.has_methods()).then_some(SHAPE_EXACT_SCORE)
    })
    .await;
    select_top(candidates)
}

/// Methods of the identically named interface whose name is the
/// casing-converted method name. Export parity is taken from the two
/// interfaces, not from the methods.
pub async fn match_interface_method<S: SymbolSource + ?Sized>(
    ctx: &MatchContext<'_, S>,
    interface: &InterfaceInfo,
    method: &Symbol,
) -> Vec<Candidate> {
    let target = method.language.counterpart();
    let files = target_files(ctx, &interface.uri, target).await;
    if files.is_empty() {
        return Vec::new();
    }

    let containers = collect_top_level(ctx, &files, |symbol| {
        is_exported_interface_named(symbol, &interface.name).then_some(SHAPE_EXACT_SCORE)
    })
    .await;

    let names = candidate_names(&method.name, target);
    let mut candidates = Vec::new();
    for container in containers {
        let container_exported = container.symbol.exported;
        for child in container.symbol.children {
            if child.kind != SymbolKind::Method || !names.contains(&child.name) {
                continue;
            }
            let method_score = score(&child.name, &names, container_exported, interface.is_exported);
            candidates.push(Candidate::new(child, method_score));
        }
    }
    select_top(candidates)
}

fn is_exported_interface_named(
    symbol: &Symbol,
    name: &str,
) -> bool {
    symbol.kind == SymbolKind::Interface && symbol.exported && symbol.name == name
}
