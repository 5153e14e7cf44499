use tracing::debug;

use crate::bridge::{
    classify::{is_enum_const, is_enum_type},
    matchers::{MatchContext, target_files},
    model::{Candidate, EnumConstInfo, EnumTypeInfo},
    scan::{EXACT_NAME_SCORE, collect_top_level, select_top},
    source::SymbolSource,
};

/// Enum-like constants are paired by identical name, and only when both
/// declarations pass the literal-constant shape check.
pub async fn match_enum_const<S: SymbolSource + ?Sized>(
    ctx: &MatchContext<'_, S>,
    info: &EnumConstInfo,
) -> Vec<Candidate> {
    if !is_enum_const(ctx.source, &info.symbol).await {
        return Vec::new();
    }
    let target = info.symbol.language.counterpart();
    let files = target_files(ctx, &info.uri, target).await;
    if files.is_empty() {
        return Vec::new();
    }

    let named = collect_top_level(ctx, &files, |symbol| (symbol.name == info.name).then_some(EXACT_NAME_SCORE)).await;
    let mut confirmed = Vec::new();
    for candidate in named {
        if is_enum_const(ctx.source, &candidate.symbol).await {
            confirmed.push(candidate);
        } else {
            debug!("[enum-const] '{}' in {} is not enum-like", candidate.symbol.name, candidate.uri);
        }
    }
    select_top(confirmed)
}

/// Same discipline as [`match_enum_const`] for enum-like type aliases.
pub async fn match_enum_type<S: SymbolSource + ?Sized>(
    ctx: &MatchContext<'_, S>,
    info: &EnumTypeInfo,
) -> Vec<Candidate> {
    if !is_enum_type(ctx.source, &info.symbol).await {
        return Vec::new();
    }
    let target = info.symbol.language.counterpart();
    let files = target_files(ctx, &info.uri, target).await;
    if files.is_empty() {
        return Vec::new();
    }

    let named = collect_top_level(ctx, &files, |symbol| (symbol.name == info.name).then_some(EXACT_NAME_SCORE)).await;
    let mut confirmed = Vec::new();
    for candidate in named {
        if is_enum_type(ctx.source, &candidate.symbol).await {
            confirmed.push(candidate);
        } else {
            debug!("[enum-type] '{}' in {} is not enum-like", candidate.symbol.name, candidate.uri);
        }
    }
    select_top(confirmed)
}
