//! Category matchers: one per [`Classification`] variant.

mod enums;
mod field;
mod function;
mod interface;
mod shape;

pub use enums::{match_enum_const, match_enum_type};
pub use field::match_field;
pub use function::match_function;
pub use interface::{match_interface, match_interface_method};
pub use shape::match_shape;
use tower_lsp::lsp_types::Url;
use tracing::debug;

use crate::bridge::{
    classify::Classification,
    model::{Candidate, Language},
    readiness::{ReadinessPolicy, wait_until_ready},
    scope::sibling_files,
    source::SymbolSource,
};

/// Per-request inputs shared by every matcher.
pub struct MatchContext<'a, S: ?Sized> {
    pub source: &'a S,
    pub strict_export: bool,
    pub readiness: ReadinessPolicy,
    pub is_cancelled: &'a (dyn Fn() -> bool + Send + Sync),
}

impl<S: ?Sized> MatchContext<'_, S> {
    pub fn cancelled(&self) -> bool {
        (self.is_cancelled)()
    }
}

/// Matched counterpart declarations for any classified symbol.
pub async fn match_declarations<S: SymbolSource + ?Sized>(
    ctx: &MatchContext<'_, S>,
    classification: &Classification,
) -> Vec<Candidate> {
    let matches = match classification {
        Classification::EnumType(info) => match_enum_type(ctx, info).await,
        Classification::EnumConst(info) => match_enum_const(ctx, info).await,
        Classification::Interface(info) if info.has_methods => match_interface(ctx, info).await,
        Classification::Interface(info) => match_shape(ctx, info).await,
        Classification::InterfaceMethod {
            interface,
            method,
        } => match_interface_method(ctx, interface, method).await,
        Classification::Field(info) => match_field(ctx, info).await,
        Classification::FunctionOrType(info) => match_function(ctx, info).await,
    };
    debug!(
        "[match] {} '{}' → {} counterpart(s)",
        classification.category(),
        classification.name(),
        matches.len()
    );
    matches
}

/// Sibling files in `target` next to `uri`, loaded and settled when the
/// target analyzer needs warm-up time.
pub(crate) async fn target_files<S: SymbolSource + ?Sized>(
    ctx: &MatchContext<'_, S>,
    uri: &Url,
    target: Language,
) -> Vec<Url> {
    let files = sibling_files(ctx.source, uri, target).await;
    if !files.is_empty() && target == Language::TypeScript {
        wait_until_ready(ctx.source, &files, ctx.readiness).await;
    }
    files
}
