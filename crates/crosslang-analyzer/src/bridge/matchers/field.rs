use tracing::{debug, warn};

use crate::bridge::{
    matchers::{MatchContext, target_files},
    model::{Candidate, FieldInfo, Language, Symbol, SymbolKind},
    naming::candidate_names,
    scan::{ScanRequest, scan, select_top},
    shapes,
    source::SymbolSource,
};

/// Fields are found through their container: the struct / interface is
/// matched by converted name first, then its members are searched.
///
/// Go → TypeScript looks for a property named after the `json` tag, or the
/// field name when untagged. TypeScript → Go prefers Go fields whose `json`
/// tag equals the property name and falls back to an identical field name.
pub async fn match_field<S: SymbolSource + ?Sized>(
    ctx: &MatchContext<'_, S>,
    info: &FieldInfo,
) -> Vec<Candidate> {
    let target = info.field.language.counterpart();
    let files = target_files(ctx, &info.uri, target).await;
    if files.is_empty() {
        return Vec::new();
    }

    let parent = &info.parent;
    let names = candidate_names(&parent.name, target);
    let request = ScanRequest {
        source_name: &parent.name,
        accepted_names: &names,
        source_kind: parent.kind,
        source_exported: parent.exported,
        strict_export: ctx.strict_export,
    };
    let containers = select_top(scan(ctx, &files, &request).await);
    debug!("[field] '{}' has {} matching container(s)", parent.name, containers.len());

    let mut matched = Vec::new();
    for container in &containers {
        let members = match target {
            Language::TypeScript => properties_for_go_field(&container.symbol, info),
            Language::Go => fields_for_ts_property(ctx, &container.symbol, info).await,
        };
        matched.extend(members.into_iter().map(|member| Candidate::new(member, container.score)));
    }
    matched
}

fn is_data_member(symbol: &Symbol) -> bool {
    matches!(symbol.kind, SymbolKind::Field | SymbolKind::Property)
}

fn properties_for_go_field(
    container: &Symbol,
    info: &FieldInfo,
) -> Vec<Symbol> {
    let key = info.json_tag.as_deref().unwrap_or(&info.name);
    container.children.iter().filter(|child| is_data_member(child) && child.name == key).cloned().collect()
}

async fn fields_for_ts_property<S: SymbolSource + ?Sized>(
    ctx: &MatchContext<'_, S>,
    container: &Symbol,
    info: &FieldInfo,
) -> Vec<Symbol> {
    let fields: Vec<&Symbol> = container.children.iter().filter(|child| is_data_member(child)).collect();

    let mut tagged = Vec::new();
    for field in &fields {
        match ctx.source.line_text(&field.uri, field.declaration_line()).await {
            Ok(Some(line)) => {
                if shapes::json_tag(&line).as_deref() == Some(info.name.as_str()) {
                    tagged.push((*field).clone());
                }
            },
            Ok(None) => {},
            Err(error) => warn!("[field] reading tag of {} failed: {error}", field.name),
        }
    }
    if !tagged.is_empty() {
        return tagged;
    }

    fields.into_iter().filter(|field| field.name == info.name).cloned().collect()
}
