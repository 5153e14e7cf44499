//! Decides which matchable category the cursor refers to.
//!
//! Categories are tried in a fixed order and the first hit wins. Each one is
//! tested at the cursor's own document first (declaration site) and then at
//! the definition the cursor's identifier resolves to (usage site).

use tower_lsp::lsp_types::{Position, Url};
use tracing::{debug, warn};

use crate::{
    bridge::{
        model::{
            EnumConstInfo, EnumTypeInfo, FieldInfo, InterfaceInfo, Language, Symbol, SymbolInfo, SymbolKind,
            load_symbols, range_contains,
        },
        shapes,
        source::SymbolSource,
    },
    text_pos::identifier_at,
};

/// The declaration under the cursor, tagged with how it may be matched.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    EnumType(EnumTypeInfo),
    EnumConst(EnumConstInfo),
    /// A Go struct or interface, or a TypeScript interface / exported type
    /// alias. `has_methods` decides between behavioural and data-shape matching.
    Interface(InterfaceInfo),
    InterfaceMethod {
        interface: InterfaceInfo,
        method: Symbol,
    },
    Field(FieldInfo),
    FunctionOrType(SymbolInfo),
}

impl Classification {
    pub fn language(&self) -> Language {
        match self {
            Classification::EnumType(info) => info.symbol.language,
            Classification::EnumConst(info) => info.symbol.language,
            Classification::Interface(info) => info.symbol.language,
            Classification::InterfaceMethod {
                method, ..
            } => method.language,
            Classification::Field(info) => info.field.language,
            Classification::FunctionOrType(info) => info.language,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Classification::EnumType(info) => &info.name,
            Classification::EnumConst(info) => &info.name,
            Classification::Interface(info) => &info.name,
            Classification::InterfaceMethod {
                method, ..
            } => &method.name,
            Classification::Field(info) => &info.name,
            Classification::FunctionOrType(info) => &info.name,
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            Classification::EnumType(_) => "enum-type",
            Classification::EnumConst(_) => "enum-const",
            Classification::Interface(info) if info.has_methods => "interface",
            Classification::Interface(_) => "shape",
            Classification::InterfaceMethod {
                ..
            } => "interface-method",
            Classification::Field(_) => "field",
            Classification::FunctionOrType(_) => "function",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    EnumType,
    EnumConst,
    Interface,
    InterfaceMethod,
    Field,
    FunctionOrType,
}

const RESOLUTION_ORDER: [Category; 6] = [
    Category::EnumType,
    Category::EnumConst,
    Category::Interface,
    Category::InterfaceMethod,
    Category::Field,
    Category::FunctionOrType,
];

struct Site {
    uri: Url,
    position: Position,
    symbols: Vec<Symbol>,
}

pub async fn classify<S: SymbolSource + ?Sized>(
    source: &S,
    uri: &Url,
    position: Position,
) -> Option<Classification> {
    Language::from_uri(uri)?;

    let here = Site {
        uri: uri.clone(),
        position,
        symbols: symbols_or_empty(source, uri).await,
    };
    let mut usage_sites: Option<Vec<Site>> = None;

    for category in RESOLUTION_ORDER {
        if let Some(found) = test_site(source, category, &here).await {
            debug!("[classify] {category:?} '{}' at declaration site", found.name());
            return Some(found);
        }

        if usage_sites.is_none() {
            usage_sites = Some(definition_sites(source, &here).await);
        }
        for site in usage_sites.iter().flatten() {
            if let Some(found) = test_site(source, category, site).await {
                debug!("[classify] {category:?} '{}' via definition in {}", found.name(), site.uri);
                return Some(found);
            }
        }
    }

    enclosing_function(&here)
}

async fn symbols_or_empty<S: SymbolSource + ?Sized>(
    source: &S,
    uri: &Url,
) -> Vec<Symbol> {
    load_symbols(source, uri).await.unwrap_or_else(|error| {
        warn!("[classify] symbols for {uri} unavailable: {error}");
        Vec::new()
    })
}

async fn line_of<S: SymbolSource + ?Sized>(
    source: &S,
    uri: &Url,
    line: u32,
) -> Option<String> {
    match source.line_text(uri, line).await {
        Ok(text) => text,
        Err(error) => {
            warn!("[classify] line {line} of {uri} unavailable: {error}");
            None
        },
    }
}

/// Declarations the identifier under the cursor resolves to.
async fn definition_sites<S: SymbolSource + ?Sized>(
    source: &S,
    here: &Site,
) -> Vec<Site> {
    let Some(line) = line_of(source, &here.uri, here.position.line).await else {
        return Vec::new();
    };
    if identifier_at(&line, here.position.character).is_none() {
        return Vec::new();
    }

    let definitions = match source.definitions(&here.uri, here.position).await {
        Ok(definitions) => definitions,
        Err(error) => {
            warn!("[classify] definition lookup failed: {error}");
            return Vec::new();
        },
    };

    let mut sites = Vec::new();
    for definition in definitions {
        if Language::from_uri(&definition.uri).is_none() {
            continue;
        }
        if definition.uri == here.uri && range_contains(definition.range, here.position) {
            continue;
        }
        let symbols = if definition.uri == here.uri {
            here.symbols.clone()
        } else {
            symbols_or_empty(source, &definition.uri).await
        };
        sites.push(Site {
            uri: definition.uri,
            position: definition.range.start,
            symbols,
        });
    }
    sites
}

async fn test_site<S: SymbolSource + ?Sized>(
    source: &S,
    category: Category,
    site: &Site,
) -> Option<Classification> {
    match category {
        Category::EnumType => enum_type_at(source, site).await,
        Category::EnumConst => enum_const_at(source, site).await,
        Category::Interface => interface_at(source, site).await,
        Category::InterfaceMethod => interface_method_at(site),
        Category::Field => field_at(source, site).await,
        Category::FunctionOrType => function_or_type_at(site),
    }
}

async fn enum_type_at<S: SymbolSource + ?Sized>(
    source: &S,
    site: &Site,
) -> Option<Classification> {
    for symbol in site.symbols.iter().filter(|symbol| symbol.name_contains(site.position)) {
        if is_enum_type(source, symbol).await {
            return Some(Classification::EnumType(EnumTypeInfo {
                name: symbol.name.clone(),
                symbol: symbol.clone(),
                uri: symbol.uri.clone(),
            }));
        }
    }
    None
}

async fn enum_const_at<S: SymbolSource + ?Sized>(
    source: &S,
    site: &Site,
) -> Option<Classification> {
    for symbol in site.symbols.iter().filter(|symbol| symbol.name_contains(site.position)) {
        if is_enum_const(source, symbol).await {
            return Some(Classification::EnumConst(EnumConstInfo {
                name: symbol.name.clone(),
                symbol: symbol.clone(),
                uri: symbol.uri.clone(),
            }));
        }
    }
    None
}

async fn interface_at<S: SymbolSource + ?Sized>(
    source: &S,
    site: &Site,
) -> Option<Classification> {
    for symbol in site.symbols.iter().filter(|symbol| symbol.name_contains(site.position)) {
        if is_interface_shaped(source, symbol).await {
            return Some(Classification::Interface(InterfaceInfo::from_symbol(symbol)));
        }
    }
    None
}

fn interface_method_at(site: &Site) -> Option<Classification> {
    site.symbols.iter().filter(|parent| parent.kind == SymbolKind::Interface).find_map(|parent| {
        parent
            .children
            .iter()
            .find(|child| {
                child.kind == SymbolKind::Method
                    && (child.name_contains(site.position) || child.declaration_contains(site.position))
            })
            .map(|method| Classification::InterfaceMethod {
                interface: InterfaceInfo::from_symbol(parent),
                method: method.clone(),
            })
    })
}

async fn field_at<S: SymbolSource + ?Sized>(
    source: &S,
    site: &Site,
) -> Option<Classification> {
    for parent in site.symbols.iter().filter(|parent| is_field_container(parent)) {
        let Some(field) = parent.children.iter().find(|child| {
            matches!(child.kind, SymbolKind::Field | SymbolKind::Property)
                && (child.name_contains(site.position) || child.declaration_contains(site.position))
        }) else {
            continue;
        };

        let json_tag = match field.language {
            Language::Go => {
                line_of(source, &field.uri, field.declaration_line()).await.and_then(|line| shapes::json_tag(&line))
            },
            Language::TypeScript => None,
        };
        return Some(Classification::Field(FieldInfo {
            name: field.name.clone(),
            json_tag,
            parent: parent.clone(),
            field: field.clone(),
            uri: field.uri.clone(),
        }));
    }
    None
}

fn function_or_type_at(site: &Site) -> Option<Classification> {
    site.symbols
        .iter()
        .find(|symbol| {
            matches!(symbol.kind, SymbolKind::Function | SymbolKind::Struct | SymbolKind::Interface)
                && symbol.name_contains(site.position)
        })
        .map(|symbol| Classification::FunctionOrType(SymbolInfo::from_symbol(symbol)))
}

/// Cursor somewhere inside a function body rather than on any name.
fn enclosing_function(here: &Site) -> Option<Classification> {
    here.symbols
        .iter()
        .find(|symbol| symbol.kind == SymbolKind::Function && symbol.declaration_contains(here.position))
        .map(|symbol| Classification::FunctionOrType(SymbolInfo::from_symbol(symbol)))
}

pub(crate) fn is_field_container(symbol: &Symbol) -> bool {
    match symbol.language {
        Language::Go => symbol.kind == SymbolKind::Struct,
        Language::TypeScript => symbol.kind == SymbolKind::Interface,
    }
}

/// Shape check for an enum-like type declaration.
pub(crate) async fn is_enum_type<S: SymbolSource + ?Sized>(
    source: &S,
    symbol: &Symbol,
) -> bool {
    if symbol.kind == SymbolKind::Function || symbol.kind.is_member() {
        return false;
    }
    let line_number = symbol.declaration_line();
    let Some(line) = line_of(source, &symbol.uri, line_number).await else {
        return false;
    };
    match symbol.language {
        Language::Go => shapes::go_enum_type(&line, &symbol.name),
        Language::TypeScript => {
            let next_line = line_of(source, &symbol.uri, line_number + 1).await;
            shapes::ts_enum_type(&line, next_line.as_deref(), &symbol.name)
        },
    }
}

/// Shape check for an enum-like constant declaration.
pub(crate) async fn is_enum_const<S: SymbolSource + ?Sized>(
    source: &S,
    symbol: &Symbol,
) -> bool {
    if !matches!(symbol.kind, SymbolKind::Constant | SymbolKind::Variable) {
        return false;
    }
    let Some(line) = line_of(source, &symbol.uri, symbol.declaration_line()).await else {
        return false;
    };
    match symbol.language {
        Language::Go => shapes::go_enum_const(&line, &symbol.name),
        Language::TypeScript => shapes::ts_enum_const(&line, &symbol.name),
    }
}

/// Go structs and interfaces; TypeScript interfaces and exported type aliases.
pub(crate) async fn is_interface_shaped<S: SymbolSource + ?Sized>(
    source: &S,
    symbol: &Symbol,
) -> bool {
    match (symbol.language, symbol.kind) {
        (Language::Go, SymbolKind::Struct | SymbolKind::Interface) => true,
        (Language::TypeScript, SymbolKind::Interface) => true,
        (Language::TypeScript, SymbolKind::Variable | SymbolKind::TypeAlias) => {
            line_of(source, &symbol.uri, symbol.declaration_line())
                .await
                .is_some_and(|line| shapes::ts_export_type(&line, &symbol.name))
        },
        _ => false,
    }
}

#[cfg(test)]
#[path = "../../tests/src/bridge/classify_tests.rs"]
mod tests;
