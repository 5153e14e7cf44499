//! Line-oriented document outline for Go and TypeScript.
//!
//! Declarations are recognised at brace depth zero and members one level
//! below their container. Bodies of functions are skipped wholesale. This is
//! deliberately shallow: it produces the same tree shape a full language
//! server reports for ordinary declaration files, not a parse.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;
use tower_lsp::lsp_types::{self, DocumentSymbol, Position, SymbolKind};

use crate::{
    bridge::Language,
    text_pos::{lsp_range_on_line, utf16_column_of_byte_offset},
};

static GO_FUNC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^func\s+(?:\(\s*(?:[A-Za-z_]\w*\s+)?\*?\s*(?P<recv>[A-Za-z_]\w*)(?:\[[^\]]*\])?\s*\)\s*)?(?P<name>[A-Za-z_]\w*)\s*[\[(]",
    )
    .expect("go func pattern")
});

static GO_TYPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^type\s+(?P<name>[A-Za-z_]\w*)(?:\[[^\]]*\])?\s*(?:=\s*)?(?:(?P<shape>struct|interface)\s*\{)?",
    )
    .expect("go type pattern")
});

static GO_VALUE_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<keyword>const|var)\s*\(").expect("go value block pattern"));

static GO_VALUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<keyword>const|var)\s+(?P<names>[A-Za-z_]\w*(?:\s*,\s*[A-Za-z_]\w*)*)").expect("go value pattern")
});

static GO_VALUE_SPEC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?P<names>[A-Za-z_]\w*(?:\s*,\s*[A-Za-z_]\w*)*)").expect("go value spec pattern"));

static GO_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?P<names>[A-Za-z_]\w*(?:\s*,\s*[A-Za-z_]\w*)*)\s+[^\s/=]").expect("go field pattern")
});

static GO_INTERFACE_METHOD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?P<name>[A-Za-z_]\w*)\s*\(").expect("go interface method pattern"));

static IDENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z_$][\w$]*").expect("identifier pattern"));

static TS_FUNCTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:export\s+)?(?:default\s+)?(?:declare\s+)?(?:async\s+)?function\s*\*?\s*(?P<name>[A-Za-z_$][\w$]*)",
    )
    .expect("ts function pattern")
});

static TS_INTERFACE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:export\s+)?(?:declare\s+)?interface\s+(?P<name>[A-Za-z_$][\w$]*)").expect("ts interface pattern")
});

static TS_CLASS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:export\s+)?(?:default\s+)?(?:declare\s+)?(?:abstract\s+)?class\s+(?P<name>[A-Za-z_$][\w$]*)")
        .expect("ts class pattern")
});

static TS_TYPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:export\s+)?(?:declare\s+)?type\s+(?P<name>[A-Za-z_$][\w$]*)").expect("ts type pattern")
});

static TS_VARIABLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:export\s+)?(?:declare\s+)?(?P<keyword>const|let|var)\s+(?P<name>[A-Za-z_$][\w$]*)\s*(?::[^=]*)?(?:=\s*(?P<value>.*))?$",
    )
    .expect("ts variable pattern")
});

static TS_FUNCTION_VALUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:async\s+)?(?:function\b|\([^)]*\)\s*(?::[^=]*)?=>|\([^)]*$|[A-Za-z_$][\w$]*\s*=>)")
        .expect("ts function value pattern")
});

static TS_INTERFACE_MEMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:readonly\s+)?(?P<name>[A-Za-z_$][\w$]*)\s*\??\s*(?P<after>[(<:])").expect("ts member pattern")
});

static TS_CLASS_MEMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:(?:public|private|protected|static|readonly|async|abstract|override|declare)\s+)*(?P<name>[A-Za-z_$#][\w$]*)\s*[?!]?\s*(?P<after>[(<:=;])",
    )
    .expect("ts class member pattern")
});

/// Hierarchical symbols of `text`, in source order.
pub fn outline(
    language: Language,
    text: &str,
) -> Vec<DocumentSymbol> {
    let lines: Vec<&str> = text.lines().collect();
    let mut symbols = Vec::new();
    let mut in_block_comment = false;
    let mut idx = 0;
    while idx < lines.len() {
        if is_comment_or_blank(lines[idx], &mut in_block_comment) {
            idx += 1;
            continue;
        }
        let next = match language {
            Language::Go => go_declaration(&lines, idx, &mut symbols),
            Language::TypeScript => ts_declaration(&lines, idx, &mut symbols),
        };
        idx = next.unwrap_or_else(|| block_end(&lines, idx) + 1).max(idx + 1);
    }
    symbols
}

fn go_declaration(
    lines: &[&str],
    idx: usize,
    symbols: &mut Vec<DocumentSymbol>,
) -> Option<usize> {
    let line = lines[idx];

    if let Some(caps) = GO_FUNC.captures(line) {
        let name = caps.name("name")?;
        let end = block_end(lines, idx);
        let (kind, detail) = match caps.name("recv") {
            Some(receiver) => (SymbolKind::METHOD, Some(receiver.as_str().to_string())),
            None => (SymbolKind::FUNCTION, None),
        };
        symbols.push(declaration(lines, idx, name.range(), end, kind, detail, Vec::new()));
        return Some(end + 1);
    }

    if let Some(caps) = GO_TYPE.captures(line) {
        let name = caps.name("name")?;
        let end = block_end(lines, idx);
        let (kind, children) = match caps.name("shape").map(|shape| shape.as_str()) {
            Some("struct") => (SymbolKind::STRUCT, members(lines, idx, end, go_struct_member)),
            Some("interface") => (SymbolKind::INTERFACE, members(lines, idx, end, go_interface_member)),
            _ => (SymbolKind::TYPE_PARAMETER, Vec::new()),
        };
        symbols.push(declaration(lines, idx, name.range(), end, kind, None, children));
        return Some(end + 1);
    }

    if let Some(caps) = GO_VALUE_BLOCK.captures(line) {
        let kind = value_kind(&caps["keyword"]);
        let end = paren_block_end(lines, idx);
        let mut depth = 0;
        let mut in_block_comment = false;
        for (spec_idx, spec) in lines.iter().enumerate().take(end).skip(idx + 1) {
            if is_comment_or_blank(spec, &mut in_block_comment) {
                continue;
            }
            if depth == 0
                && let Some(names) = GO_VALUE_SPEC.captures(spec).and_then(|caps| caps.name("names"))
            {
                for name in identifiers_in(spec, names.range()) {
                    symbols.push(declaration(lines, spec_idx, name, spec_idx, kind, None, Vec::new()));
                }
            }
            depth += brace_delta(spec);
        }
        return Some(end + 1);
    }

    if let Some(caps) = GO_VALUE.captures(line) {
        let kind = value_kind(&caps["keyword"]);
        let names = caps.name("names")?;
        let end = block_end(lines, idx);
        for name in identifiers_in(line, names.range()) {
            symbols.push(declaration(lines, idx, name, end, kind, None, Vec::new()));
        }
        return Some(end + 1);
    }

    None
}

fn go_struct_member(line: &str) -> Vec<(Range<usize>, SymbolKind)> {
    GO_FIELD
        .captures(line)
        .and_then(|caps| caps.name("names"))
        .map(|names| identifiers_in(line, names.range()).into_iter().map(|name| (name, SymbolKind::FIELD)).collect())
        .unwrap_or_default()
}

fn go_interface_member(line: &str) -> Vec<(Range<usize>, SymbolKind)> {
    GO_INTERFACE_METHOD
        .captures(line)
        .and_then(|caps| caps.name("name"))
        .map(|name| vec![(name.range(), SymbolKind::METHOD)])
        .unwrap_or_default()
}

fn value_kind(keyword: &str) -> SymbolKind {
    if keyword == "const" {
        SymbolKind::CONSTANT
    } else {
        SymbolKind::VARIABLE
    }
}

fn ts_declaration(
    lines: &[&str],
    idx: usize,
    symbols: &mut Vec<DocumentSymbol>,
) -> Option<usize> {
    let line = lines[idx];

    let (name, kind, member) = if let Some(caps) = TS_FUNCTION.captures(line) {
        (caps.name("name")?.range(), SymbolKind::FUNCTION, None)
    } else if let Some(caps) = TS_INTERFACE.captures(line) {
        (caps.name("name")?.range(), SymbolKind::INTERFACE, Some(ts_interface_member as MemberParser))
    } else if let Some(caps) = TS_CLASS.captures(line) {
        (caps.name("name")?.range(), SymbolKind::CLASS, Some(ts_class_member as MemberParser))
    } else if let Some(caps) = TS_TYPE.captures(line) {
        (caps.name("name")?.range(), SymbolKind::TYPE_PARAMETER, None)
    } else if let Some(caps) = TS_VARIABLE.captures(line) {
        let is_function = caps.name("value").is_some_and(|value| TS_FUNCTION_VALUE.is_match(value.as_str()));
        let kind = match (&caps["keyword"], is_function) {
            (_, true) => SymbolKind::FUNCTION,
            ("const", false) => SymbolKind::CONSTANT,
            _ => SymbolKind::VARIABLE,
        };
        (caps.name("name")?.range(), kind, None)
    } else {
        return None;
    };

    let end = block_end(lines, idx);
    let children = member.map(|parse| members(lines, idx, end, parse)).unwrap_or_default();
    symbols.push(declaration(lines, idx, name, end, kind, None, children));
    Some(end + 1)
}

fn ts_interface_member(line: &str) -> Vec<(Range<usize>, SymbolKind)> {
    let Some(caps) = TS_INTERFACE_MEMBER.captures(line) else {
        return Vec::new();
    };
    let kind = match &caps["after"] {
        ":" => SymbolKind::PROPERTY,
        _ => SymbolKind::METHOD,
    };
    caps.name("name").map(|name| vec![(name.range(), kind)]).unwrap_or_default()
}

fn ts_class_member(line: &str) -> Vec<(Range<usize>, SymbolKind)> {
    let Some(caps) = TS_CLASS_MEMBER.captures(line) else {
        return Vec::new();
    };
    if &caps["name"] == "constructor" {
        return Vec::new();
    }
    let kind = match &caps["after"] {
        "(" | "<" => SymbolKind::METHOD,
        _ => SymbolKind::PROPERTY,
    };
    caps.name("name").map(|name| vec![(name.range(), kind)]).unwrap_or_default()
}

type MemberParser = fn(&str) -> Vec<(Range<usize>, SymbolKind)>;

/// Members declared directly inside the block opened on line `start`.
fn members(
    lines: &[&str],
    start: usize,
    end: usize,
    parse: MemberParser,
) -> Vec<DocumentSymbol> {
    let mut children = Vec::new();
    let mut depth = 0;
    let mut in_block_comment = false;
    for idx in start + 1..end {
        let line = lines[idx];
        if is_comment_or_blank(line, &mut in_block_comment) {
            continue;
        }
        if depth == 0 {
            let member_end = block_end(lines, idx).min(end);
            for (name, kind) in parse(line) {
                children.push(declaration(lines, idx, name, member_end, kind, None, Vec::new()));
            }
        }
        depth += brace_delta(line);
    }
    children
}

fn declaration(
    lines: &[&str],
    line_idx: usize,
    name: Range<usize>,
    end_line: usize,
    kind: SymbolKind,
    detail: Option<String>,
    children: Vec<DocumentSymbol>,
) -> DocumentSymbol {
    let text = lines[line_idx];
    let indent = text.len() - text.trim_start().len();
    let end_text = lines.get(end_line).copied().unwrap_or(text);
    DocumentSymbol {
        name: text[name.clone()].to_string(),
        detail,
        kind,
        tags: None,
        #[allow(deprecated)]
        deprecated: None,
        range: lsp_types::Range::new(
            Position::new(line_idx as u32, utf16_column_of_byte_offset(text, indent)),
            Position::new(end_line as u32, utf16_column_of_byte_offset(end_text, end_text.len())),
        ),
        selection_range: lsp_range_on_line(line_idx as u32, text, name),
        children: if children.is_empty() {
            None
        } else {
            Some(children)
        },
    }
}

fn identifiers_in(
    line: &str,
    span: Range<usize>,
) -> Vec<Range<usize>> {
    IDENT.find_iter(&line[span.clone()]).map(|found| span.start + found.start()..span.start + found.end()).collect()
}

fn is_comment_or_blank(
    line: &str,
    in_block_comment: &mut bool,
) -> bool {
    let trimmed = line.trim_start();
    if *in_block_comment {
        if trimmed.contains("*/") {
            *in_block_comment = false;
        }
        return true;
    }
    if trimmed.starts_with("/*") {
        *in_block_comment = !trimmed.contains("*/");
        return true;
    }
    trimmed.is_empty() || trimmed.starts_with("//")
}

/// Net `{` minus `}` outside string literals and line comments.
pub(crate) fn brace_delta(line: &str) -> i32 {
    let mut delta = 0;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut previous = '\0';
    for ch in line.chars() {
        if let Some(open) = quote {
            if escaped {
                escaped = false;
            } else if ch == '\\' && open != '`' {
                escaped = true;
            } else if ch == open {
                quote = None;
            }
            previous = ch;
            continue;
        }
        match ch {
            '"' | '\'' | '`' => quote = Some(ch),
            '/' if previous == '/' => break,
            '{' => delta += 1,
            '}' => delta -= 1,
            _ => {},
        }
        previous = ch;
    }
    delta
}

/// Line on which the block opened at `start` closes; `start` itself when
/// the line opens nothing.
fn block_end(
    lines: &[&str],
    start: usize,
) -> usize {
    let mut depth = 0;
    for (idx, line) in lines.iter().enumerate().skip(start) {
        depth += brace_delta(line);
        if depth <= 0 {
            return idx;
        }
    }
    lines.len().saturating_sub(1)
}

fn paren_block_end(
    lines: &[&str],
    start: usize,
) -> usize {
    lines
        .iter()
        .enumerate()
        .skip(start + 1)
        .find(|(_, line)| line.trim_start().starts_with(')'))
        .map(|(idx, _)| idx)
        .unwrap_or(lines.len().saturating_sub(1))
}

#[cfg(test)]
#[path = "../../tests/src/workspace/outline_tests.rs"]
mod tests;
