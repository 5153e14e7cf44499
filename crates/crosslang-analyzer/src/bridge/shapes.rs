//! Declaration-line predicates.
//!
//! Symbol trees do not carry enough detail to tell an enum-like constant from
//! an ordinary one, so the engine confirms shapes against the raw text of the
//! declaration line.

use once_cell::sync::Lazy;
use regex::Regex;

static GO_ENUM_CONST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:const\s+)?([A-Z][A-Za-z0-9_]*)\s+([A-Z][A-Za-z0-9_]*)\s*=\s*(.+?)\s*$")
        .expect("go enum constant pattern")
});

static GO_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^(?:"(?:[^"\\]|\\.)*"|`[^`]*`|'(?:[^'\\]|\\.)+'|[-+]?0[xXbBoO][0-9a-fA-F_]+|[-+]?[0-9][0-9_]*(?:\.[0-9_]+)?(?:[eE][-+]?[0-9]+)?|true|false)$"#,
    )
    .expect("go literal pattern")
});

static IOTA: Lazy<Regex> = Lazy::new(|| Regex::new(r"\biota\b").expect("iota pattern"));

static TS_ENUM_CONST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*export\s+const\s+([A-Z][A-Za-z0-9_]*)\s*(?::\s*([^=]+?)\s*)?=\s*(.+?)\s*;?\s*$")
        .expect("ts enum constant pattern")
});

static TS_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^(?:"(?:[^"\\]|\\.)*"|'(?:[^'\\]|\\.)*'|`[^`$]*`|-?0[xXbBoO][0-9a-fA-F_]+|-?[0-9][0-9_]*(?:\.[0-9_]+)?(?:[eE][-+]?[0-9]+)?|true|false)$"#,
    )
    .expect("ts literal pattern")
});

static GO_ENUM_TYPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*type\s+([A-Z][A-Za-z0-9_]*)\s*=?\s*(?:string|u?int(?:8|16|32|64)?|float(?:32|64)|bool|byte|rune)\s*$",
    )
    .expect("go enum type pattern")
});

static TS_EXPORT_TYPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*export\s+type\s+([A-Za-z_$][A-Za-z0-9_$]*)\s*(?:<[^>]*>)?\s*=").expect("ts export type pattern")
});

static TYPEOF_OPERAND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\btypeof\s+([A-Za-z_$][A-Za-z0-9_$]*)").expect("typeof pattern"));

static TS_EXPORT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*export\s").expect("ts export pattern"));

static JSON_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r#"json:"([^"]*)""#).expect("json tag pattern"));

/// Go visibility: an identifier is exported when it starts with an upper-case letter.
pub fn is_go_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

pub fn is_ts_export_line(line: &str) -> bool {
    TS_EXPORT.is_match(line)
}

fn has_two_uppercase(name: &str) -> bool {
    name.chars().filter(char::is_ascii_uppercase).count() >= 2
}

/// `StatusActive Status = "active"`, optionally preceded by `const`.
pub fn go_enum_const(
    line: &str,
    name: &str,
) -> bool {
    let code = strip_line_comment(line);
    let Some(caps) = GO_ENUM_CONST.captures(code) else {
        return false;
    };
    let (const_name, type_name, value) = (&caps[1], &caps[2], &caps[3]);
    const_name == name
        && has_two_uppercase(const_name)
        && const_name.len() > type_name.len()
        && const_name.starts_with(type_name)
        && (GO_LITERAL.is_match(value) || IOTA.is_match(value))
}

/// `export const StatusActive = "active"` or `export const Max: 10 = 10`.
pub fn ts_enum_const(
    line: &str,
    name: &str,
) -> bool {
    let code = strip_line_comment(line);
    let Some(caps) = TS_ENUM_CONST.captures(code) else {
        return false;
    };
    if &caps[1] != name || !has_two_uppercase(name) {
        return false;
    }
    let annotation_is_literal = caps.get(2).is_some_and(|annotation| is_ts_literal(annotation.as_str()));
    annotation_is_literal || is_ts_literal(&caps[3])
}

fn is_ts_literal(text: &str) -> bool {
    let text = text.trim();
    let text = text.strip_suffix("as const").map(str::trim_end).unwrap_or(text);
    TS_LITERAL.is_match(text)
}

/// `type Status = string` or `type Status string` over a basic type.
pub fn go_enum_type(
    line: &str,
    name: &str,
) -> bool {
    GO_ENUM_TYPE.captures(strip_line_comment(line)).is_some_and(|caps| &caps[1] == name)
}

/// `export type Status = typeof StatusActive | typeof StatusInactive`.
///
/// Formatters often break the union onto the following line, so `next_line`
/// is searched for the `typeof` operand as well.
pub fn ts_enum_type(
    line: &str,
    next_line: Option<&str>,
    name: &str,
) -> bool {
    if !ts_export_type(line, name) {
        return false;
    }
    typeof_variant_of(line, name) || next_line.is_some_and(|next| typeof_variant_of(next, name))
}

fn typeof_variant_of(
    line: &str,
    name: &str,
) -> bool {
    TYPEOF_OPERAND.captures_iter(line).any(|caps| {
        caps[1].strip_prefix(name).and_then(|rest| rest.chars().next()).is_some_and(|c| c.is_ascii_uppercase())
    })
}

/// `export type <name> = ...`
pub fn ts_export_type(
    line: &str,
    name: &str,
) -> bool {
    TS_EXPORT_TYPE.captures(line).is_some_and(|caps| &caps[1] == name)
}

/// Field name from a Go struct tag, e.g. `json:"email,omitempty"` → `email`.
pub fn json_tag(line: &str) -> Option<String> {
    let caps = JSON_TAG.captures(line)?;
    let name = caps[1].split(',').next().unwrap_or_default().trim();
    if name.is_empty() || name == "-" {
        return None;
    }
    Some(name.to_string())
}

/// Drop a trailing `//` comment that is not inside a string literal.
fn strip_line_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    let mut quote: Option<u8> = None;
    let mut escaped = false;
    for (idx, &byte) in bytes.iter().enumerate() {
        if let Some(open) = quote {
            if escaped {
                escaped = false;
            } else if byte == b'\\' && open != b'`' {
                escaped = true;
            } else if byte == open {
                quote = None;
            }
            continue;
        }
        match byte {
            b'"' | b'\'' | b'`' => quote = Some(byte),
            b'/' if bytes.get(idx + 1) == Some(&b'/') => return &line[..idx],
            _ => {},
        }
    }
    line
}

#[cfg(test)]
#[path = "../../tests/src/bridge/shapes_tests.rs"]
mod tests;
