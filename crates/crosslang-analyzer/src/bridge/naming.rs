//! Casing conversions between Go (`GetUser`) and TypeScript (`getUser`).
//!
//! Only the first character changes, and only ASCII letters are converted, so
//! the two conversions round-trip for every input.

use crate::bridge::model::Language;

pub fn capitalize_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => {
            let mut converted = String::with_capacity(name.len());
            converted.push(first.to_ascii_uppercase());
            converted.push_str(chars.as_str());
            converted
        },
        None => String::new(),
    }
}

pub fn lowercase_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => {
            let mut converted = String::with_capacity(name.len());
            converted.push(first.to_ascii_lowercase());
            converted.push_str(chars.as_str());
            converted
        },
        None => String::new(),
    }
}

/// Convert `name` to the casing convention of `target`.
pub fn convert_for(
    name: &str,
    target: Language,
) -> String {
    match target {
        Language::Go => capitalize_first(name),
        Language::TypeScript => lowercase_first(name),
    }
}

/// Names a symbol called `name` may carry in `target`, converted form first.
///
/// The unconverted name is always accepted too, which keeps pairs like
/// `ID` / `ID` matching.
pub fn candidate_names(
    name: &str,
    target: Language,
) -> Vec<String> {
    let converted = convert_for(name, target);
    if converted == name {
        vec![name.to_string()]
    } else {
        vec![converted, name.to_string()]
    }
}

#[cfg(test)]
#[path = "../../tests/src/bridge/naming_tests.rs"]
mod tests;
