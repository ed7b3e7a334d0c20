//! Identifier casing for generated names
//!
//! Catalog identifiers are split into segments on any character that is not
//! alphanumeric (`user_id`, `user-id` and `user id` all give `user`, `id`).

use crate::{Result, SchemaError};

const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be written as raw identifiers
const NON_RAW_KEYWORDS: &[&str] = &["self", "Self", "super", "crate"];

fn segments(input: &str) -> Result<Vec<&str>> {
    let parts: Vec<&str> = input
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .collect();
    if parts.is_empty() {
        return Err(SchemaError::InvalidIdentifier(format!(
            "'{}' has no identifier characters",
            input
        )));
    }
    Ok(parts)
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `user_id` -> `UserId`
pub fn to_upper_camel(input: &str) -> Result<String> {
    Ok(segments(input)?.into_iter().map(capitalize).collect())
}

/// `user_id` -> `userId`
pub fn to_lower_camel(input: &str) -> Result<String> {
    let upper = to_upper_camel(input)?;
    let mut chars = upper.chars();
    Ok(match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => upper,
    })
}

/// `UserID`, `user-id` -> `user_id`
pub fn to_snake_case(input: &str) -> Result<String> {
    let mut words = Vec::new();
    for segment in segments(input)? {
        let mut word = String::new();
        let mut prev_lower = false;
        for ch in segment.chars() {
            if ch.is_uppercase() && prev_lower {
                words.push(std::mem::take(&mut word));
            }
            prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
            word.extend(ch.to_lowercase());
        }
        words.push(word);
    }
    Ok(words.join("_"))
}

/// Upper-cased column name for generated constants
pub fn to_constant_name(input: &str) -> Result<String> {
    let constant = segments(input)?.join("_").to_uppercase();
    if constant.starts_with(|c: char| c.is_ascii_digit()) {
        return Ok(format!("_{}", constant));
    }
    Ok(constant)
}

/// Snake-cased field identifier, escaped when it collides with a keyword
pub fn to_ident(input: &str) -> Result<String> {
    let mut ident = to_snake_case(input)?;
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    Ok(escape_keyword(&ident))
}

pub fn escape_keyword(ident: &str) -> String {
    if NON_RAW_KEYWORDS.contains(&ident) {
        format!("{}_", ident)
    } else if KEYWORDS.contains(&ident) {
        format!("r#{}", ident)
    } else {
        ident.to_string()
    }
}

/// Replace every character that cannot appear in an identifier with `_`
pub fn sanitize(input: &str) -> String {
    input
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Plain (non-raw, non-keyword) Rust identifier
pub fn is_valid_ident(input: &str) -> bool {
    let mut chars = input.chars();
    let starts_ok = match chars.next() {
        Some(c) => c.is_alphabetic() || c == '_',
        None => false,
    };
    starts_ok
        && input != "_"
        && chars.all(|c| c.is_alphanumeric() || c == '_')
        && !KEYWORDS.contains(&input)
        && !NON_RAW_KEYWORDS.contains(&input)
}
