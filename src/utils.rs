//! Shared text helpers: number formatting, identifier checks and escaping

use crate::error::{CompilerError, Result};
use regex::Regex;
use std::sync::OnceLock;

/// Fractional digits kept when rendering non-integral numbers
const MAX_FRACTION_DIGITS: usize = 6;

static IDENTIFIER: OnceLock<Regex> = OnceLock::new();
static VARIABLE_NAME: OnceLock<Regex> = OnceLock::new();
static CUSTOM_PROPERTY: OnceLock<Regex> = OnceLock::new();

/// Compile `pattern` once and hand out the cached instance afterwards
pub(crate) fn cached_regex(cell: &'static OnceLock<Regex>, pattern: &str) -> Result<&'static Regex> {
    if let Some(regex) = cell.get() {
        return Ok(regex);
    }

    let regex = Regex::new(pattern)
        .map_err(|e| CompilerError::construction(format!("Regex error: {}", e)))?;
    let _ = cell.set(regex);

    cell.get()
        .ok_or_else(|| CompilerError::construction(format!("Regex cache unavailable for '{}'", pattern)))
}

/// Render a number without superfluous trailing zeros.
///
/// Zero (including negative zero) always renders as `0`.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }

    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }

    let text = format!("{:.*}", MAX_FRACTION_DIGITS, value);
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');

    match trimmed {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}

/// Is `text` a plain stylesheet identifier (keyword, property or element name)?
pub fn is_identifier(text: &str) -> Result<bool> {
    let regex = cached_regex(&IDENTIFIER, r"^-?[A-Za-z_][A-Za-z0-9_-]*$")?;
    Ok(regex.is_match(text))
}

/// Is `text` a legal design scheme variable name?
pub fn is_variable_name(text: &str) -> Result<bool> {
    let regex = cached_regex(&VARIABLE_NAME, r"^[A-Za-z_][A-Za-z0-9_-]*$")?;
    Ok(regex.is_match(text))
}

/// Is `text` a custom property name such as `--primary`?
pub fn is_custom_property(text: &str) -> Result<bool> {
    let regex = cached_regex(&CUSTOM_PROPERTY, r"^--[A-Za-z0-9_-]+$")?;
    Ok(regex.is_match(text))
}

/// Escape an identifier for use in class, id or attribute-name position.
///
/// Characters outside `[A-Za-z0-9_-]` and below U+0080 are backslash
/// escaped; a leading digit (or a digit after a leading hyphen) and control
/// characters use the hexadecimal escape form followed by a space.
pub fn escape_identifier(ident: &str) -> String {
    let chars: Vec<char> = ident.chars().collect();
    let mut escaped = String::with_capacity(ident.len());

    for (index, &c) in chars.iter().enumerate() {
        let leading_digit = c.is_ascii_digit() && (index == 0 || (index == 1 && chars[0] == '-'));

        if c == '\0' {
            escaped.push('\u{FFFD}');
        } else if (c.is_control() && (c as u32) < 0x80) || leading_digit {
            escaped.push_str(&format!("\\{:x} ", c as u32));
        } else if index == 0 && c == '-' && chars.len() == 1 {
            escaped.push_str("\\-");
        } else if (c as u32) >= 0x80 || c == '-' || c == '_' || c.is_ascii_alphanumeric() {
            escaped.push(c);
        } else {
            escaped.push('\\');
            escaped.push(c);
        }
    }

    escaped
}

/// Wrap `text` in double quotes, escaping quotes, backslashes and control characters
pub fn quote_string(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');

    for c in text.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            c if c.is_control() => quoted.push_str(&format!("\\{:x} ", c as u32)),
            c => quoted.push(c),
        }
    }

    quoted.push('"');
    quoted
}
