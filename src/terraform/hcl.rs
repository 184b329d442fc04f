//! Variable declaration scanner.
//!
//! Extracts `variable "name" { ... }` blocks from a variable declarations
//! file so the dashboard can build input forms. This is not a full HCL
//! parser; it supports a restricted subset: top-level variable blocks whose
//! bodies contain no nested braces, with `type`, `description` and
//! single-line `default` attributes. Anything outside that subset is
//! skipped.

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub var_type: String,
    pub description: Option<String>,
    pub default: Option<Value>,
    /// A variable is required iff it declares no default.
    pub required: bool,
}

pub fn scan_variables(source: &str) -> Vec<VariableDecl> {
    let mut variables = Vec::new();
    let mut rest = source;

    while let Some(idx) = rest.find("variable") {
        let after = &rest[idx + "variable".len()..];

        let Some((name, block_start)) = quoted_name(after) else {
            rest = after;
            continue;
        };
        let Some(open) = after[block_start..].find('{') else {
            rest = after;
            continue;
        };
        let body_start = block_start + open + 1;
        let Some(close) = after[body_start..].find('}') else {
            rest = after;
            continue;
        };

        let body = &after[body_start..body_start + close];
        variables.push(parse_block(name, body));

        rest = &after[body_start + close + 1..];
    }

    variables
}

/// Expects `"name"` directly after the `variable` keyword, returning the
/// name and the offset just past its closing quote.
fn quoted_name(after_keyword: &str) -> Option<(&str, usize)> {
    let trimmed_len = after_keyword.len() - after_keyword.trim_start().len();
    let trimmed = after_keyword.trim_start();
    if trimmed_len == 0 || !trimmed.starts_with('"') {
        return None;
    }

    let name_end = trimmed[1..].find('"')?;
    let name = &trimmed[1..1 + name_end];
    if name.is_empty() {
        return None;
    }

    Some((name, trimmed_len + name_end + 2))
}

fn parse_block(name: &str, body: &str) -> VariableDecl {
    let mut var_type = "string".to_string();
    let mut description = None;
    let mut default = None;

    for line in body.lines() {
        let line = line.trim();
        if let Some(value) = attribute(line, "type") {
            let word: String = value
                .chars()
                .take_while(|c| c.is_alphanumeric() || *c == '_')
                .collect();
            if !word.is_empty() {
                var_type = word;
            }
        } else if let Some(value) = attribute(line, "description") {
            if let Some(text) = unquote(value) {
                description = Some(text.to_string());
            }
        } else if let Some(value) = attribute(line, "default") {
            default = Some(parse_default(value));
        }
    }

    VariableDecl {
        name: name.to_string(),
        var_type,
        description,
        required: default.is_none(),
        default,
    }
}

/// Matches `key = value` with the key at the start of the line, returning
/// the trimmed value text.
fn attribute<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(key)?;
    let rest = rest.trim_start();
    let rest = rest.strip_prefix('=')?;
    Some(rest.trim())
}

fn unquote(raw: &str) -> Option<&str> {
    raw.strip_prefix('"')?.strip_suffix('"')
}

fn parse_default(raw: &str) -> Value {
    if raw == "true" {
        return Value::Bool(true);
    }
    if raw == "false" {
        return Value::Bool(false);
    }
    if let Some(text) = unquote(raw) {
        return Value::String(text.to_string());
    }
    if let Ok(int) = raw.parse::<i64>() {
        return Value::Number(int.into());
    }
    if let Ok(float) = raw.parse::<f64>() {
        if let Some(number) = serde_json::Number::from_f64(float) {
            return Value::Number(number);
        }
    }
    Value::String(raw.to_string())
}
