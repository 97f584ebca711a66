//! Placeholder token syntax: `<PLACEHOLDER: NAME>` with `NAME` in
//! `[A-Za-z0-9_]+` and optional whitespace after the colon.

use regex::Regex;
use std::sync::OnceLock;

pub const IF_PREFIX: &str = "IF_";
pub const ENDIF_PREFIX: &str = "ENDIF_";

static PLACEHOLDER_RE: OnceLock<Regex> = OnceLock::new();
static IF_RE: OnceLock<Regex> = OnceLock::new();
static ENDIF_RE: OnceLock<Regex> = OnceLock::new();

/// Any placeholder token; group 1 is the name.
pub fn placeholder_re() -> &'static Regex {
    PLACEHOLDER_RE.get_or_init(|| Regex::new(r"<PLACEHOLDER:\s*([A-Za-z0-9_]+)>").unwrap())
}

/// Opening conditional marker; group 1 is the condition name.
pub fn if_re() -> &'static Regex {
    IF_RE.get_or_init(|| Regex::new(r"<PLACEHOLDER:\s*IF_([A-Za-z0-9_]+)>").unwrap())
}

/// Closing conditional marker; group 1 is the condition name.
pub fn endif_re() -> &'static Regex {
    ENDIF_RE.get_or_init(|| Regex::new(r"<PLACEHOLDER:\s*ENDIF_([A-Za-z0-9_]+)>").unwrap())
}

pub fn is_conditional(name: &str) -> bool {
    name.starts_with(IF_PREFIX) || name.starts_with(ENDIF_PREFIX)
}

/// Every placeholder name in `text`, in order of first appearance, without
/// duplicates.
pub fn placeholder_names(text: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for cap in placeholder_re().captures_iter(text) {
        let name = &cap[1];
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}
