use crate::context::Context;
use crate::format::format_value;
use crate::normalize::capitalize;

// ---------------------------------------------------------------------------
// Alias table
// ---------------------------------------------------------------------------

static STANDARD_ALIASES: &[(&str, &str)] = &[
    ("PROJECT_NAME", "project_name"),
    ("PRIMARY_LANGUAGE", "primary_language"),
    ("PROJECT_TYPE", "project_type"),
    ("CODING_STANDARDS", "coding_standards"),
    ("FILE_ORGANIZATION", "file_organization"),
    ("TESTING_FRAMEWORK", "testing_framework"),
    ("ARCHITECTURE", "architecture"),
    ("DEPLOYMENT_TYPE", "deployment_type"),
    ("NETWORKING", "networking"),
    ("TECHNOLOGIES", "technologies"),
    ("SERVICES", "services"),
    ("PORTS", "ports"),
    ("DATABASE", "databases"),
    ("FRAMEWORK", "framework"),
    ("FRAMEWORKS", "frameworks"),
    ("LANGUAGES", "languages"),
    ("PROJECT_DESCRIPTION", "project_description"),
    ("PROJECT_PURPOSE", "project_purpose"),
    ("KEY_CONCEPTS", "key_concepts"),
    ("DOCUMENTATION_SOURCES", "documentation_sources"),
    ("LINTING_TOOLS", "linting_tools"),
    ("FORMATTING_TOOLS", "formatting_tools"),
    ("CONTAINERIZATION", "containerization"),
    ("ORCHESTRATION", "orchestration"),
    ("CLOUD_PLATFORMS", "cloud_platforms"),
    ("BUILD_TOOLS", "build_tools"),
];

/// Canonical placeholder name → context key.
#[derive(Debug, Clone, Copy)]
pub struct AliasTable {
    entries: &'static [(&'static str, &'static str)],
}

impl AliasTable {
    pub const fn new(entries: &'static [(&'static str, &'static str)]) -> Self {
        Self { entries }
    }

    pub const fn standard() -> Self {
        Self::new(STANDARD_ALIASES)
    }

    pub fn key_for(&self, placeholder: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(name, _)| *name == placeholder)
            .map(|(_, key)| *key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.entries.iter().copied()
    }
}

impl Default for AliasTable {
    fn default() -> Self {
        Self::standard()
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Maps placeholder names to context keys.
///
/// Order: alias table, lowercased name, camelCase split to snake_case,
/// snake_case joined back to camelCase. First key present in the context
/// wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct Resolver {
    aliases: AliasTable,
}

impl Resolver {
    pub fn new(aliases: AliasTable) -> Self {
        Self { aliases }
    }

    /// Context key that `name` resolves to, if any.
    pub fn lookup_key(&self, name: &str, ctx: &Context) -> Option<String> {
        if let Some(key) = self.aliases.key_for(name) {
            if ctx.contains_key(key) {
                return Some(key.to_string());
            }
        }

        let mut key = name.to_lowercase();
        if ctx.contains_key(&key) {
            return Some(key);
        }

        if !key.contains('_') {
            key = split_words(name).join("_").to_lowercase();
            if ctx.contains_key(&key) {
                return Some(key);
            }
        }

        if key.contains('_') {
            let camel = to_camel_case(&key);
            if ctx.contains_key(&camel) {
                return Some(camel);
            }
        }

        None
    }

    /// Display value for `name`, or `None` when no key resolves.
    pub fn resolve(&self, name: &str, ctx: &Context) -> Option<String> {
        let key = self.lookup_key(name, ctx)?;
        tracing::debug!(placeholder = name, key = %key, "resolved placeholder");
        ctx.get(&key).map(format_value)
    }
}

/// Split an identifier into words at camelCase boundaries.
///
/// A word is an optional capital followed by lowercase letters, or a run of
/// capitals that ends the input or precedes another capital-led word
/// (`HTTPServer` → `HTTP`, `Server`). Other characters separate words.
pub fn split_words(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    let mut words = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        if let Some(end) = lower_word_end(&chars, i) {
            words.push(chars[i..end].iter().collect());
            i = end;
            continue;
        }
        if let Some(end) = upper_run_end(&chars, i) {
            words.push(chars[i..end].iter().collect());
            i = end;
            continue;
        }
        i += 1;
    }

    words
}

fn lower_word_end(chars: &[char], start: usize) -> Option<usize> {
    let mut i = start;
    if chars[i].is_ascii_uppercase() && chars.get(i + 1).is_some_and(char::is_ascii_lowercase) {
        i += 1;
    }
    let body = i;
    while chars.get(i).is_some_and(char::is_ascii_lowercase) {
        i += 1;
    }
    (i > body).then_some(i)
}

fn upper_run_end(chars: &[char], start: usize) -> Option<usize> {
    let mut end = start;
    while chars.get(end).is_some_and(char::is_ascii_uppercase) {
        end += 1;
    }
    if end == start {
        return None;
    }
    if end == chars.len() {
        return Some(end);
    }
    // The last capital starts the next word; keep it only if something
    // precedes it in the run.
    (end - 1 > start).then_some(end - 1)
}

/// `project_name` → `projectName`.
pub fn to_camel_case(key: &str) -> String {
    key.split('_')
        .enumerate()
        .map(|(i, word)| if i == 0 { word.to_string() } else { capitalize(word) })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
