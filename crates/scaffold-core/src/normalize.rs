use crate::context::{Context, ContextValue};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Default table
// ---------------------------------------------------------------------------

/// Compile-time default for a context key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    Text(&'static str),
    EmptyList,
    EmptyMap,
}

impl DefaultValue {
    pub fn to_value(self) -> ContextValue {
        match self {
            DefaultValue::Text(s) => ContextValue::Text(s.to_string()),
            DefaultValue::EmptyList => ContextValue::List(Vec::new()),
            DefaultValue::EmptyMap => ContextValue::Map(BTreeMap::new()),
        }
    }
}

/// Placeholder value `technologies` carries until it is derived.
pub const UNKNOWN_TECHNOLOGIES: &str = "Unknown";

static STANDARD_DEFAULTS: &[(&str, DefaultValue)] = &[
    // identity
    ("project_name", DefaultValue::Text("Project")),
    ("project_type", DefaultValue::Text("unknown")),
    ("primary_language", DefaultValue::Text("unknown")),
    // technology
    ("framework", DefaultValue::Text("unknown")),
    ("frameworks", DefaultValue::EmptyList),
    ("technologies", DefaultValue::Text(UNKNOWN_TECHNOLOGIES)),
    ("architecture", DefaultValue::Text("unknown")),
    // infrastructure
    ("deployment_type", DefaultValue::Text("unknown")),
    // process
    ("coding_standards", DefaultValue::Text("unknown")),
    ("file_organization", DefaultValue::Text("standard")),
    ("testing_framework", DefaultValue::Text("unknown")),
    ("services", DefaultValue::EmptyList),
    ("ports", DefaultValue::EmptyList),
    ("databases", DefaultValue::EmptyList),
    ("networking", DefaultValue::EmptyMap),
    // descriptive
    ("project_description", DefaultValue::Text("")),
    ("project_purpose", DefaultValue::Text("")),
    ("key_concepts", DefaultValue::EmptyList),
    ("documentation_sources", DefaultValue::EmptyList),
    ("containerization", DefaultValue::EmptyList),
    ("orchestration", DefaultValue::EmptyList),
    ("cloud_platforms", DefaultValue::EmptyList),
    ("linting_tools", DefaultValue::EmptyList),
    ("formatting_tools", DefaultValue::EmptyList),
    ("build_tools", DefaultValue::EmptyList),
];

/// Ordered table of context keys and the value each falls back to.
#[derive(Debug, Clone, Copy)]
pub struct Defaults {
    entries: &'static [(&'static str, DefaultValue)],
}

impl Defaults {
    pub const fn new(entries: &'static [(&'static str, DefaultValue)]) -> Self {
        Self { entries }
    }

    pub const fn standard() -> Self {
        Self::new(STANDARD_DEFAULTS)
    }

    pub fn get(&self, key: &str) -> Option<DefaultValue> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, DefaultValue)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Defaults {
    fn default() -> Self {
        Self::standard()
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Return an enriched copy of `ctx`: every default key present, derived
/// display fields computed. Unknown keys pass through untouched.
///
/// Normalizing a normalized context is a no-op.
pub fn normalize(ctx: &Context, defaults: &Defaults) -> Context {
    let mut out = ctx.clone();

    for (key, default) in defaults.iter() {
        let missing = match out.get(key) {
            None => true,
            Some(v) => v.is_null(),
        };
        if missing {
            out.insert(key, default.to_value());
        }
    }

    if technologies_unset(&out) {
        if let Some(tech) = derive_technologies(&out) {
            out.insert("technologies", tech);
        }
    }

    if let Some(net) = out.get("networking").and_then(ContextValue::as_map) {
        // An empty mapping stays a mapping so the default table is honored;
        // it displays as "None" either way.
        if !net.is_empty() {
            let collapsed = collapse_networking(net);
            out.insert("networking", collapsed);
        }
    }

    out
}

fn technologies_unset(ctx: &Context) -> bool {
    match ctx.get("technologies") {
        None => true,
        Some(v) => v.as_str() == Some(UNKNOWN_TECHNOLOGIES),
    }
}

/// Languages then frameworks, title-cased, comma joined.
fn derive_technologies(ctx: &Context) -> Option<String> {
    let languages = ctx
        .get("languages")
        .and_then(ContextValue::as_list)
        .unwrap_or(&[]);
    let frameworks = ctx
        .get("frameworks")
        .and_then(ContextValue::as_list)
        .unwrap_or(&[]);

    if languages.is_empty() && frameworks.is_empty() {
        return None;
    }

    let parts: Vec<String> = languages
        .iter()
        .map(|l| capitalize(l))
        .chain(frameworks.iter().map(|f| framework_display_name(f)))
        .collect();
    Some(parts.join(", "))
}

fn framework_display_name(name: &str) -> String {
    match name {
        "nextjs" => "Next.js".to_string(),
        "nestjs" => "NestJS".to_string(),
        other => capitalize(other),
    }
}

/// First character upper-cased, the rest lower-cased.
pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn collapse_networking(net: &BTreeMap<String, ContextValue>) -> String {
    let mut parts = Vec::new();

    if let Some(ports) = net.get("ports").filter(|v| !v.is_empty()) {
        parts.push(format!("Ports: {}", ports.stringify()));
    }
    if let Some(networks) = net.get("networks").filter(|v| !v.is_empty()) {
        parts.push(format!("Networks: {}", networks.stringify()));
    }
    if let Some(proxy) = net.get("reverse_proxy") {
        let proxy = if proxy.is_null() {
            "None".to_string()
        } else {
            proxy.stringify()
        };
        parts.push(format!("Reverse Proxy: {proxy}"));
    }

    if parts.is_empty() {
        "None".to_string()
    } else {
        parts.join("; ")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(ctx: &Context) -> Context {
        normalize(ctx, &Defaults::standard())
    }

    #[test]
    fn empty_context_gets_every_default() {
        let ctx = norm(&Context::new());
        let defaults = Defaults::standard();
        assert_eq!(ctx.len(), defaults.len());
        for (key, default) in defaults.iter() {
            assert_eq!(ctx.get(key), Some(&default.to_value()), "key {key}");
        }
        assert_eq!(ctx.text("project_name"), Some("Project"));
        assert_eq!(ctx.text("file_organization"), Some("standard"));
    }

    #[test]
    fn normalization_is_idempotent() {
        let raw = Context::new()
            .with("project_name", "Acme")
            .with("languages", vec!["python", "typescript"])
            .with("frameworks", vec!["nextjs", "fastapi"])
            .with("custom_key", "kept");
        let mut net = BTreeMap::new();
        net.insert("ports".to_string(), ContextValue::from(vec!["80"]));
        let raw = raw.with("networking", net);

        let once = norm(&raw);
        assert_eq!(norm(&once), once);
        assert_eq!(norm(&Context::new()), norm(&norm(&Context::new())));
    }

    #[test]
    fn null_values_take_defaults() {
        let raw = Context::new().with("framework", ContextValue::Null);
        assert_eq!(norm(&raw).text("framework"), Some("unknown"));
    }

    #[test]
    fn present_values_are_kept() {
        let raw = Context::new().with("project_type", "api");
        assert_eq!(norm(&raw).text("project_type"), Some("api"));
    }

    #[test]
    fn technologies_derived_from_languages_then_frameworks() {
        let raw = Context::new()
            .with("languages", vec!["python", "TYPESCRIPT"])
            .with("frameworks", vec!["nextjs", "nestjs", "fastapi"]);
        assert_eq!(
            norm(&raw).text("technologies"),
            Some("Python, Typescript, Next.js, NestJS, Fastapi")
        );
    }

    #[test]
    fn explicit_technologies_not_overwritten() {
        let raw = Context::new()
            .with("technologies", "Rust, Axum")
            .with("frameworks", vec!["react"]);
        assert_eq!(norm(&raw).text("technologies"), Some("Rust, Axum"));
    }

    #[test]
    fn technologies_stay_unknown_without_inputs() {
        assert_eq!(norm(&Context::new()).text("technologies"), Some("Unknown"));
    }

    #[test]
    fn networking_mapping_collapses_in_fixed_order() {
        let mut net = BTreeMap::new();
        net.insert("reverse_proxy".to_string(), ContextValue::from("nginx"));
        net.insert("networks".to_string(), ContextValue::from(vec!["frontend", "backend"]));
        net.insert("ports".to_string(), ContextValue::from(vec!["80", "443"]));
        let ctx = norm(&Context::new().with("networking", net));
        assert_eq!(
            ctx.text("networking"),
            Some("Ports: 80, 443; Networks: frontend, backend; Reverse Proxy: nginx")
        );
    }

    #[test]
    fn null_reverse_proxy_reads_as_none() {
        let mut net = BTreeMap::new();
        net.insert("ports".to_string(), ContextValue::from(vec!["8080"]));
        net.insert("reverse_proxy".to_string(), ContextValue::Null);
        let ctx = norm(&Context::new().with("networking", net));
        assert_eq!(
            ctx.text("networking"),
            Some("Ports: 8080; Reverse Proxy: None")
        );
        assert_eq!(norm(&ctx), ctx);
    }

    #[test]
    fn networking_with_no_known_parts_is_none() {
        let mut net = BTreeMap::new();
        net.insert("ports".to_string(), ContextValue::List(vec![]));
        net.insert("mtu".to_string(), ContextValue::Int(1500));
        let ctx = norm(&Context::new().with("networking", net));
        assert_eq!(ctx.text("networking"), Some("None"));
    }

    #[test]
    fn empty_networking_stays_default_mapping() {
        let ctx = norm(&Context::new());
        assert_eq!(ctx.get("networking"), Some(&DefaultValue::EmptyMap.to_value()));
    }

    #[test]
    fn capitalize_lowers_tail() {
        assert_eq!(capitalize("fastAPI"), "Fastapi");
        assert_eq!(capitalize(""), "");
    }
}
