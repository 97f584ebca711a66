use crate::error::Result;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

// ---------------------------------------------------------------------------
// ContextValue
// ---------------------------------------------------------------------------

/// A single value stored in a [`Context`].
///
/// Sequences are always sequences of display strings: scalar items coming
/// from YAML/JSON (port numbers, booleans) are stringified on load.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ContextValue {
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
    List(Vec<String>),
    Map(BTreeMap<String, ContextValue>),
}

impl ContextValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ContextValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ContextValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            ContextValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, ContextValue>> {
        match self {
            ContextValue::Map(m) => Some(m),
            _ => None,
        }
    }

    /// True for values that carry nothing: null, empty text, empty list,
    /// empty map, `false` and `0`.
    pub fn is_empty(&self) -> bool {
        match self {
            ContextValue::Null => true,
            ContextValue::Bool(b) => !b,
            ContextValue::Int(i) => *i == 0,
            ContextValue::Text(s) => s.is_empty(),
            ContextValue::List(items) => items.is_empty(),
            ContextValue::Map(m) => m.is_empty(),
        }
    }

    /// Plain string form with no display rules applied: lists are joined
    /// in full, maps become `key: value` pairs. Used for substring tests.
    pub fn stringify(&self) -> String {
        match self {
            ContextValue::Null => String::new(),
            ContextValue::Bool(b) => b.to_string(),
            ContextValue::Int(i) => i.to_string(),
            ContextValue::Text(s) => s.clone(),
            ContextValue::List(items) => items.join(", "),
            ContextValue::Map(m) => m
                .iter()
                .map(|(k, v)| format!("{k}: {}", v.stringify()))
                .collect::<Vec<_>>()
                .join("; "),
        }
    }
}

impl From<serde_yaml::Value> for ContextValue {
    fn from(value: serde_yaml::Value) -> Self {
        use serde_yaml::Value;
        match value {
            Value::Null => ContextValue::Null,
            Value::Bool(b) => ContextValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => ContextValue::Int(i),
                None => ContextValue::Text(n.to_string()),
            },
            Value::String(s) => ContextValue::Text(s),
            Value::Sequence(items) => ContextValue::List(
                items
                    .into_iter()
                    .map(|item| ContextValue::from(item).stringify())
                    .collect(),
            ),
            Value::Mapping(m) => ContextValue::Map(
                m.into_iter()
                    .map(|(k, v)| (mapping_key(k), ContextValue::from(v)))
                    .collect(),
            ),
            Value::Tagged(tagged) => ContextValue::from(tagged.value),
        }
    }
}

fn mapping_key(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        other => ContextValue::from(other).stringify(),
    }
}

impl<'de> Deserialize<'de> for ContextValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = serde_yaml::Value::deserialize(deserializer)?;
        Ok(ContextValue::from(raw))
    }
}

impl From<&str> for ContextValue {
    fn from(s: &str) -> Self {
        ContextValue::Text(s.to_string())
    }
}

impl From<String> for ContextValue {
    fn from(s: String) -> Self {
        ContextValue::Text(s)
    }
}

impl From<bool> for ContextValue {
    fn from(b: bool) -> Self {
        ContextValue::Bool(b)
    }
}

impl From<i64> for ContextValue {
    fn from(i: i64) -> Self {
        ContextValue::Int(i)
    }
}

impl From<Vec<String>> for ContextValue {
    fn from(items: Vec<String>) -> Self {
        ContextValue::List(items)
    }
}

impl From<Vec<&str>> for ContextValue {
    fn from(items: Vec<&str>) -> Self {
        ContextValue::List(items.into_iter().map(str::to_string).collect())
    }
}

impl From<BTreeMap<String, ContextValue>> for ContextValue {
    fn from(m: BTreeMap<String, ContextValue>) -> Self {
        ContextValue::Map(m)
    }
}

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// Key/value description of a project, consumed by templates.
///
/// A context is assembled once per run by a provider (file, interview),
/// normalized into an enriched copy, and dropped after rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context {
    values: BTreeMap<String, ContextValue>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ContextValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ContextValue>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Text value for `key`, or `None` when absent or not text.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ContextValue::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ContextValue)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Overlay `other` on top of `self`; keys in `other` win.
    pub fn merge(&mut self, other: Context) {
        self.values.extend(other.values);
    }

    pub fn from_yaml_str(data: &str) -> Result<Self> {
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(data)?)
    }

    pub fn from_json_str(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }

    /// Load a context file. `.json` files are parsed as JSON, anything else
    /// as YAML.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&data)
        } else {
            Self::from_yaml_str(&data)
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(path, data.as_bytes())
    }
}

impl<K: Into<String>, V: Into<ContextValue>> FromIterator<(K, V)> for Context {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut ctx = Context::new();
        for (k, v) in iter {
            ctx.insert(k, v);
        }
        ctx
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn yaml_scalars_and_lists_load() {
        let ctx = Context::from_yaml_str(
            "project_name: Acme\nports: [8000, 3000]\nconfirmed: true\nconstraints: ~\n",
        )
        .unwrap();
        assert_eq!(ctx.text("project_name"), Some("Acme"));
        assert_eq!(
            ctx.get("ports").and_then(ContextValue::as_list),
            Some(&["8000".to_string(), "3000".to_string()][..])
        );
        assert_eq!(ctx.get("confirmed"), Some(&ContextValue::Bool(true)));
        assert!(ctx.get("constraints").unwrap().is_null());
    }

    #[test]
    fn nested_mapping_loads() {
        let ctx = Context::from_yaml_str(
            "networking:\n  ports: [80, 443]\n  reverse_proxy: nginx\n",
        )
        .unwrap();
        let net = ctx.get("networking").and_then(ContextValue::as_map).unwrap();
        assert_eq!(net.get("reverse_proxy"), Some(&ContextValue::from("nginx")));
        assert_eq!(
            net.get("ports"),
            Some(&ContextValue::from(vec!["80", "443"]))
        );
    }

    #[test]
    fn json_context_loads_by_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("context.json");
        std::fs::write(&path, r#"{"project_name": "Acme", "databases": ["postgresql"]}"#).unwrap();
        let ctx = Context::load(&path).unwrap();
        assert_eq!(ctx.text("project_name"), Some("Acme"));
        assert_eq!(
            ctx.get("databases"),
            Some(&ContextValue::from(vec!["postgresql"]))
        );
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ctx/context.yaml");
        let ctx = Context::new()
            .with("project_name", "Acme")
            .with("frameworks", vec!["fastapi"])
            .with("confirmed", true);
        ctx.save(&path).unwrap();
        assert_eq!(Context::load(&path).unwrap(), ctx);
    }

    #[test]
    fn empty_yaml_is_empty_context() {
        assert!(Context::from_yaml_str("   \n").unwrap().is_empty());
    }

    #[test]
    fn merge_overrides_existing_keys() {
        let mut base = Context::new().with("a", "1").with("b", "2");
        base.merge(Context::new().with("b", "3"));
        assert_eq!(base.text("a"), Some("1"));
        assert_eq!(base.text("b"), Some("3"));
    }
}
