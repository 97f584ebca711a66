use crate::context::ContextValue;

/// Lists longer than this are truncated with an "and N more" suffix.
pub const LIST_DISPLAY_LIMIT: usize = 3;

/// Render a context value as the text substituted for a placeholder.
pub fn format_value(value: &ContextValue) -> String {
    match value {
        ContextValue::Null => String::new(),
        ContextValue::Text(s) if s.trim().is_empty() => String::new(),
        ContextValue::Text(s) => s.clone(),
        ContextValue::Bool(b) => b.to_string(),
        ContextValue::Int(i) => i.to_string(),
        ContextValue::List(items) => format_list(items),
        ContextValue::Map(m) if m.is_empty() => "None".to_string(),
        ContextValue::Map(m) => m
            .iter()
            .map(|(k, v)| format!("{k}: {}", v.stringify()))
            .collect::<Vec<_>>()
            .join("; "),
    }
}

fn format_list(items: &[String]) -> String {
    if items.is_empty() {
        return "None".to_string();
    }
    if items.len() <= LIST_DISPLAY_LIMIT {
        return items.join(", ");
    }
    format!(
        "{}, and {} more",
        items[..LIST_DISPLAY_LIMIT].join(", "),
        items.len() - LIST_DISPLAY_LIMIT
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn list_boundary() {
        assert_eq!(format_value(&vec!["a", "b", "c"].into()), "a, b, c");
        assert_eq!(
            format_value(&vec!["a", "b", "c", "d"].into()),
            "a, b, c, and 1 more"
        );
        assert_eq!(format_value(&ContextValue::List(vec![])), "None");
    }

    #[test]
    fn long_list_counts_remainder() {
        let v: ContextValue = vec!["a", "b", "c", "d", "e", "f"].into();
        assert_eq!(format_value(&v), "a, b, c, and 3 more");
    }

    #[test]
    fn blank_text_is_empty() {
        assert_eq!(format_value(&"   \n".into()), "");
        assert_eq!(format_value(&ContextValue::Null), "");
    }

    #[test]
    fn mapping_joins_pairs() {
        let mut m = BTreeMap::new();
        m.insert("host".to_string(), ContextValue::from("db"));
        m.insert("port".to_string(), ContextValue::Int(5432));
        assert_eq!(format_value(&m.into()), "host: db; port: 5432");
        assert_eq!(format_value(&ContextValue::Map(BTreeMap::new())), "None");
    }

    #[test]
    fn scalars_use_plain_form() {
        assert_eq!(format_value(&ContextValue::Bool(true)), "true");
        assert_eq!(format_value(&ContextValue::Int(8000)), "8000");
        assert_eq!(format_value(&"python".into()), "python");
    }
}
