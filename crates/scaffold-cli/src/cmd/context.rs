use crate::output::{print_json, print_table};
use anyhow::Context as _;
use scaffold_core::format::format_value;
use scaffold_core::{Context, TemplateEngine};
use std::path::Path;

pub fn run(context: &Path, json: bool) -> anyhow::Result<()> {
    let ctx = Context::load(context)
        .with_context(|| format!("failed to load context {}", context.display()))?;
    let normalized = TemplateEngine::new().normalize(&ctx);

    if json {
        return print_json(&normalized);
    }

    let rows = normalized
        .iter()
        .map(|(key, value)| vec![key.clone(), format_value(value)])
        .collect();
    print_table(&["KEY", "VALUE"], rows);
    Ok(())
}
