use crate::output::print_json;
use anyhow::Context as _;
use scaffold_core::templates::load_template;
use scaffold_core::{Context, TemplateEngine};
use std::path::Path;

pub fn run(template: &Path, context: &Path, strict: bool, json: bool) -> anyhow::Result<()> {
    let text = load_template(template)
        .with_context(|| format!("failed to read template {}", template.display()))?;
    let ctx = Context::load(context)
        .with_context(|| format!("failed to load context {}", context.display()))?;
    let engine = TemplateEngine::new();

    if strict {
        let label = template.display().to_string();
        let output = engine.render_strict(&text, &ctx, &label)?;
        if json {
            print_json(&serde_json::json!({ "output": output, "missing": [] }))?;
        } else {
            print!("{output}");
        }
        return Ok(());
    }

    let rendering = engine.render_with_diagnostics(&text, &ctx);
    if json {
        print_json(&rendering)?;
    } else {
        print!("{}", rendering.output);
    }
    Ok(())
}
