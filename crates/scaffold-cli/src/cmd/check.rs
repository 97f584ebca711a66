use crate::output::print_json;
use anyhow::Context as _;
use scaffold_core::templates::load_template;
use scaffold_core::{Context, TemplateEngine};
use std::path::Path;

pub fn run(template: &Path, context: &Path, json: bool) -> anyhow::Result<()> {
    let text = load_template(template)
        .with_context(|| format!("failed to read template {}", template.display()))?;
    let ctx = Context::load(context)
        .with_context(|| format!("failed to load context {}", context.display()))?;

    let check = TemplateEngine::new().validate_context(&text, &ctx);

    if json {
        print_json(&check)?;
    } else if check.valid {
        println!("All placeholders resolve.");
    } else {
        println!("Missing context variables:");
        for name in &check.missing {
            println!("  {name}");
        }
    }

    if !check.valid {
        anyhow::bail!("{} placeholder(s) cannot be resolved", check.missing.len());
    }
    Ok(())
}
