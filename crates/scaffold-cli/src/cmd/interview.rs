use crate::cmd::generate::{generate_workspace, print_report, Overrides};
use crate::output::print_json;
use anyhow::Context as _;
use scaffold_core::interview::Interview;
use scaffold_core::TemplateEngine;
use std::path::Path;

const DEFAULT_CONTEXT_FILE: &str = "project_context.yaml";

pub fn run(root: &Path, out: Option<&Path>, generate: bool, json: bool) -> anyhow::Result<()> {
    let stdin = std::io::stdin();
    // Prompts go to stderr so `--json` keeps stdout parseable.
    let ctx = Interview::new(stdin.lock(), std::io::stderr()).run(&TemplateEngine::new())?;

    let path = match out {
        Some(p) => p.to_path_buf(),
        None => root.join(DEFAULT_CONTEXT_FILE),
    };
    ctx.save(&path)
        .with_context(|| format!("failed to save context to {}", path.display()))?;
    tracing::info!(path = %path.display(), "context saved");

    if generate {
        let report = generate_workspace(root, &ctx, Overrides::default())?;
        return print_report(&report, json);
    }

    if json {
        print_json(&serde_json::json!({
            "context_file": path.display().to_string(),
            "context": ctx,
        }))?;
    } else {
        println!("Context saved to {}", path.display());
    }
    Ok(())
}
