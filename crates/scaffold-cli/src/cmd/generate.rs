use crate::output::{print_json, print_table};
use anyhow::Context as _;
use scaffold_core::config::ScaffoldConfig;
use scaffold_core::generate::{GenerateOptions, GenerationReport, WorkspaceGenerator};
use scaffold_core::templates::Layered;
use scaffold_core::Context;
use std::path::{Path, PathBuf};

/// Command-line flags layered over `scaffold.yaml`.
#[derive(Debug, Default)]
pub struct Overrides {
    pub templates: Option<PathBuf>,
    pub strict: bool,
    pub no_overwrite: bool,
}

pub fn run(root: &Path, context: &Path, overrides: Overrides, json: bool) -> anyhow::Result<()> {
    let ctx = Context::load(context)
        .with_context(|| format!("failed to load context {}", context.display()))?;
    let report = generate_workspace(root, &ctx, overrides)?;
    print_report(&report, json)
}

pub fn generate_workspace(
    root: &Path,
    ctx: &Context,
    overrides: Overrides,
) -> anyhow::Result<GenerationReport> {
    let config = ScaffoldConfig::load(root).context("failed to load scaffold.yaml")?;

    let mut options = GenerateOptions::from(&config);
    options.strict |= overrides.strict;
    if overrides.no_overwrite {
        options.overwrite = false;
    }

    let templates_dir = overrides.templates.or_else(|| config.templates_dir(root));
    if let Some(dir) = &templates_dir {
        if !dir.is_dir() {
            anyhow::bail!("templates directory '{}' does not exist", dir.display());
        }
    }
    let source = Layered::with_builtin_fallback(templates_dir);

    let report = WorkspaceGenerator::new(&source, options).generate(root, ctx)?;
    tracing::info!(
        files = report.files.len(),
        written = report.written().count(),
        "workspace generated"
    );
    Ok(report)
}

pub fn print_report(report: &GenerationReport, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(report);
    }

    let rows = report
        .files
        .iter()
        .map(|f| vec![f.path.clone(), f.outcome.to_string(), f.missing.join(", ")])
        .collect();
    print_table(&["FILE", "OUTCOME", "MISSING"], rows);
    if report.has_missing() {
        println!("\nSome placeholders were left empty. Re-run with --strict to fail instead.");
    }
    Ok(())
}
