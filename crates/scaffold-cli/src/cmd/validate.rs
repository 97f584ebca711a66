use crate::output::{print_json, print_table};
use scaffold_core::validator::WorkspaceValidator;
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let mut validator = WorkspaceValidator::new(root);
    validator.validate_all()?;
    let summary = validator.summary();

    if json {
        print_json(&serde_json::json!({
            "results": validator.results(),
            "summary": summary,
        }))?;
    } else {
        let rows = validator
            .results()
            .iter()
            .map(|r| vec![r.status.to_string(), r.name.clone(), r.message.clone()])
            .collect();
        print_table(&["STATUS", "CHECK", "MESSAGE"], rows);
        println!(
            "\n{} checks: {} passed, {} failed, {} errors, {} skipped ({:.1}%)",
            summary.total,
            summary.passed,
            summary.failed,
            summary.errors,
            summary.skipped,
            summary.success_rate
        );
    }

    if !summary.all_passed {
        anyhow::bail!("workspace validation failed");
    }
    Ok(())
}
