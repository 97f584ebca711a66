use crate::engine::TemplateEngine;
use crate::error::Result;
use crate::io::files_with_extension;
use crate::paths;
use crate::types::CheckStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// CheckResult
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl CheckResult {
    fn new(name: impl Into<String>, status: CheckStatus, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub skipped: usize,
    /// Percentage of checks that passed; 0 when no checks ran.
    pub success_rate: f64,
    pub all_passed: bool,
}

impl ValidationSummary {
    pub fn from_results(results: &[CheckResult]) -> Self {
        let count = |status: CheckStatus| results.iter().filter(|r| r.status == status).count();
        let total = results.len();
        let passed = count(CheckStatus::Pass);
        let failed = count(CheckStatus::Fail);
        let errors = count(CheckStatus::Error);
        let success_rate = if total == 0 {
            0.0
        } else {
            passed as f64 / total as f64 * 100.0
        };
        Self {
            total,
            passed,
            failed,
            errors,
            skipped: count(CheckStatus::Skip),
            success_rate,
            all_passed: failed == 0 && errors == 0,
        }
    }
}

// ---------------------------------------------------------------------------
// WorkspaceValidator
// ---------------------------------------------------------------------------

/// Checks a generated workspace: required files, manifests, leftover
/// placeholders and hooks.
pub struct WorkspaceValidator {
    root: PathBuf,
    engine: TemplateEngine,
    results: Vec<CheckResult>,
}

impl WorkspaceValidator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            engine: TemplateEngine::new(),
            results: Vec::new(),
        }
    }

    pub fn results(&self) -> &[CheckResult] {
        &self.results
    }

    /// Run every check, replacing the results of any earlier run.
    pub fn validate_all(&mut self) -> Result<&[CheckResult]> {
        self.results.clear();
        self.check_required_files();
        self.check_manifest_dir(
            &paths::rules_dir(&self.root),
            &paths::rules_manifest_path(&self.root),
            "rules",
            false,
        )?;
        self.check_manifest_dir(
            &paths::commands_dir(&self.root),
            &paths::commands_manifest_path(&self.root),
            "commands",
            true,
        )?;
        self.check_cursorrules()?;
        self.check_hooks()?;
        Ok(&self.results)
    }

    pub fn summary(&self) -> ValidationSummary {
        ValidationSummary::from_results(&self.results)
    }

    fn push(&mut self, name: impl Into<String>, status: CheckStatus, message: impl Into<String>) {
        let result = CheckResult::new(name, status, message);
        tracing::debug!(check = %result.name, status = %result.status, "workspace check");
        self.results.push(result);
    }

    fn check_required_files(&mut self) {
        for rel in paths::REQUIRED_FILES {
            let name = format!("file_exists_{}", rel.replace('/', "_"));
            if self.root.join(rel).exists() {
                self.push(name, CheckStatus::Pass, format!("File exists: {rel}"));
            } else {
                self.push(name, CheckStatus::Fail, format!("File missing: {rel}"));
            }
        }
    }

    /// `kind` is both the manifest's list key and the check-name prefix.
    /// A missing directory fails unless `optional`.
    fn check_manifest_dir(
        &mut self,
        dir: &Path,
        manifest: &Path,
        kind: &str,
        optional: bool,
    ) -> Result<()> {
        let rel_dir = paths::display_relative(&self.root, dir);
        if !dir.is_dir() {
            if optional {
                self.push(
                    format!("{kind}_directory_exists"),
                    CheckStatus::Skip,
                    format!("{rel_dir} directory does not exist (optional)"),
                );
            } else {
                self.push(
                    format!("{kind}_directory_exists"),
                    CheckStatus::Fail,
                    format!("{rel_dir} directory does not exist"),
                );
            }
            return Ok(());
        }

        if manifest.exists() {
            let name = format!("{kind}_manifest_valid");
            let data = std::fs::read_to_string(manifest)?;
            match serde_json::from_str::<serde_json::Value>(&data) {
                Ok(value) => match value.get(kind) {
                    Some(entries) => {
                        let count = entries.as_array().map_or(0, Vec::len);
                        self.push(
                            name,
                            CheckStatus::Pass,
                            format!("{kind} manifest contains {count} {kind}"),
                        );
                    }
                    None => self.push(
                        name,
                        CheckStatus::Fail,
                        format!("{kind} manifest missing \"{kind}\" key"),
                    ),
                },
                Err(e) => self.push(
                    name,
                    CheckStatus::Error,
                    format!("invalid JSON in {kind} manifest: {e}"),
                ),
            }
        }

        let singular = kind.trim_end_matches('s');
        for file in files_with_extension(dir, "mdc")? {
            let file_name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            self.check_placeholders(&file, format!("{singular}_file_{file_name}_no_placeholders"), &file_name)?;
        }
        Ok(())
    }

    fn check_cursorrules(&mut self) -> Result<()> {
        let path = paths::cursorrules_path(&self.root);
        if path.exists() {
            self.check_placeholders(&path, "cursorrules_no_placeholders".to_string(), paths::CURSORRULES_FILE)?;
        }
        Ok(())
    }

    fn check_placeholders(&mut self, path: &Path, name: String, label: &str) -> Result<()> {
        let content = std::fs::read_to_string(path)?;
        let validation = self.engine.validate(&content);
        if validation.complete {
            self.push(name, CheckStatus::Pass, format!("No unreplaced placeholders in {label}"));
        } else {
            self.push(
                name,
                CheckStatus::Fail,
                format!(
                    "Unreplaced placeholders found in {label}: {}",
                    validation.remaining.join(", ")
                ),
            );
        }
        Ok(())
    }

    fn check_hooks(&mut self) -> Result<()> {
        let dir = paths::hooks_dir(&self.root);
        if !dir.is_dir() {
            self.push(
                "hooks_directory_exists",
                CheckStatus::Skip,
                format!("{} directory does not exist (optional)", paths::HOOKS_DIR),
            );
            return Ok(());
        }
        let count = std::fs::read_dir(&dir)?.count();
        if count > 0 {
            self.push("hooks_present", CheckStatus::Pass, format!("Found {count} hook file(s)"));
        } else {
            self.push("hooks_present", CheckStatus::Skip, "Hooks directory exists but is empty");
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
