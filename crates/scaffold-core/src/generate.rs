use crate::condition::Condition;
use crate::config::ScaffoldConfig;
use crate::context::{Context, ContextValue};
use crate::engine::{Rendering, TemplateEngine};
use crate::error::{Result, ScaffoldError};
use crate::io::write_generated;
use crate::paths;
use crate::templates::{TemplateId, TemplateSource};
use crate::types::{CommandKind, RuleLevel, WriteOutcome};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const MANIFEST_VERSION: &str = "1.0";

// ---------------------------------------------------------------------------
// Options / report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub strict: bool,
    pub overwrite: bool,
    /// Rule levels generated regardless of the context.
    pub forced_levels: Vec<RuleLevel>,
}

impl From<&ScaffoldConfig> for GenerateOptions {
    fn from(cfg: &ScaffoldConfig) -> Self {
        Self {
            strict: cfg.strict,
            overwrite: cfg.overwrite,
            forced_levels: cfg.rules.forced_levels(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedFile {
    /// Path relative to the workspace root.
    pub path: String,
    pub outcome: WriteOutcome,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationReport {
    pub files: Vec<GeneratedFile>,
}

impl GenerationReport {
    pub fn written(&self) -> impl Iterator<Item = &GeneratedFile> {
        self.files
            .iter()
            .filter(|f| f.outcome != WriteOutcome::Skipped)
    }

    pub fn has_missing(&self) -> bool {
        self.files.iter().any(|f| !f.missing.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

fn is_known(ctx: &Context, key: &str) -> bool {
    match ctx.get(key) {
        Some(v) if !v.is_empty() => v.stringify() != "unknown",
        _ => false,
    }
}

/// Rule levels to generate for a normalized context, in level order.
pub fn required_rule_levels(ctx: &Context, forced: &[RuleLevel]) -> Vec<RuleLevel> {
    RuleLevel::all()
        .iter()
        .copied()
        .filter(|level| match level.gating_key() {
            None => true,
            Some(key) => is_known(ctx, key) || forced.contains(level),
        })
        .collect()
}

/// Command files to generate for a normalized context.
pub fn required_command_kinds(ctx: &Context) -> Vec<CommandKind> {
    let mut kinds = Vec::new();
    if is_known(ctx, "testing_framework") {
        kinds.push(CommandKind::Test);
    }
    kinds.push(CommandKind::Build);
    if is_known(ctx, "deployment_type") {
        kinds.push(CommandKind::Deploy);
    }
    if Condition::Docker.holds(ctx) {
        kinds.push(CommandKind::Docker);
    }
    kinds
}

// ---------------------------------------------------------------------------
// WorkspaceGenerator
// ---------------------------------------------------------------------------

struct PlannedFile {
    path: PathBuf,
    label: String,
    rendering: Rendering,
}

/// Renders `.cursorrules`, rule and command files, manifests and AGENTS.md
/// for a context.
pub struct WorkspaceGenerator<'a> {
    engine: TemplateEngine,
    templates: &'a dyn TemplateSource,
    options: GenerateOptions,
}

impl<'a> WorkspaceGenerator<'a> {
    pub fn new(templates: &'a dyn TemplateSource, options: GenerateOptions) -> Self {
        Self {
            engine: TemplateEngine::new(),
            templates,
            options,
        }
    }

    /// Render everything first, then write. In strict mode nothing is written
    /// if any template has unresolved placeholders.
    pub fn generate(&self, root: &Path, ctx: &Context) -> Result<GenerationReport> {
        let normalized = self.engine.normalize(ctx);
        let levels = required_rule_levels(&normalized, &self.options.forced_levels);
        let kinds = required_command_kinds(&normalized);

        let mut planned = vec![self.plan(root, TemplateId::Cursorrules, &normalized)?];
        for level in &levels {
            planned.push(self.plan(root, TemplateId::Rule(*level), &normalized)?);
        }
        for kind in &kinds {
            planned.push(self.plan(root, TemplateId::Command(*kind), &normalized)?);
        }
        planned.push(self.plan(root, TemplateId::Agents, &normalized)?);

        if self.options.strict {
            if let Some(bad) = planned.iter().find(|p| !p.rendering.is_complete()) {
                return Err(ScaffoldError::StrictRender {
                    file: bad.label.clone(),
                    missing: bad.rendering.missing.clone(),
                });
            }
        }

        let mut report = GenerationReport::default();
        for file in planned {
            let outcome = write_generated(&file.path, &file.rendering.output, self.options.overwrite)?;
            tracing::debug!(file = %file.label, %outcome, "wrote workspace file");
            report.files.push(GeneratedFile {
                path: file.label,
                outcome,
                missing: file.rendering.missing,
            });
        }

        let rules_manifest = rules_manifest(&normalized, &levels);
        self.write_manifest(root, &paths::rules_manifest_path(root), &rules_manifest, &mut report)?;
        let commands_manifest = commands_manifest(&normalized, &kinds);
        self.write_manifest(
            root,
            &paths::commands_manifest_path(root),
            &commands_manifest,
            &mut report,
        )?;

        Ok(report)
    }

    fn plan(&self, root: &Path, id: TemplateId, ctx: &Context) -> Result<PlannedFile> {
        let path = output_path(root, id);
        let label = paths::display_relative(root, &path);
        let template = self.templates.require(id)?;

        let check = self.engine.validate_context(&template, ctx);
        if !check.valid {
            tracing::warn!(file = %label, missing = ?check.missing, "missing context variables, proceeding with defaults");
        }

        let rendering = self.engine.render_with_diagnostics(&template, ctx);
        Ok(PlannedFile {
            path,
            label,
            rendering,
        })
    }

    fn write_manifest(
        &self,
        root: &Path,
        path: &Path,
        manifest: &serde_json::Value,
        report: &mut GenerationReport,
    ) -> Result<()> {
        let mut data = serde_json::to_string_pretty(manifest)?;
        data.push('\n');
        let outcome = write_generated(path, &data, self.options.overwrite)?;
        report.files.push(GeneratedFile {
            path: paths::display_relative(root, path),
            outcome,
            missing: Vec::new(),
        });
        Ok(())
    }
}

fn output_path(root: &Path, id: TemplateId) -> PathBuf {
    match id {
        TemplateId::Cursorrules => paths::cursorrules_path(root),
        TemplateId::Rule(level) => paths::rule_path(root, level),
        TemplateId::Command(kind) => paths::command_path(root, kind),
        TemplateId::Agents => paths::agents_md_path(root),
    }
}

fn project_name(ctx: &Context) -> String {
    ctx.text("project_name").unwrap_or("Project").to_string()
}

// ---------------------------------------------------------------------------
// Manifests
// ---------------------------------------------------------------------------

/// Context check an agent evaluates before loading a file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trigger {
    pub field: &'static str,
    pub operator: &'static str,
    pub value: Option<&'static str>,
    pub action: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conditions {
    pub always_load: bool,
    pub context_required: Vec<&'static str>,
    pub triggers: Vec<Trigger>,
}

/// Triggers for a file gated on `key`. Empty unless the context sets `key`,
/// so a forced file never advertises a condition that does not hold.
fn conditions_for(ctx: &Context, key: Option<&'static str>) -> Conditions {
    let Some(key) = key else {
        return Conditions {
            always_load: true,
            context_required: Vec::new(),
            triggers: Vec::new(),
        };
    };

    let triggers = if key == "containerization" {
        if Condition::Docker.holds(ctx) {
            vec![Trigger {
                field: key,
                operator: "contains",
                value: Some("docker"),
                action: "load",
            }]
        } else {
            Vec::new()
        }
    } else if is_known(ctx, key) {
        vec![
            Trigger {
                field: key,
                operator: "!=",
                value: Some("unknown"),
                action: "load",
            },
            Trigger {
                field: key,
                operator: "!=",
                value: None,
                action: "load",
            },
        ]
    } else {
        Vec::new()
    };

    Conditions {
        always_load: false,
        context_required: vec![key],
        triggers,
    }
}

fn rule_use_when(ctx: &Context, level: RuleLevel) -> String {
    match level.gating_key() {
        None if level == RuleLevel::Core => {
            "always - these are fundamental rules that apply to all projects".to_string()
        }
        None => "always - architecture rules apply to all projects".to_string(),
        Some(key) => {
            let value = ctx.get(key).map(ContextValue::stringify).unwrap_or_else(|| key.to_string());
            format!("when {key} is '{value}' and not 'unknown'")
        }
    }
}

fn rules_manifest(ctx: &Context, levels: &[RuleLevel]) -> serde_json::Value {
    let rules: Vec<serde_json::Value> = levels
        .iter()
        .map(|level| {
            serde_json::json!({
                "file": level.filename(),
                "path": format!("{}/{}", paths::RULES_DIR, level.filename()),
                "level": level.number(),
                "name": level.as_str(),
                "description": level.description(),
                "always_load": level.always_load(),
                "context_required": level.gating_key().into_iter().collect::<Vec<_>>(),
                "load_order": level.number(),
                "use_when": rule_use_when(ctx, *level),
                "conditions": conditions_for(ctx, level.gating_key()),
            })
        })
        .collect();
    serde_json::json!({
        "version": MANIFEST_VERSION,
        "project": project_name(ctx),
        "rules": rules,
    })
}

fn commands_manifest(ctx: &Context, kinds: &[CommandKind]) -> serde_json::Value {
    let commands: Vec<serde_json::Value> = kinds
        .iter()
        .map(|kind| {
            serde_json::json!({
                "file": kind.filename(),
                "path": format!("{}/{}", paths::COMMANDS_DIR, kind.filename()),
                "kind": kind.as_str(),
                "load_order": kind.load_order(),
                "description": kind.description(),
                "use_when": kind.use_when(),
                "conditions": conditions_for(ctx, kind.gating_key()),
            })
        })
        .collect();
    serde_json::json!({
        "version": MANIFEST_VERSION,
        "project": project_name(ctx),
        "commands": commands,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::{BuiltinTemplates, DirTemplates, Layered};
    use tempfile::TempDir;

    fn python_api() -> Context {
        Context::new()
            .with("project_name", "Acme")
            .with("project_type", "api")
            .with("primary_language", "python")
            .with("framework", "fastapi")
            .with("frameworks", vec!["fastapi"])
            .with("testing_framework", "pytest")
            .with("deployment_type", "docker")
            .with("containerization", vec!["docker"])
    }

    fn options() -> GenerateOptions {
        GenerateOptions {
            overwrite: true,
            ..GenerateOptions::default()
        }
    }

    #[test]
    fn levels_follow_context() {
        let engine = TemplateEngine::new();
        let bare = engine.normalize(&Context::new());
        assert_eq!(
            required_rule_levels(&bare, &[]),
            vec![RuleLevel::Core, RuleLevel::Architecture]
        );
        let full = engine.normalize(&python_api());
        assert_eq!(required_rule_levels(&full, &[]), RuleLevel::all().to_vec());
        assert_eq!(
            required_rule_levels(&bare, &[RuleLevel::Framework]),
            vec![RuleLevel::Core, RuleLevel::Architecture, RuleLevel::Framework]
        );
    }

    #[test]
    fn command_kinds_follow_context() {
        let engine = TemplateEngine::new();
        assert_eq!(
            required_command_kinds(&engine.normalize(&Context::new())),
            vec![CommandKind::Build]
        );
        assert_eq!(
            required_command_kinds(&engine.normalize(&python_api())),
            CommandKind::all().to_vec()
        );
    }

    #[test]
    fn generates_full_workspace() {
        let dir = TempDir::new().unwrap();
        let gen = WorkspaceGenerator::new(&BuiltinTemplates, options());
        let report = gen.generate(dir.path(), &python_api()).unwrap();

        for rel in [
            ".cursorrules",
            ".cursor/rules/level1-core.mdc",
            ".cursor/rules/level5-framework.mdc",
            ".cursor/commands/docker-commands.mdc",
            ".cursor/rules/rules_manifest.json",
            ".cursor/commands/commands_manifest.json",
            ".cursor/AGENTS.md",
        ] {
            assert!(dir.path().join(rel).exists(), "missing {rel}");
        }
        assert!(report.files.iter().all(|f| f.outcome == WriteOutcome::Created));
        assert!(!report.has_missing(), "{:?}", report.files);

        let level4 = std::fs::read_to_string(dir.path().join(".cursor/rules/level4-language.mdc")).unwrap();
        assert!(level4.contains("type hints"));
        assert!(!level4.contains("gofmt"));
        assert!(!level4.contains("<PLACEHOLDER"));
    }

    #[test]
    fn manifests_list_written_files() {
        let dir = TempDir::new().unwrap();
        WorkspaceGenerator::new(&BuiltinTemplates, options())
            .generate(dir.path(), &Context::new().with("project_name", "Bare"))
            .unwrap();

        let rules: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join(paths::RULES_MANIFEST)).unwrap(),
        )
        .unwrap();
        assert_eq!(rules["project"], "Bare");
        let files: Vec<&str> = rules["rules"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["file"].as_str().unwrap())
            .collect();
        assert_eq!(files, vec!["level1-core.mdc", "level2-architecture.mdc"]);
        assert_eq!(rules["rules"][0]["always_load"], true);

        let commands: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join(paths::COMMANDS_MANIFEST)).unwrap(),
        )
        .unwrap();
        assert_eq!(commands["commands"].as_array().unwrap().len(), 1);
        assert_eq!(commands["commands"][0]["kind"], "build");
    }

    #[test]
    fn rule_entries_carry_load_conditions() {
        let ctx = TemplateEngine::new().normalize(&python_api());
        let manifest = rules_manifest(&ctx, &required_rule_levels(&ctx, &[]));
        let rules = manifest["rules"].as_array().unwrap();

        let core = &rules[0];
        assert_eq!(core["path"], ".cursor/rules/level1-core.mdc");
        assert_eq!(core["description"], "Core rules and principles");
        assert_eq!(
            core["use_when"],
            "always - these are fundamental rules that apply to all projects"
        );
        assert_eq!(core["conditions"]["always_load"], true);
        assert_eq!(core["conditions"]["triggers"], serde_json::json!([]));

        let framework = &rules[4];
        assert_eq!(framework["use_when"], "when framework is 'fastapi' and not 'unknown'");
        assert_eq!(framework["conditions"]["context_required"], serde_json::json!(["framework"]));
        assert_eq!(
            framework["conditions"]["triggers"],
            serde_json::json!([
                {"field": "framework", "operator": "!=", "value": "unknown", "action": "load"},
                {"field": "framework", "operator": "!=", "value": null, "action": "load"},
            ])
        );
    }

    #[test]
    fn forced_level_without_value_has_no_triggers() {
        let ctx = TemplateEngine::new().normalize(&Context::new());
        let manifest = rules_manifest(&ctx, &required_rule_levels(&ctx, &[RuleLevel::Framework]));
        let framework = &manifest["rules"][2];
        assert_eq!(framework["name"], "framework");
        assert_eq!(framework["conditions"]["always_load"], false);
        assert_eq!(framework["conditions"]["triggers"], serde_json::json!([]));
    }

    #[test]
    fn command_entries_carry_load_conditions() {
        let ctx = TemplateEngine::new().normalize(&python_api());
        let manifest = commands_manifest(&ctx, &required_command_kinds(&ctx));
        let commands = manifest["commands"].as_array().unwrap();
        let by_kind = |kind: &str| commands.iter().find(|c| c["kind"] == kind).unwrap();

        let build = by_kind("build");
        assert_eq!(build["load_order"], 1);
        assert_eq!(build["path"], ".cursor/commands/build-commands.mdc");
        assert_eq!(build["conditions"]["always_load"], true);

        let test = by_kind("test");
        assert_eq!(test["load_order"], 2);
        assert_eq!(test["conditions"]["triggers"][0]["field"], "testing_framework");

        let docker = by_kind("docker");
        assert_eq!(docker["use_when"], "when Docker containerization is detected");
        assert_eq!(
            docker["conditions"]["triggers"],
            serde_json::json!([
                {"field": "containerization", "operator": "contains", "value": "docker", "action": "load"},
            ])
        );
    }

    #[test]
    fn no_overwrite_keeps_existing_files() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(".cursorrules"), "mine").unwrap();
        let gen = WorkspaceGenerator::new(
            &BuiltinTemplates,
            GenerateOptions {
                overwrite: false,
                ..GenerateOptions::default()
            },
        );
        let report = gen.generate(dir.path(), &python_api()).unwrap();
        assert_eq!(std::fs::read_to_string(dir.path().join(".cursorrules")).unwrap(), "mine");
        let entry = report.files.iter().find(|f| f.path == ".cursorrules").unwrap();
        assert_eq!(entry.outcome, WriteOutcome::Skipped);
        assert!(report.written().all(|f| f.path != ".cursorrules"));
    }

    #[test]
    fn strict_mode_writes_nothing_on_missing() {
        let templates_dir = TempDir::new().unwrap();
        std::fs::write(
            templates_dir.path().join(".cursorrules.template"),
            "<PLACEHOLDER: PROJECT_NAME> owned by <PLACEHOLDER: TEAM_OWNER>",
        )
        .unwrap();
        let source = Layered::with_builtin_fallback(Some(templates_dir.path().to_path_buf()));

        let out = TempDir::new().unwrap();
        let gen = WorkspaceGenerator::new(
            &source,
            GenerateOptions {
                strict: true,
                overwrite: true,
                ..GenerateOptions::default()
            },
        );
        let err = gen.generate(out.path(), &python_api()).unwrap_err();
        match err {
            ScaffoldError::StrictRender { file, missing } => {
                assert_eq!(file, ".cursorrules");
                assert_eq!(missing, vec!["TEAM_OWNER"]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!out.path().join(".cursorrules").exists());
    }

    #[test]
    fn lenient_mode_records_missing() {
        let templates_dir = TempDir::new().unwrap();
        std::fs::write(
            templates_dir.path().join(".cursorrules.template"),
            "owner: <PLACEHOLDER: TEAM_OWNER>",
        )
        .unwrap();
        let dirs = DirTemplates::new(templates_dir.path());
        let source = Layered::new(vec![Box::new(dirs), Box::new(BuiltinTemplates)]);

        let out = TempDir::new().unwrap();
        let report = WorkspaceGenerator::new(&source, options())
            .generate(out.path(), &Context::new())
            .unwrap();
        assert!(report.has_missing());
        assert_eq!(
            std::fs::read_to_string(out.path().join(".cursorrules")).unwrap(),
            "owner: "
        );
    }

    #[test]
    fn options_from_config() {
        let cfg = ScaffoldConfig {
            strict: true,
            overwrite: false,
            rules: crate::config::RulesConfig {
                levels: vec!["language".to_string()],
            },
            ..ScaffoldConfig::default()
        };
        let opts = GenerateOptions::from(&cfg);
        assert!(opts.strict);
        assert!(!opts.overwrite);
        assert_eq!(opts.forced_levels, vec![RuleLevel::Language]);
    }
}
