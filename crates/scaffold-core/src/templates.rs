use crate::error::{Result, ScaffoldError};
use crate::types::{CommandKind, RuleLevel};
use std::fmt;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// TemplateId
// ---------------------------------------------------------------------------

/// Logical name of a workspace template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateId {
    Cursorrules,
    Rule(RuleLevel),
    Command(CommandKind),
    Agents,
}

impl TemplateId {
    pub fn all() -> Vec<TemplateId> {
        let mut ids = vec![TemplateId::Cursorrules];
        ids.extend(RuleLevel::all().iter().map(|l| TemplateId::Rule(*l)));
        ids.extend(CommandKind::all().iter().map(|k| TemplateId::Command(*k)));
        ids.push(TemplateId::Agents);
        ids
    }

    /// Short name used on the command line and in logs.
    pub fn name(self) -> String {
        match self {
            TemplateId::Cursorrules => "cursorrules".to_string(),
            TemplateId::Rule(level) => format!("rule:{level}"),
            TemplateId::Command(kind) => format!("command:{kind}"),
            TemplateId::Agents => "agents".to_string(),
        }
    }

    /// Location of the template inside a template directory.
    pub fn relative_path(self) -> PathBuf {
        match self {
            TemplateId::Cursorrules => PathBuf::from(".cursorrules.template"),
            TemplateId::Rule(level) => {
                PathBuf::from(format!(".cursor/rules/{}.template", level.filename()))
            }
            TemplateId::Command(kind) => {
                PathBuf::from(format!(".cursor/commands/{}.template", kind.filename()))
            }
            TemplateId::Agents => PathBuf::from(".cursor/AGENTS.md.template"),
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

// ---------------------------------------------------------------------------
// TemplateSource
// ---------------------------------------------------------------------------

/// Supplies raw template text by logical name. `Ok(None)` means this source
/// has no such template.
pub trait TemplateSource {
    fn template(&self, id: TemplateId) -> Result<Option<String>>;

    /// Like [`TemplateSource::template`] but a missing template is an error.
    fn require(&self, id: TemplateId) -> Result<String> {
        self.template(id)?
            .ok_or_else(|| ScaffoldError::TemplateNotFound(id.name()))
    }
}

/// Templates compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTemplates;

impl TemplateSource for BuiltinTemplates {
    fn template(&self, id: TemplateId) -> Result<Option<String>> {
        Ok(Some(builtin(id).to_string()))
    }
}

/// Templates read from a directory laid out like the generated workspace,
/// with a `.template` suffix on each file.
#[derive(Debug, Clone)]
pub struct DirTemplates {
    dir: PathBuf,
}

impl DirTemplates {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl TemplateSource for DirTemplates {
    fn template(&self, id: TemplateId) -> Result<Option<String>> {
        let path = self.dir.join(id.relative_path());
        if !path.is_file() {
            return Ok(None);
        }
        tracing::debug!(template = %id, path = %path.display(), "loading template override");
        Ok(Some(std::fs::read_to_string(&path)?))
    }
}

/// Asks each source in order; the first that has the template wins.
pub struct Layered {
    sources: Vec<Box<dyn TemplateSource>>,
}

impl Layered {
    pub fn new(sources: Vec<Box<dyn TemplateSource>>) -> Self {
        Self { sources }
    }

    /// Directory overrides (if any) over the builtin set.
    pub fn with_builtin_fallback(dir: Option<PathBuf>) -> Self {
        let mut sources: Vec<Box<dyn TemplateSource>> = Vec::new();
        if let Some(dir) = dir {
            sources.push(Box::new(DirTemplates::new(dir)));
        }
        sources.push(Box::new(BuiltinTemplates));
        Self::new(sources)
    }
}

impl TemplateSource for Layered {
    fn template(&self, id: TemplateId) -> Result<Option<String>> {
        for source in &self.sources {
            if let Some(text) = source.template(id)? {
                return Ok(Some(text));
            }
        }
        Ok(None)
    }
}

/// Read a standalone template file.
pub fn load_template(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(ScaffoldError::TemplateNotFound(path.display().to_string()));
    }
    Ok(std::fs::read_to_string(path)?)
}

// ---------------------------------------------------------------------------
// Builtin template text
// ---------------------------------------------------------------------------

fn builtin(id: TemplateId) -> &'static str {
    match id {
        TemplateId::Cursorrules => CURSORRULES_TEMPLATE,
        TemplateId::Rule(RuleLevel::Core) => LEVEL1_CORE_TEMPLATE,
        TemplateId::Rule(RuleLevel::Architecture) => LEVEL2_ARCHITECTURE_TEMPLATE,
        TemplateId::Rule(RuleLevel::ProjectType) => LEVEL3_PROJECT_TYPE_TEMPLATE,
        TemplateId::Rule(RuleLevel::Language) => LEVEL4_LANGUAGE_TEMPLATE,
        TemplateId::Rule(RuleLevel::Framework) => LEVEL5_FRAMEWORK_TEMPLATE,
        TemplateId::Command(CommandKind::Test) => TEST_COMMANDS_TEMPLATE,
        TemplateId::Command(CommandKind::Build) => BUILD_COMMANDS_TEMPLATE,
        TemplateId::Command(CommandKind::Deploy) => DEPLOY_COMMANDS_TEMPLATE,
        TemplateId::Command(CommandKind::Docker) => DOCKER_COMMANDS_TEMPLATE,
        TemplateId::Agents => AGENTS_TEMPLATE,
    }
}

const CURSORRULES_TEMPLATE: &str = r#"# Cursor Rules for <PLACEHOLDER: PROJECT_NAME>

## Project Information
- Project Name: <PLACEHOLDER: PROJECT_NAME>
- Project Type: <PLACEHOLDER: PROJECT_TYPE>
- Primary Language: <PLACEHOLDER: PRIMARY_LANGUAGE>
- Technologies: <PLACEHOLDER: TECHNOLOGIES>
- Architecture: <PLACEHOLDER: ARCHITECTURE>

<PLACEHOLDER: PROJECT_DESCRIPTION>

## Best Practices
- Always reference official documentation before making recommendations
- Cite sources for all architectural decisions
- Extract all variables explicitly - no guessing
- Use real, network-resolvable hostnames (avoid localhost/127.0.0.1 unless explicitly requested)

## Code Standards
- Coding standards: <PLACEHOLDER: CODING_STANDARDS>
- File organization: <PLACEHOLDER: FILE_ORGANIZATION>
- Testing framework: <PLACEHOLDER: TESTING_FRAMEWORK>
- Linting: <PLACEHOLDER: LINTING_TOOLS>
- Formatting: <PLACEHOLDER: FORMATTING_TOOLS>

## Rule Loading
Rules under `.cursor/rules/` load from level 1 (most general) to level 5
(most specific). See `.cursor/rules/rules_manifest.json`.
"#;

const LEVEL1_CORE_TEMPLATE: &str = r#"# Level 1: Core Rules for <PLACEHOLDER: PROJECT_NAME>

## Zero-Assumption Principles
- Always reference official documentation before making recommendations
- Cite sources for all architectural decisions
- Never proceed without documentation backing
- Extract all variables explicitly - no guessing
- Never modify original reference files

## General Best Practices
- Follow project coding standards: <PLACEHOLDER: CODING_STANDARDS>
- Maintain consistent file organization: <PLACEHOLDER: FILE_ORGANIZATION>
- Write comprehensive tests using: <PLACEHOLDER: TESTING_FRAMEWORK>

## Documentation Sources
<PLACEHOLDER: DOCUMENTATION_SOURCES>
"#;

const LEVEL2_ARCHITECTURE_TEMPLATE: &str = r#"# Level 2: Architecture Rules for <PLACEHOLDER: PROJECT_NAME>

## Architecture Pattern
- Architecture: <PLACEHOLDER: ARCHITECTURE>
- Deployment Type: <PLACEHOLDER: DEPLOYMENT_TYPE>
- Networking: <PLACEHOLDER: NETWORKING>
- Databases: <PLACEHOLDER: DATABASE>

<PLACEHOLDER: IF_MICROSERVICES>
## Services
- Services: <PLACEHOLDER: SERVICES>
- Ports: <PLACEHOLDER: PORTS>
- Keep service boundaries explicit; never share databases between services
<PLACEHOLDER: ENDIF_MICROSERVICES>
<PLACEHOLDER: IF_DOCKER>
## Containers
- Containerization: <PLACEHOLDER: CONTAINERIZATION>
<PLACEHOLDER: ENDIF_DOCKER>
<PLACEHOLDER: IF_KUBERNETES>
## Orchestration
- Orchestration: <PLACEHOLDER: ORCHESTRATION>
<PLACEHOLDER: ENDIF_KUBERNETES>

## Design Principles
- Follow established architecture patterns for <PLACEHOLDER: ARCHITECTURE>
- Maintain separation of concerns
- Use appropriate design patterns for the architecture
"#;

const LEVEL3_PROJECT_TYPE_TEMPLATE: &str = r#"# Level 3: Project Type Rules for <PLACEHOLDER: PROJECT_NAME>

## Project Type: <PLACEHOLDER: PROJECT_TYPE>

## Project-Specific Guidelines
- Follow best practices for <PLACEHOLDER: PROJECT_TYPE> projects
- Maintain project structure appropriate for <PLACEHOLDER: PROJECT_TYPE>
<PLACEHOLDER: IF_API>
- Version every public endpoint and document request/response schemas
<PLACEHOLDER: ENDIF_API>
<PLACEHOLDER: IF_SPA>
- Keep routing client-side and split bundles per route
<PLACEHOLDER: ENDIF_SPA>
<PLACEHOLDER: IF_CLI>
- Exit non-zero on failure and keep stdout machine-readable
<PLACEHOLDER: ENDIF_CLI>
<PLACEHOLDER: IF_MONOREPO>
- Keep packages independently buildable; share code through workspace packages
<PLACEHOLDER: ENDIF_MONOREPO>
<PLACEHOLDER: IF_FULL_STACK>
- Share types between client and server instead of duplicating them
<PLACEHOLDER: ENDIF_FULL_STACK>

## Key Concepts
<PLACEHOLDER: KEY_CONCEPTS>
"#;

const LEVEL4_LANGUAGE_TEMPLATE: &str = r#"# Level 4: Language-Specific Rules for <PLACEHOLDER: PROJECT_NAME>

## Primary Language: <PLACEHOLDER: PRIMARY_LANGUAGE>

## Language-Specific Guidelines
- Follow <PLACEHOLDER: PRIMARY_LANGUAGE> best practices and conventions
- Coding standards: <PLACEHOLDER: CODING_STANDARDS>
<PLACEHOLDER: IF_PYTHON>
- Use type hints on public functions
- Manage dependencies with a lock file
<PLACEHOLDER: ENDIF_PYTHON>
<PLACEHOLDER: IF_JAVASCRIPT>
- Prefer TypeScript strict mode where available
- Keep package.json scripts as the single entry point for tooling
<PLACEHOLDER: ENDIF_JAVASCRIPT>
<PLACEHOLDER: IF_GO>
- Run gofmt and go vet before committing
- Return errors, do not panic across package boundaries
<PLACEHOLDER: ENDIF_GO>
<PLACEHOLDER: IF_RUST>
- Run cargo fmt and cargo clippy before committing
- Propagate errors with Result and ?, avoid unwrap outside tests
<PLACEHOLDER: ENDIF_RUST>
"#;

const LEVEL5_FRAMEWORK_TEMPLATE: &str = r#"# Level 5: Framework-Specific Rules for <PLACEHOLDER: PROJECT_NAME>

## Framework: <PLACEHOLDER: FRAMEWORK>

## Framework-Specific Guidelines
- Follow <PLACEHOLDER: FRAMEWORK> best practices and conventions
- Use framework-specific patterns and idioms
<PLACEHOLDER: IF_FASTAPI>
- Declare request and response models with Pydantic
- Use dependency injection for database sessions
<PLACEHOLDER: ENDIF_FASTAPI>
<PLACEHOLDER: IF_DJANGO>
- Keep business logic out of views; use model methods and services
<PLACEHOLDER: ENDIF_DJANGO>
<PLACEHOLDER: IF_FLASK>
- Organize routes with blueprints
<PLACEHOLDER: ENDIF_FLASK>
<PLACEHOLDER: IF_REACT>
- Prefer function components and hooks
<PLACEHOLDER: ENDIF_REACT>
<PLACEHOLDER: IF_NEXTJS>
- Fetch data in server components where possible
<PLACEHOLDER: ENDIF_NEXTJS>
<PLACEHOLDER: IF_EXPRESS>
- Centralize error handling in middleware
<PLACEHOLDER: ENDIF_EXPRESS>
<PLACEHOLDER: IF_NESTJS>
- Group features into modules with their own providers
<PLACEHOLDER: ENDIF_NESTJS>
"#;

const TEST_COMMANDS_TEMPLATE: &str = r#"# Test Commands for <PLACEHOLDER: PROJECT_NAME>

## Running Tests
- Testing framework: <PLACEHOLDER: TESTING_FRAMEWORK>
<PLACEHOLDER: IF_PYTHON>
- Run all tests: `pytest`
- Run one test: `pytest path/to/test_file.py::test_name`
<PLACEHOLDER: ENDIF_PYTHON>
<PLACEHOLDER: IF_JAVASCRIPT>
- Run all tests: `npm test`
<PLACEHOLDER: ENDIF_JAVASCRIPT>
<PLACEHOLDER: IF_GO>
- Run all tests: `go test ./...`
<PLACEHOLDER: ENDIF_GO>
<PLACEHOLDER: IF_RUST>
- Run all tests: `cargo test`
<PLACEHOLDER: ENDIF_RUST>
"#;

const BUILD_COMMANDS_TEMPLATE: &str = r#"# Build Commands for <PLACEHOLDER: PROJECT_NAME>

## Building the Project
- Build tools: <PLACEHOLDER: BUILD_TOOLS>
<PLACEHOLDER: IF_JAVASCRIPT>
- Build: `npm run build`
<PLACEHOLDER: ENDIF_JAVASCRIPT>
<PLACEHOLDER: IF_GO>
- Build: `go build ./...`
<PLACEHOLDER: ENDIF_GO>
<PLACEHOLDER: IF_RUST>
- Build: `cargo build --release`
<PLACEHOLDER: ENDIF_RUST>
- Check project documentation for production build steps
"#;

const DEPLOY_COMMANDS_TEMPLATE: &str = r#"# Deployment Commands for <PLACEHOLDER: PROJECT_NAME>

## Deployment
- Deployment type: <PLACEHOLDER: DEPLOYMENT_TYPE>
- Cloud platforms: <PLACEHOLDER: CLOUD_PLATFORMS>
<PLACEHOLDER: IF_KUBERNETES>
- Apply manifests: `kubectl apply -f k8s/`
<PLACEHOLDER: ENDIF_KUBERNETES>
<PLACEHOLDER: IF_VERCEL>
- Deploy: `vercel --prod`
<PLACEHOLDER: ENDIF_VERCEL>
<PLACEHOLDER: IF_HEROKU>
- Deploy: `git push heroku main`
<PLACEHOLDER: ENDIF_HEROKU>
"#;

const DOCKER_COMMANDS_TEMPLATE: &str = r#"# Docker Commands for <PLACEHOLDER: PROJECT_NAME>

## Docker Commands
- Containerization: <PLACEHOLDER: CONTAINERIZATION>
- Build image: `docker build -t <image> .`
- Run container: `docker run <image>`
- Exposed ports: <PLACEHOLDER: PORTS>
"#;

const AGENTS_TEMPLATE: &str = r#"# Agent Guide for <PLACEHOLDER: PROJECT_NAME>

<PLACEHOLDER: PROJECT_PURPOSE>

## Stack
- Language: <PLACEHOLDER: PRIMARY_LANGUAGE>
- Framework: <PLACEHOLDER: FRAMEWORK>
- Technologies: <PLACEHOLDER: TECHNOLOGIES>
- Databases: <PLACEHOLDER: DATABASE>

## Working in this repository
1. Read `.cursorrules` first.
2. Load `.cursor/rules/` in level order; skip levels not listed in
   `rules_manifest.json`.
3. Use the commands in `.cursor/commands/` instead of guessing tool
   invocations.
"#;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn every_id_has_a_builtin() {
        for id in TemplateId::all() {
            let text = BuiltinTemplates.require(id).unwrap();
            assert!(text.contains("<PLACEHOLDER: PROJECT_NAME>"), "{id}");
        }
    }

    #[test]
    fn names_are_unique() {
        let names: std::collections::BTreeSet<String> =
            TemplateId::all().into_iter().map(|id| id.name()).collect();
        assert_eq!(names.len(), TemplateId::all().len());
    }

    #[test]
    fn dir_source_reads_relative_path() {
        let dir = TempDir::new().unwrap();
        let id = TemplateId::Rule(RuleLevel::Core);
        let path = dir.path().join(id.relative_path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "custom core").unwrap();

        let src = DirTemplates::new(dir.path());
        assert_eq!(src.template(id).unwrap().as_deref(), Some("custom core"));
        assert_eq!(src.template(TemplateId::Agents).unwrap(), None);
    }

    #[test]
    fn layered_prefers_directory_then_builtin() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(".cursorrules.template"), "override").unwrap();
        let src = Layered::with_builtin_fallback(Some(dir.path().to_path_buf()));
        assert_eq!(src.require(TemplateId::Cursorrules).unwrap(), "override");
        assert_eq!(
            src.require(TemplateId::Agents).unwrap(),
            AGENTS_TEMPLATE
        );
    }

    #[test]
    fn empty_layer_reports_not_found() {
        let src = Layered::new(Vec::new());
        let err = src.require(TemplateId::Agents).unwrap_err();
        assert!(matches!(err, ScaffoldError::TemplateNotFound(ref n) if n == "agents"));
    }

    #[test]
    fn load_template_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(load_template(&dir.path().join("none.template")).is_err());
    }
}
