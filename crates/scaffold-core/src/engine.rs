use crate::condition::process_conditionals;
use crate::context::Context;
use crate::error::{Result, ScaffoldError};
use crate::normalize::{normalize, Defaults};
use crate::resolver::{AliasTable, Resolver};
use crate::token::{is_conditional, placeholder_names, placeholder_re};
use regex::Captures;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// Rendered text plus the placeholders that resolved to nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rendering {
    pub output: String,
    pub missing: Vec<String>,
}

impl Rendering {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Result of scanning rendered output for leftover tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validation {
    pub complete: bool,
    pub remaining: Vec<String>,
}

/// Result of checking a template's placeholders against a context before
/// rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextCheck {
    pub valid: bool,
    pub missing: Vec<String>,
}

// ---------------------------------------------------------------------------
// TemplateEngine
// ---------------------------------------------------------------------------

/// Normalize → conditionals → placeholder substitution.
///
/// Rendering is a pure function of the template, the context and the tables
/// the engine was built with. Missing values never fail a render; they are
/// blanked, logged and reported in [`Rendering::missing`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateEngine {
    defaults: Defaults,
    resolver: Resolver,
}

impl TemplateEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tables(defaults: Defaults, aliases: AliasTable) -> Self {
        Self {
            defaults,
            resolver: Resolver::new(aliases),
        }
    }

    pub fn normalize(&self, ctx: &Context) -> Context {
        normalize(ctx, &self.defaults)
    }

    pub fn render(&self, template: &str, ctx: &Context) -> String {
        self.render_with_diagnostics(template, ctx).output
    }

    pub fn render_with_diagnostics(&self, template: &str, ctx: &Context) -> Rendering {
        let normalized = self.normalize(ctx);
        let conditioned = process_conditionals(template, &normalized);

        let mut missing: Vec<String> = Vec::new();
        let output = placeholder_re()
            .replace_all(&conditioned, |cap: &Captures| {
                let name = &cap[1];
                // Stray conditional markers from malformed templates.
                if is_conditional(name) {
                    return String::new();
                }
                match self.resolver.resolve(name, &normalized) {
                    Some(value) => value,
                    None => {
                        tracing::warn!(placeholder = name, "context variable not found, using empty value");
                        if !missing.iter().any(|m| m == name) {
                            missing.push(name.to_string());
                        }
                        String::new()
                    }
                }
            })
            .into_owned();

        Rendering { output, missing }
    }

    /// Render, failing if any placeholder could not be resolved. `label`
    /// names the template in the error.
    pub fn render_strict(&self, template: &str, ctx: &Context, label: &str) -> Result<String> {
        let rendering = self.render_with_diagnostics(template, ctx);
        if !rendering.is_complete() {
            return Err(ScaffoldError::StrictRender {
                file: label.to_string(),
                missing: rendering.missing,
            });
        }
        Ok(rendering.output)
    }

    /// Report any `<PLACEHOLDER: …>` token left in `rendered`.
    pub fn validate(&self, rendered: &str) -> Validation {
        let remaining = placeholder_names(rendered);
        if !remaining.is_empty() {
            tracing::warn!(count = remaining.len(), tokens = ?remaining, "placeholders not replaced");
        }
        Validation {
            complete: remaining.is_empty(),
            remaining,
        }
    }

    /// Check that every plain placeholder in `template` resolves against the
    /// normalized context. Conditional markers are not checked.
    pub fn validate_context(&self, template: &str, ctx: &Context) -> ContextCheck {
        let normalized = self.normalize(ctx);
        let missing: Vec<String> = placeholder_names(template)
            .into_iter()
            .filter(|name| !is_conditional(name))
            .filter(|name| self.resolver.lookup_key(name, &normalized).is_none())
            .collect();
        ContextCheck {
            valid: missing.is_empty(),
            missing,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::DefaultValue;
    use crate::resolver::AliasTable;

    fn engine() -> TemplateEngine {
        TemplateEngine::new()
    }

    #[test]
    fn end_to_end_scenario() {
        let ctx = Context::new()
            .with("project_name", "Acme")
            .with("primary_language", "python");
        let out = engine().render(
            "Project: <PLACEHOLDER: PROJECT_NAME>, Lang: <PLACEHOLDER: PRIMARY_LANGUAGE>",
            &ctx,
        );
        assert_eq!(out, "Project: Acme, Lang: python");
    }

    #[test]
    fn custom_tables_replace_standard_ones() {
        static DEFAULTS: &[(&str, DefaultValue)] = &[("project_name", DefaultValue::Text("Unnamed"))];
        static ALIASES: &[(&str, &str)] = &[("NAME", "project_name")];
        let e = TemplateEngine::with_tables(Defaults::new(DEFAULTS), AliasTable::new(ALIASES));

        let rendering = e.render_with_diagnostics(
            "<PLACEHOLDER: NAME>|<PLACEHOLDER: FILE_ORGANIZATION>",
            &Context::new(),
        );
        assert_eq!(rendering.output, "Unnamed|");
        assert_eq!(rendering.missing, vec!["FILE_ORGANIZATION"]);

        let standard = engine().render("<PLACEHOLDER: FILE_ORGANIZATION>", &Context::new());
        assert_eq!(standard, "standard");
    }

    #[test]
    fn database_alias_reads_plural_key() {
        let ctx = Context::new().with("databases", vec!["postgresql"]);
        assert_eq!(engine().render("<PLACEHOLDER: DATABASE>", &ctx), "postgresql");
    }

    #[test]
    fn unresolvable_placeholder_renders_empty_and_is_reported() {
        let e = engine();
        let ctx = Context::new().with("project_name", "Acme");
        let template = "<PLACEHOLDER: TOTALLY_UNKNOWN_XYZ>";

        let rendering = e.render_with_diagnostics(template, &ctx);
        assert_eq!(rendering.output, "");
        assert_eq!(rendering.missing, vec!["TOTALLY_UNKNOWN_XYZ"]);

        let check = e.validate_context(template, &ctx);
        assert!(!check.valid);
        assert_eq!(check.missing, vec!["TOTALLY_UNKNOWN_XYZ"]);
    }

    #[test]
    fn conditional_truth_table_through_render() {
        let ctx = Context::new().with("primary_language", "python");
        let out = engine().render(
            "<PLACEHOLDER: IF_PYTHON>A<PLACEHOLDER: ENDIF_PYTHON><PLACEHOLDER: IF_GO>B<PLACEHOLDER: ENDIF_GO>",
            &ctx,
        );
        assert_eq!(out, "A");
    }

    #[test]
    fn known_placeholders_leave_nothing_behind() {
        let e = engine();
        let ctx = e.normalize(&Context::new().with("project_name", "Acme"));
        let template: String = AliasTable::standard()
            .iter()
            .filter(|(_, key)| ctx.contains_key(key))
            .map(|(name, _)| format!("{name}: <PLACEHOLDER: {name}>\n"))
            .collect();
        let rendered = e.render(&template, &ctx);
        let v = e.validate(&rendered);
        assert!(v.complete, "left over: {:?}", v.remaining);
        assert!(v.remaining.is_empty());
    }

    #[test]
    fn stray_markers_are_blanked_without_lookup() {
        let ctx = Context::new().with("primary_language", "python");
        let out = engine().render("a<PLACEHOLDER: ENDIF_GO>b<PLACEHOLDER: IF_RUST>c", &ctx);
        assert_eq!(out, "abc");
    }

    #[test]
    fn placeholders_inside_kept_region_are_substituted() {
        let ctx = Context::new()
            .with("project_type", "api")
            .with("ports", vec!["8000"]);
        let out = engine().render(
            "<PLACEHOLDER: IF_API>Ports: <PLACEHOLDER: PORTS><PLACEHOLDER: ENDIF_API>",
            &ctx,
        );
        assert_eq!(out, "Ports: 8000");
    }

    #[test]
    fn defaults_fill_absent_values() {
        let out = engine().render(
            "<PLACEHOLDER: PROJECT_NAME>|<PLACEHOLDER: SERVICES>|<PLACEHOLDER: PROJECT_PURPOSE>|<PLACEHOLDER: NETWORKING>",
            &Context::new(),
        );
        assert_eq!(out, "Project|None||None");
    }

    #[test]
    fn validate_reports_remaining_tokens() {
        let v = engine().validate("done <PLACEHOLDER: A> and <PLACEHOLDER:B> and <PLACEHOLDER: A>");
        assert!(!v.complete);
        assert_eq!(v.remaining, vec!["A", "B"]);
        assert!(engine().validate("clean").complete);
    }

    #[test]
    fn validate_context_ignores_conditional_markers() {
        let check = engine().validate_context(
            "<PLACEHOLDER: IF_PYTHON>x<PLACEHOLDER: ENDIF_PYTHON><PLACEHOLDER: PROJECT_NAME>",
            &Context::new(),
        );
        assert!(check.valid, "missing: {:?}", check.missing);
    }

    #[test]
    fn validate_context_flags_unset_alias_target() {
        let check = engine().validate_context("<PLACEHOLDER: LANGUAGES>", &Context::new());
        assert_eq!(check.missing, vec!["LANGUAGES"]);
        let ok = engine().validate_context(
            "<PLACEHOLDER: LANGUAGES>",
            &Context::new().with("languages", vec!["rust"]),
        );
        assert!(ok.valid);
    }

    #[test]
    fn render_strict_fails_on_missing() {
        let err = engine()
            .render_strict("<PLACEHOLDER: NOPE>", &Context::new(), ".cursorrules")
            .unwrap_err();
        assert!(matches!(err, ScaffoldError::StrictRender { ref missing, .. } if missing == &vec!["NOPE".to_string()]));
        assert_eq!(
            engine()
                .render_strict("<PLACEHOLDER: PROJECT_NAME>", &Context::new(), "x")
                .unwrap(),
            "Project"
        );
    }

    #[test]
    fn template_is_not_mutated_and_render_is_repeatable() {
        let template = String::from("<PLACEHOLDER: PROJECT_NAME>");
        let ctx = Context::new().with("project_name", "Acme");
        let first = engine().render(&template, &ctx);
        let second = engine().render(&template, &ctx);
        assert_eq!(first, second);
        assert_eq!(template, "<PLACEHOLDER: PROJECT_NAME>");
    }
}
