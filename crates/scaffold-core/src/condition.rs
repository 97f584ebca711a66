use crate::context::Context;
use crate::error::ScaffoldError;
use crate::token::{endif_re, if_re};
use std::fmt;

// ---------------------------------------------------------------------------
// Condition
// ---------------------------------------------------------------------------

/// Closed vocabulary of template conditions (`IF_<NAME>`). Names are matched
/// case-insensitively; anything outside this set evaluates false.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    // primary_language
    Python,
    JavaScriptOrTypeScript,
    Go,
    Rust,
    // framework
    Fastapi,
    Django,
    Flask,
    React,
    Nextjs,
    Express,
    Nestjs,
    // project_type
    Microservices,
    Monorepo,
    Spa,
    Api,
    FullStack,
    Cli,
    // containerization / orchestration / cloud_platforms
    Docker,
    Kubernetes,
    Aws,
    Azure,
    Gcp,
    Vercel,
    Netlify,
    Heroku,
}

impl Condition {
    pub fn all() -> &'static [Condition] {
        &[
            Condition::Python,
            Condition::JavaScriptOrTypeScript,
            Condition::Go,
            Condition::Rust,
            Condition::Fastapi,
            Condition::Django,
            Condition::Flask,
            Condition::React,
            Condition::Nextjs,
            Condition::Express,
            Condition::Nestjs,
            Condition::Microservices,
            Condition::Monorepo,
            Condition::Spa,
            Condition::Api,
            Condition::FullStack,
            Condition::Cli,
            Condition::Docker,
            Condition::Kubernetes,
            Condition::Aws,
            Condition::Azure,
            Condition::Gcp,
            Condition::Vercel,
            Condition::Netlify,
            Condition::Heroku,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Condition::Python => "python",
            Condition::JavaScriptOrTypeScript => "javascript",
            Condition::Go => "go",
            Condition::Rust => "rust",
            Condition::Fastapi => "fastapi",
            Condition::Django => "django",
            Condition::Flask => "flask",
            Condition::React => "react",
            Condition::Nextjs => "nextjs",
            Condition::Express => "express",
            Condition::Nestjs => "nestjs",
            Condition::Microservices => "microservices",
            Condition::Monorepo => "monorepo",
            Condition::Spa => "spa",
            Condition::Api => "api",
            Condition::FullStack => "full_stack",
            Condition::Cli => "cli",
            Condition::Docker => "docker",
            Condition::Kubernetes => "kubernetes",
            Condition::Aws => "aws",
            Condition::Azure => "azure",
            Condition::Gcp => "gcp",
            Condition::Vercel => "vercel",
            Condition::Netlify => "netlify",
            Condition::Heroku => "heroku",
        }
    }

    /// Evaluate against a normalized context.
    pub fn holds(self, ctx: &Context) -> bool {
        match self {
            Condition::Python => text_eq(ctx, "primary_language", "python"),
            Condition::JavaScriptOrTypeScript => {
                text_eq(ctx, "primary_language", "javascript")
                    || text_eq(ctx, "primary_language", "typescript")
            }
            Condition::Go => text_eq(ctx, "primary_language", "go"),
            Condition::Rust => text_eq(ctx, "primary_language", "rust"),

            Condition::Fastapi
            | Condition::Django
            | Condition::Flask
            | Condition::React
            | Condition::Nextjs
            | Condition::Express
            | Condition::Nestjs => text_eq(ctx, "framework", self.as_str()),

            Condition::Microservices
            | Condition::Monorepo
            | Condition::Spa
            | Condition::Api
            | Condition::FullStack
            | Condition::Cli => text_eq(ctx, "project_type", self.as_str()),

            Condition::Docker => mentions(ctx, "containerization", "docker"),
            Condition::Kubernetes => mentions(ctx, "orchestration", "kubernetes"),
            Condition::Aws
            | Condition::Azure
            | Condition::Gcp
            | Condition::Vercel
            | Condition::Netlify
            | Condition::Heroku => mentions(ctx, "cloud_platforms", self.as_str()),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Condition {
    type Err = ScaffoldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "python" => Ok(Condition::Python),
            "javascript" | "typescript" => Ok(Condition::JavaScriptOrTypeScript),
            "go" => Ok(Condition::Go),
            "rust" => Ok(Condition::Rust),
            "fastapi" => Ok(Condition::Fastapi),
            "django" => Ok(Condition::Django),
            "flask" => Ok(Condition::Flask),
            "react" => Ok(Condition::React),
            "nextjs" => Ok(Condition::Nextjs),
            "express" => Ok(Condition::Express),
            "nestjs" => Ok(Condition::Nestjs),
            "microservices" => Ok(Condition::Microservices),
            "monorepo" => Ok(Condition::Monorepo),
            "spa" => Ok(Condition::Spa),
            "api" => Ok(Condition::Api),
            "full_stack" => Ok(Condition::FullStack),
            "cli" => Ok(Condition::Cli),
            "docker" => Ok(Condition::Docker),
            "kubernetes" => Ok(Condition::Kubernetes),
            "aws" => Ok(Condition::Aws),
            "azure" => Ok(Condition::Azure),
            "gcp" => Ok(Condition::Gcp),
            "vercel" => Ok(Condition::Vercel),
            "netlify" => Ok(Condition::Netlify),
            "heroku" => Ok(Condition::Heroku),
            _ => Err(ScaffoldError::UnknownCondition(s.to_string())),
        }
    }
}

fn text_eq(ctx: &Context, key: &str, expected: &str) -> bool {
    ctx.text(key) == Some(expected)
}

/// Case-insensitive substring test over the stringified value.
fn mentions(ctx: &Context, key: &str, needle: &str) -> bool {
    match ctx.get(key) {
        Some(v) if !v.is_empty() => v.stringify().to_lowercase().contains(needle),
        _ => false,
    }
}

/// Evaluate a raw condition name. Names outside the vocabulary are false.
pub fn evaluate(name: &str, ctx: &Context) -> bool {
    name.parse::<Condition>()
        .map(|c| c.holds(ctx))
        .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Block processing
// ---------------------------------------------------------------------------

/// Resolve every conditional region in `template` against a normalized
/// context.
///
/// Paired regions `IF_X … ENDIF_X` are matched first, left to right, each
/// `IF_X` closing at the nearest following `ENDIF_X` with the same name.
/// Regions do not nest: a matched body is emitted verbatim and any markers
/// inside it are left for [`strip_unterminated_markers`] and the
/// substitution pass.
pub fn process_conditionals(template: &str, ctx: &Context) -> String {
    let paired = resolve_paired_regions(template, ctx);
    strip_unterminated_markers(&paired)
}

fn resolve_paired_regions(template: &str, ctx: &Context) -> String {
    let mut out = String::with_capacity(template.len());
    let mut cursor = 0;
    let mut search_from = 0;

    while let Some(open) = if_re().captures_at(template, search_from) {
        let (Some(whole), Some(name)) = (open.get(0), open.get(1)) else {
            break;
        };
        let name = name.as_str();

        let close = endif_re()
            .captures_iter(&template[whole.end()..])
            .find(|cap| &cap[1] == name)
            .and_then(|cap| cap.get(0));

        let Some(close) = close else {
            // No terminator: leave the marker for the dangling pass.
            search_from = whole.end();
            continue;
        };

        let body_end = whole.end() + close.start();
        let region_end = whole.end() + close.end();

        out.push_str(&template[cursor..whole.start()]);
        if evaluate(name, ctx) {
            out.push_str(&template[whole.end()..body_end]);
        }
        cursor = region_end;
        search_from = region_end;
    }

    out.push_str(&template[cursor..]);
    out
}

/// Unterminated conditional regions are removed, not evaluated: a lone
/// `IF_X` marker is deleted whatever `X` evaluates to, and the text after
/// it is kept.
pub fn strip_unterminated_markers(text: &str) -> String {
    let stripped = if_re().replace_all(text, "");
    if stripped.len() != text.len() {
        tracing::debug!("removed unterminated conditional markers");
    }
    stripped.into_owned()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
