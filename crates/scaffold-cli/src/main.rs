mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "scaffold",
    about = "Render project context into AI agent workspace files",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .cursor/ or .git/)
    #[arg(long, global = true, env = "SCAFFOLD_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a template file against a context and print the result
    Render {
        /// Template file
        template: PathBuf,
        /// Context file (YAML or JSON)
        #[arg(long)]
        context: PathBuf,
        /// Fail if any placeholder cannot be resolved
        #[arg(long)]
        strict: bool,
    },

    /// Check that every placeholder in a template resolves against a context
    Check {
        template: PathBuf,
        #[arg(long)]
        context: PathBuf,
    },

    /// Print a context after defaults and derived fields are applied
    Context {
        #[arg(long)]
        context: PathBuf,
    },

    /// Generate .cursorrules, rules, commands and manifests into the root
    Generate {
        #[arg(long)]
        context: PathBuf,
        /// Template override directory (default: templates_dir from scaffold.yaml)
        #[arg(long)]
        templates: Option<PathBuf>,
        /// Fail before writing if any placeholder cannot be resolved
        #[arg(long)]
        strict: bool,
        /// Leave existing files untouched
        #[arg(long)]
        no_overwrite: bool,
    },

    /// Interview on stdin/stdout and save the resulting context
    Interview {
        /// Where to save the context (default: <root>/project_context.yaml)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Generate the workspace once the interview finishes
        #[arg(long)]
        generate: bool,
    },

    /// Validate a generated workspace
    Validate,

    /// Inspect scaffold.yaml
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Generate { .. } | Commands::Interview { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Render {
            template,
            context,
            strict,
        } => cmd::render::run(&template, &context, strict, cli.json),
        Commands::Check { template, context } => cmd::check::run(&template, &context, cli.json),
        Commands::Context { context } => cmd::context::run(&context, cli.json),
        Commands::Generate {
            context,
            templates,
            strict,
            no_overwrite,
        } => cmd::generate::run(
            &root,
            &context,
            cmd::generate::Overrides {
                templates,
                strict,
                no_overwrite,
            },
            cli.json,
        ),
        Commands::Interview { out, generate } => {
            cmd::interview::run(&root, out.as_deref(), generate, cli.json)
        }
        Commands::Validate => cmd::validate::run(&root, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
