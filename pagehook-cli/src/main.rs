//! # pagehook CLI
//!
//! Runs pre-processing hooks over a JSON payload and prints the result.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::HookKind;

#[derive(Parser)]
#[command(name = "pagehook")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a hooks.yml configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Commit-history API root (overrides the config file)
    #[arg(long, global = true, env = "REPO_API_ROOT")]
    api_root: Option<String>,

    /// Raw content root used to fetch SUMMARY.md (overrides the config file)
    #[arg(long, global = true, env = "REPO_RAW_ROOT")]
    raw_root: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Strip the title, collect commit metadata, committers, last modified and nav
    Html(HookArgs),

    /// Drop body/html, strip AST positions and serialize the payload
    Json(HookArgs),

    /// Treat the resource as the nav: strip the title and rewrite .md links
    Nav(HookArgs),

    /// Resolve the links of a rendered SUMMARY.md against its folder
    Summary(HookArgs),

    /// Render a markdown file into a resource (body, html, children)
    Render {
        /// Markdown file (stdin when omitted or "-")
        input: Option<PathBuf>,

        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },
}

#[derive(clap::Args)]
struct HookArgs {
    /// Payload JSON file (stdin when omitted or "-")
    input: Option<PathBuf>,

    /// Pretty-print the output
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the JSON result
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let settings = commands::Settings {
        config: cli.config,
        api_root: cli.api_root,
        raw_root: cli.raw_root,
    };

    let (kind, args) = match cli.command {
        Commands::Html(args) => (HookKind::Html, args),
        Commands::Json(args) => (HookKind::Json, args),
        Commands::Nav(args) => (HookKind::Nav, args),
        Commands::Summary(args) => (HookKind::Summary, args),
        Commands::Render { input, pretty } => {
            return commands::render_markdown(input.as_deref(), pretty);
        }
    };

    let succeeded = commands::run_hook(&settings, kind, args.input.as_deref(), args.pretty).await?;
    if !succeeded {
        std::process::exit(1);
    }
    Ok(())
}
