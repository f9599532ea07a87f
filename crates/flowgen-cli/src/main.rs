use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use flowgen_application::FlowgenApp;
use flowgen_infrastructure::FlowgenPaths;

mod commands;
mod logging;
mod repl;

#[derive(Parser)]
#[command(name = "flowgen")]
#[command(about = "FlowGen - describe a diagram in plain language, get Mermaid, SVG and PDF", long_about = None)]
struct Cli {
    /// Configuration directory (config.toml, secret.json, logs)
    #[arg(long, global = true, env = "FLOWGEN_HOME")]
    config_dir: Option<PathBuf>,

    /// Directory holding the diagram history
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Where exported files are written
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Mirror logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive session (default)
    Repl,
    /// Generate a diagram from a description
    Generate {
        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,
    },
    /// List saved diagrams, most recent first
    List,
    /// Print a diagram's title, explanation and source
    Show {
        /// Id, id prefix or list position
        target: String,
    },
    /// Delete a diagram from the history
    Delete { target: String },
    /// Render a diagram and write it as SVG
    ExportSvg { target: String },
    /// Render a diagram and write it as an A4 PDF
    ExportPdf { target: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = FlowgenPaths::resolve(cli.config_dir.as_deref(), cli.data_dir.as_deref())
        .context("Failed to resolve FlowGen directories")?;
    let _log_guard = logging::init(&paths.logs_dir(), cli.verbose)?;

    if let Err(e) = paths.ensure_secret_file() {
        tracing::warn!("[Startup] Could not create secret file template: {}", e);
    }

    let app = FlowgenApp::bootstrap(&paths, cli.output_dir)
        .await
        .context("Failed to start FlowGen")?;

    match cli.command.unwrap_or(Commands::Repl) {
        Commands::Repl => repl::run(&app).await?,
        Commands::Generate { prompt } => commands::history::generate(&app, &prompt.join(" ")).await?,
        Commands::List => commands::history::list(&app).await,
        Commands::Show { target } => commands::history::show(&app, &target).await?,
        Commands::Delete { target } => commands::history::delete(&app, &target).await?,
        Commands::ExportSvg { target } => commands::export::svg(&app, &target).await?,
        Commands::ExportPdf { target } => commands::export::pdf(&app, &target).await?,
    }

    Ok(())
}
