use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use jjui_core::{command, JjRunner, Runner};
use jjui_tui::{Config, Options};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `jjui_tui=debug`
const LOG_ENV: &str = "JJUI_LOG";

#[derive(Parser)]
#[command(name = "jjui")]
#[command(about = "A terminal UI for the jj version control system", long_about = None)]
struct Cli {
    /// Path to the repository
    #[arg(short = 'R', long = "repository", default_value = ".")]
    repository: PathBuf,

    /// Revset to show instead of jj's default
    #[arg(short, long)]
    revisions: Option<String>,

    /// Configuration file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where logs go when JJUI_LOG is set
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch Terminal UI
    Tui,
    /// Print the parsed graph without starting the UI
    Log,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("jj log failed:\n{0}")]
    LogFailed(String),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    if !cli.repository.is_dir() {
        return Err(CliError::NotADirectory(cli.repository).into());
    }
    let config = Config::load(cli.config.as_deref())?;

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => {
            jjui_tui::run_tui(Options {
                location: cli.repository,
                revset: cli.revisions,
                config,
            })
            .await?;
        }
        Commands::Log => {
            let revset = cli.revisions.or(config.ui.revset);
            print_log(&cli.repository, revset.as_deref()).await?;
        }
    }

    Ok(())
}

/// Log to a file, since the UI owns the terminal. Nothing is installed
/// unless the filter variable is set.
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let Ok(filter) = std::env::var(LOG_ENV) else {
        return Ok(());
    };
    let path = log_file
        .map(Path::to_path_buf)
        .unwrap_or_else(|| std::env::temp_dir().join("jjui.log"));
    let file = File::create(&path).with_context(|| format!("failed to create log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();
    tracing::info!(path = %path.display(), "logging started");
    Ok(())
}

async fn print_log(location: &Path, revset: Option<&str>) -> Result<()> {
    let runner = JjRunner::new(location);
    let output = runner.run(&command::log(revset)).await?;
    if !output.success {
        return Err(CliError::LogFailed(output.output).into());
    }

    let dag = graph::build_dag(&output.output)?;
    for row in dag.rows() {
        let commit = &row.commit;
        let marker = if commit.is_working_copy { "@" } else { " " };
        println!(
            "{marker} {:<12} {:<10} {}",
            commit.change_id,
            commit.commit_id_short,
            commit.description
        );
    }

    let stats = dag.stats();
    println!();
    println!("Commits: {}", stats.total_commits);
    println!("Edges: {} ({} indirect)", stats.total_edges, stats.indirect_edges);
    println!("Merges: {}", stats.merge_commits);
    Ok(())
}
