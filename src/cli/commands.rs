use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::ingest::{EngineConfig, HistoryEngine, ImportReport, ReadReport};
use crate::models::HistoryStats;
use crate::storage::{HistoryStore, JsonlStore, MemoryStore};
use crate::utils::logging::build_dispatch;
use crate::utils::{CancelToken, format_path_with_tilde, get_home_dir, sanitize_for_display};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Parser)]
#[command(name = "shell-history-ingest")]
#[command(version = "0.1.0")]
#[command(about = "Collect and import command history from bash, zsh, fish and PowerShell", long_about = None)]
pub struct Cli {
    /// Home directory to search for history files (defaults to the current user's)
    #[arg(long, global = true)]
    pub home: Option<PathBuf>,

    /// Number of concurrent readers and import workers
    #[arg(long, global = true)]
    pub workers: Option<NonZeroUsize>,

    /// Log progress to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the history files that were found
    Sources,
    /// Show statistics about the combined history
    Stats,
    /// Import the combined history into a JSON Lines file
    Import {
        /// File to append imported commands to
        #[arg(short, long)]
        output: PathBuf,

        /// Count what would be imported without writing anything
        #[arg(long)]
        dry_run: bool,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let Some(command) = &cli.command else {
        println!("Use --help for usage information");
        return Ok(());
    };

    let engine = build_engine(&cli)?;
    match command {
        Commands::Sources => show_sources(&engine),
        Commands::Stats => show_stats(&engine)?,
        Commands::Import { output, dry_run } => run_import(&engine, output, *dry_run)?,
    }

    Ok(())
}

fn build_engine(cli: &Cli) -> Result<HistoryEngine> {
    let home = match &cli.home {
        Some(home) => home.clone(),
        None => get_home_dir()?,
    };

    let mut config = EngineConfig::new(home);
    if let Some(workers) = cli.workers {
        config = config.with_workers(workers);
    }

    Ok(HistoryEngine::new(config).with_dispatch(build_dispatch(cli.verbose)))
}

fn show_sources(engine: &HistoryEngine) {
    let home = &engine.config().home;
    let sources = engine.detect();

    if sources.is_empty() {
        println!("No shell history files found under {}", home.display());
        return;
    }

    println!("Detected history files:");
    for (shell, path) in &sources {
        println!("  {:<11} {}", shell, format_path_with_tilde(path, home));
    }
}

fn read_history(engine: &HistoryEngine) -> Result<ReadReport> {
    let report = engine.read_all(&CancelToken::new()).with_context(|| {
        format!("Failed to read shell history under {}", engine.config().home.display())
    })?;

    for failed in &report.failed_sources {
        eprintln!(
            "Warning: skipped {} history {}: {}",
            failed.shell,
            format_path_with_tilde(&failed.path, &engine.config().home),
            failed.reason
        );
    }

    Ok(report)
}

fn show_stats(engine: &HistoryEngine) -> Result<()> {
    let report = read_history(engine)?;
    let stats = HistoryStats::summarize(&report.entries);

    println!("Shell History Statistics");
    println!("========================");
    println!("Total entries: {}", stats.total);
    println!("Unique commands: {}", stats.unique);
    for (shell, count) in &stats.per_shell {
        println!("  {}: {}", shell, count);
    }
    if let Some((shell, _)) = stats.busiest_shell() {
        println!("Busiest shell: {}", shell);
    }
    println!();
    println!("Sources read: {}", report.sources_read);
    if !report.failed_sources.is_empty() {
        println!("Sources skipped: {}", report.failed_sources.len());
    }

    if let Some((command, count)) = &stats.top_command {
        println!("Most used: {} ({} times)", sanitize_for_display(command), count);
    }
    if let Some(oldest) = stats.oldest {
        println!("Oldest entry: {}", oldest.format(TIME_FORMAT));
    }
    if let Some(newest) = stats.newest {
        println!("Newest entry: {}", newest.format(TIME_FORMAT));
    }

    Ok(())
}

fn run_import(engine: &HistoryEngine, output: &Path, dry_run: bool) -> Result<()> {
    let report = read_history(engine)?;
    let cancel = CancelToken::new();

    if dry_run {
        let store = MemoryStore::new();
        let imported = import_into(engine, &store, report, &cancel)?;
        println!("Dry run: would import {} commands", imported.stored());
        print_import_summary(&imported);
        return Ok(());
    }

    let store = JsonlStore::open(output)?;
    let imported = import_into(engine, &store, report, &cancel)?;
    store.flush()?;

    println!("Imported {} commands to {}", imported.stored(), output.display());
    print_import_summary(&imported);

    Ok(())
}

fn import_into<S: HistoryStore>(
    engine: &HistoryEngine,
    store: &S,
    report: ReadReport,
    cancel: &CancelToken,
) -> Result<ImportReport> {
    engine.import(store, report.entries, cancel).context("Failed to import shell history")
}

fn print_import_summary(report: &ImportReport) {
    println!("  Skipped: {}", report.skipped);
    println!("  Failed: {}", report.failed);
}
