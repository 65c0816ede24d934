//! Stat correction CLI
//!
//! One parameterized command replacing the pile of one-shot fix scripts:
//! - apply: match a corrections file against the store and persist the result
//! - check: validate an alias table against the store
//! - backups: list store backups, optionally restore the newest one

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use persistence::{create_local_repository, StoreRepository};
use reconciler::{apply_corrections, parse_corrections, AliasTable, ReconcileReport};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "correction-cli")]
#[command(about = "Player stat corrections for the canonical store - match, merge, backup")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a corrections file to the store (backup before write)
    Apply {
        /// Path to the canonical store file
        #[arg(short, long, default_value = "./user_team.json")]
        store: PathBuf,

        /// Corrections file: a JSON array of entries with a "name" and the
        /// fields to overwrite
        #[arg(short, long)]
        corrections: PathBuf,

        /// Alias table: a JSON object of misspelling -> canonical name
        #[arg(short, long)]
        aliases: Option<PathBuf>,

        /// Match and report without writing anything
        #[arg(long)]
        dry_run: bool,

        /// Also write the full report as JSON to this path
        #[arg(long)]
        report_json: Option<PathBuf>,
    },

    /// Validate an alias table against the store
    Check {
        /// Path to the canonical store file
        #[arg(short, long, default_value = "./user_team.json")]
        store: PathBuf,

        /// Alias table to validate
        #[arg(short, long)]
        aliases: PathBuf,
    },

    /// List store backups
    Backups {
        /// Path to the canonical store file
        #[arg(short, long, default_value = "./user_team.json")]
        store: PathBuf,

        /// Copy the newest backup over the store (the current store is
        /// backed up first)
        #[arg(long)]
        restore_latest: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Apply { store, corrections, aliases, dry_run, report_json } => {
            run_apply(&store, &corrections, aliases.as_deref(), dry_run, report_json.as_deref())
                .await
        }
        Commands::Check { store, aliases } => run_check(&store, &aliases).await,
        Commands::Backups { store, restore_latest } => run_backups(&store, restore_latest).await,
    }
}

async fn run_apply(
    store_path: &Path,
    corrections_path: &Path,
    aliases_path: Option<&Path>,
    dry_run: bool,
    report_path: Option<&Path>,
) -> Result<()> {
    let repo = create_local_repository(store_path)?;
    let (mut store, stats) = repo
        .load()
        .await
        .with_context(|| format!("failed to load store {}", store_path.display()))?;

    let corrections_json = tokio::fs::read_to_string(corrections_path)
        .await
        .with_context(|| format!("failed to read corrections {}", corrections_path.display()))?;
    let (corrections, skipped_corrections) = parse_corrections(&corrections_json)?;
    if corrections.is_empty() {
        bail!("no usable corrections in {}", corrections_path.display());
    }

    let mut alias_table = load_alias_table(aliases_path).await?;
    let rejected_aliases = alias_table.validate(&store.distinct_names());

    let mut report = apply_corrections(&mut store, &corrections, &alias_table);
    report.rejected_aliases = rejected_aliases;
    report.skipped_store_rows = stats.skipped;
    report.skipped_corrections = skipped_corrections;

    print_summary(&report);

    if let Some(path) = report_path {
        let json = serde_json::to_string_pretty(&report)?;
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("failed to write report {}", path.display()))?;
        info!("wrote report to {}", path.display());
    }

    if report.matched.is_empty() {
        bail!("no correction matched a canonical record; store left untouched");
    }

    if dry_run {
        println!("{}", "dry run: store not written".yellow());
        return Ok(());
    }

    let outcome = repo.save(&store).await.context("failed to save store")?;
    if let Some(backup) = &outcome.backup {
        println!("{} {}", "backup:".green().bold(), backup.path.display());
    }
    println!(
        "{} {} ({} bytes)",
        "wrote:".green().bold(),
        store_path.display(),
        outcome.bytes_written
    );
    Ok(())
}

async fn run_check(store_path: &Path, aliases_path: &Path) -> Result<()> {
    let repo = create_local_repository(store_path)?;
    let (store, _stats) = repo
        .load()
        .await
        .with_context(|| format!("failed to load store {}", store_path.display()))?;

    let mut alias_table = load_alias_table(Some(aliases_path)).await?;
    let total = alias_table.len();
    let issues = alias_table.validate(&store.distinct_names());

    if issues.is_empty() {
        println!("{} all {} alias entries valid", "ok:".green().bold(), total);
        return Ok(());
    }

    for issue in &issues {
        println!("{} '{}' -> '{}' ({})", "invalid:".red().bold(), issue.from, issue.to, issue.reason);
    }
    println!("{} of {} alias entries rejected", issues.len(), total);
    Err(issues[0].to_error().into())
}

async fn run_backups(store_path: &Path, restore_latest: bool) -> Result<()> {
    let repo = create_local_repository(store_path)?;
    let backups = repo.backups().list_backups().await?;

    if backups.is_empty() {
        println!("no backups found for {}", store_path.display());
    }
    for backup in &backups {
        println!(
            "{}  {:>10} bytes  {}",
            backup.created_at.format("%Y-%m-%d %H:%M:%S%.3f"),
            backup.size,
            backup.path.display()
        );
    }

    if restore_latest {
        // read the restore source before the safety backup can displace it
        let latest = backups.last().cloned().context("no backup to restore")?;
        let restored = tokio::fs::read(&latest.path)
            .await
            .with_context(|| format!("failed to read backup {}", latest.path.display()))?;
        if tokio::fs::metadata(store_path).await.is_ok() {
            repo.backups().create_backup().await?;
        }
        tokio::fs::write(store_path, &restored)
            .await
            .with_context(|| format!("failed to restore {}", store_path.display()))?;
        println!(
            "{} restored {} from {}",
            "ok:".green().bold(),
            store_path.display(),
            latest.path.display()
        );
    }

    Ok(())
}

async fn load_alias_table(path: Option<&Path>) -> Result<AliasTable> {
    match path {
        Some(path) => {
            let json = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("failed to read alias table {}", path.display()))?;
            Ok(AliasTable::from_json_str(&json)?)
        }
        None => Ok(AliasTable::new()),
    }
}

fn print_summary(report: &ReconcileReport) {
    println!("{}", "=== Correction run ===".bold());

    for matched in &report.matched {
        println!(
            "{} '{}' -> '{}' ({} record(s), {} match)",
            "matched:".green(),
            matched.query,
            matched.canonical,
            matched.records_updated,
            matched.tier.label()
        );
    }
    for ambiguous in &report.ambiguous {
        println!(
            "{} '{}' candidates: {}",
            "ambiguous:".yellow(),
            ambiguous.query,
            ambiguous.candidates.join(", ")
        );
    }
    for unmatched in &report.unmatched {
        if unmatched.suggestions.is_empty() {
            println!("{} '{}'", "unmatched:".red(), unmatched.query);
        } else {
            println!(
                "{} '{}' (did you mean: {}?)",
                "unmatched:".red(),
                unmatched.query,
                unmatched.suggestions.join(", ")
            );
        }
    }
    for rejected in &report.rejected_aliases {
        println!(
            "{} '{}' -> '{}' ({})",
            "alias rejected:".red(),
            rejected.from,
            rejected.to,
            rejected.reason
        );
    }
    if report.skipped_store_rows > 0 {
        println!(
            "{} {} malformed store row(s) skipped",
            "note:".yellow(),
            report.skipped_store_rows
        );
    }
    if report.skipped_corrections > 0 {
        println!(
            "{} {} malformed correction entr(ies) skipped",
            "note:".yellow(),
            report.skipped_corrections
        );
    }

    println!(
        "{} matched, {} ambiguous, {} unmatched",
        report.matched.len().to_string().green(),
        report.ambiguous.len().to_string().yellow(),
        report.unmatched.len().to_string().red()
    );
}
