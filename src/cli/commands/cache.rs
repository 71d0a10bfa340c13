//! Cache command - manage the install store

use crate::cli::args::{CacheAction, CacheArgs, OutputFormat};
use crate::config::Config;
use crate::error::RezupResult;
use crate::store::{InstallKey, ToolStore};
use chrono::{DateTime, Local};
use console::style;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Execute the cache command
pub async fn execute(
    args: CacheArgs,
    config: &Config,
    cache_dir: Option<PathBuf>,
) -> RezupResult<()> {
    let root = cache_dir
        .or_else(|| config.cache.dir.clone())
        .unwrap_or_else(ToolStore::default_root);
    let store = ToolStore::new(root);

    match args.action {
        CacheAction::List { format } => list_installs(&store, format),
        CacheAction::Clear { yes } => clear_installs(&store, yes).await,
    }
}

/// List all cached installs
fn list_installs(store: &ToolStore, format: OutputFormat) -> RezupResult<()> {
    let entries = store.entries()?;

    if entries.is_empty() {
        println!("No cached installs found.");
        return Ok(());
    }

    match format {
        OutputFormat::Table => print_table(&entries),
        OutputFormat::Json => print_json(&entries)?,
        OutputFormat::Plain => print_plain(&entries),
    }

    Ok(())
}

/// When the entry landed in the store, from filesystem metadata
fn entry_created(path: &Path) -> Option<DateTime<Local>> {
    let meta = std::fs::metadata(path).ok()?;
    let stamp = meta.created().or_else(|_| meta.modified()).ok()?;
    Some(stamp.into())
}

fn print_table(entries: &[(InstallKey, PathBuf)]) {
    println!("{:<30} {:<20} {:<18} PATH", "REPOSITORY", "REF", "CREATED");
    println!("{}", "-".repeat(90));

    for (key, path) in entries {
        let created = entry_created(path)
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());

        println!(
            "{:<30} {:<20} {:<18} {}",
            key.repo,
            key.git_ref,
            created,
            path.display()
        );
    }

    println!();
    println!("Total: {} install(s)", entries.len());
}

fn print_json(entries: &[(InstallKey, PathBuf)]) -> RezupResult<()> {
    #[derive(serde::Serialize)]
    struct InstallJson {
        repository: String,
        git_ref: String,
        path: String,
        created_at: Option<String>,
    }

    let installs: Vec<InstallJson> = entries
        .iter()
        .map(|(key, path)| InstallJson {
            repository: key.repo.clone(),
            git_ref: key.git_ref.clone(),
            path: path.display().to_string(),
            created_at: entry_created(path).map(|t| t.to_rfc3339()),
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&installs)?);
    Ok(())
}

fn print_plain(entries: &[(InstallKey, PathBuf)]) {
    for (key, _) in entries {
        println!("{}@{}", key.repo, key.git_ref);
    }
}

/// Remove every cached install
async fn clear_installs(store: &ToolStore, skip_confirm: bool) -> RezupResult<()> {
    let entries = store.entries()?;

    if entries.is_empty() {
        println!("No cached installs to clear.");
        return Ok(());
    }

    println!("This will remove {} install(s):", entries.len());
    for (key, _) in &entries {
        println!("  {} {}@{}", style("•").red(), key.repo, key.git_ref);
    }
    println!();

    if !skip_confirm {
        print!("Are you sure? [y/N] ");
        let _ = io::stdout().flush();

        let mut input = String::new();
        if io::stdin().read_line(&mut input).is_err() {
            println!("Failed to read input, aborting.");
            return Ok(());
        }

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    print!("Clearing installs... ");
    let _ = io::stdout().flush();

    let removed = store.clear().await?;
    println!("{} cleared {} install(s)", style("✓").green(), removed);

    Ok(())
}
