//! Bulk-import a file of handles into the configured directory store.
//!
//! Prints the import summary as JSON on stdout.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use handle_directory::{ContributorId, Directory, InputFormat, MemoryStore};
use serde::Serialize;
use server_core::{store::connect_store, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "directory-import")]
#[command(about = "Import social handles from pasted text or a delimited table")]
struct Cli {
    /// File to import
    file: PathBuf,

    /// Input shape: lines (free text) or table (csv/tsv/semicolon)
    #[arg(long, default_value = "lines")]
    format: InputFormat,

    /// Contributor recorded on every imported row
    #[arg(long)]
    contributor: Option<ContributorId>,

    /// Parse only; report what would be imported without writing
    #[arg(long)]
    dry_run: bool,
}

#[derive(Serialize)]
struct DryRunReport {
    candidates: usize,
    skipped: usize,
    lines: Vec<DryRunLine>,
}

#[derive(Serialize)]
struct DryRunLine {
    line: usize,
    platform: String,
    handle: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays parseable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,handle_directory=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let text = std::fs::read_to_string(&cli.file)
        .with_context(|| format!("Failed to read {}", cli.file.display()))?;

    let config = Config::from_env().context("Failed to load configuration")?;

    if cli.dry_run {
        let directory = Directory::with_config(MemoryStore::new(), config.directory.clone());
        let outcome = directory.parser().parse(&text, cli.format);
        let report = DryRunReport {
            candidates: outcome.candidates.len(),
            skipped: outcome.skipped.len(),
            lines: outcome
                .candidates
                .into_iter()
                .map(|c| DryRunLine {
                    line: c.line_number,
                    platform: c.platform.to_string(),
                    handle: c.raw_handle,
                    name: c.candidate_name,
                })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let store = connect_store(&config).await?;
    let directory = Directory::with_config(store, config.directory.clone());
    let contributor = cli.contributor.unwrap_or_else(ContributorId::nil);
    let summary = directory.import_text(&text, cli.format, contributor).await;

    println!("{}", serde_json::to_string_pretty(&summary)?);

    if summary.failed > 0 {
        tracing::warn!(failed = summary.failed, "Some lines failed to import");
        std::process::exit(1);
    }
    Ok(())
}
