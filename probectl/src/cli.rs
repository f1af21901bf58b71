///
/// This module implements the CLI interface for probectl: command parsing,
/// argument validation and the async entrypoint shared by `main` and the
/// integration tests.
///
/// All pipeline logic (file format, validation, duplicate detection, create
/// loop) lives in the [`probectl-core`] crate. This module only builds the
/// API client, wires interruption and deadlines, and prints results.
///
/// ## How To Use
/// - For command-line users: use the installed `probectl` binary with `--help`.
/// - For programmatic/integration use: call [`run`] with a constructed [`Cli`].
///
/// [`probectl-core`]: ../../probectl-core/
use crate::client::ProbeClient;
use crate::load_config::ClientConfig;
use crate::output::{render_outcome, OutputFormat};
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use probectl_core::codec::encode;
use probectl_core::export::export_probes;
use probectl_core::format::{resolve_format, ConfigFormat};
use probectl_core::reconcile::{import, ImportReport, ImportRequest};
use probectl_core::PipelineError;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::Instant;

/// CLI for probectl: manage uptime-monitoring probes in bulk.
#[derive(Parser)]
#[clap(
    name = "probectl",
    version,
    about = "Import and export uptime-monitoring probe configurations"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create probes from a JSON or YAML file, skipping names that already exist
    Import {
        /// Path to the probe configuration file
        #[clap(long, short)]
        file: PathBuf,
        /// File format (yaml or json); detected from the extension when omitted
        #[clap(long)]
        format: Option<String>,
        /// Validate and preview without creating anything
        #[clap(long)]
        dry_run: bool,
        /// How to print the import result
        #[clap(long, value_enum, default_value = "text")]
        output: OutputFormat,
        /// Abort the whole run after this many seconds
        #[clap(long)]
        timeout: Option<u64>,
    },
    /// Write every existing probe to a JSON or YAML file (stdout when no file is given)
    Export {
        /// Destination file
        #[clap(long, short)]
        file: Option<PathBuf>,
        /// File format (yaml or json); detected from the extension, or yaml for stdout
        #[clap(long)]
        format: Option<String>,
        /// Abort the export after this many seconds
        #[clap(long)]
        timeout: Option<u64>,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Import {
            file,
            format,
            dry_run,
            output,
            timeout,
        } => {
            let request = ImportRequest {
                file,
                format,
                dry_run,
                deadline: deadline_after(timeout),
            };
            run_import(request, output).await
        }
        Commands::Export {
            file,
            format,
            timeout,
        } => run_export(file, format, timeout).await,
    }
}

async fn run_import(request: ImportRequest, output: OutputFormat) -> Result<()> {
    tracing::info!(command = "import", file = %request.file.display(), dry_run = request.dry_run, "Starting import");

    // Validation has to run even when no client is configured, so a missing
    // client is only reported if the pipeline gets as far as needing it.
    let (client, missing_client) = if request.dry_run {
        (None, None)
    } else {
        match ClientConfig::from_env().and_then(ProbeClient::new) {
            Ok(client) => (Some(client), None),
            Err(e) => (None, Some(e.to_string())),
        }
    };

    let result = interruptible(import(&request, client.as_ref())).await;
    let report = match (result, missing_client) {
        (Err(PipelineError::ClientNotConfigured(_)), Some(reason)) => {
            return Err(PipelineError::ClientNotConfigured(reason).into());
        }
        (result, _) => result.with_context(|| format!("import of {:?} failed", request.file))?,
    };

    match report {
        ImportReport::DryRun(preview) => {
            print!("{preview}");
            tracing::info!(command = "import", "Dry run complete");
            Ok(())
        }
        ImportReport::Completed(outcome) => {
            print!("{}", render_outcome(&outcome, output)?);
            tracing::info!(command = "import", ?outcome, "Import complete");
            if outcome.has_failures() {
                return Err(anyhow!(
                    "{} of {} probe(s) failed to import",
                    outcome.failed.len(),
                    outcome.total
                ));
            }
            Ok(())
        }
    }
}

async fn run_export(file: Option<PathBuf>, format: Option<String>, timeout: Option<u64>) -> Result<()> {
    tracing::info!(command = "export", "Starting export");
    let format = match &file {
        Some(path) => resolve_format(path, format.as_deref())?,
        None if format.is_some() => resolve_format(Path::new(""), format.as_deref())?,
        None => ConfigFormat::Yaml,
    };

    let client = ClientConfig::from_env()
        .and_then(ProbeClient::new)
        .map_err(|e| PipelineError::ClientNotConfigured(e.to_string()))?;

    let export = export_probes(&client);
    let configs = match deadline_after(timeout) {
        Some(deadline) => interruptible(async {
            tokio::time::timeout_at(deadline, export)
                .await
                .map_err(|_| PipelineError::DeadlineExceeded)?
        })
        .await,
        None => interruptible(export).await,
    }
    .context("export failed")?;

    let bytes = encode(&configs, format)?;
    match file {
        Some(path) => {
            std::fs::write(&path, bytes)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("Exported {} probe(s) to {}", configs.len(), path.display());
        }
        None => {
            use std::io::Write;
            std::io::stdout().write_all(&bytes)?;
        }
    }
    tracing::info!(command = "export", count = configs.len(), %format, "Export complete");
    Ok(())
}

fn deadline_after(timeout: Option<u64>) -> Option<Instant> {
    timeout.map(|secs| Instant::now() + Duration::from_secs(secs))
}

/// Race a pipeline future against Ctrl-C.
async fn interruptible<T, F>(fut: F) -> Result<T, PipelineError>
where
    F: Future<Output = Result<T, PipelineError>>,
{
    tokio::select! {
        result = fut => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Interrupted, abandoning run");
            Err(PipelineError::Cancelled)
        }
    }
}
