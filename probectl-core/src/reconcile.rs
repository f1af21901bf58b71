//! High-level pipeline: resolve → decode → validate → (preview | reconcile).
//!
//! This module drives a bulk import of probe configurations from a file into
//! the remote probe collection. A run:
//!   - Resolves the file format and decodes the file; zero records is an error
//!   - Validates the whole batch before any remote call (first violation wins)
//!   - In dry-run mode, returns a preview and stops; no client is needed
//!   - Otherwise snapshots existing remote names, then walks the records in
//!     file order, skipping duplicates and creating the rest
//!
//! # Major Types
//! - [`ImportRequest`]: the file, format flag, dry-run switch and deadline for a run
//! - [`ImportReport`]: either a [`DryRunPreview`] or an [`ImportOutcome`]
//! - [`ImportOutcome`]: created / skipped / failed records for a non-dry run
//!
//! # Error Handling
//! Configuration and validation problems fail before any mutation. Listing
//! failures abort the run. A failed create is recorded in
//! [`ImportOutcome::failed`] and the loop continues; nothing is rolled back.
//! When the deadline passes the run returns [`PipelineError::DeadlineExceeded`]
//! and whatever was accumulated so far is dropped.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::codec::read_configs;
use crate::contract::ProbeApi;
use crate::convert::{effective_interval, effective_method, to_create_request};
use crate::error::PipelineError;
use crate::format::resolve_format;
use crate::index::build_name_index;
use crate::model::{Label, PortableProbeConfig};
use crate::validate::validate_batch;

/// Inputs for a single import run.
#[derive(Debug, Clone, Default)]
pub struct ImportRequest {
    pub file: PathBuf,
    /// Explicit `yaml`/`json`; when `None` the file extension decides.
    pub format: Option<String>,
    pub dry_run: bool,
    /// Bounds the whole run, not each remote call.
    pub deadline: Option<Instant>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImportReport {
    DryRun(DryRunPreview),
    Completed(ImportOutcome),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedProbe {
    pub name: String,
    pub id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedImport {
    pub name: String,
    pub error: String,
}

/// Accumulated result of a non-dry-run import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportOutcome {
    pub created: Vec<CreatedProbe>,
    pub skipped: Vec<String>,
    pub failed: Vec<FailedImport>,
    pub total: usize,
}

impl ImportOutcome {
    /// Some records could not be created; the call itself still succeeded.
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// One record as it would be imported, with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewEntry {
    pub name: String,
    pub url: String,
    pub check_type: String,
    pub method: String,
    pub interval_seconds: i32,
    pub regions: Vec<String>,
    pub labels: Vec<Label>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DryRunPreview {
    pub entries: Vec<PreviewEntry>,
}

impl DryRunPreview {
    pub fn from_configs(configs: &[PortableProbeConfig]) -> Self {
        let entries = configs
            .iter()
            .map(|config| PreviewEntry {
                name: config.name.clone(),
                url: config.url.clone(),
                check_type: config.check_type.clone(),
                method: effective_method(config),
                interval_seconds: effective_interval(config),
                regions: config.regions.clone(),
                labels: config.labels.clone(),
            })
            .collect();
        DryRunPreview { entries }
    }
}

impl fmt::Display for DryRunPreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Dry run: {} probe configuration(s) validated, nothing will be created.",
            self.entries.len()
        )?;
        for (i, entry) in self.entries.iter().enumerate() {
            let regions = if entry.regions.is_empty() {
                "(default)".to_string()
            } else {
                entry.regions.join(", ")
            };
            let labels = if entry.labels.is_empty() {
                "(none)".to_string()
            } else {
                entry
                    .labels
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            writeln!(f)?;
            writeln!(f, "[{}] {}", i + 1, entry.name)?;
            writeln!(f, "    URL:       {}", entry.url)?;
            writeln!(f, "    Check:     {}", entry.check_type)?;
            writeln!(f, "    Method:    {}", entry.method)?;
            writeln!(f, "    Interval:  {}s", entry.interval_seconds)?;
            writeln!(f, "    Regions:   {}", regions)?;
            writeln!(f, "    Labels:    {}", labels)?;
        }
        Ok(())
    }
}

/// Run an import. `api` may be `None` for dry runs; a real run without a
/// client fails with [`PipelineError::ClientNotConfigured`] after validation.
pub async fn import<A>(request: &ImportRequest, api: Option<&A>) -> Result<ImportReport, PipelineError>
where
    A: ProbeApi + ?Sized,
{
    match request.deadline {
        Some(deadline) => tokio::time::timeout_at(deadline, run_import(request, api))
            .await
            .map_err(|_| {
                error!(file = %request.file.display(), "[IMPORT] Deadline exceeded, abandoning run");
                PipelineError::DeadlineExceeded
            })?,
        None => run_import(request, api).await,
    }
}

async fn run_import<A>(request: &ImportRequest, api: Option<&A>) -> Result<ImportReport, PipelineError>
where
    A: ProbeApi + ?Sized,
{
    let configs = load_and_validate(request)?;

    if request.dry_run {
        info!(count = configs.len(), "[IMPORT] Dry run, no remote calls will be made");
        return Ok(ImportReport::DryRun(DryRunPreview::from_configs(&configs)));
    }

    let api = api.ok_or_else(|| {
        error!("[IMPORT] No API client configured for a non-dry-run import");
        PipelineError::ClientNotConfigured("an API client is required unless --dry-run is set".into())
    })?;

    reconcile(&configs, api).await.map(ImportReport::Completed)
}

/// Resolve, read, decode and validate the request's file.
pub fn load_and_validate(request: &ImportRequest) -> Result<Vec<PortableProbeConfig>, PipelineError> {
    let format = resolve_format(&request.file, request.format.as_deref())?;
    let configs = read_configs(&request.file, format)?;
    if configs.is_empty() {
        error!(file = %request.file.display(), "[IMPORT] File lists no probe configurations");
        return Err(PipelineError::NoConfigurationsFound(request.file.clone()));
    }
    validate_batch(&configs)?;
    info!(count = configs.len(), %format, "[IMPORT] Batch validated");
    Ok(configs)
}

/// Create every record whose name is not already taken, in order.
///
/// Names created during the run are added to the index, so a second record
/// with the same name in one file is skipped rather than created twice.
pub async fn reconcile<A>(configs: &[PortableProbeConfig], api: &A) -> Result<ImportOutcome, PipelineError>
where
    A: ProbeApi + ?Sized,
{
    let mut existing = build_name_index(api).await?;
    let mut outcome = ImportOutcome {
        total: configs.len(),
        ..Default::default()
    };

    for config in configs {
        if existing.contains(&config.name) {
            debug!(name = %config.name, "[IMPORT] Probe already exists, skipping");
            eprintln!("Skipped {:?}: a probe with this name already exists", config.name);
            outcome.skipped.push(config.name.clone());
            continue;
        }

        let request = to_create_request(config);
        match api.create_probe(request).await {
            Ok(probe) => {
                info!(name = %config.name, id = %probe.id, "[IMPORT] Created probe");
                existing.insert(config.name.clone());
                outcome.created.push(CreatedProbe {
                    name: config.name.clone(),
                    id: probe.id,
                });
            }
            Err(e) => {
                let message = format!("create probe {:?}: {}", config.name, e);
                debug!(name = %config.name, error = %e, "[IMPORT] Failed to create probe");
                eprintln!("Failed to {message}");
                outcome.failed.push(FailedImport {
                    name: config.name.clone(),
                    error: message,
                });
            }
        }
    }

    info!(
        created = outcome.created.len(),
        skipped = outcome.skipped.len(),
        failed = outcome.failed.len(),
        total = outcome.total,
        "[IMPORT] Import complete"
    );
    Ok(outcome)
}
