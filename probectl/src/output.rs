//! Rendering of import results for the terminal.

use anyhow::Result;
use clap::ValueEnum;
use probectl_core::reconcile::ImportOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Yaml,
}

pub fn render_outcome(outcome: &ImportOutcome, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(outcome)? + "\n"),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(outcome)?),
        OutputFormat::Text => Ok(render_text(outcome)),
    }
}

fn render_text(outcome: &ImportOutcome) -> String {
    let mut out = format!(
        "Import complete: {} created, {} skipped, {} failed ({} total)\n",
        outcome.created.len(),
        outcome.skipped.len(),
        outcome.failed.len(),
        outcome.total
    );
    for created in &outcome.created {
        out.push_str(&format!("  created  {} ({})\n", created.name, created.id));
    }
    for skipped in &outcome.skipped {
        out.push_str(&format!("  skipped  {}\n", skipped));
    }
    for failed in &outcome.failed {
        out.push_str(&format!("  failed   {}: {}\n", failed.name, failed.error));
    }
    out
}
