//! Decides whether a probe configuration file is JSON or YAML.

use std::fmt;
use std::path::Path;

use crate::error::PipelineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            ConfigFormat::Yaml => "yaml",
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve the format from an explicit flag, falling back to the file extension.
///
/// An explicit flag wins and must be `yaml` or `json` in any case. Without a
/// flag, `.yaml`/`.yml` map to YAML and `.json` to JSON; anything else is
/// rejected with the offending extension.
pub fn resolve_format(path: &Path, flag: Option<&str>) -> Result<ConfigFormat, PipelineError> {
    if let Some(flag) = flag.filter(|f| !f.is_empty()) {
        return match flag.to_ascii_lowercase().as_str() {
            "yaml" => Ok(ConfigFormat::Yaml),
            "json" => Ok(ConfigFormat::Json),
            _ => Err(PipelineError::InvalidFormatFlag(flag.to_string())),
        };
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default();

    match extension.as_str() {
        ".yaml" | ".yml" => Ok(ConfigFormat::Yaml),
        ".json" => Ok(ConfigFormat::Json),
        _ => Err(PipelineError::FormatUndetectable(extension)),
    }
}
