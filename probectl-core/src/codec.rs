//! Reading and writing lists of [`PortableProbeConfig`] as JSON or YAML.

use std::fs;
use std::path::Path;

use tracing::{debug, error, info};

use crate::error::PipelineError;
use crate::format::ConfigFormat;
use crate::model::PortableProbeConfig;

/// Decode a JSON array or YAML sequence of probe configurations.
///
/// Zero-length input is [`PipelineError::FileEmpty`]. A well-formed empty
/// collection decodes to an empty list; deciding that zero records is an error
/// is left to the caller.
pub fn decode(bytes: &[u8], format: ConfigFormat) -> Result<Vec<PortableProbeConfig>, PipelineError> {
    if bytes.is_empty() {
        return Err(PipelineError::FileEmpty);
    }

    let parsed: Result<Vec<PortableProbeConfig>, String> = match format {
        ConfigFormat::Json => serde_json::from_slice(bytes).map_err(|e| e.to_string()),
        ConfigFormat::Yaml => serde_yaml::from_slice(bytes).map_err(|e| e.to_string()),
    };

    parsed.map_err(|message| {
        error!(%format, error = %message, "Failed to parse probe configurations");
        PipelineError::ParseFailure { format, message }
    })
}

/// Encode probe configurations; JSON output is pretty-printed with a trailing newline.
pub fn encode(configs: &[PortableProbeConfig], format: ConfigFormat) -> Result<Vec<u8>, PipelineError> {
    let encoded = match format {
        ConfigFormat::Json => serde_json::to_vec_pretty(configs)
            .map(|mut bytes| {
                bytes.push(b'\n');
                bytes
            })
            .map_err(|e| e.to_string()),
        ConfigFormat::Yaml => serde_yaml::to_string(configs)
            .map(String::into_bytes)
            .map_err(|e| e.to_string()),
    };

    encoded.map_err(|message| PipelineError::EncodeFailure { format, message })
}

/// Read and decode a configuration file.
pub fn read_configs(path: &Path, format: ConfigFormat) -> Result<Vec<PortableProbeConfig>, PipelineError> {
    info!(path = %path.display(), %format, "Reading probe configurations");
    let bytes = fs::read(path).map_err(|source| {
        error!(path = %path.display(), error = %source, "Failed to read configuration file");
        PipelineError::FileUnreadable {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let configs = decode(&bytes, format)?;
    debug!(path = %path.display(), count = configs.len(), "Decoded probe configurations");
    Ok(configs)
}
