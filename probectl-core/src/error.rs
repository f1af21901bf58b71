//! Error taxonomy for the import/export pipeline.
//!
//! Every failure the pipeline can surface is a [`PipelineError`]. Callers that
//! need to react to the broad class of a failure (exit codes, retries) should
//! match on [`PipelineError::kind`] instead of individual variants.

use std::path::PathBuf;

use thiserror::Error;

use crate::contract::ApiError;
use crate::format::ConfigFormat;

/// Broad failure classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad flags, unreadable or empty input, missing client configuration.
    Configuration,
    /// A record in the batch failed pre-flight validation.
    Validation,
    /// The remote probe collection could not be read or written.
    Transport,
    /// The run hit its deadline or was cancelled.
    Interrupted,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid format {0:?}: expected \"yaml\" or \"json\"")]
    InvalidFormatFlag(String),

    #[error("cannot detect file format from extension {0:?}: use .yaml, .yml or .json, or pass --format")]
    FormatUndetectable(String),

    #[error("failed to read file {path:?}: {source}")]
    FileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("file is empty")]
    FileEmpty,

    #[error("failed to parse {format} content: {message}")]
    ParseFailure { format: ConfigFormat, message: String },

    #[error("failed to encode probe configurations as {format}: {message}")]
    EncodeFailure { format: ConfigFormat, message: String },

    #[error("no probe configurations found in {0:?}")]
    NoConfigurationsFound(PathBuf),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("no API client configured: {0}")]
    ClientNotConfigured(String),

    #[error("failed to list probes (page {page}): {source}")]
    ListFailed {
        page: u32,
        #[source]
        source: ApiError,
    },

    #[error("deadline exceeded before the run completed")]
    DeadlineExceeded,

    #[error("run cancelled")]
    Cancelled,
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::InvalidFormatFlag(_)
            | PipelineError::FormatUndetectable(_)
            | PipelineError::FileUnreadable { .. }
            | PipelineError::FileEmpty
            | PipelineError::ParseFailure { .. }
            | PipelineError::EncodeFailure { .. }
            | PipelineError::NoConfigurationsFound(_)
            | PipelineError::ClientNotConfigured(_) => ErrorKind::Configuration,
            PipelineError::Validation(_) => ErrorKind::Validation,
            PipelineError::ListFailed { .. } => ErrorKind::Transport,
            PipelineError::DeadlineExceeded | PipelineError::Cancelled => ErrorKind::Interrupted,
        }
    }
}

/// The first rule violation found in a batch, with the offending record's
/// zero-based position and name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed for record {index} ({name:?}): {violation}")]
pub struct ValidationError {
    pub index: usize,
    pub name: String,
    pub violation: Violation,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("name is required")]
    MissingName,

    #[error("url is required")]
    MissingUrl,

    #[error("check_type is required")]
    MissingCheckType,

    #[error("unknown check_type {0:?}: expected one of http, ping, tcp, dns_resolve")]
    UnknownCheckType(String),

    #[error("url {0:?} must be an absolute http or https URL with a host")]
    InvalidHttpUrl(String),

    #[error("unsupported method {0:?}: expected one of GET, POST, PUT, PATCH, DELETE, HEAD, OPTIONS")]
    UnsupportedMethod(String),

    #[error("interval_seconds {0} out of range: must be between 30 and 3600")]
    IntervalOutOfRange(i32),

    #[error("timeout_ms {0} out of range: must be between 1 and 60 seconds")]
    TimeoutOutOfRange(i32),

    #[error("unknown keyword_check_type {0:?}: expected contains or not_contains")]
    UnknownKeywordCheckType(String),

    #[error("max_redirects {0} out of range: must be between 0 and 20")]
    MaxRedirectsOutOfRange(i32),

    #[error("ssl_expiry_threshold_days {0} out of range: must be between 1 and 365")]
    SslExpiryOutOfRange(i32),
}
