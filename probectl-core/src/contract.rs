//! # contract: the remote probe collection as seen by the pipeline
//!
//! This module defines the single collaborator trait ([`ProbeApi`]) the
//! import and export pipelines talk to, plus the wire types it exchanges.
//!
//! ## Interface & Extensibility
//! - Implement [`ProbeApi`] for a concrete transport (the CLI ships a `reqwest`
//!   client) or use the generated `MockProbeApi` in tests.
//! - All methods are async and return boxed errors; the pipeline never
//!   interprets them, it only adds context (record name, operation, page).
//! - The handle is passed explicitly into every pipeline entrypoint; there is
//!   no global client.
//!
//! ## Mocking & Testing
//! - The trait is annotated for `mockall` so consumers can build deterministic
//!   mocks. The mock is exported under the default `test-export-mocks` feature.

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::Label;

/// Opaque transport error returned by a [`ProbeApi`] implementation.
pub type ApiError = Box<dyn std::error::Error + Send + Sync>;

/// The kinds of check a probe can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckType {
    Http,
    Ping,
    Tcp,
    DnsResolve,
}

impl std::str::FromStr for CheckType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "http" => Ok(CheckType::Http),
            "ping" => Ok(CheckType::Ping),
            "tcp" => Ok(CheckType::Tcp),
            "dns_resolve" => Ok(CheckType::DnsResolve),
            other => Err(other.to_string()),
        }
    }
}

/// Request body for creating a probe.
///
/// `follow_redirects` is always `Some` when produced by the converter so that
/// an explicit `false` reaches the server. `alert_channel_ids` is `None` when
/// no valid id survived conversion.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreateProbeRequest {
    pub name: String,
    pub url: String,
    pub check_type: String,
    pub method: String,
    /// JSON-encoded header map, or empty when there are no headers.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub headers: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    pub timeout_ms: i32,
    pub interval_seconds: i32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub regions: Vec<String>,
    pub expected_status_codes: Vec<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword_check: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword_check_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_path_check: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_path_expected: Option<String>,
    pub ssl_check_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl_expiry_threshold_days: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_redirects: Option<bool>,
    pub max_redirects: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert_channel_ids: Option<Vec<Uuid>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<Label>,
}

/// A probe as returned by the remote collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Probe {
    pub id: Uuid,
    pub name: String,
    pub url: String,
    pub check_type: String,
    pub method: String,
    pub headers: String,
    pub body: Option<String>,
    pub timeout_ms: i32,
    pub interval_seconds: i32,
    pub regions: Vec<String>,
    pub expected_status_codes: Vec<u16>,
    pub keyword_check: Option<String>,
    pub keyword_check_type: Option<String>,
    pub json_path_check: Option<String>,
    pub json_path_expected: Option<String>,
    pub ssl_check_enabled: bool,
    pub ssl_expiry_threshold_days: Option<i32>,
    pub follow_redirects: bool,
    pub max_redirects: i32,
    pub alert_channel_ids: Vec<Uuid>,
    pub labels: Vec<Label>,
}

/// The remote probe collection.
///
/// The trait is `Send` + `Sync` and intended for async/await usage.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ProbeApi: Send + Sync {
    /// Fetch one page of probes. Pages are numbered from 1; a page shorter
    /// than `limit` is the last one.
    async fn list_probes(&self, page: u32, limit: u32) -> Result<Vec<Probe>, ApiError>;

    /// Create a single probe.
    async fn create_probe(&self, req: CreateProbeRequest) -> Result<Probe, ApiError>;
}
