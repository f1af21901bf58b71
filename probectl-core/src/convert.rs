//! Maps a portable record onto a wire [`CreateProbeRequest`], applying defaults.

use tracing::warn;
use uuid::Uuid;

use crate::contract::CreateProbeRequest;
use crate::model::PortableProbeConfig;

pub const DEFAULT_METHOD: &str = "GET";
pub const DEFAULT_TIMEOUT_MS: i32 = 10_000;
pub const DEFAULT_INTERVAL_SECONDS: i32 = 60;
pub const DEFAULT_EXPECTED_STATUS: u16 = 200;

/// The HTTP method a record will use once defaults are applied.
pub fn effective_method(config: &PortableProbeConfig) -> String {
    config
        .method
        .as_deref()
        .filter(|m| !m.is_empty())
        .map(str::to_ascii_uppercase)
        .unwrap_or_else(|| DEFAULT_METHOD.to_string())
}

/// The check interval a record will use once defaults are applied.
pub fn effective_interval(config: &PortableProbeConfig) -> i32 {
    non_zero_or(config.interval_seconds, DEFAULT_INTERVAL_SECONDS)
}

/// Build the create request for a validated record.
///
/// Conversion never fails: alert channel ids that are not UUIDs are reported
/// on stderr and dropped, and the rest of the record goes through.
pub fn to_create_request(config: &PortableProbeConfig) -> CreateProbeRequest {
    let expected_status_codes = if config.expected_status_codes.is_empty() {
        vec![DEFAULT_EXPECTED_STATUS]
    } else {
        config.expected_status_codes.clone()
    };

    CreateProbeRequest {
        name: config.name.clone(),
        url: config.url.clone(),
        check_type: config.check_type.clone(),
        method: effective_method(config),
        headers: encode_headers(config),
        body: config.body.clone(),
        timeout_ms: non_zero_or(config.timeout_ms, DEFAULT_TIMEOUT_MS),
        interval_seconds: effective_interval(config),
        regions: config.regions.clone(),
        expected_status_codes,
        keyword_check: config.keyword_check.clone(),
        keyword_check_type: config.keyword_check_type.clone(),
        json_path_check: config.json_path_check.clone(),
        json_path_expected: config.json_path_expected.clone(),
        ssl_check_enabled: config.ssl_check_enabled,
        ssl_expiry_threshold_days: (config.ssl_expiry_threshold_days != 0)
            .then_some(config.ssl_expiry_threshold_days),
        follow_redirects: Some(config.follow_redirects),
        max_redirects: config.max_redirects,
        alert_channel_ids: parse_alert_channel_ids(config),
        labels: config.labels.clone(),
    }
}

fn non_zero_or(value: i32, default: i32) -> i32 {
    if value == 0 {
        default
    } else {
        value
    }
}

fn encode_headers(config: &PortableProbeConfig) -> String {
    if config.headers.is_empty() {
        return String::new();
    }
    match serde_json::to_string(&config.headers) {
        Ok(json) => json,
        Err(e) => {
            warn!(name = %config.name, error = %e, "Failed to encode headers, sending none");
            String::new()
        }
    }
}

fn parse_alert_channel_ids(config: &PortableProbeConfig) -> Option<Vec<Uuid>> {
    let ids: Vec<Uuid> = config
        .alert_channel_ids
        .iter()
        .filter_map(|raw| match Uuid::parse_str(raw) {
            Ok(id) => Some(id),
            Err(e) => {
                warn!(name = %config.name, alert_channel_id = %raw, error = %e, "Dropping invalid alert channel id");
                eprintln!(
                    "Warning: probe {:?}: ignoring invalid alert channel id {:?}: {}",
                    config.name, raw, e
                );
                None
            }
        })
        .collect();

    if ids.is_empty() {
        None
    } else {
        Some(ids)
    }
}
