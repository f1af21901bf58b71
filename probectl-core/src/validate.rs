//! Pre-flight validation of a whole batch of probe configurations.
//!
//! Validation is network-free and all-or-nothing: the first violation in file
//! order rejects the entire batch before anything is sent to the remote side.

use reqwest::Url;
use tracing::{debug, error};

use crate::contract::CheckType;
use crate::error::{ValidationError, Violation};
use crate::model::PortableProbeConfig;

pub const ALLOWED_METHODS: [&str; 7] = ["GET", "POST", "PUT", "PATCH", "DELETE", "HEAD", "OPTIONS"];
pub const KEYWORD_CHECK_TYPES: [&str; 2] = ["contains", "not_contains"];

const INTERVAL_SECONDS_RANGE: std::ops::RangeInclusive<i32> = 30..=3600;
const TIMEOUT_SECONDS_RANGE: std::ops::RangeInclusive<i32> = 1..=60;
const MAX_REDIRECTS_RANGE: std::ops::RangeInclusive<i32> = 0..=20;
const SSL_EXPIRY_DAYS_RANGE: std::ops::RangeInclusive<i32> = 1..=365;

/// Validate every record, stopping at the first violation.
pub fn validate_batch(configs: &[PortableProbeConfig]) -> Result<(), ValidationError> {
    for (index, config) in configs.iter().enumerate() {
        if let Err(violation) = validate_config(config) {
            error!(index, name = %config.name, %violation, "Probe configuration failed validation");
            return Err(ValidationError {
                index,
                name: config.name.clone(),
                violation,
            });
        }
    }
    debug!(count = configs.len(), "All probe configurations passed validation");
    Ok(())
}

/// Validate a single record. Checks run in a fixed order and the first failure wins.
pub fn validate_config(config: &PortableProbeConfig) -> Result<(), Violation> {
    if config.name.is_empty() {
        return Err(Violation::MissingName);
    }
    if config.url.is_empty() {
        return Err(Violation::MissingUrl);
    }
    if config.check_type.is_empty() {
        return Err(Violation::MissingCheckType);
    }
    let check_type: CheckType = config
        .check_type
        .parse()
        .map_err(Violation::UnknownCheckType)?;

    if check_type == CheckType::Http && !is_absolute_http_url(&config.url) {
        return Err(Violation::InvalidHttpUrl(config.url.clone()));
    }

    if let Some(method) = config.method.as_deref().filter(|m| !m.is_empty()) {
        if !ALLOWED_METHODS.iter().any(|allowed| allowed.eq_ignore_ascii_case(method)) {
            return Err(Violation::UnsupportedMethod(method.to_string()));
        }
    }

    if config.interval_seconds != 0 && !INTERVAL_SECONDS_RANGE.contains(&config.interval_seconds) {
        return Err(Violation::IntervalOutOfRange(config.interval_seconds));
    }

    if config.timeout_ms != 0 && !TIMEOUT_SECONDS_RANGE.contains(&(config.timeout_ms / 1000)) {
        return Err(Violation::TimeoutOutOfRange(config.timeout_ms));
    }

    let has_keyword = config.keyword_check.as_deref().is_some_and(|k| !k.is_empty());
    if has_keyword {
        if let Some(kind) = config.keyword_check_type.as_deref().filter(|k| !k.is_empty()) {
            if !KEYWORD_CHECK_TYPES.contains(&kind) {
                return Err(Violation::UnknownKeywordCheckType(kind.to_string()));
            }
        }
    }

    // Zero is an explicit value here, not "unset".
    if !MAX_REDIRECTS_RANGE.contains(&config.max_redirects) {
        return Err(Violation::MaxRedirectsOutOfRange(config.max_redirects));
    }

    if config.ssl_expiry_threshold_days != 0
        && !SSL_EXPIRY_DAYS_RANGE.contains(&config.ssl_expiry_threshold_days)
    {
        return Err(Violation::SslExpiryOutOfRange(config.ssl_expiry_threshold_days));
    }

    Ok(())
}

/// The parser repairs `http:host` and `http:/host`, but the raw string is what
/// goes on the wire, so the `//` authority marker must be present as written.
fn is_absolute_http_url(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(url) => {
            let has_authority = raw
                .get(url.scheme().len()..)
                .is_some_and(|rest| rest.starts_with("://"));
            matches!(url.scheme(), "http" | "https")
                && has_authority
                && url.host_str().is_some_and(|h| !h.is_empty())
        }
        Err(_) => false,
    }
}
