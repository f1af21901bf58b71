//! Converts live remote probes back into portable records.

use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::contract::{Probe, ProbeApi};
use crate::error::PipelineError;
use crate::index::for_each_page;
use crate::model::PortableProbeConfig;

/// Map a remote probe onto the portable shape.
///
/// Header JSON that cannot be parsed is dropped with a warning; the rest of
/// the probe is still exported.
pub fn probe_to_portable(probe: &Probe) -> PortableProbeConfig {
    PortableProbeConfig {
        name: probe.name.clone(),
        url: probe.url.clone(),
        check_type: probe.check_type.clone(),
        method: (!probe.method.is_empty()).then(|| probe.method.clone()),
        headers: decode_headers(probe),
        body: probe.body.clone(),
        timeout_ms: probe.timeout_ms,
        interval_seconds: probe.interval_seconds,
        regions: probe.regions.clone(),
        expected_status_codes: probe.expected_status_codes.clone(),
        keyword_check: probe.keyword_check.clone(),
        keyword_check_type: probe.keyword_check_type.clone(),
        json_path_check: probe.json_path_check.clone(),
        json_path_expected: probe.json_path_expected.clone(),
        ssl_check_enabled: probe.ssl_check_enabled,
        ssl_expiry_threshold_days: probe.ssl_expiry_threshold_days.unwrap_or(0),
        follow_redirects: probe.follow_redirects,
        max_redirects: probe.max_redirects,
        alert_channel_ids: probe.alert_channel_ids.iter().map(ToString::to_string).collect(),
        labels: probe.labels.clone(),
    }
}

fn decode_headers(probe: &Probe) -> BTreeMap<String, String> {
    if probe.headers.trim().is_empty() {
        return BTreeMap::new();
    }
    serde_json::from_str(&probe.headers).unwrap_or_else(|e| {
        warn!(name = %probe.name, error = %e, "Ignoring unparsable probe headers");
        BTreeMap::new()
    })
}

/// Fetch every remote probe and convert it, preserving remote order.
pub async fn export_probes<A>(api: &A) -> Result<Vec<PortableProbeConfig>, PipelineError>
where
    A: ProbeApi + ?Sized,
{
    let mut configs = Vec::new();
    for_each_page(api, |page| configs.extend(page.iter().map(probe_to_portable))).await?;
    info!(count = configs.len(), "[EXPORT] Exported probe configurations");
    Ok(configs)
}
