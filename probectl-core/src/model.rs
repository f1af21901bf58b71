//! The portable, file-representable probe definition.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// A probe definition as it appears in an import/export file.
///
/// Numeric fields use `0` for "unset": the converter substitutes defaults and
/// the validator only range-checks explicit values (except `max_redirects`,
/// where `0` is meaningful). Unset and empty fields are left out when encoding.
/// Collections written as `null` decode as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortableProbeConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub check_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub timeout_ms: i32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub interval_seconds: i32,
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Vec::is_empty")]
    pub regions: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Vec::is_empty")]
    pub expected_status_codes: Vec<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword_check: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword_check_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_path_check: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_path_expected: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub ssl_check_enabled: bool,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub ssl_expiry_threshold_days: i32,
    #[serde(default, skip_serializing_if = "is_false")]
    pub follow_redirects: bool,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub max_redirects: i32,
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Vec::is_empty")]
    pub alert_channel_ids: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<Label>,
}

/// A probe label; `value` is optional so bare tags are representable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}={}", self.key, value),
            None => f.write_str(&self.key),
        }
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn is_zero(value: &i32) -> bool {
    *value == 0
}

fn is_false(value: &bool) -> bool {
    !*value
}
