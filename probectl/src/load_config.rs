/// `load_config` module: resolves the API client settings from the environment.
///
/// Settings come from process environment variables, optionally seeded from a
/// `.env` file in the working directory:
/// - `PROBECTL_API_URL`: base URL of the monitoring API (required)
/// - `PROBECTL_API_KEY`: API key sent as a bearer token (required)
///
/// # Errors
/// All errors use `anyhow::Error` and name the missing or malformed variable;
/// the CLI surfaces them as configuration errors.
use anyhow::{anyhow, Result};
use reqwest::Url;
use std::env;
use tracing::{error, info};

pub const API_URL_VAR: &str = "PROBECTL_API_URL";
pub const API_KEY_VAR: &str = "PROBECTL_API_KEY";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    pub api_key: String,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let raw_url = required_var(API_URL_VAR)?;
        let base_url = Url::parse(&raw_url).map_err(|e| {
            error!(error = ?e, raw = %raw_url, "Failed to parse {API_URL_VAR}");
            anyhow!("{API_URL_VAR} is not a valid URL ({raw_url:?}): {e}")
        })?;
        let api_key = required_var(API_KEY_VAR)?;

        info!(
            base_url = %base_url,
            api_key_set = !api_key.is_empty(),
            "Loaded API client configuration from environment"
        );
        Ok(ClientConfig { base_url, api_key })
    }
}

fn required_var(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        Ok(_) => {
            error!(var = name, "Environment variable is empty");
            Err(anyhow!("{name} is set but empty"))
        }
        Err(e) => {
            error!(error = ?e, var = name, "Environment variable missing");
            Err(anyhow!("{name} is not set"))
        }
    }
}
