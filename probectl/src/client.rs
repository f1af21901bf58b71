#![doc = "HTTP implementation of the probe collection contract used by the CLI."]
//
//! # Probe API client (CLI <-> Core)
//!
//! This module wires the [`ProbeApi`] trait from `probectl-core` to the hosted
//! monitoring API over HTTPS. The pipeline never sees transport details: every
//! failure, including non-2xx responses, comes back as an opaque boxed error
//! carrying the status and response body.
//!
//! ## Client Usage
//!
//! - Construct [`ProbeClient`] from a [`ClientConfig`] (see `load_config`).
//! - Hand a reference to `probectl_core::reconcile::import` or
//!   `probectl_core::export::export_probes`.

use async_trait::async_trait;
use probectl_core::contract::{ApiError, CreateProbeRequest, Probe, ProbeApi};
use reqwest::{Response, Url};

use crate::load_config::ClientConfig;

pub struct ProbeClient {
    http: reqwest::Client,
    probes_url: Url,
    api_key: String,
}

impl ProbeClient {
    pub fn new(config: ClientConfig) -> anyhow::Result<Self> {
        let probes_url = probes_endpoint(&config.base_url)?;
        let http = reqwest::Client::builder()
            .user_agent(concat!("probectl/", env!("CARGO_PKG_VERSION")))
            .build()?;
        tracing::info!(endpoint = %probes_url, "Initialized ProbeClient");
        Ok(ProbeClient {
            http,
            probes_url,
            api_key: config.api_key,
        })
    }
}

fn probes_endpoint(base_url: &Url) -> anyhow::Result<Url> {
    let mut base = base_url.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base.join("v1/probes")?)
}

async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(format!("API returned {status}: {}", body.trim()).into())
}

#[async_trait]
impl ProbeApi for ProbeClient {
    async fn list_probes(&self, page: u32, limit: u32) -> Result<Vec<Probe>, ApiError> {
        tracing::debug!(page, limit, "Listing probes");
        let response = self
            .http
            .get(self.probes_url.clone())
            .bearer_auth(&self.api_key)
            .query(&[("page", page), ("limit", limit)])
            .send()
            .await?;

        match check_status(response).await {
            Ok(response) => {
                let probes: Vec<Probe> = response.json().await?;
                tracing::debug!(page, count = probes.len(), "Fetched probes");
                Ok(probes)
            }
            Err(e) => {
                tracing::debug!(error = %e, page, "API error listing probes");
                Err(e)
            }
        }
    }

    async fn create_probe(&self, req: CreateProbeRequest) -> Result<Probe, ApiError> {
        tracing::info!(name = %req.name, "Creating probe");
        let response = self
            .http
            .post(self.probes_url.clone())
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await?;

        match check_status(response).await {
            Ok(response) => {
                let probe: Probe = response.json().await?;
                tracing::info!(id = %probe.id, name = %probe.name, "Successfully created probe");
                Ok(probe)
            }
            Err(e) => {
                tracing::debug!(error = %e, name = %req.name, "API error creating probe");
                Err(e)
            }
        }
    }
}
