#![doc = "HTTP implementation of the core `CatalogApi` contract against the Nexus-style mod catalog."]
//
//! # Catalog client (CLI <-> Core)
//!
//! Bridges [`mod_curator_core::contract::CatalogApi`] to the remote REST API.
//!
//! - Every request carries the API key in the `apikey` header.
//! - `429` maps to [`CatalogError::RateLimited`], honouring `Retry-After` when present.
//! - No per-request timeout beyond reqwest's defaults.
//!
//! Endpoints, relative to the configured base URL:
//! - `mods/updated.json?period=<window>`
//! - `mods/{id}.json`
//! - `mods/{id}/files.json`
//! - `mods/{id}/changelogs.json`

use async_trait::async_trait;
use reqwest::header::{HeaderMap, ACCEPT, RETRY_AFTER};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

use mod_curator_core::contract::{CatalogApi, CatalogError, InfoOutcome};
use mod_curator_core::model::{ChangelogPayload, Changelogs, FileRecord, ModId, RemoteInfo};

use crate::load_config::CatalogSettings;

const DEFAULT_USER_AGENT: &str = concat!("mod-curator/", env!("CARGO_PKG_VERSION"));

pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Deserialize)]
struct UpdatedEntry {
    mod_id: ModId,
}

#[derive(Deserialize)]
struct FilesPayload {
    #[serde(default)]
    files: Vec<FileRecord>,
}

impl CatalogClient {
    pub fn new(settings: &CatalogSettings) -> Result<Self, reqwest::Error> {
        let user_agent = settings
            .user_agent
            .clone()
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
        let http = reqwest::Client::builder().user_agent(user_agent).build()?;
        tracing::info!(
            base_url = %settings.base_url,
            api_key_set = !settings.api_key.is_empty(),
            "Initialized CatalogClient"
        );
        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
        })
    }

    /// GETs `path` and returns the body of a successful response.
    async fn get_body(&self, path: &str, query: &[(&str, &str)]) -> Result<String, CatalogError> {
        let url = endpoint_url(&self.base_url, path);
        tracing::debug!(url = %url, "Requesting catalog endpoint");

        let response = self
            .http
            .get(&url)
            .header("apikey", &self.api_key)
            .header(ACCEPT, "application/json")
            .query(query)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = ?e, url = %url, "Catalog request failed");
                CatalogError::Transport(e.to_string())
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = parse_retry_after(response.headers());
            tracing::warn!(url = %url, ?retry_after, "Catalog rate limit hit");
            return Err(CatalogError::RateLimited { retry_after });
        }
        if !status.is_success() {
            tracing::warn!(url = %url, status = %status, "Catalog returned non-success status");
            return Err(CatalogError::Status {
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| CatalogError::Transport(e.to_string()))
    }
}

fn endpoint_url(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

fn decode<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, CatalogError> {
    serde_json::from_str(body).map_err(|e| CatalogError::Decode(e.to_string()))
}

fn decode_info(body: &str) -> InfoOutcome {
    match serde_json::from_str::<Option<RemoteInfo>>(body) {
        Ok(Some(info)) => InfoOutcome::Found(info),
        Ok(None) => InfoOutcome::Missing { status: None },
        Err(_) if body.trim().is_empty() => InfoOutcome::Missing { status: None },
        Err(e) => InfoOutcome::Unavailable {
            reason: format!("undecodable info document: {e}"),
        },
    }
}

#[async_trait]
impl CatalogApi for CatalogClient {
    async fn updated_mods(&self, period: &str) -> Result<Vec<ModId>, CatalogError> {
        let body = self
            .get_body("mods/updated.json", &[("period", period)])
            .await?;
        let entries: Vec<UpdatedEntry> = decode(&body)?;
        Ok(entries.into_iter().map(|entry| entry.mod_id).collect())
    }

    async fn mod_info(&self, mod_id: ModId) -> InfoOutcome {
        match self.get_body(&format!("mods/{mod_id}.json"), &[]).await {
            Ok(body) => decode_info(&body),
            Err(e) => InfoOutcome::from_error(e),
        }
    }

    async fn mod_files(&self, mod_id: ModId) -> Result<Vec<FileRecord>, CatalogError> {
        let body = self
            .get_body(&format!("mods/{mod_id}/files.json"), &[])
            .await?;
        let payload: FilesPayload = decode(&body)?;
        Ok(payload.files)
    }

    async fn mod_changelogs(&self, mod_id: ModId) -> Result<Changelogs, CatalogError> {
        let body = self
            .get_body(&format!("mods/{mod_id}/changelogs.json"), &[])
            .await?;
        let payload: ChangelogPayload = decode(&body)?;
        Ok(payload.into())
    }
}
