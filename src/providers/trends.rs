//! CUSTOM_TRENDS provider.
//!
//! Reads BACKEND_API_URL from runtime settings (falling back to the
//! environment), GETs `<url>/twitter/trends` and exposes the list at
//! `providers.CUSTOM_TRENDS.trends`. Every failure degrades to an empty list.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use super::Provider;
use crate::config::{non_empty, EnvSettings, SettingsSource, BACKEND_API_URL};
use crate::domain::{TrendsPayload, TrendsResult};

/// Provider name as seen by templates
pub const PROVIDER_NAME: &str = "CUSTOM_TRENDS";

/// Path appended to the backend base URL
pub const TRENDS_PATH: &str = "/twitter/trends";

/// Failures while fetching trends. Never surfaced past [`TrendsProvider::get`].
#[derive(Debug, Error)]
pub enum TrendsError {
    #[error("{status} {reason}")]
    UpstreamStatus { status: u16, reason: String },

    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("failed to read response body: {0}")]
    Body(#[source] reqwest::Error),

    #[error("invalid JSON payload: {0}")]
    Parse(#[from] serde_json::Error),
}

impl TrendsError {
    fn upstream(status: StatusCode) -> Self {
        Self::UpstreamStatus {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
        }
    }
}

/// Build the trends endpoint from a base URL, dropping one trailing slash
pub fn trends_url(base: &str) -> String {
    let base = base.strip_suffix('/').unwrap_or(base);
    format!("{}{}", base, TRENDS_PATH)
}

/// Fetches trends from the configured backend
pub struct TrendsProvider {
    client: reqwest::Client,
    /// Environment-style fallback consulted when runtime settings lack the URL
    fallback: Arc<dyn SettingsSource>,
}

impl Default for TrendsProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TrendsProvider {
    /// Provider that falls back to the process environment
    pub fn new() -> Self {
        Self::with_fallback(EnvSettings)
    }

    /// Provider with an explicit fallback settings source
    pub fn with_fallback(fallback: impl SettingsSource + 'static) -> Self {
        Self {
            client: reqwest::Client::new(),
            fallback: Arc::new(fallback),
        }
    }

    /// Use a caller-supplied HTTP client
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Resolve the backend base URL: runtime settings, then fallback
    pub fn resolve_base_url(&self, runtime: &dyn SettingsSource) -> Option<String> {
        non_empty(runtime.get_setting(BACKEND_API_URL))
            .or_else(|| non_empty(self.fallback.get_setting(BACKEND_API_URL)))
    }

    /// Fetch trends once. Any failure yields the empty fallback.
    pub async fn get(&self, runtime: &dyn SettingsSource) -> TrendsResult {
        let Some(base) = self.resolve_base_url(runtime) else {
            tracing::warn!(
                "[{}] {} not set; returning empty trends",
                PROVIDER_NAME,
                BACKEND_API_URL
            );
            return TrendsResult::empty();
        };

        let url = trends_url(&base);
        tracing::info!("[{}] Fetching trends from: {}", PROVIDER_NAME, url);

        match self.fetch(&url).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!("[{}] Fetch failed: {}", PROVIDER_NAME, e);
                TrendsResult::empty()
            }
        }
    }

    /// Single GET + decode
    async fn fetch(&self, url: &str) -> Result<TrendsResult, TrendsError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(TrendsError::Transport)?;

        let status = response.status();
        tracing::debug!("[{}] HTTP {}", PROVIDER_NAME, status.as_u16());

        if !status.is_success() {
            return Err(TrendsError::upstream(status));
        }

        let body = response.bytes().await.map_err(TrendsError::Body)?;
        let payload: TrendsPayload = serde_json::from_slice(&body)?;

        let trends = match payload.into_trends() {
            Ok(trends) => trends,
            Err(shape) => {
                tracing::warn!(
                    "[{}] Expected a list of trends, got {}; using empty trends",
                    PROVIDER_NAME,
                    shape
                );
                Vec::new()
            }
        };
        tracing::debug!("[{}] Trends received: {:?}", PROVIDER_NAME, trends);

        Ok(TrendsResult::new(trends))
    }
}

#[async_trait]
impl Provider for TrendsProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn description(&self) -> &'static str {
        "Today's trends from the configured backend"
    }

    async fn state(&self, runtime: &dyn SettingsSource) -> Value {
        self.get(runtime).await.to_state()
    }
}
