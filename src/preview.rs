//! HTTP adapter for the upstream clustering service.
//!
//! Submits a re-planning request and returns the preview payload it answers
//! with. The request body is opaque here; only the response shape matters.

use serde::Serialize;

use crate::error::PayloadError;
use crate::payload::PreviewPayload;
use crate::traits::PreviewSource;

#[derive(Debug, Clone)]
pub struct PreviewConfig {
    pub base_url: String,
    pub preview_path: String,
    pub timeout_secs: u64,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            preview_path: "/api/clustering/preview".to_string(),
            timeout_secs: 30,
        }
    }
}

impl PreviewConfig {
    pub fn url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.preview_path.trim_start_matches('/')
        )
    }
}

#[derive(Debug, Clone)]
pub struct PreviewClient {
    config: PreviewConfig,
    client: reqwest::blocking::Client,
}

impl PreviewClient {
    pub fn new(config: PreviewConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &PreviewConfig {
        &self.config
    }

    /// Posts `request` and parses the response into a preview payload.
    pub fn request_preview<R: Serialize + ?Sized>(
        &self,
        request: &R,
    ) -> Result<PreviewPayload, PayloadError> {
        let body = self
            .client
            .post(self.config.url())
            .json(request)
            .send()
            .and_then(|resp| resp.error_for_status())?
            .text()?;

        PreviewPayload::from_json(&body)
    }

    /// A [`PreviewSource`] that replays `request` on every load.
    pub fn with_request<R: Serialize>(self, request: R) -> HttpPreview<R> {
        HttpPreview { client: self, request }
    }
}

/// A client bound to one re-planning request.
#[derive(Debug, Clone)]
pub struct HttpPreview<R> {
    client: PreviewClient,
    request: R,
}

impl<R: Serialize> PreviewSource for HttpPreview<R> {
    fn load_preview(&self) -> Result<PreviewPayload, PayloadError> {
        self.client.request_preview(&self.request)
    }
}

/// A preview document already held in memory.
#[derive(Debug, Clone)]
pub struct StaticPreview(pub String);

impl PreviewSource for StaticPreview {
    fn load_preview(&self) -> Result<PreviewPayload, PayloadError> {
        PreviewPayload::from_json(&self.0)
    }
}
