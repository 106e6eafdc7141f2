//! REST client for the SVG generation engine.
//!
//! Wraps the engine's two HTTP endpoints (`POST /generate`,
//! `POST /mutate`) using [`reqwest`]. One [`EngineApi`] per engine
//! instance; the underlying client is cheap to clone and pools
//! connections. Implements the graph controller's
//! [`MutationService`] seam.

use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use iconforge_core::constraints::BrandConstraints;
use iconforge_graph::service::{MutationService, ServiceError};

use crate::debug::{log_pipeline_debug, PipelineDebug};

// ---------------------------------------------------------------------------
// Wire payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    prompt: &'a str,
    brand_constraints: &'a BrandConstraints,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    variants: Vec<GeneratedVariant>,
    debug: Option<PipelineDebug>,
}

#[derive(Debug, Deserialize)]
struct GeneratedVariant {
    svg: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MutateRequest<'a> {
    svg: &'a str,
    user_input: &'a str,
}

#[derive(Debug, Deserialize)]
struct MutateResponse {
    svg: String,
    debug: Option<PipelineDebug>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from the engine REST layer.
#[derive(Debug, thiserror::Error)]
pub enum EngineApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The engine returned a non-2xx status code.
    #[error("Engine error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body; the engine puts its message text here.
        body: String,
    },

    /// A generate call succeeded but produced no usable variants.
    #[error("Engine returned no SVG variants")]
    NoVariants,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for a single engine instance.
#[derive(Clone)]
pub struct EngineApi {
    client: reqwest::Client,
    base_url: String,
}

impl EngineApi {
    /// Create a new API client for an engine instance.
    ///
    /// * `base_url` - Base HTTP URL, e.g. `http://localhost:8000`.
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Create an API client reusing an existing [`reqwest::Client`]
    /// (useful to share a configured client, e.g. with a custom timeout).
    pub fn with_client(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// Base HTTP URL of the engine.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Generate candidate icons from a text prompt.
    ///
    /// Sends `POST /generate` with the prompt and the brand constraints.
    /// Returns the non-blank candidate payloads in response order. Zero
    /// usable candidates is reported as [`EngineApiError::NoVariants`].
    pub async fn generate(
        &self,
        prompt: &str,
        constraints: &BrandConstraints,
    ) -> Result<Vec<String>, EngineApiError> {
        let started = Instant::now();
        let response = self
            .client
            .post(format!("{}/generate", self.base_url))
            .json(&GenerateRequest {
                prompt,
                brand_constraints: constraints,
            })
            .send()
            .await?;

        let parsed: GenerateResponse = Self::parse_response(response).await?;
        if let Some(debug) = &parsed.debug {
            log_pipeline_debug(debug);
        }

        let variants: Vec<String> = parsed
            .variants
            .into_iter()
            .map(|v| v.svg)
            .filter(|svg| !svg.trim().is_empty())
            .collect();

        tracing::info!(
            variant_count = variants.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Generate round-trip complete"
        );

        if variants.is_empty() {
            return Err(EngineApiError::NoVariants);
        }
        Ok(variants)
    }

    /// Derive a new icon from a parent snapshot and an edit instruction.
    ///
    /// Sends `POST /mutate`. Any non-success response surfaces as
    /// [`EngineApiError::Api`] carrying the engine's message text.
    pub async fn mutate(&self, svg: &str, user_input: &str) -> Result<String, EngineApiError> {
        let started = Instant::now();
        let response = self
            .client
            .post(format!("{}/mutate", self.base_url))
            .json(&MutateRequest { svg, user_input })
            .send()
            .await?;

        let parsed: MutateResponse = Self::parse_response(response).await?;
        if let Some(debug) = &parsed.debug {
            log_pipeline_debug(debug);
        }

        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Mutate round-trip complete"
        );
        Ok(parsed.svg)
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the response
    /// unchanged on success, or [`EngineApiError::Api`] with the status and
    /// body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, EngineApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(EngineApiError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, EngineApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl MutationService for EngineApi {
    async fn mutate(&self, svg: &str, user_input: &str) -> Result<String, ServiceError> {
        EngineApi::mutate(self, svg, user_input)
            .await
            .map_err(|e| match e {
                // The controller surfaces the service's own message text.
                EngineApiError::Api { body, .. } => ServiceError(body),
                other => ServiceError(other.to_string()),
            })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
