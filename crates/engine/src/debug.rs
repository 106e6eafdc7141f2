//! Pipeline diagnostics attached to engine responses.
//!
//! The engine may return a `debug` payload describing its internal stages
//! (planner and generator request/response pairs, per-variant sections).
//! It is purely observational: logged for developer inspection and never
//! consulted for control flow or the data model.

use serde::Deserialize;

/// Maximum length of a logged value before clipping.
const CLIP_LIMIT: usize = 300;

// ---------------------------------------------------------------------------
// Payload shapes
// ---------------------------------------------------------------------------

/// Request/response pair captured from one pipeline stage.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageDebug {
    pub request: Option<serde_json::Value>,
    pub raw_response: Option<serde_json::Value>,
    pub parsed: Option<serde_json::Value>,
    pub extracted: Option<serde_json::Value>,
}

/// Debug sections for a single generated variant.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantDebug {
    pub variant_index: u32,
    pub planner: Option<StageDebug>,
    pub generator: Option<StageDebug>,
    pub normalized_svg: Option<String>,
}

/// Top-level pipeline debug payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineDebug {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub planner: Option<StageDebug>,
    pub generator: Option<StageDebug>,
    #[serde(default)]
    pub variants: Vec<VariantDebug>,
    pub normalized_svg: Option<String>,
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Render a stage value for logging, clipped to [`CLIP_LIMIT`] characters.
fn clip(value: &Option<serde_json::Value>) -> String {
    let Some(value) = value else {
        return "-".to_string();
    };
    let text = match value.as_str() {
        Some(s) => s.to_string(),
        None => value.to_string(),
    };
    if text.chars().count() > CLIP_LIMIT {
        let clipped: String = text.chars().take(CLIP_LIMIT).collect();
        format!("{clipped}...")
    } else {
        text
    }
}

fn log_stage(stage: &str, variant_index: Option<u32>, stage_debug: Option<&StageDebug>) {
    let Some(stage_debug) = stage_debug else {
        return;
    };
    tracing::debug!(
        stage,
        variant_index,
        request = %clip(&stage_debug.request),
        raw_response = %clip(&stage_debug.raw_response),
        parsed = %clip(&stage_debug.parsed),
        extracted = %clip(&stage_debug.extracted),
        "Engine pipeline stage"
    );
}

/// Emit the whole pipeline debug payload as structured tracing events.
pub(crate) fn log_pipeline_debug(payload: &PipelineDebug) {
    tracing::debug!(
        provider = payload.provider.as_deref().unwrap_or("unknown"),
        model = payload.model.as_deref().unwrap_or("unknown"),
        "Engine pipeline debug"
    );

    if payload.variants.is_empty() {
        log_stage("planner", None, payload.planner.as_ref());
        log_stage("generator", None, payload.generator.as_ref());
    } else {
        for variant in &payload.variants {
            log_stage("planner", Some(variant.variant_index), variant.planner.as_ref());
            log_stage(
                "generator",
                Some(variant.variant_index),
                variant.generator.as_ref(),
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
