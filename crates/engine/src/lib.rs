//! HTTP adapter for the remote SVG generation engine.
//!
//! The engine exposes two request/response operations: `generate` (text
//! prompt to candidate icons) and `mutate` (parent snapshot + instruction
//! to a derived icon). [`api::EngineApi`] wraps both and implements the
//! graph controller's `MutationService` seam; [`debug`] handles the
//! optional pipeline diagnostics attached to responses.

pub mod api;
pub mod debug;

pub use api::{EngineApi, EngineApiError};
pub use debug::PipelineDebug;
