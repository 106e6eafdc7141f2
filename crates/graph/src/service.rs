//! Seam between the graph controller and the remote generation service.
//!
//! The controller never talks HTTP itself; it depends on this one async
//! capability. The production implementation lives in `iconforge-engine`,
//! tests use in-process stubs.

use async_trait::async_trait;

/// Failure reported by a [`MutationService`] implementation.
///
/// Carries the service's message text where available. The controller rolls
/// back the provisional node before surfacing this to its caller, so the
/// message is the only thing left of a failed attempt.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct ServiceError(pub String);

/// Derive a new SVG payload from a parent snapshot and an edit instruction.
///
/// This is the single suspension point of the commit protocol. There is no
/// cancellation path: once issued, a call runs to completion or to the
/// service's own timeout.
#[async_trait]
pub trait MutationService: Send + Sync {
    async fn mutate(&self, svg: &str, user_input: &str) -> Result<String, ServiceError>;
}
