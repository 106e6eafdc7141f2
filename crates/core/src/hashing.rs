//! SHA-256 digest helper for artifact payloads.
//!
//! Every committed artifact record carries a hex digest of its SVG content,
//! so a serialized version history can be checked for tampering after the
//! fact. The digest is observational: no graph operation branches on it.

use sha2::{Digest, Sha256};

/// Compute the SHA-256 hex digest of an SVG payload.
pub fn content_digest(svg: &str) -> String {
    let hash = Sha256::digest(svg.as_bytes());
    format!("{hash:x}")
}
