//! Versioned mutation graph for iterative vector-image editing.
//!
//! Two layers compose the crate:
//!
//! 1. [`record::RecordStore`] -- an append-only map of committed artifact
//!    versions, each referencing its parent. Pure data.
//! 2. [`controller::MutationGraph`] -- owns the store plus the canvas
//!    projection (nodes, edges, the active edit pointer) and enforces the
//!    optimistic-commit protocol around the remote mutation call.
//!
//! The remote service is reached only through the [`service::MutationService`]
//! trait, so tests drive the controller with stubs and the production build
//! plugs in the HTTP engine adapter.

pub mod controller;
pub mod node;
pub mod record;
pub mod service;

pub use controller::{GraphError, MutationGraph};
pub use node::{CanvasEdge, CanvasNode};
pub use record::{ArtifactRecord, RecordStore};
pub use service::{MutationService, ServiceError};
