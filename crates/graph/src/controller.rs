//! Mutation graph controller.
//!
//! The sole mutator of the canvas projection and the sole caller of the
//! remote mutation service. Enforces the optimistic-commit protocol:
//!
//! 1. Validate, then write the provisional node/edge pair in one locked
//!    step (the user sees a loading node immediately).
//! 2. Await the remote call with no lock held.
//! 3. In one locked step, either commit the record and flip the provisional
//!    node in place, or remove the node/edge pair entirely and re-signal
//!    the failure.
//!
//! Any number of mutations may be in flight for distinct parents; each owns
//! its own provisional pair and its own parent snapshot captured at submit
//! time. Readers only ever see "not started", "provisional present", or
//! "committed" -- never a torn state.

use tokio::sync::RwLock;

use iconforge_core::canvas;
use iconforge_core::error::CoreError;
use iconforge_core::types::ArtifactId;

use crate::node::{CanvasEdge, CanvasNode};
use crate::record::{ArtifactRecord, RecordStore};
use crate::service::MutationService;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure modes of the controller's operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// A domain-level failure: validation, missing parent, or a store
    /// invariant breach. Nothing was changed, or the change was undone.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The remote service rejected the mutation. The provisional node and
    /// edge were rolled back before this was returned; the message is the
    /// service's own text where available.
    #[error("{0}")]
    Service(String),
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Everything the controller owns, guarded by one lock.
#[derive(Debug, Default)]
struct GraphState {
    store: RecordStore,
    nodes: Vec<CanvasNode>,
    edges: Vec<CanvasEdge>,
    active_node_id: Option<ArtifactId>,
}

impl GraphState {
    fn node(&self, id: &str) -> Option<&CanvasNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Remove a provisional node and its edge, restoring the pre-submit
    /// shape of the projection. The edge is keyed by its target, which is
    /// unique to this mutation's freshly allocated child id.
    fn rollback(&mut self, child_id: &str) {
        self.nodes.retain(|n| n.id != child_id);
        self.edges.retain(|e| e.target != child_id);
    }
}

/// Allocate a fresh globally-unique artifact id.
fn new_artifact_id() -> ArtifactId {
    uuid::Uuid::new_v4().to_string()
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Owns the record store and the canvas projection; all state transitions
/// go through its operations.
///
/// Wrap in an `Arc` to share with concurrent callers; all operations take
/// `&self`.
pub struct MutationGraph<S> {
    state: RwLock<GraphState>,
    service: S,
}

impl<S: MutationService> MutationGraph<S> {
    /// Create an empty graph backed by the given mutation service.
    pub fn new(service: S) -> Self {
        Self {
            state: RwLock::new(GraphState::default()),
            service,
        }
    }

    /// Insert a fully-formed SVG payload as a new root artifact.
    ///
    /// Allocates a fresh id, commits a parentless record, places a committed
    /// node at the deterministic root position, and closes any open editor.
    /// The only failure path is a store invariant breach, which cannot occur
    /// for a freshly allocated id.
    pub async fn create_root(&self, svg: impl Into<String>) -> Result<ArtifactId, CoreError> {
        let svg = svg.into();
        let id = new_artifact_id();

        let mut state = self.state.write().await;
        let root_index = state.store.iter().filter(|r| r.is_root()).count();
        state
            .store
            .insert(ArtifactRecord::root(id.clone(), svg.clone()))?;
        state.nodes.push(CanvasNode::committed_root(
            id.clone(),
            svg,
            canvas::root_position(root_index),
        ));
        state.active_node_id = None;

        tracing::info!(node_id = %id, "Root artifact created");
        Ok(id)
    }

    /// Open the edit affordance on a node.
    ///
    /// The node must exist and must not be pending (a node whose own
    /// mutation has not resolved cannot be edited). Idempotent for the
    /// already-active node; activating a different node implicitly
    /// deactivates the previous one.
    pub async fn begin_edit(&self, node_id: &str) -> Result<(), CoreError> {
        let mut state = self.state.write().await;
        let node = state.node(node_id).ok_or_else(|| CoreError::NotFound {
            entity: "node",
            id: node_id.to_string(),
        })?;
        if node.pending {
            return Err(CoreError::Validation(format!(
                "Node {node_id} is still generating and cannot be edited"
            )));
        }
        state.active_node_id = Some(node_id.to_string());
        Ok(())
    }

    /// Close the edit affordance unconditionally.
    ///
    /// No-op if none was open. Never affects an in-flight mutation:
    /// canceling the input affordance is independent from canceling a
    /// pending request (which has no cancellation path).
    pub async fn cancel_edit(&self) {
        self.state.write().await.active_node_id = None;
    }

    /// Derive a new artifact from `node_id` by an edit instruction.
    ///
    /// Returns the child id on success. On any failure after the
    /// provisional write, the node/edge pair has been removed and the graph
    /// is exactly as if the attempt had never been made; the caller is
    /// responsible for surfacing the error near the editing affordance,
    /// since the attempted node no longer exists.
    pub async fn commit_mutation(
        &self,
        node_id: &str,
        instruction: &str,
    ) -> Result<ArtifactId, GraphError> {
        let instruction = canvas::validate_instruction(instruction)?;

        // Phase 1: capture the parent snapshot and write the provisional
        // node/edge pair in one locked step. The editor closes on submit,
        // independent of the eventual outcome.
        let child_id = new_artifact_id();
        let parent_svg = {
            let mut state = self.state.write().await;
            let parent = state.store.get(node_id).ok_or_else(|| CoreError::NotFound {
                entity: "parent record",
                id: node_id.to_string(),
            })?;
            let parent_svg = parent.svg.clone();
            let parent_position = state
                .node(node_id)
                .map(|n| n.position)
                .ok_or_else(|| CoreError::Internal(format!(
                    "Committed record {node_id} has no canvas node"
                )))?;

            state.nodes.push(CanvasNode::provisional(
                child_id.clone(),
                instruction.to_string(),
                canvas::child_position(parent_position),
            ));
            state.edges.push(CanvasEdge::between(node_id, &child_id));
            state.active_node_id = None;

            tracing::debug!(
                parent_id = %node_id,
                node_id = %child_id,
                "Provisional node created, mutation submitted"
            );
            parent_svg
        };

        // Phase 2: the single suspension point. No lock is held here, so
        // every other operation stays responsive while the call is in
        // flight.
        let result = self.service.mutate(&parent_svg, instruction).await;

        // Phase 3: finalize or undo, again in one locked step.
        let mut state = self.state.write().await;
        match result {
            Ok(svg) => {
                let record = ArtifactRecord::derived(
                    child_id.clone(),
                    node_id.to_string(),
                    svg.clone(),
                    instruction.to_string(),
                );
                if let Err(e) = state.store.insert(record) {
                    // A fresh id colliding or the parent vanishing means an
                    // internal defect; undo the projection so the graph
                    // stays consistent rather than leaving a ghost node.
                    state.rollback(&child_id);
                    tracing::error!(
                        node_id = %child_id,
                        error = %e,
                        "Record insert failed after successful mutation"
                    );
                    return Err(e.into());
                }
                if let Some(node) = state.nodes.iter_mut().find(|n| n.id == child_id) {
                    node.resolve(svg);
                }
                tracing::info!(parent_id = %node_id, node_id = %child_id, "Mutation committed");
                Ok(child_id)
            }
            Err(e) => {
                state.rollback(&child_id);
                tracing::warn!(
                    parent_id = %node_id,
                    error = %e,
                    "Mutation failed, provisional node rolled back"
                );
                Err(GraphError::Service(e.0))
            }
        }
    }

    /// Manually connect two existing nodes.
    ///
    /// A projection-layer convenience: the record store is untouched and no
    /// parentage is implied. Duplicate identical edges are rejected.
    pub async fn connect(&self, source: &str, target: &str) -> Result<(), CoreError> {
        let mut state = self.state.write().await;
        for endpoint in [source, target] {
            if state.node(endpoint).is_none() {
                return Err(CoreError::NotFound {
                    entity: "node",
                    id: endpoint.to_string(),
                });
            }
        }
        if state
            .edges
            .iter()
            .any(|e| e.source == source && e.target == target)
        {
            return Err(CoreError::Conflict(format!(
                "Edge {source} -> {target} already exists"
            )));
        }
        state.edges.push(CanvasEdge::between(source, target));
        Ok(())
    }

    // ---- read accessors ----

    /// Snapshot of all canvas nodes in creation order.
    pub async fn nodes(&self) -> Vec<CanvasNode> {
        self.state.read().await.nodes.clone()
    }

    /// Snapshot of all canvas edges in creation order.
    pub async fn edges(&self) -> Vec<CanvasEdge> {
        self.state.read().await.edges.clone()
    }

    /// Snapshot of a committed record.
    pub async fn record(&self, id: &str) -> Option<ArtifactRecord> {
        self.state.read().await.store.get(id).cloned()
    }

    /// Snapshot of all committed records, ordered by creation time.
    pub async fn records(&self) -> Vec<ArtifactRecord> {
        let state = self.state.read().await;
        let mut records: Vec<ArtifactRecord> = state.store.iter().cloned().collect();
        records.sort_by_key(|r| r.created_at);
        records
    }

    /// The node currently accepting interactive input, if any.
    pub async fn active_node_id(&self) -> Option<ArtifactId> {
        self.state.read().await.active_node_id.clone()
    }

    /// Number of canvas nodes (committed and provisional).
    pub async fn node_count(&self) -> usize {
        self.state.read().await.nodes.len()
    }

    /// Number of canvas edges.
    pub async fn edge_count(&self) -> usize {
        self.state.read().await.edges.len()
    }

    /// Number of committed records.
    pub async fn record_count(&self) -> usize {
        self.state.read().await.store.len()
    }

    /// Render the committed version tree as an indented listing, roots
    /// first, children ordered by creation time. Provisional nodes are
    /// appended at the end since they are not yet part of any record chain.
    pub async fn render_tree(&self) -> String {
        let state = self.state.read().await;
        let mut out = String::new();

        let mut roots: Vec<&ArtifactRecord> =
            state.store.iter().filter(|r| r.is_root()).collect();
        roots.sort_by_key(|r| r.created_at);
        for root in roots {
            render_subtree(&state.store, &root.id, 0, &mut out);
        }

        for node in state.nodes.iter().filter(|n| n.pending) {
            let instruction = node.user_input.as_deref().unwrap_or("");
            out.push_str(&format!("~ {}  \"{instruction}\" (generating)\n", node.id));
        }
        out
    }
}

/// Append `id` and its descendants to `out`, indented two spaces per level.
fn render_subtree(store: &RecordStore, id: &str, depth: usize, out: &mut String) {
    let Some(record) = store.get(id) else {
        return;
    };
    let indent = "  ".repeat(depth);
    match &record.user_input {
        Some(input) => out.push_str(&format!("{indent}{id}  \"{input}\"\n")),
        None => out.push_str(&format!("{indent}{id}  (root)\n")),
    }

    let mut children: Vec<&ArtifactRecord> = store
        .iter()
        .filter(|r| r.parent_id.as_deref() == Some(id))
        .collect();
    children.sort_by_key(|r| r.created_at);
    for child in children {
        render_subtree(store, &child.id, depth + 1, out);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::ServiceError;
    use assert_matches::assert_matches;
    use async_trait::async_trait;

    /// Echoes the instruction into the payload; never fails.
    struct EchoService;

    #[async_trait]
    impl MutationService for EchoService {
        async fn mutate(&self, _svg: &str, user_input: &str) -> Result<String, ServiceError> {
            Ok(format!("<svg {user_input}/>"))
        }
    }

    // -- begin_edit / cancel_edit --------------------------------------------

    #[tokio::test]
    async fn begin_edit_unknown_node_is_rejected() {
        let graph = MutationGraph::new(EchoService);
        let err = graph.begin_edit("missing").await.unwrap_err();
        assert_matches!(err, CoreError::NotFound { .. });
        assert_eq!(graph.active_node_id().await, None);
    }

    #[tokio::test]
    async fn begin_edit_is_idempotent_for_active_node() {
        let graph = MutationGraph::new(EchoService);
        let root = graph.create_root("<svg/>").await.unwrap();
        graph.begin_edit(&root).await.unwrap();
        graph.begin_edit(&root).await.unwrap();
        assert_eq!(graph.active_node_id().await, Some(root));
    }

    #[tokio::test]
    async fn cancel_edit_without_active_node_is_a_noop() {
        let graph = MutationGraph::new(EchoService);
        graph.cancel_edit().await;
        assert_eq!(graph.active_node_id().await, None);
    }

    #[tokio::test]
    async fn create_root_clears_active_pointer() {
        let graph = MutationGraph::new(EchoService);
        let first = graph.create_root("<svg/>").await.unwrap();
        graph.begin_edit(&first).await.unwrap();

        graph.create_root("<svg other/>").await.unwrap();
        assert_eq!(graph.active_node_id().await, None);
    }

    #[tokio::test]
    async fn commit_clears_active_pointer_on_submit() {
        let graph = MutationGraph::new(EchoService);
        let root = graph.create_root("<svg/>").await.unwrap();
        graph.begin_edit(&root).await.unwrap();

        graph.commit_mutation(&root, "rounder").await.unwrap();
        assert_eq!(graph.active_node_id().await, None);
    }

    // -- connect -------------------------------------------------------------

    #[tokio::test]
    async fn connect_requires_existing_endpoints() {
        let graph = MutationGraph::new(EchoService);
        let root = graph.create_root("<svg/>").await.unwrap();
        let err = graph.connect(&root, "missing").await.unwrap_err();
        assert_matches!(err, CoreError::NotFound { .. });
    }

    #[tokio::test]
    async fn connect_rejects_duplicate_edge() {
        let graph = MutationGraph::new(EchoService);
        let a = graph.create_root("<svg a/>").await.unwrap();
        let b = graph.create_root("<svg b/>").await.unwrap();

        graph.connect(&a, &b).await.unwrap();
        let err = graph.connect(&a, &b).await.unwrap_err();
        assert_matches!(err, CoreError::Conflict(_));
        assert_eq!(graph.edge_count().await, 1);
    }

    #[tokio::test]
    async fn connect_does_not_touch_records() {
        let graph = MutationGraph::new(EchoService);
        let a = graph.create_root("<svg a/>").await.unwrap();
        let b = graph.create_root("<svg b/>").await.unwrap();

        graph.connect(&a, &b).await.unwrap();
        assert_eq!(graph.record_count().await, 2);
        assert!(graph.record(&b).await.unwrap().is_root());
    }

    // -- placement -----------------------------------------------------------

    #[tokio::test]
    async fn child_is_offset_from_its_parent() {
        let graph = MutationGraph::new(EchoService);
        let root = graph.create_root("<svg/>").await.unwrap();
        let child = graph.commit_mutation(&root, "rounder").await.unwrap();

        let nodes = graph.nodes().await;
        let root_pos = nodes.iter().find(|n| n.id == root).unwrap().position;
        let child_pos = nodes.iter().find(|n| n.id == child).unwrap().position;
        assert_eq!(child_pos, canvas::child_position(root_pos));
    }

    #[tokio::test]
    async fn successive_roots_do_not_overlap() {
        let graph = MutationGraph::new(EchoService);
        graph.create_root("<svg a/>").await.unwrap();
        graph.create_root("<svg b/>").await.unwrap();

        let nodes = graph.nodes().await;
        assert_ne!(nodes[0].position, nodes[1].position);
    }

    // -- render_tree ---------------------------------------------------------

    #[tokio::test]
    async fn render_tree_indents_children_under_roots() {
        let graph = MutationGraph::new(EchoService);
        let root = graph.create_root("<svg/>").await.unwrap();
        let child = graph.commit_mutation(&root, "make it blue").await.unwrap();

        let tree = graph.render_tree().await;
        assert!(tree.contains(&format!("{root}  (root)")));
        assert!(tree.contains(&format!("  {child}  \"make it blue\"")));
    }
}
