//! Canvas projection types.
//!
//! A [`CanvasNode`] projects either a committed artifact record or a
//! provisional (in-flight) mutation; a [`CanvasEdge`] is the directed arc
//! from a parent node to a derived child. Both are plain data: all
//! transitions go through the controller.
//!
//! A node carries no editing flag. Whether a node is accepting interactive
//! input is derived from the controller's active edit pointer, which makes
//! "at most one editor" structural rather than something to re-check.

use serde::Serialize;

use iconforge_core::canvas::Position;
use iconforge_core::types::ArtifactId;

/// Display label for root nodes.
pub const LABEL_SOURCE: &str = "Source";

/// Display label for nodes whose mutation is still in flight.
pub const LABEL_PENDING: &str = "Generating...";

/// Display label for committed derived nodes.
pub const LABEL_MUTATION: &str = "Mutation";

/// Projection of a committed record or an in-flight mutation.
#[derive(Debug, Clone, Serialize)]
pub struct CanvasNode {
    /// Shared with the record this node projects (or will project).
    pub id: ArtifactId,
    /// SVG payload; empty while the backing mutation is pending.
    pub svg: String,
    /// True until the backing mutation resolves.
    pub pending: bool,
    /// The instruction that triggered this node, if derived.
    pub user_input: Option<String>,
    /// Canvas placement.
    pub position: Position,
    /// Display label.
    pub label: String,
}

impl CanvasNode {
    /// A committed root node.
    pub fn committed_root(id: ArtifactId, svg: String, position: Position) -> Self {
        Self {
            id,
            svg,
            pending: false,
            user_input: None,
            position,
            label: LABEL_SOURCE.to_string(),
        }
    }

    /// A provisional node for a mutation that has not yet resolved.
    pub fn provisional(id: ArtifactId, user_input: String, position: Position) -> Self {
        Self {
            id,
            svg: String::new(),
            pending: true,
            user_input: Some(user_input),
            position,
            label: LABEL_PENDING.to_string(),
        }
    }

    /// Transition a provisional node in place once its mutation resolves.
    ///
    /// Only the pending flag, payload, and label change; the node keeps its
    /// identity, position, and triggering instruction.
    pub fn resolve(&mut self, svg: String) {
        self.svg = svg;
        self.pending = false;
        self.label = LABEL_MUTATION.to_string();
    }
}

/// Directed arc from a parent node to a derived child.
#[derive(Debug, Clone, Serialize)]
pub struct CanvasEdge {
    /// Stable edge id, `"{source}-{target}"`.
    pub id: String,
    pub source: ArtifactId,
    pub target: ArtifactId,
}

impl CanvasEdge {
    /// Build the edge between two node ids.
    pub fn between(source: &str, target: &str) -> Self {
        Self {
            id: format!("{source}-{target}"),
            source: source.to_string(),
            target: target.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provisional_node_starts_pending_and_empty() {
        let node = CanvasNode::provisional(
            "c1".to_string(),
            "make it blue".to_string(),
            Position { x: 420.0, y: 140.0 },
        );
        assert!(node.pending);
        assert!(node.svg.is_empty());
        assert_eq!(node.label, LABEL_PENDING);
    }

    #[test]
    fn resolve_keeps_identity_and_instruction() {
        let mut node = CanvasNode::provisional(
            "c1".to_string(),
            "make it blue".to_string(),
            Position { x: 420.0, y: 140.0 },
        );
        node.resolve("<svg blue/>".to_string());

        assert!(!node.pending);
        assert_eq!(node.id, "c1");
        assert_eq!(node.svg, "<svg blue/>");
        assert_eq!(node.label, LABEL_MUTATION);
        assert_eq!(node.user_input.as_deref(), Some("make it blue"));
    }

    #[test]
    fn edge_id_joins_endpoint_ids() {
        let edge = CanvasEdge::between("r1", "c1");
        assert_eq!(edge.id, "r1-c1");
        assert_eq!(edge.source, "r1");
        assert_eq!(edge.target, "c1");
    }
}
