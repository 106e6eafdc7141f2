//! Canvas layout constants and instruction validation.
//!
//! This module lives in `core` (zero internal deps) so the graph controller
//! and any presentation layer agree on where nodes land and which edit
//! instructions are acceptable before a network call is made.
//!
//! Layout here is a convenience, not a correctness concern: the controller
//! only promises that placement is deterministic and that derived nodes are
//! offset from their parent so trees fan out visually.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Layout constants
// ---------------------------------------------------------------------------

/// Canvas position of the first root node.
pub const ROOT_X: f64 = 120.0;

/// Canvas position of the first root node.
pub const ROOT_Y: f64 = 140.0;

/// Vertical spacing between successive root nodes so they do not stack.
pub const ROOT_SPACING_Y: f64 = 180.0;

/// Horizontal offset between a parent node and a derived child.
pub const CHILD_OFFSET_X: f64 = 300.0;

/// Maximum allowed length of an edit instruction in characters.
pub const MAX_INSTRUCTION_LENGTH: usize = 500;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A point on the canvas, in canvas-space pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Deterministic placement for the `index`-th root node (0-based).
///
/// Roots stack downward from ([`ROOT_X`], [`ROOT_Y`]) at [`ROOT_SPACING_Y`]
/// intervals.
pub fn root_position(index: usize) -> Position {
    Position {
        x: ROOT_X,
        y: ROOT_Y + ROOT_SPACING_Y * index as f64,
    }
}

/// Placement for a node derived from a parent at `parent`.
///
/// Children fan out along the +x axis at a fixed [`CHILD_OFFSET_X`] offset.
pub fn child_position(parent: Position) -> Position {
    Position {
        x: parent.x + CHILD_OFFSET_X,
        y: parent.y,
    }
}

// ---------------------------------------------------------------------------
// Instruction validation
// ---------------------------------------------------------------------------

/// Validate an edit instruction before any state mutation or network call.
///
/// Returns the trimmed instruction on success. Rejects instructions that are
/// blank after trimming or exceed [`MAX_INSTRUCTION_LENGTH`] characters.
pub fn validate_instruction(input: &str) -> Result<&str, CoreError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Edit instruction must not be empty".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_INSTRUCTION_LENGTH {
        return Err(CoreError::Validation(format!(
            "Edit instruction must not exceed {MAX_INSTRUCTION_LENGTH} characters"
        )));
    }
    Ok(trimmed)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
