//! Brand constraint configuration for icon generation.
//!
//! A fixed configuration record sent with every generate call so all root
//! artifacts share the same grid, stroke width, and rendering style. Field
//! names serialize in camelCase to match the engine's wire format.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Default icon grid size in pixels.
pub const DEFAULT_GRID: u32 = 24;

/// Default stroke width in grid units.
pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Rendering style for generated icons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconStyle {
    Outline,
    Filled,
}

impl FromStr for IconStyle {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "outline" => Ok(IconStyle::Outline),
            "filled" => Ok(IconStyle::Filled),
            other => Err(CoreError::Validation(format!(
                "Invalid icon style '{other}'. Must be one of: outline, filled"
            ))),
        }
    }
}

/// Constraints applied to every generated root icon.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandConstraints {
    /// Icon grid size in pixels.
    pub grid: u32,
    /// Stroke width in grid units.
    pub stroke_width: f64,
    /// Outline or filled rendering.
    pub style: IconStyle,
}

impl Default for BrandConstraints {
    fn default() -> Self {
        Self {
            grid: DEFAULT_GRID,
            stroke_width: DEFAULT_STROKE_WIDTH,
            style: IconStyle::Outline,
        }
    }
}

impl BrandConstraints {
    /// Validate that the constraint values are usable.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.grid == 0 {
            return Err(CoreError::Validation(
                "Brand grid size must be positive".to_string(),
            ));
        }
        if self.stroke_width <= 0.0 {
            return Err(CoreError::Validation(
                "Brand stroke width must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
