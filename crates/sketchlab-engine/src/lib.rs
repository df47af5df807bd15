//! Sketchlab Engine -- randomized fractal-branch drawings on a 2D surface.
//!
//! This crate builds on [`sketchlab_canvas`] to provide the drawing logic:
//! the recursive [`FractalRenderer`](fractal::FractalRenderer), the
//! [`DirectionSource`](direction::DirectionSource)s that decide which way
//! each branch leans, and the [`Lab`](lab::Lab) drivers that lay fractals out
//! on a canvas.
//!
//! # Quick Start
//!
//! ```
//! use sketchlab_engine::prelude::*;
//!
//! let mut surface = RecordingSurface::new();
//! let mut directions = RngDirections::seeded(42);
//!
//! let stats = FractalRenderer::squares().render(&mut surface, 500.0, &mut directions);
//! assert_eq!(stats.nodes, node_count_for(500.0, 4.0));
//! assert_eq!(surface.depth(), 0);
//! ```

#![deny(unsafe_code)]

pub mod direction;
pub mod fractal;
pub mod lab;
pub mod render;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

/// Re-export the canvas crate for convenience.
pub use sketchlab_canvas;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced by lab configuration and drawing.
#[derive(Debug, thiserror::Error)]
pub enum LabError {
    /// A config field is out of range.
    #[error("invalid lab config: '{field}' {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// A config document could not be parsed.
    #[error("failed to parse lab config: {details}")]
    ConfigParse { details: String },

    /// A lab name did not match any known layout.
    #[error("unknown lab '{name}'. Known labs: [centered, tiled]")]
    UnknownLab { name: String },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common engine usage.
pub mod prelude {
    // Re-export everything from the canvas prelude.
    pub use sketchlab_canvas::prelude::*;

    pub use crate::direction::{
        ConstantDirections, Direction, DirectionSource, RngDirections, ScriptedDirections,
    };
    pub use crate::fractal::{
        levels_for, node_count_for, scale_down, FractalRenderer, FractalStyle, RenderStats,
        BRANCH_ANGLE, BRANCH_SCALE, ROOT_SCALE,
    };
    pub use crate::lab::{Lab, LabConfig, LabRun, LabSummary};
    pub use crate::LabError;
}
