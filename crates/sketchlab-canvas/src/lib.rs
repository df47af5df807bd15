//! Sketchlab Canvas -- a minimal 2D drawing-surface abstraction.
//!
//! This crate provides the paint target the lab drawing code renders into:
//! the [`DrawingSurface`](surface::DrawingSurface) capability trait (state
//! stack, translate/rotate, fill rect, stroke line), an RAII
//! [`ScopedSurface`](surface::ScopedSurface) guard for save/restore pairs, a
//! headless [`RecordingSurface`](recording::RecordingSurface) that captures
//! paint calls with their transforms, and a serializable
//! [`Scene`](scene::Scene) with a BLAKE3 digest.
//!
//! # Quick Start
//!
//! ```
//! use sketchlab_canvas::prelude::*;
//!
//! let mut surface = RecordingSurface::new();
//! surface.translate(100.0, 100.0);
//! surface.set_fill_color(Rgba::new(255, 91, 157, 1.0));
//! surface.fill_rect(-10.0, -10.0, 20.0, 20.0);
//!
//! let call = &surface.calls()[0];
//! assert_eq!(call.canvas_points()[0], Point::new(90.0, 90.0));
//! ```

#![deny(unsafe_code)]

pub mod color;
pub mod recording;
pub mod scene;
pub mod surface;
pub mod transform;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced by canvas operations.
#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    /// A scene could not be serialized.
    #[error("failed to serialize scene: {details}")]
    Serialization { details: String },

    /// A scene could not be parsed.
    #[error("failed to deserialize scene: {details}")]
    Deserialization { details: String },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::color::Rgba;
    pub use crate::recording::{PaintCall, RecordingSurface, Shape, SurfaceStats};
    pub use crate::scene::Scene;
    pub use crate::surface::{DrawingSurface, ScopedSurface};
    pub use crate::transform::{Point, Transform2D};
    pub use crate::CanvasError;
}

// ---------------------------------------------------------------------------
// Integration Tests
// ---------------------------------------------------------------------------
