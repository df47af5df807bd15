//! A headless [`DrawingSurface`] that records every paint call.
//!
//! [`RecordingSurface`] keeps the same state stack a real canvas keeps
//! (transform plus fill/stroke colors) and appends a [`PaintCall`] for each
//! `fill_rect` / `stroke_line`. Each call carries its local geometry together
//! with the transform that was active, so canvas-space coordinates can be
//! recovered with [`PaintCall::canvas_points`].
//!
//! It also counts stack traffic in [`SurfaceStats`], which is how tests check
//! that drawing code leaves the stack balanced.

use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::surface::DrawingSurface;
use crate::transform::{Point, Transform2D};

// ---------------------------------------------------------------------------
// Shape / PaintCall
// ---------------------------------------------------------------------------

/// Local-space geometry of a paint primitive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Filled rectangle with top-left corner `(x, y)`.
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    /// Stroked segment.
    Line { x1: f64, y1: f64, x2: f64, y2: f64 },
}

impl Shape {
    /// Corner points in local space: four for a rect (clockwise from the
    /// top-left on a y-down canvas), two for a line.
    pub fn local_points(&self) -> Vec<Point> {
        match *self {
            Shape::Rect {
                x,
                y,
                width,
                height,
            } => vec![
                Point::new(x, y),
                Point::new(x + width, y),
                Point::new(x + width, y + height),
                Point::new(x, y + height),
            ],
            Shape::Line { x1, y1, x2, y2 } => vec![Point::new(x1, y1), Point::new(x2, y2)],
        }
    }
}

/// One recorded paint primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaintCall {
    /// Geometry in the local space of `transform`.
    pub shape: Shape,
    /// Transform active when the call was made.
    pub transform: Transform2D,
    /// Fill color for rects, stroke color for lines.
    pub color: Rgba,
    /// State-stack depth at the time of the call.
    pub depth: usize,
}

impl PaintCall {
    /// `true` for filled rectangles.
    pub fn is_fill(&self) -> bool {
        matches!(self.shape, Shape::Rect { .. })
    }

    /// `true` for stroked lines.
    pub fn is_stroke(&self) -> bool {
        matches!(self.shape, Shape::Line { .. })
    }

    /// The shape's corner points mapped to canvas space.
    pub fn canvas_points(&self) -> Vec<Point> {
        self.shape
            .local_points()
            .into_iter()
            .map(|p| self.transform.apply(p))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// SurfaceStats
// ---------------------------------------------------------------------------

/// Counters for state-stack traffic on a [`RecordingSurface`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceStats {
    /// Number of `save` calls.
    pub saves: usize,
    /// Number of `restore` calls that popped a state.
    pub restores: usize,
    /// Number of `restore` calls made with an empty stack (ignored).
    pub unmatched_restores: usize,
    /// Deepest stack depth reached.
    pub max_depth: usize,
}

// ---------------------------------------------------------------------------
// RecordingSurface
// ---------------------------------------------------------------------------

/// State pushed by `save`.
#[derive(Debug, Clone, Copy)]
struct SavedState {
    transform: Transform2D,
    fill: Rgba,
    stroke: Rgba,
}

/// A [`DrawingSurface`] that records paint calls instead of rasterizing.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    transform: Transform2D,
    fill: Rgba,
    stroke: Rgba,
    stack: Vec<SavedState>,
    calls: Vec<PaintCall>,
    stats: SurfaceStats,
}

impl RecordingSurface {
    /// An empty surface: identity transform, black fill, gray stroke.
    pub fn new() -> Self {
        Self {
            transform: Transform2D::IDENTITY,
            fill: Rgba::BLACK,
            stroke: Rgba::GRAY,
            stack: Vec::new(),
            calls: Vec::new(),
            stats: SurfaceStats::default(),
        }
    }

    /// All recorded paint calls, in call order.
    pub fn calls(&self) -> &[PaintCall] {
        &self.calls
    }

    /// Take the recorded calls, leaving the surface state untouched.
    pub fn take_calls(&mut self) -> Vec<PaintCall> {
        std::mem::take(&mut self.calls)
    }

    /// Stack traffic counters.
    pub fn stats(&self) -> SurfaceStats {
        self.stats
    }

    /// Number of recorded filled rectangles.
    pub fn fill_count(&self) -> usize {
        self.calls.iter().filter(|c| c.is_fill()).count()
    }

    /// Number of recorded stroked lines.
    pub fn stroke_count(&self) -> usize {
        self.calls.iter().filter(|c| c.is_stroke()).count()
    }

    /// Current fill color.
    pub fn fill_color(&self) -> Rgba {
        self.fill
    }

    /// Current stroke color.
    pub fn stroke_color(&self) -> Rgba {
        self.stroke
    }

    /// Clear recorded calls, counters, and state back to [`new`](Self::new).
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn record(&mut self, shape: Shape, color: Rgba) {
        self.calls.push(PaintCall {
            shape,
            transform: self.transform,
            color,
            depth: self.stack.len(),
        });
    }
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawingSurface for RecordingSurface {
    fn save(&mut self) {
        self.stack.push(SavedState {
            transform: self.transform,
            fill: self.fill,
            stroke: self.stroke,
        });
        self.stats.saves += 1;
        self.stats.max_depth = self.stats.max_depth.max(self.stack.len());
    }

    fn restore(&mut self) {
        match self.stack.pop() {
            Some(state) => {
                self.transform = state.transform;
                self.fill = state.fill;
                self.stroke = state.stroke;
                self.stats.restores += 1;
            }
            None => {
                self.stats.unmatched_restores += 1;
                tracing::warn!(
                    unmatched = self.stats.unmatched_restores,
                    "restore called with an empty state stack -- ignored"
                );
            }
        }
    }

    fn translate(&mut self, tx: f64, ty: f64) {
        self.transform = self.transform.translated(tx, ty);
    }

    fn rotate(&mut self, radians: f64) {
        self.transform = self.transform.rotated(radians);
    }

    fn set_fill_color(&mut self, color: Rgba) {
        self.fill = color;
    }

    fn set_stroke_color(&mut self, color: Rgba) {
        self.stroke = color;
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let color = self.fill;
        self.record(
            Shape::Rect {
                x,
                y,
                width,
                height,
            },
            color,
        );
    }

    fn stroke_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        let color = self.stroke;
        self.record(Shape::Line { x1, y1, x2, y2 }, color);
    }

    fn depth(&self) -> usize {
        self.stack.len()
    }

    fn transform(&self) -> Transform2D {
        self.transform
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
