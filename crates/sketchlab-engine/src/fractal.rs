//! Recursive fractal-branch rendering.
//!
//! [`FractalRenderer`] draws a binary tree of shrinking, rotated squares (or
//! diagonal strokes in lines-only mode). Each node:
//!
//! 1. Stops if its size is at or below [`FractalStyle::min_size`].
//! 2. Opens a save/restore scope and paints itself centered on the local
//!    origin.
//! 3. Moves to the top branch (`(±size/2, -size)`, rotated `±45°`) and
//!    recurses with `size * sqrt(2)/2`, then closes the scope.
//! 4. From the restored transform, moves to the bottom branch
//!    (`(±size/2, +size)`, rotated `∓45°`) and recurses *without* a scope of
//!    its own. Cleanup of the bottom chain is left to the enclosing scope.
//!
//! Step 4 is deliberately asymmetric. The bottom branch is placed relative to
//! the node's own transform, and the transforms it applies are only undone
//! when some ancestor's top-branch scope (or the outer scope opened by
//! [`FractalRenderer::render`]) closes.
//!
//! # Example
//!
//! ```
//! use sketchlab_canvas::prelude::*;
//! use sketchlab_engine::direction::RngDirections;
//! use sketchlab_engine::fractal::{levels_for, FractalRenderer};
//!
//! let mut surface = RecordingSurface::new();
//! let renderer = FractalRenderer::squares();
//! let stats = renderer.render(&mut surface, 100.0, &mut RngDirections::seeded(3));
//!
//! assert_eq!(stats.max_level, levels_for(100.0, 4.0));
//! assert_eq!(surface.fill_count(), stats.nodes);
//! assert_eq!(surface.transform(), Transform2D::IDENTITY);
//! ```

use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_4};

use serde::{Deserialize, Serialize};
use sketchlab_canvas::color::Rgba;
use sketchlab_canvas::surface::{DrawingSurface, ScopedSurface};

use crate::direction::{Direction, DirectionSource};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Child size ratio: each level is `sqrt(2)/2` of its parent.
pub const BRANCH_SCALE: f64 = FRAC_1_SQRT_2;

/// Branch rotation: 45 degrees.
pub const BRANCH_ANGLE: f64 = FRAC_PI_4;

/// [`make_fractal`](FractalRenderer::make_fractal) draws the root at this
/// fraction of the requested size.
pub const ROOT_SCALE: f64 = 0.75;

/// Pink used for small nodes: `rgb(255, 91, 157)`.
pub const BUBBLEGUM: Rgba = Rgba::opaque(255, 91, 157);

/// Pale green used for large nodes: `rgb(210, 255, 242)`.
pub const SEAFOAM: Rgba = Rgba::opaque(210, 255, 242);

/// Size of a child node.
#[inline]
pub fn scale_down(size: f64) -> f64 {
    size * BRANCH_SCALE
}

/// Number of tree levels that get painted for a root of `root_size`, i.e.
/// how many times the size can be scaled down while staying above
/// `min_size`.
///
/// Every root-to-leaf path has exactly this length, so the tree has
/// `2^levels - 1` painted nodes.
pub fn levels_for(root_size: f64, min_size: f64) -> usize {
    if !root_size.is_finite() {
        return 0;
    }
    let mut levels = 0;
    let mut size = root_size;
    while size > min_size {
        levels += 1;
        size = scale_down(size);
    }
    levels
}

/// Painted node count for a root of `root_size`: `2^levels - 1`.
pub fn node_count_for(root_size: f64, min_size: f64) -> usize {
    let levels = levels_for(root_size, min_size) as u32;
    2usize.saturating_pow(levels) - 1
}

// ---------------------------------------------------------------------------
// FractalStyle
// ---------------------------------------------------------------------------

/// Colors and thresholds for fractal nodes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FractalStyle {
    /// Color for nodes with `size <= small_threshold`.
    pub small_color: Rgba,
    /// Color for nodes with `size > small_threshold`.
    pub large_color: Rgba,
    /// Size at or below which a node counts as small.
    pub small_threshold: f64,
    /// Nodes at or below this size are not drawn and end the recursion.
    pub min_size: f64,
    /// Stroke color for lines-only mode, independent of node size.
    pub line_color: Rgba,
}

impl FractalStyle {
    /// The color a node of `size` is painted with.
    pub fn color_for(&self, size: f64) -> Rgba {
        if size <= self.small_threshold {
            self.small_color
        } else {
            self.large_color
        }
    }
}

impl Default for FractalStyle {
    /// Bubblegum at full opacity for small nodes, seafoam at 70% for large
    /// ones, small below 25px, stop at 4px, gray lines.
    fn default() -> Self {
        Self {
            small_color: BUBBLEGUM,
            large_color: SEAFOAM.with_alpha(0.7),
            small_threshold: 25.0,
            min_size: 4.0,
            line_color: Rgba::GRAY,
        }
    }
}

// ---------------------------------------------------------------------------
// RenderStats
// ---------------------------------------------------------------------------

/// Summary of one render pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderStats {
    /// Nodes painted.
    pub nodes: usize,
    /// Deepest painted level (root is level 1, 0 if nothing was painted).
    pub max_level: usize,
    /// Size of the smallest painted node (0 if nothing was painted).
    pub smallest: f64,
    /// Size of the largest painted node (0 if nothing was painted).
    pub largest: f64,
}

impl RenderStats {
    fn record(&mut self, size: f64, level: usize) {
        if self.nodes == 0 {
            self.smallest = size;
            self.largest = size;
        } else {
            self.smallest = self.smallest.min(size);
            self.largest = self.largest.max(size);
        }
        self.nodes += 1;
        self.max_level = self.max_level.max(level);
    }

    /// Fold another pass into this one.
    pub fn merge(&mut self, other: &RenderStats) {
        if other.nodes == 0 {
            return;
        }
        if self.nodes == 0 {
            *self = *other;
            return;
        }
        self.nodes += other.nodes;
        self.max_level = self.max_level.max(other.max_level);
        self.smallest = self.smallest.min(other.smallest);
        self.largest = self.largest.max(other.largest);
    }
}

// ---------------------------------------------------------------------------
// Branch
// ---------------------------------------------------------------------------

/// Recursion parameters for one node.
#[derive(Debug, Clone, Copy)]
struct Branch {
    size: f64,
    top: Direction,
    bottom: Direction,
    level: usize,
}

impl Branch {
    /// A node of `size` at `level` with two fresh directions (top first).
    fn sample<D: DirectionSource + ?Sized>(size: f64, level: usize, directions: &mut D) -> Self {
        let top = directions.next_direction();
        let bottom = directions.next_direction();
        Self {
            size,
            top,
            bottom,
            level,
        }
    }
}

// ---------------------------------------------------------------------------
// FractalRenderer
// ---------------------------------------------------------------------------

/// Draws randomized fractal branch trees onto a [`DrawingSurface`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FractalRenderer {
    /// Stroke diagonals instead of filling squares.
    pub only_lines: bool,
    /// Colors and thresholds.
    pub style: FractalStyle,
}

impl FractalRenderer {
    pub fn new(only_lines: bool, style: FractalStyle) -> Self {
        Self { only_lines, style }
    }

    /// Filled squares with the default style.
    pub fn squares() -> Self {
        Self::new(false, FractalStyle::default())
    }

    /// Diagonal strokes with the default style.
    pub fn lines() -> Self {
        Self::new(true, FractalStyle::default())
    }

    /// Render a tree whose root node has side `root_size`, centered on the
    /// surface's current origin.
    ///
    /// The root's two directions are drawn from `directions` first, then each
    /// node draws two for each child in depth-first order (top subtree before
    /// bottom subtree).
    ///
    /// The surface's transform, colors, and stack depth are the same after
    /// the call as before it. A root at or below the minimum size paints
    /// nothing and touches no surface state.
    pub fn render<S, D>(&self, surface: &mut S, root_size: f64, directions: &mut D) -> RenderStats
    where
        S: DrawingSurface + ?Sized,
        D: DirectionSource + ?Sized,
    {
        let mut stats = RenderStats::default();
        if !root_size.is_finite() || root_size <= self.style.min_size {
            tracing::trace!(root_size, "fractal root below minimum size -- nothing to draw");
            return stats;
        }

        let root = Branch::sample(root_size, 1, directions);
        let mut scope = ScopedSurface::new(surface);
        self.grow(&mut *scope, root, directions, &mut stats);
        scope.finish();

        tracing::trace!(
            root_size,
            nodes = stats.nodes,
            levels = stats.max_level,
            "fractal rendered"
        );
        stats
    }

    /// Lab entry point: render a tree with its root at
    /// [`ROOT_SCALE`] of `size`.
    pub fn make_fractal<S, D>(&self, surface: &mut S, size: f64, directions: &mut D) -> RenderStats
    where
        S: DrawingSurface + ?Sized,
        D: DirectionSource + ?Sized,
    {
        self.render(surface, size * ROOT_SCALE, directions)
    }

    fn grow<S, D>(&self, surface: &mut S, node: Branch, directions: &mut D, stats: &mut RenderStats)
    where
        S: DrawingSurface + ?Sized,
        D: DirectionSource + ?Sized,
    {
        let size = node.size;
        if size <= self.style.min_size {
            return;
        }

        let branch_size = scale_down(size);
        let half = size / 2.0;

        {
            let mut scope = ScopedSurface::new(&mut *surface);
            self.paint_node(&mut *scope, size);
            stats.record(size, node.level);

            // Top branch leans toward its direction and rotates the same way.
            let sign = node.top.sign();
            scope.translate(sign * half, -size);
            scope.rotate(sign * BRANCH_ANGLE);

            let child = Branch::sample(branch_size, node.level + 1, directions);
            self.grow(&mut *scope, child, directions, stats);
        }

        // Bottom branch rotates against its direction and is not scoped.
        let sign = node.bottom.sign();
        surface.translate(sign * half, size);
        surface.rotate(-sign * BRANCH_ANGLE);

        let child = Branch::sample(branch_size, node.level + 1, directions);
        self.grow(surface, child, directions, stats);
    }

    fn paint_node<S: DrawingSurface + ?Sized>(&self, surface: &mut S, size: f64) {
        let half = size / 2.0;
        // Fill follows the size threshold in both modes; lines ignore it.
        surface.set_fill_color(self.style.color_for(size));
        if self.only_lines {
            surface.set_stroke_color(self.style.line_color);
            surface.stroke_line(-half, -half, size, size);
        } else {
            surface.fill_rect(-half, -half, size, size);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
