//! The drawing-surface capability trait and its scoped save/restore guard.
//!
//! [`DrawingSurface`] is the minimal subset of a 2D canvas context that the
//! lab drawing code needs: a state stack (`save` / `restore`), affine
//! composition (`translate` / `rotate`), color state, and two paint
//! primitives.
//!
//! [`ScopedSurface`] pairs a `save` with a guaranteed `restore`, so a branch
//! of drawing code cannot leave the stack unbalanced even if it unwinds.
//!
//! ```
//! use sketchlab_canvas::prelude::*;
//!
//! let mut surface = RecordingSurface::new();
//! {
//!     let mut scope = ScopedSurface::new(&mut surface);
//!     scope.translate(10.0, 10.0);
//!     scope.fill_rect(0.0, 0.0, 5.0, 5.0);
//! }
//! assert_eq!(surface.depth(), 0);
//! assert_eq!(surface.transform(), Transform2D::IDENTITY);
//! ```

use std::ops::{Deref, DerefMut};

use crate::color::Rgba;
use crate::transform::Transform2D;

// ---------------------------------------------------------------------------
// DrawingSurface
// ---------------------------------------------------------------------------

/// A mutable 2D paint target with a save/restore state stack.
///
/// Saved state covers the current transform and the fill/stroke colors, as
/// on an HTML canvas. Coordinates passed to the paint primitives are in the
/// local space of the current transform.
pub trait DrawingSurface {
    /// Push the current transform and colors onto the state stack.
    fn save(&mut self);

    /// Pop the most recently saved state. A restore with nothing saved is a
    /// no-op.
    fn restore(&mut self);

    /// Translate the local coordinate system by `(tx, ty)`.
    fn translate(&mut self, tx: f64, ty: f64);

    /// Rotate the local coordinate system by `radians`.
    fn rotate(&mut self, radians: f64);

    /// Set the color used by [`fill_rect`](Self::fill_rect).
    fn set_fill_color(&mut self, color: Rgba);

    /// Set the color used by [`stroke_line`](Self::stroke_line).
    fn set_stroke_color(&mut self, color: Rgba);

    /// Fill the axis-aligned (in local space) rectangle with top-left corner
    /// `(x, y)`.
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    /// Stroke a straight segment from `(x1, y1)` to `(x2, y2)`.
    fn stroke_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64);

    /// Number of states currently on the stack.
    fn depth(&self) -> usize;

    /// The current transform.
    fn transform(&self) -> Transform2D;
}

// ---------------------------------------------------------------------------
// ScopedSurface
// ---------------------------------------------------------------------------

/// RAII guard around a `save` / `restore` pair.
///
/// Creating the guard calls [`DrawingSurface::save`]; dropping it calls
/// [`DrawingSurface::restore`]. The guard derefs to the wrapped surface, so
/// drawing calls go straight through it.
///
/// Use [`finish`](Self::finish) to close the scope at an explicit point and
/// keep drawing in the outer state.
pub struct ScopedSurface<'a, S: DrawingSurface + ?Sized> {
    surface: &'a mut S,
}

impl<'a, S: DrawingSurface + ?Sized> ScopedSurface<'a, S> {
    /// Save the surface state and open a scope.
    pub fn new(surface: &'a mut S) -> Self {
        surface.save();
        Self { surface }
    }

    /// Close the scope now, restoring the saved state.
    ///
    /// Equivalent to dropping the guard; the borrow of the surface ends here.
    pub fn finish(self) {}
}

impl<S: DrawingSurface + ?Sized> Deref for ScopedSurface<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: DrawingSurface + ?Sized> DerefMut for ScopedSurface<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: DrawingSurface + ?Sized> Drop for ScopedSurface<'_, S> {
    fn drop(&mut self) {
        self.surface.restore();
    }
}
