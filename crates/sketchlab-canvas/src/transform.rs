//! 2D affine transforms with canvas composition semantics.
//!
//! A [`Transform2D`] is the 3x2 matrix used by HTML-style 2D contexts:
//!
//! ```text
//! | a c e |
//! | b d f |
//! | 0 0 1 |
//! ```
//!
//! [`translated`](Transform2D::translated) and
//! [`rotated`](Transform2D::rotated) post-multiply, i.e. the new operation is
//! applied in the *local* coordinate system of the current transform. This is
//! what makes nested translate/rotate sequences build up a branch tree.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Point
// ---------------------------------------------------------------------------

/// A point in 2D space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

// ---------------------------------------------------------------------------
// Transform2D
// ---------------------------------------------------------------------------

/// A 2D affine transform in canvas `(a, b, c, d, e, f)` form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Transform2D {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    /// A pure translation.
    pub fn translation(tx: f64, ty: f64) -> Self {
        Self::IDENTITY.translated(tx, ty)
    }

    /// A pure rotation by `radians` (clockwise on a y-down canvas).
    pub fn rotation(radians: f64) -> Self {
        Self::IDENTITY.rotated(radians)
    }

    /// Post-multiply by a translation of `(tx, ty)` in local coordinates.
    #[must_use]
    pub fn translated(self, tx: f64, ty: f64) -> Self {
        Self {
            e: self.a * tx + self.c * ty + self.e,
            f: self.b * tx + self.d * ty + self.f,
            ..self
        }
    }

    /// Post-multiply by a rotation of `radians` in local coordinates.
    #[must_use]
    pub fn rotated(self, radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self {
            a: self.a * cos + self.c * sin,
            b: self.b * cos + self.d * sin,
            c: self.c * cos - self.a * sin,
            d: self.d * cos - self.b * sin,
            ..self
        }
    }

    /// Compose `self * other`: `other` is applied first, then `self`.
    #[must_use]
    pub fn then(self, other: Transform2D) -> Self {
        Self {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    /// Map a local point into the parent coordinate system.
    #[inline]
    pub fn apply(&self, p: Point) -> Point {
        Point {
            x: self.a * p.x + self.c * p.y + self.e,
            y: self.b * p.x + self.d * p.y + self.f,
        }
    }

    /// Rotation angle encoded in the linear part, in radians.
    pub fn angle(&self) -> f64 {
        self.b.atan2(self.a)
    }

    /// The translation component `(e, f)`.
    pub fn offset(&self) -> Point {
        Point::new(self.e, self.f)
    }

    /// Component-wise comparison within `epsilon`.
    pub fn approx_eq(&self, other: &Transform2D, epsilon: f64) -> bool {
        (self.a - other.a).abs() <= epsilon
            && (self.b - other.b).abs() <= epsilon
            && (self.c - other.c).abs() <= epsilon
            && (self.d - other.d).abs() <= epsilon
            && (self.e - other.e).abs() <= epsilon
            && (self.f - other.f).abs() <= epsilon
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
