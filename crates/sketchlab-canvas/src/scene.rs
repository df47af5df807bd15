//! Serializable scenes with BLAKE3 content digests.
//!
//! A [`Scene`] is the output of one drawing pass: the canvas dimensions and
//! every recorded [`PaintCall`]. Scenes serialize to JSON for storage or
//! regression fixtures, and [`Scene::digest`] gives a stable content hash so
//! two passes driven by the same seed can be compared cheaply.
//!
//! ```
//! use sketchlab_canvas::prelude::*;
//!
//! let mut surface = RecordingSurface::new();
//! surface.fill_rect(0.0, 0.0, 10.0, 10.0);
//!
//! let scene = Scene::capture(&surface, 100.0, 100.0);
//! assert_eq!(scene.digest().len(), 64); // BLAKE3 hex digest
//!
//! let json = scene.to_json().unwrap();
//! let back = Scene::from_json(&json).unwrap();
//! assert_eq!(back.digest(), scene.digest());
//! ```

use serde::{Deserialize, Serialize};

use crate::recording::{PaintCall, RecordingSurface};
use crate::CanvasError;

/// The recorded output of one drawing pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Canvas width in pixels.
    pub width: f64,
    /// Canvas height in pixels.
    pub height: f64,
    /// Paint calls in the order they were issued.
    pub calls: Vec<PaintCall>,
}

impl Scene {
    /// An empty scene of the given size.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            calls: Vec::new(),
        }
    }

    /// Copy the calls recorded so far on `surface` into a new scene.
    pub fn capture(surface: &RecordingSurface, width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            calls: surface.calls().to_vec(),
        }
    }

    /// Number of paint calls.
    pub fn len(&self) -> usize {
        self.calls.len()
    }

    /// `true` if nothing was painted.
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// BLAKE3 hex digest (64 lowercase hex chars) of the scene contents.
    pub fn digest(&self) -> String {
        // Field order is fixed by the struct definition, so the byte stream
        // is stable for equal scenes.
        let bytes =
            serde_json::to_vec(self).expect("Scene should always be JSON-serializable");
        blake3::hash(&bytes).to_hex().to_string()
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, CanvasError> {
        serde_json::to_string_pretty(self).map_err(|e| CanvasError::Serialization {
            details: e.to_string(),
        })
    }

    /// Parse a scene previously produced by [`to_json`](Self::to_json).
    pub fn from_json(json: &str) -> Result<Self, CanvasError> {
        serde_json::from_str(json).map_err(|e| CanvasError::Deserialization {
            details: e.to_string(),
        })
    }
}
