//! Window viewer for recorded scenes.
//!
//! This module is feature-gated behind `renderer`. When the feature is not
//! enabled, this module compiles to nothing. The viewer takes a
//! [`Scene`](sketchlab_canvas::scene::Scene) recorded by a lab run and draws
//! its rects and lines with wgpu in a winit window.

#[cfg(feature = "renderer")]
pub mod app;
#[cfg(feature = "renderer")]
pub mod renderer;

#[cfg(feature = "renderer")]
pub use app::run_windowed;
#[cfg(feature = "renderer")]
pub use renderer::{Camera2D, SceneRenderer, Vertex};
