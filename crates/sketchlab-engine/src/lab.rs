//! Lab drivers: lay fractals out on a square canvas.
//!
//! Two layouts are available through [`Lab`]:
//!
//! - [`Lab::Tiled`] -- an `N x N` grid of independent fractals, each drawn
//!   inside its own save/restore scope at `(canvas/(N+1) * i, canvas/(N+1) * j)`
//!   for `i, j` in `1..=N`, sized `canvas / (N * N * sqrt(1 / intensity))`.
//! - [`Lab::Centered`] -- one large lines-only fractal at the canvas center,
//!   sized `canvas * 0.7`.
//!
//! Both go through [`FractalRenderer::make_fractal`], so the root node is
//! drawn at 3/4 of the computed size.
//!
//! # Example
//!
//! ```
//! use sketchlab_engine::lab::{Lab, LabConfig};
//!
//! let config = LabConfig { seed: Some(7), ..Default::default() };
//! let run = Lab::Tiled.run(&config).unwrap();
//! assert_eq!(run.tiles, 9);
//! assert_eq!(run.scene.len(), run.stats.nodes);
//!
//! // Same seed, same picture.
//! let again = Lab::Tiled.run(&config).unwrap();
//! assert_eq!(run.scene.digest(), again.scene.digest());
//! ```

use serde::{Deserialize, Serialize};
use sketchlab_canvas::recording::RecordingSurface;
use sketchlab_canvas::scene::Scene;
use sketchlab_canvas::surface::{DrawingSurface, ScopedSurface};

use crate::direction::{DirectionSource, RngDirections};
use crate::fractal::{FractalRenderer, FractalStyle, RenderStats};
use crate::LabError;

/// Fraction of the canvas used for the centered fractal.
pub const CENTERED_SCALE: f64 = 0.7;

/// Largest accepted grid width for the tiled layout.
pub const MAX_AREAS_PER_ROW: u32 = 64;

// ---------------------------------------------------------------------------
// LabConfig
// ---------------------------------------------------------------------------

/// Configuration for a lab run.
///
/// All fields have defaults, so a JSON document only needs to name what it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabConfig {
    /// Side length of the square canvas in pixels. Must be positive and
    /// finite.
    pub canvas_size: f64,
    /// Fractals per row (and per column) in the tiled layout. Must be at
    /// least 1.
    pub areas_per_row: u32,
    /// Density knob for the tiled layout: higher values draw larger
    /// fractals. Must be in `(0, 1]`.
    pub intensity: f64,
    /// Stroke diagonals instead of filling squares (tiled layout only).
    pub only_lines: bool,
    /// Seed for branch directions. `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Node colors and thresholds.
    pub style: FractalStyle,
}

impl Default for LabConfig {
    /// A 700px canvas with a 3x3 grid at intensity 0.5, filled squares,
    /// unseeded.
    fn default() -> Self {
        Self {
            canvas_size: 700.0,
            areas_per_row: 3,
            intensity: 0.5,
            only_lines: false,
            seed: None,
            style: FractalStyle::default(),
        }
    }
}

impl LabConfig {
    /// Parse a config from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self, LabError> {
        let config: LabConfig =
            serde_json::from_str(json).map_err(|e| LabError::ConfigParse {
                details: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field's range.
    pub fn validate(&self) -> Result<(), LabError> {
        if !self.canvas_size.is_finite() || self.canvas_size <= 0.0 {
            return Err(LabError::InvalidConfig {
                field: "canvas_size",
                reason: format!("must be positive and finite, got {}", self.canvas_size),
            });
        }
        if self.areas_per_row == 0 || self.areas_per_row > MAX_AREAS_PER_ROW {
            return Err(LabError::InvalidConfig {
                field: "areas_per_row",
                reason: format!(
                    "must be in 1..={MAX_AREAS_PER_ROW}, got {}",
                    self.areas_per_row
                ),
            });
        }
        if !(self.intensity > 0.0 && self.intensity <= 1.0) {
            return Err(LabError::InvalidConfig {
                field: "intensity",
                reason: format!("must be in (0, 1], got {}", self.intensity),
            });
        }
        if !self.style.min_size.is_finite() || self.style.min_size <= 0.0 {
            return Err(LabError::InvalidConfig {
                field: "style.min_size",
                reason: format!("must be positive and finite, got {}", self.style.min_size),
            });
        }
        if !self.style.small_threshold.is_finite() {
            return Err(LabError::InvalidConfig {
                field: "style.small_threshold",
                reason: format!("must be finite, got {}", self.style.small_threshold),
            });
        }
        Ok(())
    }

    /// Size passed to `make_fractal` for each tile of the grid.
    pub fn tile_size(&self) -> f64 {
        let n = f64::from(self.areas_per_row);
        self.canvas_size / (n * n * (1.0 / self.intensity).sqrt())
    }

    /// Canvas-space centers of the grid tiles, row-major by `i` then `j`.
    pub fn tile_centers(&self) -> impl Iterator<Item = (f64, f64)> {
        let n = self.areas_per_row;
        let step = self.canvas_size / (f64::from(n) + 1.0);
        (1..=n).flat_map(move |i| (1..=n).map(move |j| (step * f64::from(i), step * f64::from(j))))
    }

    /// A direction source for this config: seeded if `seed` is set.
    pub fn directions(&self) -> RngDirections<rand_pcg::Pcg32> {
        match self.seed {
            Some(seed) => RngDirections::seeded(seed),
            None => RngDirections::from_entropy(),
        }
    }
}

// ---------------------------------------------------------------------------
// Lab
// ---------------------------------------------------------------------------

/// Which layout to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lab {
    /// One lines-only fractal at the canvas center.
    Centered,
    /// An `N x N` grid of fractals.
    Tiled,
}

impl Lab {
    pub fn name(self) -> &'static str {
        match self {
            Lab::Centered => "centered",
            Lab::Tiled => "tiled",
        }
    }

    /// Draw this lab onto `surface`.
    ///
    /// The surface's transform and stack depth are unchanged afterwards.
    pub fn draw<S, D>(
        self,
        surface: &mut S,
        config: &LabConfig,
        directions: &mut D,
    ) -> Result<LabSummary, LabError>
    where
        S: DrawingSurface + ?Sized,
        D: DirectionSource + ?Sized,
    {
        config.validate()?;
        tracing::debug!(
            lab = self.name(),
            canvas_size = config.canvas_size,
            areas_per_row = config.areas_per_row,
            seed = ?config.seed,
            "drawing lab"
        );

        let summary = match self {
            Lab::Centered => draw_centered(surface, config, directions),
            Lab::Tiled => draw_tiled(surface, config, directions),
        };

        tracing::debug!(
            lab = self.name(),
            tiles = summary.tiles,
            nodes = summary.stats.nodes,
            "lab finished"
        );
        Ok(summary)
    }

    /// Draw this lab onto a fresh [`RecordingSurface`] with the config's own
    /// direction source and capture the result as a [`Scene`].
    pub fn run(self, config: &LabConfig) -> Result<LabRun, LabError> {
        let mut surface = RecordingSurface::new();
        let mut directions = config.directions();
        let summary = self.draw(&mut surface, config, &mut directions)?;
        let scene = Scene::capture(&surface, config.canvas_size, config.canvas_size);
        Ok(LabRun {
            lab: self,
            tiles: summary.tiles,
            stats: summary.stats,
            scene,
        })
    }
}

impl std::str::FromStr for Lab {
    type Err = LabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "centered" => Ok(Lab::Centered),
            "tiled" => Ok(Lab::Tiled),
            other => Err(LabError::UnknownLab {
                name: other.to_owned(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// What a [`Lab::draw`] call produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LabSummary {
    /// Number of fractals drawn (tiles attempted, including empty ones).
    pub tiles: usize,
    /// Combined render statistics over all tiles.
    pub stats: RenderStats,
}

/// A recorded lab run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabRun {
    pub lab: Lab,
    pub tiles: usize,
    pub stats: RenderStats,
    pub scene: Scene,
}

// ---------------------------------------------------------------------------
// Drivers
// ---------------------------------------------------------------------------

fn draw_tiled<S, D>(surface: &mut S, config: &LabConfig, directions: &mut D) -> LabSummary
where
    S: DrawingSurface + ?Sized,
    D: DirectionSource + ?Sized,
{
    let renderer = FractalRenderer::new(config.only_lines, config.style);
    let size = config.tile_size();
    let mut summary = LabSummary::default();

    for (x, y) in config.tile_centers() {
        let mut scope = ScopedSurface::new(&mut *surface);
        scope.translate(x, y);
        let stats = renderer.make_fractal(&mut *scope, size, directions);
        tracing::trace!(x, y, nodes = stats.nodes, "tile drawn");
        summary.stats.merge(&stats);
        summary.tiles += 1;
    }
    summary
}

fn draw_centered<S, D>(surface: &mut S, config: &LabConfig, directions: &mut D) -> LabSummary
where
    S: DrawingSurface + ?Sized,
    D: DirectionSource + ?Sized,
{
    let renderer = FractalRenderer::new(true, config.style);
    let half = config.canvas_size / 2.0;

    let mut scope = ScopedSurface::new(surface);
    scope.translate(half, half);
    let stats = renderer.make_fractal(&mut *scope, config.canvas_size * CENTERED_SCALE, directions);
    LabSummary { tiles: 1, stats }
}
