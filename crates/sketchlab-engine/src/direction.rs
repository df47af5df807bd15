//! Left/right branch directions and the sources that produce them.
//!
//! Every fractal node consumes two directions (top branch, then bottom
//! branch) for each of its children. Directions come from a
//! [`DirectionSource`] so that interactive runs can flip real coins while
//! tests replay a fixed script.
//!
//! ```
//! use sketchlab_engine::direction::{Direction, DirectionSource, RngDirections};
//!
//! let mut a = RngDirections::seeded(42);
//! let mut b = RngDirections::seeded(42);
//! let seq_a: Vec<Direction> = (0..16).map(|_| a.next_direction()).collect();
//! let seq_b: Vec<Direction> = (0..16).map(|_| b.next_direction()).collect();
//! assert_eq!(seq_a, seq_b);
//! ```

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// Which way a branch leans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// `+1.0` for [`Right`](Self::Right), `-1.0` for [`Left`](Self::Left).
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }

    /// The other direction.
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

// ---------------------------------------------------------------------------
// DirectionSource
// ---------------------------------------------------------------------------

/// A stream of branch directions.
pub trait DirectionSource {
    /// Draw the next direction.
    fn next_direction(&mut self) -> Direction;
}

impl<D: DirectionSource + ?Sized> DirectionSource for Box<D> {
    fn next_direction(&mut self) -> Direction {
        (**self).next_direction()
    }
}

// ---------------------------------------------------------------------------
// RngDirections
// ---------------------------------------------------------------------------

/// Uniform coin flips from any [`rand`] generator.
#[derive(Debug, Clone)]
pub struct RngDirections<R> {
    rng: R,
}

impl<R: Rng> RngDirections<R> {
    /// Wrap an existing generator.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Give the generator back.
    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl RngDirections<Pcg32> {
    /// A reproducible source seeded from `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self::new(Pcg32::seed_from_u64(seed))
    }

    /// A source seeded from operating-system entropy.
    pub fn from_entropy() -> Self {
        Self::new(Pcg32::from_entropy())
    }
}

impl<R: Rng> DirectionSource for RngDirections<R> {
    fn next_direction(&mut self) -> Direction {
        if self.rng.gen_bool(0.5) {
            Direction::Right
        } else {
            Direction::Left
        }
    }
}

// ---------------------------------------------------------------------------
// ScriptedDirections
// ---------------------------------------------------------------------------

/// Replays a fixed sequence of directions, cycling when it runs out.
///
/// An empty script always yields [`Direction::Left`].
#[derive(Debug, Clone, Default)]
pub struct ScriptedDirections {
    script: Vec<Direction>,
    cursor: usize,
    drawn: usize,
}

impl ScriptedDirections {
    pub fn new(script: impl Into<Vec<Direction>>) -> Self {
        Self {
            script: script.into(),
            cursor: 0,
            drawn: 0,
        }
    }

    /// How many directions have been drawn so far.
    pub fn drawn(&self) -> usize {
        self.drawn
    }
}

impl DirectionSource for ScriptedDirections {
    fn next_direction(&mut self) -> Direction {
        self.drawn += 1;
        if self.script.is_empty() {
            return Direction::Left;
        }
        let dir = self.script[self.cursor];
        self.cursor = (self.cursor + 1) % self.script.len();
        dir
    }
}

// ---------------------------------------------------------------------------
// ConstantDirections
// ---------------------------------------------------------------------------

/// Always returns the same direction.
#[derive(Debug, Clone, Copy)]
pub struct ConstantDirections(pub Direction);

impl DirectionSource for ConstantDirections {
    fn next_direction(&mut self) -> Direction {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_and_flip() {
        assert_eq!(Direction::Left.sign(), -1.0);
        assert_eq!(Direction::Right.sign(), 1.0);
        assert_eq!(Direction::Left.flipped(), Direction::Right);
    }

    #[test]
    fn scripted_cycles_and_counts() {
        let mut s = ScriptedDirections::new([Direction::Right, Direction::Left]);
        let got: Vec<_> = (0..5).map(|_| s.next_direction()).collect();
        assert_eq!(
            got,
            [
                Direction::Right,
                Direction::Left,
                Direction::Right,
                Direction::Left,
                Direction::Right
            ]
        );
        assert_eq!(s.drawn(), 5);
    }

    #[test]
    fn empty_script_yields_left() {
        let mut s = ScriptedDirections::default();
        assert_eq!(s.next_direction(), Direction::Left);
    }

    #[test]
    fn seeded_source_produces_both_directions() {
        let mut src = RngDirections::seeded(7);
        let rights = (0..1000)
            .filter(|_| src.next_direction() == Direction::Right)
            .count();
        // Fair coin: well inside 1000 * (0.5 +/- 0.1).
        assert!((400..=600).contains(&rights), "got {rights} rights");
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = RngDirections::seeded(1);
        let mut b = RngDirections::seeded(2);
        let seq_a: Vec<_> = (0..64).map(|_| a.next_direction()).collect();
        let seq_b: Vec<_> = (0..64).map(|_| b.next_direction()).collect();
        assert_ne!(seq_a, seq_b);
    }

    #[test]
    fn boxed_source_delegates() {
        let mut boxed: Box<dyn DirectionSource> = Box::new(ConstantDirections(Direction::Right));
        assert_eq!(boxed.next_direction(), Direction::Right);
    }
}
