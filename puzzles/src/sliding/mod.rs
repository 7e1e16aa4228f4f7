//! Sliding-tile (n-puzzle) model, solver, and response scorer.
//!
//! A puzzle instance is a scrambled [`Grid`] plus the canonical goal. The
//! [`solver`] produces a reference move path for generated instances; the
//! [`score`] module replays a model's proposed path and grades it against
//! that reference.

pub mod grid;
pub mod score;
pub mod solver;

pub use grid::{Grid, Move, format_path, parse_path};
pub use score::{ScoreWeights, compute_score};
pub use solver::{SearchLimits, solve};
