//! 24-point arithmetic puzzle: enumeration, evaluation, and scoring.
//!
//! The [`solver`] decides whether a number multiset can reach the target
//! with `+ - * /` and extracts a witness expression; [`eval`] evaluates
//! candidate expressions found in responses; [`score`] grades free-form
//! model output against the stored ground truth.

pub mod eval;
pub mod score;
pub mod solver;

pub use eval::evaluate;
pub use score::{ArithScoreParams, compute_score};
pub use solver::{Derivation, EnumerationLimits, solve};
