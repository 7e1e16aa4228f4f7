//! Pure puzzle logic for dataset generation and rule-based reward scoring.
//!
//! Two puzzle families are supported: the sliding-tile n-puzzle
//! ([`sliding`]) and the 24-point arithmetic game ([`arith`]). Each family
//! provides a solver that produces a ground-truth reference for generated
//! instances, and a scorer that grades free-form model responses against
//! that reference.
//!
//! Everything in this crate is deterministic and I/O-free: solvers and
//! scorers are plain functions over in-memory data, so callers can
//! parallelize across instances without shared state. Malformed response
//! text never raises across the scoring boundary; it degrades to a defined
//! low score instead.

pub mod arith;
pub mod response;
pub mod sliding;
pub mod types;
