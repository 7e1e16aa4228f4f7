//! Reward scoring for sliding-puzzle responses.
//!
//! The proposed move path is replayed from the start grid; grading is
//! driven entirely by where the replay ends up. The format component is
//! computed from the raw response structure and is independent of the
//! answer.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::response::{clean_response, unique_marker_share};
use crate::sliding::grid::{Grid, Move};
use crate::types::{ExtractionMode, ScoreBreakdown};

/// Weights combining the answer and format components.
#[derive(Debug, Clone, Copy)]
pub struct ScoreWeights {
    /// Multiplier for the answer component.
    pub answer: f64,
    /// Multiplier for the format component.
    pub format: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            answer: 1.0,
            format: 0.4,
        }
    }
}

/// Penalty per move beyond the reference length, and its cap.
const EXCESS_MOVE_PENALTY: f64 = 0.1;
const EXCESS_PENALTY_CAP: f64 = 0.5;
/// Reward for a wrong but fully in-bounds path.
const IN_BOUNDS_CONSOLATION: f64 = 0.1;

const MARKERS: [&str; 4] = ["<think>", "</think>", "<answer>", "</answer>"];

static STRUCTURE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^<think>.+</think>.+<answer>.+</answer>$")
        .expect("structure pattern compiles")
});

static STRICT_ANSWER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<answer>((?:left|right|up|down|-|\s)+)</answer>")
        .expect("strict answer pattern compiles")
});

static FLEXIBLE_ANSWER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:left|right|up|down|-|\s)+").expect("flexible answer pattern compiles")
});

/// Score a model response against the reference solution.
///
/// `reference` is the generator's solution path; only its length matters,
/// as the anchor for the excess-move penalty. `correctness` in the result
/// is the unweighted strict replay outcome regardless of `mode`.
pub fn compute_score(
    response: &str,
    reference: &[Move],
    start: &Grid,
    goal: &Grid,
    mode: ExtractionMode,
    weights: &ScoreWeights,
) -> ScoreBreakdown {
    let cleaned = clean_response(response);
    let actions = extract_actions(&cleaned, mode);
    debug!(actions = actions.len(), "extracted move path");

    let format_component = format_score(&cleaned);
    let lenient = grade(start, goal, &actions, reference.len(), false);
    let strict = grade(start, goal, &actions, reference.len(), true);

    ScoreBreakdown {
        total: lenient * weights.answer + format_component * weights.format,
        correctness: strict,
        format: format_component * weights.format,
    }
}

/// Pull a move path out of cleaned response text.
///
/// Strict mode requires the `<answer>` markers; flexible mode takes the
/// first run of move words found anywhere. Separator noise (`-`, blanks)
/// is skipped rather than failing the whole answer.
fn extract_actions(cleaned: &str, mode: ExtractionMode) -> Vec<Move> {
    let fragment = match mode {
        ExtractionMode::Strict => STRICT_ANSWER_RE
            .captures(cleaned)
            .map(|caps| caps[1].to_string()),
        ExtractionMode::Flexible => FLEXIBLE_ANSWER_RE
            .find_iter(cleaned)
            .find(|m| contains_move_word(m.as_str()))
            .map(|m| m.as_str().to_string()),
    };
    let Some(fragment) = fragment else {
        return Vec::new();
    };
    fragment
        .split('-')
        .flat_map(str::split_whitespace)
        .filter_map(|token| token.parse().ok())
        .collect()
}

fn contains_move_word(text: &str) -> bool {
    ["left", "right", "up", "down"]
        .iter()
        .any(|word| text.contains(word))
}

/// Replay `actions` from `start` and grade the final state.
///
/// Any out-of-bounds move aborts with 0. Strict grading is binary on
/// reaching the goal; lenient grading docks `EXCESS_MOVE_PENALTY` per
/// move beyond the reference length (capped) and pays a small consolation
/// for wrong but in-bounds paths.
fn grade(start: &Grid, goal: &Grid, actions: &[Move], reference_len: usize, strict: bool) -> f64 {
    let mut grid = start.clone();
    let mut valid_moves = 0usize;
    for &mv in actions {
        match grid.apply(mv) {
            Some(next) => {
                grid = next;
                valid_moves += 1;
            }
            None => return 0.0,
        }
    }

    let solved = grid.state_key() == goal.state_key();
    if strict {
        return if solved { 1.0 } else { 0.0 };
    }
    if solved {
        let excess = valid_moves.saturating_sub(reference_len) as f64;
        1.0 - (excess * EXCESS_MOVE_PENALTY).min(EXCESS_PENALTY_CAP)
    } else {
        IN_BOUNDS_CONSOLATION
    }
}

/// Structural format component in `[0, 1]`.
///
/// Half the weight rewards the full `<think>…</think>…<answer>…</answer>`
/// shape; the rest is split across the four markers each occurring exactly
/// once.
fn format_score(cleaned: &str) -> f64 {
    let structural = if STRUCTURE_RE.is_match(cleaned) { 0.5 } else { 0.0 };
    structural + 0.5 * unique_marker_share(cleaned, &MARKERS)
}
