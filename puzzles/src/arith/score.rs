//! Reward scoring for 24-point responses.
//!
//! Answers are pulled out of cleaned response text, evaluated, and checked
//! against both the target value and the numbers actually consumed: an
//! expression that hits 24 with the wrong numbers is not correct. The
//! format component depends only on response structure.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::arith::eval::evaluate;
use crate::response::{clean_response, unique_marker_share};
use crate::types::{ExtractionMode, ScoreBreakdown};

/// Tuning parameters for the 24-point scorer.
#[derive(Debug, Clone, Copy)]
pub struct ArithScoreParams {
    /// Target value answers are checked against.
    pub target: f64,
    /// Multiplier for a fully correct answer.
    pub answer_weight: f64,
    /// Multiplier for the format component and for partial usage credit.
    pub format_weight: f64,
    /// Weight applied to correct answers when the stored ground truth is 0
    /// (no solution exists).
    pub no_solution_weight: f64,
    /// Numeric tolerance when comparing values.
    pub tolerance: f64,
}

impl Default for ArithScoreParams {
    fn default() -> Self {
        Self {
            target: 24.0,
            answer_weight: 1.0,
            format_weight: 0.4,
            no_solution_weight: 0.7,
            tolerance: 1e-6,
        }
    }
}

const MARKERS: [&str; 3] = ["<think>", "</think>", "the answer is"];

static STRUCTURE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<think>.+</think>.+the answer is(\s*no solution|[()+\-*/0-9\s]+).?$")
        .expect("structure pattern compiles")
});

static TIMES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\times|×|x").expect("times pattern compiles"));

static DIV_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\div").expect("div pattern compiles"));

static STRICT_ANSWER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"the answer is\s*no solution|the answer is[()+\-*/=0-9\s]+")
        .expect("strict answer pattern compiles")
});

static FLEXIBLE_ANSWER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[()+\-*/=0-9\s]+|no solution").expect("flexible answer pattern compiles")
});

static REDUNDANT_TARGET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"=\s*24|24\s*=").expect("redundant target pattern compiles"));

static INTEGER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("integer pattern compiles"));

/// An answer extracted from response text.
#[derive(Debug, Clone, PartialEq)]
enum Answer {
    /// The literal `no solution` claim.
    NoSolution,
    /// A numerically evaluable expression.
    Value { value: f64, text: String },
}

/// Score a model response against the stored ground-truth value.
///
/// `ground_truth` is the generator's result for `source_numbers`: the
/// target (24) when reachable, 0 when not. Full credit requires hitting
/// the target or ground truth *and* consuming exactly the source numbers;
/// otherwise partial credit follows usage fidelity.
pub fn compute_score(
    response: &str,
    ground_truth: f64,
    source_numbers: &[i64],
    mode: ExtractionMode,
    params: &ArithScoreParams,
) -> ScoreBreakdown {
    let canonical = canonicalize(&clean_response(response));
    let answer = extract_answer(&canonical, mode);
    debug!(answer = ?answer, "extracted answer");

    let format_component = format_score(&canonical);
    let required = source_numbers.len();
    let truth_is_no_solution = ground_truth.abs() < params.tolerance;

    let (answer_component, correctness) = match &answer {
        None => (0.0, 0.0),
        Some(Answer::NoSolution) => {
            if truth_is_no_solution {
                (
                    params.no_solution_weight * params.answer_weight,
                    params.answer_weight,
                )
            } else {
                (0.0, 0.0)
            }
        }
        Some(Answer::Value { value, text }) => {
            let (matched, errors) = usage_fidelity(text, source_numbers);
            let on_target = (value - params.target).abs() < params.tolerance
                || (value - ground_truth).abs() < params.tolerance;
            if on_target && matched == required && errors == 0 {
                let weight = if truth_is_no_solution {
                    params.no_solution_weight
                } else {
                    1.0
                };
                (weight * params.answer_weight, params.answer_weight)
            } else if required == 0 {
                (0.0, 0.0)
            } else {
                let fidelity = matched.saturating_sub(errors) as f64;
                (fidelity / required as f64 * params.format_weight, 0.0)
            }
        }
    };

    ScoreBreakdown {
        total: answer_component + format_component * params.format_weight,
        correctness,
        format: format_component * params.format_weight,
    }
}

/// Normalize operator spellings after role-marker cleaning.
///
/// `\times`, `×`, and bare `x` become `*`; `\div` becomes `/`; leftover
/// escape backslashes are dropped.
fn canonicalize(cleaned: &str) -> String {
    let text = TIMES_RE.replace_all(cleaned, "*");
    let text = DIV_RE.replace_all(&text, "/");
    text.replace('\\', "")
}

/// Pull the final answer out of canonicalized response text.
fn extract_answer(text: &str, mode: ExtractionMode) -> Option<Answer> {
    match mode {
        ExtractionMode::Strict => {
            // The last `the answer is` occurrence wins.
            let found = STRICT_ANSWER_RE.find_iter(text).last()?;
            let fragment = REDUNDANT_TARGET_RE.replace_all(found.as_str(), "");
            let candidate = fragment.split("the answer is").nth(1)?.trim().to_string();
            validate(&candidate)
        }
        ExtractionMode::Flexible => {
            // Scan expression-looking fragments from the end of the text.
            let found: Vec<_> = FLEXIBLE_ANSWER_RE.find_iter(text).collect();
            for m in found.iter().rev() {
                let fragment = REDUNDANT_TARGET_RE.replace_all(m.as_str(), "");
                let candidate = fragment.trim();
                if candidate.is_empty() || candidate == "." {
                    continue;
                }
                if let Some(answer) = validate(candidate) {
                    return Some(answer);
                }
            }
            None
        }
    }
}

/// An answer that does not evaluate is absent, not zero.
fn validate(candidate: &str) -> Option<Answer> {
    if candidate == "no solution" {
        return Some(Answer::NoSolution);
    }
    evaluate(candidate).map(|value| Answer::Value {
        value,
        text: candidate.to_string(),
    })
}

/// Greedy match of the answer's integer literals against the source
/// multiset, both sorted. Returns `(matched, errors)`: literals with no
/// matching source number count as errors, as do unmatched leftovers.
fn usage_fidelity(expression: &str, source: &[i64]) -> (usize, usize) {
    let mut literals: Vec<i64> = INTEGER_RE
        .find_iter(expression)
        .filter_map(|m| m.as_str().parse().ok())
        .collect();
    literals.sort_unstable();
    let mut wanted = source.to_vec();
    wanted.sort_unstable();

    let mut matched = 0usize;
    let mut errors = 0usize;
    let mut idx = 0usize;
    for &n in &wanted {
        while idx < literals.len() && literals[idx] < n {
            idx += 1;
            errors += 1;
        }
        if idx < literals.len() && literals[idx] == n {
            matched += 1;
            idx += 1;
        }
    }
    errors += literals.len() - idx;
    (matched, errors)
}

/// Structural format component in `[0, 1]`.
///
/// Half the weight rewards the `<think>…</think>…the answer is …` shape;
/// the rest is split across the three markers each occurring exactly once.
fn format_score(text: &str) -> f64 {
    let structural = if STRUCTURE_RE.is_match(text) { 0.5 } else { 0.0 };
    structural + 0.5 * unique_marker_share(text, &MARKERS)
}
