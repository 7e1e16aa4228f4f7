//! 24-point dataset generation.
//!
//! Every digit multiset in range is enumerated exactly once (as its
//! non-decreasing arrangement) and handed to the expression enumerator
//! for a ground-truth verdict.

use anyhow::Result;
use tracing::debug;

use puzzles::arith::{EnumerationLimits, solve};

use crate::job::Point24Job;
use crate::prompt::PromptEngine;
use crate::record::{ExamplePayload, GenOutput, GeneratedExample, GroundTruth};

const TARGET: f64 = 24.0;
const NO_SOLUTION: &str = "no solution";

/// Generate one example per digit multiset.
pub fn generate(params: &Point24Job, prompts: &PromptEngine) -> Result<GenOutput> {
    let limits = EnumerationLimits::default();
    let mut output = GenOutput::default();

    for numbers in multisets(params.numbers, i64::from(params.digit_max)) {
        let derivation = solve(&numbers, TARGET, &limits);
        let (ground_truth, witness) = match derivation {
            Some(found) => (TARGET, found.expression),
            None => (0.0, NO_SOLUTION.to_string()),
        };
        let question = numbers
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let prompt = prompts.render_point24(&numbers)?;
        output.examples.push(GeneratedExample {
            data_source: "24point".to_string(),
            prompt,
            ground_truth: GroundTruth::Value(ground_truth),
            payload: ExamplePayload::Point24 { question, witness },
        });
    }

    debug!(examples = output.examples.len(), "point24 generation complete");
    Ok(output)
}

/// All non-decreasing digit tuples of length `len` over `0..=max`.
///
/// Each multiset appears exactly once, in lexicographic order.
fn multisets(len: usize, max: i64) -> Vec<Vec<i64>> {
    let mut result = Vec::new();
    let mut current = Vec::with_capacity(len);
    fill(&mut result, &mut current, len, 0, max);
    result
}

fn fill(result: &mut Vec<Vec<i64>>, current: &mut Vec<i64>, len: usize, min: i64, max: i64) {
    if current.len() == len {
        result.push(current.clone());
        return;
    }
    for digit in min..=max {
        current.push(digit);
        fill(result, current, len, digit, max);
        current.pop();
    }
}

#[cfg(test)]
mod tests {
    use puzzles::arith::evaluate;

    use super::*;

    #[test]
    fn multisets_are_unique_and_sorted() {
        let sets = multisets(2, 2);
        assert_eq!(
            sets,
            vec![
                vec![0, 0],
                vec![0, 1],
                vec![0, 2],
                vec![1, 1],
                vec![1, 2],
                vec![2, 2]
            ]
        );
    }

    #[test]
    fn examples_carry_consistent_ground_truth() {
        let params = Point24Job {
            numbers: 2,
            digit_max: 6,
        };
        let prompts = PromptEngine::new();
        let output = generate(&params, &prompts).expect("generate");
        assert_eq!(output.examples.len(), 28); // C(8, 2) multisets

        for example in &output.examples {
            let ExamplePayload::Point24 { question, witness } = &example.payload else {
                panic!("point24 payload expected");
            };
            let GroundTruth::Value(value) = example.ground_truth else {
                panic!("value ground truth expected");
            };
            if value == 0.0 {
                assert_eq!(witness, NO_SOLUTION);
            } else {
                let evaluated = evaluate(witness).expect("witness evaluates");
                assert!((evaluated - TARGET).abs() < 1e-6);
            }
            assert!(example.prompt.contains(question));
        }
    }

    #[test]
    fn four_sixes_are_reachable() {
        let params = Point24Job {
            numbers: 2,
            digit_max: 6,
        };
        let prompts = PromptEngine::new();
        let output = generate(&params, &prompts).expect("generate");
        let four_six = output
            .examples
            .iter()
            .find(|example| {
                matches!(&example.payload, ExamplePayload::Point24 { question, .. } if question == "4,6")
            })
            .expect("4,6 instance exists");
        assert_eq!(four_six.ground_truth, GroundTruth::Value(TARGET));
    }
}
