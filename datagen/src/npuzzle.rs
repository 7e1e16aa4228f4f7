//! Sliding-puzzle dataset generation.
//!
//! Scrambles are random walks from the canonical goal, deduplicated by
//! state key, each solved by the library solver to produce its reference
//! path.

use std::collections::HashSet;

use anyhow::Result;
use rand::Rng;
use rand::rngs::StdRng;
use tracing::{debug, warn};

use puzzles::sliding::{Grid, Move, SearchLimits, format_path, solve};

use crate::job::NpuzzleJob;
use crate::prompt::PromptEngine;
use crate::record::{ExamplePayload, GenOutput, GeneratedExample, GroundTruth};

/// Generate up to `params.count` unique solved scrambles.
///
/// Duplicate scrambles and walks that end back at the goal are dropped,
/// so the output usually holds fewer examples than `count`.
pub fn generate(
    params: &NpuzzleJob,
    rng: &mut StdRng,
    prompts: &PromptEngine,
) -> Result<GenOutput> {
    let goal = Grid::canonical(params.size)?;
    let limits = SearchLimits::default();
    let data_source = format!("{}puzzle", params.size * params.size - 1);

    let mut seen: HashSet<String> = HashSet::new();
    let mut output = GenOutput::default();
    let mut unsolved = 0usize;

    for _ in 0..params.count {
        let lower = (params.scramble_steps / 2).max(1);
        let steps = rng.gen_range(lower..=params.scramble_steps);
        let scramble = random_walk(&goal, steps, rng);
        if scramble == goal || !seen.insert(scramble.state_key()) {
            continue;
        }
        let Some(path) = solve(&scramble, &goal, &limits) else {
            unsolved += 1;
            warn!(state = %scramble.state_key(), "scramble not solved within budget, skipping");
            continue;
        };
        let prompt = prompts.render_npuzzle(&scramble)?;
        output.examples.push(GeneratedExample {
            data_source: data_source.clone(),
            prompt,
            ground_truth: GroundTruth::Path(format_path(&path)),
            payload: ExamplePayload::Npuzzle {
                grid: scramble.rows(),
                target: goal.rows(),
            },
        });
    }

    if unsolved > 0 {
        output
            .warnings
            .push(format!("{unsolved} scrambles exceeded the search budget"));
    }
    debug!(
        examples = output.examples.len(),
        unsolved, "npuzzle generation complete"
    );
    Ok(output)
}

/// Scramble by `steps` uniformly random legal blank moves.
fn random_walk(goal: &Grid, steps: usize, rng: &mut StdRng) -> Grid {
    let mut grid = goal.clone();
    for _ in 0..steps {
        let moves: Vec<Move> = grid.legal_moves().collect();
        let mv = moves[rng.gen_range(0..moves.len())];
        grid = grid.apply(mv).expect("legal move applies");
    }
    grid
}
