//! Best-first search for a move path between two grids.
//!
//! The heuristic is the *maximum* per-tile Manhattan distance to the goal
//! position, not the usual sum. The max under-estimates multi-tile
//! scrambles, which keeps the open set small at the cost of shortest-path
//! optimality: returned paths are near-minimal, not guaranteed minimal.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use tracing::debug;

use crate::sliding::grid::{Grid, Move};

/// Budgets guarding the search against pathological inputs.
#[derive(Debug, Clone, Copy)]
pub struct SearchLimits {
    /// Longest path worth exploring; deeper branches are pruned.
    pub max_moves: usize,
    /// Node expansions allowed before the search gives up.
    pub max_expansions: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_moves: 80,
            max_expansions: 200_000,
        }
    }
}

/// Frontier entry, ordered by `(priority, seq)` only.
///
/// The insertion sequence number breaks ties deterministically and keeps
/// grid payloads out of the ordering entirely.
struct OpenNode {
    priority: usize,
    seq: u64,
    grid: Grid,
    path: Vec<Move>,
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        (self.priority, self.seq) == (other.priority, other.seq)
    }
}

impl Eq for OpenNode {}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Inverted: BinaryHeap is a max-heap, we pop lowest priority first.
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Find a move path from `start` to `goal`.
///
/// Returns `Some(vec![])` when the grids already match, and `None` when
/// the frontier empties or a budget runs out first. With matching tile
/// sets a `None` normally means the budget was too small (or the scramble
/// has the wrong parity and is genuinely unreachable).
pub fn solve(start: &Grid, goal: &Grid, limits: &SearchLimits) -> Option<Vec<Move>> {
    let goal_key = goal.state_key();
    let targets = goal.tile_positions();

    let mut frontier = BinaryHeap::new();
    let mut best: HashMap<String, usize> = HashMap::new();
    let mut seq = 0u64;
    let mut expansions = 0usize;

    best.insert(start.state_key(), 0);
    frontier.push(OpenNode {
        priority: heuristic(start, &targets),
        seq,
        grid: start.clone(),
        path: Vec::new(),
    });

    while let Some(node) = frontier.pop() {
        if node.grid.state_key() == goal_key {
            debug!(expansions, moves = node.path.len(), "goal reached");
            return Some(node.path);
        }
        expansions += 1;
        if expansions > limits.max_expansions {
            debug!(expansions, "expansion budget exhausted");
            return None;
        }
        if node.path.len() >= limits.max_moves {
            continue;
        }
        for mv in Move::ALL {
            let Some(next) = node.grid.apply(mv) else {
                continue;
            };
            let key = next.state_key();
            let next_len = node.path.len() + 1;
            if best.get(&key).is_none_or(|&len| len > next_len) {
                best.insert(key, next_len);
                seq += 1;
                let mut path = node.path.clone();
                path.push(mv);
                frontier.push(OpenNode {
                    priority: next_len + heuristic(&next, &targets),
                    seq,
                    grid: next,
                    path,
                });
            }
        }
    }

    debug!(expansions, "frontier exhausted without reaching goal");
    None
}

/// Max over tiles (blank included) of the Manhattan distance to the goal.
fn heuristic(grid: &Grid, targets: &[(usize, usize)]) -> usize {
    let size = grid.size();
    let mut worst = 0;
    for (idx, &cell) in grid.cells().iter().enumerate() {
        let (row, col) = (idx / size, idx % size);
        let (goal_row, goal_col) = targets[cell as usize];
        worst = worst.max(row.abs_diff(goal_row) + col.abs_diff(goal_col));
    }
    worst
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn replay(start: &Grid, path: &[Move]) -> Grid {
        let mut grid = start.clone();
        for &mv in path {
            grid = grid.apply(mv).expect("solver paths stay in bounds");
        }
        grid
    }

    #[test]
    fn solved_grid_needs_no_moves() {
        let goal = Grid::canonical(3).expect("canonical");
        let path = solve(&goal, &goal, &SearchLimits::default()).expect("already solved");
        assert!(path.is_empty());
    }

    #[test]
    fn single_scramble_move_is_undone() {
        let goal = Grid::canonical(3).expect("canonical");
        let scramble = goal.apply(Move::Down).expect("scramble");
        let path = solve(&scramble, &goal, &SearchLimits::default()).expect("solvable");
        assert_eq!(replay(&scramble, &path), goal);
        assert_eq!(path.len(), 1);
    }

    #[test]
    fn heuristic_is_max_tile_distance_not_sum() {
        let goal = Grid::canonical(3).expect("canonical");
        let targets = goal.tile_positions();
        // Tiles 1 and 2 swapped: each is one step from home, so the max is
        // 1 even though the summed distance is 2 (plus the blank's 0).
        let rows = vec![vec![2, 1, 3], vec![4, 5, 6], vec![7, 8, 0]];
        let swapped = Grid::from_rows(&rows).expect("grid");
        assert_eq!(heuristic(&swapped, &targets), 1);
    }

    #[test]
    fn unreachable_scramble_returns_none() {
        // 2x2 with two tiles transposed is the unsolvable parity class.
        let goal = Grid::canonical(2).expect("canonical");
        let rows = vec![vec![2, 1], vec![3, 0]];
        let twisted = Grid::from_rows(&rows).expect("grid");
        assert!(solve(&twisted, &goal, &SearchLimits::default()).is_none());
    }

    #[test]
    fn expansion_budget_stops_the_search() {
        let goal = Grid::canonical(3).expect("canonical");
        let mut scramble = goal.clone();
        for mv in [Move::Down, Move::Right, Move::Down, Move::Right, Move::Up] {
            scramble = scramble.apply(mv).expect("scramble");
        }
        let starved = SearchLimits {
            max_moves: 80,
            max_expansions: 1,
        };
        assert!(solve(&scramble, &goal, &starved).is_none());
    }

    #[test]
    fn repeated_runs_return_the_same_path() {
        let goal = Grid::canonical(3).expect("canonical");
        let mut scramble = goal.clone();
        for mv in [Move::Down, Move::Down, Move::Right, Move::Up, Move::Left] {
            scramble = scramble.apply(mv).expect("scramble");
        }
        let first = solve(&scramble, &goal, &SearchLimits::default()).expect("solvable");
        let second = solve(&scramble, &goal, &SearchLimits::default()).expect("solvable");
        assert_eq!(first, second);
    }

    proptest! {
        /// Any random-walk scramble solves, and replaying the returned
        /// path from the scramble reaches the goal exactly.
        #[test]
        fn random_scrambles_solve_and_replay(walk in prop::collection::vec(0usize..4, 0..15)) {
            let goal = Grid::canonical(3).expect("canonical");
            let mut scramble = goal.clone();
            for idx in walk {
                if let Some(next) = scramble.apply(Move::ALL[idx]) {
                    scramble = next;
                }
            }
            let path = solve(&scramble, &goal, &SearchLimits::default()).expect("walk stays solvable");
            prop_assert_eq!(replay(&scramble, &path), goal);
        }
    }
}
