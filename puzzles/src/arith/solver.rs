//! Exhaustive enumeration for the 24-point game.
//!
//! Every permutation of the input numbers is crossed with every binary
//! combination order: search states hold a stack of (value, expression)
//! pairs, and each step either pushes the next unused number or combines
//! the top two entries with one of `+ - * /`. The first terminal value
//! within tolerance of the target wins, so the witness is deterministic
//! for a fixed input but carries no minimality guarantee.
//!
//! The state space is factorial in the number count times exponential in
//! operator choices; the limits exist so oversized inputs fail fast
//! instead of hanging.

use tracing::debug;

/// Numeric tolerance for matching the target.
pub const TOLERANCE: f64 = 1e-6;

/// Budgets bounding the enumeration.
#[derive(Debug, Clone, Copy)]
pub struct EnumerationLimits {
    /// Most input numbers accepted.
    pub max_numbers: usize,
    /// Most search states visited before giving up.
    pub max_states: usize,
}

impl Default for EnumerationLimits {
    fn default() -> Self {
        Self {
            max_numbers: 6,
            max_states: 5_000_000,
        }
    }
}

/// A target-reaching expression over the input numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct Derivation {
    /// Value the expression evaluates to (within tolerance of the target).
    pub value: f64,
    /// Fully parenthesized witness expression.
    pub expression: String,
}

/// One stack entry: a computed value and the expression producing it.
#[derive(Clone)]
struct Entry {
    value: f64,
    text: String,
}

/// Find one way to combine `numbers` into `target` with `+ - * /`.
///
/// Returns `None` when the target is unreachable, the input is empty or
/// exceeds `limits.max_numbers`, or the state budget runs out first.
pub fn solve(numbers: &[i64], target: f64, limits: &EnumerationLimits) -> Option<Derivation> {
    if numbers.is_empty() || numbers.len() > limits.max_numbers {
        return None;
    }

    let mut states = 0usize;
    for perm in permutations(numbers) {
        if let Some(found) = search(&perm, 0, &[], false, target, &mut states, limits.max_states) {
            debug!(states, witness = %found.expression, "target reached");
            return Some(found);
        }
        if states > limits.max_states {
            debug!(states, "state budget exhausted");
            return None;
        }
    }
    debug!(states, "enumeration exhausted without reaching target");
    None
}

/// Depth-first over push/negate/combine transitions for one permutation.
///
/// Each branch clones the stack it extends, so sibling branches never
/// observe each other's state.
fn search(
    perm: &[i64],
    next: usize,
    stack: &[Entry],
    negated: bool,
    target: f64,
    states: &mut usize,
    max_states: usize,
) -> Option<Derivation> {
    *states += 1;
    if *states > max_states {
        return None;
    }

    // Terminal state: all numbers used, one entry left. A miss falls
    // through because the negate transition may still apply.
    if next == perm.len() && stack.len() == 1 {
        let entry = &stack[0];
        if (entry.value - target).abs() < TOLERANCE {
            return Some(Derivation {
                value: entry.value,
                expression: entry.text.clone(),
            });
        }
    }

    // Push the next unused number.
    if next < perm.len() {
        let mut extended = stack.to_vec();
        extended.push(Entry {
            value: perm[next] as f64,
            text: perm[next].to_string(),
        });
        if let Some(found) = search(perm, next + 1, &extended, negated, target, states, max_states)
        {
            return Some(found);
        }
    }

    // Negate the first pushed number, once, before anything is combined.
    // This covers expressions with a leading unary minus.
    if !negated && next == 1 && stack.len() == 1 {
        let entry = &stack[0];
        let flipped = vec![Entry {
            value: -entry.value,
            text: format!("(-{})", entry.text),
        }];
        if let Some(found) = search(perm, next, &flipped, true, target, states, max_states) {
            return Some(found);
        }
    }

    // Combine the top two stack entries.
    if stack.len() >= 2 {
        let left = &stack[stack.len() - 2];
        let right = &stack[stack.len() - 1];
        for op in ['+', '-', '*', '/'] {
            // Skipping zero divisors up front keeps evaluation total.
            if op == '/' && right.value == 0.0 {
                continue;
            }
            let value = match op {
                '+' => left.value + right.value,
                '-' => left.value - right.value,
                '*' => left.value * right.value,
                _ => left.value / right.value,
            };
            let mut combined = stack[..stack.len() - 2].to_vec();
            combined.push(Entry {
                value,
                text: format!("({}{}{})", left.text, op, right.text),
            });
            if let Some(found) = search(perm, next, &combined, negated, target, states, max_states)
            {
                return Some(found);
            }
        }
    }

    None
}

/// All permutations of `numbers`, duplicates included, in a fixed order.
fn permutations(numbers: &[i64]) -> Vec<Vec<i64>> {
    let mut result = Vec::new();
    let mut current = Vec::with_capacity(numbers.len());
    let mut used = vec![false; numbers.len()];
    permute(numbers, &mut used, &mut current, &mut result);
    result
}

fn permute(numbers: &[i64], used: &mut [bool], current: &mut Vec<i64>, result: &mut Vec<Vec<i64>>) {
    if current.len() == numbers.len() {
        result.push(current.clone());
        return;
    }
    for idx in 0..numbers.len() {
        if used[idx] {
            continue;
        }
        used[idx] = true;
        current.push(numbers[idx]);
        permute(numbers, used, current, result);
        current.pop();
        used[idx] = false;
    }
}
