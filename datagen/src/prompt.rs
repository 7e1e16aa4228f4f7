//! Instruction prompt rendering for dataset records.

use anyhow::{Context, Result};
use minijinja::{Environment, context};

use puzzles::sliding::Grid;

const NPUZZLE_TEMPLATE: &str = include_str!("prompts/npuzzle.md");
const POINT24_TEMPLATE: &str = include_str!("prompts/point24.md");

/// Template engine wrapper around minijinja.
pub struct PromptEngine {
    env: Environment<'static>,
}

impl PromptEngine {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.add_template("npuzzle", NPUZZLE_TEMPLATE)
            .expect("npuzzle template should be valid");
        env.add_template("point24", POINT24_TEMPLATE)
            .expect("point24 template should be valid");
        Self { env }
    }

    /// Render the sliding-puzzle instruction for a start grid.
    pub fn render_npuzzle(&self, start: &Grid) -> Result<String> {
        let template = self.env.get_template("npuzzle")?;
        let rendered = template
            .render(context! { initial_state => start.to_string() })
            .context("render npuzzle prompt")?;
        Ok(rendered)
    }

    /// Render the 24-point instruction for a number list.
    pub fn render_point24(&self, numbers: &[i64]) -> Result<String> {
        let joined = numbers
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let template = self.env.get_template("point24")?;
        let rendered = template
            .render(context! { numbers => joined })
            .context("render point24 prompt")?;
        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn npuzzle_prompt_embeds_the_grid() {
        let engine = PromptEngine::new();
        let grid = Grid::canonical(3).expect("canonical");
        let prompt = engine.render_npuzzle(&grid).expect("render");
        assert!(prompt.contains("[1 2 3]\n[4 5 6]\n[7 8 0]"));
        assert!(prompt.contains("<answer>"));
    }

    #[test]
    fn point24_prompt_embeds_the_numbers() {
        let engine = PromptEngine::new();
        let prompt = engine.render_point24(&[3, 5, 5, 9]).expect("render");
        assert!(prompt.contains("3,5,5,9"));
        assert!(prompt.contains("no solution"));
        assert!(prompt.contains("The answer is"));
    }
}
