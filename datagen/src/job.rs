//! Generation job parsing and validation.
//!
//! Jobs are TOML files defining the task, its parameters, and the output
//! sharding. Every rejection path has a precise message and a test.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use puzzles::sliding::grid::{MAX_SIZE, MIN_SIZE};

/// A parsed job file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct JobFile {
    pub job: JobMeta,
    #[serde(default)]
    pub npuzzle: Option<NpuzzleJob>,
    #[serde(default)]
    pub point24: Option<Point24Job>,
    pub output: OutputConfig,
}

/// Job metadata: identifier and task selector.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct JobMeta {
    /// Unique identifier (slug format: `[a-z0-9_-]+`).
    pub id: String,
    /// Which generator runs.
    pub task: Task,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Task {
    Npuzzle,
    Point24,
}

impl Task {
    pub fn as_str(self) -> &'static str {
        match self {
            Task::Npuzzle => "npuzzle",
            Task::Point24 => "point24",
        }
    }
}

/// Sliding-puzzle generation parameters.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct NpuzzleJob {
    /// Grid side length.
    pub size: usize,
    /// Upper bound on the scramble walk length; the walk uses
    /// `max(1, scramble_steps / 2)..=scramble_steps` moves.
    pub scramble_steps: usize,
    /// Scrambles to attempt (duplicates are dropped, so fewer records may
    /// come out).
    pub count: usize,
}

/// 24-point generation parameters. Every digit multiset in range is
/// enumerated, so there is no count knob.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct Point24Job {
    /// Numbers per instance.
    pub numbers: usize,
    /// Digits are drawn from `0..=digit_max`.
    pub digit_max: u8,
}

/// Output sharding configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputConfig {
    /// Directory receiving the shards and metadata.
    pub dir: PathBuf,
    /// Fraction of records routed to the test shard.
    #[serde(default = "default_test_ratio")]
    pub test_ratio: f64,
    /// Seed for scrambling and the shard split.
    #[serde(default)]
    pub seed: u64,
}

fn default_test_ratio() -> f64 {
    0.1
}

/// The task-specific parameter section, resolved and checked.
#[derive(Debug, Clone, Copy)]
pub enum TaskParams<'a> {
    Npuzzle(&'a NpuzzleJob),
    Point24(&'a Point24Job),
}

impl JobFile {
    /// Load and validate a job file from the given path.
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("read job {}", path.display()))?;
        let job: JobFile =
            toml::from_str(&contents).with_context(|| format!("parse job {}", path.display()))?;
        job.validate()
            .with_context(|| format!("validate job {}", path.display()))?;
        Ok(job)
    }

    #[cfg(test)]
    pub fn parse_str(contents: &str) -> Result<Self> {
        let job: JobFile = toml::from_str(contents).context("parse job")?;
        job.validate()?;
        Ok(job)
    }

    /// The parameter section matching `job.task`.
    pub fn task_params(&self) -> Result<TaskParams<'_>> {
        match self.job.task {
            Task::Npuzzle => self
                .npuzzle
                .as_ref()
                .map(TaskParams::Npuzzle)
                .ok_or_else(|| anyhow::anyhow!("task \"npuzzle\" requires an [npuzzle] section")),
            Task::Point24 => self
                .point24
                .as_ref()
                .map(TaskParams::Point24)
                .ok_or_else(|| anyhow::anyhow!("task \"point24\" requires a [point24] section")),
        }
    }

    fn validate(&self) -> Result<()> {
        validate_job_id(&self.job.id)?;
        match self.task_params()? {
            TaskParams::Npuzzle(params) => params.validate()?,
            TaskParams::Point24(params) => params.validate()?,
        }
        if self.output.dir.as_os_str().is_empty() {
            bail!("output.dir must be non-empty");
        }
        if !(0.0..1.0).contains(&self.output.test_ratio) {
            bail!(
                "output.test_ratio must be in [0, 1), got {}",
                self.output.test_ratio
            );
        }
        Ok(())
    }
}

impl NpuzzleJob {
    fn validate(&self) -> Result<()> {
        if !(MIN_SIZE..=MAX_SIZE).contains(&self.size) {
            bail!("npuzzle.size must be {MIN_SIZE}..={MAX_SIZE}, got {}", self.size);
        }
        if self.scramble_steps == 0 {
            bail!("npuzzle.scramble_steps must be > 0");
        }
        if self.count == 0 {
            bail!("npuzzle.count must be > 0");
        }
        Ok(())
    }
}

impl Point24Job {
    fn validate(&self) -> Result<()> {
        if !(2..=6).contains(&self.numbers) {
            bail!("point24.numbers must be 2..=6, got {}", self.numbers);
        }
        if !(1..=9).contains(&self.digit_max) {
            bail!("point24.digit_max must be 1..=9, got {}", self.digit_max);
        }
        Ok(())
    }
}

fn validate_job_id(id: &str) -> Result<()> {
    if id.trim().is_empty() {
        bail!("job.id must be non-empty");
    }
    if !id
        .chars()
        .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' || ch == '_')
    {
        bail!("job.id must use [a-z0-9_-] only");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NPUZZLE_JOB: &str = r#"
[job]
id = "npuzzle-3x3"
task = "npuzzle"

[npuzzle]
size = 3
scramble_steps = 10
count = 1000

[output]
dir = "data/npuzzle"
test_ratio = 0.1
seed = 42
"#;

    #[test]
    fn parses_valid_npuzzle_job() {
        let job = JobFile::parse_str(NPUZZLE_JOB).expect("job parses");
        assert_eq!(job.job.id, "npuzzle-3x3");
        assert_eq!(job.job.task, Task::Npuzzle);
        assert!(matches!(job.task_params(), Ok(TaskParams::Npuzzle(_))));
        assert_eq!(job.output.seed, 42);
    }

    #[test]
    fn parses_valid_point24_job_with_defaults() {
        let input = r#"
[job]
id = "point24"
task = "point24"

[point24]
numbers = 4
digit_max = 9

[output]
dir = "data/point24"
"#;
        let job = JobFile::parse_str(input).expect("job parses");
        assert_eq!(job.output.test_ratio, 0.1);
        assert_eq!(job.output.seed, 0);
    }

    #[test]
    fn rejects_invalid_id() {
        let input = NPUZZLE_JOB.replace("npuzzle-3x3", "Bad Id");
        let err = JobFile::parse_str(&input).expect_err("invalid id");
        assert!(err.to_string().contains("job.id"));
    }

    #[test]
    fn rejects_missing_task_section() {
        let input = r#"
[job]
id = "point24"
task = "point24"

[output]
dir = "data"
"#;
        let err = JobFile::parse_str(input).expect_err("missing section");
        assert!(err.to_string().contains("[point24]"));
    }

    #[test]
    fn rejects_out_of_range_values() {
        let too_big = NPUZZLE_JOB.replace("size = 3", "size = 40");
        assert!(JobFile::parse_str(&too_big).is_err());

        let zero_steps = NPUZZLE_JOB.replace("scramble_steps = 10", "scramble_steps = 0");
        assert!(JobFile::parse_str(&zero_steps).is_err());

        let zero_count = NPUZZLE_JOB.replace("count = 1000", "count = 0");
        assert!(JobFile::parse_str(&zero_count).is_err());

        let bad_ratio = NPUZZLE_JOB.replace("test_ratio = 0.1", "test_ratio = 1.0");
        assert!(JobFile::parse_str(&bad_ratio).is_err());
    }
}
