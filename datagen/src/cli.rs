//! CLI command implementations.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use puzzles::types::ExtractionMode;

use crate::dataset::{WriteInput, write_dataset};
use crate::job::{JobFile, TaskParams};
use crate::prompt::PromptEngine;
use crate::scoring::score_shard;
use crate::{npuzzle, point24};

/// Generate dataset shards from a job file.
pub fn generate(job_path: &Path) -> Result<()> {
    let job = JobFile::load(job_path).context("load job")?;
    info!(job_id = %job.job.id, task = job.job.task.as_str(), "generation started");

    let started_at = Utc::now();
    let mut rng = StdRng::seed_from_u64(job.output.seed);
    let prompts = PromptEngine::new();

    let output = match job.task_params()? {
        TaskParams::Npuzzle(params) => npuzzle::generate(params, &mut rng, &prompts)?,
        TaskParams::Point24(params) => point24::generate(params, &prompts)?,
    };
    let finished_at = Utc::now();
    debug!(examples = output.examples.len(), "generation finished");

    let paths = write_dataset(
        WriteInput {
            job: &job,
            job_path,
            output,
            started_at,
            finished_at,
        },
        &mut rng,
    )
    .context("write dataset")?;

    println!(
        "generate: job={} train={} test={} dir={}",
        job.job.id,
        paths.train.display(),
        paths.test.display(),
        job.output.dir.display()
    );
    Ok(())
}

/// Parse a job file and echo the resolved configuration.
pub fn inspect(job_path: &Path) -> Result<()> {
    let job = JobFile::load(job_path).context("load job")?;
    println!("job: id={} task={}", job.job.id, job.job.task.as_str());
    match job.task_params()? {
        TaskParams::Npuzzle(params) => println!(
            "npuzzle: size={} scramble_steps={} count={}",
            params.size, params.scramble_steps, params.count
        ),
        TaskParams::Point24(params) => println!(
            "point24: numbers={} digit_max={}",
            params.numbers, params.digit_max
        ),
    }
    println!(
        "output: dir={} test_ratio={} seed={}",
        job.output.dir.display(),
        job.output.test_ratio,
        job.output.seed
    );
    Ok(())
}

/// Score model responses against a dataset shard.
pub fn score(
    dataset: &Path,
    responses: &Path,
    mode: ExtractionMode,
    out: Option<&Path>,
) -> Result<()> {
    let report = score_shard(dataset, responses, mode)?;

    let out_path: PathBuf = match out {
        Some(path) => path.to_path_buf(),
        None => responses
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join("scores.json"),
    };
    let contents = serde_json::to_string_pretty(&report).context("serialize report")?;
    fs::write(&out_path, format!("{contents}\n"))
        .with_context(|| format!("write report {}", out_path.display()))?;

    println!(
        "score: records={} answered={} missing={} mean_total={:.4} mean_correctness={:.4} mean_format={:.4} out={}",
        report.summary.records,
        report.summary.answered,
        report.summary.missing,
        report.summary.mean_total,
        report.summary.mean_correctness,
        report.summary.mean_format,
        out_path.display()
    );
    Ok(())
}
