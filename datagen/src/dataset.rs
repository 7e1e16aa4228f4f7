//! Shard writing and dataset metadata.
//!
//! Generated examples are shuffled, split into train/test shards at the
//! configured ratio, and written as JSON lines. A `meta.json` records
//! provenance: job id, job-file hash, seed, counts, and timing.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, instrument};

use crate::job::JobFile;
use crate::record::{DatasetRecord, GenOutput};

/// Input for writing a generated dataset.
#[derive(Debug)]
pub struct WriteInput<'a> {
    pub job: &'a JobFile,
    pub job_path: &'a Path,
    pub output: GenOutput,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Dataset provenance, persisted to `meta.json`.
#[derive(Debug, Serialize, Deserialize)]
pub struct DatasetMeta {
    pub job_id: String,
    pub task: String,
    /// SHA-256 hash of the job file for reproducibility tracking.
    pub job_hash: String,
    pub seed: u64,
    pub test_ratio: f64,
    pub train_records: usize,
    pub test_records: usize,
    pub start_time: String,
    pub end_time: String,
    pub duration_secs: f64,
    /// Non-fatal notes from generation (skipped instances and the like).
    pub warnings: Vec<String>,
}

/// Written shard and metadata paths.
#[derive(Debug)]
pub struct DatasetPaths {
    pub train: PathBuf,
    pub test: PathBuf,
    pub meta: PathBuf,
}

/// Shuffle, split, and write a generated dataset.
#[instrument(skip_all, fields(job_id = %input.job.job.id))]
pub fn write_dataset(input: WriteInput<'_>, rng: &mut StdRng) -> Result<DatasetPaths> {
    let dir = &input.job.output.dir;
    fs::create_dir_all(dir).with_context(|| format!("create output dir {}", dir.display()))?;

    let mut examples = input.output.examples;
    examples.shuffle(rng);

    let test_count = (examples.len() as f64 * input.job.output.test_ratio) as usize;
    let train_count = examples.len() - test_count;

    let mut train = Vec::with_capacity(train_count);
    let mut test = Vec::with_capacity(test_count);
    for (position, example) in examples.into_iter().enumerate() {
        if position < train_count {
            train.push(example.into_record("train", train.len()));
        } else {
            test.push(example.into_record("test", test.len()));
        }
    }

    let paths = DatasetPaths {
        train: dir.join("train.jsonl"),
        test: dir.join("test.jsonl"),
        meta: dir.join("meta.json"),
    };
    write_shard(&paths.train, &train)?;
    write_shard(&paths.test, &test)?;

    let duration = input.finished_at - input.started_at;
    let meta = DatasetMeta {
        job_id: input.job.job.id.clone(),
        task: input.job.job.task.as_str().to_string(),
        job_hash: file_sha256(input.job_path)?,
        seed: input.job.output.seed,
        test_ratio: input.job.output.test_ratio,
        train_records: train.len(),
        test_records: test.len(),
        start_time: input.started_at.to_rfc3339(),
        end_time: input.finished_at.to_rfc3339(),
        duration_secs: duration.num_milliseconds() as f64 / 1000.0,
        warnings: input.output.warnings,
    };
    let contents = serde_json::to_string_pretty(&meta).context("serialize meta")?;
    fs::write(&paths.meta, format!("{contents}\n"))
        .with_context(|| format!("write meta {}", paths.meta.display()))?;

    debug!(
        train = meta.train_records,
        test = meta.test_records,
        dir = %dir.display(),
        "dataset written"
    );
    Ok(paths)
}

/// Read a JSONL shard back into records.
pub fn read_shard(path: &Path) -> Result<Vec<DatasetRecord>> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read shard {}", path.display()))?;
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(number, line)| {
            serde_json::from_str(line)
                .with_context(|| format!("parse {} line {}", path.display(), number + 1))
        })
        .collect()
}

fn write_shard(path: &Path, records: &[DatasetRecord]) -> Result<()> {
    let mut file =
        fs::File::create(path).with_context(|| format!("create shard {}", path.display()))?;
    for record in records {
        let line = serde_json::to_string(record).context("serialize record")?;
        writeln!(file, "{line}").with_context(|| format!("write shard {}", path.display()))?;
    }
    Ok(())
}

fn file_sha256(path: &Path) -> Result<String> {
    let contents = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let mut hasher = Sha256::new();
    hasher.update(contents);
    Ok(hex::encode(hasher.finalize()))
}
