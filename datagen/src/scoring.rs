//! Response scoring against a dataset shard.
//!
//! Pairs model responses to dataset records by index, dispatches each
//! record to the matching library scorer, and aggregates the breakdowns
//! into a report.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use puzzles::arith;
use puzzles::sliding;
use puzzles::sliding::Grid;
use puzzles::types::{ExtractionMode, ScoreBreakdown};

use crate::dataset::read_shard;
use crate::record::{DatasetRecord, ExtraInfo, GroundTruth};

/// One model response, paired to a record by index.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseRow {
    pub index: usize,
    pub response: String,
}

/// Score for one record.
#[derive(Debug, Serialize)]
pub struct ScoredRecord {
    pub index: usize,
    pub data_source: String,
    /// False when no response was provided for this record.
    pub answered: bool,
    #[serde(flatten)]
    pub breakdown: ScoreBreakdown,
}

/// Aggregate over a scored shard. Missing responses count as zeros.
#[derive(Debug, Serialize)]
pub struct ScoreSummary {
    pub records: usize,
    pub answered: usize,
    pub missing: usize,
    pub mean_total: f64,
    pub mean_correctness: f64,
    pub mean_format: f64,
}

/// Full score report, persisted as JSON.
#[derive(Debug, Serialize)]
pub struct ScoreReport {
    pub summary: ScoreSummary,
    pub records: Vec<ScoredRecord>,
}

/// Score every record of a shard against a responses file.
#[instrument(skip_all, fields(dataset = %dataset_path.display()))]
pub fn score_shard(
    dataset_path: &Path,
    responses_path: &Path,
    mode: ExtractionMode,
) -> Result<ScoreReport> {
    let records = read_shard(dataset_path)?;
    let responses = read_responses(responses_path)?;

    let mut scored = Vec::with_capacity(records.len());
    for record in &records {
        let index = record.extra_info.index();
        match responses.get(&index) {
            Some(response) => {
                let breakdown = score_record(record, response, mode)
                    .with_context(|| format!("score record {index}"))?;
                scored.push(ScoredRecord {
                    index,
                    data_source: record.data_source.clone(),
                    answered: true,
                    breakdown,
                });
            }
            None => {
                warn!(index, "no response for record");
                scored.push(ScoredRecord {
                    index,
                    data_source: record.data_source.clone(),
                    answered: false,
                    breakdown: ScoreBreakdown::zero(),
                });
            }
        }
    }

    let summary = summarize(&scored);
    debug!(
        records = summary.records,
        answered = summary.answered,
        mean_total = summary.mean_total,
        "shard scored"
    );
    Ok(ScoreReport {
        summary,
        records: scored,
    })
}

/// Dispatch one record to the scorer matching its task family.
fn score_record(
    record: &DatasetRecord,
    response: &str,
    mode: ExtractionMode,
) -> Result<ScoreBreakdown> {
    match (&record.extra_info, &record.reward_model.ground_truth) {
        (ExtraInfo::Npuzzle { grid, target, .. }, GroundTruth::Path(reference)) => {
            let start = Grid::from_rows(grid).context("record grid")?;
            let goal = Grid::from_rows(target).context("record target")?;
            let reference = sliding::parse_path(reference).context("record reference")?;
            Ok(sliding::compute_score(
                response,
                &reference,
                &start,
                &goal,
                mode,
                &sliding::ScoreWeights::default(),
            ))
        }
        (ExtraInfo::Point24 { question, .. }, GroundTruth::Value(ground_truth)) => {
            let numbers = parse_question(question)?;
            Ok(arith::compute_score(
                response,
                *ground_truth,
                &numbers,
                mode,
                &arith::ArithScoreParams::default(),
            ))
        }
        _ => bail!("record ground truth does not match its task family"),
    }
}

fn parse_question(question: &str) -> Result<Vec<i64>> {
    question
        .split(',')
        .map(|n| {
            n.trim()
                .parse()
                .with_context(|| format!("bad number {n:?} in question"))
        })
        .collect()
}

fn read_responses(path: &Path) -> Result<BTreeMap<usize, String>> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read responses {}", path.display()))?;
    let mut responses = BTreeMap::new();
    for (number, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let row: ResponseRow = serde_json::from_str(line)
            .with_context(|| format!("parse {} line {}", path.display(), number + 1))?;
        if responses.insert(row.index, row.response).is_some() {
            bail!("duplicate response for index {}", row.index);
        }
    }
    Ok(responses)
}

fn summarize(scored: &[ScoredRecord]) -> ScoreSummary {
    let records = scored.len();
    let answered = scored.iter().filter(|record| record.answered).count();
    let mean = |extract: fn(&ScoreBreakdown) -> f64| {
        if records == 0 {
            0.0
        } else {
            scored.iter().map(|r| extract(&r.breakdown)).sum::<f64>() / records as f64
        }
    };
    ScoreSummary {
        records,
        answered,
        missing: records - answered,
        mean_total: mean(|b| b.total),
        mean_correctness: mean(|b| b.correctness),
        mean_format: mean(|b| b.format),
    }
}
