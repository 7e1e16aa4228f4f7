//! Dataset record schema.
//!
//! Mirrors the tabular layout consumed by downstream training: a prompt
//! column plus rule-based reward metadata. Records serialize one-per-line
//! into the JSONL shards.

use serde::{Deserialize, Serialize};

/// One dataset row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatasetRecord {
    pub data_source: String,
    pub prompt: Vec<PromptMessage>,
    pub ability: String,
    pub reward_model: RewardModel,
    pub extra_info: ExtraInfo,
}

/// Chat message carrying the rendered instruction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PromptMessage {
    pub role: String,
    pub content: String,
}

/// Rule-based reward metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RewardModel {
    pub style: String,
    pub ground_truth: GroundTruth,
}

/// Ground truth stored per task family.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum GroundTruth {
    /// Sliding puzzle: `-`-joined reference move path.
    Path(String),
    /// 24-point: reachable target value (24) or 0.
    Value(f64),
}

/// Task-specific record context, used again at scoring time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ExtraInfo {
    Npuzzle {
        split: String,
        index: usize,
        grid: Vec<Vec<u8>>,
        target: Vec<Vec<u8>>,
    },
    Point24 {
        split: String,
        index: usize,
        /// Comma-joined source numbers.
        question: String,
        /// Witness expression, or `no solution`.
        witness: String,
    },
}

impl ExtraInfo {
    pub fn index(&self) -> usize {
        match self {
            ExtraInfo::Npuzzle { index, .. } | ExtraInfo::Point24 { index, .. } => *index,
        }
    }
}

/// Generation output: examples plus non-fatal notes for the metadata.
#[derive(Debug, Default)]
pub struct GenOutput {
    pub examples: Vec<GeneratedExample>,
    pub warnings: Vec<String>,
}

/// A generated example before shard assignment.
#[derive(Debug, Clone)]
pub struct GeneratedExample {
    pub data_source: String,
    pub prompt: String,
    pub ground_truth: GroundTruth,
    pub payload: ExamplePayload,
}

/// Task-specific part of a generated example.
#[derive(Debug, Clone)]
pub enum ExamplePayload {
    Npuzzle {
        grid: Vec<Vec<u8>>,
        target: Vec<Vec<u8>>,
    },
    Point24 {
        question: String,
        witness: String,
    },
}

impl GeneratedExample {
    /// Finalize into a dataset record once split and index are known.
    pub fn into_record(self, split: &str, index: usize) -> DatasetRecord {
        let extra_info = match self.payload {
            ExamplePayload::Npuzzle { grid, target } => ExtraInfo::Npuzzle {
                split: split.to_string(),
                index,
                grid,
                target,
            },
            ExamplePayload::Point24 { question, witness } => ExtraInfo::Point24 {
                split: split.to_string(),
                index,
                question,
                witness,
            },
        };
        DatasetRecord {
            data_source: self.data_source,
            prompt: vec![PromptMessage {
                role: "user".to_string(),
                content: self.prompt,
            }],
            ability: "math".to_string(),
            reward_model: RewardModel {
                style: "rule".to_string(),
                ground_truth: self.ground_truth,
            },
            extra_info,
        }
    }
}
