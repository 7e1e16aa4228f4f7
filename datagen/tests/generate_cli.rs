//! End-to-end CLI tests: generate shards, then score responses built from
//! the stored ground truth.

use std::fs;
use std::path::Path;
use std::process::Command;

use serde_json::Value;

fn datagen() -> Command {
    Command::new(env!("CARGO_BIN_EXE_datagen"))
}

fn write_npuzzle_job(dir: &Path) -> std::path::PathBuf {
    let contents = format!(
        r#"
[job]
id = "npuzzle-smoke"
task = "npuzzle"

[npuzzle]
size = 3
scramble_steps = 6
count = 30

[output]
dir = "{}"
test_ratio = 0.1
seed = 1
"#,
        dir.join("out").display()
    );
    let path = dir.join("job.toml");
    fs::write(&path, contents).expect("write job");
    path
}

fn read_jsonl(path: &Path) -> Vec<Value> {
    fs::read_to_string(path)
        .expect("read shard")
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).expect("shard line parses"))
        .collect()
}

#[test]
fn generate_writes_valid_shards_and_meta() {
    let temp = tempfile::tempdir().expect("tempdir");
    let job = write_npuzzle_job(temp.path());

    let status = datagen().arg("generate").arg(&job).status().expect("run generate");
    assert!(status.success());

    let out = temp.path().join("out");
    let train = read_jsonl(&out.join("train.jsonl"));
    let test = read_jsonl(&out.join("test.jsonl"));
    assert!(!train.is_empty());

    for (split, records) in [("train", &train), ("test", &test)] {
        for record in records {
            assert_eq!(record["data_source"], "8puzzle");
            assert_eq!(record["ability"], "math");
            assert_eq!(record["reward_model"]["style"], "rule");
            assert_eq!(record["extra_info"]["split"], split);
            assert!(record["prompt"][0]["content"]
                .as_str()
                .expect("prompt content")
                .contains("Initial State"));
        }
    }

    let meta: Value = serde_json::from_str(
        &fs::read_to_string(out.join("meta.json")).expect("read meta"),
    )
    .expect("meta parses");
    assert_eq!(meta["job_id"], "npuzzle-smoke");
    assert_eq!(meta["task"], "npuzzle");
    assert_eq!(
        meta["train_records"].as_u64().expect("train count") as usize,
        train.len()
    );
    assert_eq!(
        meta["test_records"].as_u64().expect("test count") as usize,
        test.len()
    );
}

#[test]
fn ground_truth_responses_score_perfectly() {
    let temp = tempfile::tempdir().expect("tempdir");
    let job = write_npuzzle_job(temp.path());

    let status = datagen().arg("generate").arg(&job).status().expect("run generate");
    assert!(status.success());

    let out = temp.path().join("out");
    let train_path = out.join("train.jsonl");
    let train = read_jsonl(&train_path);

    let responses_path = temp.path().join("responses.jsonl");
    let responses: Vec<String> = train
        .iter()
        .map(|record| {
            let index = record["extra_info"]["index"].as_u64().expect("index");
            let reference = record["reward_model"]["ground_truth"]
                .as_str()
                .expect("reference path");
            serde_json::to_string(&serde_json::json!({
                "index": index,
                "response": format!("<think>replay</think>\n<answer>{reference}</answer>"),
            }))
            .expect("serialize response")
        })
        .collect();
    fs::write(&responses_path, responses.join("\n") + "\n").expect("write responses");

    let scores_path = temp.path().join("scores.json");
    let status = datagen()
        .arg("score")
        .arg("--dataset")
        .arg(&train_path)
        .arg("--responses")
        .arg(&responses_path)
        .arg("--out")
        .arg(&scores_path)
        .status()
        .expect("run score");
    assert!(status.success());

    let report: Value =
        serde_json::from_str(&fs::read_to_string(&scores_path).expect("read scores"))
            .expect("scores parse");
    assert_eq!(report["summary"]["missing"], 0);
    let mean_correctness = report["summary"]["mean_correctness"]
        .as_f64()
        .expect("mean correctness");
    assert!((mean_correctness - 1.0).abs() < 1e-9);
}

#[test]
fn point24_generation_covers_every_multiset() {
    let temp = tempfile::tempdir().expect("tempdir");
    let contents = format!(
        r#"
[job]
id = "point24-smoke"
task = "point24"

[point24]
numbers = 2
digit_max = 3

[output]
dir = "{}"
test_ratio = 0.0
seed = 2
"#,
        temp.path().join("out").display()
    );
    let job = temp.path().join("job.toml");
    fs::write(&job, contents).expect("write job");

    let status = datagen().arg("generate").arg(&job).status().expect("run generate");
    assert!(status.success());

    let train = read_jsonl(&temp.path().join("out").join("train.jsonl"));
    // Multisets of two digits over 0..=3.
    assert_eq!(train.len(), 10);
    for record in &train {
        assert_eq!(record["data_source"], "24point");
        let witness = record["extra_info"]["witness"].as_str().expect("witness");
        let truth = record["reward_model"]["ground_truth"]
            .as_f64()
            .expect("ground truth");
        if truth == 0.0 {
            assert_eq!(witness, "no solution");
        } else {
            assert_eq!(truth, 24.0);
        }
    }
}

#[test]
fn inspect_echoes_the_job_and_rejects_bad_files() {
    let temp = tempfile::tempdir().expect("tempdir");
    let job = write_npuzzle_job(temp.path());

    let output = datagen().arg("inspect").arg(&job).output().expect("run inspect");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("id=npuzzle-smoke"));
    assert!(stdout.contains("size=3"));

    let broken = temp.path().join("broken.toml");
    fs::write(&broken, "[job]\nid = \"x\"\n").expect("write broken");
    let status = datagen().arg("inspect").arg(&broken).status().expect("run inspect");
    assert!(!status.success());
}
