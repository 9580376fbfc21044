//! Benchmark suite for reading, writing and consolidating ACH files
//!
//! Uses the divan benchmarking framework over the integration test
//! fixtures.
//!
//! # Running Benchmarks
//!
//! ```bash
//! cargo bench
//! ```

use rust_ach_engine::cli::StrategyType;
use rust_ach_engine::core::{flatten_batches, merge_files, File, MergeConditions};
use rust_ach_engine::io::{read_str, to_bytes, WriterOptions};
use rust_ach_engine::strategy::{create_strategy, LoadConfig};
use rust_ach_engine::ReaderOptions;
use std::path::{Path, PathBuf};

const FIXTURES: &[&str] = &[
    "ppd_ccd_valid.ach",
    "returns.ach",
    "iat.ach",
    "adv.ach",
    "flatten_input.ach",
];

const MERGE_INPUTS: &[&str] = &["merge_a.ach", "merge_b.ach", "merge_c.ach"];

fn main() {
    divan::main();
}

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn load(name: &str) -> File {
    let text = std::fs::read_to_string(fixture(name)).expect("fixture is readable");
    read_str(&text).into_result().expect("fixture is valid")
}

#[divan::bench(args = FIXTURES)]
fn read(bencher: divan::Bencher, name: &str) {
    let text = std::fs::read_to_string(fixture(name)).expect("fixture is readable");
    bencher.bench(|| read_str(divan::black_box(&text)));
}

#[divan::bench(args = FIXTURES)]
fn write(bencher: divan::Bencher, name: &str) {
    let file = load(name);
    let options = WriterOptions::default();
    bencher.bench(|| to_bytes(divan::black_box(&file), &options).expect("file is valid"));
}

#[divan::bench]
fn flatten(bencher: divan::Bencher) {
    let file = load("flatten_input.ach");
    bencher
        .with_inputs(|| file.clone())
        .bench_values(|file| flatten_batches(file).expect("flatten keeps totals"));
}

#[divan::bench]
fn merge(bencher: divan::Bencher) {
    let files: Vec<File> = MERGE_INPUTS.iter().map(|name| load(name)).collect();
    let conditions = MergeConditions::default();
    bencher
        .with_inputs(|| files.clone())
        .bench_values(|files| merge_files(files, &conditions).expect("merge keeps totals"));
}

/// Load every fixture with the synchronous strategy
#[divan::bench]
fn sync_strategy_load() {
    let paths: Vec<PathBuf> = FIXTURES.iter().map(|name| fixture(name)).collect();
    let strategy = create_strategy(StrategyType::Sync, None, ReaderOptions::default());
    strategy.load(&paths).expect("Loading failed");
}

/// Load every fixture with the asynchronous strategy
#[divan::bench]
fn async_strategy_load() {
    let paths: Vec<PathBuf> = FIXTURES.iter().map(|name| fixture(name)).collect();
    let strategy = create_strategy(
        StrategyType::Async,
        Some(LoadConfig::default()),
        ReaderOptions::default(),
    );
    strategy.load(&paths).expect("Loading failed");
}
