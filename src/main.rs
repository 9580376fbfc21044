//! achtool
//!
//! Command-line interface for reading, validating, flattening and merging
//! NACHA ACH files.
//!
//! # Usage
//!
//! ```bash
//! achtool validate payroll.ach
//! achtool describe payroll.ach > batches.csv
//! achtool flatten --crlf payroll.ach > flat.ach
//! achtool merge --out-dir merged --max-lines 10000 a.ach b.ach c.ach
//! achtool -vv merge --strategy async --max-concurrent 8 --out-dir merged inbox/*.ach
//! ```
//!
//! Logs go to stderr; `-v` raises the level from warn to info, debug and
//! trace.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: The input has errors, or a file could not be read or written

use rust_ach_engine::cli::{self, CliArgs, Command, MergeArgs, StrategyType};
use rust_ach_engine::core::{flatten_batches, merge_files, File};
use rust_ach_engine::io::reader::read_file;
use rust_ach_engine::io::{summarize, write_summary_csv, ReadResult, Writer};
use rust_ach_engine::strategy;
use rust_ach_engine::types::AchError;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::process;
use tracing::{error, info};

fn main() {
    let args = cli::parse_args();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(args.log_level())
        .init();

    match run(&args) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

/// Run the selected command. `Ok(false)` means the input had errors.
fn run(args: &CliArgs) -> Result<bool, AchError> {
    match &args.command {
        Command::Validate { file } => validate(args, file),
        Command::Describe { file } => describe(args, file),
        Command::Flatten { file } => flatten(args, file),
        Command::Merge(merge) => merge_command(args, merge),
    }
}

fn report_errors(path: &Path, result: &ReadResult) {
    for e in &result.errors {
        eprintln!("{}: {}", path.display(), e);
    }
}

fn validate(args: &CliArgs, path: &Path) -> Result<bool, AchError> {
    let result = read_file(path, &args.reader_options())?;
    let mut output = std::io::stdout().lock();
    for e in &result.errors {
        writeln!(output, "{}", e)?;
    }
    info!(
        path = %path.display(),
        batches = result.file.batch_count(),
        errors = result.errors.len(),
        "validated file"
    );
    Ok(result.is_ok())
}

fn describe(args: &CliArgs, path: &Path) -> Result<bool, AchError> {
    let result = read_file(path, &args.reader_options())?;
    report_errors(path, &result);
    let mut output = std::io::stdout().lock();
    write_summary_csv(&summarize(&result.file), &mut output)?;
    Ok(result.is_ok())
}

fn flatten(args: &CliArgs, path: &Path) -> Result<bool, AchError> {
    let result = read_file(path, &args.reader_options())?;
    if !result.is_ok() {
        report_errors(path, &result);
        return Ok(false);
    }
    let flat = flatten_batches(result.file)?;
    let mut writer = Writer::with_options(std::io::stdout().lock(), args.writer_options());
    writer.write(&flat)?;
    Ok(true)
}

fn merge_command(args: &CliArgs, merge: &MergeArgs) -> Result<bool, AchError> {
    let config = match merge.strategy {
        StrategyType::Async => Some(merge.to_load_config()),
        StrategyType::Sync => None,
    };
    let loader = strategy::create_strategy(merge.strategy, config, args.reader_options());
    let loaded = loader.load(&merge.files)?;

    let mut clean = true;
    let mut files: Vec<File> = Vec::with_capacity(loaded.len());
    for input in loaded {
        if input.result.is_ok() {
            files.push(input.result.file);
        } else {
            report_errors(&input.path, &input.result);
            clean = false;
        }
    }
    if !clean {
        return Ok(false);
    }

    let merged = merge_files(files, &merge.conditions())?;
    std::fs::create_dir_all(&merge.out_dir)?;
    for (index, file) in merged.iter().enumerate() {
        let path = merge.out_dir.join(format!("merged-{:03}.ach", index + 1));
        let output = BufWriter::new(std::fs::File::create(&path)?);
        Writer::with_options(output, args.writer_options()).write(file)?;
        info!(path = %path.display(), batches = file.batch_count(), "wrote merged file");
        println!("{}", path.display());
    }
    Ok(true)
}
