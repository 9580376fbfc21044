use crate::core::{MergeConditions, ValidateOpts};
use crate::io::{ReaderOptions, WriterOptions};
use crate::strategy::LoadConfig;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::Level;

/// Read, validate, flatten and merge NACHA ACH files
#[derive(Parser, Debug)]
#[command(name = "achtool")]
#[command(about = "Read, validate, flatten and merge NACHA ACH files", long_about = None)]
pub struct CliArgs {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Write CRLF line endings instead of LF
    #[arg(long = "crlf", global = true)]
    pub crlf: bool,

    /// Accept entries whose addenda indicator is set without any addenda
    #[arg(long = "allow-missing-addenda", global = true)]
    pub allow_missing_addenda: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read a file and print every error found
    Validate {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Print a CSV summary of each batch
    Describe {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Combine compatible batches and write the file to stdout
    Flatten {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Merge files into as few files as the ceilings allow
    Merge(MergeArgs),
}

#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Input ACH files
    #[arg(value_name = "FILES", required = true)]
    pub files: Vec<PathBuf>,

    /// Directory receiving the merged files
    #[arg(long = "out-dir", value_name = "DIR")]
    pub out_dir: PathBuf,

    /// Most lines per output file
    #[arg(long = "max-lines", value_name = "LINES")]
    pub max_lines: Option<usize>,

    /// Most cents (debits plus credits) per output file
    #[arg(long = "max-dollar-amount", value_name = "CENTS")]
    pub max_dollar_amount: Option<u64>,

    /// Loading strategy to use for reading the inputs
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "sync",
        help = "Loading strategy: 'sync' reads files one by one, 'async' reads them concurrently"
    )]
    pub strategy: StrategyType,

    /// Maximum number of files read concurrently (async mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Maximum number of files read concurrently (default: CPU cores)"
    )]
    pub max_concurrent_files: Option<usize>,
}

/// Available strategies for loading input files
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

impl CliArgs {
    /// Most verbose level the log subscriber lets through
    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    pub fn reader_options(&self) -> ReaderOptions {
        ReaderOptions {
            validate: ValidateOpts {
                allow_missing_addenda: self.allow_missing_addenda,
            },
            ..ReaderOptions::default()
        }
    }

    pub fn writer_options(&self) -> WriterOptions {
        if self.crlf {
            WriterOptions::crlf()
        } else {
            WriterOptions::default()
        }
    }
}

impl MergeArgs {
    pub fn conditions(&self) -> MergeConditions {
        MergeConditions {
            max_lines: self.max_lines,
            max_dollar_amount: self.max_dollar_amount,
        }
    }

    /// Create a LoadConfig from CLI arguments, falling back to defaults
    pub fn to_load_config(&self) -> LoadConfig {
        match self.max_concurrent_files {
            Some(max) => LoadConfig::new(max),
            None => LoadConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn merge_args(args: &[&str]) -> MergeArgs {
        match CliArgs::try_parse_from(args).unwrap().command {
            Command::Merge(merge) => merge,
            other => panic!("Expected merge, got {:?}", other),
        }
    }

    #[rstest]
    #[case::validate(&["achtool", "validate", "in.ach"], "validate")]
    #[case::describe(&["achtool", "describe", "in.ach"], "describe")]
    #[case::flatten(&["achtool", "flatten", "in.ach"], "flatten")]
    #[case::merge(&["achtool", "merge", "a.ach", "--out-dir", "out"], "merge")]
    fn test_subcommand_parsing(#[case] args: &[&str], #[case] expected: &str) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        let name = match parsed.command {
            Command::Validate { .. } => "validate",
            Command::Describe { .. } => "describe",
            Command::Flatten { .. } => "flatten",
            Command::Merge(_) => "merge",
        };
        assert_eq!(name, expected);
    }

    #[rstest]
    #[case::quiet(&["achtool", "validate", "in.ach"], Level::WARN)]
    #[case::info(&["achtool", "-v", "validate", "in.ach"], Level::INFO)]
    #[case::debug(&["achtool", "validate", "-vv", "in.ach"], Level::DEBUG)]
    #[case::trace(&["achtool", "-vvvv", "validate", "in.ach"], Level::TRACE)]
    fn test_log_level(#[case] args: &[&str], #[case] expected: Level) {
        assert_eq!(CliArgs::try_parse_from(args).unwrap().log_level(), expected);
    }

    #[rstest]
    #[case::lf(&["achtool", "flatten", "in.ach"], "\n")]
    #[case::crlf(&["achtool", "flatten", "--crlf", "in.ach"], "\r\n")]
    fn test_line_endings(#[case] args: &[&str], #[case] expected: &str) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.writer_options().line_ending, expected);
    }

    #[test]
    fn test_allow_missing_addenda() {
        let parsed =
            CliArgs::try_parse_from(["achtool", "--allow-missing-addenda", "validate", "in.ach"])
                .unwrap();
        assert!(parsed.reader_options().validate.allow_missing_addenda);
    }

    #[test]
    fn test_merge_options() {
        let merge = merge_args(&[
            "achtool",
            "merge",
            "a.ach",
            "b.ach",
            "--out-dir",
            "out",
            "--max-lines",
            "500",
            "--max-dollar-amount",
            "1000000",
            "--strategy",
            "async",
            "--max-concurrent",
            "4",
        ]);
        assert_eq!(merge.files, vec![PathBuf::from("a.ach"), PathBuf::from("b.ach")]);
        assert_eq!(merge.out_dir, PathBuf::from("out"));
        assert_eq!(merge.strategy, StrategyType::Async);
        assert_eq!(
            merge.conditions(),
            MergeConditions {
                max_lines: Some(500),
                max_dollar_amount: Some(1000000),
            }
        );
        assert_eq!(merge.to_load_config().max_concurrent_files, 4);
    }

    #[rstest]
    #[case::defaults(&["achtool", "merge", "a.ach", "--out-dir", "out"], num_cpus::get())]
    #[case::zero_falls_back(&["achtool", "merge", "a.ach", "--out-dir", "out", "--max-concurrent", "0"], num_cpus::get())]
    fn test_load_config_conversion(#[case] args: &[&str], #[case] expected: usize) {
        let merge = merge_args(args);
        assert_eq!(merge.strategy, StrategyType::Sync);
        assert_eq!(merge.conditions(), MergeConditions::default());
        assert_eq!(merge.to_load_config().max_concurrent_files, expected);
    }

    #[rstest]
    #[case::missing_command(&["achtool"])]
    #[case::missing_file(&["achtool", "validate"])]
    #[case::merge_without_inputs(&["achtool", "merge", "--out-dir", "out"])]
    #[case::merge_without_out_dir(&["achtool", "merge", "a.ach"])]
    #[case::invalid_strategy(&["achtool", "merge", "a.ach", "--out-dir", "out", "--strategy", "invalid"])]
    fn test_parsing_errors(#[case] args: &[&str]) {
        assert!(CliArgs::try_parse_from(args).is_err());
    }
}
