//! Audiomnist-fetch: download the AudioMNIST dataset from the Hugging Face
//! Hub and save it locally.
//!
//! The workflow is one sequential pass: resolve the CLI options, prepare
//! the target directories and hub session, fetch the requested split's
//! parquet shards, then copy them under the output directory and print
//! per-split sample counts.
//!
//! # Modules
//!
//! - [`config`]: run options resolved from the command line
//! - [`hf`]: Hugging Face Hub session, preflight, and shard acquisition
//! - [`persist`]: on-disk layout (copied shards plus a JSON manifest)
//! - [`report`]: console reports printed during a run
//! - [`error`]: error kinds and their remediation text

pub mod config;
pub mod error;
pub mod hf;
pub mod persist;
pub mod report;

use std::path::PathBuf;

use clap::Parser;

use config::{RunConfig, Split};
use hf::HubSession;
use report::{CompletionReport, ConfigReport, SampleCountReport};

pub use error::FetchError;

/// The audiomnist-fetch CLI application.
#[derive(Debug, Parser)]
#[command(name = "audiomnist-fetch")]
#[command(version, author, about)]
struct Cli {
    /// Directory to save the dataset.
    #[arg(long, default_value = "./data")]
    output_dir: PathBuf,

    /// Dataset split to download.
    #[arg(long, value_enum, default_value_t = Split::All)]
    split: Split,

    /// Cache directory for hub downloads.
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Worker-count hint for parallel processing.
    #[arg(long, default_value_t = 4)]
    num_proc: usize,
}

impl From<Cli> for RunConfig {
    fn from(cli: Cli) -> Self {
        RunConfig {
            output_dir: cli.output_dir,
            split: cli.split,
            cache_dir: cli.cache_dir,
            parallelism: cli.num_proc,
        }
    }
}

/// Run the audiomnist-fetch CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), FetchError> {
    let cli = Cli::parse();
    run_with_config(cli.into())
}

fn run_with_config(config: RunConfig) -> Result<(), FetchError> {
    persist::prepare_directories(&config)?;
    println!("{}", ConfigReport::new(&config));

    let session = HubSession::connect(&config)?;
    if session.is_authenticated() {
        println!("Using the hub token from HUGGINGFACE_TOKEN.");
    }

    println!();
    println!("Downloading AudioMNIST dataset...");
    println!("Note: shards are cached and reused on later runs.");

    let known_splits = hf::preflight::available_splits(hf::DATASET_ID, session.token());
    if let Some(names) = known_splits.as_deref() {
        println!("Available splits: {}", names.join(", "));
    }

    let handle = hf::fetch::fetch(&session, config.split, known_splits.as_deref())?;
    println!();
    println!("{}", SampleCountReport::from(&handle));

    println!();
    println!("Saving dataset to {}...", config.output_dir.display());
    let summary = persist::save_to_disk(&handle, &config.output_dir)?;
    println!();
    println!("{}", CompletionReport::from(&summary));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults_match_the_documented_surface() {
        let cli = Cli::try_parse_from(["audiomnist-fetch"]).expect("parse");
        assert_eq!(cli.output_dir, PathBuf::from("./data"));
        assert_eq!(cli.split, Split::All);
        assert_eq!(cli.cache_dir, None);
        assert_eq!(cli.num_proc, 4);
    }

    #[test]
    fn every_documented_split_parses() {
        for name in ["train", "test", "all"] {
            let cli =
                Cli::try_parse_from(["audiomnist-fetch", "--split", name]).expect("parse");
            assert_eq!(cli.split.as_str(), name);
        }
    }

    #[test]
    fn unknown_split_is_a_usage_error() {
        let error = Cli::try_parse_from(["audiomnist-fetch", "--split", "validation"])
            .expect_err("should fail");
        assert_eq!(error.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn overrides_are_honoured() {
        let cli = Cli::try_parse_from([
            "audiomnist-fetch",
            "--output-dir",
            "/tmp/out",
            "--cache-dir",
            "/tmp/cache",
            "--num-proc",
            "8",
            "--split",
            "train",
        ])
        .expect("parse");

        let config = RunConfig::from(cli);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.cache_dir, Some(PathBuf::from("/tmp/cache")));
        assert_eq!(config.parallelism, 8);
        assert_eq!(config.split, Split::Train);
    }
}
