//! Run configuration resolved from the command line.

use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;
use serde::Serialize;

/// A named partition of the dataset, or `All` for every partition at once.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    Train,
    Test,
    All,
}

impl Split {
    /// The split name as it appears in hub file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Test => "test",
            Split::All => "all",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable options for a single download run.
///
/// Built once from CLI input; `split` is validated by clap's enumerated
/// values before any filesystem or network activity happens.
#[derive(Clone, Debug)]
pub struct RunConfig {
    /// Directory the dataset is saved under.
    pub output_dir: PathBuf,
    /// Which split(s) to download.
    pub split: Split,
    /// Cache directory handed to the hub client, if any.
    pub cache_dir: Option<PathBuf>,
    /// Worker-count hint. Accepted and echoed; the download loop itself
    /// runs single-worker.
    pub parallelism: usize,
}
