//! Console reports printed during a download run.
//!
//! These are user-facing text blocks, not a machine-readable protocol.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::{RunConfig, Split};
use crate::hf::DatasetHandle;
use crate::persist::SaveSummary;

const RULE_WIDTH: usize = 60;

fn rule(f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "{}", "=".repeat(RULE_WIDTH))
}

/// Configuration echo printed before any network activity.
#[derive(Clone, Debug, Serialize)]
pub struct ConfigReport {
    pub output_dir: PathBuf,
    pub split: Split,
    pub cache_dir: Option<PathBuf>,
    pub workers: usize,
}

impl ConfigReport {
    /// Build the echo block from the resolved run configuration. Paths are
    /// shown absolute when they resolve (they exist by the time this report
    /// is built).
    pub fn new(config: &RunConfig) -> Self {
        Self {
            output_dir: absolute(&config.output_dir),
            split: config.split,
            cache_dir: config.cache_dir.as_deref().map(absolute),
            workers: config.parallelism,
        }
    }
}

fn absolute(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

impl fmt::Display for ConfigReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        rule(f)?;
        writeln!(f, "AudioMNIST Dataset Download")?;
        rule(f)?;
        writeln!(f, "Output directory: {}", self.output_dir.display())?;
        writeln!(f, "Split: {}", self.split)?;
        if let Some(cache_dir) = &self.cache_dir {
            writeln!(f, "Cache directory: {}", cache_dir.display())?;
        }
        write!(f, "Workers: {}", self.workers)
    }
}

/// Per-split (or total) sample counts printed after the fetch stage.
#[derive(Clone, Debug, Serialize)]
pub enum SampleCountReport {
    PerSplit(Vec<SplitCount>),
    Total(usize),
}

/// One line of the per-split count report.
#[derive(Clone, Debug, Serialize)]
pub struct SplitCount {
    pub name: String,
    pub num_rows: usize,
}

impl From<&DatasetHandle> for SampleCountReport {
    fn from(handle: &DatasetHandle) -> Self {
        match handle {
            DatasetHandle::Single(split) => SampleCountReport::Total(split.num_rows),
            DatasetHandle::Splits(splits) => SampleCountReport::PerSplit(
                splits
                    .iter()
                    .map(|split| SplitCount {
                        name: split.name.clone(),
                        num_rows: split.num_rows,
                    })
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for SampleCountReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dataset downloaded successfully!")?;
        match self {
            SampleCountReport::PerSplit(counts) => {
                for (index, count) in counts.iter().enumerate() {
                    if index > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "  {}: {} samples", count.name, format_number(count.num_rows))?;
                }
                Ok(())
            }
            SampleCountReport::Total(total) => {
                write!(f, "  Total samples: {}", format_number(*total))
            }
        }
    }
}

/// Closing banner with the save location and a reload snippet.
#[derive(Clone, Debug, Serialize)]
pub struct CompletionReport {
    pub saved_to: PathBuf,
    pub files: usize,
    pub bytes: u64,
}

impl From<&SaveSummary> for CompletionReport {
    fn from(summary: &SaveSummary) -> Self {
        Self {
            saved_to: summary.root.clone(),
            files: summary.files,
            bytes: summary.bytes,
        }
    }
}

impl fmt::Display for CompletionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        rule(f)?;
        writeln!(f, "Download complete!")?;
        rule(f)?;
        writeln!(f)?;
        writeln!(f, "Dataset saved to: {}", self.saved_to.display())?;
        writeln!(
            f,
            "  {} file(s), {}",
            format_number(self.files),
            format_bytes(self.bytes)
        )?;
        writeln!(f)?;
        writeln!(f, "To load the dataset in your code:")?;
        writeln!(f, "  use audiomnist_fetch::persist::load_from_disk;")?;
        write!(
            f,
            "  let manifest = load_from_disk(Path::new(\"{}\"))?;",
            self.saved_to.display()
        )
    }
}

/// Format a number with thousands separators.
fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Human-readable byte size.
fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hf::SplitFetch;

    fn split(name: &str, num_rows: usize) -> SplitFetch {
        SplitFetch {
            name: name.to_string(),
            shards: Vec::new(),
            num_rows,
        }
    }

    #[test]
    fn mapping_report_lists_each_split_and_no_total() {
        let handle =
            DatasetHandle::Splits(vec![split("train", 10), split("test", 20)]);
        let rendered = SampleCountReport::from(&handle).to_string();

        assert!(rendered.contains("  train: 10 samples"));
        assert!(rendered.contains("  test: 20 samples"));
        assert!(!rendered.contains("Total"));
        assert!(!rendered.contains("30"));
    }

    #[test]
    fn single_report_prints_one_total_line() {
        let handle = DatasetHandle::Single(split("train", 15));
        let rendered = SampleCountReport::from(&handle).to_string();

        assert!(rendered.contains("  Total samples: 15"));
        assert!(!rendered.contains("train:"));
    }

    #[test]
    fn config_echo_mentions_cache_dir_only_when_set() {
        let with_cache = ConfigReport {
            output_dir: PathBuf::from("/data"),
            split: Split::All,
            cache_dir: Some(PathBuf::from("/cache")),
            workers: 4,
        };
        let rendered = with_cache.to_string();
        assert!(rendered.contains("Output directory: /data"));
        assert!(rendered.contains("Split: all"));
        assert!(rendered.contains("Cache directory: /cache"));
        assert!(rendered.contains("Workers: 4"));

        let without_cache = ConfigReport {
            cache_dir: None,
            ..with_cache
        };
        assert!(!without_cache.to_string().contains("Cache directory"));
    }

    #[test]
    fn completion_report_names_the_save_path() {
        let report = CompletionReport {
            saved_to: PathBuf::from("/data/AudioMNIST"),
            files: 3,
            bytes: 2048,
        };
        let rendered = report.to_string();
        assert!(rendered.contains("Download complete!"));
        assert!(rendered.contains("Dataset saved to: /data/AudioMNIST"));
        assert!(rendered.contains("3 file(s), 2.0 KiB"));
        assert!(rendered.contains("load_from_disk"));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(123), "123");
        assert_eq!(format_number(1234), "1,234");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KiB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MiB");
    }
}
