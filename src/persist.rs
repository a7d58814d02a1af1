//! On-disk dataset layout: copied shards plus a JSON manifest.
//!
//! A saved dataset lives under `<output_dir>/AudioMNIST/` with one
//! directory per split and a `manifest.json` describing the shard files
//! and their sample counts. [`load_from_disk`] is the reload counterpart.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::config::RunConfig;
use crate::error::FetchError;
use crate::hf::{DatasetHandle, DATASET_ID};

/// Directory name the dataset is saved under inside `output_dir`.
pub const DATASET_DIR_NAME: &str = "AudioMNIST";

const MANIFEST_FILE_NAME: &str = "manifest.json";

/// Description of one saved dataset directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetManifest {
    pub dataset_id: String,
    pub splits: Vec<ManifestSplit>,
}

/// One split inside a saved dataset directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestSplit {
    pub name: String,
    pub files: Vec<String>,
    pub num_rows: usize,
}

/// Size accounting for a completed save.
#[derive(Clone, Debug)]
pub struct SaveSummary {
    pub root: PathBuf,
    pub files: usize,
    pub bytes: u64,
}

/// Create `output_dir` (and `cache_dir` if configured). Idempotent.
pub fn prepare_directories(config: &RunConfig) -> Result<(), FetchError> {
    create_dir(&config.output_dir)?;
    if let Some(cache_dir) = config.cache_dir.as_ref() {
        create_dir(cache_dir)?;
    }
    Ok(())
}

fn create_dir(path: &Path) -> Result<(), FetchError> {
    fs::create_dir_all(path).map_err(|source| FetchError::Directory {
        path: path.to_path_buf(),
        source,
    })
}

/// Copy the fetched shards under `output_dir/AudioMNIST/<split>/` and write
/// the manifest describing them.
pub fn save_to_disk(
    handle: &DatasetHandle,
    output_dir: &Path,
) -> Result<SaveSummary, FetchError> {
    let root = output_dir.join(DATASET_DIR_NAME);
    create_dir(&root)?;

    let mut manifest = DatasetManifest {
        dataset_id: DATASET_ID.to_string(),
        splits: Vec::new(),
    };

    for split in handle.splits() {
        let split_dir = root.join(&split.name);
        create_dir(&split_dir)?;

        let mut files = Vec::with_capacity(split.shards.len());
        for shard in &split.shards {
            let file_name = shard.file_name().ok_or_else(|| FetchError::Persist {
                path: shard.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "shard path has no file name",
                ),
            })?;
            place_file(shard, &split_dir.join(file_name))?;
            files.push(file_name.to_string_lossy().into_owned());
        }

        manifest.splits.push(ManifestSplit {
            name: split.name.clone(),
            files,
            num_rows: split.num_rows,
        });
    }

    write_manifest(&manifest, &root)?;

    let (files, bytes) = measure_tree(&root);
    Ok(SaveSummary { root, files, bytes })
}

/// Read a previously saved dataset directory back into its manifest,
/// verifying that every listed shard file is still present.
pub fn load_from_disk(path: &Path) -> Result<DatasetManifest, FetchError> {
    let manifest_path = path.join(MANIFEST_FILE_NAME);
    let payload = fs::read_to_string(&manifest_path).map_err(|source| FetchError::Persist {
        path: manifest_path.clone(),
        source,
    })?;
    let manifest: DatasetManifest =
        serde_json::from_str(&payload).map_err(|source| FetchError::ManifestRead {
            path: manifest_path,
            source,
        })?;

    for split in &manifest.splits {
        for file in &split.files {
            let shard = path.join(&split.name).join(file);
            if !shard.is_file() {
                return Err(FetchError::Persist {
                    path: shard,
                    source: std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        "shard listed in manifest is missing",
                    ),
                });
            }
        }
    }

    Ok(manifest)
}

// Shards already live in the hub cache on the same filesystem most of the
// time, so try a hard link before falling back to a copy.
fn place_file(source_path: &Path, target: &Path) -> Result<(), FetchError> {
    if target.exists() {
        fs::remove_file(target).map_err(|source| FetchError::Persist {
            path: target.to_path_buf(),
            source,
        })?;
    }
    if fs::hard_link(source_path, target).is_ok() {
        return Ok(());
    }
    fs::copy(source_path, target)
        .map(|_| ())
        .map_err(|source| FetchError::Persist {
            path: target.to_path_buf(),
            source,
        })
}

fn write_manifest(manifest: &DatasetManifest, root: &Path) -> Result<(), FetchError> {
    let path = root.join(MANIFEST_FILE_NAME);
    let payload = serde_json::to_string_pretty(manifest).map_err(|source| {
        FetchError::ManifestWrite {
            path: path.clone(),
            source,
        }
    })?;
    fs::write(&path, payload).map_err(|source| FetchError::Persist { path, source })
}

fn measure_tree(root: &Path) -> (usize, u64) {
    let mut files = 0usize;
    let mut bytes = 0u64;
    for entry in WalkDir::new(root).into_iter().flatten() {
        if entry.file_type().is_file() {
            files += 1;
            bytes += entry.metadata().map(|meta| meta.len()).unwrap_or(0);
        }
    }
    (files, bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Split;
    use crate::hf::SplitFetch;
    use tempfile::TempDir;

    fn config_for(dir: &TempDir) -> RunConfig {
        RunConfig {
            output_dir: dir.path().join("data"),
            split: Split::All,
            cache_dir: Some(dir.path().join("cache")),
            parallelism: 4,
        }
    }

    #[test]
    fn prepare_directories_creates_and_is_idempotent() {
        let dir = TempDir::new().expect("tempdir");
        let config = config_for(&dir);

        prepare_directories(&config).expect("first run");
        assert!(config.output_dir.is_dir());
        assert!(config.cache_dir.as_ref().expect("cache dir").is_dir());

        prepare_directories(&config).expect("second run");
    }

    #[test]
    fn manifest_round_trips_through_json() {
        let manifest = DatasetManifest {
            dataset_id: DATASET_ID.to_string(),
            splits: vec![ManifestSplit {
                name: "train".to_string(),
                files: vec!["train-00000-of-00001.parquet".to_string()],
                num_rows: 10,
            }],
        };

        let payload = serde_json::to_string_pretty(&manifest).expect("serialize");
        let parsed: DatasetManifest = serde_json::from_str(&payload).expect("parse");
        assert_eq!(parsed, manifest);
    }

    #[test]
    fn save_places_shards_under_split_directories() {
        let dir = TempDir::new().expect("tempdir");
        let shard = dir.path().join("train-00000-of-00001.parquet");
        fs::write(&shard, b"shard bytes").expect("write shard");

        let handle = DatasetHandle::Single(SplitFetch {
            name: "train".to_string(),
            shards: vec![shard],
            num_rows: 15,
        });

        let output_dir = dir.path().join("data");
        let summary = save_to_disk(&handle, &output_dir).expect("save");

        assert_eq!(summary.root, output_dir.join(DATASET_DIR_NAME));
        assert!(summary
            .root
            .join("train")
            .join("train-00000-of-00001.parquet")
            .is_file());
        assert_eq!(summary.files, 2);
        assert!(summary.bytes > 0);

        let manifest = load_from_disk(&summary.root).expect("load");
        assert_eq!(manifest.splits.len(), 1);
        assert_eq!(manifest.splits[0].num_rows, 15);
    }

    #[test]
    fn loading_reports_a_missing_shard() {
        let dir = TempDir::new().expect("tempdir");
        let shard = dir.path().join("test-00000-of-00001.parquet");
        fs::write(&shard, b"shard bytes").expect("write shard");

        let handle = DatasetHandle::Single(SplitFetch {
            name: "test".to_string(),
            shards: vec![shard],
            num_rows: 3,
        });
        let output_dir = dir.path().join("data");
        let summary = save_to_disk(&handle, &output_dir).expect("save");

        fs::remove_file(
            summary
                .root
                .join("test")
                .join("test-00000-of-00001.parquet"),
        )
        .expect("remove shard");

        let error = load_from_disk(&summary.root).expect_err("should fail");
        assert!(matches!(error, FetchError::Persist { .. }));
    }
}
