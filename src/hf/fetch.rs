use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use hf_hub::api::sync::ApiRepo;
use parquet::file::reader::{FileReader, SerializedFileReader};

use crate::config::Split;
use crate::error::FetchError;

use super::{DatasetHandle, HubSession, SplitFetch, DATASET_ID};

/// Download the parquet shards for the requested split selection.
///
/// `known_splits` is the best-effort preflight listing; when present it is
/// used to reject an unavailable split before any shard download starts.
/// Shards download one at a time through the hub cache.
pub fn fetch(
    session: &HubSession,
    selector: Split,
    known_splits: Option<&[String]>,
) -> Result<DatasetHandle, FetchError> {
    if selector != Split::All {
        if let Some(known) = known_splits {
            if !known.iter().any(|name| name == selector.as_str()) {
                return Err(FetchError::SplitUnavailable {
                    split: selector.as_str().to_string(),
                    available: known.join(", "),
                });
            }
        }
    }

    let repo = session.api().dataset(DATASET_ID.to_string());
    let info = repo.info().map_err(|source| api_error(source.to_string()))?;

    let remote_paths: Vec<String> = info
        .siblings
        .iter()
        .map(|sibling| sibling.rfilename.clone())
        .collect();
    let by_split = shards_by_split(&remote_paths);

    if by_split.is_empty() {
        return Err(FetchError::Acquire {
            repo_id: DATASET_ID.to_string(),
            message: "no parquet shards found in the repository".to_string(),
        });
    }

    match selector {
        Split::All => {
            let mut splits = Vec::with_capacity(by_split.len());
            for (name, shards) in by_split {
                splits.push(download_split(&repo, &name, &shards)?);
            }
            Ok(DatasetHandle::Splits(splits))
        }
        single => {
            let name = single.as_str();
            let shards = by_split
                .get(name)
                .ok_or_else(|| FetchError::SplitUnavailable {
                    split: name.to_string(),
                    available: by_split.keys().cloned().collect::<Vec<_>>().join(", "),
                })?;
            Ok(DatasetHandle::Single(download_split(&repo, name, shards)?))
        }
    }
}

fn download_split(
    repo: &ApiRepo,
    name: &str,
    remote_paths: &[String],
) -> Result<SplitFetch, FetchError> {
    let mut shards = Vec::with_capacity(remote_paths.len());
    let mut num_rows = 0usize;

    for remote_path in remote_paths {
        println!("  fetching {remote_path}");
        let local = repo
            .get(remote_path)
            .map_err(|source| acquire_error(format!("'{remote_path}': {source}")))?;
        num_rows += count_rows(&local)?;
        shards.push(local);
    }

    Ok(SplitFetch {
        name: name.to_string(),
        shards,
        num_rows,
    })
}

/// Sample count read from a shard's parquet footer. Row contents are never
/// decoded.
pub fn count_rows(path: &Path) -> Result<usize, FetchError> {
    let file = File::open(path)
        .map_err(|source| acquire_error(format!("cannot open '{}': {source}", path.display())))?;
    let reader = SerializedFileReader::new(file).map_err(|source| {
        acquire_error(format!("invalid parquet shard '{}': {source}", path.display()))
    })?;

    let rows = reader.metadata().file_metadata().num_rows();
    usize::try_from(rows)
        .map_err(|_| acquire_error(format!("negative row count in '{}'", path.display())))
}

fn api_error(message: String) -> FetchError {
    if is_auth_message(&message) {
        FetchError::Auth { message }
    } else {
        FetchError::Api {
            repo_id: DATASET_ID.to_string(),
            message,
        }
    }
}

fn acquire_error(message: String) -> FetchError {
    if is_auth_message(&message) {
        FetchError::Auth { message }
    } else {
        FetchError::Acquire {
            repo_id: DATASET_ID.to_string(),
            message,
        }
    }
}

fn is_auth_message(message: &str) -> bool {
    let lowered = message.to_ascii_lowercase();
    lowered.contains("401")
        || lowered.contains("403")
        || lowered.contains("unauthorized")
        || lowered.contains("forbidden")
}

fn shards_by_split(paths: &[String]) -> BTreeMap<String, Vec<String>> {
    let mut by_split: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for path in paths {
        if !path.ends_with(".parquet") {
            continue;
        }
        if let Some(split) = infer_split_from_shard_path(path) {
            by_split.entry(split).or_default().push(path.clone());
        }
    }

    for shards in by_split.values_mut() {
        shards.sort();
    }
    by_split
}

fn infer_split_from_shard_path(path: &str) -> Option<String> {
    let parsed = Path::new(path);
    let file_name = parsed
        .file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.to_ascii_lowercase());

    if let Some(file_name) = file_name {
        if let Some((prefix, _)) = file_name.split_once('-') {
            if let Some(normalized) = normalize_split_name(prefix) {
                return Some(normalized.to_string());
            }
        }
        if let Some(stem) = file_name.strip_suffix(".parquet") {
            if let Some(normalized) = normalize_split_name(stem) {
                return Some(normalized.to_string());
            }
        }
    }

    for component in parsed.components().rev() {
        let Some(name) = component.as_os_str().to_str() else {
            continue;
        };
        if let Some(normalized) = normalize_split_name(name) {
            return Some(normalized.to_string());
        }
    }

    None
}

fn normalize_split_name(name: &str) -> Option<&'static str> {
    match name.to_ascii_lowercase().as_str() {
        "train" => Some("train"),
        "test" => Some("test"),
        "validation" | "valid" | "val" => Some("validation"),
        "dev" => Some("dev"),
        _ => None,
    }
}
