//! Best-effort queries against the Hugging Face dataset viewer API.

use std::collections::BTreeSet;

use serde_json::Value;

use super::DOWNLOAD_TIMEOUT;

/// Split names reported by the dataset viewer, sorted.
///
/// Returns `None` when the viewer is unreachable or answers with anything
/// unexpected; the caller then falls back to inferring splits from shard
/// file names.
pub fn available_splits(repo_id: &str, token: Option<&str>) -> Option<Vec<String>> {
    let splits_json = fetch_viewer_json("splits", repo_id, token).ok()?;
    let splits = extract_split_names(&splits_json);
    if splits.is_empty() {
        None
    } else {
        Some(splits)
    }
}

fn fetch_viewer_json(
    endpoint: &str,
    repo_id: &str,
    token: Option<&str>,
) -> Result<Value, String> {
    let mut url = url::Url::parse(&format!(
        "https://datasets-server.huggingface.co/{endpoint}"
    ))
    .map_err(|source| source.to_string())?;
    url.query_pairs_mut().append_pair("dataset", repo_id);

    let config = ureq::Agent::config_builder()
        .timeout_global(Some(DOWNLOAD_TIMEOUT))
        .build();
    let agent: ureq::Agent = config.into();

    let mut request = agent.get(url.as_str());
    if let Some(token) = token {
        request = request.header("Authorization", &format!("Bearer {token}"));
    }

    let mut response = request.call().map_err(|source| source.to_string())?;
    response
        .body_mut()
        .read_json::<Value>()
        .map_err(|source| source.to_string())
}

fn extract_split_names(splits_json: &Value) -> Vec<String> {
    let mut names = BTreeSet::new();
    if let Some(items) = splits_json.get("splits").and_then(Value::as_array) {
        for item in items {
            if let Some(name) = item.get("split").and_then(Value::as_str) {
                names.insert(name.to_string());
            }
        }
    }
    names.into_iter().collect()
}
