//! Hugging Face Hub orchestration helpers.
//!
//! This module owns remote-specific concerns (session setup, preflight, and
//! shard acquisition). Local persistence stays in `crate::persist`.

pub mod fetch;
pub mod preflight;

use std::path::PathBuf;
use std::time::Duration;

use hf_hub::api::sync::{Api, ApiBuilder};

use crate::config::RunConfig;
use crate::error::FetchError;

/// Canonical hub id of the dataset this tool downloads.
pub const DATASET_ID: &str = "gilkeyio/AudioMNIST";

/// Timeout applied to the hub-side HTTP requests this crate builds itself.
pub(crate) const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);

/// One fetched split: its name, the local shard files, and the sample count
/// read from the parquet footers.
#[derive(Clone, Debug)]
pub struct SplitFetch {
    pub name: String,
    pub shards: Vec<PathBuf>,
    pub num_rows: usize,
}

/// Result of the fetch stage: one requested split, or every split the
/// repository carries.
#[derive(Clone, Debug)]
pub enum DatasetHandle {
    Single(SplitFetch),
    Splits(Vec<SplitFetch>),
}

impl DatasetHandle {
    /// The fetched splits, in download order.
    pub fn splits(&self) -> &[SplitFetch] {
        match self {
            DatasetHandle::Single(split) => std::slice::from_ref(split),
            DatasetHandle::Splits(splits) => splits,
        }
    }

    /// Sample count summed over every fetched split.
    pub fn total_rows(&self) -> usize {
        self.splits().iter().map(|split| split.num_rows).sum()
    }
}

/// An (optionally authenticated) connection to the hub.
pub struct HubSession {
    api: Api,
    token: Option<String>,
}

impl HubSession {
    /// Build the hub client for this run.
    ///
    /// Reads `HUGGINGFACE_TOKEN` from the environment. A present, non-empty
    /// value is handed to the client exactly once; an absent or empty value
    /// leaves the session unauthenticated, which is fine for public
    /// datasets (a gated repo then fails at fetch time instead).
    pub fn connect(config: &RunConfig) -> Result<Self, FetchError> {
        let token = token_from_env(std::env::var("HUGGINGFACE_TOKEN").ok());

        let mut builder = ApiBuilder::new().with_progress(false);
        if let Some(cache_dir) = config.cache_dir.as_ref() {
            builder = builder.with_cache_dir(cache_dir.clone());
        }
        if token.is_some() {
            builder = builder.with_token(token.clone());
        }

        let api = builder.build().map_err(|source| FetchError::Api {
            repo_id: DATASET_ID.to_string(),
            message: source.to_string(),
        })?;

        Ok(Self { api, token })
    }

    pub(crate) fn api(&self) -> &Api {
        &self.api
    }

    /// Whether a hub token was supplied for this session.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// The token reused for authorized preflight requests, if any.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

fn token_from_env(raw: Option<String>) -> Option<String> {
    raw.filter(|token| !token.trim().is_empty())
}
