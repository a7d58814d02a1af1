use std::path::PathBuf;
use thiserror::Error;

/// The main error type for audiomnist-fetch operations.
///
/// Each variant is one failure kind of the download workflow, so the
/// binary can print remediation guidance that actually matches the cause.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to prepare directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("authentication with the Hugging Face Hub failed: {message}")]
    Auth { message: String },

    #[error("hub request for '{repo_id}' failed: {message}")]
    Api { repo_id: String, message: String },

    #[error("failed downloading from '{repo_id}': {message}")]
    Acquire { repo_id: String, message: String },

    #[error("split '{split}' is not available (found: {available})")]
    SplitUnavailable { split: String, available: String },

    #[error("failed to persist dataset under {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write manifest to {path}: {source}")]
    ManifestWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse manifest from {path}: {source}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    /// Remediation guidance tailored to the failure kind, printed by the
    /// binary underneath the error message.
    pub fn remediation(&self) -> &'static str {
        match self {
            FetchError::Auth { .. } => {
                "If authentication is required:\n\
                 1. Create a Hugging Face account at https://huggingface.co/\n\
                 2. Create a token at https://huggingface.co/settings/tokens\n\
                 3. Set the token as an environment variable:\n\
                 \x20  export HUGGINGFACE_TOKEN='your_token_here'\n\
                 4. Or login using: huggingface-cli login"
            }
            FetchError::Api { .. } | FetchError::Acquire { .. } => {
                "Check that your network connection is up and that\n\
                 https://huggingface.co/ is reachable, then re-run. Gated\n\
                 datasets additionally need a token in HUGGINGFACE_TOKEN."
            }
            FetchError::SplitUnavailable { .. } => {
                "Pass one of the listed splits with --split, or use\n\
                 --split all to download every available split."
            }
            FetchError::Directory { .. } => {
                "Check that the path is spelled correctly and that the\n\
                 current user may create directories there."
            }
            FetchError::Persist { .. }
            | FetchError::ManifestWrite { .. }
            | FetchError::ManifestRead { .. } => {
                "Check free disk space and write permissions under the\n\
                 output directory. Files from an interrupted run can be\n\
                 deleted safely and re-created by re-running the download."
            }
        }
    }
}
