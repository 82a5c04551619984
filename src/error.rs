use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SummaryError {
    #[error("failed to run `{command}`: {source}")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` failed: {stderr}")]
    CommandFailed {
        command: String,
        stderr: String,
    },

    #[error("`{command}` produced output that is not valid UTF-8")]
    CommandOutput {
        command: String,
    },

    #[error("failed to parse {what}: {source}")]
    Parse {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("package '{0}' appears more than once in the workspace metadata")]
    DuplicatePackage(String),

    #[error("package '{0}' is not part of the workspace metadata")]
    UnknownPackage(String),

    #[error("Could not find license file for '{0}'")]
    LicenseNotFound(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write report: {0}")]
    Write(#[source] std::io::Error),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl SummaryError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SummaryError::Io { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, SummaryError>;
