use std::path::PathBuf;

use thiserror::Error;

/// Failure while rasterizing a frequency map into a chart image.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// Nothing to draw: the frequency map has no words.
    #[error("cannot render {chart}: vocabulary is empty")]
    EmptyVocabulary { chart: &'static str },
    /// Backend-specific failure.
    #[error("{chart} renderer failed: {reason}")]
    Backend { chart: &'static str, reason: String },
}

/// Every failure the analysis pipeline can surface to its caller.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to fetch records from {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("record {id} is missing required field `{field}`")]
    InvalidRecord { id: i64, field: &'static str },

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("failed to write report to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl PipelineError {
    /// Id of the offending record, for record-level failures.
    pub fn record_id(&self) -> Option<i64> {
        match self {
            PipelineError::InvalidRecord { id, .. } => Some(*id),
            _ => None,
        }
    }
}

pub type Result<T, E = PipelineError> = std::result::Result<T, E>;
