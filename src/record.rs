use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// One post as returned by the source.
///
/// `title` and `body` stay optional so a malformed entry survives decoding
/// and is rejected by the analyzer with its id attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

impl Record {
    pub fn new(id: i64, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id,
            title: Some(title.into()),
            body: Some(body.into()),
        }
    }

    pub fn title(&self) -> Result<&str> {
        self.title.as_deref().ok_or(PipelineError::InvalidRecord {
            id: self.id,
            field: "title",
        })
    }

    pub fn body(&self) -> Result<&str> {
        self.body.as_deref().ok_or(PipelineError::InvalidRecord {
            id: self.id,
            field: "body",
        })
    }
}
