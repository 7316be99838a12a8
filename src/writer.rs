use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{PipelineError, Result};
use crate::report::Document;

/// Destination for a finished report.
pub trait DocumentWriter {
    fn write(&mut self, document: &Document) -> Result<()>;
}

/// Writes the HTML report to a file, all or nothing.
///
/// Content goes to a sibling temporary file that is renamed over the
/// destination once fully written.
pub struct FileWriter {
    path: PathBuf,
}

impl FileWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "report.html".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_error(&self, source: std::io::Error) -> PipelineError {
        PipelineError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

impl DocumentWriter for FileWriter {
    fn write(&mut self, document: &Document) -> Result<()> {
        let html = document.to_html();
        let temp_path = self.temp_path();

        let written = fs::File::create(&temp_path).and_then(|mut file| {
            file.write_all(html.as_bytes())?;
            file.sync_all()
        });
        let renamed = written.and_then(|_| fs::rename(&temp_path, &self.path));

        if let Err(e) = renamed {
            if let Err(cleanup) = fs::remove_file(&temp_path) {
                if cleanup.kind() != std::io::ErrorKind::NotFound {
                    warn!(component = "writer", path = ?temp_path, error = %cleanup, "Failed to remove temporary file");
                }
            }
            return Err(self.write_error(e));
        }

        info!(
            action = "complete",
            component = "writer",
            path = ?self.path,
            bytes = html.len(),
            "Report written"
        );
        Ok(())
    }
}

/// Writes the HTML report to any byte stream, e.g. stdout.
pub struct StreamWriter<W> {
    inner: W,
}

impl<W: Write> StreamWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> DocumentWriter for StreamWriter<W> {
    fn write(&mut self, document: &Document) -> Result<()> {
        let html = document.to_html();
        self.inner
            .write_all(html.as_bytes())
            .and_then(|_| self.inner.flush())
            .map_err(|source| PipelineError::Write {
                path: PathBuf::from("-"),
                source,
            })
    }
}
