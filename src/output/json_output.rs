//! JSON results file
//!
//! The results file is a pretty-printed array of [`CrawlRecord`]s. It is
//! written to a sibling temporary file first and renamed into place, so a
//! reader never sees a partial array.

use crate::output::record::{CrawlRecord, CrawlRun};
use crate::output::traits::{OutputError, OutputResult, ResultSink};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes the run as a JSON array to a fixed path
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    /// Creates a sink writing to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Destination path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Writes `contents` to `path` through a sibling `.tmp` file and a rename
///
/// Missing parent directories are created. On failure the temporary file is
/// removed and `path` is left as it was.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> OutputResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    let temp_path = path.with_file_name(name);

    let write_result = (|| -> std::io::Result<()> {
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(contents)?;
        file.sync_all()?;
        Ok(())
    })();

    if let Err(e) = write_result.and_then(|()| fs::rename(&temp_path, path)) {
        let _ = fs::remove_file(&temp_path);
        return Err(OutputError::Write {
            path: path.display().to_string(),
            message: e.to_string(),
        });
    }

    Ok(())
}

impl ResultSink for JsonFileSink {
    fn name(&self) -> String {
        format!("json:{}", self.path.display())
    }

    fn persist(&mut self, run: &CrawlRun) -> OutputResult<()> {
        let mut json = serde_json::to_string_pretty(&run.records)?;
        json.push('\n');

        write_atomic(&self.path, json.as_bytes())?;

        tracing::debug!("Wrote {} records to {}", run.len(), self.path.display());
        Ok(())
    }
}

/// Loads a results file written by [`JsonFileSink`]
pub fn load_results(path: &Path) -> OutputResult<Vec<CrawlRecord>> {
    let content = fs::read_to_string(path)?;
    let records = serde_json::from_str(&content)?;
    Ok(records)
}
