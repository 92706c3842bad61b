use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::errors::{MinerError, Result};
use crate::tree::RawNode;
use crate::types::LabeledResult;

/// Name of the file written by [`JsonLinesStorage`] inside its directory.
pub const JSONL_FILENAME: &str = "labeled.jsonl";

/// Sink for labeled units, opened once per language.
///
/// `close` must be called on every exit path; it flushes buffered output and
/// reports write failures that `Drop` would otherwise swallow.
pub trait Storage {
    fn store(&mut self, result: &LabeledResult<'_>) -> Result<()>;

    fn close(self: Box<Self>) -> Result<()>;
}

/// One stored line.
#[derive(Debug, Serialize)]
struct StoredUnit<'a> {
    id: String,
    label: &'a str,
    path: &'a str,
    tree: RawNode,
}

/// Writes each labeled unit as one JSON object per line.
pub struct JsonLinesStorage {
    writer: BufWriter<File>,
    path: PathBuf,
    written: usize,
}

impl JsonLinesStorage {
    /// Creates `dir` if needed and opens `dir/labeled.jsonl` for writing.
    pub fn create(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir).map_err(|e| MinerError::Storage {
            message: format!("failed to create storage directory: {e}"),
            path: dir.display().to_string(),
        })?;
        let path = dir.join(JSONL_FILENAME);
        let file = File::create(&path).map_err(|e| MinerError::Storage {
            message: format!("failed to create storage file: {e}"),
            path: path.display().to_string(),
        })?;
        Ok(Self {
            writer: BufWriter::new(file),
            path,
            written: 0,
        })
    }

    fn storage_error(&self, e: impl std::fmt::Display) -> MinerError {
        MinerError::Storage {
            message: format!("failed to write labeled unit: {e}"),
            path: self.path.display().to_string(),
        }
    }
}

impl Storage for JsonLinesStorage {
    fn store(&mut self, result: &LabeledResult<'_>) -> Result<()> {
        let unit = StoredUnit {
            id: result.id(),
            label: &result.label,
            path: &result.file_path,
            tree: result.root.to_raw(),
        };
        let line = serde_json::to_string(&unit)?;
        writeln!(self.writer, "{line}").map_err(|e| self.storage_error(e))?;
        self.written += 1;
        Ok(())
    }

    fn close(mut self: Box<Self>) -> Result<()> {
        self.writer.flush().map_err(|e| self.storage_error(e))?;
        debug!(path = %self.path.display(), units = self.written, "closed storage");
        Ok(())
    }
}
