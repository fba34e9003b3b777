//! Per-device configuration artifacts and their on-disk form.

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::topology::store::{write_atomically, StoreError};

/// Rendered configuration of one device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub device_id: String,
    pub statements: Vec<String>,
}

impl Artifact {
    pub fn empty(device_id: &str) -> Self {
        Self {
            device_id: device_id.to_string(),
            statements: Vec::new(),
        }
    }

    /// Statements joined by newlines, without a trailing newline
    pub fn text(&self) -> String {
        self.statements.join("\n")
    }

    /// `<device_id>.txt`, with path separators in the id replaced
    pub fn file_name(&self) -> String {
        let stem: String = self
            .device_id
            .chars()
            .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
            .collect();
        let stem = match stem.as_str() {
            "" | "." | ".." => format!("_{}", stem),
            _ => stem,
        };
        format!("{}.txt", stem)
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

/// Write every artifact into `output_dir`, one file per device.
///
/// Files are written independently and in parallel; the returned paths follow
/// the order of `artifacts`.
pub fn write_artifacts(artifacts: &[Artifact], output_dir: &Path) -> Result<Vec<PathBuf>, StoreError> {
    std::fs::create_dir_all(output_dir).map_err(|source| StoreError::Write {
        path: output_dir.to_path_buf(),
        source,
    })?;

    artifacts
        .par_iter()
        .map(|artifact| -> Result<PathBuf, StoreError> {
            let path = output_dir.join(artifact.file_name());
            write_atomically(&path, artifact.text().as_bytes())?;
            log::debug!("Wrote {} statement(s) to {}", artifact.statements.len(), path.display());
            Ok(path)
        })
        .collect()
}
