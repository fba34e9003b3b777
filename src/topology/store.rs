//! Topology document persistence.
//!
//! Reads and writes the whole JSON document. Writes go to a sibling temporary
//! file that is renamed over the target, so a failed write leaves the previous
//! document intact.

use super::types::TopologyDocument;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Errors that can occur while loading or saving a topology document
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to read topology document '{}'", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse topology document '{}'", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize topology document for '{}'", .path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write '{}'", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Load a topology document from a JSON file
pub fn load_document(path: &Path) -> Result<TopologyDocument, StoreError> {
    log::debug!("Loading topology document from {}", path.display());

    let content = fs::read_to_string(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let document: TopologyDocument =
        serde_json::from_str(&content).map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let (bad_nodes, bad_links) = (document.malformed_nodes(), document.malformed_links());
    if bad_nodes + bad_links > 0 {
        log::warn!(
            "{}: {} malformed node(s) and {} malformed link(s) will be skipped",
            path.display(),
            bad_nodes,
            bad_links
        );
    }

    Ok(document)
}

/// Save a topology document as four-space indented JSON
pub fn save_document(path: &Path, document: &TopologyDocument) -> Result<(), StoreError> {
    let json = to_pretty_json(document).map_err(|source| StoreError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;

    write_atomically(path, json.as_bytes())?;
    log::debug!(
        "Saved topology document '{}' ({} nodes, {} links) to {}",
        document.name,
        document.nodes.len(),
        document.links.len(),
        path.display()
    );
    Ok(())
}

fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    // serde_json only ever emits valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write `contents` to `path` through a temporary sibling file
pub(crate) fn write_atomically(path: &Path, contents: &[u8]) -> Result<(), StoreError> {
    let write_err = |source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }

    let mut tmp_name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    fs::write(&tmp_path, contents).map_err(write_err)?;
    if let Err(source) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(write_err(source));
    }
    Ok(())
}
