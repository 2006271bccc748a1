//! Writing the merged document
//!
//! The document is serialized to a temporary file next to the destination
//! and renamed into place, so readers never see a truncated file.

use sha2::{Digest, Sha256};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

use crate::assemble::DatasetDocument;
use crate::entity::Entity;
use crate::error::{MergeError, Result};

/// Atomically replace `path` with the pretty-printed document.
pub fn write_document(path: &Path, doc: &DatasetDocument) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        serde_json::to_writer_pretty(&mut writer, doc)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;

    tmp.persist(path).map_err(|e| MergeError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}

/// Read a previously written document.
pub fn read_document(path: &Path) -> Result<DatasetDocument> {
    let contents = fs::read_to_string(path).map_err(|source| MergeError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&contents)?)
}

/// SHA-256 of the serialized entity list.
///
/// Excludes the timestamp, so two runs over unchanged inputs share a digest.
pub fn entities_digest(entities: &[Entity]) -> Result<String> {
    let bytes = serde_json::to_vec(entities)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}
