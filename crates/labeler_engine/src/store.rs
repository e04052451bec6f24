use std::path::{Path, PathBuf};

use labeler_core::{artifact_filename, Record};

use crate::persist::{AtomicFileWriter, PersistError};

/// Staging-area writer for resolved label payloads.
///
/// Artifact names derive deterministically from the record; a second
/// record mapping to the same name silently overwrites the first.
pub struct LabelStore {
    writer: AtomicFileWriter,
}

impl LabelStore {
    pub fn new(staging_dir: PathBuf) -> Result<Self, PersistError> {
        Ok(Self {
            writer: AtomicFileWriter::new(staging_dir)?,
        })
    }

    pub fn staging_dir(&self) -> &Path {
        self.writer.dir()
    }

    /// Persists one base64 payload as a staging artifact.
    pub fn write_label(&self, record: &Record, payload: &str) -> Result<PathBuf, PersistError> {
        let name = artifact_filename(&record.time_created, &record.title);
        self.writer.write(&name, payload)
    }
}
