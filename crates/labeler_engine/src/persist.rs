use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("directory missing or not writable: {0}")]
    Dir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Atomically writes text files into one directory by staging a temp file
/// and renaming it over the target.
///
/// Construction validates the directory (creating it if missing and
/// probing writability), so a writer that exists can write; failures at
/// startup are the caller's fatal path, failures per write are not.
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Result<Self, PersistError> {
        if dir.exists() {
            if !fs::metadata(&dir)
                .map_err(|e| PersistError::Dir(e.to_string()))?
                .is_dir()
            {
                return Err(PersistError::Dir(format!(
                    "{} is not a directory",
                    dir.display()
                )));
            }
        } else {
            fs::create_dir_all(&dir).map_err(|e| PersistError::Dir(e.to_string()))?;
        }
        // Writability probe.
        NamedTempFile::new_in(&dir).map_err(|e| PersistError::Dir(e.to_string()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes `content` to `{dir}/{filename}`, replacing any existing
    /// file. Either the old content or the new content is on disk at all
    /// times, never a partial write.
    pub fn write(&self, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
        let target = self.dir.join(filename);

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        // Windows rename refuses to replace; clear the target first.
        if target.exists() {
            fs::remove_file(&target)?;
        }
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}
