use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use labeler_core::{parse_reply, ParseError};
use thiserror::Error;

use crate::extractor::{ExtractorError, LabelExtractor};
use crate::persist::{AtomicFileWriter, PersistError};
use crate::queue::{QueuePoll, WorkReceiver};

#[derive(Debug, Error)]
pub enum WorkerError {
    /// Usually a path processed twice: the first pass moved the file.
    #[error("artifact could not be read: {0}")]
    Read(#[source] io::Error),
    #[error(transparent)]
    Extractor(#[from] ExtractorError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The extractor answered but found no tracking number; the result
    /// cannot be keyed and is dropped.
    #[error("extractor found no tracking number")]
    MissingTrackingNumber,
    #[error("result serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("output write failed: {0}")]
    Output(#[from] PersistError),
    #[error("archive move failed: {0}")]
    Archive(#[source] io::Error),
}

#[derive(Debug, Clone)]
pub struct WorkerSettings {
    /// How long one queue poll blocks before the stop flag is re-checked.
    pub idle_wait: Duration,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            idle_wait: Duration::from_secs(1),
        }
    }
}

/// The extraction half of the pipeline: drains the artifact queue one
/// item at a time, classifies each payload, writes the structured result,
/// and archives the artifact. The archive rename is the commit point:
/// an artifact is moved iff its output record was written.
pub struct ExtractionWorker {
    extractor: Box<dyn LabelExtractor>,
    output: AtomicFileWriter,
    archive_dir: PathBuf,
    settings: WorkerSettings,
}

impl ExtractionWorker {
    /// Fails only when the output or archive directory cannot be
    /// prepared; that is this process's resource-acquisition phase.
    pub fn new(
        extractor: Box<dyn LabelExtractor>,
        output_dir: PathBuf,
        archive_dir: PathBuf,
        settings: WorkerSettings,
    ) -> Result<Self, PersistError> {
        let output = AtomicFileWriter::new(output_dir)?;
        // Validate the archive dir the same way; renames into it must not
        // be the first thing to discover it is missing.
        let archive_dir = AtomicFileWriter::new(archive_dir)?.dir().to_path_buf();
        Ok(Self {
            extractor,
            output,
            archive_dir,
            settings,
        })
    }

    /// Drives one artifact through read -> extract -> parse -> output ->
    /// archive. Returns the output record path.
    pub async fn process(&self, artifact: &Path) -> Result<PathBuf, WorkerError> {
        let payload = fs::read_to_string(artifact).map_err(WorkerError::Read)?;

        let reply = self.extractor.extract(payload.trim()).await?;
        log::debug!("extractor reply for {}: {reply}", artifact.display());

        let fields = parse_reply(&reply)?;
        if !fields.has_tracking_number() {
            return Err(WorkerError::MissingTrackingNumber);
        }

        let output_name = format!("{}.json", fields.tracking_number);
        let output_path = self.output.write(&output_name, &fields.to_pretty_json()?)?;
        log::info!("wrote result {}", output_path.display());

        // Commit point: the artifact leaves staging only after its result
        // is durably on disk.
        let base = artifact.file_name().ok_or_else(|| {
            WorkerError::Archive(io::Error::new(
                io::ErrorKind::InvalidInput,
                "artifact path has no file name",
            ))
        })?;
        let archived = self.archive_dir.join(base);
        fs::rename(artifact, &archived).map_err(WorkerError::Archive)?;
        log::info!("archived artifact to {}", archived.display());

        Ok(output_path)
    }

    /// Drains the queue until `stop` is raised or every sender is gone.
    /// Per-item errors are logged and the artifact is left in place; a
    /// fresh start's backlog scan is the retry path.
    pub fn run(&self, queue: &WorkReceiver, stop: &AtomicBool) -> std::io::Result<()> {
        let runtime = tokio::runtime::Runtime::new()?;

        while !stop.load(Ordering::Relaxed) {
            match queue.poll(self.settings.idle_wait) {
                QueuePoll::Item(path) => {
                    log::info!("processing artifact {}", path.display());
                    if let Err(err) = runtime.block_on(self.process(&path)) {
                        log::error!("artifact {} not completed: {err}", path.display());
                    }
                }
                QueuePoll::Idle => {}
                QueuePoll::Closed => break,
            }
        }
        Ok(())
    }
}
