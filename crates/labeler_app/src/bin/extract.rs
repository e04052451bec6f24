//! Extraction process: watches the staging area and classifies each
//! artifact via the external extractor. Runs until interrupted.

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

use labeler_engine::{
    start_artifact_watcher, work_queue, ExtractionWorker, ExtractorSettings, GeminiExtractor,
    WorkerSettings,
};
use pipeline_logging::LogDestination;

fn main() -> anyhow::Result<()> {
    pipeline_logging::initialize(LogDestination::Terminal);
    log::info!("starting label extraction");

    let mut settings = ExtractorSettings::default();
    if let Ok(key) = std::env::var(labeler_app::API_KEY_VAR) {
        settings.endpoint = format!("{}?key={key}", settings.endpoint);
    }
    let extractor = GeminiExtractor::new(settings)?;

    let worker = ExtractionWorker::new(
        Box::new(extractor),
        labeler_app::OUTPUT_DIR.into(),
        labeler_app::ARCHIVE_DIR.into(),
        WorkerSettings::default(),
    )?;

    // Staging must exist before it can be watched; discovery may not
    // have run yet on this machine.
    let staging = PathBuf::from(labeler_app::STAGING_DIR);
    std::fs::create_dir_all(&staging)?;

    let (queue_tx, queue_rx) = work_queue();
    let _watcher = start_artifact_watcher(&staging, queue_tx)?;

    let stop = AtomicBool::new(false);
    worker.run(&queue_rx, &stop)?;

    Ok(())
}
