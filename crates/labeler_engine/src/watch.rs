use std::path::Path;

use labeler_core::ARTIFACT_EXTENSION;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::queue::WorkSender;

#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("staging watch setup failed: {0}")]
    Notify(#[from] notify::Error),
    #[error("backlog scan failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Live watch over the staging directory. Dropping it stops the watch.
pub struct ArtifactWatcher {
    _watcher: RecommendedWatcher,
}

/// Starts watching `staging_dir` (non-recursive) for created artifacts,
/// then enqueues the pre-existing backlog.
///
/// The watch begins before the scan so nothing slips between them; an
/// artifact created during the scan may therefore be enqueued twice,
/// which the worker tolerates (the second read of a moved file fails
/// cleanly).
pub fn start(staging_dir: &Path, queue: WorkSender) -> Result<ArtifactWatcher, WatchError> {
    let live_queue = queue.clone();
    let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
        match res {
            Ok(event) => {
                if !matches!(event.kind, EventKind::Create(_)) {
                    return;
                }
                for path in event.paths {
                    if is_artifact(&path) {
                        log::info!("new artifact detected: {}", path.display());
                        live_queue.enqueue(path);
                    }
                }
            }
            Err(err) => log::warn!("staging watch error: {err}"),
        }
    })?;
    watcher.watch(staging_dir, RecursiveMode::NonRecursive)?;

    enqueue_backlog(staging_dir, &queue)?;

    Ok(ArtifactWatcher { _watcher: watcher })
}

/// One-shot scan of the staging directory for artifacts already on disk.
fn enqueue_backlog(staging_dir: &Path, queue: &WorkSender) -> Result<(), WatchError> {
    let mut backlog: Vec<_> = std::fs::read_dir(staging_dir)?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|ft| ft.is_file()).unwrap_or(false))
        .map(|e| e.path())
        .filter(|p| is_artifact(p))
        .collect();
    backlog.sort();

    log::info!("backlog scan found {} artifact(s)", backlog.len());
    for path in backlog {
        queue.enqueue(path);
    }
    Ok(())
}

fn is_artifact(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some(ARTIFACT_EXTENSION)
}
