use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

/// Creates the unbounded artifact queue connecting the watcher (and the
/// backlog scan) to the extraction worker. No deduplication: a path
/// enqueued twice is processed twice, which the worker tolerates.
pub fn work_queue() -> (WorkSender, WorkReceiver) {
    let (tx, rx) = mpsc::channel();
    (WorkSender { tx }, WorkReceiver { rx })
}

#[derive(Clone)]
pub struct WorkSender {
    tx: Sender<PathBuf>,
}

impl WorkSender {
    pub fn enqueue(&self, path: PathBuf) {
        // A send fails only when the worker is gone; nothing to do then.
        let _ = self.tx.send(path);
    }
}

/// Result of one blocking poll of the queue.
#[derive(Debug, PartialEq, Eq)]
pub enum QueuePoll {
    Item(PathBuf),
    /// Nothing arrived within the wait; caller may check its stop flag.
    Idle,
    /// Every sender is gone; no more items can ever arrive.
    Closed,
}

pub struct WorkReceiver {
    rx: Receiver<PathBuf>,
}

impl WorkReceiver {
    pub fn poll(&self, wait: Duration) -> QueuePoll {
        match self.rx.recv_timeout(wait) {
            Ok(path) => QueuePoll::Item(path),
            Err(RecvTimeoutError::Timeout) => QueuePoll::Idle,
            Err(RecvTimeoutError::Disconnected) => QueuePoll::Closed,
        }
    }
}
