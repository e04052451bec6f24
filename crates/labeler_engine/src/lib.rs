//! Labeler engine: the I/O halves of the label pipeline.
//!
//! Discovery (listing fetch, image resolution, staging writes) and
//! extraction (staging watch, classification calls, result persistence)
//! live here; all pure logic is in `labeler_core`.
mod decode;
mod discovery;
mod extractor;
mod fetch;
mod listing;
mod persist;
mod queue;
mod resolve;
mod store;
mod types;
mod watch;
mod worker;

pub use decode::{decode_html, DecodeError, DecodedHtml};
pub use discovery::{DiscoveryLoop, DiscoverySettings};
pub use extractor::{
    ExtractorError, ExtractorSettings, GeminiExtractor, LabelExtractor, GEMINI_ENDPOINT,
    LABEL_PROMPT,
};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use listing::{parse_listing, DocumentSource, HttpDocumentSource, ListingError};
pub use persist::{AtomicFileWriter, PersistError};
pub use queue::{work_queue, QueuePoll, WorkReceiver, WorkSender};
pub use resolve::{HttpImageResolver, ImageResolver, ResolveError};
pub use store::LabelStore;
pub use types::{FailureKind, FetchError, FetchMetadata, FetchOutput};
pub use watch::{start as start_artifact_watcher, ArtifactWatcher, WatchError};
pub use worker::{ExtractionWorker, WorkerError, WorkerSettings};
