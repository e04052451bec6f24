//! Discovery process: polls the document listing and stages label images.
//! Runs until interrupted.

use std::sync::atomic::AtomicBool;

use labeler_core::RecordFilter;
use labeler_engine::{
    DiscoveryLoop, DiscoverySettings, FetchSettings, HttpDocumentSource, HttpImageResolver,
    LabelStore, ReqwestFetcher,
};
use pipeline_logging::LogDestination;
use url::Url;

fn main() -> anyhow::Result<()> {
    pipeline_logging::initialize(LogDestination::Terminal);
    log::info!("starting label discovery against {}", labeler_app::DOCUMENT_LIST_URL);

    let source = HttpDocumentSource::new(
        labeler_app::DOCUMENT_LIST_URL,
        ReqwestFetcher::new(FetchSettings::default()),
    );
    let resolver = HttpImageResolver::default();
    let store = LabelStore::new(labeler_app::STAGING_DIR.into())?;
    let filter = RecordFilter::new(Url::parse(labeler_app::PORTAL_BASE)?);

    let stop = AtomicBool::new(false);
    DiscoveryLoop::new(
        Box::new(source),
        Box::new(resolver),
        store,
        filter,
        DiscoverySettings::default(),
    )
    .run(&stop)?;

    Ok(())
}
