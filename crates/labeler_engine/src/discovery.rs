use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use labeler_core::{RecordFilter, RowDisposition, SeenSet};

use crate::listing::DocumentSource;
use crate::resolve::ImageResolver;
use crate::store::LabelStore;

#[derive(Debug, Clone)]
pub struct DiscoverySettings {
    pub poll_interval: Duration,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
        }
    }
}

/// The discovery half of the pipeline: polls the document listing,
/// resolves each new eligible record's label image, and deposits it in
/// the staging area. Owns the seen-set exclusively.
pub struct DiscoveryLoop {
    source: Box<dyn DocumentSource>,
    resolver: Box<dyn ImageResolver>,
    store: LabelStore,
    filter: RecordFilter,
    seen: SeenSet,
    settings: DiscoverySettings,
}

impl DiscoveryLoop {
    pub fn new(
        source: Box<dyn DocumentSource>,
        resolver: Box<dyn ImageResolver>,
        store: LabelStore,
        filter: RecordFilter,
        settings: DiscoverySettings,
    ) -> Self {
        Self {
            source,
            resolver,
            store,
            filter,
            seen: SeenSet::new(),
            settings,
        }
    }

    /// Marks every currently listed row as handled without resolving
    /// anything: only rows appearing after startup are harvested.
    pub async fn seed(&mut self) {
        let rows = match self.source.rows().await {
            Ok(rows) => rows,
            Err(err) => {
                log::warn!("seed listing unavailable: {err}");
                return;
            }
        };
        for row in &rows {
            if let RowDisposition::Eligible(record) = self.filter.classify(row, &mut self.seen) {
                self.seen.insert(record.detail_url);
            }
        }
        log::info!("seeded seen-set with {} record(s)", self.seen.len());
    }

    /// One full pass over the current listing. Returns the number of
    /// artifacts written.
    ///
    /// A failed listing fetch is an empty tick; a failed resolution marks
    /// the record seen without output so a permanently broken detail page
    /// cannot retry forever.
    pub async fn tick(&mut self) -> usize {
        let rows = match self.source.rows().await {
            Ok(rows) => rows,
            Err(err) => {
                log::warn!("listing unavailable this tick: {err}");
                return 0;
            }
        };

        let mut stored = 0;
        for row in &rows {
            match self.filter.classify(row, &mut self.seen) {
                RowDisposition::Excluded => {
                    log::info!("excluded by policy: {} ({})", row.title, row.template_code);
                }
                RowDisposition::AlreadySeen | RowDisposition::Skipped => {}
                RowDisposition::Eligible(record) => {
                    match self.resolver.resolve(&record.detail_url).await {
                        Ok(payload) => match self.store.write_label(&record, &payload) {
                            Ok(path) => {
                                stored += 1;
                                log::info!("stored label {}", path.display());
                            }
                            Err(err) => {
                                log::error!("failed to store label for {}: {err}", record.detail_url);
                            }
                        },
                        Err(err) => {
                            log::error!("could not resolve image for {}: {err}", record.detail_url);
                        }
                    }
                    // Success and failure both count as handled.
                    self.seen.insert(record.detail_url);
                }
            }
        }
        stored
    }

    /// Seeds, then polls until `stop` is raised. Blocking; owns its
    /// runtime. Everything held is released by scope exit on all paths.
    pub fn run(mut self, stop: &AtomicBool) -> std::io::Result<()> {
        let runtime = tokio::runtime::Runtime::new()?;

        runtime.block_on(self.seed());

        let mut tick = 0u64;
        while !stop.load(Ordering::Relaxed) {
            tick += 1;
            pipeline_logging::set_poll_tick(tick);
            log::debug!("checking for new records");
            runtime.block_on(self.tick());
            thread::sleep(self.settings.poll_interval);
        }
        Ok(())
    }
}
