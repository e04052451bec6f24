use labeler_core::RawRow;
use scraper::{ElementRef, Html, Selector};

use crate::decode::{decode_html, DecodeError};
use crate::fetch::Fetcher;
use crate::FetchError;

#[derive(Debug, thiserror::Error)]
pub enum ListingError {
    #[error("listing fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("listing decode failed: {0}")]
    Decode(#[from] DecodeError),
}

/// The remote document listing, reduced to its table rows.
#[async_trait::async_trait]
pub trait DocumentSource: Send + Sync {
    async fn rows(&self) -> Result<Vec<RawRow>, ListingError>;
}

/// Fetches the document-list page and parses its first table.
///
/// Column positions are fixed by the portal: [1] title + detail link,
/// [2] creation timestamp, [3] template code. Rows with fewer than four
/// cells are dropped here, before classification.
pub struct HttpDocumentSource<F> {
    listing_url: String,
    fetcher: F,
}

impl<F: Fetcher> HttpDocumentSource<F> {
    pub fn new(listing_url: impl Into<String>, fetcher: F) -> Self {
        Self {
            listing_url: listing_url.into(),
            fetcher,
        }
    }
}

#[async_trait::async_trait]
impl<F: Fetcher> DocumentSource for HttpDocumentSource<F> {
    async fn rows(&self) -> Result<Vec<RawRow>, ListingError> {
        let output = self.fetcher.fetch(&self.listing_url).await?;
        let decoded = decode_html(&output.bytes, output.metadata.content_type.as_deref())?;
        Ok(parse_listing(&decoded.html))
    }
}

const REQUIRED_CELLS: usize = 4;

/// Parses listing rows out of the first `<table>` in the document.
/// A page without a table yields an empty listing.
pub fn parse_listing(html: &str) -> Vec<RawRow> {
    let doc = Html::parse_document(html);
    let table_sel = Selector::parse("table").ok();
    let row_sel = Selector::parse("tr").ok();
    let cell_sel = Selector::parse("td").ok();
    let link_sel = Selector::parse("a").ok();

    let (Some(table_sel), Some(row_sel), Some(cell_sel), Some(link_sel)) =
        (table_sel, row_sel, cell_sel, link_sel)
    else {
        return Vec::new();
    };

    let Some(table) = doc.select(&table_sel).next() else {
        log::warn!("document listing contains no table");
        return Vec::new();
    };

    let mut rows = Vec::new();
    // First row is the header.
    for row in table.select(&row_sel).skip(1) {
        let cells: Vec<ElementRef> = row.select(&cell_sel).collect();
        if cells.len() < REQUIRED_CELLS {
            continue;
        }

        let title_cell = cells[1];
        let link = title_cell
            .select(&link_sel)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(str::to_string);

        rows.push(RawRow {
            title: cell_text(title_cell),
            link,
            time_created: cell_text(cells[2]),
            template_code: cell_text(cells[3]),
        });
    }
    rows
}

fn cell_text(cell: ElementRef) -> String {
    cell.text().collect::<String>().trim().to_string()
}
