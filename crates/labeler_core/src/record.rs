use url::Url;

use crate::seen::SeenSet;

/// Template codes that mark a listing row as excluded by policy.
/// Case-sensitive containment test, matching the portal's tag spelling.
const EXCLUDED_TEMPLATE_TAGS: [&str; 4] = [
    "Invoice",
    "AllShippingLabelA7",
    "ExportDocumentReport",
    "ShippingLabelB2CA7",
];

/// One listing-table row as parsed from the document list page.
///
/// Rows with fewer than the required cell count never make it this far;
/// the listing parser drops them before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub title: String,
    /// `href` of the title link, possibly relative. Absent when the cell
    /// carries no anchor (a transient rendering artifact).
    pub link: Option<String>,
    pub time_created: String,
    pub template_code: String,
}

/// A discovered document-list entry eligible for label image resolution.
/// Identity is `detail_url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub title: String,
    pub detail_url: String,
    pub time_created: String,
}

/// Outcome of classifying one listing row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowDisposition {
    /// Template code matched the denylist. The row's identity, when it has
    /// one, is already marked seen so the row is never re-evaluated.
    Excluded,
    /// The row's detail URL was handled earlier in this run.
    AlreadySeen,
    /// The row lacked a usable detail link. Nothing is recorded; the row
    /// is re-evaluated on the next tick.
    Skipped,
    /// A new record, ready for image resolution.
    Eligible(Record),
}

/// Classifies listing rows against the policy denylist and the seen-set,
/// normalizing eligible rows into [`Record`]s with absolute detail URLs.
#[derive(Debug, Clone)]
pub struct RecordFilter {
    base: Url,
}

impl RecordFilter {
    /// `base` is the portal origin used to absolutize relative links.
    pub fn new(base: Url) -> Self {
        Self { base }
    }

    /// Classifies a single row, recording excluded identities into `seen`.
    ///
    /// The denylist test runs before the link test: an excluded row
    /// without a link is still `Excluded`, it just leaves no identity
    /// behind.
    pub fn classify(&self, row: &RawRow, seen: &mut SeenSet) -> RowDisposition {
        if self.is_excluded(&row.template_code) {
            if let Some(detail_url) = self.absolutize(row.link.as_deref()) {
                seen.insert(detail_url);
            }
            return RowDisposition::Excluded;
        }

        let Some(detail_url) = self.absolutize(row.link.as_deref()) else {
            return RowDisposition::Skipped;
        };

        if seen.contains(&detail_url) {
            return RowDisposition::AlreadySeen;
        }

        RowDisposition::Eligible(Record {
            title: row.title.clone(),
            detail_url,
            time_created: row.time_created.clone(),
        })
    }

    fn is_excluded(&self, template_code: &str) -> bool {
        EXCLUDED_TEMPLATE_TAGS
            .iter()
            .any(|tag| template_code.contains(tag))
    }

    /// Resolves a possibly relative link against the portal base.
    /// Returns `None` for absent or unparseable links.
    fn absolutize(&self, link: Option<&str>) -> Option<String> {
        let link = link?;
        if let Ok(absolute) = Url::parse(link) {
            return Some(absolute.to_string());
        }
        self.base.join(link).ok().map(|u| u.to_string())
    }
}
