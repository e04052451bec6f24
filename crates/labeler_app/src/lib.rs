//! Fixed deployment constants for the label pipeline binaries.
//!
//! There are no command-line flags: directory layout and cadence are
//! part of the deployment contract, not configuration.

/// The document-management portal's listing page.
pub const DOCUMENT_LIST_URL: &str = "https://document-mgmt.eton.vn/document-list";

/// Portal origin, used to absolutize relative links.
pub const PORTAL_BASE: &str = "https://document-mgmt.eton.vn";

/// Where discovery deposits artifacts and extraction picks them up;
/// the only coupling between the two processes.
pub const STAGING_DIR: &str = "label";

/// Where extraction writes one `<tracking_number>.json` per shipment.
pub const OUTPUT_DIR: &str = "Output";

/// Where successfully handled artifacts are moved, original name kept.
pub const ARCHIVE_DIR: &str = "label_processed";

/// Environment variable holding the classification API key.
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
