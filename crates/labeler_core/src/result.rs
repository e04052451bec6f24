use serde::{Deserialize, Serialize};

/// Placeholder value for a field the extractor could not determine.
pub const NOT_FOUND: &str = "Not found";

/// Structured shipment metadata extracted from one label image.
///
/// Each field is either a concrete value or the [`NOT_FOUND`] sentinel.
/// Output identity is `tracking_number`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelFields {
    #[serde(default = "not_found")]
    pub tracking_number: String,
    #[serde(default = "not_found")]
    pub order_id: String,
    #[serde(default = "not_found")]
    pub sender_address: String,
    #[serde(default = "not_found")]
    pub recipient_address: String,
}

fn not_found() -> String {
    NOT_FOUND.to_string()
}

impl LabelFields {
    /// A result without a tracking number cannot be keyed and is dropped.
    pub fn has_tracking_number(&self) -> bool {
        self.tracking_number != NOT_FOUND
    }

    /// Human-readable indented JSON, UTF-8, non-ASCII preserved unescaped.
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
