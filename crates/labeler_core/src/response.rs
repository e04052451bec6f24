use thiserror::Error;

use crate::result::LabelFields;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("reply contains no fenced json block")]
    MissingBlock,
    #[error("fenced json block is malformed: {0}")]
    Malformed(String),
}

const FENCE_OPEN: &str = "```json";
const FENCE_CLOSE: &str = "```";

/// Extracts the single fenced ```json block embedded in a freeform
/// extractor reply and parses it into [`LabelFields`].
///
/// Fields absent from the block default to the `"Not found"` sentinel;
/// the caller decides whether such a result is usable.
pub fn parse_reply(text: &str) -> Result<LabelFields, ParseError> {
    let open = text.find(FENCE_OPEN).ok_or(ParseError::MissingBlock)?;
    let body = &text[open + FENCE_OPEN.len()..];
    let close = body.find(FENCE_CLOSE).ok_or(ParseError::MissingBlock)?;
    let block = body[..close].trim();

    serde_json::from_str(block).map_err(|err| ParseError::Malformed(err.to_string()))
}
