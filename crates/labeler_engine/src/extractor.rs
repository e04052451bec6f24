use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default classification endpoint. The API key is appended as a `key`
/// query parameter by the caller.
pub const GEMINI_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent";

/// Instruction sent alongside every label image.
pub const LABEL_PROMPT: &str = r#"
You are an AI assistant specialized in analyzing shipping labels from various courier services.

Please extract the following key information from the label and return it in proper JSON format:
1. tracking_number – The shipment tracking number (usually a long alphanumeric string like SPXVN056647140793 or 851485198118).
2. order_id – The customer’s order ID (usually labeled as "Order ID", "Mã đơn hàng", etc.).
3. sender_address – The sender’s address (often appears after keywords like "From", "Từ", or "Sender").
4. recipient_address – The receiver’s address (often appears after keywords like "To", "Đến", or "Receiver").

If any information is missing or unclear, use the value "Not found".

Respond with a valid and clean JSON object only, with no additional text.

Example format:
{
  "tracking_number": "...",
  "order_id": "...",
  "sender_address": "...",
  "recipient_address": "..."
}
"#;

#[derive(Debug, Error)]
pub enum ExtractorError {
    #[error("extractor communication failed: {0}")]
    Communication(String),
    #[error("extractor returned status {0}")]
    Status(u16),
    #[error("extractor reply carried no candidates")]
    EmptyReply,
    #[error("extractor reply was not valid json: {0}")]
    InvalidReply(String),
}

/// The external classification service: one encoded image in, the
/// service's freeform reply text out.
#[async_trait::async_trait]
pub trait LabelExtractor: Send + Sync {
    async fn extract(&self, payload: &str) -> Result<String, ExtractorError>;
}

#[derive(Debug, Clone)]
pub struct ExtractorSettings {
    pub endpoint: String,
    pub request_timeout: Duration,
    /// Attempts per call; transport errors and 429/5xx statuses retry
    /// with exponential backoff, other statuses fail immediately.
    pub max_attempts: u32,
    pub retry_backoff: Duration,
}

impl Default for ExtractorSettings {
    fn default() -> Self {
        Self {
            endpoint: GEMINI_ENDPOINT.to_string(),
            request_timeout: Duration::from_secs(60),
            max_attempts: 3,
            retry_backoff: Duration::from_secs(1),
        }
    }
}

/// Gemini `generateContent` client.
pub struct GeminiExtractor {
    settings: ExtractorSettings,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: &'a str },
    Image { inline_data: InlineData<'a> },
}

#[derive(Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Deserialize)]
struct GenerateReply {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ReplyPart>,
}

#[derive(Deserialize)]
struct ReplyPart {
    #[serde(default)]
    text: String,
}

impl GeminiExtractor {
    pub fn new(settings: ExtractorSettings) -> Result<Self, ExtractorError> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ExtractorError::Communication(err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn request_body<'a>(&self, payload: &'a str) -> GenerateRequest<'a> {
        GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text { text: LABEL_PROMPT },
                    Part::Image {
                        inline_data: InlineData {
                            mime_type: "image/png",
                            data: payload,
                        },
                    },
                ],
            }],
        }
    }
}

#[async_trait::async_trait]
impl LabelExtractor for GeminiExtractor {
    async fn extract(&self, payload: &str) -> Result<String, ExtractorError> {
        let body = self.request_body(payload);

        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.settings.max_attempts {
            match self.client.post(&self.settings.endpoint).json(&body).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let reply: GenerateReply = response
                            .json()
                            .await
                            .map_err(|err| ExtractorError::InvalidReply(err.to_string()))?;
                        return reply_text(reply);
                    }
                    if !retryable(status) {
                        return Err(ExtractorError::Status(status.as_u16()));
                    }
                    last_error = Some(ExtractorError::Status(status.as_u16()));
                }
                Err(err) => {
                    last_error = Some(ExtractorError::Communication(err.to_string()));
                }
            }

            attempts += 1;
            if attempts < self.settings.max_attempts {
                let delay = self.settings.retry_backoff * 2u32.pow(attempts - 1);
                log::warn!(
                    "extractor attempt {attempts} failed, retrying in {delay:?}: {:?}",
                    last_error
                );
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| ExtractorError::Communication("no attempts made".to_string())))
    }
}

fn retryable(status: reqwest::StatusCode) -> bool {
    status.as_u16() == 429 || status.is_server_error()
}

/// The freeform reply lives at `candidates[0].content.parts[0].text`;
/// anything missing along that path is a hard failure for the call.
fn reply_text(reply: GenerateReply) -> Result<String, ExtractorError> {
    reply
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content.parts.into_iter().next())
        .map(|part| part.text)
        .ok_or(ExtractorError::EmptyReply)
}
