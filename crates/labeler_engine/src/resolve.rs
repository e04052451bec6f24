use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use scraper::{Html, Selector};
use url::Url;

use crate::decode::{decode_html, DecodeError};
use crate::fetch::{FetchSettings, Fetcher, ReqwestFetcher};
use crate::FetchError;

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("detail page fetch failed: {0}")]
    Page(#[source] FetchError),
    #[error("detail page decode failed: {0}")]
    Decode(#[from] DecodeError),
    #[error("no <img> element on detail page")]
    MissingImage,
    #[error("<img> element carries no usable src")]
    MissingSrc,
    #[error("image src {src} could not be resolved to a URL")]
    BadImageUrl { src: String },
    #[error("image fetch failed: {0}")]
    Image(#[source] FetchError),
}

/// Resolves a record's detail reference to a base64-encoded label image.
#[async_trait::async_trait]
pub trait ImageResolver: Send + Sync {
    async fn resolve(&self, detail_url: &str) -> Result<String, ResolveError>;
}

/// Fetches the detail page, reads the first `<img>`'s `src`, and returns
/// the payload: directly for `data:` URIs, otherwise by downloading the
/// image and base64-encoding its bytes.
pub struct HttpImageResolver {
    page_fetcher: ReqwestFetcher,
    image_fetcher: ReqwestFetcher,
}

impl HttpImageResolver {
    pub fn new(page_settings: FetchSettings) -> Self {
        Self {
            page_fetcher: ReqwestFetcher::new(page_settings),
            image_fetcher: ReqwestFetcher::new(FetchSettings::for_images()),
        }
    }
}

impl Default for HttpImageResolver {
    fn default() -> Self {
        Self::new(FetchSettings::default())
    }
}

#[async_trait::async_trait]
impl ImageResolver for HttpImageResolver {
    async fn resolve(&self, detail_url: &str) -> Result<String, ResolveError> {
        let page = self
            .page_fetcher
            .fetch(detail_url)
            .await
            .map_err(ResolveError::Page)?;
        let decoded = decode_html(&page.bytes, page.metadata.content_type.as_deref())?;

        let src = first_image_src(&decoded.html)?;

        // A data URI already holds the encoded payload after the comma.
        if src.starts_with("data:") {
            return match src.split_once(',') {
                Some((_, payload)) => Ok(payload.to_string()),
                None => Err(ResolveError::MissingSrc),
            };
        }

        let image_url = absolutize(&src, &page.metadata.final_url)
            .ok_or_else(|| ResolveError::BadImageUrl { src: src.clone() })?;
        let image = self
            .image_fetcher
            .fetch(&image_url)
            .await
            .map_err(ResolveError::Image)?;

        Ok(BASE64.encode(&image.bytes))
    }
}

fn first_image_src(html: &str) -> Result<String, ResolveError> {
    let doc = Html::parse_document(html);
    let Some(img_sel) = Selector::parse("img").ok() else {
        return Err(ResolveError::MissingImage);
    };

    let img = doc.select(&img_sel).next().ok_or(ResolveError::MissingImage)?;
    img.value()
        .attr("src")
        .filter(|src| !src.is_empty())
        .map(str::to_string)
        .ok_or(ResolveError::MissingSrc)
}

/// Resolves a possibly relative image src against the detail page URL.
fn absolutize(src: &str, page_url: &str) -> Option<String> {
    if let Ok(absolute) = Url::parse(src) {
        return Some(absolute.to_string());
    }
    let base = Url::parse(page_url).ok()?;
    base.join(src).ok().map(|u| u.to_string())
}
