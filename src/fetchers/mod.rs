//! Raw page retrieval.
//!
//! Fetchers only return HTML text; turning it into a [`DocumentModel`] is
//! always done by the extractor so both fetchers yield identical documents
//! for identical markup.

pub mod http;
pub mod webdriver;

use crate::config::FetcherConfig;
use crate::error::ExtractionError;
use crate::parsers::html;
use crate::results::DocumentModel;
use async_trait::async_trait;
use std::sync::Arc;
use url::Url;

/// Retrieves the raw HTML of a page
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, ExtractionError>;
}

/// Build the fetcher described by `config`
pub fn from_config(config: &FetcherConfig) -> Result<Arc<dyn PageFetcher>, ExtractionError> {
    match config {
        FetcherConfig::Http {
            user_agent,
            timeout_secs,
        } => Ok(Arc::new(http::HttpFetcher::new(user_agent, *timeout_secs)?)),
        FetcherConfig::WebDriver {
            webdriver_url,
            timeout_secs,
        } => Ok(Arc::new(webdriver::WebDriverFetcher::new(
            webdriver_url,
            *timeout_secs,
        ))),
    }
}

/// Parse `url` and require an http(s) scheme
pub fn validate_url(url: &str) -> Result<Url, ExtractionError> {
    let parsed = Url::parse(url.trim()).map_err(|e| ExtractionError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(ExtractionError::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme '{}'", scheme),
        }),
    }
}

/// Fetch `url` and extract it into a document
pub async fn fetch_document(
    fetcher: &dyn PageFetcher,
    url: &str,
) -> Result<DocumentModel, ExtractionError> {
    let parsed = validate_url(url)?;
    ::log::info!("Fetching: {}", parsed);
    let html = fetcher.fetch(parsed.as_str()).await?;
    let doc = html::extract(&html, url.trim());
    ::log::info!(
        "Extracted {}: {} words, {} headings, {} links",
        doc.url,
        doc.word_count,
        doc.headings.len(),
        doc.internal_links.len() + doc.external_links.len()
    );
    Ok(doc)
}

/// Fetch up to `cap` competitor pages concurrently.
///
/// Results keep the order of `urls`. A competitor that fails to fetch is
/// logged and left out.
pub async fn fetch_competitors(
    fetcher: Arc<dyn PageFetcher>,
    urls: &[String],
    cap: usize,
) -> Vec<DocumentModel> {
    if urls.len() > cap {
        ::log::warn!(
            "{} competitor URLs given, only the first {} are fetched",
            urls.len(),
            cap
        );
    }

    let handles = urls
        .iter()
        .take(cap)
        .map(|url| {
            let fetcher = Arc::clone(&fetcher);
            let target = url.clone();
            let handle =
                tokio::spawn(async move { fetch_document(fetcher.as_ref(), &target).await });
            (url.as_str(), handle)
        })
        .collect::<Vec<_>>();

    let mut documents = Vec::with_capacity(handles.len());
    for (url, handle) in handles {
        match handle.await {
            Ok(Ok(doc)) => documents.push(doc),
            Ok(Err(e)) => ::log::warn!("Skipping competitor {}: {}", url, e),
            Err(e) => ::log::error!("Competitor task for {} failed: {}", url, e),
        }
    }
    documents
}
