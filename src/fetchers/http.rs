use crate::error::ExtractionError;
use crate::fetchers::PageFetcher;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Fetches pages with a plain GET
pub struct HttpFetcher {
    client: Client,
    timeout_secs: u64,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout_secs: u64) -> Result<Self, ExtractionError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(ExtractionError::Client)?;
        Ok(Self {
            client,
            timeout_secs,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, ExtractionError> {
        let fetch_error = |e: reqwest::Error| {
            if e.is_timeout() {
                ExtractionError::Timeout {
                    url: url.to_string(),
                    seconds: self.timeout_secs,
                }
            } else {
                ExtractionError::Fetch {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            }
        };

        let started = std::time::Instant::now();
        let response = self.client.get(url).send().await.map_err(fetch_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ExtractionError::Fetch {
                url: url.to_string(),
                message: format!("HTTP status {}", status),
            });
        }
        let body = response.text().await.map_err(fetch_error)?;

        ::log::debug!(
            "Fetched {} ({} bytes) in {:.2} seconds",
            url,
            body.len(),
            started.elapsed().as_secs_f64()
        );
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_user_agent;

    #[test]
    fn test_new() {
        let fetcher = HttpFetcher::new(&default_user_agent(), 10).unwrap();
        assert_eq!(fetcher.timeout_secs, 10);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_fetch_error() {
        let fetcher = HttpFetcher::new(&default_user_agent(), 2).unwrap();
        // Port 1 on localhost refuses connections
        let err = fetcher.fetch("http://127.0.0.1:1/").await.unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::Fetch { .. } | ExtractionError::Timeout { .. }
        ));
    }
}
