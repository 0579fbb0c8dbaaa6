use crate::error::ExtractionError;
use crate::fetchers::PageFetcher;
use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder};
use tokio::time::{Duration, timeout};

/// Tried after the configured URL
const FALLBACK_WEBDRIVER_URLS: [&str; 4] = [
    "http://localhost:9515", // ChromeDriver default
    "http://localhost:4723", // Appium default
    "http://localhost:9222", // Chrome debug port default
    "http://127.0.0.1:4444",
];

/// Fetches pages through a WebDriver session so scripts run before the
/// source is read. Each fetch opens and closes its own session.
pub struct WebDriverFetcher {
    webdriver_url: String,
    timeout_secs: u64,
}

impl WebDriverFetcher {
    pub fn new(webdriver_url: &str, timeout_secs: u64) -> Self {
        Self {
            webdriver_url: webdriver_url.to_string(),
            timeout_secs,
        }
    }

    /// URLs to try connecting to, configured one first
    fn candidate_urls(&self) -> Vec<&str> {
        let mut urls = vec![self.webdriver_url.as_str()];
        urls.extend(
            FALLBACK_WEBDRIVER_URLS
                .iter()
                .copied()
                .filter(|u| *u != self.webdriver_url),
        );
        urls
    }

    async fn connect(&self) -> Option<Client> {
        for (attempt, url) in self.candidate_urls().into_iter().enumerate() {
            if attempt > 0 {
                ::log::info!("Trying fallback WebDriver URL: {}", url);
            }
            match ClientBuilder::native().connect(url).await {
                Ok(client) => {
                    ::log::debug!("Connected to WebDriver at {}", url);
                    return Some(client);
                }
                Err(e) if attempt == 0 => {
                    ::log::error!("Failed to connect to WebDriver at {}: {}", url, e);
                }
                // Fallback failures are not logged
                Err(_) => {}
            }
        }

        ::log::error!(
            "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
        );
        None
    }

    async fn load(client: &Client, url: &str) -> Result<String, ExtractionError> {
        client
            .goto(url)
            .await
            .map_err(|e| navigation_error(e, "accessing", url))?;
        client
            .source()
            .await
            .map_err(|e| navigation_error(e, "getting source for", url))
    }
}

#[async_trait]
impl PageFetcher for WebDriverFetcher {
    async fn fetch(&self, url: &str) -> Result<String, ExtractionError> {
        let started = std::time::Instant::now();
        let client = self.connect().await.ok_or_else(|| ExtractionError::Fetch {
            url: url.to_string(),
            message: format!("no WebDriver server reachable at {}", self.webdriver_url),
        })?;

        let result = timeout(
            Duration::from_secs(self.timeout_secs),
            Self::load(&client, url),
        )
        .await;

        if let Err(e) = client.close().await {
            ::log::warn!("Failed to close WebDriver session: {}", e);
        }

        let html = match result {
            Ok(html) => html?,
            Err(_) => {
                ::log::error!("Timeout scraping: {}", url);
                return Err(ExtractionError::Timeout {
                    url: url.to_string(),
                    seconds: self.timeout_secs,
                });
            }
        };

        ::log::debug!(
            "Rendered {} in {:.2} seconds",
            url,
            started.elapsed().as_secs_f64()
        );
        Ok(html)
    }
}

/// Map a WebDriver command failure, noting lost sessions separately
fn navigation_error(error: fantoccini::error::CmdError, context: &str, url: &str) -> ExtractionError {
    if error.to_string().contains("Unable to find session") {
        ::log::warn!("Lost session while {} {}", context, url);
    } else {
        ::log::error!("Failed {} {}: {}", context, url, error);
    }
    ExtractionError::Fetch {
        url: url.to_string(),
        message: format!("{} page failed: {}", context, error),
    }
}
