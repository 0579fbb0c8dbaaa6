pub mod catalog;
pub mod config;
pub mod error;
pub mod fetchers;
pub mod filter;
pub mod gateway;
pub mod parsers;
pub mod prompts;
pub mod report;
pub mod results;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::{AnalysisSettings, Mode, ToolConfig};
pub use error::Error;
pub use fetchers::PageFetcher;
pub use gateway::{GenerationGateway, ProviderKind};
pub use report::{ReportArtifacts, ReportInput};
pub use results::DocumentModel;

use chrono::Utc;
use std::sync::Arc;

/// Default number of competitor pages fetched per run
pub const DEFAULT_MAX_COMPETITORS: usize = 3;

/// A prompt ready to send, plus what it was built from
#[derive(Debug, Clone)]
pub struct PreparedPrompt {
    pub mode: Mode,
    pub prompt: String,
    pub input: ReportInput,
}

/// Builder for one analysis run
pub struct Analysis {
    settings: AnalysisSettings,
    gateway: Arc<dyn GenerationGateway>,
    fetcher: Arc<dyn PageFetcher>,
    max_competitors: usize,
}

impl Analysis {
    /// Create a run with the given settings and collaborators
    pub fn new(
        settings: AnalysisSettings,
        gateway: Arc<dyn GenerationGateway>,
        fetcher: Arc<dyn PageFetcher>,
    ) -> Self {
        Self {
            settings,
            gateway,
            fetcher,
            max_competitors: DEFAULT_MAX_COMPETITORS,
        }
    }

    /// Set how many competitor pages are fetched
    pub fn with_max_competitors(mut self, max_competitors: usize) -> Self {
        self.max_competitors = max_competitors;
        self
    }

    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    /// Trimmed, non-empty queries in input order, capped at `max_queries`
    pub fn planning_queries(&self, queries: &[String]) -> Vec<String> {
        let cleaned: Vec<String> = queries
            .iter()
            .map(|q| q.trim())
            .filter(|q| !q.is_empty())
            .map(str::to_string)
            .collect();
        if cleaned.len() > self.settings.max_queries {
            ::log::warn!(
                "{} queries given, using the first {}",
                cleaned.len(),
                self.settings.max_queries
            );
        }
        cleaned
            .into_iter()
            .take(self.settings.max_queries)
            .collect()
    }

    /// Build the planning prompt without calling the gateway
    pub fn prepare_plan(&self, queries: &[String]) -> Result<PreparedPrompt, Error> {
        let queries = self.planning_queries(queries);
        let prompt = prompts::build_planning_prompt(&queries, &self.settings)?;
        Ok(PreparedPrompt {
            mode: Mode::NewContent,
            prompt,
            input: ReportInput::Queries { queries },
        })
    }

    /// Fetch the page and any competitors, then build the optimization prompt
    /// without calling the gateway
    pub async fn prepare_optimization(
        &self,
        url: &str,
        primary_keyword: &str,
        additional_keywords: &[String],
        competitor_urls: &[String],
    ) -> Result<PreparedPrompt, Error> {
        self.settings.validate_for(Mode::OptimizeExisting)?;
        if primary_keyword.trim().is_empty() {
            return Err(error::ConfigurationError::MissingPrimaryKeyword.into());
        }

        let doc = fetchers::fetch_document(self.fetcher.as_ref(), url).await?;

        let competitors = if self.settings.include_competitors && !competitor_urls.is_empty() {
            ::log::info!("Fetching {} competitor pages", competitor_urls.len().min(self.max_competitors));
            fetchers::fetch_competitors(
                Arc::clone(&self.fetcher),
                competitor_urls,
                self.max_competitors,
            )
            .await
        } else {
            if !competitor_urls.is_empty() {
                ::log::info!("Competitor analysis disabled, ignoring competitor URLs");
            }
            Vec::new()
        };

        let prompt = prompts::build_optimization_prompt(
            &doc,
            primary_keyword,
            additional_keywords,
            &competitors,
            &self.settings,
        )?;
        Ok(PreparedPrompt {
            mode: Mode::OptimizeExisting,
            prompt,
            input: ReportInput::Content {
                url: doc.url,
                keyword: primary_keyword.trim().to_string(),
            },
        })
    }

    /// Send a prepared prompt to the gateway and assemble the report
    pub async fn run(&self, prepared: PreparedPrompt) -> Result<ReportArtifacts, Error> {
        let (provider, model) = self.settings.generation_target()?;
        ::log::info!(
            "Running {} analysis with {} ({})",
            prepared.mode.as_str(),
            provider.display_name(),
            model
        );

        let analysis = self
            .gateway
            .generate(&prepared.prompt, provider, model)
            .await?;

        let artifacts = report::assemble(
            &analysis,
            &prepared.input,
            &self.settings,
            prepared.mode,
            Utc::now(),
        )?;
        Ok(artifacts)
    }

    /// Plan new content for `queries`
    pub async fn plan(&self, queries: &[String]) -> Result<ReportArtifacts, Error> {
        self.settings.generation_target()?;
        let prepared = self.prepare_plan(queries)?;
        self.run(prepared).await
    }

    /// Optimize the page at `url` for `primary_keyword`
    pub async fn optimize(
        &self,
        url: &str,
        primary_keyword: &str,
        additional_keywords: &[String],
        competitor_urls: &[String],
    ) -> Result<ReportArtifacts, Error> {
        self.settings.generation_target()?;
        let prepared = self
            .prepare_optimization(url, primary_keyword, additional_keywords, competitor_urls)
            .await?;
        self.run(prepared).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigurationError, ExtractionError, GenerationError};
    use crate::prompts::optimization::COMPETITOR_GAP_HEADING;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Records prompts and answers with a fixed text
    #[derive(Default)]
    struct RecordingGateway {
        prompts: Mutex<Vec<(String, ProviderKind, String)>>,
        fail: bool,
        reply: Option<&'static str>,
    }

    #[async_trait]
    impl GenerationGateway for RecordingGateway {
        async fn generate(
            &self,
            prompt: &str,
            provider: ProviderKind,
            model: &str,
        ) -> Result<String, GenerationError> {
            self.prompts
                .lock()
                .unwrap()
                .push((prompt.to_string(), provider, model.to_string()));
            if self.fail {
                Err(GenerationError::Api {
                    provider,
                    status: 429,
                    message: "rate limited".to_string(),
                })
            } else {
                Ok(self.reply.unwrap_or("generated analysis").to_string())
            }
        }
    }

    struct MapFetcher {
        pages: HashMap<String, String>,
    }

    #[async_trait]
    impl PageFetcher for MapFetcher {
        async fn fetch(&self, url: &str) -> Result<String, ExtractionError> {
            self.pages.get(url).cloned().ok_or_else(|| ExtractionError::Fetch {
                url: url.to_string(),
                message: "not found".to_string(),
            })
        }
    }

    fn fetcher() -> Arc<MapFetcher> {
        let pages = [
            ("https://site.example/", "Our Coffee", "<h2>Beans</h2><p>We roast beans.</p>"),
            ("https://rival-a.example/", "Rival A", "<p>Rival A text</p>"),
            ("https://rival-c.example/", "Rival C", "<p>Rival C text</p>"),
        ];
        Arc::new(MapFetcher {
            pages: pages
                .iter()
                .map(|(url, title, body)| {
                    (
                        url.to_string(),
                        format!("<html><head><title>{}</title></head><body>{}</body></html>", title, body),
                    )
                })
                .collect(),
        })
    }

    fn settings(mode: Mode) -> AnalysisSettings {
        AnalysisSettings {
            provider: Some(ProviderKind::Gemini),
            model: Some("gemini-2.5-flash".to_string()),
            ..AnalysisSettings::for_mode(mode)
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_plan_end_to_end() {
        let gateway = Arc::new(RecordingGateway::default());
        let analysis = Analysis::new(settings(Mode::NewContent), gateway.clone(), fetcher());

        let artifacts = analysis
            .plan(&strings(&["best coffee", " ", "coffee grinder"]))
            .await
            .unwrap();

        assert_eq!(artifacts.markdown, "generated analysis");
        assert!(artifacts.full_report.contains("AI Provider: Google Gemini"));

        let calls = gateway.prompts.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (prompt, provider, model) = &calls[0];
        assert!(prompt.contains("1. best coffee\n2. coffee grinder"));
        assert_eq!(*provider, ProviderKind::Gemini);
        assert_eq!(model, "gemini-2.5-flash");
    }

    #[test]
    fn test_planning_queries_capped() {
        let mut s = settings(Mode::NewContent);
        s.max_queries = 5;
        let analysis = Analysis::new(s, Arc::new(RecordingGateway::default()), fetcher());
        let queries: Vec<String> = (1..=8).map(|i| format!("query {}", i)).collect();
        let used = analysis.planning_queries(&queries);
        assert_eq!(used.len(), 5);
        assert_eq!(used[4], "query 5");
    }

    #[tokio::test]
    async fn test_optimize_with_competitors() {
        let gateway = Arc::new(RecordingGateway::default());
        let mut s = settings(Mode::OptimizeExisting);
        s.include_competitors = true;
        let analysis = Analysis::new(s, gateway.clone(), fetcher());

        let competitors = strings(&[
            "https://rival-a.example/",
            "https://rival-b.example/",
            "https://rival-c.example/",
        ]);
        let artifacts = analysis
            .optimize("https://site.example/", "coffee", &strings(&["beans"]), &competitors)
            .await
            .unwrap();

        let record: serde_json::Value = serde_json::from_str(&artifacts.json_record).unwrap();
        assert_eq!(record["inputData"]["url"], "https://site.example/");
        assert_eq!(record["inputData"]["keyword"], "coffee");

        let calls = gateway.prompts.lock().unwrap();
        let prompt = &calls[0].0;
        assert!(prompt.contains("Title: Our Coffee"));
        assert!(prompt.contains("H2: Beans"));
        assert!(prompt.contains(COMPETITOR_GAP_HEADING));
        let a = prompt.find("Competitor 1: https://rival-a.example/").unwrap();
        let c = prompt.find("Competitor 2: https://rival-c.example/").unwrap();
        assert!(a < c);
        assert!(!prompt.contains("rival-b"));
    }

    #[tokio::test]
    async fn test_competitors_ignored_when_disabled() {
        let analysis = Analysis::new(
            settings(Mode::OptimizeExisting),
            Arc::new(RecordingGateway::default()),
            fetcher(),
        );
        let prepared = analysis
            .prepare_optimization(
                "https://site.example/",
                "coffee",
                &[],
                &strings(&["https://rival-a.example/"]),
            )
            .await
            .unwrap();
        assert!(!prepared.prompt.contains(COMPETITOR_GAP_HEADING));
        assert!(prepared.prompt.contains("- Additional Keywords: None"));
    }

    #[tokio::test]
    async fn test_gateway_error_propagates() {
        let gateway = Arc::new(RecordingGateway {
            fail: true,
            ..RecordingGateway::default()
        });
        let analysis = Analysis::new(settings(Mode::NewContent), gateway, fetcher());
        let err = analysis.plan(&strings(&["q"])).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Generation(GenerationError::Api { status: 429, .. })
        ));
    }

    #[tokio::test]
    async fn test_empty_reply_is_reported_as_is() {
        let gateway = Arc::new(RecordingGateway {
            reply: Some(""),
            ..RecordingGateway::default()
        });
        let analysis = Analysis::new(settings(Mode::NewContent), gateway, fetcher());
        let artifacts = analysis.plan(&strings(&["q"])).await.unwrap();

        assert_eq!(artifacts.markdown, "");
        assert!(artifacts.full_report.contains("## Analysis Results\n\n\n---"));
        let record: serde_json::Value = serde_json::from_str(&artifacts.json_record).unwrap();
        assert_eq!(record["analysis"], "");
    }

    #[tokio::test]
    async fn test_target_fetch_failure_is_extraction_error() {
        let analysis = Analysis::new(
            settings(Mode::OptimizeExisting),
            Arc::new(RecordingGateway::default()),
            fetcher(),
        );
        let err = analysis
            .optimize("https://missing.example/", "coffee", &[], &[])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Extraction(ExtractionError::Fetch { .. })));
    }

    #[tokio::test]
    async fn test_dry_run_needs_no_provider() {
        let gateway = Arc::new(RecordingGateway::default());
        let analysis = Analysis::new(AnalysisSettings::default(), gateway.clone(), fetcher());

        let prepared = analysis.prepare_plan(&strings(&["q"])).unwrap();
        assert!(prepared.prompt.contains("1. q"));
        assert!(gateway.prompts.lock().unwrap().is_empty());

        let err = analysis.plan(&strings(&["q"])).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Configuration(ConfigurationError::MissingProvider)
        ));
        assert!(gateway.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_queries_fail_before_gateway() {
        let gateway = Arc::new(RecordingGateway::default());
        let analysis = Analysis::new(settings(Mode::NewContent), gateway.clone(), fetcher());
        let err = analysis.plan(&strings(&["", "  "])).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Configuration(ConfigurationError::NoQueries)
        ));
        assert!(gateway.prompts.lock().unwrap().is_empty());
    }
}
