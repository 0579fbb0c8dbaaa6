use crate::catalog::{self, DEFAULT_VARIANT_KEYS};
use crate::error::ConfigurationError;
use crate::gateway::{ApiKeys, ProviderKind};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// What a run produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Plan new content from a list of target queries
    NewContent,
    /// Optimize an existing page for a keyword
    OptimizeExisting,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::NewContent => "new_content",
            Mode::OptimizeExisting => "optimize_existing",
        }
    }
}

/// Which AI search surface to optimize for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiSearchType {
    AiOverviews,
    AiMode,
    Both,
}

impl AiSearchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AiSearchType::AiOverviews => "ai_overviews",
            AiSearchType::AiMode => "ai_mode",
            AiSearchType::Both => "both",
        }
    }

    /// Display form used inside prompts
    pub fn title(&self) -> &'static str {
        match self {
            AiSearchType::AiOverviews => "AI Overviews",
            AiSearchType::AiMode => "AI Mode",
            AiSearchType::Both => "Both",
        }
    }

    pub fn includes_overviews(&self) -> bool {
        matches!(self, AiSearchType::AiOverviews | AiSearchType::Both)
    }

    pub fn includes_ai_mode(&self) -> bool {
        matches!(self, AiSearchType::AiMode | AiSearchType::Both)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Depth {
    Basic,
    Standard,
    Comprehensive,
}

impl Depth {
    pub fn as_str(&self) -> &'static str {
        match self {
            Depth::Basic => "Basic",
            Depth::Standard => "Standard",
            Depth::Comprehensive => "Comprehensive",
        }
    }
}

/// Kind of content being planned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentType {
    #[serde(rename = "Blog Post")]
    BlogPost,
    Guide,
    Tutorial,
    #[serde(rename = "Product Page")]
    ProductPage,
    #[serde(rename = "Service Page")]
    ServicePage,
    Research,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::BlogPost => "Blog Post",
            ContentType::Guide => "Guide",
            ContentType::Tutorial => "Tutorial",
            ContentType::ProductPage => "Product Page",
            ContentType::ServicePage => "Service Page",
            ContentType::Research => "Research",
        }
    }
}

/// Immutable settings for one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSettings {
    #[serde(default = "default_mode")]
    pub mode: Mode,

    /// Variant kind keys; unknown keys are ignored
    #[serde(default = "default_variant_types")]
    pub variant_types: Vec<String>,

    #[serde(default = "default_ai_search_type")]
    pub ai_search_type: AiSearchType,

    #[serde(default = "default_depth")]
    pub depth: Depth,

    #[serde(default = "default_target_audience")]
    pub target_audience: String,

    #[serde(default = "default_content_type")]
    pub content_type: ContentType,

    /// Planning runs use at most this many queries
    #[serde(default = "default_max_queries")]
    pub max_queries: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderKind>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(default = "default_true")]
    pub include_schema: bool,
    #[serde(default)]
    pub include_competitors: bool,
    #[serde(default)]
    pub include_entity_mapping: bool,
    #[serde(default)]
    pub include_cross_verification: bool,
    #[serde(default = "default_true")]
    pub include_snippet_optimization: bool,
    #[serde(default = "default_true")]
    pub include_paa_optimization: bool,

    #[serde(default = "default_true")]
    pub analyze_readability: bool,
    #[serde(default = "default_true")]
    pub analyze_structure: bool,
    #[serde(default = "default_true")]
    pub analyze_entities: bool,
    #[serde(default = "default_true")]
    pub analyze_gaps: bool,
}

fn default_mode() -> Mode {
    Mode::NewContent
}

fn default_variant_types() -> Vec<String> {
    DEFAULT_VARIANT_KEYS.iter().map(|k| k.to_string()).collect()
}

fn default_ai_search_type() -> AiSearchType {
    AiSearchType::AiMode
}

fn default_depth() -> Depth {
    Depth::Standard
}

fn default_target_audience() -> String {
    "General audience".to_string()
}

fn default_content_type() -> ContentType {
    ContentType::BlogPost
}

fn default_max_queries() -> usize {
    20
}

fn default_true() -> bool {
    true
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            variant_types: default_variant_types(),
            ai_search_type: default_ai_search_type(),
            depth: default_depth(),
            target_audience: default_target_audience(),
            content_type: default_content_type(),
            max_queries: default_max_queries(),
            provider: None,
            model: None,
            include_schema: true,
            include_competitors: false,
            include_entity_mapping: false,
            include_cross_verification: false,
            include_snippet_optimization: true,
            include_paa_optimization: true,
            analyze_readability: true,
            analyze_structure: true,
            analyze_entities: true,
            analyze_gaps: true,
        }
    }
}

impl AnalysisSettings {
    /// Default settings for the given mode
    pub fn for_mode(mode: Mode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Check that these settings can drive a prompt of the `requested` mode
    pub fn validate_for(&self, requested: Mode) -> Result<(), ConfigurationError> {
        if self.mode != requested {
            return Err(ConfigurationError::ModeMismatch {
                configured: self.mode.as_str(),
                requested: requested.as_str(),
            });
        }
        if requested == Mode::NewContent {
            if catalog::select(&self.variant_types).is_empty() {
                return Err(ConfigurationError::NoVariantTypes);
            }
            if !(5..=100).contains(&self.max_queries) {
                return Err(ConfigurationError::MaxQueriesOutOfRange(self.max_queries));
            }
        }
        Ok(())
    }

    /// Provider and model for a run that calls the gateway
    pub fn generation_target(&self) -> Result<(ProviderKind, &str), ConfigurationError> {
        let provider = self.provider.ok_or(ConfigurationError::MissingProvider)?;
        match self.model.as_deref().map(str::trim) {
            Some(model) if !model.is_empty() => Ok((provider, model)),
            _ => Err(ConfigurationError::MissingModel),
        }
    }
}

/// How pages are fetched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FetcherConfig {
    /// Plain HTTP GET
    Http {
        #[serde(default = "default_user_agent")]
        user_agent: String,
        #[serde(default = "default_fetch_timeout")]
        timeout_secs: u64,
    },
    /// Render through a WebDriver session
    WebDriver {
        #[serde(default = "default_webdriver_url")]
        webdriver_url: String,
        #[serde(default = "default_webdriver_timeout")]
        timeout_secs: u64,
    },
}

impl Default for FetcherConfig {
    fn default() -> Self {
        FetcherConfig::Http {
            user_agent: default_user_agent(),
            timeout_secs: default_fetch_timeout(),
        }
    }
}

impl FetcherConfig {
    /// WebDriver fetching with the default endpoint and timeout
    pub fn webdriver() -> Self {
        FetcherConfig::WebDriver {
            webdriver_url: default_webdriver_url(),
            timeout_secs: default_webdriver_timeout(),
        }
    }
}

/// Default browser user agent for HTTP fetches
pub fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string()
}

fn default_fetch_timeout() -> u64 {
    10
}

/// Default value for webdriver_url
pub fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_webdriver_timeout() -> u64 {
    45
}

fn default_max_competitors() -> usize {
    3
}

/// Everything a CLI run needs, loadable from a JSON file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfig {
    #[serde(default)]
    pub settings: AnalysisSettings,

    #[serde(default)]
    pub fetcher: FetcherConfig,

    /// Competitor pages fetched per run
    #[serde(default = "default_max_competitors")]
    pub max_competitors: usize,

    /// Keys here take precedence over the environment
    #[serde(default)]
    pub api_keys: ApiKeys,

    /// Where report files are written, if anywhere
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            settings: AnalysisSettings::default(),
            fetcher: FetcherConfig::default(),
            max_competitors: default_max_competitors(),
            api_keys: ApiKeys::default(),
            output_dir: None,
        }
    }
}

impl ToolConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigurationError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
        let mut config: Self = serde_json::from_str(json)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply `WEBDRIVER_URL` to a WebDriver fetcher
    pub fn apply_env_overrides(&mut self) {
        if let FetcherConfig::WebDriver { webdriver_url, .. } = &mut self.fetcher {
            if let Ok(url) = std::env::var("WEBDRIVER_URL") {
                if !url.is_empty() {
                    ::log::debug!("Using WEBDRIVER_URL override: {}", url);
                    *webdriver_url = url;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = AnalysisSettings::default();
        assert_eq!(settings.mode, Mode::NewContent);
        assert_eq!(
            settings.variant_types,
            vec!["equivalent", "follow_up", "specification", "entailment"]
        );
        assert_eq!(settings.ai_search_type, AiSearchType::AiMode);
        assert_eq!(settings.depth, Depth::Standard);
        assert!(settings.include_schema);
        assert!(!settings.include_competitors);
        assert!(!settings.include_entity_mapping);
        assert!(!settings.include_cross_verification);
    }

    #[test]
    fn test_settings_from_json_fill_defaults() {
        let json = r#"{
            "mode": "optimize_existing",
            "ai_search_type": "both",
            "depth": "Comprehensive",
            "content_type": "Product Page",
            "provider": "anthropic",
            "include_entity_mapping": true
        }"#;
        let settings: AnalysisSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.mode, Mode::OptimizeExisting);
        assert_eq!(settings.ai_search_type, AiSearchType::Both);
        assert_eq!(settings.depth, Depth::Comprehensive);
        assert_eq!(settings.content_type, ContentType::ProductPage);
        assert_eq!(settings.provider, Some(ProviderKind::Anthropic));
        assert!(settings.include_entity_mapping);
        assert!(settings.include_schema);
        assert_eq!(settings.max_queries, 20);
        assert_eq!(settings.variant_types.len(), 4);
    }

    #[test]
    fn test_validate_for() {
        let settings = AnalysisSettings::default();
        assert!(settings.validate_for(Mode::NewContent).is_ok());
        assert!(matches!(
            settings.validate_for(Mode::OptimizeExisting),
            Err(ConfigurationError::ModeMismatch { .. })
        ));

        let no_variants = AnalysisSettings {
            variant_types: vec!["unknown".to_string()],
            ..AnalysisSettings::default()
        };
        assert!(matches!(
            no_variants.validate_for(Mode::NewContent),
            Err(ConfigurationError::NoVariantTypes)
        ));

        // Optimization does not need variant types
        let optimize = AnalysisSettings {
            variant_types: Vec::new(),
            ..AnalysisSettings::for_mode(Mode::OptimizeExisting)
        };
        assert!(optimize.validate_for(Mode::OptimizeExisting).is_ok());

        let too_many = AnalysisSettings {
            max_queries: 500,
            ..AnalysisSettings::default()
        };
        assert!(matches!(
            too_many.validate_for(Mode::NewContent),
            Err(ConfigurationError::MaxQueriesOutOfRange(500))
        ));
    }

    #[test]
    fn test_generation_target() {
        let mut settings = AnalysisSettings::default();
        assert!(matches!(
            settings.generation_target(),
            Err(ConfigurationError::MissingProvider)
        ));

        settings.provider = Some(ProviderKind::Gemini);
        settings.model = Some("  ".to_string());
        assert!(matches!(
            settings.generation_target(),
            Err(ConfigurationError::MissingModel)
        ));

        settings.model = Some("gemini-2.5-flash".to_string());
        let (provider, model) = settings.generation_target().unwrap();
        assert_eq!(provider, ProviderKind::Gemini);
        assert_eq!(model, "gemini-2.5-flash");
    }

    #[test]
    fn test_tool_config_from_json() {
        let config = ToolConfig::from_json(
            r#"{"fetcher": {"type": "Http", "timeout_secs": 5}, "max_competitors": 2}"#,
        )
        .unwrap();
        assert_eq!(config.max_competitors, 2);
        match config.fetcher {
            FetcherConfig::Http {
                user_agent,
                timeout_secs,
            } => {
                assert_eq!(timeout_secs, 5);
                assert!(user_agent.starts_with("Mozilla/5.0"));
            }
            other => panic!("unexpected fetcher: {:?}", other),
        }

        let empty = ToolConfig::from_json("{}").unwrap();
        assert_eq!(empty.fetcher, FetcherConfig::default());
        assert_eq!(empty.settings, AnalysisSettings::default());
        assert!(empty.output_dir.is_none());
    }

    #[test]
    fn test_tool_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"settings": {"variant_types": ["clarification"]}, "output_dir": "reports"}"#,
        )
        .unwrap();
        let config = ToolConfig::from_file(&path).unwrap();
        assert_eq!(config.settings.variant_types, vec!["clarification"]);
        assert_eq!(config.output_dir, Some(PathBuf::from("reports")));

        assert!(matches!(
            ToolConfig::from_file(dir.path().join("missing.json")),
            Err(ConfigurationError::Io(_))
        ));
    }
}
