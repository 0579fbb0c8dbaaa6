use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use fanout_report::config::{AiSearchType, ContentType, Depth, FetcherConfig};
use fanout_report::{Mode, ProviderKind, ToolConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "fanout-report")]
#[command(about = "Query fan-out analysis for new and existing content")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Plan new content from a list of target queries
    Plan {
        /// File with one query per line, or a CSV with a `query` column
        queries_file: Option<PathBuf>,

        /// Target query (repeatable)
        #[arg(short, long = "query")]
        queries: Vec<String>,

        /// Read QUERIES_FILE as CSV regardless of its extension
        #[arg(long)]
        csv: bool,

        #[command(flatten)]
        options: RunOptions,
    },

    /// Optimize an existing page for a keyword
    Optimize {
        /// Page to analyze
        url: String,

        /// Primary keyword
        #[arg(short, long)]
        keyword: String,

        /// Additional keyword (repeatable)
        #[arg(long = "also")]
        additional_keywords: Vec<String>,

        /// Competitor page URL (repeatable)
        #[arg(long = "competitor")]
        competitors: Vec<String>,

        #[command(flatten)]
        options: RunOptions,
    },

    /// List providers and their known models
    Models,
}

/// Flags shared by `plan` and `optimize`
#[derive(ClapArgs, Debug)]
pub struct RunOptions {
    /// JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Generation provider
    #[arg(short, long, value_enum)]
    pub provider: Option<ProviderArg>,

    /// Model identifier; defaults to the provider's preferred model
    #[arg(short, long)]
    pub model: Option<String>,

    /// Variant types to generate (repeatable or comma separated)
    #[arg(long = "variant", value_enum, value_delimiter = ',')]
    pub variants: Vec<VariantArg>,

    /// AI search surface to optimize for
    #[arg(long, value_enum)]
    pub target: Option<TargetArg>,

    /// Analysis depth
    #[arg(long, value_enum)]
    pub depth: Option<DepthArg>,

    /// Target audience
    #[arg(long)]
    pub audience: Option<String>,

    /// Content type being planned
    #[arg(long, value_enum)]
    pub content_type: Option<ContentTypeArg>,

    /// Maximum number of queries to analyze (5-100)
    #[arg(long)]
    pub max_queries: Option<usize>,

    /// Leave out schema markup recommendations
    #[arg(long)]
    pub no_schema: bool,

    /// Include competitor analysis
    #[arg(long = "competitors")]
    pub include_competitors: bool,

    /// Include entity mapping
    #[arg(long)]
    pub entity_mapping: bool,

    /// Include cross-verification strategy
    #[arg(long)]
    pub cross_verification: bool,

    /// Leave out featured snippet tactics
    #[arg(long)]
    pub no_snippets: bool,

    /// Leave out People Also Ask tactics
    #[arg(long)]
    pub no_paa: bool,

    /// Leave readability out of the analysis focus
    #[arg(long)]
    pub no_readability: bool,

    /// Leave structure out of the analysis focus
    #[arg(long)]
    pub no_structure: bool,

    /// Leave entity coverage out of the analysis focus
    #[arg(long)]
    pub no_entities: bool,

    /// Leave content gaps out of the analysis focus
    #[arg(long)]
    pub no_gaps: bool,

    /// Render pages through WebDriver instead of a plain HTTP GET
    #[arg(long)]
    pub webdriver: bool,

    /// Directory to write report files into
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Print the prompt and exit without calling a provider
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ProviderArg {
    Gemini,
    Openai,
    Anthropic,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum VariantArg {
    Equivalent,
    FollowUp,
    Generalization,
    Canonicalization,
    Entailment,
    Specification,
    Clarification,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum TargetArg {
    AiOverviews,
    AiMode,
    Both,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum DepthArg {
    Basic,
    Standard,
    Comprehensive,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ContentTypeArg {
    BlogPost,
    Guide,
    Tutorial,
    ProductPage,
    ServicePage,
    Research,
}

/// Convert from CLI argument provider to internal provider
pub fn convert_provider(arg: ProviderArg) -> ProviderKind {
    match arg {
        ProviderArg::Gemini => ProviderKind::Gemini,
        ProviderArg::Openai => ProviderKind::OpenAi,
        ProviderArg::Anthropic => ProviderKind::Anthropic,
    }
}

/// Catalog key for a variant argument
pub fn convert_variant(arg: VariantArg) -> &'static str {
    match arg {
        VariantArg::Equivalent => "equivalent",
        VariantArg::FollowUp => "follow_up",
        VariantArg::Generalization => "generalization",
        VariantArg::Canonicalization => "canonicalization",
        VariantArg::Entailment => "entailment",
        VariantArg::Specification => "specification",
        VariantArg::Clarification => "clarification",
    }
}

pub fn convert_target(arg: TargetArg) -> AiSearchType {
    match arg {
        TargetArg::AiOverviews => AiSearchType::AiOverviews,
        TargetArg::AiMode => AiSearchType::AiMode,
        TargetArg::Both => AiSearchType::Both,
    }
}

pub fn convert_depth(arg: DepthArg) -> Depth {
    match arg {
        DepthArg::Basic => Depth::Basic,
        DepthArg::Standard => Depth::Standard,
        DepthArg::Comprehensive => Depth::Comprehensive,
    }
}

pub fn convert_content_type(arg: ContentTypeArg) -> ContentType {
    match arg {
        ContentTypeArg::BlogPost => ContentType::BlogPost,
        ContentTypeArg::Guide => ContentType::Guide,
        ContentTypeArg::Tutorial => ContentType::Tutorial,
        ContentTypeArg::ProductPage => ContentType::ProductPage,
        ContentTypeArg::ServicePage => ContentType::ServicePage,
        ContentTypeArg::Research => ContentType::Research,
    }
}

impl RunOptions {
    /// Apply command line overrides on top of a loaded configuration
    pub fn apply(&self, config: &mut ToolConfig, mode: Mode) {
        let settings = &mut config.settings;
        settings.mode = mode;

        if let Some(provider) = self.provider {
            settings.provider = Some(convert_provider(provider));
        }
        if let Some(model) = &self.model {
            settings.model = Some(model.clone());
        }
        if !self.variants.is_empty() {
            settings.variant_types = self
                .variants
                .iter()
                .map(|v| convert_variant(*v).to_string())
                .collect();
        }
        if let Some(target) = self.target {
            settings.ai_search_type = convert_target(target);
        }
        if let Some(depth) = self.depth {
            settings.depth = convert_depth(depth);
        }
        if let Some(audience) = &self.audience {
            settings.target_audience = audience.clone();
        }
        if let Some(content_type) = self.content_type {
            settings.content_type = convert_content_type(content_type);
        }
        if let Some(max_queries) = self.max_queries {
            settings.max_queries = max_queries;
        }

        if self.no_schema {
            settings.include_schema = false;
        }
        if self.include_competitors {
            settings.include_competitors = true;
        }
        if self.entity_mapping {
            settings.include_entity_mapping = true;
        }
        if self.cross_verification {
            settings.include_cross_verification = true;
        }
        if self.no_snippets {
            settings.include_snippet_optimization = false;
        }
        if self.no_paa {
            settings.include_paa_optimization = false;
        }
        if self.no_readability {
            settings.analyze_readability = false;
        }
        if self.no_structure {
            settings.analyze_structure = false;
        }
        if self.no_entities {
            settings.analyze_entities = false;
        }
        if self.no_gaps {
            settings.analyze_gaps = false;
        }

        if self.webdriver && !matches!(config.fetcher, FetcherConfig::WebDriver { .. }) {
            config.fetcher = FetcherConfig::webdriver();
            config.apply_env_overrides();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = Some(dir.clone());
        }
    }
}
