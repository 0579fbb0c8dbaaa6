use crate::gateway::ProviderKind;
use thiserror::Error;

/// A page could not be turned into a document at all.
///
/// Malformed-but-parseable HTML never produces this; the extractor degrades
/// individual fields instead. This covers failures upstream of parsing.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("timed out after {seconds}s fetching {url}")]
    Timeout { url: String, seconds: u64 },

    #[error("failed to build HTTP client: {0}")]
    Client(reqwest::Error),
}

/// Settings are empty or contradict the requested operation.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("no queries provided")]
    NoQueries,

    #[error("no recognized variant types selected")]
    NoVariantTypes,

    #[error("primary keyword must not be empty")]
    MissingPrimaryKeyword,

    #[error("settings are for {configured} but a {requested} prompt was requested")]
    ModeMismatch {
        configured: &'static str,
        requested: &'static str,
    },

    #[error("max_queries must be between 5 and 100, got {0}")]
    MaxQueriesOutOfRange(usize),

    #[error("no AI provider selected")]
    MissingProvider,

    #[error("no model selected")]
    MissingModel,

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failure reported by a generation provider. Never retried by this crate.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("no API key configured for {0}")]
    MissingApiKey(ProviderKind),

    #[error("model identifier must not be empty")]
    InvalidModel,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{provider} API error (status {status}): {message}")]
    Api {
        provider: ProviderKind,
        status: u16,
        message: String,
    },

    #[error("{0} returned no text")]
    EmptyResponse(ProviderKind),
}

/// Umbrella error for a whole analysis run.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("failed to write report: {0}")]
    Report(#[from] std::io::Error),

    #[error("failed to encode report: {0}")]
    Encode(#[from] serde_json::Error),
}
