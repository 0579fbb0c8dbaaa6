pub mod html;
pub mod text;


/// Kind of raw input a query list arrives in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryFormat {
    /// One query per line
    Lines,
    /// CSV with a `query` column
    Csv,
}

impl QueryFormat {
    /// Determines the format from a file name or path
    pub fn from_path(path: &str) -> Self {
        if path.to_ascii_lowercase().ends_with(".csv") {
            ::log::debug!("Classifying as CSV: {}", path);
            QueryFormat::Csv
        } else {
            ::log::debug!("Classifying as line list: {}", path);
            QueryFormat::Lines
        }
    }
}

/// Collapse every run of whitespace to a single space and trim
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Number of whitespace-delimited tokens
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// The first `limit` whitespace-delimited tokens of `text`, joined by single spaces.
///
/// Never splits inside a token.
pub fn take_tokens(text: &str, limit: usize) -> String {
    text.split_whitespace()
        .take(limit)
        .collect::<Vec<_>>()
        .join(" ")
}
