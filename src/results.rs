use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Title used when a page has neither `<title>` nor `<h1>`
pub const NO_TITLE: &str = "No title found";

/// A heading found on the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Heading level, 1 through 6
    pub level: u8,
    pub text: String,
}

impl Heading {
    /// Tag name in upper case, e.g. `H2`
    pub fn tag(&self) -> String {
        format!("H{}", self.level)
    }
}

/// An `<img>` element; missing attributes are empty strings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Image {
    pub src: String,
    pub alt: String,
    pub title: String,
}

/// An anchor with its href as written in the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
    pub anchor_text: String,
}

/// Normalized representation of one fetched page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentModel {
    /// URL the page was fetched from
    pub url: String,

    /// Title of the page, or [`NO_TITLE`]
    pub title: String,

    /// Content of `<meta name="description">`, empty if absent
    pub meta_description: String,

    /// Headings in document order
    pub headings: Vec<Heading>,

    /// Visible text of the primary content region
    pub body_text: String,

    /// Whitespace-delimited tokens in `body_text`
    pub word_count: usize,

    pub images: Vec<Image>,
    pub internal_links: Vec<Link>,
    pub external_links: Vec<Link>,

    /// Successfully parsed JSON-LD blocks
    pub structured_data: Vec<Value>,

    pub fetched_at: DateTime<Utc>,
}

impl DocumentModel {
    /// Create an empty document for the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: NO_TITLE.to_string(),
            meta_description: String::new(),
            headings: Vec::new(),
            body_text: String::new(),
            word_count: 0,
            images: Vec::new(),
            internal_links: Vec::new(),
            external_links: Vec::new(),
            structured_data: Vec::new(),
            fetched_at: Utc::now(),
        }
    }

    /// True when every extracted field matches, ignoring `fetched_at`
    pub fn same_content(&self, other: &DocumentModel) -> bool {
        self.url == other.url
            && self.title == other.title
            && self.meta_description == other.meta_description
            && self.headings == other.headings
            && self.body_text == other.body_text
            && self.word_count == other.word_count
            && self.images == other.images
            && self.internal_links == other.internal_links
            && self.external_links == other.external_links
            && self.structured_data == other.structured_data
    }
}
