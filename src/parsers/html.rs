use crate::filter::{LinkFilter, LinkScope};
use crate::parsers::{normalize_whitespace, word_count};
use crate::results::{DocumentModel, Heading, Image, Link, NO_TITLE};
use scraper::{ElementRef, Html, Node, Selector};
use serde_json::Value;

/// Content containers tried in order before falling back to `<body>`
const CONTENT_SELECTORS: [&str; 5] = ["main", "article", "[role=\"main\"]", ".content", "#content"];

/// Elements whose text never counts as page content
const NON_CONTENT_TAGS: [&str; 2] = ["script", "style"];

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector should parse")
}

/// Parses HTML into a document model.
///
/// Never fails: missing elements fall back to defaults.
pub fn extract(html: &str, source_url: &str) -> DocumentModel {
    let doc = Html::parse_document(html);

    let mut model = DocumentModel::new(source_url);
    model.title = extract_title(&doc);
    model.meta_description = extract_meta_description(&doc);
    model.headings = extract_headings(&doc);
    model.body_text = extract_body_text(&doc);
    model.word_count = word_count(&model.body_text);
    model.images = extract_images(&doc);

    let (internal_links, external_links) = extract_links(&doc, source_url);
    model.internal_links = internal_links;
    model.external_links = external_links;

    model.structured_data = extract_structured_data(&doc);

    ::log::debug!(
        "Extracted {}: {} words, {} headings, {} images, {} internal / {} external links, {} JSON-LD blocks",
        source_url,
        model.word_count,
        model.headings.len(),
        model.images.len(),
        model.internal_links.len(),
        model.external_links.len(),
        model.structured_data.len()
    );

    model
}

/// Trimmed title from `<title>`, then the first `<h1>`, then [`NO_TITLE`]
pub fn extract_title(doc: &Html) -> String {
    ["title", "h1"]
        .iter()
        .filter_map(|css| doc.select(&selector(css)).next())
        .map(|el| el.text().collect::<String>().trim().to_string())
        .find(|text| !text.is_empty())
        .unwrap_or_else(|| NO_TITLE.to_string())
}

/// Content of the first `<meta name="description">`, or an empty string
pub fn extract_meta_description(doc: &Html) -> String {
    doc.select(&selector("meta[name]"))
        .find(|el| {
            el.value()
                .attr("name")
                .is_some_and(|name| name.eq_ignore_ascii_case("description"))
        })
        .and_then(|el| el.value().attr("content"))
        .map(|content| content.trim().to_string())
        .unwrap_or_default()
}

/// All `h1`..`h6` elements in document order, text trimmed
pub fn extract_headings(doc: &Html) -> Vec<Heading> {
    doc.select(&selector("h1, h2, h3, h4, h5, h6"))
        .filter_map(|el| {
            let level = el.value().name().strip_prefix('h')?.parse::<u8>().ok()?;
            Some(Heading {
                level,
                text: el.text().collect::<String>().trim().to_string(),
            })
        })
        .collect()
}

/// Visible text of the primary content region
pub fn extract_body_text(doc: &Html) -> String {
    let container = CONTENT_SELECTORS
        .iter()
        .find_map(|css| doc.select(&selector(css)).next())
        .or_else(|| doc.select(&selector("body")).next());

    match container {
        Some(el) => visible_text(el),
        None => String::new(),
    }
}

/// Text nodes under `element`, skipping script and style subtrees
fn visible_text(element: ElementRef) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for node in element.descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| NON_CONTENT_TAGS.contains(&el.name()))
        });
        if !hidden {
            parts.push(text);
        }
    }
    normalize_whitespace(&parts.join(" "))
}

/// Every `<img>` with its `src`, `alt` and `title`
pub fn extract_images(doc: &Html) -> Vec<Image> {
    doc.select(&selector("img"))
        .map(|el| {
            let attr = |name: &str| el.value().attr(name).unwrap_or_default().to_string();
            Image {
                src: attr("src"),
                alt: attr("alt"),
                title: attr("title"),
            }
        })
        .collect()
}

/// Anchors split into (internal, external); excluded hrefs are dropped
pub fn extract_links(doc: &Html, source_url: &str) -> (Vec<Link>, Vec<Link>) {
    let filter = LinkFilter::new(source_url);
    let mut internal = Vec::new();
    let mut external = Vec::new();

    for el in doc.select(&selector("a[href]")) {
        let Some(href) = el.value().attr("href") else {
            continue;
        };
        let link = Link {
            url: href.trim().to_string(),
            anchor_text: normalize_whitespace(&el.text().collect::<String>()),
        };
        match filter.classify(href) {
            LinkScope::Internal => internal.push(link),
            LinkScope::External => external.push(link),
            LinkScope::Excluded => {
                ::log::trace!("Skipping link {}", href);
            }
        }
    }

    (internal, external)
}

/// Parsed JSON-LD blocks; malformed blocks are skipped
pub fn extract_structured_data(doc: &Html) -> Vec<Value> {
    doc.select(&selector(r#"script[type="application/ld+json"]"#))
        .filter_map(|el| {
            let raw = el.text().collect::<String>();
            match serde_json::from_str::<Value>(raw.trim()) {
                Ok(value) => Some(value),
                Err(e) => {
                    ::log::debug!("Skipping malformed JSON-LD block: {}", e);
                    None
                }
            }
        })
        .collect()
}
