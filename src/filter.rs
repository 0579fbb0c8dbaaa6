use url::Url;

/// Where an anchor points relative to the page it was found on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkScope {
    /// Same host as the source page, or a root-relative path
    Internal,
    /// Absolute http(s) URL on a different host
    External,
    /// mailto:, fragment-only, bare relative paths and other schemes
    Excluded,
}

/// Partitions anchors found on a page into internal and external links
#[derive(Debug, Clone)]
pub struct LinkFilter {
    source: Option<Url>,
}

impl LinkFilter {
    /// Create a filter for links found on `source_url`.
    ///
    /// An unparseable source URL is tolerated: root-relative links are still
    /// internal and every absolute http(s) link becomes external.
    pub fn new(source_url: &str) -> Self {
        let source = match Url::parse(source_url) {
            Ok(url) => Some(url),
            Err(e) => {
                ::log::debug!("Source URL {} is not absolute: {}", source_url, e);
                None
            }
        };
        Self { source }
    }

    /// Host of the source page, if any
    pub fn source_host(&self) -> Option<&str> {
        self.source.as_ref().and_then(|u| u.host_str())
    }

    /// Classify a raw `href` attribute value
    pub fn classify(&self, href: &str) -> LinkScope {
        let href = href.trim();
        if href.is_empty() || href.starts_with('#') {
            return LinkScope::Excluded;
        }

        // Protocol-relative: resolve with the source scheme, then compare hosts
        if let Some(rest) = href.strip_prefix("//") {
            let scheme = self.source.as_ref().map(|u| u.scheme()).unwrap_or("https");
            return match Url::parse(&format!("{}://{}", scheme, rest)) {
                Ok(resolved) => self.classify_absolute(&resolved),
                Err(_) => LinkScope::Excluded,
            };
        }

        if href.starts_with('/') {
            return LinkScope::Internal;
        }

        match Url::parse(href) {
            Ok(absolute) => self.classify_absolute(&absolute),
            // Bare relative paths such as `page.html`
            Err(_) => LinkScope::Excluded,
        }
    }

    fn classify_absolute(&self, url: &Url) -> LinkScope {
        if !matches!(url.scheme(), "http" | "https") {
            return LinkScope::Excluded;
        }
        let Some(host) = url.host_str() else {
            return LinkScope::Excluded;
        };
        match self.source_host() {
            Some(source_host) if source_host.eq_ignore_ascii_case(host) => LinkScope::Internal,
            _ => LinkScope::External,
        }
    }
}
