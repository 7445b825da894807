use crate::error::ScrapeError;
use scraper::{Html, Selector};
use tracing::warn;

/// Built-in selector list, targeting craigslist-style listing markup.
/// Override with [`SelectorSet::parse`] or the CLI `--selector` flag.
pub const DEFAULT_SELECTORS: &[&str] = &[
    ".result-row .result-image",
    "#sortable-results > ul > li:nth-child(1) > p > a",
];

/// An ordered list of compiled CSS selectors.
///
/// Patterns are validated once, up front, so a typo surfaces as a
/// configuration error instead of failing midway through a batch. Scan order
/// is the order the patterns were given in.
#[derive(Debug, Clone)]
pub struct SelectorSet {
    selectors: Vec<(String, Selector)>,
}

impl SelectorSet {
    pub fn parse<I, S>(patterns: I) -> Result<Self, ScrapeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selectors = Vec::new();
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let selector = Selector::parse(pattern).map_err(|e| ScrapeError::Selector {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })?;
            selectors.push((pattern.to_string(), selector));
        }
        Ok(Self { selectors })
    }

    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.selectors.iter().map(|(pattern, _)| pattern.as_str())
    }
}

impl Default for SelectorSet {
    fn default() -> Self {
        Self::parse(DEFAULT_SELECTORS).expect("default selectors are valid")
    }
}

/// Extracts `href` values from one fetched body, scanning every selector in
/// order and every match in document order. Matches are appended as found;
/// no dedup, no early exit.
///
/// A matched element without an `href` is logged and skipped, it is not an
/// error. A body that is not valid UTF-8 fails for this document only.
pub fn extract_links(
    body: &[u8],
    url: &str,
    selectors: &SelectorSet,
) -> Result<Vec<String>, ScrapeError> {
    let html = std::str::from_utf8(body).map_err(|source| ScrapeError::BodyDecode {
        url: url.to_string(),
        source,
    })?;
    let document = Html::parse_document(html);

    let mut links = Vec::new();
    for (pattern, selector) in &selectors.selectors {
        for element in document.select(selector) {
            match element.value().attr("href") {
                Some(href) => links.push(href.to_string()),
                None => {
                    let text: String = element.text().collect();
                    warn!(
                        url,
                        selector = pattern.as_str(),
                        "No link found {}",
                        text.trim()
                    );
                }
            }
        }
    }
    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(patterns: &[&str]) -> SelectorSet {
        SelectorSet::parse(patterns).unwrap()
    }

    #[test]
    fn test_default_selector_set_compiles() {
        let selectors = SelectorSet::default();
        assert_eq!(selectors.len(), 2);
        assert_eq!(
            selectors.patterns().collect::<Vec<_>>(),
            DEFAULT_SELECTORS.to_vec()
        );
    }

    #[test]
    fn test_invalid_pattern_is_a_configuration_error() {
        let err = SelectorSet::parse(["li:nth-child("]).unwrap_err();
        assert!(matches!(err, ScrapeError::Selector { .. }));
    }

    #[test]
    fn test_extracts_href_values() {
        let html = r#"<div class="result"><a class="link" href="/x">x</a></div>"#;
        let links = extract_links(html.as_bytes(), "http://a", &set(&[".result .link"])).unwrap();
        assert_eq!(links, vec!["/x".to_string()]);
    }

    #[test]
    fn test_match_without_href_is_skipped() {
        let html = r#"<div class="result"><span class="link">no target here</span></div>"#;
        let links = extract_links(html.as_bytes(), "http://a", &set(&[".result .link"])).unwrap();
        assert!(links.is_empty());
    }

    #[test]
    fn test_zero_matches_contribute_zero_entries() {
        let html = r#"<p><a href="/elsewhere">unrelated</a></p>"#;
        let links = extract_links(html.as_bytes(), "http://a", &set(&[".result .link"])).unwrap();
        assert!(links.is_empty());
    }

    #[test]
    fn test_duplicate_matches_are_preserved_in_scan_order() {
        let html = r#"
            <ul class="result">
                <a class="link" href="/x">first</a>
                <a class="link" href="/y">second</a>
            </ul>"#;
        let links = extract_links(html.as_bytes(), "http://a", &set(&[".result .link"])).unwrap();
        assert_eq!(links, vec!["/x".to_string(), "/y".to_string()]);
    }

    #[test]
    fn test_selector_order_determines_scan_sequence() {
        // ".nav a" appears earlier in the document but later in the selector
        // list, so its matches come second.
        let html = r#"
            <nav class="nav"><a href="/nav">nav</a></nav>
            <main class="content"><a href="/content">content</a></main>"#;
        let links = extract_links(
            html.as_bytes(),
            "http://a",
            &set(&[".content a", ".nav a"]),
        )
        .unwrap();
        assert_eq!(links, vec!["/content".to_string(), "/nav".to_string()]);
    }

    #[test]
    fn test_same_element_matched_by_two_selectors_counts_twice() {
        let html = r#"<a class="link" id="promo" href="/x">x</a>"#;
        let links = extract_links(html.as_bytes(), "http://a", &set(&[".link", "#promo"])).unwrap();
        assert_eq!(links, vec!["/x".to_string(), "/x".to_string()]);
    }

    #[test]
    fn test_non_utf8_body_fails_for_this_document_only() {
        let body = [0xff, 0xfe, 0x00, 0x41];
        let err = extract_links(&body, "http://a", &set(&["a"])).unwrap_err();
        assert!(matches!(err, ScrapeError::BodyDecode { .. }));
    }

    #[test]
    fn test_extraction_is_deterministic_for_a_fixed_body() {
        let html = r#"
            <li class="result-row">
                <a class="result-image" href="/listing/1">one</a>
                <a class="result-image" href="/listing/2">two</a>
            </li>"#;
        let selectors = SelectorSet::default();
        let first = extract_links(html.as_bytes(), "http://a", &selectors).unwrap();
        let second = extract_links(html.as_bytes(), "http://a", &selectors).unwrap();
        assert_eq!(first, vec!["/listing/1".to_string(), "/listing/2".to_string()]);
        assert_eq!(first, second);
    }
}
