//! Loaded HTML document
//!
//! Answers the DOM queries of the engine boundary over a fetched HTML body:
//! - Text content of elements matching CSS selectors
//! - Page title and `<meta>` values
//! - Links to follow (from `<a>` tags and canonical links)
//!
//! `scraper::Html` is not `Send`, so it never outlives a synchronous call.
//! The document is parsed once on construction to capture the title, meta
//! tags and links, and once per batch of selector queries.

use crate::browser::EngineError;
use scraper::{Html, Selector};
use url::Url;

/// A fetched HTML page together with the URL it was served from
#[derive(Debug, Clone)]
pub struct HtmlDocument {
    url: Url,
    html: String,
    title: String,
    meta: Vec<(String, String)>,
    links: Vec<Url>,
}

impl HtmlDocument {
    pub fn new(url: Url, html: impl Into<String>) -> Self {
        let html = html.into();
        let document = Html::parse_document(&html);
        let title = parse_title(&document);
        let meta = parse_meta(&document);
        let links = parse_links(&document, &url);

        Self {
            url,
            html,
            title,
            meta,
            links,
        }
    }

    /// Final URL of the document (after redirects)
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Trimmed `<title>` text, or an empty string
    pub fn title(&self) -> String {
        self.title.clone()
    }

    /// Text content of every element matching `selector`
    ///
    /// The text is returned untouched (like the DOM `textContent` property);
    /// whitespace cleanup happens later in the pipeline.
    ///
    /// # Example
    ///
    /// ```
    /// use docs_gleaner::browser::HtmlDocument;
    /// use url::Url;
    ///
    /// let doc = HtmlDocument::new(
    ///     Url::parse("https://x.test/").unwrap(),
    ///     "<html><body><main>Hello <b>world</b></main></body></html>",
    /// );
    /// assert_eq!(doc.select_texts("main").unwrap(), vec!["Hello world".to_string()]);
    /// ```
    pub fn select_texts(&self, selector: &str) -> Result<Vec<String>, EngineError> {
        let selector = parse_selector(selector)?;
        let document = Html::parse_document(&self.html);
        Ok(texts(&document, &selector))
    }

    /// Runs several selector queries over a single parse of the document
    ///
    /// Results are in the order of `selectors`; an invalid selector fails
    /// only its own entry.
    pub fn select_texts_many(&self, selectors: &[&str]) -> Vec<Result<Vec<String>, EngineError>> {
        let document = Html::parse_document(&self.html);
        selectors
            .iter()
            .map(|selector| Ok(texts(&document, &parse_selector(selector)?)))
            .collect()
    }

    /// `content` of the first `<meta name="...">` whose name matches (case-insensitive)
    pub fn meta_content(&self, name: &str) -> Option<String> {
        self.meta
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, content)| content.clone())
    }

    /// All followable links, resolved against the document URL
    ///
    /// # Link Extraction Rules
    ///
    /// **Include:**
    /// - `<a href="...">` tags
    /// - `<link rel="canonical" href="...">`
    ///
    /// **Exclude:**
    /// - `<a href="..." download>`
    /// - `javascript:`, `mailto:`, `tel:` links and data URIs
    /// - Fragment-only links
    /// - Anything that is not http(s) after resolution
    pub fn links(&self) -> Vec<Url> {
        self.links.clone()
    }
}

fn texts(document: &Html, selector: &Selector) -> Vec<String> {
    document
        .select(selector)
        .map(|element| element.text().collect::<String>())
        .collect()
}

fn parse_title(document: &Html) -> String {
    let Ok(selector) = Selector::parse("title") else {
        return String::new();
    };

    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// `(name, content)` of every `<meta name content>` tag, in document order
fn parse_meta(document: &Html) -> Vec<(String, String)> {
    let Ok(selector) = Selector::parse("meta[name][content]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| {
            let name = element.value().attr("name")?;
            let content = element.value().attr("content")?;
            Some((name.to_string(), content.trim().to_string()))
        })
        .collect()
}

fn parse_links(document: &Html, base_url: &Url) -> Vec<Url> {
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if element.value().attr("download").is_some() {
                continue;
            }
            if let Some(link) = element
                .value()
                .attr("href")
                .and_then(|href| resolve_link(href, base_url))
            {
                links.push(link);
            }
        }
    }

    if let Ok(canonical_selector) = Selector::parse("link[rel='canonical'][href]") {
        for element in document.select(&canonical_selector) {
            if let Some(link) = element
                .value()
                .attr("href")
                .and_then(|href| resolve_link(href, base_url))
            {
                links.push(link);
            }
        }
    }

    links
}

fn parse_selector(selector: &str) -> Result<Selector, EngineError> {
    Selector::parse(selector).map_err(|e| EngineError::Selector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// Resolves a link href to an absolute http(s) URL without its fragment
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let mut absolute = base_url.join(href).ok()?;
    if absolute.scheme() != "http" && absolute.scheme() != "https" {
        return None;
    }
    absolute.set_fragment(None);
    Some(absolute)
}
