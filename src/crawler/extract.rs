//! Content extraction
//!
//! Selector candidates are tried in order, most specific first. The first
//! candidate whose text reaches [`MIN_CONTENT_CHARS`] is used; later
//! candidates are never queried.

use crate::browser::PageHandle;
use crate::config::CrawlTarget;

/// Minimum length (in characters, before cleaning) of usable page text
pub const MIN_CONTENT_CHARS: usize = 100;

/// Candidates for public documentation sites
pub const GENERIC_SELECTORS: &[&str] = &[
    "main",
    ".content",
    "article",
    ".documentation",
    "#content",
    ".main-content",
    "body",
];

/// Candidates for wiki platforms, platform containers first
pub const WIKI_SELECTORS: &[&str] = &[
    "#main-content",
    ".wiki-content",
    ".page-content",
    ".aui-page-panel-content",
    "main",
    ".content",
    "article",
    ".documentation",
    "#content",
    "body",
];

/// Meta tags copied into the artifact header, with their labels
const METADATA_TAGS: &[(&str, &str)] = &[("last-modified", "Last Modified"), ("author", "Author")];

/// Raw text pulled from a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub title: String,
    pub text: String,
    /// Candidate that produced `text`
    pub selector: String,
}

/// No candidate produced enough text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsufficientContent {
    /// Length of the last candidate text seen, 0 if none matched
    pub observed_chars: usize,
}

#[derive(Debug, Clone)]
pub struct ContentExtractor {
    selectors: Vec<String>,
}

impl ContentExtractor {
    pub fn new<S: Into<String>>(selectors: impl IntoIterator<Item = S>) -> Self {
        Self {
            selectors: selectors.into_iter().map(Into::into).collect(),
        }
    }

    pub fn generic() -> Self {
        Self::new(GENERIC_SELECTORS.iter().copied())
    }

    pub fn wiki() -> Self {
        Self::new(WIKI_SELECTORS.iter().copied())
    }

    /// Configured selectors, else the wiki list for authenticated targets
    pub fn for_target(target: &CrawlTarget) -> Self {
        match &target.content_selectors {
            Some(selectors) => Self::new(selectors.iter().cloned()),
            None if target.requires_auth => Self::wiki(),
            None => Self::generic(),
        }
    }

    pub fn selectors(&self) -> &[String] {
        &self.selectors
    }

    /// Title plus the first candidate text of sufficient length
    ///
    /// A candidate whose query fails (bad selector, no document) is skipped.
    pub async fn extract(&self, page: &dyn PageHandle) -> Result<Extraction, InsufficientContent> {
        let selectors: Vec<&str> = self.selectors.iter().map(String::as_str).collect();
        let results = page.query_texts_many(&selectors).await;
        let mut observed_chars = 0;

        for (selector, texts) in self.selectors.iter().zip(results) {
            let text = match texts.map(|texts| texts.into_iter().next()) {
                Ok(Some(text)) => text,
                Ok(None) => continue,
                Err(e) => {
                    tracing::debug!("Selector '{}' failed: {}", selector, e);
                    continue;
                }
            };

            observed_chars = text.chars().count();
            if observed_chars >= MIN_CONTENT_CHARS {
                let title = page.title().await.unwrap_or_default();
                return Ok(Extraction {
                    title,
                    text,
                    selector: selector.clone(),
                });
            }
        }

        Err(InsufficientContent { observed_chars })
    }
}

/// Best-effort `(label, value)` pairs from known meta tags
pub async fn extract_metadata(page: &dyn PageHandle) -> Vec<(String, String)> {
    let mut metadata = Vec::new();
    for (name, label) in METADATA_TAGS {
        if let Ok(Some(value)) = page.meta_content(name).await {
            if !value.is_empty() {
                metadata.push((label.to_string(), value));
            }
        }
    }
    metadata
}
