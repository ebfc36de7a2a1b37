//! Browsing-engine boundary
//!
//! The crawl pipeline never talks to the network directly. It is handed a
//! [`Browser`] that opens [`PageHandle`]s, and everything it needs from a page
//! (headers, cookies, navigation, DOM queries) goes through these traits.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors raised by a browsing engine
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Navigation to {url} timed out after {timeout_ms}ms")]
    Timeout { url: String, timeout_ms: u64 },

    #[error("Network error for {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Expected HTML from {url}, got '{content_type}'")]
    NotHtml { url: String, content_type: String },

    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    #[error("No page has been loaded yet")]
    NoPageLoaded,

    #[error("Browser error: {0}")]
    Other(String),
}

/// A cookie injected into a page session before navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
}

impl Cookie {
    /// Whether this cookie should be sent with a request to `url`
    pub fn applies_to(&self, url: &Url) -> bool {
        let Some(host) = url.host_str() else {
            return false;
        };
        let domain = self.domain.trim_start_matches('.').to_ascii_lowercase();
        let host = host.to_ascii_lowercase();

        let domain_ok = host == domain || host.ends_with(&format!(".{}", domain));
        domain_ok && url.path().starts_with(&self.path)
    }
}

/// Page lifecycle event a navigation waits for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    /// The document has been received
    Load,
    /// No network activity remains for the page
    #[default]
    NetworkIdle,
}

/// Options for a single navigation
#[derive(Debug, Clone)]
pub struct NavigationOptions {
    pub timeout: Duration,
    pub wait_until: LoadState,
}

impl NavigationOptions {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            wait_until: LoadState::NetworkIdle,
        }
    }
}

/// A navigable page session
///
/// Headers and cookies set on a page apply to every later navigation made
/// through that same page. Applying the same header or cookie twice has no
/// additional effect.
#[async_trait]
pub trait PageHandle: Send + Sync {
    /// Merges headers into the session's outgoing request headers
    async fn set_extra_http_headers(
        &mut self,
        headers: &BTreeMap<String, String>,
    ) -> Result<(), EngineError>;

    /// Adds cookies to the session, replacing cookies with the same name, domain and path
    async fn add_cookies(&mut self, cookies: &[Cookie]) -> Result<(), EngineError>;

    /// Navigates to `url`, honoring the timeout in `options`
    async fn goto(&mut self, url: &Url, options: &NavigationOptions) -> Result<(), EngineError>;

    /// Document title, empty if the page has none
    async fn title(&self) -> Result<String, EngineError>;

    /// Text content of every element matching `selector`, in document order
    async fn query_texts(&self, selector: &str) -> Result<Vec<String>, EngineError>;

    /// Text content of the first element matching `selector`
    async fn query_text(&self, selector: &str) -> Result<Option<String>, EngineError> {
        Ok(self.query_texts(selector).await?.into_iter().next())
    }

    /// Runs several selector queries against the loaded page at once
    ///
    /// One result per selector, in order. Engines override this to answer
    /// the whole batch from a single pass over the document.
    async fn query_texts_many(&self, selectors: &[&str]) -> Vec<Result<Vec<String>, EngineError>> {
        let mut results = Vec::with_capacity(selectors.len());
        for selector in selectors {
            results.push(self.query_texts(selector).await);
        }
        results
    }

    /// `content` attribute of the `<meta name="...">` tag, if present
    async fn meta_content(&self, name: &str) -> Result<Option<String>, EngineError>;

    /// Absolute http(s) links found on the loaded page
    async fn links(&self) -> Result<Vec<Url>, EngineError>;
}

/// Factory for page sessions
#[async_trait]
pub trait Browser: Send + Sync {
    async fn new_page(&self) -> Result<Box<dyn PageHandle>, EngineError>;
}
