//! Static HTML browsing engine
//!
//! This module implements the browser boundary on top of `reqwest`:
//! - Building the HTTP client with the configured user agent
//! - Per-page extra headers and cookie jar
//! - Navigation bounded by a timeout
//! - Error classification (timeout, network, HTTP status, non-HTML content)
//!
//! JavaScript is never executed; a page is whatever HTML the server returns.

use crate::browser::{Browser, Cookie, EngineError, HtmlDocument, NavigationOptions, PageHandle};
use crate::config::UserAgentConfig;
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, COOKIE};
use reqwest::{redirect::Policy, Client};
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

/// Builds an HTTP client with the configured user agent
///
/// # Example
///
/// ```no_run
/// use docs_gleaner::browser::build_http_client;
/// use docs_gleaner::config::UserAgentConfig;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Browser that opens independent static HTML pages sharing one HTTP client
#[derive(Debug, Clone)]
pub struct HttpBrowser {
    client: Client,
}

impl HttpBrowser {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Creates a browser whose client identifies itself with `config`
    pub fn from_config(config: &UserAgentConfig) -> Result<Self, EngineError> {
        let client = build_http_client(config).map_err(|e| EngineError::Other(e.to_string()))?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl Browser for HttpBrowser {
    async fn new_page(&self) -> Result<Box<dyn PageHandle>, EngineError> {
        Ok(Box::new(HttpPage::new(self.client.clone())))
    }
}

/// A single page session: its own headers, cookies and loaded document
#[derive(Debug)]
pub struct HttpPage {
    client: Client,
    headers: BTreeMap<String, String>,
    cookies: Vec<Cookie>,
    document: Option<HtmlDocument>,
}

impl HttpPage {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            headers: BTreeMap::new(),
            cookies: Vec::new(),
            document: None,
        }
    }

    /// Extra headers currently applied to this session
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Cookies currently stored in this session
    pub fn cookies(&self) -> &[Cookie] {
        &self.cookies
    }

    /// `Cookie` header value for a request to `url`
    fn cookie_header(&self, url: &Url) -> Option<String> {
        let pairs: Vec<String> = self
            .cookies
            .iter()
            .filter(|cookie| cookie.applies_to(url))
            .map(|cookie| format!("{}={}", cookie.name, cookie.value))
            .collect();

        (!pairs.is_empty()).then(|| pairs.join("; "))
    }

    fn document(&self) -> Result<&HtmlDocument, EngineError> {
        self.document.as_ref().ok_or(EngineError::NoPageLoaded)
    }

    async fn fetch(&self, url: &Url) -> Result<HtmlDocument, EngineError> {
        let mut request = self.client.get(url.clone());
        for (name, value) in &self.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(cookie) = self.cookie_header(url) {
            request = request.header(COOKIE, cookie);
        }

        let response = request.send().await.map_err(|e| network_error(url, e))?;
        let status = response.status();
        let final_url = response.url().clone();

        if !status.is_success() {
            return Err(EngineError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !is_html(&content_type) {
            return Err(EngineError::NotHtml {
                url: url.to_string(),
                content_type,
            });
        }

        let body = response.text().await.map_err(|e| network_error(url, e))?;
        Ok(HtmlDocument::new(final_url, body))
    }
}

#[async_trait]
impl PageHandle for HttpPage {
    async fn set_extra_http_headers(
        &mut self,
        headers: &BTreeMap<String, String>,
    ) -> Result<(), EngineError> {
        self.headers
            .extend(headers.iter().map(|(k, v)| (k.clone(), v.clone())));
        Ok(())
    }

    async fn add_cookies(&mut self, cookies: &[Cookie]) -> Result<(), EngineError> {
        for cookie in cookies {
            self.cookies.retain(|existing| {
                !(existing.name == cookie.name
                    && existing.domain == cookie.domain
                    && existing.path == cookie.path)
            });
            self.cookies.push(cookie.clone());
        }
        Ok(())
    }

    async fn goto(&mut self, url: &Url, options: &NavigationOptions) -> Result<(), EngineError> {
        // The whole body is read before returning, which is as idle as a
        // static page gets, so both load states behave the same here.
        let document = tokio::time::timeout(options.timeout, self.fetch(url))
            .await
            .map_err(|_| EngineError::Timeout {
                url: url.to_string(),
                timeout_ms: options.timeout.as_millis() as u64,
            })??;

        self.document = Some(document);
        Ok(())
    }

    async fn title(&self) -> Result<String, EngineError> {
        Ok(self.document()?.title())
    }

    async fn query_texts(&self, selector: &str) -> Result<Vec<String>, EngineError> {
        self.document()?.select_texts(selector)
    }

    async fn query_texts_many(&self, selectors: &[&str]) -> Vec<Result<Vec<String>, EngineError>> {
        match self.document() {
            Ok(document) => document.select_texts_many(selectors),
            Err(_) => selectors.iter().map(|_| Err(EngineError::NoPageLoaded)).collect(),
        }
    }

    async fn meta_content(&self, name: &str) -> Result<Option<String>, EngineError> {
        Ok(self.document()?.meta_content(name))
    }

    async fn links(&self) -> Result<Vec<Url>, EngineError> {
        Ok(self.document()?.links())
    }
}

fn is_html(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    content_type.contains("text/html") || content_type.contains("application/xhtml+xml")
}

fn network_error(url: &Url, source: reqwest::Error) -> EngineError {
    EngineError::Network {
        url: url.to_string(),
        source,
    }
}
