//! In-memory browser used by unit tests

use crate::browser::{Browser, Cookie, EngineError, HtmlDocument, NavigationOptions, PageHandle};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone)]
pub(crate) enum FakeResponse {
    Html(String),
    Timeout,
}

/// What a page session looked like when it navigated
#[derive(Debug, Clone)]
pub(crate) struct Navigation {
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub cookies: Vec<Cookie>,
}

#[derive(Debug, Default)]
pub(crate) struct FakeBrowser {
    responses: HashMap<String, FakeResponse>,
    delay: Option<Duration>,
    navigations: Arc<Mutex<Vec<Navigation>>>,
}

impl FakeBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, html: impl Into<String>) -> Self {
        self.responses
            .insert(url.to_string(), FakeResponse::Html(html.into()));
        self
    }

    pub fn with_timeout(mut self, url: &str) -> Self {
        self.responses.insert(url.to_string(), FakeResponse::Timeout);
        self
    }

    /// Every navigation sleeps this long, so concurrent handlers interleave
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn navigations(&self) -> Vec<Navigation> {
        self.navigations.lock().unwrap().clone()
    }
}

#[async_trait]
impl Browser for FakeBrowser {
    async fn new_page(&self) -> Result<Box<dyn PageHandle>, EngineError> {
        Ok(Box::new(FakePage {
            responses: self.responses.clone(),
            delay: self.delay,
            navigations: Arc::clone(&self.navigations),
            headers: BTreeMap::new(),
            cookies: Vec::new(),
            document: None,
        }))
    }
}

pub(crate) struct FakePage {
    responses: HashMap<String, FakeResponse>,
    delay: Option<Duration>,
    navigations: Arc<Mutex<Vec<Navigation>>>,
    pub headers: BTreeMap<String, String>,
    pub cookies: Vec<Cookie>,
    document: Option<HtmlDocument>,
}

impl FakePage {
    /// A page that already shows `html`
    pub fn loaded(html: &str) -> Self {
        Self {
            responses: HashMap::new(),
            delay: None,
            navigations: Arc::default(),
            headers: BTreeMap::new(),
            cookies: Vec::new(),
            document: Some(HtmlDocument::new(
                Url::parse("https://fake.test/").unwrap(),
                html,
            )),
        }
    }

    pub fn blank() -> Self {
        Self {
            document: None,
            ..Self::loaded("")
        }
    }

    fn document(&self) -> Result<&HtmlDocument, EngineError> {
        self.document.as_ref().ok_or(EngineError::NoPageLoaded)
    }
}

#[async_trait]
impl PageHandle for FakePage {
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
            self.cookies
                .retain(|c| !(c.name == cookie.name && c.domain == cookie.domain && c.path == cookie.path));
            self.cookies.push(cookie.clone());
        }
        Ok(())
    }

    async fn goto(&mut self, url: &Url, options: &NavigationOptions) -> Result<(), EngineError> {
        self.navigations.lock().unwrap().push(Navigation {
            url: url.to_string(),
            headers: self.headers.clone(),
            cookies: self.cookies.clone(),
        });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.responses.get(url.as_str()) {
            Some(FakeResponse::Html(html)) => {
                self.document = Some(HtmlDocument::new(url.clone(), html.clone()));
                Ok(())
            }
            Some(FakeResponse::Timeout) => Err(EngineError::Timeout {
                url: url.to_string(),
                timeout_ms: options.timeout.as_millis() as u64,
            }),
            None => Err(EngineError::HttpStatus {
                url: url.to_string(),
                status: 404,
            }),
        }
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
