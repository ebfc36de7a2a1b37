use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// Marker left in start URLs of templates that were never filled in
pub const PLACEHOLDER_MARKER: &str = "yourcompany";

/// Main configuration structure for docs-gleaner
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerSettings,

    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,

    #[serde(rename = "target", default)]
    pub targets: Vec<CrawlTarget>,

    #[serde(default)]
    pub auth: Vec<AuthEntry>,
}

/// Crawler behavior configuration shared by all targets
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerSettings {
    /// Flat directory receiving one `.txt` file per document
    #[serde(rename = "output-dir", default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Upper bound for a single page navigation (milliseconds)
    #[serde(rename = "navigation-timeout-ms", default = "default_navigation_timeout_ms")]
    pub navigation_timeout_ms: u64,

    /// Maximum number of pages of one target loaded at the same time
    #[serde(rename = "max-concurrent-pages", default = "default_max_concurrent_pages")]
    pub max_concurrent_pages: usize,

    /// Enqueue eligible same-host links found on loaded pages
    #[serde(rename = "follow-links", default = "default_follow_links")]
    pub follow_links: bool,
}

impl CrawlerSettings {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }
}

impl Default for CrawlerSettings {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            navigation_timeout_ms: default_navigation_timeout_ms(),
            max_concurrent_pages: default_max_concurrent_pages(),
            follow_links: default_follow_links(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./crawled-content")
}

fn default_navigation_timeout_ms() -> u64 {
    15_000
}

fn default_max_concurrent_pages() -> usize {
    4
}

fn default_follow_links() -> bool {
    true
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", default)]
    pub contact_url: Option<String>,
}

impl UserAgentConfig {
    /// Formats the `User-Agent` header: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, contact
            ),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: env!("CARGO_PKG_NAME").to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

/// A named crawl job: seeds, URL filters and a page budget
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlTarget {
    /// Human-readable name, also the first component of artifact file names
    pub name: String,

    #[serde(rename = "start-urls", default)]
    pub start_urls: Vec<String>,

    /// Globs a URL must match (any of them); empty means no restriction
    #[serde(default, alias = "patterns")]
    pub include: Vec<String>,

    /// Globs that reject a URL regardless of `include`
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Upper bound on artifacts written for this target
    #[serde(rename = "max-pages")]
    pub max_pages: usize,

    #[serde(rename = "requires-auth", default)]
    pub requires_auth: bool,

    /// Upper bound on URLs dequeued for this target; defaults to `max_pages`
    #[serde(rename = "max-requests", default)]
    pub max_requests: Option<usize>,

    /// Content selector candidates, most specific first
    #[serde(rename = "content-selectors", default)]
    pub content_selectors: Option<Vec<String>>,

    /// Strip wiki boilerplate; defaults to `requires_auth`
    #[serde(rename = "strip-boilerplate", default)]
    pub strip_boilerplate: Option<bool>,

    /// Skip pages that look like a login form; defaults to true
    #[serde(rename = "detect-login-wall", default)]
    pub detect_login_wall: Option<bool>,
}

impl CrawlTarget {
    /// Creates a target with no filters and default behavior
    pub fn new(name: impl Into<String>, start_urls: Vec<String>, max_pages: usize) -> Self {
        Self {
            name: name.into(),
            start_urls,
            include: Vec::new(),
            exclude: Vec::new(),
            max_pages,
            requires_auth: false,
            max_requests: None,
            content_selectors: None,
            strip_boilerplate: None,
            detect_login_wall: None,
        }
    }

    /// Request budget handed to the queue (`maxRequestsPerCrawl`)
    pub fn request_budget(&self) -> usize {
        self.max_requests.unwrap_or(self.max_pages)
    }

    pub fn strips_boilerplate(&self) -> bool {
        self.strip_boilerplate.unwrap_or(self.requires_auth)
    }

    pub fn detects_login_wall(&self) -> bool {
        self.detect_login_wall.unwrap_or(true)
    }

    /// True if the start URLs still point at a template host
    pub fn is_placeholder(&self) -> bool {
        self.start_urls
            .iter()
            .any(|url| url.contains(PLACEHOLDER_MARKER))
    }
}

/// Credentials source for one host suffix
///
/// Secrets are never written in the file; only the names of the environment
/// variables holding them.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthEntry {
    /// Matched by substring containment against the navigated hostname
    pub host: String,

    /// Environment variable holding a raw `name=value; name2=value2` cookie string
    #[serde(rename = "cookies-env", default)]
    pub cookies_env: Option<String>,

    /// Environment variable holding the `Authorization` header value
    #[serde(rename = "authorization-env", default)]
    pub authorization_env: Option<String>,

    /// Literal extra headers
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

/// Which group of targets a run crawls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlMode {
    /// Public sites, no credentials
    Plain,
    /// Sites behind a login, crawled with configured credentials
    Authenticated,
}

impl CrawlMode {
    /// Whether `target` belongs to this mode
    pub fn selects(&self, target: &CrawlTarget) -> bool {
        match self {
            Self::Plain => !target.requires_auth,
            Self::Authenticated => target.requires_auth,
        }
    }

    /// Plain runs start from an empty output directory
    pub fn clears_output(&self) -> bool {
        matches!(self, Self::Plain)
    }
}
