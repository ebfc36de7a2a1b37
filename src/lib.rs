//! docs-gleaner: a documentation crawler for knowledge-base ingestion
//!
//! This crate crawls configured documentation sites, pulls the main content
//! region out of every eligible page and writes one cleaned plain-text file per
//! page into a flat output directory, ready for bulk upload.

pub mod browser;
pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for docs-gleaner operations
#[derive(Debug, Error)]
pub enum GleanerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Browser error: {0}")]
    Engine(#[from] browser::EngineError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Authenticated mode was requested but no usable credentials exist
    #[error("Startup misconfiguration: {0}")]
    StartupMisconfiguration(String),

    #[error("Request handler failed: {0}")]
    Handler(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for docs-gleaner operations
pub type Result<T> = std::result::Result<T, GleanerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::{Config, CrawlMode, CrawlTarget};
pub use crawler::{crawl, run_all, AuthProfile, AuthProfiles};
pub use output::{ExtractedDocument, RunSummary, TargetSummary};
pub use state::{PageOutcome, SkipReason};
