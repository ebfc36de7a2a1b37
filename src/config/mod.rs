//! Configuration module for docs-gleaner
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, and provides the built-in targets used when no file is given.
//!
//! # Example
//!
//! ```no_run
//! use docs_gleaner::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("gleaner.toml")).unwrap();
//! println!("Writing artifacts to {}", config.crawler.output_dir.display());
//! ```

mod defaults;
mod parser;
mod types;
mod validation;

pub use defaults::builtin_config;
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use types::{
    AuthEntry, Config, CrawlMode, CrawlTarget, CrawlerSettings, UserAgentConfig,
    PLACEHOLDER_MARKER,
};
pub use validation::validate;
