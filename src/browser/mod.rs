//! Browser module: the boundary between the crawl pipeline and page loading
//!
//! This module contains:
//! - The `Browser`/`PageHandle` traits the pipeline is written against
//! - A static HTML engine built on reqwest + scraper
//! - An HTML document view answering selector, title, meta and link queries

mod document;
mod http;
mod traits;

#[cfg(test)]
pub(crate) mod fake;

pub use document::HtmlDocument;
pub use http::{build_http_client, HttpBrowser, HttpPage};
pub use traits::{Browser, Cookie, EngineError, LoadState, NavigationOptions, PageHandle};
