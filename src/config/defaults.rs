//! Built-in configuration used when no file is given

use crate::config::types::{AuthEntry, Config, CrawlTarget, CrawlerSettings, UserAgentConfig};
use std::collections::BTreeMap;

/// Returns the built-in targets and credential sources
///
/// Plain mode crawls three public documentation sites. Authenticated mode
/// has a Confluence template whose start URL must be edited before it runs.
pub fn builtin_config() -> Config {
    Config {
        crawler: CrawlerSettings::default(),
        user_agent: UserAgentConfig::default(),
        targets: vec![
            target(
                "React Documentation",
                &["https://react.dev/learn"],
                &["**/learn", "**/learn/**", "**/reference/**"],
                &["**/blog/**", "**/community/**"],
                50,
            ),
            target(
                "TypeScript Handbook",
                &["https://www.typescriptlang.org/docs/"],
                &["**/docs/**"],
                &["**/playground/**", "**/download/**"],
                40,
            ),
            target(
                "MDN Web Docs",
                &["https://developer.mozilla.org/en-US/docs/Web/JavaScript"],
                &[
                    "**/docs/Web/JavaScript",
                    "**/docs/Web/JavaScript/**",
                    "**/docs/Web/API/**",
                ],
                &["**/docs/Web/JavaScript/Guide/Introduction/**"],
                30,
            ),
            CrawlTarget {
                requires_auth: true,
                ..target(
                    "Confluence Documentation",
                    &["https://yourcompany.atlassian.net/wiki/spaces/DOCS/overview"],
                    &["**/wiki/**", "**/spaces/**"],
                    &["**/labels/**", "**/people/**"],
                    25,
                )
            },
        ],
        auth: vec![
            auth("atlassian.net", "CONFLUENCE_COOKIES", "CONFLUENCE_AUTH"),
            auth("atlassian.com", "JIRA_COOKIES", "JIRA_AUTH"),
        ],
    }
}

fn target(
    name: &str,
    start_urls: &[&str],
    include: &[&str],
    exclude: &[&str],
    max_pages: usize,
) -> CrawlTarget {
    CrawlTarget {
        include: strings(include),
        exclude: strings(exclude),
        ..CrawlTarget::new(name, strings(start_urls), max_pages)
    }
}

fn auth(host: &str, cookies_env: &str, authorization_env: &str) -> AuthEntry {
    AuthEntry {
        host: host.to_string(),
        cookies_env: Some(cookies_env.to_string()),
        authorization_env: Some(authorization_env.to_string()),
        headers: BTreeMap::new(),
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
