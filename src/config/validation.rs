use crate::config::types::{AuthEntry, Config, CrawlTarget, CrawlerSettings, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_settings(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    for target in &config.targets {
        validate_target(target)?;
    }
    validate_auth_entries(&config.auth)?;
    Ok(())
}

/// Validates crawler settings
fn validate_crawler_settings(settings: &CrawlerSettings) -> Result<(), ConfigError> {
    if settings.max_concurrent_pages < 1 || settings.max_concurrent_pages > 64 {
        return Err(ConfigError::Validation(format!(
            "max-concurrent-pages must be between 1 and 64, got {}",
            settings.max_concurrent_pages
        )));
    }

    if settings.navigation_timeout_ms < 1000 {
        return Err(ConfigError::Validation(format!(
            "navigation-timeout-ms must be >= 1000ms, got {}ms",
            settings.navigation_timeout_ms
        )));
    }

    if settings.output_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output-dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters, hyphens and underscores, got '{}'",
            config.crawler_name
        )));
    }

    if let Some(contact) = &config.contact_url {
        Url::parse(contact)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;
    }

    Ok(())
}

/// Validates one crawl target
///
/// A target without start URLs is valid; crawling it does nothing.
fn validate_target(target: &CrawlTarget) -> Result<(), ConfigError> {
    if target.name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "target name cannot be empty".to_string(),
        ));
    }

    if target.max_pages == 0 {
        return Err(ConfigError::Validation(format!(
            "Target '{}' must have max-pages > 0",
            target.name
        )));
    }

    if target.max_requests == Some(0) {
        return Err(ConfigError::Validation(format!(
            "Target '{}' must have max-requests > 0 when set",
            target.name
        )));
    }

    for start_url in &target.start_urls {
        let url = Url::parse(start_url).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid start URL '{}': {}", start_url, e))
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Validation(format!(
                "Start URL '{}' must use HTTP or HTTPS",
                start_url
            )));
        }
    }

    for pattern in target.include.iter().chain(&target.exclude) {
        if pattern.trim().is_empty() {
            return Err(ConfigError::InvalidPattern(format!(
                "Target '{}' has an empty include/exclude pattern",
                target.name
            )));
        }
    }

    if let Some(selectors) = &target.content_selectors {
        if selectors.is_empty() {
            return Err(ConfigError::Validation(format!(
                "Target '{}' has an empty content-selectors list",
                target.name
            )));
        }
    }

    Ok(())
}

/// Validates auth entries
fn validate_auth_entries(entries: &[AuthEntry]) -> Result<(), ConfigError> {
    for entry in entries {
        if entry.host.is_empty() || entry.host.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidPattern(format!(
                "Auth host '{}' must be non-empty and contain no whitespace",
                entry.host
            )));
        }
    }
    Ok(())
}
