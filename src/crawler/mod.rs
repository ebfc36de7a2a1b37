//! Crawler module: the crawl-and-extract pipeline
//!
//! This module contains:
//! - Session authentication from per-host credential profiles
//! - Login-wall detection
//! - Content extraction over ordered selector candidates
//! - Text cleaning
//! - The per-target request queue and orchestration
//! - The top-level driver that runs every selected target in order

pub mod auth;
pub mod clean;
mod coordinator;
pub mod extract;
pub mod login_wall;
mod queue;

pub use auth::{parse_cookie_string, AuthOutcome, AuthProfile, AuthProfiles, SessionAuthenticator};
pub use clean::ContentCleaner;
pub use coordinator::TargetCrawler;
pub use extract::{ContentExtractor, Extraction, InsufficientContent, MIN_CONTENT_CHARS};
pub use login_wall::{find_login_indicator, looks_unauthenticated, LoginIndicator};
pub use queue::RequestQueue;

use crate::browser::{Browser, HttpBrowser};
use crate::config::{Config, CrawlMode, PLACEHOLDER_MARKER};
use crate::output::{count_artifacts, prepare_output_dir, ArtifactWriter, RunSummary};
use crate::GleanerError;
use std::sync::Arc;
use std::time::Instant;

/// Runs every target selected by `mode`, one after another
///
/// # Arguments
///
/// * `config` - Targets and crawler settings
/// * `mode` - Which targets to run
/// * `browser` - Engine used to load pages
/// * `profiles` - Credentials resolved at startup
/// * `clear_output` - Remove leftover artifacts before crawling
///
/// # Returns
///
/// * `Ok(RunSummary)` - All selected targets ran; per-page failures are counted, not returned
/// * `Err(GleanerError::StartupMisconfiguration)` - Authenticated mode without usable credentials
/// * `Err(GleanerError::Io)` - The output directory could not be prepared
pub async fn run_all(
    config: &Config,
    mode: CrawlMode,
    browser: Arc<dyn Browser>,
    profiles: Arc<AuthProfiles>,
    clear_output: bool,
) -> Result<RunSummary, GleanerError> {
    if mode == CrawlMode::Authenticated && !profiles.has_usable_profile() {
        return Err(GleanerError::StartupMisconfiguration(
            "No authentication configuration found in environment variables".to_string(),
        ));
    }

    let started = Instant::now();
    let output_dir = config.crawler.output_dir.clone();
    prepare_output_dir(&output_dir, clear_output)?;
    let writer = Arc::new(ArtifactWriter::new(output_dir.clone()));

    let mut summary = RunSummary {
        output_dir: output_dir.clone(),
        ..RunSummary::default()
    };

    for target in config.targets.iter().filter(|t| mode.selects(t)) {
        if target.is_placeholder() {
            tracing::warn!(
                "Skipping {} - please update start-urls with your actual URLs",
                target.name
            );
            summary.skipped_targets.push((
                target.name.clone(),
                format!("start URLs still contain '{}'", PLACEHOLDER_MARKER),
            ));
            continue;
        }

        tracing::info!("Crawling {} (max {} pages)", target.name, target.max_pages);
        let crawler = TargetCrawler::new(
            target.clone(),
            &config.crawler,
            Arc::clone(&browser),
            Arc::clone(&writer),
            Arc::clone(&profiles),
        );
        let target_summary = crawler.run().await;
        tracing::info!(
            "{} completed in {:.1}s",
            target.name,
            target_summary.elapsed.as_secs_f64()
        );
        summary.targets.push(target_summary);
    }

    summary.artifacts_on_disk = match count_artifacts(&output_dir) {
        Ok(count) => count,
        Err(e) => {
            tracing::warn!("Could not count files in {}: {}", output_dir.display(), e);
            summary.total_written()
        }
    };
    summary.elapsed = started.elapsed();

    Ok(summary)
}

/// Runs every target selected by `mode` with the static HTTP engine
pub async fn crawl(
    config: &Config,
    mode: CrawlMode,
    profiles: Arc<AuthProfiles>,
    clear_output: bool,
) -> Result<RunSummary, GleanerError> {
    let browser = HttpBrowser::from_config(&config.user_agent)?;
    run_all(config, mode, Arc::new(browser), profiles, clear_output).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::fake::FakeBrowser;
    use crate::config::CrawlTarget;
    use tempfile::TempDir;

    fn page() -> String {
        format!("<main>{}</main>", "word ".repeat(40))
    }

    fn config(dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.crawler.output_dir = dir.path().join("out");
        config.targets = vec![
            CrawlTarget::new("Public", vec!["https://public.test/a".to_string()], 1),
            CrawlTarget {
                requires_auth: true,
                ..CrawlTarget::new("Private", vec!["https://wiki.test/p".to_string()], 1)
            },
            CrawlTarget {
                requires_auth: true,
                ..CrawlTarget::new(
                    "Template",
                    vec!["https://yourcompany.atlassian.net/wiki".to_string()],
                    1,
                )
            },
        ];
        config
    }

    fn browser() -> Arc<FakeBrowser> {
        Arc::new(
            FakeBrowser::new()
                .with_page("https://public.test/a", page())
                .with_page("https://wiki.test/p", page()),
        )
    }

    fn usable_profiles() -> Arc<AuthProfiles> {
        let mut profiles = AuthProfiles::new();
        profiles.push(
            "wiki.test",
            AuthProfile {
                cookies: Some("session=1".to_string()),
                ..AuthProfile::default()
            },
        );
        Arc::new(profiles)
    }

    #[tokio::test]
    async fn test_authenticated_mode_requires_profiles() {
        let dir = TempDir::new().unwrap();
        let result = run_all(
            &config(&dir),
            CrawlMode::Authenticated,
            browser(),
            Arc::new(AuthProfiles::new()),
            false,
        )
        .await;

        assert!(matches!(
            result,
            Err(GleanerError::StartupMisconfiguration(_))
        ));
        assert!(!dir.path().join("out").exists());
    }

    #[tokio::test]
    async fn test_plain_mode_runs_only_public_targets() {
        let dir = TempDir::new().unwrap();
        let browser = browser();

        let summary = run_all(
            &config(&dir),
            CrawlMode::Plain,
            browser.clone(),
            Arc::new(AuthProfiles::new()),
            true,
        )
        .await
        .unwrap();

        assert_eq!(summary.targets.len(), 1);
        assert_eq!(summary.targets[0].target_name, "Public");
        assert_eq!(summary.total_written(), 1);
        assert_eq!(summary.artifacts_on_disk, 1);
        assert_eq!(browser.navigations().len(), 1);
    }

    #[tokio::test]
    async fn test_authenticated_mode_skips_placeholder_targets() {
        let dir = TempDir::new().unwrap();

        let summary = run_all(
            &config(&dir),
            CrawlMode::Authenticated,
            browser(),
            usable_profiles(),
            false,
        )
        .await
        .unwrap();

        assert_eq!(summary.targets.len(), 1);
        assert_eq!(summary.targets[0].target_name, "Private");
        assert_eq!(summary.targets[0].written, 1);
        assert_eq!(summary.skipped_targets.len(), 1);
        assert_eq!(summary.skipped_targets[0].0, "Template");
    }

    #[tokio::test]
    async fn test_clear_output_removes_leftovers() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);
        std::fs::create_dir_all(&config.crawler.output_dir).unwrap();
        std::fs::write(config.crawler.output_dir.join("old.txt"), "stale").unwrap();

        let summary = run_all(
            &config,
            CrawlMode::Plain,
            browser(),
            Arc::new(AuthProfiles::new()),
            true,
        )
        .await
        .unwrap();
        assert_eq!(summary.artifacts_on_disk, 1);
        assert!(!config.crawler.output_dir.join("old.txt").exists());
    }

    #[tokio::test]
    async fn test_keep_existing_counts_leftovers() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);
        std::fs::create_dir_all(&config.crawler.output_dir).unwrap();
        std::fs::write(config.crawler.output_dir.join("old.txt"), "stale").unwrap();

        let summary = run_all(
            &config,
            CrawlMode::Plain,
            browser(),
            Arc::new(AuthProfiles::new()),
            false,
        )
        .await
        .unwrap();
        assert_eq!(summary.total_written(), 1);
        assert_eq!(summary.artifacts_on_disk, 2);
    }
}
