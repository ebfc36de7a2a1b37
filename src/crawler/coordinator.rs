//! Crawl orchestration for a single target
//!
//! This module drives one target end-to-end:
//! - Seeding the request queue with the target's start URLs
//! - Dispatching up to `max-concurrent-pages` request handlers at once
//! - Running each candidate URL through filter, auth, navigation, login-wall
//!   check, extraction, cleaning and writing
//! - Feeding discovered links back into the queue
//! - Stopping once the page budget is spent
//!
//! Every candidate ends in a [`PageOutcome`]; nothing that happens to one URL
//! aborts the target.

use crate::browser::{Browser, EngineError, NavigationOptions, PageHandle};
use crate::config::{CrawlTarget, CrawlerSettings};
use crate::crawler::auth::{AuthProfiles, SessionAuthenticator};
use crate::crawler::clean::ContentCleaner;
use crate::crawler::extract::{extract_metadata, ContentExtractor, InsufficientContent};
use crate::crawler::login_wall::find_login_indicator;
use crate::crawler::queue::RequestQueue;
use crate::output::{ArtifactWriter, ExtractedDocument, TargetSummary};
use crate::state::{PageBudget, PageOutcome, SkipReason};
use crate::url::{normalize_url, UrlFilter};
use crate::GleanerError;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use url::Url;

/// Crawls one target
pub struct TargetCrawler {
    handler: Arc<RequestHandler>,
    max_concurrent_pages: usize,
}

/// What one handler invocation produced
struct Handled {
    outcome: PageOutcome,
    /// Eligible links discovered on the page, to be enqueued
    links: Vec<Url>,
}

impl From<PageOutcome> for Handled {
    fn from(outcome: PageOutcome) -> Self {
        Self {
            outcome,
            links: Vec::new(),
        }
    }
}

/// Shared, read-only state of every handler of a target
///
/// The page budget is the only thing handlers mutate, and it is atomic.
struct RequestHandler {
    target: CrawlTarget,
    filter: UrlFilter,
    extractor: ContentExtractor,
    cleaner: ContentCleaner,
    budget: PageBudget,
    navigation: NavigationOptions,
    follow_links: bool,
    /// Hosts of the start URLs; discovered links must stay on them
    hosts: HashSet<String>,
    browser: Arc<dyn Browser>,
    writer: Arc<ArtifactWriter>,
    profiles: Arc<AuthProfiles>,
}

impl TargetCrawler {
    pub fn new(
        target: CrawlTarget,
        settings: &CrawlerSettings,
        browser: Arc<dyn Browser>,
        writer: Arc<ArtifactWriter>,
        profiles: Arc<AuthProfiles>,
    ) -> Self {
        let hosts = target
            .start_urls
            .iter()
            .filter_map(|u| Url::parse(u).ok())
            .filter_map(|u| u.host_str().map(str::to_string))
            .collect();

        let handler = RequestHandler {
            filter: UrlFilter::new(target.include.as_slice(), target.exclude.as_slice()),
            extractor: ContentExtractor::for_target(&target),
            cleaner: ContentCleaner::new(target.strips_boilerplate()),
            budget: PageBudget::new(target.max_pages),
            navigation: NavigationOptions::with_timeout(settings.navigation_timeout()),
            follow_links: settings.follow_links,
            hosts,
            browser,
            writer,
            profiles,
            target,
        };

        Self {
            handler: Arc::new(handler),
            max_concurrent_pages: settings.max_concurrent_pages.max(1),
        }
    }

    /// Crawls until the queue is drained or the page budget is spent
    pub async fn run(self) -> TargetSummary {
        let started = Instant::now();
        let target = &self.handler.target;
        let mut summary = TargetSummary::new(&target.name, target.max_pages);

        let mut queue = RequestQueue::new(target.request_budget());
        for start_url in &target.start_urls {
            match normalize_url(start_url) {
                Ok(url) => {
                    queue.enqueue(url);
                }
                Err(e) => tracing::warn!("Ignoring start URL {}: {}", start_url, e),
            }
        }

        let mut tasks: JoinSet<(Url, Handled)> = JoinSet::new();

        loop {
            while tasks.len() < self.max_concurrent_pages && !self.handler.budget.is_exhausted() {
                let Some(url) = queue.next_request() else {
                    break;
                };
                let handler = Arc::clone(&self.handler);
                tasks.spawn(async move {
                    let handled = handler.handle_request(&url).await;
                    (url, handled)
                });
            }

            let Some(joined) = tasks.join_next().await else {
                break;
            };

            match joined {
                Ok((url, handled)) => {
                    if let PageOutcome::Abandoned(e) = &handled.outcome {
                        tracing::error!("Error processing {}: {}", url, e);
                    }
                    summary.record(&handled.outcome);
                    for link in handled.links {
                        if queue.enqueue(link.clone()) {
                            tracing::debug!("Enqueued {}", link);
                        }
                    }
                }
                Err(e) => {
                    tracing::error!("Request handler task failed: {}", e);
                    summary.record(&PageOutcome::Abandoned(GleanerError::Handler(
                        e.to_string(),
                    )));
                }
            }
        }

        if self.handler.budget.is_exhausted() && queue.pending() > 0 {
            tracing::info!(
                "{}: page budget of {} reached, {} queued URL(s) not processed",
                target.name,
                target.max_pages,
                queue.pending()
            );
        } else if queue.is_budget_spent() && queue.pending() > 0 {
            tracing::info!(
                "{}: request budget of {} reached, {} queued URL(s) not processed",
                target.name,
                target.request_budget(),
                queue.pending()
            );
        }

        tracing::info!(
            "Finished crawling {} ({} pages)",
            target.name,
            self.handler.budget.written()
        );

        summary.elapsed = started.elapsed();
        summary
    }
}

impl RequestHandler {
    /// Runs one candidate URL to a terminal outcome
    async fn handle_request(&self, url: &Url) -> Handled {
        let verdict = self.filter.verdict(url.as_str());
        if !verdict.is_eligible() {
            tracing::info!("Skipping {} ({})", url, verdict);
            return PageOutcome::Skipped(SkipReason::FilteredOut(verdict)).into();
        }

        if self.budget.is_exhausted() {
            return PageOutcome::Skipped(SkipReason::BudgetExhausted).into();
        }

        match self.process(url).await {
            Ok(handled) => handled,
            Err(e) => PageOutcome::Abandoned(e).into(),
        }
    }

    async fn process(&self, url: &Url) -> Result<Handled, GleanerError> {
        tracing::info!("Crawling: {}", url);
        let mut page = self.browser.new_page().await?;

        if self.target.requires_auth {
            // A failed injection is not fatal; the login-wall check catches the result
            let authenticator = SessionAuthenticator::new(&self.profiles);
            if let Err(e) = authenticator.prepare(page.as_mut(), url).await {
                tracing::warn!("Could not apply credentials for {}: {}", url, e);
            }
        }

        if let Err(e) = page.goto(url, &self.navigation).await {
            return Ok(self.on_navigation_failed(url, &e).into());
        }

        if self.target.detects_login_wall() {
            if let Some(indicator) = find_login_indicator(page.as_ref()).await {
                tracing::warn!(
                    "{} requires login ({}) - skipping (authentication may have expired)",
                    url,
                    indicator
                );
                return Ok(PageOutcome::Skipped(SkipReason::AuthenticationExpired).into());
            }
        }

        let links = if self.follow_links {
            self.collect_links(page.as_ref()).await
        } else {
            Vec::new()
        };

        let extraction = match self.extractor.extract(page.as_ref()).await {
            Ok(extraction) => extraction,
            Err(InsufficientContent { observed_chars }) => {
                tracing::warn!(
                    "Skipping {} (insufficient content: {} chars)",
                    url,
                    observed_chars
                );
                return Ok(Handled {
                    outcome: PageOutcome::Skipped(SkipReason::InsufficientContent {
                        observed_chars,
                    }),
                    links,
                });
            }
        };

        let body = self.cleaner.clean(&extraction.text);
        if body.is_empty() {
            tracing::warn!("Skipping {} (no content left after cleaning)", url);
            return Ok(Handled {
                outcome: PageOutcome::Skipped(SkipReason::InsufficientContent {
                    observed_chars: 0,
                }),
                links,
            });
        }

        let metadata = extract_metadata(page.as_ref()).await;

        let Some(slot) = self.budget.try_reserve() else {
            return Ok(Handled {
                outcome: PageOutcome::Skipped(SkipReason::BudgetExhausted),
                links,
            });
        };

        let document = ExtractedDocument {
            title: extraction.title,
            source_url: url.clone(),
            target_name: self.target.name.clone(),
            crawled_at: Utc::now(),
            metadata,
            body,
        };
        let path = self.writer.write(&self.target, url, &document)?;
        let written = slot.commit();

        tracing::info!(
            "Saved ({}/{}): {}",
            written,
            self.target.max_pages,
            path.file_name()
                .map(|name| name.to_string_lossy())
                .unwrap_or_default()
        );

        Ok(Handled {
            outcome: PageOutcome::Written(path),
            links,
        })
    }

    /// Error hook for pages the engine could not load
    fn on_navigation_failed(&self, url: &Url, error: &EngineError) -> PageOutcome {
        tracing::error!("Failed to crawl {}: {}", url, error);
        PageOutcome::Skipped(SkipReason::NavigationFailure(error.to_string()))
    }

    /// Links on the page that stay on a start host and pass the target's filter
    async fn collect_links(&self, page: &dyn PageHandle) -> Vec<Url> {
        let links = match page.links().await {
            Ok(links) => links,
            Err(e) => {
                tracing::debug!("Could not read links: {}", e);
                return Vec::new();
            }
        };

        links
            .into_iter()
            .filter_map(|link| normalize_url(link.as_str()).ok())
            .filter(|link| {
                link.host_str()
                    .is_some_and(|host| self.hosts.contains(host))
            })
            .filter(|link| self.filter.is_eligible(link.as_str()))
            .collect()
    }
}
