//! Run statistics
//!
//! Purely observational counters collected while targets are crawled, and the
//! end-of-run report printed to stdout.

use crate::config::CrawlMode;
use crate::state::PageOutcome;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// Counters for one crawled target
#[derive(Debug, Clone, Default)]
pub struct TargetSummary {
    pub target_name: String,
    pub max_pages: usize,

    /// Artifacts written
    pub written: usize,

    /// Skipped URLs keyed by [`SkipReason::label`](crate::state::SkipReason::label)
    pub skipped: BTreeMap<&'static str, usize>,

    /// URLs dropped because of an unexpected error
    pub abandoned: usize,

    pub elapsed: Duration,
}

impl TargetSummary {
    pub fn new(target_name: impl Into<String>, max_pages: usize) -> Self {
        Self {
            target_name: target_name.into(),
            max_pages,
            ..Self::default()
        }
    }

    /// Counts one finished URL
    pub fn record(&mut self, outcome: &PageOutcome) {
        match outcome {
            PageOutcome::Written(_) => self.written += 1,
            PageOutcome::Skipped(reason) => *self.skipped.entry(reason.label()).or_insert(0) += 1,
            PageOutcome::Abandoned(_) => self.abandoned += 1,
        }
    }

    pub fn total_skipped(&self) -> usize {
        self.skipped.values().sum()
    }

    /// URLs that reached a terminal outcome
    pub fn processed(&self) -> usize {
        self.written + self.total_skipped() + self.abandoned
    }
}

/// Aggregate over every target of a run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub targets: Vec<TargetSummary>,

    /// Targets not crawled, with the reason
    pub skipped_targets: Vec<(String, String)>,

    pub output_dir: PathBuf,

    /// `.txt` files present in the output directory after the run
    pub artifacts_on_disk: usize,

    pub elapsed: Duration,
}

impl RunSummary {
    /// Artifacts written during this run
    pub fn total_written(&self) -> usize {
        self.targets.iter().map(|t| t.written).sum()
    }
}

/// Prints the end-of-run report to stdout
///
/// A run that wrote nothing gets a list of likely causes instead of failing.
pub fn print_summary(summary: &RunSummary, mode: CrawlMode) {
    println!();
    println!("=== Crawl Summary ===");
    println!();

    for target in &summary.targets {
        println!(
            "  {}: {}/{} pages written in {:.1}s",
            target.target_name,
            target.written,
            target.max_pages,
            target.elapsed.as_secs_f64()
        );
        for (label, count) in &target.skipped {
            println!("    skipped ({}): {}", label, count);
        }
        if target.abandoned > 0 {
            println!("    abandoned after errors: {}", target.abandoned);
        }
    }

    for (name, reason) in &summary.skipped_targets {
        println!("  {}: not crawled ({})", name, reason);
    }

    println!();
    println!("Pages written this run: {}", summary.total_written());
    println!(
        "Artifacts in {}: {}",
        summary.output_dir.display(),
        summary.artifacts_on_disk
    );
    println!("Total time: {:.1}s", summary.elapsed.as_secs_f64());

    if summary.total_written() == 0 {
        println!();
        println!("WARNING: no pages were written. Likely causes:");
        for cause in zero_artifact_causes(mode) {
            println!("  - {}", cause);
        }
        println!();
        println!("{}", zero_artifact_hint(mode));
        return;
    }

    println!();
    println!("Next steps:");
    println!(
        "  1. Bulk upload every .txt file from {} into your knowledge base",
        summary.output_dir.display()
    );
    println!("  2. Wait for processing to complete");
    match mode {
        CrawlMode::Plain => println!("  3. Start asking questions"),
        CrawlMode::Authenticated => {
            println!("  3. Test with questions about your internal documentation")
        }
    }
}

/// Likely reasons a run in `mode` wrote no artifacts
pub fn zero_artifact_causes(mode: CrawlMode) -> &'static [&'static str] {
    match mode {
        CrawlMode::Plain => &[
            "Network connectivity issues",
            "Sites blocking automated requests",
            "Include/exclude patterns not matching the start URLs",
            "Content extraction failures",
        ],
        CrawlMode::Authenticated => &[
            "Authentication tokens expired",
            "Invalid start URLs in the authenticated targets",
            "Network connectivity issues",
            "Sites blocking automated requests",
        ],
    }
}

fn zero_artifact_hint(mode: CrawlMode) -> &'static str {
    match mode {
        CrawlMode::Plain => "Try adjusting the [[target]] entries of your configuration",
        CrawlMode::Authenticated => "Try refreshing your authentication cookies and tokens",
    }
}
