//! URL handling module for docs-gleaner
//!
//! This module provides glob-based URL filtering for crawl targets and the
//! URL normalization used to de-duplicate the request queue.

mod normalize;
mod pattern;

pub use normalize::{dedup_key, normalize_url};
pub use pattern::{is_excluded, matches, GlobPattern, PatternSet};

use std::fmt;

/// Result of checking a URL against a target's include/exclude patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterVerdict {
    /// URL may be crawled
    Eligible,
    /// URL matched at least one exclude pattern
    Excluded,
    /// Include patterns are present and none of them matched
    NotIncluded,
}

impl FilterVerdict {
    /// Returns true if the URL passed the filter
    pub fn is_eligible(&self) -> bool {
        matches!(self, Self::Eligible)
    }
}

impl fmt::Display for FilterVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eligible => write!(f, "eligible"),
            Self::Excluded => write!(f, "excluded"),
            Self::NotIncluded => write!(f, "doesn't match patterns"),
        }
    }
}

/// Include/exclude policy of a single crawl target, compiled once per target
///
/// A URL is eligible iff it is not excluded and either the include set is
/// empty or at least one include pattern matches. Exclusion always wins.
#[derive(Debug, Clone, Default)]
pub struct UrlFilter {
    include: PatternSet,
    exclude: PatternSet,
}

impl UrlFilter {
    /// Compiles the include and exclude globs of a target
    pub fn new<S: AsRef<str>>(include: &[S], exclude: &[S]) -> Self {
        Self {
            include: PatternSet::compile(include),
            exclude: PatternSet::compile(exclude),
        }
    }

    /// Classifies a URL against this filter
    ///
    /// # Examples
    ///
    /// ```
    /// use docs_gleaner::url::{FilterVerdict, UrlFilter};
    ///
    /// let filter = UrlFilter::new(&["**/docs/**"], &["**/docs/legacy/**"]);
    /// assert_eq!(filter.verdict("https://x.test/docs/intro"), FilterVerdict::Eligible);
    /// assert_eq!(filter.verdict("https://x.test/docs/legacy/old"), FilterVerdict::Excluded);
    /// assert_eq!(filter.verdict("https://x.test/blog/post"), FilterVerdict::NotIncluded);
    /// ```
    pub fn verdict(&self, url: &str) -> FilterVerdict {
        if is_excluded(url, &self.exclude) {
            FilterVerdict::Excluded
        } else if matches(url, &self.include) {
            FilterVerdict::Eligible
        } else {
            FilterVerdict::NotIncluded
        }
    }

    /// Shorthand for `verdict(url).is_eligible()`
    pub fn is_eligible(&self, url: &str) -> bool {
        self.verdict(url).is_eligible()
    }
}
