/// Per-URL outcomes of the crawl pipeline
///
/// Every candidate URL handed to a target ends in exactly one of these.
use crate::url::FilterVerdict;
use crate::GleanerError;
use std::fmt;
use std::path::PathBuf;

/// Why a candidate URL produced no artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The URL failed the include/exclude policy
    FilteredOut(FilterVerdict),

    /// The target already wrote `max_pages` artifacts
    BudgetExhausted,

    /// The loaded page shows a login form instead of content
    AuthenticationExpired,

    /// No content selector yielded enough text
    InsufficientContent { observed_chars: usize },

    /// The engine could not load the page (timeout, network, HTTP status)
    NavigationFailure(String),
}

impl SkipReason {
    /// Short stable label used for summary counters
    pub fn label(&self) -> &'static str {
        match self {
            Self::FilteredOut(_) => "filtered_out",
            Self::BudgetExhausted => "budget_exhausted",
            Self::AuthenticationExpired => "authentication_expired",
            Self::InsufficientContent { .. } => "insufficient_content",
            Self::NavigationFailure(_) => "navigation_failure",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FilteredOut(verdict) => write!(f, "filtered out ({})", verdict),
            Self::BudgetExhausted => write!(f, "page budget exhausted"),
            Self::AuthenticationExpired => {
                write!(f, "login page detected, authentication may have expired")
            }
            Self::InsufficientContent { observed_chars } => {
                write!(f, "insufficient content ({} chars)", observed_chars)
            }
            Self::NavigationFailure(message) => write!(f, "navigation failed: {}", message),
        }
    }
}

/// Terminal result of processing one candidate URL
#[derive(Debug)]
pub enum PageOutcome {
    /// An artifact was written at this path
    Written(PathBuf),

    /// The page was skipped for an expected reason
    Skipped(SkipReason),

    /// An unexpected error ended processing of this URL only
    Abandoned(GleanerError),
}

impl PageOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written(_))
    }

    pub fn skip_reason(&self) -> Option<&SkipReason> {
        match self {
            Self::Skipped(reason) => Some(reason),
            _ => None,
        }
    }
}
