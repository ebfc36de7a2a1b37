//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageOutcome`/`SkipReason`: how processing of one candidate URL ended
//! - `PageBudget`: the per-target written-page counter shared by concurrent handlers

mod budget;
mod page_outcome;

pub use budget::{BudgetReservation, PageBudget};
pub use page_outcome::{PageOutcome, SkipReason};
