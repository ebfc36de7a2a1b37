//! Shared per-target page budget
//!
//! Handlers for one target may run concurrently. Each one reserves a slot
//! before writing; a slot that is not committed is given back when the
//! reservation drops, so a failed write never consumes budget and the number
//! of written artifacts can never exceed the maximum.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Counts artifacts written for a target against its `max_pages`
#[derive(Debug)]
pub struct PageBudget {
    max: usize,
    /// Slots held by in-flight writes plus slots already written
    reserved: AtomicUsize,
    written: AtomicUsize,
}

impl PageBudget {
    pub fn new(max: usize) -> Self {
        Self {
            max,
            reserved: AtomicUsize::new(0),
            written: AtomicUsize::new(0),
        }
    }

    pub fn max(&self) -> usize {
        self.max
    }

    /// Claims one slot, or `None` once every slot is reserved or written
    pub fn try_reserve(&self) -> Option<BudgetReservation<'_>> {
        self.reserved
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |reserved| {
                (reserved < self.max).then_some(reserved + 1)
            })
            .ok()
            .map(|_| BudgetReservation {
                budget: self,
                committed: false,
            })
    }

    /// Artifacts written so far
    pub fn written(&self) -> usize {
        self.written.load(Ordering::Acquire)
    }

    /// True once `max` artifacts have been written
    pub fn is_exhausted(&self) -> bool {
        self.written() >= self.max
    }

    /// True while no slot can be reserved (written or held by in-flight writes)
    pub fn is_fully_reserved(&self) -> bool {
        self.reserved.load(Ordering::Acquire) >= self.max
    }
}

/// A claimed budget slot
///
/// Dropping it without [`commit`](BudgetReservation::commit) releases the slot.
#[derive(Debug)]
pub struct BudgetReservation<'a> {
    budget: &'a PageBudget,
    committed: bool,
}

impl BudgetReservation<'_> {
    /// Marks the slot as written and returns the new written count
    pub fn commit(mut self) -> usize {
        self.committed = true;
        self.budget.written.fetch_add(1, Ordering::AcqRel) + 1
    }
}

impl Drop for BudgetReservation<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.budget.reserved.fetch_sub(1, Ordering::AcqRel);
        }
    }
}
