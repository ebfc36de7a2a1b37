//! Per-target request queue
//!
//! FIFO of candidate URLs, de-duplicated by normalized key, that hands out at
//! most `max_requests` URLs over its lifetime.

use crate::url::dedup_key;
use std::collections::{HashSet, VecDeque};
use url::Url;

#[derive(Debug)]
pub struct RequestQueue {
    pending: VecDeque<Url>,
    seen: HashSet<String>,
    max_requests: usize,
    handed_out: usize,
}

impl RequestQueue {
    pub fn new(max_requests: usize) -> Self {
        Self {
            pending: VecDeque::new(),
            seen: HashSet::new(),
            max_requests,
            handed_out: 0,
        }
    }

    /// Adds `url` unless an equivalent URL was enqueued before
    ///
    /// Returns true if the URL was added.
    pub fn enqueue(&mut self, url: Url) -> bool {
        if !self.seen.insert(dedup_key(&url)) {
            return false;
        }
        self.pending.push_back(url);
        true
    }

    /// Next URL to process, or `None` when empty or the request budget is spent
    pub fn next_request(&mut self) -> Option<Url> {
        if self.handed_out >= self.max_requests {
            return None;
        }
        let url = self.pending.pop_front()?;
        self.handed_out += 1;
        Some(url)
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn handed_out(&self) -> usize {
        self.handed_out
    }

    pub fn is_budget_spent(&self) -> bool {
        self.handed_out >= self.max_requests
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_fifo_order() {
        let mut queue = RequestQueue::new(10);
        queue.enqueue(url("https://x.test/a"));
        queue.enqueue(url("https://x.test/b"));

        assert_eq!(queue.next_request().unwrap().path(), "/a");
        assert_eq!(queue.next_request().unwrap().path(), "/b");
        assert!(queue.next_request().is_none());
    }

    #[test]
    fn test_deduplicates_equivalent_urls() {
        let mut queue = RequestQueue::new(10);
        assert!(queue.enqueue(url("https://x.test/docs")));
        assert!(!queue.enqueue(url("https://x.test/docs/")));
        assert!(queue.enqueue(url("https://x.test/docs?page=2")));
        assert_eq!(queue.pending(), 2);
    }

    #[test]
    fn test_handed_out_urls_are_not_requeued() {
        let mut queue = RequestQueue::new(10);
        queue.enqueue(url("https://x.test/a"));
        queue.next_request();
        assert!(!queue.enqueue(url("https://x.test/a")));
    }

    #[test]
    fn test_request_budget() {
        let mut queue = RequestQueue::new(2);
        for path in ["a", "b", "c"] {
            queue.enqueue(url(&format!("https://x.test/{}", path)));
        }

        assert!(queue.next_request().is_some());
        assert!(queue.next_request().is_some());
        assert!(queue.is_budget_spent());
        assert!(queue.next_request().is_none());
        assert_eq!(queue.pending(), 1);
        assert_eq!(queue.handed_out(), 2);
    }
}
