//! Text cleaning applied to extracted page text
//!
//! 1. Collapse every whitespace run to a single space. This also covers the
//!    "newline followed by whitespace" rule, since no newline survives.
//! 2. Optionally strip boilerplate fragments ("Table of Contents", "Edit this
//!    page", "Share"). With line breaks gone, a fragment extends over at most
//!    three following words and stops after a `.`, `!`, `?` or `:`.
//! 3. Collapse again and trim.
//!
//! Cleaning an already cleaned string returns it unchanged.

use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+").expect("WHITESPACE_RUN: hardcoded regex is valid")
});

static BOILERPLATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:Table of Contents|Edit this page|Share)\b(?:\s+[^\s.!?:]+){0,3}[.!?:]?")
        .expect("BOILERPLATE: hardcoded regex is valid")
});

#[derive(Debug, Clone, Copy, Default)]
pub struct ContentCleaner {
    strip_boilerplate: bool,
}

impl ContentCleaner {
    pub fn new(strip_boilerplate: bool) -> Self {
        Self { strip_boilerplate }
    }

    pub fn strips_boilerplate(&self) -> bool {
        self.strip_boilerplate
    }

    pub fn clean(&self, raw: &str) -> String {
        let mut text = collapse_whitespace(raw);
        if self.strip_boilerplate {
            // Replaced with a space so neighbouring words never fuse.
            text = collapse_whitespace(&BOILERPLATE.replace_all(&text, " "));
        }
        text.trim().to_string()
    }
}

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").into_owned()
}
