use regex::Regex;

/// A compiled URL glob
///
/// Glob syntax:
/// - `**` matches any sequence of characters, including `/`
/// - `*` matches any sequence of characters except `/`
/// - every other character matches itself literally
///
/// The compiled expression is anchored on the whole URL, so callers pass full
/// URLs (scheme and host included), not paths.
#[derive(Debug, Clone)]
pub struct GlobPattern {
    source: String,
    regex: Option<Regex>,
}

impl GlobPattern {
    /// Compiles a glob. Never fails: a pattern that cannot be compiled
    /// matches nothing.
    pub fn compile(pattern: &str) -> Self {
        let regex = match Regex::new(&glob_to_regex(pattern)) {
            Ok(regex) => Some(regex),
            Err(e) => {
                tracing::warn!("Pattern '{}' cannot be compiled, it will match nothing: {}", pattern, e);
                None
            }
        };

        Self {
            source: pattern.to_string(),
            regex,
        }
    }

    /// The original glob text
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Checks whether the full URL matches this glob
    ///
    /// # Examples
    ///
    /// ```
    /// use docs_gleaner::url::GlobPattern;
    ///
    /// let glob = GlobPattern::compile("**/learn/*");
    /// assert!(glob.is_match("https://react.dev/learn/hooks"));
    /// assert!(!glob.is_match("https://react.dev/learn/hooks/state"));
    /// ```
    pub fn is_match(&self, url: &str) -> bool {
        self.regex.as_ref().is_some_and(|re| re.is_match(url))
    }
}

/// Translates a glob into an anchored regular expression
fn glob_to_regex(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() * 2 + 2);
    let mut literal = String::new();
    let mut chars = pattern.chars().peekable();

    out.push('^');
    while let Some(c) = chars.next() {
        if c != '*' {
            literal.push(c);
            continue;
        }

        out.push_str(&regex::escape(&literal));
        literal.clear();

        if chars.peek() == Some(&'*') {
            chars.next();
            out.push_str(".*");
        } else {
            out.push_str("[^/]*");
        }
    }
    out.push_str(&regex::escape(&literal));
    out.push('$');

    out
}

/// An ordered set of compiled globs
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<GlobPattern>,
}

impl PatternSet {
    /// Compiles every glob in `patterns`
    pub fn compile<S: AsRef<str>>(patterns: &[S]) -> Self {
        Self {
            patterns: patterns
                .iter()
                .map(|p| GlobPattern::compile(p.as_ref()))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GlobPattern> {
        self.patterns.iter()
    }

    /// True if at least one pattern matches
    pub fn matches_any(&self, url: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(url))
    }
}

/// Include-side check: an empty set places no restriction
pub fn matches(url: &str, patterns: &PatternSet) -> bool {
    patterns.is_empty() || patterns.matches_any(url)
}

/// Exclude-side check: true if any pattern matches
pub fn is_excluded(url: &str, patterns: &PatternSet) -> bool {
    patterns.matches_any(url)
}
