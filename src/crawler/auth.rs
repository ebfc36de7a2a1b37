//! Session authentication
//!
//! Credentials are resolved once at startup from environment variables named
//! in the `[[auth]]` entries, then shared read-only by every target. Before a
//! page of an authenticated target loads, the first profile whose host key is
//! contained in the page's hostname is applied to the page session.

use crate::browser::{Cookie, EngineError, PageHandle};
use crate::config::AuthEntry;
use std::collections::BTreeMap;
use url::Url;

/// Credentials for one host key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthProfile {
    /// Raw `name=value; name2=value2` cookie string
    pub cookies: Option<String>,

    /// Extra request headers, e.g. `Authorization`
    pub headers: BTreeMap<String, String>,
}

impl AuthProfile {
    /// A profile carrying neither cookies nor headers changes nothing
    pub fn is_usable(&self) -> bool {
        self.cookies.is_some() || !self.headers.is_empty()
    }
}

/// Ordered host-key → profile table
///
/// Lookup is by substring containment against the hostname; the first match
/// in declaration order wins.
#[derive(Debug, Clone, Default)]
pub struct AuthProfiles {
    entries: Vec<(String, AuthProfile)>,
}

impl AuthProfiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a profile after every existing one
    pub fn push(&mut self, host_key: impl Into<String>, profile: AuthProfile) {
        self.entries.push((host_key.into(), profile));
    }

    /// Resolves `entries` through `lookup`, which maps a variable name to its value
    ///
    /// Empty or whitespace-only values count as unset.
    pub fn from_entries<F>(entries: &[AuthEntry], lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &Option<String>| {
            name.as_deref()
                .and_then(&lookup)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let entries = entries
            .iter()
            .map(|entry| {
                let mut headers = entry.headers.clone();
                if let Some(authorization) = read(&entry.authorization_env) {
                    headers.insert("Authorization".to_string(), authorization);
                }
                let profile = AuthProfile {
                    cookies: read(&entry.cookies_env),
                    headers,
                };
                (entry.host.clone(), profile)
            })
            .collect();

        Self { entries }
    }

    /// Resolves `entries` from the process environment
    pub fn from_env(entries: &[AuthEntry]) -> Self {
        Self::from_entries(entries, |name| std::env::var(name).ok())
    }

    /// First profile whose key is contained in `hostname`
    pub fn resolve(&self, hostname: &str) -> Option<(&str, &AuthProfile)> {
        self.entries
            .iter()
            .find(|(key, _)| hostname.contains(key.as_str()))
            .map(|(key, profile)| (key.as_str(), profile))
    }

    pub fn has_usable_profile(&self) -> bool {
        self.entries.iter().any(|(_, profile)| profile.is_usable())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Splits a raw cookie string into cookies scoped to `domain` and path `/`
///
/// Pairs are separated by `;`; name and value are split on the first `=`
/// only, so values may contain `=`. Pairs without a name are dropped.
pub fn parse_cookie_string(raw: &str, domain: &str) -> Vec<Cookie> {
    raw.split(';')
        .filter_map(|pair| {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some(Cookie {
                name: name.to_string(),
                value: value.trim().to_string(),
                domain: domain.to_string(),
                path: "/".to_string(),
            })
        })
        .collect()
}

/// What the authenticator did to a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Applied {
        host_key: String,
        cookies: usize,
        headers: usize,
    },
    /// No profile matched the hostname; the session is left untouched
    NoProfile,
}

/// Applies resolved credentials to page sessions
#[derive(Debug, Clone)]
pub struct SessionAuthenticator<'a> {
    profiles: &'a AuthProfiles,
}

impl<'a> SessionAuthenticator<'a> {
    pub fn new(profiles: &'a AuthProfiles) -> Self {
        Self { profiles }
    }

    /// Injects cookies and merges headers for `url` into `page`
    ///
    /// Must run before the page navigates. Applying the same profile twice is
    /// harmless: cookies are replaced and headers overwritten.
    pub async fn prepare(
        &self,
        page: &mut dyn PageHandle,
        url: &Url,
    ) -> Result<AuthOutcome, EngineError> {
        let Some(hostname) = url.host_str() else {
            return Ok(AuthOutcome::NoProfile);
        };
        let Some((host_key, profile)) = self.profiles.resolve(hostname) else {
            tracing::debug!("No auth profile for {}", hostname);
            return Ok(AuthOutcome::NoProfile);
        };

        let cookies = profile
            .cookies
            .as_deref()
            .map(|raw| parse_cookie_string(raw, hostname))
            .unwrap_or_default();
        if !cookies.is_empty() {
            page.add_cookies(&cookies).await?;
        }

        if !profile.headers.is_empty() {
            page.set_extra_http_headers(&profile.headers).await?;
        }

        tracing::debug!(
            "Applied auth profile '{}' to {} ({} cookies, {} headers)",
            host_key,
            hostname,
            cookies.len(),
            profile.headers.len()
        );

        Ok(AuthOutcome::Applied {
            host_key: host_key.to_string(),
            cookies: cookies.len(),
            headers: profile.headers.len(),
        })
    }
}
