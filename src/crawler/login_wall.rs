//! Login-wall detection
//!
//! A page served to an unauthenticated session usually shows a login form
//! instead of content. Such a page must not be written as an artifact.

use crate::browser::{EngineError, PageHandle};
use std::fmt;

/// One DOM signal that the page is a login prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginIndicator {
    /// `input[type="password"]`
    PasswordInput,
    /// A submit button whose text contains "Login"
    LoginSubmitButton,
    /// A link whose text contains "Sign in"
    SignInLink,
    /// An element with the `login-form` class
    LoginFormContainer,
}

/// Indicators in evaluation order
pub const LOGIN_INDICATORS: [LoginIndicator; 4] = [
    LoginIndicator::PasswordInput,
    LoginIndicator::LoginSubmitButton,
    LoginIndicator::SignInLink,
    LoginIndicator::LoginFormContainer,
];

impl LoginIndicator {
    fn selector(&self) -> &'static str {
        match self {
            Self::PasswordInput => r#"input[type="password"]"#,
            Self::LoginSubmitButton => r#"button[type="submit"]"#,
            Self::SignInLink => "a",
            Self::LoginFormContainer => ".login-form",
        }
    }

    /// Lowercase text the matched element must contain, if any
    fn required_text(&self) -> Option<&'static str> {
        match self {
            Self::LoginSubmitButton => Some("login"),
            Self::SignInLink => Some("sign in"),
            Self::PasswordInput | Self::LoginFormContainer => None,
        }
    }

    /// Checks query results for this indicator
    ///
    /// A failing query counts as "not present".
    fn matches(&self, texts: Result<Vec<String>, EngineError>) -> bool {
        let texts = match texts {
            Ok(texts) => texts,
            Err(e) => {
                tracing::debug!("Login indicator query '{}' failed: {}", self.selector(), e);
                return false;
            }
        };

        match self.required_text() {
            None => !texts.is_empty(),
            Some(needle) => texts
                .iter()
                .any(|text| text.to_lowercase().contains(needle)),
        }
    }
}

impl fmt::Display for LoginIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PasswordInput => write!(f, "password input"),
            Self::LoginSubmitButton => write!(f, "login button"),
            Self::SignInLink => write!(f, "sign-in link"),
            Self::LoginFormContainer => write!(f, "login form"),
        }
    }
}

/// First indicator present on the page, in [`LOGIN_INDICATORS`] order
pub async fn find_login_indicator(page: &dyn PageHandle) -> Option<LoginIndicator> {
    let selectors = LOGIN_INDICATORS.map(|indicator| indicator.selector());
    let results = page.query_texts_many(&selectors).await;

    LOGIN_INDICATORS
        .into_iter()
        .zip(results)
        .find_map(|(indicator, texts)| indicator.matches(texts).then_some(indicator))
}

/// True if any login indicator is present on the loaded page
pub async fn looks_unauthenticated(page: &dyn PageHandle) -> bool {
    find_login_indicator(page).await.is_some()
}
