use crate::UrlError;
use url::Url;

/// Tracking query parameters ignored when comparing URLs
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "fbclid",
    "gclid",
    "mc_eid",
];

/// Normalizes a URL before it enters the request queue
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Accept only `http` and `https`
/// 3. Require a host
/// 4. Remove the fragment
///
/// The query string and path are left exactly as given: this is the URL that
/// is fetched and recorded in the artifact header. Equivalence between
/// spellings of the same page is decided by [`dedup_key`].
///
/// # Examples
///
/// ```
/// use docs_gleaner::url::normalize_url;
///
/// let url = normalize_url("https://Docs.Example.com/guide?utm_source=x&b=2&a=1#intro").unwrap();
/// assert_eq!(url.as_str(), "https://docs.example.com/guide?utm_source=x&b=2&a=1");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);
    Ok(url)
}

/// Key used to detect URLs already seen by a request queue
///
/// Two URLs share a key when they differ only by:
/// - a trailing slash (except on the root path)
/// - tracking query parameters (`utm_*`, `fbclid`, ...)
/// - the order of the remaining query parameters
/// - the fragment
pub fn dedup_key(url: &Url) -> String {
    let path = url.path();
    let path = if path.len() > 1 {
        path.trim_end_matches('/')
    } else {
        path
    };

    let mut key = format!(
        "{}://{}{}{}",
        url.scheme(),
        url.host_str().unwrap_or_default(),
        url.port().map(|p| format!(":{}", p)).unwrap_or_default(),
        path
    );

    if url.query().is_some() {
        let mut params: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| !TRACKING_PARAMS.contains(&key.as_ref()))
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        params.sort();

        if !params.is_empty() {
            let query = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(params)
                .finish();
            key.push('?');
            key.push_str(&query);
        }
    }
    key
}
