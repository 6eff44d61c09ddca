use std::fmt;
use std::sync::Arc;

/// Header set of a desktop browser.
///
/// The vendor site rejects requests that do not look like they come from one.
pub fn browser_headers() -> Vec<(String, String)> {
    [
        (
            "User-Agent",
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.3 Safari/605.1.15",
        ),
        ("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        ("Accept-Charset", "ISO-8859-1,utf-8;q=0.7,*;q=0.3"),
        ("Accept-Encoding", "none"),
        ("Accept-Language", "en-US,en;q=0.8"),
        ("Connection", "keep-alive"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// Configuration for HTTP fetching operations.
///
/// # Examples
///
/// ```
/// use svdsync_fetch::FetchOptions;
///
/// let options = FetchOptions::default().header("Referer", "https://www.st.com/");
/// assert!(options.headers.iter().any(|(k, _)| k == "User-Agent"));
/// ```
#[derive(Clone)]
pub struct FetchOptions {
    /// Headers sent with every request.
    ///
    /// Default: [`browser_headers`]
    pub headers: Arc<[(String, String)]>,
}

impl fmt::Debug for FetchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchOptions")
            .field("headers", &self.headers)
            .finish()
    }
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self::with_headers(browser_headers())
    }
}

impl FetchOptions {
    pub fn with_headers(headers: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            headers: headers.into_iter().collect(),
        }
    }

    /// Add a header, replacing any existing header of the same name (ASCII case-insensitive).
    pub fn header(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let mut headers: Vec<_> = self
            .headers
            .iter()
            .filter(|(k, _)| !k.eq_ignore_ascii_case(&key))
            .cloned()
            .collect();
        headers.push((key, value.into()));
        Self::with_headers(headers)
    }
}
