//! Reddit listing source.
//!
//! Fetches `/r/<source>/<sort>.json` over HTTP with [`reqwest`] and maps the
//! response status onto [`FetchError`].  Parsing of the body into picture
//! candidates is left to [`super::filter_pictures`], which keeps this file
//! about transport only.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use super::{FetchError, ListingSource, RawListing, SortOrder};

/// Number of posts requested per listing. Upstream defaults to 25 and caps
/// at 100.
pub const LISTING_LIMIT: u32 = 100;

/// Upstream rejects requests without a descriptive user agent.
const USER_AGENT: &str = concat!("leanservice/", env!("CARGO_PKG_VERSION"));

/// A Reddit-compatible listing source.
#[derive(Debug, Clone)]
pub struct RedditSource {
    /// Scheme and host of the upstream site, e.g. `http://www.reddit.com/`.
    base_url: Url,
    client: Client,
}

impl RedditSource {
    /// Create a source talking to `base_url` (e.g. `http://www.reddit.com`).
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Self::with_client(base_url, client)
    }

    /// Create a source reusing an existing HTTP client.
    pub fn with_client(base_url: &str, client: Client) -> Result<Self, FetchError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| FetchError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(FetchError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self { base_url, client })
    }

    /// Address of the listing page, without the query string.
    ///
    /// `source` always lands in a single path segment: `/`, `?`, `#` and `%`
    /// are percent-encoded. Returns `None` for sources that cannot name a
    /// path segment at all (empty, `.` or `..`).
    pub fn listing_url(&self, source: &str, sort: SortOrder) -> Option<Url> {
        if matches!(source, "" | "." | "..") {
            return None;
        }
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .ok()?
            .pop_if_empty()
            .push("r")
            .push(source)
            .push(&format!("{sort}.json"));
        Some(url)
    }
}

/// Decide what a non-200 (or search-redirected) response means.
///
/// Returns `None` when the response should be parsed as a listing.
fn classify(status: StatusCode, final_path: &str, source: &str) -> Option<FetchError> {
    // Unknown subreddits are sometimes answered with a redirect to search.
    if status == StatusCode::NOT_FOUND || final_path.contains("subreddits/search") {
        return Some(FetchError::NotFound(source.to_string()));
    }
    if status == StatusCode::FORBIDDEN {
        return Some(FetchError::Forbidden(source.to_string()));
    }
    // `StatusCode` admits codes up to 999; everything from 500 up is a server fault.
    if status.as_u16() >= 500 {
        return Some(FetchError::UpstreamUnavailable(status.as_u16()));
    }
    if status != StatusCode::OK {
        return Some(FetchError::UpstreamStatus(status.as_u16()));
    }
    None
}

#[async_trait]
impl ListingSource for RedditSource {
    async fn fetch(&self, source: &str, sort: SortOrder) -> Result<RawListing, FetchError> {
        let Some(url) = self.listing_url(source, sort) else {
            return Err(FetchError::NotFound(source.to_string()));
        };
        tracing::debug!(url = %url, "requesting listing");

        let response = self
            .client
            .get(url)
            .query(&[("limit", LISTING_LIMIT)])
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), final_url = %response.url(), "upstream responded");
        if !response.headers().contains_key("x-moose") {
            tracing::debug!("where is the majestic moose?");
        }

        if let Some(err) = classify(status, response.url().path(), source) {
            return Err(err);
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| FetchError::Malformed(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const PATH: &str = "/r/pics/new.json";

    fn listing_url(base: &str, source: &str, sort: SortOrder) -> Option<String> {
        let src = RedditSource::new(base).unwrap();
        src.listing_url(source, sort).map(String::from)
    }

    #[test]
    fn listing_url_includes_source_and_sort() {
        for base in ["http://www.reddit.com", "http://www.reddit.com/"] {
            assert_eq!(
                listing_url(base, "pics", SortOrder::Top).as_deref(),
                Some("http://www.reddit.com/r/pics/top.json")
            );
        }
    }

    #[test]
    fn listing_url_keeps_base_path_prefix() {
        assert_eq!(
            listing_url("http://localhost:4000/proxy/", "pics", SortOrder::New).as_deref(),
            Some("http://localhost:4000/proxy/r/pics/new.json")
        );
    }

    #[test]
    fn listing_url_confines_source_to_one_segment() {
        assert_eq!(
            listing_url("http://www.reddit.com", "../../admin", SortOrder::Top).as_deref(),
            Some("http://www.reddit.com/r/..%2F..%2Fadmin/top.json")
        );
        assert_eq!(
            listing_url("http://www.reddit.com", "pics/hot.json?limit=1#", SortOrder::New)
                .as_deref(),
            Some("http://www.reddit.com/r/pics%2Fhot.json%3Flimit=1%23/new.json")
        );
    }

    #[test]
    fn listing_url_rejects_dot_segments() {
        for source in ["", ".", ".."] {
            assert!(listing_url("http://www.reddit.com", source, SortOrder::New).is_none());
        }
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(matches!(
            RedditSource::new("not a url"),
            Err(FetchError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            RedditSource::new("mailto:someone@example.com"),
            Err(FetchError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn ok_is_parsed() {
        assert!(classify(StatusCode::OK, PATH, "pics").is_none());
    }

    #[test]
    fn not_found_and_search_redirect_mean_missing_source() {
        assert!(matches!(
            classify(StatusCode::NOT_FOUND, PATH, "pics"),
            Some(FetchError::NotFound(s)) if s == "pics"
        ));
        assert!(matches!(
            classify(StatusCode::OK, "/subreddits/search.json", "pics"),
            Some(FetchError::NotFound(_))
        ));
    }

    #[test]
    fn forbidden_means_private() {
        assert!(matches!(
            classify(StatusCode::FORBIDDEN, PATH, "secret"),
            Some(FetchError::Forbidden(s)) if s == "secret"
        ));
    }

    #[test]
    fn server_errors_mean_unavailable() {
        for code in [500, 502, 503, 504, 599, 600, 999] {
            let status = StatusCode::from_u16(code).unwrap();
            assert!(matches!(
                classify(status, PATH, "pics"),
                Some(FetchError::UpstreamUnavailable(c)) if c == code
            ));
        }
    }

    #[test]
    fn other_statuses_are_unexpected() {
        for code in [201, 204, 301, 400, 401, 429] {
            let status = StatusCode::from_u16(code).unwrap();
            assert!(matches!(
                classify(status, PATH, "pics"),
                Some(FetchError::UpstreamStatus(c)) if c == code
            ));
        }
    }
}
