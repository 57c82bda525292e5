//! HTTP document fetching.
//!
//! A thin wrapper over a single `reqwest::Client` carrying the browser-like
//! identification header. Pages come back as body text; the extractor modules
//! parse them with `scraper` so no document tree is ever held across an await.

use crate::error::{PubmetricsError, Result};
use tracing::debug;
use url::Url;

/// User agent string sent with every request
const USER_AGENT: &str = "Chrome/64.0.3282.186";

/// HTTP fetcher shared by the whole run.
///
/// Cookies are kept for the lifetime of the fetcher, matching the single
/// implicit session the sites expect. There is no timeout and no retry;
/// a failed fetch is reported and the caller decides what to skip.
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    /// Create a new fetcher with a fresh cookie store.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .build()
            .map_err(|e| PubmetricsError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// GET `url` and return the response body text.
    ///
    /// # Errors
    ///
    /// Returns a fetch error on transport failure or a non-2xx status.
    pub async fn get(&self, url: &Url) -> Result<String> {
        debug!(url = %url, "fetching");

        let response = self.client.get(url.as_str()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PubmetricsError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}
