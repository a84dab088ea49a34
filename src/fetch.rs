//! Byte fetching over HTTP
//!
//! [`Fetcher`] is the seam between import/update logic and the network; the
//! default [`HttpFetcher`] uses blocking `reqwest`. There are no retries.

use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

use tracing::debug;

use crate::error::{Result, download_failed};

/// User agent sent with every request
const USER_AGENT: &str = concat!("userchrome-loader/", env!("CARGO_PKG_VERSION"));

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const TOTAL_TIMEOUT: Duration = Duration::from_secs(300);
const MAX_REDIRECTS: usize = 5;

/// Raw response of one request
#[derive(Debug, Clone, Default)]
pub struct FetchResponse {
    pub bytes: Vec<u8>,
    pub status: u16,
    /// Header names are lowercase
    pub headers: HashMap<String, String>,
}

impl FetchResponse {
    /// Header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Body parsed as JSON
    pub fn json(&self, url: &str) -> Result<serde_json::Value> {
        serde_json::from_slice(&self.bytes)
            .map_err(|e| download_failed(url, format!("invalid JSON response: {e}")))
    }
}

/// Fetches the bytes behind a URL
pub trait Fetcher {
    /// Perform a GET; implementations report HTTP errors through `status`
    fn fetch(&self, url: &str) -> Result<FetchResponse>;
}

/// Fetch `url` and fail on HTTP errors and empty bodies
pub fn fetch_ok(fetcher: &dyn Fetcher, url: &str) -> Result<FetchResponse> {
    let response = fetcher.fetch(url)?;
    if response.status >= 400 {
        return Err(download_failed(
            url,
            format!("HTTP error: {}", response.status),
        ));
    }
    if response.bytes.is_empty() {
        return Err(download_failed(url, "empty response"));
    }
    Ok(response)
}

/// Fetch `url` as JSON
pub fn fetch_json(fetcher: &dyn Fetcher, url: &str) -> Result<serde_json::Value> {
    fetch_ok(fetcher, url)?.json(url)
}

/// Remembers successful responses of an inner fetcher by URL
///
/// Lets an update check and the re-import that follows share one download.
/// Error responses are not kept.
pub struct CachingFetcher<'a> {
    inner: &'a dyn Fetcher,
    cache: RefCell<HashMap<String, FetchResponse>>,
}

impl<'a> CachingFetcher<'a> {
    pub fn new(inner: &'a dyn Fetcher) -> Self {
        Self {
            inner,
            cache: RefCell::new(HashMap::new()),
        }
    }
}

impl Fetcher for CachingFetcher<'_> {
    fn fetch(&self, url: &str) -> Result<FetchResponse> {
        if let Some(response) = self.cache.borrow().get(url) {
            debug!("GET {url} (cached)");
            return Ok(response.clone());
        }
        let response = self.inner.fetch(url)?;
        if response.status < 400 {
            self.cache
                .borrow_mut()
                .insert(url.to_string(), response.clone());
        }
        Ok(response)
    }
}

/// Blocking HTTP fetcher
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(TOTAL_TIMEOUT)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| download_failed("(client)", e.to_string()))?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<FetchResponse> {
        debug!("GET {url}");
        let mut request = self.client.get(url);
        if url.starts_with("https://api.github.com/") {
            request = request.header("Accept", "application/vnd.github.v3+json");
        }

        let response = request
            .send()
            .map_err(|e| download_failed(url, e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
            })
            .collect();
        let bytes = response
            .bytes()
            .map_err(|e| download_failed(url, e.to_string()))?
            .to_vec();

        debug!("GET {url} -> {status} ({} bytes)", bytes.len());
        Ok(FetchResponse {
            bytes,
            status,
            headers,
        })
    }
}
