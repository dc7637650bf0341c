//! HTTP download of the version document with conditional revalidation

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{
    CACHE_CONTROL, ETAG, HeaderMap, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED,
};
use tracing::{debug, info, warn};

use crate::config::USER_AGENT;
use crate::database::cache::{CachedResponse, ResponseStore, current_timestamp_ms};
use crate::database::error::FetchError;

/// Directives of a `Cache-Control` response header that affect storage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct CacheDirectives {
    max_age: Option<u64>,
    no_store: bool,
}

impl CacheDirectives {
    fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(CACHE_CONTROL)
            .and_then(|v| v.to_str().ok())
            .map(Self::parse)
            .unwrap_or_default()
    }

    fn parse(value: &str) -> Self {
        let mut directives = Self::default();
        let mut no_cache = false;
        for directive in value.split(',').map(str::trim) {
            if directive.eq_ignore_ascii_case("no-store") {
                directives.no_store = true;
            } else if directive.eq_ignore_ascii_case("no-cache") {
                no_cache = true;
            } else if let Some((name, seconds)) = directive.split_once('=')
                && name.trim().eq_ignore_ascii_case("max-age")
                && let Ok(seconds) = seconds.trim().trim_matches('"').parse()
            {
                directives.max_age = Some(seconds);
            }
        }
        // no-cache always forces revalidation, whatever max-age says
        if no_cache {
            directives.max_age = Some(0);
        }
        directives
    }
}

fn header_string(headers: &HeaderMap, name: reqwest::header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

pub struct Fetcher {
    client: reqwest::Client,
    store: Option<Box<dyn ResponseStore>>,
    default_max_age: Duration,
}

impl Fetcher {
    pub fn new(
        timeout: Duration,
        default_max_age: Duration,
        store: Option<Box<dyn ResponseStore>>,
    ) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            store,
            default_max_age,
        })
    }

    /// Cache lookups that fail are treated as misses.
    fn cached(&self, url: &str) -> Option<CachedResponse> {
        let store = self.store.as_ref()?;
        match store.get(url) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Ignoring unreadable cache entry for {}: {}", url, e);
                None
            }
        }
    }

    fn expiry(&self, now: i64, directives: CacheDirectives) -> i64 {
        let max_age = directives
            .max_age
            .map(Duration::from_secs)
            .unwrap_or(self.default_max_age);
        now.saturating_add(i64::try_from(max_age.as_millis()).unwrap_or(i64::MAX))
    }

    /// Fetch the body at `url`, going to the network only when there is no
    /// fresh cached copy
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let cached = self.cached(url);
        let now = current_timestamp_ms();

        if let Some(entry) = &cached
            && entry.is_fresh(now)
        {
            debug!("Using cached copy of {}", url);
            return Ok(entry.body.clone());
        }

        let mut request = self.client.get(url);
        if let Some(entry) = &cached {
            debug!("Revalidating cached copy of {}", url);
            if let Some(etag) = &entry.etag {
                request = request.header(IF_NONE_MATCH, etag);
            }
            if let Some(last_modified) = &entry.last_modified {
                request = request.header(IF_MODIFIED_SINCE, last_modified);
            }
        }

        info!("Fetching {}", url);
        let response = request.send().await?;
        let status = response.status();
        let directives = CacheDirectives::from_headers(response.headers());

        if status == StatusCode::NOT_MODIFIED
            && let Some(entry) = cached
        {
            debug!("{} not modified", url);
            if let Some(store) = &self.store
                && let Err(e) = store.touch(url, self.expiry(now, directives))
            {
                warn!("Failed to refresh cache entry for {}: {}", url, e);
            }
            return Ok(entry.body);
        }

        if !status.is_success() {
            warn!("{} returned status {}", url, status);
            return Err(FetchError::UnexpectedStatus {
                url: url.to_string(),
                status,
            });
        }

        let etag = header_string(response.headers(), ETAG);
        let last_modified = header_string(response.headers(), LAST_MODIFIED);
        let body = response.text().await?;

        if let Some(store) = &self.store
            && !directives.no_store
        {
            let entry = CachedResponse {
                url: url.to_string(),
                body: body.clone(),
                etag,
                last_modified,
                fetched_at: now,
                expires_at: self.expiry(now, directives),
            };
            if let Err(e) = store.put(&entry) {
                warn!("Failed to cache {}: {}", url, e);
            }
        }

        Ok(body)
    }
}
