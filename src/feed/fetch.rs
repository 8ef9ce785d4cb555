use std::time::Duration;

use crate::error::FeedError;

/// Append a `v=<unix millis>` query parameter so intermediate caches never
/// serve a stale word list.
pub fn with_cache_buster(url: &str, millis: i64) -> String {
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{url}{sep}v={millis}")
}

#[cfg(feature = "network")]
pub fn fetch_url(url: &str, timeout: Duration) -> Result<String, FeedError> {
    let url = with_cache_buster(url, chrono::Utc::now().timestamp_millis());
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| FeedError::Request(e.to_string()))?;
    let response = client
        .get(&url)
        .send()
        .map_err(|e| FeedError::Request(e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(FeedError::Http(status.as_u16()));
    }
    response.text().map_err(|e| FeedError::Request(e.to_string()))
}

#[cfg(not(feature = "network"))]
pub fn fetch_url(_url: &str, _timeout: Duration) -> Result<String, FeedError> {
    Err(FeedError::NetworkDisabled)
}
