// src/fbref/client.rs
use crate::utils::error::FetchError;
use reqwest::header;
use std::time::Duration;

/// Standard-stats page for the current Premier League season.
pub const DEFAULT_STATS_URL: &str = "https://fbref.com/en/comps/9/stats/Premier-League-Stats";

// fbref blocks the default reqwest UA; identify as a regular browser-ish client.
const USER_AGENT: &str = concat!("epl_stats/", env!("CARGO_PKG_VERSION"));

/// Creates a reqwest client configured for fetching the stats page.
fn build_client(timeout_secs: u64) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(timeout_secs))
        .build()
}

/// Downloads the stats page HTML. One shot: no retry, no fallback (a failed
/// fetch aborts the whole pipeline).
pub async fn fetch_stats_page(url: &str, timeout_secs: u64) -> Result<String, FetchError> {
    let client = build_client(timeout_secs)?; // Propagate client build error if any

    tracing::info!("Fetching stats page: {}", url);
    tracing::debug!("Using User-Agent: {}", USER_AGENT);

    let response = client
        .get(url)
        .header(header::ACCEPT, "text/html,application/xhtml+xml,*/*")
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(timeout_secs)
            } else {
                FetchError::Network(e)
            }
        })?;

    // Check if the request was successful (status code 2xx)
    let status = response.status();
    if !status.is_success() {
        tracing::error!("HTTP error status: {} for URL: {}", status, url);
        if status == reqwest::StatusCode::FORBIDDEN {
            tracing::warn!("Received 403 Forbidden - the site may be rate limiting scrapers.");
        }
        return Err(FetchError::Http(status));
    }

    let body = response.text().await.map_err(|e| {
        if e.is_timeout() {
            FetchError::Timeout(timeout_secs)
        } else {
            FetchError::Network(e)
        }
    })?;
    tracing::debug!("Successfully downloaded {} bytes from {}", body.len(), url);

    Ok(body)
}
