//! Fetching remote pages and summarizing them
//!
//! The fetch layer issues a blocking GET, rejects error statuses and
//! non-HTML responses, and hands the body stream to
//! [`extract_summary`](crate::summary::extract_summary). The response is
//! owned by [`summarize_url`] and dropped on every exit path, which releases
//! the connection.

use std::io::Read;
use std::time::Instant;

use reqwest::blocking::{Client, Response};
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, info, warn};

use crate::config::{FetchOptions, SummaryConfig};
use crate::error::SummaryError;
use crate::summary::{PageSummary, extract_summary};

const HTML_CONTENT_TYPE: &str = "text/html";

/// Build an HTTP client from fetch options
pub fn build_client(options: &FetchOptions) -> Result<Client, SummaryError> {
    Client::builder()
        .timeout(options.timeout)
        .user_agent(options.user_agent.as_str())
        .build()
        .map_err(|e| SummaryError::Fetch(format!("client build error: {e}")))
}

/// Check status and content type of a response
///
/// # Errors
///
/// - `SummaryError::HttpStatus` for status codes of 400 and above
/// - `SummaryError::NotHtml` when the content type does not start with
///   `text/html`
pub fn check_response(status: u16, content_type: Option<&str>) -> Result<(), SummaryError> {
    if status >= 400 {
        return Err(SummaryError::HttpStatus(status));
    }

    let content_type = content_type.unwrap_or_default();
    if !content_type
        .trim_start()
        .to_ascii_lowercase()
        .starts_with(HTML_CONTENT_TYPE)
    {
        return Err(SummaryError::NotHtml(content_type.to_string()));
    }
    Ok(())
}

/// GET `url` and return the response positioned at the start of its body
pub fn fetch_html(client: &Client, url: &str) -> Result<Response, SummaryError> {
    let response = client
        .get(url)
        .send()
        .map_err(|e| SummaryError::Fetch(e.to_string()))?;

    let status = response.status().as_u16();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    debug!(url, status, content_type, "received response");

    check_response(status, content_type)?;
    Ok(response)
}

/// Fetch `url` and extract its page summary
///
/// The body is capped at `config.fetch.max_bytes`; a head section that does
/// not close within that many bytes is summarized from what was read.
///
/// # Errors
///
/// Returns `SummaryError::InvalidInput` for an empty URL, fetch errors from
/// [`fetch_html`], and `SummaryError::MalformedMarkup` from extraction.
pub fn summarize_url(url: &str, config: &SummaryConfig) -> Result<PageSummary, SummaryError> {
    if url.is_empty() {
        return Err(SummaryError::InvalidInput("url is required".to_string()));
    }

    let started = Instant::now();
    info!(url, "fetching page");

    let client = build_client(&config.fetch)?;
    let response = fetch_html(&client, url)?;
    let body = response.take(config.fetch.max_bytes);

    let result = extract_summary(url, body, &config.extract);
    match &result {
        Ok(summary) => info!(
            url,
            images = summary.images.len(),
            has_icon = summary.icon.is_some(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "summary extracted"
        ),
        Err(err) => warn!(url, error = %err, "summary extraction failed"),
    }
    result
}
