//! HTTP fetch utilities for the Wallaby browser session.
//!
//! Provides simple blocking GET wrappers used by the page loader. Timeout
//! policy lives here, deliberately outside the parsing core: tokenization
//! and tree building always run to completion, so any time limit belongs to
//! the transport.

use base64::Engine;
use std::time::Duration;
use thiserror::Error;

/// User-Agent header sent with all requests.
///
/// Mimics a common desktop browser to avoid basic bot detection.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Default request timeout.
const TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from the fetch layer.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP client could not be constructed or the request failed in
    /// transit.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status code.
    #[error("HTTP error: {0}")]
    Status(reqwest::StatusCode),

    /// A `data:` URL could not be decoded.
    #[error("invalid data URL: {0}")]
    DataUrl(String),
}

/// A parsed `data:` URL that can be decoded into raw bytes.
pub struct DataUrl {
    /// The full raw `data:` URL string (e.g. `data:text/html;base64,...`).
    pub raw: String,
}

impl DataUrl {
    /// Create a new `DataUrl` from a raw data URL string.
    #[must_use]
    pub const fn new(raw: String) -> Self {
        Self { raw }
    }

    /// Decode the data URL payload into raw bytes.
    ///
    /// Base64-encoded payloads are decoded; anything else is returned as the
    /// literal bytes after the comma.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::DataUrl`] if the URL has no payload separator
    /// or base64 decoding fails.
    pub fn decode(&self) -> Result<Vec<u8>, FetchError> {
        let data_url = self.raw.trim_start_matches("data:");
        let (metadata, data) = data_url
            .split_once(',')
            .ok_or_else(|| FetchError::DataUrl("missing comma".to_string()))?;

        if metadata.ends_with(";base64") {
            base64::engine::general_purpose::STANDARD
                .decode(data)
                .map_err(|e| FetchError::DataUrl(format!("base64 decode error: {e}")))
        } else {
            Ok(data.as_bytes().to_vec())
        }
    }
}

fn client() -> Result<reqwest::blocking::Client, FetchError> {
    Ok(reqwest::blocking::Client::builder()
        .timeout(TIMEOUT)
        .build()?)
}

/// Fetch a URL and return its body as text.
///
/// # Errors
///
/// Returns a [`FetchError`] if the client cannot be created, the request
/// fails, the response has a non-success status, or the body cannot be
/// decoded as text.
pub fn fetch_text(url: &str) -> Result<String, FetchError> {
    let response = client()?.get(url).header("User-Agent", USER_AGENT).send()?;

    if !response.status().is_success() {
        return Err(FetchError::Status(response.status()));
    }

    Ok(response.text()?)
}

/// Fetch a URL and return its body as raw bytes.
///
/// `data:` URLs are decoded locally without touching the network.
///
/// # Errors
///
/// Returns a [`FetchError`] on transport failure, non-success status, or an
/// undecodable `data:` payload.
pub fn fetch_bytes(url: &str) -> Result<Vec<u8>, FetchError> {
    if url.starts_with("data:") {
        return DataUrl::new(url.to_string()).decode();
    }

    let response = client()?.get(url).header("User-Agent", USER_AGENT).send()?;

    if !response.status().is_success() {
        return Err(FetchError::Status(response.status()));
    }

    Ok(response.bytes()?.to_vec())
}
