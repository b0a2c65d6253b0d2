//! HTTP client for the agent's metrics API.

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

use crate::types::MetricsSnapshot;

/// A hair above the agent's script timeout so its 500 beats our cutoff.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(35);

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("{status}: {message}")]
    Status { status: StatusCode, message: String },
}

#[derive(Clone)]
pub struct Api {
    client: reqwest::Client,
    base: String,
}

impl Api {
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base: normalize_base_url(base_url),
        })
    }

    pub async fn fetch_metrics(&self) -> Result<MetricsSnapshot, FetchError> {
        let resp = self
            .client
            .get(format!("{}/api/metrics", self.base))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(status_error(resp).await);
        }
        Ok(resp.json().await?)
    }

    pub async fn fetch_report(&self) -> Result<String, FetchError> {
        let resp = self
            .client
            .get(format!("{}/api/report", self.base))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(status_error(resp).await);
        }
        Ok(resp.text().await?)
    }
}

/// Turns an error response into something worth showing in the notice bar.
/// The agent sends `{"error": ..., "details": ...}` bodies; anything else
/// falls back to the bare status.
async fn status_error(resp: reqwest::Response) -> FetchError {
    let status = resp.status();
    let message = match resp.json::<serde_json::Value>().await {
        Ok(body) => {
            let error = body
                .get("error")
                .and_then(|v| v.as_str())
                .unwrap_or("request failed")
                .to_string();
            match body.get("details").and_then(|v| v.as_str()) {
                Some(details) => format!("{error} ({details})"),
                None => error,
            }
        }
        Err(_) => "request failed".to_string(),
    };
    FetchError::Status { status, message }
}

/// Accepts "host:3000", "http://host:3000", or either with a trailing slash.
pub fn normalize_base_url(input: &str) -> String {
    let trimmed = input.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_host_gains_a_scheme() {
        assert_eq!(normalize_base_url("pi5:3000"), "http://pi5:3000");
        assert_eq!(normalize_base_url("192.168.1.50:3000"), "http://192.168.1.50:3000");
    }

    #[test]
    fn existing_scheme_and_trailing_slash_are_preserved_and_trimmed() {
        assert_eq!(normalize_base_url("http://pi5:3000/"), "http://pi5:3000");
        assert_eq!(normalize_base_url("https://pi5:3000"), "https://pi5:3000");
        assert_eq!(normalize_base_url("  pi5:3000  "), "http://pi5:3000");
    }
}
