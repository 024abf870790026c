use reqwest::{header, Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::sources::rate_limiter::RateLimiter;

const MAX_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_AFTER_SECS: u64 = 30;

pub fn build_client() -> Result<Client> {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        header::HeaderValue::from_static("application/json"),
    );
    headers.insert(
        header::USER_AGENT,
        header::HeaderValue::from_static("jobpulse/0.1"),
    );

    let client = Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(30))
        .build()?;

    Ok(client)
}

/// GET `url` as JSON, honouring the rate limiter and retrying rate-limit and network failures.
pub async fn get_json<T: DeserializeOwned>(
    client: &Client,
    rate_limiter: &RateLimiter,
    url: &str,
) -> Result<T> {
    let mut attempt = 1;

    loop {
        match fetch_once(client, rate_limiter, url).await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < MAX_ATTEMPTS => {
                tracing::warn!("Request to {} failed (attempt {}): {}", url, attempt, e);
                if let Error::RateLimited(secs) = e {
                    rate_limiter.back_off(secs).await;
                }
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

async fn fetch_once<T: DeserializeOwned>(
    client: &Client,
    rate_limiter: &RateLimiter,
    url: &str,
) -> Result<T> {
    rate_limiter.wait().await;
    tracing::debug!("Fetching: {}", url);

    let response = client.get(url).send().await?;
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
        return Err(Error::RateLimited(retry_after));
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(Error::SourceApi(format!(
            "GET {} failed: {} - {}",
            url,
            status,
            body.chars().take(200).collect::<String>()
        )));
    }

    Ok(response.json().await?)
}
