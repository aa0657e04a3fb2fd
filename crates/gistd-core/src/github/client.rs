//! HTTP client with rate limiting awareness.
//!
//! Wraps reqwest with:
//! - Rate limit tracking from `X-RateLimit-*` response headers
//! - 429 / secondary-rate-limit detection with a retry-after hint
//! - Configurable timeout and user-agent management

use crate::config::NetworkConfig;
use crate::{GistError, Result};
use reqwest::{header, Client, RequestBuilder, Response, StatusCode};
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

/// Rate limit state extracted from response headers.
#[derive(Debug, Clone, Default)]
pub struct RateLimitState {
    /// Remaining requests allowed.
    pub remaining: Option<u64>,
    /// Total request limit.
    pub limit: Option<u64>,
    /// Unix timestamp when the rate limit resets.
    pub reset: Option<u64>,
}

impl RateLimitState {
    /// Seconds until the rate limit resets, if known and in the future.
    pub fn secs_until_reset(&self) -> Option<u64> {
        self.reset.and_then(|reset| {
            let now = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs();
            if reset > now {
                Some(reset - now)
            } else {
                None
            }
        })
    }
}

/// HTTP client with rate limiting awareness.
pub struct HttpClient {
    client: Client,
    /// Rate limit state (shared for thread safety).
    rate_limit_remaining: AtomicI64,
    rate_limit_limit: AtomicU64,
    rate_limit_reset: AtomicU64,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(NetworkConfig::REQUEST_TIMEOUT)
            .user_agent(NetworkConfig::USER_AGENT)
            .build()
            .map_err(|e| GistError::Network {
                message: format!("Failed to create HTTP client: {}", e),
                cause: Some(e.to_string()),
            })?;

        Ok(Self {
            client,
            rate_limit_remaining: AtomicI64::new(-1),
            rate_limit_limit: AtomicU64::new(0),
            rate_limit_reset: AtomicU64::new(0),
        })
    }

    /// Get the current rate limit state.
    pub fn rate_limit_state(&self) -> RateLimitState {
        let remaining = self.rate_limit_remaining.load(Ordering::SeqCst);
        RateLimitState {
            remaining: if remaining >= 0 {
                Some(remaining as u64)
            } else {
                None
            },
            limit: {
                let limit = self.rate_limit_limit.load(Ordering::SeqCst);
                if limit > 0 {
                    Some(limit)
                } else {
                    None
                }
            },
            reset: {
                let reset = self.rate_limit_reset.load(Ordering::SeqCst);
                if reset > 0 {
                    Some(reset)
                } else {
                    None
                }
            },
        }
    }

    /// Make a GET request with an optional bearer token.
    pub async fn get(&self, url: &str, token: Option<&str>) -> Result<Response> {
        self.send(self.client.get(url), url, token).await
    }

    /// Make a POST request with a JSON body.
    pub async fn post_json<T: serde::Serialize>(
        &self,
        url: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        self.send(self.client.post(url).json(body), url, Some(token))
            .await
    }

    /// Make a PATCH request with a JSON body.
    pub async fn patch_json<T: serde::Serialize>(
        &self,
        url: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        self.send(self.client.patch(url).json(body), url, Some(token))
            .await
    }

    /// Make a PUT request with an empty body.
    pub async fn put(&self, url: &str, token: &str) -> Result<Response> {
        self.send(
            self.client.put(url).header(header::CONTENT_LENGTH, 0),
            url,
            Some(token),
        )
        .await
    }

    /// Make a DELETE request.
    pub async fn delete(&self, url: &str, token: &str) -> Result<Response> {
        self.send(self.client.delete(url), url, Some(token)).await
    }

    // Internal methods

    async fn send(
        &self,
        mut request: RequestBuilder,
        url: &str,
        token: Option<&str>,
    ) -> Result<Response> {
        request = request.header(header::ACCEPT, "application/vnd.github+json");
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let response = request.send().await.map_err(|e| GistError::Network {
            message: format!("Request to {} failed: {}", url, e),
            cause: Some(e.to_string()),
        })?;

        self.update_rate_limits(&response);
        self.check_rate_limit_status(response)
    }

    fn update_rate_limits(&self, response: &Response) {
        let headers = response.headers();

        if let Some(remaining) = header_u64(headers, "X-RateLimit-Remaining") {
            self.rate_limit_remaining
                .store(remaining as i64, Ordering::SeqCst);
        }
        if let Some(limit) = header_u64(headers, "X-RateLimit-Limit") {
            self.rate_limit_limit.store(limit, Ordering::SeqCst);
        }
        if let Some(reset) = header_u64(headers, "X-RateLimit-Reset") {
            self.rate_limit_reset.store(reset, Ordering::SeqCst);
        }

        let remaining = self.rate_limit_remaining.load(Ordering::SeqCst);
        let limit = self.rate_limit_limit.load(Ordering::SeqCst);
        if remaining >= 0 && limit > 0 {
            debug!("Rate limit: {}/{}", remaining, limit);
        }
    }

    /// Convert rate-limit responses into a typed error with a retry hint.
    ///
    /// Non-rate-limit error statuses pass through for the caller to classify
    /// with request context (listing vs. single-gist).
    fn check_rate_limit_status(&self, response: Response) -> Result<Response> {
        let status = response.status();

        let exhausted = self.rate_limit_remaining.load(Ordering::SeqCst) == 0;
        let rate_limited = status == StatusCode::TOO_MANY_REQUESTS
            || (status == StatusCode::FORBIDDEN && exhausted);

        if rate_limited {
            let retry_after = header_u64(response.headers(), header::RETRY_AFTER.as_str())
                .or_else(|| self.rate_limit_state().secs_until_reset());
            return Err(GistError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        Ok(response)
    }
}

fn header_u64(headers: &header::HeaderMap, name: &str) -> Option<u64> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_state_reset_in_past_yields_none() {
        let state = RateLimitState {
            remaining: Some(0),
            limit: Some(60),
            reset: Some(0),
        };
        assert_eq!(state.secs_until_reset(), None);
    }

    #[test]
    fn test_rate_limit_state_reset_in_future() {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();
        let state = RateLimitState {
            remaining: Some(0),
            limit: Some(60),
            reset: Some(now + 120),
        };
        let secs = state.secs_until_reset().unwrap();
        assert!(secs > 0 && secs <= 120);
    }

    #[tokio::test]
    async fn test_client_creation() {
        let client = HttpClient::new().unwrap();
        assert_eq!(client.rate_limit_state().remaining, None);
        assert_eq!(client.rate_limit_state().limit, None);
    }
}
