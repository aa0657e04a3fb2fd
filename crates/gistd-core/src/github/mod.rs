//! GitHub Gist API client.
//!
//! All transport, auth-header construction, and rate-limit header parsing
//! live here; callers see typed values and typed errors only.
//!
//! # Module Organization
//!
//! - [`client`] - reqwest wrapper with rate limit tracking

pub mod client;

pub use client::{HttpClient, RateLimitState};

use crate::config::{NetworkConfig, Settings};
use crate::models::{GistPayload, GistSummary};
use crate::{GistError, Result};
use async_trait::async_trait;
use reqwest::{Response, StatusCode};

/// The listing and lookup operations the search aggregator depends on.
///
/// Kept narrow so tests can substitute an in-memory source.
#[async_trait]
pub trait GistSource: Send + Sync {
    /// List one page of the authenticated user's gists.
    async fn list_user_gists(
        &self,
        token: &str,
        per_page: u32,
        page: u32,
    ) -> Result<Vec<GistSummary>>;

    /// List one page of public gists using the configured fallback token.
    async fn list_public_gists(&self, per_page: u32, page: u32) -> Result<Vec<GistSummary>>;

    /// Fetch a single gist by id, content-complete.
    async fn get_gist(&self, id: &str, token: Option<&str>) -> Result<GistSummary>;
}

/// Client for the GitHub Gist REST API.
pub struct GistClient {
    http: HttpClient,
    api_base: String,
    fallback_token: Option<String>,
}

impl std::fmt::Debug for GistClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GistClient")
            .field("api_base", &self.api_base)
            .field("has_fallback_token", &self.fallback_token.is_some())
            .finish()
    }
}

impl GistClient {
    /// Create a new Gist client from runtime settings.
    pub fn new(settings: &Settings) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new()?,
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            fallback_token: settings.fallback_token.clone(),
        })
    }

    /// Get the current upstream rate limit state.
    pub fn rate_limit_state(&self) -> RateLimitState {
        self.http.rate_limit_state()
    }

    // ========================================
    // Pass-through operations
    // ========================================

    /// Create a gist for the authenticated user.
    pub async fn create_gist(&self, token: &str, payload: &GistPayload) -> Result<GistSummary> {
        let url = format!("{}/gists", self.api_base);
        let response = self.http.post_json(&url, token, payload).await?;
        let response = self.expect_success(response, None).await?;
        Ok(response.json().await.map_err(json_error)?)
    }

    /// Update an existing gist.
    pub async fn update_gist(
        &self,
        token: &str,
        id: &str,
        payload: &GistPayload,
    ) -> Result<GistSummary> {
        let url = self.gist_url(id);
        let response = self.http.patch_json(&url, token, payload).await?;
        let response = self.expect_success(response, Some(id)).await?;
        Ok(response.json().await.map_err(json_error)?)
    }

    /// Delete a gist.
    pub async fn delete_gist(&self, token: &str, id: &str) -> Result<()> {
        let url = self.gist_url(id);
        let response = self.http.delete(&url, token).await?;
        self.expect_success(response, Some(id)).await?;
        Ok(())
    }

    /// Star a gist.
    pub async fn star_gist(&self, token: &str, id: &str) -> Result<()> {
        let url = format!("{}/star", self.gist_url(id));
        let response = self.http.put(&url, token).await?;
        self.expect_success(response, Some(id)).await?;
        Ok(())
    }

    /// Remove a star from a gist.
    pub async fn unstar_gist(&self, token: &str, id: &str) -> Result<()> {
        let url = format!("{}/star", self.gist_url(id));
        let response = self.http.delete(&url, token).await?;
        self.expect_success(response, Some(id)).await?;
        Ok(())
    }

    /// Check whether a gist is starred by the authenticated user.
    ///
    /// Upstream signals this purely through the status code: 204 starred,
    /// 404 not starred.
    pub async fn is_starred(&self, token: &str, id: &str) -> Result<bool> {
        let url = format!("{}/star", self.gist_url(id));
        let response = self.http.get(&url, Some(token)).await?;
        match response.status() {
            StatusCode::NO_CONTENT => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => {
                self.expect_success(response, Some(id)).await?;
                Ok(false)
            }
        }
    }

    // Internal methods

    fn gist_url(&self, id: &str) -> String {
        format!("{}/gists/{}", self.api_base, id)
    }

    fn list_url(&self, path: &str, per_page: u32, page: u32) -> String {
        let per_page = per_page.min(NetworkConfig::GISTS_PER_PAGE_MAX);
        format!(
            "{}{}?per_page={}&page={}",
            self.api_base, path, per_page, page
        )
    }

    /// Classify a non-success response. 429 and exhausted-quota 403 are
    /// already converted by [`HttpClient`]; what remains here is credential
    /// failure, missing resource, and generic upstream failure.
    async fn expect_success(&self, response: Response, gist_id: Option<&str>) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(GistError::Unauthorized {
                message: format!("GitHub API returned {}", status),
            }),
            StatusCode::NOT_FOUND => match gist_id {
                Some(id) => Err(GistError::NotFound { id: id.to_string() }),
                None => Err(GistError::Upstream {
                    message: format!("GitHub API returned {}", status),
                    status_code: Some(status.as_u16()),
                }),
            },
            _ => Err(GistError::Upstream {
                message: format!("GitHub API returned {}", status),
                status_code: Some(status.as_u16()),
            }),
        }
    }
}

fn json_error(err: reqwest::Error) -> GistError {
    GistError::Json {
        message: format!("Failed to parse GitHub response: {}", err),
    }
}

#[async_trait]
impl GistSource for GistClient {
    async fn list_user_gists(
        &self,
        token: &str,
        per_page: u32,
        page: u32,
    ) -> Result<Vec<GistSummary>> {
        let url = self.list_url("/gists", per_page, page);
        let response = self.http.get(&url, Some(token)).await?;
        let response = self.expect_success(response, None).await?;
        Ok(response.json().await.map_err(json_error)?)
    }

    async fn list_public_gists(&self, per_page: u32, page: u32) -> Result<Vec<GistSummary>> {
        let token = self
            .fallback_token
            .as_deref()
            .ok_or_else(|| GistError::Config {
                message: "No fallback token configured for public search \
                          (set GISTD_FALLBACK_TOKEN or --fallback-token)"
                    .to_string(),
            })?;
        let url = self.list_url("/gists/public", per_page, page);
        let response = self.http.get(&url, Some(token)).await?;
        let response = self.expect_success(response, None).await?;
        Ok(response.json().await.map_err(json_error)?)
    }

    async fn get_gist(&self, id: &str, token: Option<&str>) -> Result<GistSummary> {
        let token = token.or(self.fallback_token.as_deref());
        let response = self.http.get(&self.gist_url(id), token).await?;
        let response = self.expect_success(response, Some(id)).await?;
        Ok(response.json().await.map_err(json_error)?)
    }
}
