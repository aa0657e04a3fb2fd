//! REST request handlers.

use crate::server::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use gistd_core::{GistError, GistPayload, GistSource, GistSummary, NetworkConfig};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::error;

/// Adapter mapping [`GistError`] onto HTTP responses.
///
/// The client distinguishes these outcomes: 401 prompts for a new
/// credential, 429 shows retry-later (with a `Retry-After` hint when
/// upstream provided one), everything upstream-shaped is a 502.
pub struct ApiError(GistError);

impl From<GistError> for ApiError {
    fn from(err: GistError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            GistError::EmptyQuery => StatusCode::BAD_REQUEST,
            GistError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            GistError::NotFound { .. } => StatusCode::NOT_FOUND,
            GistError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            GistError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            GistError::Network { .. } | GistError::Json { .. } | GistError::Upstream { .. } => {
                StatusCode::BAD_GATEWAY
            }
        };

        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        }

        let mut response = (status, Json(json!({ "error": self.0.to_string() }))).into_response();
        if let GistError::RateLimited {
            retry_after_secs: Some(secs),
        } = &self.0
        {
            if let Ok(value) = header::HeaderValue::from_str(&secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }
        response
    }
}

/// Extract a bearer token from the Authorization header.
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Require a bearer token for the write/star pass-through routes.
fn require_bearer(headers: &HeaderMap) -> Result<String, ApiError> {
    bearer_token(headers).ok_or_else(|| {
        ApiError(GistError::Unauthorized {
            message: "Missing bearer token".to_string(),
        })
    })
}

/// Health check endpoint.
pub async fn handle_health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
}

/// Search gists by case-insensitive substring.
///
/// With an Authorization header the caller's own gists are searched;
/// without one the public listing is searched via the configured fallback
/// token.
pub async fn search_gists(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<GistSummary>>, ApiError> {
    let token = bearer_token(&headers);
    let query = params.q.unwrap_or_default();
    let results = state.aggregator.search(&query, token.as_deref()).await?;
    Ok(Json(results))
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    #[serde(default = "default_page")]
    pub page: u32,
}

fn default_per_page() -> u32 {
    30
}

fn default_page() -> u32 {
    1
}

/// List the authenticated user's gists (thin pass-through).
pub async fn list_gists(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<GistSummary>>, ApiError> {
    let token = require_bearer(&headers)?;
    let per_page = params.per_page.min(NetworkConfig::GISTS_PER_PAGE_MAX);
    let gists = state
        .client
        .list_user_gists(&token, per_page, params.page)
        .await?;
    Ok(Json(gists))
}

/// Fetch a single gist, content-complete.
pub async fn get_gist(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<GistSummary>, ApiError> {
    let token = bearer_token(&headers);
    let gist = state.client.get_gist(&id, token.as_deref()).await?;
    Ok(Json(gist))
}

/// Create a gist.
pub async fn create_gist(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<GistPayload>,
) -> Result<(StatusCode, Json<GistSummary>), ApiError> {
    let token = require_bearer(&headers)?;
    let gist = state.client.create_gist(&token, &payload).await?;
    Ok((StatusCode::CREATED, Json(gist)))
}

/// Update a gist.
pub async fn update_gist(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<GistPayload>,
) -> Result<Json<GistSummary>, ApiError> {
    let token = require_bearer(&headers)?;
    let gist = state.client.update_gist(&token, &id, &payload).await?;
    Ok(Json(gist))
}

/// Delete a gist.
pub async fn delete_gist(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let token = require_bearer(&headers)?;
    state.client.delete_gist(&token, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Star a gist.
pub async fn star_gist(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let token = require_bearer(&headers)?;
    state.client.star_gist(&token, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Remove a star from a gist.
pub async fn unstar_gist(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let token = require_bearer(&headers)?;
    state.client.unstar_gist(&token, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Check whether a gist is starred. 204 when starred, 404 when not, to
/// mirror the upstream contract.
pub async fn get_star(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let token = require_bearer(&headers)?;
    let starred = state.client.is_starred(&token, &id).await?;
    if starred {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Ok(StatusCode::NOT_FOUND)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with_auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, value.parse().unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(
            bearer_token(&headers_with_auth("Bearer ghp_abc123")),
            Some("ghp_abc123".to_string())
        );
        assert_eq!(bearer_token(&headers_with_auth("Basic dXNlcg==")), None);
        assert_eq!(bearer_token(&headers_with_auth("Bearer   ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (GistError::EmptyQuery, StatusCode::BAD_REQUEST),
            (
                GistError::Unauthorized {
                    message: "x".into(),
                },
                StatusCode::UNAUTHORIZED,
            ),
            (
                GistError::NotFound { id: "x".into() },
                StatusCode::NOT_FOUND,
            ),
            (
                GistError::RateLimited {
                    retry_after_secs: None,
                },
                StatusCode::TOO_MANY_REQUESTS,
            ),
            (
                GistError::Config { message: "x".into() },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                GistError::Upstream {
                    message: "x".into(),
                    status_code: Some(500),
                },
                StatusCode::BAD_GATEWAY,
            ),
        ];
        for (err, expected) in cases {
            let response = ApiError(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn test_rate_limit_response_carries_retry_after() {
        let response = ApiError(GistError::RateLimited {
            retry_after_secs: Some(42),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            response.headers().get(header::RETRY_AFTER).unwrap(),
            &header::HeaderValue::from_static("42")
        );
    }
}
