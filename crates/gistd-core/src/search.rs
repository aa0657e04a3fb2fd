//! Gist search aggregation.
//!
//! The upstream Gist API has no full-text search, so searching is a
//! three-stage pipeline over one page of listings:
//!
//! 1. cheap metadata/inline filter over the listing page,
//! 2. concurrent content enrichment for candidates whose files were not
//!    inlined by the listing call (individual failures degrade that gist to
//!    metadata-only matching instead of aborting the batch),
//! 3. full re-filter once content is available.
//!
//! Results keep the source's native ordering; there is no ranking.

use crate::config::NetworkConfig;
use crate::github::GistSource;
use crate::models::GistSummary;
use crate::{GistError, Result};
use futures::future;
use std::sync::Arc;
use tracing::{debug, warn};

/// Orchestrates listing, selective content enrichment, and filtering.
///
/// Stateless between invocations: every search operates on its own fetched
/// data with no cross-request cache.
pub struct SearchAggregator<S> {
    source: Arc<S>,
}

impl<S: GistSource> SearchAggregator<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }

    /// Search gists for a case-insensitive substring of the query in the
    /// description, a filename, or file content.
    ///
    /// With a credential the authenticated user's gists are searched;
    /// without one, the public listing (via the configured fallback token).
    /// Only a single listing page is inspected, sized at the upstream
    /// maximum.
    pub async fn search(
        &self,
        query: &str,
        credential: Option<&str>,
    ) -> Result<Vec<GistSummary>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(GistError::EmptyQuery);
        }
        let needle = query.to_lowercase();

        let listing = match credential {
            Some(token) => {
                self.source
                    .list_user_gists(token, NetworkConfig::GISTS_PER_PAGE_MAX, 1)
                    .await?
            }
            None => {
                self.source
                    .list_public_gists(NetworkConfig::GISTS_PER_PAGE_MAX, 1)
                    .await?
            }
        };
        debug!("Search '{}': {} gists listed", query, listing.len());

        // Pass 1: keep gists that already match on the data at hand, plus
        // gists that cannot be ruled out yet because at least one file's
        // content was not inlined by the listing call.
        let candidates: Vec<GistSummary> = listing
            .into_iter()
            .filter(|gist| gist.matches(&needle) || !gist.has_complete_content())
            .collect();

        let enriched = self.enrich_missing_content(candidates, credential).await;

        // Pass 2: the membership decision is made once, here, over the
        // enriched set. Candidates kept only to obtain enrichment drop out.
        let results: Vec<GistSummary> = enriched
            .into_iter()
            .filter(|gist| gist.matches(&needle))
            .collect();
        debug!("Search '{}': {} results", query, results.len());

        Ok(results)
    }

    /// Fetch full content for every gist with a content-less file.
    ///
    /// Fetches for distinct gists run concurrently and are all joined before
    /// returning. A failed fetch keeps the original summary: that gist stays
    /// eligible for metadata matching but never matches on content.
    async fn enrich_missing_content(
        &self,
        gists: Vec<GistSummary>,
        credential: Option<&str>,
    ) -> Vec<GistSummary> {
        let fetches = gists.into_iter().map(|gist| async move {
            if gist.has_complete_content() {
                return gist;
            }
            match self.source.get_gist(&gist.id, credential).await {
                Ok(full) => full,
                Err(e) => {
                    warn!("Failed to fetch content for gist {}: {}", gist.id, e);
                    gist
                }
            }
        });

        // join_all preserves input order, so source ordering survives.
        future::join_all(fetches).await
    }
}
