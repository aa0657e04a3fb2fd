//! gistd-core - Gist API client and search aggregation.
//!
//! This crate provides the typed GitHub Gist client and the search
//! aggregation pipeline used by the `gistd` HTTP server. It can be used
//! programmatically without the HTTP layer.
//!
//! # Example
//!
//! ```rust,ignore
//! use gistd_core::{GistClient, SearchAggregator, Settings};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> gistd_core::Result<()> {
//!     let client = Arc::new(GistClient::new(&Settings::from_env())?);
//!     let aggregator = SearchAggregator::new(client);
//!
//!     let results = aggregator.search("dotfiles", Some("ghp_token")).await?;
//!     println!("Found {} gists", results.len());
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod github;
pub mod models;
pub mod search;

// Re-export commonly used types
pub use config::{NetworkConfig, Settings};
pub use error::{GistError, Result};
pub use github::{GistClient, GistSource};
pub use models::{FilePatch, GistFile, GistOwner, GistPayload, GistSummary};
pub use search::SearchAggregator;
