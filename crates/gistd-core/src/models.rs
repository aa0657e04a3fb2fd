//! Gist API response and request payload types.
//!
//! These mirror the wire shapes of the upstream Gist REST API. A listing
//! response may omit per-file `content`; only a single-gist fetch is
//! guaranteed content-complete, which is why [`GistFile::content`] is
//! optional and [`GistSummary::has_complete_content`] exists.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single file within a gist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GistFile {
    pub filename: String,
    /// Declared language; upstream may omit it or send a "Plain Text" sentinel.
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub raw_url: Option<String>,
    /// Inline file content. Absent in bulk listings for large files.
    #[serde(default)]
    pub content: Option<String>,
}

/// Owner of a gist. Absent for anonymous gists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GistOwner {
    pub login: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// A gist as returned by the upstream API.
///
/// Treated as an immutable value fetched per request; nothing here is
/// persisted or cached across requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GistSummary {
    pub id: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub owner: Option<GistOwner>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub html_url: Option<String>,
    /// Files keyed by filename (unique within a gist).
    #[serde(default)]
    pub files: BTreeMap<String, GistFile>,
}

impl GistSummary {
    /// True iff every file carries inline content.
    ///
    /// Vacuously true for a gist with zero files, which can then only match
    /// on its description.
    pub fn has_complete_content(&self) -> bool {
        self.files.values().all(|f| f.content.is_some())
    }

    /// Case-insensitive substring match over description and filenames.
    ///
    /// `needle` must already be lowercased.
    pub fn matches_metadata(&self, needle: &str) -> bool {
        if let Some(description) = &self.description {
            if description.to_lowercase().contains(needle) {
                return true;
            }
        }
        self.files
            .keys()
            .any(|filename| filename.to_lowercase().contains(needle))
    }

    /// Full match: description, any filename, or any file's inline content.
    ///
    /// Files without inline content never contribute a content match; they
    /// are simply skipped.
    pub fn matches(&self, needle: &str) -> bool {
        if self.matches_metadata(needle) {
            return true;
        }
        self.files.values().any(|f| {
            f.content
                .as_ref()
                .is_some_and(|c| c.to_lowercase().contains(needle))
        })
    }
}

/// File entry in a create/update payload.
///
/// On update, `content` replaces the file's content and `filename` renames
/// it. A `null` entry in [`GistPayload::files`] deletes the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

/// Request body for creating or updating a gist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GistPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub public: bool,
    pub files: BTreeMap<String, Option<FilePatch>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gist_from_json(json: &str) -> GistSummary {
        serde_json::from_str(json).unwrap()
    }

    const LISTING_ENTRY: &str = r#"{
        "id": "aa5a315d61ae9438b18d",
        "description": "Hello World Examples",
        "public": true,
        "created_at": "2010-04-14T02:15:15Z",
        "updated_at": "2011-06-20T11:34:15Z",
        "html_url": "https://gist.github.com/aa5a315d61ae9438b18d",
        "owner": { "login": "octocat", "avatar_url": "https://example.com/a.png" },
        "files": {
            "hello_world.rb": {
                "filename": "hello_world.rb",
                "language": "Ruby",
                "raw_url": "https://gist.githubusercontent.com/raw/hello_world.rb",
                "size": 167
            }
        }
    }"#;

    #[test]
    fn test_deserialize_listing_entry_without_content() {
        let gist = gist_from_json(LISTING_ENTRY);
        assert_eq!(gist.id, "aa5a315d61ae9438b18d");
        assert_eq!(gist.owner.as_ref().unwrap().login, "octocat");
        assert!(!gist.has_complete_content());
        assert!(gist.files["hello_world.rb"].content.is_none());
    }

    #[test]
    fn test_null_description_and_missing_owner() {
        let gist = gist_from_json(
            r#"{
                "id": "x",
                "description": null,
                "created_at": "2020-01-01T00:00:00Z",
                "updated_at": "2020-01-01T00:00:00Z",
                "files": {}
            }"#,
        );
        assert!(gist.description.is_none());
        assert!(gist.owner.is_none());
        // Zero files: content is vacuously complete, only description can match.
        assert!(gist.has_complete_content());
        assert!(!gist.matches("anything"));
    }

    #[test]
    fn test_matches_metadata_case_insensitive() {
        let gist = gist_from_json(LISTING_ENTRY);
        assert!(gist.matches_metadata("hello world ex"));
        assert!(gist.matches_metadata("HELLO_WORLD.RB".to_lowercase().as_str()));
        assert!(!gist.matches_metadata("python"));
    }

    #[test]
    fn test_matches_content_only_when_inlined() {
        let mut gist = gist_from_json(LISTING_ENTRY);
        assert!(!gist.matches("puts"));

        gist.files.get_mut("hello_world.rb").unwrap().content =
            Some("puts \"Hello World\"".to_string());
        assert!(gist.has_complete_content());
        assert!(gist.matches("puts"));
        assert!(gist.matches("hello world\""));
    }

    #[test]
    fn test_payload_serializes_null_file_for_deletion() {
        let mut files = BTreeMap::new();
        files.insert("old.txt".to_string(), None);
        files.insert(
            "new.txt".to_string(),
            Some(FilePatch {
                content: Some("hi".to_string()),
                filename: None,
            }),
        );
        let payload = GistPayload {
            description: Some("updated".to_string()),
            public: false,
            files,
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert!(json["files"]["old.txt"].is_null());
        assert_eq!(json["files"]["new.txt"]["content"], "hi");
        assert!(json["files"]["new.txt"].get("filename").is_none());
    }
}
