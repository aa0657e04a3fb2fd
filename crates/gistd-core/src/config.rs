//! Centralized configuration for gistd.

use std::time::Duration;

/// Network-related configuration.
pub struct NetworkConfig;

impl NetworkConfig {
    pub const GITHUB_API_BASE: &'static str = "https://api.github.com";
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
    pub const USER_AGENT: &'static str = "gistd/0.1";
    /// Upstream cap on the gists list page size.
    pub const GISTS_PER_PAGE_MAX: u32 = 100;
}

/// Environment variable overriding the Gist API base URL.
const API_BASE_ENV_VAR: &str = "GISTD_API_BASE";

/// Environment variable holding the shared low-privilege token used for
/// public, unauthenticated search.
const FALLBACK_TOKEN_ENV_VAR: &str = "GISTD_FALLBACK_TOKEN";

/// Runtime settings for the Gist client.
///
/// The fallback token is never compiled in: it must be supplied through the
/// environment (or a CLI flag in the server binary). Public search without a
/// configured fallback token is a configuration error, not a silent
/// substitution.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base URL of the Gist API. Overridable for tests and staging.
    pub api_base: String,
    /// Shared low-privilege token for public-data requests.
    pub fallback_token: Option<String>,
}

impl Settings {
    /// Load settings from the environment.
    pub fn from_env() -> Self {
        Self {
            api_base: read_env(API_BASE_ENV_VAR)
                .unwrap_or_else(|| NetworkConfig::GITHUB_API_BASE.to_string()),
            fallback_token: read_env(FALLBACK_TOKEN_ENV_VAR),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: NetworkConfig::GITHUB_API_BASE.to_string(),
            fallback_token: None,
        }
    }
}

/// Read an environment variable, treating empty/whitespace values as unset.
fn read_env(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(value) => {
            let value = value.trim().to_string();
            if value.is_empty() {
                None
            } else {
                Some(value)
            }
        }
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.api_base, "https://api.github.com");
        assert!(settings.fallback_token.is_none());
    }

    #[test]
    fn test_read_env_treats_blank_as_unset() {
        std::env::set_var("GISTD_TEST_BLANK", "   ");
        assert_eq!(read_env("GISTD_TEST_BLANK"), None);
        std::env::set_var("GISTD_TEST_BLANK", "value");
        assert_eq!(read_env("GISTD_TEST_BLANK"), Some("value".to_string()));
        std::env::remove_var("GISTD_TEST_BLANK");
    }
}
