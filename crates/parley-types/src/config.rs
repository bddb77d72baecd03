//! Client configuration types for Parley.
//!
//! `ClientConfig` represents `parley.toml`, which points the client at the
//! remote interview service and tunes list and chat behavior.

use serde::{Deserialize, Serialize};

/// Top-level client configuration. All fields have sensible defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the remote interview service.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Base URL used when building candidate invite links.
    #[serde(default = "default_candidate_link_base")]
    pub candidate_link_base: String,

    /// Items per page in list views.
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Per-request timeout applied by the HTTP client.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Agent-authored text appended when a message round trip fails.
    #[serde(default = "default_fallback_message")]
    pub fallback_message: String,
}

fn default_api_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_candidate_link_base() -> String {
    "http://localhost:5173".to_string()
}

fn default_page_size() -> usize {
    10
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_fallback_message() -> String {
    "Sorry, something went wrong on our side. Please try sending that again.".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            candidate_link_base: default_candidate_link_base(),
            page_size: default_page_size(),
            request_timeout_secs: default_request_timeout_secs(),
            fallback_message: default_fallback_message(),
        }
    }
}
