//! Client configuration for the outbound collaborators

use serde::{Deserialize, Serialize};

/// Configuration for fetching group pages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Timeout for a page GET in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl FetchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Configuration for the remote group API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API version path segment, e.g. `v2.8`
    #[serde(default = "default_version")]
    pub version: String,

    /// Explicit access token; takes precedence over the app credentials
    #[serde(default)]
    pub access_token: Option<String>,

    #[serde(default)]
    pub client_id: Option<String>,

    #[serde(default)]
    pub client_secret: Option<String>,

    /// Timeout for each API request in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum postings requested from a group feed
    #[serde(default = "default_feed_limit")]
    pub feed_limit: u32,
}

impl Default for GraphApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            version: default_version(),
            access_token: None,
            client_id: None,
            client_secret: None,
            timeout_secs: default_timeout_secs(),
            feed_limit: default_feed_limit(),
        }
    }
}

impl GraphApiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn with_app_credentials(
        mut self,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        self.client_id = Some(client_id.into());
        self.client_secret = Some(client_secret.into());
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Token sent with API requests
    ///
    /// Falls back to an app token (`client_id|client_secret`) when no
    /// explicit token is configured.
    pub fn access_token(&self) -> Option<String> {
        if let Some(token) = self.access_token.as_ref().filter(|t| !t.is_empty()) {
            return Some(token.clone());
        }
        match (&self.client_id, &self.client_secret) {
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => {
                Some(format!("{}|{}", id, secret))
            }
            _ => None,
        }
    }

    /// Versioned API root without a trailing slash
    pub fn api_root(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.version.trim_matches('/')
        )
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("group-loader/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_base_url() -> String {
    "https://graph.facebook.com".to_string()
}

fn default_version() -> String {
    "v2.8".to_string()
}

fn default_feed_limit() -> u32 {
    100
}
