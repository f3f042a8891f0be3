use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_ICON_BASE_URL: &str = "https://steamcdn-a.akamaihd.net/steamcommunity/public/images/apps/";
pub const DEFAULT_LOOKUP_URL: &str = "https://api.steamcmd.net/v1/info/";

/// Runtime knobs; every field has a default so an empty JSON object is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Image host the icons are fetched from: `{icon_base_url}{game_id}/{token}`.
    pub(crate) icon_base_url: String,
    /// Product info endpoint queried as `{lookup_url}{game_id}`.
    pub(crate) lookup_url: String,
    pub(crate) request_timeout_secs: u64,
    /// Upper bound on icons fetched at the same time.
    pub(crate) concurrency: usize,
    pub(crate) user_agent: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            icon_base_url: DEFAULT_ICON_BASE_URL.to_string(),
            lookup_url: DEFAULT_LOOKUP_URL.to_string(),
            request_timeout_secs: 30,
            concurrency: 1,
            user_agent: format!("steam-icon-fixer/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Settings {
    // Borrowing getters (no clones).
    pub fn icon_base_url(&self) -> &str {
        &self.icon_base_url
    }

    pub fn lookup_url(&self) -> &str {
        &self.lookup_url
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}
