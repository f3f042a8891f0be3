use serde::Deserialize;
use std::collections::HashMap;

/// Envelope of a product info response:
/// `{"status": "success", "data": {"440": {"common": {"clienticon": "..."}}}}`.
#[derive(Debug, Deserialize)]
pub struct ProductInfoResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    data: HashMap<String, AppInfo>,
}

impl ProductInfoResponse {
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn app(&self, game_id: u64) -> Option<&AppInfo> {
        self.data.get(&game_id.to_string())
    }
}

#[derive(Debug, Deserialize)]
pub struct AppInfo {
    #[serde(default)]
    common: Option<CommonSection>,
}

impl AppInfo {
    /// Client icon hash, if the app has one.
    pub fn client_icon(&self) -> Option<&str> {
        self.common
            .as_ref()
            .and_then(|c| c.clienticon.as_deref())
            .map(str::trim)
            .filter(|icon| !icon.is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct CommonSection {
    #[serde(default)]
    clienticon: Option<String>,
}
