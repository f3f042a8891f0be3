//! Steam metadata lookup and icon identity resolution.

mod models;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::helpers::transport::{Transport, TransportError};
use crate::shortcut::{RepairItem, ShortcutCandidate};
use models::ProductInfoResponse;

#[derive(thiserror::Error, Debug)]
pub enum LookupError {
    #[error("'{0}' is not a numeric Steam app id")]
    InvalidIdentifier(String),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("lookup for app {game_id} returned HTTP {status}")]
    Status { game_id: u64, status: u16 },
    #[error("malformed lookup response for app {game_id}: {source}")]
    Malformed {
        game_id: u64,
        #[source]
        source: serde_json::Error,
    },
    #[error("app {0} has no client icon")]
    MissingClientIcon(u64),
}

/// Game metadata collaborator: maps an app id to its client icon token.
#[async_trait]
pub trait MetadataLookup: Send + Sync {
    async fn client_icon(&self, game_id: u64) -> Result<String, LookupError>;
}

/// Looks app metadata up on a public product info API
/// (`GET {endpoint}{game_id}`).
pub struct SteamCmdLookup {
    transport: Arc<dyn Transport>,
    endpoint: String,
}

impl SteamCmdLookup {
    /// `endpoint` must end in `/`; settings loading guarantees that.
    pub fn new(transport: Arc<dyn Transport>, endpoint: impl Into<String>) -> Self {
        Self {
            transport,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl MetadataLookup for SteamCmdLookup {
    async fn client_icon(&self, game_id: u64) -> Result<String, LookupError> {
        let url = format!("{}{game_id}", self.endpoint);
        let response = self.transport.fetch(&url).await?;

        if !response.is_success() {
            return Err(LookupError::Status {
                game_id,
                status: response.status(),
            });
        }

        let info: ProductInfoResponse =
            serde_json::from_slice(response.bytes()).map_err(|source| LookupError::Malformed { game_id, source })?;
        debug!("Lookup for app {game_id} returned status {:?}", info.status());

        info.app(game_id)
            .and_then(|app| app.client_icon())
            .map(str::to_string)
            .ok_or(LookupError::MissingClientIcon(game_id))
    }
}

/// Turns validated shortcuts into repair items with a concrete icon token.
pub struct IconResolver<'a> {
    lookup: &'a dyn MetadataLookup,
    icon_extension: &'a str,
}

impl<'a> IconResolver<'a> {
    pub fn new(lookup: &'a dyn MetadataLookup, icon_extension: &'a str) -> Self {
        Self { lookup, icon_extension }
    }

    /// Shortcuts that already name their icon skip the lookup entirely.
    pub async fn resolve(&self, candidate: ShortcutCandidate) -> Result<RepairItem, LookupError> {
        if let Some(name) = candidate.icon_name().map(str::to_string) {
            return Ok(RepairItem::from_candidate(candidate, name));
        }

        let game_id: u64 = candidate
            .game_id()
            .parse()
            .map_err(|_| LookupError::InvalidIdentifier(candidate.game_id().to_string()))?;

        let client_icon = self.lookup.client_icon(game_id).await?;
        let token = format!("{client_icon}{}", self.icon_extension);

        Ok(RepairItem::from_candidate(candidate, token))
    }
}
