use std::path::{Path, PathBuf};

use super::ShortcutCandidate;

/// One Steam shortcut whose icon is missing and whose icon token has been
/// resolved. Only these reach the executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairItem {
    game_id: String,
    original_icon_ref: String,
    icon_token: String,
    source_shortcut_path: PathBuf,
}

impl RepairItem {
    /// Promote a candidate once its icon token is known.
    pub fn from_candidate(candidate: ShortcutCandidate, icon_token: impl Into<String>) -> Self {
        let (game_id, original_icon_ref, source_shortcut_path) = candidate.into_parts();

        Self {
            game_id,
            original_icon_ref,
            icon_token: icon_token.into(),
            source_shortcut_path,
        }
    }

    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    /// Icon reference as written in the shortcut before the repair.
    /// May be a placeholder such as `steam` rather than a path.
    pub fn original_icon_ref(&self) -> &str {
        &self.original_icon_ref
    }

    /// File name of the icon on the Steam image host, e.g. `3a0f...c1.ico`.
    pub fn icon_token(&self) -> &str {
        &self.icon_token
    }

    /// Token without its extension; used to name the stored PNG.
    pub fn icon_token_stem(&self) -> &str {
        Path::new(&self.icon_token)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.icon_token)
    }

    pub fn source_shortcut_path(&self) -> &Path {
        &self.source_shortcut_path
    }
}
