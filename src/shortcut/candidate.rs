use std::path::PathBuf;

/// A shortcut that passed every validity check but whose icon token may not be
/// known yet.
///
/// Desktop entries only carry the game id, so the icon name has to be looked
/// up. Internet shortcuts already name the icon file in `IconFile=`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutCandidate {
    game_id: String,
    original_icon_ref: String,
    icon_name: Option<String>,
    source_shortcut_path: PathBuf,
}

impl ShortcutCandidate {
    pub fn new(
        game_id: impl Into<String>,
        original_icon_ref: impl Into<String>,
        icon_name: Option<String>,
        source_shortcut_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            game_id: game_id.into(),
            original_icon_ref: original_icon_ref.into(),
            icon_name,
            source_shortcut_path: source_shortcut_path.into(),
        }
    }

    /// Steam app id taken from `steam://rungameid/<id>`.
    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    pub fn original_icon_ref(&self) -> &str {
        &self.original_icon_ref
    }

    /// Icon file name known from the shortcut itself, if the grammar carries one.
    pub fn icon_name(&self) -> Option<&str> {
        self.icon_name.as_deref()
    }

    /// Split into `(game_id, original_icon_ref, source_shortcut_path)`.
    pub(super) fn into_parts(self) -> (String, String, PathBuf) {
        (self.game_id, self.original_icon_ref, self.source_shortcut_path)
    }
}
