//! XDG desktop entries (`.desktop`), the Linux launcher format.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use image::ImageFormat;
use regex::{NoExpand, Regex};
use tracing::debug;

use super::{
    IconDirectory, PersistError, ShortcutPlatform, check_icon_presence, find_field, find_rungameid, parse_game_id,
    read_shortcut_text,
};
use crate::shortcut::{ParseOutcome, RepairItem, ShortcutCandidate, SkipReason};

const SHORTCUT_EXTENSION: &str = "desktop";
const ICON_EXTENSION: &str = ".ico";
const STORED_ICON_PREFIX: &str = "steamicon_";

/// `Icon=steam` is the theme placeholder Steam writes; it never names a file.
const STEAM_ICON_PLACEHOLDER: &str = "steam";

const USAGE: &str = "\
Usage:
  steam-icon-fixer <path to shortcuts> [path to icons]

Examples:
  steam-icon-fixer ~/Desktop
  steam-icon-fixer \"~/Desktop/Steam Games\"
  steam-icon-fixer ~/.local/share/applications $HOME/.icons
  steam-icon-fixer /usr/share/applications/ /usr/share/pixmaps

Errors & Exit Codes:
  <path> does not exist. (exit code 1): The specified directory does not exist.
  <path> is a file. (exit code 2): The specified path is not a directory.
  Invalid configuration (exit code 3)
  Repair run failed (exit code 4): e.g. the icon directory could not be created.
  Incompatible operating system (exit code 100)";

fn header_regex() -> &'static Regex {
    static HEADER_RE: OnceLock<Regex> = OnceLock::new();
    HEADER_RE.get_or_init(|| Regex::new(r"(?mR)^\[Desktop Entry\][ \t]*$").expect("invalid desktop entry header regex"))
}

fn icon_regex() -> &'static Regex {
    static ICON_RE: OnceLock<Regex> = OnceLock::new();
    ICON_RE.get_or_init(|| Regex::new(r"(?mR)^Icon=(?P<value>.*)$").expect("invalid desktop entry icon regex"))
}

#[derive(Debug, Clone)]
pub struct DesktopEntryPlatform {
    default_icon_dir: Option<PathBuf>,
}

impl DesktopEntryPlatform {
    /// Icons default to `$HOME/.icons`.
    pub fn new() -> Self {
        Self {
            default_icon_dir: dirs::home_dir().map(|home| home.join(".icons")),
        }
    }

    #[cfg(test)]
    pub fn with_default_icon_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            default_icon_dir: Some(dir.into()),
        }
    }

    fn classify(&self, contents: &str, path: &Path) -> ParseOutcome {
        if !header_regex().is_match(contents) {
            return ParseOutcome::Skipped(SkipReason::InvalidFormat);
        }

        let (Some(raw_id), Some(icon_ref)) = (find_rungameid(contents), find_field(icon_regex(), contents)) else {
            return ParseOutcome::Skipped(SkipReason::NotSteamShortcut);
        };

        if icon_ref != STEAM_ICON_PLACEHOLDER
            && let Some(reason) = check_icon_presence(icon_ref)
        {
            return ParseOutcome::Skipped(reason);
        }

        let Some(game_id) = parse_game_id(raw_id) else {
            return ParseOutcome::Skipped(SkipReason::NotSteamShortcut);
        };

        ParseOutcome::Ready(ShortcutCandidate::new(game_id, icon_ref, None, path))
    }
}

impl Default for DesktopEntryPlatform {
    fn default() -> Self {
        Self::new()
    }
}

/// Replace the value of every `Icon=` line, leaving all other lines and the
/// line endings untouched.
pub(crate) fn rewrite_icon_lines(contents: &str, stored: &Path) -> String {
    let replacement = format!("Icon={}", stored.display());
    icon_regex().replace_all(contents, NoExpand(&replacement)).into_owned()
}

impl ShortcutPlatform for DesktopEntryPlatform {
    fn shortcut_kind(&self) -> &'static str {
        "desktop shortcut"
    }

    fn usage(&self) -> &'static str {
        USAGE
    }

    fn icon_extension(&self) -> &'static str {
        ICON_EXTENSION
    }

    fn is_shortcut(&self, path: &Path) -> bool {
        path.extension().is_some_and(|ext| ext == SHORTCUT_EXTENSION)
    }

    fn resolve_icon_directory(&self, requested: Option<&Path>) -> io::Result<IconDirectory> {
        let dir = match requested.filter(|p| !p.as_os_str().is_empty()) {
            Some(path) => path.to_path_buf(),
            None => self.default_icon_dir.clone().ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, "could not determine the home directory for $HOME/.icons")
            })?,
        };

        if !dir.exists() {
            debug!("Creating icon directory {}", dir.display());
            fs::create_dir_all(&dir)?;
        }

        Ok(IconDirectory::Shared(dir))
    }

    fn parse_shortcut(&self, path: &Path) -> io::Result<ParseOutcome> {
        let contents = read_shortcut_text(path)?;
        Ok(self.classify(&contents, path))
    }

    fn persist_icon(&self, item: &RepairItem, bytes: &[u8], dir: &IconDirectory) -> Result<PathBuf, PersistError> {
        let target_dir = match dir {
            IconDirectory::Shared(path) => path.clone(),
            IconDirectory::Declared => item
                .source_shortcut_path()
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
        };

        let image = image::load_from_memory(bytes)?;
        let save_path = target_dir.join(format!("{STORED_ICON_PREFIX}{}.png", item.icon_token_stem()));
        image.save_with_format(&save_path, ImageFormat::Png)?;

        let absolute = fs::canonicalize(&save_path).map_err(|source| PersistError::Io {
            path: save_path.clone(),
            source,
        })?;
        debug!("Stored icon for {} at {}", item.game_id(), absolute.display());

        Ok(absolute)
    }

    fn rewrite_shortcut(&self, item: &RepairItem, _search_root: &Path, stored: &Path) -> io::Result<()> {
        let shortcut = item.source_shortcut_path();
        let contents = fs::read_to_string(shortcut)?;
        fs::write(shortcut, rewrite_icon_lines(&contents, stored))
    }
}
