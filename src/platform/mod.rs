//! Host platform capabilities.
//!
//! Linux launchers use XDG `.desktop` entries, Windows uses `.url` internet
//! shortcuts. Everything the pipeline needs from either is expressed through
//! [`ShortcutPlatform`], and the right implementation is picked once by
//! [`detect`].

pub mod desktop_entry;
pub mod internet_shortcut;

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::shortcut::{ParseOutcome, RepairItem, SkipReason};

pub use desktop_entry::DesktopEntryPlatform;
pub use internet_shortcut::InternetShortcutPlatform;

/// Where repaired icons are stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconDirectory {
    /// Every icon goes into this directory.
    Shared(PathBuf),
    /// Every icon goes to the location its own shortcut declares.
    Declared,
}

impl fmt::Display for IconDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IconDirectory::Shared(path) => write!(f, "{}", path.display()),
            IconDirectory::Declared => f.write_str("<path declared by each shortcut>"),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum PersistError {
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to convert icon: {0}")]
    Image(#[from] image::ImageError),
}

/// Capability set the repair pipeline needs from a host platform.
pub trait ShortcutPlatform: Send + Sync {
    /// Human name of the shortcut format, used in log lines.
    fn shortcut_kind(&self) -> &'static str;

    /// Usage and examples for this platform's command line.
    fn usage(&self) -> &'static str;

    /// Extension appended to a looked-up client icon token.
    fn icon_extension(&self) -> &'static str;

    /// Filename test only; contents are not inspected.
    fn is_shortcut(&self, path: &Path) -> bool;

    /// Pick (and create) the icon output directory. `None` or an empty path
    /// selects the platform default.
    fn resolve_icon_directory(&self, requested: Option<&Path>) -> io::Result<IconDirectory>;

    /// Run the validity checks against one shortcut file.
    ///
    /// Only an unreadable file is an error; every other rejection is a
    /// [`ParseOutcome::Skipped`].
    fn parse_shortcut(&self, path: &Path) -> io::Result<ParseOutcome>;

    /// Store downloaded icon bytes and return the absolute path written.
    fn persist_icon(&self, item: &RepairItem, bytes: &[u8], dir: &IconDirectory) -> Result<PathBuf, PersistError>;

    /// Point the shortcut's icon field at `stored`.
    fn rewrite_shortcut(&self, item: &RepairItem, search_root: &Path, stored: &Path) -> io::Result<()>;
}

/// Select the implementation for the platform this binary was built for.
pub fn detect() -> Option<Box<dyn ShortcutPlatform>> {
    if cfg!(target_os = "linux") {
        Some(Box::new(DesktopEntryPlatform::new()))
    } else if cfg!(target_os = "windows") {
        Some(Box::new(InternetShortcutPlatform))
    } else {
        None
    }
}

fn rungameid_regex() -> &'static Regex {
    static RUNGAMEID_RE: OnceLock<Regex> = OnceLock::new();
    RUNGAMEID_RE.get_or_init(|| Regex::new(r"(?mR)steam://rungameid/(?P<id>.*)$").expect("invalid rungameid regex"))
}

/// Raw value following `steam://rungameid/` up to the end of its line.
pub(crate) fn find_rungameid(contents: &str) -> Option<&str> {
    rungameid_regex().captures(contents).and_then(|caps| caps.name("id")).map(|m| m.as_str())
}

/// Steam app ids are unsigned 64-bit integers; anything else is not ours.
pub(crate) fn parse_game_id(raw: &str) -> Option<String> {
    raw.trim().parse::<u64>().ok().map(|id| id.to_string())
}

/// First value of a `Key=value` field that starts its own line.
pub(crate) fn find_field<'a>(re: &Regex, contents: &'a str) -> Option<&'a str> {
    re.captures(contents).and_then(|caps| caps.name("value")).map(|m| m.as_str())
}

/// Icon presence stage: `Some(reason)` ends validation, `None` means the icon
/// really is missing.
pub(crate) fn check_icon_presence(icon_ref: &str) -> Option<SkipReason> {
    match fs::metadata(icon_ref) {
        Ok(meta) if meta.is_file() => Some(SkipReason::AlreadyPresent),
        Ok(_) => Some(SkipReason::UnfixableManualIntervention),
        Err(_) => None,
    }
}

/// Read shortcut text, tolerating a UTF-8 byte order mark and non-UTF-8
/// bytes. Windows writes `.url` files in the ANSI code page; every field the
/// parsers look at is ASCII, so undecodable bytes are replaced.
pub(crate) fn read_shortcut_text(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    let contents = String::from_utf8_lossy(&bytes);
    Ok(contents.strip_prefix('\u{feff}').unwrap_or(&contents).to_string())
}
