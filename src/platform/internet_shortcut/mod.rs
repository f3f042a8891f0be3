//! Windows internet shortcuts (`.url`), as created by the Steam client.
//!
//! Steam points `IconFile=` at `<Steam>\steam\games\<token>.ico`. Once that
//! file exists again Windows picks it up, so the shortcut itself is never
//! rewritten.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use super::{
    IconDirectory, PersistError, ShortcutPlatform, check_icon_presence, find_field, find_rungameid, parse_game_id,
    read_shortcut_text,
};
use crate::shortcut::{ParseOutcome, RepairItem, ShortcutCandidate, SkipReason};

const SHORTCUT_EXTENSION: &str = "url";

const USAGE: &str = "\
Usage:
  steam-icon-fixer.exe <path to shortcuts>

Examples:
  steam-icon-fixer.exe C:\\Users\\user\\Desktop
  steam-icon-fixer.exe \"C:\\Users\\user\\Desktop\\Steam Games\"
  steam-icon-fixer.exe \"C:\\Users\\user\\AppData\\Roaming\\Microsoft\\Windows\\Start Menu\\Programs\\Steam\"

Errors & Exit Codes:
  <path> does not exist. (exit code 1): The specified directory does not exist.
  <path> is a file. (exit code 2): The specified path is not a directory.
  Invalid configuration (exit code 3)
  Repair run failed (exit code 4): e.g. the icon directory could not be created.
  Incompatible operating system (exit code 100)";

fn header_regex() -> &'static Regex {
    static HEADER_RE: OnceLock<Regex> = OnceLock::new();
    HEADER_RE
        .get_or_init(|| Regex::new(r"(?mR)^\[InternetShortcut\][ \t]*$").expect("invalid internet shortcut header regex"))
}

fn icon_file_regex() -> &'static Regex {
    static ICON_FILE_RE: OnceLock<Regex> = OnceLock::new();
    ICON_FILE_RE
        .get_or_init(|| Regex::new(r"(?mR)^IconFile=(?P<value>.*)$").expect("invalid internet shortcut icon regex"))
}

/// Last backslash-delimited segment of a Windows path, e.g. `abc.ico` from
/// `C:\Steam\steam\games\abc.ico`. A reference without a backslash has no
/// usable icon name.
pub(crate) fn icon_name_from_ref(icon_ref: &str) -> Option<&str> {
    icon_ref
        .trim_end()
        .rsplit_once('\\')
        .map(|(_, name)| name)
        .filter(|name| !name.is_empty())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InternetShortcutPlatform;

impl InternetShortcutPlatform {
    fn classify(&self, contents: &str, path: &Path) -> ParseOutcome {
        if !header_regex().is_match(contents) {
            return ParseOutcome::Skipped(SkipReason::InvalidFormat);
        }

        let (Some(raw_id), Some(icon_ref)) = (find_rungameid(contents), find_field(icon_file_regex(), contents)) else {
            return ParseOutcome::Skipped(SkipReason::NotSteamShortcut);
        };

        if let Some(reason) = check_icon_presence(icon_ref) {
            return ParseOutcome::Skipped(reason);
        }

        let (Some(game_id), Some(icon_name)) = (parse_game_id(raw_id), icon_name_from_ref(icon_ref)) else {
            return ParseOutcome::Skipped(SkipReason::NotSteamShortcut);
        };

        ParseOutcome::Ready(ShortcutCandidate::new(
            game_id,
            icon_ref,
            Some(icon_name.to_string()),
            path,
        ))
    }
}

impl ShortcutPlatform for InternetShortcutPlatform {
    fn shortcut_kind(&self) -> &'static str {
        "internet shortcut"
    }

    fn usage(&self) -> &'static str {
        USAGE
    }

    fn icon_extension(&self) -> &'static str {
        ".ico"
    }

    fn is_shortcut(&self, path: &Path) -> bool {
        path.extension().is_some_and(|ext| ext == SHORTCUT_EXTENSION)
    }

    fn resolve_icon_directory(&self, requested: Option<&Path>) -> io::Result<IconDirectory> {
        if let Some(path) = requested.filter(|p| !p.as_os_str().is_empty()) {
            debug!("Ignoring icon directory {}; internet shortcuts declare their own icon path", path.display());
        }
        Ok(IconDirectory::Declared)
    }

    fn parse_shortcut(&self, path: &Path) -> io::Result<ParseOutcome> {
        let contents = read_shortcut_text(path)?;
        Ok(self.classify(&contents, path))
    }

    fn persist_icon(&self, item: &RepairItem, bytes: &[u8], _dir: &IconDirectory) -> Result<PathBuf, PersistError> {
        let target = PathBuf::from(item.original_icon_ref().trim_end());
        let io_err = |source| PersistError::Io {
            path: target.clone(),
            source,
        };

        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(&target, bytes).map_err(io_err)?;

        std::path::absolute(&target).map_err(io_err)
    }

    fn rewrite_shortcut(&self, _item: &RepairItem, _search_root: &Path, _stored: &Path) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::write_shortcut;
    use tempfile::TempDir;

    #[test]
    fn recognizes_url_extension_only() {
        assert!(InternetShortcutPlatform.is_shortcut(Path::new("Team Fortress 2.url")));
        assert!(!InternetShortcutPlatform.is_shortcut(Path::new("Team Fortress 2.lnk")));
    }

    #[test]
    fn icon_name_is_last_segment() {
        assert_eq!(
            icon_name_from_ref(r"C:\Program Files (x86)\Steam\steam\games\abc123.ico"),
            Some("abc123.ico")
        );
        assert_eq!(icon_name_from_ref("abc123.ico"), None);
        assert_eq!(icon_name_from_ref(r"C:\games\"), None);
    }

    #[test]
    fn missing_header_is_invalid_format() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_shortcut(
            temp_dir.path(),
            "a.url",
            "URL=steam://rungameid/440\r\nIconFile=C:\\Steam\\games\\tf.ico\r\n",
        );

        assert_eq!(
            InternetShortcutPlatform.parse_shortcut(&path).unwrap(),
            ParseOutcome::Skipped(SkipReason::InvalidFormat)
        );
    }

    #[test]
    fn missing_icon_file_is_not_steam() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_shortcut(temp_dir.path(), "a.url", "[InternetShortcut]\r\nURL=steam://rungameid/440\r\n");

        assert_eq!(
            InternetShortcutPlatform.parse_shortcut(&path).unwrap(),
            ParseOutcome::Skipped(SkipReason::NotSteamShortcut)
        );
    }

    #[test]
    fn web_link_is_not_steam() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_shortcut(
            temp_dir.path(),
            "a.url",
            "[InternetShortcut]\r\nURL=https://example.com/\r\nIconFile=C:\\icons\\site.ico\r\n",
        );

        assert_eq!(
            InternetShortcutPlatform.parse_shortcut(&path).unwrap(),
            ParseOutcome::Skipped(SkipReason::NotSteamShortcut)
        );
    }

    #[test]
    fn icon_ref_without_backslash_is_not_steam() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_shortcut(
            temp_dir.path(),
            "a.url",
            "[InternetShortcut]\r\nURL=steam://rungameid/440\r\nIconFile=missing.ico\r\n",
        );

        assert_eq!(
            InternetShortcutPlatform.parse_shortcut(&path).unwrap(),
            ParseOutcome::Skipped(SkipReason::NotSteamShortcut)
        );
    }

    #[test]
    fn existing_icon_file_is_already_present() {
        let temp_dir = TempDir::new().unwrap();
        let icon = temp_dir.path().join("tf.ico");
        fs::write(&icon, "ico").unwrap();
        let path = write_shortcut(
            temp_dir.path(),
            "a.url",
            &format!("[InternetShortcut]\r\nURL=steam://rungameid/440\r\nIconFile={}\r\n", icon.display()),
        );

        assert_eq!(
            InternetShortcutPlatform.parse_shortcut(&path).unwrap(),
            ParseOutcome::Skipped(SkipReason::AlreadyPresent)
        );
    }

    #[test]
    fn steam_shortcut_is_ready_with_icon_name() {
        let temp_dir = TempDir::new().unwrap();
        let icon_ref = r"C:\Program Files (x86)\Steam\steam\games\e3f375e78ef1f5bb8b9d3c3a43a7aeb0.ico";
        let path = write_shortcut(
            temp_dir.path(),
            "Team Fortress 2.url",
            &format!("[{{000214A0-0000-0000-C000-000000000046}}]\r\nProp3=19,0\r\n[InternetShortcut]\r\nIDList=\r\nIconIndex=0\r\nURL=steam://rungameid/440\r\nIconFile={icon_ref}\r\n"),
        );

        assert_eq!(
            InternetShortcutPlatform.parse_shortcut(&path).unwrap(),
            ParseOutcome::Ready(ShortcutCandidate::new(
                "440",
                icon_ref,
                Some("e3f375e78ef1f5bb8b9d3c3a43a7aeb0.ico".to_string()),
                &path,
            ))
        );
    }

    #[test]
    fn ansi_encoded_shortcut_is_still_parsed() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("Pokemon.url");
        let mut contents = b"[InternetShortcut]\r\n; Pok".to_vec();
        contents.push(0xE9);
        contents.extend_from_slice(b"mon\r\nURL=steam://rungameid/440\r\nIconFile=C:\\Steam\\steam\\games\\abc.ico\r\n");
        fs::write(&path, contents).unwrap();

        assert_eq!(
            InternetShortcutPlatform.parse_shortcut(&path).unwrap(),
            ParseOutcome::Ready(ShortcutCandidate::new(
                "440",
                r"C:\Steam\steam\games\abc.ico",
                Some("abc.ico".to_string()),
                &path,
            ))
        );
    }

    #[test]
    fn persist_writes_bytes_to_declared_path() {
        let temp_dir = TempDir::new().unwrap();
        let declared = temp_dir.path().join("steam").join("games").join("tf.ico");
        let candidate = ShortcutCandidate::new("440", declared.to_str().unwrap(), Some("tf.ico".to_string()), "a.url");
        let item = RepairItem::from_candidate(candidate, "tf.ico");

        let stored = InternetShortcutPlatform
            .persist_icon(&item, b"icon-bytes", &IconDirectory::Declared)
            .unwrap();

        assert_eq!(stored, declared);
        assert_eq!(fs::read(&declared).unwrap(), b"icon-bytes");
    }

    #[test]
    fn icon_directory_is_declared() {
        assert_eq!(
            InternetShortcutPlatform.resolve_icon_directory(Some(Path::new("C:\\icons"))).unwrap(),
            IconDirectory::Declared
        );
    }
}
