use std::fmt;

use super::ShortcutCandidate;

/// Why a shortcut was left alone during discovery. None of these are retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    InvalidFormat,
    NotSteamShortcut,
    AlreadyPresent,
    UnfixableManualIntervention,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::InvalidFormat => "invalid format",
            SkipReason::NotSteamShortcut => "not a Steam shortcut",
            SkipReason::AlreadyPresent => "icon already present",
            SkipReason::UnfixableManualIntervention => "needs manual intervention",
        }
    }

    /// Operator-facing explanation printed next to the file name.
    pub fn describe(&self, shortcut_kind: &str) -> String {
        match self {
            SkipReason::InvalidFormat => format!("File is not a valid {shortcut_kind}. Skipping."),
            SkipReason::NotSteamShortcut => "Shortcut doesn't appear to be a Steam shortcut. Skipping.".to_string(),
            SkipReason::AlreadyPresent => "Icon file is present, nothing needs to be done. Skipping.".to_string(),
            SkipReason::UnfixableManualIntervention => {
                "Icon path is a directory. This error must be fixed manually. Skipping.".to_string()
            }
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal state of the shortcut validity checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Ready(ShortcutCandidate),
    Skipped(SkipReason),
}
