//! Settings loading.
//!
//! Settings come from a JSON file, from JSON held in an environment variable,
//! or fall back to [`Settings::default`]. Loading always validates and
//! normalizes the endpoints.

mod models;

use std::{fs, path::Path};

pub use models::Settings;

/// Environment variable naming a settings file.
pub const CONFIG_PATH_ENV: &str = "STEAM_ICON_FIXER_CONFIG";

/// Environment variable holding the settings JSON itself.
pub const CONFIG_JSON_ENV: &str = "STEAM_ICON_FIXER_SETTINGS";

// ---- Public API (serde hidden from callers) ----

/// Load settings from a JSON file path.
pub fn from_file(path: impl AsRef<Path>) -> Result<Settings, ConfigError> {
    let data = fs::read_to_string(path).map_err(ConfigError::Io)?;
    from_json_str(&data)
}

/// Load settings from a JSON string.
pub fn from_json_str(json: &str) -> Result<Settings, ConfigError> {
    let parsed: Settings = serde_json::from_str(json).map_err(ConfigError::Json)?;
    validate(parsed)
}

/// Load settings from an env var containing JSON.
pub fn from_env_json(var: &str) -> Result<Settings, ConfigError> {
    let s = std::env::var(var).map_err(|_| ConfigError::MissingEnv(var.to_string()))?;
    from_json_str(&s)
}

/// Resolve the settings for a run: an explicit path wins, then the file named
/// by [`CONFIG_PATH_ENV`], then JSON in [`CONFIG_JSON_ENV`], then the defaults.
pub fn load(explicit: Option<&Path>) -> Result<Settings, ConfigError> {
    if let Some(path) = explicit {
        return from_file(path);
    }

    match std::env::var_os(CONFIG_PATH_ENV) {
        Some(path) if !path.is_empty() => from_file(path),
        _ if std::env::var_os(CONFIG_JSON_ENV).is_some() => from_env_json(CONFIG_JSON_ENV),
        _ => validate(Settings::default()),
    }
}

fn validate(mut settings: Settings) -> Result<Settings, ConfigError> {
    settings.icon_base_url = normalize_base_url("icon_base_url", &settings.icon_base_url)?;
    settings.lookup_url = normalize_base_url("lookup_url", &settings.lookup_url)?;
    settings.concurrency = settings.concurrency.max(1);

    if settings.request_timeout_secs == 0 {
        return Err(ConfigError::Invalid {
            field: "request_timeout_secs",
            reason: "must be greater than zero".to_string(),
        });
    }

    Ok(settings)
}

/// Both endpoints get path segments appended, so they must end in `/`.
fn normalize_base_url(field: &'static str, raw: &str) -> Result<String, ConfigError> {
    let parsed = url::Url::parse(raw.trim()).map_err(|e| ConfigError::Invalid {
        field,
        reason: format!("'{raw}' is not a valid URL: {e}"),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid {
            field,
            reason: format!("'{raw}' must use http or https"),
        });
    }

    let mut normalized: String = parsed.into();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    Ok(normalized)
}

/// ---- Errors ----
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("missing env var: {0}")]
    MissingEnv(String),
    #[error("invalid setting '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
