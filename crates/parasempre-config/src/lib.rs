//! Settings and identity persistence for the parasempre CLI.
//!
//! TOML settings file merged with `PARASEMPRE_*` environment variables,
//! plus the file-backed [`FileIdentityStore`] that keeps the RACF token
//! between invocations.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use parasempre_api::TransportConfig;
use parasempre_core::IdentityStore;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize settings: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("settings loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Settings ────────────────────────────────────────────────────────

/// Top-level settings, loadable from `settings.toml` and overridable
/// via `PARASEMPRE_API_BASE` / `PARASEMPRE_TIMEOUT_SECS`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    /// Base URL of the guest-directory API.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self { api_base: default_api_base(), timeout_secs: default_timeout_secs() }
    }
}

fn default_api_base() -> String {
    "http://localhost:8080".into()
}
fn default_timeout_secs() -> u64 {
    30
}

impl Settings {
    /// Reject settings a client could not be built from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api_base.parse::<url::Url>().map_err(|_| ConfigError::Validation {
            field: "api_base".into(),
            reason: format!("invalid URL: {}", self.api_base),
        })?;
        if self.timeout_secs == 0 {
            return Err(ConfigError::Validation {
                field: "timeout_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }

    pub fn transport_config(&self) -> TransportConfig {
        TransportConfig { timeout: Duration::from_secs(self.timeout_secs) }
    }
}

// ── File paths ──────────────────────────────────────────────────────

/// Resolve the settings file path via XDG / platform conventions.
pub fn settings_path() -> PathBuf {
    config_dir().join("settings.toml")
}

/// Resolve the identity token file path.
pub fn identity_path() -> PathBuf {
    config_dir().join("identity")
}

fn config_dir() -> PathBuf {
    ProjectDirs::from("com", "parasempre", "parasempre")
        .map_or_else(dirs_fallback, |dirs| dirs.config_dir().to_path_buf())
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("parasempre");
    p
}

// ── Settings loading / saving ───────────────────────────────────────

/// Load settings from file + environment, on top of the defaults.
pub fn load_settings() -> Result<Settings, ConfigError> {
    load_settings_from(&settings_path())
}

/// Same as [`load_settings`], reading a specific file.
pub fn load_settings_from(path: &std::path::Path) -> Result<Settings, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Settings::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("PARASEMPRE_"));

    let settings: Settings = figment.extract()?;
    Ok(settings)
}

/// Serialize settings to TOML at the canonical path.
pub fn save_settings(settings: &Settings) -> Result<(), ConfigError> {
    let path = settings_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(settings)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── Identity persistence ────────────────────────────────────────────

/// File-backed identity store: the token lives alone in a small file
/// under the config directory, mirroring how a browser would keep it
/// in local storage.
#[derive(Debug)]
pub struct FileIdentityStore {
    path: PathBuf,
}

impl FileIdentityStore {
    /// Store at the canonical per-user path.
    pub fn new() -> Self {
        Self { path: identity_path() }
    }

    /// Store at an explicit path (tests, alternate homes).
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl Default for FileIdentityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityStore for FileIdentityStore {
    fn load(&self) -> std::io::Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => {
                let token = raw.trim();
                Ok(if token.is_empty() { None } else { Some(token.to_owned()) })
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn save(&self, token: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, format!("{token}\n"))
    }

    fn clear(&self) -> std::io::Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_localhost() {
        let settings = Settings::default();
        assert_eq!(settings.api_base, "http://localhost:8080");
        assert_eq!(settings.timeout_secs, 30);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn file_values_override_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "settings.toml",
                r#"
                    api_base = "https://convites.example.com"
                    timeout_secs = 5
                "#,
            )?;
            let settings = load_settings_from(std::path::Path::new("settings.toml")).unwrap();
            assert_eq!(settings.api_base, "https://convites.example.com");
            assert_eq!(settings.timeout_secs, 5);
            Ok(())
        });
    }

    #[test]
    fn environment_overrides_the_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("settings.toml", r#"api_base = "https://file.example.com""#)?;
            jail.set_env("PARASEMPRE_API_BASE", "https://env.example.com");
            let settings = load_settings_from(std::path::Path::new("settings.toml")).unwrap();
            assert_eq!(settings.api_base, "https://env.example.com");
            Ok(())
        });
    }

    #[test]
    fn invalid_api_base_is_rejected() {
        let settings = Settings { api_base: "not a url".into(), ..Settings::default() };
        assert!(matches!(settings.validate(), Err(ConfigError::Validation { .. })));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let settings = Settings { timeout_secs: 0, ..Settings::default() };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn transport_config_carries_the_timeout() {
        let settings = Settings { timeout_secs: 7, ..Settings::default() };
        assert_eq!(settings.transport_config().timeout, Duration::from_secs(7));
    }

    #[test]
    fn identity_store_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileIdentityStore::with_path(dir.path().join("identity"));

        assert_eq!(store.load().unwrap(), None);
        store.save("AB123").unwrap();
        assert_eq!(store.load().unwrap(), Some("AB123".to_owned()));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        // Clearing twice is fine.
        store.clear().unwrap();
    }

    #[test]
    fn identity_store_ignores_surrounding_whitespace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("identity");
        std::fs::write(&path, "  AB123\n\n").unwrap();

        let store = FileIdentityStore::with_path(&path);
        assert_eq!(store.load().unwrap(), Some("AB123".to_owned()));
    }
}
