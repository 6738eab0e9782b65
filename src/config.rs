//! Editor configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).

use std::net::SocketAddr;
use std::path::PathBuf;

/// Top-level editor configuration.
///
/// Loaded once at startup via [`EditorConfig::from_env`].
#[derive(Debug, Clone)]
pub struct EditorConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// Root directory holding the plugin's YAML configuration
    /// (`shops/*.yml`, `menu.yml`, `purchase.yml`, `sell.yml`, `gui.yml`).
    pub config_dir: PathBuf,

    /// SQLite connection string for the activity log store.
    pub activity_db_url: String,

    /// Master switch for activity log persistence.
    pub activity_persistence_enabled: bool,

    /// Milliseconds of quiet time before a debounced auto-save fires.
    pub autosave_debounce_ms: u64,

    /// Username recorded on audit entries (the auth layer in front of this
    /// service is expected to run a single admin session).
    pub username: String,

    /// Per-request timeout in seconds for the HTTP layer.
    pub request_timeout_secs: u64,
}

impl EditorConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`].
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()?;

        let config_dir = PathBuf::from(
            std::env::var("CONFIG_DIR").unwrap_or_else(|_| "plugin-config".to_string()),
        );

        let activity_db_url = std::env::var("ACTIVITY_DB_URL")
            .unwrap_or_else(|_| "sqlite:activity.db?mode=rwc".to_string());

        let activity_persistence_enabled = parse_env_bool("ACTIVITY_PERSISTENCE_ENABLED", true);
        let autosave_debounce_ms = parse_env("AUTOSAVE_DEBOUNCE_MS", 1_500);
        let username = std::env::var("EDITOR_USERNAME").unwrap_or_else(|_| "admin".to_string());
        let request_timeout_secs = parse_env("REQUEST_TIMEOUT_SECS", 30);

        Ok(Self {
            listen_addr,
            config_dir,
            activity_db_url,
            activity_persistence_enabled,
            autosave_debounce_ms,
            username,
            request_timeout_secs,
        })
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses an environment variable as a boolean. Accepts `"true"`, `"1"`,
/// `"false"`, `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key).ok().as_deref() {
        Some("true") | Some("TRUE") | Some("1") => true,
        Some("false") | Some("FALSE") | Some("0") => false,
        _ => default,
    }
}
