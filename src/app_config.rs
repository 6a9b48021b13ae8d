//! Application state directory and `config.json` handling.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Environment variable overriding the state directory.
pub const STATE_DIR_ENV: &str = "SCIMON_HOME";

/// State directory name under the home directory.
pub const STATE_DIR_NAME: &str = ".scimon";

/// Monitored list file inside the state directory.
pub const MONITORED_FILE_NAME: &str = "doi_urls.txt";

/// Configuration file inside the state directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Webhook value written into a freshly created config; treated as unset.
pub const PLACEHOLDER_WEBHOOK: &str = "https://discord.com/api/webhooks/YOUR_WEBHOOK_URL";

/// Contents of `config.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Discord-compatible webhook URL.
    #[serde(default)]
    pub discord_webhook: String,
}

impl AppConfig {
    /// Config written when none exists yet.
    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            discord_webhook: PLACEHOLDER_WEBHOOK.to_string(),
        }
    }

    /// Webhook URL, unless empty or still the placeholder.
    #[must_use]
    pub fn webhook_url(&self) -> Option<&str> {
        let url = self.discord_webhook.trim();
        (!url.is_empty() && url != PLACEHOLDER_WEBHOOK).then_some(url)
    }
}

/// Resolves the state directory: explicit flag, then `$SCIMON_HOME`, then `~/.scimon`.
pub fn resolve_state_dir(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(dir) = env_var_non_empty_os(STATE_DIR_ENV) {
        return Some(PathBuf::from(dir));
    }
    let home = env_var_non_empty_os("HOME").or_else(|| env_var_non_empty_os("USERPROFILE"))?;
    Some(PathBuf::from(home).join(STATE_DIR_NAME))
}

fn env_var_non_empty_os(name: &str) -> Option<OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Creates the state directory if needed.
pub fn ensure_state_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Error creating state directory '{}'", dir.display()))
}

/// Loads `config.json`, writing the placeholder config when it is missing.
///
/// A freshly created config carries the placeholder webhook, so notifications
/// stay off until the user edits it.
pub fn load_or_init(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        let placeholder = AppConfig::placeholder();
        let raw = serde_json::to_string_pretty(&placeholder)
            .context("Failed to serialize example config")?;
        fs::write(path, raw + "\n")
            .with_context(|| format!("Error creating example config file '{}'", path.display()))?;
        warn!(path = %path.display(), "config file not found; example config created");
        eprintln!(
            "Warning: Config file not found. An example config file has been created at {}. Please populate it with the necessary arguments.",
            path.display()
        );
        return Ok(placeholder);
    }

    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    let config: AppConfig = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;
    debug!(path = %path.display(), webhook = config.webhook_url().is_some(), "config loaded");
    Ok(config)
}
