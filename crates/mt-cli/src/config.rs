//! Credential loading and storage.
//!
//! Credentials are layered, highest precedence first:
//! 1. `MITE_ACCOUNT` / `MITE_API_KEY` in the environment
//! 2. the same variables in a `.env` file (never overrides the environment)
//! 3. the credential file written by `mt config` (`~/.mite_config.json`)

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Format, Json, Serialized};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Credential file name, relative to the home directory.
pub const CONFIG_FILE_NAME: &str = ".mite_config.json";

/// Prefix for environment variables (`MITE_ACCOUNT`, `MITE_API_KEY`, `MITE_BASE_URL`).
pub const ENV_PREFIX: &str = "MITE_";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No account or API key in any source.
    #[error(
        "Mite credentials not configured.
Please use one of the following methods:
1. Create a .env file with MITE_ACCOUNT and MITE_API_KEY
2. Set environment variables: MITE_ACCOUNT and MITE_API_KEY
3. Run: mt config --account yourcompany --api-key your-api-key"
    )]
    Missing,
}

/// Application configuration, merged from all sources.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Account subdomain (`<account>.mite.de`).
    #[serde(deserialize_with = "lenient_string")]
    pub account: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub api_key: Option<String>,
    /// Overrides `https://<account>.mite.de`.
    pub base_url: Option<String>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("account", &self.account)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// `MITE_*` variables, kept as raw strings.
///
/// figment's `Env` provider parses values, which would turn an all-digit
/// key like `0123` into the number 123.
#[derive(Debug, Default, Serialize)]
struct EnvOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    account: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    base_url: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        let var = |key: &str| std::env::var(format!("{ENV_PREFIX}{key}")).ok();
        Self {
            account: var("ACCOUNT"),
            api_key: var("API_KEY"),
            base_url: var("BASE_URL"),
        }
    }
}

/// Account and key, both present and non-empty.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub account: String,
    pub api_key: String,
    pub base_url: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("account", &self.account)
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Credentials {
    /// Builds an API client for these credentials.
    pub fn client(&self) -> Result<mt_api::Client, mt_api::ApiError> {
        match &self.base_url {
            Some(base_url) => mt_api::Client::with_base_url(base_url.as_str(), self.api_key.as_str()),
            None => mt_api::Client::new(&self.account, self.api_key.as_str()),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific credential file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::new();

        // Load from default credential file
        if let Some(path) = default_config_path() {
            figment = figment.merge(Json::file(path));
        }

        // Load from specified credential file
        if let Some(path) = config_path {
            figment = figment.merge(Json::file(path));
        }

        // Load from environment variables (MITE_*), including those set by .env
        figment = figment.merge(Serialized::defaults(EnvOverrides::from_env()));

        figment.extract()
    }

    /// Account and API key, or [`ConfigError::Missing`] if either is absent.
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        let present = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        match (present(&self.account), present(&self.api_key)) {
            (Some(account), Some(api_key)) => Ok(Credentials {
                account,
                api_key,
                base_url: present(&self.base_url),
            }),
            _ => Err(ConfigError::Missing),
        }
    }
}

/// Exports variables from a `.env` file in the working directory (or a
/// parent) into the process environment. Variables already set win.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(err) if err.not_found() => {}
        Err(err) => tracing::warn!(%err, "failed to read .env"),
    }
}

/// Returns the credential file path in the home directory.
///
/// On Linux: `~/.mite_config.json`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_FILE_NAME))
}

/// Contents of the credential file.
#[derive(Debug, Serialize)]
struct StoredCredentials<'a> {
    account: &'a str,
    api_key: &'a str,
}

/// Writes the credential file, readable and writable by the owner only.
pub fn save_credentials(path: &Path, account: &str, api_key: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    let json = serde_json::to_string_pretty(&StoredCredentials { account, api_key })
        .context("failed to serialize credentials")?;
    write_private(path, json.as_bytes())
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(unix)]
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.write_all(contents)?;
    // `mode` only applies on creation; tighten an existing file too
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    std::fs::write(path, contents)
}

/// Accepts strings and bare numbers (a hand-edited credential file may hold
/// `"api_key": 123456`).
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Unsigned(u64),
        Signed(i64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Unsigned(n) => n.to_string(),
        Raw::Signed(n) => n.to_string(),
    }))
}
