//! Configuration file loading with environment variable overrides.
//!
//! Storage credentials are never compiled in. They come from
//! `SUPABASE_URL` / `SUPABASE_KEY`, falling back to the `[storage]` table of
//! the config file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::Error;
use crate::retry::RetryPolicy;

/// Environment variable holding the storage service URL.
pub const URL_ENV: &str = "SUPABASE_URL";
/// Environment variable holding the storage access key.
pub const KEY_ENV: &str = "SUPABASE_KEY";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Storage service connection settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Retry behaviour for transport failures.
    #[serde(default)]
    pub retry: RetryConfig,
}

/// Storage service connection settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Service base URL, e.g. `https://<project>.supabase.co`.
    pub url: Option<String>,
    /// Access key.
    pub key: Option<String>,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { url: None, key: None, request_timeout_secs: 30 }
    }
}

/// Retry settings, in milliseconds.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub initial_delay_ms: u64,
    /// Delay cap.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_retries: policy.max_retries,
            initial_delay_ms: policy.initial_delay.as_millis() as u64,
            max_delay_ms: policy.max_delay.as_millis() as u64,
        }
    }
}

impl Config {
    /// Load configuration from the given path, or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, Error> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config {}: {e}", path.display())))?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config {}: {e}", path.display())))
    }

    /// Storage URL, preferring the environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if neither source provides one.
    pub fn storage_url(&self) -> Result<String, Error> {
        non_empty_env(URL_ENV).or_else(|| self.storage.url.clone()).ok_or_else(|| {
            Error::Config(format!("No storage URL. Set {URL_ENV} or add [storage] url."))
        })
    }

    /// Storage access key, preferring the environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingApiKey`] if neither source provides one.
    pub fn storage_key(&self) -> Result<String, Error> {
        non_empty_env(KEY_ENV)
            .or_else(|| self.storage.key.clone())
            .ok_or_else(|| Error::MissingApiKey { env_var: KEY_ENV.into() })
    }

    /// Per-request timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.storage.request_timeout_secs.max(1))
    }

    /// Retry policy built from `[retry]`.
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.retry.max_retries,
            initial_delay: Duration::from_millis(self.retry.initial_delay_ms),
            max_delay: Duration::from_millis(self.retry.max_delay_ms),
        }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Discover the config file path using the resolution order:
/// 1. Explicit path (from `--config` flag)
/// 2. `TREMOR_CONFIG` environment variable
/// 3. `~/.config/tremor-templates/config.toml`
#[must_use]
pub fn discover_config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }

    if let Ok(p) = std::env::var("TREMOR_CONFIG") {
        return PathBuf::from(p);
    }

    default_config_path()
}

fn default_config_path() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".config/tremor-templates/config.toml")
    } else {
        PathBuf::from("tremor-templates.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert!(config.storage.url.is_none());
        assert!(config.storage.key.is_none());
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.retry_policy(), RetryPolicy::default());
    }

    #[test]
    fn load_nonexistent_returns_defaults() {
        let config = Config::load(Path::new("/nonexistent/path/config.toml")).unwrap();
        assert_eq!(config.retry.max_retries, 3);
    }

    #[test]
    fn load_valid_toml() {
        let dir = std::env::temp_dir().join("tremor_config_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(
            &path,
            r#"
[storage]
url = "https://example.supabase.co"
key = "file-key"
request_timeout_secs = 5

[retry]
max_retries = 1
initial_delay_ms = 10
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.storage.url.as_deref(), Some("https://example.supabase.co"));
        assert_eq!(config.storage.key.as_deref(), Some("file-key"));
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        let policy = config.retry_policy();
        assert_eq!(policy.max_retries, 1);
        assert_eq!(policy.initial_delay, Duration::from_millis(10));
        assert_eq!(policy.max_delay, Duration::from_secs(8));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_invalid_toml() {
        let dir = std::env::temp_dir().join("tremor_config_bad_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.toml");
        std::fs::write(&path, "this is not valid toml {{{").unwrap();

        assert!(matches!(Config::load(&path), Err(Error::Config(_))));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn discover_explicit_path() {
        let path = discover_config_path(Some(Path::new("/tmp/my-config.toml")));
        assert_eq!(path, PathBuf::from("/tmp/my-config.toml"));
    }
}
