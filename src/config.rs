//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::model::Collection;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub local: LocalConfig,

    #[serde(default)]
    pub remote: RemoteConfig,

    #[serde(default)]
    pub sync: SyncConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Local store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LocalConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    #[serde(default = "default_namespace")]
    pub namespace: String,
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("peppervault").to_string_lossy().to_string())
        .unwrap_or_else(|| "./peppervault_data".to_string())
}

fn default_namespace() -> String {
    "peppervault".to_string()
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            namespace: default_namespace(),
        }
    }
}

/// Which remote provider to use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteProvider {
    /// Local-only mode, no remote at all
    #[default]
    None,
    /// Single JSON blob with get/put semantics
    Blob,
    /// Per-collection file tree behind a repository contents API
    Files,
}

impl RemoteProvider {
    fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "none" => Some(Self::None),
            "blob" => Some(Self::Blob),
            "files" => Some(Self::Files),
            _ => None,
        }
    }
}

/// Remote store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
    #[serde(default)]
    pub provider: RemoteProvider,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    pub blob: Option<BlobProviderConfig>,
    pub files: Option<FilesProviderConfig>,
}

fn default_request_timeout() -> u64 {
    5000
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            provider: RemoteProvider::None,
            request_timeout_ms: default_request_timeout(),
            blob: None,
            files: None,
        }
    }
}

/// Single-blob provider credentials
#[derive(Debug, Clone, Deserialize)]
pub struct BlobProviderConfig {
    #[serde(default = "default_blob_endpoint")]
    pub endpoint: String,

    #[serde(default)]
    pub bin_id: String,

    #[serde(default)]
    pub api_key: String,
}

fn default_blob_endpoint() -> String {
    "https://api.jsonbin.io/v3/b".to_string()
}

impl Default for BlobProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: default_blob_endpoint(),
            bin_id: String::new(),
            api_key: String::new(),
        }
    }
}

/// File-tree provider repository coordinates
#[derive(Debug, Clone, Deserialize)]
pub struct FilesProviderConfig {
    #[serde(default = "default_files_api_base")]
    pub api_base: String,

    #[serde(default)]
    pub owner: String,

    #[serde(default)]
    pub repo: String,

    #[serde(default = "default_files_branch")]
    pub branch: String,

    /// Access token; reads of a public repository work without one
    pub token: Option<String>,
}

fn default_files_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_files_branch() -> String {
    "main".to_string()
}

impl Default for FilesProviderConfig {
    fn default() -> Self {
        Self {
            api_base: default_files_api_base(),
            owner: String::new(),
            repo: String::new(),
            branch: default_files_branch(),
            token: None,
        }
    }
}

/// Sync policy configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// Collection whose emptiness decides the has-local/has-cloud branches
    #[serde(default = "default_primary_collection")]
    pub primary_collection: Collection,
}

fn default_primary_collection() -> Collection {
    Collection::Peppers
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            primary_collection: default_primary_collection(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,

    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        // Try default config locations
        let config_paths = [
            dirs::config_dir().map(|p| p.join("peppervault").join("config.toml")),
            Some(PathBuf::from("./peppervault.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        // Fall back to environment-only config
        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        // Local store overrides
        if let Ok(data_dir) = std::env::var("PEPPERVAULT_DATA_DIR") {
            self.local.data_dir = data_dir;
        }
        if let Ok(namespace) = std::env::var("PEPPERVAULT_NAMESPACE") {
            self.local.namespace = namespace;
        }

        // Remote overrides
        if let Ok(provider) = std::env::var("PEPPERVAULT_REMOTE_PROVIDER") {
            if let Some(p) = RemoteProvider::parse(&provider) {
                self.remote.provider = p;
            }
        }
        if let Ok(timeout) = std::env::var("PEPPERVAULT_REQUEST_TIMEOUT_MS") {
            if let Ok(t) = timeout.parse() {
                self.remote.request_timeout_ms = t;
            }
        }
        if let Ok(bin_id) = std::env::var("PEPPERVAULT_BLOB_BIN_ID") {
            self.remote.blob.get_or_insert_with(Default::default).bin_id = bin_id;
        }
        if let Ok(api_key) = std::env::var("PEPPERVAULT_BLOB_API_KEY") {
            self.remote.blob.get_or_insert_with(Default::default).api_key = api_key;
        }
        if let Ok(token) = std::env::var("PEPPERVAULT_FILES_TOKEN") {
            self.remote.files.get_or_insert_with(Default::default).token = Some(token);
        }

        // Logging overrides
        if let Ok(level) = std::env::var("PEPPERVAULT_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("PEPPERVAULT_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# PepperVault Configuration
#
# Environment variables override these settings:
# - PEPPERVAULT_DATA_DIR
# - PEPPERVAULT_NAMESPACE
# - PEPPERVAULT_REMOTE_PROVIDER
# - PEPPERVAULT_REQUEST_TIMEOUT_MS
# - PEPPERVAULT_BLOB_BIN_ID
# - PEPPERVAULT_BLOB_API_KEY
# - PEPPERVAULT_FILES_TOKEN
# - PEPPERVAULT_LOG_LEVEL
# - PEPPERVAULT_LOG_FORMAT

[local]
# Directory for the local document store
data_dir = "~/.local/share/peppervault"

# File name prefix for the document and its save marker
namespace = "peppervault"

[remote]
# Remote provider: none, blob, or files
provider = "none"

# Timeout for remote requests (ms)
request_timeout_ms = 5000

[remote.blob]
# Single-blob provider (jsonbin-style get/put)
endpoint = "https://api.jsonbin.io/v3/b"
bin_id = ""
api_key = ""

[remote.files]
# Per-collection file tree (repository contents API)
api_base = "https://api.github.com"
owner = ""
repo = ""
branch = "main"
# token = ""

[sync]
# Collection that decides whether a side "has data"
primary_collection = "peppers"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"

# Optional log file path
# file = "/var/log/peppervault/peppervault.log"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_yields_defaults() {
        let config: Config = toml::from_str("").unwrap();

        assert_eq!(config.remote.provider, RemoteProvider::None);
        assert_eq!(config.remote.request_timeout_ms, 5000);
        assert_eq!(config.local.namespace, "peppervault");
        assert_eq!(config.sync.primary_collection, Collection::Peppers);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_blob_provider_toml() {
        let config: Config = toml::from_str(
            r#"
            [remote]
            provider = "blob"

            [remote.blob]
            bin_id = "abc123"
            api_key = "secret"
            "#,
        )
        .unwrap();

        assert_eq!(config.remote.provider, RemoteProvider::Blob);
        let blob = config.remote.blob.unwrap();
        assert_eq!(blob.endpoint, "https://api.jsonbin.io/v3/b");
        assert_eq!(blob.bin_id, "abc123");
    }

    #[test]
    fn test_files_provider_toml() {
        let config: Config = toml::from_str(
            r#"
            [remote]
            provider = "files"

            [remote.files]
            owner = "gardener"
            repo = "pepper-data"
            "#,
        )
        .unwrap();

        assert_eq!(config.remote.provider, RemoteProvider::Files);
        let files = config.remote.files.unwrap();
        assert_eq!(files.branch, "main");
        assert_eq!(files.owner, "gardener");
        assert!(files.token.is_none());
    }

    #[test]
    fn test_generated_default_config_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.remote.provider, RemoteProvider::None);
        assert_eq!(config.sync.primary_collection, Collection::Peppers);
    }

    #[test]
    fn test_provider_parse() {
        assert_eq!(RemoteProvider::parse("BLOB"), Some(RemoteProvider::Blob));
        assert_eq!(RemoteProvider::parse("files"), Some(RemoteProvider::Files));
        assert_eq!(RemoteProvider::parse("ftp"), None);
    }
}
