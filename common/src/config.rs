// common/src/config.rs
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use config::{Config as ConfigFile, File, Environment};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Central configuration for the site client and the edge server
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend origin the REST client talks to
    pub api_base_url: String,
    pub web_server_addr: String,
    /// File backing the persisted client key-value store
    pub storage_path: String,

    pub proxy: ProxyConfig,

    // Static file serving configuration
    pub static_files: StaticFilesConfig,
}

/// Reverse-proxy rewrite of site-origin paths onto the backend origin
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    pub backend_origin: String,
    pub prefixes: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    pub path: String,
    pub index: String,
    pub enable_compression: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            web_server_addr: "127.0.0.1:3000".to_string(),
            storage_path: "./data/site-storage.json".to_string(),
            proxy: ProxyConfig::default(),
            static_files: StaticFilesConfig::default(),
        }
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            backend_origin: DEFAULT_API_BASE_URL.to_string(),
            prefixes: vec!["/api".to_string(), "/auth".to_string(), "/media".to_string()],
        }
    }
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            path: "./static".to_string(),
            index: "index.html".to_string(),
            enable_compression: true,
        }
    }
}

impl Config {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        // Get the run mode, defaulting to "development"
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        // Locate the config directory
        let config_dir = env::var("CONFIG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                // Check if we're in the project root or a subcrate
                let mut path = PathBuf::from("./config");
                if !path.exists() {
                    path = PathBuf::from("../config");
                }
                path
            });

        tracing::info!("Loading configuration from {}", config_dir.display());
        tracing::info!("Using run mode: {}", run_mode);

        let config = ConfigFile::builder()
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            .add_source(File::from(config_dir.join(format!("{}.toml", run_mode))).required(false))
            // Local overrides, never committed
            .add_source(File::from(config_dir.join("local.toml")).required(false))
            // APP__API_BASE_URL, APP__PROXY__BACKEND_ORIGIN, ...
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Load from files, falling back to plain environment variables
    pub fn from_env() -> Self {
        match Self::load() {
            Ok(config) => {
                tracing::info!("Configuration loaded from files and environment");
                config
            },
            Err(e) => {
                tracing::warn!("Failed to load configuration from files: {}", e);
                tracing::info!("Falling back to environment variables only");
                Self::from_plain_env()
            }
        }
    }

    fn from_plain_env() -> Self {
        let defaults = Self::default();

        let api_base_url = env::var("SITE_API_URL")
            .unwrap_or(defaults.api_base_url);

        let web_server_addr = env::var("WEB_SERVER_ADDR")
            .unwrap_or(defaults.web_server_addr);

        let storage_path = env::var("SITE_STORAGE_PATH")
            .unwrap_or(defaults.storage_path);

        // The proxy follows the API base unless pointed elsewhere
        let backend_origin = env::var("BACKEND_ORIGIN")
            .unwrap_or_else(|_| api_base_url.clone());

        let prefixes = env::var("PROXY_PREFIXES")
            .map(|v| parse_prefixes(&v))
            .unwrap_or(defaults.proxy.prefixes);

        let static_files_path = env::var("STATIC_FILES_PATH")
            .unwrap_or(defaults.static_files.path);

        let static_files_index = env::var("STATIC_FILES_INDEX")
            .unwrap_or(defaults.static_files.index);

        let enable_compression = env::var("ENABLE_COMPRESSION")
            .map(|v| v.to_lowercase() == "true")
            .unwrap_or(defaults.static_files.enable_compression);

        Self {
            api_base_url,
            web_server_addr,
            storage_path,
            proxy: ProxyConfig {
                backend_origin,
                prefixes,
            },
            static_files: StaticFilesConfig {
                path: static_files_path,
                index: static_files_index,
                enable_compression,
            },
        }
    }
}

/// Split a comma separated prefix list, forcing a leading slash on each entry
pub fn parse_prefixes(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| format!("/{}", p.trim_matches('/')))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_proxies_backend_paths() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "http://localhost:8000");
        assert_eq!(config.proxy.prefixes, vec!["/api", "/auth", "/media"]);
    }

    #[test]
    fn test_parse_prefixes() {
        assert_eq!(parse_prefixes("api, /auth/ ,,media"), vec!["/api", "/auth", "/media"]);
        assert!(parse_prefixes(" , ").is_empty());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = ConfigFile::builder()
            .add_source(config::File::from_str(
                "api_base_url = \"http://backend:9000\"\n[proxy]\nbackend_origin = \"http://backend:9000\"",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.api_base_url, "http://backend:9000");
        assert_eq!(config.proxy.backend_origin, "http://backend:9000");
        assert_eq!(config.proxy.prefixes.len(), 3);
        assert_eq!(config.static_files.index, "index.html");
    }
}
