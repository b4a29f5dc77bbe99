//! Configuration file parsing and management.
//!
//! This module loads TOML configuration files, reads `DS_*` environment
//! variables and layers both onto a [`ScoutConfig`].

use crate::error::DomainScoutError;
use crate::pattern::validate_extensions;
use crate::types::{ScoutConfig, MAX_RATE_LIMIT};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration loaded from TOML files.
///
/// ```toml
/// [defaults]
/// concurrency = 20
/// rate = 5
/// timeout = "8s"
/// extensions = [".com", ".io"]
///
/// [cache]
/// path = "~/.cache/scout.bin"
/// capacity = 20000000
/// checkpoint_every = 500
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// Default values for CLI options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,

    /// Membership cache settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheConfig>,
}

/// Default configuration values that map to CLI options.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DefaultsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,

    /// Probes started per second
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<u32>,

    /// Probe timeout, e.g. "5s" or "1m"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub retries: Option<u32>,

    /// Extensions used when a pattern names none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CacheConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Bits in a freshly created cache
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkpoint_every: Option<usize>,
}

impl FileConfig {
    /// Layer this file's values over `config`.
    pub fn apply(&self, mut config: ScoutConfig) -> ScoutConfig {
        if let Some(defaults) = &self.defaults {
            if let Some(concurrency) = defaults.concurrency {
                config = config.with_concurrency(concurrency);
            }
            if let Some(rate) = defaults.rate {
                config = config.with_rate_limit(rate);
            }
            if let Some(secs) = defaults.timeout.as_deref().and_then(parse_timeout_string) {
                config = config.with_timeout(Duration::from_secs(secs));
            }
            if let Some(retries) = defaults.retries {
                config = config.with_retries(retries);
            }
            if let Some(extensions) = &defaults.extensions {
                config = config.with_default_extensions(extensions.clone());
            }
        }
        if let Some(cache) = &self.cache {
            if let Some(path) = &cache.path {
                config = config.with_cache_path(path.clone());
            }
            if let Some(capacity) = cache.capacity {
                config = config.with_cache_capacity(capacity);
            }
            if let Some(every) = cache.checkpoint_every {
                config = config.with_checkpoint_every(every);
            }
        }
        config
    }
}

/// Configuration discovery and loading functionality.
pub struct ConfigManager {
    /// Whether to report which files were picked up
    pub verbose: bool,
}

impl ConfigManager {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Load and validate configuration from a specific file.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FileConfig, DomainScoutError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(DomainScoutError::file_error(
                path.to_string_lossy(),
                "Configuration file not found",
            ));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            DomainScoutError::file_error(
                path.to_string_lossy(),
                format!("Failed to read configuration file: {}", e),
            )
        })?;

        let config: FileConfig = toml::from_str(&content)?;
        self.validate_config(&config)?;

        tracing::debug!(path = %path.display(), "loaded configuration file");
        Ok(config)
    }

    /// Discover and merge configuration files, lowest precedence first:
    /// XDG, then home directory, then current directory.
    ///
    /// Files that fail to load are skipped with a warning.
    pub fn discover_and_load(&self) -> Result<FileConfig, DomainScoutError> {
        let mut merged_config = FileConfig::default();
        let mut loaded_files = Vec::new();

        let candidates = [
            self.get_xdg_config_path(),
            self.get_global_config_path(),
            self.get_local_config_path(),
        ];

        for path in candidates.into_iter().flatten() {
            match self.load_file(&path) {
                Ok(config) => {
                    merged_config = self.merge_configs(merged_config, config);
                    loaded_files.push(path);
                }
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "ignoring config file"),
            }
        }

        if self.verbose && loaded_files.len() > 1 {
            for path in &loaded_files {
                tracing::info!(path = %path.display(), "merged config file");
            }
        }

        Ok(merged_config)
    }

    fn get_local_config_path(&self) -> Option<PathBuf> {
        ["./domain-scout.toml", "./.domain-scout.toml"]
            .iter()
            .map(Path::new)
            .find(|p| p.exists())
            .map(Path::to_path_buf)
    }

    fn get_global_config_path(&self) -> Option<PathBuf> {
        let home = env::var_os("HOME")?;
        [".domain-scout.toml", "domain-scout.toml"]
            .iter()
            .map(|c| Path::new(&home).join(c))
            .find(|p| p.exists())
    }

    fn get_xdg_config_path(&self) -> Option<PathBuf> {
        let config_dir = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| env::var_os("HOME").map(|home| Path::new(&home).join(".config")))?;

        let path = config_dir.join("domain-scout").join("config.toml");
        if path.exists() {
            Some(path)
        } else {
            None
        }
    }

    /// Merge two configurations. Values from `higher` win.
    fn merge_configs(&self, lower: FileConfig, higher: FileConfig) -> FileConfig {
        FileConfig {
            defaults: match (lower.defaults, higher.defaults) {
                (Some(mut lo), Some(hi)) => {
                    if hi.concurrency.is_some() {
                        lo.concurrency = hi.concurrency;
                    }
                    if hi.rate.is_some() {
                        lo.rate = hi.rate;
                    }
                    if hi.timeout.is_some() {
                        lo.timeout = hi.timeout;
                    }
                    if hi.retries.is_some() {
                        lo.retries = hi.retries;
                    }
                    if hi.extensions.is_some() {
                        lo.extensions = hi.extensions;
                    }
                    Some(lo)
                }
                (lo, hi) => hi.or(lo),
            },
            cache: match (lower.cache, higher.cache) {
                (Some(mut lo), Some(hi)) => {
                    if hi.path.is_some() {
                        lo.path = hi.path;
                    }
                    if hi.capacity.is_some() {
                        lo.capacity = hi.capacity;
                    }
                    if hi.checkpoint_every.is_some() {
                        lo.checkpoint_every = hi.checkpoint_every;
                    }
                    Some(lo)
                }
                (lo, hi) => hi.or(lo),
            },
        }
    }

    fn validate_config(&self, config: &FileConfig) -> Result<(), DomainScoutError> {
        if let Some(defaults) = &config.defaults {
            if let Some(concurrency) = defaults.concurrency {
                if concurrency == 0 || concurrency > 100 {
                    return Err(DomainScoutError::config(
                        "Concurrency must be between 1 and 100",
                    ));
                }
            }

            if let Some(rate) = defaults.rate {
                if rate > MAX_RATE_LIMIT {
                    return Err(DomainScoutError::config(format!(
                        "Rate must be between 0 and {} probes per second",
                        MAX_RATE_LIMIT
                    )));
                }
            }

            if let Some(timeout_str) = &defaults.timeout {
                if parse_timeout_string(timeout_str).is_none() {
                    return Err(DomainScoutError::config(format!(
                        "Invalid timeout format '{}'. Use format like '5s', '30s', '2m'",
                        timeout_str
                    )));
                }
            }

            if let Some(extensions) = &defaults.extensions {
                validate_extensions(extensions).map_err(|e| {
                    DomainScoutError::config(format!("Invalid default extensions: {}", e))
                })?;
            }
        }

        if let Some(cache) = &config.cache {
            if cache.capacity == Some(0) {
                return Err(DomainScoutError::config(
                    "Cache capacity must be greater than zero",
                ));
            }
            if cache.checkpoint_every == Some(0) {
                return Err(DomainScoutError::config(
                    "checkpoint_every must be greater than zero",
                ));
            }
        }

        Ok(())
    }
}

/// Configuration values read from `DS_*` environment variables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvConfig {
    pub concurrency: Option<usize>,
    pub rate: Option<u32>,
    pub timeout: Option<String>,
    pub retries: Option<u32>,
    pub cache_path: Option<PathBuf>,
    pub capacity: Option<u64>,
    pub extensions: Option<Vec<String>>,
    pub config: Option<String>,
}

impl EnvConfig {
    /// Layer these values over `config`.
    pub fn apply(&self, mut config: ScoutConfig) -> ScoutConfig {
        if let Some(concurrency) = self.concurrency {
            config = config.with_concurrency(concurrency);
        }
        if let Some(rate) = self.rate {
            config = config.with_rate_limit(rate);
        }
        if let Some(secs) = self.timeout.as_deref().and_then(parse_timeout_string) {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Some(retries) = self.retries {
            config = config.with_retries(retries);
        }
        if let Some(path) = &self.cache_path {
            config = config.with_cache_path(path.clone());
        }
        if let Some(capacity) = self.capacity {
            config = config.with_cache_capacity(capacity);
        }
        if let Some(extensions) = &self.extensions {
            config = config.with_default_extensions(extensions.clone());
        }
        config
    }
}

/// Load configuration from the process environment.
///
/// Invalid values are ignored with a warning.
pub fn load_env_config() -> EnvConfig {
    env_config_from(|key| env::var(key).ok())
}

/// Build an [`EnvConfig`] from any key lookup.
pub fn env_config_from<F>(lookup: F) -> EnvConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut env_config = EnvConfig::default();

    if let Some(val) = lookup("DS_CONCURRENCY") {
        match val.trim().parse::<usize>() {
            Ok(n) if (1..=100).contains(&n) => env_config.concurrency = Some(n),
            _ => tracing::warn!(value = %val, "invalid DS_CONCURRENCY, must be 1-100"),
        }
    }

    if let Some(val) = lookup("DS_RATE") {
        match val.trim().parse::<u32>() {
            Ok(rate) if rate <= MAX_RATE_LIMIT => env_config.rate = Some(rate),
            _ => tracing::warn!(value = %val, max = MAX_RATE_LIMIT, "invalid DS_RATE"),
        }
    }

    if let Some(val) = lookup("DS_TIMEOUT") {
        if parse_timeout_string(&val).is_some() {
            env_config.timeout = Some(val);
        } else {
            tracing::warn!(value = %val, "invalid DS_TIMEOUT, use a non-zero value like '5s' or '2m'");
        }
    }

    if let Some(val) = lookup("DS_RETRIES") {
        match val.trim().parse::<u32>() {
            Ok(retries) => env_config.retries = Some(retries),
            Err(_) => tracing::warn!(value = %val, "invalid DS_RETRIES"),
        }
    }

    if let Some(val) = lookup("DS_CACHE") {
        if !val.trim().is_empty() {
            env_config.cache_path = Some(PathBuf::from(val.trim()));
        }
    }

    if let Some(val) = lookup("DS_CAPACITY") {
        match val.trim().parse::<u64>() {
            Ok(capacity) if capacity > 0 => env_config.capacity = Some(capacity),
            _ => tracing::warn!(value = %val, "invalid DS_CAPACITY, must be a positive number"),
        }
    }

    if let Some(val) = lookup("DS_EXT") {
        let extensions = split_list(&val);
        match validate_extensions(&extensions) {
            Ok(()) => env_config.extensions = Some(extensions),
            Err(e) => tracing::warn!(value = %val, error = %e, "invalid DS_EXT"),
        }
    }

    if let Some(val) = lookup("DS_CONFIG") {
        if !val.trim().is_empty() {
            env_config.config = Some(val.trim().to_string());
        }
    }

    env_config
}

/// Split a comma-separated list, trimming entries and dropping empty ones.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parse a timeout string like "5s", "30s", "2m" into seconds.
///
/// A bare number is taken as seconds. Zero is rejected.
pub fn parse_timeout_string(timeout_str: &str) -> Option<u64> {
    let timeout_str = timeout_str.trim().to_lowercase();

    let secs = if let Some(secs) = timeout_str.strip_suffix('s') {
        secs.parse::<u64>().ok()
    } else if let Some(mins) = timeout_str.strip_suffix('m') {
        mins.parse::<u64>().ok().and_then(|m| m.checked_mul(60))
    } else {
        timeout_str.parse::<u64>().ok()
    };
    secs.filter(|&s| s > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();
        temp_file.flush().unwrap();
        temp_file
    }

    #[test]
    fn test_parse_timeout_string() {
        assert_eq!(parse_timeout_string("5s"), Some(5));
        assert_eq!(parse_timeout_string("30s"), Some(30));
        assert_eq!(parse_timeout_string("2m"), Some(120));
        assert_eq!(parse_timeout_string("5"), Some(5));
        assert_eq!(parse_timeout_string(" 7S "), Some(7));
        assert_eq!(parse_timeout_string("invalid"), None);
    }

    #[test]
    fn test_parse_timeout_string_rejects_zero() {
        assert_eq!(parse_timeout_string("0"), None);
        assert_eq!(parse_timeout_string("0s"), None);
        assert_eq!(parse_timeout_string("0m"), None);
    }

    #[test]
    fn test_load_valid_config() {
        let temp_file = write_config(
            r#"
[defaults]
concurrency = 25
rate = 4
timeout = "8s"
extensions = [".com", ".io"]

[cache]
path = "scout.bin"
capacity = 4096
"#,
        );

        let manager = ConfigManager::new(false);
        let config = manager.load_file(temp_file.path()).unwrap();

        let defaults = config.defaults.clone().unwrap();
        assert_eq!(defaults.concurrency, Some(25));
        assert_eq!(defaults.rate, Some(4));
        assert_eq!(
            defaults.extensions,
            Some(vec![".com".to_string(), ".io".to_string()])
        );

        let scout = config.apply(ScoutConfig::default());
        assert_eq!(scout.concurrency, 25);
        assert_eq!(scout.rate_limit, Some(4));
        assert_eq!(scout.timeout, Duration::from_secs(8));
        assert_eq!(scout.cache_path, PathBuf::from("scout.bin"));
        assert_eq!(scout.cache_capacity, 4096);
        assert_eq!(scout.checkpoint_every, 1000);
    }

    #[test]
    fn test_invalid_concurrency() {
        let temp_file = write_config("[defaults]\nconcurrency = 0\n");
        let manager = ConfigManager::new(false);
        assert!(manager.load_file(temp_file.path()).is_err());
    }

    #[test]
    fn test_invalid_rate_and_timeout_rejected() {
        let manager = ConfigManager::new(false);

        let temp_file = write_config("[defaults]\nrate = 4000000000\n");
        assert!(manager.load_file(temp_file.path()).is_err());

        let temp_file = write_config("[defaults]\ntimeout = \"0s\"\n");
        let err = manager.load_file(temp_file.path()).unwrap_err();
        assert!(matches!(err, DomainScoutError::ConfigError { .. }));

        let temp_file = write_config("[defaults]\nrate = 0\ntimeout = \"1s\"\n");
        assert!(manager.load_file(temp_file.path()).is_ok());
    }

    #[test]
    fn test_invalid_extensions_rejected() {
        let temp_file = write_config("[defaults]\nextensions = [\"com\"]\n");
        let manager = ConfigManager::new(false);
        let err = manager.load_file(temp_file.path()).unwrap_err();
        assert!(matches!(err, DomainScoutError::ConfigError { .. }));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let temp_file = write_config("[cache]\ncapacity = 0\n");
        let manager = ConfigManager::new(false);
        assert!(manager.load_file(temp_file.path()).is_err());
    }

    #[test]
    fn test_malformed_toml() {
        let temp_file = write_config("[defaults\nconcurrency = ");
        let manager = ConfigManager::new(false);
        assert!(manager.load_file(temp_file.path()).is_err());
    }

    #[test]
    fn test_missing_file() {
        let manager = ConfigManager::new(false);
        let err = manager.load_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, DomainScoutError::FileError { .. }));
    }

    #[test]
    fn test_merge_configs() {
        let manager = ConfigManager::new(false);

        let lower = FileConfig {
            defaults: Some(DefaultsConfig {
                concurrency: Some(10),
                timeout: Some("3s".to_string()),
                ..Default::default()
            }),
            cache: Some(CacheConfig {
                capacity: Some(100),
                ..Default::default()
            }),
        };

        let higher = FileConfig {
            defaults: Some(DefaultsConfig {
                concurrency: Some(25),
                ..Default::default()
            }),
            cache: None,
        };

        let merged = manager.merge_configs(lower, higher);
        let defaults = merged.defaults.unwrap();

        assert_eq!(defaults.concurrency, Some(25)); // Higher wins
        assert_eq!(defaults.timeout, Some("3s".to_string())); // Lower preserved
        assert_eq!(merged.cache.unwrap().capacity, Some(100));
    }

    #[test]
    fn test_env_config_parsing() {
        let vars: HashMap<&str, &str> = [
            ("DS_CONCURRENCY", "30"),
            ("DS_RATE", "2"),
            ("DS_TIMEOUT", "1m"),
            ("DS_EXT", ".com, .net"),
            ("DS_CAPACITY", "512"),
        ]
        .into_iter()
        .collect();

        let env_config = env_config_from(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(env_config.concurrency, Some(30));
        assert_eq!(env_config.rate, Some(2));
        assert_eq!(
            env_config.extensions,
            Some(vec![".com".to_string(), ".net".to_string()])
        );

        let scout = env_config.apply(ScoutConfig::default());
        assert_eq!(scout.timeout, Duration::from_secs(60));
        assert_eq!(scout.cache_capacity, 512);
    }

    #[test]
    fn test_env_config_ignores_invalid_values() {
        let vars: HashMap<&str, &str> = [
            ("DS_CONCURRENCY", "0"),
            ("DS_TIMEOUT", "soon"),
            ("DS_RATE", "4000000000"),
            ("DS_EXT", "com"),
            ("DS_CAPACITY", "-4"),
        ]
        .into_iter()
        .collect();

        let env_config = env_config_from(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(env_config, EnvConfig::default());

        let zero = env_config_from(|k| (k == "DS_TIMEOUT").then(|| "0s".to_string()));
        assert_eq!(zero.timeout, None);
    }

    #[test]
    fn test_env_overrides_file() {
        let file = FileConfig {
            defaults: Some(DefaultsConfig {
                concurrency: Some(5),
                retries: Some(3),
                ..Default::default()
            }),
            cache: None,
        };
        let env_config = EnvConfig {
            concurrency: Some(50),
            ..Default::default()
        };

        let scout = env_config.apply(file.apply(ScoutConfig::default()));
        assert_eq!(scout.concurrency, 50);
        assert_eq!(scout.retries, 3);
    }
}
