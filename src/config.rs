use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_path: String,
    pub engine_url: String,
    pub port: u16,
    pub engine: EnginePolicy,
}

/// Timeout and retry policy around the prediction engine call.
#[derive(Debug, Clone, PartialEq)]
pub struct EnginePolicy {
    /// Per-attempt timeout; zero leaves the transport default in place.
    pub timeout_secs: u64,
    /// Extra attempts after a transport failure.
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
}

/// On-disk layout of `config.toml`. Keys are flat and the same as the
/// lowercase environment variable names; unknown keys are rejected.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default = "default_database_path")]
    database_path: String,
    #[serde(default = "default_engine_url")]
    engine_url: String,
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default = "default_timeout_secs")]
    engine_timeout_secs: u64,
    #[serde(default)]
    engine_max_retries: u32,
    #[serde(default = "default_backoff_ms")]
    engine_retry_backoff_ms: u64,
}

impl From<ConfigFile> for Config {
    fn from(file: ConfigFile) -> Self {
        Self {
            database_path: file.database_path,
            engine_url: normalize_url(&file.engine_url),
            port: file.port,
            engine: EnginePolicy {
                timeout_secs: file.engine_timeout_secs,
                max_retries: file.engine_max_retries,
                retry_backoff_ms: file.engine_retry_backoff_ms,
            },
        }
    }
}

fn default_database_path() -> String { "predictions.db".to_string() }
fn default_engine_url() -> String { "http://localhost:5000".to_string() }
fn default_port() -> u16 { 3001 }
fn default_timeout_secs() -> u64 { 30 }
fn default_backoff_ms() -> u64 { 250 }

impl Default for EnginePolicy {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_retries: 0,
            retry_backoff_ms: default_backoff_ms(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            engine_url: default_engine_url(),
            port: default_port(),
            engine: EnginePolicy::default(),
        }
    }
}

impl EnginePolicy {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

impl Config {
    /// Defaults, then the optional TOML file, then the process environment.
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let config = Self::from_file(&path)?;
        config.with_env(|key| std::env::var(key).ok())
    }

    /// Read a TOML config file. A missing file yields the defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let file: ConfigFile = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(file.into())
    }

    /// Apply environment overrides through `lookup`.
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("DATABASE_PATH") {
            self.database_path = path;
        }
        if let Some(url) = lookup("ML_SERVICE_URL") {
            self.engine_url = normalize_url(&url);
        }
        if let Some(port) = parse_var(&lookup, "PORT")? {
            self.port = port;
        }
        if let Some(secs) = parse_var(&lookup, "ENGINE_TIMEOUT_SECS")? {
            self.engine.timeout_secs = secs;
        }
        if let Some(retries) = parse_var(&lookup, "ENGINE_MAX_RETRIES")? {
            self.engine.max_retries = retries;
        }
        if let Some(ms) = parse_var(&lookup, "ENGINE_RETRY_BACKOFF_MS")? {
            self.engine.retry_backoff_ms = ms;
        }

        Ok(self)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("Invalid value for {}: {:?}", key, raw))
        })
        .transpose()
}

fn normalize_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
