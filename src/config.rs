use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

pub const DEFAULT_ENDPOINT: &str = "http://10.0.10.60:8000/triage";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const MAX_TIMEOUT_SECS: u64 = 60;
/// Origin tag of the trusted devices segment.
pub const TRUSTED_ORIGIN: &str = "30";

const CONFIG_DIR_NAME: &str = "triage-notifier";
const CONFIG_FILE_NAME: &str = "config.json";

const ENV_ENDPOINT: &str = "TRIAGE_ENDPOINT";
const ENV_API_KEY: &str = "TRIAGE_API_KEY";
const ENV_LEGACY_API_KEY: &str = "OSTICKET_KEY";
const ENV_TIMEOUT: &str = "TRIAGE_TIMEOUT_SECS";
const ENV_UNTAGGED_ORIGIN: &str = "TRIAGE_UNTAGGED_ORIGIN";

/// Settings as persisted on disk; every field may be unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredConfig {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: Option<u64>,
    pub untagged_origin: Option<String>,
}

impl StoredConfig {
    pub fn load() -> AppResult<Self> {
        Self::load_from(&config_file_path()?)
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|err| {
                AppError::Configuration(format!("invalid config file {}: {err}", path.display()))
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    pub fn save(&self) -> AppResult<()> {
        self.save_to(&config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)
            .map_err(|err| AppError::Configuration(format!("failed to write config: {err}")))?;
        fs::write(path, data)?;
        Ok(())
    }
}

pub fn config_directory() -> AppResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME))
        .ok_or_else(|| AppError::Configuration("no configuration directory available".to_string()))
}

pub fn config_file_path() -> AppResult<PathBuf> {
    Ok(config_directory()?.join(CONFIG_FILE_NAME))
}

/// Resolved notifier settings. Loaded once at activation and never mutated.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
    /// Tag sent when the request carried no origin. Set to `unknown` to stop
    /// treating untagged requests as trusted.
    pub untagged_origin: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            untagged_origin: TRUSTED_ORIGIN.to_string(),
        }
    }
}

impl AppConfig {
    pub fn load() -> AppResult<Self> {
        let stored = StoredConfig::load()?;
        Self::resolve(stored, |key| env::var(key).ok())
    }

    /// Layers defaults, the stored file and the environment, in that order.
    pub fn resolve<F>(stored: StoredConfig, lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_value = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let endpoint = env_value(ENV_ENDPOINT)
            .or(stored.endpoint)
            .unwrap_or(defaults.endpoint);
        let api_key = env_value(ENV_API_KEY)
            .or_else(|| env_value(ENV_LEGACY_API_KEY))
            .or(stored.api_key);
        let timeout_secs = match env_value(ENV_TIMEOUT) {
            Some(raw) => Some(parse_timeout(&raw)?),
            None => stored.timeout_secs,
        };
        let timeout = timeout_secs.map_or(defaults.timeout, Duration::from_secs);
        let untagged_origin = env_value(ENV_UNTAGGED_ORIGIN)
            .or(stored.untagged_origin)
            .unwrap_or(defaults.untagged_origin);

        Ok(Self {
            endpoint: endpoint.trim().to_string(),
            api_key: api_key.map(|key| key.trim().to_string()),
            timeout,
            untagged_origin: untagged_origin.trim().to_string(),
        })
    }

    /// Activation-time checks; a failure here must keep the listener unregistered.
    pub fn validate(&self) -> AppResult<()> {
        let url = Url::parse(&self.endpoint).map_err(|err| {
            AppError::Configuration(format!("invalid triage endpoint '{}': {err}", self.endpoint))
        })?;
        match url.scheme() {
            "https" => {}
            "http" => tracing::warn!(
                endpoint = %self.endpoint,
                "triage endpoint uses plaintext HTTP; the API key travels unencrypted"
            ),
            other => {
                return Err(AppError::Configuration(format!(
                    "unsupported triage endpoint scheme '{other}'"
                )));
            }
        }

        if self.api_key().is_none() {
            return Err(AppError::Configuration(
                "triage API key not configured".to_string(),
            ));
        }

        let secs = self.timeout.as_secs();
        if secs == 0 || secs > MAX_TIMEOUT_SECS {
            return Err(AppError::Configuration(format!(
                "triage timeout must be between 1 and {MAX_TIMEOUT_SECS} seconds"
            )));
        }

        if self.untagged_origin.is_empty() {
            return Err(AppError::Configuration(
                "untagged origin must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.is_empty())
    }
}

pub fn parse_timeout(raw: &str) -> AppResult<u64> {
    raw.trim().parse::<u64>().map_err(|_| {
        AppError::Configuration(format!("triage timeout '{raw}' is not a whole number of seconds"))
    })
}
