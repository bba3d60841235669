//! Build-time configuration for the API endpoint, request timeout and storage
//! location, with runtime overrides read from the process environment so the
//! same binary can point at a different API without rebuilding.
//! Configuration values are public; do not store secrets here.

use std::{env, path::PathBuf, time::Duration};
use tracing::warn;
use url::Url;

pub const ENV_API_BASE_URL: &str = "SUPERIMPRESS_API_BASE_URL";
pub const ENV_REQUEST_TIMEOUT_MS: &str = "SUPERIMPRESS_REQUEST_TIMEOUT_MS";
pub const ENV_STORAGE: &str = "SUPERIMPRESS_STORAGE";

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
/// Default request timeout (milliseconds) applied by the API client.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_STORAGE_PATH: &str = ".superimpress/storage.json";

/// Client configuration derived from build-time environment variables.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub storage_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
        }
    }
}

impl AppConfig {
    /// Loads config from build-time environment variables and applies runtime overrides.
    #[must_use]
    pub fn load() -> Self {
        let api_base_url =
            option_env!("SUPERIMPRESS_API_BASE_URL").unwrap_or(DEFAULT_API_BASE_URL);
        let request_timeout_ms = option_env!("SUPERIMPRESS_REQUEST_TIMEOUT_MS")
            .and_then(|value| value.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_MS);
        let storage_path = option_env!("SUPERIMPRESS_STORAGE").unwrap_or(DEFAULT_STORAGE_PATH);

        let mut config = Self {
            api_base_url: api_base_url.to_string(),
            request_timeout: Duration::from_millis(request_timeout_ms),
            storage_path: PathBuf::from(storage_path),
        };

        apply_runtime_overrides(&mut config, runtime_config());

        config
    }

    #[must_use]
    pub fn with_api_base_url(mut self, api_base_url: impl Into<String>) -> Self {
        self.api_base_url = api_base_url.into();
        self
    }

    #[must_use]
    pub fn with_storage_path(mut self, storage_path: impl Into<PathBuf>) -> Self {
        self.storage_path = storage_path.into();
        self
    }

    #[must_use]
    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }
}

#[derive(Default)]
struct RuntimeConfig {
    api_base_url: Option<String>,
    request_timeout_ms: Option<u64>,
    storage_path: Option<String>,
}

fn runtime_config() -> RuntimeConfig {
    let read = |key: &str| env::var(key).ok().and_then(|value| normalize_runtime_value(&value));

    RuntimeConfig {
        api_base_url: read(ENV_API_BASE_URL).filter(|value| {
            let valid = valid_base_url(value);
            if !valid {
                warn!("ignoring {ENV_API_BASE_URL}: not an absolute http(s) URL");
            }
            valid
        }),
        request_timeout_ms: read(ENV_REQUEST_TIMEOUT_MS).and_then(|value| value.parse().ok()),
        storage_path: read(ENV_STORAGE),
    }
}

fn apply_runtime_overrides(config: &mut AppConfig, runtime: RuntimeConfig) {
    if let Some(value) = runtime.api_base_url {
        config.api_base_url = value;
    }
    if let Some(value) = runtime.request_timeout_ms {
        config.request_timeout = Duration::from_millis(value);
    }
    if let Some(value) = runtime.storage_path {
        config.storage_path = PathBuf::from(value);
    }
}

/// Accepts absolute `http`/`https` URLs with a host.
fn valid_base_url(value: &str) -> bool {
    Url::parse(value).is_ok_and(|url| {
        matches!(url.scheme(), "http" | "https") && url.host_str().is_some()
    })
}

fn normalize_runtime_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
