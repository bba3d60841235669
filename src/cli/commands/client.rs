//! Arguments shared by the session commands: where the API lives and where
//! the session is persisted between invocations.

use crate::app_lib::{
    config::{ENV_API_BASE_URL, ENV_REQUEST_TIMEOUT_MS, ENV_STORAGE},
    AppConfig,
};
use clap::{Arg, ArgMatches, Command};
use std::time::Duration;

pub const ARG_API_URL: &str = "api-url";
pub const ARG_STORAGE: &str = "storage";
pub const ARG_TIMEOUT_MS: &str = "timeout-ms";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_API_URL)
                .long("api-url")
                .help("Base URL of the authentication API")
                .env(ENV_API_BASE_URL)
                .global(true),
        )
        .arg(
            Arg::new(ARG_STORAGE)
                .long("storage")
                .help("File holding the persisted session")
                .env(ENV_STORAGE)
                .global(true),
        )
        .arg(
            Arg::new(ARG_TIMEOUT_MS)
                .long("timeout-ms")
                .help("Request timeout in milliseconds")
                .env(ENV_REQUEST_TIMEOUT_MS)
                .global(true)
                .value_parser(clap::value_parser!(u64)),
        )
}

/// Client configuration: build-time and environment defaults, then explicit arguments.
#[must_use]
pub fn config(matches: &ArgMatches) -> AppConfig {
    let mut config = AppConfig::load();

    if let Some(url) = matches.get_one::<String>(ARG_API_URL) {
        config = config.with_api_base_url(url.trim());
    }
    if let Some(path) = matches.get_one::<String>(ARG_STORAGE) {
        config = config.with_storage_path(path.trim());
    }
    if let Some(timeout) = matches.get_one::<u64>(ARG_TIMEOUT_MS) {
        config = config.with_request_timeout(Duration::from_millis(*timeout));
    }

    config
}
