//! # Super Impress web client
//!
//! Client side of the Super Impress application: the registration, login and
//! change-password pages, the API client they use, and the bearer-token
//! session that ties them together.
//!
//! ## Session Model
//!
//! One [`app::Browser`] is one browser context with exactly one session. The
//! session is a projection of the `access_token` entry in durable storage:
//! hydrated once when the context starts and rewritten only by
//! `AuthStore::login` and `AuthStore::logout`.
//!
//! - **Route guard:** protected pages (`/change-password`) redirect anonymous
//!   visitors to `/login` with a `302` before anything renders.
//! - **Request authenticator:** every API request carries
//!   `Authorization: Bearer <token>` while a session exists.
//! - **Response guard:** any `401` from the API ends the session and forces
//!   navigation to `/login`; the error still reaches the caller.
//!
//! ## Development API
//!
//! [`server`] implements the authentication endpoints the client consumes,
//! in memory, for local development and the end-to-end tests.

pub mod app;
#[path = "lib/mod.rs"]
pub mod app_lib;
pub mod cli;
pub mod components;
pub mod features;
pub mod routes;
pub mod server;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

pub use app::Browser;
pub use app_lib::{AppConfig, AppError, ExecutionContext};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
