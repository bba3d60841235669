//! Command-line argument dispatch.
//!
//! Maps validated CLI matches to an action: the development API server or
//! one of the session commands that drive the web pages.

use crate::cli::{
    actions::{server, session, Action},
    commands::{self, client},
};
use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;
use secrecy::SecretString;
use std::time::Duration;

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    let (name, sub) = matches
        .subcommand()
        .context("missing subcommand")?;

    if name == commands::server::SUBCOMMAND {
        return server_args(sub);
    }

    let command = match name {
        commands::session::REGISTER => session::Command::Register {
            email: required(sub, commands::session::ARG_EMAIL)?,
            password: secret(sub, commands::session::ARG_PASSWORD)?,
        },
        commands::session::LOGIN => session::Command::Login {
            email: required(sub, commands::session::ARG_EMAIL)?,
            password: secret(sub, commands::session::ARG_PASSWORD)?,
        },
        commands::session::LOGOUT => session::Command::Logout,
        commands::session::WHOAMI => session::Command::Whoami,
        commands::session::CHANGE_PASSWORD => session::Command::ChangePassword {
            current_password: secret(sub, commands::session::ARG_CURRENT_PASSWORD)?,
            new_password: secret(sub, commands::session::ARG_NEW_PASSWORD)?,
        },
        other => return Err(anyhow!("unknown subcommand: {other}")),
    };

    Ok(Action::Session(session::Args {
        config: client::config(matches),
        command,
    }))
}

fn server_args(matches: &ArgMatches) -> Result<Action> {
    let port = matches
        .get_one::<u16>(commands::server::ARG_PORT)
        .copied()
        .unwrap_or(8000);
    let ttl_minutes = matches
        .get_one::<u64>(commands::server::ARG_TOKEN_TTL_MINUTES)
        .copied()
        .unwrap_or(30);

    Ok(Action::Server(server::Args {
        port,
        token_ttl: Duration::from_secs(ttl_minutes.saturating_mul(60)),
    }))
}

fn required(matches: &ArgMatches, id: &str) -> Result<String> {
    matches
        .get_one::<String>(id)
        .map(|value| value.trim().to_string())
        .with_context(|| format!("missing required argument: --{id}"))
}

fn secret(matches: &ArgMatches, id: &str) -> Result<SecretString> {
    matches
        .get_one::<String>(id)
        .map(|value| SecretString::from(value.clone()))
        .with_context(|| format!("missing required argument: --{id}"))
}
