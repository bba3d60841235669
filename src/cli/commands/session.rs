//! Subcommands that drive the web pages against a running API.

use clap::{Arg, Command};

pub const REGISTER: &str = "register";
pub const LOGIN: &str = "login";
pub const LOGOUT: &str = "logout";
pub const WHOAMI: &str = "whoami";
pub const CHANGE_PASSWORD: &str = "change-password";

pub const ARG_EMAIL: &str = "email";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_CURRENT_PASSWORD: &str = "current-password";
pub const ARG_NEW_PASSWORD: &str = "new-password";

fn email() -> Arg {
    Arg::new(ARG_EMAIL)
        .short('e')
        .long("email")
        .help("Account email")
        .env("SUPERIMPRESS_EMAIL")
        .required(true)
}

fn password() -> Arg {
    Arg::new(ARG_PASSWORD)
        .long("password")
        .help("Account password")
        .env("SUPERIMPRESS_PASSWORD")
        .hide_env_values(true)
        .required(true)
}

#[must_use]
pub fn subcommands() -> Vec<Command> {
    vec![
        Command::new(REGISTER)
            .about("Create an account")
            .arg(email())
            .arg(password()),
        Command::new(LOGIN)
            .about("Log in and persist the session")
            .arg(email())
            .arg(password()),
        Command::new(LOGOUT).about("End the persisted session"),
        Command::new(WHOAMI).about("Show the account behind the persisted session"),
        Command::new(CHANGE_PASSWORD)
            .about("Change the password of the logged-in account")
            .arg(
                Arg::new(ARG_CURRENT_PASSWORD)
                    .long("current-password")
                    .help("Current password")
                    .env("SUPERIMPRESS_CURRENT_PASSWORD")
                    .hide_env_values(true)
                    .required(true),
            )
            .arg(
                Arg::new(ARG_NEW_PASSWORD)
                    .long("new-password")
                    .help("New password")
                    .env("SUPERIMPRESS_NEW_PASSWORD")
                    .hide_env_values(true)
                    .required(true),
            ),
    ]
}
