use clap::{Arg, Command};

pub const SUBCOMMAND: &str = "serve";
pub const ARG_PORT: &str = "port";
pub const ARG_TOKEN_TTL_MINUTES: &str = "token-ttl-minutes";

#[must_use]
pub fn subcommand() -> Command {
    Command::new(SUBCOMMAND)
        .about("Run the development authentication API")
        .arg(
            Arg::new(ARG_PORT)
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8000")
                .env("SUPERIMPRESS_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new(ARG_TOKEN_TTL_MINUTES)
                .long("token-ttl-minutes")
                .help("Lifetime of issued access tokens in minutes")
                .default_value("30")
                .env("SUPERIMPRESS_TOKEN_TTL_MINUTES")
                .value_parser(clap::value_parser!(u64)),
        )
}
