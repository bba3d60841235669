use crate::server;
use anyhow::Result;
use std::time::Duration;
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub token_ttl: Duration,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the port cannot be bound or the server fails.
pub async fn execute(args: Args) -> Result<()> {
    debug!("starting development API: {:?}", args);

    server::new(args.port, args.token_ttl).await
}
