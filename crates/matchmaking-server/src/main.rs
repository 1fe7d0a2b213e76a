//! TCP server for the matchmaking queue.

use matchmaking_server::config::Config;
use matchmaking_server::{logger, server};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    logger::init_logger(&config.log_level);

    info!(
        addr = %config.socket_addr_string(),
        max_clients = config.max_clients,
        ttl_secs = config.queue_ttl.as_secs(),
        ack_policy = config.ack_policy.as_str(),
        "starting matchmaking-server"
    );

    server::run(config).await
}
