//! Bandit Inference Service Binary
//!
//! Runs the HTTP server for arm selection, reward ingestion, and
//! experiment creation.

use banditsvc::config::Config;
use banditsvc::service::Server;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    banditsvc::init_logging();
    let config = Config::from_env();
    Server::run(config).await
}
