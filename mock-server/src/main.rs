use anyhow::Context;
use envconfig::Envconfig;
use mock_server::{config::ServerConfig, logger};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logger::setup_simple_logger()?;
    let config = ServerConfig::init_from_env().context("invalid server configuration")?;
    let addr = config.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    mock_server::run(listener).await?;
    Ok(())
}
