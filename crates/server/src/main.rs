//! Senti Server binary - hotel review sentiment over HTTP.

use server::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Pick up a local .env when present; ignore a missing one.
    let _ = dotenvy::dotenv();

    // Load configuration
    let config = ServerConfig::load()?;

    // Start server (loads models eagerly before binding)
    server::start_server(config).await?;

    Ok(())
}
