use kitchen_server::{Config, Server, ServerState, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment (dotenv, logging)
    setup_environment();

    tracing::info!("Saangee's Kitchen server starting...");

    // 2. Configuration
    let config = Config::from_env();

    // 3. Services (database, token validation)
    let state = ServerState::initialize(&config)
        .await
        .map_err(|e| anyhow::anyhow!("initialization failed: {e}"))?;

    // 4. HTTP server
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {e}");
        return Err(anyhow::anyhow!("server exited with error: {e}"));
    }

    Ok(())
}
