use store_server::{Config, Server, init_logger_with_file};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Environment (.env is optional)
    let _ = dotenv::dotenv();

    // 2. Configuration and logging
    let config = Config::from_env();
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());

    tracing::info!(
        environment = %config.environment,
        "Store server starting..."
    );

    // 3. Start the HTTP server (initializes state internally)
    let server = Server::new(config);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
