use std::sync::Arc;

use tracing::{error, info};

use anonboard::web::WebServer;
use anonboard::{Argon2Verifier, BoardService, Config, Database, SqliteBoardRepository};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load_with_env("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    // Initialize logging
    if let Err(e) = anonboard::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        anonboard::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = run(config).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(config: Config) -> anonboard::Result<()> {
    config.validate()?;

    info!("anonboard - anonymous message board");
    info!(
        "Server configured on {}:{}",
        config.server.host, config.server.port
    );

    let db = Database::connect(&config.database.path).await?;
    let repo = Arc::new(SqliteBoardRepository::new(db.pool()));
    let verifier = Arc::new(Argon2Verifier::new(&config.secret)?);
    let service = BoardService::new(repo, verifier);

    let server = WebServer::new(&config.server, service)?;
    let result = server
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {e}");
            }
            info!("Shutting down...");
        })
        .await;

    db.close().await;
    result?;

    info!("Server stopped.");
    Ok(())
}
