use std::sync::Arc;

use tracing::{info, warn};

use cumulus::bot::{self, BotContext};
use cumulus::web::handlers::AppState;
use cumulus::{Config, Database, IngestService, ObjectStore, WebServer};

#[tokio::main]
async fn main() -> cumulus::Result<()> {
    // Load configuration
    let config = match Config::load("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };

    // Initialize logging
    if let Err(e) = cumulus::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        cumulus::logging::init_console_only(&config.logging.level);
    }

    info!("Cumulus - personal cloud file storage");

    let db = Arc::new(Database::open(&config.database.path).await?);
    let store = ObjectStore::new(&config.storage.path)?;
    info!("Object store initialized at {}", config.storage.path);

    let ingest = Arc::new(IngestService::new(db.clone(), store));

    // Start the Telegram relay when a token is configured
    match config.telegram.resolve_token() {
        Some(token) => {
            let ctx = BotContext::new(db.clone(), ingest.clone());
            tokio::spawn(bot::run(token, ctx));
        }
        None => {
            warn!("Telegram bot token not provided; bot relay disabled");
        }
    }

    let app_state = Arc::new(AppState::new(db, ingest));
    let server = WebServer::new(&config.server, app_state)?;
    server.run().await
}
