//! GroupGuard Telegram Bot
//!
//! Main application entry point

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use groupguard::{
    config::Settings,
    database::{connection, DatabaseService},
    services::ServiceFactory,
    telegram::{HttpTelegramApi, TelegramApi},
    utils::logging,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging; the guard keeps the file writer alive
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting GroupGuard Telegram bot...");

    // Initialize database connection
    info!("Connecting to database...");
    let db_config = connection::DatabaseConfig {
        url: settings.database.url.clone(),
        max_connections: settings.database.max_connections,
        acquire_timeout: Duration::from_secs(30),
    };
    let pool = connection::create_pool(&db_config).await?;

    // Run database migrations
    connection::run_migrations(&pool).await?;
    connection::health_check(&pool).await?;

    let db = DatabaseService::new(pool);

    // Make sure the configured deployment has a bot_configs row
    let bootstrap = db.ensure_config(&settings).await?;
    info!(config_id = bootstrap.id, name = %bootstrap.name, "Bot configuration ready");

    // One poll worker per active configuration; each gets its own API
    // client built from that configuration's token.
    let configs = db.configs.list_active().await?;
    info!(count = configs.len(), "Spawning poll workers");

    let poll_interval = Duration::from_secs(settings.telegram.poll_interval_seconds);
    let request_timeout = Duration::from_secs(settings.telegram.request_timeout_seconds);

    let mut handles = Vec::new();
    for config in configs {
        let api: Arc<dyn TelegramApi> = Arc::new(HttpTelegramApi::new(
            &settings.telegram.api_url,
            &config.bot_token,
            request_timeout,
        )?);
        let services = ServiceFactory::new(db.clone(), api, &settings);

        handles.push(tokio::spawn(async move {
            services.poll_worker.run(config.id, poll_interval).await;
        }));
    }

    info!("GroupGuard is ready");
    futures::future::join_all(handles).await;

    Ok(())
}
