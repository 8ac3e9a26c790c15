//! # Birthday Reminder Bot Main Entry Point
//!
//! Initializes logging, loads configuration, sets up the database and the
//! conversation storage, starts the daily birthday scan and runs the
//! Telegram bot next to the health server.

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use birthday_reminder_bot::bot::conversation::ConversationStore;
use birthday_reminder_bot::bot::handlers::{BotContext, BotHandler};
use birthday_reminder_bot::config::Config;
use birthday_reminder_bot::database::connection::DatabaseManager;
use birthday_reminder_bot::services::birthday::{BirthdayScanJob, BirthdayService};
use birthday_reminder_bot::services::health::HealthService;
use birthday_reminder_bot::utils::logging::log_system_event;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "birthday_reminder_bot=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Arc::new(Config::from_env()?);

    info!("Starting Birthday Reminder Bot v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration loaded - Database: {}, HTTP Port: {}, Admins: {}, Scan: {:02}:{:02} {}",
        config.database_url,
        config.http_port,
        config.admin_ids.len(),
        config.notify_hour,
        config.notify_minute,
        config.timezone
    );
    if config.admin_ids.is_empty() {
        tracing::warn!("ADMIN_IDS is empty - nobody can manage employees or receive announcements");
    }

    // Initialize database
    info!("Initializing database connection...");
    let db_manager = DatabaseManager::new(&config.database_url).await?;
    info!("Running database migrations...");
    db_manager.run_migrations().await?;
    let db_arc = Arc::new(db_manager);
    info!("Database initialized successfully");

    let sessions = match &config.dialogue_db_path {
        Some(path) => {
            info!("Persisting conversation sessions in {}", path);
            ConversationStore::sqlite(path).await?
        }
        None => ConversationStore::in_memory(),
    };

    // Initialize bot
    info!("Initializing Telegram bot...");
    let bot = Bot::new(&config.telegram_bot_token);
    let ctx = BotContext::new(db_arc.as_ref().clone(), sessions, config.clone());
    let handler = BotHandler::new(ctx);
    info!("Telegram bot initialized successfully");

    // Initialize and start the birthday scan
    info!("Initializing birthday service...");
    let recipients = config.admin_ids.iter().map(|id| ChatId(*id as i64)).collect();
    let scan_job = BirthdayScanJob::new(bot.clone(), db_arc.clone(), recipients, config.timezone);
    let mut birthday_service =
        match BirthdayService::new(scan_job, config.notify_hour, config.notify_minute).await {
            Ok(service) => {
                info!("Birthday service initialized successfully");
                service
            }
            Err(e) => {
                tracing::error!("Failed to create birthday service: {}", e);
                return Err(anyhow::anyhow!("Failed to create birthday service: {}", e));
            }
        };

    if let Err(e) = birthday_service.start().await {
        tracing::error!("Failed to start birthday service: {}", e);
    } else {
        info!("Birthday service started successfully");
    }

    // Initialize health service
    let health_service = HealthService::new(db_arc.clone(), birthday_service.status());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.http_port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to port {}: {}", config.http_port, e))?;

    info!("Health check server starting on port {}", config.http_port);

    // Run both the bot and health server concurrently
    let bot_task = tokio::spawn(async move {
        Dispatcher::builder(bot, handler.schema())
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    });

    let health_task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, health_service.router).await {
            tracing::error!("Health server error: {}", e);
        }
    });

    // Wait for either task to complete (which would indicate shutdown)
    tokio::select! {
        result1 = bot_task => {
            if let Err(e) = result1 {
                tracing::error!("Bot task error: {}", e);
            }
        }
        result2 = health_task => {
            if let Err(e) = result2 {
                tracing::error!("Health task error: {}", e);
            }
        }
    }

    if let Err(e) = birthday_service.stop().await {
        tracing::warn!("Error stopping birthday service: {}", e);
    }

    log_system_event("Application stopped", None);
    Ok(())
}
