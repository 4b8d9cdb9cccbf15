use std::sync::Arc;

use serenity::http::Http;

use crate::{
    bot::{calendar::DiscordScheduledEvents, renderer::DiscordRenderer},
    config::Config,
    data::guild_store::GuildStore,
    error::AppError,
    service::{event_workflow::EventWorkflow, log_sink::LogSink},
    state::AppState,
};

/// Connects to the Sqlite database and runs pending migrations.
///
/// # Arguments
/// - `config` - Application configuration containing the database URL
///
/// # Returns
/// - `Ok(DatabaseConnection)` - Connected database with migrations applied
/// - `Err(AppError::DbErr)` - Failed to connect to database or run migrations
pub async fn connect_to_database(config: &Config) -> Result<sea_orm::DatabaseConnection, AppError> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let mut opt = ConnectOptions::new(&config.database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Builds the shared state: guild store, log sink, and the event workflow wired to the
/// Discord renderer and scheduled-event client.
pub async fn build_state(
    config: &Config,
    db: sea_orm::DatabaseConnection,
) -> Result<AppState, AppError> {
    let store = GuildStore::new(db);
    let log = Arc::new(LogSink::load(config.log_file_path.clone(), store.clone()).await);
    let http = Arc::new(Http::new(&config.discord_bot_token));

    let workflow = EventWorkflow::new(
        store.clone(),
        log.clone(),
        Arc::new(DiscordRenderer::new(http.clone())),
        Arc::new(DiscordScheduledEvents::new(http)),
    );

    Ok(AppState {
        store,
        log,
        workflow: Arc::new(workflow),
        command_prefix: config.command_prefix.clone(),
        bot_owner_id: config.bot_owner_id,
    })
}
