use dotenvy::dotenv;
use habit_buddy::{
    bot,
    config::{database, settings},
    core::tracker::Tracker,
    errors::{Error, Result},
};
use std::env;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load settings (storage keys, database URL, task catalog)
    let settings = settings::load_default_settings()
        .inspect_err(|e| error!("Failed to load settings: {}", e))?;

    // 4. Connect to the database and make sure the schema exists
    let db = database::create_connection(&settings.database_url())
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Restore the session
    let tracker = Tracker::open(db, settings.storage_keys(), settings.catalog()).await?;

    // 6. Run the bot
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {}", e))
        .map_err(Error::EnvVar)?;

    bot::run_bot(token, tracker).await
}
