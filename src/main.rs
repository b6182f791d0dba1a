use dotenvy::dotenv;
use factory_payroll::{
    bot,
    config::{app, database},
    core::{employee, settings, webhook},
    errors::{Error, Result},
};
use std::{env, sync::Arc};
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

    // 2. Load .env file; variables may also come from the environment
    dotenv().ok();

    // 3. Load config.toml (letterhead, initial settings, seed roster)
    let config = app::load_default_config()
        .inspect_err(|e| error!("Failed to load configuration: {e}"))?;

    // 4. Connect and create any missing tables
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    database::create_tables(&db).await?;
    info!("Database initialized");

    // 5. First-run seeding
    if let Some(initial) = &config.settings {
        if settings::seed_settings(&db, initial).await? {
            info!("Initial settings stored from configuration");
        }
    }
    employee::seed_roster(&db, &config.employees).await?;

    // 6. Run the bot
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {e}"))
        .map_err(Error::EnvVar)?;
    let http = webhook::build_client()?;

    bot::run_bot(token, Arc::new(config), db, http).await
}
