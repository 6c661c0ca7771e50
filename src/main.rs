#![allow(clippy::result_large_err)]

use dotenvy::dotenv;
use order_now::config::{self, database};
use order_now::errors::Result;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load settings, defaults when order_now.toml is absent
    let app_config = config::load_default_config()
        .inspect_err(|e| error!("Critical error loading application configuration: {}", e))?;

    // 4. Resolve the database URL; a missing password stops startup here
    let database_url = app_config
        .database_url()
        .inspect_err(|e| error!("Cannot build database URL: {}", e))?;

    // 5. Fail-fast check of the [security] costs; the authenticator is dropped
    let _authenticator = app_config
        .security
        .authenticator()
        .inspect(|_| info!("Password policy loaded."))
        .inspect_err(|e| error!("Invalid security settings: {}", e))?;

    // 6. Connect and create the schema
    let db = database::create_connection(&database_url)
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;

    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database schema initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    Ok(())
}
