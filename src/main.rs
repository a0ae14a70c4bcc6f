use dotenvy::dotenv;
use flight_service::{
    cli::{self, AppData},
    config::{booking::RetryPolicy, database, flights},
    errors::Result,
};
use std::{env, path::Path};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // 2. Load .env file, env vars can also be set externally
    dotenv().ok();

    // 3. Connect and create tables
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    database::create_tables(&db).await?;
    info!("Database initialized successfully.");

    if env::var("RESET_ON_START").is_ok_and(|v| v == "true") {
        database::clear_tables(&db).await?;
    }

    // 4. Seed flights from the data file, if there is one
    let path = flights::config_path();
    if Path::new(&path).exists() {
        let config = flights::load_config(&path)?;
        let inserted = flights::seed_flights(&db, config).await?;
        info!("Seeded {inserted} new flights from {path}");
    } else {
        info!("No flight data at {path}, skipping seeding");
    }

    // 5. Serve clients
    let data = AppData::new(db, RetryPolicy::from_env());
    match env::var("LISTEN_ADDR") {
        Ok(addr) => cli::serve(data, &addr).await,
        Err(_) => cli::run_stdio(&data).await,
    }
}
