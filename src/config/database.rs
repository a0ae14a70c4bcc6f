//! Database configuration module.
//!
//! This module handles the `SQLite` connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! structs without hand-written DDL.

use crate::entities::{Flight, Reservation, User};
use crate::errors::Result;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, EntityTrait, Schema,
    Statement, TransactionTrait,
};
use std::time::Duration;
use tracing::{info, instrument};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/flights.sqlite?mode=rwc";

/// Gets the database URL from the `DATABASE_URL` environment variable or
/// returns the default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection pool to the configured database.
///
/// A slow acquire is reported as a store error rather than waiting forever, so
/// callers under contention fail the operation instead of hanging.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let url = get_database_url();
    info!("Connecting to database at {url}");
    let mut options = ConnectOptions::new(url);
    options
        .acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false);

    Database::connect(options).await.map_err(Into::into)
}

/// Creates all tables that do not exist yet.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut user_table = schema.create_table_from_entity(User);
    let mut flight_table = schema.create_table_from_entity(Flight);
    let mut reservation_table = schema.create_table_from_entity(Reservation);

    user_table.if_not_exists();
    flight_table.if_not_exists();
    reservation_table.if_not_exists();

    db.execute(builder.build(&user_table)).await?;
    db.execute(builder.build(&flight_table)).await?;
    db.execute(builder.build(&reservation_table)).await?;

    Ok(())
}

/// Deletes every reservation and user and restarts the reservation id sequence.
///
/// This begins a new store lifetime: the next booking gets reservation id 1.
/// Flights are reference data and are left untouched.
#[instrument(skip(db))]
pub async fn clear_tables(db: &DatabaseConnection) -> Result<()> {
    let txn = db.begin().await?;

    Reservation::delete_many().exec(&txn).await?;
    User::delete_many().exec(&txn).await?;

    if txn.get_database_backend() == DbBackend::Sqlite {
        txn.execute(Statement::from_sql_and_values(
            DbBackend::Sqlite,
            "DELETE FROM sqlite_sequence WHERE name = ?",
            ["reservations".into()],
        ))
        .await?;
    }

    txn.commit().await?;
    info!("Cleared users and reservations");
    Ok(())
}
