//! Shared test utilities.
//!
//! This module provides helpers for setting up an in-memory test database and
//! creating flights, users and sessions with sensible defaults.

use crate::{
    config::booking::RetryPolicy,
    core::{reservation, session::Session, user},
    entities::{Flight, flight, reservation::Model as ReservationModel, user::Model as UserModel},
    errors::Result,
};
use sea_orm::{ActiveModelTrait, ConnectOptions, DatabaseConnection, EntityTrait};
use tempfile::TempDir;

/// Creates an in-memory `SQLite` database with all tables initialized.
///
/// The pool is pinned to one connection: every `SQLite` in-memory connection is
/// its own database, and a single connection also serializes concurrent
/// transactions the way a locked file database would.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = sea_orm::Database::connect(options).await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a file-backed `SQLite` database served by a real connection pool.
///
/// Transactions here run on separate connections and contend for the database
/// lock, so conflicts surface as genuine `SQLITE_BUSY` errors. The database
/// lives as long as the returned directory.
pub async fn setup_file_db(max_connections: u32) -> Result<(TempDir, DatabaseConnection)> {
    let dir = TempDir::new()?;
    let url = format!(
        "sqlite://{}?mode=rwc",
        dir.path().join("flights.sqlite").display()
    );
    let mut options = ConnectOptions::new(url);
    options
        .max_connections(max_connections)
        .sqlx_logging(false);
    let db = sea_orm::Database::connect(options).await?;
    crate::config::database::create_tables(&db).await?;
    Ok((dir, db))
}

/// Builds a flight without storing it.
///
/// # Defaults
/// * `day_of_month`: 1
/// * `carrier_id`: "AS", `flight_num`: the fid
/// * `capacity`: 10
/// * `price`: 100
/// * `canceled`: false
#[must_use]
pub fn test_flight(fid: i64, origin: &str, destination: &str, duration: i32) -> flight::Model {
    flight::Model {
        fid,
        day_of_month: 1,
        carrier_id: "AS".to_string(),
        flight_num: fid.to_string(),
        origin_city: origin.to_string(),
        dest_city: destination.to_string(),
        duration_minutes: duration,
        capacity: 10,
        price: 100,
        canceled: false,
    }
}

/// A Seattle -> Boston flight on day 1 with the given duration and capacity.
#[must_use]
pub fn direct_flight(fid: i64, duration: i32, capacity: i32) -> flight::Model {
    flight::Model {
        capacity,
        ..test_flight(fid, "Seattle WA", "Boston MA", duration)
    }
}

/// Stores a flight.
pub async fn seed_flight(db: &DatabaseConnection, model: flight::Model) -> Result<flight::Model> {
    Flight::insert(flight::ActiveModel::from(model.clone()).reset_all())
        .exec(db)
        .await?;
    Ok(model)
}

/// Creates a user whose password is `"password"`.
pub async fn create_test_user(
    db: &DatabaseConnection,
    username: &str,
    balance: i64,
) -> Result<UserModel> {
    user::create_customer(db, RetryPolicy::no_retry(), username, "password", balance).await
}

/// A session logged in as a user created by [`create_test_user`].
pub async fn logged_in_session(db: &DatabaseConnection, username: &str) -> Result<Session> {
    let mut session = Session::new();
    user::login(db, &mut session, username, "password").await?;
    Ok(session)
}

/// Inserts a reservation row directly, bypassing the booking rules.
pub async fn insert_test_reservation(
    db: &DatabaseConnection,
    username: &str,
    fid1: i64,
    fid2: Option<i64>,
) -> Result<ReservationModel> {
    reservation::insert_reservation(db, username, fid1, fid2).await
}
