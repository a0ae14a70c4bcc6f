//! Reference flight loading from flights.toml
//!
//! The booking engine never creates flights, so a deployment seeds them from a
//! TOML file at startup. Seeding only inserts flights whose `fid` is missing;
//! existing rows are left as they are.

use crate::entities::{Flight, flight};
use crate::errors::{Error, Result};
use sea_orm::{DatabaseConnection, EntityTrait, Set};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Configuration structure representing the entire flights.toml file
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Flights to seed
    #[serde(default)]
    pub flights: Vec<FlightConfig>,
}

/// Configuration for a single flight
#[derive(Debug, Deserialize, Clone)]
pub struct FlightConfig {
    /// Flight id, also the dedup key when seeding
    pub fid: i64,
    /// Day of the month (1-30)
    pub day_of_month: i32,
    /// Carrier code
    pub carrier_id: String,
    /// Carrier flight number
    pub flight_num: String,
    /// Departure city
    pub origin_city: String,
    /// Arrival city
    pub dest_city: String,
    /// Flight time in minutes
    pub duration_minutes: i32,
    /// Total seats
    pub capacity: i32,
    /// Ticket price
    pub price: i64,
    /// Defaults to false
    #[serde(default)]
    pub canceled: bool,
}

impl From<FlightConfig> for flight::ActiveModel {
    fn from(config: FlightConfig) -> Self {
        Self {
            fid: Set(config.fid),
            day_of_month: Set(config.day_of_month),
            carrier_id: Set(config.carrier_id),
            flight_num: Set(config.flight_num),
            origin_city: Set(config.origin_city),
            dest_city: Set(config.dest_city),
            duration_minutes: Set(config.duration_minutes),
            capacity: Set(config.capacity),
            price: Set(config.price),
            canceled: Set(config.canceled),
        }
    }
}

/// Loads flight configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read flights file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse flights file: {e}"),
    })
}

/// Path of the flights file, from `FLIGHTS_CONFIG` or `./flights.toml`.
#[must_use]
pub fn config_path() -> String {
    std::env::var("FLIGHTS_CONFIG").unwrap_or_else(|_| "flights.toml".to_string())
}

/// Inserts every configured flight that is not already stored.
///
/// Returns the number of flights inserted.
pub async fn seed_flights(db: &DatabaseConnection, config: Config) -> Result<usize> {
    let mut inserted = 0;
    for flight_config in config.flights {
        if Flight::find_by_id(flight_config.fid).one(db).await?.is_some() {
            continue;
        }
        Flight::insert(flight::ActiveModel::from(flight_config))
            .exec(db)
            .await?;
        inserted += 1;
    }
    info!("Seeded {inserted} flights");
    Ok(inserted)
}
