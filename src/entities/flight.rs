//! Flight entity - Immutable reference data describing one scheduled flight.
//!
//! Flights are seeded at startup and never created or mutated by the booking
//! engine. Canceled flights stay in the table but are never offered by search.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Flight database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "flights")]
pub struct Model {
    /// Unique flight identifier
    #[sea_orm(primary_key, auto_increment = false)]
    pub fid: i64,
    /// Day of the month the flight departs (1-30)
    pub day_of_month: i32,
    /// Operating carrier code (e.g. `"AS"`)
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
    /// Ticket price in whole currency units
    pub price: i64,
    /// Canceled flights are excluded from search
    pub canceled: bool,
}

/// Flights have no outgoing relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
