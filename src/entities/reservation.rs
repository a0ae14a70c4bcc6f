//! Reservation entity - A booked itinerary held by one user.
//!
//! `rid` is assigned by the store from an `AUTOINCREMENT` sequence, so ids grow
//! strictly and a deleted reservation never gives its id back. `fid2` is only
//! set for two-leg itineraries.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Reservation database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reservations")]
pub struct Model {
    /// Reservation id, monotonically assigned and never reused
    #[sea_orm(primary_key)]
    pub rid: i64,
    /// Owner of the reservation
    pub username: String,
    /// First leg
    pub fid1: i64,
    /// Second leg, absent for direct itineraries
    pub fid2: Option<i64>,
    /// Whether the reservation has been paid for
    pub paid: bool,
    /// When the reservation was booked
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Reservation and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each reservation belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::Username",
        to = "super::user::Column::Username"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
