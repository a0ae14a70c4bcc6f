//! Entity module - Contains all SeaORM entity definitions for the database.
//! Users and reservations are owned by the booking engine; flights are
//! read-only reference data.

/// Flight reference data
pub mod flight;
/// Booked itineraries
pub mod reservation;
/// Customer accounts
pub mod user;

pub use flight::{Entity as Flight, Model as FlightModel};
pub use reservation::{Entity as Reservation, Model as ReservationModel};
pub use user::{Entity as User, Model as UserModel};
