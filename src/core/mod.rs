//! Core business logic - framework-agnostic session, search and booking operations.
//!
//! Nothing here formats user-facing text; operations return structured data or
//! a typed [`crate::errors::Error`] and the command layer renders them.

/// Booking transaction engine: book, pay, cancel, list reservations
pub mod booking;
/// Flight queries and the direct/indirect search primitives
pub mod flight;
/// One- and two-leg itineraries
pub mod itinerary;
/// Reservation queries
pub mod reservation;
/// Itinerary search and ranking
pub mod search;
/// Per-client session state
pub mod session;
/// Serializable transaction harness with bounded retry
pub mod store;
/// Customer accounts and login
pub mod user;

pub use itinerary::Itinerary;
pub use session::{ItineraryHandle, Session, SessionState};
