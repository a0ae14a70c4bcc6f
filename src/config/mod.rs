/// Database configuration and connection management
pub mod database;

/// Reference flight loading from flights.toml
pub mod flights;

/// Booking engine tuning from environment variables
pub mod booking;
