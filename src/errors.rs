//! Unified error types for the booking service.
//!
//! Every fallible operation returns [`Result`]. Variants are grouped by
//! [`ErrorKind`] so the front end can tell a business-rule rejection (which has
//! a specific user-facing message) from a store failure (which never leaks
//! internal detail to the caller).

use sea_orm::{DbErr, RuntimeErr, sqlx};
use thiserror::Error;

/// Broad classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input (day, limit, initial balance, command syntax)
    Validation,
    /// Not logged in, already logged in, bad credentials
    Auth,
    /// Unknown itinerary index or reservation
    NotFound,
    /// Same-day conflict, full flight, insufficient balance, duplicate user
    BusinessRule,
    /// Transaction conflict, timeout, connectivity, configuration
    Store,
}

/// Application error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Day of month outside 1-30
    #[error("Invalid day of month: {day}")]
    InvalidDay {
        /// Rejected day
        day: i32,
    },

    /// Itinerary count below 1
    #[error("Invalid itinerary count: {limit}")]
    InvalidLimit {
        /// Rejected count
        limit: i64,
    },

    /// Negative initial balance
    #[error("Invalid initial balance: {amount}")]
    InvalidAmount {
        /// Rejected amount
        amount: i64,
    },

    /// Unparsable command line
    #[error("Invalid command: {message}")]
    InvalidCommand {
        /// What was wrong with the line
        message: String,
    },

    /// Operation requires a logged-in session
    #[error("Not logged in")]
    NotLoggedIn,

    /// Session is already logged in
    #[error("User already logged in")]
    AlreadyLoggedIn,

    /// Unknown user or wrong password
    #[error("Login failed")]
    AuthFailed,

    /// Index outside the current search result, or from an earlier search
    #[error("No such itinerary {index}")]
    NoSuchItinerary {
        /// Requested position
        index: usize,
    },

    /// Search matched nothing
    #[error("No flights match your selection")]
    NoResults,

    /// User holds no reservations
    #[error("No reservations found")]
    NoReservations,

    /// Reservation is missing, belongs to someone else, or is already paid
    #[error("Cannot find unpaid reservation {rid} under user: {username}")]
    ReservationNotFoundOrAlreadyPaid {
        /// Requested reservation
        rid: i64,
        /// Logged-in user
        username: String,
    },

    /// Reservation is missing or belongs to someone else
    #[error("No such reservation {rid}")]
    NoSuchReservation {
        /// Requested reservation
        rid: i64,
    },

    /// A reservation refers to a flight that is not stored
    #[error("Flight {fid} not found")]
    FlightNotFound {
        /// Missing flight
        fid: i64,
    },

    /// The logged-in user's row is gone
    #[error("User {username} not found")]
    UserNotFound {
        /// Missing user
        username: String,
    },

    /// Username is taken
    #[error("User {username} already exists")]
    DuplicateUser {
        /// Taken username
        username: String,
    },

    /// User already has a reservation on this day
    #[error("You cannot book two flights in the same day")]
    SameDayConflict {
        /// Conflicting day of month
        day: i32,
    },

    /// A leg has no seat left
    #[error("Flight {fid} has no available seats")]
    FlightFull {
        /// Full flight
        fid: i64,
    },

    /// Paying would not leave a positive balance
    #[error("User has only {balance} in account but itinerary costs {cost}")]
    InsufficientFunds {
        /// Balance before payment
        balance: i64,
        /// Itinerary price
        cost: i64,
    },

    /// Store failure, including transaction conflicts
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// Bad configuration file or value
    #[error("Configuration error: {message}")]
    Config {
        /// What was wrong
        message: String,
    },

    /// Socket or terminal failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns the taxonomy bucket of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidDay { .. }
            | Self::InvalidLimit { .. }
            | Self::InvalidAmount { .. }
            | Self::InvalidCommand { .. } => ErrorKind::Validation,
            Self::NotLoggedIn | Self::AlreadyLoggedIn | Self::AuthFailed => ErrorKind::Auth,
            Self::NoSuchItinerary { .. }
            | Self::NoResults
            | Self::NoReservations
            | Self::ReservationNotFoundOrAlreadyPaid { .. }
            | Self::NoSuchReservation { .. }
            | Self::FlightNotFound { .. }
            | Self::UserNotFound { .. } => ErrorKind::NotFound,
            Self::DuplicateUser { .. }
            | Self::SameDayConflict { .. }
            | Self::FlightFull { .. }
            | Self::InsufficientFunds { .. } => ErrorKind::BusinessRule,
            Self::Database(_) | Self::Config { .. } | Self::Io(_) => ErrorKind::Store,
        }
    }

    /// Whether the failed transaction may be retried from scratch.
    ///
    /// Only store-level contention qualifies: `SQLite` busy/locked and
    /// serialization failures (SQLSTATE 40001) or deadlocks (40P01).
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Database(err) => is_conflict(err),
            _ => false,
        }
    }
}

fn is_conflict(err: &DbErr) -> bool {
    let runtime = match err {
        DbErr::Conn(e) | DbErr::Exec(e) | DbErr::Query(e) => e,
        DbErr::ConnectionAcquire(_) => return true,
        _ => return false,
    };
    match runtime {
        RuntimeErr::SqlxError(sqlx::Error::Database(db_err)) => db_err
            .code()
            .is_some_and(|code| matches!(code.as_ref(), "5" | "6" | "517" | "40001" | "40P01")),
        RuntimeErr::SqlxError(sqlx::Error::PoolTimedOut) => true,
        RuntimeErr::Internal(message) => {
            message.contains("database is locked") || message.contains("database is busy")
        }
        _ => false,
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
