//! Command handlers organized by category.
//!
//! Handlers never fail: every error is turned into the response text the
//! client sees. Store failures are logged before being reported as a plain
//! failure message.

/// Account commands (create, login)
pub mod account;

/// Reservation commands (book, pay, cancel, reservations)
pub mod booking;

/// Flight search
pub mod search;

use crate::{
    cli::{AppData, parser::Command},
    core::Session,
    errors::{Error, ErrorKind},
};
use tracing::{debug, error};

/// Runs one parsed command and returns the response text.
pub async fn execute(data: &AppData, session: &mut Session, command: Command) -> String {
    match command {
        Command::Create {
            username,
            password,
            amount,
        } => account::create(data, &username, &password, amount).await,
        Command::Login { username, password } => {
            account::login(data, session, &username, &password).await
        }
        Command::Search(query) => search::search(data, session, &query).await,
        Command::Book { itinerary } => booking::book(data, session, itinerary).await,
        Command::Pay { rid } => booking::pay(data, session, rid).await,
        Command::Reservations => booking::reservations(data, session).await,
        Command::Cancel { rid } => booking::cancel(data, session, rid).await,
        Command::Quit => "Goodbye\n".to_string(),
    }
}

/// Logs a failed command at a level matching its cause.
fn log_failure(command: &str, err: &Error) {
    match err.kind() {
        ErrorKind::Store => error!(command, "Command failed: {err}"),
        _ => debug!(command, "Command rejected: {err}"),
    }
}
