//! Reservation commands - book, pay, cancel and list.
//!
//! All four require a logged-in session; each has its own not-logged-in text.

use super::log_failure;
use crate::{
    cli::{AppData, format},
    core::{Session, booking},
    errors::Error,
};
use tracing::instrument;

/// `book <itinerary id>`
#[instrument(skip(data, session))]
pub async fn book(data: &AppData, session: &Session, itinerary: i64) -> String {
    if session.username().is_none() {
        return "Cannot book reservations, not logged in\n".to_string();
    }
    let Ok(index) = usize::try_from(itinerary) else {
        return format!("No such itinerary {itinerary}\n");
    };

    match booking::book(&data.database, data.retry, session, session.handle(index)).await {
        Ok(rid) => format!("Booked flight(s), reservation ID: {rid}\n"),
        Err(Error::NoSuchItinerary { index }) => format!("No such itinerary {index}\n"),
        Err(Error::SameDayConflict { .. }) => {
            "You cannot book two flights in the same day\n".to_string()
        }
        Err(err) => {
            log_failure("book", &err);
            "Booking failed\n".to_string()
        }
    }
}

/// `pay <reservation id>`
#[instrument(skip(data, session))]
pub async fn pay(data: &AppData, session: &Session, rid: i64) -> String {
    match booking::pay(&data.database, data.retry, session, rid).await {
        Ok(payment) => format!(
            "Paid reservation: {} remaining balance: {}\n",
            payment.rid, payment.remaining_balance
        ),
        Err(Error::NotLoggedIn) => "Cannot pay, not logged in\n".to_string(),
        Err(
            err @ (Error::ReservationNotFoundOrAlreadyPaid { .. } | Error::InsufficientFunds { .. }),
        ) => format!("{err}\n"),
        Err(err) => {
            log_failure("pay", &err);
            format!("Failed to pay for reservation {rid}\n")
        }
    }
}

/// `reservations`
#[instrument(skip(data, session))]
pub async fn reservations(data: &AppData, session: &Session) -> String {
    match booking::list_reservations(&data.database, data.retry, session).await {
        Ok(details) => format::reservation_listing(&details),
        Err(Error::NotLoggedIn) => "Cannot view reservations, not logged in\n".to_string(),
        Err(Error::NoReservations) => "No reservations found\n".to_string(),
        Err(err) => {
            log_failure("reservations", &err);
            "Failed to retrieve reservations\n".to_string()
        }
    }
}

/// `cancel <reservation id>`
#[instrument(skip(data, session))]
pub async fn cancel(data: &AppData, session: &Session, rid: i64) -> String {
    match booking::cancel(&data.database, data.retry, session, rid).await {
        Ok(cancellation) => format!("Canceled reservation {}\n", cancellation.rid),
        Err(Error::NotLoggedIn) => "Cannot cancel reservations, not logged in\n".to_string(),
        Err(err) => {
            log_failure("cancel", &err);
            format!("Failed to cancel reservation {rid}\n")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::test_app;
    use crate::errors::Result;

    #[tokio::test]
    async fn test_logged_out_messages() -> Result<()> {
        let data = test_app().await?;
        let session = Session::new();

        assert_eq!(
            book(&data, &session, 0).await,
            "Cannot book reservations, not logged in\n"
        );
        assert_eq!(pay(&data, &session, 1).await, "Cannot pay, not logged in\n");
        assert_eq!(
            reservations(&data, &session).await,
            "Cannot view reservations, not logged in\n"
        );
        assert_eq!(
            cancel(&data, &session, 1).await,
            "Cannot cancel reservations, not logged in\n"
        );

        Ok(())
    }
}
