//! Booking transaction engine - book, pay, cancel and list reservations.
//!
//! Each operation checks the session first and touches the store only when a
//! user is logged in. Every read-then-write sequence runs inside one
//! serializable transaction from [`store::serializable`], so seat counts, the
//! same-day rule and balance arithmetic are never decided on state another
//! session is halfway through changing. Business-rule rejections roll the
//! transaction back before the error reaches the caller.

use crate::{
    config::booking::RetryPolicy,
    core::{
        flight,
        itinerary::Itinerary,
        reservation,
        session::{ItineraryHandle, Session},
        store, user,
    },
    entities::reservation::Model as ReservationModel,
    errors::{Error, Result},
};
use sea_orm::{ConnectionTrait, DatabaseConnection};
use tracing::{info, instrument};

/// A reservation together with its resolved flights.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationDetails {
    /// Stored row
    pub reservation: ReservationModel,
    /// Flights behind `fid1` and `fid2`
    pub itinerary: Itinerary,
}

/// Result of a successful payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Payment {
    /// Paid reservation
    pub rid: i64,
    /// Amount deducted
    pub cost: i64,
    /// Balance after payment, always positive
    pub remaining_balance: i64,
}

/// Result of a successful cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancellation {
    /// Deleted reservation
    pub rid: i64,
    /// Zero when the reservation had not been paid
    pub refund: i64,
}

/// Books the itinerary behind `handle` for the logged-in user.
///
/// Returns the new reservation id. Fails with [`Error::NoSuchItinerary`] for an
/// out-of-range or stale handle, [`Error::SameDayConflict`] when the user
/// already has a reservation whose first flight is on the same day, and
/// [`Error::FlightFull`] when any leg has no seat left.
#[instrument(skip(db, policy, session))]
pub async fn book(
    db: &DatabaseConnection,
    policy: RetryPolicy,
    session: &Session,
    handle: ItineraryHandle,
) -> Result<i64> {
    let username = session.require_login()?;
    let itinerary = session.resolve(handle)?;

    let booked = store::serializable(db, policy, "book", move |txn| async move {
        let result = reserve(&txn, username, itinerary).await;
        (txn, result)
    })
    .await?;

    info!(rid = booked.rid, "Booked itinerary for {username}");
    Ok(booked.rid)
}

async fn reserve<C>(db: &C, username: &str, itinerary: &Itinerary) -> Result<ReservationModel>
where
    C: ConnectionTrait,
{
    let day = itinerary.day();
    for existing in reservation::get_reservations_for_user(db, username).await? {
        let first_leg = flight::get_flight(db, existing.fid1)
            .await?
            .ok_or(Error::FlightNotFound { fid: existing.fid1 })?;
        if first_leg.day_of_month == day {
            return Err(Error::SameDayConflict { day });
        }
    }

    let first = itinerary.first();
    if available_seats(db, first.fid).await? <= 0 {
        return Err(Error::FlightFull { fid: first.fid });
    }
    // A direct itinerary has no second leg to fill up.
    let second_fid = match itinerary {
        Itinerary::OneLeg(_) => None,
        Itinerary::TwoLeg(_, second) => {
            if available_seats(db, second.fid).await? <= 0 {
                return Err(Error::FlightFull { fid: second.fid });
            }
            Some(second.fid)
        }
    };

    reservation::insert_reservation(db, username, first.fid, second_fid).await
}

/// `capacity - occupied` for a stored flight.
async fn available_seats<C>(db: &C, fid: i64) -> Result<i64>
where
    C: ConnectionTrait,
{
    let stored = flight::get_flight(db, fid)
        .await?
        .ok_or(Error::FlightNotFound { fid })?;
    let occupied = reservation::count_reservations_for_flight(db, fid).await?;
    Ok(i64::from(stored.capacity) - i64::try_from(occupied).unwrap_or(i64::MAX))
}

/// Pays for an unpaid reservation of the logged-in user.
///
/// Missing and already-paid reservations are reported identically as
/// [`Error::ReservationNotFoundOrAlreadyPaid`]. The payment only goes through
/// when the balance stays strictly positive afterwards; otherwise
/// [`Error::InsufficientFunds`] reports the current balance and the cost.
#[instrument(skip(db, policy, session))]
pub async fn pay(
    db: &DatabaseConnection,
    policy: RetryPolicy,
    session: &Session,
    rid: i64,
) -> Result<Payment> {
    let username = session.require_login()?;

    let payment = store::serializable(db, policy, "pay", move |txn| async move {
        let result = settle(&txn, username, rid).await;
        (txn, result)
    })
    .await?;

    info!(
        rid,
        remaining_balance = payment.remaining_balance,
        "Paid reservation"
    );
    Ok(payment)
}

async fn settle<C>(db: &C, username: &str, rid: i64) -> Result<Payment>
where
    C: ConnectionTrait,
{
    let not_payable = || Error::ReservationNotFoundOrAlreadyPaid {
        rid,
        username: username.to_string(),
    };
    let booking = reservation::get_reservation(db, username, rid)
        .await?
        .filter(|booking| !booking.paid)
        .ok_or_else(not_payable)?;

    let cost = reservation::itinerary_for(db, &booking).await?.price();
    let account = user::get_user(db, username)
        .await?
        .ok_or_else(|| Error::UserNotFound {
            username: username.to_string(),
        })?;

    let remaining_balance = account.balance - cost;
    if remaining_balance <= 0 {
        return Err(Error::InsufficientFunds {
            balance: account.balance,
            cost,
        });
    }

    user::update_balance(db, username, remaining_balance).await?;
    reservation::mark_paid(db, rid).await?;
    Ok(Payment {
        rid,
        cost,
        remaining_balance,
    })
}

/// Cancels a reservation of the logged-in user.
///
/// A paid reservation refunds the full price of its flights; an unpaid one
/// refunds nothing. The row is deleted, freeing its seats, and its id is never
/// handed out again.
#[instrument(skip(db, policy, session))]
pub async fn cancel(
    db: &DatabaseConnection,
    policy: RetryPolicy,
    session: &Session,
    rid: i64,
) -> Result<Cancellation> {
    let username = session.require_login()?;

    let cancellation = store::serializable(db, policy, "cancel", move |txn| async move {
        let result = release(&txn, username, rid).await;
        (txn, result)
    })
    .await?;

    info!(rid, refund = cancellation.refund, "Canceled reservation");
    Ok(cancellation)
}

async fn release<C>(db: &C, username: &str, rid: i64) -> Result<Cancellation>
where
    C: ConnectionTrait,
{
    let booking = reservation::get_reservation(db, username, rid)
        .await?
        .ok_or(Error::NoSuchReservation { rid })?;

    let refund = if booking.paid {
        reservation::itinerary_for(db, &booking).await?.price()
    } else {
        0
    };

    if refund > 0 {
        let account = user::get_user(db, username)
            .await?
            .ok_or_else(|| Error::UserNotFound {
                username: username.to_string(),
            })?;
        user::update_balance(db, username, account.balance + refund).await?;
    }
    reservation::delete_reservation(db, rid).await?;

    Ok(Cancellation { rid, refund })
}

/// All reservations of the logged-in user ordered by id, with flights resolved.
///
/// Returns [`Error::NoReservations`] when the user has none.
#[instrument(skip(db, policy, session))]
pub async fn list_reservations(
    db: &DatabaseConnection,
    policy: RetryPolicy,
    session: &Session,
) -> Result<Vec<ReservationDetails>> {
    let username = session.require_login()?;

    let details = store::serializable(db, policy, "list_reservations", move |txn| async move {
        let result = load_reservations(&txn, username).await;
        (txn, result)
    })
    .await?;

    if details.is_empty() {
        return Err(Error::NoReservations);
    }
    Ok(details)
}

async fn load_reservations<C>(db: &C, username: &str) -> Result<Vec<ReservationDetails>>
where
    C: ConnectionTrait,
{
    let mut details = Vec::new();
    for booking in reservation::get_reservations_for_user(db, username).await? {
        let itinerary = reservation::itinerary_for(db, &booking).await?;
        details.push(ReservationDetails {
            reservation: booking,
            itinerary,
        });
    }
    Ok(details)
}
