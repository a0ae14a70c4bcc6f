//! Reservation queries.
//!
//! Thin, parameterized accessors over the `reservations` table. They take any
//! [`ConnectionTrait`] so the booking engine can run them inside its
//! transactions.

use crate::{
    core::{flight, itinerary::Itinerary},
    entities::{Reservation, reservation},
    errors::{Error, Result},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

/// Number of reservations holding a seat on `fid` as either leg.
pub async fn count_reservations_for_flight<C>(db: &C, fid: i64) -> Result<u64>
where
    C: ConnectionTrait,
{
    Reservation::find()
        .filter(
            Condition::any()
                .add(reservation::Column::Fid1.eq(fid))
                .add(reservation::Column::Fid2.eq(fid)),
        )
        .count(db)
        .await
        .map_err(Into::into)
}

/// Inserts an unpaid reservation; the store assigns the next `rid`.
pub async fn insert_reservation<C>(
    db: &C,
    username: &str,
    fid1: i64,
    fid2: Option<i64>,
) -> Result<reservation::Model>
where
    C: ConnectionTrait,
{
    let booking = reservation::ActiveModel {
        username: Set(username.to_string()),
        fid1: Set(fid1),
        fid2: Set(fid2),
        paid: Set(false),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    booking.insert(db).await.map_err(Into::into)
}

/// All reservations of a user, ordered by `rid`.
pub async fn get_reservations_for_user<C>(
    db: &C,
    username: &str,
) -> Result<Vec<reservation::Model>>
where
    C: ConnectionTrait,
{
    Reservation::find()
        .filter(reservation::Column::Username.eq(username))
        .order_by_asc(reservation::Column::Rid)
        .all(db)
        .await
        .map_err(Into::into)
}

/// A reservation only if it belongs to `username`.
pub async fn get_reservation<C>(
    db: &C,
    username: &str,
    rid: i64,
) -> Result<Option<reservation::Model>>
where
    C: ConnectionTrait,
{
    Reservation::find_by_id(rid)
        .filter(reservation::Column::Username.eq(username))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Sets the paid flag.
pub async fn mark_paid<C>(db: &C, rid: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    let booking = reservation::ActiveModel {
        rid: Set(rid),
        paid: Set(true),
        ..Default::default()
    };
    booking.update(db).await?;
    Ok(())
}

/// Deletes a reservation, releasing its seats. The `rid` is not reissued.
pub async fn delete_reservation<C>(db: &C, rid: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    Reservation::delete_by_id(rid).exec(db).await?;
    Ok(())
}

/// Resolves a reservation's flight ids into an [`Itinerary`].
pub async fn itinerary_for<C>(db: &C, booking: &reservation::Model) -> Result<Itinerary>
where
    C: ConnectionTrait,
{
    let first = load_flight(db, booking.fid1).await?;
    match booking.fid2 {
        None => Ok(Itinerary::OneLeg(first)),
        Some(fid2) => Ok(Itinerary::TwoLeg(first, load_flight(db, fid2).await?)),
    }
}

async fn load_flight<C>(db: &C, fid: i64) -> Result<crate::entities::flight::Model>
where
    C: ConnectionTrait,
{
    flight::get_flight(db, fid)
        .await?
        .ok_or(Error::FlightNotFound { fid })
}
