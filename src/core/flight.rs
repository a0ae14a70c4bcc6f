//! Flight queries.
//!
//! Flights are read-only here. The two search primitives return candidates in
//! the order the ranking step relies on: direct flights by `(duration, fid)`
//! and connections by `(total duration, fid1, fid2)`.

use crate::{
    entities::{Flight, flight},
    errors::Result,
};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, EntityTrait, FromQueryResult, IdenStatic, Iterable,
    QueryFilter, QueryOrder, QuerySelect,
    sea_query::{Alias, ConditionalStatement, Expr, JoinType, Order, OrderedStatement, Query},
};

const FIRST_LEG: &str = "f1_";
const SECOND_LEG: &str = "f2_";

/// Finds a flight by id.
pub async fn get_flight<C>(db: &C, fid: i64) -> Result<Option<flight::Model>>
where
    C: ConnectionTrait,
{
    Flight::find_by_id(fid).one(db).await.map_err(Into::into)
}

/// Up to `limit` non-canceled direct flights, ordered by duration then fid.
pub async fn search_direct<C>(
    db: &C,
    origin: &str,
    destination: &str,
    day: i32,
    limit: u64,
) -> Result<Vec<flight::Model>>
where
    C: ConnectionTrait,
{
    Flight::find()
        .filter(flight::Column::OriginCity.eq(origin))
        .filter(flight::Column::DestCity.eq(destination))
        .filter(flight::Column::DayOfMonth.eq(day))
        .filter(flight::Column::Canceled.eq(false))
        .order_by_asc(flight::Column::DurationMinutes)
        .order_by_asc(flight::Column::Fid)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Up to `limit` one-stop connections on `day`.
///
/// A connection is a pair where the first flight leaves `origin`, the second
/// arrives at `destination`, the first lands where the second departs, and
/// neither is canceled. The pairing, ordering (total duration, then first fid,
/// then second fid) and limit all happen in one self-join on the store.
pub async fn search_indirect<C>(
    db: &C,
    origin: &str,
    destination: &str,
    day: i32,
    limit: u64,
) -> Result<Vec<(flight::Model, flight::Model)>>
where
    C: ConnectionTrait,
{
    let first = Alias::new("f1");
    let second = Alias::new("f2");

    let mut select = Query::select();
    for column in flight::Column::iter() {
        select
            .expr_as(
                Expr::col((first.clone(), column)),
                Alias::new(format!("{FIRST_LEG}{}", column.as_str())),
            )
            .expr_as(
                Expr::col((second.clone(), column)),
                Alias::new(format!("{SECOND_LEG}{}", column.as_str())),
            );
    }
    select
        .from_as(Flight, first.clone())
        .join_as(
            JoinType::InnerJoin,
            Flight,
            second.clone(),
            Condition::all()
                .add(
                    Expr::col((first.clone(), flight::Column::DestCity))
                        .equals((second.clone(), flight::Column::OriginCity)),
                )
                .add(
                    Expr::col((first.clone(), flight::Column::DayOfMonth))
                        .equals((second.clone(), flight::Column::DayOfMonth)),
                ),
        )
        .and_where(Expr::col((first.clone(), flight::Column::OriginCity)).eq(origin))
        .and_where(Expr::col((second.clone(), flight::Column::DestCity)).eq(destination))
        .and_where(Expr::col((first.clone(), flight::Column::DayOfMonth)).eq(day))
        .and_where(Expr::col((first.clone(), flight::Column::Canceled)).eq(false))
        .and_where(Expr::col((second.clone(), flight::Column::Canceled)).eq(false))
        .order_by_expr(
            Expr::col((first.clone(), flight::Column::DurationMinutes))
                .add(Expr::col((second.clone(), flight::Column::DurationMinutes))),
            Order::Asc,
        )
        .order_by((first, flight::Column::Fid), Order::Asc)
        .order_by((second, flight::Column::Fid), Order::Asc)
        .limit(limit);

    let rows = db.query_all(db.get_database_backend().build(&select)).await?;
    rows.iter()
        .map(|row| -> Result<(flight::Model, flight::Model)> {
            Ok((
                flight::Model::from_query_result(row, FIRST_LEG)?,
                flight::Model::from_query_result(row, SECOND_LEG)?,
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_get_flight() -> Result<()> {
        let db = setup_test_db().await?;
        seed_flight(&db, test_flight(7, "Seattle WA", "Boston MA", 300)).await?;

        assert_eq!(get_flight(&db, 7).await?.unwrap().fid, 7);
        assert!(get_flight(&db, 8).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_search_direct_orders_and_filters() -> Result<()> {
        let db = setup_test_db().await?;
        seed_flight(&db, test_flight(3, "Seattle WA", "Boston MA", 300)).await?;
        seed_flight(&db, test_flight(1, "Seattle WA", "Boston MA", 300)).await?;
        seed_flight(&db, test_flight(2, "Seattle WA", "Boston MA", 250)).await?;
        seed_flight(
            &db,
            flight::Model {
                canceled: true,
                ..test_flight(4, "Seattle WA", "Boston MA", 100)
            },
        )
        .await?;
        seed_flight(
            &db,
            flight::Model {
                day_of_month: 2,
                ..test_flight(5, "Seattle WA", "Boston MA", 100)
            },
        )
        .await?;
        seed_flight(&db, test_flight(6, "Boston MA", "Seattle WA", 100)).await?;

        let found = search_direct(&db, "Seattle WA", "Boston MA", 1, 10).await?;
        let fids: Vec<i64> = found.iter().map(|f| f.fid).collect();
        assert_eq!(fids, vec![2, 1, 3]);

        let limited = search_direct(&db, "Seattle WA", "Boston MA", 1, 2).await?;
        assert_eq!(limited.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_search_indirect_joins_on_layover() -> Result<()> {
        let db = setup_test_db().await?;
        seed_flight(&db, test_flight(1, "Seattle WA", "Chicago IL", 200)).await?;
        seed_flight(&db, test_flight(2, "Chicago IL", "Boston MA", 150)).await?;
        seed_flight(&db, test_flight(3, "Seattle WA", "Denver CO", 100)).await?;
        seed_flight(&db, test_flight(4, "Denver CO", "Boston MA", 200)).await?;
        // Lands in Chicago but the onward flight is canceled.
        seed_flight(
            &db,
            flight::Model {
                canceled: true,
                ..test_flight(5, "Chicago IL", "Boston MA", 10)
            },
        )
        .await?;
        // Wrong day for the second leg.
        seed_flight(
            &db,
            flight::Model {
                day_of_month: 9,
                ..test_flight(6, "Denver CO", "Boston MA", 10)
            },
        )
        .await?;

        let pairs = search_indirect(&db, "Seattle WA", "Boston MA", 1, 10).await?;
        let fids: Vec<(i64, i64)> = pairs.iter().map(|(a, b)| (a.fid, b.fid)).collect();
        assert_eq!(fids, vec![(3, 4), (1, 2)]);

        let limited = search_indirect(&db, "Seattle WA", "Boston MA", 1, 1).await?;
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].0.fid, 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_search_indirect_ties_break_on_fids() -> Result<()> {
        let db = setup_test_db().await?;
        seed_flight(&db, test_flight(10, "Seattle WA", "Chicago IL", 100)).await?;
        seed_flight(&db, test_flight(11, "Seattle WA", "Chicago IL", 100)).await?;
        seed_flight(&db, test_flight(21, "Chicago IL", "Boston MA", 100)).await?;
        seed_flight(&db, test_flight(20, "Chicago IL", "Boston MA", 100)).await?;

        let pairs = search_indirect(&db, "Seattle WA", "Boston MA", 1, 10).await?;
        let fids: Vec<(i64, i64)> = pairs.iter().map(|(a, b)| (a.fid, b.fid)).collect();
        assert_eq!(fids, vec![(10, 20), (10, 21), (11, 20), (11, 21)]);

        let limited = search_indirect(&db, "Seattle WA", "Boston MA", 1, 2).await?;
        let fids: Vec<(i64, i64)> = limited.iter().map(|(a, b)| (a.fid, b.fid)).collect();
        assert_eq!(fids, vec![(10, 20), (10, 21)]);
        Ok(())
    }

    #[tokio::test]
    async fn test_search_indirect_no_first_legs() -> Result<()> {
        let db = setup_test_db().await?;
        let pairs = search_indirect(&db, "Nowhere", "Boston MA", 1, 10).await?;
        assert!(pairs.is_empty());
        Ok(())
    }
}
