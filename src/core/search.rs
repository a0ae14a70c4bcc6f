//! Itinerary search and ranking.
//!
//! Direct flights are fetched first; connections only fill whatever room the
//! direct results leave under the limit. The combined list is then stably
//! sorted by total duration, so equal-duration itineraries keep their
//! generation order (direct before indirect, store tie-break order within each
//! group).

use crate::{
    config::booking::RetryPolicy,
    core::{flight, itinerary::Itinerary, session::Session, store},
    entities::flight::Model as FlightModel,
    errors::{Error, Result},
};
use sea_orm::{ConnectionTrait, DatabaseConnection};
use tracing::{debug, instrument};

/// Parameters of a search call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Departure city
    pub origin: String,
    /// Arrival city
    pub destination: String,
    /// Skip one-stop connections
    pub direct_only: bool,
    /// Day of month, 1-30
    pub day: i32,
    /// Maximum number of itineraries, at least 1
    pub limit: i64,
}

impl SearchQuery {
    /// Checks the day and limit bounds.
    pub fn validate(&self) -> Result<()> {
        if self.day < 1 || self.day > 30 {
            return Err(Error::InvalidDay { day: self.day });
        }
        if self.limit <= 0 {
            return Err(Error::InvalidLimit { limit: self.limit });
        }
        Ok(())
    }
}

/// Searches itineraries and stores the ranked result in the session.
///
/// Every call invalidates the session's previous result first, even when the
/// query is rejected, fails, or finds nothing. Returns [`Error::NoResults`]
/// when no itinerary matches.
#[instrument(skip(db, policy, session))]
pub async fn search<'s>(
    db: &DatabaseConnection,
    policy: RetryPolicy,
    session: &'s mut Session,
    query: &SearchQuery,
) -> Result<&'s [Itinerary]> {
    session.replace_itineraries(Vec::new());
    query.validate()?;

    let ranked = store::serializable(db, policy, "search", move |txn| async move {
        let result = find_itineraries(&txn, query).await;
        (txn, result)
    })
    .await?;

    debug!("Found {} itineraries", ranked.len());
    if ranked.is_empty() {
        return Err(Error::NoResults);
    }
    Ok(session.replace_itineraries(ranked))
}

async fn find_itineraries<C>(db: &C, query: &SearchQuery) -> Result<Vec<Itinerary>>
where
    C: ConnectionTrait,
{
    let limit = u64::try_from(query.limit).map_err(|_| Error::InvalidLimit { limit: query.limit })?;

    let direct =
        flight::search_direct(db, &query.origin, &query.destination, query.day, limit).await?;

    let remaining = limit.saturating_sub(direct.len() as u64);
    let indirect = if query.direct_only || remaining == 0 {
        Vec::new()
    } else {
        flight::search_indirect(db, &query.origin, &query.destination, query.day, remaining)
            .await?
    };

    Ok(rank(direct, indirect))
}

/// Concatenates direct then indirect candidates and stably sorts by total
/// duration.
#[must_use]
pub fn rank(direct: Vec<FlightModel>, indirect: Vec<(FlightModel, FlightModel)>) -> Vec<Itinerary> {
    let mut itineraries: Vec<Itinerary> = direct
        .into_iter()
        .map(Itinerary::OneLeg)
        .chain(
            indirect
                .into_iter()
                .map(|(first, second)| Itinerary::TwoLeg(first, second)),
        )
        .collect();
    // `sort_by_key` is stable; equal durations keep generation order.
    itineraries.sort_by_key(Itinerary::total_duration);
    itineraries
}
