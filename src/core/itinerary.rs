//! Itineraries are one or two flights offered by a search.
//!
//! They are never persisted; a booked itinerary becomes a reservation row with
//! `fid2` set only for the two-leg case.

use crate::entities::flight;

/// A travel plan of one direct flight or two connecting flights.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Itinerary {
    /// A single direct flight
    OneLeg(flight::Model),
    /// Two flights connecting through an intermediate city
    TwoLeg(flight::Model, flight::Model),
}

impl Itinerary {
    /// The first (or only) flight.
    #[must_use]
    pub const fn first(&self) -> &flight::Model {
        match self {
            Self::OneLeg(first) | Self::TwoLeg(first, _) => first,
        }
    }

    /// The connecting flight, if any.
    #[must_use]
    pub const fn second(&self) -> Option<&flight::Model> {
        match self {
            Self::OneLeg(_) => None,
            Self::TwoLeg(_, second) => Some(second),
        }
    }

    /// Flights in travel order.
    pub fn legs(&self) -> impl Iterator<Item = &flight::Model> {
        std::iter::once(self.first()).chain(self.second())
    }

    /// Number of flights (1 or 2).
    #[must_use]
    pub const fn flight_count(&self) -> usize {
        match self {
            Self::OneLeg(_) => 1,
            Self::TwoLeg(..) => 2,
        }
    }

    /// Sum of the legs' durations in minutes.
    #[must_use]
    pub fn total_duration(&self) -> i32 {
        self.legs().map(|leg| leg.duration_minutes).sum()
    }

    /// Sum of the legs' prices.
    #[must_use]
    pub fn price(&self) -> i64 {
        self.legs().map(|leg| leg.price).sum()
    }

    /// Day of month of the first flight.
    ///
    /// The one-reservation-per-day rule looks only at this day, even for
    /// two-leg itineraries.
    #[must_use]
    pub const fn day(&self) -> i32 {
        self.first().day_of_month
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_flight;

    #[test]
    fn test_one_leg_totals() {
        let itinerary = Itinerary::OneLeg(test_flight(1, "Seattle WA", "Boston MA", 300));
        assert_eq!(itinerary.flight_count(), 1);
        assert_eq!(itinerary.total_duration(), 300);
        assert_eq!(itinerary.price(), 100);
        assert!(itinerary.second().is_none());
        assert_eq!(itinerary.legs().count(), 1);
    }

    #[test]
    fn test_two_leg_totals() {
        let first = flight::Model {
            price: 120,
            day_of_month: 4,
            ..test_flight(1, "Seattle WA", "Chicago IL", 200)
        };
        let second = flight::Model {
            price: 80,
            day_of_month: 5,
            ..test_flight(2, "Chicago IL", "Boston MA", 120)
        };
        let itinerary = Itinerary::TwoLeg(first, second);

        assert_eq!(itinerary.flight_count(), 2);
        assert_eq!(itinerary.total_duration(), 320);
        assert_eq!(itinerary.price(), 200);
        assert_eq!(itinerary.day(), 4);
        let fids: Vec<i64> = itinerary.legs().map(|leg| leg.fid).collect();
        assert_eq!(fids, vec![1, 2]);
    }
}
