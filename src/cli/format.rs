//! Response text for listings.
//!
//! Every line ends with a newline so responses can be written to the client
//! as they are.

use crate::core::{Itinerary, booking::ReservationDetails};
use crate::entities::flight;
use std::fmt::Write;

/// One flight on a single line.
#[must_use]
pub fn flight_line(flight: &flight::Model) -> String {
    format!(
        "ID: {} Day: {} Carrier: {} Number: {} Origin: {} Dest: {} Duration: {} Capacity: {} Price: {}\n",
        flight.fid,
        flight.day_of_month,
        flight.carrier_id,
        flight.flight_num,
        flight.origin_city,
        flight.dest_city,
        flight.duration_minutes,
        flight.capacity,
        flight.price,
    )
}

/// A search result, numbered from 0 in ranked order.
#[must_use]
pub fn itinerary_listing(itineraries: &[Itinerary]) -> String {
    let mut out = String::new();
    for (index, itinerary) in itineraries.iter().enumerate() {
        let _ = writeln!(
            out,
            "Itinerary {index}: {} flight(s), {} minutes",
            itinerary.flight_count(),
            itinerary.total_duration()
        );
        for leg in itinerary.legs() {
            out.push_str(&flight_line(leg));
        }
    }
    out
}

/// A user's reservations with their flights.
#[must_use]
pub fn reservation_listing(reservations: &[ReservationDetails]) -> String {
    let mut out = String::new();
    for details in reservations {
        let _ = writeln!(
            out,
            "Reservation {} paid: {}:",
            details.reservation.rid, details.reservation.paid
        );
        for leg in details.itinerary.legs() {
            out.push_str(&flight_line(leg));
        }
    }
    out
}
