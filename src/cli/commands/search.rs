//! Flight search command.

use super::log_failure;
use crate::{
    cli::{AppData, format},
    core::{Session, search::SearchQuery},
    errors::Error,
};
use tracing::instrument;

/// `search <origin city> <destination city> <direct> <day> <num itineraries>`
#[instrument(skip(data, session))]
pub async fn search(data: &AppData, session: &mut Session, query: &SearchQuery) -> String {
    match crate::core::search::search(&data.database, data.retry, session, query).await {
        Ok(itineraries) => format::itinerary_listing(itineraries),
        Err(Error::NoResults) => "No flights match your selection\n".to_string(),
        Err(err) => {
            log_failure("search", &err);
            "Failed to search\n".to_string()
        }
    }
}
