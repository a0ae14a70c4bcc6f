//! Per-client session state.
//!
//! A [`Session`] belongs to exactly one connected client and is passed
//! explicitly into every operation. It tracks who is logged in and caches the
//! most recent search result. The cache is versioned: every search bumps the
//! generation, and an [`ItineraryHandle`] minted against an older generation no
//! longer resolves.

use crate::core::itinerary::Itinerary;
use crate::errors::{Error, Result};

/// Login state of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    /// No user attached
    #[default]
    LoggedOut,
    /// Acting on behalf of `username`
    LoggedIn {
        /// Logged-in user
        username: String,
    },
}

/// Position of an itinerary within a specific search result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItineraryHandle {
    /// Search generation the handle was minted for
    pub generation: u64,
    /// Position within that search result
    pub index: usize,
}

/// State owned by one connected client.
#[derive(Debug, Default)]
pub struct Session {
    state: SessionState,
    generation: u64,
    itineraries: Vec<Itinerary>,
}

impl Session {
    /// A logged-out session with no search result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current login state.
    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    /// The logged-in username, if any.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        match &self.state {
            SessionState::LoggedOut => None,
            SessionState::LoggedIn { username } => Some(username),
        }
    }

    /// The logged-in username, or [`Error::NotLoggedIn`].
    pub fn require_login(&self) -> Result<&str> {
        self.username().ok_or(Error::NotLoggedIn)
    }

    /// Transitions `LoggedOut -> LoggedIn` and drops any cached itineraries.
    pub(crate) fn log_in(&mut self, username: String) -> Result<()> {
        if self.username().is_some() {
            return Err(Error::AlreadyLoggedIn);
        }
        self.state = SessionState::LoggedIn { username };
        self.replace_itineraries(Vec::new());
        Ok(())
    }

    /// Current search generation.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Itineraries of the most recent search, in ranked order.
    #[must_use]
    pub fn itineraries(&self) -> &[Itinerary] {
        &self.itineraries
    }

    /// Installs a new search result, invalidating every earlier handle.
    pub(crate) fn replace_itineraries(&mut self, itineraries: Vec<Itinerary>) -> &[Itinerary] {
        self.generation += 1;
        self.itineraries = itineraries;
        &self.itineraries
    }

    /// Handle for position `index` of the current search result.
    #[must_use]
    pub const fn handle(&self, index: usize) -> ItineraryHandle {
        ItineraryHandle {
            generation: self.generation,
            index,
        }
    }

    /// Looks up a handle against the current search result.
    ///
    /// Fails with [`Error::NoSuchItinerary`] when the handle is out of range or
    /// was minted for an earlier search.
    pub fn resolve(&self, handle: ItineraryHandle) -> Result<&Itinerary> {
        if handle.generation != self.generation {
            return Err(Error::NoSuchItinerary {
                index: handle.index,
            });
        }
        self.itineraries
            .get(handle.index)
            .ok_or(Error::NoSuchItinerary {
                index: handle.index,
            })
    }
}
