//! Filtering of the station list.
//!
//! [`derive_view`] is a pure function of the collection and the three filter
//! inputs. It keeps the collection's order and is recomputed from scratch
//! whenever any input changes.

use std::fmt;

use crate::domain::{Station, StationStatus};

/// Wire value meaning "no filter" for status and connector selects.
pub const ALL: &str = "all";

/// Status select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(StationStatus),
}

impl StatusFilter {
    /// Parse a select value. Anything that is not a known status means `All`.
    pub fn parse(value: &str) -> Self {
        value.parse().map(StatusFilter::Only).unwrap_or_default()
    }

    pub fn matches(&self, station: &Station) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => station.status == *status,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str(ALL),
            StatusFilter::Only(status) => f.write_str(status.as_str()),
        }
    }
}

/// Connector select. Matching is exact.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectorFilter {
    #[default]
    All,
    Only(String),
}

impl ConnectorFilter {
    /// Parse a select value. Empty or `"all"` means `All`.
    pub fn parse(value: &str) -> Self {
        match value {
            "" | ALL => ConnectorFilter::All,
            other => ConnectorFilter::Only(other.to_string()),
        }
    }

    pub fn matches(&self, station: &Station) -> bool {
        match self {
            ConnectorFilter::All => true,
            ConnectorFilter::Only(connector) => station.connector_type == *connector,
        }
    }
}

impl fmt::Display for ConnectorFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectorFilter::All => f.write_str(ALL),
            ConnectorFilter::Only(connector) => f.write_str(connector),
        }
    }
}

/// The three list filters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StationFilter {
    pub search_term: String,
    pub status: StatusFilter,
    pub connector: ConnectorFilter,
}

impl StationFilter {
    pub fn new(
        search_term: impl Into<String>,
        status: StatusFilter,
        connector: ConnectorFilter,
    ) -> Self {
        Self {
            search_term: search_term.into(),
            status,
            connector,
        }
    }

    /// Whether every filter is inactive.
    pub fn is_inactive(&self) -> bool {
        self.search_term.is_empty()
            && self.status == StatusFilter::All
            && self.connector == ConnectorFilter::All
    }
}

/// The stations passing every filter, in collection order.
pub fn derive_view(stations: &[Station], filter: &StationFilter) -> Vec<Station> {
    let needle = filter.search_term.to_lowercase();

    stations
        .iter()
        .filter(|s| s.matches_search(&needle))
        .filter(|s| filter.status.matches(s))
        .filter(|s| filter.connector.matches(s))
        .cloned()
        .collect()
}
