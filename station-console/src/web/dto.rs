//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Station, StationId};
use crate::filter::{ConnectorFilter, StationFilter, StatusFilter};

/// Filter inputs from the list page query string.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Case-insensitive substring of name or location
    #[serde(default)]
    pub search: String,

    /// `all`, `Active` or `Inactive`
    #[serde(default)]
    pub status: String,

    /// `all` or a connector type
    #[serde(default)]
    pub connector: String,
}

impl ListQuery {
    pub fn to_filter(&self) -> StationFilter {
        StationFilter::new(
            &self.search,
            StatusFilter::parse(&self.status),
            ConnectorFilter::parse(&self.connector),
        )
    }
}

/// Map page query string.
#[derive(Debug, Default, Deserialize)]
pub struct MapQuery {
    /// Station whose details are shown next to the map
    pub selected: Option<String>,
}

impl MapQuery {
    pub fn selected_id(&self) -> Option<StationId> {
        self.selected
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(StationId::new)
    }
}

/// JSON body of the list endpoint.
#[derive(Debug, Serialize)]
pub struct StationListResponse {
    /// Stations passing the filters, newest first
    pub stations: Vec<Station>,

    /// Number of stations in `stations`
    pub total: usize,
}

impl StationListResponse {
    pub fn new(stations: Vec<Station>) -> Self {
        Self {
            total: stations.len(),
            stations,
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
