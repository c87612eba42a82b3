//! Charging station records.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Connector types offered by the console's selects.
///
/// The backend stores `connector_type` as free text, so records with other
/// values are still accepted and displayed.
pub const CONNECTOR_TYPES: &[&str] = &["CCS", "CHAdeMO", "Tesla Supercharger", "Type 2"];

/// Error returned when parsing an unknown station status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station status: {0:?} (expected Active or Inactive)")]
pub struct InvalidStatus(pub String);

/// Server-assigned station identity.
///
/// Opaque to the console: it is only ever compared and echoed back to the
/// repository.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(String);

impl StationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Operational status of a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StationStatus {
    #[default]
    Active,
    Inactive,
}

impl StationStatus {
    pub const ALL: [StationStatus; 2] = [StationStatus::Active, StationStatus::Inactive];

    pub fn as_str(&self) -> &'static str {
        match self {
            StationStatus::Active => "Active",
            StationStatus::Inactive => "Inactive",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, StationStatus::Active)
    }
}

impl FromStr for StationStatus {
    type Err = InvalidStatus;

    /// Parse the wire spelling. Matching is exact, like the backend's.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(StationStatus::Active),
            "Inactive" => Ok(StationStatus::Inactive),
            other => Err(InvalidStatus(other.to_string())),
        }
    }
}

impl fmt::Display for StationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A charging station as stored by the backend.
///
/// `id`, `created_at` and `updated_at` are assigned by the server. The
/// client-writable subset lives in [`StationFields`](super::StationFields).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: StationId,
    pub name: String,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub status: StationStatus,
    /// Rated output in kW.
    pub power_output: i32,
    pub connector_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Station {
    /// Case-insensitive substring match against name or location.
    ///
    /// `needle_lower` must already be lowercased.
    pub fn matches_search(&self, needle_lower: &str) -> bool {
        needle_lower.is_empty()
            || self.name.to_lowercase().contains(needle_lower)
            || self.location.to_lowercase().contains(needle_lower)
    }
}
