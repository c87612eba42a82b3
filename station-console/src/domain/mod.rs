//! Domain types for the station console.
//!
//! A [`Station`] is a server-owned record; [`StationFields`] and
//! [`StationPatch`] are the subsets the console is allowed to write.

mod fields;
mod station;

pub use fields::{StationFields, StationPatch};
pub use station::{CONNECTOR_TYPES, InvalidStatus, Station, StationId, StationStatus};
