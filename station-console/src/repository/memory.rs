//! In-process stations table.
//!
//! Serves the console without backend credentials, seeded from a JSON file
//! holding an array of station rows. Assigns ids and timestamps the way the
//! backend would, so the rest of the console cannot tell the difference.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::{Station, StationFields, StationId, StationPatch};

use super::StationRepository;
use super::error::RepositoryError;

/// In-memory stations table, newest first.
#[derive(Clone, Default)]
pub struct MemoryRepository {
    rows: Arc<RwLock<Vec<Station>>>,
}

impl MemoryRepository {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table holding the given rows.
    ///
    /// Rows are ordered by `created_at` descending; rows without a timestamp
    /// sort last, keeping their relative order.
    pub fn with_stations(mut stations: Vec<Station>) -> Self {
        stations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Self {
            rows: Arc::new(RwLock::new(stations)),
        }
    }

    /// Load seed rows from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let path = path.as_ref();

        let json = std::fs::read_to_string(path).map_err(|e| RepositoryError::Seed {
            message: format!("failed to read {}: {}", path.display(), e),
        })?;

        let stations: Vec<Station> =
            serde_json::from_str(&json).map_err(|e| RepositoryError::Seed {
                message: format!("failed to parse {}: {}", path.display(), e),
            })?;

        Ok(Self::with_stations(stations))
    }

    /// Number of rows currently stored.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    /// Check if the table is empty.
    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

impl StationRepository for MemoryRepository {
    async fn list(&self) -> Result<Vec<Station>, RepositoryError> {
        Ok(self.rows.read().await.clone())
    }

    async fn insert(&self, fields: &StationFields) -> Result<Station, RepositoryError> {
        let now = Utc::now();
        let fields = fields.clone();
        let station = Station {
            id: StationId::new(uuid::Uuid::new_v4().to_string()),
            name: fields.name,
            location: fields.location,
            latitude: fields.latitude,
            longitude: fields.longitude,
            status: fields.status,
            power_output: fields.power_output,
            connector_type: fields.connector_type,
            created_at: Some(now),
            updated_at: Some(now),
        };

        self.rows.write().await.insert(0, station.clone());
        Ok(station)
    }

    async fn update(
        &self,
        id: &StationId,
        patch: &StationPatch,
    ) -> Result<Station, RepositoryError> {
        let mut rows = self.rows.write().await;
        let station = rows
            .iter_mut()
            .find(|s| &s.id == id)
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))?;

        patch.apply_to(station);
        station.updated_at = Some(Utc::now());
        Ok(station.clone())
    }

    /// Deleting an id that is not present succeeds, as it does server-side.
    async fn delete(&self, id: &StationId) -> Result<(), RepositoryError> {
        self.rows.write().await.retain(|s| &s.id != id);
        Ok(())
    }
}
