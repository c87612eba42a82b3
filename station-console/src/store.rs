//! Reads and writes of the station collection.
//!
//! Writes go straight to the repository. A successful write invalidates the
//! cached collection so the next read reflects it; every write ends in one
//! notice. Nothing is retried.

use crate::cache::{QueryState, StationQueryCache};
use crate::domain::{Station, StationFields, StationId, StationPatch};
use crate::notify::{MutationKind, Notice, Notifier, Outcome};
use crate::repository::{RepositoryError, StationRepository};

/// A create, update or delete failed.
#[derive(Debug, thiserror::Error)]
#[error("failed to {kind} station: {source}")]
pub struct MutationError {
    pub kind: MutationKind,
    #[source]
    pub source: RepositoryError,
}

/// Station collection with cached reads and notified writes.
pub struct StationStore<R, N> {
    cache: StationQueryCache<R>,
    notifier: N,
}

impl<R, N> StationStore<R, N>
where
    R: StationRepository,
    N: Notifier,
{
    pub fn new(cache: StationQueryCache<R>, notifier: N) -> Self {
        Self { cache, notifier }
    }

    /// Current collection and fetch error, if any.
    pub async fn stations(&self) -> QueryState {
        self.cache.load().await
    }

    /// Find a station in the current collection.
    pub async fn find(&self, id: &StationId) -> Option<Station> {
        self.stations()
            .await
            .stations_or_empty()
            .iter()
            .find(|s| &s.id == id)
            .cloned()
    }

    pub async fn create(&self, fields: &StationFields) -> Result<Station, MutationError> {
        tracing::info!(name = %fields.name, "creating station");
        let result = self.cache.repository().insert(fields).await;
        let station = self.settle(MutationKind::Create, result).await?;
        tracing::info!(id = %station.id, "station created");
        Ok(station)
    }

    pub async fn update(
        &self,
        id: &StationId,
        patch: &StationPatch,
    ) -> Result<Station, MutationError> {
        tracing::info!(%id, "updating station");
        let result = self.cache.repository().update(id, patch).await;
        let station = self.settle(MutationKind::Update, result).await?;
        tracing::info!(%id, "station updated");
        Ok(station)
    }

    pub async fn delete(&self, id: &StationId) -> Result<(), MutationError> {
        tracing::info!(%id, "deleting station");
        let result = self.cache.repository().delete(id).await;
        self.settle(MutationKind::Delete, result).await?;
        tracing::info!(%id, "station deleted");
        Ok(())
    }

    pub fn cache(&self) -> &StationQueryCache<R> {
        &self.cache
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Invalidate and notify according to the outcome of a write.
    async fn settle<T>(
        &self,
        kind: MutationKind,
        result: Result<T, RepositoryError>,
    ) -> Result<T, MutationError> {
        match result {
            Ok(value) => {
                self.cache.invalidate().await;
                self.notifier
                    .notify(Notice::for_mutation(kind, Outcome::Success));
                Ok(value)
            }
            Err(source) => {
                tracing::error!(error = %source, "{kind} station mutation failed");
                self.notifier
                    .notify(Notice::for_mutation(kind, Outcome::Failure));
                Err(MutationError { kind, source })
            }
        }
    }
}
