//! Access to the remote stations table.
//!
//! [`StationRepository`] is the seam between the console and the backend.
//! The console ships a Supabase implementation and an in-memory one for
//! running without credentials; [`Backend`] picks between them at startup.

mod error;
mod memory;
mod supabase;

use std::future::Future;

pub use error::RepositoryError;
pub use memory::MemoryRepository;
pub use supabase::{SupabaseClient, SupabaseConfig};

use crate::domain::{Station, StationFields, StationId, StationPatch};

/// List/insert/update/delete over the stations table.
pub trait StationRepository: Send + Sync + 'static {
    /// All stations, newest `created_at` first.
    fn list(&self) -> impl Future<Output = Result<Vec<Station>, RepositoryError>> + Send;

    /// Insert a row. The server assigns id and timestamps.
    fn insert(
        &self,
        fields: &StationFields,
    ) -> impl Future<Output = Result<Station, RepositoryError>> + Send;

    /// Partial update of the row with the given id.
    fn update(
        &self,
        id: &StationId,
        patch: &StationPatch,
    ) -> impl Future<Output = Result<Station, RepositoryError>> + Send;

    /// Delete the row with the given id.
    fn delete(&self, id: &StationId) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

/// The repository selected by configuration.
#[derive(Clone)]
pub enum Backend {
    Supabase(SupabaseClient),
    Memory(MemoryRepository),
}

impl Backend {
    /// Short name for logs.
    pub fn describe(&self) -> &'static str {
        match self {
            Backend::Supabase(_) => "supabase",
            Backend::Memory(_) => "memory",
        }
    }
}

impl StationRepository for Backend {
    async fn list(&self) -> Result<Vec<Station>, RepositoryError> {
        match self {
            Backend::Supabase(client) => client.list().await,
            Backend::Memory(repo) => repo.list().await,
        }
    }

    async fn insert(&self, fields: &StationFields) -> Result<Station, RepositoryError> {
        match self {
            Backend::Supabase(client) => client.insert(fields).await,
            Backend::Memory(repo) => repo.insert(fields).await,
        }
    }

    async fn update(
        &self,
        id: &StationId,
        patch: &StationPatch,
    ) -> Result<Station, RepositoryError> {
        match self {
            Backend::Supabase(client) => client.update(id, patch).await,
            Backend::Memory(repo) => repo.update(id, patch).await,
        }
    }

    async fn delete(&self, id: &StationId) -> Result<(), RepositoryError> {
        match self {
            Backend::Supabase(client) => client.delete(id).await,
            Backend::Memory(repo) => repo.delete(id).await,
        }
    }
}
