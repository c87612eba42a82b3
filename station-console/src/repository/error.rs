//! Repository error types.

use crate::domain::StationId;

/// Errors that can occur when talking to the stations table.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Authentication failed
    #[error("unauthorized: check SUPABASE_ANON_KEY")]
    Unauthorized,

    /// API returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// No row matched the given id
    #[error("station {0} not found")]
    NotFound(StationId),

    /// Seed data for the in-memory table could not be loaded
    #[error("seed data error: {message}")]
    Seed { message: String },
}
