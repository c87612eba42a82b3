//! Web layer for the station console.
//!
//! Server-rendered pages for the list, map and form views, plus a JSON
//! rendering of the filtered list.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::{AppState, ConsoleStore};
