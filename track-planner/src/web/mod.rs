//! Web layer for the trip planner.
//!
//! Serves the query form, schedule results (HTML or JSON) and the station
//! list.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
pub use templates::*;
