//! Admin API Module
//!
//! Read-only ride overview. All mutations go through the ride routes.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Admin router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/admin", routes())
}

fn routes() -> Router<ServerState> {
    Router::new().route("/rides", get(handler::list_rides))
}
