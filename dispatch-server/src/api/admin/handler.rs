//! Admin API Handlers

use axum::{
    Json,
    extract::rejection::QueryRejection,
    extract::{Query, State},
};
use serde::Deserialize;
use shared::ride::dto::{Page, PaginationQuery};
use shared::ride::{RideFilter, RideRecord, RideStatus};

use crate::api::query_params;
use crate::core::ServerState;
use crate::utils::AppResult;

/// Query params for the ride overview
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRidesQuery {
    #[serde(default)]
    pub status: Option<RideStatus>,
    #[serde(default)]
    pub rider_id: Option<String>,
    #[serde(default)]
    pub driver_id: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    50
}

/// All rides, newest first (paginated)
pub async fn list_rides(
    State(state): State<ServerState>,
    query: Result<Query<ListRidesQuery>, QueryRejection>,
) -> AppResult<Json<Page<RideRecord>>> {
    let query = query_params(query)?;
    let filter = RideFilter {
        status: query.status,
        rider_id: query.rider_id,
        driver_id: query.driver_id,
    };
    let page = PaginationQuery {
        page: query.page,
        per_page: query.per_page,
    };
    Ok(Json(state.engine.list_all(&filter, &page)))
}
