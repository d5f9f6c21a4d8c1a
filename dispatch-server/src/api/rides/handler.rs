//! Ride API Handlers

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Path, Query, State},
    http::StatusCode,
};
use shared::ride::RideRecord;
use shared::ride::VehicleClass;
use shared::ride::dto::{
    AcceptRideBody, CancelRideBody, FareQuote, QuoteQuery, RequestRideBody, UpdateStatusBody,
};

use crate::api::{json_body, query_params};
use crate::core::ServerState;
use crate::rides::RideRequest;
use crate::utils::AppResult;

/// Request a ride
pub async fn request_ride(
    State(state): State<ServerState>,
    payload: Result<Json<RequestRideBody>, JsonRejection>,
) -> AppResult<(StatusCode, Json<RideRecord>)> {
    let body = json_body(payload)?;
    let ride = state.engine.request_ride(RideRequest::from(body))?;
    Ok((StatusCode::CREATED, Json(ride)))
}

/// Rides waiting for a driver
pub async fn list_available(State(state): State<ServerState>) -> Json<Vec<RideRecord>> {
    Json(state.engine.list_available())
}

/// Fare estimate
pub async fn quote(
    State(state): State<ServerState>,
    query: Result<Query<QuoteQuery>, QueryRejection>,
) -> AppResult<Json<FareQuote>> {
    let query = query_params(query)?;
    let class = query
        .vehicle_class
        .as_deref()
        .map(VehicleClass::parse_lenient)
        .unwrap_or_default();
    Ok(Json(state.engine.quote(class, query.distance_km)?))
}

/// Get ride by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<RideRecord>> {
    Ok(Json(state.engine.get_ride(&id)?))
}

/// Driver accepts a ride
pub async fn accept(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<AcceptRideBody>, JsonRejection>,
) -> AppResult<Json<RideRecord>> {
    let body = json_body(payload)?;
    Ok(Json(state.engine.accept_ride(&id, &body.driver_id)?))
}

/// Driver starts / completes a ride
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateStatusBody>, JsonRejection>,
) -> AppResult<Json<RideRecord>> {
    let body = json_body(payload)?;
    Ok(Json(state.engine.update_status(
        &id,
        body.status,
        &body.acting_party_id,
    )?))
}

/// Rider cancels a ride
pub async fn cancel(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<CancelRideBody>, JsonRejection>,
) -> AppResult<Json<RideRecord>> {
    let body = json_body(payload)?;
    Ok(Json(state.engine.cancel_ride(&id, &body.acting_party_id)?))
}
