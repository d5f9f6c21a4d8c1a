//! HTTP request/response bodies for the ride API
//!
//! Field names are camelCase; the legacy names sent by the first web
//! clients (`distance`, `duration`, `vehicleType`) are accepted as aliases.

use serde::{Deserialize, Serialize};

use super::types::{Location, RideStatus, VehicleClass};

/// `POST /api/rides/request`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestRideBody {
    pub rider_id: String,
    pub pickup: Location,
    pub dropoff: Location,
    #[serde(alias = "distance")]
    pub distance_km: f64,
    #[serde(default, alias = "duration")]
    pub duration_min: Option<f64>,
    /// Free-form; unknown names fall back to economy
    #[serde(default, alias = "vehicleType")]
    pub vehicle_class: Option<String>,
}

impl RequestRideBody {
    pub fn resolved_vehicle_class(&self) -> VehicleClass {
        self.vehicle_class
            .as_deref()
            .map(VehicleClass::parse_lenient)
            .unwrap_or_default()
    }
}

/// `PUT /api/rides/{id}/accept`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptRideBody {
    pub driver_id: String,
}

/// `PUT /api/rides/{id}/status`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusBody {
    pub status: RideStatus,
    #[serde(alias = "driverId")]
    pub acting_party_id: String,
}

/// `PUT /api/rides/{id}/cancel`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelRideBody {
    #[serde(alias = "riderId")]
    pub acting_party_id: String,
}

/// `GET /api/rides/quote`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteQuery {
    #[serde(default, alias = "vehicleType")]
    pub vehicle_class: Option<String>,
    #[serde(alias = "distance")]
    pub distance_km: f64,
}

/// Fare estimate response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FareQuote {
    pub vehicle_class: VehicleClass,
    pub distance_km: f64,
    pub fare: u64,
}

/// Pagination query parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationQuery {
    /// Page number (1-based, default: 1)
    #[serde(default = "default_page")]
    pub page: u32,

    /// Items per page (default: 50, max: 200)
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    50
}

impl PaginationQuery {
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1) as usize * self.limit()
    }

    /// Get the limit (clamped to 1..=200)
    pub fn limit(&self) -> usize {
        self.per_page.clamp(1, 200) as usize
    }
}

/// A page of results
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: u32,
    pub per_page: u32,
}
