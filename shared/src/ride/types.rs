//! Ride value types: vehicle class, status, location, party role

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length of a free-text address
pub const MAX_ADDRESS_LEN: usize = 500;

/// Vehicle class (closed set)
///
/// `bike` / `car` are the names older clients send; they map onto
/// `economy` / `premium`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VehicleClass {
    #[default]
    #[serde(alias = "bike")]
    Economy,
    Auto,
    #[serde(alias = "car")]
    Premium,
}

impl VehicleClass {
    pub const ALL: [VehicleClass; 3] = [Self::Economy, Self::Auto, Self::Premium];

    /// Parse a vehicle class name, falling back to the lowest tier
    ///
    /// Never fails: unknown or empty names resolve to [`VehicleClass::Economy`].
    pub fn parse_lenient(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "economy" | "bike" => Self::Economy,
            "auto" => Self::Auto,
            "premium" | "car" => Self::Premium,
            other => {
                if !other.is_empty() {
                    tracing::debug!(vehicle_class = %other, "Unknown vehicle class, using economy");
                }
                Self::Economy
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Economy => "economy",
            Self::Auto => "auto",
            Self::Premium => "premium",
        }
    }
}

impl fmt::Display for VehicleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ride lifecycle status
///
/// ```text
/// Requested ──accept──▶ Accepted ──start──▶ Started ──complete──▶ Completed
///     │
///     └──cancel──▶ Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RideStatus {
    #[default]
    Requested,
    Accepted,
    Started,
    Completed,
    Cancelled,
}

impl RideStatus {
    pub const ALL: [RideStatus; 5] = [
        Self::Requested,
        Self::Accepted,
        Self::Started,
        Self::Completed,
        Self::Cancelled,
    ];

    /// No transition leaves a terminal status
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Whether a ride in this status must carry a driver id
    pub fn has_driver(&self) -> bool {
        matches!(self, Self::Accepted | Self::Started | Self::Completed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Requested => "requested",
            Self::Accepted => "accepted",
            Self::Started => "started",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for RideStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A point with a free-text address
///
/// `coordinates` is `[lng, lat]` (GeoJSON order).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub coordinates: [f64; 2],
    #[serde(default)]
    pub address: String,
}

impl Location {
    pub fn new(lng: f64, lat: f64, address: impl Into<String>) -> Self {
        Self {
            coordinates: [lng, lat],
            address: address.into(),
        }
    }

    pub fn lng(&self) -> f64 {
        self.coordinates[0]
    }

    pub fn lat(&self) -> f64 {
        self.coordinates[1]
    }

    /// Check coordinate ranges and address length
    pub fn validate(&self) -> Result<(), String> {
        let (lng, lat) = (self.lng(), self.lat());
        if !lng.is_finite() || !lat.is_finite() {
            return Err(format!("coordinates must be finite, got [{}, {}]", lng, lat));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(format!("longitude out of range: {}", lng));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(format!("latitude out of range: {}", lat));
        }
        if self.address.len() > MAX_ADDRESS_LEN {
            return Err(format!(
                "address is too long ({} chars, max {})",
                self.address.len(),
                MAX_ADDRESS_LEN
            ));
        }
        Ok(())
    }
}

/// Role of a connected party
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PartyRole {
    #[default]
    Rider,
    Driver,
}

impl fmt::Display for PartyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rider => f.write_str("rider"),
            Self::Driver => f.write_str("driver"),
        }
    }
}
