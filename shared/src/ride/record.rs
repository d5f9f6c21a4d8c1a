use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::{Location, RideStatus, VehicleClass};

/// Ride record - the single authoritative state of one ride
///
/// Everything except `driver_id`, `status`, `updated_at` and `version` is
/// fixed at creation. `driver_id` is set exactly when `status` is one of
/// accepted / started / completed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RideRecord {
    /// Ride ID (assigned by server)
    pub id: String,
    pub rider_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_id: Option<String>,
    pub pickup: Location,
    pub dropoff: Location,
    pub vehicle_class: VehicleClass,
    pub status: RideStatus,
    /// Route distance supplied by the routing service
    pub distance_km: f64,
    /// Estimated duration supplied by the routing service (opaque)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_min: Option<f64>,
    /// Fare in whole currency units, computed once at creation
    pub fare: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Starts at 1, +1 per committed transition
    pub version: u64,
}

impl RideRecord {
    /// Check the driver/status pairing
    pub fn driver_matches_status(&self) -> bool {
        self.driver_id.is_some() == self.status.has_driver()
    }

    pub fn is_rider(&self, party_id: &str) -> bool {
        self.rider_id == party_id
    }

    pub fn is_driver(&self, party_id: &str) -> bool {
        self.driver_id.as_deref() == Some(party_id)
    }
}

/// Filter for listing rides
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RideFilter {
    pub status: Option<RideStatus>,
    pub rider_id: Option<String>,
    pub driver_id: Option<String>,
}

impl RideFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_status(status: RideStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn matches(&self, ride: &RideRecord) -> bool {
        if let Some(status) = self.status
            && ride.status != status
        {
            return false;
        }
        if let Some(rider_id) = &self.rider_id
            && &ride.rider_id != rider_id
        {
            return false;
        }
        if let Some(driver_id) = &self.driver_id
            && ride.driver_id.as_ref() != Some(driver_id)
        {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RideRecord {
        let now = Utc::now();
        RideRecord {
            id: "ride-1".to_string(),
            rider_id: "r1".to_string(),
            driver_id: None,
            pickup: Location::new(0.0, 0.0, "A"),
            dropoff: Location::new(0.0, 1.0, "B"),
            vehicle_class: VehicleClass::Auto,
            status: RideStatus::Requested,
            distance_km: 5.0,
            duration_min: None,
            fare: 105,
            created_at: now,
            updated_at: now,
            version: 1,
        }
    }

    #[test]
    fn test_camel_case_wire_format() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["riderId"], "r1");
        assert_eq!(json["vehicleClass"], "auto");
        assert_eq!(json["distanceKm"], 5.0);
        assert_eq!(json["status"], "requested");
        assert!(json.get("driverId").is_none());
    }

    #[test]
    fn test_driver_matches_status() {
        let mut ride = sample();
        assert!(ride.driver_matches_status());
        ride.status = RideStatus::Accepted;
        assert!(!ride.driver_matches_status());
        ride.driver_id = Some("d1".to_string());
        assert!(ride.driver_matches_status());
        assert!(ride.is_driver("d1"));
        assert!(ride.is_rider("r1"));
    }

    #[test]
    fn test_filter() {
        let ride = sample();
        assert!(RideFilter::all().matches(&ride));
        assert!(RideFilter::with_status(RideStatus::Requested).matches(&ride));
        assert!(!RideFilter::with_status(RideStatus::Accepted).matches(&ride));
        let by_driver = RideFilter {
            driver_id: Some("d1".to_string()),
            ..RideFilter::default()
        };
        assert!(!by_driver.matches(&ride));
    }
}
