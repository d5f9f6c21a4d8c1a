//! Ride lifecycle events pushed to connected parties

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::record::RideRecord;

/// Event kind; the snake_case name doubles as the socket event name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RideEventKind {
    RideRequested,
    RideAccepted,
    RideStatusUpdated,
    RideCancelled,
}

impl RideEventKind {
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::RideRequested => "ride_requested",
            Self::RideAccepted => "ride_accepted",
            Self::RideStatusUpdated => "ride_status_updated",
            Self::RideCancelled => "ride_cancelled",
        }
    }
}

/// Ride event carrying the post-commit snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RideEvent {
    pub kind: RideEventKind,
    pub ride: RideRecord,
    /// None when the system acted (e.g. request expiry)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acting_party_id: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

impl RideEvent {
    pub fn new(kind: RideEventKind, ride: RideRecord, acting_party_id: Option<String>) -> Self {
        Self {
            kind,
            occurred_at: ride.updated_at,
            ride,
            acting_party_id,
        }
    }

    pub fn ride_id(&self) -> &str {
        &self.ride.id
    }
}
