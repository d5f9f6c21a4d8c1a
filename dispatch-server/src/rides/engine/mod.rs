//! DispatchEngine - ride operations on top of RideStore
//!
//! # Operation Flow
//!
//! ```text
//! request_ride(req)
//!     ├─ 1. Validate input
//!     ├─ 2. Compute fare (no lock held)
//!     ├─ 3. RideStore::create
//!     └─ 4. Broadcast ride_requested to drivers
//!
//! accept_ride / update_status / cancel_ride
//!     ├─ 1. Validate ids
//!     ├─ 2. RideStore::mutate (guard + participant check + persist, under ride lock)
//!     ├─ 3. Log the committed transition
//!     └─ 4. Notify (after commit, never fails the call)
//! ```


use chrono::Utc;
use shared::ride::dto::{FareQuote, Page, PaginationQuery, RequestRideBody};
use shared::ride::{
    Location, PartyRole, RideEvent, RideEventKind, RideFilter, RideRecord, RideStatus,
    VehicleClass,
};
use std::sync::Arc;
use std::time::Duration;

use super::error::{DispatchError, DispatchResult};
use super::lifecycle::{self, RideTransition};
use super::store::RideStore;
use crate::fare::FareCalculator;
use crate::notify::NotificationHub;
use crate::utils::validation::{
    MAX_RIDE_ID_LEN, validate_location, validate_optional_non_negative, validate_party_id,
    validate_required_text,
};

/// Input of `request_ride`
#[derive(Debug, Clone)]
pub struct RideRequest {
    pub rider_id: String,
    pub pickup: Location,
    pub dropoff: Location,
    pub distance_km: f64,
    pub duration_min: Option<f64>,
    pub vehicle_class: VehicleClass,
}

impl From<RequestRideBody> for RideRequest {
    fn from(body: RequestRideBody) -> Self {
        let vehicle_class = body.resolved_vehicle_class();
        Self {
            rider_id: body.rider_id,
            pickup: body.pickup,
            dropoff: body.dropoff,
            distance_km: body.distance_km,
            duration_min: body.duration_min,
            vehicle_class,
        }
    }
}

/// Which side of the ride an actor must be
#[derive(Debug, Clone, Copy)]
enum Participant {
    Rider,
    Driver,
}

impl Participant {
    fn check(self, ride: &RideRecord, party_id: &str) -> DispatchResult<()> {
        let (ok, expected) = match self {
            Self::Rider => (ride.is_rider(party_id), "rider"),
            Self::Driver => (ride.is_driver(party_id), "driver"),
        };
        if ok {
            Ok(())
        } else {
            Err(DispatchError::NotParticipant {
                ride_id: ride.id.clone(),
                party_id: party_id.to_string(),
                expected,
            })
        }
    }
}

/// Ride dispatch core
pub struct DispatchEngine {
    store: Arc<RideStore>,
    fares: FareCalculator,
    hub: NotificationHub,
}

impl std::fmt::Debug for DispatchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchEngine")
            .field("store", &self.store)
            .field("fares", &self.fares)
            .field("subscribers", &self.hub.subscriber_count())
            .finish()
    }
}

impl DispatchEngine {
    pub fn new(store: Arc<RideStore>, fares: FareCalculator, hub: NotificationHub) -> Self {
        Self { store, fares, hub }
    }

    pub fn store(&self) -> &Arc<RideStore> {
        &self.store
    }

    pub fn hub(&self) -> &NotificationHub {
        &self.hub
    }

    pub fn fares(&self) -> &FareCalculator {
        &self.fares
    }

    // ========== Commands ==========

    /// Create a ride in `Requested` and broadcast it to drivers
    pub fn request_ride(&self, req: RideRequest) -> DispatchResult<RideRecord> {
        validate_party_id(&req.rider_id, "riderId")?;
        validate_location(&req.pickup, "pickup")?;
        validate_location(&req.dropoff, "dropoff")?;
        validate_optional_non_negative(req.duration_min, "durationMin")?;
        let fare = self.fares.estimate(req.vehicle_class, req.distance_km)?;

        let now = Utc::now();
        let ride = RideRecord {
            id: uuid::Uuid::new_v4().to_string(),
            rider_id: req.rider_id,
            driver_id: None,
            pickup: req.pickup,
            dropoff: req.dropoff,
            vehicle_class: req.vehicle_class,
            status: RideStatus::Requested,
            distance_km: req.distance_km,
            duration_min: req.duration_min,
            fare,
            created_at: now,
            updated_at: now,
            version: 1,
        };
        let ride = self.store.create(ride)?;

        tracing::info!(
            ride_id = %ride.id,
            rider_id = %ride.rider_id,
            vehicle_class = %ride.vehicle_class,
            fare = ride.fare,
            "Ride requested"
        );

        let event = RideEvent::new(
            RideEventKind::RideRequested,
            ride.clone(),
            Some(ride.rider_id.clone()),
        );
        let report = self.hub.broadcast_to_role(PartyRole::Driver, &event);
        tracing::debug!(
            ride_id = %ride.id,
            delivered = report.delivered,
            failed = report.failed,
            "Broadcast to drivers"
        );

        Ok(ride)
    }

    /// Assign `driver_id`; exactly one concurrent caller wins
    pub fn accept_ride(&self, ride_id: &str, driver_id: &str) -> DispatchResult<RideRecord> {
        validate_party_id(driver_id, "driverId")?;
        let ride = self.transition(
            ride_id,
            RideTransition::Accept {
                driver_id: driver_id.to_string(),
            },
            None,
            Some(driver_id),
        )?;

        let event = RideEvent::new(
            RideEventKind::RideAccepted,
            ride.clone(),
            Some(driver_id.to_string()),
        );
        self.hub.notify_party(&ride.rider_id, &event);
        Ok(ride)
    }

    /// Move an accepted/started ride forward; only `started` and `completed`
    /// can be requested, and only by the assigned driver
    pub fn update_status(
        &self,
        ride_id: &str,
        requested: RideStatus,
        acting_party_id: &str,
    ) -> DispatchResult<RideRecord> {
        validate_party_id(acting_party_id, "actingPartyId")?;
        let ride = match RideTransition::for_status_update(requested) {
            Some(transition) => self.transition(
                ride_id,
                transition,
                Some(Participant::Driver),
                Some(acting_party_id),
            )?,
            None => {
                self.validate_ride_id(ride_id)?;
                let current = self
                    .store
                    .get(ride_id)
                    .ok_or_else(|| DispatchError::NotFound(ride_id.to_string()))?;
                tracing::debug!(
                    ride_id,
                    from = %current.status,
                    to = %requested,
                    "Status update rejected"
                );
                return Err(DispatchError::InvalidTransition {
                    ride_id: ride_id.to_string(),
                    from: current.status,
                    to: requested,
                });
            }
        };

        let event = RideEvent::new(
            RideEventKind::RideStatusUpdated,
            ride.clone(),
            Some(acting_party_id.to_string()),
        );
        self.hub.notify_party(&ride.rider_id, &event);
        if let Some(driver_id) = &ride.driver_id
            && driver_id != &ride.rider_id
        {
            self.hub.notify_party(driver_id, &event);
        }
        Ok(ride)
    }

    /// Cancel a ride that no driver has accepted yet; rider only
    pub fn cancel_ride(&self, ride_id: &str, acting_party_id: &str) -> DispatchResult<RideRecord> {
        validate_party_id(acting_party_id, "actingPartyId")?;
        let ride = self.transition(
            ride_id,
            RideTransition::Cancel,
            Some(Participant::Rider),
            Some(acting_party_id),
        )?;
        self.publish_cancelled(&ride, Some(acting_party_id));
        Ok(ride)
    }

    /// Cancel every `Requested` ride created more than `ttl` ago
    ///
    /// Runs as the system actor. Rides accepted while the sweep runs are
    /// skipped. Returns the rides that were cancelled.
    pub fn expire_stale(&self, ttl: Duration) -> Vec<RideRecord> {
        let Ok(ttl) = chrono::Duration::from_std(ttl) else {
            return Vec::new();
        };
        let cutoff = Utc::now() - ttl;

        let mut expired = Vec::new();
        for candidate in self.list_available() {
            if candidate.created_at > cutoff {
                continue;
            }
            match self.transition(&candidate.id, RideTransition::Cancel, None, None) {
                Ok(ride) => {
                    self.publish_cancelled(&ride, None);
                    expired.push(ride);
                }
                Err(DispatchError::Conflict { .. }) => {
                    tracing::debug!(ride_id = %candidate.id, "Ride left Requested before expiry");
                }
                Err(e) => {
                    tracing::warn!(ride_id = %candidate.id, error = %e, "Failed to expire ride");
                }
            }
        }

        if !expired.is_empty() {
            tracing::info!(count = expired.len(), "Expired stale ride requests");
        }
        expired
    }

    // ========== Queries ==========

    /// Rides still waiting for a driver, oldest first
    pub fn list_available(&self) -> Vec<RideRecord> {
        let mut rides = self
            .store
            .list(&RideFilter::with_status(RideStatus::Requested));
        rides.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        rides
    }

    pub fn get_ride(&self, ride_id: &str) -> DispatchResult<RideRecord> {
        self.validate_ride_id(ride_id)?;
        self.store
            .get(ride_id)
            .ok_or_else(|| DispatchError::NotFound(ride_id.to_string()))
    }

    /// Fare estimate without creating a ride
    pub fn quote(
        &self,
        vehicle_class: VehicleClass,
        distance_km: f64,
    ) -> DispatchResult<FareQuote> {
        let fare = self.fares.estimate(vehicle_class, distance_km)?;
        Ok(FareQuote {
            vehicle_class,
            distance_km,
            fare,
        })
    }

    /// Every ride matching `filter`, newest first, one page
    pub fn list_all(&self, filter: &RideFilter, page: &PaginationQuery) -> Page<RideRecord> {
        let mut rides = self.store.list(filter);
        rides.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));

        let total = rides.len();
        let items = rides
            .into_iter()
            .skip(page.offset())
            .take(page.limit())
            .collect();
        Page {
            items,
            total,
            page: page.page.max(1),
            per_page: page.limit() as u32,
        }
    }

    // ========== Internal ==========

    fn validate_ride_id(&self, ride_id: &str) -> DispatchResult<()> {
        validate_required_text(ride_id, "rideId", MAX_RIDE_ID_LEN)
    }

    /// Guarded mutate + commit log
    ///
    /// The participant check runs after the status guard, both under the
    /// ride lock.
    fn transition(
        &self,
        ride_id: &str,
        transition: RideTransition,
        participant: Option<Participant>,
        acting_party_id: Option<&str>,
    ) -> DispatchResult<RideRecord> {
        self.validate_ride_id(ride_id)?;

        let mut from = RideStatus::Requested;
        let result = self.store.mutate(ride_id, |ride| {
            from = ride.status;
            let next = lifecycle::apply(ride, &transition, Utc::now())?;
            if let (Some(participant), Some(party_id)) = (participant, acting_party_id) {
                participant.check(ride, party_id)?;
            }
            Ok(next)
        });

        match result {
            Ok(ride) => {
                tracing::info!(
                    ride_id,
                    from = %from,
                    to = %ride.status,
                    acting_party = acting_party_id.unwrap_or("system"),
                    version = ride.version,
                    "Ride transition committed"
                );
                Ok(ride)
            }
            Err(e) => {
                tracing::debug!(
                    ride_id,
                    transition = ?transition,
                    error = %e,
                    "Ride transition rejected"
                );
                Err(e)
            }
        }
    }

    fn publish_cancelled(&self, ride: &RideRecord, acting_party_id: Option<&str>) {
        let event = RideEvent::new(
            RideEventKind::RideCancelled,
            ride.clone(),
            acting_party_id.map(str::to_string),
        );
        self.hub.notify_party(&ride.rider_id, &event);
        // drop it from driver availability feeds
        self.hub.broadcast_to_role(PartyRole::Driver, &event);
    }
}
