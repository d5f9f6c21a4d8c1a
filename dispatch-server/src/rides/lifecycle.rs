//! Ride state machine
//!
//! | From      | Transition      | To        |
//! |-----------|-----------------|-----------|
//! | Requested | Accept(driver)  | Accepted  |
//! | Requested | Cancel          | Cancelled |
//! | Accepted  | Start           | Started   |
//! | Started   | Complete        | Completed |
//!
//! Anything else is rejected and the record is left untouched. A failed
//! accept or cancel means someone else got there first (`Conflict`); a
//! failed start/complete is an illegal jump (`InvalidTransition`).

use chrono::{DateTime, Utc};
use shared::ride::{RideRecord, RideStatus};

use super::error::DispatchError;

/// A guarded status change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RideTransition {
    Accept { driver_id: String },
    Start,
    Complete,
    Cancel,
}

impl RideTransition {
    /// Status after the transition
    pub fn target(&self) -> RideStatus {
        match self {
            Self::Accept { .. } => RideStatus::Accepted,
            Self::Start => RideStatus::Started,
            Self::Complete => RideStatus::Completed,
            Self::Cancel => RideStatus::Cancelled,
        }
    }

    /// The only status this transition may leave from
    pub fn required_source(&self) -> RideStatus {
        match self {
            Self::Accept { .. } | Self::Cancel => RideStatus::Requested,
            Self::Start => RideStatus::Accepted,
            Self::Complete => RideStatus::Started,
        }
    }

    /// Transition reachable through a plain status update
    ///
    /// Only `started` and `completed` can be set this way; accepting and
    /// cancelling have their own operations.
    pub fn for_status_update(status: RideStatus) -> Option<Self> {
        match status {
            RideStatus::Started => Some(Self::Start),
            RideStatus::Completed => Some(Self::Complete),
            _ => None,
        }
    }

    fn rejection(&self, ride: &RideRecord) -> DispatchError {
        match self {
            Self::Accept { .. } | Self::Cancel => DispatchError::Conflict {
                ride_id: ride.id.clone(),
                current: ride.status,
            },
            Self::Start | Self::Complete => DispatchError::InvalidTransition {
                ride_id: ride.id.clone(),
                from: ride.status,
                to: self.target(),
            },
        }
    }
}

/// Whether the table has an edge `from -> to`
pub fn is_allowed(from: RideStatus, to: RideStatus) -> bool {
    matches!(
        (from, to),
        (RideStatus::Requested, RideStatus::Accepted)
            | (RideStatus::Requested, RideStatus::Cancelled)
            | (RideStatus::Accepted, RideStatus::Started)
            | (RideStatus::Started, RideStatus::Completed)
    )
}

/// Apply a transition to a copy of `ride`
///
/// Pure: returns the next record or the guard failure, never mutates input.
pub fn apply(
    ride: &RideRecord,
    transition: &RideTransition,
    at: DateTime<Utc>,
) -> Result<RideRecord, DispatchError> {
    if ride.status != transition.required_source() || !is_allowed(ride.status, transition.target())
    {
        return Err(transition.rejection(ride));
    }

    let mut next = ride.clone();
    next.status = transition.target();
    if let RideTransition::Accept { driver_id } = transition {
        next.driver_id = Some(driver_id.clone());
    }
    next.updated_at = at.max(ride.updated_at);
    next.version = ride.version + 1;

    debug_assert!(next.driver_matches_status());
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ride::{Location, VehicleClass};

    fn ride_in(status: RideStatus) -> RideRecord {
        let now = Utc::now();
        RideRecord {
            id: "ride-1".to_string(),
            rider_id: "r1".to_string(),
            driver_id: status.has_driver().then(|| "d1".to_string()),
            pickup: Location::new(0.0, 0.0, "A"),
            dropoff: Location::new(0.0, 1.0, "B"),
            vehicle_class: VehicleClass::Auto,
            status,
            distance_km: 5.0,
            duration_min: None,
            fare: 105,
            created_at: now,
            updated_at: now,
            version: 1,
        }
    }

    fn all_transitions() -> Vec<RideTransition> {
        vec![
            RideTransition::Accept {
                driver_id: "d2".to_string(),
            },
            RideTransition::Start,
            RideTransition::Complete,
            RideTransition::Cancel,
        ]
    }

    #[test]
    fn test_happy_path() {
        let ride = ride_in(RideStatus::Requested);
        let accepted = apply(
            &ride,
            &RideTransition::Accept {
                driver_id: "d9".to_string(),
            },
            Utc::now(),
        )
        .unwrap();
        assert_eq!(accepted.status, RideStatus::Accepted);
        assert_eq!(accepted.driver_id.as_deref(), Some("d9"));
        assert_eq!(accepted.version, 2);

        let started = apply(&accepted, &RideTransition::Start, Utc::now()).unwrap();
        assert_eq!(started.status, RideStatus::Started);
        assert_eq!(started.driver_id.as_deref(), Some("d9"));

        let completed = apply(&started, &RideTransition::Complete, Utc::now()).unwrap();
        assert_eq!(completed.status, RideStatus::Completed);
        assert_eq!(completed.fare, ride.fare);
        assert_eq!(completed.version, 4);
    }

    #[test]
    fn test_cancel_from_requested() {
        let ride = ride_in(RideStatus::Requested);
        let cancelled = apply(&ride, &RideTransition::Cancel, Utc::now()).unwrap();
        assert_eq!(cancelled.status, RideStatus::Cancelled);
        assert!(cancelled.driver_id.is_none());
    }

    #[test]
    fn test_guard_completeness() {
        for from in RideStatus::ALL {
            let ride = ride_in(from);
            for transition in all_transitions() {
                let result = apply(&ride, &transition, Utc::now());
                if transition.required_source() == from {
                    assert!(result.is_ok(), "{:?} from {} should pass", transition, from);
                    continue;
                }
                match (&transition, result) {
                    (
                        RideTransition::Accept { .. } | RideTransition::Cancel,
                        Err(DispatchError::Conflict { current, .. }),
                    ) => assert_eq!(current, from),
                    (
                        RideTransition::Start | RideTransition::Complete,
                        Err(DispatchError::InvalidTransition { from: f, to, .. }),
                    ) => {
                        assert_eq!(f, from);
                        assert_eq!(to, transition.target());
                    }
                    (t, other) => {
                        panic!("unexpected result for {:?} from {}: {:?}", t, from, other)
                    }
                }
            }
        }
    }

    #[test]
    fn test_terminal_states_reject_everything() {
        for from in [RideStatus::Completed, RideStatus::Cancelled] {
            let ride = ride_in(from);
            for transition in all_transitions() {
                assert!(apply(&ride, &transition, Utc::now()).is_err());
            }
        }
    }

    #[test]
    fn test_table_matches_required_sources() {
        for transition in all_transitions() {
            assert!(is_allowed(transition.required_source(), transition.target()));
        }
        assert!(!is_allowed(RideStatus::Requested, RideStatus::Completed));
        assert!(!is_allowed(RideStatus::Completed, RideStatus::Requested));
    }

    #[test]
    fn test_status_update_mapping() {
        assert_eq!(
            RideTransition::for_status_update(RideStatus::Started),
            Some(RideTransition::Start)
        );
        assert_eq!(
            RideTransition::for_status_update(RideStatus::Completed),
            Some(RideTransition::Complete)
        );
        assert_eq!(RideTransition::for_status_update(RideStatus::Requested), None);
        assert_eq!(RideTransition::for_status_update(RideStatus::Accepted), None);
        assert_eq!(RideTransition::for_status_update(RideStatus::Cancelled), None);
    }

    #[test]
    fn test_updated_at_never_goes_backwards() {
        let ride = ride_in(RideStatus::Requested);
        let earlier = ride.updated_at - chrono::Duration::seconds(10);
        let next = apply(&ride, &RideTransition::Cancel, earlier).unwrap();
        assert_eq!(next.updated_at, ride.updated_at);
    }
}
