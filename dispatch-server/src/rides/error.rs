use shared::error::AppError;
use shared::ride::RideStatus;
use thiserror::Error;

use super::storage::StorageError;
use crate::fare::FareError;

/// Dispatch errors
///
/// Guard and validation failures are returned to the caller as-is; a
/// failed notification is never one of these.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Ride not found: {0}")]
    NotFound(String),

    /// Lost a race (already accepted / cancelled)
    #[error("Ride {ride_id} is no longer available (status: {current})")]
    Conflict { ride_id: String, current: RideStatus },

    #[error("Ride {ride_id} cannot move from {from} to {to}")]
    InvalidTransition {
        ride_id: String,
        from: RideStatus,
        to: RideStatus,
    },

    #[error("Party {party_id} is not the {expected} of ride {ride_id}")]
    NotParticipant {
        ride_id: String,
        party_id: String,
        expected: &'static str,
    },

    #[error("Ride already exists: {0}")]
    AlreadyExists(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl DispatchError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

impl From<StorageError> for DispatchError {
    fn from(err: StorageError) -> Self {
        tracing::error!(error = %err, "Ride storage error");
        DispatchError::StorageUnavailable(err.to_string())
    }
}

impl From<FareError> for DispatchError {
    fn from(err: FareError) -> Self {
        DispatchError::InvalidInput(err.to_string())
    }
}

impl From<DispatchError> for AppError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::InvalidInput(msg) => AppError::validation(msg),
            DispatchError::NotFound(id) => AppError::ride_not_found(id),
            DispatchError::Conflict { ride_id, current } => {
                AppError::ride_no_longer_available(ride_id)
                    .with_detail("status", current.as_str())
            }
            DispatchError::InvalidTransition { ride_id, from, to } => AppError::invalid_transition(
                format!("Ride {} cannot move from {} to {}", ride_id, from, to),
            )
            .with_detail("ride_id", ride_id)
            .with_detail("from", from.as_str())
            .with_detail("to", to.as_str()),
            DispatchError::NotParticipant {
                ride_id,
                party_id,
                expected,
            } => AppError::not_participant(format!(
                "Party {} is not the {} of ride {}",
                party_id, expected, ride_id
            )),
            DispatchError::AlreadyExists(id) => AppError::with_message(
                shared::ErrorCode::RideAlreadyExists,
                format!("Ride {} already exists", id),
            ),
            DispatchError::StorageUnavailable(msg) => AppError::storage_unavailable(msg),
        }
    }
}

pub type DispatchResult<T> = Result<T, DispatchError>;

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ErrorCode;

    #[test]
    fn test_conflict_maps_to_no_longer_available() {
        let err: AppError = DispatchError::Conflict {
            ride_id: "r-1".to_string(),
            current: RideStatus::Accepted,
        }
        .into();
        assert_eq!(err.code, ErrorCode::RideNoLongerAvailable);
        assert_eq!(err.message, "Ride is no longer available");
        assert_eq!(err.http_status(), http::StatusCode::CONFLICT);
    }

    #[test]
    fn test_invalid_transition_details() {
        let err: AppError = DispatchError::InvalidTransition {
            ride_id: "r-1".to_string(),
            from: RideStatus::Requested,
            to: RideStatus::Completed,
        }
        .into();
        assert_eq!(err.code, ErrorCode::InvalidRideTransition);
        let details = err.details.unwrap();
        assert_eq!(details["from"], "requested");
        assert_eq!(details["to"], "completed");
    }

    #[test]
    fn test_input_and_not_found_mapping() {
        let err: AppError = DispatchError::invalid_input("bad distance").into();
        assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);

        let err: AppError = DispatchError::NotFound("x".to_string()).into();
        assert_eq!(err.http_status(), http::StatusCode::NOT_FOUND);

        let err: AppError = DispatchError::StorageUnavailable("down".to_string()).into();
        assert_eq!(err.http_status(), http::StatusCode::SERVICE_UNAVAILABLE);
    }
}
