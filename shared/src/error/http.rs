//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound | Self::RideNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict: the losing side of a race, or an illegal jump
            Self::RideNoLongerAvailable | Self::InvalidRideTransition | Self::RideAlreadyExists => {
                StatusCode::CONFLICT
            }

            // 403 Forbidden
            Self::PermissionDenied | Self::NotRideParticipant => StatusCode::FORBIDDEN,

            // 503 Service Unavailable (transient errors, client can retry)
            Self::StorageUnavailable => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::InternalError | Self::ConfigError | Self::Unknown => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // 400 Bad Request
            Self::ValidationFailed | Self::InvalidRequest | Self::ValueOutOfRange => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_status() {
        assert_eq!(ErrorCode::Success.http_status(), StatusCode::OK);
    }

    #[test]
    fn test_ride_status_mapping() {
        assert_eq!(ErrorCode::RideNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::RideNoLongerAvailable.http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ErrorCode::InvalidRideTransition.http_status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_input_errors_are_bad_request() {
        assert_eq!(
            ErrorCode::ValidationFailed.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::InvalidRequest.http_status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_storage_unavailable_is_retryable() {
        assert_eq!(
            ErrorCode::StorageUnavailable.http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
