//! Unified error codes for the dispatch service
//!
//! This module defines all error codes shared by the dispatch server and its clients.
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 2xxx: Permission errors
//! - 4xxx: Ride errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Invalid request
    InvalidRequest = 5,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Acting party is not the rider/driver of this ride
    NotRideParticipant = 2101,

    // ==================== 4xxx: Ride ====================
    /// Ride not found
    RideNotFound = 4001,
    /// Ride was accepted or cancelled by someone else first
    RideNoLongerAvailable = 4002,
    /// Requested status change is not allowed from the current status
    InvalidRideTransition = 4003,
    /// Ride id already exists
    RideAlreadyExists = 4004,

    // ==================== 9xxx: System ====================
    InternalError = 9001,
    /// Persistence collaborator unavailable, caller may retry
    StorageUnavailable = 9002,
    ConfigError = 9005,
}

impl ErrorCode {
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::NotRideParticipant => "Not a participant of this ride",

            // Ride
            ErrorCode::RideNotFound => "Ride not found",
            ErrorCode::RideNoLongerAvailable => "Ride is no longer available",
            ErrorCode::InvalidRideTransition => "Ride status change is not allowed",
            ErrorCode::RideAlreadyExists => "Ride already exists",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::StorageUnavailable => "Storage is temporarily unavailable",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            5 => Ok(ErrorCode::InvalidRequest),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2101 => Ok(ErrorCode::NotRideParticipant),

            // Ride
            4001 => Ok(ErrorCode::RideNotFound),
            4002 => Ok(ErrorCode::RideNoLongerAvailable),
            4003 => Ok(ErrorCode::InvalidRideTransition),
            4004 => Ok(ErrorCode::RideAlreadyExists),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::StorageUnavailable),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotRideParticipant.code(), 2101);
        assert_eq!(ErrorCode::RideNotFound.code(), 4001);
        assert_eq!(ErrorCode::RideNoLongerAvailable.code(), 4002);
        assert_eq!(ErrorCode::InvalidRideTransition.code(), 4003);
        assert_eq!(ErrorCode::StorageUnavailable.code(), 9002);
    }

    #[test]
    fn test_try_from_valid() {
        assert_eq!(ErrorCode::try_from(0), Ok(ErrorCode::Success));
        assert_eq!(ErrorCode::try_from(4002), Ok(ErrorCode::RideNoLongerAvailable));
        assert_eq!(ErrorCode::try_from(9002), Ok(ErrorCode::StorageUnavailable));
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(4999), Err(InvalidErrorCode(4999)));
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::RideNoLongerAvailable).unwrap();
        assert_eq!(json, "4002");

        let code: ErrorCode = serde_json::from_str("4003").unwrap();
        assert_eq!(code, ErrorCode::InvalidRideTransition);
    }

    #[test]
    fn test_deserialize_invalid() {
        let result: Result<ErrorCode, _> = serde_json::from_str("1234");
        assert!(result.is_err());
    }

    #[test]
    fn test_display_and_message() {
        assert_eq!(format!("{}", ErrorCode::RideNotFound), "4001");
        assert_eq!(
            ErrorCode::RideNoLongerAvailable.message(),
            "Ride is no longer available"
        );
    }
}
