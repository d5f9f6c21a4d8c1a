//! Shared types for the ride dispatch service
//!
//! Ride domain types, lifecycle events, HTTP bodies and the unified
//! error system used by the dispatch server and its clients.

pub mod error;
pub mod ride;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use ride::{
    Location, PartyRole, RideEvent, RideEventKind, RideFilter, RideRecord, RideStatus,
    VehicleClass,
};
