//! Ride domain types
//!
//! - [`RideRecord`] - ride entity
//! - [`RideStatus`] / [`VehicleClass`] / [`Location`] - value types
//! - [`RideEvent`] - lifecycle event fanned out to riders and drivers
//! - [`dto`] - HTTP request/response bodies

pub mod dto;
pub mod event;
pub mod record;
pub mod types;

pub use event::{RideEvent, RideEventKind};
pub use record::{RideFilter, RideRecord};
pub use types::{Location, MAX_ADDRESS_LEN, PartyRole, RideStatus, VehicleClass};
