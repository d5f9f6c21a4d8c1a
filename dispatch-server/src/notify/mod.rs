//! Notification Module
//!
//! Best-effort push of ride events to connected riders and drivers.

mod hub;

pub use hub::{DEFAULT_CHANNEL_CAPACITY, DeliveryReport, NotificationHub, Subscription};
