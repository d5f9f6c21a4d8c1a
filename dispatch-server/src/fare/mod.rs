//! Fare Module
//!
//! Fares are computed once when a ride is requested and never recomputed.

mod calculator;

pub use calculator::*;
