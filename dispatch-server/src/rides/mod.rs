//! Rides Module
//!
//! ```text
//! rides/
//! ├── lifecycle.rs   # status transition table (pure)
//! ├── store.rs       # RideStore: per-ride locking, write-through
//! ├── storage.rs     # redb persistence
//! ├── engine/        # DispatchEngine: operations + notifications
//! ├── expiry.rs      # periodic cancellation of stale requests
//! └── error.rs       # DispatchError
//! ```

pub mod engine;
pub mod error;
pub mod expiry;
pub mod lifecycle;
pub mod storage;
pub mod store;

pub use engine::{DispatchEngine, RideRequest};
pub use error::{DispatchError, DispatchResult};
pub use lifecycle::RideTransition;
pub use storage::{RedbRideRepository, RideRepository, StorageError, StorageResult};
pub use store::RideStore;
