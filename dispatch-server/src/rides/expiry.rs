//! Ride request expiry worker
//!
//! Periodically cancels `Requested` rides nobody accepted within the
//! configured TTL. Disabled when the TTL is zero.

use std::sync::Arc;
use std::time::Duration;

use super::engine::DispatchEngine;
use crate::core::tasks::BackgroundTasks;

pub const TASK_NAME: &str = "ride_expiry";

/// Register the sweep; returns false when expiry is disabled
pub fn register(
    tasks: &mut BackgroundTasks,
    engine: Arc<DispatchEngine>,
    ttl: Duration,
    sweep_interval: Duration,
) -> bool {
    if ttl.is_zero() {
        tracing::info!("Ride request expiry disabled");
        return false;
    }

    tracing::info!(
        ttl_secs = ttl.as_secs(),
        interval_secs = sweep_interval.as_secs(),
        "Ride request expiry enabled"
    );
    tasks.spawn_periodic(TASK_NAME, sweep_interval, move || {
        engine.expire_stale(ttl);
    });
    true
}
