//! In-memory ride store
//!
//! One `Mutex` per ride: mutations of the same ride are serialized, different
//! rides never wait on each other. The map guard is released before the
//! ride lock is taken, so a slow mutation only blocks its own ride.
//!
//! A cell holding `None` is an id reserved by `create` whose first write has
//! not been persisted yet; it is invisible to readers and mutations.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use parking_lot::Mutex;
use shared::ride::{RideFilter, RideRecord, RideStatus};
use std::collections::HashMap;
use std::sync::Arc;

use super::error::{DispatchError, DispatchResult};
use super::storage::{RideRepository, StorageResult};

type RideCell = Arc<Mutex<Option<RideRecord>>>;

/// Authoritative ride table
pub struct RideStore {
    rides: DashMap<String, RideCell>,
    repository: Option<Arc<dyn RideRepository>>,
}

impl std::fmt::Debug for RideStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RideStore")
            .field("rides", &self.rides.len())
            .field("persistent", &self.repository.is_some())
            .finish()
    }
}

impl Default for RideStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RideStore {
    /// Memory-only store
    pub fn new() -> Self {
        Self {
            rides: DashMap::new(),
            repository: None,
        }
    }

    /// Store that writes every commit through to `repository`
    pub fn with_repository(repository: Arc<dyn RideRepository>) -> Self {
        Self {
            rides: DashMap::new(),
            repository: Some(repository),
        }
    }

    /// Load persisted rides into memory
    ///
    /// Call once before serving traffic. Returns the number of rides loaded.
    pub fn warm_up(&self) -> StorageResult<usize> {
        let Some(repository) = &self.repository else {
            return Ok(0);
        };
        let rides = repository.load_all()?;
        let count = rides.len();
        for ride in rides {
            self.rides.insert(ride.id.clone(), Arc::new(Mutex::new(Some(ride))));
        }
        tracing::info!(count, "Ride store warmed up from storage");
        Ok(count)
    }

    /// Insert a new ride
    ///
    /// Never overwrites: an existing id yields `AlreadyExists`. With a
    /// repository the id is reserved first and persisted with no map lock
    /// held; a failed write releases the reservation.
    pub fn create(&self, ride: RideRecord) -> DispatchResult<RideRecord> {
        let cell = match self.rides.entry(ride.id.clone()) {
            Entry::Occupied(_) => return Err(DispatchError::AlreadyExists(ride.id)),
            Entry::Vacant(slot) => {
                let committed = self.repository.is_none().then(|| ride.clone());
                let inserted = slot.insert(Arc::new(Mutex::new(committed)));
                Arc::clone(inserted.value())
            }
        };

        let Some(repository) = &self.repository else {
            return Ok(ride);
        };
        if let Err(err) = repository.save(&ride) {
            self.rides.remove(&ride.id);
            return Err(err.into());
        }
        *cell.lock() = Some(ride.clone());
        Ok(ride)
    }

    /// Snapshot of one ride
    pub fn get(&self, ride_id: &str) -> Option<RideRecord> {
        let cell = self.cell(ride_id)?;
        cell.lock().clone()
    }

    /// Snapshots of every ride matching `filter`, in no particular order
    ///
    /// Each record is consistent on its own; the list as a whole is not an
    /// atomic cut across rides.
    pub fn list(&self, filter: &RideFilter) -> Vec<RideRecord> {
        let cells: Vec<RideCell> = self
            .rides
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();

        cells
            .iter()
            .filter_map(|cell| {
                let ride = cell.lock();
                ride.as_ref().filter(|r| filter.matches(r)).cloned()
            })
            .collect()
    }

    /// Read-check-write one ride under its lock
    ///
    /// `transition` sees the current committed record and returns the next
    /// one. On `Err` nothing changes. On `Ok` the new record is persisted
    /// (if configured) and then published, all before the lock is released.
    pub fn mutate<F>(&self, ride_id: &str, transition: F) -> DispatchResult<RideRecord>
    where
        F: FnOnce(&RideRecord) -> DispatchResult<RideRecord>,
    {
        let not_found = || DispatchError::NotFound(ride_id.to_string());
        let cell = self.cell(ride_id).ok_or_else(not_found)?;

        let mut slot = cell.lock();
        let current = slot.as_ref().ok_or_else(not_found)?;
        let next = transition(current)?;
        debug_assert_eq!(next.id, current.id);

        if let Some(repository) = &self.repository {
            repository.save(&next)?;
        }
        *slot = Some(next.clone());
        Ok(next)
    }

    pub fn len(&self) -> usize {
        self.rides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rides.is_empty()
    }

    /// Ride count per status (statuses with no rides are included as 0)
    pub fn count_by_status(&self) -> HashMap<RideStatus, usize> {
        let mut counts: HashMap<RideStatus, usize> =
            RideStatus::ALL.iter().map(|s| (*s, 0)).collect();
        for ride in self.list(&RideFilter::all()) {
            *counts.entry(ride.status).or_default() += 1;
        }
        counts
    }

    fn cell(&self, ride_id: &str) -> Option<RideCell> {
        self.rides.get(ride_id).map(|entry| Arc::clone(entry.value()))
    }
}
