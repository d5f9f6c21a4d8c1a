//! redb 持久化测试 - 重启后行程状态完整恢复

use dispatch_server::core::StorageBackend;
use dispatch_server::rides::{RedbRideRepository, RideRepository, RideRequest};
use dispatch_server::{Config, ServerState};
use shared::ride::{Location, RideStatus, VehicleClass};

fn config_in(dir: &tempfile::TempDir) -> Config {
    let mut config = Config::default();
    config.work_dir = dir.path().to_string_lossy().into_owned();
    config.storage_backend = StorageBackend::Redb;
    config
}

fn request(rider: &str) -> RideRequest {
    RideRequest {
        rider_id: rider.to_string(),
        pickup: Location::new(77.59, 12.97, "MG Road"),
        dropoff: Location::new(77.64, 12.93, "Koramangala"),
        distance_km: 5.0,
        duration_min: Some(18.0),
        vehicle_class: VehicleClass::Auto,
    }
}

#[test]
fn test_rides_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);

    let (open_id, done_id) = {
        let state = ServerState::initialize(&config).unwrap();
        let open = state.engine.request_ride(request("r1")).unwrap();
        let done = state.engine.request_ride(request("r2")).unwrap();
        state.engine.accept_ride(&done.id, "d1").unwrap();
        state
            .engine
            .update_status(&done.id, RideStatus::Started, "d1")
            .unwrap();
        (open.id, done.id)
    };

    let state = ServerState::initialize(&config).unwrap();
    assert_eq!(state.engine.store().len(), 2);

    let open = state.engine.get_ride(&open_id).unwrap();
    assert_eq!(open.status, RideStatus::Requested);
    assert_eq!(open.fare, 105);

    let done = state.engine.get_ride(&done_id).unwrap();
    assert_eq!(done.status, RideStatus::Started);
    assert_eq!(done.driver_id.as_deref(), Some("d1"));
    assert_eq!(done.version, 3);

    // the restored ride keeps its guard
    assert!(state.engine.accept_ride(&done_id, "d2").is_err());
    state
        .engine
        .update_status(&done_id, RideStatus::Completed, "d1")
        .unwrap();
}

#[test]
fn test_rejected_transition_is_not_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);

    let ride_id = {
        let state = ServerState::initialize(&config).unwrap();
        let ride = state.engine.request_ride(request("r1")).unwrap();
        state.engine.cancel_ride(&ride.id, "r1").unwrap();
        assert!(state.engine.accept_ride(&ride.id, "d1").is_err());
        ride.id
    };

    let repository = RedbRideRepository::open(config.database_path()).unwrap();
    assert_eq!(repository.count().unwrap(), 1);
    let stored = repository.get(&ride_id).unwrap().unwrap();
    assert_eq!(stored.status, RideStatus::Cancelled);
    assert!(stored.driver_id.is_none());
    assert_eq!(stored.version, 2);
}
