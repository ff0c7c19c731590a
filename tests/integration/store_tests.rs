//! Operator-side store flows: what `schedule`, `cancel`, `status` and
//! `config set` do to the state directory.

use brewtimer::adapters::alarm_file::FileAlarmStore;
use brewtimer::adapters::config_file::JsonConfigStore;
use brewtimer::adapters::lock_file::FileLocks;
use brewtimer::app::ports::{AlarmPort, ConfigPort, LockPort};
use brewtimer::brew::BrewType;
use brewtimer::config::BrewDurations;
use brewtimer::error::{Error, StoreError};
use chrono::TimeDelta;
use std::time::Duration;
use tempfile::TempDir;

use crate::mock_hw::morning;

#[test]
fn saved_config_is_pretty_printed_and_reloaded() {
    let dir = TempDir::new().unwrap();
    let store = JsonConfigStore::in_dir(dir.path());
    let durations = BrewDurations {
        coffee_duration_seconds: 45,
        espresso_duration_seconds: 25,
    };

    store.save(&durations).unwrap();

    let text = std::fs::read_to_string(store.path()).unwrap();
    assert!(text.contains("\n    \"coffee_duration_seconds\": 45"), "{text}");
    assert_eq!(store.load(), durations);
}

#[test]
fn out_of_range_config_is_rejected_without_writing() {
    let dir = TempDir::new().unwrap();
    let store = JsonConfigStore::in_dir(dir.path());

    let too_long = BrewDurations {
        coffee_duration_seconds: 601,
        espresso_duration_seconds: 20,
    };
    assert!(matches!(store.save(&too_long), Err(Error::Config(_))));

    let zero = BrewDurations {
        coffee_duration_seconds: 38,
        espresso_duration_seconds: 0,
    };
    assert!(matches!(store.save(&zero), Err(Error::Config(_))));

    assert!(!store.path().exists());
}

#[test]
fn status_reports_first_pending_marker() {
    let dir = TempDir::new().unwrap();
    let alarms = FileAlarmStore::new(dir.path());
    assert!(alarms.pending().is_none());

    let at = morning() + TimeDelta::hours(2);
    alarms.arm(BrewType::Espresso, at).unwrap();

    match alarms.pending() {
        Some((BrewType::Espresso, Ok(read))) => assert_eq!(read, at),
        other => panic!("unexpected pending marker: {other:?}"),
    }
}

#[test]
fn status_surfaces_unreadable_marker() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("coffee.alarm"), "7am").unwrap();
    let alarms = FileAlarmStore::new(dir.path());

    assert!(matches!(
        alarms.pending(),
        Some((BrewType::Coffee, Err(StoreError::Parse { .. })))
    ));
}

#[test]
fn cancel_removes_every_marker() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("coffee.alarm"), "2024-05-06 07:00:00").unwrap();
    std::fs::write(dir.path().join("espresso.alarm"), "2024-05-06 08:00:00").unwrap();
    let alarms = FileAlarmStore::new(dir.path());

    alarms.retire_all().unwrap();
    // Nothing left to cancel is fine too.
    alarms.retire_all().unwrap();

    assert!(!alarms.exists(BrewType::Coffee));
    assert!(!alarms.exists(BrewType::Espresso));
}

#[test]
fn relay_lock_excludes_across_handles_and_types() {
    let dir = TempDir::new().unwrap();
    let a = FileLocks::new(dir.path(), Duration::from_secs(900));
    let b = FileLocks::new(dir.path(), Duration::from_secs(900));

    let held = a.try_acquire(BrewType::Coffee).unwrap();
    assert!(held.is_some());
    assert!(b.try_acquire(BrewType::Coffee).unwrap().is_none());
    assert!(b.try_acquire(BrewType::Espresso).unwrap().is_none());

    drop(held);
    assert!(b.try_acquire(BrewType::Espresso).unwrap().is_some());
}

#[test]
fn oversized_stored_duration_loads_clamped() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.json"),
        r#"{"coffee_duration_seconds": 1200, "espresso_duration_seconds": 20}"#,
    )
    .unwrap();

    let loaded = JsonConfigStore::in_dir(dir.path()).load();

    assert_eq!(loaded.seconds(BrewType::Coffee), brewtimer::config::MAX_BREW_SECS);
}
