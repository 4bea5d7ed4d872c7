// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    absent = { None, 120 },
    zero = { Some(0), 120 },
    negative = { Some(-30), 120 },
    positive = { Some(45), 45 },
)]
fn scan_interval_coercion(secs: Option<i64>, want_secs: u64) {
    let interval = coerce_interval(secs, DEFAULT_SCAN_INTERVAL, "scan_interval_secs");
    assert_eq!(interval, Duration::from_secs(want_secs));
}

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = ReconcileConfig::load(&dir.path().join("convoy.toml")).unwrap();
    assert_eq!(config.scan_interval, DEFAULT_SCAN_INTERVAL);
    assert_eq!(config.event_poll, DEFAULT_EVENT_POLL);
    assert!(config.stores.is_empty());
    assert!(config.rigs.is_empty());
}

#[test]
fn full_file_parses() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("convoy.toml");
    std::fs::write(
        &path,
        r#"
town_root = "/town"
scan_interval_secs = 60
event_poll_secs = 2

[stores]
api = "api-rig/store"

[rigs]
api = "api-rig"
"#,
    )
    .unwrap();

    let config = ReconcileConfig::load(&path).unwrap();
    assert_eq!(config.town_root.as_deref(), Some(Path::new("/town")));
    assert_eq!(config.scan_interval, Duration::from_secs(60));
    assert_eq!(config.event_poll, Duration::from_secs(2));
    assert_eq!(
        config.stores.get("api"),
        Some(&PathBuf::from("api-rig/store"))
    );
    assert_eq!(config.rigs.get("api"), Some(&"api-rig".to_string()));
}

#[test]
fn negative_interval_in_file_is_coerced() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("convoy.toml");
    std::fs::write(&path, "scan_interval_secs = -1\nevent_poll_secs = 0\n").unwrap();

    let config = ReconcileConfig::load(&path).unwrap();
    assert_eq!(config.scan_interval, DEFAULT_SCAN_INTERVAL);
    assert_eq!(config.event_poll, DEFAULT_EVENT_POLL);
}

#[test]
fn unparsable_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("convoy.toml");
    std::fs::write(&path, "scan_interval_secs = [nope").unwrap();

    let err = ReconcileConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}
