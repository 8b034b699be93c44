//! Fixture-based tests for device profiles and simulated sessions
//!
//! These tests load profile JSON from `tests/fixtures` and drive the
//! resulting sessions through their lifecycle without any hardware.

use std::path::PathBuf;
use std::time::Duration;

use rstest::rstest;
use session_client::{
    BooleanEncoding, DeviceCatalog, DeviceProfile, DeviceSession, LifecycleState, RawValue,
    SessionProvider, SimulatedSession,
};

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn load_profile(name: &str) -> DeviceProfile {
    let json = std::fs::read_to_string(fixture_path(name)).expect("Failed to read fixture");
    DeviceProfile::from_json(&json).expect("Failed to parse fixture")
}

fn visible_names(session: &dyn DeviceSession) -> Vec<String> {
    session
        .raw_enumerate()
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect()
}

#[rstest]
#[case("usb_camera.json", "27710767", "DFK 72BUC02", BooleanEncoding::Native, 5)]
#[case("gige_camera.json", "46810320", "DFK 33GP1300", BooleanEncoding::OnOff, 3)]
fn test_parse_profile_fixture(
    #[case] fixture: &str,
    #[case] serial: &str,
    #[case] model: &str,
    #[case] encoding: BooleanEncoding,
    #[case] property_count: usize,
) {
    let profile = load_profile(fixture);
    assert_eq!(profile.serial, serial);
    assert_eq!(profile.model, model);
    assert_eq!(profile.boolean_encoding, encoding);
    assert_eq!(profile.properties.len(), property_count);
}

/// Names visible before and after the pipeline starts
#[rstest]
#[case("usb_camera.json", 3, 5)]
#[case("gige_camera.json", 3, 3)]
fn test_visibility_by_state(
    #[case] fixture: &str,
    #[case] configured_count: usize,
    #[case] active_count: usize,
) {
    let session = SimulatedSession::new(load_profile(fixture)).unwrap();
    assert_eq!(visible_names(&session).len(), configured_count);

    session.request_state(LifecycleState::Active).unwrap();
    session.wait_state_reached(Duration::from_secs(1)).unwrap();
    assert_eq!(visible_names(&session).len(), active_count);
}

#[test]
fn test_enumeration_order_is_stable() {
    let session = SimulatedSession::new(load_profile("usb_camera.json")).unwrap();
    let first = visible_names(&session);
    let second = visible_names(&session);
    assert_eq!(first, second);
    assert_eq!(first, vec!["Brightness", "Gain", "Software Trigger"]);
}

#[test]
fn test_latency_within_timeout_completes() {
    let session = SimulatedSession::new(load_profile("gige_camera.json")).unwrap();
    session.request_state(LifecycleState::Active).unwrap();
    let reached = session.wait_state_reached(Duration::from_secs(2)).unwrap();
    assert_eq!(reached, LifecycleState::Active);
}

#[test]
fn test_on_off_values_survive_loading() {
    let session = SimulatedSession::new(load_profile("gige_camera.json")).unwrap();
    assert_eq!(
        session.raw_get("Exposure Auto").unwrap(),
        RawValue::Str("On".to_string())
    );
}

#[test]
fn test_catalog_from_path() {
    let catalog = DeviceCatalog::from_path(fixture_path("catalog.json")).unwrap();
    assert_eq!(catalog.identifiers(), vec!["11111111", "22222222"]);

    let default = catalog.open(None).unwrap();
    assert_eq!(default.identifier(), "11111111");

    let second = catalog.open(Some("22222222")).unwrap();
    assert_eq!(second.boolean_encoding(), BooleanEncoding::OnOff);
}

#[test]
fn test_catalog_missing_file() {
    assert!(DeviceCatalog::from_path(fixture_path("does_not_exist.json")).is_err());
}
