//! End-to-end navigation scenarios.
//!
//! Timings assume the default configuration: 90-tick stuck window, obstruction
//! scan every 10 ticks, two strategy cycles before giving up.

use dhvani_nav::navigation::Escalation;
use dhvani_nav::{
    ConfigLoadError, DoorState, EntityId, EntityKind, NavConfig, SpeechMode, Strategy, Trigger,
};
use glam::Vec3;

use crate::{HarnessConfig, TestHarness, TestHost};

const GIVE_UP: &str = "Cannot reach target. Try manual navigation.";

fn frozen() -> HarnessConfig {
    HarnessConfig {
        frozen: true,
        ..HarnessConfig::default()
    }
}

/// Wall slab across the corridor at `z`.
fn wall_at(z: f32) -> (Vec3, Vec3) {
    (Vec3::new(-3000.0, 0.0, z), Vec3::new(3000.0, 3000.0, z + 200.0))
}

#[test]
fn test_walks_to_switch_and_announces_arrival() {
    let host = TestHost::new().with_marker(1, EntityKind::Switch, Vec3::new(4000.0, 0.0, 15_000.0));
    let mut h = TestHarness::new(HarnessConfig::default(), host);

    let said = h.trigger(Trigger::ToggleEnabled);
    assert_eq!(said[0], "Auto-navigation enabled. Targeting interactive.");
    assert!(said[1].starts_with("Navigating to switch."));

    assert!(h.run_until(600, |h| h.arrived_at.is_some()));
    assert!(h.escalations.is_empty(), "unexpected escalations: {:?}", h.escalations);

    h.run(30);
    assert_eq!(h.host.count_spoken("Arrived at switch. Press SPACE to interact."), 1);
    assert_eq!(h.host.forward, 0.0);
    assert_eq!(h.host.strafe, 0.0);

    let remaining = h.host.position.distance(Vec3::new(4000.0, 0.0, 15_000.0));
    assert!(remaining < 2500.0, "stopped {remaining:.0} away");
}

#[test]
fn test_wall_alert_repeats_after_window() {
    let (min, max) = wall_at(1000.0);
    let host = TestHost::new().with_wall(min, max);
    let config = HarnessConfig {
        dt_ms: 100,
        ..frozen()
    };
    let mut h = TestHarness::new(config, host);

    let mut alerts = Vec::new();
    for _ in 0..100 {
        let report = h.step();
        if report.alert.is_some() {
            alerts.push(h.now_ms);
        }
    }

    assert_eq!(alerts, vec![3000, 7000]);
    assert_eq!(h.host.count_spoken("Wall ahead."), 2);
}

#[test]
fn test_waits_at_closed_door_then_walks_through() {
    let host = TestHost::new()
        .with_body(
            1,
            EntityKind::SwitchDoor,
            Vec3::new(-1500.0, 0.0, 4900.0),
            Vec3::new(1500.0, 3000.0, 5100.0),
        )
        .with_marker(2, EntityKind::Item, Vec3::new(0.0, 0.0, 12_000.0));
    let mut h = TestHarness::new(HarnessConfig::default(), host);

    // Interactive -> enemy -> exit -> item
    for _ in 0..3 {
        h.trigger(Trigger::CycleTargetCategory);
    }
    let said = h.trigger(Trigger::ToggleEnabled);
    assert_eq!(said[0], "Auto-navigation enabled. Targeting item.");

    assert!(h.run_until(100, |h| h.engine.controller().is_waiting_for_door()));
    assert_eq!(h.host.count_spoken("Door ahead. Press SPACE to open."), 1);

    h.run(120);
    let parked = h.host.position;
    assert!(parked.z > 1500.0 && parked.z < 4900.0, "parked at {parked:?}");
    assert_eq!(h.host.forward, 0.0);
    assert!(h.escalations.is_empty());

    h.host.doors.insert(EntityId(1), DoorState::Open);
    assert!(h.run_until(300, |h| h.arrived_at.is_some()));
    assert!(h.host.position.z > 9000.0);
    assert_eq!(h.host.count_spoken("Item nearby. Walk forward to collect."), 1);
}

#[test]
fn test_stuck_player_escalates_once() {
    let host = TestHost::new().with_marker(1, EntityKind::Switch, Vec3::new(0.0, 0.0, 30_000.0));
    let mut h = TestHarness::new(frozen(), host);
    h.trigger(Trigger::ToggleEnabled);

    h.run(150);

    assert_eq!(
        h.escalations,
        vec![(91, Escalation::Advanced(Strategy::WallFollowLeft))]
    );
    assert_eq!(h.host.count_spoken("Trying wall follow left."), 1);
}

#[test]
fn test_gives_up_after_two_strategy_cycles() {
    let host = TestHost::new().with_marker(1, EntityKind::Switch, Vec3::new(0.0, 0.0, 30_000.0));
    let mut h = TestHarness::new(frozen(), host);
    h.trigger(Trigger::ToggleEnabled);

    h.run(1200);

    let cycle = [
        Escalation::Advanced(Strategy::WallFollowLeft),
        Escalation::Advanced(Strategy::WallFollowRight),
        Escalation::Advanced(Strategy::Backtrack),
        Escalation::Advanced(Strategy::WideAroundLeft),
        Escalation::Advanced(Strategy::WideAroundRight),
    ];
    let mut expected: Vec<Escalation> = cycle.to_vec();
    expected.push(Escalation::Retrying { failures: 1 });
    expected.extend(cycle);
    expected.push(Escalation::GaveUp { failures: 2 });

    let seen: Vec<Escalation> = h.escalations.iter().map(|(_, e)| *e).collect();
    assert_eq!(seen, expected);

    let ticks: Vec<u32> = h.escalations.iter().map(|(t, _)| *t).collect();
    assert!(ticks.windows(2).all(|w| w[1] - w[0] == 91), "ticks: {ticks:?}");

    let give_up: Vec<_> = h.host.spoken.iter().filter(|(t, _)| t == GIVE_UP).collect();
    assert_eq!(give_up.len(), 1);
    assert_eq!(give_up[0].1, SpeechMode::Immediate);
    assert!(!h.engine.state().auto_move);
    assert_eq!(h.host.forward, 0.0);
}

#[test]
fn test_disable_releases_outputs_once() {
    let host = TestHost::new().with_marker(1, EntityKind::Switch, Vec3::new(0.0, 0.0, 30_000.0));
    let mut h = TestHarness::new(HarnessConfig::default(), host);
    h.trigger(Trigger::ToggleEnabled);

    h.run(5);
    assert!(h.host.forward > 0.0);

    let said = h.trigger(Trigger::ToggleEnabled);
    assert_eq!(said, vec!["Auto-navigation disabled.".to_string()]);

    h.step();
    assert_eq!(h.host.forward, 0.0);
    assert_eq!(h.host.strafe, 0.0);
    assert_eq!(h.host.turn, 0.0);

    let writes = h.host.movement_writes;
    h.run(20);
    assert_eq!(h.host.movement_writes, writes);
}

#[test]
fn test_config_file_tunes_engine() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dhvani.yaml");
    std::fs::write(
        &path,
        "cadence:\n  obstruction: 1\nobstruction:\n  debounce_count: 1\n",
    )
    .unwrap();

    let nav = NavConfig::load(&path).unwrap();
    assert_eq!(nav.cadence.obstruction, 1);
    assert_eq!(nav.navigation.arrival_distance, 2500.0);

    let (min, max) = wall_at(1000.0);
    let mut h = TestHarness::with_engine(frozen(), nav, TestHost::new().with_wall(min, max));
    let report = h.step();

    assert!(report.alert.is_some());
    assert_eq!(h.host.texts(), vec!["Wall ahead."]);
}

#[test]
fn test_invalid_config_is_rejected() {
    let result = NavConfig::from_yaml("strategy:\n  cycle_limit: 0\n");
    assert!(matches!(result, Err(ConfigLoadError::Invalid(_))));

    let result = NavConfig::from_yaml("navigation: [1, 2]\n");
    assert!(matches!(result, Err(ConfigLoadError::Parse(_))));
}
