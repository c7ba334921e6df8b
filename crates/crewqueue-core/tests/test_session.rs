//! Integration tests for a full crew-queue session.
//!
//! Exercises: generated roster → launches and recoveries over many missions
//! → scene gate → scenario text and binary snapshot persistence.

use crewqueue_core::generation::RosterConfig;
use crewqueue_core::prelude::*;
use crewqueue_logic::constants::time::KERBIN_DAY;

// ── Helpers ────────────────────────────────────────────────────────────

fn session(seed: u64, hard_lock: bool) -> CrewQueueEngine {
    let mut engine = CrewQueueEngine::new(seed);
    engine.generate(&RosterConfig {
        crew_size: 24,
        ..RosterConfig::default()
    });
    engine.set_settings(Settings {
        vacation_hardlock: hard_lock,
        ..Settings::default()
    });
    engine
}

/// Launch a three-seat pod and recover it `days` later.
fn fly(engine: &mut CrewQueueEngine, days: f64) -> Vec<String> {
    let mut manifest = VesselManifest::new(vec![PartManifest::new("mk1-3pod", 3)]);
    engine.fill_manifest(&mut manifest);
    let crew = manifest.all_crew();
    engine.on_vessel_launched(&crew);
    engine.advance_time(days * KERBIN_DAY);
    engine.on_vessel_recovered(&crew, days * KERBIN_DAY);
    crew
}

// ── Rotation ───────────────────────────────────────────────────────────

#[test]
fn back_to_back_missions_never_reuse_resting_crew_under_hardlock() {
    let mut engine = session(5, true);
    let mut flown: Vec<Vec<String>> = Vec::new();
    for _ in 0..4 {
        let crew = fly(&mut engine, 1.0);
        assert!(crew.len() <= 3);
        for previous in &flown {
            for name in &crew {
                assert!(
                    !previous.contains(name),
                    "{} flew again while on vacation",
                    name
                );
            }
        }
        flown.push(crew);
    }
}

#[test]
fn crew_return_to_rotation_after_vacation() {
    let mut engine = session(9, true);
    let first = fly(&mut engine, 1.0);
    assert!(first.iter().all(|n| engine.is_on_vacation(n)));

    engine.advance_time(30.0 * KERBIN_DAY);
    assert!(first.iter().all(|n| !engine.is_on_vacation(n)));
    assert!(engine.unavailable_crew().is_empty());
    assert_eq!(engine.available_crew().len(), 24);
}

#[test]
fn assignment_screen_hides_and_restores() {
    let mut engine = session(2, true);
    let crew = fly(&mut engine, 2.0);
    engine.on_crew_screen_opened();
    for name in &crew {
        assert_eq!(
            engine.roster.get(name).map(|m| m.status),
            Some(RosterStatus::Vacation)
        );
    }
    engine.on_scene_loaded();
    engine.update();
    for name in &crew {
        assert_eq!(
            engine.roster.get(name).map(|m| m.status),
            Some(RosterStatus::Available)
        );
    }
}

// ── Persistence ────────────────────────────────────────────────────────

#[test]
fn snapshot_taken_mid_screen_restores_everyone() {
    let mut engine = session(4, true);
    fly(&mut engine, 1.0);
    engine.on_crew_screen_opened();

    let mut buffer = Vec::new();
    engine.save(&mut buffer).expect("save");

    let mut loaded = CrewQueueEngine::new(0);
    loaded.load(&buffer[..]).expect("load");
    assert!(loaded
        .roster
        .members()
        .iter()
        .all(|m| m.status != RosterStatus::Vacation));
    assert_eq!(loaded.unavailable_crew().len(), 3);
}

#[test]
fn scenario_text_survives_a_reload() {
    let mut engine = session(8, false);
    let crew = fly(&mut engine, 40.0);
    let text = engine.save_text();

    let mut reloaded = session(8, true);
    reloaded.set_time(engine.universal_time());
    reloaded.load_text(&text).expect("scenario text");
    assert!(!reloaded.settings.vacation_hardlock);
    for name in &crew {
        assert_eq!(
            reloaded.time_remaining(name),
            engine.time_remaining(name)
        );
    }
}
