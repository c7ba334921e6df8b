//! Integration tests for the full crew rotation cycle.
//!
//! Exercises: recovery → VacationLedger → RosterView candidates
//! → select_crew → SceneGate → save tree round trip
//!
//! All tests are pure logic, driven through the in-memory `Roster`.

use crewqueue_logic::constants::time::KERBIN_DAY;
use crewqueue_logic::ledger::VacationLedger;
use crewqueue_logic::manifest::PartManifest;
use crewqueue_logic::persistence::{load_scenario_text, save_scenario};
use crewqueue_logic::roster::{CrewMember, Roster, RosterHost, RosterStatus, RosterView};
use crewqueue_logic::selector::{select_crew, SeatRequest, SelectionQuery};
use crewqueue_logic::settings::{Settings, SettingsInput};
use crewqueue_logic::suppression::SceneGate;
use rand::rngs::StdRng;
use rand::SeedableRng;

// ── Helpers ────────────────────────────────────────────────────────────

fn kerbal_space_center() -> Roster {
    Roster::new(vec![
        CrewMember::new("Jebediah Kerman", "Pilot", 3),
        CrewMember::new("Valentina Kerman", "Pilot", 3),
        CrewMember::new("Bill Kerman", "Engineer", 2),
        CrewMember::new("Bob Kerman", "Scientist", 2),
        CrewMember::new("Gene Kerman", "Scientist", 0),
        CrewMember::new("Wernher Kerman", "Engineer", 0),
    ])
}

fn pick(
    roster: &Roster,
    ledger: &VacationLedger,
    settings: &Settings,
    now: f64,
    request: &SeatRequest,
    prefer_veteran: bool,
) -> Vec<String> {
    let members = roster.members();
    let pool = RosterView::new(&members, ledger, now).candidates();
    let mut query = SelectionQuery::new(request);
    query.prefer_veteran = prefer_veteran;
    query.hard_lock = settings.vacation_hardlock;
    let mut rng = StdRng::seed_from_u64(7);
    select_crew(&query, &pool, &mut rng)
}

// ── Rotation ───────────────────────────────────────────────────────────

#[test]
fn recovered_crew_rotate_to_the_back() {
    let roster = kerbal_space_center();
    let settings = Settings::default();
    let mut ledger = VacationLedger::new();
    let request = SeatRequest::new(3);

    let first = pick(&roster, &ledger, &settings, 0.0, &request, true);
    assert_eq!(first, vec!["Jebediah Kerman", "Bill Kerman", "Bob Kerman"]);

    let end = 10.0 * KERBIN_DAY;
    for name in &first {
        ledger.record_mission(name, 10.0 * KERBIN_DAY, end, &settings);
    }

    let second = pick(&roster, &ledger, &settings, end + 1.0, &request, true);
    assert_eq!(
        second,
        vec!["Valentina Kerman", "Wernher Kerman", "Gene Kerman"]
    );
}

#[test]
fn soft_lock_falls_back_to_vacationing_crew() {
    let roster = Roster::new(vec![
        CrewMember::new("Jebediah Kerman", "Pilot", 3),
        CrewMember::new("Bill Kerman", "Engineer", 2),
    ]);
    let settings = Settings::default();
    let mut ledger = VacationLedger::new();
    ledger.record_mission("Jebediah Kerman", 0.0, 0.0, &settings);

    let request = SeatRequest::new(2);
    let picked = pick(&roster, &ledger, &settings, 1.0, &request, false);
    assert_eq!(picked, vec!["Jebediah Kerman", "Bill Kerman"]);

    let hard = Settings {
        vacation_hardlock: true,
        ..Settings::default()
    };
    let picked = pick(&roster, &ledger, &hard, 1.0, &request, false);
    assert_eq!(picked, vec!["Bill Kerman"]);
}

#[test]
fn hardlock_toggled_off_mid_session_frees_hidden_crew() {
    let mut roster = kerbal_space_center();
    let mut settings = Settings::default();
    settings.apply(&SettingsInput {
        vacation_hardlock: true,
        ..settings.to_input()
    });
    assert!(settings.vacation_hardlock);

    let mut ledger = VacationLedger::new();
    ledger.record_mission("Jebediah Kerman", 0.0, 0.0, &settings);
    ledger.record_mission("Valentina Kerman", 0.0, 0.0, &settings);
    let expiry = ledger.expiry("Jebediah Kerman");

    let mut gate = SceneGate::new();
    gate.enter_crew_screen(&mut roster, &ledger, &settings, 1.0);
    let request = SeatRequest::with_composition(1, ["Pilot"]);
    assert!(pick(&roster, &ledger, &settings, 1.0, &request, true).is_empty());

    settings.apply(&SettingsInput {
        vacation_hardlock: false,
        ..settings.to_input()
    });
    gate.refresh(&mut roster, &ledger, &settings, 1.0);

    assert_eq!(
        roster.get("Jebediah Kerman").map(|m| m.status),
        Some(RosterStatus::Available)
    );
    let picked = pick(&roster, &ledger, &settings, 1.0, &request, true);
    assert_eq!(picked.len(), 1);
    assert_eq!(ledger.expiry("Jebediah Kerman"), expiry);
}

#[test]
fn part_manifest_seats_selected_crew() {
    let roster = kerbal_space_center();
    let ledger = VacationLedger::new();
    let settings = Settings::default();
    let mut part = PartManifest::new("mk1-3pod", 3);
    let picked = pick(&roster, &ledger, &settings, 0.0, &part.seat_request(), false);
    let leftovers = part.add_crew_to_open_seats(picked.clone());
    assert!(leftovers.is_empty());
    assert_eq!(part.crew().collect::<Vec<_>>(), picked);
}

// ── Persistence ────────────────────────────────────────────────────────

#[test]
fn save_text_round_trip_keeps_vacations_running() {
    let settings = Settings::default();
    let mut ledger = VacationLedger::new();
    ledger.record_mission("Jebediah Kerman", 40.0 * KERBIN_DAY, 100.0 * KERBIN_DAY, &settings);
    ledger.record_mission("Bill Kerman", 1.0, 100.0 * KERBIN_DAY, &settings);
    ledger.prune(|n| n != "Bill Kerman");

    let text = save_scenario(&ledger, &settings).to_text();
    let (loaded, _) = load_scenario_text(&text).expect("save text parses");

    assert_eq!(loaded.len(), 1);
    assert_eq!(
        loaded.expiry("Jebediah Kerman"),
        ledger.expiry("Jebediah Kerman")
    );
    assert!(loaded.is_on_vacation("Jebediah Kerman", 101.0 * KERBIN_DAY));
    assert!(!loaded.is_on_vacation("Bill Kerman", 101.0 * KERBIN_DAY));
}
