//! CrewQueue Headless Harness
//!
//! Runs crew rotation campaigns against the session engine and sweeps the
//! pure policy functions, checking the rotation invariants along the way.
//! Runs entirely in-process, no host game needed.
//!
//! Usage:
//!   cargo run -p crewqueue-simtest
//!   cargo run -p crewqueue-simtest -- --verbose
//!   cargo run -p crewqueue-simtest -- --json
//!
//! Log output follows `RUST_LOG` (default `warn`, `debug` with `--verbose`).

use std::collections::{BTreeMap, HashSet};

use crewqueue_core::engine::CrewQueueEngine;
use crewqueue_core::generation::RosterConfig;
use crewqueue_logic::constants::roles;
use crewqueue_logic::constants::time::{EARTH_DAY, KERBIN_DAY};
use crewqueue_logic::ledger::VacationLedger;
use crewqueue_logic::manifest::{PartManifest, VesselManifest};
use crewqueue_logic::persistence::ConfigNode;
use crewqueue_logic::roster::{RosterHost, RosterStatus};
use crewqueue_logic::selector::{select_crew, Candidate, SeatRequest, SelectionQuery};
use crewqueue_logic::settings::Settings;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

// ── Test harness ────────────────────────────────────────────────────────

#[derive(Serialize)]
struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    let json = std::env::args().any(|a| a == "--json");

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();

    println!("=== CrewQueue Harness ===\n");

    let mut results = Vec::new();

    // 1. Cooldown formula sweep
    results.extend(validate_cooldown(verbose));

    // 2. Ledger monotonicity
    results.extend(validate_ledger(verbose));

    // 3. Randomized selector properties
    results.extend(validate_selector(verbose));

    // 4. Multi-mission rotation campaign
    let mut engine = CrewQueueEngine::new(2024);
    results.extend(validate_campaign(&mut engine, verbose));

    // 5. Scene gate transitions
    results.extend(validate_scene_gate(&mut engine, verbose));

    // 6. Save text and snapshot persistence
    results.extend(validate_persistence(&mut engine, verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    if json {
        match serde_json::to_string_pretty(&results) {
            Ok(report) => println!("{}", report),
            Err(e) => log::error!("Could not render JSON report: {}", e),
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Cooldown ─────────────────────────────────────────────────────────

fn validate_cooldown(verbose: bool) -> Vec<TestResult> {
    println!("--- Cooldown ---");
    let mut results = Vec::new();

    let settings = Settings::default();
    let day = settings.day_length();
    let mut out_of_range = 0;
    let mut formula_misses = 0;
    for days in 0..=400 {
        let duration = days as f64 * day;
        let cooldown = settings.cooldown(duration);
        if cooldown < settings.minimum_vacation() || cooldown > settings.maximum_vacation() {
            out_of_range += 1;
        }
        let raw = duration * settings.vacation_scalar;
        let expected = raw.max(7.0 * day).min(28.0 * day);
        if (cooldown - expected).abs() > 1e-6 {
            formula_misses += 1;
        }
    }
    results.push(TestResult {
        name: "cooldown_within_bounds".into(),
        passed: out_of_range == 0,
        detail: format!("{} of 401 durations outside [min, max]", out_of_range),
    });
    results.push(TestResult {
        name: "cooldown_formula".into(),
        passed: formula_misses == 0,
        detail: format!("{} mismatches against clamp(duration * scalar)", formula_misses),
    });

    let ten_days = settings.cooldown(10.0 * KERBIN_DAY);
    results.push(TestResult {
        name: "ten_day_mission_gets_a_week".into(),
        passed: ten_days == 7.0 * KERBIN_DAY,
        detail: format!("{:.0}s", ten_days),
    });

    let inverted = Settings {
        minimum_vacation_days: 30,
        maximum_vacation_days: 10,
        ..Settings::default()
    };
    let inverted_ok = (0..100).all(|d| inverted.cooldown(d as f64 * day) == 10.0 * day);
    results.push(TestResult {
        name: "inverted_range_maximum_wins".into(),
        passed: inverted_ok && inverted.validate().is_err(),
        detail: "min 30 / max 10 always yields 10 days".into(),
    });

    let earth = Settings {
        kerbin_time: false,
        ..Settings::default()
    };
    results.push(TestResult {
        name: "earth_days".into(),
        passed: earth.minimum_vacation() == 7.0 * EARTH_DAY,
        detail: format!("minimum {:.0}s", earth.minimum_vacation()),
    });

    if verbose {
        println!("  swept 0..=400 day missions");
    }
    results
}

// ── 2. Ledger ───────────────────────────────────────────────────────────

fn validate_ledger(verbose: bool) -> Vec<TestResult> {
    println!("--- Vacation Ledger ---");
    let mut results = Vec::new();
    let settings = Settings::default();
    let day = settings.day_length();
    let mut rng = StdRng::seed_from_u64(17);

    let mut ledger = VacationLedger::new();
    let crew: Vec<String> = (0..20).map(|i| format!("Ledger {} Kerman", i)).collect();
    let mut shrunk = 0;
    let mut now = 0.0;
    for _ in 0..500 {
        now += rng.gen_range(0.0..5.0) * day;
        let name = &crew[rng.gen_range(0..crew.len())];
        let before = ledger.expiry(name);
        ledger.record_mission(name, rng.gen_range(0.0..200.0) * day, now, &settings);
        if ledger.expiry(name) < before {
            shrunk += 1;
        }
    }
    results.push(TestResult {
        name: "expiry_never_shrinks".into(),
        passed: shrunk == 0,
        detail: format!("{} of 500 recordings shortened a vacation", shrunk),
    });

    let mut resumed = 0;
    for name in &crew {
        let mut was_free = false;
        for step in 0..200 {
            let t = now - 30.0 * day + step as f64 * 0.5 * day;
            let on = ledger.is_on_vacation(name, t);
            if was_free && on {
                resumed += 1;
            }
            was_free |= !on;
        }
    }
    results.push(TestResult {
        name: "vacation_monotonic_in_time".into(),
        passed: resumed == 0,
        detail: format!("{} vacations resumed without a new mission", resumed),
    });

    let mut forced = VacationLedger::new();
    forced.record_mission("Val Kerman", 0.0, 0.0, &settings);
    forced.record_mission("Val Kerman", 1.0 * day, 3.0 * day, &settings);
    let flagged = forced.is_forced_vacation("Val Kerman");
    forced.record_mission("Val Kerman", 1.0 * day, 40.0 * day, &settings);
    let cleared = !forced.is_forced_vacation("Val Kerman");
    results.push(TestResult {
        name: "forced_vacations_flagged".into(),
        passed: flagged && cleared,
        detail: format!(
            "{} of {} records launched while on vacation",
            ledger.records().filter(|r| r.extremely_fatigued).count(),
            ledger.len()
        ),
    });

    if verbose {
        println!("  {} records, final time {:.0}s", ledger.len(), now);
    }
    results
}

// ── 3. Selector ─────────────────────────────────────────────────────────

fn random_pool(rng: &mut StdRng, size: usize) -> Vec<Candidate> {
    let professions = [roles::PILOT, roles::ENGINEER, roles::SCIENTIST, "Tourist"];
    (0..size)
        .map(|i| Candidate {
            name: format!("Pool {} Kerman", i),
            role: professions[rng.gen_range(0..professions.len())].to_string(),
            experience_level: rng.gen_range(0..=5),
            last_flown: if rng.gen_bool(0.2) {
                f64::NEG_INFINITY
            } else {
                rng.gen_range(0.0..1.0e7)
            },
            on_vacation: rng.gen_bool(0.3),
        })
        .collect()
}

fn validate_selector(verbose: bool) -> Vec<TestResult> {
    println!("--- Crew Selector ---");
    let mut results = Vec::new();
    let mut rng = StdRng::seed_from_u64(99);

    let trials = 2000;
    let mut over_capacity = 0;
    let mut duplicates = 0;
    let mut exempt_picked = 0;
    let mut hardlock_leaks = 0;
    let mut soft_lock_order = 0;

    for _ in 0..trials {
        let size = rng.gen_range(0..30);
        let pool = random_pool(&mut rng, size);
        let composition_len = rng.gen_range(0..5);
        let composition: Vec<&str> = (0..composition_len)
            .map(|_| roles::DEFAULT_COMPOSITION[rng.gen_range(0..3)])
            .collect();
        let request = SeatRequest::with_composition(rng.gen_range(0..10), composition);
        let exempt: Vec<String> = pool
            .iter()
            .filter(|_| rng.gen_bool(0.1))
            .map(|c| c.name.clone())
            .collect();
        let query = SelectionQuery {
            request: &request,
            exempt: &exempt,
            prefer_veteran: rng.gen_bool(0.5),
            hard_lock: rng.gen_bool(0.5),
        };
        let picked = select_crew(&query, &pool, &mut rng);

        if picked.len() > request.capacity {
            over_capacity += 1;
        }
        let unique: HashSet<&String> = picked.iter().collect();
        if unique.len() != picked.len() {
            duplicates += 1;
        }
        if picked.iter().any(|n| exempt.contains(n)) {
            exempt_picked += 1;
        }
        let by_name: BTreeMap<&str, &Candidate> =
            pool.iter().map(|c| (c.name.as_str(), c)).collect();
        let vacationing = picked
            .iter()
            .filter(|n| by_name.get(n.as_str()).is_some_and(|c| c.on_vacation))
            .count();
        if query.hard_lock && vacationing > 0 {
            hardlock_leaks += 1;
        }
        // A vacationing pick under soft lock means no rested crew of that
        // role was left.
        if !query.hard_lock {
            for name in &picked {
                let Some(c) = by_name.get(name.as_str()) else {
                    continue;
                };
                if !c.on_vacation {
                    continue;
                }
                let rested_left = pool.iter().any(|o| {
                    o.role == c.role
                        && !o.on_vacation
                        && !picked.contains(&o.name)
                        && !exempt.contains(&o.name)
                });
                if rested_left {
                    soft_lock_order += 1;
                }
            }
        }
    }

    results.push(TestResult {
        name: "never_exceeds_capacity".into(),
        passed: over_capacity == 0,
        detail: format!("{} / {} trials over capacity", over_capacity, trials),
    });
    results.push(TestResult {
        name: "never_duplicates".into(),
        passed: duplicates == 0,
        detail: format!("{} / {} trials with duplicates", duplicates, trials),
    });
    results.push(TestResult {
        name: "exempt_crew_skipped".into(),
        passed: exempt_picked == 0,
        detail: format!("{} / {} trials picked exempt crew", exempt_picked, trials),
    });
    results.push(TestResult {
        name: "hardlock_excludes_vacation".into(),
        passed: hardlock_leaks == 0,
        detail: format!("{} / {} hard-lock trials picked vacationing crew", hardlock_leaks, trials),
    });
    results.push(TestResult {
        name: "soft_lock_prefers_rested".into(),
        passed: soft_lock_order == 0,
        detail: format!("{} vacationing picks while rested crew remained", soft_lock_order),
    });

    let scenario = SeatRequest::new(4);
    let pool = vec![
        Candidate {
            name: "Jeb".into(),
            role: roles::PILOT.into(),
            experience_level: 3,
            last_flown: f64::NEG_INFINITY,
            on_vacation: false,
        },
        Candidate {
            name: "Bob".into(),
            role: roles::SCIENTIST.into(),
            experience_level: 1,
            last_flown: f64::NEG_INFINITY,
            on_vacation: false,
        },
        Candidate {
            name: "Gene".into(),
            role: roles::SCIENTIST.into(),
            experience_level: 0,
            last_flown: f64::NEG_INFINITY,
            on_vacation: false,
        },
    ];
    let picked = select_crew(&SelectionQuery::new(&scenario), &pool, &mut rng);
    results.push(TestResult {
        name: "missing_role_leaves_seat_empty".into(),
        passed: picked.len() <= 3 && picked.contains(&"Jeb".to_string()),
        detail: format!("{:?}", picked),
    });

    if verbose {
        println!("  {} randomized trials", trials);
    }
    results
}

// ── 4. Campaign ─────────────────────────────────────────────────────────

fn validate_campaign(engine: &mut CrewQueueEngine, verbose: bool) -> Vec<TestResult> {
    println!("--- Rotation Campaign ---");
    let mut results = Vec::new();
    let mut rng = StdRng::seed_from_u64(7);

    engine.generate(&RosterConfig {
        crew_size: 30,
        ..RosterConfig::default()
    });
    engine.set_settings(Settings {
        vacation_hardlock: true,
        ..Settings::default()
    });
    let day = engine.settings.day_length();

    let missions = 80;
    let mut launched_on_vacation = 0;
    let mut empty_launches = 0;
    let mut flights: BTreeMap<String, u32> = BTreeMap::new();

    for _ in 0..missions {
        let mut parts = vec![PartManifest::new("mk1-3pod", 3)];
        if rng.gen_bool(0.3) {
            parts.push(PartManifest::new("crew-cabin", 4).with_composition("Scientist, Engineer"));
        }
        let mut manifest = VesselManifest::new(parts);
        engine.fill_manifest(&mut manifest);
        let crew = manifest.all_crew();
        if crew.is_empty() {
            empty_launches += 1;
        }
        launched_on_vacation += crew.iter().filter(|n| engine.is_on_vacation(n)).count();
        for name in &crew {
            *flights.entry(name.clone()).or_default() += 1;
        }

        engine.on_vessel_launched(&crew);
        let mission_days = rng.gen_range(1.0..60.0);
        engine.advance_time(mission_days * day);
        engine.on_vessel_recovered(&crew, mission_days * day);
        engine.advance_time(rng.gen_range(0.0..5.0) * day);
    }

    results.push(TestResult {
        name: "hardlock_never_launches_vacationers".into(),
        passed: launched_on_vacation == 0,
        detail: format!("{} vacationing crew launched", launched_on_vacation),
    });
    results.push(TestResult {
        name: "campaign_launches_crew".into(),
        passed: empty_launches < missions,
        detail: format!("{} / {} launches without crew", empty_launches, missions),
    });

    let flown = flights.len();
    let max = flights.values().copied().max().unwrap_or(0);
    let min = flights.values().copied().min().unwrap_or(0);
    results.push(TestResult {
        name: "rotation_spreads_flights".into(),
        passed: flown * 2 >= engine.roster.members().len(),
        detail: format!("{} crew flew, flights per crew {}..={}", flown, min, max),
    });

    let assigned = engine
        .roster
        .members()
        .iter()
        .filter(|m| m.status == RosterStatus::Assigned)
        .count();
    results.push(TestResult {
        name: "recovered_crew_back_on_roster".into(),
        passed: assigned == 0,
        detail: format!("{} crew still assigned", assigned),
    });

    if verbose {
        println!(
            "  {} missions, universal time {:.0}s, {} on vacation",
            missions,
            engine.universal_time(),
            engine.unavailable_crew().len()
        );
    }
    results
}

// ── 5. Scene Gate ───────────────────────────────────────────────────────

fn count_status(engine: &CrewQueueEngine, status: RosterStatus) -> usize {
    engine
        .roster
        .members()
        .iter()
        .filter(|m| m.status == status)
        .count()
}

fn validate_scene_gate(engine: &mut CrewQueueEngine, verbose: bool) -> Vec<TestResult> {
    println!("--- Scene Gate ---");
    let mut results = Vec::new();

    let vacationing = engine.unavailable_crew().len();
    engine.on_crew_screen_opened();
    let hidden = count_status(engine, RosterStatus::Vacation);
    results.push(TestResult {
        name: "screen_hides_vacationers".into(),
        passed: hidden == vacationing,
        detail: format!("{} hidden, {} on vacation", hidden, vacationing),
    });

    engine.on_crew_screen_closed();
    results.push(TestResult {
        name: "screen_close_restores".into(),
        passed: count_status(engine, RosterStatus::Vacation) == 0,
        detail: "no Vacation status after close".into(),
    });

    engine.on_crew_screen_opened();
    engine.on_scene_loaded();
    engine.update();
    results.push(TestResult {
        name: "scene_load_restores".into(),
        passed: count_status(engine, RosterStatus::Vacation) == 0 && !engine.gate.release_pending(),
        detail: "no Vacation status after scene load and tick".into(),
    });

    engine.on_crew_screen_opened();
    let mut relaxed = engine.settings.clone();
    relaxed.vacation_hardlock = false;
    engine.set_settings(relaxed);
    let still_hidden = count_status(engine, RosterStatus::Vacation);
    let expiries_kept = engine.unavailable_crew().len() == vacationing;
    results.push(TestResult {
        name: "hardlock_off_mid_screen_releases".into(),
        passed: still_hidden == 0 && expiries_kept,
        detail: format!("{} still hidden", still_hidden),
    });
    engine.on_crew_screen_closed();

    if verbose {
        println!("  vacation label: {}", engine.vacation_label());
    }
    results
}

// ── 6. Persistence ──────────────────────────────────────────────────────

fn validate_persistence(engine: &mut CrewQueueEngine, verbose: bool) -> Vec<TestResult> {
    println!("--- Persistence ---");
    let mut results = Vec::new();

    let text = engine.save_text();
    let mut restored = CrewQueueEngine::new(1);
    restored.set_time(engine.universal_time());
    let text_ok = restored.load_text(&text).is_ok();
    let mismatched = engine
        .ledger
        .records()
        .filter(|r| restored.ledger.expiry(&r.name) != r.expiry)
        .count();
    results.push(TestResult {
        name: "save_text_round_trip".into(),
        passed: text_ok && mismatched == 0 && restored.ledger.len() == engine.ledger.len(),
        detail: format!(
            "{} records, {} mismatched, {} bytes",
            engine.ledger.len(),
            mismatched,
            text.len()
        ),
    });

    let json_ok = ConfigNode::parse(&text)
        .ok()
        .and_then(|root| root.to_json().ok())
        .and_then(|json| serde_json::from_str::<serde_json::Value>(&json).ok())
        .is_some();
    results.push(TestResult {
        name: "save_tree_json_export".into(),
        passed: json_ok,
        detail: "save text re-exported as JSON".into(),
    });

    let mut buffer = Vec::new();
    let snapshot = engine.save(&mut buffer).and_then(|_| {
        let mut loaded = CrewQueueEngine::new(0);
        loaded.load(&buffer[..])?;
        Ok(loaded)
    });
    match snapshot {
        Ok(loaded) => results.push(TestResult {
            name: "snapshot_round_trip".into(),
            passed: loaded.ledger == engine.ledger
                && loaded.roster.members() == engine.roster.members(),
            detail: format!("{} bytes", buffer.len()),
        }),
        Err(e) => results.push(TestResult {
            name: "snapshot_round_trip".into(),
            passed: false,
            detail: format!("snapshot error: {}", e),
        }),
    }

    if verbose {
        println!("  scenario text {} bytes", text.len());
    }
    results
}
