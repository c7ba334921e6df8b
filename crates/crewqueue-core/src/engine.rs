//! Session engine - owns the roster mirror, ledger, settings and scene gate,
//! and turns host events into ledger updates and crew selections.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crewqueue_logic::clock;
use crewqueue_logic::ledger::VacationLedger;
use crewqueue_logic::manifest::VesselManifest;
use crewqueue_logic::persistence::{self as save_tree, ConfigNode, ParseError};
use crewqueue_logic::roster::{CrewMember, RosterHost, RosterStatus, RosterView};
use crewqueue_logic::selector::{select_crew, Candidate, SeatRequest, SelectionQuery};
use crewqueue_logic::settings::{Settings, SettingsError, SettingsInput};
use crewqueue_logic::suppression::{SceneGate, SuppressionState};

use crate::generation::{generate_roster, RosterConfig};
use crate::persistence::{load_session, save_session, SaveError};
use crate::roster::EcsRoster;

/// One crew-queue session, created at plugin load.
pub struct CrewQueueEngine {
    /// Mirror of the host crew roster
    pub roster: EcsRoster,
    /// Vacation records keyed by crew name
    pub ledger: VacationLedger,
    pub settings: Settings,
    /// Vacation override for assignment screens
    pub gate: SceneGate,

    universal_time: f64,
    seed: u64,
    rng: StdRng,
}

impl CrewQueueEngine {
    /// Create an empty session. `seed` drives overflow-seat role draws.
    pub fn new(seed: u64) -> Self {
        Self {
            roster: EcsRoster::new(),
            ledger: VacationLedger::new(),
            settings: Settings::default(),
            gate: SceneGate::new(),
            universal_time: 0.0,
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Hire a generated roster
    pub fn generate(&mut self, config: &RosterConfig) {
        generate_roster(&mut self.roster, config, &mut self.rng);
    }

    pub fn universal_time(&self) -> f64 {
        self.universal_time
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn set_time(&mut self, universal_time: f64) {
        self.universal_time = universal_time;
    }

    /// Advance the clock and run the per-frame update.
    pub fn advance_time(&mut self, seconds: f64) {
        self.universal_time += seconds.max(0.0);
        self.update();
    }

    /// Per-frame update: consume a deferred release and, while an
    /// assignment screen is open, release crew whose vacation just ended.
    pub fn update(&mut self) {
        self.gate.tick(&mut self.roster);
        if self.gate.state() == SuppressionState::Suppressed {
            self.gate.refresh(
                &mut self.roster,
                &self.ledger,
                &self.settings,
                self.universal_time,
            );
        }
    }

    // ========================================================================
    // ROSTER EVENTS
    // ========================================================================

    pub fn hire(&mut self, member: CrewMember) -> bool {
        self.roster.hire(member).is_some()
    }

    /// Host-reported experience level for a crew member.
    pub fn set_experience(&mut self, name: &str, level: u8) -> bool {
        self.roster.set_experience(name, level)
    }

    /// Crew left the roster (killed, fired). Their ledger record goes too.
    pub fn on_crew_removed(&mut self, name: &str) -> bool {
        let removed = self.roster.dismiss(name).is_some();
        if removed {
            self.prune();
        }
        removed
    }

    /// Crew boarded a launching vessel.
    pub fn on_vessel_launched(&mut self, crew: &[String]) {
        for name in crew {
            if !self.roster.set_status(name, RosterStatus::Assigned) {
                log::warn!("Launch crew {} is not on the roster", name);
            }
        }
    }

    /// A vessel was recovered after `mission_time` seconds in flight. Every
    /// crew member aboard starts a vacation and returns to the roster.
    pub fn on_vessel_recovered(&mut self, crew: &[String], mission_time: f64) {
        for name in crew {
            self.ledger
                .record_mission(name, mission_time, self.universal_time, &self.settings);
            if self.roster.status(name) == Some(RosterStatus::Assigned) {
                self.roster.set_status(name, RosterStatus::Available);
            }
            self.roster.log_flight(name);
        }
    }

    /// Rename a crew member in both the roster and the ledger.
    pub fn rename_crew(&mut self, old: &str, new: &str) -> bool {
        if !self.roster.rename(old, new) {
            return false;
        }
        // Nobody on the roster owned `new`, so any record under it is an orphan.
        if self.ledger.remove(new).is_some() {
            log::debug!("Dropped orphaned vacation record for {}", new);
        }
        self.ledger.rename(old, new);
        true
    }

    /// Drop ledger records for crew no longer on the roster.
    pub fn prune(&mut self) -> usize {
        let roster = &self.roster;
        self.ledger.prune(|name| roster.contains(name))
    }

    // ========================================================================
    // SCENE EVENTS
    // ========================================================================

    pub fn on_scene_loaded(&mut self) {
        self.gate.on_scene_loaded(&mut self.roster);
    }

    pub fn on_crew_screen_opened(&mut self) {
        self.gate.enter_crew_screen(
            &mut self.roster,
            &self.ledger,
            &self.settings,
            self.universal_time,
        );
    }

    pub fn on_crew_screen_closed(&mut self) {
        self.gate.leave_crew_screen(&mut self.roster);
    }

    // ========================================================================
    // SELECTION
    // ========================================================================

    fn candidates(&self) -> Vec<Candidate> {
        let members = self.roster.members();
        RosterView::new(&members, &self.ledger, self.universal_time).candidates()
    }

    /// Crew for one part, in seat order.
    pub fn get_crew_for_part(
        &mut self,
        request: &SeatRequest,
        exempt: &[String],
        prefer_veteran: bool,
    ) -> Vec<String> {
        let pool = self.candidates();
        let query = SelectionQuery {
            request,
            exempt,
            prefer_veteran,
            hard_lock: self.settings.vacation_hardlock,
        };
        select_crew(&query, &pool, &mut self.rng)
    }

    /// Fill every open seat of the vessel. The root part gets veterans;
    /// crew already aboard are never picked twice. Returns the number of
    /// crew seated. No-op when custom assignment is off.
    pub fn fill_manifest(&mut self, manifest: &mut VesselManifest) -> usize {
        if !self.settings.do_custom_assignment {
            return 0;
        }
        let mut seated = 0;
        for idx in 0..manifest.parts.len() {
            let exempt = manifest.all_crew();
            let part = &manifest.parts[idx];
            let open = part.open_seats().len();
            if open == 0 {
                continue;
            }
            let mut request = part.seat_request();
            request.capacity = open;
            let picks = self.get_crew_for_part(&request, &exempt, idx == 0);
            seated += picks.len();
            manifest.parts[idx].add_crew_to_open_seats(picks);
        }
        log::info!("Filled manifest with {} crew", seated);
        seated
    }

    /// Empty the root part and, with custom assignment on, refill it with
    /// veterans. Returns the crew removed.
    pub fn clean_root(&mut self, manifest: &mut VesselManifest) -> Vec<String> {
        let Some(root) = manifest.root_mut() else {
            return Vec::new();
        };
        let removed = root.clear();
        if self.settings.do_custom_assignment {
            let exempt = manifest.all_crew();
            if let Some(root) = manifest.root_mut() {
                let request = root.seat_request();
                let picks = self.get_crew_for_part(&request, &exempt, true);
                root.add_crew_to_open_seats(picks);
            }
        }
        removed
    }

    // ========================================================================
    // VIEWS
    // ========================================================================

    fn view_members(&self) -> Vec<CrewMember> {
        self.roster.members()
    }

    pub fn available_crew(&self) -> Vec<CrewMember> {
        let members = self.view_members();
        let view = RosterView::new(&members, &self.ledger, self.universal_time);
        view.available_crew().into_iter().cloned().collect()
    }

    pub fn unavailable_crew(&self) -> Vec<CrewMember> {
        let members = self.view_members();
        let view = RosterView::new(&members, &self.ledger, self.universal_time);
        view.unavailable_crew().into_iter().cloned().collect()
    }

    pub fn most_experienced_crew(&self) -> Vec<CrewMember> {
        let members = self.view_members();
        let view = RosterView::new(&members, &self.ledger, self.universal_time);
        view.most_experienced_crew().into_iter().cloned().collect()
    }

    pub fn least_experienced_crew(&self) -> Vec<CrewMember> {
        let members = self.view_members();
        let view = RosterView::new(&members, &self.ledger, self.universal_time);
        view.least_experienced_crew().into_iter().cloned().collect()
    }

    pub fn is_on_vacation(&self, name: &str) -> bool {
        self.ledger.is_on_vacation(name, self.universal_time)
    }

    pub fn time_remaining(&self, name: &str) -> f64 {
        self.ledger.time_remaining(name, self.universal_time)
    }

    /// "Ready In: ..." countdown for a vacationing crew member.
    pub fn ready_label(&self, name: &str) -> Option<String> {
        if !self.is_on_vacation(name) {
            return None;
        }
        Some(clock::ready_label(
            self.time_remaining(name),
            self.settings.day_length(),
        ))
    }

    pub fn vacation_label(&self) -> &'static str {
        clock::vacation_label(self.settings.vacation_hardlock)
    }

    // ========================================================================
    // SETTINGS
    // ========================================================================

    /// Apply settings-window input and re-evaluate any open screen.
    pub fn apply_settings_input(&mut self, input: &SettingsInput) -> Vec<SettingsError> {
        let errors = self.settings.apply(input);
        self.refresh();
        errors
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
        self.refresh();
    }

    fn refresh(&mut self) {
        self.gate.refresh(
            &mut self.roster,
            &self.ledger,
            &self.settings,
            self.universal_time,
        );
    }

    // ========================================================================
    // PERSISTENCE
    // ========================================================================

    /// Scenario node for the host save. Orphaned records are pruned first.
    pub fn save_scenario(&mut self) -> ConfigNode {
        self.prune();
        save_tree::save_scenario(&self.ledger, &self.settings)
    }

    /// Replace ledger and settings with a scenario node from the host save.
    pub fn load_scenario(&mut self, scenario: &ConfigNode) {
        let (ledger, settings) = save_tree::load_scenario(scenario);
        self.ledger = ledger;
        self.settings = settings;
        self.refresh();
    }

    pub fn save_text(&mut self) -> String {
        self.save_scenario().to_text()
    }

    pub fn load_text(&mut self, text: &str) -> Result<(), ParseError> {
        let (ledger, settings) = save_tree::load_scenario_text(text)?;
        self.ledger = ledger;
        self.settings = settings;
        self.refresh();
        Ok(())
    }

    /// Save a full binary snapshot to a writer
    pub fn save<W: std::io::Write>(&self, writer: W) -> Result<(), SaveError> {
        save_session(
            writer,
            &self.roster,
            &self.ledger,
            &self.settings,
            self.universal_time,
            self.seed,
        )
    }

    /// Load a full binary snapshot from a reader
    pub fn load<R: std::io::Read>(&mut self, reader: R) -> Result<(), SaveError> {
        let loaded = load_session(reader)?;

        self.roster = loaded.roster;
        self.ledger = loaded.ledger;
        self.settings = loaded.settings;
        self.universal_time = loaded.universal_time;
        self.seed = loaded.seed;
        self.rng = StdRng::seed_from_u64(loaded.seed);
        self.gate = SceneGate::new();

        Ok(())
    }
}
