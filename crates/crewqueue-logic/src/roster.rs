//! Crew members, roster status and read-only roster views.
//!
//! The host game owns the master crew roster. [`RosterHost`] is the seam the
//! crew-queue logic reads it through (and writes roster status through, for
//! the scene gate). [`Roster`] is a plain in-memory host used by tests and
//! tools; `crewqueue-core` provides an ECS-backed one.

use serde::{Deserialize, Serialize};

use crate::ledger::VacationLedger;
use crate::selector::Candidate;

/// Host roster status, plus the crew-queue [`RosterStatus::Vacation`]
/// override used to hide crew from stock assignment widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RosterStatus {
    Available,
    Assigned,
    Dead,
    Missing,
    /// Set by the scene gate while an assignment screen is open.
    Vacation,
}

impl RosterStatus {
    /// Available to fly, ignoring the vacation override.
    pub fn is_ready(&self) -> bool {
        matches!(self, RosterStatus::Available | RosterStatus::Vacation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrewKind {
    Crew,
    Tourist,
    Applicant,
    Unowned,
}

/// Snapshot of one host crew member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewMember {
    pub name: String,
    /// Experience trait title ("Pilot", "Engineer", ...).
    pub profession: String,
    pub experience_level: u8,
    pub status: RosterStatus,
    pub kind: CrewKind,
}

impl CrewMember {
    pub fn new(name: impl Into<String>, profession: impl Into<String>, experience_level: u8) -> Self {
        Self {
            name: name.into(),
            profession: profession.into(),
            experience_level,
            status: RosterStatus::Available,
            kind: CrewKind::Crew,
        }
    }

    pub fn with_status(mut self, status: RosterStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_kind(mut self, kind: CrewKind) -> Self {
        self.kind = kind;
        self
    }

    /// Hireable crew who could be put in a seat right now.
    pub fn is_assignable(&self) -> bool {
        self.kind == CrewKind::Crew && self.status.is_ready()
    }
}

/// The host's master crew roster.
pub trait RosterHost {
    /// Snapshot of every crew member, in roster order.
    fn members(&self) -> Vec<CrewMember>;

    /// Change a crew member's roster status. Returns false if not found.
    fn set_status(&mut self, name: &str, status: RosterStatus) -> bool;

    fn contains(&self, name: &str) -> bool {
        self.members().iter().any(|m| m.name == name)
    }
}

/// In-memory roster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    pub members: Vec<CrewMember>,
}

impl Roster {
    pub fn new(members: Vec<CrewMember>) -> Self {
        Self { members }
    }

    pub fn get(&self, name: &str) -> Option<&CrewMember> {
        self.members.iter().find(|m| m.name == name)
    }

    pub fn remove(&mut self, name: &str) -> Option<CrewMember> {
        let idx = self.members.iter().position(|m| m.name == name)?;
        Some(self.members.remove(idx))
    }
}

impl RosterHost for Roster {
    fn members(&self) -> Vec<CrewMember> {
        self.members.clone()
    }

    fn set_status(&mut self, name: &str, status: RosterStatus) -> bool {
        match self.members.iter_mut().find(|m| m.name == name) {
            Some(member) => {
                member.status = status;
                true
            }
            None => false,
        }
    }

    fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

// ============================================================================
// VIEWS
// ============================================================================

/// Read-only views joining a roster snapshot with the vacation ledger.
pub struct RosterView<'a> {
    members: &'a [CrewMember],
    ledger: &'a VacationLedger,
    now: f64,
}

impl<'a> RosterView<'a> {
    pub fn new(members: &'a [CrewMember], ledger: &'a VacationLedger, now: f64) -> Self {
        Self {
            members,
            ledger,
            now,
        }
    }

    pub fn is_on_vacation(&self, member: &CrewMember) -> bool {
        self.ledger.is_on_vacation(&member.name, self.now)
    }

    /// Crew on vacation. Ledger orphans never appear: only roster members
    /// are considered.
    pub fn unavailable_crew(&self) -> Vec<&'a CrewMember> {
        self.members
            .iter()
            .filter(|m| m.kind == CrewKind::Crew && self.ledger.is_on_vacation(&m.name, self.now))
            .collect()
    }

    /// Assignable crew not on vacation, in roster order.
    pub fn available_crew(&self) -> Vec<&'a CrewMember> {
        self.members
            .iter()
            .filter(|m| m.is_assignable() && !self.ledger.is_on_vacation(&m.name, self.now))
            .collect()
    }

    /// Available crew, highest experience first; ties go to whoever has
    /// waited longest since their last mission.
    pub fn most_experienced_crew(&self) -> Vec<&'a CrewMember> {
        let mut crew = self.available_crew();
        crew.sort_by(|a, b| {
            b.experience_level
                .cmp(&a.experience_level)
                .then_with(|| self.last_flown(a).total_cmp(&self.last_flown(b)))
                .then_with(|| a.name.cmp(&b.name))
        });
        crew
    }

    /// Available crew, lowest experience first; ties go to the most recently
    /// flown, never-flown crew last.
    pub fn least_experienced_crew(&self) -> Vec<&'a CrewMember> {
        let mut crew = self.available_crew();
        crew.sort_by(|a, b| {
            a.experience_level
                .cmp(&b.experience_level)
                .then_with(|| self.last_flown(b).total_cmp(&self.last_flown(a)))
                .then_with(|| a.name.cmp(&b.name))
        });
        crew
    }

    /// Selection candidates: every assignable crew member, vacationing or
    /// not. The selector applies the lock policy.
    pub fn candidates(&self) -> Vec<Candidate> {
        self.members
            .iter()
            .filter(|m| m.is_assignable())
            .map(|m| Candidate {
                name: m.name.clone(),
                role: m.profession.clone(),
                experience_level: m.experience_level,
                last_flown: self.last_flown(m),
                on_vacation: self.is_on_vacation(m),
            })
            .collect()
    }

    fn last_flown(&self, member: &CrewMember) -> f64 {
        self.ledger
            .last_mission_end_time(&member.name)
            .unwrap_or(f64::NEG_INFINITY)
    }
}
