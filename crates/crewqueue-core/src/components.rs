//! Component definitions for the roster ECS.
//!
//! Each crew member is one entity carrying a [`Kerbal`] marker, a [`Name`],
//! a [`Profession`], an [`Experience`], plus the host's [`RosterStatus`] and
//! [`CrewKind`] from `crewqueue-logic`. Components are plain data.

use serde::{Deserialize, Serialize};

pub use crewqueue_logic::roster::{CrewKind, RosterStatus};

/// Marker for a crew entity. `hire_order` keeps roster order stable across
/// despawns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kerbal {
    pub hire_order: u64,
}

/// Crew name exactly as the host spells it. The host keys crew by this
/// string, so it is never trimmed or re-spaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name {
    full: String,
}

impl Name {
    pub fn new(given: impl Into<String>, family: impl Into<String>) -> Self {
        let given = given.into();
        let family = family.into();
        if family.is_empty() {
            Self { full: given }
        } else {
            Self {
                full: format!("{} {}", given, family),
            }
        }
    }

    pub fn parse(full: &str) -> Self {
        Self {
            full: full.to_string(),
        }
    }

    /// Everything before the last space, or the whole name.
    pub fn given(&self) -> &str {
        match self.full.rsplit_once(' ') {
            Some((given, _)) => given,
            None => &self.full,
        }
    }

    /// Word after the last space, empty for single-word names.
    pub fn family(&self) -> &str {
        self.full.rsplit_once(' ').map_or("", |(_, family)| family)
    }

    pub fn as_str(&self) -> &str {
        &self.full
    }

    pub fn full_name(&self) -> String {
        self.full.clone()
    }
}

/// Experience trait title: "Pilot", "Engineer", "Scientist", ...
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profession {
    pub title: String,
}

impl Profession {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    /// 0 (rookie) to 5 (veteran).
    pub level: u8,
    pub flights: u32,
}

impl Experience {
    pub const MAX_LEVEL: u8 = 5;

    pub fn new(level: u8) -> Self {
        Self {
            level: level.min(Self::MAX_LEVEL),
            flights: 0,
        }
    }

    /// Count a completed flight. The engine's own roster has no career
    /// system, so it stands in with a level every second flight. Hosts that
    /// track experience push their levels through `EcsRoster::set_experience`.
    pub fn log_flight(&mut self) {
        self.flights += 1;
        if self.flights % 2 == 0 && self.level < Self::MAX_LEVEL {
            self.level += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_parse_splits_family() {
        let name = Name::parse("Jebediah Kerman");
        assert_eq!(name.given(), "Jebediah");
        assert_eq!(name.family(), "Kerman");
        assert_eq!(name.full_name(), "Jebediah Kerman");

        let single = Name::parse("Jeb");
        assert_eq!(single.family(), "");
        assert_eq!(single.full_name(), "Jeb");
        assert_eq!(Name::new("Bill", "Kerman").as_str(), "Bill Kerman");
    }

    #[test]
    fn name_keeps_spacing_verbatim() {
        assert_eq!(Name::parse(" Val Kerman").full_name(), " Val Kerman");
        assert_eq!(Name::parse("Jeb  Kerman").full_name(), "Jeb  Kerman");
        assert_ne!(Name::parse("Jeb  Kerman"), Name::parse("Jeb Kerman"));
    }

    #[test]
    fn experience_levels_up_every_other_flight() {
        let mut xp = Experience::new(4);
        xp.log_flight();
        assert_eq!(xp.level, 4);
        xp.log_flight();
        assert_eq!(xp.level, 5);
        xp.log_flight();
        xp.log_flight();
        assert_eq!(xp.level, Experience::MAX_LEVEL);
        assert_eq!(Experience::new(9).level, Experience::MAX_LEVEL);
    }
}
