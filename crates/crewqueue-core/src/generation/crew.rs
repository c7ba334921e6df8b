//! Roster generation

use hecs::Entity;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crewqueue_logic::constants::roles;
use crewqueue_logic::roster::CrewMember;

use super::names::{generate_name, FAMILY_NAME, FOUNDERS};
use crate::roster::EcsRoster;

/// Parameters for a generated roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterConfig {
    /// Total crew, founders included.
    pub crew_size: u32,
    /// Hire the four founding crew first.
    pub include_founders: bool,
    pub max_experience: u8,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            crew_size: 12,
            include_founders: true,
            max_experience: 3,
        }
    }
}

/// Hire `config.crew_size` crew into `roster`. Names never repeat; once the
/// name pool is exhausted generated crew get a numeric suffix.
pub fn generate_roster(
    roster: &mut EcsRoster,
    config: &RosterConfig,
    rng: &mut impl Rng,
) -> Vec<Entity> {
    let mut hired = Vec::with_capacity(config.crew_size as usize);

    if config.include_founders {
        for (given, profession) in FOUNDERS.iter().take(config.crew_size as usize) {
            let name = format!("{} {}", given, FAMILY_NAME);
            let member = CrewMember::new(name, *profession, config.max_experience);
            if let Some(entity) = roster.hire(member) {
                hired.push(entity);
            }
        }
    }

    let mut attempts = 0u32;
    while (hired.len() as u32) < config.crew_size {
        let mut name = generate_name(rng).full_name();
        attempts += 1;
        if roster.find(&name).is_some() {
            if attempts < config.crew_size * 4 {
                continue;
            }
            name = format!("{} {}", name, attempts);
        }
        let profession = random_profession(rng);
        let level = rng.gen_range(0..=config.max_experience);
        if let Some(entity) = roster.hire(CrewMember::new(name, profession, level)) {
            hired.push(entity);
        }
    }

    log::debug!("Generated roster of {} crew", hired.len());
    hired
}

/// Pilots, engineers and scientists in equal measure.
fn random_profession(rng: &mut impl Rng) -> &'static str {
    roles::DEFAULT_COMPOSITION[rng.gen_range(0..roles::DEFAULT_COMPOSITION.len())]
}
