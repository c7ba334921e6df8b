//! Save/Load functionality for persisting a whole session
//!
//! Uses bincode for a compact binary snapshot of the roster entities, the
//! vacation ledger and the settings. The scene gate is transient: crew
//! hidden under the `Vacation` override are written as `Available`, so a
//! snapshot never locks anyone out of the roster.

use std::io::{Read, Write};

use hecs::World;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crewqueue_logic::ledger::VacationLedger;
use crewqueue_logic::settings::Settings;

use crate::components::*;
use crate::roster::EcsRoster;

/// Version number for save file format (increment when format changes)
pub const SAVE_VERSION: u32 = 1;

/// Serializable snapshot of the session state
#[derive(Serialize, Deserialize)]
pub struct SaveData {
    pub version: u32,
    /// Universal time in seconds
    pub universal_time: f64,
    /// Seed the selection RNG is rebuilt from
    pub seed: u64,
    pub settings: Settings,
    pub ledger: VacationLedger,
    pub crew: Vec<SerializableKerbal>,
}

/// All components of one crew entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializableKerbal {
    pub kerbal: Kerbal,
    pub name: Name,
    pub profession: Profession,
    pub experience: Experience,
    pub status: RosterStatus,
    pub kind: CrewKind,
}

fn serialize_crew(world: &World) -> Vec<SerializableKerbal> {
    let mut crew: Vec<SerializableKerbal> = world
        .query::<(&Kerbal, &Name, &Profession, &Experience, &RosterStatus, &CrewKind)>()
        .iter()
        .map(
            |(_, (kerbal, name, profession, experience, status, kind))| SerializableKerbal {
                kerbal: *kerbal,
                name: name.clone(),
                profession: profession.clone(),
                experience: *experience,
                status: match status {
                    RosterStatus::Vacation => RosterStatus::Available,
                    other => *other,
                },
                kind: *kind,
            },
        )
        .collect();
    crew.sort_by_key(|k| k.kerbal.hire_order);
    crew
}

/// Save the complete session to a writer
pub fn save_session<W: Write>(
    writer: W,
    roster: &EcsRoster,
    ledger: &VacationLedger,
    settings: &Settings,
    universal_time: f64,
    seed: u64,
) -> Result<(), SaveError> {
    let save_data = SaveData {
        version: SAVE_VERSION,
        universal_time,
        seed,
        settings: settings.clone(),
        ledger: ledger.clone(),
        crew: serialize_crew(&roster.world),
    };

    bincode::serialize_into(writer, &save_data)?;
    Ok(())
}

/// Load a session from a reader
pub fn load_session<R: Read>(reader: R) -> Result<LoadedSession, SaveError> {
    let save_data: SaveData = bincode::deserialize_from(reader)?;

    if save_data.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: save_data.version,
        });
    }

    let mut roster = EcsRoster::new();
    for k in save_data.crew {
        roster.restore(k.kerbal, k.name, k.profession, k.experience, k.status, k.kind);
    }

    Ok(LoadedSession {
        roster,
        ledger: save_data.ledger,
        settings: save_data.settings,
        universal_time: save_data.universal_time,
        seed: save_data.seed,
    })
}

/// Result of loading a session
pub struct LoadedSession {
    pub roster: EcsRoster,
    pub ledger: VacationLedger,
    pub settings: Settings,
    pub universal_time: f64,
    pub seed: u64,
}

/// Errors that can occur during save/load
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Bincode(#[from] Box<bincode::ErrorKind>),
    #[error("Save version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}
