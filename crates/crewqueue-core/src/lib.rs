//! CrewQueue Core - crew rotation session engine
//!
//! Mirrors the host game's crew roster in an ECS world and drives the pure
//! policy from `crewqueue-logic` with host events: vessel recoveries start
//! vacations, assignment screens hide vacationing crew, and part manifests
//! are filled by role-aware selection.
//!
//! # Architecture
//!
//! - **Entities**: one per crew member, via `hecs`
//! - **Components**: [`components::Name`], [`components::Profession`],
//!   [`components::Experience`], roster status and kind
//! - **Engine**: [`engine::CrewQueueEngine`] owns roster, ledger, settings
//!   and the scene gate; no global state
//!
//! # Example
//!
//! ```rust
//! use crewqueue_core::prelude::*;
//! use crewqueue_core::generation::RosterConfig;
//!
//! let mut engine = CrewQueueEngine::new(42);
//! engine.generate(&RosterConfig::default());
//!
//! let crew = engine.get_crew_for_part(&SeatRequest::new(3), &[], true);
//! engine.on_vessel_launched(&crew);
//! engine.advance_time(3_600.0);
//! engine.on_vessel_recovered(&crew, 3_600.0);
//! assert!(crew.iter().all(|name| engine.is_on_vacation(name)));
//! ```

pub mod components;
pub mod engine;
pub mod generation;
pub mod persistence;
pub mod roster;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::engine::CrewQueueEngine;
    pub use crate::roster::EcsRoster;
    pub use crewqueue_logic::manifest::{PartManifest, VesselManifest};
    pub use crewqueue_logic::roster::{CrewMember, RosterHost};
    pub use crewqueue_logic::selector::SeatRequest;
    pub use crewqueue_logic::settings::{Settings, SettingsInput};
}
