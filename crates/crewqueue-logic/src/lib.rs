//! Pure crew rotation policy for CrewQueue.
//!
//! This crate contains all crew-queue logic that is independent of the host
//! game. Functions take plain data (a roster snapshot, a ledger, settings)
//! and return results, so everything here is unit-testable without the game
//! running. The session engine in `crewqueue-core` owns the state and feeds
//! it host events.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`clock`] | Day lengths, duration formatting, status labels |
//! | [`constants`] | Default composition, node names, label strings |
//! | [`ledger`] | Vacation ledger: per-crew cooldown records |
//! | [`manifest`] | Vessel / part seat manifests and open-seat filling |
//! | [`persistence`] | `ConfigNode` save tree, text codec, ledger/settings mapping |
//! | [`roster`] | Crew members, roster status, host roster trait, read views |
//! | [`selector`] | Greedy role-composition crew selection |
//! | [`settings`] | Vacation tuning and settings-window input validation |
//! | [`suppression`] | Scene gate hiding vacationing crew in assignment screens |

pub mod clock;
pub mod constants;
pub mod ledger;
pub mod manifest;
pub mod persistence;
pub mod roster;
pub mod selector;
pub mod settings;
pub mod suppression;
