//! Vacation ledger — per-crew cooldown records keyed by crew name.
//!
//! A record is created the first time a crew member is recovered from a
//! mission and updated on every later recovery. Expiry is computed once at
//! recording time from the current [`Settings`]:
//!
//! ```text
//! expiry = end_time + clamp(duration * scalar, min_days * day, max_days * day)
//! ```
//!
//! and a new recovery never shortens an existing expiry. Crew without a
//! record have the sentinel expiry `0.0` and are never on vacation.
//!
//! Records for crew that have left the host roster (died, fired) are
//! orphans. Read views take an `is_live` predicate and skip them; [`prune`]
//! removes them for good.
//!
//! [`prune`]: VacationLedger::prune

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::settings::Settings;

/// Sentinel expiry for crew without a record.
pub const NEVER: f64 = 0.0;

/// Vacation bookkeeping for one crew member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewRecord {
    pub name: String,
    /// Elapsed time of the most recent mission, seconds.
    pub last_mission_duration: f64,
    /// Universal time the most recent mission was recovered.
    pub last_mission_end_time: f64,
    /// Universal time the vacation ends.
    pub expiry: f64,
    /// Set when the crew member was launched while still on vacation.
    pub extremely_fatigued: bool,
}

impl CrewRecord {
    /// A record restored from a save that only carried the expiry.
    pub fn with_expiry(name: impl Into<String>, expiry: f64) -> Self {
        Self {
            name: name.into(),
            last_mission_duration: 0.0,
            last_mission_end_time: 0.0,
            expiry,
            extremely_fatigued: false,
        }
    }

    pub fn is_on_vacation(&self, now: f64) -> bool {
        self.expiry > now
    }

    pub fn time_remaining(&self, now: f64) -> f64 {
        (self.expiry - now).max(0.0)
    }

    /// Universal time the last mission launched.
    pub fn last_mission_start_time(&self) -> f64 {
        self.last_mission_end_time - self.last_mission_duration
    }
}

/// Keyed store of [`CrewRecord`]s. Ordered by name so saves are stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VacationLedger {
    records: BTreeMap<String, CrewRecord>,
}

impl VacationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a recovered mission and return the updated record.
    ///
    /// Negative or non-finite durations count as zero-length missions (the
    /// minimum vacation still applies).
    pub fn record_mission(
        &mut self,
        name: &str,
        mission_duration: f64,
        end_time: f64,
        settings: &Settings,
    ) -> &CrewRecord {
        let duration = if mission_duration.is_finite() {
            mission_duration.max(0.0)
        } else {
            0.0
        };
        let expiry = end_time + settings.cooldown(duration);
        let start_time = end_time - duration;

        let existed = self.records.contains_key(name);
        let record = self
            .records
            .entry(name.to_string())
            .or_insert_with(|| CrewRecord::with_expiry(name, NEVER));

        // Launched before the previous vacation ran out.
        record.extremely_fatigued = existed && record.expiry > start_time;
        record.last_mission_duration = duration;
        record.last_mission_end_time = end_time;
        record.expiry = record.expiry.max(expiry);

        log::info!(
            "{} recovered after {:.0}s, on vacation until {:.0}{}",
            name,
            duration,
            record.expiry,
            if record.extremely_fatigued {
                " (extremely fatigued)"
            } else {
                ""
            }
        );

        record
    }

    /// Insert or replace a record verbatim (used when loading saves).
    pub fn insert(&mut self, record: CrewRecord) -> Option<CrewRecord> {
        self.records.insert(record.name.clone(), record)
    }

    pub fn remove(&mut self, name: &str) -> Option<CrewRecord> {
        self.records.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&CrewRecord> {
        self.records.get(name)
    }

    /// Expiry for `name`, or [`NEVER`] when untracked.
    pub fn expiry(&self, name: &str) -> f64 {
        self.records.get(name).map_or(NEVER, |r| r.expiry)
    }

    pub fn is_on_vacation(&self, name: &str, now: f64) -> bool {
        self.expiry(name) > now
    }

    pub fn time_remaining(&self, name: &str, now: f64) -> f64 {
        (self.expiry(name) - now).max(0.0)
    }

    /// Universal time of the last recovery, or `None` if never flown.
    pub fn last_mission_end_time(&self, name: &str) -> Option<f64> {
        self.records.get(name).map(|r| r.last_mission_end_time)
    }

    /// True if the crew member was sent out while on vacation.
    pub fn is_forced_vacation(&self, name: &str) -> bool {
        self.records.get(name).is_some_and(|r| r.extremely_fatigued)
    }

    /// Move a record to a new name. Fails if `old` is untracked or `new` is
    /// already tracked.
    pub fn rename(&mut self, old: &str, new: &str) -> bool {
        if old == new || self.records.contains_key(new) {
            return false;
        }
        match self.records.remove(old) {
            Some(mut record) => {
                record.name = new.to_string();
                self.records.insert(new.to_string(), record);
                true
            }
            None => false,
        }
    }

    /// Remove records whose crew no longer resolves. Returns the number
    /// removed.
    pub fn prune<F>(&mut self, is_live: F) -> usize
    where
        F: Fn(&str) -> bool,
    {
        let before = self.records.len();
        self.records.retain(|name, _| is_live(name));
        let removed = before - self.records.len();
        if removed > 0 {
            log::debug!("Pruned {} orphaned vacation records", removed);
        }
        removed
    }

    /// All records, orphans included.
    pub fn records(&self) -> impl Iterator<Item = &CrewRecord> {
        self.records.values()
    }

    /// Records whose crew still resolves.
    pub fn live_records<'a, F>(&'a self, is_live: F) -> impl Iterator<Item = &'a CrewRecord> + 'a
    where
        F: Fn(&str) -> bool + 'a,
    {
        self.records.values().filter(move |r| is_live(&r.name))
    }

    /// Live records still on vacation at `now`.
    pub fn vacationing<'a, F>(&'a self, now: f64, is_live: F) -> impl Iterator<Item = &'a CrewRecord> + 'a
    where
        F: Fn(&str) -> bool + 'a,
    {
        self.live_records(is_live)
            .filter(move |r| r.is_on_vacation(now))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drop every record (a fresh load replaces the ledger).
    pub fn clear(&mut self) {
        self.records.clear();
    }
}
