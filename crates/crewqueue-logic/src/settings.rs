//! Vacation tuning and settings-window input.
//!
//! [`Settings`] holds the persisted knobs that drive the vacation ledger and
//! crew selection. [`SettingsInput`] models the raw text fields the settings
//! window edits; [`Settings::apply`] validates each field independently and
//! keeps the previous value for any field that fails.
//!
//! # Cooldown formula
//!
//! The cooldown is a *duration* clamp applied before adding the mission end
//! time:
//!
//! ```
//! use crewqueue_logic::settings::Settings;
//! use crewqueue_logic::constants::time::KERBIN_DAY;
//!
//! let settings = Settings::default();
//! // 10-day mission * 0.1 = 1 day, clamped up to the 7-day minimum.
//! assert_eq!(settings.cooldown(10.0 * KERBIN_DAY), 7.0 * KERBIN_DAY);
//! ```
//!
//! When `minimum_vacation_days > maximum_vacation_days` (only reachable by
//! hand-edited saves, since [`Settings::apply`] rejects it) the maximum wins.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::time::{EARTH_DAY, KERBIN_DAY};

/// Persisted crew-queue settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fraction of the mission duration spent on vacation.
    pub vacation_scalar: f64,
    pub minimum_vacation_days: i32,
    pub maximum_vacation_days: i32,
    /// Vacationing crew are removed from selection pools entirely instead of
    /// merely sorted last.
    pub vacation_hardlock: bool,
    /// Replace the stock crew auto-fill with [`crate::selector`] picks.
    pub do_custom_assignment: bool,
    pub hide_settings_icon: bool,
    /// Use 6-hour Kerbin days instead of 24-hour Earth days.
    pub kerbin_time: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            vacation_scalar: 0.1,
            minimum_vacation_days: 7,
            maximum_vacation_days: 28,
            vacation_hardlock: false,
            do_custom_assignment: true,
            hide_settings_icon: false,
            kerbin_time: true,
        }
    }
}

impl Settings {
    /// Length of one in-game day in seconds.
    pub fn day_length(&self) -> f64 {
        if self.kerbin_time {
            KERBIN_DAY
        } else {
            EARTH_DAY
        }
    }

    pub fn minimum_vacation(&self) -> f64 {
        f64::from(self.minimum_vacation_days.max(0)) * self.day_length()
    }

    pub fn maximum_vacation(&self) -> f64 {
        f64::from(self.maximum_vacation_days.max(0)) * self.day_length()
    }

    /// Vacation length in seconds earned by a mission of `mission_duration`
    /// seconds.
    pub fn cooldown(&self, mission_duration: f64) -> f64 {
        let duration = if mission_duration.is_finite() {
            mission_duration.max(0.0)
        } else {
            0.0
        };
        let scalar = if self.vacation_scalar.is_finite() {
            self.vacation_scalar.max(0.0)
        } else {
            0.0
        };
        // max-then-min instead of f64::clamp: an inverted range must not panic.
        (duration * scalar)
            .max(self.minimum_vacation())
            .min(self.maximum_vacation())
    }

    /// Check invariants that [`Settings::apply`] enforces.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.vacation_scalar.is_finite() || self.vacation_scalar < 0.0 {
            return Err(SettingsError::OutOfRange {
                field: SettingsField::VacationScalar,
                value: self.vacation_scalar.to_string(),
            });
        }
        if self.minimum_vacation_days < 0 {
            return Err(SettingsError::OutOfRange {
                field: SettingsField::MinimumVacationDays,
                value: self.minimum_vacation_days.to_string(),
            });
        }
        if self.maximum_vacation_days < 0 {
            return Err(SettingsError::OutOfRange {
                field: SettingsField::MaximumVacationDays,
                value: self.maximum_vacation_days.to_string(),
            });
        }
        if self.minimum_vacation_days > self.maximum_vacation_days {
            return Err(SettingsError::InvertedRange {
                minimum: self.minimum_vacation_days,
                maximum: self.maximum_vacation_days,
            });
        }
        Ok(())
    }

    /// Current values rendered as settings-window text.
    pub fn to_input(&self) -> SettingsInput {
        SettingsInput {
            vacation_scalar_percent: format_percent(self.vacation_scalar),
            minimum_vacation_days: self.minimum_vacation_days.to_string(),
            maximum_vacation_days: self.maximum_vacation_days.to_string(),
            vacation_hardlock: self.vacation_hardlock,
            do_custom_assignment: self.do_custom_assignment,
            hide_settings_icon: self.hide_settings_icon,
        }
    }

    /// Apply settings-window input. Toggles always apply; each numeric field
    /// is parsed on its own and, if invalid, logged and left unchanged.
    /// Returns the rejected fields.
    pub fn apply(&mut self, input: &SettingsInput) -> Vec<SettingsError> {
        let mut errors = Vec::new();

        self.vacation_hardlock = input.vacation_hardlock;
        self.do_custom_assignment = input.do_custom_assignment;
        self.hide_settings_icon = input.hide_settings_icon;

        let minimum = parse_days(&input.minimum_vacation_days, SettingsField::MinimumVacationDays);
        let maximum = parse_days(&input.maximum_vacation_days, SettingsField::MaximumVacationDays);
        let new_minimum = *minimum.as_ref().unwrap_or(&self.minimum_vacation_days);
        let new_maximum = *maximum.as_ref().unwrap_or(&self.maximum_vacation_days);

        if new_minimum > new_maximum {
            // Keep both bounds; the pair stays ordered.
            errors.extend(minimum.err());
            errors.extend(maximum.err());
            errors.push(SettingsError::InvertedRange {
                minimum: new_minimum,
                maximum: new_maximum,
            });
        } else {
            match minimum {
                Ok(days) => self.minimum_vacation_days = days,
                Err(e) => errors.push(e),
            }
            match maximum {
                Ok(days) => self.maximum_vacation_days = days,
                Err(e) => errors.push(e),
            }
        }

        match parse_percent(&input.vacation_scalar_percent) {
            Ok(scalar) => self.vacation_scalar = scalar,
            Err(e) => errors.push(e),
        }

        for e in &errors {
            log::error!("Rejected settings input: {}", e);
        }
        errors
    }
}

/// Raw settings-window fields. The scalar is entered as a percentage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsInput {
    pub vacation_scalar_percent: String,
    pub minimum_vacation_days: String,
    pub maximum_vacation_days: String,
    pub vacation_hardlock: bool,
    pub do_custom_assignment: bool,
    pub hide_settings_icon: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    VacationScalar,
    MinimumVacationDays,
    MaximumVacationDays,
}

impl std::fmt::Display for SettingsField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SettingsField::VacationScalar => "vacation scalar",
            SettingsField::MinimumVacationDays => "minimum vacation days",
            SettingsField::MaximumVacationDays => "maximum vacation days",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("invalid {field}: '{value}' is not a number")]
    NotANumber { field: SettingsField, value: String },
    #[error("invalid {field}: {value} is out of range")]
    OutOfRange { field: SettingsField, value: String },
    #[error("minimum vacation days ({minimum}) exceeds maximum ({maximum})")]
    InvertedRange { minimum: i32, maximum: i32 },
}

fn parse_days(raw: &str, field: SettingsField) -> Result<i32, SettingsError> {
    let days: i32 = raw.trim().parse().map_err(|_| SettingsError::NotANumber {
        field,
        value: raw.to_string(),
    })?;
    if days < 0 {
        return Err(SettingsError::OutOfRange {
            field,
            value: raw.to_string(),
        });
    }
    Ok(days)
}

fn parse_percent(raw: &str) -> Result<f64, SettingsError> {
    let field = SettingsField::VacationScalar;
    let percent: f64 = raw.trim().parse().map_err(|_| SettingsError::NotANumber {
        field,
        value: raw.to_string(),
    })?;
    if !percent.is_finite() || percent < 0.0 {
        return Err(SettingsError::OutOfRange {
            field,
            value: raw.to_string(),
        });
    }
    Ok(percent / 100.0)
}

fn format_percent(scalar: f64) -> String {
    let percent = scalar * 100.0;
    if (percent - percent.round()).abs() < 1e-9 {
        format!("{}", percent.round() as i64)
    } else {
        format!("{}", percent)
    }
}
