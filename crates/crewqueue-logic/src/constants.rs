//! Shared constants: role names, save-tree node names, label strings.

// ============================================================================
// ROLES
// ============================================================================

pub mod roles {
    pub const PILOT: &str = "Pilot";
    pub const ENGINEER: &str = "Engineer";
    pub const SCIENTIST: &str = "Scientist";

    /// Composition used when a part does not declare one.
    pub const DEFAULT_COMPOSITION: [&str; 3] = [PILOT, ENGINEER, SCIENTIST];
}

// ============================================================================
// TIME
// ============================================================================

pub mod time {
    /// Seconds in a Kerbin day (6 hours).
    pub const KERBIN_DAY: f64 = 21_600.0;
    /// Seconds in an Earth day.
    pub const EARTH_DAY: f64 = 86_400.0;
    pub const HOUR: f64 = 3_600.0;
    pub const MINUTE: f64 = 60.0;
}

// ============================================================================
// SAVE TREE
// ============================================================================

pub mod nodes {
    /// Root node written by the session when saving the scenario.
    pub const SCENARIO: &str = "SCENARIO";
    /// Container holding one record node per tracked crew member.
    pub const CREW_LIST: &str = "CrewList";
    /// Per-crew record node.
    pub const CREW_RECORD: &str = "KERBAL";

    pub const NAME: &str = "name";
    pub const EXPIRATION: &str = "expiration";
    pub const LAST_MISSION_DURATION: &str = "lastMissionDuration";
    pub const LAST_MISSION_END_TIME: &str = "lastMissionEndTime";
    pub const EXTREMELY_FATIGUED: &str = "extremelyFatigued";

    /// Older record layouts still found in saves.
    pub const NAME_ALIASES: [&str; 3] = [NAME, "crewName", "Name"];
    pub const EXPIRATION_ALIASES: [&str; 2] = [EXPIRATION, "targetExpiration"];
    pub const DURATION_ALIASES: [&str; 2] = [LAST_MISSION_DURATION, "GetLastMissionDuration"];
    pub const END_TIME_ALIASES: [&str; 2] = [LAST_MISSION_END_TIME, "LastMissionEndTime"];
    pub const FATIGUE_ALIASES: [&str; 2] = [EXTREMELY_FATIGUED, "ExtremelyFatigued"];

    pub const VACATION_SCALAR: &str = "vacationScalar";
    pub const MINIMUM_VACATION_DAYS: &str = "minimumVacationDays";
    pub const MAXIMUM_VACATION_DAYS: &str = "maximumVacationDays";
    pub const VACATION_HARDLOCK: &str = "vacationHardlock";
    pub const DO_CUSTOM_ASSIGNMENT: &str = "doCustomAssignment";
    pub const HIDE_SETTINGS_ICON: &str = "hideSettingsIcon";
    pub const KERBIN_TIME: &str = "kerbinTime";
}

// ============================================================================
// LABELS
// ============================================================================

pub mod labels {
    pub const VACATION_SOFT: &str = "Available for emergency missions";
    pub const VACATION_HARD: &str = "Not available for missions";
    pub const READY_IN: &str = "Ready In: ";
}
