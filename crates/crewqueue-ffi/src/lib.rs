//! C FFI bindings for the CrewQueue session engine
//!
//! This crate provides a C-compatible API so a host game (or a scripting
//! bridge inside one) can drive crew rotation from any language with C FFI
//! support.
//!
//! # Basic Usage (C)
//! ```c
//! #include "crewqueue.h"
//!
//! CrewQueueSession *session = crewq_create(42);
//! crewq_add_crew(session, "Jebediah Kerman", "Pilot", 3);
//!
//! // Host events
//! crewq_set_time(session, universal_time);
//! const char *crew[] = { "Jebediah Kerman" };
//! crewq_vessel_recovered(session, crew, 1, mission_elapsed_time);
//!
//! // Fill a three-seat pod
//! uint32_t picked = crewq_select(session, 3, "Pilot, Engineer, Scientist", true);
//! for (uint32_t i = 0; i < picked; i++) {
//!     const char *name = crewq_selection_name(session, i);
//! }
//!
//! crewq_destroy(session);
//! ```
//!
//! Every function accepts a null handle and does nothing (returning zero,
//! false or null). Strings passed in must be NUL-terminated UTF-8; strings
//! handed out stay valid until the next call that replaces them.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use crewqueue_core::engine::CrewQueueEngine;
use crewqueue_core::generation::RosterConfig;
use crewqueue_logic::roster::{CrewMember, RosterHost};
use crewqueue_logic::selector::SeatRequest;
use crewqueue_logic::settings::Settings;

/// Engine plus the strings most recently handed to C.
pub struct CrewQueueSession {
    engine: CrewQueueEngine,
    selection: Vec<CString>,
}

/// Opaque handle to a session
pub type CrewQueueHandle = *mut CrewQueueSession;

/// Settings exchanged with C
#[repr(C)]
pub struct CrewQueueSettings {
    /// Fraction of mission time spent on vacation
    pub vacation_scalar: f64,
    pub minimum_vacation_days: i32,
    pub maximum_vacation_days: i32,
    /// 1 to exclude vacationing crew from selection entirely
    pub vacation_hardlock: u8,
    pub do_custom_assignment: u8,
    pub hide_settings_icon: u8,
    /// 1 for 6-hour days, 0 for 24-hour days
    pub kerbin_time: u8,
}

impl From<&Settings> for CrewQueueSettings {
    fn from(s: &Settings) -> Self {
        Self {
            vacation_scalar: s.vacation_scalar,
            minimum_vacation_days: s.minimum_vacation_days,
            maximum_vacation_days: s.maximum_vacation_days,
            vacation_hardlock: s.vacation_hardlock as u8,
            do_custom_assignment: s.do_custom_assignment as u8,
            hide_settings_icon: s.hide_settings_icon as u8,
            kerbin_time: s.kerbin_time as u8,
        }
    }
}

impl From<&CrewQueueSettings> for Settings {
    fn from(s: &CrewQueueSettings) -> Self {
        Self {
            vacation_scalar: s.vacation_scalar,
            minimum_vacation_days: s.minimum_vacation_days,
            maximum_vacation_days: s.maximum_vacation_days,
            vacation_hardlock: s.vacation_hardlock != 0,
            do_custom_assignment: s.do_custom_assignment != 0,
            hide_settings_icon: s.hide_settings_icon != 0,
            kerbin_time: s.kerbin_time != 0,
        }
    }
}

/// Session statistics
#[repr(C)]
pub struct CrewQueueStats {
    /// Current universal time in seconds
    pub universal_time: f64,
    /// Crew on the roster
    pub crew_count: u32,
    /// Crew free to fly
    pub available_count: u32,
    /// Crew on vacation
    pub vacation_count: u32,
    /// Tracked vacation records (orphans included)
    pub record_count: u32,
}

// ============================================================================
// Helpers
// ============================================================================

fn session<'a>(handle: CrewQueueHandle) -> Option<&'a mut CrewQueueSession> {
    if handle.is_null() {
        None
    } else {
        Some(unsafe { &mut *handle })
    }
}

fn str_arg<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

fn str_array(names: *const *const c_char, count: u32) -> Vec<String> {
    if names.is_null() {
        return Vec::new();
    }
    let ptrs = unsafe { std::slice::from_raw_parts(names, count as usize) };
    ptrs.iter()
        .filter_map(|p| str_arg(*p))
        .map(str::to_string)
        .collect()
}

// ============================================================================
// Lifecycle Functions
// ============================================================================

/// Create a new session. `seed` drives overflow-seat role draws.
///
/// Returns a handle that must be freed with `crewq_destroy`
#[no_mangle]
pub extern "C" fn crewq_create(seed: u64) -> CrewQueueHandle {
    Box::into_raw(Box::new(CrewQueueSession {
        engine: CrewQueueEngine::new(seed),
        selection: Vec::new(),
    }))
}

/// Destroy a session and free its memory
#[no_mangle]
pub extern "C" fn crewq_destroy(handle: CrewQueueHandle) {
    if !handle.is_null() {
        unsafe {
            drop(Box::from_raw(handle));
        }
    }
}

/// Hire a generated demo roster of `crew_size` crew
#[no_mangle]
pub extern "C" fn crewq_generate(handle: CrewQueueHandle, crew_size: u32) {
    if let Some(s) = session(handle) {
        s.engine.generate(&RosterConfig {
            crew_size,
            ..RosterConfig::default()
        });
    }
}

// ============================================================================
// Time
// ============================================================================

#[no_mangle]
pub extern "C" fn crewq_set_time(handle: CrewQueueHandle, universal_time: f64) {
    if let Some(s) = session(handle) {
        s.engine.set_time(universal_time);
    }
}

/// Advance universal time and run the per-frame update
#[no_mangle]
pub extern "C" fn crewq_advance_time(handle: CrewQueueHandle, seconds: f64) {
    if let Some(s) = session(handle) {
        s.engine.advance_time(seconds);
    }
}

/// Per-frame update
#[no_mangle]
pub extern "C" fn crewq_update(handle: CrewQueueHandle) {
    if let Some(s) = session(handle) {
        s.engine.update();
    }
}

// ============================================================================
// Roster
// ============================================================================

/// Add a crew member. Returns false on a null argument or a taken name.
#[no_mangle]
pub extern "C" fn crewq_add_crew(
    handle: CrewQueueHandle,
    name: *const c_char,
    profession: *const c_char,
    experience_level: u8,
) -> bool {
    let (Some(s), Some(name), Some(profession)) =
        (session(handle), str_arg(name), str_arg(profession))
    else {
        return false;
    };
    s.engine
        .hire(CrewMember::new(name, profession, experience_level))
}

/// Remove a crew member (fired or killed) and drop their vacation record
#[no_mangle]
pub extern "C" fn crewq_remove_crew(handle: CrewQueueHandle, name: *const c_char) -> bool {
    match (session(handle), str_arg(name)) {
        (Some(s), Some(name)) => s.engine.on_crew_removed(name),
        _ => false,
    }
}

#[no_mangle]
pub extern "C" fn crewq_rename_crew(
    handle: CrewQueueHandle,
    old_name: *const c_char,
    new_name: *const c_char,
) -> bool {
    match (session(handle), str_arg(old_name), str_arg(new_name)) {
        (Some(s), Some(old), Some(new)) => s.engine.rename_crew(old, new),
        _ => false,
    }
}

/// Host-reported experience level, clamped to 0..=5
#[no_mangle]
pub extern "C" fn crewq_set_experience(
    handle: CrewQueueHandle,
    name: *const c_char,
    level: u8,
) -> bool {
    match (session(handle), str_arg(name)) {
        (Some(s), Some(name)) => s.engine.set_experience(name, level),
        _ => false,
    }
}

/// Crew boarded a launching vessel
#[no_mangle]
pub extern "C" fn crewq_vessel_launched(
    handle: CrewQueueHandle,
    names: *const *const c_char,
    count: u32,
) {
    if let Some(s) = session(handle) {
        s.engine.on_vessel_launched(&str_array(names, count));
    }
}

/// A vessel was recovered after `mission_time` seconds
#[no_mangle]
pub extern "C" fn crewq_vessel_recovered(
    handle: CrewQueueHandle,
    names: *const *const c_char,
    count: u32,
    mission_time: f64,
) {
    if let Some(s) = session(handle) {
        s.engine
            .on_vessel_recovered(&str_array(names, count), mission_time);
    }
}

// ============================================================================
// Vacation Queries
// ============================================================================

#[no_mangle]
pub extern "C" fn crewq_is_on_vacation(handle: CrewQueueHandle, name: *const c_char) -> bool {
    match (session(handle), str_arg(name)) {
        (Some(s), Some(name)) => s.engine.is_on_vacation(name),
        _ => false,
    }
}

/// Seconds of vacation left, 0 if none
#[no_mangle]
pub extern "C" fn crewq_time_remaining(handle: CrewQueueHandle, name: *const c_char) -> f64 {
    match (session(handle), str_arg(name)) {
        (Some(s), Some(name)) => s.engine.time_remaining(name),
        _ => 0.0,
    }
}

/// Get session statistics
#[no_mangle]
pub extern "C" fn crewq_get_stats(handle: CrewQueueHandle, stats: *mut CrewQueueStats) -> bool {
    if stats.is_null() {
        return false;
    }
    let Some(s) = session(handle) else {
        return false;
    };
    let out = unsafe { &mut *stats };
    out.universal_time = s.engine.universal_time();
    out.crew_count = s.engine.roster.members().len() as u32;
    out.available_count = s.engine.available_crew().len() as u32;
    out.vacation_count = s.engine.unavailable_crew().len() as u32;
    out.record_count = s.engine.ledger.len() as u32;
    true
}

// ============================================================================
// Scene Events
// ============================================================================

#[no_mangle]
pub extern "C" fn crewq_scene_loaded(handle: CrewQueueHandle) {
    if let Some(s) = session(handle) {
        s.engine.on_scene_loaded();
    }
}

#[no_mangle]
pub extern "C" fn crewq_crew_screen_opened(handle: CrewQueueHandle) {
    if let Some(s) = session(handle) {
        s.engine.on_crew_screen_opened();
    }
}

#[no_mangle]
pub extern "C" fn crewq_crew_screen_closed(handle: CrewQueueHandle) {
    if let Some(s) = session(handle) {
        s.engine.on_crew_screen_closed();
    }
}

// ============================================================================
// Selection
// ============================================================================

/// Pick crew for a part with `capacity` seats. `composition` is a
/// comma-separated role list; null or empty uses Pilot, Engineer,
/// Scientist. Returns the number picked; read them with
/// `crewq_selection_name`.
#[no_mangle]
pub extern "C" fn crewq_select(
    handle: CrewQueueHandle,
    capacity: u32,
    composition: *const c_char,
    prefer_veteran: bool,
) -> u32 {
    let Some(s) = session(handle) else {
        return 0;
    };
    let request = match str_arg(composition) {
        Some(raw) => SeatRequest::parse(capacity as usize, raw),
        None => SeatRequest::new(capacity as usize),
    };
    let picks = s.engine.get_crew_for_part(&request, &[], prefer_veteran);
    s.selection = picks
        .into_iter()
        .filter_map(|name| CString::new(name).ok())
        .collect();
    s.selection.len() as u32
}

/// Name at `index` of the last selection, or null if out of range.
/// Valid until the next `crewq_select` or `crewq_destroy`.
#[no_mangle]
pub extern "C" fn crewq_selection_name(handle: CrewQueueHandle, index: u32) -> *const c_char {
    session(handle)
        .and_then(|s| s.selection.get(index as usize))
        .map_or(std::ptr::null(), |name| name.as_ptr())
}

// ============================================================================
// Settings
// ============================================================================

#[no_mangle]
pub extern "C" fn crewq_get_settings(
    handle: CrewQueueHandle,
    settings: *mut CrewQueueSettings,
) -> bool {
    if settings.is_null() {
        return false;
    }
    let Some(s) = session(handle) else {
        return false;
    };
    unsafe { *settings = CrewQueueSettings::from(&s.engine.settings) };
    true
}

/// Replace the settings. Returns false, keeping the previous settings, if
/// they fail validation.
#[no_mangle]
pub extern "C" fn crewq_set_settings(
    handle: CrewQueueHandle,
    settings: *const CrewQueueSettings,
) -> bool {
    if settings.is_null() {
        return false;
    }
    let Some(s) = session(handle) else {
        return false;
    };
    let new_settings = Settings::from(unsafe { &*settings });
    if let Err(e) = new_settings.validate() {
        log::error!("Rejected settings from host: {}", e);
        return false;
    }
    s.engine.set_settings(new_settings);
    true
}

// ============================================================================
// Persistence
// ============================================================================

/// Write the scenario save text into `buffer` (NUL-terminated) if it fits.
/// Returns the buffer size required, NUL included; call with a null buffer
/// to query it.
#[no_mangle]
pub extern "C" fn crewq_save_text(
    handle: CrewQueueHandle,
    buffer: *mut c_char,
    buffer_len: usize,
) -> usize {
    let Some(s) = session(handle) else {
        return 0;
    };
    let text = s.engine.save_text();
    let bytes = text.as_bytes();
    let required = bytes.len() + 1;
    if !buffer.is_null() && buffer_len >= required {
        unsafe {
            std::ptr::copy_nonoverlapping(bytes.as_ptr(), buffer as *mut u8, bytes.len());
            *buffer.add(bytes.len()) = 0;
        }
    }
    required
}

/// Load scenario save text. Returns false on null input or malformed text.
#[no_mangle]
pub extern "C" fn crewq_load_text(handle: CrewQueueHandle, text: *const c_char) -> bool {
    let (Some(s), Some(text)) = (session(handle), str_arg(text)) else {
        return false;
    };
    match s.engine.load_text(text) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("Could not load scenario text: {}", e);
            false
        }
    }
}
