//! Save tree — a `ConfigNode` document and its mapping to the ledger and settings.
//!
//! The host persists add-on state as a tree of named nodes holding ordered
//! `key = value` pairs:
//!
//! ```text
//! SCENARIO
//! {
//!     name = CrewQueue
//!     vacationScalar = 0.1
//!     CrewList
//!     {
//!         KERBAL
//!         {
//!             name = Jebediah Kerman
//!             expiration = 1234567
//!         }
//!     }
//! }
//! ```
//!
//! Loading is forgiving: a missing `CrewList` means an empty ledger, records
//! with unreadable names or numbers are logged and skipped, and unknown
//! values are ignored. Only structurally broken text is an error.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::nodes;
use crate::ledger::{CrewRecord, VacationLedger, NEVER};
use crate::settings::Settings;

/// Value written to the scenario's `name` field.
pub const SCENARIO_NAME: &str = "CrewQueue";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigValue {
    pub key: String,
    pub value: String,
}

/// A named node with ordered values and child nodes. Keys may repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigNode {
    pub name: String,
    pub values: Vec<ConfigValue>,
    pub nodes: Vec<ConfigNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("line {line}: '}}' without a matching '{{'")]
    UnbalancedClose { line: usize },
    #[error("line {line}: '{{' without a node name")]
    MissingName { line: usize },
    #[error("line {line}: node '{name}' is not followed by '{{'")]
    MissingOpen { line: usize, name: String },
    #[error("node '{name}' is never closed")]
    Unclosed { name: String },
}

impl ConfigNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn add_value(&mut self, key: impl Into<String>, value: impl ToString) {
        self.values.push(ConfigValue {
            key: key.into(),
            value: value.to_string(),
        });
    }

    /// First value stored under `key`.
    pub fn get_value(&self, key: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|v| v.key == key)
            .map(|v| v.value.as_str())
    }

    /// First value stored under any of `keys`, tried in order.
    pub fn get_value_any(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|k| self.get_value(k))
    }

    pub fn has_value(&self, key: &str) -> bool {
        self.values.iter().any(|v| v.key == key)
    }

    pub fn add_node(&mut self, node: ConfigNode) -> &mut ConfigNode {
        self.nodes.push(node);
        let last = self.nodes.len() - 1;
        &mut self.nodes[last]
    }

    pub fn get_node(&self, name: &str) -> Option<&ConfigNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    pub fn get_nodes<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ConfigNode> + 'a {
        self.nodes.iter().filter(move |n| n.name == name)
    }

    pub fn has_node(&self, name: &str) -> bool {
        self.get_node(name).is_some()
    }

    /// Remove every child called `name`. Returns how many were removed.
    pub fn remove_node(&mut self, name: &str) -> usize {
        let before = self.nodes.len();
        self.nodes.retain(|n| n.name != name);
        before - self.nodes.len()
    }

    /// Render as save text, tab-indented.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        self.write_text(&mut out, 0);
        out
    }

    fn write_text(&self, out: &mut String, depth: usize) {
        let indent = "\t".repeat(depth);
        out.push_str(&format!("{}{}\n{}{{\n", indent, self.name, indent));
        for v in &self.values {
            out.push_str(&format!("{}\t{} = {}\n", indent, v.key, escape_value(&v.value)));
        }
        for child in &self.nodes {
            child.write_text(out, depth + 1);
        }
        out.push_str(&format!("{}}}\n", indent));
    }

    /// Parse save text. Top-level values and nodes are collected into an
    /// unnamed root node.
    pub fn parse(text: &str) -> Result<ConfigNode, ParseError> {
        let mut stack: Vec<ConfigNode> = vec![ConfigNode::default()];
        let mut pending: Option<(usize, String)> = None;

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = strip_comment(raw).trim_matches(is_blank);
            if line.is_empty() {
                continue;
            }

            // "NAME {" on one line.
            let is_value = line.contains('=');
            let (head, opens) = match line.strip_suffix('{') {
                Some(head) if !is_value => (head.trim(), true),
                _ => (line, false),
            };

            if let Some((pending_line, name)) = pending.take() {
                if head.is_empty() && opens {
                    stack.push(ConfigNode::new(name));
                    continue;
                }
                return Err(ParseError::MissingOpen {
                    line: pending_line,
                    name,
                });
            }

            if opens {
                if head.is_empty() {
                    return Err(ParseError::MissingName { line: line_no });
                }
                stack.push(ConfigNode::new(head));
            } else if line == "}" {
                if stack.len() < 2 {
                    return Err(ParseError::UnbalancedClose { line: line_no });
                }
                if let Some(done) = stack.pop() {
                    if let Some(parent) = stack.last_mut() {
                        parent.nodes.push(done);
                    }
                }
            } else if let Some((key, value)) = line.split_once('=') {
                if let Some(current) = stack.last_mut() {
                    current.add_value(key.trim(), unescape_value(value.trim_matches(is_blank)));
                }
            } else {
                pending = Some((line_no, line.to_string()));
            }
        }

        if let Some((line, name)) = pending {
            return Err(ParseError::MissingOpen { line, name });
        }
        if stack.len() > 1 {
            let name = stack.last().map(|n| n.name.clone()).unwrap_or_default();
            return Err(ParseError::Unclosed { name });
        }
        Ok(stack.pop().unwrap_or_default())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Cut a trailing `//` comment. Escaped slashes (`\/`) never start one.
fn strip_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'/' if bytes.get(i + 1) == Some(&b'/') => return &line[..i],
            _ => i += 1,
        }
    }
    line
}

fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Escape a value so the text codec reads it back byte for byte: slashes
/// (comment markers), backslashes, line breaks and blanks at either end.
fn escape_value(value: &str) -> String {
    let lead = value.len() - value.trim_start_matches(is_blank).len();
    let tail = value.trim_end_matches(is_blank).len();
    let mut out = String::with_capacity(value.len());
    for (i, c) in value.char_indices() {
        let edge = i < lead || i >= tail;
        match c {
            '\\' => out.push_str("\\\\"),
            '/' => out.push_str("\\/"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            ' ' if edge => out.push_str("\\s"),
            _ => out.push(c),
        }
    }
    out
}

/// Inverse of [`escape_value`]. Unknown escapes are kept as written.
fn unescape_value(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('/') => out.push('/'),
            Some('s') => out.push(' '),
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn format_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

fn parse_f64(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

// ============================================================================
// LEDGER
// ============================================================================

/// Write every ledger record into a `CrewList` node.
pub fn ledger_to_node(ledger: &VacationLedger) -> ConfigNode {
    let mut list = ConfigNode::new(nodes::CREW_LIST);
    for record in ledger.records() {
        let mut node = ConfigNode::new(nodes::CREW_RECORD);
        node.add_value(nodes::NAME, &record.name);
        node.add_value(nodes::EXPIRATION, record.expiry);
        node.add_value(nodes::LAST_MISSION_DURATION, record.last_mission_duration);
        node.add_value(nodes::LAST_MISSION_END_TIME, record.last_mission_end_time);
        node.add_value(nodes::EXTREMELY_FATIGUED, format_bool(record.extremely_fatigued));
        list.add_node(node);
    }
    list
}

/// Rebuild a ledger from the `CrewList` child of `parent`.
///
/// Records without an expiration but with mission data get their expiry
/// recomputed from `settings`.
pub fn ledger_from_node(parent: &ConfigNode, settings: &Settings) -> VacationLedger {
    let mut ledger = VacationLedger::new();
    let Some(list) = parent.get_node(nodes::CREW_LIST) else {
        return ledger;
    };
    for node in list.get_nodes(nodes::CREW_RECORD) {
        match record_from_node(node, settings) {
            Some(record) => {
                ledger.insert(record);
            }
            None => log::warn!("Skipping unreadable crew record: {:?}", node.values),
        }
    }
    ledger
}

fn record_from_node(node: &ConfigNode, settings: &Settings) -> Option<CrewRecord> {
    let name = node
        .get_value_any(&nodes::NAME_ALIASES)
        .filter(|n| !n.trim().is_empty())?;

    let duration = match node.get_value_any(&nodes::DURATION_ALIASES) {
        Some(raw) => parse_f64(raw)?,
        None => 0.0,
    };
    let end_time = match node.get_value_any(&nodes::END_TIME_ALIASES) {
        Some(raw) => parse_f64(raw)?,
        None => 0.0,
    };
    let expiry = match node.get_value_any(&nodes::EXPIRATION_ALIASES) {
        Some(raw) => parse_f64(raw)?,
        None if end_time > 0.0 => end_time + settings.cooldown(duration),
        None => NEVER,
    };
    let extremely_fatigued = node
        .get_value_any(&nodes::FATIGUE_ALIASES)
        .and_then(parse_bool)
        .unwrap_or(false);

    Some(CrewRecord {
        name: name.to_string(),
        last_mission_duration: duration,
        last_mission_end_time: end_time,
        expiry,
        extremely_fatigued,
    })
}

// ============================================================================
// SETTINGS
// ============================================================================

pub fn settings_to_node(settings: &Settings, node: &mut ConfigNode) {
    node.add_value(nodes::VACATION_SCALAR, settings.vacation_scalar);
    node.add_value(nodes::MINIMUM_VACATION_DAYS, settings.minimum_vacation_days);
    node.add_value(nodes::MAXIMUM_VACATION_DAYS, settings.maximum_vacation_days);
    node.add_value(nodes::VACATION_HARDLOCK, format_bool(settings.vacation_hardlock));
    node.add_value(nodes::DO_CUSTOM_ASSIGNMENT, format_bool(settings.do_custom_assignment));
    node.add_value(nodes::HIDE_SETTINGS_ICON, format_bool(settings.hide_settings_icon));
    node.add_value(nodes::KERBIN_TIME, format_bool(settings.kerbin_time));
}

/// Read settings from `node`. Missing or unreadable values keep their
/// defaults.
pub fn settings_from_node(node: &ConfigNode) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = node.get_value(nodes::VACATION_SCALAR) {
        match parse_f64(raw).filter(|v| *v >= 0.0) {
            Some(v) => settings.vacation_scalar = v,
            None => log::warn!("Ignoring saved {} '{}'", nodes::VACATION_SCALAR, raw),
        }
    }
    read_days(node, nodes::MINIMUM_VACATION_DAYS, &mut settings.minimum_vacation_days);
    read_days(node, nodes::MAXIMUM_VACATION_DAYS, &mut settings.maximum_vacation_days);
    read_flag(node, nodes::VACATION_HARDLOCK, &mut settings.vacation_hardlock);
    read_flag(node, nodes::DO_CUSTOM_ASSIGNMENT, &mut settings.do_custom_assignment);
    read_flag(node, nodes::HIDE_SETTINGS_ICON, &mut settings.hide_settings_icon);
    read_flag(node, nodes::KERBIN_TIME, &mut settings.kerbin_time);

    if let Err(e) = settings.validate() {
        log::warn!("Saved settings are inconsistent: {}", e);
    }
    settings
}

fn read_days(node: &ConfigNode, key: &str, target: &mut i32) {
    if let Some(raw) = node.get_value(key) {
        match raw.trim().parse::<i32>() {
            Ok(days) if days >= 0 => *target = days,
            _ => log::warn!("Ignoring saved {} '{}'", key, raw),
        }
    }
}

fn read_flag(node: &ConfigNode, key: &str, target: &mut bool) {
    if let Some(raw) = node.get_value(key) {
        match parse_bool(raw) {
            Some(flag) => *target = flag,
            None => log::warn!("Ignoring saved {} '{}'", key, raw),
        }
    }
}

// ============================================================================
// SCENARIO
// ============================================================================

/// Build the full scenario node: settings values plus the crew list.
pub fn save_scenario(ledger: &VacationLedger, settings: &Settings) -> ConfigNode {
    let mut scenario = ConfigNode::new(nodes::SCENARIO);
    scenario.add_value(nodes::NAME, SCENARIO_NAME);
    settings_to_node(settings, &mut scenario);
    scenario.add_node(ledger_to_node(ledger));
    scenario
}

/// Read a scenario node written by [`save_scenario`] (or an older layout).
pub fn load_scenario(scenario: &ConfigNode) -> (VacationLedger, Settings) {
    let settings = settings_from_node(scenario);
    let ledger = ledger_from_node(scenario, &settings);
    log::info!("Loaded {} crew vacation records", ledger.len());
    (ledger, settings)
}

/// Parse save text and find the scenario node, either at the top level or
/// as the text's only root.
pub fn load_scenario_text(text: &str) -> Result<(VacationLedger, Settings), ParseError> {
    let root = ConfigNode::parse(text)?;
    let scenario = root.get_node(nodes::SCENARIO).unwrap_or(&root);
    Ok(load_scenario(scenario))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_ledger() -> VacationLedger {
        let settings = Settings::default();
        let mut ledger = VacationLedger::new();
        ledger.record_mission("Jebediah Kerman", 12_345.5, 100_000.25, &settings);
        ledger.record_mission("Bill Kerman", 0.0, 5_000.0, &settings);
        ledger
    }

    #[test]
    fn text_round_trip_preserves_records() {
        let ledger = sample_ledger();
        let settings = Settings {
            vacation_hardlock: true,
            minimum_vacation_days: 3,
            ..Settings::default()
        };
        let text = save_scenario(&ledger, &settings).to_text();
        let (loaded, loaded_settings) = load_scenario_text(&text).expect("parse");
        assert_eq!(loaded, ledger);
        assert_eq!(loaded_settings, settings);
    }

    #[test]
    fn text_round_trip_keeps_names_verbatim() {
        let settings = Settings::default();
        let mut ledger = VacationLedger::new();
        for name in [
            "Bob //Kerman",
            " Val Kerman",
            "Jeb  Kerman ",
            "Bill Kerman {",
            r"Back\slash Kerman",
            "Tab\tKerman",
        ] {
            ledger.record_mission(name, 600.0, 10_000.0, &settings);
        }
        let text = save_scenario(&ledger, &settings).to_text();
        let (loaded, _) = load_scenario_text(&text).expect("parse");
        assert_eq!(loaded, ledger);
    }

    #[test]
    fn missing_crew_list_is_empty_ledger() {
        let scenario = ConfigNode::new(nodes::SCENARIO);
        let (ledger, settings) = load_scenario(&scenario);
        assert!(ledger.is_empty());
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn reads_legacy_field_names() {
        let text = "\
CrewList
{
\tKERBAL
\t{
\t\tcrewName = Valentina Kerman
\t\ttargetExpiration = 99000
\t}
\tKERBAL
\t{
\t\tName = Bob Kerman
\t\tGetLastMissionDuration = 21600
\t\tLastMissionEndTime = 50000
\t}
}
";
        let root = ConfigNode::parse(text).expect("parse");
        let settings = Settings::default();
        let ledger = ledger_from_node(&root, &settings);
        assert_eq!(ledger.expiry("Valentina Kerman"), 99_000.0);
        // Expiry recomputed from mission data.
        assert_eq!(
            ledger.expiry("Bob Kerman"),
            50_000.0 + settings.cooldown(21_600.0)
        );
    }

    #[test]
    fn malformed_records_are_skipped() {
        let mut list = ConfigNode::new(nodes::CREW_LIST);
        let mut bad = ConfigNode::new(nodes::CREW_RECORD);
        bad.add_value(nodes::NAME, "Broken Kerman");
        bad.add_value(nodes::EXPIRATION, "soon");
        list.add_node(bad);
        let mut nameless = ConfigNode::new(nodes::CREW_RECORD);
        nameless.add_value(nodes::EXPIRATION, 10.0);
        list.add_node(nameless);
        let mut good = ConfigNode::new(nodes::CREW_RECORD);
        good.add_value(nodes::NAME, "Good Kerman");
        good.add_value(nodes::EXPIRATION, 10.0);
        list.add_node(good);

        let mut root = ConfigNode::default();
        root.add_node(list);
        let ledger = ledger_from_node(&root, &Settings::default());
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.expiry("Good Kerman"), 10.0);
    }

    #[test]
    fn bad_settings_values_keep_defaults() {
        let mut node = ConfigNode::new(nodes::SCENARIO);
        node.add_value(nodes::MINIMUM_VACATION_DAYS, "lots");
        node.add_value(nodes::VACATION_SCALAR, "-1");
        node.add_value(nodes::KERBIN_TIME, "False");
        let settings = settings_from_node(&node);
        assert_eq!(settings.minimum_vacation_days, 7);
        assert_eq!(settings.vacation_scalar, 0.1);
        assert!(!settings.kerbin_time);
    }

    #[test]
    fn parse_accepts_inline_braces_and_comments() {
        let text = "SCENARIO {\n  name = CrewQueue // plugin\n  CrewList {\n  }\n}\n";
        let root = ConfigNode::parse(text).expect("parse");
        let scenario = root.get_node("SCENARIO").expect("scenario");
        assert_eq!(scenario.get_value("name"), Some("CrewQueue"));
        assert!(scenario.has_node(nodes::CREW_LIST));
    }

    #[test]
    fn parse_reports_structural_errors() {
        assert_eq!(
            ConfigNode::parse("}\n"),
            Err(ParseError::UnbalancedClose { line: 1 })
        );
        assert_eq!(
            ConfigNode::parse("SCENARIO\n{\n"),
            Err(ParseError::Unclosed {
                name: "SCENARIO".into()
            })
        );
        assert_eq!(
            ConfigNode::parse("SCENARIO\nname = x\n"),
            Err(ParseError::MissingOpen {
                line: 1,
                name: "SCENARIO".into()
            })
        );
    }

    #[test]
    fn remove_node_drops_all_matches() {
        let mut node = ConfigNode::new("root");
        node.add_node(ConfigNode::new(nodes::CREW_LIST));
        node.add_node(ConfigNode::new(nodes::CREW_LIST));
        node.add_node(ConfigNode::new("OTHER"));
        assert_eq!(node.remove_node(nodes::CREW_LIST), 2);
        assert!(!node.has_node(nodes::CREW_LIST));
        assert!(node.has_node("OTHER"));
    }

    #[test]
    fn json_export_contains_records() {
        let json = save_scenario(&sample_ledger(), &Settings::default())
            .to_json()
            .expect("json");
        assert!(json.contains("Jebediah Kerman"));
        assert!(json.contains("\"CrewList\""));
    }
}
