//! This module defines the serde model of a JSON machine description and the helpers that turn
//! its string-typed pieces (symbols and `"state:symbol"` keys) into structured values.
//!
//! ```json
//! {
//!   "states": ["add", "done"],
//!   "alphabet": ["1", "B"],
//!   "blank": "B",
//!   "transitions": { "add:1": ["add", "1", "R"], "add:B": ["done", "1", "S"] },
//!   "start": "add",
//!   "halt": "done"
//! }
//! ```

use crate::types::{Direction, State, Symbol, UtmError, KEY_SEPARATOR};
use serde::{
    de::{MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};
use std::fmt;

/// A machine description exactly as written in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineDescription {
    /// Optional display name. Not part of the machine semantics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// All declared states.
    pub states: Vec<State>,
    /// Declared tape symbols, one character each. Informational unless validated strictly.
    pub alphabet: Vec<String>,
    /// The blank symbol.
    pub blank: String,
    /// Transition entries in document order.
    pub transitions: TransitionEntries,
    /// The initial state.
    pub start: State,
    /// The halting state.
    pub halt: State,
}

/// The right-hand side of a transition entry: `[next_state, write_symbol, direction]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionSpec(pub State, pub String, pub Direction);

/// The `transitions` object as an ordered list of `(key, value)` entries.
///
/// JSON objects may repeat a key. Keeping every entry lets machine construction reject
/// duplicates instead of silently keeping the last one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionEntries(pub Vec<(String, TransitionSpec)>);

impl MachineDescription {
    /// Parses a description from JSON text.
    pub fn from_json(content: &str) -> Result<Self, UtmError> {
        serde_json::from_str(content).map_err(|e| UtmError::MalformedDescription(e.to_string()))
    }

    /// Serializes the description as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, UtmError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| UtmError::MalformedDescription(e.to_string()))
    }
}

impl TransitionEntries {
    /// Number of entries, duplicates included.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the entries in document order.
    pub fn iter(&self) -> impl Iterator<Item = &(String, TransitionSpec)> {
        self.0.iter()
    }
}

impl Serialize for TransitionEntries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, spec) in &self.0 {
            map.serialize_entry(key, spec)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TransitionEntries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = TransitionEntries;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of \"state:symbol\" keys to [next_state, write_symbol, direction]")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, spec)) = access.next_entry::<String, TransitionSpec>()? {
                    entries.push((key, spec));
                }
                Ok(TransitionEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// Parses a one-character symbol. `field` names the offending part of the description.
pub fn parse_symbol(field: &str, value: &str) -> Result<Symbol, UtmError> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(symbol), None) => Ok(symbol),
        _ => Err(UtmError::MalformedDescription(format!(
            "{field} must be a single character, got {value:?}"
        ))),
    }
}

/// Splits a `"state:symbol"` transition key into its structured parts.
///
/// The key must contain exactly one separator, a non-empty state and a one-character symbol.
pub fn parse_key(key: &str) -> Result<(State, Symbol), UtmError> {
    let malformed = |reason: &str| {
        UtmError::MalformedDescription(format!("Invalid transition key {key:?}: {reason}"))
    };

    let (state, symbol) = key
        .split_once(KEY_SEPARATOR)
        .ok_or_else(|| malformed("expected \"state:symbol\""))?;

    if symbol.contains(KEY_SEPARATOR) {
        return Err(malformed("more than one ':' makes the key ambiguous"));
    }
    if state.is_empty() {
        return Err(malformed("state is empty"));
    }

    let symbol = parse_symbol("transition key symbol", symbol)
        .map_err(|_| malformed("symbol must be a single character"))?;

    Ok((state.to_string(), symbol))
}

/// Joins a state and a symbol into a transition key.
pub fn format_key(state: &str, symbol: Symbol) -> String {
    format!("{state}{KEY_SEPARATOR}{symbol}")
}

#[cfg(test)]
mod tests {
    use super::*;

    const INCREMENTER: &str = r#"{
        "states": ["add", "done"],
        "alphabet": ["1", "B"],
        "blank": "B",
        "transitions": {
            "add:1": ["add", "1", "R"],
            "add:B": ["done", "1", "S"]
        },
        "start": "add",
        "halt": "done"
    }"#;

    #[test]
    fn test_parse_description() {
        let description = MachineDescription::from_json(INCREMENTER).unwrap();

        assert_eq!(description.name, None);
        assert_eq!(description.states, vec!["add", "done"]);
        assert_eq!(description.blank, "B");
        assert_eq!(description.start, "add");
        assert_eq!(description.halt, "done");
        assert_eq!(description.transitions.len(), 2);
        assert_eq!(
            description.transitions.0[1],
            (
                "add:B".to_string(),
                TransitionSpec("done".to_string(), "1".to_string(), Direction::Stay)
            )
        );
    }

    #[test]
    fn test_duplicate_keys_are_preserved() {
        let json = r#"{
            "states": ["a"], "alphabet": ["x"], "blank": "_",
            "transitions": { "a:x": ["a", "x", "R"], "a:x": ["a", "_", "L"] },
            "start": "a", "halt": "a"
        }"#;

        let description = MachineDescription::from_json(json).unwrap();
        assert_eq!(description.transitions.len(), 2);
    }

    #[test]
    fn test_missing_key_is_malformed() {
        let json = r#"{ "states": [], "alphabet": [], "blank": "B", "transitions": {}, "start": "a" }"#;

        match MachineDescription::from_json(json) {
            Err(UtmError::MalformedDescription(msg)) => assert!(msg.contains("halt")),
            other => panic!("Expected MalformedDescription, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_direction_is_malformed() {
        let json = r#"{
            "states": [], "alphabet": [], "blank": "B",
            "transitions": { "a:B": ["a", "B", "X"] },
            "start": "a", "halt": "h"
        }"#;

        assert!(matches!(
            MachineDescription::from_json(json),
            Err(UtmError::MalformedDescription(_))
        ));
    }

    #[test]
    fn test_wrong_arity_is_malformed() {
        let json = r#"{
            "states": [], "alphabet": [], "blank": "B",
            "transitions": { "a:B": ["a", "B"] },
            "start": "a", "halt": "h"
        }"#;

        assert!(MachineDescription::from_json(json).is_err());
    }

    #[test]
    fn test_json_roundtrip_keeps_order() {
        let description = MachineDescription::from_json(INCREMENTER).unwrap();
        let json = description.to_json().unwrap();

        assert!(json.find("add:1").unwrap() < json.find("add:B").unwrap());
        assert_eq!(MachineDescription::from_json(&json).unwrap(), description);
    }

    #[test]
    fn test_parse_key() {
        assert_eq!(parse_key("add:1").unwrap(), ("add".to_string(), '1'));
        assert!(parse_key("add").is_err());
        assert!(parse_key(":1").is_err());
        assert!(parse_key("add:").is_err());
        assert!(parse_key("add:11").is_err());
        assert!(parse_key("a:b:c").is_err());
        assert!(parse_key("a::").is_err());
    }

    #[test]
    fn test_parse_symbol() {
        assert_eq!(parse_symbol("blank", "_").unwrap(), '_');
        assert_eq!(parse_symbol("blank", "é").unwrap(), 'é');
        assert!(parse_symbol("blank", "").is_err());
        assert!(parse_symbol("blank", "ab").is_err());
    }

    #[test]
    fn test_format_key() {
        assert_eq!(format_key("q0", 'B'), "q0:B");
    }
}
