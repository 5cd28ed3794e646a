//! Built-in machines, embedded at compile time from `machines/*.json`.

use crate::machine::TuringMachine;
use crate::types::UtmError;
use tracing::warn;

// Embedded descriptions paired with a sample input tape.
const MACHINE_TEXTS: [(&str, &str); 5] = [
    (include_str!("../machines/unary-increment.json"), "111"),
    (include_str!("../machines/binary-increment.json"), "1011"),
    (include_str!("../machines/binary-invert.json"), "1010"),
    (include_str!("../machines/busy-beaver-2.json"), ""),
    (include_str!("../machines/erase.json"), "1001"),
];

/// A built-in machine with its sample input.
#[derive(Debug, Clone)]
struct BuiltinMachine {
    name: String,
    machine: TuringMachine,
    sample_input: &'static str,
}

lazy_static::lazy_static! {
    static ref MACHINES: Vec<BuiltinMachine> = MACHINE_TEXTS
        .iter()
        .enumerate()
        .filter_map(|(index, &(text, sample_input))| match TuringMachine::from_json(text) {
            Ok(machine) => Some(BuiltinMachine {
                name: machine.name().map_or_else(|| format!("machine-{index}"), str::to_string),
                machine,
                sample_input,
            }),
            Err(e) => {
                warn!(index, error = %e, "failed to parse built-in machine");
                None
            }
        })
        .collect();
}

/// Summary of a built-in machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineInfo {
    pub index: usize,
    pub name: String,
    pub start: String,
    pub halt: String,
    pub sample_input: String,
    pub state_count: usize,
    pub transition_count: usize,
}

/// Read-only access to the built-in machines.
pub struct MachineLibrary;

impl MachineLibrary {
    /// Get the number of available machines
    pub fn count() -> usize {
        MACHINES.len()
    }

    /// Get a machine by its index
    pub fn get_by_index(index: usize) -> Result<TuringMachine, UtmError> {
        MACHINES
            .get(index)
            .map(|entry| entry.machine.clone())
            .ok_or_else(|| UtmError::UnknownMachine(format!("index {} out of range", index)))
    }

    /// Get a machine by its name
    pub fn get_by_name(name: &str) -> Result<TuringMachine, UtmError> {
        Self::find(name)
            .map(|entry| entry.machine.clone())
            .ok_or_else(|| UtmError::UnknownMachine(name.to_string()))
    }

    /// The sample input tape of a machine
    pub fn sample_input(name: &str) -> Result<&'static str, UtmError> {
        Self::find(name)
            .map(|entry| entry.sample_input)
            .ok_or_else(|| UtmError::UnknownMachine(name.to_string()))
    }

    /// List all machine names
    pub fn list_names() -> Vec<String> {
        MACHINES.iter().map(|entry| entry.name.clone()).collect()
    }

    /// Get information about a machine by its index
    pub fn info(index: usize) -> Result<MachineInfo, UtmError> {
        let entry = MACHINES
            .get(index)
            .ok_or_else(|| UtmError::UnknownMachine(format!("index {} out of range", index)))?;

        Ok(MachineInfo {
            index,
            name: entry.name.clone(),
            start: entry.machine.start().to_string(),
            halt: entry.machine.halt().to_string(),
            sample_input: entry.sample_input.to_string(),
            state_count: entry.machine.states().len(),
            transition_count: entry.machine.transition_count(),
        })
    }

    fn find(name: &str) -> Option<&'static BuiltinMachine> {
        MACHINES.iter().find(|entry| entry.name == name)
    }
}
