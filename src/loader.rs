//! This module provides the `MachineLoader` struct, responsible for loading machine descriptions
//! from files and strings.

use crate::machine::TuringMachine;
use crate::types::{UtmError, MAX_DESCRIPTION_SIZE};
use std::fs;
use std::path::Path;
use tracing::debug;

/// `MachineLoader` is a utility struct for loading Turing Machines.
/// It provides methods to load machines from individual files and from string content.
pub struct MachineLoader;

impl MachineLoader {
    /// Loads a single machine from the specified file path.
    ///
    /// # Returns
    ///
    /// * `Ok(TuringMachine)` if the file is read and describes an executable machine.
    /// * `Err(UtmError::FileError)` if the file cannot be read or is too large.
    /// * `Err(UtmError::MalformedDescription)` or `Err(UtmError::DuplicateTransitionKey)` if
    ///   the content is not a valid description.
    pub fn load_machine(path: &Path) -> Result<TuringMachine, UtmError> {
        debug!(path = %path.display(), "loading machine");

        let content = fs::read_to_string(path).map_err(|e| {
            UtmError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        Self::load_machine_from_string(&content)
    }

    /// Loads a single machine from the provided JSON string.
    ///
    /// This is useful for descriptions that are not stored in files, e.g. piped input.
    pub fn load_machine_from_string(content: &str) -> Result<TuringMachine, UtmError> {
        if content.len() > MAX_DESCRIPTION_SIZE {
            return Err(UtmError::FileError(format!(
                "Description is {} bytes, the limit is {} bytes",
                content.len(),
                MAX_DESCRIPTION_SIZE
            )));
        }

        TuringMachine::from_json(content)
    }
}
