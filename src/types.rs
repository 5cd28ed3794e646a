//! This module defines the core data structures and types used throughout the Turing Machine
//! interpreter, including transitions, head directions, execution results, and error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::tape::Tape;

/// A single tape symbol. Descriptions spell symbols as one-character strings.
pub type Symbol = char;
/// A state label.
pub type State = String;

/// The maximum allowed size for a machine description in bytes.
pub const MAX_DESCRIPTION_SIZE: usize = 65536; // 64KB
/// The default number of steps to execute before giving up.
pub const MAX_EXECUTION_STEPS: usize = 10000;
/// Separator between the state and the symbol in a transition key (`"state:symbol"`).
pub const KEY_SEPARATOR: char = ':';

/// Represents a single transition rule of a Turing Machine.
///
/// Read as "write `write`, move the head per `direction`, then enter `next_state`".
/// The `(state, symbol)` pair that selects it is the key of the transition table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// The next state the machine transitions to.
    pub next_state: State,
    /// The symbol written under the head.
    pub write: Symbol,
    /// The direction the head moves after writing.
    pub direction: Direction,
}

/// Represents the possible directions a Turing Machine head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    #[serde(rename = "L")]
    Left,
    /// Move the head one position to the right.
    #[serde(rename = "R")]
    Right,
    /// Keep the head in the same position.
    #[serde(rename = "S")]
    Stay,
}

impl Direction {
    /// The head displacement this direction produces.
    pub fn offset(self) -> i64 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
            Direction::Stay => 0,
        }
    }

    /// The single-letter spelling used in machine descriptions.
    pub fn as_char(self) -> char {
        match self {
            Direction::Left => 'L',
            Direction::Right => 'R',
            Direction::Stay => 'S',
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Represents the outcome of a single execution step.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// The machine applied a transition and can continue.
    Continue,
    /// The machine stopped.
    Halt(Halt),
}

/// Why a run stopped. Every variant is a normal return value, never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Halt {
    /// The machine entered its halt state.
    Halted,
    /// No transition is defined for the current state and the symbol under the head.
    UndefinedTransition { state: State, symbol: Symbol },
    /// The step budget ran out before the machine halted.
    BudgetExceeded,
}

impl fmt::Display for Halt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Halt::Halted => write!(f, "halted"),
            Halt::UndefinedTransition { state, symbol } => write!(
                f,
                "undefined transition (state {state}, symbol '{symbol}')"
            ),
            Halt::BudgetExceeded => write!(f, "step budget exceeded"),
        }
    }
}

/// The result of running a machine to completion.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    /// The final tape, handed back to the caller.
    pub tape: Tape,
    /// Number of transitions applied.
    pub steps: usize,
    /// The state the machine stopped in.
    pub state: State,
    /// The final head position.
    pub head: i64,
    /// Why the run stopped.
    pub halt: Halt,
}

impl RunOutcome {
    /// Returns `true` if the machine reached its halt state.
    pub fn is_halted(&self) -> bool {
        self.halt == Halt::Halted
    }

    /// Renders the final tape from its leftmost to its rightmost non-blank cell.
    pub fn rendered(&self) -> String {
        self.tape.render()
    }
}

/// Represents various errors that can occur while building or loading a machine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UtmError {
    /// The description is missing required keys, has the wrong shape, or spells a symbol,
    /// direction or transition key incorrectly.
    #[error("Malformed description: {0}")]
    MalformedDescription(String),
    /// Two transitions share the same `(state, symbol)` key.
    #[error("Duplicate transition for state {state} and symbol '{symbol}'")]
    DuplicateTransitionKey { state: State, symbol: Symbol },
    /// The description is well-formed but fails strict validation.
    #[error("Malformed machine: {0}")]
    MalformedMachine(String),
    /// No built-in machine matches the requested name or index.
    #[error("Unknown machine: {0}")]
    UnknownMachine(String),
    /// Indicates an error related to file system operations, such as reading description files.
    #[error("File error: {0}")]
    FileError(String),
}
