//! This crate provides the core logic for a universal Turing Machine interpreter.
//! It includes modules for loading JSON machine descriptions, a sparse bidirectional tape,
//! a step-limited execution engine with a tracing hook, optional strict validation, and a
//! collection of built-in machines.

pub mod analyzer;
pub mod description;
pub mod loader;
pub mod machine;
pub mod programs;
pub mod tape;
pub mod trace;
pub mod types;

/// Re-exports the `analyze` functions and `AnalysisError` enum from the analyzer module.
pub use analyzer::{analyze, analyze_input, AnalysisError};
/// Re-exports the description model from the description module.
pub use description::{MachineDescription, TransitionSpec};
/// Re-exports the `MachineLoader` struct from the loader module.
pub use loader::MachineLoader;
/// Re-exports the engine types from the machine module.
pub use machine::{Execution, TuringMachine};
/// Re-exports the built-in machine registry from the programs module.
pub use programs::{MachineInfo, MachineLibrary};
/// Re-exports the `Tape` struct from the tape module.
pub use tape::Tape;
/// Re-exports the tracing hook from the trace module.
pub use trace::{TraceEvent, TraceRecorder, TraceSink};
/// Re-exports various types related to machine definition and execution from the types module.
pub use types::{
    Direction, Halt, RunOutcome, State, Step, Symbol, Transition, UtmError, MAX_DESCRIPTION_SIZE,
    MAX_EXECUTION_STEPS,
};
