//! This module provides functions for validating Turing Machines before execution. Building a
//! machine only checks what the engine needs; the checks here catch descriptions that would run
//! but almost certainly do not mean what their author intended.

use crate::machine::TuringMachine;
use crate::types::{State, Symbol, UtmError};
use std::collections::HashSet;
use tracing::warn;

/// Represents the problems that strict validation can find.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AnalysisError {
    /// The start state is not listed in `states`.
    UndeclaredStartState(String),
    /// The halt state is not listed in `states`.
    UndeclaredHaltState(String),
    /// Transitions read from or lead to states that are not listed in `states`.
    UndeclaredStates(Vec<String>),
    /// Transitions read or write symbols outside the alphabet and blank.
    UndeclaredSymbols(Vec<Symbol>),
    /// The initial tape contains symbols outside the alphabet and blank.
    InvalidTapeSymbols(Vec<Symbol>),
}

impl From<AnalysisError> for UtmError {
    /// Converts an `AnalysisError` into a `UtmError::MalformedMachine`.
    fn from(error: AnalysisError) -> Self {
        match error {
            AnalysisError::UndeclaredStartState(state) => {
                UtmError::MalformedMachine(format!("Start state {} is not declared", state))
            }
            AnalysisError::UndeclaredHaltState(state) => {
                UtmError::MalformedMachine(format!("Halt state {} is not declared", state))
            }
            AnalysisError::UndeclaredStates(states) => UtmError::MalformedMachine(format!(
                "Transitions reference undeclared states: {:?}",
                states
            )),
            AnalysisError::UndeclaredSymbols(symbols) => UtmError::MalformedMachine(format!(
                "Transitions use symbols outside the alphabet: {:?}",
                symbols
            )),
            AnalysisError::InvalidTapeSymbols(symbols) => UtmError::MalformedMachine(format!(
                "Initial tape contains symbols outside the alphabet: {:?}",
                symbols
            )),
        }
    }
}

/// Analyzes a machine for undeclared states and symbols.
///
/// States that cannot be reached from the start state are logged as a warning but do not fail
/// the analysis.
///
/// # Returns
///
/// * `Ok(())` if no errors are found.
/// * `Err(UtmError::MalformedMachine)` with the first problem found otherwise.
pub fn analyze(machine: &TuringMachine) -> Result<(), UtmError> {
    let errors = [
        check_start_state,
        check_halt_state,
        check_transition_states,
        check_transition_symbols,
    ]
    .iter()
    .filter_map(|f| f(machine).err())
    .collect::<Vec<_>>();

    if let Some(first_error) = errors.into_iter().next() {
        return Err(first_error.into());
    }

    let unreachable = unreachable_states(machine);
    if !unreachable.is_empty() {
        warn!(states = ?unreachable, "states unreachable from the start state");
    }

    Ok(())
}

/// Checks that every symbol of an initial tape belongs to the machine's alphabet or is blank.
pub fn analyze_input(machine: &TuringMachine, input: &str) -> Result<(), UtmError> {
    let known = known_symbols(machine);
    let unknown = sorted_unique(input.chars().filter(|c| !known.contains(c)));

    if !unknown.is_empty() {
        return Err(AnalysisError::InvalidTapeSymbols(unknown).into());
    }

    Ok(())
}

/// Returns the declared states that cannot be reached from the start state, sorted.
pub fn unreachable_states(machine: &TuringMachine) -> Vec<State> {
    let mut visited = HashSet::new();
    let mut queue = vec![machine.start()];

    while let Some(state) = queue.pop() {
        if !visited.insert(state) {
            continue;
        }

        for (from, _, transition) in machine.transitions() {
            if from == state && !visited.contains(transition.next_state.as_str()) {
                queue.push(transition.next_state.as_str());
            }
        }
    }

    sorted_unique(
        machine
            .states()
            .iter()
            .filter(|state| !visited.contains(state.as_str()))
            .cloned(),
    )
}

fn check_start_state(machine: &TuringMachine) -> Result<(), AnalysisError> {
    if !is_declared(machine, machine.start()) {
        return Err(AnalysisError::UndeclaredStartState(machine.start().to_string()));
    }

    Ok(())
}

fn check_halt_state(machine: &TuringMachine) -> Result<(), AnalysisError> {
    if !is_declared(machine, machine.halt()) {
        return Err(AnalysisError::UndeclaredHaltState(machine.halt().to_string()));
    }

    Ok(())
}

/// Checks that both ends of every transition are declared states.
fn check_transition_states(machine: &TuringMachine) -> Result<(), AnalysisError> {
    let undeclared = sorted_unique(
        machine
            .transitions()
            .flat_map(|(from, _, transition)| [from, &transition.next_state])
            .filter(|state| !is_declared(machine, state))
            .cloned(),
    );

    if !undeclared.is_empty() {
        return Err(AnalysisError::UndeclaredStates(undeclared));
    }

    Ok(())
}

/// Checks that every symbol read or written by a transition is in the alphabet or blank.
fn check_transition_symbols(machine: &TuringMachine) -> Result<(), AnalysisError> {
    let known = known_symbols(machine);
    let undeclared = sorted_unique(
        machine
            .transitions()
            .flat_map(|(_, read, transition)| [read, transition.write])
            .filter(|symbol| !known.contains(symbol)),
    );

    if !undeclared.is_empty() {
        return Err(AnalysisError::UndeclaredSymbols(undeclared));
    }

    Ok(())
}

fn is_declared(machine: &TuringMachine, state: &str) -> bool {
    machine.states().iter().any(|s| s == state)
}

fn known_symbols(machine: &TuringMachine) -> HashSet<Symbol> {
    machine
        .alphabet()
        .iter()
        .copied()
        .chain(std::iter::once(machine.blank()))
        .collect()
}

/// Collects, sorts and deduplicates so reports are deterministic.
fn sorted_unique<T: Ord>(items: impl Iterator<Item = T>) -> Vec<T> {
    let mut items: Vec<T> = items.collect();
    items.sort();
    items.dedup();
    items
}
