//! This module defines the `TuringMachine` struct, an immutable single-tape machine definition,
//! and `Execution`, the running configuration (tape, head, state, step count) that evolves it
//! one transition at a time.

use crate::analyzer::analyze;
use crate::description::{
    format_key, parse_key, parse_symbol, MachineDescription, TransitionEntries, TransitionSpec,
};
use crate::tape::Tape;
use crate::trace::{TraceEvent, TraceSink};
use crate::types::{Halt, RunOutcome, State, Step, Symbol, Transition, UtmError};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::{debug, trace};

/// A single-tape Turing Machine.
///
/// The transition table is keyed by state and then by the symbol under the head, so a lookup
/// never builds a string key. The machine is immutable once built and can be shared by
/// concurrent runs on independent tapes.
#[derive(Debug, Clone, PartialEq)]
pub struct TuringMachine {
    name: Option<String>,
    states: Vec<State>,
    alphabet: Vec<Symbol>,
    blank: Symbol,
    rules: HashMap<State, HashMap<Symbol, Transition>>,
    start: State,
    halt: State,
}

impl TuringMachine {
    /// Builds a machine from a parsed description.
    ///
    /// Only what execution needs is checked: every symbol is a single character, every key is
    /// a well-formed `"state:symbol"` pair, and no `(state, symbol)` pair appears twice.
    /// `states`, `start` and `halt` are stored verbatim; use [`TuringMachine::strict`] to
    /// validate them as well.
    ///
    /// # Returns
    ///
    /// * `Ok(TuringMachine)` if the description is executable.
    /// * `Err(UtmError::MalformedDescription)` if a symbol or key is malformed.
    /// * `Err(UtmError::DuplicateTransitionKey)` if a `(state, symbol)` pair is defined twice.
    pub fn new(description: MachineDescription) -> Result<Self, UtmError> {
        let MachineDescription {
            name,
            states,
            alphabet,
            blank,
            transitions,
            start,
            halt,
        } = description;

        let blank = parse_symbol("blank", &blank)?;
        let alphabet = alphabet
            .iter()
            .map(|symbol| parse_symbol("alphabet symbol", symbol))
            .collect::<Result<Vec<_>, _>>()?;

        let mut rules: HashMap<State, HashMap<Symbol, Transition>> = HashMap::new();
        let mut count = 0;

        for (key, TransitionSpec(next_state, write, direction)) in transitions.0 {
            let (state, symbol) = parse_key(&key)?;
            let write = parse_symbol(&format!("write symbol of {key:?}"), &write)?;

            match rules.entry(state.clone()).or_default().entry(symbol) {
                Entry::Occupied(_) => {
                    return Err(UtmError::DuplicateTransitionKey { state, symbol });
                }
                Entry::Vacant(entry) => {
                    entry.insert(Transition {
                        next_state,
                        write,
                        direction,
                    });
                    count += 1;
                }
            }
        }

        debug!(
            name = name.as_deref().unwrap_or("<unnamed>"),
            states = states.len(),
            transitions = count,
            %start,
            %halt,
            "machine built"
        );

        Ok(Self {
            name,
            states,
            alphabet,
            blank,
            rules,
            start,
            halt,
        })
    }

    /// Builds a machine and validates it with [`analyze`].
    ///
    /// # Returns
    ///
    /// * `Err(UtmError::MalformedMachine)` if validation fails, in addition to the errors
    ///   returned by [`TuringMachine::new`].
    pub fn strict(description: MachineDescription) -> Result<Self, UtmError> {
        let machine = Self::new(description)?;
        analyze(&machine)?;
        Ok(machine)
    }

    /// Parses JSON text and builds a machine from it.
    pub fn from_json(content: &str) -> Result<Self, UtmError> {
        Self::new(MachineDescription::from_json(content)?)
    }

    /// Converts the machine back into a description. Transitions are sorted by key.
    pub fn to_description(&self) -> MachineDescription {
        let mut entries: Vec<(String, TransitionSpec)> = self
            .transitions()
            .map(|(state, symbol, transition)| {
                (
                    format_key(state, symbol),
                    TransitionSpec(
                        transition.next_state.clone(),
                        transition.write.to_string(),
                        transition.direction,
                    ),
                )
            })
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        MachineDescription {
            name: self.name.clone(),
            states: self.states.clone(),
            alphabet: self.alphabet.iter().map(|s| s.to_string()).collect(),
            blank: self.blank.to_string(),
            transitions: TransitionEntries(entries),
            start: self.start.clone(),
            halt: self.halt.clone(),
        }
    }

    /// Builds an initial tape for this machine from an input string.
    pub fn tape(&self, input: &str) -> Tape {
        Tape::from_string(input, self.blank)
    }

    /// Starts an execution on `tape` with the head at position 0 in the start state.
    pub fn execute(&self, tape: Tape) -> Execution<'_> {
        Execution {
            machine: self,
            tape,
            head: 0,
            state: self.start.clone(),
            steps: 0,
        }
    }

    /// Runs the machine on `tape` until it halts, hits an undefined transition, or has applied
    /// `max_steps` transitions. The tape is handed back inside the outcome.
    ///
    /// If `sink` is given it receives one event per step, before the step is applied.
    pub fn run(
        &self,
        tape: Tape,
        max_steps: usize,
        sink: Option<&mut dyn TraceSink>,
    ) -> RunOutcome {
        self.execute(tape).run(max_steps, sink)
    }

    /// Returns the transition for `state` reading `symbol`, if one is defined.
    pub fn transition(&self, state: &str, symbol: Symbol) -> Option<&Transition> {
        self.rules.get(state)?.get(&symbol)
    }

    /// Iterates over every `(state, symbol, transition)` entry in no particular order.
    pub fn transitions(&self) -> impl Iterator<Item = (&State, Symbol, &Transition)> {
        self.rules.iter().flat_map(|(state, by_symbol)| {
            by_symbol
                .iter()
                .map(move |(&symbol, transition)| (state, symbol, transition))
        })
    }

    /// Number of transitions in the table.
    pub fn transition_count(&self) -> usize {
        self.rules.values().map(HashMap::len).sum()
    }

    /// The optional machine name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Declared states, in description order.
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// Declared input symbols.
    pub fn alphabet(&self) -> &[Symbol] {
        &self.alphabet
    }

    /// The blank symbol.
    pub fn blank(&self) -> Symbol {
        self.blank
    }

    /// The start state.
    pub fn start(&self) -> &str {
        &self.start
    }

    /// The halt state.
    pub fn halt(&self) -> &str {
        &self.halt
    }
}

/// A machine in the middle of a run.
///
/// The head starts at position 0 and the step budget of [`Execution::run`] counts every step
/// this execution has taken, including ones taken with [`Execution::step`].
#[derive(Debug, Clone)]
pub struct Execution<'m> {
    machine: &'m TuringMachine,
    tape: Tape,
    head: i64,
    state: State,
    steps: usize,
}

impl<'m> Execution<'m> {
    /// Executes a single step.
    ///
    /// # Returns
    ///
    /// * `Step::Continue` if a transition was applied.
    /// * `Step::Halt(Halt::Halted)` if the machine is already in its halt state.
    /// * `Step::Halt(Halt::UndefinedTransition { .. })` if no transition matches; nothing
    ///   is changed and no step is counted.
    pub fn step(&mut self, mut sink: Option<&mut dyn TraceSink>) -> Step {
        self.advance(&mut sink)
    }

    /// Steps until a terminal outcome and returns it together with the final tape.
    ///
    /// A machine that enters its halt state on the last budgeted step reports
    /// `Halt::Halted`, not `Halt::BudgetExceeded`.
    pub fn run(mut self, max_steps: usize, mut sink: Option<&mut dyn TraceSink>) -> RunOutcome {
        debug!(state = %self.state, max_steps, "run started");

        let halt = loop {
            if self.is_halted() {
                break Halt::Halted;
            }
            if self.steps >= max_steps {
                break Halt::BudgetExceeded;
            }
            if let Step::Halt(halt) = self.advance(&mut sink) {
                break halt;
            }
        };

        debug!(state = %self.state, steps = self.steps, outcome = %halt, "run finished");

        RunOutcome {
            tape: self.tape,
            steps: self.steps,
            state: self.state,
            head: self.head,
            halt,
        }
    }

    fn advance(&mut self, sink: &mut Option<&mut dyn TraceSink>) -> Step {
        if self.is_halted() {
            return Step::Halt(Halt::Halted);
        }

        let machine = self.machine;
        let symbol = self.tape.read(self.head);

        let Some(transition) = machine.transition(&self.state, symbol) else {
            debug!(state = %self.state, %symbol, head = self.head, "no transition defined");
            return Step::Halt(Halt::UndefinedTransition {
                state: self.state.clone(),
                symbol,
            });
        };

        trace!(
            step = self.steps,
            state = %self.state,
            head = self.head,
            read = %symbol,
            write = %transition.write,
            direction = %transition.direction,
            next = %transition.next_state,
            "applying transition"
        );

        if let Some(sink) = sink.as_mut() {
            sink.on_step(&TraceEvent {
                step: self.steps,
                state: self.state.clone(),
                head: self.head,
                read: symbol,
                write: transition.write,
                direction: transition.direction,
                next_state: transition.next_state.clone(),
            });
        }

        self.tape.write(self.head, transition.write);
        self.head += transition.direction.offset();
        self.state.clone_from(&transition.next_state);
        self.steps += 1;

        Step::Continue
    }

    /// Returns `true` if the machine is in its halt state.
    pub fn is_halted(&self) -> bool {
        self.state == self.machine.halt
    }

    /// The symbol under the head.
    pub fn symbol(&self) -> Symbol {
        self.tape.read(self.head)
    }

    /// The current state.
    pub fn state(&self) -> &str {
        &self.state
    }

    /// The current head position.
    pub fn head(&self) -> i64 {
        self.head
    }

    /// Steps executed so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// The tape as it stands.
    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    /// The machine being executed.
    pub fn machine(&self) -> &'m TuringMachine {
        self.machine
    }
}
