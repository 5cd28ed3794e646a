//! Step tracing. A `TraceSink` receives one `TraceEvent` per executed step, emitted before the
//! transition is applied.

use crate::types::{Direction, State, Symbol};
use std::fmt;

/// The decision the machine is about to take on one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEvent {
    /// Steps executed before this one.
    pub step: usize,
    /// State before the transition.
    pub state: State,
    /// Head position before the move.
    pub head: i64,
    /// Symbol under the head.
    pub read: Symbol,
    /// Symbol about to be written.
    pub write: Symbol,
    pub direction: Direction,
    /// State after the transition.
    pub next_state: State,
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[step {}] state={} head={} read={} -> write={} move={} next={}",
            self.step, self.state, self.head, self.read, self.write, self.direction, self.next_state
        )
    }
}

/// Receives trace events during a run.
pub trait TraceSink {
    /// Called once per step, before the transition is applied.
    fn on_step(&mut self, event: &TraceEvent);
}

impl<F> TraceSink for F
where
    F: FnMut(&TraceEvent),
{
    fn on_step(&mut self, event: &TraceEvent) {
        self(event)
    }
}

/// Collects every event in order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TraceRecorder {
    pub events: Vec<TraceEvent>,
}

impl TraceRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded events rendered one per line.
    pub fn lines(&self) -> Vec<String> {
        self.events.iter().map(|e| e.to_string()).collect()
    }
}

impl TraceSink for TraceRecorder {
    fn on_step(&mut self, event: &TraceEvent) {
        self.events.push(event.clone());
    }
}
