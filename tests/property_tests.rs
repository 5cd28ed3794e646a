//! Property-based tests for the tape and the execution engine.
//!
//! Machines are generated over a small fixed state set and alphabet so that random tables
//! halt, loop, and hit undefined transitions in roughly equal measure.

use proptest::prelude::*;
use utm::description::TransitionEntries;
use utm::{Direction, Halt, MachineDescription, Tape, TransitionSpec, TuringMachine};

const STATES: [&str; 4] = ["q0", "q1", "q2", "h"];
const SYMBOLS: [char; 3] = ['0', '1', '_'];
const BLANK: char = '_';

fn direction(index: u8) -> Direction {
    match index {
        0 => Direction::Left,
        1 => Direction::Right,
        _ => Direction::Stay,
    }
}

prop_compose! {
    fn arbitrary_transition()(next in 0..STATES.len(), write in 0..SYMBOLS.len(), dir in 0..3u8)
        -> TransitionSpec {
        TransitionSpec(STATES[next].to_string(), SYMBOLS[write].to_string(), direction(dir))
    }
}

prop_compose! {
    fn arbitrary_machine()(
        table in prop::collection::vec(prop::option::of(arbitrary_transition()), 9)
    ) -> TuringMachine {
        let entries = table
            .into_iter()
            .enumerate()
            .filter_map(|(i, spec)| {
                let key = format!("{}:{}", STATES[i / SYMBOLS.len()], SYMBOLS[i % SYMBOLS.len()]);
                spec.map(|spec| (key, spec))
            })
            .collect();

        TuringMachine::new(MachineDescription {
            name: None,
            states: STATES.iter().map(|s| s.to_string()).collect(),
            alphabet: vec!["0".to_string(), "1".to_string()],
            blank: BLANK.to_string(),
            transitions: TransitionEntries(entries),
            start: "q0".to_string(),
            halt: "h".to_string(),
        })
        .unwrap()
    }
}

proptest! {
    #[test]
    fn render_inverts_from_string(input in "[a-z0-9]{0,40}") {
        let tape = Tape::from_string(&input, BLANK);
        prop_assert_eq!(tape.render(), input);
    }

    #[test]
    fn writing_blank_clears_the_cell(
        writes in prop::collection::vec((-50i64..50, "[ab]"), 0..20),
        position in -60i64..60
    ) {
        let mut tape = Tape::new(BLANK);
        for (p, symbol) in &writes {
            tape.write(*p, symbol.chars().next().unwrap());
        }

        tape.write(position, BLANK);

        prop_assert_eq!(tape.read(position), BLANK);
        prop_assert!(!tape.is_set(position));
        prop_assert!(!tape.cells().iter().any(|&(_, s)| s == BLANK));
    }

    #[test]
    fn run_is_deterministic(
        machine in arbitrary_machine(),
        input in "[01]{0,8}",
        max_steps in 0usize..200
    ) {
        let first = machine.run(machine.tape(&input), max_steps, None);
        let second = machine.run(machine.tape(&input), max_steps, None);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn budget_is_monotonic(
        machine in arbitrary_machine(),
        input in "[01]{0,8}",
        small in 0usize..50,
        extra in 0usize..50
    ) {
        let short = machine.run(machine.tape(&input), small, None);
        let long = machine.run(machine.tape(&input), small + extra, None);

        if short.halt == Halt::BudgetExceeded {
            prop_assert_eq!(short.steps, small);
            prop_assert!(long.steps >= small);
            if long.halt == Halt::BudgetExceeded {
                prop_assert_eq!(long.steps, small + extra);
            }
        } else {
            prop_assert_eq!(short, long);
        }
    }

    #[test]
    fn steps_never_exceed_budget(
        machine in arbitrary_machine(),
        input in "[01]{0,8}",
        max_steps in 0usize..100
    ) {
        let outcome = machine.run(machine.tape(&input), max_steps, None);

        prop_assert!(outcome.steps <= max_steps);
        match outcome.halt {
            Halt::Halted => prop_assert_eq!(outcome.state.as_str(), "h"),
            Halt::BudgetExceeded => prop_assert_eq!(outcome.steps, max_steps),
            Halt::UndefinedTransition { ref state, symbol } => {
                prop_assert_eq!(state, &outcome.state);
                prop_assert!(machine.transition(state, symbol).is_none());
            }
        }
    }
}
