//! This module defines the `Tape`, a sparse storage of symbols that is unbounded in both
//! directions. Only non-blank cells are stored; every other position implicitly holds the blank.

use crate::types::Symbol;
use std::collections::HashMap;
use std::fmt;

/// A single, bidirectionally unbounded Turing Machine tape.
///
/// Cells are keyed by signed position. The map never holds the blank symbol: writing blank
/// removes the cell, so an empty map is an all-blank tape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: HashMap<i64, Symbol>,
    blank: Symbol,
}

impl Tape {
    /// Creates an all-blank tape.
    pub fn new(blank: Symbol) -> Self {
        Self {
            cells: HashMap::new(),
            blank,
        }
    }

    /// Builds a tape holding `input` at positions `0..input.len()`.
    ///
    /// Characters equal to `blank` are not stored.
    pub fn from_string(input: &str, blank: Symbol) -> Self {
        let cells = input
            .chars()
            .zip(0i64..)
            .filter(|&(symbol, _)| symbol != blank)
            .map(|(symbol, position)| (position, symbol))
            .collect();

        Self { cells, blank }
    }

    /// Returns the symbol at `position`, or the blank symbol if the cell was never written.
    pub fn read(&self, position: i64) -> Symbol {
        self.cells.get(&position).copied().unwrap_or(self.blank)
    }

    /// Writes `symbol` at `position`. Writing the blank symbol clears the cell.
    pub fn write(&mut self, position: i64, symbol: Symbol) {
        if symbol == self.blank {
            self.cells.remove(&position);
        } else {
            self.cells.insert(position, symbol);
        }
    }

    /// Renders the cells between the leftmost and rightmost non-blank positions (inclusive),
    /// filling gaps with the blank symbol. An all-blank tape renders as an empty string.
    pub fn render(&self) -> String {
        match self.bounds() {
            Some((min, max)) => (min..=max).map(|position| self.read(position)).collect(),
            None => String::new(),
        }
    }

    /// Returns the blank symbol of this tape.
    pub fn blank(&self) -> Symbol {
        self.blank
    }

    /// Returns `true` if every cell is blank.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of non-blank cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if `position` holds a non-blank symbol.
    pub fn is_set(&self, position: i64) -> bool {
        self.cells.contains_key(&position)
    }

    /// The leftmost and rightmost non-blank positions, if any.
    pub fn bounds(&self) -> Option<(i64, i64)> {
        let min = self.cells.keys().min()?;
        let max = self.cells.keys().max()?;
        Some((*min, *max))
    }

    /// The non-blank cells ordered by position.
    pub fn cells(&self) -> Vec<(i64, Symbol)> {
        let mut cells: Vec<_> = self.cells.iter().map(|(&p, &s)| (p, s)).collect();
        cells.sort_unstable_by_key(|&(position, _)| position);
        cells
    }
}

impl fmt::Display for Tape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_unset_returns_blank() {
        let tape = Tape::new('B');

        assert_eq!(tape.read(0), 'B');
        assert_eq!(tape.read(-42), 'B');
        assert!(tape.is_empty());
    }

    #[test]
    fn test_write_blank_removes_cell() {
        let mut tape = Tape::from_string("101", '0');
        assert!(tape.is_set(0));

        tape.write(0, '0');

        assert_eq!(tape.read(0), '0');
        assert!(!tape.is_set(0));
        assert_eq!(tape.len(), 1);
    }

    #[test]
    fn test_from_string_skips_blank() {
        let tape = Tape::from_string("1B1", 'B');

        assert_eq!(tape.cells(), vec![(0, '1'), (2, '1')]);
        assert_eq!(tape.render(), "1B1");
    }

    #[test]
    fn test_render_fills_gaps_and_negative_positions() {
        let mut tape = Tape::new('_');
        tape.write(-2, 'a');
        tape.write(1, 'b');

        assert_eq!(tape.bounds(), Some((-2, 1)));
        assert_eq!(tape.render(), "a__b");
        assert_eq!(tape.to_string(), "a__b");
    }

    #[test]
    fn test_render_trims_leading_and_trailing_blanks() {
        let tape = Tape::from_string("BB11BB", 'B');

        assert_eq!(tape.render(), "11");
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(Tape::from_string("", 'B').render(), "");
        assert_eq!(Tape::from_string("BBB", 'B').render(), "");
    }

    #[test]
    fn test_overwrite() {
        let mut tape = Tape::from_string("a", '_');
        tape.write(0, 'z');

        assert_eq!(tape.read(0), 'z');
        assert_eq!(tape.len(), 1);
    }
}
