//! # Display Indexes
//!
//! The [`NoteManager`](crate::manager::NoteManager) addresses notes by their
//! 0-based position in the collection. People count from one, so every
//! user-facing surface (arguments, prompts, listings) speaks in
//! [`DisplayIndex`] instead and converts at the boundary.
//!
//! Positions are derived from the current order and are never stored on a
//! note. Deleting a note shifts every later note down by one, so a position
//! read from a listing is only good until the next delete: re-list first.

use std::fmt;
use std::str::FromStr;

/// A 1-based, human-entered note number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DisplayIndex(usize);

impl DisplayIndex {
    /// Returns `None` for zero, which has no note.
    pub fn new(n: usize) -> Option<Self> {
        (n > 0).then_some(Self(n))
    }

    pub fn from_position(position: usize) -> Self {
        Self(position + 1)
    }

    /// The 0-based position the manager understands.
    pub fn position(self) -> usize {
        self.0 - 1
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for DisplayIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DisplayIndex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<usize>()
            .ok()
            .and_then(DisplayIndex::new)
            .ok_or_else(|| format!("Invalid note number: {}", s.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_human_numbers() {
        let idx: DisplayIndex = " 3 ".parse().unwrap();
        assert_eq!(idx.get(), 3);
        assert_eq!(idx.position(), 2);
        assert_eq!(idx.to_string(), "3");
    }

    #[test]
    fn rejects_zero_negative_and_text() {
        assert!("0".parse::<DisplayIndex>().is_err());
        assert!("-1".parse::<DisplayIndex>().is_err());
        assert!("two".parse::<DisplayIndex>().is_err());
        assert!("".parse::<DisplayIndex>().is_err());
    }

    #[test]
    fn converts_from_position() {
        assert_eq!(DisplayIndex::from_position(0).get(), 1);
        assert_eq!(DisplayIndex::from_position(4).position(), 4);
    }
}
