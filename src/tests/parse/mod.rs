//! Tests for matching input against a `Grammar`.
//!
//! Every test module runs twice: once against the grammar as compiled and
//! once against the grammar after a round trip through its JSON description.

use crate::{Grammar, Position};

mod projection;

/// Uses a grammar as compiled.
pub fn compiled(grammar: Grammar) -> Grammar {
    grammar
}

/// Rebuilds a grammar from its JSON description.
pub fn reloaded(grammar: Grammar) -> Grammar {
    Grammar::from_json_value(grammar.to_json()).unwrap()
}

pub fn pos(offset: usize, line: usize, column: usize) -> Position {
    Position { offset, line, column }
}
