use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use super::{END_MARK, EPSILON};

/// A grammar symbol, identified by its label alone.
///
/// Whether a symbol is a terminal is not a property of the symbol: it is a
/// terminal in a grammar iff that grammar has no alternatives for it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Symbol(String);

pub type SymbolString = Vec<Symbol>;
pub type Alternatives = Vec<SymbolString>;
pub type SymbolSet = BTreeSet<Symbol>;

impl Symbol {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn epsilon() -> Self {
        Self::new(EPSILON)
    }

    pub fn end_marker() -> Self {
        Self::new(END_MARK)
    }

    pub fn label(&self) -> &str {
        &self.0
    }

    pub fn is_epsilon(&self) -> bool {
        self.0 == EPSILON
    }

    pub fn is_end_marker(&self) -> bool {
        self.0 == END_MARK
    }
}

impl From<&str> for Symbol {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Builds a symbol string from space separated labels, e.g. `string("T E'")`.
pub fn string(labels: &str) -> SymbolString {
    labels.split_whitespace().map(Symbol::new).collect()
}

/// True for `[empty]` and for the zero-length string.
pub fn is_empty_body(body: &[Symbol]) -> bool {
    match body {
        [] => true,
        [only] => only.is_epsilon(),
        _ => false,
    }
}

/// One alternative of a head, the unit stored in a predictive table cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Production {
    pub head: Symbol,
    pub body: SymbolString,
}

impl Production {
    pub fn new(head: Symbol, body: SymbolString) -> Self {
        Self { head, body }
    }

    /// Body symbols that end up on the parse stack, left to right.
    pub fn pushed_symbols(&self) -> impl DoubleEndedIterator<Item = &Symbol> {
        self.body.iter().filter(|s| !s.is_epsilon())
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}",
            self.head,
            super::pretty_print::symbol_string_to_plaintext(&self.body)
        )
    }
}
