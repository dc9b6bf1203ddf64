use std::fmt;

use serde::Serialize;

use crate::grammar::{Symbol, END_MARK};

/// The atomic unit consumed by the parser: a grammar symbol plus the text it
/// matched. Parse tree nodes are created before their text is known, so the
/// lexeme is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub symbol: Symbol,
    pub lexeme: Option<String>,
}

impl Token {
    pub fn new(symbol: Symbol, lexeme: impl Into<String>) -> Self {
        Self {
            symbol,
            lexeme: Some(lexeme.into()),
        }
    }

    /// A token whose lexeme will be filled in later.
    pub fn pending(symbol: Symbol) -> Self {
        Self {
            symbol,
            lexeme: None,
        }
    }

    /// The token every input stream must end with.
    pub fn end_of_input() -> Self {
        Self::new(Symbol::end_marker(), END_MARK)
    }

    /// Shorthand for tokens whose lexeme is their symbol's label.
    pub fn literal(label: &str) -> Self {
        Self::new(Symbol::new(label), label)
    }

    pub fn lexeme(&self) -> Option<&str> {
        self.lexeme.as_deref()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.lexeme {
            Some(lexeme) if lexeme != self.symbol.label() => {
                write!(f, "{} \"{}\"", self.symbol, lexeme)
            }
            _ => write!(f, "{}", self.symbol),
        }
    }
}
