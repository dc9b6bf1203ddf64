use thiserror::Error;

use crate::grammar::{Production, Symbol};
use crate::token::Token;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("ambiguity at [{head}, {lookahead}]: already mapped to \"{existing}\" but tried to insert \"{attempted}\"")]
    Ambiguity {
        head: Symbol,
        lookahead: Symbol,
        existing: Production,
        attempted: Production,
    },

    #[error("expected terminal {expected}, found {found}")]
    TerminalMismatch { expected: Symbol, found: Token },

    #[error("no production for {non_terminal} on lookahead {found}")]
    NoProduction { non_terminal: Symbol, found: Token },

    #[error("input continues after the parse finished: {found}")]
    TrailingInput { found: Token },

    #[error("node {child} cannot become a child of node {parent}")]
    InvalidChild { parent: usize, child: usize },

    #[error("grammar has no start symbol")]
    EmptyGrammar,

    #[error("no pattern matches {character:?} at offset {offset}")]
    NoMatch { offset: usize, character: char },

    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Line {line}: {message}")]
    GrammarSyntax { line: usize, message: String },
}
