//! Table-driven predictive parsing.
//!
//! Both output modes run the same stack machine. The stack starts as
//! `[$, start]`; at each step the top `X` is compared with the current
//! token `a`:
//!
//! - `X == a`: the terminal is matched, popped, and the input advances;
//! - `X` is another terminal: the parse fails;
//! - otherwise the table entry for `(X, a)` replaces `X` by its body, pushed
//!   right to left so the leftmost symbol is on top. Epsilon is never pushed.
//!
//! The loop stops when `$` is on top.

pub mod tree;

use crate::error::{Error, Result};
use crate::grammar::{Grammar, PredictiveTable, Production, Symbol};
use crate::token::Token;

use tree::{NodeId, ParseTree};

/// What the trace visitor is told about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseEvent<'a> {
    Match(&'a Token),
    Apply(&'a Production),
}

/// Receives the parse as it happens. `Slot` is whatever the sink wants to
/// keep on the stack next to each symbol.
trait ParseSink {
    type Slot: Copy;

    /// Slot of the start symbol.
    fn root(&self) -> Self::Slot;

    fn matched(&mut self, slot: Self::Slot, token: &Token);

    /// Returns one slot per pushed body symbol, left to right.
    fn applied(&mut self, slot: Self::Slot, production: &Production) -> Result<Vec<Self::Slot>>;
}

struct TraceSink<V> {
    visitor: V,
}

impl<V> ParseSink for TraceSink<V>
where
    V: FnMut(ParseEvent<'_>),
{
    type Slot = ();

    fn root(&self) {}

    fn matched(&mut self, _slot: (), token: &Token) {
        (self.visitor)(ParseEvent::Match(token));
    }

    fn applied(&mut self, _slot: (), production: &Production) -> Result<Vec<()>> {
        (self.visitor)(ParseEvent::Apply(production));
        Ok(production.pushed_symbols().map(|_| ()).collect())
    }
}

struct TreeSink {
    tree: ParseTree,
}

impl ParseSink for TreeSink {
    type Slot = NodeId;

    fn root(&self) -> NodeId {
        self.tree.root()
    }

    /// A token without a lexeme still marks its node as matched, under the
    /// symbol's own label.
    fn matched(&mut self, slot: NodeId, token: &Token) {
        let lexeme = token.lexeme().unwrap_or_else(|| token.symbol.label());
        self.tree.set_lexeme(slot, lexeme);
    }

    fn applied(&mut self, slot: NodeId, production: &Production) -> Result<Vec<NodeId>> {
        let children: Vec<NodeId> = production
            .pushed_symbols()
            .map(|symbol| self.tree.add_node(Token::pending(symbol.clone()), Some(slot)))
            .collect();
        self.tree.set_children(slot, children.clone())?;
        Ok(children)
    }
}

pub struct PredictiveParser<'a> {
    grammar: &'a Grammar,
    table: &'a PredictiveTable,
}

impl<'a> PredictiveParser<'a> {
    pub fn new(grammar: &'a Grammar, table: &'a PredictiveTable) -> Self {
        Self { grammar, table }
    }

    /// Parses `tokens`, reporting every matched terminal and applied
    /// production to `visitor` in order.
    pub fn trace<I, V>(&self, tokens: I, visitor: V) -> Result<()>
    where
        I: IntoIterator<Item = Token>,
        V: FnMut(ParseEvent<'_>),
    {
        self.run(tokens, &mut TraceSink { visitor })
    }

    /// Parses `tokens` into a concrete syntax tree rooted at the start symbol.
    pub fn parse_tree<I>(&self, tokens: I) -> Result<ParseTree>
    where
        I: IntoIterator<Item = Token>,
    {
        let start = self.grammar.start_symbol().ok_or(Error::EmptyGrammar)?;
        let mut sink = TreeSink {
            tree: ParseTree::new(Token::pending(start.clone())),
        };
        self.run(tokens, &mut sink)?;
        Ok(sink.tree)
    }

    fn run<I, S>(&self, tokens: I, sink: &mut S) -> Result<()>
    where
        I: IntoIterator<Item = Token>,
        S: ParseSink,
    {
        let start = self.grammar.start_symbol().ok_or(Error::EmptyGrammar)?;
        let end_mark = Symbol::end_marker();

        // an exhausted stream reads as the end marker
        let mut input = tokens.into_iter();
        let mut next = move || input.next().unwrap_or_else(Token::end_of_input);
        let mut current = next();

        let root = sink.root();
        let mut stack: Vec<(Symbol, S::Slot)> =
            vec![(end_mark.clone(), root), (start.clone(), root)];

        while let Some((top, slot)) = stack.pop() {
            if top == end_mark {
                break;
            }

            if top == current.symbol {
                sink.matched(slot, &current);
                current = next();
            } else if self.grammar.is_terminal(&top) {
                return Err(Error::TerminalMismatch {
                    expected: top,
                    found: current,
                });
            } else {
                let production = match self.table.get(&top, &current.symbol) {
                    Some(production) => production,
                    None => {
                        return Err(Error::NoProduction {
                            non_terminal: top,
                            found: current,
                        })
                    }
                };
                let children = sink.applied(slot, production)?;
                let entries: Vec<(Symbol, S::Slot)> = production
                    .pushed_symbols()
                    .cloned()
                    .zip(children)
                    .collect();
                stack.extend(entries.into_iter().rev());
            }
        }

        if current.symbol != end_mark {
            return Err(Error::TrailingInput { found: current });
        }
        Ok(())
    }
}
