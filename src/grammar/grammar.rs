use std::collections::HashMap;

use super::symbol::{Alternatives, Production, Symbol, SymbolSet, SymbolString};

#[derive(Debug, Clone, Default)]
pub struct Grammar {
    heads: Vec<Symbol>,
    productions: HashMap<Symbol, Alternatives>,
    start_symbol: Option<Symbol>,
}

impl Grammar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the alternatives of `head`, replacing any previous ones.
    /// The first head ever registered becomes the start symbol.
    pub fn set_alternatives(&mut self, head: Symbol, alternatives: Alternatives) {
        if self.start_symbol.is_none() {
            self.start_symbol = Some(head.clone());
        }
        if !self.productions.contains_key(&head) {
            self.heads.push(head.clone());
        }
        self.productions.insert(head, alternatives);
    }

    /// Alternatives registered for `symbol`; empty for terminals.
    pub fn alternatives(&self, symbol: &Symbol) -> &[SymbolString] {
        self.productions
            .get(symbol)
            .map(|alternatives| alternatives.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_terminal(&self, symbol: &Symbol) -> bool {
        !self.productions.contains_key(symbol)
    }

    pub fn start_symbol(&self) -> Option<&Symbol> {
        self.start_symbol.as_ref()
    }

    /// Non-terminals in registration order.
    pub fn heads(&self) -> impl Iterator<Item = &Symbol> {
        self.heads.iter()
    }

    /// Every `(head, alternative)` pair, heads in registration order.
    pub fn productions(&self) -> impl Iterator<Item = (&Symbol, &SymbolString)> {
        self.heads
            .iter()
            .flat_map(move |head| self.alternatives(head).iter().map(move |alt| (head, alt)))
    }

    pub fn production_list(&self) -> Vec<Production> {
        self.productions()
            .map(|(head, body)| Production::new(head.clone(), body.clone()))
            .collect()
    }

    /// Terminals appearing in any body, epsilon excluded.
    pub fn terminals(&self) -> SymbolSet {
        self.productions()
            .flat_map(|(_, body)| body.iter())
            .filter(|s| !s.is_epsilon() && self.is_terminal(s))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::symbol::string;

    #[test]
    fn first_registration_fixes_start_symbol() {
        let mut g = Grammar::new();
        g.set_alternatives("S".into(), vec![string("a B")]);
        g.set_alternatives("B".into(), vec![string("b")]);
        g.set_alternatives("S".into(), vec![string("B")]);

        assert_eq!(g.start_symbol(), Some(&Symbol::new("S")));
        assert_eq!(g.alternatives(&"S".into()), &[string("B")]);
        assert_eq!(g.heads().count(), 2);
    }

    #[test]
    fn unregistered_symbols_are_terminals() {
        let mut g = Grammar::new();
        g.set_alternatives("S".into(), vec![string("a S"), vec![Symbol::epsilon()]]);

        assert!(!g.is_terminal(&"S".into()));
        assert!(g.is_terminal(&"a".into()));
        assert!(g.is_terminal(&"never-mentioned".into()));
        assert!(g.alternatives(&"a".into()).is_empty());
        assert_eq!(g.terminals().into_iter().collect::<Vec<_>>(), vec![Symbol::new("a")]);
    }

    #[test]
    fn productions_follow_registration_order() {
        let mut g = Grammar::new();
        g.set_alternatives("Z".into(), vec![string("A"), string("z")]);
        g.set_alternatives("A".into(), vec![string("a")]);

        let listed: Vec<String> = g.production_list().iter().map(|p| p.to_string()).collect();
        assert_eq!(listed, vec!["Z -> A", "Z -> z", "A -> a"]);
    }

    #[test]
    fn empty_grammar_has_no_start_symbol() {
        let g = Grammar::new();
        assert!(g.start_symbol().is_none());
        assert_eq!(g.productions().count(), 0);
    }
}
