use std::collections::BTreeMap;

use super::{
    symbol::{is_empty_body, Symbol, SymbolSet},
    Grammar,
};

pub type SymbolSetMap = BTreeMap<Symbol, SymbolSet>;

/// Derived sets of a grammar, computed together so callers can cache them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NullableFirstFollow {
    pub nullable: SymbolSet,
    pub first: SymbolSetMap,
    pub follow: SymbolSetMap,
}

impl NullableFirstFollow {
    pub fn is_nullable(&self, symbol: &Symbol) -> bool {
        self.nullable.contains(symbol)
    }

    /// FIRST of a single symbol. Symbols unknown to the analysis are terminals.
    pub fn first(&self, symbol: &Symbol) -> SymbolSet {
        self.first
            .get(symbol)
            .cloned()
            .unwrap_or_else(|| SymbolSet::from([symbol.clone()]))
    }

    pub fn first_of(&self, string: &[Symbol]) -> SymbolSet {
        first_of_string(&self.first, string)
    }

    pub fn follow(&self, symbol: &Symbol) -> SymbolSet {
        self.follow.get(symbol).cloned().unwrap_or_default()
    }
}

/// FIRST of a symbol string; epsilon is kept only when every symbol can
/// derive empty.
fn first_of_string(first: &SymbolSetMap, string: &[Symbol]) -> SymbolSet {
    let epsilon = Symbol::epsilon();
    let mut result = SymbolSet::new();
    for symbol in string {
        let blocks = match first.get(symbol) {
            Some(symbol_first) => {
                result.extend(symbol_first.iter().filter(|s| **s != epsilon).cloned());
                !symbol_first.contains(&epsilon)
            }
            None => {
                if !symbol.is_epsilon() {
                    result.insert(symbol.clone());
                }
                !symbol.is_epsilon()
            }
        };
        if blocks {
            return result;
        }
    }
    result.insert(epsilon);
    result
}

impl Grammar {
    pub fn calculate_nullable_first_follow(&self) -> NullableFirstFollow {
        let nullable = self.empty_producing_symbols();
        let first = self.calculate_first(&nullable);
        let follow = self.calculate_follow(&first);
        NullableFirstFollow {
            nullable,
            first,
            follow,
        }
    }

    /// Symbols deriving the empty string, directly or transitively. Always
    /// contains epsilon itself.
    ///
    /// Saturates forward from the empty alternatives instead of searching
    /// down from each symbol, so cycles like `A -> B, B -> A` terminate and
    /// are left out.
    pub fn empty_producing_symbols(&self) -> SymbolSet {
        let mut result = SymbolSet::from([Symbol::epsilon()]);
        let mut pending: Vec<(&Symbol, &Vec<Symbol>)> = self.productions().collect();

        let mut changed = true;
        while changed {
            changed = false;
            pending.retain(|(head, body)| {
                if is_empty_body(body) || body.iter().all(|s| result.contains(s)) {
                    changed |= result.insert((*head).clone());
                    false
                } else {
                    true
                }
            });
        }
        result
    }

    pub fn has_empty_production(&self, symbol: &Symbol) -> bool {
        self.empty_producing_symbols().contains(symbol)
    }

    pub fn first_sets(&self) -> SymbolSetMap {
        self.calculate_nullable_first_follow().first
    }

    /// `{symbol}` for terminals, even ones no body mentions.
    pub fn first(&self, symbol: &Symbol) -> SymbolSet {
        self.calculate_nullable_first_follow().first(symbol)
    }

    pub fn first_of(&self, string: &[Symbol]) -> SymbolSet {
        self.calculate_nullable_first_follow().first_of(string)
    }

    pub fn follow_sets(&self) -> SymbolSetMap {
        self.calculate_nullable_first_follow().follow
    }

    pub fn follow(&self, symbol: &Symbol) -> SymbolSet {
        self.calculate_nullable_first_follow().follow(symbol)
    }

    fn calculate_first(&self, nullable: &SymbolSet) -> SymbolSetMap {
        let epsilon = Symbol::epsilon();
        let mut first = SymbolSetMap::new();

        // terminals never change, seed them once
        for (_, body) in self.productions() {
            for symbol in body.iter().filter(|s| self.is_terminal(s)) {
                first
                    .entry(symbol.clone())
                    .or_insert_with(|| SymbolSet::from([symbol.clone()]));
            }
        }
        for head in self.heads() {
            let mut seed = SymbolSet::new();
            if nullable.contains(head) {
                seed.insert(epsilon.clone());
            }
            first.insert(head.clone(), seed);
        }

        let mut changed = true;
        while changed {
            changed = false;
            for head in self.heads() {
                let mut additions = SymbolSet::new();
                for body in self.alternatives(head) {
                    for symbol in body {
                        let symbol_first = &first[symbol];
                        additions.extend(symbol_first.iter().filter(|s| **s != epsilon).cloned());
                        if !symbol_first.contains(&epsilon) {
                            break;
                        }
                    }
                }

                let head_first = first.entry(head.clone()).or_default();
                let before = head_first.len();
                head_first.extend(additions);
                changed |= head_first.len() != before;
            }
        }
        first
    }

    fn calculate_follow(&self, first: &SymbolSetMap) -> SymbolSetMap {
        let epsilon = Symbol::epsilon();
        let mut follow: SymbolSetMap = self
            .heads()
            .map(|head| (head.clone(), SymbolSet::new()))
            .collect();

        if let Some(start) = self.start_symbol() {
            if let Some(start_follow) = follow.get_mut(start) {
                start_follow.insert(Symbol::end_marker());
            }
        }

        let mut changed = true;
        while changed {
            changed = false;
            for (head, body) in self.productions() {
                for (i, symbol) in body.iter().enumerate() {
                    if self.is_terminal(symbol) {
                        continue;
                    }

                    let mut additions = first_of_string(first, &body[i + 1..]);
                    if additions.remove(&epsilon) {
                        additions.extend(follow[head].iter().cloned());
                    }

                    let symbol_follow = follow.entry(symbol.clone()).or_default();
                    let before = symbol_follow.len();
                    symbol_follow.extend(additions);
                    changed |= symbol_follow.len() != before;
                }
            }
        }
        follow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::symbol::string;

    fn set(labels: &str) -> SymbolSet {
        labels.split_whitespace().map(Symbol::new).collect()
    }

    fn empty() -> Vec<Symbol> {
        vec![Symbol::epsilon()]
    }

    #[test]
    fn single_empty_symbol() {
        let mut g = Grammar::new();
        g.set_alternatives("A".into(), vec![empty()]);
        assert!(g.has_empty_production(&"A".into()));
    }

    #[test]
    fn single_terminal() {
        let mut g = Grammar::new();
        g.set_alternatives("A".into(), vec![string("B")]);
        assert!(!g.has_empty_production(&"A".into()));
    }

    #[test]
    fn terminal_or_empty() {
        let mut g = Grammar::new();
        g.set_alternatives("A".into(), vec![string("B"), empty()]);
        assert!(g.has_empty_production(&"A".into()));
    }

    #[test]
    fn two_level() {
        let mut g = Grammar::new();
        g.set_alternatives("A".into(), vec![string("B")]);
        g.set_alternatives("B".into(), vec![empty()]);
        assert!(g.has_empty_production(&"A".into()));
        assert!(g.has_empty_production(&"B".into()));
    }

    #[test]
    fn simple_circular() {
        let mut g = Grammar::new();
        g.set_alternatives("A".into(), vec![string("B")]);
        g.set_alternatives("B".into(), vec![string("A")]);
        assert_eq!(g.empty_producing_symbols(), set("empty"));
    }

    #[test]
    fn circular_with_empty() {
        let mut g = Grammar::new();
        g.set_alternatives("A".into(), vec![string("B"), empty()]);
        g.set_alternatives("B".into(), vec![string("A"), empty()]);
        g.set_alternatives("C".into(), vec![string("D")]);
        g.set_alternatives("D".into(), vec![string("C")]);
        g.set_alternatives("E".into(), vec![string("C")]);
        assert_eq!(g.empty_producing_symbols(), set("A B empty"));
    }

    #[test]
    fn multiple_symbol_strings() {
        let mut g = Grammar::new();
        g.set_alternatives("A".into(), vec![string("B"), empty()]);
        g.set_alternatives("B".into(), vec![string("B A"), string("A"), empty()]);
        g.set_alternatives("C".into(), vec![string("D"), string("D D"), string("D B")]);
        g.set_alternatives("D".into(), vec![string("C"), string("C A")]);
        g.set_alternatives("E".into(), vec![string("C"), string("C A")]);
        assert_eq!(g.empty_producing_symbols(), set("A B empty"));
    }

    #[test]
    fn unresolved_symbols_are_revisited() {
        // X is only known to be nullable after Y, which is registered later.
        let mut g = Grammar::new();
        g.set_alternatives("X".into(), vec![string("Y Y")]);
        g.set_alternatives("Y".into(), vec![string("y"), empty()]);
        assert!(g.has_empty_production(&"X".into()));
    }

    #[test]
    fn first_of_terminal_is_itself() {
        let mut g = Grammar::new();
        g.set_alternatives("S".into(), vec![string("a")]);
        assert_eq!(g.first(&"a".into()), set("a"));
        assert_eq!(g.first(&"zzz".into()), set("zzz"));
        assert_eq!(g.first(&Symbol::epsilon()), set("empty"));
    }

    #[test]
    fn first_stops_at_blocking_symbol() {
        let mut g = Grammar::new();
        g.set_alternatives("S".into(), vec![string("A B c d")]);
        g.set_alternatives("A".into(), vec![string("a"), empty()]);
        g.set_alternatives("B".into(), vec![string("b"), empty()]);
        assert_eq!(g.first(&"S".into()), set("a b c"));
        assert_eq!(g.first_of(&string("A B")), set("a b empty"));
        assert_eq!(g.first_of(&string("A d B")), set("a d"));
        assert_eq!(g.first_of(&[]), set("empty"));
    }

    #[test]
    fn follow_of_repeated_occurrences() {
        let mut g = Grammar::new();
        g.set_alternatives("S".into(), vec![string("A x A y")]);
        g.set_alternatives("A".into(), vec![string("a")]);
        assert_eq!(g.follow(&"A".into()), set("x y"));
        assert_eq!(g.follow(&"S".into()), set("$"));
    }

    #[test]
    fn follow_inherits_through_nullable_suffix() {
        let mut g = Grammar::new();
        g.set_alternatives("S".into(), vec![string("A B")]);
        g.set_alternatives("A".into(), vec![string("a")]);
        g.set_alternatives("B".into(), vec![string("b"), empty()]);
        assert_eq!(g.follow(&"A".into()), set("$ b"));
        assert_eq!(g.follow(&"B".into()), set("$"));
    }

    #[test]
    fn cached_sets_answer_like_the_grammar() {
        let mut g = Grammar::new();
        g.set_alternatives("S".into(), vec![string("A s")]);
        g.set_alternatives("A".into(), vec![string("a"), empty()]);
        let nff = g.calculate_nullable_first_follow();

        assert!(nff.is_nullable(&"A".into()));
        assert!(!nff.is_nullable(&"S".into()));
        assert_eq!(nff.first(&"S".into()), g.first(&"S".into()));
        assert_eq!(nff.first(&"s".into()), set("s"));
        assert_eq!(nff.first_of(&string("A A")), set("a empty"));
        assert_eq!(nff.follow(&"A".into()), set("s"));
        assert_eq!(nff, g.calculate_nullable_first_follow());
        assert_eq!(g.first_sets(), nff.first);
        assert_eq!(g.follow_sets(), nff.follow);
        assert_eq!(g.first_of(&string("A s")), nff.first_of(&string("A s")));
        assert_eq!(g.follow(&"A".into()), nff.follow(&"A".into()));
        assert_eq!(g.first(&"unused".into()), set("unused"));
    }
}
