use crowbook_text_processing::escape::tex as escape_tex;
use serde::Serialize;
use std::collections::{btree_map::Entry, BTreeMap, HashSet};

use crate::error::{Error, Result};
use crate::Grammar;

use super::{
    nullable_first_follow::NullableFirstFollow,
    pretty_print::ProductionOutput,
    symbol::{Production, Symbol},
    END_MARK,
};

/// The (non-terminal, lookahead) -> production map driving an LL(1) parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PredictiveTable {
    entries: BTreeMap<(Symbol, Symbol), Production>,
}

impl PredictiveTable {
    pub fn get(&self, head: &Symbol, lookahead: &Symbol) -> Option<&Production> {
        self.entries.get(&(head.clone(), lookahead.clone()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &Symbol, &Production)> {
        self.entries
            .iter()
            .map(|((head, lookahead), production)| (head, lookahead, production))
    }

    /// Fills one cell. A cell may be written twice with the same production,
    /// never with two different ones.
    fn insert(&mut self, lookahead: &Symbol, production: &Production) -> Result<()> {
        match self
            .entries
            .entry((production.head.clone(), lookahead.clone()))
        {
            Entry::Occupied(cell) if cell.get() != production => Err(Error::Ambiguity {
                head: production.head.clone(),
                lookahead: lookahead.clone(),
                existing: cell.get().clone(),
                attempted: production.clone(),
            }),
            Entry::Occupied(_) => Ok(()),
            Entry::Vacant(cell) => {
                cell.insert(production.clone());
                Ok(())
            }
        }
    }
}

impl Grammar {
    /// Builds the predictive table, failing on the first cell that would hold
    /// two different productions (the grammar is not LL(1)).
    pub fn generate_ll1_parsing_table(&self) -> Result<PredictiveTable> {
        self.generate_ll1_parsing_table_with(&self.calculate_nullable_first_follow())
    }

    pub fn generate_ll1_parsing_table_with(
        &self,
        nff: &NullableFirstFollow,
    ) -> Result<PredictiveTable> {
        let end_mark = Symbol::end_marker();
        let mut table = PredictiveTable::default();

        for (head, alternative) in self.productions() {
            let production = Production::new(head.clone(), alternative.clone());
            let first_alt = nff.first_of(alternative);

            for a in first_alt.iter().filter(|a| !a.is_epsilon()) {
                table.insert(a, &production)?;
            }

            if first_alt.contains(&Symbol::epsilon()) {
                let follow_head = nff.follow(head);
                for b in follow_head
                    .iter()
                    .filter(|b| !b.is_epsilon() && !b.is_end_marker())
                {
                    table.insert(b, &production)?;
                }
                if follow_head.contains(&end_mark) {
                    table.insert(&end_mark, &production)?;
                }
            }
        }
        Ok(table)
    }
}

#[derive(Serialize)]
pub struct LL1ParsingTable<'a> {
    terminals: Vec<&'a str>,
    rows: Vec<(&'a str, Vec<ProductionOutput<'a>>)>,
}

impl LL1ParsingTable<'_> {
    pub fn to_plaintext(&self) -> String {
        let mut header: Vec<String> = vec![String::new()];
        header.extend(self.terminals.iter().map(|&t| t.to_string()));
        let mut output: Vec<Vec<String>> = vec![header];
        for (left, row) in &self.rows {
            let mut line: Vec<String> = vec![left.to_string()];
            line.extend(
                row.iter()
                    .map(|productions| productions.to_plaintext(left.len(), false)),
            );
            output.push(line);
        }

        let width: Vec<usize> = (0..output[0].len())
            .map(|j| output.iter().map(|line| line[j].len()).max().unwrap_or(0))
            .collect();
        output
            .iter()
            .map(|line| {
                line.iter()
                    .enumerate()
                    .map(|(i, s)| format!("{:>width$}", s, width = width[i]))
                    .collect::<Vec<_>>()
                    .join(" | ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_latex(&self) -> String {
        let mut header: Vec<String> = vec![format!(
            "\\[\\begin{{array}}{{c{}}}\n",
            "|l".repeat(self.terminals.len()),
        )];
        header.extend(
            self.terminals
                .iter()
                .map(|&t| format!("\\text{{{}}}", escape_tex(t))),
        );
        let header = header.join(" & ");

        let mut output: Vec<String> = Vec::new();
        let terminal_set: HashSet<&str> = self.terminals.iter().cloned().collect();
        for (left, row) in &self.rows {
            let mut line: Vec<String> = vec![format!("{}", escape_tex(*left))];
            line.extend(
                row.iter()
                    .map(|productions| productions.to_latex(false, &terminal_set)),
            );
            output.push(line.join(" & "));
        }

        let output = output.join("\\\\\n");

        header + "\\\\\\hline\n" + &output + "\n\\end{array}\\]"
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl PredictiveTable {
    /// Lays the table out as a grid: one row per head, one column per terminal.
    pub fn to_output<'a>(&'a self, grammar: &'a Grammar) -> LL1ParsingTable<'a> {
        let mut terminals: Vec<&str> = grammar
            .productions()
            .flat_map(|(_, body)| body.iter())
            .filter(|s| !s.is_epsilon() && !s.is_end_marker() && grammar.is_terminal(s))
            .map(|s| s.label())
            .collect();
        terminals.sort();
        terminals.dedup();
        terminals.push(END_MARK);

        let rows = grammar
            .heads()
            .map(|head| {
                let left = head.label();
                let row = terminals
                    .iter()
                    .map(|&t| ProductionOutput {
                        left,
                        rights: self
                            .get(head, &Symbol::new(t))
                            .map(|p| vec![p.body.iter().map(|s| s.label()).collect()])
                            .unwrap_or_default(),
                    })
                    .collect();
                (left, row)
            })
            .collect();

        LL1ParsingTable { terminals, rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::symbol::string;

    fn production(head: &str, body: &str) -> Production {
        Production::new(head.into(), string(body))
    }

    #[test]
    fn simple_grammar() {
        let mut g = Grammar::new();
        g.set_alternatives("S".into(), vec![string("F"), string("( S + F )")]);
        g.set_alternatives("F".into(), vec![string("a")]);

        let table = g.generate_ll1_parsing_table().unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(&"S".into(), &"a".into()), Some(&production("S", "F")));
        assert_eq!(
            table.get(&"S".into(), &"(".into()),
            Some(&production("S", "( S + F )"))
        );
        assert_eq!(table.get(&"F".into(), &"a".into()), Some(&production("F", "a")));
        assert_eq!(table.get(&"F".into(), &"(".into()), None);
    }

    #[test]
    fn conflicting_first_sets() {
        let mut g = Grammar::new();
        g.set_alternatives("S".into(), vec![string("a b"), string("a c")]);

        match g.generate_ll1_parsing_table() {
            Err(Error::Ambiguity {
                head,
                lookahead,
                existing,
                attempted,
            }) => {
                assert_eq!(head, Symbol::new("S"));
                assert_eq!(lookahead, Symbol::new("a"));
                assert_eq!(existing, production("S", "a b"));
                assert_eq!(attempted, production("S", "a c"));
            }
            other => panic!("expected an ambiguity, got {:?}", other),
        }
    }

    #[test]
    fn plaintext_grid() {
        let mut g = Grammar::new();
        g.set_alternatives("S".into(), vec![string("a S"), vec![Symbol::epsilon()]]);

        let table = g.generate_ll1_parsing_table().unwrap();
        let output = table.to_output(&g);
        assert_eq!(output.terminals, vec!["a", "$"]);
        assert_eq!(
            output.to_plaintext(),
            "  |        a |          $\nS | S -> a S | S -> empty"
        );
        assert!(output.to_json().starts_with("{\"terminals\":[\"a\",\"$\"]"));
    }
}
