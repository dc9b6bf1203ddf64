use crate::error::{Error, Result};
use crate::Grammar;

use super::symbol::{Alternatives, Symbol};

fn syntax_error(line: usize, message: &str) -> Error {
    Error::GrammarSyntax {
        line,
        message: message.to_string(),
    }
}

fn parse_symbol(s: &str) -> Symbol {
    match s {
        "ε" | "ϵ" => Symbol::epsilon(),
        _ => Symbol::new(s),
    }
}

impl Grammar {
    /// Reads the textual grammar format: one `Head -> a B | c` per line,
    /// continuation lines starting with `|` extend the previous head.
    pub fn parse(grammar: &str) -> Result<Self> {
        let mut raw_productions: Vec<(Symbol, Alternatives)> = Vec::new();

        let mut previous_left: Option<usize> = None;
        for (i, line) in grammar.lines().enumerate() {
            if line.chars().all(|c| c.is_whitespace()) {
                continue;
            }
            let parts: Vec<&str> = line.split("->").collect();
            if parts.len() > 2 {
                return Err(syntax_error(i + 1, "too many \"->\""));
            }
            let (left, rights): (usize, &str) = if parts.len() == 2 {
                let left_str = parts[0].trim();
                if left_str.is_empty() {
                    return Err(syntax_error(i + 1, "empty left side"));
                } else if left_str.split_whitespace().count() != 1 {
                    return Err(syntax_error(i + 1, "left side contains whitespace"));
                }
                let head = parse_symbol(left_str);
                let idx = match raw_productions.iter().position(|(h, _)| *h == head) {
                    Some(idx) => idx,
                    None => {
                        raw_productions.push((head, Vec::new()));
                        raw_productions.len() - 1
                    }
                };
                (idx, parts[1])
            } else if let Some(idx) = previous_left {
                match parts[0].trim().strip_prefix('|') {
                    Some(rest) => (idx, rest),
                    None => return Err(syntax_error(i + 1, "expected \"->\" or \"|\"")),
                }
            } else {
                return Err(syntax_error(i + 1, "cannot find left side"));
            };

            previous_left = Some(left);

            for right in rights.split('|') {
                let alternative: Vec<Symbol> = right.split_whitespace().map(parse_symbol).collect();
                raw_productions[left].1.push(alternative);
            }
        }

        let mut g = Self::new();
        for (head, alternatives) in raw_productions {
            g.set_alternatives(head, alternatives);
        }
        Ok(g)
    }
}

#[cfg(test)]
mod tests {
    use crate::grammar::symbol::{string, Symbol};
    use crate::Grammar;

    #[test]
    fn simple_parse() {
        let g = Grammar::parse("S -> a").unwrap();

        assert_eq!(g.start_symbol(), Some(&Symbol::new("S")));
        assert!(g.is_terminal(&"a".into()));
        assert_eq!(g.alternatives(&"S".into()), &[string("a")]);
    }

    #[test]
    fn simple_parse_with_space_and_newline() {
        let g = Grammar::parse("  S -> a \n | b c").unwrap();

        assert_eq!(g.alternatives(&"S".into()), &[string("a"), string("b c")]);
    }

    #[test]
    fn epsilon_spellings() {
        let g = Grammar::parse("A -> a A | empty\nB -> b | ε\nC -> ϵ").unwrap();

        for head in ["A", "B", "C"] {
            assert!(g.has_empty_production(&head.into()), "{}", head);
        }
        assert_eq!(g.alternatives(&"C".into()), &[vec![Symbol::epsilon()]]);
    }

    #[test]
    fn repeated_head_extends_alternatives() {
        let g = Grammar::parse("S -> a\nT -> t\nS -> b").unwrap();

        assert_eq!(g.alternatives(&"S".into()), &[string("a"), string("b")]);
        assert_eq!(g.heads().cloned().collect::<Vec<_>>(), string("S T"));
    }

    #[test]
    fn empty_parse() {
        let g = Grammar::parse("  \n  ").unwrap();
        assert!(g.start_symbol().is_none());
    }

    #[test]
    #[should_panic]
    fn two_rightarrows_parse() {
        let _g = Grammar::parse("S -> a -> b").unwrap();
    }

    #[test]
    #[should_panic]
    fn no_left_parse() {
        let _g = Grammar::parse("-> a").unwrap();
    }

    #[test]
    #[should_panic]
    fn no_previous_left_parse() {
        let _g = Grammar::parse("| a b\n S -> a").unwrap();
    }

    #[test]
    #[should_panic]
    fn left_contain_space() {
        let _g = Grammar::parse("S a S -> x").unwrap();
    }

    #[test]
    fn error_reports_line() {
        let err = Grammar::parse("S -> a\n\nb c").unwrap_err();
        assert_eq!(err.to_string(), "Line 3: expected \"->\" or \"|\"");
    }
}
