use std::collections::HashSet;

use crowbook_text_processing::escape;
use serde::Serialize;

use super::{
    symbol::{Symbol, SymbolSet, SymbolString},
    Grammar, EPSILON,
};

pub fn symbol_string_to_plaintext(string: &[Symbol]) -> String {
    string
        .iter()
        .map(|s| s.label())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn alternatives_to_plaintext(alternatives: &[SymbolString]) -> String {
    alternatives
        .iter()
        .map(|alternative| symbol_string_to_plaintext(alternative))
        .collect::<Vec<_>>()
        .join(" | ")
}

pub fn symbol_set_to_plaintext(set: &SymbolSet) -> String {
    set.iter().map(|s| s.label()).collect::<Vec<_>>().join(" ")
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductionOutput<'a> {
    pub left: &'a str,
    pub rights: Vec<Vec<&'a str>>,
}

impl ProductionOutput<'_> {
    pub fn to_plaintext(&self, left_width: usize, multiline: bool) -> String {
        self.rights
            .iter()
            .map(|right| right.join(" "))
            .enumerate()
            .map(|(i, right)| {
                if i == 0 {
                    format!("{:>width$} -> {}", self.left, right, width = left_width)
                } else if multiline {
                    format!("{:>width$}  | {}", "", right, width = left_width)
                } else {
                    format!(" | {}", right)
                }
            })
            .collect::<Vec<_>>()
            .join(if multiline { "\n" } else { "" })
    }

    pub fn to_latex(&self, and_sign: bool, terminal_set: &HashSet<&str>) -> String {
        if self.rights.is_empty() {
            return String::new();
        }

        let left = if and_sign {
            format!("{} & \\rightarrow &", escape::tex(self.left))
        } else {
            format!("{} \\rightarrow ", escape::tex(self.left))
        };
        let right = self
            .rights
            .iter()
            .map(|right| {
                right
                    .iter()
                    .map(|&s| {
                        if s == EPSILON {
                            "\\epsilon".to_string()
                        } else if terminal_set.contains(s) {
                            format!("\\text{{{}}}", escape::tex(s))
                        } else {
                            escape::tex(s).to_string()
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(" \\ ")
            })
            .collect::<Vec<_>>()
            .join(" \\mid ");

        left + &right
    }
}

#[derive(Serialize)]
pub struct ProductionOutputVec<'a> {
    productions: Vec<ProductionOutput<'a>>,
}

impl ProductionOutputVec<'_> {
    pub fn to_plaintext(&self) -> String {
        let left_max_len = self
            .productions
            .iter()
            .map(|p| p.left.len())
            .max()
            .unwrap_or(0);
        self.productions
            .iter()
            .map(|s| s.to_plaintext(left_max_len, true))
            .collect::<Vec<String>>()
            .join("\n")
    }

    pub fn to_latex(&self, terminal_set: &HashSet<&str>) -> String {
        std::iter::once("\\[\\begin{array}{cll}".to_string())
            .chain(
                self.productions
                    .iter()
                    .map(|s| s.to_latex(true, terminal_set)),
            )
            .chain(std::iter::once("\\end{array}\\]".to_string()))
            .collect::<Vec<String>>()
            .join("\\\\\n")
    }
}

impl Grammar {
    pub fn to_production_output_vec(&self) -> ProductionOutputVec<'_> {
        let productions = self
            .heads()
            .map(|head| ProductionOutput {
                left: head.label(),
                rights: self
                    .alternatives(head)
                    .iter()
                    .map(|alternative| alternative.iter().map(|s| s.label()).collect())
                    .collect(),
            })
            .collect();
        ProductionOutputVec { productions }
    }

    /// Labels of the grammar's terminals, for LaTeX `\text{}` wrapping.
    pub fn terminal_label_set(&self) -> HashSet<&str> {
        self.productions()
            .flat_map(|(_, body)| body.iter())
            .filter(|s| !s.is_epsilon() && self.is_terminal(s))
            .map(|s| s.label())
            .collect()
    }
}

#[derive(Serialize)]
struct NonTerminalOutput {
    name: String,
    nullable: bool,
    first: Vec<String>,
    follow: Vec<String>,
}

impl NonTerminalOutput {
    fn to_plaintext(&self) -> String {
        format!(
            "{} | {} | {} | {}",
            self.name,
            self.nullable,
            self.first.join(", "),
            self.follow.join(", ")
        )
    }

    fn to_latex(&self) -> String {
        fn f(a: &[String]) -> String {
            a.iter()
                .map(|s| {
                    if s == EPSILON {
                        r"$\epsilon$".to_string()
                    } else {
                        escape::tex(s.as_str()).to_string()
                    }
                })
                .collect::<Vec<_>>()
                .join(r"\ ")
        }

        format!(
            "{} & {} & {} & {}",
            escape::tex(self.name.as_str()),
            self.nullable,
            f(&self.first),
            f(&self.follow)
        )
    }
}

#[derive(Serialize)]
pub struct NonTerminalOutputVec {
    data: Vec<NonTerminalOutput>,
}

impl NonTerminalOutputVec {
    pub fn to_plaintext(&self) -> String {
        self.data
            .iter()
            .map(|s| s.to_plaintext())
            .collect::<Vec<String>>()
            .join("\n")
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn to_latex(&self) -> String {
        let content = self
            .data
            .iter()
            .map(|e| e.to_latex())
            .collect::<Vec<_>>()
            .join("\\\\\n ");

        "\\begin{tabular}{c|c|c|c}\n".to_string()
            + "Symbol & Nullable & First & Follow\\\\\\hline\n"
            + &content
            + "\\\\\n\\end{tabular}"
    }
}

impl Grammar {
    pub fn to_non_terminal_output_vec(&self) -> NonTerminalOutputVec {
        let nff = self.calculate_nullable_first_follow();
        let labels = |set: &SymbolSet| -> Vec<String> {
            set.iter().map(|s| s.label().to_string()).collect()
        };

        let data = self
            .heads()
            .map(|head| NonTerminalOutput {
                name: head.label().to_string(),
                nullable: nff.is_nullable(head),
                first: labels(&nff.first(head)),
                follow: labels(&nff.follow(head)),
            })
            .collect();
        NonTerminalOutputVec { data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::symbol::string;

    #[test]
    fn symbol_renderings() {
        assert_eq!(symbol_string_to_plaintext(&string("E + T")), "E + T");
        assert_eq!(
            alternatives_to_plaintext(&[string("B C"), string("D"), string("E F")]),
            "B C | D | E F"
        );
        assert_eq!(
            alternatives_to_plaintext(&[vec![Symbol::epsilon()]]),
            "empty"
        );
        let set: SymbolSet = string("id ( $").into_iter().collect();
        assert_eq!(symbol_set_to_plaintext(&set), "$ ( id");
    }

    #[test]
    fn production_listing() {
        let mut g = Grammar::new();
        g.set_alternatives("E".into(), vec![string("T E'")]);
        g.set_alternatives("E'".into(), vec![string("+ T E'"), vec![Symbol::epsilon()]]);

        assert_eq!(
            g.to_production_output_vec().to_plaintext(),
            " E -> T E'\nE' -> + T E'\n    | empty"
        );
        let latex = g.to_production_output_vec().to_latex(&g.terminal_label_set());
        assert!(latex.contains("\\text{+}"));
        assert!(latex.contains("\\epsilon"));
    }

    #[test]
    fn non_terminal_rows() {
        let mut g = Grammar::new();
        g.set_alternatives("S".into(), vec![string("A b")]);
        g.set_alternatives("A".into(), vec![string("a"), vec![Symbol::epsilon()]]);

        let t = g.to_non_terminal_output_vec();
        assert_eq!(t.to_plaintext(), "S | false | a, b | $\nA | true | a, empty | b");
        assert_eq!(
            t.to_json(),
            "{\"data\":[{\"name\":\"S\",\"nullable\":false,\"first\":[\"a\",\"b\"],\"follow\":[\"$\"]},\
             {\"name\":\"A\",\"nullable\":true,\"first\":[\"a\",\"empty\"],\"follow\":[\"b\"]}]}"
        );
    }
}
