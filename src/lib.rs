extern crate wasm_bindgen;

use wasm_bindgen::prelude::*;

pub mod error;
pub mod grammar;
pub mod lexer;
pub mod parser;
pub mod token;

pub use error::{Error, Result};
pub use grammar::{Grammar, PredictiveTable, Production, Symbol};
pub use lexer::{Lexer, NoMatchPolicy};
pub use parser::{tree::ParseTree, ParseEvent, PredictiveParser};
pub use token::Token;

fn error_to_json(e: &Error) -> String {
    serde_json::json!({ "error": e.to_string() }).to_string()
}

#[wasm_bindgen]
pub fn nullable_first_follow_to_json(grammar: &str) -> String {
    match crate::Grammar::parse(grammar) {
        Ok(g) => g.to_non_terminal_output_vec().to_json(),
        Err(e) => error_to_json(&e),
    }
}

#[wasm_bindgen]
pub fn ll1_parsing_table_to_json(grammar: &str) -> String {
    let g = match crate::Grammar::parse(grammar) {
        Ok(g) => g,
        Err(e) => return error_to_json(&e),
    };
    match g.generate_ll1_parsing_table() {
        Ok(table) => table.to_output(&g).to_json(),
        Err(e) => error_to_json(&e),
    }
}

#[cfg(test)]
mod wasm_entry_tests {
    #[test]
    fn nullable_first_follow_json() {
        let json = crate::nullable_first_follow_to_json("S -> a S | empty");
        assert_eq!(
            json,
            "{\"data\":[{\"name\":\"S\",\"nullable\":true,\"first\":[\"a\",\"empty\"],\"follow\":[\"$\"]}]}"
        );
    }

    #[test]
    fn grammar_errors_become_json() {
        let json = crate::nullable_first_follow_to_json("S -> a -> b");
        assert_eq!(json, "{\"error\":\"Line 1: too many \\\"->\\\"\"}");
    }

    #[test]
    fn ambiguity_becomes_json() {
        let json = crate::ll1_parsing_table_to_json("S -> a | a b");
        assert!(json.starts_with("{\"error\":\"ambiguity at [S, a]"));
    }

    #[test]
    fn table_json() {
        let json = crate::ll1_parsing_table_to_json("S -> a");
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["terminals"], serde_json::json!(["a", "$"]));
        assert_eq!(value["rows"][0][0], "S");
    }
}
