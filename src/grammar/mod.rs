pub mod grammar;
pub mod ll1_parsing_table;
pub mod nullable_first_follow;
pub mod parse;
pub mod pretty_print;
pub mod symbol;

pub use grammar::Grammar;
pub use ll1_parsing_table::PredictiveTable;
pub use nullable_first_follow::NullableFirstFollow;
pub use symbol::{Alternatives, Production, Symbol, SymbolSet, SymbolString};

pub const EPSILON: &str = "empty";
pub const END_MARK: &str = "$";
