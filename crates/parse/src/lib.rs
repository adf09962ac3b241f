pub mod expr_parser;
pub mod fn_table;
pub mod parser;
mod stmt_parser;
pub mod token;

pub use parser::parse;
