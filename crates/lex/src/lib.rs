pub mod lexer;
pub mod token;

pub use lexer::lex;
