pub mod ast;
pub mod expr;
pub mod lit;
pub mod op;
pub mod stmt;
