use super::expr::Expr;
use crate::file::FilePosition;

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expr(Expr),
    If(If),
}

/// One link in a `if`/`else if`/`else` chain. A `else if` is stored as a
/// nested `If` inside `else_`.
#[derive(Debug, Clone, PartialEq)]
pub struct If {
    pub cond: Expr,
    pub body: Vec<Stmt>,
    pub else_: Option<Else>,
    pub file_pos: Option<FilePosition>,
}

impl If {
    pub fn new(
        cond: Expr,
        body: Vec<Stmt>,
        else_: Option<Else>,
        file_pos: Option<FilePosition>,
    ) -> Self {
        Self {
            cond,
            body,
            else_,
            file_pos,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Else {
    Block(Vec<Stmt>),
    If(Box<If>),
}
