use std::fmt::Display;

use crate::file::FilePosition;

use super::expr::Expr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOperator {
    Add,
    Sub,
    Mul,
    /// `/`, always evaluated as a floating point division.
    FDiv,
    /// `//`, always evaluated as a (signed) integer division.
    IDiv,

    Lt,
    Gt,
    Eq,
}

impl BinOperator {
    /// The precedence of the operator. A higher value binds harder. All binary
    /// operators are left associative.
    pub fn precedence(&self) -> usize {
        match self {
            BinOperator::Lt | BinOperator::Gt | BinOperator::Eq => 1,
            BinOperator::Add | BinOperator::Sub => 2,
            BinOperator::Mul | BinOperator::FDiv | BinOperator::IDiv => 3,
        }
    }
}

impl Display for BinOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            BinOperator::Add => "+",
            BinOperator::Sub => "-",
            BinOperator::Mul => "*",
            BinOperator::FDiv => "/",
            BinOperator::IDiv => "//",
            BinOperator::Lt => "<",
            BinOperator::Gt => ">",
            BinOperator::Eq => "==",
        };
        write!(f, "{}", symbol)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinOp {
    pub operator: BinOperator,
    pub lhs: Box<Expr>,
    pub rhs: Box<Expr>,
    pub file_pos: Option<FilePosition>,
}

impl BinOp {
    pub fn new(
        operator: BinOperator,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        file_pos: Option<FilePosition>,
    ) -> Self {
        Self {
            operator,
            lhs,
            rhs,
            file_pos,
        }
    }
}
