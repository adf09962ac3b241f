use common::{file::FilePosition, token::lit::Lit, token::op::BinOperator};

/// Items that are pushed onto the operator stack during the shunting yard.
#[derive(Debug, Clone, PartialEq)]
pub enum Operator {
    ParenthesisBegin(FilePosition),

    /// The name of a declared function that was followed by a "(".
    FnName(String, FilePosition),

    BinaryOperator(BinOperator, FilePosition),
}

/// Items in the output queue of the shunting yard, in reverse polish notation.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Lit(Lit, FilePosition),

    /// Either a variable or the name of a function. This is decided when the
    /// output is converted into an expression tree.
    Ident(String, FilePosition),

    BinaryOperator(BinOperator, FilePosition),
}
