use std::fmt::Display;

use super::{lit::Lit, op::BinOp};

use crate::{file::FilePosition, ty::Ty};

/// A single expression. Every node owns its children, so a tree is never
/// shared between two statements.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Lit(Lit, Option<FilePosition>),
    Var(Var),
    BinOp(BinOp),
    FnCall(FnCall),
    Return(Return),
    Assign(Assign),
}

impl Expr {
    pub fn file_pos(&self) -> Option<&FilePosition> {
        match self {
            Expr::Lit(_, file_pos) => file_pos.as_ref(),
            Expr::Var(var) => var.file_pos.as_ref(),
            Expr::BinOp(bin_op) => bin_op.file_pos.as_ref(),
            Expr::FnCall(fn_call) => fn_call.file_pos.as_ref(),
            Expr::Return(ret) => ret.file_pos.as_ref(),
            Expr::Assign(assign) => assign.file_pos.as_ref(),
        }
    }
}

/// A reference to a variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Var {
    pub name: String,
    pub file_pos: Option<FilePosition>,
}

impl Var {
    pub fn new(name: String, file_pos: Option<FilePosition>) -> Self {
        Self { name, file_pos }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FnCall {
    pub name: String,
    /// The arguments in call order.
    pub arguments: Vec<Expr>,
    pub file_pos: Option<FilePosition>,
}

impl FnCall {
    pub fn new(name: String, arguments: Vec<Expr>, file_pos: Option<FilePosition>) -> Self {
        Self {
            name,
            arguments,
            file_pos,
        }
    }
}

/// A return statement. The language allows multiple return values, but only
/// the first one is lowered by the code generator.
#[derive(Debug, Clone, PartialEq)]
pub struct Return {
    pub values: Vec<Expr>,
    pub file_pos: Option<FilePosition>,
}

impl Return {
    pub fn new(values: Vec<Expr>, file_pos: Option<FilePosition>) -> Self {
        Self { values, file_pos }
    }
}

/// Declares a new variable `name` in the current scope. If `ty` is set, the
/// value will be cast to that type during code generation.
#[derive(Debug, Clone, PartialEq)]
pub struct Assign {
    pub name: String,
    pub ty: Option<Ty>,
    pub value: Box<Expr>,
    pub file_pos: Option<FilePosition>,
}

impl Assign {
    pub fn new(
        name: String,
        ty: Option<Ty>,
        value: Box<Expr>,
        file_pos: Option<FilePosition>,
    ) -> Self {
        Self {
            name,
            ty,
            value,
            file_pos,
        }
    }
}

/// Prints the expression in a prefix form, ex. `2 + 3 * 4` is printed as
/// `(+ 2 (* 3 4))`.
impl Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Lit(lit, _) => write!(f, "{}", lit),
            Expr::Var(var) => write!(f, "{}", var.name),
            Expr::BinOp(bin_op) => {
                write!(f, "({} {} {})", bin_op.operator, bin_op.lhs, bin_op.rhs)
            }
            Expr::FnCall(fn_call) => {
                write!(f, "{}(", fn_call.name)?;
                for (i, arg) in fn_call.arguments.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            Expr::Return(ret) => {
                write!(f, "return")?;
                for (i, value) in ret.values.iter().enumerate() {
                    let sep = if i == 0 { " " } else { ", " };
                    write!(f, "{}{}", sep, value)?;
                }
                Ok(())
            }
            Expr::Assign(assign) => {
                if let Some(ty) = &assign.ty {
                    write!(f, "{} {} = {}", ty, assign.name, assign.value)
                } else {
                    write!(f, "{} := {}", assign.name, assign.value)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::op::BinOperator;

    fn int(value: i64) -> Box<Expr> {
        Box::new(Expr::Lit(Lit::Integer(value), None))
    }

    #[test]
    fn test_display_nested_bin_op() {
        let mul = Expr::BinOp(BinOp::new(BinOperator::Mul, int(3), int(4), None));
        let add = Expr::BinOp(BinOp::new(BinOperator::Add, int(2), Box::new(mul), None));
        assert_eq!("(+ 2 (* 3 4))", add.to_string());
    }

    #[test]
    fn test_display_statements() {
        let call = Expr::FnCall(FnCall::new("add2".into(), vec![*int(1), *int(2)], None));
        let assign = Expr::Assign(Assign::new("x".into(), Some(Ty::F32), Box::new(call), None));
        assert_eq!("f32 x = add2(1, 2)", assign.to_string());

        let ret = Expr::Return(Return::new(vec![*int(1), *int(2)], None));
        assert_eq!("return 1, 2", ret.to_string());
    }
}
