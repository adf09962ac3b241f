use std::fmt::Display;

use itertools::Itertools;

use crate::{ty::Type, value::Value};

/// A instruction that isn't the terminator of a block. If the instruction
/// produces a value, it is stored in `val`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprInstr {
    pub val: Option<Value>,
    pub kind: ExprInstrKind,
}

impl ExprInstr {
    pub fn new(val: Option<Value>, kind: ExprInstrKind) -> Self {
        Self { val, kind }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprInstrKind {
    /// Allocates stack storage for a value of the given type.
    Alloca(Type),

    /// The `Value` is the address to load from.
    Load(Value),

    /// The first `Value` is the value that will be stored and the second
    /// `Value` is the address to store it at.
    Store(Value, Value),

    BinOp(BinOper, Value, Value),
    Cmp(CmpOper, Value, Value),

    /// The String is the name of the function to call, the `Type` is its
    /// return type and the vector are the arguments.
    Call(String, Type, Vec<Value>),

    /// Casts the `Value` to the `Type`.
    Cast(CastOper, Value, Type),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOper {
    Add,
    Sub,
    Mul,
    FDiv,
    SDiv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOper {
    Eq,
    Ne,
    Lt,
    Gt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastOper {
    SExt,
    ZExt,
    Trunc,
    FPExt,
    FPTrunc,
    SIToFP,
    UIToFP,
    FPToSI,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EndInstr {
    Return(Option<Value>),

    /// Unconditional branch, the String is the label to branch to.
    Branch(String),

    /// The given `Value` must be of type i1. If it is true, this will branch
    /// to the block with the label found in the first `String`. If it is
    /// false, it will branch to the block with the label of the second `String`.
    BranchIf(Value, String, String),

    Unreachable,
}

impl BinOper {
    /// The name of the LLVM instruction when the operands are of type `ty`.
    fn llvm_name(self, ty: &Type) -> &'static str {
        match (self, ty.is_float()) {
            (BinOper::Add, false) => "add",
            (BinOper::Add, true) => "fadd",
            (BinOper::Sub, false) => "sub",
            (BinOper::Sub, true) => "fsub",
            (BinOper::Mul, false) => "mul",
            (BinOper::Mul, true) => "fmul",
            (BinOper::FDiv, _) => "fdiv",
            (BinOper::SDiv, _) => "sdiv",
        }
    }
}

impl CmpOper {
    fn llvm_name(self, ty: &Type) -> &'static str {
        if ty.is_float() {
            match self {
                CmpOper::Eq => "fcmp oeq",
                CmpOper::Ne => "fcmp une",
                CmpOper::Lt => "fcmp olt",
                CmpOper::Gt => "fcmp ogt",
            }
        } else if ty.is_bool() {
            // An i1 is -1 when true if read as signed.
            match self {
                CmpOper::Eq => "icmp eq",
                CmpOper::Ne => "icmp ne",
                CmpOper::Lt => "icmp ult",
                CmpOper::Gt => "icmp ugt",
            }
        } else {
            match self {
                CmpOper::Eq => "icmp eq",
                CmpOper::Ne => "icmp ne",
                CmpOper::Lt => "icmp slt",
                CmpOper::Gt => "icmp sgt",
            }
        }
    }
}

impl Display for CastOper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CastOper::SExt => "sext",
            CastOper::ZExt => "zext",
            CastOper::Trunc => "trunc",
            CastOper::FPExt => "fpext",
            CastOper::FPTrunc => "fptrunc",
            CastOper::SIToFP => "sitofp",
            CastOper::UIToFP => "uitofp",
            CastOper::FPToSI => "fptosi",
        };
        write!(f, "{}", name)
    }
}

/// Formats a value together with its type, ex. `i32 %tmp.1`.
fn typed(value: &Value) -> String {
    format!("{} {}", value.ty, value)
}

impl Display for ExprInstr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(val) = &self.val {
            write!(f, "{} = ", val)?;
        }

        match &self.kind {
            ExprInstrKind::Alloca(ty) => write!(f, "alloca {}", ty),
            ExprInstrKind::Load(ptr) => {
                let ty = ptr.ty.pointee().unwrap_or(&Type::Void);
                write!(f, "load {}, {}", ty, typed(ptr))
            }
            ExprInstrKind::Store(value, ptr) => {
                write!(f, "store {}, {}", typed(value), typed(ptr))
            }
            ExprInstrKind::BinOp(oper, lhs, rhs) => write!(
                f,
                "{} {} {}, {}",
                oper.llvm_name(&lhs.ty),
                lhs.ty,
                lhs,
                rhs
            ),
            ExprInstrKind::Cmp(oper, lhs, rhs) => write!(
                f,
                "{} {} {}, {}",
                oper.llvm_name(&lhs.ty),
                lhs.ty,
                lhs,
                rhs
            ),
            ExprInstrKind::Call(name, ret_type, args) => write!(
                f,
                "call {} @{}({})",
                ret_type,
                name,
                args.iter().map(typed).join(", ")
            ),
            ExprInstrKind::Cast(oper, value, ty) => {
                write!(f, "{} {} to {}", oper, typed(value), ty)
            }
        }
    }
}

impl Display for EndInstr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EndInstr::Return(Some(value)) => write!(f, "ret {}", typed(value)),
            EndInstr::Return(None) => write!(f, "ret void"),
            EndInstr::Branch(label) => write!(f, "br label %{}", label),
            EndInstr::BranchIf(cond, true_label, false_label) => write!(
                f,
                "br {}, label %{}, label %{}",
                typed(cond),
                true_label,
                false_label
            ),
            EndInstr::Unreachable => write!(f, "unreachable"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueKind;

    fn tmp(n: usize, ty: Type) -> Value {
        Value::new(ValueKind::Tmp(n), ty)
    }

    #[test]
    fn test_display_expr_instrs() {
        let ptr = tmp(0, Type::Pointer(Box::new(Type::I32)));

        let alloca = ExprInstr::new(Some(ptr.clone()), ExprInstrKind::Alloca(Type::I32));
        assert_eq!("%tmp.0 = alloca i32", alloca.to_string());

        let load = ExprInstr::new(Some(tmp(1, Type::I32)), ExprInstrKind::Load(ptr.clone()));
        assert_eq!("%tmp.1 = load i32, ptr %tmp.0", load.to_string());

        let store = ExprInstr::new(
            None,
            ExprInstrKind::Store(Value::const_int(4, Type::I32), ptr),
        );
        assert_eq!("store i32 4, ptr %tmp.0", store.to_string());

        let fadd = ExprInstr::new(
            Some(tmp(2, Type::F64)),
            ExprInstrKind::BinOp(
                BinOper::Add,
                tmp(3, Type::F64),
                Value::const_float(1.0, Type::F64),
            ),
        );
        assert_eq!(
            "%tmp.2 = fadd double %tmp.3, 0x3FF0000000000000",
            fadd.to_string()
        );

        let cmp = ExprInstr::new(
            Some(tmp(4, Type::I1)),
            ExprInstrKind::Cmp(CmpOper::Lt, tmp(5, Type::I64), tmp(6, Type::I64)),
        );
        assert_eq!("%tmp.4 = icmp slt i64 %tmp.5, %tmp.6", cmp.to_string());

        let bool_cmp = ExprInstr::new(
            Some(tmp(10, Type::I1)),
            ExprInstrKind::Cmp(CmpOper::Gt, tmp(11, Type::I1), tmp(12, Type::I1)),
        );
        assert_eq!("%tmp.10 = icmp ugt i1 %tmp.11, %tmp.12", bool_cmp.to_string());

        let call = ExprInstr::new(
            Some(tmp(7, Type::I32)),
            ExprInstrKind::Call(
                "add2".into(),
                Type::I32,
                vec![tmp(8, Type::I32), Value::const_int(2, Type::I32)],
            ),
        );
        assert_eq!("%tmp.7 = call i32 @add2(i32 %tmp.8, i32 2)", call.to_string());

        let cast = ExprInstr::new(
            Some(tmp(9, Type::I64)),
            ExprInstrKind::Cast(CastOper::SExt, tmp(7, Type::I32), Type::I64),
        );
        assert_eq!("%tmp.9 = sext i32 %tmp.7 to i64", cast.to_string());
    }

    #[test]
    fn test_display_end_instrs() {
        assert_eq!("ret void", EndInstr::Return(None).to_string());
        assert_eq!(
            "ret i64 3",
            EndInstr::Return(Some(Value::const_int(3, Type::I64))).to_string()
        );
        assert_eq!("br label %if.next.2", EndInstr::Branch("if.next.2".into()).to_string());
        assert_eq!(
            "br i1 %tmp.0, label %if.true.1, label %if.next.2",
            EndInstr::BranchIf(tmp(0, Type::I1), "if.true.1".into(), "if.next.2".into())
                .to_string()
        );
    }
}
