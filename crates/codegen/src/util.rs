use common::{
    error::{LangError, LangErrorKind, LangResult},
    file::FilePosition,
    ty::Ty,
};
use ir::{IrError, Type};

pub(crate) fn to_ir_type(ty: Ty) -> Type {
    match ty {
        Ty::I32 => Type::I32,
        Ty::I64 => Type::I64,
        Ty::F32 => Type::F32,
        Ty::F64 => Type::F64,
        Ty::Bool => Type::I1,
    }
}

/// Returns a closure that converts a `IrError` into a `LangError`. Used with
/// `map_err` on the results of the IR builder.
pub(crate) fn ir_err(file_pos: Option<&FilePosition>) -> impl FnOnce(IrError) -> LangError {
    let file_pos = file_pos.copied();
    move |e| LangError::new(e.msg, LangErrorKind::CodeGenError, file_pos)
}

pub(crate) fn err<T>(
    msg: String,
    kind: LangErrorKind,
    file_pos: Option<&FilePosition>,
) -> LangResult<T> {
    Err(LangError::new(msg, kind, file_pos.copied()))
}

/// Returns the type that both operands of a binary operation are cast to
/// before the operation is done. If one of the types is a float, the result
/// is the widest float. Otherwise it is the widest integer.
pub(crate) fn unify(lhs: &Type, rhs: &Type) -> Type {
    match (lhs.is_float(), rhs.is_float()) {
        (true, false) => lhs.clone(),
        (false, true) => rhs.clone(),
        _ => wider(lhs, rhs),
    }
}

/// Used by float division, integer operands are converted to doubles.
pub(crate) fn unify_float(lhs: &Type, rhs: &Type) -> Type {
    let as_float = |ty: &Type| if ty.is_float() { ty.clone() } else { Type::F64 };
    wider(&as_float(lhs), &as_float(rhs))
}

/// Used by integer division, float and bool operands are converted to i64.
pub(crate) fn unify_int(lhs: &Type, rhs: &Type) -> Type {
    let as_int = |ty: &Type| if ty.is_int() { ty.clone() } else { Type::I64 };
    wider(&as_int(lhs), &as_int(rhs))
}

fn wider(lhs: &Type, rhs: &Type) -> Type {
    if rhs.bit_width().unwrap_or(0) > lhs.bit_width().unwrap_or(0) {
        rhs.clone()
    } else {
        lhs.clone()
    }
}
