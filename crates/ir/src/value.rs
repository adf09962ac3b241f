use std::fmt::Display;

use crate::ty::Type;

/// A operand of a instruction. The type of the value is always known.
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    pub kind: ValueKind,
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValueKind {
    /// The result of a instruction. The number is unique inside a function.
    Tmp(usize),

    /// A parameter of the current function.
    Param(String),

    ConstInt(i64),
    ConstFloat(f64),
    ConstBool(bool),
}

impl Value {
    pub fn new(kind: ValueKind, ty: Type) -> Self {
        Self { kind, ty }
    }

    pub fn const_int(value: i64, ty: Type) -> Self {
        Self::new(ValueKind::ConstInt(value), ty)
    }

    pub fn const_float(value: f64, ty: Type) -> Self {
        Self::new(ValueKind::ConstFloat(value), ty)
    }

    pub fn const_bool(value: bool) -> Self {
        Self::new(ValueKind::ConstBool(value), Type::I1)
    }
}

impl Value {
    /// Casts a constant at compile time. Returns None if `self` isn't a
    /// constant or if there is no valid cast between the types.
    pub fn fold_cast(&self, ty: &Type) -> Option<Value> {
        let int = |value: i64| match ty {
            Type::I32 => Value::const_int(value as i32 as i64, ty.clone()),
            _ => Value::const_int(value, ty.clone()),
        };
        let float = |value: f64| match ty {
            Type::F32 => Value::const_float(value as f32 as f64, ty.clone()),
            _ => Value::const_float(value, ty.clone()),
        };

        Some(match self.kind {
            _ if ty.is_bool() => match self.kind {
                ValueKind::ConstInt(value) => Value::const_bool(value != 0),
                ValueKind::ConstFloat(value) => Value::const_bool(value != 0.0),
                ValueKind::ConstBool(value) => Value::const_bool(value),
                _ => return None,
            },
            ValueKind::ConstInt(value) if ty.is_int() => int(value),
            ValueKind::ConstInt(value) if ty.is_float() => float(value as f64),
            ValueKind::ConstFloat(value) if ty.is_int() => int(value as i64),
            ValueKind::ConstFloat(value) if ty.is_float() => float(value),
            ValueKind::ConstBool(value) if ty.is_int() => int(value as i64),
            ValueKind::ConstBool(value) if ty.is_float() => float(if value { 1.0 } else { 0.0 }),
            _ => return None,
        })
    }
}

/// Prints the value without its type, ex. `%tmp.3` or `5`.
impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ValueKind::Tmp(n) => write!(f, "%tmp.{}", n),
            ValueKind::Param(name) => write!(f, "%{}", name),
            ValueKind::ConstInt(value) => write!(f, "{}", value),
            ValueKind::ConstBool(value) => write!(f, "{}", value),
            ValueKind::ConstFloat(value) => {
                // LLVM expects float constants as the hex representation of a
                // double, a `float` must be exactly representable as a f32.
                let bits = if matches!(self.ty, Type::F32) {
                    (*value as f32 as f64).to_bits()
                } else {
                    value.to_bits()
                };
                write!(f, "0x{:016X}", bits)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_values() {
        assert_eq!("%tmp.3", Value::new(ValueKind::Tmp(3), Type::I32).to_string());
        assert_eq!("%a", Value::new(ValueKind::Param("a".into()), Type::I32).to_string());
        assert_eq!("-5", Value::const_int(-5, Type::I64).to_string());
        assert_eq!("true", Value::const_bool(true).to_string());
    }

    #[test]
    fn test_fold_cast() {
        let int = Value::const_int(3_000_000_000, Type::I64);
        assert_eq!(
            Some(Value::const_int(3_000_000_000_i64 as i32 as i64, Type::I32)),
            int.fold_cast(&Type::I32)
        );
        assert_eq!(
            Some(Value::const_float(3e9, Type::F64)),
            int.fold_cast(&Type::F64)
        );
        assert_eq!(Some(Value::const_bool(true)), int.fold_cast(&Type::I1));

        let float = Value::const_float(-2.75, Type::F64);
        assert_eq!(
            Some(Value::const_int(-2, Type::I64)),
            float.fold_cast(&Type::I64)
        );
        assert_eq!(
            Some(Value::const_bool(false)),
            Value::const_float(0.0, Type::F32).fold_cast(&Type::I1)
        );
        assert_eq!(
            Some(Value::const_float(1.0, Type::F32)),
            Value::const_bool(true).fold_cast(&Type::F32)
        );

        let tmp = Value::new(ValueKind::Tmp(0), Type::I64);
        assert_eq!(None, tmp.fold_cast(&Type::I32));
    }

    #[test]
    fn test_display_float_constants() {
        assert_eq!(
            "0x3FF0000000000000",
            Value::const_float(1.0, Type::F64).to_string()
        );
        // 0.1 isn't exactly representable as a f32, so it is rounded.
        assert_eq!(
            "0x3FB99999A0000000",
            Value::const_float(0.1, Type::F32).to_string()
        );
    }
}
