use std::fmt::Display;

/// The types that can be represented in the IR. They map one-to-one to the
/// first class types of LLVM.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Void,
    I1,
    I32,
    I64,
    F32,
    F64,
    Pointer(Box<Type>),
}

impl Type {
    pub fn is_int(&self) -> bool {
        matches!(self, Type::I32 | Type::I64)
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Type::F32 | Type::F64)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Type::I1)
    }

    pub fn is_number(&self) -> bool {
        self.is_int() || self.is_float()
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, Type::Pointer(_))
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Type::Void)
    }

    /// Returns the type that this pointer points to. Returns None if this
    /// isn't a pointer.
    pub fn pointee(&self) -> Option<&Type> {
        if let Type::Pointer(inner) = self {
            Some(inner)
        } else {
            None
        }
    }

    /// The size in bits of integers and floats.
    pub fn bit_width(&self) -> Option<u32> {
        Some(match self {
            Type::I1 => 1,
            Type::I32 | Type::F32 => 32,
            Type::I64 | Type::F64 => 64,
            Type::Void | Type::Pointer(_) => return None,
        })
    }
}

/// Prints the type the way that it is written in LLVM IR. All pointers are
/// opaque.
impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Void => write!(f, "void"),
            Type::I1 => write!(f, "i1"),
            Type::I32 => write!(f, "i32"),
            Type::I64 => write!(f, "i64"),
            Type::F32 => write!(f, "float"),
            Type::F64 => write!(f, "double"),
            Type::Pointer(_) => write!(f, "ptr"),
        }
    }
}
