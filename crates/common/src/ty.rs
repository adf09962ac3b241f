use std::fmt::Display;

/// The static types that can be written in the source code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ty {
    I32,
    I64,
    F32,
    F64,
    Bool,
}

impl Ty {
    /// Sees if the given `ident` is the name of a type. If it is, returns the
    /// type, otherwise returns None.
    pub fn get_if_type(ident: &str) -> Option<Ty> {
        Some(match ident {
            "i32" => Ty::I32,
            "i64" => Ty::I64,
            "f32" => Ty::F32,
            "f64" => Ty::F64,
            "bool" => Ty::Bool,
            _ => return None,
        })
    }
}

impl Display for Ty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Ty::I32 => "i32",
            Ty::I64 => "i64",
            Ty::F32 => "f32",
            Ty::F64 => "f64",
            Ty::Bool => "bool",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_if_type() {
        assert_eq!(Some(Ty::I32), Ty::get_if_type("i32"));
        assert_eq!(Some(Ty::F32), Ty::get_if_type("f32"));
        assert_eq!(Some(Ty::Bool), Ty::get_if_type("bool"));
        assert_eq!(None, Ty::get_if_type("u8"));
        assert_eq!(None, Ty::get_if_type("I32"));
    }

    #[test]
    fn test_display_roundtrips_names() {
        for ty in &[Ty::I32, Ty::I64, Ty::F32, Ty::F64, Ty::Bool] {
            assert_eq!(Some(*ty), Ty::get_if_type(&ty.to_string()));
        }
    }
}
