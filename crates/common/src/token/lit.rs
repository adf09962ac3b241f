use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lit {
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl Display for Lit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lit::Integer(int) => write!(f, "{}", int),
            Lit::Float(float) => write!(f, "{:?}", float),
            Lit::Bool(b) => write!(f, "{}", b),
        }
    }
}
