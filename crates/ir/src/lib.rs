use std::ops::Deref;

pub mod basic_block;
pub mod error;
pub mod func;
pub mod instr;
pub mod module;
pub mod ty;
pub mod value;

pub use basic_block::BasicBlock;
pub use error::{IrError, IrErrorKind, IrResult};
pub use func::{Builder, Function, Signature};
pub use module::Module;
pub use ty::Type;
pub use value::{Value, ValueKind};

/// Index of a function inside a `Module`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FuncId(pub usize);

impl Deref for FuncId {
    type Target = usize;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Index of a basic block inside a `Function`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockId(pub usize);

impl Deref for BlockId {
    type Target = usize;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
