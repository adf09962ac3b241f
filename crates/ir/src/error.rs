use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

use backtrace::Backtrace;
use log::{log_enabled, Level};

pub type IrResult<T> = Result<T, IrError>;

#[derive(Debug, Clone)]
pub struct IrError {
    pub msg: String,
    pub kind: IrErrorKind,
    pub backtrace: Option<Backtrace>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrErrorKind {
    /// A instruction was appended to a block that already has a terminator.
    Terminated,

    /// The operands of a instruction doesn't have the expected types.
    TypeMismatch,

    /// A call was given a different amount of arguments than the callee
    /// takes.
    ArgCount,

    /// A function or block that doesn't exist was referenced.
    Lookup,
}

impl IrError {
    pub fn new(msg: String, kind: IrErrorKind) -> Self {
        IrError::new_backtrace(msg, kind, true)
    }

    pub fn new_backtrace(msg: String, kind: IrErrorKind, contain_backtrace: bool) -> Self {
        let backtrace = if log_enabled!(Level::Debug) && contain_backtrace {
            Some(Backtrace::new())
        } else {
            None
        };

        Self {
            msg,
            kind,
            backtrace,
        }
    }
}

impl Error for IrError {}

impl Display for IrError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{:?}: {}", self.kind, self.msg)?;

        if log_enabled!(Level::Debug) {
            if let Some(backtrace) = &self.backtrace {
                write!(f, "\n{:#?}", backtrace)?;
            }
        }

        Ok(())
    }
}
