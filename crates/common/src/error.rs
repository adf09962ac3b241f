use crate::file::FilePosition;
use backtrace::Backtrace;
use log::Level;
use std::error::Error;
use std::fmt;
use std::fmt::{Display, Formatter};

pub type LangResult<T> = Result<T, LangError>;

#[derive(Debug, Clone)]
pub struct LangError {
    pub msg: String,
    pub kind: LangErrorKind,
    pub file_pos: Option<FilePosition>,
    pub backtrace: Option<Backtrace>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LangErrorKind {
    /// A character or literal that the lexer doesn't understand.
    LexError,

    /// A function doesn't start with the expected `name ::` shape or its
    /// argument/return list is malformed.
    MalformedHeader,

    /// A close bracket/body without a matching open bracket/body (or the
    /// other way around).
    UnbalancedBracket,

    /// A identifier was read that isn't bound in any active scope.
    UnresolvedSymbol,

    /// A token or expression that has no defined handling.
    UnsupportedExpression,

    /// The postfix resolution didn't end with exactly one expression.
    AmbiguousResolution,

    /// The backend rejected a operation (ex. argument count mismatch).
    CodeGenError,

    /// Failures in the environment of the compiler, ex. reading the source
    /// file or writing the output files.
    IoError,
}

impl PartialEq for LangError {
    fn eq(&self, other: &Self) -> bool {
        self.msg == other.msg && self.kind == other.kind && self.file_pos == other.file_pos
    }
}

impl LangError {
    pub fn new(msg: String, kind: LangErrorKind, file_pos: Option<FilePosition>) -> Self {
        LangError::new_backtrace(msg, kind, file_pos, true)
    }

    pub fn new_backtrace(
        msg: String,
        kind: LangErrorKind,
        file_pos: Option<FilePosition>,
        contain_backtrace: bool,
    ) -> Self {
        let backtrace = if log_enabled!(Level::Debug) && contain_backtrace {
            Some(Backtrace::new())
        } else {
            None
        };

        Self {
            msg,
            kind,
            file_pos,
            backtrace,
        }
    }
}

impl Error for LangError {}

impl Display for LangError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        if let Some(file_pos) = self.file_pos {
            write!(f, "[{:?} - {}]", self.kind, file_pos)?;
        } else {
            write!(f, "[{:?}]", self.kind)?;
        }

        write!(f, " {}", self.msg)?;

        if log_enabled!(Level::Debug) {
            if let Some(backtrace) = &self.backtrace {
                write!(f, "\n{:#?}", backtrace)?;
            }
        }

        Ok(())
    }
}

impl From<std::io::Error> for LangError {
    fn from(e: std::io::Error) -> Self {
        LangError::new(e.to_string(), LangErrorKind::IoError, None)
    }
}
