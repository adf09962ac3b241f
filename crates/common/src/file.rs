use std::fmt::{Debug, Display};

/// Contains information about where a token has been lexed from. This includes
/// the byte offset in the source, the length (in bytes) of the token, the line
/// nr and the column nr.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct FilePosition {
    pub offset: u64,
    pub length: u64,

    /// Line numbers start at 1.
    pub line: u64,

    /// Points to the first character of the token. Column numbers start at 1.
    pub column: u64,
}

impl FilePosition {
    pub fn new(offset: u64, line: u64, column: u64, length: u64) -> Self {
        Self {
            offset,
            length,
            line,
            column,
        }
    }
}

impl Display for FilePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl Debug for FilePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilePosition")
            .field("offset", &self.offset)
            .field("length", &self.length)
            .field("line", &self.line)
            .field("column", &self.column)
            .finish()
    }
}
