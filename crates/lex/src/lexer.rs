use log::debug;

use common::{
    error::{LangError, LangErrorKind, LangResult},
    file::FilePosition,
    token::lit::Lit,
    ty::Ty,
};

use crate::token::{LexToken, LexTokenKind};

/// Lexes the characters in the source code to LexToken's and returns a vector
/// containing all lex tokens. The last token is always a `EOF` token.
pub fn lex(content: &str) -> LangResult<Vec<LexToken>> {
    let mut iter = LexTokenIter::new(content);
    let mut lex_tokens = Vec::new();

    loop {
        let lex_token = iter.next_token()?;
        if lex_token.is_eof() {
            lex_tokens.push(lex_token);
            break;
        }
        lex_tokens.push(lex_token);
    }

    debug!("Lexed {} tokens.", lex_tokens.len());
    Ok(lex_tokens)
}

struct LexTokenIter {
    chars: Vec<char>,
    idx: usize,

    /// The offset (in bytes) inside the source.
    offset: u64,

    /// Current line number (or rather last seen line number).
    line: u64,

    /// Current column number (or rather last seen column number).
    column: u64,

    /// The position of the token that is currently being lexed. Used when
    /// reporting errors.
    file_pos: FilePosition,
}

impl LexTokenIter {
    fn new(content: &str) -> Self {
        Self {
            chars: content.chars().collect(),
            idx: 0,
            offset: 0,
            line: 1,
            column: 1,
            file_pos: FilePosition::default(),
        }
    }

    /// Gets the next LexToken from the iterator. Whitespace is skipped, but
    /// linebreaks are returned as tokens.
    fn next_token(&mut self) -> LangResult<LexToken> {
        while let Some(c) = self.peek(0) {
            if Self::is_valid_whitespace(c) {
                self.skip(1);
            } else {
                break;
            }
        }

        self.file_pos = FilePosition::new(self.offset, self.line, self.column, 0);
        let start_offset = self.offset;

        let kind = if let Some(c1) = self.peek(0) {
            if c1.is_ascii_digit() {
                self.get_number()?
            } else if Self::is_valid_identifier_start(c1) {
                let ident = self.get_ident();

                // Check if this identifier is a valid:
                //   keyword        ("if", "return" etc.)
                //   type           ("i32", "f32" etc.)
                //   bool literal   (true/false)
                if let Some(keyword_kind) = LexToken::get_if_keyword(&ident) {
                    keyword_kind
                } else if let Some(ty) = Ty::get_if_type(&ident) {
                    LexTokenKind::Type(ty)
                } else if let Some(bool_kind) = LexToken::get_if_bool(&ident) {
                    bool_kind
                } else {
                    LexTokenKind::Ident(ident)
                }
            } else if let Some((symbol_kind, n)) =
                LexToken::get_if_symbol_two_chars(c1, self.peek(1))
            {
                self.skip(n);
                symbol_kind
            } else {
                return Err(self.err(format!("Found invalid character: {:?}", c1)));
            }
        } else {
            LexTokenKind::EOF
        };

        let mut file_pos = self.file_pos;
        file_pos.length = self.offset - start_offset;
        Ok(LexToken::new(kind, file_pos))
    }

    fn peek(&self, n: usize) -> Option<char> {
        self.chars.get(self.idx + n).copied()
    }

    /// Moves `n` characters forward and keeps the offset, line and column in sync.
    fn skip(&mut self, n: usize) {
        for _ in 0..n {
            if let Some(c) = self.peek(0) {
                self.idx += 1;
                self.offset += c.len_utf8() as u64;
                if c == '\n' {
                    self.line += 1;
                    self.column = 1;
                } else {
                    self.column += 1;
                }
            }
        }
    }

    fn get_ident(&mut self) -> String {
        let mut ident = String::new();
        while let Some(c) = self.peek(0) {
            if Self::is_valid_identifier(c) {
                ident.push(c);
                self.skip(1);
            } else {
                break;
            }
        }
        ident
    }

    /// A number is a integer if it only contains digits. If it contains a dot
    /// followed by more digits, it is a float.
    fn get_number(&mut self) -> LangResult<LexTokenKind> {
        let mut number = String::new();
        while let Some(c) = self.peek(0) {
            if c.is_ascii_digit() {
                number.push(c);
                self.skip(1);
            } else {
                break;
            }
        }

        let is_float = matches!(
            (self.peek(0), self.peek(1)),
            (Some('.'), Some(c)) if c.is_ascii_digit()
        );

        if is_float {
            number.push('.');
            self.skip(1);
            while let Some(c) = self.peek(0) {
                if c.is_ascii_digit() {
                    number.push(c);
                    self.skip(1);
                } else {
                    break;
                }
            }

            match number.parse::<f64>() {
                Ok(float) => Ok(LexTokenKind::Lit(Lit::Float(float))),
                Err(e) => Err(self.err(format!("Invalid float \"{}\": {}", number, e))),
            }
        } else {
            match number.parse::<i64>() {
                Ok(int) => Ok(LexTokenKind::Lit(Lit::Integer(int))),
                Err(e) => Err(self.err(format!("Invalid integer \"{}\": {}", number, e))),
            }
        }
    }

    fn is_valid_whitespace(c: char) -> bool {
        c == ' ' || c == '\t' || c == '\r'
    }

    fn is_valid_identifier_start(c: char) -> bool {
        c.is_ascii_alphabetic() || c == '_'
    }

    fn is_valid_identifier(c: char) -> bool {
        c.is_ascii_alphanumeric() || c == '_'
    }

    /// Used when returing errors to include current line/column number.
    fn err(&self, msg: String) -> LangError {
        LangError::new(msg, LangErrorKind::LexError, Some(self.file_pos))
    }
}
