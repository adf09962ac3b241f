use std::fmt::Display;

use common::{file::FilePosition, token::lit::Lit, ty::Ty};

#[derive(Debug, Clone, PartialEq)]
pub struct LexToken {
    pub kind: LexTokenKind,
    pub file_pos: FilePosition,
}

impl LexToken {
    pub fn new(kind: LexTokenKind, file_pos: FilePosition) -> Self {
        Self { kind, file_pos }
    }

    pub fn is_eof(&self) -> bool {
        matches!(self.kind, LexTokenKind::EOF)
    }

    /// Returns true if this token ends a statement.
    pub fn is_break_symbol(&self) -> bool {
        matches!(
            self.kind,
            LexTokenKind::Sym(Sym::LineBreak) | LexTokenKind::Sym(Sym::SemiColon)
        )
    }

    pub fn is_sym(&self, sym: Sym) -> bool {
        matches!(&self.kind, LexTokenKind::Sym(s) if *s == sym)
    }

    pub fn is_kw(&self, kw: Kw) -> bool {
        matches!(&self.kind, LexTokenKind::Kw(k) if *k == kw)
    }

    /// Returns the name of the identifier if this token is a identifier.
    pub fn ident(&self) -> Option<&str> {
        if let LexTokenKind::Ident(ident) = &self.kind {
            Some(ident)
        } else {
            None
        }
    }

    /// Sees if the given `ident` is a valid bool literal. If it is, returns
    /// the literal as a token type, otherwise returns None.
    pub fn get_if_bool(ident: &str) -> Option<LexTokenKind> {
        Some(match ident {
            "true" => LexTokenKind::Lit(Lit::Bool(true)),
            "false" => LexTokenKind::Lit(Lit::Bool(false)),
            _ => return None,
        })
    }

    /// Sees if the given `ident` is a valid keyword. If it is, returns
    /// the keyword as a token type, otherwise returns None.
    pub fn get_if_keyword(ident: &str) -> Option<LexTokenKind> {
        Some(match ident {
            "return" => LexTokenKind::Kw(Kw::Return),
            "if" => LexTokenKind::Kw(Kw::If),
            "else" => LexTokenKind::Kw(Kw::Else),
            _ => return None,
        })
    }

    /// Sees if the given characters `c1` and `c2` forms a valid symbol.
    /// Returns the symbol as a LexTokenKind together with how many characters
    /// long the symbol is (1-2), otherwise None is returned.
    pub fn get_if_symbol_two_chars(c1: char, c2: Option<char>) -> Option<(LexTokenKind, usize)> {
        let mut real_string = String::with_capacity(2);
        real_string.push(c1);
        if let Some(c2) = c2 {
            real_string.push(c2);
        }

        match c1 {
            '(' => LexToken::ret_single_lookup(Sym::ParenthesisBegin),
            ')' => LexToken::ret_single_lookup(Sym::ParenthesisEnd),
            '{' => LexToken::ret_single_lookup(Sym::CurlyBracketBegin),
            '}' => LexToken::ret_single_lookup(Sym::CurlyBracketEnd),
            ',' => LexToken::ret_single_lookup(Sym::Comma),
            ';' => LexToken::ret_single_lookup(Sym::SemiColon),
            '\n' => LexToken::ret_single_lookup(Sym::LineBreak),
            '+' => LexToken::ret_single_lookup(Sym::Plus),
            '*' => LexToken::ret_single_lookup(Sym::Mul),
            '<' => LexToken::ret_single_lookup(Sym::Lt),
            '>' => LexToken::ret_single_lookup(Sym::Gt),

            ':' => LexToken::match_symbol(
                &real_string,
                &[
                    (":", Sym::Colon),
                    ("::", Sym::DoubleColon),
                    (":=", Sym::Assign),
                ],
            ),

            '=' => LexToken::match_symbol(
                &real_string,
                &[("=", Sym::Equals), ("==", Sym::DoubleEquals)],
            ),

            '-' => LexToken::match_symbol(&real_string, &[("-", Sym::Minus), ("->", Sym::Arrow)]),

            '/' => LexToken::match_symbol(&real_string, &[("/", Sym::Div), ("//", Sym::IntDiv)]),

            _ => None,
        }
    }

    fn ret_single_lookup(symbol: Sym) -> Option<(LexTokenKind, usize)> {
        Some((LexTokenKind::Sym(symbol), 1))
    }

    /// Sees if the given `real_string` which is created with the "peeked"
    /// characters forms a valid symbol and in that case returns it. The longest
    /// matching symbol is picked (ex. "::" is matched instead of ":").
    fn match_symbol(
        real_string: &str,
        string_symbol_tuples: &[(&str, Sym)],
    ) -> Option<(LexTokenKind, usize)> {
        string_symbol_tuples
            .iter()
            .filter(|(s, _)| real_string.starts_with(s))
            .max_by_key(|(s, _)| s.len())
            .map(|(s, sym)| (LexTokenKind::Sym(*sym), s.chars().count()))
    }
}

#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, PartialEq)]
pub enum LexTokenKind {
    Ident(String),
    Lit(Lit),
    /// A built-in type name, ex. `i32`.
    Type(Ty),
    Kw(Kw),
    Sym(Sym),
    EOF,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kw {
    Return,
    If,
    Else,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sym {
    ParenthesisBegin,
    ParenthesisEnd,
    CurlyBracketBegin,
    CurlyBracketEnd,

    Comma,
    SemiColon,
    LineBreak,
    Colon,
    Equals,

    DoubleColon,  // ::
    Arrow,        // ->
    Assign,       // :=
    DoubleEquals, // ==

    Plus,
    Minus,
    Mul,
    Div,
    IntDiv, // //
    Lt,
    Gt,
}

/// One token per line in the `tokens.txt` output of the compiler.
impl Display for LexToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match &self.kind {
            LexTokenKind::Ident(ident) => format!("Ident({})", ident),
            LexTokenKind::Lit(lit) => format!("Lit({})", lit),
            LexTokenKind::Type(ty) => format!("Type({})", ty),
            LexTokenKind::Kw(kw) => format!("Kw({:?})", kw),
            LexTokenKind::Sym(sym) => format!("Sym({:?})", sym),
            LexTokenKind::EOF => "EOF".into(),
        };
        write!(
            f,
            "{}, line: {}, column: {}",
            kind, self.file_pos.line, self.file_pos.column
        )
    }
}
