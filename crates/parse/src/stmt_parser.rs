use log::debug;

use common::{
    error::{LangError, LangErrorKind, LangResult},
    file::FilePosition,
    token::{
        expr::{Assign, Expr, Return},
        stmt::{Else, If, Stmt},
    },
};
use lex::token::{Kw, LexToken, LexTokenKind, Sym};

use crate::{expr_parser::ExprParser, fn_table::FnTable};

/// Splits the tokens of a block body into statements and parses them.
pub(crate) struct StmtParser<'a> {
    tokens: &'a [LexToken],
    pos: usize,
    fn_table: &'a FnTable,
}

impl<'a> StmtParser<'a> {
    /// Parses all statements found in `tokens`. The tokens should contain the
    /// body of a block without the surrounding curly brackets.
    pub(crate) fn parse(tokens: &'a [LexToken], fn_table: &'a FnTable) -> LangResult<Vec<Stmt>> {
        let mut stmt_parser = Self {
            tokens,
            pos: 0,
            fn_table,
        };
        stmt_parser.parse_stmts()
    }

    fn parse_stmts(&mut self) -> LangResult<Vec<Stmt>> {
        let mut stmts = Vec::new();

        loop {
            self.skip_break_symbols();

            let lex_token = if let Some(lex_token) = self.tokens.get(self.pos) {
                lex_token
            } else {
                break;
            };

            let stmt = match &lex_token.kind {
                LexTokenKind::Kw(Kw::If) => {
                    self.pos += 1;
                    Stmt::If(self.parse_if(lex_token.file_pos)?)
                }
                LexTokenKind::Kw(Kw::Else) => {
                    return Err(LangError::new(
                        "Found \"else\" without a preceding \"if\".".into(),
                        LangErrorKind::UnsupportedExpression,
                        Some(lex_token.file_pos),
                    ));
                }
                _ => {
                    let start = self.pos;
                    while let Some(lex_token) = self.tokens.get(self.pos) {
                        if lex_token.is_break_symbol() {
                            break;
                        }
                        self.pos += 1;
                    }
                    Stmt::Expr(self.parse_simple_stmt(&self.tokens[start..self.pos])?)
                }
            };

            debug!("Parsed stmt: {:?}", stmt);
            stmts.push(stmt);
        }

        Ok(stmts)
    }

    /// Parses a `if` with its optional `else`/`else if`.
    ///
    /// ```text
    /// if <expr> {
    ///     ...
    /// } else if <expr> {
    ///     ...
    /// } else {
    ///     ...
    /// }
    /// ```
    ///
    /// The "if" keyword has already been consumed when this function is called.
    fn parse_if(&mut self, file_pos: FilePosition) -> LangResult<If> {
        // The condition is allowed to span over multiple lines since it always
        // is ended with a "CurlyBracketBegin".
        let cond_start = self.pos;
        while let Some(lex_token) = self.tokens.get(self.pos) {
            if lex_token.is_sym(Sym::CurlyBracketBegin) {
                break;
            }
            self.pos += 1;
        }
        if self.pos >= self.tokens.len() {
            return Err(LangError::new(
                "Expected \"{\" after if condition.".into(),
                LangErrorKind::UnbalancedBracket,
                Some(file_pos),
            ));
        }

        let cond_tokens = self.tokens[cond_start..self.pos]
            .iter()
            .filter(|t| !t.is_sym(Sym::LineBreak))
            .cloned()
            .collect::<Vec<_>>();
        let cond = ExprParser::parse(&cond_tokens, self.fn_table)?;

        let body = self.parse_block()?;

        // See if the next token (ignoring linebreaks) is the "else" keyword.
        let mut peek_pos = self.pos;
        while let Some(true) = self.tokens.get(peek_pos).map(|t| t.is_sym(Sym::LineBreak)) {
            peek_pos += 1;
        }

        let else_ = match self.tokens.get(peek_pos) {
            Some(else_token) if else_token.is_kw(Kw::Else) => {
                self.pos = peek_pos + 1;
                match self.tokens.get(self.pos) {
                    Some(lex_token) if lex_token.is_kw(Kw::If) => {
                        self.pos += 1;
                        Some(Else::If(Box::new(self.parse_if(lex_token.file_pos)?)))
                    }
                    Some(lex_token) if lex_token.is_sym(Sym::CurlyBracketBegin) => {
                        Some(Else::Block(self.parse_block()?))
                    }
                    _ => {
                        return Err(LangError::new(
                            "Expected \"if\" or \"{\" after \"else\".".into(),
                            LangErrorKind::UnsupportedExpression,
                            Some(else_token.file_pos),
                        ));
                    }
                }
            }
            _ => None,
        };

        Ok(If::new(cond, body, else_, Some(file_pos)))
    }

    /// Parses the block starting at the current position, which should be a
    /// "CurlyBracketBegin". When this function returns, the position is set to
    /// the token after the matching "CurlyBracketEnd".
    fn parse_block(&mut self) -> LangResult<Vec<Stmt>> {
        let open_file_pos = self.tokens.get(self.pos).map(|t| t.file_pos);
        let body_start = self.pos + 1;

        let mut depth: usize = 0;
        while let Some(lex_token) = self.tokens.get(self.pos) {
            if lex_token.is_sym(Sym::CurlyBracketBegin) {
                depth += 1;
            } else if lex_token.is_sym(Sym::CurlyBracketEnd) {
                depth -= 1;
                if depth == 0 {
                    let body_end = self.pos;
                    self.pos += 1;
                    return StmtParser::parse(&self.tokens[body_start..body_end], self.fn_table);
                }
            }
            self.pos += 1;
        }

        Err(LangError::new(
            "Found \"{\" without a matching \"}\".".into(),
            LangErrorKind::UnbalancedBracket,
            open_file_pos,
        ))
    }

    /// Parses a statement that doesn't contain any blocks. The shape of the
    /// statement is decided by its leading tokens:
    ///
    ///   return <expr>, <expr>, ...
    ///   <ident> := <expr>
    ///   <type> <ident> = <expr>
    ///   <expr>
    fn parse_simple_stmt(&self, tokens: &[LexToken]) -> LangResult<Expr> {
        let file_pos = tokens.first().map(|t| t.file_pos);

        match tokens {
            [first, rest @ ..] if first.is_kw(Kw::Return) => {
                let mut values = Vec::new();
                if !rest.is_empty() {
                    for value_tokens in split_top_level_commas(rest) {
                        values.push(ExprParser::parse(value_tokens, self.fn_table)?);
                    }
                }
                Ok(Expr::Return(Return::new(values, file_pos)))
            }

            [name, assign, rest @ ..] if name.ident().is_some() && assign.is_sym(Sym::Assign) => {
                let name = name.ident().unwrap_or_default().to_string();
                let value = ExprParser::parse(rest, self.fn_table)?;
                Ok(Expr::Assign(Assign::new(name, None, Box::new(value), file_pos)))
            }

            [
                LexToken {
                    kind: LexTokenKind::Type(ty),
                    ..
                },
                name,
                assign,
                rest @ ..,
            ] if name.ident().is_some()
                && (assign.is_sym(Sym::Equals) || assign.is_sym(Sym::Assign)) =>
            {
                let name = name.ident().unwrap_or_default().to_string();
                let value = ExprParser::parse(rest, self.fn_table)?;
                Ok(Expr::Assign(Assign::new(
                    name,
                    Some(*ty),
                    Box::new(value),
                    file_pos,
                )))
            }

            _ => ExprParser::parse(tokens, self.fn_table),
        }
    }

    fn skip_break_symbols(&mut self) {
        while let Some(true) = self.tokens.get(self.pos).map(|t| t.is_break_symbol()) {
            self.pos += 1;
        }
    }
}

/// Splits the tokens on commas that aren't inside parentheses, ex. the commas
/// separating arguments of a function call is not split on.
fn split_top_level_commas(tokens: &[LexToken]) -> Vec<&[LexToken]> {
    let mut parts = Vec::new();
    let mut depth: isize = 0;
    let mut start = 0;

    for (i, lex_token) in tokens.iter().enumerate() {
        if lex_token.is_sym(Sym::ParenthesisBegin) {
            depth += 1;
        } else if lex_token.is_sym(Sym::ParenthesisEnd) {
            depth -= 1;
        } else if lex_token.is_sym(Sym::Comma) && depth == 0 {
            parts.push(&tokens[start..i]);
            start = i + 1;
        }
    }

    parts.push(&tokens[start..]);
    parts
}
