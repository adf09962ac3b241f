use log::{debug, warn};

use common::{
    error::{LangError, LangErrorKind, LangResult},
    token::ast::{FnDecl, Param},
    ty::Ty,
};
use lex::token::{LexToken, LexTokenKind, Sym};

use crate::{
    fn_table::{FnBoundary, FnTable},
    stmt_parser::StmtParser,
};

/// Parses all functions found in the given lex tokens. The function boundaries
/// are found before any function is parsed so that calls to functions declared
/// later in the file can be recognized.
pub fn parse(lex_tokens: &[LexToken]) -> LangResult<Vec<FnDecl>> {
    let fn_table = FnTable::scan(lex_tokens)?;
    ensure_only_functions(lex_tokens, &fn_table)?;
    if fn_table.is_empty() {
        warn!("No functions found in the source.");
    }

    let mut fn_decls = Vec::with_capacity(fn_table.len());
    for boundary in fn_table.iter() {
        let fn_decl = parse_fn(lex_tokens, boundary, &fn_table)?;
        debug!(
            "Parsed function \"{}\" with {} statements.",
            fn_decl.name,
            fn_decl.body.len()
        );
        fn_decls.push(fn_decl);
    }

    Ok(fn_decls)
}

/// Parses the function located at `boundary`:
///
/// ```text
/// <name> :: <type> <ident>, ... -> <type> [<ident>], ... { <stmt> ... }
/// ```
fn parse_fn(
    lex_tokens: &[LexToken],
    boundary: &FnBoundary,
    fn_table: &FnTable,
) -> LangResult<FnDecl> {
    let fn_tokens = &lex_tokens[boundary.start..=boundary.end];
    let file_pos = fn_tokens.first().map(|t| t.file_pos);

    // The first two tokens are the name and the "::", the scan has already
    // verified them.
    let body_open = fn_tokens
        .iter()
        .position(|t| t.is_sym(Sym::CurlyBracketBegin))
        .ok_or_else(|| {
            LangError::new(
                format!("Function \"{}\" has no body.", boundary.name),
                LangErrorKind::MalformedHeader,
                file_pos,
            )
        })?;

    let header = &fn_tokens[2..body_open];
    let (params, returns) = parse_header(&boundary.name, header)?;

    let body_tokens = &fn_tokens[body_open + 1..fn_tokens.len() - 1];
    let body = StmtParser::parse(body_tokens, fn_table)?;

    Ok(FnDecl::new(
        boundary.name.clone(),
        params,
        returns,
        body,
        file_pos,
    ))
}

/// Parses the header tokens found between the "::" and the "{" of a function
/// into its parameters and return types.
fn parse_header(name: &str, header: &[LexToken]) -> LangResult<(Vec<Param>, Vec<Ty>)> {
    let header = header
        .iter()
        .filter(|t| !t.is_sym(Sym::LineBreak))
        .collect::<Vec<_>>();

    let mut parts = header.split(|t| t.is_sym(Sym::Arrow));
    let params_part = parts.next().unwrap_or_default();
    let returns_part = parts.next();
    if let Some(extra) = parts.next() {
        return Err(malformed(
            format!("Found multiple \"->\" in header of function \"{}\".", name),
            extra.first().copied().or_else(|| header.last().copied()),
        ));
    }

    let mut params = Vec::new();
    if !params_part.is_empty() {
        for param_tokens in params_part.split(|t| t.is_sym(Sym::Comma)) {
            match param_tokens {
                [ty_token, name_token] => match (&ty_token.kind, name_token.ident()) {
                    (LexTokenKind::Type(ty), Some(param_name)) => {
                        params.push(Param::new(param_name.into(), *ty));
                    }
                    _ => {
                        return Err(malformed(
                            format!(
                                "Expected parameter of the form \"<type> <name>\" in function \"{}\".",
                                name
                            ),
                            Some(*ty_token),
                        ))
                    }
                },
                _ => {
                    return Err(malformed(
                        format!("Dangling parameter in header of function \"{}\".", name),
                        param_tokens.first().copied().or_else(|| header.first().copied()),
                    ))
                }
            }
        }
    }

    let mut returns = Vec::new();
    if let Some(returns_part) = returns_part {
        for ret_tokens in returns_part.split(|t| t.is_sym(Sym::Comma)) {
            // The name of a return value is optional and not used.
            match ret_tokens {
                [ty_token] | [ty_token, _] => {
                    if let (LexTokenKind::Type(ty), true) = (
                        &ty_token.kind,
                        ret_tokens.get(1).map_or(true, |t| t.ident().is_some()),
                    ) {
                        returns.push(*ty);
                    } else {
                        return Err(malformed(
                            format!(
                                "Expected return of the form \"<type> [<name>]\" in function \"{}\".",
                                name
                            ),
                            Some(*ty_token),
                        ));
                    }
                }
                _ => {
                    return Err(malformed(
                        format!("Dangling return type in header of function \"{}\".", name),
                        ret_tokens.first().copied().or_else(|| header.last().copied()),
                    ))
                }
            }
        }
    }

    Ok((params, returns))
}

/// Only linebreaks and semicolons are allowed between functions.
fn ensure_only_functions(lex_tokens: &[LexToken], fn_table: &FnTable) -> LangResult<()> {
    let mut prev_end = 0;
    for boundary in fn_table.iter() {
        check_between(&lex_tokens[prev_end..boundary.start])?;
        prev_end = boundary.end + 1;
    }
    check_between(&lex_tokens[prev_end.min(lex_tokens.len())..])
}

fn check_between(lex_tokens: &[LexToken]) -> LangResult<()> {
    if let Some(lex_token) = lex_tokens
        .iter()
        .find(|t| !t.is_break_symbol() && !t.is_eof())
    {
        Err(malformed(
            format!("Found token outside of a function: {}", lex_token),
            Some(lex_token),
        ))
    } else {
        Ok(())
    }
}

fn malformed(msg: String, lex_token: Option<&LexToken>) -> LangError {
    LangError::new(
        msg,
        LangErrorKind::MalformedHeader,
        lex_token.map(|t| t.file_pos),
    )
}
