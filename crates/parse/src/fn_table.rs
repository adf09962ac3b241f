use std::collections::{hash_map::Entry, HashMap};

use log::debug;

use common::error::{LangError, LangErrorKind, LangResult};
use lex::token::{LexToken, LexTokenKind, Sym};

/// The location of a function inside the token stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FnBoundary {
    pub name: String,

    /// Index of the token containing the name of the function.
    pub start: usize,

    /// Index of the `}` token that closes the body of the function.
    pub end: usize,

    /// The amount of parameters declared in the header of the function.
    pub arg_count: usize,
}

/// Lookup table containing all functions found in a token stream. It is built
/// once before any function is parsed and is then only read. The expression
/// parser uses it to decide if a identifier followed by a `(` is a function
/// call or not, and how many arguments a call takes.
#[derive(Debug, Clone, Default)]
pub struct FnTable {
    fns: HashMap<String, FnBoundary>,

    /// The names of the functions in the order they were declared.
    order: Vec<String>,
}

/// A function whose header has been seen but whose body isn't closed yet.
struct PartialFn {
    name: String,
    start: usize,
    arg_count: usize,
    seen_arrow: bool,
}

impl FnTable {
    /// Scans the tokens once to find the boundaries of all functions.
    pub fn scan(tokens: &[LexToken]) -> LangResult<Self> {
        let mut table = FnTable::default();

        let mut current: Option<PartialFn> = None;
        let mut depth: usize = 0;

        for (i, lex_token) in tokens.iter().enumerate() {
            match &lex_token.kind {
                LexTokenKind::Sym(Sym::DoubleColon) if depth == 0 => {
                    if let Some(partial) = &current {
                        return Err(LangError::new(
                            format!(
                                "Found \"::\" inside the header of function \"{}\".",
                                partial.name
                            ),
                            LangErrorKind::MalformedHeader,
                            Some(lex_token.file_pos),
                        ));
                    }

                    let name = i
                        .checked_sub(1)
                        .and_then(|prev_idx| tokens[prev_idx].ident())
                        .ok_or_else(|| {
                            LangError::new(
                                "Expected function to start with name.".into(),
                                LangErrorKind::MalformedHeader,
                                Some(lex_token.file_pos),
                            )
                        })?;

                    current = Some(PartialFn {
                        name: name.into(),
                        start: i - 1,
                        arg_count: 0,
                        seen_arrow: false,
                    });
                }

                LexTokenKind::Type(_) if depth == 0 => {
                    if let Some(partial) = &mut current {
                        if !partial.seen_arrow {
                            partial.arg_count += 1;
                        }
                    }
                }

                LexTokenKind::Sym(Sym::Arrow) if depth == 0 => {
                    if let Some(partial) = &mut current {
                        partial.seen_arrow = true;
                    }
                }

                LexTokenKind::Sym(Sym::CurlyBracketBegin) => {
                    if depth == 0 && current.is_none() {
                        return Err(LangError::new(
                            "Found function body without a function header.".into(),
                            LangErrorKind::MalformedHeader,
                            Some(lex_token.file_pos),
                        ));
                    }
                    depth += 1;
                }

                LexTokenKind::Sym(Sym::CurlyBracketEnd) => {
                    if depth == 0 {
                        return Err(LangError::new(
                            "Found \"}\" without a matching \"{\".".into(),
                            LangErrorKind::UnbalancedBracket,
                            Some(lex_token.file_pos),
                        ));
                    }

                    depth -= 1;
                    if depth == 0 {
                        if let Some(partial) = current.take() {
                            table.insert(FnBoundary {
                                name: partial.name,
                                start: partial.start,
                                end: i,
                                arg_count: partial.arg_count,
                            })?;
                        }
                    }
                }

                _ => (),
            }
        }

        if let Some(partial) = current {
            return Err(LangError::new(
                format!("Body of function \"{}\" is never closed.", partial.name),
                LangErrorKind::UnbalancedBracket,
                tokens.get(partial.start).map(|t| t.file_pos),
            ));
        }

        debug!("Function table order: {:?}", table.order);
        Ok(table)
    }

    /// Adds a new function to the table. Returns an error if a function with
    /// the same name already exists.
    pub fn insert(&mut self, boundary: FnBoundary) -> LangResult<()> {
        match self.fns.entry(boundary.name.clone()) {
            Entry::Occupied(entry) => Err(LangError::new(
                format!("Function with name \"{}\" already exists.", entry.key()),
                LangErrorKind::MalformedHeader,
                None,
            )),
            Entry::Vacant(entry) => {
                self.order.push(boundary.name.clone());
                entry.insert(boundary);
                Ok(())
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&FnBoundary> {
        self.fns.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fns.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterates over the functions in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &FnBoundary> {
        self.order.iter().filter_map(move |name| self.fns.get(name))
    }
}
