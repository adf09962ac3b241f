use log::debug;

use common::{
    error::{LangError, LangErrorKind, LangResult},
    file::FilePosition,
    token::{
        expr::{Expr, FnCall, Var},
        op::{BinOp, BinOperator},
    },
};
use lex::token::{LexToken, LexTokenKind, Sym};

use crate::{
    fn_table::FnTable,
    token::{Operator, Output},
};

/// Parses a flat slice of tokens containing exactly one expression into an
/// expression tree.
pub struct ExprParser<'a> {
    tokens: &'a [LexToken],

    /// Used to decide if a identifier followed by a "(" is a function call and
    /// how many arguments the call takes.
    fn_table: &'a FnTable,

    /// Containers used during the shunting yard algorithm to store operators
    /// and operands.
    outputs: Vec<Output>,
    operators: Vec<Operator>,
}

impl<'a> ExprParser<'a> {
    pub fn parse(tokens: &'a [LexToken], fn_table: &'a FnTable) -> LangResult<Expr> {
        let mut expr_parser = Self {
            tokens,
            fn_table,
            outputs: Vec::new(),
            operators: Vec::new(),
        };

        expr_parser.shunting_yard()?;
        debug!("Outputs: {:?}", &expr_parser.outputs);
        expr_parser.rev_polish_to_expr()
    }

    /// See https://www.andr.mu/logs/the-shunting-yard-algorithm/ for a good
    /// explanation of the algorithm.
    fn shunting_yard(&mut self) -> LangResult<()> {
        for (i, lex_token) in self.tokens.iter().enumerate() {
            debug!("SHUNTING: {:?}", &lex_token);

            let file_pos = lex_token.file_pos;
            match &lex_token.kind {
                LexTokenKind::Lit(lit) => self.outputs.push(Output::Lit(*lit, file_pos)),

                LexTokenKind::Ident(ident) => {
                    let next_is_parenthesis = self
                        .tokens
                        .get(i + 1)
                        .map(|t| t.is_sym(Sym::ParenthesisBegin))
                        .unwrap_or(false);

                    if next_is_parenthesis && self.fn_table.contains(ident) {
                        self.operators
                            .push(Operator::FnName(ident.clone(), file_pos));
                    } else {
                        self.outputs.push(Output::Ident(ident.clone(), file_pos));
                    }
                }

                LexTokenKind::Sym(Sym::Comma) => {
                    self.pop_until_parenthesis(file_pos)?;
                }

                LexTokenKind::Sym(Sym::ParenthesisBegin) => {
                    self.operators.push(Operator::ParenthesisBegin(file_pos));
                }

                LexTokenKind::Sym(Sym::ParenthesisEnd) => {
                    self.pop_until_parenthesis(file_pos)?;
                    self.operators.pop(); // pop the "ParenthesisBegin"

                    // The parenthesis closes a function call, move the
                    // function name to the outputs.
                    if let Some(Operator::FnName(..)) = self.operators.last() {
                        if let Some(Operator::FnName(name, name_file_pos)) = self.operators.pop() {
                            self.outputs.push(Output::Ident(name, name_file_pos));
                        }
                    }
                }

                LexTokenKind::Sym(symbol) => {
                    if let Some(bin_oper) = get_if_bin_operator(*symbol) {
                        self.add_operator(bin_oper, file_pos);
                    } else {
                        return Err(LangError::new(
                            format!("Unsupported symbol in expression: {:?}", symbol),
                            LangErrorKind::UnsupportedExpression,
                            Some(file_pos),
                        ));
                    }
                }

                _ => {
                    return Err(LangError::new(
                        format!("Parsed invalid token during expression: {}", lex_token),
                        LangErrorKind::UnsupportedExpression,
                        Some(file_pos),
                    ));
                }
            }
        }

        // Move the remaining `operators` to `outputs` before parsing the expression.
        while let Some(op) = self.operators.pop() {
            match op {
                Operator::ParenthesisBegin(file_pos) => {
                    return Err(LangError::new(
                        "Found \"(\" without a matching \")\".".into(),
                        LangErrorKind::UnbalancedBracket,
                        Some(file_pos),
                    ));
                }
                Operator::FnName(name, file_pos) => {
                    self.outputs.push(Output::Ident(name, file_pos));
                }
                Operator::BinaryOperator(bin_oper, file_pos) => {
                    self.outputs.push(Output::BinaryOperator(bin_oper, file_pos));
                }
            }
        }

        Ok(())
    }

    /// Pops operators to the outputs until a "ParenthesisBegin" is found at the
    /// top of the operator stack. The "ParenthesisBegin" is left on the stack.
    fn pop_until_parenthesis(&mut self, file_pos: FilePosition) -> LangResult<()> {
        loop {
            match self.operators.last() {
                Some(Operator::ParenthesisBegin(_)) => return Ok(()),
                Some(_) => {
                    if let Some(Operator::BinaryOperator(bin_oper, op_file_pos)) =
                        self.operators.pop()
                    {
                        self.outputs
                            .push(Output::BinaryOperator(bin_oper, op_file_pos));
                    }
                }
                None => {
                    return Err(LangError::new(
                        "Found \")\" or \",\" without a matching \"(\".".into(),
                        LangErrorKind::UnbalancedBracket,
                        Some(file_pos),
                    ))
                }
            }
        }
    }

    /// Run logic for adding a binary operator into the "shunting". Every
    /// operator on the stack with a precedence greater than or equal to the
    /// precedence of `bin_oper` is moved to the outputs, since all operators
    /// are left associative.
    fn add_operator(&mut self, bin_oper: BinOperator, file_pos: FilePosition) {
        while let Some(Operator::BinaryOperator(pop_oper, pop_file_pos)) =
            self.operators.last().cloned()
        {
            if pop_oper.precedence() >= bin_oper.precedence() {
                self.operators.pop();
                self.outputs
                    .push(Output::BinaryOperator(pop_oper, pop_file_pos));
            } else {
                break;
            }
        }

        self.operators
            .push(Operator::BinaryOperator(bin_oper, file_pos));
    }

    /// Converts the "outputs" in reverse polish notation to an expression.
    fn rev_polish_to_expr(&mut self) -> LangResult<Expr> {
        let mut expr_stack: Vec<Expr> = Vec::new();

        for output in std::mem::take(&mut self.outputs) {
            match output {
                Output::Lit(lit, file_pos) => expr_stack.push(Expr::Lit(lit, Some(file_pos))),

                Output::BinaryOperator(bin_oper, file_pos) => {
                    let (rhs, lhs) = match (expr_stack.pop(), expr_stack.pop()) {
                        (Some(rhs), Some(lhs)) => (rhs, lhs),
                        _ => {
                            return Err(LangError::new(
                                format!("Missing operand for operator \"{}\".", bin_oper),
                                LangErrorKind::AmbiguousResolution,
                                Some(file_pos),
                            ))
                        }
                    };

                    let bin_op = BinOp::new(bin_oper, Box::new(lhs), Box::new(rhs), Some(file_pos));
                    expr_stack.push(Expr::BinOp(bin_op));
                }

                Output::Ident(ident, file_pos) => {
                    if let Some(boundary) = self.fn_table.get(&ident) {
                        if expr_stack.len() < boundary.arg_count {
                            return Err(LangError::new(
                                format!(
                                    "Function \"{}\" takes {} arguments, found {}.",
                                    ident,
                                    boundary.arg_count,
                                    expr_stack.len()
                                ),
                                LangErrorKind::AmbiguousResolution,
                                Some(file_pos),
                            ));
                        }

                        // The last pushed operand is the last argument.
                        let arguments = expr_stack.split_off(expr_stack.len() - boundary.arg_count);
                        let fn_call = FnCall::new(ident, arguments, Some(file_pos));
                        expr_stack.push(Expr::FnCall(fn_call));
                    } else {
                        expr_stack.push(Expr::Var(Var::new(ident, Some(file_pos))));
                    }
                }
            }
        }

        // When the loop above have finished, the remaining expression in the
        // `expr_stack` should be the final expression to be returned.
        if expr_stack.len() != 1 {
            return Err(LangError::new(
                format!(
                    "Not one expression left at end of rev_polish_to_expr, amount: {}",
                    expr_stack.len()
                ),
                LangErrorKind::AmbiguousResolution,
                self.tokens.first().map(|t| t.file_pos),
            ));
        }

        Ok(expr_stack.remove(0))
    }
}

fn get_if_bin_operator(symbol: Sym) -> Option<BinOperator> {
    Some(match symbol {
        Sym::Plus => BinOperator::Add,
        Sym::Minus => BinOperator::Sub,
        Sym::Mul => BinOperator::Mul,
        Sym::Div => BinOperator::FDiv,
        Sym::IntDiv => BinOperator::IDiv,
        Sym::Lt => BinOperator::Lt,
        Sym::Gt => BinOperator::Gt,
        Sym::DoubleEquals => BinOperator::Eq,
        _ => return None,
    })
}
