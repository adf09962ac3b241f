use log::{debug, warn};

use common::{
    error::{LangErrorKind, LangResult},
    file::FilePosition,
    token::{
        expr::{Assign, Expr, FnCall, Return, Var},
        lit::Lit,
        op::{BinOp, BinOperator},
    },
};
use ir::{instr::CmpOper, Type, Value};

use crate::{
    generator::CodeGen,
    scope::Symbol,
    util::{err, ir_err, to_ir_type, unify, unify_float, unify_int},
};

impl CodeGen {
    /// Compiles a expression that is used as a statement. The resulting value
    /// (if any) is thrown away.
    pub(crate) fn compile_expr_stmt(&mut self, expr: &Expr) -> LangResult<()> {
        match expr {
            Expr::Assign(assign) => self.compile_assign(assign),
            Expr::Return(ret) => self.compile_return(ret),
            Expr::FnCall(fn_call) => self.compile_fn_call(fn_call).map(|_| ()),
            Expr::Lit(..) | Expr::Var(_) | Expr::BinOp(_) => self.compile_expr(expr).map(|_| ()),
        }
    }

    /// Compiles a expression that is expected to produce a value.
    pub(crate) fn compile_expr(&mut self, expr: &Expr) -> LangResult<Value> {
        let file_pos = expr.file_pos();
        match expr {
            Expr::Lit(lit, _) => Ok(Self::compile_lit(lit)),
            Expr::Var(var) => self.compile_var(var),
            Expr::BinOp(bin_op) => self.compile_bin_op(bin_op),
            Expr::FnCall(fn_call) => {
                if let Some(value) = self.compile_fn_call(fn_call)? {
                    Ok(value)
                } else {
                    err(
                        format!(
                            "Call to function \"{}\" returning void used as a value.",
                            fn_call.name
                        ),
                        LangErrorKind::UnsupportedExpression,
                        file_pos,
                    )
                }
            }
            Expr::Return(_) | Expr::Assign(_) => err(
                format!("Expression can't be used as a value: {}", expr),
                LangErrorKind::UnsupportedExpression,
                file_pos,
            ),
        }
    }

    fn compile_lit(lit: &Lit) -> Value {
        match lit {
            Lit::Integer(int) => Value::const_int(*int, Type::I64),
            Lit::Float(float) => Value::const_float(*float, Type::F64),
            Lit::Bool(boolean) => Value::const_bool(*boolean),
        }
    }

    /// Loads the current value of the variable. The symbol is looked up before
    /// any instruction is added.
    fn compile_var(&mut self, var: &Var) -> LangResult<Value> {
        let file_pos = var.file_pos.as_ref();
        let ptr = match self.scopes.lookup(&var.name) {
            Some(Symbol::Var(ptr)) => ptr.clone(),
            Some(Symbol::Func(_)) => {
                return err(
                    format!("Function \"{}\" can't be used as a value.", var.name),
                    LangErrorKind::UnsupportedExpression,
                    file_pos,
                )
            }
            None => {
                return err(
                    format!("Unable to resolve symbol \"{}\".", var.name),
                    LangErrorKind::UnresolvedSymbol,
                    file_pos,
                )
            }
        };

        self.builder(file_pos)?.load(&ptr).map_err(ir_err(file_pos))
    }

    fn compile_bin_op(&mut self, bin_op: &BinOp) -> LangResult<Value> {
        let file_pos = bin_op.file_pos.as_ref();

        let lhs = self.compile_expr(&bin_op.lhs)?;
        let rhs = self.compile_expr(&bin_op.rhs)?;

        let ty = match bin_op.operator {
            BinOperator::FDiv => unify_float(&lhs.ty, &rhs.ty),
            BinOperator::IDiv => unify_int(&lhs.ty, &rhs.ty),
            BinOperator::Add
            | BinOperator::Sub
            | BinOperator::Mul
            | BinOperator::Lt
            | BinOperator::Gt => {
                // Arithmetic and ordering isn't done on bools, they are
                // zero extended and treated as integers.
                let ty = unify(&lhs.ty, &rhs.ty);
                if ty.is_bool() {
                    Type::I64
                } else {
                    ty
                }
            }
            BinOperator::Eq => unify(&lhs.ty, &rhs.ty),
        };
        debug!(
            "Bin op \"{}\", lhs: {}, rhs: {}, unified: {}",
            bin_op.operator, lhs.ty, rhs.ty, ty
        );

        let mut builder = self.builder(file_pos)?;
        let lhs = builder.cast(&lhs, &ty).map_err(ir_err(file_pos))?;
        let rhs = builder.cast(&rhs, &ty).map_err(ir_err(file_pos))?;

        let result = match bin_op.operator {
            BinOperator::Add => builder.add(&lhs, &rhs),
            BinOperator::Sub => builder.sub(&lhs, &rhs),
            BinOperator::Mul => builder.mul(&lhs, &rhs),
            BinOperator::FDiv => builder.fdiv(&lhs, &rhs),
            BinOperator::IDiv => builder.sdiv(&lhs, &rhs),
            BinOperator::Lt => builder.cmp(CmpOper::Lt, &lhs, &rhs),
            BinOperator::Gt => builder.cmp(CmpOper::Gt, &lhs, &rhs),
            BinOperator::Eq => builder.cmp(CmpOper::Eq, &lhs, &rhs),
        };
        result.map_err(ir_err(file_pos))
    }

    /// Compiles a function call. The arguments are cast to the types of the
    /// parameters of the callee. Returns None if the callee returns void.
    pub(crate) fn compile_fn_call(&mut self, fn_call: &FnCall) -> LangResult<Option<Value>> {
        let file_pos = fn_call.file_pos.as_ref();

        let func_id = match self.scopes.lookup(&fn_call.name) {
            Some(Symbol::Func(func_id)) => *func_id,
            Some(Symbol::Var(_)) => {
                return err(
                    format!("\"{}\" is a variable, not a function.", fn_call.name),
                    LangErrorKind::UnsupportedExpression,
                    file_pos,
                )
            }
            None => {
                return err(
                    format!("Unable to resolve function \"{}\".", fn_call.name),
                    LangErrorKind::UnresolvedSymbol,
                    file_pos,
                )
            }
        };

        let signature = self.module.signature(func_id).map_err(ir_err(file_pos))?;
        if signature.params.len() != fn_call.arguments.len() {
            return err(
                format!(
                    "Function \"{}\" takes {} arguments, was given {}.",
                    fn_call.name,
                    signature.params.len(),
                    fn_call.arguments.len()
                ),
                LangErrorKind::CodeGenError,
                file_pos,
            );
        }

        let mut args = Vec::with_capacity(fn_call.arguments.len());
        for (arg, param_ty) in fn_call.arguments.iter().zip(&signature.params) {
            let value = self.compile_expr(arg)?;
            let value = self.cast(&value, param_ty, arg.file_pos())?;
            args.push(value);
        }

        self.builder(file_pos)?
            .call(&signature, &args)
            .map_err(ir_err(file_pos))
    }

    /// Declares a new variable in the current scope. If the name already is
    /// bound in the current scope, the new variable replaces it.
    fn compile_assign(&mut self, assign: &Assign) -> LangResult<()> {
        let file_pos = assign.file_pos.as_ref();

        let mut value = self.compile_expr(&assign.value)?;
        if let Some(ty) = assign.ty {
            value = self.cast(&value, &to_ir_type(ty), file_pos)?;
        }

        let mut builder = self.builder(file_pos)?;
        let ptr = builder.alloca(value.ty.clone()).map_err(ir_err(file_pos))?;
        builder.store(&value, &ptr).map_err(ir_err(file_pos))?;

        self.scopes.insert(assign.name.clone(), Symbol::Var(ptr));
        Ok(())
    }

    /// Only the first returned value is used.
    fn compile_return(&mut self, ret: &Return) -> LangResult<()> {
        let file_pos = ret.file_pos.as_ref();
        let ret_type = self.cur_ret_type(file_pos)?;

        if ret.values.len() > 1 {
            warn!(
                "Return with {} values, only the first one is used: {}",
                ret.values.len(),
                Expr::Return(ret.clone())
            );
        }

        if let Some(first) = ret.values.first() {
            if ret_type.is_void() {
                return err(
                    "Returning a value from a function returning void.".into(),
                    LangErrorKind::CodeGenError,
                    file_pos,
                );
            }

            let value = self.compile_expr(first)?;
            let value = self.cast(&value, &ret_type, file_pos)?;
            self.builder(file_pos)?
                .ret(&value)
                .map_err(ir_err(file_pos))
        } else {
            self.builder(file_pos)?
                .ret_void()
                .map_err(ir_err(file_pos))
        }
    }

    pub(crate) fn cast(
        &mut self,
        value: &Value,
        ty: &Type,
        file_pos: Option<&FilePosition>,
    ) -> LangResult<Value> {
        self.builder(file_pos)?
            .cast(value, ty)
            .map_err(ir_err(file_pos))
    }
}
