use std::collections::HashSet;

use log::{debug, warn};

use common::{
    error::{LangErrorKind, LangResult},
    file::FilePosition,
    token::ast::FnDecl,
};
use ir::{BlockId, Builder, FuncId, Module, Type, Value, ValueKind};

use crate::{
    scope::{ScopeStack, Symbol},
    util::{err, ir_err, to_ir_type},
};

pub(crate) struct CodeGen {
    /// The IR module that the functions are generated into.
    pub(crate) module: Module,

    pub(crate) scopes: ScopeStack,

    /// The function and block that instructions currently are added to.
    pub(crate) cur_func: Option<FuncId>,
    pub(crate) cur_block: Option<BlockId>,
}

impl CodeGen {
    pub(crate) fn new(module_name: String) -> Self {
        Self {
            module: Module::new(module_name),
            scopes: ScopeStack::new(),
            cur_func: None,
            cur_block: None,
        }
    }

    pub(crate) fn compile(mut self, fn_decls: &[FnDecl]) -> LangResult<Module> {
        self.compile_fns(fn_decls)?;
        Ok(self.module)
    }

    /// Compiles the functions into `self.module`. If a error is returned, the
    /// module contains everything that was generated before the error.
    pub(crate) fn compile_fns(&mut self, fn_decls: &[FnDecl]) -> LangResult<()> {
        let func_ids = self.compile_fn_decls(fn_decls)?;
        self.compile_fn_bodies(fn_decls, &func_ids)
    }

    /// Declares all functions in the module and binds their names in the
    /// global scope. This is done before any function body is compiled so
    /// that a function can call functions declared after it.
    fn compile_fn_decls(&mut self, fn_decls: &[FnDecl]) -> LangResult<Vec<FuncId>> {
        let mut func_ids = Vec::with_capacity(fn_decls.len());

        for fn_decl in fn_decls {
            let file_pos = fn_decl.file_pos.as_ref();

            // Only the first return type is used, functions without return
            // types returns void.
            if fn_decl.returns.len() > 1 {
                warn!(
                    "Function \"{}\" declares {} return types, only the first one is used.",
                    fn_decl.name,
                    fn_decl.returns.len()
                );
            }
            let ret_type = fn_decl
                .returns
                .first()
                .map(|ty| to_ir_type(*ty))
                .unwrap_or(Type::Void);

            let func_id = self
                .module
                .new_function(fn_decl.name.clone(), ret_type)
                .map_err(ir_err(file_pos))?;

            let mut param_names = HashSet::new();
            let func = self.module.func_mut(func_id).map_err(ir_err(file_pos))?;
            for param in &fn_decl.params {
                if !param_names.insert(param.name.as_str()) {
                    return err(
                        format!(
                            "Parameter \"{}\" declared multiple times in function \"{}\".",
                            param.name, fn_decl.name
                        ),
                        LangErrorKind::CodeGenError,
                        file_pos,
                    );
                }
                func.add_argument(param.name.clone(), to_ir_type(param.ty));
            }

            self.scopes
                .insert_global(fn_decl.name.clone(), Symbol::Func(func_id));
            func_ids.push(func_id);
        }

        Ok(func_ids)
    }

    fn compile_fn_bodies(&mut self, fn_decls: &[FnDecl], func_ids: &[FuncId]) -> LangResult<()> {
        for (fn_decl, func_id) in fn_decls.iter().zip(func_ids) {
            self.compile_fn_body(fn_decl, *func_id)?;
        }
        Ok(())
    }

    fn compile_fn_body(&mut self, fn_decl: &FnDecl, func_id: FuncId) -> LangResult<()> {
        let file_pos = fn_decl.file_pos.as_ref();
        debug!("Compiling body of function \"{}\".", fn_decl.name);

        // Every function starts from the global scope only.
        self.scopes.reset_to_global();
        self.scopes.push();

        let func = self.module.func_mut(func_id).map_err(ir_err(file_pos))?;
        let entry = func.entry();
        let params = func.params.clone();
        self.cur_func = Some(func_id);
        self.cur_block = Some(entry);

        // The parameters are stored on the stack so that they are accessed
        // the same way as variables declared in the body.
        for (name, ty) in params {
            let param_value = Value::new(ValueKind::Param(name.clone()), ty.clone());
            let mut builder = self.builder(file_pos)?;
            let ptr = builder.alloca(ty).map_err(ir_err(file_pos))?;
            builder
                .store(&param_value, &ptr)
                .map_err(ir_err(file_pos))?;
            self.scopes.insert(name, Symbol::Var(ptr));
        }

        self.compile_stmts(&fn_decl.body)?;

        // Terminate the last block if the body didn't end with a return.
        let ret_is_void = self.cur_ret_type(file_pos)?.is_void();
        let mut builder = self.builder(file_pos)?;
        if !builder.is_terminated().map_err(ir_err(file_pos))? {
            if ret_is_void {
                builder.ret_void().map_err(ir_err(file_pos))?;
            } else {
                builder.unreachable().map_err(ir_err(file_pos))?;
            }
        }

        self.scopes.pop();
        self.cur_func = None;
        self.cur_block = None;
        Ok(())
    }

    /// Returns a builder that adds instructions to the end of the current block.
    pub(crate) fn builder(&mut self, file_pos: Option<&FilePosition>) -> LangResult<Builder<'_>> {
        let block_id = if let Some(block_id) = self.cur_block {
            block_id
        } else {
            return err(
                "cur_block is None when building instruction.".into(),
                LangErrorKind::CodeGenError,
                file_pos,
            );
        };
        Ok(self.cur_func_mut(file_pos)?.at(block_id))
    }

    /// Returns a builder that adds instructions to the end of the block
    /// `block_id` in the current function.
    pub(crate) fn builder_at(
        &mut self,
        block_id: BlockId,
        file_pos: Option<&FilePosition>,
    ) -> LangResult<Builder<'_>> {
        Ok(self.cur_func_mut(file_pos)?.at(block_id))
    }

    pub(crate) fn add_block(&mut self, label: &str, file_pos: Option<&FilePosition>) -> LangResult<BlockId> {
        Ok(self.cur_func_mut(file_pos)?.add_block(label))
    }

    pub(crate) fn cur_ret_type(&self, file_pos: Option<&FilePosition>) -> LangResult<Type> {
        if let Some(func_id) = self.cur_func {
            let func = self.module.func(func_id).map_err(ir_err(file_pos))?;
            Ok(func.ret_type.clone())
        } else {
            err(
                "cur_func is None when fetching return type.".into(),
                LangErrorKind::CodeGenError,
                file_pos,
            )
        }
    }

    fn cur_func_mut(&mut self, file_pos: Option<&FilePosition>) -> LangResult<&mut ir::Function> {
        if let Some(func_id) = self.cur_func {
            self.module.func_mut(func_id).map_err(ir_err(file_pos))
        } else {
            err(
                "cur_func is None when building instruction.".into(),
                LangErrorKind::CodeGenError,
                file_pos,
            )
        }
    }
}
