use log::debug;

use common::{
    error::{LangError, LangErrorKind, LangResult},
    file::FilePosition,
    token::stmt::{Else, If, Stmt},
};
use ir::{BlockId, Type};

use crate::{generator::CodeGen, util::ir_err};

impl CodeGen {
    pub(crate) fn compile_stmts(&mut self, stmts: &[Stmt]) -> LangResult<()> {
        for stmt in stmts {
            match stmt {
                Stmt::Expr(expr) => self.compile_expr_stmt(expr)?,
                Stmt::If(if_) => self.compile_if(if_)?,
            }
        }
        Ok(())
    }

    /// Compiles a if-statement together with all its `else if`/`else`. When
    /// this function returns, the current block is set to the block that
    /// follows the whole if-statement.
    fn compile_if(&mut self, if_: &If) -> LangResult<()> {
        let next_block = self.compile_if_case(if_)?;
        self.cur_block = Some(next_block);
        Ok(())
    }

    /// Compiles one case of a if-statement. The condition is compiled into the
    /// current block which then branches to either the body of this case or
    /// the "else" of this case.
    ///
    /// Returns the "next" block that the bodies of this case merges into. The
    /// returned block isn't terminated.
    fn compile_if_case(&mut self, if_: &If) -> LangResult<BlockId> {
        let file_pos = if_.file_pos.as_ref();

        let cond = self.compile_expr(&if_.cond)?;
        let cond = self.cast(&cond, &Type::I1, file_pos)?;
        let cond_block = self.cur_block_id(file_pos)?;

        let true_block = self.add_block("if.true", file_pos)?;
        let true_end_block = self.compile_scoped_body(true_block, &if_.body, file_pos)?;

        let next_block = self.add_block("if.next", file_pos)?;

        let false_block = match &if_.else_ {
            None => next_block,

            Some(Else::Block(body)) => {
                let false_block = self.add_block("if.false", file_pos)?;
                let false_end_block = self.compile_scoped_body(false_block, body, file_pos)?;
                self.branch_if_open(false_end_block, next_block, file_pos)?;
                false_block
            }

            // The "else if" gets its own block containing the evaluation of
            // its condition. The nested case merges into its own next block
            // which then falls through to the next block of this case.
            Some(Else::If(else_if)) => {
                let guard_block = self.add_block("if.guard", file_pos)?;
                self.cur_block = Some(guard_block);
                let nested_next_block = self.compile_if_case(else_if)?;
                self.branch_if_open(nested_next_block, next_block, file_pos)?;
                guard_block
            }
        };

        self.builder_at(cond_block, file_pos)?
            .cond_br(&cond, true_block, false_block)
            .map_err(ir_err(file_pos))?;
        self.branch_if_open(true_end_block, next_block, file_pos)?;

        debug!(
            "Compiled if case, cond block: {:?}, true block: {:?}, false block: {:?}, next block: {:?}",
            cond_block, true_block, false_block, next_block
        );

        self.cur_block = Some(next_block);
        Ok(next_block)
    }

    /// Compiles `body` into the block `block_id` inside a new scope. Returns
    /// the block that the body ends in.
    fn compile_scoped_body(
        &mut self,
        block_id: BlockId,
        body: &[Stmt],
        file_pos: Option<&FilePosition>,
    ) -> LangResult<BlockId> {
        self.cur_block = Some(block_id);
        self.scopes.push();
        self.compile_stmts(body)?;
        self.scopes.pop();
        self.cur_block_id(file_pos)
    }

    /// Adds a branch from `block_id` to `target` if `block_id` doesn't already
    /// have a terminator (ex. a return).
    fn branch_if_open(
        &mut self,
        block_id: BlockId,
        target: BlockId,
        file_pos: Option<&FilePosition>,
    ) -> LangResult<()> {
        let mut builder = self.builder_at(block_id, file_pos)?;
        if !builder.is_terminated().map_err(ir_err(file_pos))? {
            builder.br(target).map_err(ir_err(file_pos))?;
        }
        Ok(())
    }

    fn cur_block_id(&self, file_pos: Option<&FilePosition>) -> LangResult<BlockId> {
        self.cur_block.ok_or_else(|| {
            LangError::new(
                "cur_block is None when compiling if.".into(),
                LangErrorKind::CodeGenError,
                file_pos.copied(),
            )
        })
    }
}
