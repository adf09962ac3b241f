use std::fmt::Display;

use either::Either;

use crate::{
    error::{IrError, IrErrorKind, IrResult},
    instr::{EndInstr, ExprInstr},
};

#[derive(Debug, Clone)]
pub struct BasicBlock {
    /// The unique label of this basic block inside its function.
    label: String,

    /// A list of all instructions inside the body of this basic block (excluding
    /// the last `end_instruction`).
    ///
    /// The order of the instructions inside the `instructions` vector is the
    /// "actual" order of the instructions and the flow of the program.
    instructions: Vec<ExprInstr>,

    /// The last instruction of this basic block. Once this is set, no more
    /// instructions can be added to the block.
    end_instruction: Option<EndInstr>,
}

impl BasicBlock {
    pub fn new(label: String) -> Self {
        Self {
            label,
            instructions: Vec::default(),
            end_instruction: None,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn end_instruction(&self) -> Option<&EndInstr> {
        self.end_instruction.as_ref()
    }

    pub fn is_terminated(&self) -> bool {
        self.end_instruction.is_some()
    }

    /// Adds a instruction to the end of this basic block (EXCLUDING end instruction).
    pub fn push(&mut self, instruction: ExprInstr) -> IrResult<()> {
        self.ensure_not_terminated(&instruction.to_string())?;
        self.instructions.push(instruction);
        Ok(())
    }

    /// Sets the terminator of this block. A block can only be terminated once.
    pub fn set_end_instruction(&mut self, end_instr: EndInstr) -> IrResult<()> {
        self.ensure_not_terminated(&end_instr.to_string())?;
        self.end_instruction = Some(end_instr);
        Ok(())
    }

    pub fn instructions(&self) -> &[ExprInstr] {
        &self.instructions
    }

    /// Iterates over all instructions of this block in order, the end
    /// instruction (if set) is the last item.
    pub fn iter(&self) -> impl Iterator<Item = Either<&ExprInstr, &EndInstr>> {
        self.instructions
            .iter()
            .map(Either::Left)
            .chain(self.end_instruction.iter().map(Either::Right))
    }

    fn ensure_not_terminated(&self, instr_str: &str) -> IrResult<()> {
        if self.is_terminated() {
            Err(IrError::new(
                format!(
                    "Tried to add \"{}\" to block \"{}\" which is already terminated.",
                    instr_str, self.label
                ),
                IrErrorKind::Terminated,
            ))
        } else {
            Ok(())
        }
    }
}

impl Display for BasicBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}:", self.label)?;
        for instr in self.iter() {
            match instr {
                Either::Left(expr_instr) => writeln!(f, "  {}", expr_instr)?,
                Either::Right(end_instr) => writeln!(f, "  {}", end_instr)?,
            }
        }
        Ok(())
    }
}
