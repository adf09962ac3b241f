use std::fmt::Display;

use itertools::Itertools;
use log::debug;

use crate::{
    basic_block::BasicBlock,
    error::{IrError, IrErrorKind, IrResult},
    instr::{BinOper, CastOper, CmpOper, EndInstr, ExprInstr, ExprInstrKind},
    ty::Type,
    value::{Value, ValueKind},
    BlockId,
};

/// The label of the first block of every function.
pub const ENTRY_LABEL: &str = "entry.0";

/// The name, parameter types and return type of a function. Used when
/// creating calls to the function.
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    pub name: String,
    pub params: Vec<Type>,
    pub ret_type: Type,
}

#[derive(Debug, Clone)]
pub struct Function {
    pub name: String,
    pub ret_type: Type,

    /// The names and types of the parameters in order.
    pub params: Vec<(String, Type)>,

    /// Contains all basic blocks that belongs to this function.
    /// The order of the blocks inside the `basic_blocks` vector is the "actual"
    /// order of the basic blocks and the flow of the program.
    basic_blocks: Vec<BasicBlock>,

    /// Counter used to give every temporary value a unique name.
    tmp_count: usize,
}

impl Function {
    pub fn new(name: String, ret_type: Type) -> Self {
        Self {
            name,
            ret_type,
            params: Vec::default(),
            basic_blocks: Vec::default(),
            tmp_count: 0,
        }
    }

    /// Adds a new parameter to the end of the parameter list and returns the
    /// value that can be used to reference it inside the function body.
    pub fn add_argument(&mut self, name: String, ty: Type) -> Value {
        self.params.push((name.clone(), ty.clone()));
        Value::new(ValueKind::Param(name), ty)
    }

    pub fn signature(&self) -> Signature {
        Signature {
            name: self.name.clone(),
            params: self.params.iter().map(|(_, ty)| ty.clone()).collect(),
            ret_type: self.ret_type.clone(),
        }
    }

    /// Returns the entry block of this function, it is created if it doesn't
    /// exist.
    pub fn entry(&mut self) -> BlockId {
        if self.basic_blocks.is_empty() {
            self.basic_blocks
                .push(BasicBlock::new(ENTRY_LABEL.into()));
        }
        BlockId(0)
    }

    /// Creates a new basic block at the end of this function. The index of the
    /// block is appended to the `label` to make it unique, ex. `if.true.3`.
    pub fn add_block(&mut self, label: &str) -> BlockId {
        self.entry();
        let id = BlockId(self.basic_blocks.len());
        let unique_label = format!("{}.{}", label, *id);
        debug!("Adding block \"{}\" to function \"{}\".", unique_label, self.name);
        self.basic_blocks.push(BasicBlock::new(unique_label));
        id
    }

    pub fn block(&self, id: BlockId) -> IrResult<&BasicBlock> {
        self.basic_blocks.get(*id).ok_or_else(|| {
            IrError::new(
                format!("Unable to find block {} in function \"{}\".", *id, self.name),
                IrErrorKind::Lookup,
            )
        })
    }

    fn block_mut(&mut self, id: BlockId) -> IrResult<&mut BasicBlock> {
        let name = &self.name;
        self.basic_blocks.get_mut(*id).ok_or_else(|| {
            IrError::new(
                format!("Unable to find block {} in function \"{}\".", *id, name),
                IrErrorKind::Lookup,
            )
        })
    }

    /// Returns the block with the given label.
    pub fn block_by_label(&self, label: &str) -> Option<&BasicBlock> {
        self.basic_blocks.iter().find(|b| b.label() == label)
    }

    pub fn blocks(&self) -> &[BasicBlock] {
        &self.basic_blocks
    }

    /// Returns a builder that appends instructions to the end of the block
    /// with ID `block_id`.
    pub fn at(&mut self, block_id: BlockId) -> Builder<'_> {
        Builder {
            func: self,
            block_id,
        }
    }

    fn new_tmp(&mut self, ty: Type) -> Value {
        let value = Value::new(ValueKind::Tmp(self.tmp_count), ty);
        self.tmp_count += 1;
        value
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let params = self
            .params
            .iter()
            .map(|(name, ty)| format!("{} %{}", ty, name))
            .join(", ");
        writeln!(f, "define {} @{}({}) {{", self.ret_type, self.name, params)?;
        write!(f, "{}", self.basic_blocks.iter().join("\n"))?;
        writeln!(f, "}}")
    }
}

/// Appends instructions to a specific block of a function. Every operation
/// checks the types of its operands and returns a error if they are invalid.
pub struct Builder<'a> {
    func: &'a mut Function,
    block_id: BlockId,
}

impl<'a> Builder<'a> {
    pub fn is_terminated(&self) -> IrResult<bool> {
        Ok(self.func.block(self.block_id)?.is_terminated())
    }

    /// Allocates storage for a value of type `ty` and returns a pointer to it.
    pub fn alloca(&mut self, ty: Type) -> IrResult<Value> {
        let ptr_ty = Type::Pointer(Box::new(ty.clone()));
        self.push_with_val(ptr_ty, ExprInstrKind::Alloca(ty))
    }

    pub fn load(&mut self, ptr: &Value) -> IrResult<Value> {
        let ty = Self::pointee(ptr)?.clone();
        self.push_with_val(ty, ExprInstrKind::Load(ptr.clone()))
    }

    pub fn store(&mut self, value: &Value, ptr: &Value) -> IrResult<()> {
        let pointee = Self::pointee(ptr)?;
        if pointee != &value.ty {
            return Err(mismatch(format!(
                "Tried to store value of type {} into pointer to {}.",
                value.ty, pointee
            )));
        }
        self.push(ExprInstr::new(
            None,
            ExprInstrKind::Store(value.clone(), ptr.clone()),
        ))
    }

    pub fn add(&mut self, lhs: &Value, rhs: &Value) -> IrResult<Value> {
        self.bin_op(BinOper::Add, lhs, rhs, Type::is_number)
    }

    pub fn sub(&mut self, lhs: &Value, rhs: &Value) -> IrResult<Value> {
        self.bin_op(BinOper::Sub, lhs, rhs, Type::is_number)
    }

    pub fn mul(&mut self, lhs: &Value, rhs: &Value) -> IrResult<Value> {
        self.bin_op(BinOper::Mul, lhs, rhs, Type::is_number)
    }

    pub fn fdiv(&mut self, lhs: &Value, rhs: &Value) -> IrResult<Value> {
        self.bin_op(BinOper::FDiv, lhs, rhs, Type::is_float)
    }

    pub fn sdiv(&mut self, lhs: &Value, rhs: &Value) -> IrResult<Value> {
        self.bin_op(BinOper::SDiv, lhs, rhs, Type::is_int)
    }

    /// Compares two values of the same type, the result is of type i1.
    pub fn cmp(&mut self, oper: CmpOper, lhs: &Value, rhs: &Value) -> IrResult<Value> {
        Self::ensure_same_type(lhs, rhs)?;
        if lhs.ty.is_void() || lhs.ty.is_pointer() {
            return Err(mismatch(format!("Unable to compare values of type {}.", lhs.ty)));
        }
        self.push_with_val(
            Type::I1,
            ExprInstrKind::Cmp(oper, lhs.clone(), rhs.clone()),
        )
    }

    /// Calls the function with signature `callee`. Returns the returned value,
    /// or None if the callee returns void.
    pub fn call(&mut self, callee: &Signature, args: &[Value]) -> IrResult<Option<Value>> {
        if callee.params.len() != args.len() {
            return Err(IrError::new(
                format!(
                    "Function \"{}\" takes {} arguments, was given {}.",
                    callee.name,
                    callee.params.len(),
                    args.len()
                ),
                IrErrorKind::ArgCount,
            ));
        }

        for (idx, (param_ty, arg)) in callee.params.iter().zip(args).enumerate() {
            if param_ty != &arg.ty {
                return Err(mismatch(format!(
                    "Argument {} to function \"{}\" is of type {}, expected {}.",
                    idx, callee.name, arg.ty, param_ty
                )));
            }
        }

        let kind = ExprInstrKind::Call(callee.name.clone(), callee.ret_type.clone(), args.to_vec());
        if callee.ret_type.is_void() {
            self.push(ExprInstr::new(None, kind))?;
            Ok(None)
        } else {
            self.push_with_val(callee.ret_type.clone(), kind).map(Some)
        }
    }

    /// Casts `value` to the type `ty`. If the value already is of type `ty`, it
    /// is returned as is and no instruction is added.
    pub fn cast(&mut self, value: &Value, ty: &Type) -> IrResult<Value> {
        let from = &value.ty;
        if from == ty {
            return Ok(value.clone());
        } else if let Some(folded) = value.fold_cast(ty) {
            return Ok(folded);
        }

        // Casts to bool are done by comparing the value against zero.
        if ty.is_bool() {
            if from.is_int() {
                let zero = Value::const_int(0, from.clone());
                return self.cmp(CmpOper::Ne, value, &zero);
            } else if from.is_float() {
                let zero = Value::const_float(0.0, from.clone());
                return self.cmp(CmpOper::Ne, value, &zero);
            }
        }

        let oper = match (from.bit_width(), ty.bit_width()) {
            (Some(from_bits), Some(to_bits)) if from.is_bool() && ty.is_int() => {
                debug_assert!(from_bits < to_bits);
                CastOper::ZExt
            }
            (Some(from_bits), Some(to_bits)) if from.is_int() && ty.is_int() => {
                if from_bits < to_bits {
                    CastOper::SExt
                } else {
                    CastOper::Trunc
                }
            }
            (Some(from_bits), Some(to_bits)) if from.is_float() && ty.is_float() => {
                if from_bits < to_bits {
                    CastOper::FPExt
                } else {
                    CastOper::FPTrunc
                }
            }
            _ if from.is_int() && ty.is_float() => CastOper::SIToFP,
            _ if from.is_bool() && ty.is_float() => CastOper::UIToFP,
            _ if from.is_float() && ty.is_int() => CastOper::FPToSI,
            _ => {
                return Err(mismatch(format!(
                    "Unable to cast value of type {} to {}.",
                    from, ty
                )))
            }
        };

        self.push_with_val(
            ty.clone(),
            ExprInstrKind::Cast(oper, value.clone(), ty.clone()),
        )
    }

    pub fn br(&mut self, target: BlockId) -> IrResult<()> {
        let label = self.func.block(target)?.label().to_string();
        self.terminate(EndInstr::Branch(label))
    }

    pub fn cond_br(&mut self, cond: &Value, true_block: BlockId, false_block: BlockId) -> IrResult<()> {
        if !cond.ty.is_bool() {
            return Err(mismatch(format!(
                "Condition of branch must be of type i1, was {}.",
                cond.ty
            )));
        }

        let true_label = self.func.block(true_block)?.label().to_string();
        let false_label = self.func.block(false_block)?.label().to_string();
        self.terminate(EndInstr::BranchIf(cond.clone(), true_label, false_label))
    }

    pub fn ret(&mut self, value: &Value) -> IrResult<()> {
        if value.ty != self.func.ret_type {
            return Err(mismatch(format!(
                "Tried to return value of type {} from function \"{}\" returning {}.",
                value.ty, self.func.name, self.func.ret_type
            )));
        }
        self.terminate(EndInstr::Return(Some(value.clone())))
    }

    pub fn ret_void(&mut self) -> IrResult<()> {
        if !self.func.ret_type.is_void() {
            return Err(mismatch(format!(
                "Tried to return void from function \"{}\" returning {}.",
                self.func.name, self.func.ret_type
            )));
        }
        self.terminate(EndInstr::Return(None))
    }

    pub fn unreachable(&mut self) -> IrResult<()> {
        self.terminate(EndInstr::Unreachable)
    }

    fn bin_op(
        &mut self,
        oper: BinOper,
        lhs: &Value,
        rhs: &Value,
        valid_ty: fn(&Type) -> bool,
    ) -> IrResult<Value> {
        Self::ensure_same_type(lhs, rhs)?;
        if !valid_ty(&lhs.ty) {
            return Err(mismatch(format!(
                "Invalid operand type {} for {:?}.",
                lhs.ty, oper
            )));
        }
        self.push_with_val(
            lhs.ty.clone(),
            ExprInstrKind::BinOp(oper, lhs.clone(), rhs.clone()),
        )
    }

    fn push_with_val(&mut self, ty: Type, kind: ExprInstrKind) -> IrResult<Value> {
        // Make sure that the block isn't terminated before a new temporary is
        // allocated so that the numbering doesn't get any holes.
        let block = self.func.block(self.block_id)?;
        if block.is_terminated() {
            return Err(IrError::new(
                format!(
                    "Tried to add {:?} to block \"{}\" which is already terminated.",
                    kind,
                    block.label()
                ),
                IrErrorKind::Terminated,
            ));
        }

        let val = self.func.new_tmp(ty);
        self.push(ExprInstr::new(Some(val.clone()), kind))?;
        Ok(val)
    }

    fn push(&mut self, instr: ExprInstr) -> IrResult<()> {
        self.func.block_mut(self.block_id)?.push(instr)
    }

    fn terminate(&mut self, end_instr: EndInstr) -> IrResult<()> {
        self.func
            .block_mut(self.block_id)?
            .set_end_instruction(end_instr)
    }

    fn pointee(ptr: &Value) -> IrResult<&Type> {
        ptr.ty.pointee().ok_or_else(|| {
            mismatch(format!(
                "Expected value of pointer type, was {}.",
                ptr.ty
            ))
        })
    }

    fn ensure_same_type(lhs: &Value, rhs: &Value) -> IrResult<()> {
        if lhs.ty == rhs.ty {
            Ok(())
        } else {
            Err(mismatch(format!(
                "Operands have different types: {} and {}.",
                lhs.ty, rhs.ty
            )))
        }
    }
}

fn mismatch(msg: String) -> IrError {
    IrError::new(msg, IrErrorKind::TypeMismatch)
}
