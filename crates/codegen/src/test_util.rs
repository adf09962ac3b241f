//! A small interpreter for the generated IR. Only used by tests to verify the
//! behaviour of the generated code.

use std::collections::HashMap;

use either::Either;

use ir::{
    instr::{BinOper, CastOper, CmpOper, EndInstr, ExprInstrKind},
    Module, Type, Value, ValueKind,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum RtValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Ptr(usize),
}

struct Frame {
    params: HashMap<String, RtValue>,
    tmps: HashMap<usize, RtValue>,
    memory: Vec<Option<RtValue>>,
}

impl Frame {
    fn get(&self, value: &Value) -> RtValue {
        match &value.kind {
            ValueKind::Tmp(n) => self.tmps[n],
            ValueKind::Param(name) => self.params[name],
            ValueKind::ConstInt(int) => RtValue::Int(*int),
            ValueKind::ConstFloat(float) => RtValue::Float(*float),
            ValueKind::ConstBool(boolean) => RtValue::Bool(*boolean),
        }
    }

    fn set(&mut self, value: &Option<Value>, rt_value: RtValue) {
        if let Some(Value {
            kind: ValueKind::Tmp(n),
            ..
        }) = value
        {
            self.tmps.insert(*n, rt_value);
        }
    }
}

/// Runs the function with name `name`. Returns None if the function returns
/// void.
pub(crate) fn run(module: &Module, name: &str, args: &[RtValue]) -> Option<RtValue> {
    let func_id = module.lookup(name).expect("function not found");
    let func = module.func(func_id).unwrap();

    let mut frame = Frame {
        params: func
            .params
            .iter()
            .map(|(name, _)| name.clone())
            .zip(args.iter().copied())
            .collect(),
        tmps: HashMap::new(),
        memory: Vec::new(),
    };

    let mut block = &func.blocks()[0];
    loop {
        let mut next_label = None;

        for instr in block.iter() {
            match instr {
                Either::Left(expr_instr) => {
                    let result = eval_expr(module, &mut frame, &expr_instr.kind);
                    if let Some(result) = result {
                        frame.set(&expr_instr.val, result);
                    }
                }
                Either::Right(end_instr) => match end_instr {
                    EndInstr::Return(value) => return value.as_ref().map(|v| frame.get(v)),
                    EndInstr::Branch(label) => next_label = Some(label.clone()),
                    EndInstr::BranchIf(cond, true_label, false_label) => {
                        next_label = Some(match frame.get(cond) {
                            RtValue::Bool(true) => true_label.clone(),
                            RtValue::Bool(false) => false_label.clone(),
                            v => panic!("condition not a bool: {:?}", v),
                        });
                    }
                    EndInstr::Unreachable => panic!("reached unreachable in {}", name),
                },
            }
        }

        let label = next_label.expect("block without terminator");
        block = func.block_by_label(&label).expect("branch to unknown block");
    }
}

fn eval_expr(module: &Module, frame: &mut Frame, kind: &ExprInstrKind) -> Option<RtValue> {
    Some(match kind {
        ExprInstrKind::Alloca(_) => {
            frame.memory.push(None);
            RtValue::Ptr(frame.memory.len() - 1)
        }
        ExprInstrKind::Load(ptr) => match frame.get(ptr) {
            RtValue::Ptr(idx) => frame.memory[idx].expect("load of uninitialized memory"),
            v => panic!("load from non pointer: {:?}", v),
        },
        ExprInstrKind::Store(value, ptr) => {
            let value = frame.get(value);
            match frame.get(ptr) {
                RtValue::Ptr(idx) => frame.memory[idx] = Some(value),
                v => panic!("store to non pointer: {:?}", v),
            }
            return None;
        }
        ExprInstrKind::BinOp(oper, lhs, rhs) => {
            let result = match (frame.get(lhs), frame.get(rhs)) {
                (RtValue::Int(l), RtValue::Int(r)) => RtValue::Int(match oper {
                    BinOper::Add => l.wrapping_add(r),
                    BinOper::Sub => l.wrapping_sub(r),
                    BinOper::Mul => l.wrapping_mul(r),
                    BinOper::SDiv => l / r,
                    BinOper::FDiv => panic!("fdiv on integers"),
                }),
                (RtValue::Float(l), RtValue::Float(r)) => RtValue::Float(match oper {
                    BinOper::Add => l + r,
                    BinOper::Sub => l - r,
                    BinOper::Mul => l * r,
                    BinOper::FDiv => l / r,
                    BinOper::SDiv => panic!("sdiv on floats"),
                }),
                (l, r) => panic!("invalid operands: {:?}, {:?}", l, r),
            };
            truncate(result, &lhs.ty)
        }
        ExprInstrKind::Cmp(oper, lhs, rhs) => {
            let ordering = match (frame.get(lhs), frame.get(rhs)) {
                (RtValue::Int(l), RtValue::Int(r)) => l.partial_cmp(&r),
                (RtValue::Float(l), RtValue::Float(r)) => l.partial_cmp(&r),
                // Ordering of i1 is rendered as unsigned, false < true.
                (RtValue::Bool(l), RtValue::Bool(r)) => l.partial_cmp(&r),
                (l, r) => panic!("invalid operands: {:?}, {:?}", l, r),
            };
            RtValue::Bool(match oper {
                CmpOper::Eq => ordering == Some(std::cmp::Ordering::Equal),
                CmpOper::Ne => ordering != Some(std::cmp::Ordering::Equal),
                CmpOper::Lt => ordering == Some(std::cmp::Ordering::Less),
                CmpOper::Gt => ordering == Some(std::cmp::Ordering::Greater),
            })
        }
        ExprInstrKind::Call(name, _, args) => {
            let args = args.iter().map(|arg| frame.get(arg)).collect::<Vec<_>>();
            return run(module, name, &args);
        }
        ExprInstrKind::Cast(oper, value, ty) => {
            let result = match (oper, frame.get(value)) {
                (CastOper::SExt, v) | (CastOper::Trunc, v) => v,
                (CastOper::ZExt, RtValue::Bool(b)) => RtValue::Int(b as i64),
                (CastOper::FPExt, v) | (CastOper::FPTrunc, v) => v,
                (CastOper::SIToFP, RtValue::Int(i)) => RtValue::Float(i as f64),
                (CastOper::UIToFP, RtValue::Bool(b)) => RtValue::Float(if b { 1.0 } else { 0.0 }),
                (CastOper::FPToSI, RtValue::Float(f)) => RtValue::Int(f as i64),
                (oper, v) => panic!("invalid cast {:?} of {:?}", oper, v),
            };
            truncate(result, ty)
        }
    })
}

/// Makes sure that values of the smaller types wraps the same way as they
/// would on a real machine.
fn truncate(value: RtValue, ty: &Type) -> RtValue {
    match (value, ty) {
        (RtValue::Int(i), Type::I32) => RtValue::Int(i as i32 as i64),
        (RtValue::Float(f), Type::F32) => RtValue::Float(f as f32 as f64),
        _ => value,
    }
}
