use std::{
    collections::{hash_map::Entry, HashMap},
    fmt::Display,
};

use itertools::Itertools;

use crate::{
    error::{IrError, IrErrorKind, IrResult},
    func::{Function, Signature},
    ty::Type,
    FuncId,
};

#[derive(Debug)]
pub struct Module {
    pub name: String,

    /// All functions in the order that they were created. The `FuncId` of a
    /// function is its index in this vector.
    funcs: Vec<Function>,

    /// Maps the name of a function to its index in `funcs`.
    funcs_indices: HashMap<String, FuncId>,
}

impl Module {
    pub fn new(name: String) -> Self {
        Self {
            name,
            funcs: Vec::default(),
            funcs_indices: HashMap::default(),
        }
    }

    /// Creates a new function without any parameters or blocks. Returns an
    /// error if a function with the same name already exists.
    pub fn new_function(&mut self, name: String, ret_type: Type) -> IrResult<FuncId> {
        let id = FuncId(self.funcs.len());
        match self.funcs_indices.entry(name) {
            Entry::Occupied(entry) => Err(IrError::new(
                format!("Function with name \"{}\" already exists.", entry.key()),
                IrErrorKind::Lookup,
            )),
            Entry::Vacant(entry) => {
                self.funcs
                    .push(Function::new(entry.key().clone(), ret_type));
                entry.insert(id);
                Ok(id)
            }
        }
    }

    pub fn lookup(&self, name: &str) -> Option<FuncId> {
        self.funcs_indices.get(name).copied()
    }

    pub fn func(&self, id: FuncId) -> IrResult<&Function> {
        self.funcs.get(*id).ok_or_else(|| Self::missing(id))
    }

    pub fn func_mut(&mut self, id: FuncId) -> IrResult<&mut Function> {
        self.funcs.get_mut(*id).ok_or_else(|| Self::missing(id))
    }

    pub fn signature(&self, id: FuncId) -> IrResult<Signature> {
        Ok(self.func(id)?.signature())
    }

    /// Iterates over the functions in the order that they were created.
    pub fn funcs(&self) -> impl Iterator<Item = &Function> {
        self.funcs.iter()
    }

    fn missing(id: FuncId) -> IrError {
        IrError::new(
            format!("Unable to find function with ID {}.", *id),
            IrErrorKind::Lookup,
        )
    }
}

/// Renders the module as textual LLVM IR.
impl Display for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "; ModuleID = '{}'", self.name)?;
        writeln!(f, "source_filename = \"{}\"", self.name)?;
        writeln!(f)?;
        write!(f, "{}", self.funcs.iter().join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn test_new_function() {
        let mut module = Module::new("test".into());
        let main_id = module.new_function("main".into(), Type::I32).unwrap();
        let f_id = module.new_function("f".into(), Type::Void).unwrap();

        assert_eq!(Some(main_id), module.lookup("main"));
        assert_eq!(Some(f_id), module.lookup("f"));
        assert_eq!(None, module.lookup("g"));
        assert!(module.func(FuncId(2)).is_err());

        let err = module.new_function("f".into(), Type::I32).unwrap_err();
        assert_eq!(IrErrorKind::Lookup, err.kind);

        let names = module.funcs().map(|f| f.name.as_str()).collect::<Vec<_>>();
        assert_eq!(vec!["main", "f"], names);
    }

    #[test]
    fn test_render_module() {
        let mut module = Module::new("test".into());

        let f_id = module.new_function("f".into(), Type::Void).unwrap();
        let f = module.func_mut(f_id).unwrap();
        let entry = f.entry();
        f.at(entry).ret_void().unwrap();

        let main_id = module.new_function("main".into(), Type::I32).unwrap();
        let f_sig = module.signature(f_id).unwrap();
        let main = module.func_mut(main_id).unwrap();
        let entry = main.entry();
        let mut builder = main.at(entry);
        assert_eq!(None, builder.call(&f_sig, &[]).unwrap());
        builder.ret(&Value::const_int(0, Type::I32)).unwrap();

        let expected = "; ModuleID = 'test'\n\
                        source_filename = \"test\"\n\
                        \n\
                        define void @f() {\n\
                        entry.0:\n  \
                        ret void\n\
                        }\n\
                        \n\
                        define i32 @main() {\n\
                        entry.0:\n  \
                        call void @f()\n  \
                        ret i32 0\n\
                        }\n";
        assert_eq!(expected, module.to_string());
    }
}
