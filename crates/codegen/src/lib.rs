use common::{error::LangResult, token::ast::FnDecl};
use generator::CodeGen;

mod block;
mod expr;
mod generator;
mod scope;
mod util;

#[cfg(test)]
mod test_util;

/// Generates a IR module with name `module_name` containing all functions in
/// `fn_decls`. The functions are added to the module in the same order as
/// they are found in `fn_decls`.
pub fn generate(module_name: &str, fn_decls: &[FnDecl]) -> LangResult<ir::Module> {
    CodeGen::new(module_name.into()).compile(fn_decls)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{run, RtValue};
    use common::error::LangErrorKind;
    use ir::{instr::EndInstr, Module};

    fn compile(input: &str) -> LangResult<Module> {
        let lex_tokens = lex::lex(input)?;
        let fn_decls = parse::parse(&lex_tokens)?;
        generate("test", &fn_decls)
    }

    /// Asserts that every block of every function is terminated and that all
    /// branches target blocks that exists in the same function.
    fn assert_all_terminated(module: &Module) {
        for func in module.funcs() {
            for block in func.blocks() {
                let targets = match block.end_instruction() {
                    Some(EndInstr::Branch(label)) => vec![label],
                    Some(EndInstr::BranchIf(_, true_label, false_label)) => {
                        vec![true_label, false_label]
                    }
                    Some(_) => Vec::default(),
                    None => panic!(
                        "block \"{}\" in \"{}\" isn't terminated:\n{}",
                        block.label(),
                        func.name,
                        module
                    ),
                };
                for target in targets {
                    assert!(
                        func.block_by_label(target).is_some(),
                        "branch from \"{}\" to unknown block \"{}\":\n{}",
                        block.label(),
                        target,
                        module
                    );
                }
            }
        }
    }

    #[test]
    fn test_smoke() {
        let input = "helper :: i32 a -> i32 {\n\treturn a + 1\n}\n\nmain :: -> i32 {\n\tx := helper(4)\n\treturn x\n}\n";
        let module = compile(input).unwrap();

        assert_eq!(2, module.funcs().count());
        assert_all_terminated(&module);
        assert_eq!(Some(RtValue::Int(5)), run(&module, "main", &[]));

        let rendered = module.to_string();
        assert!(rendered.contains("define i32 @helper(i32 %a) {"));
        assert!(rendered.contains("define i32 @main() {"));
        assert!(rendered.contains("call i32 @helper(i32 4)"));
    }

    #[test]
    fn test_forward_call() {
        let input = "main :: -> i64 { return twice(21) }\ntwice :: i64 a -> i64 { return a * 2 }";
        let module = compile(input).unwrap();
        assert_eq!(Some(RtValue::Int(42)), run(&module, "main", &[]));
    }

    #[test]
    fn test_if_else_chain_terminated() {
        let input = "\
classify :: i32 a -> i32 {
    if a < 0 {
        return 1
    } else if a == 0 {
        x := 2
    } else if a > 100 {
        return 3
    } else {
        if a > 50 {
            return 4
        }
    }
    return 5
}";
        let module = compile(input).unwrap();
        assert_all_terminated(&module);

        let classify = |a: i64| run(&module, "classify", &[RtValue::Int(a)]);
        assert_eq!(Some(RtValue::Int(1)), classify(-3));
        assert_eq!(Some(RtValue::Int(5)), classify(0));
        assert_eq!(Some(RtValue::Int(3)), classify(101));
        assert_eq!(Some(RtValue::Int(4)), classify(60));
        assert_eq!(Some(RtValue::Int(5)), classify(7));
    }

    #[test]
    fn test_all_branches_return() {
        let input = "f :: bool b -> f64 {\nif b {\nreturn 1\n} else {\nreturn 2.5\n}\n}";
        let module = compile(input).unwrap();
        assert_all_terminated(&module);

        // The block after the if-statement can't be reached.
        let f = module.func(module.lookup("f").unwrap()).unwrap();
        let next = f.block_by_label("if.next.2").unwrap();
        assert_eq!(Some(&EndInstr::Unreachable), next.end_instruction());

        assert_eq!(Some(RtValue::Float(1.0)), run(&module, "f", &[RtValue::Bool(true)]));
        assert_eq!(Some(RtValue::Float(2.5)), run(&module, "f", &[RtValue::Bool(false)]));
    }

    #[test]
    fn test_bool_ordering() {
        let input = "\
gt :: bool a, bool b -> bool {
    return a > b
}
main :: -> i32 {
    if gt(true, false) {
        return 1
    }
    return 0
}";
        let module = compile(input).unwrap();
        assert_all_terminated(&module);

        // The bools are compared as unsigned integers, true is greater than false.
        let rendered = module.to_string();
        assert!(rendered.contains("zext i1"), "{}", rendered);
        assert!(rendered.contains("icmp sgt i64"), "{}", rendered);
        assert!(!rendered.contains("icmp sgt i1"), "{}", rendered);

        let gt = |a: bool, b: bool| run(&module, "gt", &[RtValue::Bool(a), RtValue::Bool(b)]);
        assert_eq!(Some(RtValue::Bool(true)), gt(true, false));
        assert_eq!(Some(RtValue::Bool(false)), gt(false, true));
        assert_eq!(Some(RtValue::Bool(false)), gt(true, true));
        assert_eq!(Some(RtValue::Int(1)), run(&module, "main", &[]));
    }

    #[test]
    fn test_param_named_like_block() {
        let input = "f :: i32 entry -> i32 {\nif entry > 0 {\nreturn entry\n}\nreturn 0\n}";
        let module = compile(input).unwrap();
        assert_all_terminated(&module);

        let rendered = module.to_string();
        assert!(rendered.contains("define i32 @f(i32 %entry) {"), "{}", rendered);
        assert!(rendered.contains("entry.0:"), "{}", rendered);
        assert!(!rendered.contains("\nentry:"), "{}", rendered);
        assert_eq!(Some(RtValue::Int(3)), run(&module, "f", &[RtValue::Int(3)]));
    }

    #[test]
    fn test_scope_shadowing() {
        let input = "\
main :: -> i32 {
    x := 1
    if true {
        x := 10
        y := x
    }
    return x
}";
        let module = compile(input).unwrap();
        assert_eq!(Some(RtValue::Int(1)), run(&module, "main", &[]));
    }

    #[test]
    fn test_redeclare_with_other_type() {
        let input = "main :: -> f32 {\nx := 1\nf32 x = x / 4\nreturn x\n}";
        let module = compile(input).unwrap();
        assert_eq!(Some(RtValue::Float(0.25)), run(&module, "main", &[]));
    }

    #[test]
    fn test_unresolved_symbol() {
        let err = compile("main :: -> i32 {\nreturn y + 1\n}").unwrap_err();
        assert_eq!(LangErrorKind::UnresolvedSymbol, err.kind);

        // A variable declared inside a if isn't visible after it.
        let input = "main :: -> i32 {\nif true {\ny := 1\n}\nreturn y\n}";
        let err = compile(input).unwrap_err();
        assert_eq!(LangErrorKind::UnresolvedSymbol, err.kind);
    }

    #[test]
    fn test_unresolved_symbol_emits_nothing() {
        let lex_tokens = lex::lex("main :: {\nx := 1\nz := x + y\n}").unwrap();
        let fn_decls = parse::parse(&lex_tokens).unwrap();

        let mut code_gen = CodeGen::new("test".into());
        let err = code_gen.compile_fns(&fn_decls).unwrap_err();
        assert_eq!(LangErrorKind::UnresolvedSymbol, err.kind);

        // Only the instructions for `x := 1` and the load of `x` exists, nothing
        // referencing `y` was added.
        let main = code_gen.module.func(code_gen.module.lookup("main").unwrap()).unwrap();
        let rendered = main.to_string();
        assert_eq!(3, main.blocks()[0].instructions().len(), "{}", rendered);
        assert!(!rendered.contains("add"), "{}", rendered);
    }

    #[test]
    fn test_implicit_casts() {
        let input = "\
half :: f32 a -> f64 {
    return a / 2
}
main :: -> i32 {
    i64 big = 7
    d := half(big)
    return d // 1 + 3 // 2
}";
        let module = compile(input).unwrap();
        assert_eq!(Some(RtValue::Int(4)), run(&module, "main", &[]));

        let rendered = module.to_string();
        assert!(rendered.contains("sitofp i64"), "{}", rendered);
        assert!(rendered.contains("fpext float"), "{}", rendered);
        assert!(rendered.contains("fptosi double"), "{}", rendered);
        assert!(rendered.contains("trunc i64"), "{}", rendered);
    }

    #[test]
    fn test_void_function() {
        let input = "noop :: i32 a {\nb := a\n}\nmain :: -> i32 {\nnoop(1)\nreturn 0\n}";
        let module = compile(input).unwrap();
        assert_all_terminated(&module);
        assert!(module.to_string().contains("call void @noop(i32 1)"));
        assert_eq!(Some(RtValue::Int(0)), run(&module, "main", &[]));
    }

    #[test]
    fn test_void_call_as_value() {
        let input = "noop :: {\n}\nmain :: -> i32 {\nreturn noop()\n}";
        let err = compile(input).unwrap_err();
        assert_eq!(LangErrorKind::UnsupportedExpression, err.kind);
    }

    #[test]
    fn test_statement_after_return() {
        let input = "main :: -> i32 {\nreturn 1\nx := 2\n}";
        let err = compile(input).unwrap_err();
        assert_eq!(LangErrorKind::CodeGenError, err.kind);
    }

    #[test]
    fn test_multiple_return_values() {
        let input = "main :: -> i32, i32 {\nreturn 1, 2\n}";
        let module = compile(input).unwrap();
        assert_eq!(Some(RtValue::Int(1)), run(&module, "main", &[]));
    }
}
