use std::path::{Path, PathBuf};

use itertools::Itertools;

use common::{
    error::{LangError, LangErrorKind, LangResult},
    token::ast::FnDecl,
};
use lex::token::LexToken;

/// Name of the file that the tokens are written to when `--tokens` is set.
pub const TOKENS_FILENAME: &str = "tokens.txt";

/// Name of the file that the AST is written to when `--ast` is set.
pub const AST_FILENAME: &str = "ast.txt";

pub fn read_source(path: &Path) -> LangResult<String> {
    std::fs::read_to_string(path).map_err(|e| {
        LangError::new(
            format!(
                "Unable to read source file \"{}\": {}",
                path.display(),
                e
            ),
            LangErrorKind::IoError,
            None,
        )
    })
}

/// Writes `content` to the file `filename` inside the directory `dir`. The
/// directory is created if it doesn't exist. Returns the path of the written
/// file.
pub fn write_output(dir: &Path, filename: &str, content: &str) -> LangResult<PathBuf> {
    let to_io_err = |path: &Path, e: std::io::Error| {
        LangError::new(
            format!("Unable to write to \"{}\": {}", path.display(), e),
            LangErrorKind::IoError,
            None,
        )
    };

    std::fs::create_dir_all(dir).map_err(|e| to_io_err(dir, e))?;

    let path = dir.join(filename);
    std::fs::write(&path, content).map_err(|e| to_io_err(&path, e))?;

    debug!("Wrote {} bytes to \"{}\".", content.len(), path.display());
    Ok(path)
}

/// One token per line.
pub fn tokens_to_string(lex_tokens: &[LexToken]) -> String {
    let mut s = lex_tokens.iter().join("\n");
    s.push('\n');
    s
}

pub fn ast_to_string(fn_decls: &[FnDecl]) -> String {
    let mut s = fn_decls.iter().map(|fn_decl| format!("{:#?}", fn_decl)).join("\n\n");
    s.push('\n');
    s
}

/// The name of the file that the IR of the module `module_name` is written to.
pub fn ir_filename(module_name: &str) -> String {
    format!("{}.ll", module_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Returns a directory in the temp dir that is unique to the test `name`.
    fn test_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("furc_{}_{}", name, std::process::id()))
    }

    #[test]
    fn test_read_missing_file() {
        let path = test_dir("missing").join("does_not_exist.fur");
        let err = read_source(&path).unwrap_err();
        assert_eq!(LangErrorKind::IoError, err.kind);
        assert!(err.msg.contains("does_not_exist.fur"));
    }

    #[test]
    fn test_write_output_creates_dir() {
        let dir = test_dir("write").join("nested");
        let path = write_output(&dir, "out.ll", "content").unwrap();
        assert_eq!(dir.join("out.ll"), path);
        assert_eq!("content", read_source(&path).unwrap());

        std::fs::remove_dir_all(test_dir("write")).unwrap();
    }

    #[test]
    fn test_tokens_one_per_line() {
        let lex_tokens = lex::lex("main :: {\n}").unwrap();
        let s = tokens_to_string(&lex_tokens);
        assert_eq!(lex_tokens.len(), s.lines().count());
        assert!(s.starts_with("Ident(main), line: 1, column: 1\n"));
    }

    #[test]
    fn test_ast_contains_every_function() {
        let lex_tokens = lex::lex("a :: {\n}\nb :: i32 x {\n}").unwrap();
        let fn_decls = parse::parse(&lex_tokens).unwrap();
        let s = ast_to_string(&fn_decls);
        assert!(s.contains("name: \"a\""));
        assert!(s.contains("name: \"b\""));
    }

    #[test]
    fn test_ir_filename() {
        assert_eq!("furc_module.ll", ir_filename("furc_module"));
    }
}
