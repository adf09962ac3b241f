use super::stmt::Stmt;
use crate::{file::FilePosition, ty::Ty};

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: Ty,
}

impl Param {
    pub fn new(name: String, ty: Ty) -> Self {
        Self { name, ty }
    }
}

/// A function declaration of the form:
/// `name :: type ident, ... -> type, ... { statement ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct FnDecl {
    pub name: String,
    pub params: Vec<Param>,
    pub returns: Vec<Ty>,
    pub body: Vec<Stmt>,
    pub file_pos: Option<FilePosition>,
}

impl FnDecl {
    pub fn new(
        name: String,
        params: Vec<Param>,
        returns: Vec<Ty>,
        body: Vec<Stmt>,
        file_pos: Option<FilePosition>,
    ) -> Self {
        Self {
            name,
            params,
            returns,
            body,
            file_pos,
        }
    }
}
