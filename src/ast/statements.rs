use std::slice::Iter;

use crate::Span;

use super::ast::{Expr, Stmt, Type};

#[derive(Debug, Clone)]
pub struct BlockStmt {
    pub body: Vec<Stmt>,
    pub span: Span,
}

impl BlockStmt {
    pub fn iter(&self) -> Iter<'_, Stmt> {
        self.body.iter()
    }
}

#[derive(Debug, Clone)]
pub struct ExpressionStmt {
    pub expression: Expr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct VarDeclStmt {
    pub identifier: String,
    pub is_constant: bool,
    pub assigned_value: Option<Expr>,
    pub explicit_type: Option<Type>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct StructDeclStmt {
    pub name: String,
    pub properties: Vec<(String, Type)>,
    pub span: Span,
}

/// A declared parameter. Parameters written without a type are `any`.
#[derive(Debug, Clone)]
pub struct Parameter {
    pub name: String,
    pub explicit_type: Type,
}

#[derive(Debug, Clone)]
pub struct FnDeclStmt {
    pub identifier: String,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<Type>,
    pub body: BlockStmt,
    pub span: Span,
}

/// `impl Point fn norm() { ... }` attaches one method to a struct.
#[derive(Debug, Clone)]
pub struct ImplStmt {
    pub struct_name: String,
    pub method: FnDeclStmt,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct BreakStmt {
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_body: BlockStmt,
    pub else_ifs: Vec<(Expr, BlockStmt)>,
    pub else_body: Option<BlockStmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: BlockStmt,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ForeachStmt {
    pub iterator: String,
    pub collection: Expr,
    pub body: BlockStmt,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ForStmt {
    pub initializer: Option<Box<Stmt>>,
    pub condition: Option<Expr>,
    pub post: Option<Box<Stmt>>,
    pub body: BlockStmt,
    pub span: Span,
}

/// An empty `names` list imports every declaration of the module.
#[derive(Debug, Clone)]
pub struct ImportStmt {
    pub names: Vec<String>,
    pub from: String,
    pub span: Span,
}
