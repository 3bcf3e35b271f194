use crate::Span;

use super::{
    expressions::{
        ArrayAccessExpr, ArrayInstantiationExpr, AssignmentExpr, BinaryExpr, CallExpr,
        MemberAccessExpr, NumberExpr, PrefixExpr, StringExpr, StructInstantiationExpr, SymbolExpr,
    },
    statements::{
        BlockStmt, BreakStmt, ExpressionStmt, FnDeclStmt, ForStmt, ForeachStmt, IfStmt, ImplStmt,
        ImportStmt, ReturnStmt, StructDeclStmt, VarDeclStmt, WhileStmt,
    },
    types::{ArrayType, SymbolType},
};

/// Statement
///
/// Every statement kind the parser can produce.
#[derive(Debug, Clone)]
pub enum Stmt {
    Block(BlockStmt),
    Expression(ExpressionStmt),
    VarDecl(VarDeclStmt),
    StructDecl(StructDeclStmt),
    FnDecl(FnDeclStmt),
    Impl(ImplStmt),
    Return(ReturnStmt),
    Break(BreakStmt),
    If(IfStmt),
    While(WhileStmt),
    Foreach(ForeachStmt),
    For(ForStmt),
    Import(ImportStmt),
}

impl Stmt {
    /// Returns the span of the statement.
    pub fn get_span(&self) -> &Span {
        match self {
            Stmt::Block(stmt) => &stmt.span,
            Stmt::Expression(stmt) => &stmt.span,
            Stmt::VarDecl(stmt) => &stmt.span,
            Stmt::StructDecl(stmt) => &stmt.span,
            Stmt::FnDecl(stmt) => &stmt.span,
            Stmt::Impl(stmt) => &stmt.span,
            Stmt::Return(stmt) => &stmt.span,
            Stmt::Break(stmt) => &stmt.span,
            Stmt::If(stmt) => &stmt.span,
            Stmt::While(stmt) => &stmt.span,
            Stmt::Foreach(stmt) => &stmt.span,
            Stmt::For(stmt) => &stmt.span,
            Stmt::Import(stmt) => &stmt.span,
        }
    }
}

/// Expression
///
/// Every expression kind the parser can produce.
#[derive(Debug, Clone)]
pub enum Expr {
    Number(NumberExpr),
    String(StringExpr),
    Symbol(SymbolExpr),
    Binary(BinaryExpr),
    Prefix(PrefixExpr),
    Assignment(AssignmentExpr),
    StructInstantiation(StructInstantiationExpr),
    ArrayInstantiation(ArrayInstantiationExpr),
    MemberAccess(MemberAccessExpr),
    ArrayAccess(ArrayAccessExpr),
    Call(CallExpr),
}

impl Expr {
    /// Returns the span of the expression.
    pub fn get_span(&self) -> &Span {
        match self {
            Expr::Number(expr) => &expr.span,
            Expr::String(expr) => &expr.span,
            Expr::Symbol(expr) => &expr.span,
            Expr::Binary(expr) => &expr.span,
            Expr::Prefix(expr) => &expr.span,
            Expr::Assignment(expr) => &expr.span,
            Expr::StructInstantiation(expr) => &expr.span,
            Expr::ArrayInstantiation(expr) => &expr.span,
            Expr::MemberAccess(expr) => &expr.span,
            Expr::ArrayAccess(expr) => &expr.span,
            Expr::Call(expr) => &expr.span,
        }
    }
}

/// Type
///
/// Type annotations as written in the source.
#[derive(Debug, Clone)]
pub enum Type {
    Symbol(SymbolType),
    Array(ArrayType),
}

macro_rules! impl_from_node {
    ($target:ident, $($variant:ident($node:ty)),* $(,)?) => {
        $(
            impl From<$node> for $target {
                fn from(node: $node) -> Self {
                    $target::$variant(node)
                }
            }
        )*
    };
}

impl_from_node!(
    Stmt,
    Block(BlockStmt),
    Expression(ExpressionStmt),
    VarDecl(VarDeclStmt),
    StructDecl(StructDeclStmt),
    FnDecl(FnDeclStmt),
    Impl(ImplStmt),
    Return(ReturnStmt),
    Break(BreakStmt),
    If(IfStmt),
    While(WhileStmt),
    Foreach(ForeachStmt),
    For(ForStmt),
    Import(ImportStmt),
);

impl_from_node!(
    Expr,
    Number(NumberExpr),
    String(StringExpr),
    Symbol(SymbolExpr),
    Binary(BinaryExpr),
    Prefix(PrefixExpr),
    Assignment(AssignmentExpr),
    StructInstantiation(StructInstantiationExpr),
    ArrayInstantiation(ArrayInstantiationExpr),
    MemberAccess(MemberAccessExpr),
    ArrayAccess(ArrayAccessExpr),
    Call(CallExpr),
);

impl_from_node!(Type, Symbol(SymbolType), Array(ArrayType));
