use crate::{lexer::tokens::Token, Span};

use super::ast::{Expr, Type};

// LITERALS

/// Number Expression
/// Represents a numeric literal in the AST.
#[derive(Debug, Clone)]
pub struct NumberExpr {
    pub value: f64,
    pub span: Span,
}

/// String Expression
/// Represents a string literal with escapes already resolved.
#[derive(Debug, Clone)]
pub struct StringExpr {
    pub value: String,
    pub span: Span,
}

/// Symbol Expression
/// A bare identifier, resolved against the environment at runtime.
#[derive(Debug, Clone)]
pub struct SymbolExpr {
    pub value: String,
    pub span: Span,
}

// COMPLEX

/// Binary Expression
#[derive(Debug, Clone)]
pub struct BinaryExpr {
    pub left: Box<Expr>,
    pub operator: Token,
    pub right: Box<Expr>,
    pub span: Span,
}

/// Prefix Expression
/// `-x` and `!x`.
#[derive(Debug, Clone)]
pub struct PrefixExpr {
    pub operator: Token,
    pub right_expr: Box<Expr>,
    pub span: Span,
}

/// Assignment Expression
///
/// `++` and `--` are desugared by the parser into `+=`/`-=` with a
/// value of `1`, so `operator` is always one of the assignment kinds.
#[derive(Debug, Clone)]
pub struct AssignmentExpr {
    pub assignee: Box<Expr>,
    pub operator: Token,
    pub value: Box<Expr>,
    pub span: Span,
}

/// Struct Instantiation Expression
/// `Point { x: 1, y: 2 }`, properties kept in source order.
#[derive(Debug, Clone)]
pub struct StructInstantiationExpr {
    pub name: String,
    pub properties: Vec<(String, Expr)>,
    pub span: Span,
}

/// Array Instantiation Expression
/// `[]number{1, 2, 3}`
#[derive(Debug, Clone)]
pub struct ArrayInstantiationExpr {
    pub underlying: Type,
    pub contents: Vec<Expr>,
    pub span: Span,
}

/// Member Access Expression
#[derive(Debug, Clone)]
pub struct MemberAccessExpr {
    pub member: Box<Expr>,
    pub property: String,
    pub span: Span,
}

/// Array Access Expression
///
/// `arr[i]` has neither flag set, `arr[:i]` sets `is_prev` (everything
/// before `i`) and `arr[i:]` sets `is_rest` (everything from `i`).
#[derive(Debug, Clone)]
pub struct ArrayAccessExpr {
    pub array: Box<Expr>,
    pub index: Box<Expr>,
    pub is_prev: bool,
    pub is_rest: bool,
    pub span: Span,
}

/// Call Expression
///
/// A method call keeps its receiver, a plain call leaves it empty.
#[derive(Debug, Clone)]
pub struct CallExpr {
    pub name: String,
    pub arguments: Vec<Expr>,
    pub receiver: Option<Box<Expr>>,
    pub span: Span,
}
