//! Type annotations in the AST.
//!
//! The language only spells two kinds of type: a named type (`number`,
//! `string`, `boolean`, `any`, `function`, or a struct name) and an array
//! of another type (`[]number`, `[][]Point`). They are resolved into
//! runtime types by the interpreter.

use std::fmt::Display;

use crate::Position;

use super::ast::Type;

/// Represents a named type reference.
///
/// # Fields
///
/// * `name` - The type name as written
/// * `position` - Where the type appears in the source
#[derive(Debug, Clone)]
pub struct SymbolType {
    pub name: String,
    pub position: Position,
}

/// Represents an array type `[]T`.
#[derive(Debug, Clone)]
pub struct ArrayType {
    pub underlying: Box<Type>,
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Symbol(symbol) => write!(f, "{}", symbol.name),
            Type::Array(array) => write!(f, "[]{}", array.underlying),
        }
    }
}
