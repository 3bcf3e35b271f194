//! Tree-walking evaluation of a parsed program.
//!
//! This module contains the runtime half of the pipeline:
//!
//! - Runtime values and the recursive value type
//! - Lexically scoped environments shared through `Rc<RefCell<_>>`
//! - Statement and expression evaluators producing a `Flow`
//! - Built-in methods on primitives and the native functions

pub mod environment;
pub mod expr;
pub mod interpreter;
pub mod methods;
pub mod stdlib;
pub mod stmt;
pub mod values;

#[cfg(test)]
mod tests;
