use std::fmt::Display;

use thiserror::Error;

use crate::Position;

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_internal_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    /// Classifies the error into one of the language-level error kinds.
    pub fn kind(&self) -> ErrorKind {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. }
            | ErrorImpl::UnexpectedToken { .. }
            | ErrorImpl::UnexpectedTokenDetailed { .. }
            | ErrorImpl::NumberParseError { .. }
            | ErrorImpl::DuplicateProperty { .. }
            | ErrorImpl::InvalidAssignmentTarget
            | ErrorImpl::InvalidCallee => ErrorKind::SyntaxError,

            ErrorImpl::VariableAlreadyDeclared { .. }
            | ErrorImpl::VariableNotDeclared { .. }
            | ErrorImpl::ConstantReassignment { .. }
            | ErrorImpl::FunctionAlreadyDeclared { .. }
            | ErrorImpl::FunctionNotDeclared { .. }
            | ErrorImpl::StructAlreadyDeclared { .. }
            | ErrorImpl::StructNotDeclared { .. }
            | ErrorImpl::MemberNotFound { .. }
            | ErrorImpl::ImportNotFound { .. } => ErrorKind::NameError,

            ErrorImpl::TypeMatchError { .. }
            | ErrorImpl::FieldTypeMatchError { .. }
            | ErrorImpl::ArgumentTypeMatchError { .. }
            | ErrorImpl::ElementTypeMatchError { .. }
            | ErrorImpl::ReturnTypeMatchError { .. }
            | ErrorImpl::NotAStruct { .. }
            | ErrorImpl::NotCallable { .. }
            | ErrorImpl::NotIterable { .. }
            | ErrorImpl::IndexNotNumber { .. }
            | ErrorImpl::InvalidOperands { .. }
            | ErrorImpl::InvalidPrefixOperand { .. } => ErrorKind::TypeError,

            ErrorImpl::UnexpectedArguments { .. } => ErrorKind::ArityError,

            ErrorImpl::IndexOutOfRange { .. }
            | ErrorImpl::NotIndexable { .. }
            | ErrorImpl::PopFromEmpty
            | ErrorImpl::RangeTooLarge { .. } => ErrorKind::IndexError,

            ErrorImpl::UnknownMethod { .. } => ErrorKind::MethodError,

            ErrorImpl::DivisionByZero | ErrorImpl::ModuloByZero => ErrorKind::ArithmeticError,

            ErrorImpl::ModuleNotFound { .. } | ErrorImpl::ImportCycle { .. } => ErrorKind::ImportError,
        }
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::DuplicateProperty { .. } => "DuplicateProperty",
            ErrorImpl::InvalidAssignmentTarget => "InvalidAssignmentTarget",
            ErrorImpl::InvalidCallee => "InvalidCallee",
            ErrorImpl::VariableAlreadyDeclared { .. } => "VariableAlreadyDeclared",
            ErrorImpl::VariableNotDeclared { .. } => "VariableNotDeclared",
            ErrorImpl::ConstantReassignment { .. } => "ConstantReassignment",
            ErrorImpl::FunctionAlreadyDeclared { .. } => "FunctionAlreadyDeclared",
            ErrorImpl::FunctionNotDeclared { .. } => "FunctionNotDeclared",
            ErrorImpl::StructAlreadyDeclared { .. } => "StructAlreadyDeclared",
            ErrorImpl::StructNotDeclared { .. } => "StructNotDeclared",
            ErrorImpl::MemberNotFound { .. } => "MemberNotFound",
            ErrorImpl::ImportNotFound { .. } => "ImportNotFound",
            ErrorImpl::TypeMatchError { .. } => "TypeMatchError",
            ErrorImpl::FieldTypeMatchError { .. } => "FieldTypeMatchError",
            ErrorImpl::ArgumentTypeMatchError { .. } => "ArgumentTypeMatchError",
            ErrorImpl::ElementTypeMatchError { .. } => "ElementTypeMatchError",
            ErrorImpl::ReturnTypeMatchError { .. } => "ReturnTypeMatchError",
            ErrorImpl::NotAStruct { .. } => "NotAStruct",
            ErrorImpl::NotCallable { .. } => "NotCallable",
            ErrorImpl::NotIterable { .. } => "NotIterable",
            ErrorImpl::IndexNotNumber { .. } => "IndexNotNumber",
            ErrorImpl::InvalidOperands { .. } => "InvalidOperands",
            ErrorImpl::InvalidPrefixOperand { .. } => "InvalidPrefixOperand",
            ErrorImpl::UnexpectedArguments { .. } => "UnexpectedArguments",
            ErrorImpl::IndexOutOfRange { .. } => "IndexOutOfRange",
            ErrorImpl::NotIndexable { .. } => "NotIndexable",
            ErrorImpl::PopFromEmpty => "PopFromEmpty",
            ErrorImpl::RangeTooLarge { .. } => "RangeTooLarge",
            ErrorImpl::UnknownMethod { .. } => "UnknownMethod",
            ErrorImpl::DivisionByZero => "DivisionByZero",
            ErrorImpl::ModuloByZero => "ModuloByZero",
            ErrorImpl::ModuleNotFound { .. } => "ModuleNotFound",
            ErrorImpl::ImportCycle { .. } => "ImportCycle",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, did you miss a semicolon?",
                token
            )),
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NumberParseError { token } => {
                ErrorTip::Suggestion(format!("Invalid number: `{}`", token))
            }
            ErrorImpl::DuplicateProperty { structure, property } => ErrorTip::Suggestion(format!(
                "Property `{}` is declared twice in struct `{}`",
                property, structure
            )),
            ErrorImpl::InvalidAssignmentTarget => ErrorTip::Suggestion(String::from(
                "Only variables, struct members and array elements can be assigned to",
            )),
            ErrorImpl::InvalidCallee => ErrorTip::Suggestion(String::from(
                "Only named functions and methods can be called",
            )),
            ErrorImpl::VariableAlreadyDeclared { variable } => {
                ErrorTip::Suggestion(format!("Variable `{}` already declared", variable))
            }
            ErrorImpl::VariableNotDeclared { variable } => {
                ErrorTip::Suggestion(format!("Variable `{}` not declared", variable))
            }
            ErrorImpl::ConstantReassignment { variable } => ErrorTip::Suggestion(format!(
                "`{}` is a constant, declare it with `let` to allow reassignment",
                variable
            )),
            ErrorImpl::FunctionAlreadyDeclared { function } => {
                ErrorTip::Suggestion(format!("Function `{}` already declared", function))
            }
            ErrorImpl::FunctionNotDeclared { function } => {
                ErrorTip::Suggestion(format!("Function `{}` not declared", function))
            }
            ErrorImpl::StructAlreadyDeclared { structure } => {
                ErrorTip::Suggestion(format!("Struct `{}` already declared", structure))
            }
            ErrorImpl::StructNotDeclared { structure } => {
                ErrorTip::Suggestion(format!("Struct `{}` not declared", structure))
            }
            ErrorImpl::MemberNotFound { structure, member } => ErrorTip::Suggestion(format!(
                "Struct `{}` has no member `{}`",
                structure, member
            )),
            ErrorImpl::ImportNotFound { name, path } => {
                ErrorTip::Suggestion(format!("`{}` is not declared in `{}`", name, path))
            }
            ErrorImpl::TypeMatchError { expected, received } => ErrorTip::Suggestion(format!(
                "Expected type `{}`, received `{}`",
                expected, received
            )),
            ErrorImpl::FieldTypeMatchError {
                field,
                expected,
                received,
            } => ErrorTip::Suggestion(format!(
                "Expected field `{}` to be `{}`, received `{}`",
                field, expected, received
            )),
            ErrorImpl::ArgumentTypeMatchError {
                parameter,
                expected,
                received,
            } => ErrorTip::Suggestion(format!(
                "Expected argument `{}` to be `{}`, received `{}`",
                parameter, expected, received
            )),
            ErrorImpl::ElementTypeMatchError { expected, received } => {
                ErrorTip::Suggestion(format!(
                    "Expected array element type `{}`, received `{}`",
                    expected, received
                ))
            }
            ErrorImpl::ReturnTypeMatchError {
                function,
                expected,
                received,
            } => ErrorTip::Suggestion(format!(
                "Function `{}` should return `{}`, returned `{}`",
                function, expected, received
            )),
            ErrorImpl::NotAStruct { received } => {
                ErrorTip::Suggestion(format!("Expected a struct instance, received `{}`", received))
            }
            ErrorImpl::NotCallable { name, received } => ErrorTip::Suggestion(format!(
                "`{}` holds a value of type `{}`, which cannot be called",
                name, received
            )),
            ErrorImpl::NotIterable { received } => ErrorTip::Suggestion(format!(
                "Only arrays and strings can be iterated, received `{}`",
                received
            )),
            ErrorImpl::IndexNotNumber { received } => {
                ErrorTip::Suggestion(format!("Indices must be numbers, received `{}`", received))
            }
            ErrorImpl::InvalidOperands {
                operator,
                left,
                right,
            } => ErrorTip::Suggestion(format!(
                "Operator `{}` cannot be applied to `{}` and `{}`",
                operator, left, right
            )),
            ErrorImpl::InvalidPrefixOperand { operator, received } => ErrorTip::Suggestion(
                format!("Operator `{}` cannot be applied to `{}`", operator, received),
            ),
            ErrorImpl::UnexpectedArguments {
                callee,
                expected,
                received,
            } => ErrorTip::Suggestion(format!(
                "`{}` expected {} arguments, received {}",
                callee, expected, received
            )),
            ErrorImpl::IndexOutOfRange { index, length } => ErrorTip::Suggestion(format!(
                "Index {} is out of range for length {}",
                index, length
            )),
            ErrorImpl::NotIndexable { received } => {
                ErrorTip::Suggestion(format!("Values of type `{}` cannot be indexed", received))
            }
            ErrorImpl::PopFromEmpty => {
                ErrorTip::Suggestion(String::from("Cannot pop from an empty array"))
            }
            ErrorImpl::RangeTooLarge { length, limit } => ErrorTip::Suggestion(format!(
                "`range` would build {} elements, the limit is {}",
                length, limit
            )),
            ErrorImpl::UnknownMethod { receiver, method } => ErrorTip::Suggestion(format!(
                "Type `{}` has no method `{}`",
                receiver, method
            )),
            ErrorImpl::DivisionByZero => ErrorTip::None,
            ErrorImpl::ModuloByZero => ErrorTip::None,
            ErrorImpl::ModuleNotFound { path, .. } => {
                ErrorTip::Suggestion(format!("Could not read module `{}`", path))
            }
            ErrorImpl::ImportCycle { path } => ErrorTip::Suggestion(format!(
                "Module `{}` is already being imported, remove one of the imports in the cycle",
                path
            )),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind(), self.internal_error)
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    SyntaxError,
    NameError,
    TypeError,
    ArityError,
    IndexError,
    MethodError,
    ArithmeticError,
    ImportError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Error, Debug, Clone)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message:?}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("property {property:?} declared twice in struct {structure:?}")]
    DuplicateProperty { structure: String, property: String },
    #[error("invalid assignment target")]
    InvalidAssignmentTarget,
    #[error("invalid callee")]
    InvalidCallee,

    #[error("variable {variable:?} already declared")]
    VariableAlreadyDeclared { variable: String },
    #[error("variable {variable:?} not declared")]
    VariableNotDeclared { variable: String },
    #[error("cannot reassign constant {variable:?}")]
    ConstantReassignment { variable: String },
    #[error("function {function:?} already declared")]
    FunctionAlreadyDeclared { function: String },
    #[error("function {function:?} not declared")]
    FunctionNotDeclared { function: String },
    #[error("struct {structure:?} already declared")]
    StructAlreadyDeclared { structure: String },
    #[error("struct {structure:?} not declared")]
    StructNotDeclared { structure: String },
    #[error("struct {structure:?} has no member {member:?}")]
    MemberNotFound { structure: String, member: String },
    #[error("{name:?} not found in module {path:?}")]
    ImportNotFound { name: String, path: String },

    #[error("types do not match: expected {expected}, received {received}")]
    TypeMatchError { expected: String, received: String },
    #[error("field {field:?} type does not match: expected {expected}, received {received}")]
    FieldTypeMatchError {
        field: String,
        expected: String,
        received: String,
    },
    #[error("argument {parameter:?} type does not match: expected {expected}, received {received}")]
    ArgumentTypeMatchError {
        parameter: String,
        expected: String,
        received: String,
    },
    #[error("array element type does not match: expected {expected}, received {received}")]
    ElementTypeMatchError { expected: String, received: String },
    #[error("function {function:?} returned {received}, expected {expected}")]
    ReturnTypeMatchError {
        function: String,
        expected: String,
        received: String,
    },
    #[error("expected struct instance, received {received}")]
    NotAStruct { received: String },
    #[error("{name:?} is not callable (found {received})")]
    NotCallable { name: String, received: String },
    #[error("cannot iterate over {received}")]
    NotIterable { received: String },
    #[error("index must be a number, received {received}")]
    IndexNotNumber { received: String },
    #[error("invalid operands for {operator:?}: {left} and {right}")]
    InvalidOperands {
        operator: String,
        left: String,
        right: String,
    },
    #[error("invalid operand for prefix {operator:?}: {received}")]
    InvalidPrefixOperand { operator: String, received: String },

    #[error("{callee:?} expected {expected} arguments, received {received}")]
    UnexpectedArguments {
        callee: String,
        expected: String,
        received: usize,
    },

    #[error("index {index} out of range for length {length}")]
    IndexOutOfRange { index: i64, length: usize },
    #[error("cannot index into {received}")]
    NotIndexable { received: String },
    #[error("cannot pop from an empty array")]
    PopFromEmpty,
    #[error("range of {length} elements exceeds the limit of {limit}")]
    RangeTooLarge { length: u64, limit: u64 },

    #[error("{receiver} has no method {method:?}")]
    UnknownMethod { receiver: String, method: String },

    #[error("division by zero")]
    DivisionByZero,
    #[error("modulo by zero")]
    ModuloByZero,

    #[error("could not read module {path:?}: {reason}")]
    ModuleNotFound { path: String, reason: String },
    #[error("import cycle through module {path:?}")]
    ImportCycle { path: String },
}
