//! Runtime values and types.
//!
//! Every value the evaluator produces is a [`RuntimeVal`]. Types are kept
//! as the recursive [`ValueType`] so array element types compare
//! structurally (`[]number` is `Array(Number)`).

use std::{cell::RefCell, collections::HashMap, fmt::{Debug, Display}, rc::Rc};

use crate::{
    ast::{ast::Type, statements::{BlockStmt, FnDeclStmt}},
    errors::errors::Error,
    Position,
};

use super::{environment::EnvRef, interpreter::Interpreter};

#[derive(Debug, Clone, PartialEq)]
pub enum ValueType {
    Any,
    Null,
    Number,
    Boolean,
    String,
    Function,
    Struct(String),
    Array(Box<ValueType>),
}

impl ValueType {
    /// Resolves a type annotation. Unknown names are taken to be structs.
    pub fn from_ast(ty: &Type) -> ValueType {
        match ty {
            Type::Symbol(symbol) => match symbol.name.as_str() {
                "any" => ValueType::Any,
                "null" => ValueType::Null,
                "number" => ValueType::Number,
                "boolean" | "bool" => ValueType::Boolean,
                "string" => ValueType::String,
                "function" => ValueType::Function,
                name => ValueType::Struct(String::from(name)),
            },
            Type::Array(array) => ValueType::Array(Box::new(ValueType::from_ast(&array.underlying))),
        }
    }

    /// `any` accepts everything and `null` fits every slot, otherwise the
    /// types must match exactly.
    pub fn accepts(&self, actual: &ValueType) -> bool {
        *self == ValueType::Any || *actual == ValueType::Null || self == actual
    }
}

impl Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueType::Any => write!(f, "any"),
            ValueType::Null => write!(f, "null"),
            ValueType::Number => write!(f, "number"),
            ValueType::Boolean => write!(f, "boolean"),
            ValueType::String => write!(f, "string"),
            ValueType::Function => write!(f, "function"),
            ValueType::Struct(name) => write!(f, "{}", name),
            ValueType::Array(underlying) => write!(f, "array<{}>", underlying),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ArrayVal {
    pub elements: Vec<RuntimeVal>,
    pub element_type: ValueType,
}

/// A struct instance. Properties keep their declaration order.
///
/// The instance holds on to its definition, so property types and methods
/// resolve even where the struct's name is out of scope.
#[derive(Clone)]
pub struct StructVal {
    pub name: String,
    pub def: StructDefRef,
    pub properties: Vec<(String, RuntimeVal)>,
}

impl StructVal {
    pub fn new(def: &StructDefRef, properties: Vec<(String, RuntimeVal)>) -> Self {
        StructVal {
            name: def.borrow().name.clone(),
            def: Rc::clone(def),
            properties,
        }
    }

    pub fn get(&self, property: &str) -> Option<&RuntimeVal> {
        self.properties.iter().find(|(name, _)| name == property).map(|(_, value)| value)
    }

    pub fn get_mut(&mut self, property: &str) -> Option<&mut RuntimeVal> {
        self.properties.iter_mut().find(|(name, _)| name == property).map(|(_, value)| value)
    }
}

#[derive(Debug, Clone)]
pub struct StructDef {
    pub name: String,
    pub properties: Vec<(String, ValueType)>,
    pub methods: HashMap<String, Rc<Function>>,
}

/// Definitions are shared between the declaring scope and every instance,
/// so an `impl` after instantiation is visible to existing values.
pub type StructDefRef = Rc<RefCell<StructDef>>;

impl StructDef {
    pub fn new_ref(name: &str, properties: Vec<(String, ValueType)>) -> StructDefRef {
        Rc::new(RefCell::new(StructDef {
            name: String::from(name),
            properties,
            methods: HashMap::new(),
        }))
    }

    pub fn property_type(&self, property: &str) -> Option<&ValueType> {
        self.properties.iter().find(|(name, _)| name == property).map(|(_, ty)| ty)
    }
}

// The definition's methods capture environments that may hold this value
impl Debug for StructVal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StructVal")
            .field("name", &self.name)
            .field("properties", &self.properties)
            .finish_non_exhaustive()
    }
}

pub type NativeFn = fn(&mut Interpreter, Vec<RuntimeVal>, &Position) -> Result<RuntimeVal, Error>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Arity {
    Exact(usize),
    Range(usize, usize),
    Variadic,
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        match self {
            Arity::Exact(expected) => count == *expected,
            Arity::Range(min, max) => (*min..=*max).contains(&count),
            Arity::Variadic => true,
        }
    }
}

impl Display for Arity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Arity::Exact(expected) => write!(f, "{}", expected),
            Arity::Range(min, max) => write!(f, "{} to {}", min, max),
            Arity::Variadic => write!(f, "any number of"),
        }
    }
}

#[derive(Clone, Copy)]
pub struct NativeFunction {
    pub arity: Arity,
    pub call: NativeFn,
}

#[derive(Clone)]
pub enum FunctionKind {
    /// Body plus the environment the function was declared in.
    User { body: Rc<BlockStmt>, env: EnvRef },
    Native(NativeFunction),
}

#[derive(Clone)]
pub struct Function {
    pub name: String,
    pub parameters: Vec<(String, ValueType)>,
    pub return_type: Option<ValueType>,
    pub kind: FunctionKind,
}

impl Function {
    pub fn from_declaration(declaration: &FnDeclStmt, env: &EnvRef) -> Self {
        Function {
            name: declaration.identifier.clone(),
            parameters: declaration
                .parameters
                .iter()
                .map(|parameter| (parameter.name.clone(), ValueType::from_ast(&parameter.explicit_type)))
                .collect(),
            return_type: declaration.return_type.as_ref().map(ValueType::from_ast),
            kind: FunctionKind::User {
                body: Rc::new(declaration.body.clone()),
                env: Rc::clone(env),
            },
        }
    }

    pub fn native(name: &str, arity: Arity, call: NativeFn) -> Self {
        Function {
            name: String::from(name),
            parameters: vec![],
            return_type: None,
            kind: FunctionKind::Native(NativeFunction { arity, call }),
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self.kind, FunctionKind::Native(_))
    }

    pub fn arity(&self) -> Arity {
        match &self.kind {
            FunctionKind::User { .. } => Arity::Exact(self.parameters.len()),
            FunctionKind::Native(native) => native.arity,
        }
    }
}

// The captured environment usually contains the function itself
impl Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .field("return_type", &self.return_type)
            .field("native", &self.is_native())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub enum RuntimeVal {
    Null,
    Number(f64),
    Bool(bool),
    String(String),
    Array(ArrayVal),
    Struct(StructVal),
    StructDef(StructDefRef),
    Function(Rc<Function>),
}

impl RuntimeVal {
    pub fn value_type(&self) -> ValueType {
        match self {
            RuntimeVal::Null => ValueType::Null,
            RuntimeVal::Number(_) => ValueType::Number,
            RuntimeVal::Bool(_) => ValueType::Boolean,
            RuntimeVal::String(_) => ValueType::String,
            RuntimeVal::Array(array) => ValueType::Array(Box::new(array.element_type.clone())),
            RuntimeVal::Struct(instance) => ValueType::Struct(instance.name.clone()),
            RuntimeVal::StructDef(def) => ValueType::Struct(def.borrow().name.clone()),
            RuntimeVal::Function(_) => ValueType::Function,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            RuntimeVal::Number(value) => *value != 0.0,
            RuntimeVal::Bool(value) => *value,
            RuntimeVal::String(value) => !value.is_empty(),
            _ => false,
        }
    }

    /// Same type and same value. Arrays and instances compare element by
    /// element, functions by identity.
    pub fn equals(&self, other: &RuntimeVal) -> bool {
        match (self, other) {
            (RuntimeVal::Null, RuntimeVal::Null) => true,
            (RuntimeVal::Number(left), RuntimeVal::Number(right)) => left == right,
            (RuntimeVal::Bool(left), RuntimeVal::Bool(right)) => left == right,
            (RuntimeVal::String(left), RuntimeVal::String(right)) => left == right,
            (RuntimeVal::Array(left), RuntimeVal::Array(right)) => {
                left.element_type == right.element_type
                    && left.elements.len() == right.elements.len()
                    && left.elements.iter().zip(&right.elements).all(|(l, r)| l.equals(r))
            }
            (RuntimeVal::Struct(left), RuntimeVal::Struct(right)) => {
                left.name == right.name
                    && left.properties.len() == right.properties.len()
                    && left
                        .properties
                        .iter()
                        .zip(&right.properties)
                        .all(|((ln, lv), (rn, rv))| ln == rn && lv.equals(rv))
            }
            (RuntimeVal::Function(left), RuntimeVal::Function(right)) => Rc::ptr_eq(left, right),
            _ => false,
        }
    }
}

impl Display for RuntimeVal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuntimeVal::Null => write!(f, "null"),
            RuntimeVal::Number(value) => write!(f, "{}", value),
            RuntimeVal::Bool(value) => write!(f, "{}", value),
            RuntimeVal::String(value) => write!(f, "{}", value),
            RuntimeVal::Array(array) => {
                write!(f, "[")?;
                for (i, element) in array.elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", element)?;
                }
                write!(f, "]")
            }
            RuntimeVal::Struct(instance) => {
                if instance.properties.is_empty() {
                    return write!(f, "{} {{}}", instance.name);
                }

                write!(f, "{} {{ ", instance.name)?;
                for (i, (name, value)) in instance.properties.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", name, value)?;
                }
                write!(f, " }}")
            }
            RuntimeVal::StructDef(def) => write!(f, "struct {}", def.borrow().name),
            RuntimeVal::Function(function) => {
                if function.is_native() {
                    write!(f, "<native fn {}>", function.name)
                } else {
                    let parameters: Vec<&str> = function.parameters.iter().map(|(name, _)| name.as_str()).collect();
                    write!(f, "fn {}({})", function.name, parameters.join(", "))
                }
            }
        }
    }
}

/// Result of evaluating a statement.
#[derive(Debug, Clone)]
pub enum Flow {
    Normal(RuntimeVal),
    Returned(RuntimeVal),
    Broke,
}

#[derive(Debug, Clone)]
pub struct Variable {
    pub value: RuntimeVal,
    pub declared_type: ValueType,
    pub is_constant: bool,
}
