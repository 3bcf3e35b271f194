//! Lexical scopes.
//!
//! Each [`Environment`] holds variables, struct definitions and named
//! functions, and points at its enclosing scope. Lookups walk outwards
//! until the global scope; declarations only ever touch the local one.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position,
};

use super::values::{Function, RuntimeVal, StructDefRef, ValueType, Variable};

pub type EnvRef = Rc<RefCell<Environment>>;

#[derive(Debug, Default)]
pub struct Environment {
    variables: HashMap<String, Variable>,
    struct_defs: HashMap<String, StructDefRef>,
    functions: HashMap<String, Rc<Function>>,
    parent: Option<EnvRef>,
}

impl Environment {
    pub fn new(parent: Option<EnvRef>) -> Self {
        Environment {
            parent,
            ..Default::default()
        }
    }

    pub fn new_ref(parent: Option<EnvRef>) -> EnvRef {
        Rc::new(RefCell::new(Environment::new(parent)))
    }

    /// A fresh scope nested inside `parent`.
    pub fn child(parent: &EnvRef) -> EnvRef {
        Environment::new_ref(Some(Rc::clone(parent)))
    }

    pub fn parent(&self) -> Option<&EnvRef> {
        self.parent.as_ref()
    }

    pub fn declare_variable(
        &mut self,
        name: &str,
        value: RuntimeVal,
        declared_type: ValueType,
        is_constant: bool,
        position: &Position,
    ) -> Result<RuntimeVal, Error> {
        if self.variables.contains_key(name) {
            return Err(Error::new(
                ErrorImpl::VariableAlreadyDeclared { variable: String::from(name) },
                position.clone(),
            ));
        }

        let received = value.value_type();
        if !declared_type.accepts(&received) {
            return Err(Error::new(
                ErrorImpl::TypeMatchError {
                    expected: declared_type.to_string(),
                    received: received.to_string(),
                },
                position.clone(),
            ));
        }

        self.variables.insert(
            String::from(name),
            Variable { value: value.clone(), declared_type, is_constant },
        );

        Ok(value)
    }

    /// Reassigns the nearest variable called `name`, checking constness and
    /// the type it was declared with.
    pub fn assign_variable(
        &mut self,
        name: &str,
        value: RuntimeVal,
        position: &Position,
    ) -> Result<RuntimeVal, Error> {
        if let Some(variable) = self.variables.get_mut(name) {
            if variable.is_constant {
                return Err(Error::new(
                    ErrorImpl::ConstantReassignment { variable: String::from(name) },
                    position.clone(),
                ));
            }

            let received = value.value_type();
            if !variable.declared_type.accepts(&received) {
                return Err(Error::new(
                    ErrorImpl::TypeMatchError {
                        expected: variable.declared_type.to_string(),
                        received: received.to_string(),
                    },
                    position.clone(),
                ));
            }

            variable.value = value.clone();
            return Ok(value);
        }

        match &self.parent {
            Some(parent) => parent.borrow_mut().assign_variable(name, value, position),
            None => Err(Error::new(
                ErrorImpl::VariableNotDeclared { variable: String::from(name) },
                position.clone(),
            )),
        }
    }

    pub fn lookup_variable(&self, name: &str, position: &Position) -> Result<RuntimeVal, Error> {
        if let Some(variable) = self.variables.get(name) {
            return Ok(variable.value.clone());
        }

        match &self.parent {
            Some(parent) => parent.borrow().lookup_variable(name, position),
            None => Err(Error::new(
                ErrorImpl::VariableNotDeclared { variable: String::from(name) },
                position.clone(),
            )),
        }
    }

    pub fn declare_struct(&mut self, def: StructDefRef, position: &Position) -> Result<(), Error> {
        let name = def.borrow().name.clone();
        if self.struct_defs.contains_key(&name) {
            return Err(Error::new(
                ErrorImpl::StructAlreadyDeclared { structure: name },
                position.clone(),
            ));
        }

        self.struct_defs.insert(name, def);
        Ok(())
    }

    /// Attaches `method` to the nearest definition of `struct_name`.
    /// Implementing a method twice replaces the earlier one.
    pub fn implement_method(
        &mut self,
        struct_name: &str,
        method: Rc<Function>,
        position: &Position,
    ) -> Result<(), Error> {
        if let Some(def) = self.struct_defs.get(struct_name) {
            def.borrow_mut().methods.insert(method.name.clone(), method);
            return Ok(());
        }

        match &self.parent {
            Some(parent) => parent.borrow_mut().implement_method(struct_name, method, position),
            None => Err(Error::new(
                ErrorImpl::StructNotDeclared { structure: String::from(struct_name) },
                position.clone(),
            )),
        }
    }

    pub fn lookup_struct(&self, name: &str, position: &Position) -> Result<StructDefRef, Error> {
        if let Some(def) = self.struct_defs.get(name) {
            return Ok(Rc::clone(def));
        }

        match &self.parent {
            Some(parent) => parent.borrow().lookup_struct(name, position),
            None => Err(Error::new(
                ErrorImpl::StructNotDeclared { structure: String::from(name) },
                position.clone(),
            )),
        }
    }

    pub fn declare_function(&mut self, function: Rc<Function>, position: &Position) -> Result<(), Error> {
        if self.functions.contains_key(&function.name) {
            return Err(Error::new(
                ErrorImpl::FunctionAlreadyDeclared { function: function.name.clone() },
                position.clone(),
            ));
        }

        self.functions.insert(function.name.clone(), function);
        Ok(())
    }

    pub fn lookup_function(&self, name: &str, position: &Position) -> Result<Rc<Function>, Error> {
        if let Some(function) = self.functions.get(name) {
            return Ok(Rc::clone(function));
        }

        match &self.parent {
            Some(parent) => parent.borrow().lookup_function(name, position),
            None => Err(Error::new(
                ErrorImpl::FunctionNotDeclared { function: String::from(name) },
                position.clone(),
            )),
        }
    }

    /// Finds what a call to `name` refers to. Per scope a variable shadows a
    /// function of the same name, and that variable must hold a function.
    pub fn resolve_callable(&self, name: &str, position: &Position) -> Result<Rc<Function>, Error> {
        if let Some(variable) = self.variables.get(name) {
            return match &variable.value {
                RuntimeVal::Function(function) => Ok(Rc::clone(function)),
                other => Err(Error::new(
                    ErrorImpl::NotCallable {
                        name: String::from(name),
                        received: other.value_type().to_string(),
                    },
                    position.clone(),
                )),
            };
        }

        if let Some(function) = self.functions.get(name) {
            return Ok(Rc::clone(function));
        }

        match &self.parent {
            Some(parent) => parent.borrow().resolve_callable(name, position),
            None => Err(Error::new(
                ErrorImpl::FunctionNotDeclared { function: String::from(name) },
                position.clone(),
            )),
        }
    }

    /// Value of a bare identifier: a variable, else a named function as a
    /// first-class value, checked scope by scope.
    pub fn resolve_symbol(&self, name: &str) -> Option<RuntimeVal> {
        if let Some(variable) = self.variables.get(name) {
            return Some(variable.value.clone());
        }

        if let Some(function) = self.functions.get(name) {
            return Some(RuntimeVal::Function(Rc::clone(function)));
        }

        self.parent.as_ref().and_then(|parent| parent.borrow().resolve_symbol(name))
    }

    pub fn get_local_variable(&self, name: &str) -> Option<&Variable> {
        self.variables.get(name)
    }

    pub fn get_local_struct(&self, name: &str) -> Option<&StructDefRef> {
        self.struct_defs.get(name)
    }

    pub fn get_local_function(&self, name: &str) -> Option<&Rc<Function>> {
        self.functions.get(name)
    }

    pub fn variables(&self) -> impl Iterator<Item = (&String, &Variable)> {
        self.variables.iter()
    }

    pub fn struct_defs(&self) -> impl Iterator<Item = &StructDefRef> {
        self.struct_defs.values()
    }

    pub fn functions(&self) -> impl Iterator<Item = &Rc<Function>> {
        self.functions.values()
    }
}
