use std::{fs, path::PathBuf, rc::Rc};

use tracing::{debug, trace};

use crate::{
    ast::{
        ast::Stmt,
        statements::{
            BlockStmt, FnDeclStmt, ForStmt, ForeachStmt, IfStmt, ImplStmt, ImportStmt,
            StructDeclStmt, VarDeclStmt, WhileStmt,
        },
    },
    errors::errors::{Error, ErrorImpl},
    Position,
};

use super::{
    environment::{EnvRef, Environment},
    expr::evaluate_expr,
    interpreter::Interpreter,
    stdlib::{create_global_environment, BUILTIN_CONSTANTS},
    values::{Flow, Function, RuntimeVal, StructDef, ValueType},
};

pub fn evaluate(interpreter: &mut Interpreter, stmt: &Stmt, env: &EnvRef) -> Result<Flow, Error> {
    trace!(start = stmt.get_span().start.0, "evaluating statement");

    match stmt {
        Stmt::Block(block) => evaluate_block(interpreter, block, env),
        Stmt::Expression(expression) => Ok(Flow::Normal(evaluate_expr(interpreter, &expression.expression, env)?)),
        Stmt::VarDecl(declaration) => evaluate_var_decl_stmt(interpreter, declaration, env),
        Stmt::StructDecl(declaration) => evaluate_struct_decl_stmt(declaration, env),
        Stmt::FnDecl(declaration) => evaluate_fn_decl_stmt(declaration, env),
        Stmt::Impl(implementation) => evaluate_impl_stmt(implementation, env),
        Stmt::Return(ret) => {
            let value = match &ret.value {
                Some(value) => evaluate_expr(interpreter, value, env)?,
                None => RuntimeVal::Null,
            };
            Ok(Flow::Returned(value))
        }
        Stmt::Break(_) => Ok(Flow::Broke),
        Stmt::If(if_stmt) => evaluate_if_stmt(interpreter, if_stmt, env),
        Stmt::While(while_stmt) => evaluate_while_stmt(interpreter, while_stmt, env),
        Stmt::Foreach(foreach) => evaluate_foreach_stmt(interpreter, foreach, env),
        Stmt::For(for_stmt) => evaluate_for_stmt(interpreter, for_stmt, env),
        Stmt::Import(import) => evaluate_import_stmt(interpreter, import, env),
    }
}

/// Runs the statements of `block` in `env` itself; blocks do not open a
/// scope of their own.
pub fn evaluate_block(interpreter: &mut Interpreter, block: &BlockStmt, env: &EnvRef) -> Result<Flow, Error> {
    let mut last = RuntimeVal::Null;

    for stmt in block.iter() {
        match evaluate(interpreter, stmt, env)? {
            Flow::Normal(value) => last = value,
            flow => return Ok(flow),
        }
    }

    Ok(Flow::Normal(last))
}

fn evaluate_var_decl_stmt(interpreter: &mut Interpreter, declaration: &VarDeclStmt, env: &EnvRef) -> Result<Flow, Error> {
    let value = match &declaration.assigned_value {
        Some(expr) => evaluate_expr(interpreter, expr, env)?,
        None => RuntimeVal::Null,
    };

    let declared_type = declaration
        .explicit_type
        .as_ref()
        .map_or(ValueType::Any, ValueType::from_ast);

    let value = env.borrow_mut().declare_variable(
        &declaration.identifier,
        value,
        declared_type,
        declaration.is_constant,
        &declaration.span.start,
    )?;

    Ok(Flow::Normal(value))
}

fn evaluate_struct_decl_stmt(declaration: &StructDeclStmt, env: &EnvRef) -> Result<Flow, Error> {
    let properties: Vec<(String, ValueType)> = declaration
        .properties
        .iter()
        .map(|(name, ty)| (name.clone(), ValueType::from_ast(ty)))
        .collect();

    debug!(structure = %declaration.name, properties = properties.len(), "declaring struct");

    let def = StructDef::new_ref(&declaration.name, properties);
    env.borrow_mut().declare_struct(Rc::clone(&def), &declaration.span.start)?;

    Ok(Flow::Normal(RuntimeVal::StructDef(def)))
}

fn evaluate_fn_decl_stmt(declaration: &FnDeclStmt, env: &EnvRef) -> Result<Flow, Error> {
    let function = Rc::new(Function::from_declaration(declaration, env));

    debug!(function = %function.name, parameters = function.parameters.len(), "declaring function");
    env.borrow_mut().declare_function(Rc::clone(&function), &declaration.span.start)?;

    Ok(Flow::Normal(RuntimeVal::Function(function)))
}

fn evaluate_impl_stmt(implementation: &ImplStmt, env: &EnvRef) -> Result<Flow, Error> {
    let method = Rc::new(Function::from_declaration(&implementation.method, env));

    debug!(structure = %implementation.struct_name, method = %method.name, "implementing method");
    env.borrow_mut().implement_method(&implementation.struct_name, method, &implementation.span.start)?;

    Ok(Flow::Normal(RuntimeVal::Null))
}

fn evaluate_if_stmt(interpreter: &mut Interpreter, if_stmt: &IfStmt, env: &EnvRef) -> Result<Flow, Error> {
    if evaluate_expr(interpreter, &if_stmt.condition, env)?.is_truthy() {
        return evaluate_block(interpreter, &if_stmt.then_body, env);
    }

    for (condition, body) in &if_stmt.else_ifs {
        if evaluate_expr(interpreter, condition, env)?.is_truthy() {
            return evaluate_block(interpreter, body, env);
        }
    }

    match &if_stmt.else_body {
        Some(body) => evaluate_block(interpreter, body, env),
        None => Ok(Flow::Normal(RuntimeVal::Null)),
    }
}

/// Runs one iteration body in a fresh scope. `Some` ends the loop with
/// that flow.
fn run_iteration(interpreter: &mut Interpreter, body: &BlockStmt, loop_env: &EnvRef) -> Result<Option<Flow>, Error> {
    let iteration_env = Environment::child(loop_env);

    match evaluate_block(interpreter, body, &iteration_env)? {
        Flow::Normal(_) => Ok(None),
        Flow::Broke => Ok(Some(Flow::Normal(RuntimeVal::Null))),
        returned => Ok(Some(returned)),
    }
}

fn evaluate_while_stmt(interpreter: &mut Interpreter, while_stmt: &WhileStmt, env: &EnvRef) -> Result<Flow, Error> {
    let loop_env = Environment::child(env);

    while evaluate_expr(interpreter, &while_stmt.condition, &loop_env)?.is_truthy() {
        if let Some(flow) = run_iteration(interpreter, &while_stmt.body, &loop_env)? {
            return Ok(flow);
        }
    }

    Ok(Flow::Normal(RuntimeVal::Null))
}

fn evaluate_for_stmt(interpreter: &mut Interpreter, for_stmt: &ForStmt, env: &EnvRef) -> Result<Flow, Error> {
    let loop_env = Environment::child(env);

    if let Some(initializer) = &for_stmt.initializer {
        evaluate(interpreter, initializer, &loop_env)?;
    }

    loop {
        if let Some(condition) = &for_stmt.condition {
            if !evaluate_expr(interpreter, condition, &loop_env)?.is_truthy() {
                break;
            }
        }

        if let Some(flow) = run_iteration(interpreter, &for_stmt.body, &loop_env)? {
            return Ok(flow);
        }

        if let Some(post) = &for_stmt.post {
            evaluate(interpreter, post, &loop_env)?;
        }
    }

    Ok(Flow::Normal(RuntimeVal::Null))
}

fn evaluate_foreach_stmt(interpreter: &mut Interpreter, foreach: &ForeachStmt, env: &EnvRef) -> Result<Flow, Error> {
    let position = &foreach.span.start;

    let items = match evaluate_expr(interpreter, &foreach.collection, env)? {
        RuntimeVal::Array(array) => array.elements,
        RuntimeVal::String(string) => string.chars().map(|c| RuntimeVal::String(c.to_string())).collect(),
        other => {
            return Err(Error::new(
                ErrorImpl::NotIterable { received: other.value_type().to_string() },
                foreach.collection.get_span().start.clone(),
            ))
        }
    };

    let loop_env = Environment::child(env);
    loop_env
        .borrow_mut()
        .declare_variable(&foreach.iterator, RuntimeVal::Null, ValueType::Any, false, position)?;

    for item in items {
        loop_env.borrow_mut().assign_variable(&foreach.iterator, item, position)?;

        if let Some(flow) = run_iteration(interpreter, &foreach.body, &loop_env)? {
            return Ok(flow);
        }
    }

    Ok(Flow::Normal(RuntimeVal::Null))
}

fn evaluate_import_stmt(interpreter: &mut Interpreter, import: &ImportStmt, env: &EnvRef) -> Result<Flow, Error> {
    let position = &import.span.start;

    let source = fs::read_to_string(&import.from).map_err(|err| {
        Error::new(
            ErrorImpl::ModuleNotFound { path: import.from.clone(), reason: err.to_string() },
            position.clone(),
        )
    })?;

    // Canonical paths make `./a.sp` and `a.sp` the same module
    let module_path = fs::canonicalize(&import.from).unwrap_or_else(|_| PathBuf::from(&import.from));
    if !interpreter.begin_import(module_path.clone()) {
        return Err(Error::new(ErrorImpl::ImportCycle { path: import.from.clone() }, position.clone()));
    }

    debug!(path = %import.from, names = ?import.names, "importing module");

    let module_env = create_global_environment();
    let loaded = interpreter.run_source(source, &import.from, &module_env);
    interpreter.end_import(&module_path);
    loaded?;

    let module = module_env.borrow();
    let mut scope = env.borrow_mut();

    if import.names.is_empty() {
        for (name, variable) in module.variables() {
            if BUILTIN_CONSTANTS.contains(&name.as_str()) {
                continue;
            }
            scope.declare_variable(name, variable.value.clone(), variable.declared_type.clone(), variable.is_constant, position)?;
        }

        for def in module.struct_defs() {
            scope.declare_struct(Rc::clone(def), position)?;
        }

        for function in module.functions().filter(|function| !function.is_native()) {
            scope.declare_function(Rc::clone(function), position)?;
        }

        return Ok(Flow::Normal(RuntimeVal::Null));
    }

    for name in &import.names {
        import_name(&module, &mut scope, name, &import.from, position)?;
    }

    Ok(Flow::Normal(RuntimeVal::Null))
}

fn import_name(
    module: &Environment,
    scope: &mut Environment,
    name: &str,
    path: &str,
    position: &Position,
) -> Result<(), Error> {
    if let Some(variable) = module.get_local_variable(name) {
        if !BUILTIN_CONSTANTS.contains(&name) {
            scope.declare_variable(name, variable.value.clone(), variable.declared_type.clone(), variable.is_constant, position)?;
            return Ok(());
        }
    }

    if let Some(def) = module.get_local_struct(name) {
        return scope.declare_struct(Rc::clone(def), position);
    }

    if let Some(function) = module.get_local_function(name).filter(|function| !function.is_native()) {
        return scope.declare_function(Rc::clone(function), position);
    }

    Err(Error::new(
        ErrorImpl::ImportNotFound { name: String::from(name), path: String::from(path) },
        position.clone(),
    ))
}
