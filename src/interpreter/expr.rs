use std::rc::Rc;

use tracing::debug;

use crate::{
    ast::{
        ast::Expr,
        expressions::{
            ArrayAccessExpr, ArrayInstantiationExpr, AssignmentExpr, BinaryExpr, CallExpr,
            MemberAccessExpr, PrefixExpr, StructInstantiationExpr,
        },
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    Position,
};

use super::{
    environment::{EnvRef, Environment},
    interpreter::Interpreter,
    methods::{call_primitive_method, is_mutating_method},
    stmt::evaluate_block,
    values::{ArrayVal, Flow, Function, FunctionKind, RuntimeVal, StructVal, ValueType},
};

pub fn evaluate_expr(interpreter: &mut Interpreter, expr: &Expr, env: &EnvRef) -> Result<RuntimeVal, Error> {
    match expr {
        Expr::Number(number) => Ok(RuntimeVal::Number(number.value)),
        Expr::String(string) => Ok(RuntimeVal::String(string.value.clone())),
        Expr::Symbol(symbol) => env.borrow().resolve_symbol(&symbol.value).ok_or_else(|| {
            Error::new(
                ErrorImpl::VariableNotDeclared { variable: symbol.value.clone() },
                symbol.span.start.clone(),
            )
        }),
        Expr::Binary(binary) => evaluate_binary_expr(interpreter, binary, env),
        Expr::Prefix(prefix) => evaluate_prefix_expr(interpreter, prefix, env),
        Expr::Assignment(assignment) => evaluate_assignment_expr(interpreter, assignment, env),
        Expr::StructInstantiation(instantiation) => evaluate_struct_instantiation_expr(interpreter, instantiation, env),
        Expr::ArrayInstantiation(instantiation) => evaluate_array_instantiation_expr(interpreter, instantiation, env),
        Expr::MemberAccess(access) => evaluate_member_access_expr(interpreter, access, env),
        Expr::ArrayAccess(access) => evaluate_array_access_expr(interpreter, access, env),
        Expr::Call(call) => evaluate_call_expr(interpreter, call, env),
    }
}

fn evaluate_binary_expr(interpreter: &mut Interpreter, binary: &BinaryExpr, env: &EnvRef) -> Result<RuntimeVal, Error> {
    // Both sides always run, `&&` and `||` do not short-circuit
    let left = evaluate_expr(interpreter, &binary.left, env)?;
    let right = evaluate_expr(interpreter, &binary.right, env)?;

    apply_binary_operator(binary.operator.kind, &binary.operator.value, left, right, &binary.span.start)
}

/// Applies a binary operator to two evaluated operands.
pub fn apply_binary_operator(
    kind: TokenKind,
    operator: &str,
    left: RuntimeVal,
    right: RuntimeVal,
    position: &Position,
) -> Result<RuntimeVal, Error> {
    let invalid = |left: &RuntimeVal, right: &RuntimeVal| {
        Error::new(
            ErrorImpl::InvalidOperands {
                operator: String::from(operator),
                left: left.value_type().to_string(),
                right: right.value_type().to_string(),
            },
            position.clone(),
        )
    };

    if let (RuntimeVal::Number(l), RuntimeVal::Number(r)) = (&left, &right) {
        let (l, r) = (*l, *r);

        return match kind {
            TokenKind::Plus => Ok(RuntimeVal::Number(l + r)),
            TokenKind::Dash => Ok(RuntimeVal::Number(l - r)),
            TokenKind::Star => Ok(RuntimeVal::Number(l * r)),
            TokenKind::Slash => {
                if r == 0.0 {
                    return Err(Error::new(ErrorImpl::DivisionByZero, position.clone()));
                }
                Ok(RuntimeVal::Number(l / r))
            }
            TokenKind::Percent => {
                let (l, r) = (l as i64, r as i64);
                if r == 0 {
                    return Err(Error::new(ErrorImpl::ModuloByZero, position.clone()));
                }
                Ok(RuntimeVal::Number(l.wrapping_rem(r) as f64))
            }
            TokenKind::Less => Ok(RuntimeVal::Bool(l < r)),
            TokenKind::LessEquals => Ok(RuntimeVal::Bool(l <= r)),
            TokenKind::Greater => Ok(RuntimeVal::Bool(l > r)),
            TokenKind::GreaterEquals => Ok(RuntimeVal::Bool(l >= r)),
            TokenKind::Equals => Ok(RuntimeVal::Bool(l == r)),
            TokenKind::NotEquals => Ok(RuntimeVal::Bool(l != r)),
            TokenKind::And => Ok(RuntimeVal::Bool(left.is_truthy() && right.is_truthy())),
            TokenKind::Or => Ok(RuntimeVal::Bool(left.is_truthy() || right.is_truthy())),
            _ => Err(invalid(&left, &right)),
        };
    }

    match kind {
        TokenKind::And => Ok(RuntimeVal::Bool(left.is_truthy() && right.is_truthy())),
        TokenKind::Or => Ok(RuntimeVal::Bool(left.is_truthy() || right.is_truthy())),
        TokenKind::Equals => Ok(RuntimeVal::Bool(left.equals(&right))),
        TokenKind::NotEquals => Ok(RuntimeVal::Bool(!left.equals(&right))),
        _ => Err(invalid(&left, &right)),
    }
}

fn evaluate_prefix_expr(interpreter: &mut Interpreter, prefix: &PrefixExpr, env: &EnvRef) -> Result<RuntimeVal, Error> {
    let value = evaluate_expr(interpreter, &prefix.right_expr, env)?;

    match (prefix.operator.kind, &value) {
        (TokenKind::Not, _) => Ok(RuntimeVal::Bool(!value.is_truthy())),
        (TokenKind::Dash, RuntimeVal::Number(number)) => Ok(RuntimeVal::Number(-number)),
        (TokenKind::Dash, RuntimeVal::Bool(boolean)) => Ok(RuntimeVal::Bool(!boolean)),
        _ => Err(Error::new(
            ErrorImpl::InvalidPrefixOperand {
                operator: prefix.operator.value.clone(),
                received: value.value_type().to_string(),
            },
            prefix.span.start.clone(),
        )),
    }
}

/// Maps `+=` and friends onto the operator they apply.
fn compound_operator(kind: TokenKind) -> Option<(TokenKind, &'static str)> {
    match kind {
        TokenKind::PlusEquals => Some((TokenKind::Plus, "+")),
        TokenKind::MinusEquals => Some((TokenKind::Dash, "-")),
        TokenKind::StarEquals => Some((TokenKind::Star, "*")),
        TokenKind::SlashEquals => Some((TokenKind::Slash, "/")),
        _ => None,
    }
}

fn evaluate_assignment_expr(interpreter: &mut Interpreter, assignment: &AssignmentExpr, env: &EnvRef) -> Result<RuntimeVal, Error> {
    let position = &assignment.span.start;
    let mut value = evaluate_expr(interpreter, &assignment.value, env)?;

    // Indices in the target run once, for both the read and the write
    let place = collect_place(interpreter, &assignment.assignee, env)?;

    if let Some((kind, operator)) = compound_operator(assignment.operator.kind) {
        let current = read_place(env, &place, position)?;
        value = apply_binary_operator(kind, operator, current, value, position)?;
    }

    write_place(env, &place, value.clone(), position)?;
    Ok(value)
}

enum PlaceSegment {
    Member(String),
    Index(i64),
}

/// An assignable location: a root variable and the segments leading to the
/// slot, with every index already evaluated.
struct Place {
    root: String,
    path: Vec<PlaceSegment>,
}

/// Flattens `root.a[i].b` into a [`Place`].
fn collect_place(interpreter: &mut Interpreter, target: &Expr, env: &EnvRef) -> Result<Place, Error> {
    match target {
        Expr::Symbol(symbol) => Ok(Place {
            root: symbol.value.clone(),
            path: vec![],
        }),
        Expr::MemberAccess(access) => {
            let mut place = collect_place(interpreter, &access.member, env)?;
            place.path.push(PlaceSegment::Member(access.property.clone()));
            Ok(place)
        }
        Expr::ArrayAccess(access) if !access.is_prev && !access.is_rest => {
            let mut place = collect_place(interpreter, &access.array, env)?;
            let index = evaluate_index(interpreter, &access.index, env)?;
            place.path.push(PlaceSegment::Index(index));
            Ok(place)
        }
        _ => Err(Error::new(ErrorImpl::InvalidAssignmentTarget, target.get_span().start.clone())),
    }
}

fn read_place(env: &EnvRef, place: &Place, position: &Position) -> Result<RuntimeVal, Error> {
    let mut current = env.borrow().resolve_symbol(&place.root).ok_or_else(|| {
        Error::new(
            ErrorImpl::VariableNotDeclared { variable: place.root.clone() },
            position.clone(),
        )
    })?;

    for segment in &place.path {
        current = match (segment, current) {
            (PlaceSegment::Member(property), RuntimeVal::Struct(instance)) => {
                instance.get(property).cloned().ok_or_else(|| {
                    Error::new(
                        ErrorImpl::MemberNotFound { structure: instance.name.clone(), member: property.clone() },
                        position.clone(),
                    )
                })?
            }
            (PlaceSegment::Member(_), other) => {
                return Err(Error::new(
                    ErrorImpl::NotAStruct { received: other.value_type().to_string() },
                    position.clone(),
                ))
            }
            (PlaceSegment::Index(index), RuntimeVal::Array(mut array)) => {
                let index = check_index(*index, array.elements.len(), position)?;
                array.elements.swap_remove(index)
            }
            (PlaceSegment::Index(index), RuntimeVal::String(string)) => {
                let chars: Vec<char> = string.chars().collect();
                let index = check_index(*index, chars.len(), position)?;
                RuntimeVal::String(chars[index].to_string())
            }
            (PlaceSegment::Index(_), other) => {
                return Err(Error::new(
                    ErrorImpl::NotIndexable { received: other.value_type().to_string() },
                    position.clone(),
                ))
            }
        };
    }

    Ok(current)
}

fn write_place(env: &EnvRef, place: &Place, value: RuntimeVal, position: &Position) -> Result<(), Error> {
    if place.path.is_empty() {
        env.borrow_mut().assign_variable(&place.root, value, position)?;
        return Ok(());
    }

    let mut root = env.borrow().lookup_variable(&place.root, position)?;
    set_in_place(&mut root, &place.path, value, position)?;
    env.borrow_mut().assign_variable(&place.root, root, position)?;

    Ok(())
}

fn set_in_place(current: &mut RuntimeVal, path: &[PlaceSegment], value: RuntimeVal, position: &Position) -> Result<(), Error> {
    let Some((segment, rest)) = path.split_first() else {
        *current = value;
        return Ok(());
    };

    match (segment, current) {
        (PlaceSegment::Member(property), RuntimeVal::Struct(instance)) => {
            if rest.is_empty() {
                let declared = instance.def.borrow().property_type(property).cloned().ok_or_else(|| {
                    Error::new(
                        ErrorImpl::MemberNotFound { structure: instance.name.clone(), member: property.clone() },
                        position.clone(),
                    )
                })?;

                let received = value.value_type();
                if !declared.accepts(&received) {
                    return Err(Error::new(
                        ErrorImpl::FieldTypeMatchError {
                            field: property.clone(),
                            expected: declared.to_string(),
                            received: received.to_string(),
                        },
                        position.clone(),
                    ));
                }
            }

            let structure = instance.name.clone();
            let slot = instance.get_mut(property).ok_or_else(|| {
                Error::new(
                    ErrorImpl::MemberNotFound { structure, member: property.clone() },
                    position.clone(),
                )
            })?;

            set_in_place(slot, rest, value, position)
        }
        (PlaceSegment::Member(_), other) => Err(Error::new(
            ErrorImpl::NotAStruct { received: other.value_type().to_string() },
            position.clone(),
        )),
        (PlaceSegment::Index(index), RuntimeVal::Array(array)) => {
            let index = check_index(*index, array.elements.len(), position)?;

            if rest.is_empty() {
                let received = value.value_type();
                if !array.element_type.accepts(&received) {
                    return Err(Error::new(
                        ErrorImpl::ElementTypeMatchError {
                            expected: array.element_type.to_string(),
                            received: received.to_string(),
                        },
                        position.clone(),
                    ));
                }
            }

            set_in_place(&mut array.elements[index], rest, value, position)
        }
        (PlaceSegment::Index(_), other) => Err(Error::new(
            ErrorImpl::NotIndexable { received: other.value_type().to_string() },
            position.clone(),
        )),
    }
}

fn evaluate_struct_instantiation_expr(
    interpreter: &mut Interpreter,
    instantiation: &StructInstantiationExpr,
    env: &EnvRef,
) -> Result<RuntimeVal, Error> {
    let position = &instantiation.span.start;
    let def = env.borrow().lookup_struct(&instantiation.name, position)?;
    let declared_properties = def.borrow().properties.clone();

    let mut properties = Vec::with_capacity(declared_properties.len());
    for (name, declared) in &declared_properties {
        let supplied = instantiation.properties.iter().find(|(property, _)| property == name);

        let value = match supplied {
            Some((_, expr)) => {
                let value = evaluate_expr(interpreter, expr, env)?;
                let received = value.value_type();
                if !declared.accepts(&received) {
                    return Err(Error::new(
                        ErrorImpl::FieldTypeMatchError {
                            field: name.clone(),
                            expected: declared.to_string(),
                            received: received.to_string(),
                        },
                        expr.get_span().start.clone(),
                    ));
                }
                value
            }
            None => RuntimeVal::Null,
        };

        properties.push((name.clone(), value));
    }

    Ok(RuntimeVal::Struct(StructVal::new(&def, properties)))
}

fn evaluate_array_instantiation_expr(
    interpreter: &mut Interpreter,
    instantiation: &ArrayInstantiationExpr,
    env: &EnvRef,
) -> Result<RuntimeVal, Error> {
    let element_type = ValueType::from_ast(&instantiation.underlying);

    let mut elements = Vec::with_capacity(instantiation.contents.len());
    for expr in &instantiation.contents {
        let element = evaluate_expr(interpreter, expr, env)?;
        let received = element.value_type();
        if !element_type.accepts(&received) {
            return Err(Error::new(
                ErrorImpl::ElementTypeMatchError {
                    expected: element_type.to_string(),
                    received: received.to_string(),
                },
                expr.get_span().start.clone(),
            ));
        }
        elements.push(element);
    }

    Ok(RuntimeVal::Array(ArrayVal { elements, element_type }))
}

fn evaluate_member_access_expr(interpreter: &mut Interpreter, access: &MemberAccessExpr, env: &EnvRef) -> Result<RuntimeVal, Error> {
    let base = evaluate_expr(interpreter, &access.member, env)?;

    match base {
        RuntimeVal::Struct(instance) => instance.get(&access.property).cloned().ok_or_else(|| {
            Error::new(
                ErrorImpl::MemberNotFound { structure: instance.name.clone(), member: access.property.clone() },
                access.span.start.clone(),
            )
        }),
        other => Err(Error::new(
            ErrorImpl::NotAStruct { received: other.value_type().to_string() },
            access.span.start.clone(),
        )),
    }
}

fn evaluate_index(interpreter: &mut Interpreter, index: &Expr, env: &EnvRef) -> Result<i64, Error> {
    match evaluate_expr(interpreter, index, env)? {
        RuntimeVal::Number(number) => Ok(number as i64),
        other => Err(Error::new(
            ErrorImpl::IndexNotNumber { received: other.value_type().to_string() },
            index.get_span().start.clone(),
        )),
    }
}

/// A plain index must address an existing element.
fn check_index(index: i64, length: usize, position: &Position) -> Result<usize, Error> {
    if index < 0 || index as usize >= length {
        return Err(Error::new(ErrorImpl::IndexOutOfRange { index, length }, position.clone()));
    }
    Ok(index as usize)
}

/// A slice bound may also sit one past the end.
fn check_slice_bound(index: i64, length: usize, position: &Position) -> Result<usize, Error> {
    if index < 0 || index as usize > length {
        return Err(Error::new(ErrorImpl::IndexOutOfRange { index, length }, position.clone()));
    }
    Ok(index as usize)
}

fn evaluate_array_access_expr(interpreter: &mut Interpreter, access: &ArrayAccessExpr, env: &EnvRef) -> Result<RuntimeVal, Error> {
    let base = evaluate_expr(interpreter, &access.array, env)?;
    let index = evaluate_index(interpreter, &access.index, env)?;
    let position = &access.span.start;

    match base {
        RuntimeVal::Array(array) => {
            let length = array.elements.len();

            if access.is_prev || access.is_rest {
                let bound = check_slice_bound(index, length, position)?;
                let elements = if access.is_prev {
                    array.elements[..bound].to_vec()
                } else {
                    array.elements[bound..].to_vec()
                };

                return Ok(RuntimeVal::Array(ArrayVal { elements, element_type: array.element_type }));
            }

            let index = check_index(index, length, position)?;
            Ok(array.elements[index].clone())
        }
        RuntimeVal::String(string) => {
            let chars: Vec<char> = string.chars().collect();

            if access.is_prev || access.is_rest {
                let bound = check_slice_bound(index, chars.len(), position)?;
                let slice = if access.is_prev { &chars[..bound] } else { &chars[bound..] };

                return Ok(RuntimeVal::String(slice.iter().collect()));
            }

            let index = check_index(index, chars.len(), position)?;
            Ok(RuntimeVal::String(chars[index].to_string()))
        }
        other => Err(Error::new(
            ErrorImpl::NotIndexable { received: other.value_type().to_string() },
            position.clone(),
        )),
    }
}

fn evaluate_arguments(interpreter: &mut Interpreter, arguments: &[Expr], env: &EnvRef) -> Result<Vec<RuntimeVal>, Error> {
    arguments
        .iter()
        .map(|argument| evaluate_expr(interpreter, argument, env))
        .collect()
}

fn evaluate_call_expr(interpreter: &mut Interpreter, call: &CallExpr, env: &EnvRef) -> Result<RuntimeVal, Error> {
    let position = &call.span.start;

    let Some(receiver_expr) = &call.receiver else {
        let function = env.borrow().resolve_callable(&call.name, position)?;
        let args = evaluate_arguments(interpreter, &call.arguments, env)?;
        return call_function(interpreter, &function, args, None, position);
    };

    // A place receiver is read once so `append`/`pop` write back to the same slot
    let place = if is_place(receiver_expr) {
        Some(collect_place(interpreter, receiver_expr, env)?)
    } else {
        None
    };

    let receiver = match &place {
        Some(place) => read_place(env, place, position)?,
        None => evaluate_expr(interpreter, receiver_expr, env)?,
    };
    let args = evaluate_arguments(interpreter, &call.arguments, env)?;

    if let RuntimeVal::Struct(instance) = &receiver {
        let method = instance.def.borrow().methods.get(&call.name).cloned();
        let method = method.ok_or_else(|| {
            Error::new(
                ErrorImpl::UnknownMethod { receiver: instance.name.clone(), method: call.name.clone() },
                position.clone(),
            )
        })?;

        return call_function(interpreter, &method, args, Some(receiver), position);
    }

    let writes_back = matches!(receiver, RuntimeVal::Array(_)) && is_mutating_method(&call.name);
    let result = call_primitive_method(receiver, &call.name, args, position)?;

    if let (true, Some(place)) = (writes_back, &place) {
        write_place(env, place, result.clone(), position)?;
    }

    Ok(result)
}

fn is_place(expr: &Expr) -> bool {
    match expr {
        Expr::Symbol(_) => true,
        Expr::MemberAccess(access) => is_place(&access.member),
        Expr::ArrayAccess(access) => !access.is_prev && !access.is_rest && is_place(&access.array),
        _ => false,
    }
}

/// Calls `function` with already evaluated arguments. Methods receive their
/// instance as `receiver`, bound to `self` inside the body.
pub fn call_function(
    interpreter: &mut Interpreter,
    function: &Rc<Function>,
    args: Vec<RuntimeVal>,
    receiver: Option<RuntimeVal>,
    position: &Position,
) -> Result<RuntimeVal, Error> {
    let arity = function.arity();
    if !arity.accepts(args.len()) {
        return Err(Error::new(
            ErrorImpl::UnexpectedArguments {
                callee: function.name.clone(),
                expected: arity.to_string(),
                received: args.len(),
            },
            position.clone(),
        ));
    }

    let (body, captured) = match &function.kind {
        FunctionKind::Native(native) => return (native.call)(interpreter, args, position),
        FunctionKind::User { body, env } => (body, env),
    };

    debug!(function = %function.name, arguments = args.len(), "calling function");

    let call_env = Environment::child(captured);
    {
        let mut scope = call_env.borrow_mut();

        if let Some(receiver) = receiver {
            scope.declare_variable("self", receiver, ValueType::Any, false, position)?;
        }

        for ((name, declared), value) in function.parameters.iter().zip(args) {
            let received = value.value_type();
            if !declared.accepts(&received) {
                return Err(Error::new(
                    ErrorImpl::ArgumentTypeMatchError {
                        parameter: name.clone(),
                        expected: declared.to_string(),
                        received: received.to_string(),
                    },
                    position.clone(),
                ));
            }

            scope.declare_variable(name, value, declared.clone(), false, position)?;
        }
    }

    let result = match evaluate_block(interpreter, body, &call_env)? {
        Flow::Normal(value) | Flow::Returned(value) => value,
        Flow::Broke => RuntimeVal::Null,
    };

    if let Some(expected) = &function.return_type {
        let received = result.value_type();
        if !expected.accepts(&received) {
            return Err(Error::new(
                ErrorImpl::ReturnTypeMatchError {
                    function: function.name.clone(),
                    expected: expected.to_string(),
                    received: received.to_string(),
                },
                position.clone(),
            ));
        }
    }

    Ok(result)
}
