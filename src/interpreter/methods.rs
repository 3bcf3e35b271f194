//! Built-in methods on primitive values.

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position,
};

use super::values::{Arity, ArrayVal, RuntimeVal, ValueType};

/// Methods whose result replaces the receiver when it is assignable.
pub fn is_mutating_method(method: &str) -> bool {
    matches!(method, "append" | "pop")
}

fn check_arity(receiver: &RuntimeVal, method: &str, arity: Arity, args: &[RuntimeVal], position: &Position) -> Result<(), Error> {
    if arity.accepts(args.len()) {
        return Ok(());
    }

    Err(Error::new(
        ErrorImpl::UnexpectedArguments {
            callee: format!("{}.{}", receiver.value_type(), method),
            expected: arity.to_string(),
            received: args.len(),
        },
        position.clone(),
    ))
}

fn unknown_method(receiver: &RuntimeVal, method: &str, position: &Position) -> Error {
    Error::new(
        ErrorImpl::UnknownMethod {
            receiver: receiver.value_type().to_string(),
            method: String::from(method),
        },
        position.clone(),
    )
}

fn string_argument(args: &[RuntimeVal], parameter: &str, position: &Position) -> Result<String, Error> {
    match args.first() {
        Some(RuntimeVal::String(value)) => Ok(value.clone()),
        other => Err(Error::new(
            ErrorImpl::ArgumentTypeMatchError {
                parameter: String::from(parameter),
                expected: ValueType::String.to_string(),
                received: other.map_or(ValueType::Null, RuntimeVal::value_type).to_string(),
            },
            position.clone(),
        )),
    }
}

/// Dispatches `receiver.method(args)` for strings, numbers, booleans and
/// arrays.
pub fn call_primitive_method(
    receiver: RuntimeVal,
    method: &str,
    args: Vec<RuntimeVal>,
    position: &Position,
) -> Result<RuntimeVal, Error> {
    match &receiver {
        RuntimeVal::String(value) => match method {
            "length" => {
                check_arity(&receiver, method, Arity::Exact(0), &args, position)?;
                Ok(RuntimeVal::Number(value.chars().count() as f64))
            }
            "concat" => {
                check_arity(&receiver, method, Arity::Exact(1), &args, position)?;
                let other = string_argument(&args, "other", position)?;
                Ok(RuntimeVal::String(format!("{}{}", value, other)))
            }
            "split" => {
                check_arity(&receiver, method, Arity::Exact(1), &args, position)?;
                let separator = string_argument(&args, "separator", position)?;
                let elements = if separator.is_empty() {
                    value.chars().map(|c| RuntimeVal::String(c.to_string())).collect()
                } else {
                    value.split(separator.as_str()).map(|part| RuntimeVal::String(String::from(part))).collect()
                };

                Ok(RuntimeVal::Array(ArrayVal { elements, element_type: ValueType::String }))
            }
            _ => Err(unknown_method(&receiver, method, position)),
        },
        RuntimeVal::Number(value) => match method {
            "toString" => {
                check_arity(&receiver, method, Arity::Exact(0), &args, position)?;
                Ok(RuntimeVal::String(receiver.to_string()))
            }
            "isEven" | "isOdd" => {
                check_arity(&receiver, method, Arity::Exact(0), &args, position)?;
                let even = (*value as i64) % 2 == 0;
                Ok(RuntimeVal::Bool(if method == "isEven" { even } else { !even }))
            }
            _ => Err(unknown_method(&receiver, method, position)),
        },
        RuntimeVal::Bool(_) => match method {
            "toString" => {
                check_arity(&receiver, method, Arity::Exact(0), &args, position)?;
                Ok(RuntimeVal::String(receiver.to_string()))
            }
            _ => Err(unknown_method(&receiver, method, position)),
        },
        RuntimeVal::Array(array) => match method {
            "length" => {
                check_arity(&receiver, method, Arity::Exact(0), &args, position)?;
                Ok(RuntimeVal::Number(array.elements.len() as f64))
            }
            "append" => {
                check_arity(&receiver, method, Arity::Exact(1), &args, position)?;
                let mut array = array.clone();
                let element = args.into_iter().next().unwrap_or(RuntimeVal::Null);

                let received = element.value_type();
                if !array.element_type.accepts(&received) {
                    return Err(Error::new(
                        ErrorImpl::ElementTypeMatchError {
                            expected: array.element_type.to_string(),
                            received: received.to_string(),
                        },
                        position.clone(),
                    ));
                }

                array.elements.push(element);
                Ok(RuntimeVal::Array(array))
            }
            "pop" => {
                check_arity(&receiver, method, Arity::Exact(0), &args, position)?;
                let mut array = array.clone();
                if array.elements.pop().is_none() {
                    return Err(Error::new(ErrorImpl::PopFromEmpty, position.clone()));
                }

                Ok(RuntimeVal::Array(array))
            }
            _ => Err(unknown_method(&receiver, method, position)),
        },
        _ => Err(unknown_method(&receiver, method, position)),
    }
}
