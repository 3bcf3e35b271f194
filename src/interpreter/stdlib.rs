//! Native functions and the root environment.

use std::{cell::RefCell, fmt::Display, rc::Rc, thread, time::Duration};

use chrono::{DateTime, Local, TimeZone, Utc};

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position,
};

use super::{
    environment::{EnvRef, Environment},
    interpreter::Interpreter,
    values::{Arity, ArrayVal, Function, NativeFn, RuntimeVal, ValueType},
};

/// Largest array `range` will build.
pub const RANGE_LIMIT: u64 = 10_000_000;

/// Constants every root environment starts with.
pub const BUILTIN_CONSTANTS: [&str; 3] = ["true", "false", "null"];

const NATIVES: [(&str, Arity, NativeFn); 5] = [
    ("show", Arity::Variadic, native_show),
    ("time", Arity::Exact(0), native_time),
    ("date", Arity::Exact(0), native_date),
    ("range", Arity::Range(1, 2), native_range),
    ("sleep", Arity::Exact(0), native_sleep),
];

/// Builds a root environment with the builtin constants and natives.
pub fn create_global_environment() -> EnvRef {
    let mut env = Environment::new(None);
    let position = Position::null();

    let constants = [
        ("true", RuntimeVal::Bool(true), ValueType::Boolean),
        ("false", RuntimeVal::Bool(false), ValueType::Boolean),
        ("null", RuntimeVal::Null, ValueType::Null),
    ];

    // Names are distinct, so none of these declarations can fail
    for (name, value, declared_type) in constants {
        let _ = env.declare_variable(name, value, declared_type, true, &position);
    }

    for (name, arity, call) in NATIVES {
        let _ = env.declare_function(Rc::new(Function::native(name, arity, call)), &position);
    }

    Rc::new(RefCell::new(env))
}

fn native_show(interpreter: &mut Interpreter, args: Vec<RuntimeVal>, _position: &Position) -> Result<RuntimeVal, Error> {
    let rendered: Vec<String> = args.iter().map(|arg| arg.to_string()).collect();
    interpreter.print_line(&rendered.join(", "));

    Ok(RuntimeVal::Null)
}

fn native_time(_interpreter: &mut Interpreter, _args: Vec<RuntimeVal>, _position: &Position) -> Result<RuntimeVal, Error> {
    Ok(RuntimeVal::Number(Utc::now().timestamp_millis() as f64))
}

/// `HH:MM:SS.mmm DD-MM-YYYY` in the moment's own time zone.
pub fn format_date<Tz: TimeZone>(moment: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    moment.format("%H:%M:%S%.3f %d-%m-%Y").to_string()
}

fn native_date(_interpreter: &mut Interpreter, _args: Vec<RuntimeVal>, _position: &Position) -> Result<RuntimeVal, Error> {
    Ok(RuntimeVal::String(format_date(&Local::now())))
}

fn expect_number(value: &RuntimeVal, parameter: &str, position: &Position) -> Result<f64, Error> {
    match value {
        RuntimeVal::Number(number) => Ok(*number),
        other => Err(Error::new(
            ErrorImpl::ArgumentTypeMatchError {
                parameter: String::from(parameter),
                expected: ValueType::Number.to_string(),
                received: other.value_type().to_string(),
            },
            position.clone(),
        )),
    }
}

fn native_range(_interpreter: &mut Interpreter, args: Vec<RuntimeVal>, position: &Position) -> Result<RuntimeVal, Error> {
    let (start, end) = match args.as_slice() {
        [end] => (0, expect_number(end, "end", position)? as i64),
        [start, end] => (
            expect_number(start, "start", position)? as i64,
            expect_number(end, "end", position)? as i64,
        ),
        _ => {
            return Err(Error::new(
                ErrorImpl::UnexpectedArguments {
                    callee: String::from("range"),
                    expected: Arity::Range(1, 2).to_string(),
                    received: args.len(),
                },
                position.clone(),
            ))
        }
    };

    let length = (i128::from(end) - i128::from(start) + 1).max(0) as u64;
    if length > RANGE_LIMIT {
        return Err(Error::new(
            ErrorImpl::RangeTooLarge { length, limit: RANGE_LIMIT },
            position.clone(),
        ));
    }

    let elements = (start..=end).map(|i| RuntimeVal::Number(i as f64)).collect();

    Ok(RuntimeVal::Array(ArrayVal {
        elements,
        element_type: ValueType::Number,
    }))
}

fn native_sleep(_interpreter: &mut Interpreter, _args: Vec<RuntimeVal>, _position: &Position) -> Result<RuntimeVal, Error> {
    thread::sleep(Duration::from_secs(2));
    Ok(RuntimeVal::Null)
}
