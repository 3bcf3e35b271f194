//! Unit tests for the runtime pieces.
//!
//! Covers environment scoping rules, value equality and rendering,
//! primitive methods and the date formatter. Whole programs are exercised
//! in `tests/integration_tests.rs`.

use std::{cell::RefCell, io, rc::Rc};

use chrono::{FixedOffset, TimeZone, Utc};

use pretty_assertions::assert_eq;

use crate::{
    errors::errors::{ErrorImpl, ErrorKind},
    Position,
};

use super::{
    environment::Environment,
    interpreter::Interpreter,
    methods::call_primitive_method,
    stdlib::{create_global_environment, format_date},
    values::{Arity, ArrayVal, RuntimeVal, StructDef, StructDefRef, StructVal, ValueType},
};

fn position() -> Position {
    Position(0, Rc::new("test.sp".to_string()))
}

fn point_def() -> StructDefRef {
    StructDef::new_ref(
        "Point",
        vec![("x".to_string(), ValueType::Number), ("y".to_string(), ValueType::Any)],
    )
}

fn numbers(values: &[f64]) -> RuntimeVal {
    RuntimeVal::Array(ArrayVal {
        elements: values.iter().map(|value| RuntimeVal::Number(*value)).collect(),
        element_type: ValueType::Number,
    })
}

#[test]
fn test_declare_and_lookup_variable() {
    let env = Environment::new_ref(None);
    env.borrow_mut()
        .declare_variable("x", RuntimeVal::Number(1.0), ValueType::Number, false, &position())
        .unwrap();

    let value = env.borrow().lookup_variable("x", &position()).unwrap();
    assert!(value.equals(&RuntimeVal::Number(1.0)));
}

#[test]
fn test_redeclaration_in_same_scope_fails() {
    let env = Environment::new_ref(None);
    env.borrow_mut()
        .declare_variable("x", RuntimeVal::Null, ValueType::Any, false, &position())
        .unwrap();

    let error = env
        .borrow_mut()
        .declare_variable("x", RuntimeVal::Null, ValueType::Any, false, &position())
        .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::NameError);
    assert_eq!(error.get_error_name(), "VariableAlreadyDeclared");
}

#[test]
fn test_child_scope_shadows_and_assigns_through() {
    let global = Environment::new_ref(None);
    global
        .borrow_mut()
        .declare_variable("x", RuntimeVal::Number(1.0), ValueType::Number, false, &position())
        .unwrap();

    let child = Environment::child(&global);
    child
        .borrow_mut()
        .assign_variable("x", RuntimeVal::Number(2.0), &position())
        .unwrap();
    assert!(global.borrow().lookup_variable("x", &position()).unwrap().equals(&RuntimeVal::Number(2.0)));

    child
        .borrow_mut()
        .declare_variable("x", RuntimeVal::String("inner".to_string()), ValueType::String, false, &position())
        .unwrap();
    assert!(child
        .borrow()
        .lookup_variable("x", &position())
        .unwrap()
        .equals(&RuntimeVal::String("inner".to_string())));
    assert!(global.borrow().lookup_variable("x", &position()).unwrap().equals(&RuntimeVal::Number(2.0)));
}

#[test]
fn test_constant_reassignment_is_name_error() {
    let env = Environment::new_ref(None);
    env.borrow_mut()
        .declare_variable("PI", RuntimeVal::Number(3.14), ValueType::Any, true, &position())
        .unwrap();

    let error = env
        .borrow_mut()
        .assign_variable("PI", RuntimeVal::Number(3.0), &position())
        .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::NameError);
    assert!(matches!(error.get_internal_error(), ErrorImpl::ConstantReassignment { .. }));
}

#[test]
fn test_declared_type_is_enforced() {
    let env = Environment::new_ref(None);

    let error = env
        .borrow_mut()
        .declare_variable("n", RuntimeVal::String("one".to_string()), ValueType::Number, false, &position())
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::TypeError);

    env.borrow_mut()
        .declare_variable("n", RuntimeVal::Null, ValueType::Number, false, &position())
        .unwrap();
    env.borrow_mut()
        .assign_variable("n", RuntimeVal::Number(1.0), &position())
        .unwrap();

    let error = env
        .borrow_mut()
        .assign_variable("n", RuntimeVal::Bool(true), &position())
        .unwrap_err();
    assert_eq!(error.to_string(), "TypeError: types do not match: expected number, received boolean");
}

#[test]
fn test_undeclared_lookup_fails() {
    let env = Environment::child(&Environment::new_ref(None));

    let error = env.borrow().lookup_variable("missing", &position()).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::NameError);

    let error = env
        .borrow_mut()
        .assign_variable("missing", RuntimeVal::Null, &position())
        .unwrap_err();
    assert_eq!(error.get_error_name(), "VariableNotDeclared");
}

#[test]
fn test_implement_method_finds_struct_in_parent() {
    let global = Environment::new_ref(None);
    global
        .borrow_mut()
        .declare_struct(
            StructDef::new_ref("Point", vec![("x".to_string(), ValueType::Number)]),
            &position(),
        )
        .unwrap();

    let show = global.borrow().lookup_function("show", &position());
    assert!(show.is_err());

    let natives = create_global_environment();
    let method = natives.borrow().lookup_function("show", &position()).unwrap();

    let child = Environment::child(&global);
    child
        .borrow_mut()
        .implement_method("Point", method, &position())
        .unwrap();

    let def = global.borrow().lookup_struct("Point", &position()).unwrap();
    assert!(def.borrow().methods.contains_key("show"));

    let error = child
        .borrow_mut()
        .implement_method("Line", Rc::clone(&def.borrow().methods["show"]), &position())
        .unwrap_err();
    assert_eq!(error.get_error_name(), "StructNotDeclared");
}

#[test]
fn test_global_environment_builtins() {
    let env = create_global_environment();
    let env = env.borrow();

    assert!(env.lookup_variable("true", &position()).unwrap().equals(&RuntimeVal::Bool(true)));
    assert!(env.lookup_variable("null", &position()).unwrap().equals(&RuntimeVal::Null));

    for name in ["show", "time", "date", "range", "sleep"] {
        let function = env.lookup_function(name, &position()).unwrap();
        assert!(function.is_native());
    }

    assert_eq!(env.lookup_function("range", &position()).unwrap().arity(), Arity::Range(1, 2));
}

#[test]
fn test_resolve_symbol_prefers_variables() {
    let env = create_global_environment();
    let child = Environment::child(&env);

    assert!(matches!(child.borrow().resolve_symbol("show"), Some(RuntimeVal::Function(_))));

    child
        .borrow_mut()
        .declare_variable("show", RuntimeVal::Number(1.0), ValueType::Any, false, &position())
        .unwrap();
    assert!(matches!(child.borrow().resolve_symbol("show"), Some(RuntimeVal::Number(_))));

    let error = child.borrow().resolve_callable("show", &position()).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::TypeError);

    assert!(child.borrow().resolve_symbol("missing").is_none());
}

#[test]
fn test_value_type_compatibility() {
    let array_of_numbers = ValueType::Array(Box::new(ValueType::Number));

    assert!(ValueType::Any.accepts(&ValueType::String));
    assert!(ValueType::Number.accepts(&ValueType::Null));
    assert!(array_of_numbers.accepts(&numbers(&[1.0]).value_type()));
    assert!(!array_of_numbers.accepts(&ValueType::Array(Box::new(ValueType::String))));
    assert!(!ValueType::Struct("Point".to_string()).accepts(&ValueType::Struct("Line".to_string())));

    assert_eq!(array_of_numbers.to_string(), "array<number>");
    assert_eq!(ValueType::Array(Box::new(array_of_numbers)).to_string(), "array<array<number>>");
}

#[test]
fn test_value_equality() {
    assert!(RuntimeVal::Null.equals(&RuntimeVal::Null));
    assert!(!RuntimeVal::Number(1.0).equals(&RuntimeVal::String("1".to_string())));
    assert!(numbers(&[1.0, 2.0]).equals(&numbers(&[1.0, 2.0])));
    assert!(!numbers(&[1.0, 2.0]).equals(&numbers(&[2.0, 1.0])));

    let point = |x: f64| {
        RuntimeVal::Struct(StructVal::new(
            &point_def(),
            vec![("x".to_string(), RuntimeVal::Number(x)), ("y".to_string(), RuntimeVal::Null)],
        ))
    };
    assert!(point(1.0).equals(&point(1.0)));
    assert!(!point(1.0).equals(&point(2.0)));
}

#[test]
fn test_truthiness() {
    assert!(RuntimeVal::Number(2.0).is_truthy());
    assert!(!RuntimeVal::Number(0.0).is_truthy());
    assert!(RuntimeVal::String("a".to_string()).is_truthy());
    assert!(!RuntimeVal::String(String::new()).is_truthy());
    assert!(!RuntimeVal::Null.is_truthy());
    assert!(!numbers(&[1.0]).is_truthy());
}

#[test]
fn test_value_rendering() {
    assert_eq!(RuntimeVal::Number(5.0).to_string(), "5");
    assert_eq!(RuntimeVal::Number(2.5).to_string(), "2.5");
    assert_eq!(numbers(&[1.0, 2.0, 3.0]).to_string(), "[1, 2, 3]");

    let point = RuntimeVal::Struct(StructVal::new(
        &point_def(),
        vec![("x".to_string(), RuntimeVal::Number(1.0)), ("y".to_string(), RuntimeVal::Null)],
    ));
    assert_eq!(point.to_string(), "Point { x: 1, y: null }");
}

#[test]
fn test_string_methods() {
    let text = RuntimeVal::String("héllo world".to_string());

    let length = call_primitive_method(text.clone(), "length", vec![], &position()).unwrap();
    assert!(length.equals(&RuntimeVal::Number(11.0)));

    let joined = call_primitive_method(
        RuntimeVal::String("ab".to_string()),
        "concat",
        vec![RuntimeVal::String("cd".to_string())],
        &position(),
    )
    .unwrap();
    assert_eq!(joined.to_string(), "abcd");

    let words = call_primitive_method(text, "split", vec![RuntimeVal::String(" ".to_string())], &position()).unwrap();
    assert_eq!(words.to_string(), "[héllo, world]");

    let letters = call_primitive_method(
        RuntimeVal::String("abc".to_string()),
        "split",
        vec![RuntimeVal::String(String::new())],
        &position(),
    )
    .unwrap();
    assert_eq!(letters.to_string(), "[a, b, c]");

    let error = call_primitive_method(
        RuntimeVal::String("ab".to_string()),
        "concat",
        vec![RuntimeVal::Number(1.0)],
        &position(),
    )
    .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::TypeError);
}

#[test]
fn test_number_and_bool_methods() {
    let even = call_primitive_method(RuntimeVal::Number(4.0), "isEven", vec![], &position()).unwrap();
    assert!(even.equals(&RuntimeVal::Bool(true)));

    let odd = call_primitive_method(RuntimeVal::Number(4.0), "isOdd", vec![], &position()).unwrap();
    assert!(odd.equals(&RuntimeVal::Bool(false)));

    let text = call_primitive_method(RuntimeVal::Number(42.0), "toString", vec![], &position()).unwrap();
    assert!(text.equals(&RuntimeVal::String("42".to_string())));

    let text = call_primitive_method(RuntimeVal::Bool(false), "toString", vec![], &position()).unwrap();
    assert!(text.equals(&RuntimeVal::String("false".to_string())));
}

#[test]
fn test_array_methods() {
    let appended = call_primitive_method(numbers(&[1.0]), "append", vec![RuntimeVal::Number(2.0)], &position()).unwrap();
    assert!(appended.equals(&numbers(&[1.0, 2.0])));

    let popped = call_primitive_method(numbers(&[1.0, 2.0]), "pop", vec![], &position()).unwrap();
    assert!(popped.equals(&numbers(&[1.0])));

    let error = call_primitive_method(numbers(&[]), "pop", vec![], &position()).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::IndexError);

    let error = call_primitive_method(
        numbers(&[1.0]),
        "append",
        vec![RuntimeVal::String("x".to_string())],
        &position(),
    )
    .unwrap_err();
    assert_eq!(error.get_error_name(), "ElementTypeMatchError");
}

#[test]
fn test_method_errors() {
    let error = call_primitive_method(numbers(&[1.0]), "sort", vec![], &position()).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::MethodError);

    let error = call_primitive_method(RuntimeVal::Null, "length", vec![], &position()).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::MethodError);

    let error = call_primitive_method(numbers(&[1.0]), "length", vec![RuntimeVal::Null], &position()).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::ArityError);
}

#[test]
fn test_format_date() {
    let epoch = Utc.timestamp_millis_opt(0).unwrap();
    assert_eq!(format_date(&epoch), "00:00:00.000 01-01-1970");

    // 2024-02-29 13:45:30.123 UTC
    let leap_day = Utc.timestamp_millis_opt(1_709_214_330_123).unwrap();
    assert_eq!(format_date(&leap_day), "13:45:30.123 29-02-2024");

    // Rendered in the moment's own offset, here crossing midnight
    let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
    assert_eq!(format_date(&leap_day.with_timezone(&tokyo)), "22:45:30.123 29-02-2024");
    let late = Utc.timestamp_millis_opt(1_709_247_600_000).unwrap();
    assert_eq!(format_date(&late.with_timezone(&tokyo)), "08:00:00.000 01-03-2024");
}

#[test]
fn test_struct_value_keeps_its_definition() {
    let def = point_def();
    let point = StructVal::new(&def, vec![]);

    def.borrow_mut().methods.insert(
        "show".to_string(),
        create_global_environment().borrow().lookup_function("show", &position()).unwrap(),
    );

    assert_eq!(point.name, "Point");
    assert!(Rc::ptr_eq(&point.def, &def));
    assert!(point.def.borrow().methods.contains_key("show"));
    assert_eq!(point.def.borrow().property_type("x"), Some(&ValueType::Number));
}

struct ClosedSink;

impl io::Write for ClosedSink {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }
}

#[test]
fn test_closed_output_does_not_stop_the_program() {
    let mut interpreter = Interpreter::new(Rc::new(RefCell::new(ClosedSink)));
    let env = create_global_environment();

    let result = interpreter
        .run_source("show(\"lost\"); let x = 2; x * 3;".to_string(), "test.sp", &env)
        .unwrap();
    assert!(result.equals(&RuntimeVal::Number(6.0)));
}
