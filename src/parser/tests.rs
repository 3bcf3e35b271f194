//! Unit tests for the parser module.
//!
//! This module contains tests for parsing various language constructs including:
//! - Variable declarations
//! - Function and method declarations
//! - Expressions and operator precedence
//! - Control flow statements
//! - Struct definitions and imports

use std::rc::Rc;

use pretty_assertions::assert_eq;

use crate::{
    ast::{ast::{Expr, Stmt}, statements::BlockStmt},
    errors::errors::{Error, ErrorImpl, ErrorKind},
    lexer::{lexer::tokenize, tokens::TokenKind},
};

use super::parser::parse;

fn parse_source(source: &str) -> Result<BlockStmt, Error> {
    let tokens = tokenize(source.to_string(), Some("test.sp".to_string()))?;
    parse(tokens, Rc::new("test.sp".to_string()))
}

fn parse_single(source: &str) -> Stmt {
    let program = parse_source(source).unwrap();
    assert_eq!(program.body.len(), 1);
    program.body.into_iter().next().unwrap()
}

fn parse_expression(source: &str) -> Expr {
    match parse_single(source) {
        Stmt::Expression(stmt) => stmt.expression,
        other => panic!("expected expression statement, got {:?}", other),
    }
}

fn operator_of(expr: &Expr) -> TokenKind {
    match expr {
        Expr::Binary(binary) => binary.operator.kind,
        other => panic!("expected binary expression, got {:?}", other),
    }
}

#[test]
fn test_parse_variable_declaration() {
    match parse_single("let x = 42;") {
        Stmt::VarDecl(decl) => {
            assert_eq!(decl.identifier, "x");
            assert!(!decl.is_constant);
            assert!(decl.explicit_type.is_none());
            assert!(matches!(decl.assigned_value, Some(Expr::Number(ref n)) if n.value == 42.0));
        }
        other => panic!("expected variable declaration, got {:?}", other),
    }
}

#[test]
fn test_parse_const_declaration() {
    match parse_single("const PI: number = 3.14;") {
        Stmt::VarDecl(decl) => {
            assert!(decl.is_constant);
            assert_eq!(decl.explicit_type.unwrap().to_string(), "number");
        }
        other => panic!("expected variable declaration, got {:?}", other),
    }
}

#[test]
fn test_parse_declaration_requires_type_or_value() {
    assert!(parse_source("let x: number;").is_ok());

    let error = parse_source("let x;").unwrap_err();
    assert_eq!(error.kind(), ErrorKind::SyntaxError);

    let error = parse_source("const x: number;").unwrap_err();
    assert_eq!(error.kind(), ErrorKind::SyntaxError);
}

#[test]
fn test_parse_missing_semicolon() {
    let error = parse_source("let x = 1").unwrap_err();
    assert_eq!(error.get_error_name(), "UnexpectedTokenDetailed");
}

#[test]
fn test_parse_precedence() {
    let expr = parse_expression("1 + 2 * 3;");
    assert_eq!(operator_of(&expr), TokenKind::Plus);

    let Expr::Binary(binary) = expr else { unreachable!() };
    assert!(matches!(*binary.left, Expr::Number(_)));
    assert_eq!(operator_of(&binary.right), TokenKind::Star);
}

#[test]
fn test_parse_grouping() {
    let expr = parse_expression("(1 + 2) * 3;");
    assert_eq!(operator_of(&expr), TokenKind::Star);

    let Expr::Binary(binary) = expr else { unreachable!() };
    assert_eq!(operator_of(&binary.left), TokenKind::Plus);
}

#[test]
fn test_parse_logical_below_relational() {
    let expr = parse_expression("a < b && c == d;");
    assert_eq!(operator_of(&expr), TokenKind::And);

    let Expr::Binary(binary) = expr else { unreachable!() };
    assert_eq!(operator_of(&binary.left), TokenKind::Less);
    assert_eq!(operator_of(&binary.right), TokenKind::Equals);
}

#[test]
fn test_parse_left_associative_subtraction() {
    let expr = parse_expression("10 - 4 - 3;");

    let Expr::Binary(binary) = expr else { panic!("expected binary expression") };
    assert_eq!(operator_of(&binary.left), TokenKind::Dash);
    assert!(matches!(*binary.right, Expr::Number(ref n) if n.value == 3.0));
}

#[test]
fn test_parse_prefix_binds_tighter_than_binary() {
    let expr = parse_expression("-x * y;");
    assert_eq!(operator_of(&expr), TokenKind::Star);

    let Expr::Binary(binary) = expr else { unreachable!() };
    assert!(matches!(*binary.left, Expr::Prefix(ref prefix) if prefix.operator.kind == TokenKind::Dash));
}

#[test]
fn test_parse_assignment_is_right_associative() {
    let Expr::Assignment(outer) = parse_expression("a = b = 3;") else {
        panic!("expected assignment");
    };

    assert!(matches!(*outer.assignee, Expr::Symbol(ref s) if s.value == "a"));
    assert!(matches!(*outer.value, Expr::Assignment(ref inner) if matches!(*inner.assignee, Expr::Symbol(ref s) if s.value == "b")));
}

#[test]
fn test_parse_increment_desugars_to_compound_assignment() {
    let Expr::Assignment(assignment) = parse_expression("count++;") else {
        panic!("expected assignment");
    };

    assert_eq!(assignment.operator.kind, TokenKind::PlusEquals);
    assert!(matches!(*assignment.value, Expr::Number(ref n) if n.value == 1.0));

    let Expr::Assignment(assignment) = parse_expression("count--;") else {
        panic!("expected assignment");
    };
    assert_eq!(assignment.operator.kind, TokenKind::MinusEquals);
}

#[test]
fn test_parse_invalid_assignment_target() {
    let error = parse_source("1 = 2;").unwrap_err();
    assert!(matches!(error.get_internal_error(), ErrorImpl::InvalidAssignmentTarget));

    let error = parse_source("items[1:] = 2;").unwrap_err();
    assert!(matches!(error.get_internal_error(), ErrorImpl::InvalidAssignmentTarget));
}

#[test]
fn test_parse_member_assignment_target() {
    let Expr::Assignment(assignment) = parse_expression("points[0].x += 2;") else {
        panic!("expected assignment");
    };

    let Expr::MemberAccess(member) = *assignment.assignee else {
        panic!("expected member access");
    };
    assert_eq!(member.property, "x");
    assert!(matches!(*member.member, Expr::ArrayAccess(_)));
}

#[test]
fn test_parse_function_call() {
    let Expr::Call(call) = parse_expression("add(1, 2 + 3);") else {
        panic!("expected call");
    };

    assert_eq!(call.name, "add");
    assert!(call.receiver.is_none());
    assert_eq!(call.arguments.len(), 2);
}

#[test]
fn test_parse_method_call() {
    let Expr::Call(call) = parse_expression("line.start.move(1);") else {
        panic!("expected call");
    };

    assert_eq!(call.name, "move");
    let receiver = call.receiver.expect("method call has a receiver");
    assert!(matches!(*receiver, Expr::MemberAccess(ref access) if access.property == "start"));
}

#[test]
fn test_parse_invalid_callee() {
    let error = parse_source("make()(2);").unwrap_err();
    assert!(matches!(error.get_internal_error(), ErrorImpl::InvalidCallee));
}

#[test]
fn test_parse_slices() {
    let Expr::ArrayAccess(access) = parse_expression("items[1:];") else {
        panic!("expected array access");
    };
    assert!(access.is_rest);
    assert!(!access.is_prev);

    let Expr::ArrayAccess(access) = parse_expression("items[:2];") else {
        panic!("expected array access");
    };
    assert!(access.is_prev);
    assert!(!access.is_rest);

    let Expr::ArrayAccess(access) = parse_expression("items[i + 1];") else {
        panic!("expected array access");
    };
    assert!(!access.is_prev && !access.is_rest);
    assert_eq!(operator_of(&access.index), TokenKind::Plus);
}

#[test]
fn test_parse_array_instantiation() {
    match parse_single("let grid: [][]number = [][]number{ []number{1}, []number{} };") {
        Stmt::VarDecl(decl) => {
            assert_eq!(decl.explicit_type.unwrap().to_string(), "[][]number");

            let Some(Expr::ArrayInstantiation(array)) = decl.assigned_value else {
                panic!("expected array instantiation");
            };
            assert_eq!(array.underlying.to_string(), "[]number");
            assert_eq!(array.contents.len(), 2);
        }
        other => panic!("expected variable declaration, got {:?}", other),
    }
}

#[test]
fn test_parse_struct_instantiation() {
    let Expr::StructInstantiation(instance) = parse_expression("Point { x: 1, y: 2 + 3 };") else {
        panic!("expected struct instantiation");
    };

    assert_eq!(instance.name, "Point");
    let names: Vec<&str> = instance.properties.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["x", "y"]);
}

#[test]
fn test_parse_struct_declaration() {
    match parse_single("struct Point { x: number; y: number, tags: []string }") {
        Stmt::StructDecl(decl) => {
            assert_eq!(decl.name, "Point");
            let properties: Vec<String> = decl
                .properties
                .iter()
                .map(|(name, ty)| format!("{}: {}", name, ty))
                .collect();
            assert_eq!(properties, vec!["x: number", "y: number", "tags: []string"]);
        }
        other => panic!("expected struct declaration, got {:?}", other),
    }
}

#[test]
fn test_parse_struct_duplicate_property() {
    let error = parse_source("struct Point { x: number; x: number; }").unwrap_err();

    assert_eq!(error.kind(), ErrorKind::SyntaxError);
    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::DuplicateProperty { property, .. } if property == "x"
    ));
}

#[test]
fn test_parse_function_declaration() {
    match parse_single("fn add(a: number, b): number { return a + b; }") {
        Stmt::FnDecl(decl) => {
            assert_eq!(decl.identifier, "add");
            let parameters: Vec<String> = decl
                .parameters
                .iter()
                .map(|parameter| format!("{}: {}", parameter.name, parameter.explicit_type))
                .collect();
            assert_eq!(parameters, vec!["a: number", "b: any"]);
            assert_eq!(decl.return_type.unwrap().to_string(), "number");
            assert!(matches!(decl.body.body[0], Stmt::Return(_)));
        }
        other => panic!("expected function declaration, got {:?}", other),
    }
}

#[test]
fn test_parse_impl_statement() {
    match parse_single("impl Point fn norm() { return self.x; }") {
        Stmt::Impl(implementation) => {
            assert_eq!(implementation.struct_name, "Point");
            assert_eq!(implementation.method.identifier, "norm");
            assert!(implementation.method.parameters.is_empty());
        }
        other => panic!("expected impl statement, got {:?}", other),
    }
}

#[test]
fn test_parse_if_else_chain() {
    let source = "if (x > 0) { show(1); } else if (x < 0) { show(2); } else if (x == 0) { show(3); } else { show(4); }";

    match parse_single(source) {
        Stmt::If(if_stmt) => {
            assert_eq!(operator_of(&if_stmt.condition), TokenKind::Greater);
            assert_eq!(if_stmt.else_ifs.len(), 2);
            assert_eq!(operator_of(&if_stmt.else_ifs[1].0), TokenKind::Equals);
            assert!(if_stmt.else_body.is_some());
        }
        other => panic!("expected if statement, got {:?}", other),
    }
}

#[test]
fn test_parse_while_loop() {
    match parse_single("while (x < 10) { x = x + 1; if (x == 5) { break; } }") {
        Stmt::While(while_stmt) => {
            assert_eq!(while_stmt.body.body.len(), 2);
        }
        other => panic!("expected while statement, got {:?}", other),
    }
}

#[test]
fn test_parse_for_loop() {
    match parse_single("for (let i = 0; i < 3; i++) { show(i); }") {
        Stmt::For(for_stmt) => {
            assert!(matches!(for_stmt.initializer.as_deref(), Some(Stmt::VarDecl(_))));
            assert!(for_stmt.condition.is_some());
            assert!(matches!(for_stmt.post.as_deref(), Some(Stmt::Expression(_))));
        }
        other => panic!("expected for statement, got {:?}", other),
    }
}

#[test]
fn test_parse_for_loop_without_clauses() {
    match parse_single("for (;;) { break; }") {
        Stmt::For(for_stmt) => {
            assert!(for_stmt.initializer.is_none());
            assert!(for_stmt.condition.is_none());
            assert!(for_stmt.post.is_none());
        }
        other => panic!("expected for statement, got {:?}", other),
    }
}

#[test]
fn test_parse_foreach_loop() {
    match parse_single("foreach (item in range(3)) { show(item); }") {
        Stmt::Foreach(foreach) => {
            assert_eq!(foreach.iterator, "item");
            assert!(matches!(foreach.collection, Expr::Call(_)));
        }
        other => panic!("expected foreach statement, got {:?}", other),
    }
}

#[test]
fn test_parse_import_forms() {
    let program = parse_source(
        "import helper from \"mod.sp\"; import { a, b } from \"lib.sp\"; import {} from \"all.sp\";",
    )
    .unwrap();

    let imports: Vec<(Vec<String>, String)> = program
        .body
        .into_iter()
        .map(|stmt| match stmt {
            Stmt::Import(import) => (import.names, import.from),
            other => panic!("expected import, got {:?}", other),
        })
        .collect();

    assert_eq!(
        imports,
        vec![
            (vec!["helper".to_string()], "mod.sp".to_string()),
            (vec!["a".to_string(), "b".to_string()], "lib.sp".to_string()),
            (vec![], "all.sp".to_string()),
        ]
    );
}

#[test]
fn test_parse_return_without_value() {
    match parse_single("fn stop() { return; }") {
        Stmt::FnDecl(decl) => {
            assert!(matches!(decl.body.body[0], Stmt::Return(ref ret) if ret.value.is_none()));
        }
        other => panic!("expected function declaration, got {:?}", other),
    }
}

#[test]
fn test_parse_nested_block() {
    match parse_single("{ let x = 1; { show(x); } }") {
        Stmt::Block(block) => {
            assert_eq!(block.body.len(), 2);
            assert!(matches!(block.body[1], Stmt::Block(_)));
        }
        other => panic!("expected block, got {:?}", other),
    }
}

#[test]
fn test_parse_unexpected_token() {
    let error = parse_source("let x = 5 5;").unwrap_err();
    assert_eq!(error.kind(), ErrorKind::SyntaxError);
    assert_eq!(error.get_position().0, 10);
}

#[test]
fn test_parse_empty_program() {
    let program = parse_source("// nothing here\n").unwrap();
    assert!(program.body.is_empty());
}
