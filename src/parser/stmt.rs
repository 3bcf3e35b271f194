use crate::{ast::{ast::{Expr, Stmt, Type}, statements::{BlockStmt, BreakStmt, ExpressionStmt, FnDeclStmt, ForStmt, ForeachStmt, IfStmt, ImplStmt, ImportStmt, Parameter, ReturnStmt, StructDeclStmt, VarDeclStmt, WhileStmt}, types::SymbolType}, errors::errors::{Error, ErrorImpl}, lexer::tokens::TokenKind, parser::{expr::parse_expr, lookups::BindingPower}, Span};

use super::{parser::Parser, types::parse_type};

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    if let Some(handler) = parser.get_stmt_lookup().get(&parser.current_token_kind()).copied() {
        return handler(parser);
    }

    let expr = parse_expr(parser, BindingPower::Default)?;

    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::from(ExpressionStmt {
        span: expr.get_span().clone(),
        expression: expr,
    }))
}

pub fn parse_var_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start_token = parser.advance().clone();
    let is_constant = start_token.kind == TokenKind::Const;

    let error = parser.unexpected_detailed("expected identifier during variable declaration");
    let variable_name = parser.expect_error(TokenKind::Identifier, Some(error))?.value;

    let explicit_type = if parser.current_token_kind() == TokenKind::Colon {
        parser.advance();
        Some(parse_type(parser)?)
    } else {
        None
    };

    let assigned_value = if parser.current_token_kind() != TokenKind::Semicolon {
        parser.expect(TokenKind::Assignment)?;
        Some(parse_expr(parser, BindingPower::Assignment)?)
    } else if explicit_type.is_none() {
        return Err(parser.unexpected_detailed("expected rhs or explicit type"));
    } else {
        None
    };

    if is_constant && assigned_value.is_none() {
        return Err(parser.unexpected_detailed("expected rhs in constant definition"));
    }

    let end = parser.expect(TokenKind::Semicolon)?.span.end;

    Ok(Stmt::from(VarDeclStmt {
        span: Span {
            start: start_token.span.start,
            end
        },
        is_constant,
        identifier: variable_name,
        assigned_value,
        explicit_type
    }))
}

pub fn parse_import_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    // import helper from "mod.sp";
    // import { a, b } from "mod.sp";
    let start = parser.advance().span.start.clone();

    let mut names = vec![];
    if parser.current_token_kind() == TokenKind::OpenCurly {
        parser.advance();

        while parser.current_token_kind() != TokenKind::CloseCurly && parser.has_tokens() {
            names.push(parser.expect(TokenKind::Identifier)?.value);

            if parser.current_token_kind() != TokenKind::CloseCurly {
                parser.expect(TokenKind::Comma)?;
            }
        }

        parser.expect(TokenKind::CloseCurly)?;
    } else {
        names.push(parser.expect(TokenKind::Identifier)?.value);
    }

    parser.expect(TokenKind::From)?;
    let error = parser.unexpected_detailed("expected module path string");
    let from = parser.expect_error(TokenKind::String, Some(error))?.value;

    let end = parser.expect(TokenKind::Semicolon)?.span.end;

    Ok(Stmt::from(ImportStmt {
        names,
        from,
        span: Span {
            start,
            end
        }
    }))
}

fn parse_condition(parser: &mut Parser) -> Result<Expr, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(condition)
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let condition = parse_condition(parser)?;
    let then_body = parse_block(parser)?;

    let mut else_ifs = vec![];
    let mut else_body = None;

    while parser.current_token_kind() == TokenKind::Else {
        parser.advance();

        if parser.current_token_kind() == TokenKind::If {
            parser.advance();
            let condition = parse_condition(parser)?;
            else_ifs.push((condition, parse_block(parser)?));
        } else {
            else_body = Some(parse_block(parser)?);
            break;
        }
    }

    Ok(Stmt::from(IfStmt {
        condition,
        then_body,
        else_ifs,
        else_body,
        span: Span {
            start,
            end: parser.get_previous_end()
        }
    }))
}

/// Parses `{ ... }` into a block.
pub fn parse_block(parser: &mut Parser) -> Result<BlockStmt, Error> {
    let start = parser.expect(TokenKind::OpenCurly)?.span.start;

    let mut statements = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseCurly && parser.has_tokens() {
        statements.push(parse_stmt(parser)?);
    }

    let end = parser.expect(TokenKind::CloseCurly)?.span.end;

    Ok(BlockStmt {
        body: statements,
        span: Span {
            start,
            end
        }
    })
}

pub fn parse_block_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    Ok(Stmt::from(parse_block(parser)?))
}

fn parse_fn_decl(parser: &mut Parser) -> Result<FnDeclStmt, Error> {
    let start = parser.expect(TokenKind::Fn)?.span.start;

    let identifier = parser.expect(TokenKind::Identifier)?.value;

    parser.expect(TokenKind::OpenParen)?;

    let mut parameters = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseParen && parser.has_tokens() {
        let name = parser.expect(TokenKind::Identifier)?;

        let explicit_type = if parser.current_token_kind() == TokenKind::Colon {
            parser.advance();
            parse_type(parser)?
        } else {
            Type::from(SymbolType { name: String::from("any"), position: name.span.start.clone() })
        };

        parameters.push(Parameter { name: name.value, explicit_type });

        if parser.current_token_kind() != TokenKind::CloseParen {
            parser.expect(TokenKind::Comma)?;
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    let return_type = if parser.current_token_kind() == TokenKind::Colon {
        parser.advance();
        Some(parse_type(parser)?)
    } else {
        None
    };

    let body = parse_block(parser)?;

    Ok(FnDeclStmt {
        span: Span {
            start,
            end: body.span.end.clone()
        },
        identifier,
        parameters,
        return_type,
        body
    })
}

pub fn parse_fn_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    Ok(Stmt::from(parse_fn_decl(parser)?))
}

pub fn parse_impl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    // impl Point fn length() { ... }
    let start = parser.advance().span.start.clone();

    let struct_name = parser.expect(TokenKind::Identifier)?.value;

    let error = parser.unexpected_detailed("expected method declaration after impl");
    if parser.current_token_kind() != TokenKind::Fn {
        return Err(error);
    }

    let method = parse_fn_decl(parser)?;

    Ok(Stmt::from(ImplStmt {
        struct_name,
        span: Span {
            start,
            end: method.span.end.clone()
        },
        method
    }))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let value = if parser.current_token_kind() != TokenKind::Semicolon {
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };

    let end = parser.expect(TokenKind::Semicolon)?.span.end;

    Ok(Stmt::from(ReturnStmt {
        value,
        span: Span {
            start,
            end
        }
    }))
}

pub fn parse_break_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();
    let end = parser.expect(TokenKind::Semicolon)?.span.end;

    Ok(Stmt::from(BreakStmt {
        span: Span {
            start,
            end
        }
    }))
}

pub fn parse_struct_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    // struct Point { x: number; y: number; }
    let start = parser.advance().span.start.clone();

    let identifier = parser.expect(TokenKind::Identifier)?.value;

    parser.expect(TokenKind::OpenCurly)?;

    let mut properties: Vec<(String, Type)> = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseCurly && parser.has_tokens() {
        if parser.current_token_kind() == TokenKind::Fn {
            return Err(parser.unexpected_detailed("methods are attached with `impl`"));
        }

        let name = parser.expect(TokenKind::Identifier)?;
        if properties.iter().any(|(existing, _)| *existing == name.value) {
            return Err(Error::new(ErrorImpl::DuplicateProperty { structure: identifier, property: name.value }, name.span.start));
        }

        parser.expect(TokenKind::Colon)?;
        let ty = parse_type(parser)?;
        properties.push((name.value, ty));

        match parser.current_token_kind() {
            TokenKind::Semicolon | TokenKind::Comma => { parser.advance(); },
            TokenKind::CloseCurly => {},
            _ => return Err(parser.unexpected_detailed("expected `;` after struct property")),
        }
    }

    let end = parser.expect(TokenKind::CloseCurly)?.span.end;

    Ok(Stmt::from(StructDeclStmt {
        name: identifier,
        properties,
        span: Span {
            start,
            end
        }
    }))
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let condition = parse_condition(parser)?;
    let body = parse_block(parser)?;

    Ok(Stmt::from(WhileStmt {
        span: Span {
            start,
            end: body.span.end.clone()
        },
        condition,
        body
    }))
}

pub fn parse_foreach_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    // foreach (item in items) { ... }
    let start = parser.advance().span.start.clone();

    parser.expect(TokenKind::OpenParen)?;
    let iterator = parser.expect(TokenKind::Identifier)?.value;
    parser.expect(TokenKind::In)?;
    let collection = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    let body = parse_block(parser)?;

    Ok(Stmt::from(ForeachStmt {
        span: Span {
            start,
            end: body.span.end.clone()
        },
        iterator,
        collection,
        body
    }))
}

pub fn parse_for_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    // for (let i = 0; i < 10; i++) { ... }
    let start = parser.advance().span.start.clone();

    parser.expect(TokenKind::OpenParen)?;

    // The initializer is a full statement and consumes its own `;`
    let initializer = if parser.current_token_kind() == TokenKind::Semicolon {
        parser.advance();
        None
    } else {
        Some(Box::new(parse_stmt(parser)?))
    };

    let condition = if parser.current_token_kind() == TokenKind::Semicolon {
        None
    } else {
        Some(parse_expr(parser, BindingPower::Default)?)
    };
    parser.expect(TokenKind::Semicolon)?;

    let post = if parser.current_token_kind() == TokenKind::CloseParen {
        None
    } else {
        let expression = parse_expr(parser, BindingPower::Default)?;
        Some(Box::new(Stmt::from(ExpressionStmt {
            span: expression.get_span().clone(),
            expression
        })))
    };
    parser.expect(TokenKind::CloseParen)?;

    let body = parse_block(parser)?;

    Ok(Stmt::from(ForStmt {
        span: Span {
            start,
            end: body.span.end.clone()
        },
        initializer,
        condition,
        post,
        body
    }))
}
