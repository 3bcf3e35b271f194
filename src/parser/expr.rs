use crate::{ast::{ast::Expr, expressions::{ArrayAccessExpr, ArrayInstantiationExpr, AssignmentExpr, BinaryExpr, CallExpr, MemberAccessExpr, NumberExpr, PrefixExpr, StringExpr, StructInstantiationExpr, SymbolExpr}}, errors::errors::{Error, ErrorImpl}, lexer::tokens::{Token, TokenKind}, Span};

use super::{lookups::BindingPower, parser::Parser, types::parse_type};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let nud = match parser.get_nud_lookup().get(&token_kind) {
        Some(nud) => *nud,
        None => return Err(parser.unexpected()),
    };

    let mut left = nud(parser)?;

    // While LED and current BP is less than BP of current token, continue parsing lhs
    while parser.current_binding_power() > bp {
        let token_kind = parser.current_token_kind();
        let led = match parser.get_led_lookup().get(&token_kind) {
            Some(led) => *led,
            None => return Err(parser.unexpected()),
        };

        let current_bp = parser.current_binding_power();
        left = led(parser, left, current_bp)?;
    }

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    match parser.current_token_kind() {
        TokenKind::Number => {
            let value = parser.current_token().value.parse().map_err(|_| Error::new(ErrorImpl::NumberParseError { token: parser.current_token().value.clone() }, parser.get_position()))?;
            Ok(Expr::from(NumberExpr { value, span: parser.advance().span.clone() }))
        },
        TokenKind::Identifier => {
            Ok(Expr::from(SymbolExpr { value: parser.current_token().value.clone(), span: parser.advance().span.clone() }))
        },
        TokenKind::String => {
            Ok(Expr::from(StringExpr { value: parser.current_token().value.clone(), span: parser.advance().span.clone() }))
        }
        _ => Err(parser.unexpected())
    }
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();

    let right = parse_expr(parser, bp)?;

    Ok(Expr::from(BinaryExpr {
        span: Span {
            start: left.get_span().start.clone(),
            end: right.get_span().end.clone()
        },
        left: Box::new(left),
        operator: operator_token,
        right: Box::new(right),
    }))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let rhs = parse_expr(parser, BindingPower::Unary)?;

    Ok(Expr::from(PrefixExpr {
        span: Span {
            start: operator_token.span.start.clone(),
            end: rhs.get_span().end.clone()
        },
        operator: operator_token,
        right_expr: Box::new(rhs)
    }))
}

fn check_assignment_target(left: &Expr) -> Result<(), Error> {
    match left {
        Expr::Symbol(_) | Expr::MemberAccess(_) => Ok(()),
        Expr::ArrayAccess(access) if !access.is_prev && !access.is_rest => Ok(()),
        _ => Err(Error::new(ErrorImpl::InvalidAssignmentTarget, left.get_span().start.clone()))
    }
}

pub fn parse_assignment_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    check_assignment_target(&left)?;

    let operator_token = parser.advance().clone();
    // Recursing below our own power keeps `a = b = c` right associative
    let rhs = parse_expr(parser, BindingPower::Default)?;

    Ok(Expr::from(AssignmentExpr {
        span: Span {
            start: left.get_span().start.clone(),
            end: rhs.get_span().end.clone()
        },
        operator: operator_token,
        value: Box::new(rhs),
        assignee: Box::new(left)
    }))
}

/// `x++` and `x--` become `x += 1` and `x -= 1`.
pub fn parse_increment_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    check_assignment_target(&left)?;

    let token = parser.advance().clone();
    let (kind, value) = if token.kind == TokenKind::PlusPlus {
        (TokenKind::PlusEquals, "+=")
    } else {
        (TokenKind::MinusEquals, "-=")
    };

    Ok(Expr::from(AssignmentExpr {
        span: Span {
            start: left.get_span().start.clone(),
            end: token.span.end.clone()
        },
        operator: Token { kind, value: String::from(value), span: token.span.clone() },
        value: Box::new(Expr::from(NumberExpr { value: 1.0, span: token.span })),
        assignee: Box::new(left)
    }))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.advance();
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

fn parse_arguments(parser: &mut Parser, closing: TokenKind) -> Result<Vec<Expr>, Error> {
    let mut args = vec![];

    while parser.current_token_kind() != closing && parser.has_tokens() {
        args.push(parse_expr(parser, BindingPower::Assignment)?);

        if parser.current_token_kind() != closing {
            parser.expect(TokenKind::Comma)?;
        }
    }

    parser.expect(closing)?;
    Ok(args)
}

pub fn parse_call_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.advance();
    let arguments = parse_arguments(parser, TokenKind::CloseParen)?;

    let span = Span {
        start: left.get_span().start.clone(),
        end: parser.get_previous_end()
    };

    match left {
        Expr::Symbol(symbol) => Ok(Expr::from(CallExpr {
            name: symbol.value,
            arguments,
            receiver: None,
            span
        })),
        Expr::MemberAccess(access) => Ok(Expr::from(CallExpr {
            name: access.property,
            arguments,
            receiver: Some(access.member),
            span
        })),
        _ => Err(Error::new(ErrorImpl::InvalidCallee, span.start))
    }
}

pub fn parse_member_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.advance();
    let error = parser.unexpected_detailed("expected member name after `.`");
    let property = parser.expect_error(TokenKind::Identifier, Some(error))?;

    Ok(Expr::from(MemberAccessExpr {
        span: Span {
            start: left.get_span().start.clone(),
            end: property.span.end.clone()
        },
        member: Box::new(left),
        property: property.value,
    }))
}

pub fn parse_array_access_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.advance();

    let is_prev = parser.current_token_kind() == TokenKind::Colon;
    if is_prev {
        parser.advance();
    }

    let index = parse_expr(parser, BindingPower::Default)?;

    let is_rest = !is_prev && parser.current_token_kind() == TokenKind::Colon;
    if is_rest {
        parser.advance();
    }

    let end = parser.expect(TokenKind::CloseBracket)?.span.end;

    Ok(Expr::from(ArrayAccessExpr {
        span: Span {
            start: left.get_span().start.clone(),
            end
        },
        array: Box::new(left),
        index: Box::new(index),
        is_prev,
        is_rest,
    }))
}

pub fn parse_struct_instantiation_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    // Point { x: 1, y: 2 }
    let name = match left {
        Expr::Symbol(symbol) => symbol,
        _ => return Err(parser.unexpected_detailed("struct instantiation requires a struct name"))
    };

    parser.expect(TokenKind::OpenCurly)?;

    let mut properties = vec![];

    while parser.current_token_kind() != TokenKind::CloseCurly && parser.has_tokens() {
        let property_name = parser.expect(TokenKind::Identifier)?.value;
        parser.expect(TokenKind::Colon)?;
        let property_value = parse_expr(parser, BindingPower::Assignment)?;

        properties.push((property_name, property_value));

        if parser.current_token_kind() != TokenKind::CloseCurly {
            parser.expect(TokenKind::Comma)?;
        }
    }

    let end = parser.expect(TokenKind::CloseCurly)?.span.end;

    Ok(Expr::from(StructInstantiationExpr {
        name: name.value,
        properties,
        span: Span {
            start: name.span.start,
            end
        }
    }))
}

pub fn parse_array_instantiation_expr(parser: &mut Parser) -> Result<Expr, Error> {
    // []number { 1, 2, 3 }
    let start = parser.get_position();

    parser.expect(TokenKind::OpenBracket)?;
    parser.expect(TokenKind::CloseBracket)?;
    let underlying = parse_type(parser)?;

    parser.expect(TokenKind::OpenCurly)?;
    let contents = parse_arguments(parser, TokenKind::CloseCurly)?;

    Ok(Expr::from(ArrayInstantiationExpr {
        underlying,
        contents,
        span: Span {
            start,
            end: parser.get_previous_end()
        }
    }))
}
