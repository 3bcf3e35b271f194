//! Type parsing implementation.
//!
//! This module handles parsing of type annotations. It supports:
//!
//! - Named types (`number`, `string`, struct names, ...)
//! - Array types written prefix-style (`[]number`, `[][]Point`)
//!
//! Like expression parsing, types are dispatched through a NUD table
//! keyed by the current token kind.

use std::collections::HashMap;

use crate::{
    ast::{
        ast::Type,
        types::{ArrayType, SymbolType},
    },
    errors::errors::Error,
    lexer::tokens::TokenKind,
};

use super::parser::Parser;

/// Type alias for type null denotation handler functions.
pub type TypeNUDHandler = fn(&mut Parser) -> Result<Type, Error>;

/// Type alias for type NUD lookup table.
pub type TypeNUDLookup = HashMap<TokenKind, TypeNUDHandler>;

/// Initializes the type parsing lookup tables.
///
/// # Arguments
///
/// * `parser` - Mutable reference to the parser to initialize
pub fn create_token_type_lookups(parser: &mut Parser) {
    parser.type_nud(TokenKind::Identifier, parse_symbol_type);
    parser.type_nud(TokenKind::OpenBracket, parse_array_type);
}

pub fn parse_symbol_type(parser: &mut Parser) -> Result<Type, Error> {
    let token = parser.expect(TokenKind::Identifier)?;
    Ok(Type::from(SymbolType {
        name: token.value,
        position: token.span.start,
    }))
}

/// Parses `[]T`, recursing for the element type.
pub fn parse_array_type(parser: &mut Parser) -> Result<Type, Error> {
    parser.expect(TokenKind::OpenBracket)?;
    parser.expect(TokenKind::CloseBracket)?;

    let underlying = parse_type(parser)?;

    Ok(Type::from(ArrayType {
        underlying: Box::new(underlying),
    }))
}

/// Parses a type annotation starting at the current token.
///
/// # Returns
///
/// The parsed type, or an `UnexpectedToken` error when the current token
/// cannot start a type.
pub fn parse_type(parser: &mut Parser) -> Result<Type, Error> {
    let token_kind = parser.current_token_kind();
    let nud = match parser.get_type_nud_lookup().get(&token_kind) {
        Some(nud) => *nud,
        None => return Err(parser.unexpected_detailed("expected a type")),
    };

    nud(parser)
}
