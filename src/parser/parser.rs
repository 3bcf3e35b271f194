//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct and the parsing entry point.
//! The parser uses a Pratt parser approach with NUD/LED handlers for
//! expression parsing and keyword-dispatched functions for statements.
//!
//! It maintains lookup tables for:
//! - Statement handlers
//! - NUD (null denotation) handlers for prefix expressions
//! - LED (left denotation) handlers for infix expressions
//! - Binding powers for operator precedence
//! - Type parsing handlers

use std::{collections::HashMap, rc::Rc};

use tracing::debug;

use crate::{
    ast::statements::BlockStmt,
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    Position, Span,
};

use super::{
    lookups::{
        create_token_lookups, BPLookup, BindingPower, LEDHandler, LEDLookup, NUDHandler, NUDLookup,
        StmtHandler, StmtLookup,
    },
    stmt::parse_stmt,
    types::{create_token_type_lookups, TypeNUDHandler, TypeNUDLookup},
};

/// The main parser structure that maintains parsing state.
///
/// This struct holds the token stream and the lookup tables for parsing
/// statements, expressions, and types. It tracks the current position in
/// the token stream and provides methods for token consumption.
pub struct Parser {
    /// The list of tokens to parse, always terminated by `EOF`
    tokens: Vec<Token>,
    /// Current position in the token stream
    pos: usize,
    /// The name of the source file being parsed
    file: Rc<String>,
    /// Lookup table for statement parsing handlers
    stmt_lookup: StmtLookup,
    /// Lookup table for null denotation (prefix) expression handlers
    nud_lookup: NUDLookup,
    /// Lookup table for left denotation (infix) expression handlers
    led_lookup: LEDLookup,
    /// Lookup table for expression binding powers (precedence)
    binding_power_lookup: BPLookup,
    /// Lookup table for type null denotation handlers
    type_nud_lookup: TypeNUDLookup,
}

impl Parser {
    /// Creates a new Parser instance.
    ///
    /// # Arguments
    ///
    /// * `tokens` - Vector of tokens to parse
    /// * `file` - Reference-counted string containing the source file name
    ///
    /// # Returns
    ///
    /// A new Parser instance with empty lookup tables.
    pub fn new(mut tokens: Vec<Token>, file: Rc<String>) -> Self {
        if tokens.last().map(|token| token.kind) != Some(TokenKind::EOF) {
            let end = tokens
                .last()
                .map(|token| token.span.end.clone())
                .unwrap_or_else(|| Position(0, Rc::clone(&file)));

            tokens.push(Token {
                kind: TokenKind::EOF,
                value: String::from("EOF"),
                span: Span { start: end.clone(), end },
            });
        }

        Parser {
            tokens,
            pos: 0,
            file,
            stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
            type_nud_lookup: HashMap::new(),
        }
    }

    /// Returns the current token without advancing.
    ///
    /// Once the stream is exhausted this keeps returning the `EOF` token.
    pub fn current_token(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Advances to the next token and returns the previous token.
    pub fn advance(&mut self) -> &Token {
        let index = self.pos.min(self.tokens.len() - 1);
        self.pos += 1;
        &self.tokens[index]
    }

    /// Expects a token of the specified kind, with optional custom error.
    ///
    /// # Arguments
    ///
    /// * `expected_kind` - The expected TokenKind
    /// * `error` - Optional custom error to return if expectation fails
    ///
    /// # Returns
    ///
    /// Returns Ok(Token) if the current token matches, otherwise returns an Error.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: Option<Error>,
    ) -> Result<Token, Error> {
        let token = self.current_token();
        if token.kind != expected_kind {
            match error {
                Some(error) => Err(error),
                None => Err(Error::new(
                    ErrorImpl::UnexpectedTokenDetailed {
                        token: token.value.clone(),
                        message: format!("expected {}", expected_kind),
                    },
                    token.span.start.clone(),
                )),
            }
        } else {
            Ok(self.advance().clone())
        }
    }

    /// Expects a token of the specified kind with default error message.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        self.expect_error(expected_kind, None)
    }

    /// Checks if there are more tokens to parse.
    ///
    /// # Returns
    ///
    /// Returns true while the current token is not EOF.
    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    /// Builds an `UnexpectedToken` error for the current token.
    pub fn unexpected(&self) -> Error {
        Error::new(
            ErrorImpl::UnexpectedToken {
                token: self.current_token().value.clone(),
            },
            self.get_position(),
        )
    }

    /// Builds an `UnexpectedTokenDetailed` error for the current token.
    pub fn unexpected_detailed(&self, message: &str) -> Error {
        Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: self.current_token().value.clone(),
                message: String::from(message),
            },
            self.get_position(),
        )
    }

    /// Returns a reference to the statement lookup table.
    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    /// Returns a reference to the NUD (null denotation) lookup table.
    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    /// Returns a reference to the LED (left denotation) lookup table.
    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }

    /// Returns a reference to the type NUD lookup table.
    pub fn get_type_nud_lookup(&self) -> &TypeNUDLookup {
        &self.type_nud_lookup
    }

    /// Binding power of the current token, `Default` when it has none.
    pub fn current_binding_power(&self) -> BindingPower {
        self.binding_power_lookup
            .get(&self.current_token_kind())
            .copied()
            .unwrap_or(BindingPower::Default)
    }

    /// Registers a left denotation (infix) handler for a token.
    ///
    /// # Arguments
    ///
    /// * `kind` - The token kind to register
    /// * `binding_power` - The precedence/binding power for this operator
    /// * `led_fn` - The handler function for this infix operator
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler for a token.
    ///
    /// A token that also has a LED keeps the LED's binding power.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.binding_power_lookup
            .entry(kind)
            .or_insert(BindingPower::Primary);
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a statement handler for a token.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.binding_power_lookup
            .entry(kind)
            .or_insert(BindingPower::Default);
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    /// Registers a type null denotation handler.
    pub fn type_nud(&mut self, kind: TokenKind, nud_fn: TypeNUDHandler) {
        self.type_nud_lookup.insert(kind, nud_fn);
    }

    /// Returns the source position of the current token.
    pub fn get_position(&self) -> Position {
        self.current_token().span.start.clone()
    }

    /// Returns the end position of the most recently consumed token.
    pub fn get_previous_end(&self) -> Position {
        match self.pos.checked_sub(1) {
            Some(index) => self.tokens[index.min(self.tokens.len() - 1)].span.end.clone(),
            None => Position(0, Rc::clone(&self.file)),
        }
    }
}

/// Parses a stream of tokens into an Abstract Syntax Tree.
///
/// This is the main entry point for parsing. It creates a parser instance,
/// initializes all lookup tables, and parses statements until EOF. The
/// first syntax error aborts parsing.
///
/// # Arguments
///
/// * `tokens` - Vector of tokens to parse
/// * `file` - Reference-counted string containing the source file name
///
/// # Returns
///
/// The program as a root `BlockStmt`, or the first syntax error.
pub fn parse(tokens: Vec<Token>, file: Rc<String>) -> Result<BlockStmt, Error> {
    let mut parser = Parser::new(tokens, Rc::clone(&file));
    create_token_lookups(&mut parser);
    create_token_type_lookups(&mut parser);

    let mut body = vec![];

    while parser.has_tokens() {
        body.push(parse_stmt(&mut parser)?);
    }

    debug!(file = %file, statements = body.len(), "parsed program");

    Ok(BlockStmt {
        body,
        span: Span {
            start: Position(0, Rc::clone(&file)),
            end: parser.get_position(),
        },
    })
}
