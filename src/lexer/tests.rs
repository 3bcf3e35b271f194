//! Unit tests for the lexer module.
//!
//! Covers keywords and identifiers, numeric and string literals,
//! operators and punctuation, comments, spans and error cases.

use pretty_assertions::assert_eq;

use super::{lexer::tokenize, tokens::{Token, TokenKind}};

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source.to_string(), Some("test.sp".to_string()))
        .unwrap()
        .iter()
        .map(|token| token.kind)
        .collect()
}

fn lex(source: &str) -> Vec<Token> {
    tokenize(source.to_string(), Some("test.sp".to_string())).unwrap()
}

#[test]
fn test_tokenize_keywords() {
    assert_eq!(
        kinds("let const fn if else while for foreach in return break import from struct impl"),
        vec![
            TokenKind::Let,
            TokenKind::Const,
            TokenKind::Fn,
            TokenKind::If,
            TokenKind::Else,
            TokenKind::While,
            TokenKind::For,
            TokenKind::Foreach,
            TokenKind::In,
            TokenKind::Return,
            TokenKind::Break,
            TokenKind::Import,
            TokenKind::From,
            TokenKind::Struct,
            TokenKind::Impl,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_identifiers() {
    let tokens = lex("foo baz_123 _underscore CamelCase true");

    let values: Vec<&str> = tokens.iter().map(|token| token.value.as_str()).collect();
    assert_eq!(values, vec!["foo", "baz_123", "_underscore", "CamelCase", "true", "EOF"]);
    assert!(tokens[..5].iter().all(|token| token.kind == TokenKind::Identifier));
}

#[test]
fn test_tokenize_numbers() {
    let tokens = lex("42 3.14 0 100.5");

    assert_eq!(tokens[0].kind, TokenKind::Number);
    assert_eq!(tokens[0].value, "42");
    assert_eq!(tokens[1].value, "3.14");
    assert_eq!(tokens[2].value, "0");
    assert_eq!(tokens[3].value, "100.5");
    assert_eq!(tokens[4].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_number_method_call() {
    assert_eq!(
        kinds("5.toString()"),
        vec![
            TokenKind::Number,
            TokenKind::Dot,
            TokenKind::Identifier,
            TokenKind::OpenParen,
            TokenKind::CloseParen,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_strings() {
    let tokens = lex(r#""hello" "multiple words" """#);

    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].value, "hello");
    assert_eq!(tokens[1].value, "multiple words");
    assert_eq!(tokens[2].kind, TokenKind::String);
    assert_eq!(tokens[2].value, "");
    assert_eq!(tokens[3].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_string_escapes() {
    let tokens = lex(r#""hello\nworld" "tab\there" "backslash\\" "hex\x41" "quote\"test""#);

    assert_eq!(tokens[0].value, "hello\nworld");
    assert_eq!(tokens[1].value, "tab\there");
    assert_eq!(tokens[2].value, "backslash\\");
    assert_eq!(tokens[3].value, "hexA");
    assert_eq!(tokens[4].value, "quote\"test");
    assert_eq!(tokens[5].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_operators() {
    assert_eq!(
        kinds("+ - * / % == != < > <= >= = && || !"),
        vec![
            TokenKind::Plus,
            TokenKind::Dash,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Percent,
            TokenKind::Equals,
            TokenKind::NotEquals,
            TokenKind::Less,
            TokenKind::Greater,
            TokenKind::LessEquals,
            TokenKind::GreaterEquals,
            TokenKind::Assignment,
            TokenKind::And,
            TokenKind::Or,
            TokenKind::Not,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_compound_operators() {
    assert_eq!(
        kinds("++ -- += -= *= /="),
        vec![
            TokenKind::PlusPlus,
            TokenKind::MinusMinus,
            TokenKind::PlusEquals,
            TokenKind::MinusEquals,
            TokenKind::StarEquals,
            TokenKind::SlashEquals,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_punctuation() {
    assert_eq!(
        kinds("( ) { } [ ] . , ; :"),
        vec![
            TokenKind::OpenParen,
            TokenKind::CloseParen,
            TokenKind::OpenCurly,
            TokenKind::CloseCurly,
            TokenKind::OpenBracket,
            TokenKind::CloseBracket,
            TokenKind::Dot,
            TokenKind::Comma,
            TokenKind::Semicolon,
            TokenKind::Colon,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_slices() {
    assert_eq!(
        kinds("arr[:2] arr[1:]"),
        vec![
            TokenKind::Identifier,
            TokenKind::OpenBracket,
            TokenKind::Colon,
            TokenKind::Number,
            TokenKind::CloseBracket,
            TokenKind::Identifier,
            TokenKind::OpenBracket,
            TokenKind::Number,
            TokenKind::Colon,
            TokenKind::CloseBracket,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_comments() {
    let tokens = lex("let x = 5; // this is a comment\nlet y = 10;");

    let values: Vec<&str> = tokens.iter().map(|token| token.value.as_str()).collect();
    assert_eq!(values, vec!["let", "x", "=", "5", ";", "let", "y", "=", "10", ";", "EOF"]);
}

#[test]
fn test_tokenize_spans() {
    let tokens = lex("let  value = \"ab\";");

    assert_eq!(tokens[0].span.start.0, 0);
    assert_eq!(tokens[0].span.end.0, 3);
    assert_eq!(tokens[1].span.start.0, 5);
    assert_eq!(tokens[1].span.end.0, 10);
    // String spans include the quotes
    assert_eq!(tokens[3].span.start.0, 13);
    assert_eq!(tokens[3].span.end.0, 17);
    assert_eq!(tokens[1].span.start.1.as_str(), "test.sp");
}

#[test]
fn test_tokenize_array_type() {
    assert_eq!(
        kinds("[][]number{}"),
        vec![
            TokenKind::OpenBracket,
            TokenKind::CloseBracket,
            TokenKind::OpenBracket,
            TokenKind::CloseBracket,
            TokenKind::Identifier,
            TokenKind::OpenCurly,
            TokenKind::CloseCurly,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_unrecognized_token() {
    let result = tokenize("let x = @;".to_string(), Some("test.sp".to_string()));

    let error = result.unwrap_err();
    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.get_position().0, 8);
}

#[test]
fn test_tokenize_unterminated_string() {
    let result = tokenize("\"never closed".to_string(), None);

    assert!(result.is_err());
}

#[test]
fn test_tokenize_empty_source() {
    assert_eq!(kinds("   \n\t "), vec![TokenKind::EOF]);
}
