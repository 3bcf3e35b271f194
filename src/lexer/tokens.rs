use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("let", TokenKind::Let);
        map.insert("const", TokenKind::Const);
        map.insert("import", TokenKind::Import);
        map.insert("from", TokenKind::From);
        map.insert("return", TokenKind::Return);
        map.insert("fn", TokenKind::Fn);
        map.insert("if", TokenKind::If);
        map.insert("else", TokenKind::Else);
        map.insert("foreach", TokenKind::Foreach);
        map.insert("while", TokenKind::While);
        map.insert("for", TokenKind::For);
        map.insert("break", TokenKind::Break);
        map.insert("in", TokenKind::In);
        map.insert("struct", TokenKind::Struct);
        map.insert("impl", TokenKind::Impl);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Number,
    String,
    Identifier,

    OpenBracket,
    CloseBracket,
    OpenCurly,
    CloseCurly,
    OpenParen,
    CloseParen,

    Assignment, // =
    Equals,     // ==
    Not,        // !
    NotEquals,  // !=

    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    Or,
    And,

    Dot,
    Semicolon,
    Colon,
    Comma,

    PlusPlus,
    MinusMinus,
    PlusEquals,
    MinusEquals,
    SlashEquals,
    StarEquals,

    Plus,
    Dash,
    Slash,
    Star,
    Percent,

    // Reserved
    Let,
    Const,
    Import,
    From,
    Fn,
    Return,
    If,
    Else,
    Foreach,
    While,
    For,
    Break,
    In,
    Struct,
    Impl,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_one_of_many(&[TokenKind::String, TokenKind::Identifier, TokenKind::Number]) {
            write!(f, "{} ({})", self.kind, self.value)
        } else {
            write!(f, "{}", self.kind)
        }
    }
}

impl Token {
    pub fn is_one_of_many(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.kind)
    }
}
