use std::rc::Rc;

use lazy_static::lazy_static;
use regex::Regex;

use crate::{errors::errors::{Error, ErrorImpl}, Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

pub type RegexHandler = fn(&mut Lexer, &str);

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler
}

fn pattern(regex: &str, handler: RegexHandler) -> RegexPattern {
    // Every pattern is anchored so a match always begins at the cursor
    let anchored = format!("^(?:{})", regex);
    RegexPattern { regex: Regex::new(&anchored).expect("lexer patterns are valid regexes"), handler }
}

lazy_static! {
    // Order matters: longer operators must come before their prefixes
    static ref PATTERNS: Vec<RegexPattern> = vec![
        pattern("[a-zA-Z_][a-zA-Z0-9_]*", symbol_handler),
        pattern("[0-9]+(\\.[0-9]+)?", number_handler),
        pattern("\\s+", skip_handler),
        pattern("\"(?:[^\"\\\\]|\\\\.)*\"", string_handler),
        pattern("//[^\n]*", skip_handler),
        pattern("\\[", MK_DEFAULT_HANDLER!(TokenKind::OpenBracket, "[")),
        pattern("\\]", MK_DEFAULT_HANDLER!(TokenKind::CloseBracket, "]")),
        pattern("\\{", MK_DEFAULT_HANDLER!(TokenKind::OpenCurly, "{")),
        pattern("\\}", MK_DEFAULT_HANDLER!(TokenKind::CloseCurly, "}")),
        pattern("\\(", MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(")),
        pattern("\\)", MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")")),
        pattern("==", MK_DEFAULT_HANDLER!(TokenKind::Equals, "==")),
        pattern("!=", MK_DEFAULT_HANDLER!(TokenKind::NotEquals, "!=")),
        pattern("!", MK_DEFAULT_HANDLER!(TokenKind::Not, "!")),
        pattern("=", MK_DEFAULT_HANDLER!(TokenKind::Assignment, "=")),
        pattern("<=", MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<=")),
        pattern("<", MK_DEFAULT_HANDLER!(TokenKind::Less, "<")),
        pattern(">=", MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">=")),
        pattern(">", MK_DEFAULT_HANDLER!(TokenKind::Greater, ">")),
        pattern("\\|\\|", MK_DEFAULT_HANDLER!(TokenKind::Or, "||")),
        pattern("&&", MK_DEFAULT_HANDLER!(TokenKind::And, "&&")),
        pattern("\\.", MK_DEFAULT_HANDLER!(TokenKind::Dot, ".")),
        pattern(";", MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";")),
        pattern(":", MK_DEFAULT_HANDLER!(TokenKind::Colon, ":")),
        pattern(",", MK_DEFAULT_HANDLER!(TokenKind::Comma, ",")),
        pattern("\\+\\+", MK_DEFAULT_HANDLER!(TokenKind::PlusPlus, "++")),
        pattern("--", MK_DEFAULT_HANDLER!(TokenKind::MinusMinus, "--")),
        pattern("\\+=", MK_DEFAULT_HANDLER!(TokenKind::PlusEquals, "+=")),
        pattern("-=", MK_DEFAULT_HANDLER!(TokenKind::MinusEquals, "-=")),
        pattern("\\*=", MK_DEFAULT_HANDLER!(TokenKind::StarEquals, "*=")),
        pattern("/=", MK_DEFAULT_HANDLER!(TokenKind::SlashEquals, "/=")),
        pattern("\\+", MK_DEFAULT_HANDLER!(TokenKind::Plus, "+")),
        pattern("-", MK_DEFAULT_HANDLER!(TokenKind::Dash, "-")),
        pattern("/", MK_DEFAULT_HANDLER!(TokenKind::Slash, "/")),
        pattern("\\*", MK_DEFAULT_HANDLER!(TokenKind::Star, "*")),
        pattern("%", MK_DEFAULT_HANDLER!(TokenKind::Percent, "%")),
    ];
}

pub struct Lexer {
    tokens: Vec<Token>,
    source: String,
    pos: usize,
    file: Rc<String>,
}

impl Lexer {
    pub fn new(source: String, file: Option<String>) -> Lexer {
        let file_name = if let Some(file) = file {
            Rc::new(file)
        } else {
            Rc::new(String::from("shell"))
        };

        Lexer {
            pos: 0,
            tokens: vec![],
            source,
            file: file_name,
        }
    }

    pub fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn position(&self) -> Position {
        Position(self.pos as u32, Rc::clone(&self.file))
    }

    /// Span from the cursor covering the next `length` bytes.
    pub fn span_of(&self, length: usize) -> Span {
        Span {
            start: self.position(),
            end: Position((self.pos + length) as u32, Rc::clone(&self.file)),
        }
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }
}

fn number_handler(lexer: &mut Lexer, matched: &str) {
    let span = lexer.span_of(matched.len());
    lexer.push(MK_TOKEN!(TokenKind::Number, matched.to_string(), span));
    lexer.advance_n(matched.len());
}

fn skip_handler(lexer: &mut Lexer, matched: &str) {
    lexer.advance_n(matched.len());
}

fn string_handler(lexer: &mut Lexer, matched: &str) {
    let string_literal = &matched[1..matched.len() - 1];

    let mut result = String::new();
    let mut chars = string_literal.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }

        match chars.peek() {
            Some('n') => { result.push('\n'); chars.next(); }
            Some('t') => { result.push('\t'); chars.next(); }
            Some('r') => { result.push('\r'); chars.next(); }
            Some('0') => { result.push('\0'); chars.next(); }
            Some('\\') => { result.push('\\'); chars.next(); }
            Some('"') => { result.push('"'); chars.next(); }
            Some('x') => {
                chars.next();
                let mut hex = String::new();

                while hex.len() < 2 {
                    match chars.peek() {
                        Some(ch) if ch.is_ascii_hexdigit() => {
                            hex.push(*ch);
                            chars.next();
                        }
                        _ => break,
                    }
                }

                match u8::from_str_radix(&hex, 16) {
                    Ok(byte) => result.push(byte as char),
                    Err(_) => result.push_str("\\x"),
                }
            }
            // Unknown escapes keep the backslash
            _ => result.push(ch),
        }
    }

    let span = lexer.span_of(matched.len());
    lexer.push(MK_TOKEN!(TokenKind::String, result, span));
    lexer.advance_n(matched.len());
}

fn symbol_handler(lexer: &mut Lexer, matched: &str) {
    let kind = RESERVED_LOOKUP.get(matched).copied().unwrap_or(TokenKind::Identifier);
    let span = lexer.span_of(matched.len());

    lexer.push(MK_TOKEN!(kind, String::from(matched), span));
    lexer.advance_n(matched.len());
}

/// Converts source text into a token stream terminated by an `EOF` token.
pub fn tokenize(source: String, file: Option<String>) -> Result<Vec<Token>, Error> {
    let mut lex = Lexer::new(source, file);

    while !lex.at_eof() {
        let found = PATTERNS.iter().find_map(|pattern| {
            pattern.regex.find(lex.remainder()).map(|m| (pattern.handler, m.as_str().to_string()))
        });

        match found {
            Some((handler, matched)) => handler(&mut lex, &matched),
            None => {
                let token = lex.remainder().chars().next().map(String::from).unwrap_or_default();
                return Err(Error::new(ErrorImpl::UnrecognisedToken { token }, lex.position()));
            }
        }
    }

    let span = lex.span_of(0);
    lex.push(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), span));
    Ok(lex.tokens)
}
