//! Utility macros for the lexer.
//!
//! - `MK_TOKEN!` - Creates a Token instance
//! - `MK_DEFAULT_HANDLER!` - Creates a lexer handler for fixed-text tokens

/// Creates a Token instance.
///
/// ```ignore
/// let token = MK_TOKEN!(TokenKind::Number, "42".to_string(), span);
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $value:expr, $span:expr) => {
        Token {
            kind: $kind,
            value: $value,
            span: $span,
        }
    };
}

/// Creates a lexer handler for a token whose text never varies.
///
/// The generated handler pushes a token of the given kind spanning the
/// literal and advances the lexer past it.
///
/// ```ignore
/// pattern("\\+", MK_DEFAULT_HANDLER!(TokenKind::Plus, "+"))
/// ```
#[macro_export]
macro_rules! MK_DEFAULT_HANDLER {
    ($kind:expr, $value:literal) => {
        |lexer: &mut Lexer, _matched: &str| {
            let span = lexer.span_of($value.len());
            lexer.push(MK_TOKEN!($kind, String::from($value), span));
            lexer.advance_n($value.len());
        }
    };
}
