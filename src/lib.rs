#![allow(clippy::module_inception)]

use std::{fmt::Write, fs, rc::Rc, sync::Once};

use crate::errors::errors::{Error, ErrorTip};

pub mod ast;
pub mod errors;
pub mod interpreter;
pub mod lexer;
pub mod macros;
pub mod parser;

extern crate regex;

/// Byte offset into a source file, plus the file's name.
#[derive(Debug, Clone)]
pub struct Position(pub u32, pub Rc<String>);

impl Position {
    pub fn null() -> Self {
        Position(0, Rc::new(String::from("<null>")))
    }
}

#[derive(Debug, Clone)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

static TRACING_INIT: Once = Once::new();

/// Installs the log subscriber once. Logging stays off unless `RUST_LOG`
/// is set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr).with_target(true).with_level(true))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}

/// Finds the line containing byte offset `position`.
///
/// Returns the 1-based line number, the line text and the offset within
/// the line, or `None` when the offset is past the end of `content`.
pub fn get_line_at_position(content: &str, position: u32) -> Option<(usize, String, usize)> {
    let pos = position as usize;
    if pos > content.len() {
        return None;
    }

    let mut start = 0;
    let mut line_number = 1;

    for line in content.split_inclusive('\n') {
        let end = start + line.len();

        // An error at EOF points just past the last line
        if (start..end).contains(&pos) || (pos == end && end == content.len()) {
            return Some((line_number, line.to_string(), pos - start));
        }

        start = end;
        line_number += 1;
    }

    Some((line_number, String::new(), 0))
}

/// Renders an error with the offending source line and a caret.
///
/// ```text
/// Error: TypeError: types do not match: expected number, received string
/// (Expected type `number`, received `string`)
/// -> main.sp
///    |
/// 20 | let a: number = "a";
///    | ----------------^
/// ```
pub fn format_error(error: &Error, source: Option<&str>) -> String {
    let position = error.get_position();
    let mut output = String::new();

    let _ = writeln!(output, "Error: {}", error);
    if let ErrorTip::Suggestion(tip) = error.get_tip() {
        let _ = writeln!(output, "({})", tip);
    }
    let _ = writeln!(output, "-> {}", position.1);

    let Some((line, line_text, line_pos)) = source.and_then(|source| get_line_at_position(source, position.0)) else {
        return output;
    };

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    let _ = writeln!(output, "{:>padding$}", "|");

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    let _ = writeln!(output, "{} | {}", line_string, line_text_removed.trim_end());

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;
    let _ = writeln!(output, "{:>padding$} {:->arrows$}", "|", "^");

    output
}

/// Prints an error to stderr, reading the source from the file named in
/// its position.
pub fn display_error(error: &Error) {
    let source = fs::read_to_string(error.get_position().1.as_str()).ok();
    eprint!("{}", format_error(error, source.as_deref()));
}

fn remove_starting_whitespace(string: &str) -> (&str, usize) {
    let start = string.chars().take_while(|c| *c == ' ' || *c == '\t').count();

    (&string[start..], start)
}
