use std::{fs::read_to_string, path::PathBuf, process::ExitCode, rc::Rc, time::Instant};

use clap::Parser;
use shiplang::{
    display_error,
    errors::errors::{Error, ErrorImpl},
    init_tracing,
    interpreter::{interpreter::Interpreter, stdlib::create_global_environment},
    lexer::lexer::tokenize,
    parser::parser::parse,
    Position,
};
use tracing::debug;

/// Runs a shiplang program.
#[derive(Parser, Debug)]
#[command(name = "shiplang", version, about)]
struct Cli {
    /// Source file to run
    file: PathBuf,

    /// Print the token stream after running
    #[arg(long)]
    tokens: bool,

    /// Print the syntax tree after running
    #[arg(long)]
    ast: bool,

    /// Print the global environment after running
    #[arg(long)]
    env: bool,
}

fn run(cli: &Cli) -> Result<(), Error> {
    let file_name = cli.file.to_string_lossy().to_string();

    let source = read_to_string(&cli.file).map_err(|err| {
        Error::new(
            ErrorImpl::ModuleNotFound { path: file_name.clone(), reason: err.to_string() },
            Position(0, Rc::new(file_name.clone())),
        )
    })?;

    let start = Instant::now();
    let tokens = tokenize(source, Some(file_name.clone()))?;
    debug!(elapsed = ?start.elapsed(), "tokenized");

    let parse_start = Instant::now();
    let program = parse(tokens.clone(), Rc::new(file_name))?;
    debug!(elapsed = ?parse_start.elapsed(), "parsed");

    let env = create_global_environment();
    let mut interpreter = Interpreter::default();

    let run_start = Instant::now();
    interpreter.run(&program, &env)?;
    debug!(elapsed = ?run_start.elapsed(), total = ?start.elapsed(), "finished");

    if cli.tokens {
        for token in &tokens {
            println!("{}", token);
        }
    }

    if cli.ast {
        println!("{:#?}", program);
    }

    if cli.env {
        println!("{:#?}", env.borrow());
    }

    Ok(())
}

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            display_error(&error);
            ExitCode::FAILURE
        }
    }
}
