use std::{
    cell::RefCell,
    collections::HashSet,
    io::Write,
    path::{Path, PathBuf},
    rc::Rc,
};

use tracing::{debug, warn};

use crate::{
    ast::statements::BlockStmt,
    errors::errors::Error,
    lexer::lexer::tokenize,
    parser::parser::parse,
};

use super::{
    environment::EnvRef,
    stmt::evaluate_block,
    values::{Flow, RuntimeVal},
};

/// Tree-walking evaluator state shared by every call.
///
/// Holds the output sink and the modules currently being imported; all
/// program state lives in the environment chain passed to each evaluation.
pub struct Interpreter {
    stdout: Rc<RefCell<dyn Write>>,
    loading: HashSet<PathBuf>,
}

impl Interpreter {
    pub fn new(stdout: Rc<RefCell<dyn Write>>) -> Self {
        Interpreter {
            stdout,
            loading: HashSet::new(),
        }
    }

    /// Writes one line to the output sink. A closed sink is not an error
    /// of the running program, so failures are only logged.
    pub fn print_line(&mut self, line: &str) {
        let mut stdout = self.stdout.borrow_mut();
        if let Err(err) = writeln!(stdout, "{}", line).and_then(|_| stdout.flush()) {
            warn!(error = %err, "failed to write program output");
        }
    }

    /// Marks `path` as being imported. Returns false when it already is,
    /// meaning the import would be cyclic.
    pub fn begin_import(&mut self, path: PathBuf) -> bool {
        self.loading.insert(path)
    }

    pub fn end_import(&mut self, path: &Path) {
        self.loading.remove(path);
    }

    /// Evaluates a parsed program in `env`, returning the value it finished
    /// with.
    pub fn run(&mut self, program: &BlockStmt, env: &EnvRef) -> Result<RuntimeVal, Error> {
        let value = match evaluate_block(self, program, env)? {
            Flow::Normal(value) | Flow::Returned(value) => value,
            Flow::Broke => RuntimeVal::Null,
        };

        Ok(value)
    }

    /// Tokenizes, parses and runs `source`, naming it `file` in positions.
    pub fn run_source(&mut self, source: String, file: &str, env: &EnvRef) -> Result<RuntimeVal, Error> {
        let tokens = tokenize(source, Some(String::from(file)))?;
        debug!(file, tokens = tokens.len(), "tokenized source");

        let program = parse(tokens, Rc::new(String::from(file)))?;
        self.run(&program, env)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new(Rc::new(RefCell::new(std::io::stdout())))
    }
}
