//! Lexer, parser, and tree-walking evaluator for a tiny arithmetic
//! language.
//!
//! The language has integer and float literals, `+ - * / ^`, parentheses,
//! unary sign, and variables declared with `var` or `let`. Errors carry
//! source spans and render with a caret underline; runtime errors also
//! print a traceback.
//!
//! # Quick start
//!
//! ```
//! use basic_expr::Session;
//!
//! let session = Session::new();
//! session.run("var x = 2 ^ 3 ^ 2", "<stdin>").unwrap();
//! let value = session.run("x + 1", "<stdin>").unwrap();
//! assert_eq!(value.to_string(), "513");
//! ```
//!
//! ## Reporting errors
//!
//! ```
//! use basic_expr::Session;
//!
//! let err = Session::new().run("5 / 0", "<stdin>").unwrap_err();
//! assert!(err.render().contains("Division by zero"));
//! ```

#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod ast;
pub mod context;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod position;
pub mod token;
pub mod value;

use std::rc::Rc;

pub use ast::{BinaryOperator, Node, UnaryOperator};
pub use context::{Context, Lookup, MODULE_NAME, SharedSymbolTable, SymbolTable};
pub use error::{Error, ErrorKind, Frame, RuntimeErrorKind, SyntaxError, Traceback};
pub use interpreter::evaluate;
pub use lexer::tokenize;
pub use parser::{MAX_DEPTH, parse};
pub use position::{Position, Source, Span};
pub use token::{Keyword, Token, TokenKind};
pub use value::{Number, Value, ValueKind};

/// Tokenize, parse and evaluate `source_text` against `globals`.
///
/// Each stage stops at its first error. Assignments land in `globals`,
/// so state carries over between calls that share the table.
pub fn run(
    source_text: &str,
    source_name: &str,
    globals: &SharedSymbolTable,
) -> Result<Value, Error> {
    run_in(source_text, source_name, MODULE_NAME, globals)
}

fn run_in(
    source_text: &str,
    source_name: &str,
    module_name: &str,
    globals: &SharedSymbolTable,
) -> Result<Value, Error> {
    let tokens = tokenize(source_name, source_text)?;
    let ast = parse(&tokens)?;
    let context = Context::new(module_name, Rc::clone(globals));
    let result = evaluate(&ast, &context);
    match &result {
        Ok(value) => log::debug!("{source_name}: {ast} => {value}"),
        Err(err) => log::debug!("{source_name}: {ast} failed: {err}"),
    }
    result
}

/// A persistent global scope for evaluating one input after another.
///
/// Not thread-safe: hosts evaluating concurrently need one session each.
#[derive(Debug)]
pub struct Session {
    globals: SharedSymbolTable,
    module_name: String,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Fresh global scope holding the predefined `null = 0`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            globals: SymbolTable::global(),
            module_name: MODULE_NAME.to_string(),
        }
    }

    /// Name shown for the top-level frame in tracebacks.
    #[must_use]
    pub fn with_module_name(mut self, name: impl Into<String>) -> Self {
        self.module_name = name.into();
        self
    }

    /// The global table shared by every `run` on this session.
    #[must_use]
    pub const fn globals(&self) -> &SharedSymbolTable {
        &self.globals
    }

    /// Evaluate one input in this session's global scope.
    pub fn run(&self, source_text: &str, source_name: &str) -> Result<Value, Error> {
        run_in(source_text, source_name, &self.module_name, &self.globals)
    }
}
