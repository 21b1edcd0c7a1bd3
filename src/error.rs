use std::fmt;

use crate::context::Context;
use crate::position::{Position, Span};

/// What the parser expected when it gave up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    /// No number, name, or `(` where an operand must start.
    ExpectedAtom,
    /// Nothing at all could start an expression here.
    ExpectedExpression,
    /// `(` without its matching `)`.
    ExpectedRightParen,
    /// `var`/`let` not followed by a name.
    ExpectedIdentifier,
    /// Declared name not followed by `=`.
    ExpectedEquals,
    /// Complete expression followed by something other than an operator.
    ExpectedOperator,
    /// Numeric literal that does not fit the numeric types.
    NumberOutOfRange(String),
    /// Operators or parentheses nested past the parser's depth limit.
    TooDeep,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExpectedAtom => {
                write!(f, "Expected int, float, identifier, '+', '-' or '('")
            }
            Self::ExpectedExpression => write!(
                f,
                "Expected 'var', 'let', int, float, identifier, '+', '-' or '('"
            ),
            Self::ExpectedRightParen => write!(f, "Expected ')'"),
            Self::ExpectedIdentifier => write!(f, "Expected identifier"),
            Self::ExpectedEquals => write!(f, "Expected '='"),
            Self::ExpectedOperator => write!(f, "Expected '+', '-', '*', '/' or '^'"),
            Self::NumberOutOfRange(text) => {
                write!(f, "Number literal '{text}' is out of range")
            }
            Self::TooDeep => write!(f, "Expression is nested too deeply"),
        }
    }
}

/// Failures raised while evaluating a well-formed tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeErrorKind {
    DivisionByZero,
    /// Name read before any `var`/`let` bound it.
    Undefined { name: String },
    /// Integer result does not fit, or a float result became infinite.
    Overflow,
    /// Negative base raised to a fractional power.
    NotReal,
}

impl fmt::Display for RuntimeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DivisionByZero => write!(f, "Division by zero"),
            Self::Undefined { name } => write!(f, "'{name}' is not defined"),
            Self::Overflow => write!(f, "Numeric result out of range"),
            Self::NotReal => write!(f, "Result is not a real number"),
        }
    }
}

/// Classifies an [`Error`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Character that cannot start any token.
    IllegalCharacter(char),
    InvalidSyntax(SyntaxError),
    /// Operator applied to a value kind it has no definition for.
    NoOverload { type_name: &'static str },
    Runtime(RuntimeErrorKind),
}

impl ErrorKind {
    /// Heading printed in front of the message.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::IllegalCharacter(_) => "Illegal Character",
            Self::InvalidSyntax(_) => "Invalid Syntax",
            Self::NoOverload { .. } => "No Overload",
            Self::Runtime(_) => "Runtime Error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IllegalCharacter(ch) => write!(f, "'{ch}' is not a valid character"),
            Self::InvalidSyntax(err) => write!(f, "{err}"),
            Self::NoOverload { type_name } => write!(f, "{type_name} is not a Number"),
            Self::Runtime(err) => write!(f, "{err}"),
        }
    }
}

/// One evaluation frame in a traceback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub name: String,
    /// Where execution was inside this frame, if known.
    pub position: Option<Position>,
}

/// Snapshot of the context chain at the point a runtime error was raised.
///
/// Frames are stored outermost first, so the innermost frame (where the
/// error happened) is printed last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Traceback {
    pub frames: Vec<Frame>,
}

impl Traceback {
    /// Walk from `context` out through its parents. `position` is the
    /// failure point in the innermost frame; each parent frame is
    /// positioned at the call site recorded by its child.
    #[must_use]
    pub fn capture(context: &Context, position: &Position) -> Self {
        let mut frames = Vec::new();
        let mut position = Some(position.clone());
        let mut current = Some(context);

        while let Some(ctx) = current {
            frames.push(Frame {
                name: ctx.display_name.clone(),
                position,
            });
            position = ctx.parent_entry_pos.clone();
            current = ctx.parent();
        }

        frames.reverse();
        Self { frames }
    }
}

impl fmt::Display for Traceback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Traceback (most recent call last):")?;
        for frame in &self.frames {
            match &frame.position {
                Some(pos) => writeln!(
                    f,
                    "  File \"{}\", line {}, in {}",
                    pos.source_name(),
                    pos.line_number(),
                    frame.name
                )?,
                None => writeln!(f, "  in {}", frame.name)?,
            }
        }
        Ok(())
    }
}

/// Error produced by any stage of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "{}: {kind} at line {}, column {}",
    kind.title(),
    span.start.line_number(),
    span.start.column_number()
)]
pub struct Error {
    pub kind: ErrorKind,
    pub span: Span,
    /// Present only on runtime errors.
    pub traceback: Option<Traceback>,
}

impl Error {
    #[must_use]
    pub const fn illegal_character(ch: char, span: Span) -> Self {
        Self {
            kind: ErrorKind::IllegalCharacter(ch),
            span,
            traceback: None,
        }
    }

    #[must_use]
    pub const fn syntax(err: SyntaxError, span: Span) -> Self {
        Self {
            kind: ErrorKind::InvalidSyntax(err),
            span,
            traceback: None,
        }
    }

    #[must_use]
    pub const fn no_overload(type_name: &'static str, span: Span) -> Self {
        Self {
            kind: ErrorKind::NoOverload { type_name },
            span,
            traceback: None,
        }
    }

    #[must_use]
    pub fn runtime(kind: RuntimeErrorKind, span: Span, context: &Context) -> Self {
        let traceback = Traceback::capture(context, &span.start);
        Self {
            kind: ErrorKind::Runtime(kind),
            span,
            traceback: Some(traceback),
        }
    }

    /// Full diagnostic: traceback (runtime errors only), heading and
    /// message, then the offending source with a caret underline.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        match &self.traceback {
            Some(traceback) => out.push_str(&traceback.to_string()),
            None => out.push_str(&format!(
                "File \"{}\", line {}\n",
                self.span.start.source_name(),
                self.span.start.line_number()
            )),
        }
        out.push_str(&format!("{}: {}\n\n", self.kind.title(), self.kind));
        out.push_str(&underline(&self.span));
        out
    }
}

/// Source lines covered by `span`, each followed by a row of carets.
///
/// Tabs are dropped from the echoed lines rather than expanded.
#[must_use]
pub fn underline(span: &Span) -> String {
    let lines: Vec<&str> = span.start.source_text().split('\n').collect();
    let first = span.start.line;
    let last = span.end.line.max(first);
    let mut out = Vec::new();

    for line_no in first..=last {
        let line = lines.get(line_no).copied().unwrap_or_default();
        let col_start = if line_no == first { span.start.column } else { 0 };
        let col_end = if line_no == last {
            span.end.column
        } else {
            line.chars().count()
        };
        out.push(line.replace('\t', ""));
        out.push(format!(
            "{}{}",
            " ".repeat(col_start),
            "^".repeat(col_end.saturating_sub(col_start))
        ));
    }

    out.join("\n")
}
