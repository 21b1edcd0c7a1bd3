use std::fmt;

use crate::position::Span;
use crate::token::{Keyword, TokenKind};
use crate::value::Number;

/// Prefix sign operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Plus,
    Minus,
}

impl UnaryOperator {
    #[must_use]
    pub const fn from_token(kind: &TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Plus => Some(Self::Plus),
            TokenKind::Minus => Some(Self::Minus),
            _ => None,
        }
    }

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
        }
    }
}

/// Infix arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOperator {
    #[must_use]
    pub const fn from_token(kind: &TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Plus => Some(Self::Add),
            TokenKind::Minus => Some(Self::Sub),
            TokenKind::Mul => Some(Self::Mul),
            TokenKind::Div => Some(Self::Div),
            TokenKind::Pow => Some(Self::Pow),
            _ => None,
        }
    }

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Pow => "^",
        }
    }
}

/// Expression tree. Every node carries the source range it was parsed from.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    NumberLiteral {
        value: Number,
        span: Span,
    },
    UnaryOp {
        op: UnaryOperator,
        operand: Box<Self>,
        span: Span,
    },
    BinaryOp {
        left: Box<Self>,
        op: BinaryOperator,
        right: Box<Self>,
        span: Span,
    },
    VarAccess {
        name: String,
        span: Span,
    },
    /// `var name = value` or `let name = value`. The span starts at the
    /// name, not the keyword.
    VarAssign {
        keyword: Keyword,
        name: String,
        value: Box<Self>,
        span: Span,
    },
}

impl Node {
    /// Prefix operation spanning from the operator through the operand.
    #[must_use]
    pub fn unary(op: UnaryOperator, op_span: &Span, operand: Self) -> Self {
        let span = op_span.to(operand.span());
        Self::UnaryOp {
            op,
            operand: Box::new(operand),
            span,
        }
    }

    /// Infix operation spanning from the left operand through the right.
    #[must_use]
    pub fn binary(left: Self, op: BinaryOperator, right: Self) -> Self {
        let span = left.span().to(right.span());
        Self::BinaryOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
            span,
        }
    }

    #[must_use]
    pub fn assign(keyword: Keyword, name: String, name_span: &Span, value: Self) -> Self {
        let span = name_span.to(value.span());
        Self::VarAssign {
            keyword,
            name,
            value: Box::new(value),
            span,
        }
    }

    #[must_use]
    pub const fn span(&self) -> &Span {
        match self {
            Self::NumberLiteral { span, .. }
            | Self::UnaryOp { span, .. }
            | Self::BinaryOp { span, .. }
            | Self::VarAccess { span, .. }
            | Self::VarAssign { span, .. } => span,
        }
    }
}

/// Fully parenthesised form, e.g. `(1 + (2 * 3))`.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NumberLiteral { value, .. } => write!(f, "{value}"),
            Self::UnaryOp { op, operand, .. } => write!(f, "({}{operand})", op.symbol()),
            Self::BinaryOp {
                left, op, right, ..
            } => write!(f, "({left} {} {right})", op.symbol()),
            Self::VarAccess { name, .. } => write!(f, "{name}"),
            Self::VarAssign {
                keyword,
                name,
                value,
                ..
            } => write!(f, "({} {name} = {value})", keyword.as_str()),
        }
    }
}
