use std::fmt;

use crate::position::Span;

/// Reserved words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Var,
    Let,
}

impl Keyword {
    #[must_use]
    pub fn from_ident(text: &str) -> Option<Self> {
        match text {
            "var" => Some(Self::Var),
            "let" => Some(Self::Let),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Var => "var",
            Self::Let => "let",
        }
    }
}

/// Token kinds produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Integer literal (`42`).
    Int(i64),
    /// Floating point literal (`4.2`, `4.`).
    Float(f64),
    Identifier(String),
    Keyword(Keyword),
    Plus,
    Minus,
    Mul,
    Div,
    Pow,
    LParen,
    RParen,
    Equal,
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Identifier(name) => write!(f, "{name}"),
            Self::Keyword(kw) => write!(f, "{}", kw.as_str()),
            Self::Plus => write!(f, "+"),
            Self::Minus => write!(f, "-"),
            Self::Mul => write!(f, "*"),
            Self::Div => write!(f, "/"),
            Self::Pow => write!(f, "^"),
            Self::LParen => write!(f, "("),
            Self::RParen => write!(f, ")"),
            Self::Equal => write!(f, "="),
            Self::Eof => write!(f, "EOF"),
        }
    }
}

/// A single token with its kind and source span.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    #[must_use]
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.kind == TokenKind::Keyword(keyword)
    }
}
