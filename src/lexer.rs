use std::sync::Arc;

use crate::error::{Error, SyntaxError};
use crate::position::{Position, Source, Span};
use crate::token::{Keyword, Token, TokenKind};

/// Tokenize `source_text`, tagging every position with `source_name`.
///
/// The returned sequence always ends with an `Eof` token.
///
/// # Errors
///
/// Returns an `IllegalCharacter` error at the first character that cannot
/// start a token, or `InvalidSyntax` for a numeric literal out of range.
pub fn tokenize(source_name: &str, source_text: &str) -> Result<Vec<Token>, Error> {
    let tokens = Lexer::new(Source::new(source_name, source_text)).tokenize()?;
    log::debug!("{source_name}: {} token(s)", tokens.len());
    Ok(tokens)
}

struct Lexer {
    pos: Position,
}

impl Lexer {
    const fn new(source: Arc<Source>) -> Self {
        Self {
            pos: Position::start(source),
        }
    }

    fn tokenize(mut self) -> Result<Vec<Token>, Error> {
        let mut tokens = Vec::new();

        while let Some(ch) = self.peek() {
            match ch {
                ' ' | '\t' => self.advance(),
                '0'..='9' => tokens.push(self.read_number()?),
                c if c.is_ascii_alphabetic() => tokens.push(self.read_identifier()),
                _ => {
                    let Some(kind) = symbol(ch) else {
                        return Err(Error::illegal_character(
                            ch,
                            Span::single(self.pos.clone(), ch),
                        ));
                    };
                    tokens.push(Token::new(kind, Span::single(self.pos.clone(), ch)));
                    self.advance();
                }
            }
        }

        let end = self.pos.advanced(None);
        tokens.push(Token::new(TokenKind::Eof, Span::new(self.pos, end)));
        Ok(tokens)
    }

    fn peek(&self) -> Option<char> {
        self.pos
            .source_text()
            .get(self.pos.index..)
            .and_then(|rest| rest.chars().next())
    }

    fn advance(&mut self) {
        let ch = self.peek();
        if ch.is_some() {
            self.pos.advance(ch);
        }
    }

    /// Digits with at most one `.`; a second `.` ends the literal.
    fn read_number(&mut self) -> Result<Token, Error> {
        let start = self.pos.clone();
        let mut seen_dot = false;

        while let Some(ch) = self.peek() {
            match ch {
                '0'..='9' => {}
                '.' if !seen_dot => seen_dot = true,
                _ => break,
            }
            self.advance();
        }

        let span = Span::new(start, self.pos.clone());
        let text = span.text().unwrap_or_default();
        let kind = if seen_dot {
            text.parse().ok().map(TokenKind::Float)
        } else {
            text.parse().ok().map(TokenKind::Int)
        };

        match kind {
            Some(kind) => Ok(Token::new(kind, span)),
            None => {
                let text = text.to_string();
                Err(Error::syntax(SyntaxError::NumberOutOfRange(text), span))
            }
        }
    }

    fn read_identifier(&mut self) -> Token {
        let start = self.pos.clone();

        while let Some(ch) = self.peek() {
            if !(ch.is_ascii_alphanumeric() || ch == '_') {
                break;
            }
            self.advance();
        }

        let span = Span::new(start, self.pos.clone());
        let text = span.text().unwrap_or_default();
        let kind = Keyword::from_ident(text).map_or_else(
            || TokenKind::Identifier(text.to_string()),
            TokenKind::Keyword,
        );
        Token::new(kind, span)
    }
}

/// Single-character operator and punctuation tokens.
const fn symbol(ch: char) -> Option<TokenKind> {
    match ch {
        '+' => Some(TokenKind::Plus),
        '-' => Some(TokenKind::Minus),
        '*' => Some(TokenKind::Mul),
        '/' => Some(TokenKind::Div),
        '^' => Some(TokenKind::Pow),
        '(' => Some(TokenKind::LParen),
        ')' => Some(TokenKind::RParen),
        '=' => Some(TokenKind::Equal),
        _ => None,
    }
}
