use crate::ast::{BinaryOperator, Node, UnaryOperator};
use crate::error::{Error, SyntaxError};
use crate::position::{Position, Source, Span};
use crate::token::{Keyword, Token, TokenKind};
use crate::value::Number;

/// Parse a token stream into a single expression tree.
///
/// Grammar, loosest binding first:
///
/// ```text
/// expr   := ('var' | 'let') IDENTIFIER '=' expr | term (('+' | '-') term)*
/// term   := factor (('*' | '/') factor)*
/// factor := ('+' | '-') factor | power
/// power  := atom ('^' factor)*
/// atom   := INT | FLOAT | IDENTIFIER | '(' expr ')'
/// ```
///
/// The right operand of `^` re-enters `factor`, which makes `^` right
/// associative and lets it bind tighter than a leading sign.
///
/// # Errors
///
/// Returns `InvalidSyntax` at the first token that does not fit the
/// grammar, including anything left over after a complete expression.
/// Nesting deeper than [`MAX_DEPTH`] fails with `TooDeep`.
pub fn parse(tokens: &[Token]) -> Result<Node, Error> {
    let Some(last) = tokens.last() else {
        let start = Position::start(Source::new("", ""));
        let end = start.advanced(None);
        return Err(Error::syntax(
            SyntaxError::ExpectedExpression,
            Span::new(start, end),
        ));
    };
    if last.kind != TokenKind::Eof {
        // Streams not built by `tokenize` may lack the terminator.
        let end = last.span.end.clone();
        let eof = Token::new(TokenKind::Eof, Span::new(end.clone(), end.advanced(None)));
        let terminated: Vec<Token> = tokens.iter().cloned().chain([eof]).collect();
        return parse(&terminated);
    }
    let node = Parser::new(tokens).parse()?;
    log::debug!("parsed {node}");
    Ok(node)
}

/// Deepest nesting of signs, parentheses and chained binary operators
/// the parser accepts. Keeps parsing and evaluation within the stack.
pub const MAX_DEPTH: usize = 128;

type Rule<'a> = fn(&mut Parser<'a>) -> Result<Node, Error>;

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    const fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    fn parse(mut self) -> Result<Node, Error> {
        let node = self.expr()?;
        let token = self.current();
        if token.kind != TokenKind::Eof {
            return Err(Error::syntax(
                SyntaxError::ExpectedOperator,
                token.span.clone(),
            ));
        }
        Ok(node)
    }

    /// The token under the cursor; sticks at the trailing `Eof`.
    fn current(&self) -> &'a Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    /// One level deeper, failing at `at` past [`MAX_DEPTH`]. Callers
    /// undo it with `leave` once the nested node is built.
    fn enter(&mut self, at: &Span) -> Result<(), Error> {
        if self.depth >= MAX_DEPTH {
            return Err(Error::syntax(SyntaxError::TooDeep, at.clone()));
        }
        self.depth += 1;
        Ok(())
    }

    const fn leave(&mut self, levels: usize) {
        self.depth -= levels;
    }

    fn expr(&mut self) -> Result<Node, Error> {
        if let TokenKind::Keyword(keyword) = self.current().kind {
            return self.declaration(keyword);
        }

        let start = self.pos;
        self.binary_chain(&[BinaryOperator::Add, BinaryOperator::Sub], Self::term, Self::term)
            .map_err(|err| {
                // A failure past the first token is more precise than
                // the generic one; keep it.
                if self.pos == start {
                    Error::syntax(
                        SyntaxError::ExpectedExpression,
                        self.current().span.clone(),
                    )
                } else {
                    err
                }
            })
    }

    fn declaration(&mut self, keyword: Keyword) -> Result<Node, Error> {
        self.advance();

        let name_token = self.current();
        let TokenKind::Identifier(name) = &name_token.kind else {
            return Err(Error::syntax(
                SyntaxError::ExpectedIdentifier,
                name_token.span.clone(),
            ));
        };
        self.advance();

        let token = self.current();
        if token.kind != TokenKind::Equal {
            return Err(Error::syntax(
                SyntaxError::ExpectedEquals,
                token.span.clone(),
            ));
        }
        self.advance();

        let value = self.expr()?;
        Ok(Node::assign(keyword, name.clone(), &name_token.span, value))
    }

    fn term(&mut self) -> Result<Node, Error> {
        self.binary_chain(&[BinaryOperator::Mul, BinaryOperator::Div], Self::factor, Self::factor)
    }

    fn factor(&mut self) -> Result<Node, Error> {
        let token = self.current();
        if let Some(op) = UnaryOperator::from_token(&token.kind) {
            self.advance();
            self.enter(&token.span)?;
            let operand = self.factor()?;
            self.leave(1);
            return Ok(Node::unary(op, &token.span, operand));
        }
        self.power()
    }

    fn power(&mut self) -> Result<Node, Error> {
        self.binary_chain(&[BinaryOperator::Pow], Self::atom, Self::factor)
    }

    fn atom(&mut self) -> Result<Node, Error> {
        let token = self.current();
        match &token.kind {
            TokenKind::Int(n) => {
                self.advance();
                Ok(Node::NumberLiteral {
                    value: Number::Int(*n),
                    span: token.span.clone(),
                })
            }
            TokenKind::Float(x) => {
                self.advance();
                Ok(Node::NumberLiteral {
                    value: Number::Float(*x),
                    span: token.span.clone(),
                })
            }
            TokenKind::Identifier(name) => {
                self.advance();
                Ok(Node::VarAccess {
                    name: name.clone(),
                    span: token.span.clone(),
                })
            }
            TokenKind::LParen => {
                self.advance();
                self.enter(&token.span)?;
                let inner = self.expr()?;
                self.leave(1);
                let close = self.current();
                if close.kind != TokenKind::RParen {
                    return Err(Error::syntax(
                        SyntaxError::ExpectedRightParen,
                        close.span.clone(),
                    ));
                }
                self.advance();
                Ok(inner)
            }
            _ => Err(Error::syntax(SyntaxError::ExpectedAtom, token.span.clone())),
        }
    }

    /// `left (op right)*` for the given operators, folding to the left.
    fn binary_chain(
        &mut self,
        operators: &[BinaryOperator],
        left_rule: Rule<'a>,
        right_rule: Rule<'a>,
    ) -> Result<Node, Error> {
        let mut left = left_rule(self)?;
        let mut folded = 0;

        loop {
            let token = self.current();
            let op = BinaryOperator::from_token(&token.kind).filter(|op| operators.contains(op));
            let Some(op) = op else { break };
            self.advance();
            // Every fold nests the tree built so far one level deeper.
            self.enter(&token.span)?;
            folded += 1;
            let right = right_rule(self)?;
            left = Node::binary(left, op, right);
        }

        self.leave(folded);
        Ok(left)
    }
}
