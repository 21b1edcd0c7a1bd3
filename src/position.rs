use std::fmt;
use std::sync::Arc;

/// A named piece of source text shared by every position into it.
#[derive(Debug, PartialEq, Eq)]
pub struct Source {
    pub name: String,
    pub text: String,
}

impl Source {
    #[must_use]
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            text: text.into(),
        })
    }
}

/// Cursor into source text.
///
/// `index` is a byte offset, `line` and `column` are zero-based and
/// count characters. Cloning is cheap: the source itself is shared.
#[derive(Clone, PartialEq, Eq)]
pub struct Position {
    pub index: usize,
    pub line: usize,
    pub column: usize,
    pub source: Arc<Source>,
}

impl Position {
    /// Position of the first character of `source`.
    #[must_use]
    pub const fn start(source: Arc<Source>) -> Self {
        Self {
            index: 0,
            line: 0,
            column: 0,
            source,
        }
    }

    /// Step over `ch`. `None` steps past the end of input by one column.
    pub fn advance(&mut self, ch: Option<char>) {
        self.index += ch.map_or(1, char::len_utf8);
        if ch == Some('\n') {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
    }

    /// Copy of this position moved over `ch`.
    #[must_use]
    pub fn advanced(&self, ch: Option<char>) -> Self {
        let mut next = self.clone();
        next.advance(ch);
        next
    }

    #[must_use]
    pub fn source_name(&self) -> &str {
        &self.source.name
    }

    #[must_use]
    pub fn source_text(&self) -> &str {
        &self.source.text
    }

    /// One-based line number for display.
    #[must_use]
    pub const fn line_number(&self) -> usize {
        self.line + 1
    }

    /// One-based column number for display.
    #[must_use]
    pub const fn column_number(&self) -> usize {
        self.column + 1
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.source.name,
            self.line_number(),
            self.column_number()
        )
    }
}

/// Half-open `[start, end)` source range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    #[must_use]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Span covering exactly the character at `start`.
    #[must_use]
    pub fn single(start: Position, ch: char) -> Self {
        let end = start.advanced(Some(ch));
        Self { start, end }
    }

    /// Span from the start of `self` to the end of `other`.
    #[must_use]
    pub fn to(&self, other: &Self) -> Self {
        Self {
            start: self.start.clone(),
            end: other.end.clone(),
        }
    }

    /// Text covered by the span, if it lies on valid boundaries.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.start
            .source_text()
            .get(self.start.index..self.end.index)
    }
}
