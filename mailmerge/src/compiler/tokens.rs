use std::fmt;

/// Represents a token in the stream.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// A single literal character of the template.
    Character(&'a str),
    /// Interpolation or directive start (`{{`).
    Start,
    /// Interpolation or directive end (`}}`).
    End,
    /// Markdown interpolation start (`{{{`).
    StartMd,
    /// Markdown interpolation end (`}}}`).
    EndMd,
    /// End of input.
    Eof,
}

/// The kind of a [`Token`] without its payload.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Character,
    Start,
    End,
    StartMd,
    EndMd,
    Eof,
}

impl<'a> Token<'a> {
    /// Returns the kind of the token.
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Character(_) => TokenKind::Character,
            Token::Start => TokenKind::Start,
            Token::End => TokenKind::End,
            Token::StartMd => TokenKind::StartMd,
            Token::EndMd => TokenKind::EndMd,
            Token::Eof => TokenKind::Eof,
        }
    }

    /// Returns the literal of a character token.
    pub fn literal(&self) -> Option<&'a str> {
        match *self {
            Token::Character(c) => Some(c),
            _ => None,
        }
    }

    /// Returns the source text this token was produced from.
    pub fn as_source(&self) -> &'a str {
        match *self {
            Token::Character(c) => c,
            Token::Start => "{{",
            Token::End => "}}",
            Token::StartMd => "{{{",
            Token::EndMd => "}}}",
            Token::Eof => "",
        }
    }

    /// Is this a character token that holds whitespace?
    pub fn is_whitespace(&self) -> bool {
        matches!(self, Token::Character(c) if c.chars().all(char::is_whitespace))
    }
}

impl<'a> fmt::Display for Token<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Character(c) => write!(f, "character {c:?}"),
            Token::Start => f.write_str("`{{`"),
            Token::End => f.write_str("`}}`"),
            Token::StartMd => f.write_str("`{{{`"),
            Token::EndMd => f.write_str("`}}}`"),
            Token::Eof => f.write_str("end of input"),
        }
    }
}

/// Token span information
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    pub start_line: u32,
    pub start_col: u32,
    pub start_offset: u32,
    pub end_line: u32,
    pub end_col: u32,
    pub end_offset: u32,
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            " @ {}:{}-{}:{}",
            self.start_line, self.start_col, self.end_line, self.end_col
        )
    }
}
