use crate::compiler::tokens::{Span, Token};

/// Tokenizes mail-merge templates.
///
/// The tokenizer walks the input one character at a time.  The only
/// structural tokens are the four delimiters (`{{`, `}}`, `{{{`, `}}}`),
/// everything else comes out as a [`Token::Character`] holding exactly one
/// character of the source.
///
/// The tokenizer is cheap to clone which is what
/// [`peek_nth_token`](Self::peek_nth_token) uses to look ahead without
/// disturbing the read position.
#[derive(Clone)]
pub struct Tokenizer<'s> {
    rest: &'s str,
    current_line: u32,
    current_col: u32,
    current_offset: u32,
}

/// Counts how many of the first three bytes are `brace`.
fn delimiter_len(bytes: &[u8], brace: u8) -> usize {
    bytes.iter().take(3).take_while(|&&c| c == brace).count()
}

impl<'s> Tokenizer<'s> {
    /// Creates a new tokenizer.
    pub fn new(input: &'s str) -> Tokenizer<'s> {
        Tokenizer {
            rest: input,
            current_line: 1,
            current_col: 0,
            current_offset: 0,
        }
    }

    /// Produces the next token from the tokenizer.
    ///
    /// Once the input is exhausted this keeps returning [`Token::Eof`].
    pub fn next_token(&mut self) -> (Token<'s>, Span) {
        let old_loc = self.loc();
        let token = match self.rest_bytes().first() {
            None => Token::Eof,
            Some(b'{') => match delimiter_len(self.rest_bytes(), b'{') {
                3 => {
                    self.advance(3);
                    Token::StartMd
                }
                2 => {
                    self.advance(2);
                    Token::Start
                }
                _ => Token::Character(self.advance(1)),
            },
            Some(b'}') => match delimiter_len(self.rest_bytes(), b'}') {
                3 => {
                    self.advance(3);
                    Token::EndMd
                }
                2 => {
                    self.advance(2);
                    Token::End
                }
                _ => Token::Character(self.advance(1)),
            },
            Some(_) => {
                let len = self.rest.chars().next().map_or(1, char::len_utf8);
                Token::Character(self.advance(len))
            }
        };
        (token, self.span(old_loc))
    }

    /// Looks at the `n`-th upcoming token without consuming anything.
    ///
    /// `peek_nth_token(0)` is the token the next call to
    /// [`next_token`](Self::next_token) would return.
    pub fn peek_nth_token(&self, n: usize) -> Token<'s> {
        let mut ahead = self.clone();
        for _ in 0..n {
            if let Token::Eof = ahead.next_token().0 {
                return Token::Eof;
            }
        }
        ahead.next_token().0
    }

    /// Returns the byte offset of the next unread character.
    pub fn current_read_position(&self) -> usize {
        self.current_offset as usize
    }

    #[inline]
    fn rest_bytes(&self) -> &'s [u8] {
        self.rest.as_bytes()
    }

    fn advance(&mut self, bytes: usize) -> &'s str {
        let (skipped, new_rest) = self.rest.split_at(bytes);
        for c in skipped.chars() {
            match c {
                '\n' => {
                    self.current_line += 1;
                    self.current_col = 0;
                }
                _ => self.current_col += 1,
            }
        }
        self.current_offset += bytes as u32;
        self.rest = new_rest;
        skipped
    }

    #[inline]
    fn loc(&self) -> (u32, u32, u32) {
        (self.current_line, self.current_col, self.current_offset)
    }

    #[inline]
    fn span(&self, (start_line, start_col, start_offset): (u32, u32, u32)) -> Span {
        Span {
            start_line,
            start_col,
            start_offset,
            end_line: self.current_line,
            end_col: self.current_col,
            end_offset: self.current_offset,
        }
    }
}

/// Utility function to quickly tokenize into an iterator.
///
/// The iterator stops before the final [`Token::Eof`].
pub fn tokenize(input: &str) -> impl Iterator<Item = (Token<'_>, Span)> {
    let mut tokenizer = Tokenizer::new(input);
    std::iter::from_fn(move || match tokenizer.next_token() {
        (Token::Eof, _) => None,
        rv => Some(rv),
    })
}
