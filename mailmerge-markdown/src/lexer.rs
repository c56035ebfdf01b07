/// A markdown token.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Token {
    /// One `#` of a heading marker.
    Heading,
    /// A `* ` list item marker.
    Item,
    /// `\n` or `\r\n`.
    LineBreak,
    /// Any other character.
    Letter(char),
    /// End of input.
    Eof,
}

/// Tokenizes the markdown dialect.
///
/// Markers are context sensitive: a run of `#` followed by a space is a
/// heading and `* ` is a list item only at the start of a line.  Anywhere
/// else they are plain letters.  The space after a marker is consumed.
#[derive(Clone)]
pub struct Lexer<'s> {
    rest: &'s str,
    at_line_start: bool,
    in_heading: bool,
}

impl<'s> Lexer<'s> {
    /// Creates a new lexer.
    pub fn new(input: &'s str) -> Lexer<'s> {
        Lexer {
            rest: input,
            at_line_start: true,
            in_heading: false,
        }
    }

    /// Produces the next token.  Returns [`Token::Eof`] forever once the
    /// input is exhausted.
    pub fn next_token(&mut self) -> Token {
        let c = match self.rest.chars().next() {
            Some(c) => c,
            None => return Token::Eof,
        };

        if c == '#' && (self.at_line_start || self.in_heading) {
            let run = self.rest.bytes().take_while(|&b| b == b'#').count();
            if self.rest[run..].starts_with(' ') {
                self.advance(if run == 1 { 2 } else { 1 });
                self.at_line_start = false;
                self.in_heading = run > 1;
                return Token::Heading;
            }
        }
        self.in_heading = false;

        if self.at_line_start && self.rest.starts_with("* ") {
            self.advance(2);
            self.at_line_start = false;
            return Token::Item;
        }

        if c == '\n' || self.rest.starts_with("\r\n") {
            self.advance(if c == '\n' { 1 } else { 2 });
            self.at_line_start = true;
            return Token::LineBreak;
        }

        self.advance(c.len_utf8());
        self.at_line_start = false;
        Token::Letter(c)
    }

    /// Looks at the next token without consuming it.
    pub fn peek_token(&self) -> Token {
        self.clone().next_token()
    }

    fn advance(&mut self, bytes: usize) {
        self.rest = &self.rest[bytes..];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use similar_asserts::assert_eq;

    fn tokens(input: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(input);
        let mut rv = Vec::new();
        loop {
            match lexer.next_token() {
                Token::Eof => break,
                tok => rv.push(tok),
            }
        }
        rv
    }

    #[test]
    fn test_markers() {
        assert_eq!(tokens(""), vec![]);
        assert_eq!(tokens("# "), vec![Token::Heading]);
        assert_eq!(tokens("## "), vec![Token::Heading, Token::Heading]);
        assert_eq!(tokens("* "), vec![Token::Item]);
        assert_eq!(tokens("\n"), vec![Token::LineBreak]);
        assert_eq!(tokens("\r\n"), vec![Token::LineBreak]);
    }

    #[test]
    fn test_markers_only_at_line_start() {
        assert_eq!(
            tokens("# a#"),
            vec![Token::Heading, Token::Letter('a'), Token::Letter('#')]
        );
        assert_eq!(
            tokens("a * b"),
            vec![
                Token::Letter('a'),
                Token::Letter(' '),
                Token::Letter('*'),
                Token::Letter(' '),
                Token::Letter('b'),
            ]
        );
        assert_eq!(
            tokens("#tag"),
            vec![
                Token::Letter('#'),
                Token::Letter('t'),
                Token::Letter('a'),
                Token::Letter('g'),
            ]
        );
    }

    #[test]
    fn test_items() {
        assert_eq!(
            tokens("* A\n* B\nC\n"),
            vec![
                Token::Item,
                Token::Letter('A'),
                Token::LineBreak,
                Token::Item,
                Token::Letter('B'),
                Token::LineBreak,
                Token::Letter('C'),
                Token::LineBreak,
            ]
        );
    }

    #[test]
    fn test_eof_is_sticky() {
        let mut lexer = Lexer::new("x");
        assert_eq!(lexer.peek_token(), Token::Letter('x'));
        assert_eq!(lexer.next_token(), Token::Letter('x'));
        assert_eq!(lexer.next_token(), Token::Eof);
        assert_eq!(lexer.next_token(), Token::Eof);
    }
}
