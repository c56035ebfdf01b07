use crate::lexer::{Lexer, Token};

/// A markdown block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: usize, text: String },
    Paragraph { text: String },
    Item { text: String },
}

/// Groups tokens into blocks.
pub struct Parser<'s> {
    lexer: Lexer<'s>,
    current: Token,
}

impl<'s> Parser<'s> {
    pub fn new(mut lexer: Lexer<'s>) -> Parser<'s> {
        let current = lexer.next_token();
        Parser { lexer, current }
    }

    /// Parses the whole input.  Every input is valid markdown.
    pub fn parse(&mut self) -> Vec<Block> {
        let mut rv = Vec::new();
        loop {
            match self.current {
                Token::Eof => return rv,
                Token::LineBreak => self.advance(),
                Token::Heading => rv.push(self.parse_heading()),
                Token::Item => {
                    self.advance();
                    let text = self.parse_text();
                    rv.push(Block::Item { text });
                }
                Token::Letter(_) => {
                    let text = self.parse_text();
                    rv.push(Block::Paragraph { text });
                }
            }
        }
    }

    fn advance(&mut self) {
        self.current = self.lexer.next_token();
    }

    fn parse_line(&mut self) -> String {
        let mut line = String::new();
        while let Token::Letter(c) = self.current {
            line.push(c);
            self.advance();
        }
        line
    }

    fn parse_heading(&mut self) -> Block {
        let mut level = 0;
        while self.current == Token::Heading {
            level += 1;
            self.advance();
        }
        let text = self.parse_line().trim().to_string();
        Block::Heading { level, text }
    }

    /// Reads the text of a paragraph or list item.
    ///
    /// Continuation lines are joined with a space.  A blank line or a line
    /// starting with a marker ends the block.
    fn parse_text(&mut self) -> String {
        let mut text = self.parse_line().trim().to_string();
        while self.current == Token::LineBreak {
            if !matches!(self.lexer.peek_token(), Token::Letter(_)) {
                break;
            }
            self.advance();
            let line = self.parse_line();
            let line = line.trim();
            if !line.is_empty() {
                if !text.is_empty() {
                    text.push(' ');
                }
                text.push_str(line);
            }
        }
        text
    }
}
