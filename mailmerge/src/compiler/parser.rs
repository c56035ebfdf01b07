use std::borrow::Cow;
use std::fmt;

use crate::compiler::ast::{self, Spanned};
use crate::compiler::lexer::Tokenizer;
use crate::compiler::tokens::{Span, Token};
use crate::error::{Error, ErrorKind};

const MAX_RECURSION: usize = 150;

fn unexpected<D: fmt::Display>(unexpected: D, expected: &str) -> Error {
    Error::new(
        ErrorKind::MalformedBlock,
        format!("unexpected {unexpected}, expected {expected}"),
    )
}

fn unexpected_eof(expected: &str) -> Error {
    unexpected("end of input", expected)
}

fn syntax_error(msg: Cow<'static, str>) -> Error {
    Error::new(ErrorKind::MalformedBlock, msg)
}

macro_rules! syntax_error {
    ($msg:expr) => {{
        return Err(syntax_error(Cow::Borrowed($msg)));
    }};
    ($msg:expr, $($tt:tt)*) => {{
        return Err(syntax_error(Cow::Owned(format!($msg, $($tt)*))));
    }};
}

macro_rules! with_recursion_guard {
    ($parser:expr, $expr:expr) => {{
        $parser.depth += 1;
        if $parser.depth > MAX_RECURSION {
            return Err(syntax_error(Cow::Borrowed(
                "template exceeds maximum recursion limits",
            )));
        }
        let rv = $expr;
        $parser.depth -= 1;
        rv
    }};
}

/// The classified contents of a `{{ ... }}` tag.
#[derive(Debug, PartialEq, Eq)]
enum Tag<'a> {
    Directive(&'a str, &'a str),
    Close(&'a str),
    Else(&'a str),
    ElseIf(&'a str),
    Path(&'a str),
}

/// Splits off the first word, returning it and the trimmed rest.
fn split_word(s: &str) -> (&str, &str) {
    match s.find(char::is_whitespace) {
        Some(idx) => (&s[..idx], s[idx..].trim()),
        None => (s, ""),
    }
}

impl<'a> Tag<'a> {
    fn classify(inner: &'a str) -> Tag<'a> {
        let inner = inner.trim();
        if let Some(rest) = inner.strip_prefix('#') {
            let (keyword, argument) = split_word(rest);
            Tag::Directive(keyword, argument)
        } else if let Some(rest) = inner.strip_prefix('/') {
            Tag::Close(rest.trim())
        } else {
            match split_word(inner) {
                ("else", rest) => Tag::Else(rest),
                ("elseif", rest) => Tag::ElseIf(rest),
                _ => Tag::Path(inner),
            }
        }
    }
}

fn join_spans(start: Span, end: Span) -> Span {
    Span {
        start_line: start.start_line,
        start_col: start.start_col,
        start_offset: start.start_offset,
        end_line: end.end_line,
        end_col: end.end_col,
        end_offset: end.end_offset,
    }
}

/// The template parser.
///
/// The parser looks at a window of two tokens: the current one and the
/// one the tokenizer would hand out next.  Block terminators are detected
/// by scanning further ahead on a copy of the tokenizer without
/// consuming anything.
pub struct Parser<'a> {
    source: &'a str,
    name: &'a str,
    tokenizer: Tokenizer<'a>,
    current: (Token<'a>, Span),
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Creates a new parser.
    pub fn new(source: &'a str, name: &'a str) -> Parser<'a> {
        let mut tokenizer = Tokenizer::new(source);
        let current = tokenizer.next_token();
        Parser {
            source,
            name,
            tokenizer,
            current,
            depth: 0,
        }
    }

    /// Parses a template.
    pub fn parse(&mut self) -> Result<ast::Ast<'a>, Error> {
        self.subparse(None)
            .map(|blocks| ast::Ast { blocks })
            .map_err(|err| self.attach_location_to_error(err))
    }

    fn advance(&mut self) -> (Token<'a>, Span) {
        std::mem::replace(&mut self.current, self.tokenizer.next_token())
    }

    /// Checks if the current `{{` opens a closing tag, `else` or `elseif`.
    ///
    /// Scans a copy of the tokenizer forward once and stops as soon as the
    /// first word is longer than `elseif`.
    fn is_block_terminator(&self) -> bool {
        if self.current.0 != Token::Start {
            return false;
        }
        let mut ahead = self.tokenizer.clone();
        let mut tok = ahead.next_token().0;
        while tok.is_whitespace() {
            tok = ahead.next_token().0;
        }
        if tok == Token::Character("/") {
            return true;
        }
        let mut word = String::new();
        loop {
            match tok {
                tok if tok.is_whitespace() => break,
                Token::Character(c) => word.push_str(c),
                Token::End => break,
                _ => return false,
            }
            if word.len() > "elseif".len() {
                return false;
            }
            tok = ahead.next_token().0;
        }
        word == "else" || word == "elseif"
    }

    fn subparse(&mut self, enclosing: Option<&str>) -> Result<Vec<ast::Block<'a>>, Error> {
        let mut rv = Vec::new();
        loop {
            match self.current.0 {
                Token::Eof => match enclosing {
                    None => return Ok(rv),
                    Some(name) => syntax_error!(
                        "unexpected end of input, expected `{{{{/{}}}}}`",
                        name
                    ),
                },
                Token::Start if self.is_block_terminator() => {
                    if enclosing.is_some() {
                        return Ok(rv);
                    }
                    let (_, inner, _) = ok!(self.parse_tag());
                    syntax_error!("unexpected tag {:?} outside of a block", inner.trim());
                }
                Token::Start => rv.push(ok!(self.parse_logic_block())),
                Token::StartMd => rv.push(ok!(self.parse_md_replace())),
                Token::Character(_) | Token::End | Token::EndMd => rv.push(self.parse_text()),
            }
        }
    }

    fn parse_text(&mut self) -> ast::Block<'a> {
        let (_, start_span) = self.current;
        let mut end_span = start_span;
        while matches!(
            self.current.0,
            Token::Character(_) | Token::End | Token::EndMd
        ) {
            end_span = self.advance().1;
        }
        let content = &self.source[start_span.start_offset as usize..end_span.end_offset as usize];
        ast::Block::Text(Spanned::new(
            ast::Text { content },
            join_spans(start_span, end_span),
        ))
    }

    /// Reads the raw contents of a tag up to (and including) `end`.
    ///
    /// Expects the opening delimiter to be consumed already.
    fn read_tag_contents(&mut self, end: Token<'a>) -> Result<(&'a str, Span), Error> {
        let start = self.current.1.start_offset as usize;
        loop {
            match self.current.0 {
                Token::Character(_) => {
                    self.advance();
                }
                tok if tok == end => {
                    let inner = &self.source[start..self.current.1.start_offset as usize];
                    let (_, span) = self.advance();
                    return Ok((inner, span));
                }
                Token::Eof => return Err(unexpected_eof(&end.to_string())),
                tok => return Err(unexpected(tok, &end.to_string())),
            }
        }
    }

    /// Consumes a complete `{{ ... }}` tag and classifies it.
    fn parse_tag(&mut self) -> Result<(Tag<'a>, &'a str, Span), Error> {
        let (_, start_span) = self.advance();
        let (inner, end_span) = ok!(self.read_tag_contents(Token::End));
        Ok((
            Tag::classify(inner),
            inner,
            join_spans(start_span, end_span),
        ))
    }

    fn parse_logic_block(&mut self) -> Result<ast::Block<'a>, Error> {
        let (tag, inner, span) = ok!(self.parse_tag());
        match tag {
            Tag::Directive("if", condition) => {
                if condition.is_empty() {
                    syntax_error!("missing condition in `if` directive");
                }
                self.parse_if(condition, span).map(ast::Block::If)
            }
            Tag::Directive("each", source) => {
                if source.is_empty() {
                    syntax_error!("missing source in `each` directive");
                }
                self.parse_each(source, span).map(ast::Block::Loop)
            }
            Tag::Directive(keyword, _) => Err(Error::new(
                ErrorKind::UnknownDirective,
                format!("unknown directive `{keyword}`"),
            )),
            Tag::Path("") => syntax_error!("empty interpolation"),
            Tag::Path(path) => Ok(ast::Block::Replace(Spanned::new(
                ast::Replace { path },
                span,
            ))),
            Tag::Close(_) | Tag::Else(_) | Tag::ElseIf(_) => {
                syntax_error!("unexpected tag {:?} outside of a block", inner.trim())
            }
        }
    }

    fn parse_md_replace(&mut self) -> Result<ast::Block<'a>, Error> {
        let (_, start_span) = self.advance();
        let (inner, end_span) = ok!(self.read_tag_contents(Token::EndMd));
        let path = inner.trim();
        if path.is_empty() {
            syntax_error!("empty markdown interpolation");
        }
        Ok(ast::Block::MdReplace(Spanned::new(
            ast::MdReplace { path },
            join_spans(start_span, end_span),
        )))
    }

    fn parse_if(
        &mut self,
        condition: &'a str,
        open_span: Span,
    ) -> Result<Spanned<ast::IfCond<'a>>, Error> {
        with_recursion_guard!(self, self.parse_if_body(condition, open_span))
    }

    fn parse_if_body(
        &mut self,
        condition: &'a str,
        open_span: Span,
    ) -> Result<Spanned<ast::IfCond<'a>>, Error> {
        let consequence = ok!(self.subparse(Some("if")));
        let (tag, _, tag_span) = ok!(self.parse_tag());
        let (alternative, end_span) = match tag {
            Tag::Close("if") => (Vec::new(), tag_span),
            Tag::Else("") => {
                let alternative = ok!(self.subparse(Some("if")));
                let end_span = ok!(self.expect_close("if"));
                (alternative, end_span)
            }
            Tag::Else(junk) => return Err(unexpected(format!("{junk:?}"), "`}}`")),
            Tag::ElseIf("") => syntax_error!("missing condition in `elseif`"),
            Tag::ElseIf(condition) => {
                let nested = ok!(self.parse_if(condition, tag_span));
                let end_span = nested.span();
                (vec![ast::Block::If(nested)], end_span)
            }
            Tag::Close(other) => {
                syntax_error!("mismatched closing tag: expected `/if`, found `/{}`", other)
            }
            Tag::Directive(..) | Tag::Path(_) => syntax_error!("expected end of `if` block"),
        };
        Ok(Spanned::new(
            ast::IfCond {
                condition,
                consequence,
                alternative,
            },
            join_spans(open_span, end_span),
        ))
    }

    fn parse_each(
        &mut self,
        source: &'a str,
        open_span: Span,
    ) -> Result<Spanned<ast::Loop<'a>>, Error> {
        with_recursion_guard!(self, self.parse_each_body(source, open_span))
    }

    fn parse_each_body(
        &mut self,
        source: &'a str,
        open_span: Span,
    ) -> Result<Spanned<ast::Loop<'a>>, Error> {
        let body = ok!(self.subparse(Some("each")));
        let end_span = ok!(self.expect_close("each"));
        Ok(Spanned::new(
            ast::Loop { source, body },
            join_spans(open_span, end_span),
        ))
    }

    /// Consumes the closing tag of a block, which has to match `name`.
    fn expect_close(&mut self, name: &str) -> Result<Span, Error> {
        let (tag, inner, span) = ok!(self.parse_tag());
        match tag {
            Tag::Close(other) if other == name => Ok(span),
            Tag::Close(other) => {
                syntax_error!(
                    "mismatched closing tag: expected `/{}`, found `/{}`",
                    name,
                    other
                )
            }
            _ => syntax_error!(
                "unexpected tag {:?} in `{}` block, expected `/{}`",
                inner.trim(),
                name,
                name
            ),
        }
    }

    #[inline]
    fn attach_location_to_error(&mut self, mut err: Error) -> Error {
        if err.line().is_none() {
            err.set_location(self.name, self.current.1.start_line as usize);
        }
        err
    }
}

/// Parses a template.
pub fn parse<'source>(source: &'source str, name: &'source str) -> Result<ast::Ast<'source>, Error> {
    Parser::new(source, name).parse()
}
