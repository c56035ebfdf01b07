use std::fmt;
use std::ops::Deref;

use crate::compiler::tokens::Span;

/// Container for nodes with location info.
///
/// This container fulfills two purposes: it adds location information
/// to nodes, but it also ensures the nodes is heap allocated.  The
/// latter is useful to ensure that enum variants do not cause the enum
/// to become too large.
pub struct Spanned<T> {
    inner: Box<(T, Span)>,
}

impl<T> Spanned<T> {
    /// Creates a new spanned node.
    pub fn new(node: T, span: Span) -> Spanned<T> {
        Spanned {
            inner: Box::new((node, span)),
        }
    }

    /// Accesses the span.
    pub fn span(&self) -> Span {
        self.inner.1
    }
}

impl<T> Deref for Spanned<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.inner.0
    }
}

impl<T: fmt::Debug> fmt::Debug for Spanned<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ok!(fmt::Debug::fmt(&self.inner.0, f));
        write!(f, "{:?}", self.inner.1)
    }
}

/// A compiled template.
///
/// The tree borrows all of its strings from the template source.
#[derive(Debug)]
pub struct Ast<'a> {
    pub blocks: Vec<Block<'a>>,
}

/// A block node.
pub enum Block<'a> {
    Text(Spanned<Text<'a>>),
    Replace(Spanned<Replace<'a>>),
    MdReplace(Spanned<MdReplace<'a>>),
    If(Spanned<IfCond<'a>>),
    Loop(Spanned<Loop<'a>>),
}

impl fmt::Debug for Block<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Block::Text(s) => fmt::Debug::fmt(s, f),
            Block::Replace(s) => fmt::Debug::fmt(s, f),
            Block::MdReplace(s) => fmt::Debug::fmt(s, f),
            Block::If(s) => fmt::Debug::fmt(s, f),
            Block::Loop(s) => fmt::Debug::fmt(s, f),
        }
    }
}

impl Block<'_> {
    pub fn description(&self) -> &'static str {
        match self {
            Block::Text(_) => "text",
            Block::Replace(_) => "interpolation",
            Block::MdReplace(_) => "markdown interpolation",
            Block::If(_) => "if block",
            Block::Loop(_) => "each block",
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Block::Text(s) => s.span(),
            Block::Replace(s) => s.span(),
            Block::MdReplace(s) => s.span(),
            Block::If(s) => s.span(),
            Block::Loop(s) => s.span(),
        }
    }
}

/// Literal template data.
#[derive(Debug)]
pub struct Text<'a> {
    pub content: &'a str,
}

/// Outputs the value at a path.
#[derive(Debug)]
pub struct Replace<'a> {
    pub path: &'a str,
}

/// Outputs the value at a path converted from markdown to HTML.
#[derive(Debug)]
pub struct MdReplace<'a> {
    pub path: &'a str,
}

/// A conditional block.
///
/// `alternative` is empty if the block had no `{{else}}`.  An `{{elseif}}`
/// is represented as a single nested [`IfCond`] in the alternative.
#[derive(Debug)]
pub struct IfCond<'a> {
    pub condition: &'a str,
    pub consequence: Vec<Block<'a>>,
    pub alternative: Vec<Block<'a>>,
}

/// Renders the body once for every item of a sequence.
#[derive(Debug)]
pub struct Loop<'a> {
    pub source: &'a str,
    pub body: Vec<Block<'a>>,
}
