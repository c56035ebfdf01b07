//! mailmerge is a small template engine for mail-merge style documents.
//!
//! Templates are plain text with a handful of directives.  Values are
//! pulled out of a context that can be any [`serde::Serialize`] value:
//!
//! ```text
//! Dear {{ recipient.name }},
//! {{#if premium}}thank you for being a premium member.{{else}}consider upgrading.{{/if}}
//! {{#each orders}}
//! * {{this.item}} ({{this.amount}})
//! {{/each}}
//! {{{ signature }}}
//! ```
//!
//! # Syntax
//!
//! | Syntax | Meaning |
//! |---|---|
//! | `{{ name }}` | interpolates a value, surrounding whitespace is ignored |
//! | `{{{ name }}}` | renders a markdown string as HTML |
//! | `{{#if cond}}...{{/if}}` | conditional block |
//! | `{{#if cond}}...{{else}}...{{/if}}` | conditional with alternative |
//! | `{{#if a}}...{{elseif b}}...{{else}}...{{/if}}` | chained conditions |
//! | `{{#each list}}...{{/each}}` | loops over a sequence |
//!
//! Paths can be dotted (`user.address.city`).  If the context has a key
//! with the full dotted name that key wins, otherwise the path is walked
//! through nested maps.  Inside a loop `this` refers to the current item
//! and `this.field` to a field of it.  All other paths resolve against
//! the context.
//!
//! Conditions must resolve to a boolean, a string, a sequence or a map.
//! Strings, sequences and maps are true when they are not empty.  Numbers
//! have no truth value and fail the render with
//! [`ErrorKind::ConditionType`].
//!
//! # Usage
//!
//! The quickest way is to [`compile`] a template and [`render`] it:
//!
//! ```
//! use mailmerge::{compile, context, render};
//!
//! let ast = compile("Hello {{ name }}!").unwrap();
//! assert_eq!(render(&ast, context! { name => "World" }).unwrap(), "Hello World!");
//! ```
//!
//! A compiled template can be rendered any number of times, also from
//! multiple threads at once.  For named templates and more configuration
//! there is the [`Environment`]:
//!
//! ```
//! use mailmerge::{context, Environment};
//!
//! let mut env = Environment::new();
//! env.add_template("letter", "Dear {{ name }},\n\n{{{ body }}}").unwrap();
//! let tmpl = env.get_template("letter").unwrap();
//! let rv = tmpl.render(context! { name => "Ada", body => "# Hello" }).unwrap();
//! assert_eq!(rv, "Dear Ada,\n\n<h1>Hello</h1>");
//! ```
//!
//! # Optional Features
//!
//! - `debug`: enables source excerpts in errors (see
//!   [`Environment::set_debug`]).  Enabled by default.
//! - `preserve_order`: keeps maps in insertion order instead of sorting
//!   their keys.
#![allow(clippy::cognitive_complexity)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[macro_use]
mod macros;

mod compiler;
mod environment;
mod error;
mod template;
mod vm;

pub mod value;

use serde::Serialize;

pub use self::compiler::ast::Ast;
pub use self::environment::Environment;
pub use self::error::{Error, ErrorKind};
pub use self::template::Template;
pub use self::value::Value;

pub use mailmerge_markdown::render_markdown;

#[doc(hidden)]
pub use self::macros::__context;

/// Compiles a template into its syntax tree.
///
/// Errors are reported with the template name `<string>`.
///
/// ```
/// # use mailmerge::{compile, ErrorKind};
/// let err = compile("{{#bogus x}}{{/bogus}}").unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::UnknownDirective);
/// ```
pub fn compile(source: &str) -> Result<Ast<'_>, Error> {
    compiler::parser::parse(source, "<string>")
}

/// Renders a compiled template against a context.
///
/// Markdown interpolations go through [`render_markdown`].
///
/// ```
/// # use mailmerge::{compile, context, render};
/// let ast = compile("{{#each items}}{{this}}{{/each}}").unwrap();
/// assert_eq!(render(&ast, context! { items => vec![1, 2] }).unwrap(), "12");
/// ```
pub fn render<S: Serialize>(ast: &Ast<'_>, ctx: S) -> Result<String, Error> {
    let root = ok!(Value::from_serializable(&ctx));
    vm::Vm::new(&render_markdown).eval(ast, &root, "<string>")
}

/// This module gives access to the low level machinery.
///
/// It mostly exists for tooling, testing and debugging.
pub mod machinery {
    pub use crate::compiler::ast;
    pub use crate::compiler::lexer::{tokenize, Tokenizer};
    pub use crate::compiler::parser::{parse, Parser};
    pub use crate::compiler::tokens::{Span, Token, TokenKind};
    pub use crate::vm::{MarkdownRenderer, Vm};
}
