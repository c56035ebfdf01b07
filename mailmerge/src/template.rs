use std::fmt;

use serde::Serialize;

use crate::compiler::ast::Ast;
use crate::compiler::parser::parse;
use crate::environment::Environment;
use crate::error::Error;
use crate::value::Value;
use crate::vm::Vm;

/// A template parsed once and kept around for rendering.
pub(crate) struct CompiledTemplate<'source> {
    pub(crate) name: &'source str,
    pub(crate) source: &'source str,
    pub(crate) ast: Ast<'source>,
}

impl fmt::Debug for CompiledTemplate<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledTemplate")
            .field("name", &self.name)
            .field("ast", &self.ast)
            .finish()
    }
}

impl<'source> CompiledTemplate<'source> {
    pub(crate) fn from_name_and_source(
        name: &'source str,
        source: &'source str,
    ) -> Result<CompiledTemplate<'source>, Error> {
        let ast = ok!(parse(source, name));
        Ok(CompiledTemplate { name, source, ast })
    }
}

/// Represents a handle to a template.
///
/// Templates are stored in the [`Environment`] in compiled form.  With the
/// [`Environment::get_template`] method that is looked up and returned in
/// form of this handle.  Such a template can be cheaply copied as it only
/// holds references.
///
/// To render the [`render`](Template::render) method can be used.
#[derive(Clone, Copy)]
pub struct Template<'env, 'source> {
    env: &'env Environment<'source>,
    compiled: &'env CompiledTemplate<'source>,
}

impl fmt::Debug for Template<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("name", &self.name())
            .finish()
    }
}

impl<'env, 'source> Template<'env, 'source> {
    pub(crate) fn new(
        env: &'env Environment<'source>,
        compiled: &'env CompiledTemplate<'source>,
    ) -> Template<'env, 'source> {
        Template { env, compiled }
    }

    /// Returns the name of the template.
    pub fn name(&self) -> &str {
        self.compiled.name
    }

    /// Returns the source code of the template.
    pub fn source(&self) -> &str {
        self.compiled.source
    }

    /// Returns the parsed template.
    pub fn ast(&self) -> &Ast<'source> {
        &self.compiled.ast
    }

    /// Renders the template into a string.
    ///
    /// The provided value is used as the context for the template.  It can
    /// be any object that implements [`Serialize`](serde::Serialize).  You
    /// can either create your own struct and derive `Serialize` for it or
    /// the [`context!`](crate::context) macro can be used to create an
    /// ad-hoc context.
    ///
    /// ```
    /// # use mailmerge::{Environment, context};
    /// # let mut env = Environment::new();
    /// # env.add_template("hello", "Hello {{ name }}!").unwrap();
    /// let tmpl = env.get_template("hello").unwrap();
    /// assert_eq!(tmpl.render(context!(name => "John")).unwrap(), "Hello John!");
    /// ```
    pub fn render<S: Serialize>(&self, ctx: S) -> Result<String, Error> {
        // keep the monomorphized part small, the rest is shared in _render.
        match Value::from_serializable(&ctx) {
            Ok(root) => self._render(&root),
            Err(err) => Err(self.env.attach_debug_info(err, self.source())),
        }
    }

    fn _render(&self, root: &Value) -> Result<String, Error> {
        Vm::new(self.env.markdown_renderer())
            .eval(&self.compiled.ast, root, self.name())
            .map_err(|err| self.env.attach_debug_info(err, self.source()))
    }
}
