use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::error::Error;
use crate::template::{CompiledTemplate, Template};
use crate::value::Value;
use crate::vm::{MarkdownRenderer, Vm};

type TemplateMap<'source> = BTreeMap<&'source str, Arc<CompiledTemplate<'source>>>;

/// An abstraction that holds the engine configuration.
///
/// This object holds the central configuration state for templates.  It is
/// also the container for all loaded templates.
///
/// The environment holds references to the source the templates were
/// created from.  This makes it very inconvenient to pass around unless
/// the templates are static strings.
///
/// ```
/// # use mailmerge::{Environment, context};
/// let mut env = Environment::new();
/// env.add_template("greeting", "Dear {{ name }},").unwrap();
/// let tmpl = env.get_template("greeting").unwrap();
/// assert_eq!(tmpl.render(context! { name => "Ada" }).unwrap(), "Dear Ada,");
/// ```
#[derive(Clone)]
pub struct Environment<'source> {
    templates: TemplateMap<'source>,
    markdown: Arc<MarkdownRenderer>,
    #[cfg(feature = "debug")]
    debug: bool,
}

impl<'source> Default for Environment<'source> {
    fn default() -> Self {
        Environment::new()
    }
}

impl<'source> fmt::Debug for Environment<'source> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("templates", &self.templates.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<'source> Environment<'source> {
    /// Creates a new environment.
    ///
    /// Markdown interpolations use
    /// [`render_markdown`](crate::render_markdown) until a different
    /// renderer is configured with
    /// [`set_markdown_renderer`](Self::set_markdown_renderer).
    pub fn new() -> Environment<'source> {
        Environment {
            templates: TemplateMap::new(),
            markdown: Arc::new(mailmerge_markdown::render_markdown),
            #[cfg(feature = "debug")]
            debug: cfg!(debug_assertions),
        }
    }

    /// Loads a template from a string.
    ///
    /// The template is parsed right away, so syntax errors are reported
    /// here.  The `name` parameter defines the name of the template which
    /// identifies it.  To look up a loaded template use the
    /// [`get_template`](Self::get_template) method.
    pub fn add_template(&mut self, name: &'source str, source: &'source str) -> Result<(), Error> {
        match CompiledTemplate::from_name_and_source(name, source) {
            Ok(compiled) => {
                self.templates.insert(name, Arc::new(compiled));
                Ok(())
            }
            Err(err) => Err(self.attach_debug_info(err, source)),
        }
    }

    /// Removes a template by name.
    pub fn remove_template(&mut self, name: &str) {
        self.templates.remove(name);
    }

    /// Fetches a template by name.
    ///
    /// This requires that the template has been loaded with
    /// [`add_template`](Environment::add_template) beforehand.  If the
    /// template was not loaded an error of kind `TemplateNotFound` is
    /// returned.
    pub fn get_template(&self, name: &str) -> Result<Template<'_, 'source>, Error> {
        match self.templates.get(name) {
            Some(compiled) => Ok(Template::new(self, compiled)),
            None => Err(Error::new_not_found(name)),
        }
    }

    /// Parses and renders a template from a string in one go.
    ///
    /// In some cases you really only need a template to be rendered once
    /// from a string and returned.  The internal name of the template is
    /// `<string>`.
    ///
    /// ```
    /// # use mailmerge::{Environment, context};
    /// let env = Environment::new();
    /// let rv = env.render_str("Hello {{ name }}", context! { name => "World" });
    /// assert_eq!(rv.unwrap(), "Hello World");
    /// ```
    pub fn render_str<S: Serialize>(&self, source: &str, ctx: S) -> Result<String, Error> {
        match Value::from_serializable(&ctx) {
            Ok(root) => self._render_str(source, &root),
            Err(err) => Err(self.attach_debug_info(err, source)),
        }
    }

    fn _render_str(&self, source: &str, root: &Value) -> Result<String, Error> {
        let name = "<string>";
        CompiledTemplate::from_name_and_source(name, source)
            .and_then(|compiled| {
                Vm::new(self.markdown_renderer()).eval(&compiled.ast, root, name)
            })
            .map_err(|err| self.attach_debug_info(err, source))
    }

    /// Replaces the function that turns markdown interpolations into HTML.
    ///
    /// ```
    /// # use mailmerge::{Environment, context};
    /// let mut env = Environment::new();
    /// env.set_markdown_renderer(|text| format!("<pre>{text}</pre>"));
    /// let rv = env.render_str("{{{ body }}}", context! { body => "*hi*" });
    /// assert_eq!(rv.unwrap(), "<pre>*hi*</pre>");
    /// ```
    pub fn set_markdown_renderer<F>(&mut self, f: F)
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.markdown = Arc::new(f);
    }

    pub(crate) fn markdown_renderer(&self) -> &MarkdownRenderer {
        &*self.markdown
    }

    /// Enable or disable the debug mode.
    ///
    /// When the debug mode is enabled errors carry the template source
    /// which the alternative display form of [`Error`] prints around the
    /// failing line.  By default debug mode is enabled if debug assertions
    /// are enabled.
    ///
    /// ```
    /// # use mailmerge::Environment;
    /// let mut env = Environment::new();
    /// env.set_debug(true);
    /// ```
    #[cfg(feature = "debug")]
    #[cfg_attr(docsrs, doc(cfg(feature = "debug")))]
    pub fn set_debug(&mut self, enabled: bool) {
        self.debug = enabled;
    }

    /// Returns the current value of the debug flag.
    #[cfg(feature = "debug")]
    pub fn debug(&self) -> bool {
        self.debug
    }

    #[cfg(feature = "debug")]
    pub(crate) fn attach_debug_info(&self, err: Error, source: &str) -> Error {
        crate::error::attach_debug_info(err, self.debug, source)
    }

    #[cfg(not(feature = "debug"))]
    pub(crate) fn attach_debug_info(&self, err: Error, _source: &str) -> Error {
        err
    }
}
