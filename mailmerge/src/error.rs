use std::borrow::Cow;
use std::fmt;

/// Represents template errors.
///
/// Both compiling and rendering report failures through this type.  The
/// [`kind`](Error::kind) tells the failures apart, the detail message
/// carries the specifics.
///
/// If debug mode is enabled on the environment an error contains the
/// template source which is shown when formatting the error with the
/// alternative formatting (``format!("{:#}", err)``).
///
/// # Example
///
/// ```rust
/// # let mut env = mailmerge::Environment::new();
/// # env.add_template("hello", "Hello {{ name }}!").unwrap();
/// # let template = env.get_template("hello").unwrap();
/// match template.render(mailmerge::context! { name => "Peter" }) {
///     Ok(result) => println!("{}", result),
///     Err(err) => {
///         eprintln!("Could not render template:");
///         eprintln!("  {:#}", err);
///     }
/// }
/// ```
pub struct Error {
    kind: ErrorKind,
    detail: Option<Cow<'static, str>>,
    name: Option<String>,
    lineno: usize,
    #[cfg(feature = "debug")]
    pub(crate) debug_info: Option<DebugInfo>,
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("kind", &self.kind)
            .field("detail", &self.detail)
            .field("name", &self.name)
            .field("lineno", &self.lineno)
            .finish()
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind()
    }
}

impl Eq for Error {}

/// An enum describing the error kind.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A `{{#...}}` directive other than `if` or `each`.
    UnknownDirective,
    /// The template structure is broken (unclosed or mismatched blocks, bad tags).
    MalformedBlock,
    /// A referenced path does not exist in the context.
    MissingParameter,
    /// A condition resolved to a value without a truth value.
    ConditionType,
    /// A template was not found in the environment.
    TemplateNotFound,
    /// The context could not be converted into a value.
    BadSerialization,
}

impl ErrorKind {
    fn description(self) -> &'static str {
        match self {
            ErrorKind::UnknownDirective => "unknown directive",
            ErrorKind::MalformedBlock => "malformed block",
            ErrorKind::MissingParameter => "missing parameter",
            ErrorKind::ConditionType => "condition has no truth value",
            ErrorKind::TemplateNotFound => "template not found",
            ErrorKind::BadSerialization => "could not serialize to internal format",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref detail) = self.detail {
            ok!(write!(f, "{}: {}", self.kind, detail));
        } else {
            ok!(write!(f, "{}", self.kind));
        }
        if let Some(ref filename) = self.name {
            ok!(write!(f, " (in {}:{})", filename, self.lineno));
        }
        if f.alternate() {
            if let Some(source) = self.template_source() {
                ok!(render_source_excerpt(f, source, self.lineno));
            }
        }
        Ok(())
    }
}

fn render_source_excerpt(f: &mut fmt::Formatter<'_>, source: &str, line: usize) -> fmt::Result {
    let lines: Vec<_> = source.lines().enumerate().collect();
    let idx = line.saturating_sub(1);
    let skip = idx.saturating_sub(3);
    let pre = lines.iter().skip(skip).take(idx - skip);
    let post = lines.iter().skip(idx + 1).take(3);
    ok!(writeln!(f));
    ok!(writeln!(f, "{:-^1$}", " Template Source ", 74));
    for (idx, line) in pre {
        ok!(writeln!(f, "{:>4} | {}", idx + 1, line));
    }
    if let Some((idx, line)) = lines.get(idx) {
        ok!(writeln!(f, "{:>4} > {}", idx + 1, line));
    }
    for (idx, line) in post {
        ok!(writeln!(f, "{:>4} | {}", idx + 1, line));
    }
    write!(f, "{:-^1$}", "", 74)
}

impl Error {
    /// Creates a new error with kind and detail.
    pub fn new<D: Into<Cow<'static, str>>>(kind: ErrorKind, detail: D) -> Error {
        Error {
            kind,
            detail: Some(detail.into()),
            name: None,
            lineno: 0,
            #[cfg(feature = "debug")]
            debug_info: None,
        }
    }

    pub(crate) fn new_not_found(name: &str) -> Error {
        Error::new(
            ErrorKind::TemplateNotFound,
            format!("template {name:?} does not exist"),
        )
    }

    pub(crate) fn set_location(&mut self, filename: &str, lineno: usize) {
        self.name = Some(filename.into());
        self.lineno = lineno;
    }

    /// Returns the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error detail
    ///
    /// The detail is an error message that provides further details about
    /// the error kind.
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// Returns the name of the template that failed.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the line number where the error occurred.
    pub fn line(&self) -> Option<usize> {
        self.name.as_ref().map(|_| self.lineno)
    }

    /// Returns the template source if debug information is available.
    ///
    /// The template source is only embedded into the error if the debug
    /// mode is enabled on the environment
    /// ([`Environment::set_debug`](crate::Environment::set_debug)).
    pub fn template_source(&self) -> Option<&str> {
        #[cfg(feature = "debug")]
        {
            self.debug_info
                .as_ref()
                .and_then(|x| x.template_source.as_deref())
        }
        #[cfg(not(feature = "debug"))]
        {
            None
        }
    }
}

impl std::error::Error for Error {}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error {
            kind,
            detail: None,
            name: None,
            lineno: 0,
            #[cfg(feature = "debug")]
            debug_info: None,
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T>(msg: T) -> Self
    where
        T: fmt::Display,
    {
        Error::new(ErrorKind::BadSerialization, msg.to_string())
    }
}

#[cfg(feature = "debug")]
#[derive(Default)]
pub(crate) struct DebugInfo {
    pub(crate) template_source: Option<String>,
}

/// Attaches the template source to an error if the environment runs in
/// debug mode.
#[cfg(feature = "debug")]
pub(crate) fn attach_debug_info(mut err: Error, debug: bool, source: &str) -> Error {
    if debug && err.debug_info.is_none() {
        err.debug_info = Some(DebugInfo {
            template_source: Some(source.to_string()),
        });
    }
    err
}
