use std::fmt;

use crate::error::{Error, ErrorKind};
use crate::value::Value;

/// Looks up a dotted path inside a value.
///
/// A key matching the full path wins.  Otherwise the path is split at the
/// first dot and the rest is looked up in the value found under the head.
fn lookup<'ctx>(value: &'ctx Value, path: &str) -> Option<&'ctx Value> {
    if let Some(rv) = value.get_attr(path) {
        return Some(rv);
    }
    let (head, tail) = some!(path.split_once('.'));
    lookup(some!(value.get_attr(head)), tail)
}

/// The scopes paths are resolved against during rendering.
///
/// The root is the render context.  Every `each` block pushes the
/// current item which is reachable as `this` until it is popped again.
pub(crate) struct Context<'ctx> {
    root: &'ctx Value,
    items: Vec<&'ctx Value>,
}

impl fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("root", self.root)
            .field("this", &self.items.last())
            .finish()
    }
}

impl<'ctx> Context<'ctx> {
    pub fn new(root: &'ctx Value) -> Context<'ctx> {
        Context {
            root,
            items: Vec::new(),
        }
    }

    pub fn push_item(&mut self, item: &'ctx Value) {
        self.items.push(item);
    }

    pub fn pop_item(&mut self) {
        self.items.pop();
    }

    /// Resolves a path to a value.
    ///
    /// Inside a loop `this` is the current item and `this.<path>` is looked
    /// up in it.  Everything else goes to the root.  Missing values and
    /// none fail with [`ErrorKind::MissingParameter`].
    pub fn resolve(&self, path: &str) -> Result<&'ctx Value, Error> {
        let rv = match self.items.last() {
            Some(item) if path == "this" => Some(*item),
            Some(item) => match path.strip_prefix("this.") {
                Some(rest) => lookup(item, rest),
                None => lookup(self.root, path),
            },
            None => lookup(self.root, path),
        };
        match rv {
            Some(value) if !value.is_none() => Ok(value),
            _ => Err(Error::new(
                ErrorKind::MissingParameter,
                format!("parameter `{path}` is missing"),
            )),
        }
    }
}
