// `ok!` and `some!` are less bloaty alternatives to the standard library's try operator (`?`).
// Since we do not need type conversions in this crate we can fall back to much easier match
// patterns that compile faster and produce less bloaty code.

macro_rules! ok {
    ($expr:expr) => {
        match $expr {
            Ok(val) => val,
            Err(err) => return Err(err),
        }
    };
}

macro_rules! some {
    ($expr:expr) => {
        match $expr {
            Some(val) => val,
            None => return None,
        }
    };
}

/// Hidden utility module for the [`context!`](crate::context!) macro.
#[doc(hidden)]
pub mod __context {
    use crate::value::{Value, ValueMap};

    #[inline(always)]
    pub fn make() -> ValueMap {
        ValueMap::default()
    }

    #[inline(always)]
    pub fn add(ctx: &mut ValueMap, key: &'static str, value: Value) {
        ctx.insert(key.into(), value);
    }

    #[inline(always)]
    pub fn build(ctx: ValueMap) -> Value {
        Value::Map(ctx)
    }
}

/// Creates a template context from keys and values.
///
/// ```rust
/// # use mailmerge::context;
/// let ctx = context!{
///     name => "Peter",
///     location => "World",
/// };
/// ```
///
/// Alternatively if the variable name matches the key name it can
/// be omitted:
///
/// ```rust
/// # use mailmerge::context;
/// let name = "Peter";
/// let ctx = context!{ name };
/// ```
///
/// The return value is a [`Value`](crate::value::Value).
///
/// Note that [`context!`](crate::context!) can also be used recursively if
/// you need to create nested objects:
///
/// ```rust
/// # use mailmerge::context;
/// let ctx = context! {
///     recipients => vec![
///         context!(name => "Ada", show => true),
///         context!(name => "Grace", show => false),
///     ]
/// };
/// ```
///
/// Values are converted with [`Value::from`](crate::value::Value), so
/// anything with a `From` conversion into a value can be passed.  For
/// arbitrary serializable types use
/// [`Value::from_serializable`](crate::value::Value::from_serializable).
#[macro_export]
macro_rules! context {
    () => {
        $crate::__context::build($crate::__context::make())
    };
    (
        $($key:ident $(=> $value:expr)?),* $(,)?
    ) => {{
        let mut ctx = $crate::__context::make();
        $(
            $crate::__context_pair!(ctx, $key $(=> $value)?);
        )*
        $crate::__context::build(ctx)
    }};
}

#[macro_export]
#[doc(hidden)]
macro_rules! __context_pair {
    ($ctx:ident, $key:ident) => {{
        $crate::__context_pair!($ctx, $key => $key);
    }};
    ($ctx:ident, $key:ident => $value:expr) => {
        $crate::__context::add(
            &mut $ctx,
            stringify!($key),
            $crate::value::Value::from($value),
        );
    };
}

#[cfg(test)]
mod tests {
    use crate::value::Value;

    use similar_asserts::assert_eq;

    #[test]
    fn test_context() {
        let var1 = 23;
        let ctx = context!(var1, var2 => 42);
        assert_eq!(ctx.get_attr("var1"), Some(&Value::from(23)));
        assert_eq!(ctx.get_attr("var2"), Some(&Value::from(42)));
    }

    #[test]
    fn test_empty_context() {
        assert_eq!(context!().to_string(), "{}");
    }

    #[test]
    fn test_nested_context() {
        let ctx = context! {
            outer => context! { inner => "x" },
        };
        assert_eq!(ctx.to_string(), r#"{"outer": {"inner": "x"}}"#);
    }
}
