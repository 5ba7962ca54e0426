//! Helper registry and the `{% call %}` binding of the built-in helpers.
//!
//! A [`HelperSet`] is an immutable name → function map handed to the
//! [`TemplateRenderer`](super::TemplateRenderer) at construction. There is no
//! process-wide registration.

use super::helpers::{self, Branches};
use indexmap::IndexMap;
use minijinja::value::{from_args, Kwargs, Object, ObjectRepr, Value};
use minijinja::{Error, State};
use std::fmt;
use std::sync::Arc;

/// A template helper as seen by the engine.
///
/// Receives the render state and the call arguments; block helpers find their
/// block in the trailing `caller` keyword argument.
pub type HelperFn =
    Arc<dyn Fn(&State<'_, '_>, &[Value]) -> Result<Value, Error> + Send + Sync + 'static>;

/// Named helpers available to templates.
#[derive(Clone, Default)]
pub struct HelperSet {
    helpers: IndexMap<String, HelperFn>,
}

impl fmt::Debug for HelperSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HelperSet")
            .field("helpers", &self.names())
            .finish()
    }
}

impl HelperSet {
    /// A set with no helpers.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in helpers.
    #[must_use]
    pub fn builtin() -> Self {
        Self::empty()
            .with_helper("arrayContains", array_contains_helper)
            .with_helper("compare", compare_helper)
            .with_helper("lowerFirst", lower_first_helper)
            .with_helper("upperFirst", upper_first_helper)
            .with_helper("lowercase", lowercase_helper)
            .with_helper("uppercase", uppercase_helper)
            .with_helper("capsplit", capsplit_helper)
            .with_helper("property", property_helper)
            .with_helper("withContext", with_context_helper)
            .with_helper("withDef", with_def_helper)
    }

    /// Add or replace a helper. A helper named like a built-in shadows it.
    #[must_use]
    pub fn with_helper<F>(mut self, name: impl Into<String>, helper: F) -> Self
    where
        F: Fn(&State<'_, '_>, &[Value]) -> Result<Value, Error> + Send + Sync + 'static,
    {
        self.helpers.insert(name.into(), Arc::new(helper));
        self
    }

    /// Merge `other` into this set; helpers from `other` win on name clashes.
    #[must_use]
    pub fn merge(mut self, other: HelperSet) -> Self {
        self.helpers.extend(other.helpers);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&HelperFn> {
        self.helpers.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.helpers.contains_key(name)
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.helpers.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HelperFn)> {
        self.helpers.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.helpers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.helpers.is_empty()
    }
}

/// Engine object wrapping a [`HelperFn`] so it can be registered as a callable
/// global.
pub(crate) struct HelperObject {
    name: String,
    helper: HelperFn,
}

impl HelperObject {
    pub(crate) fn new(name: &str, helper: HelperFn) -> Self {
        HelperObject {
            name: name.to_string(),
            helper,
        }
    }
}

impl fmt::Debug for HelperObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<helper {}>", self.name)
    }
}

impl Object for HelperObject {
    fn repr(self: &Arc<Self>) -> ObjectRepr {
        ObjectRepr::Plain
    }

    fn call(self: &Arc<Self>, state: &State<'_, '_>, args: &[Value]) -> Result<Value, Error> {
        (self.helper)(state, args)
    }
}

/// [`Branches`] backed by the body of a `{% call %}` block.
///
/// Branching helpers invoke the body as `caller(context, matched)`; text
/// helpers invoke it with no arguments.
struct CallerBlocks<'s, 'a, 'env> {
    state: &'s State<'a, 'env>,
    caller: Value,
    pass_context: bool,
}

impl<'s, 'a, 'env> CallerBlocks<'s, 'a, 'env> {
    fn caller(kwargs: &Kwargs) -> Result<Value, Error> {
        let caller: Value = kwargs.get("caller")?;
        kwargs.assert_all_used()?;
        Ok(caller)
    }

    fn branching(state: &'s State<'a, 'env>, kwargs: &Kwargs) -> Result<Self, Error> {
        Ok(CallerBlocks {
            state,
            caller: Self::caller(kwargs)?,
            pass_context: true,
        })
    }

    fn text(state: &'s State<'a, 'env>, kwargs: &Kwargs) -> Result<Self, Error> {
        Ok(CallerBlocks {
            state,
            caller: Self::caller(kwargs)?,
            pass_context: false,
        })
    }

    fn invoke(&self, context: &Value, matched: bool) -> Result<String, Error> {
        let rv = if self.pass_context {
            self.caller
                .call(self.state, &[context.clone(), Value::from(matched)])?
        } else {
            self.caller.call(self.state, &[])?
        };
        Ok(rv.to_string())
    }
}

impl Branches for CallerBlocks<'_, '_, '_> {
    fn primary(&self, context: &Value) -> Result<String, Error> {
        self.invoke(context, true)
    }

    fn alternate(&self, context: &Value) -> Result<String, Error> {
        self.invoke(context, false)
    }
}

fn array_contains_helper(state: &State<'_, '_>, args: &[Value]) -> Result<Value, Error> {
    let (array, value, kwargs): (Value, Value, Kwargs) = from_args(args)?;
    let blocks = CallerBlocks::branching(state, &kwargs)?;
    helpers::array_contains(&array, &value, &Value::UNDEFINED, &blocks).map(Value::from_safe_string)
}

fn compare_helper(state: &State<'_, '_>, args: &[Value]) -> Result<Value, Error> {
    let (lvalue, operator, rvalue, kwargs): (Value, String, Value, Kwargs) = from_args(args)?;
    let blocks = CallerBlocks::branching(state, &kwargs)?;
    helpers::compare(&lvalue, &operator, &rvalue, &Value::UNDEFINED, &blocks)
        .map(Value::from_safe_string)
}

fn lower_first_helper(state: &State<'_, '_>, args: &[Value]) -> Result<Value, Error> {
    let (kwargs,): (Kwargs,) = from_args(args)?;
    helpers::lower_first(&CallerBlocks::text(state, &kwargs)?).map(Value::from_safe_string)
}

fn upper_first_helper(state: &State<'_, '_>, args: &[Value]) -> Result<Value, Error> {
    let (kwargs,): (Kwargs,) = from_args(args)?;
    helpers::upper_first(&CallerBlocks::text(state, &kwargs)?).map(Value::from_safe_string)
}

fn lowercase_helper(state: &State<'_, '_>, args: &[Value]) -> Result<Value, Error> {
    let (kwargs,): (Kwargs,) = from_args(args)?;
    helpers::lowercase(&CallerBlocks::text(state, &kwargs)?).map(Value::from_safe_string)
}

fn uppercase_helper(state: &State<'_, '_>, args: &[Value]) -> Result<Value, Error> {
    let (kwargs,): (Kwargs,) = from_args(args)?;
    helpers::uppercase(&CallerBlocks::text(state, &kwargs)?).map(Value::from_safe_string)
}

fn capsplit_helper(state: &State<'_, '_>, args: &[Value]) -> Result<Value, Error> {
    let (joiner, kwargs): (String, Kwargs) = from_args(args)?;
    helpers::capsplit(&joiner, &CallerBlocks::text(state, &kwargs)?).map(Value::from_safe_string)
}

fn property_helper(state: &State<'_, '_>, args: &[Value]) -> Result<Value, Error> {
    let (context, name, prop_name, kwargs): (Value, String, String, Kwargs) = from_args(args)?;
    let blocks = CallerBlocks::branching(state, &kwargs)?;
    helpers::property(&context, &name, &prop_name, &blocks).map(Value::from_safe_string)
}

fn with_context_helper(state: &State<'_, '_>, args: &[Value]) -> Result<Value, Error> {
    let (variable, kwargs): (Value, Kwargs) = from_args(args)?;
    let blocks = CallerBlocks::branching(state, &kwargs)?;
    helpers::with_context(&variable, &blocks).map(Value::from_safe_string)
}

fn with_def_helper(state: &State<'_, '_>, args: &[Value]) -> Result<Value, Error> {
    let (property, definition_map, kwargs): (Value, Value, Kwargs) = from_args(args)?;
    let blocks = CallerBlocks::branching(state, &kwargs)?;
    helpers::with_definition(&property, &definition_map, &property, &blocks)
        .map(Value::from_safe_string)
}
