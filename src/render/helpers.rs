//! Built-in template helpers in their engine-independent form.
//!
//! Every helper takes its arguments plus a [`Branches`] implementation standing
//! in for the block it was called with. Branching helpers pick the primary or
//! alternate branch and the context handed to it; text helpers render the
//! primary branch and transform its output. The engine binding lives in
//! [`super::registry`].

use minijinja::value::{Value, ValueKind};
use minijinja::{Error, ErrorKind};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// The block a helper was invoked with.
pub trait Branches {
    /// Render the primary block against `context`.
    fn primary(&self, context: &Value) -> Result<String, Error>;
    /// Render the alternate (`else`) block against `context`.
    fn alternate(&self, context: &Value) -> Result<String, Error>;
}

/// [`Branches`] backed by two closures.
pub struct Blocks<P, A> {
    primary: P,
    alternate: A,
}

impl<P, A> Blocks<P, A>
where
    P: Fn(&Value) -> Result<String, Error>,
    A: Fn(&Value) -> Result<String, Error>,
{
    pub fn new(primary: P, alternate: A) -> Self {
        Blocks { primary, alternate }
    }
}

impl<P, A> Branches for Blocks<P, A>
where
    P: Fn(&Value) -> Result<String, Error>,
    A: Fn(&Value) -> Result<String, Error>,
{
    fn primary(&self, context: &Value) -> Result<String, Error> {
        (self.primary)(context)
    }

    fn alternate(&self, context: &Value) -> Result<String, Error> {
        (self.alternate)(context)
    }
}

fn is_absent(value: &Value) -> bool {
    value.is_undefined() || value.is_none()
}

/// `container[key]`, or `None` when missing, undefined or none.
fn lookup(container: &Value, key: &Value) -> Option<Value> {
    container.get_item(key).ok().filter(|v| !is_absent(v))
}

/// Presence test used by `withContext`: only undefined, none, `false`, `0`
/// and `""` are falsy. Mappings and sequences always count, even empty.
fn is_present(value: &Value) -> bool {
    match value.kind() {
        ValueKind::Undefined | ValueKind::None => false,
        ValueKind::Bool | ValueKind::Number | ValueKind::String => value.is_true(),
        _ => true,
    }
}

fn empty_map() -> Value {
    Value::from(BTreeMap::<String, Value>::new())
}

/// Primary branch when `array` is a sequence containing `value`.
///
/// # Errors
///
/// Propagates errors raised by the selected branch.
pub fn array_contains(
    array: &Value,
    value: &Value,
    this: &Value,
    blocks: &dyn Branches,
) -> Result<String, Error> {
    let found = array.kind() == ValueKind::Seq && array.try_iter()?.any(|item| &item == value);
    if found {
        blocks.primary(this)
    } else {
        blocks.alternate(this)
    }
}

/// Ordering between two numbers or two strings; anything else is unordered.
fn ordering(lvalue: &Value, rvalue: &Value) -> Option<Ordering> {
    if lvalue.is_number() && rvalue.is_number() {
        let l = f64::try_from(lvalue.clone()).ok()?;
        let r = f64::try_from(rvalue.clone()).ok()?;
        return l.partial_cmp(&r);
    }
    match (lvalue.as_str(), rvalue.as_str()) {
        (Some(l), Some(r)) => Some(l.cmp(r)),
        _ => None,
    }
}

/// Type name of a value using the vocabulary of the `typeof` operator.
#[must_use]
pub fn type_name(value: &Value) -> &'static str {
    match value.kind() {
        ValueKind::Undefined => "undefined",
        ValueKind::Bool => "boolean",
        ValueKind::Number => "number",
        ValueKind::String => "string",
        _ => "object",
    }
}

/// Evaluate `lvalue <operator> rvalue`.
///
/// Supported operators: `==`, `===`, `!=`, `<`, `>`, `<=`, `>=` and `typeof`
/// (true when the type name of `lvalue` equals `rvalue`). Ordering operators
/// only hold between two numbers or two strings.
///
/// # Errors
///
/// Returns [`ErrorKind::InvalidOperation`] for an unknown operator.
pub fn evaluate(lvalue: &Value, operator: &str, rvalue: &Value) -> Result<bool, Error> {
    let ord = || ordering(lvalue, rvalue);
    Ok(match operator {
        "==" | "===" => lvalue == rvalue,
        "!=" => lvalue != rvalue,
        "<" => ord() == Some(Ordering::Less),
        ">" => ord() == Some(Ordering::Greater),
        "<=" => matches!(ord(), Some(Ordering::Less | Ordering::Equal)),
        ">=" => matches!(ord(), Some(Ordering::Greater | Ordering::Equal)),
        "typeof" => rvalue.as_str() == Some(type_name(lvalue)),
        other => {
            return Err(Error::new(
                ErrorKind::InvalidOperation,
                format!("unknown compare operator: {other}"),
            ))
        }
    })
}

/// Primary branch when the comparison holds, alternate otherwise.
///
/// # Errors
///
/// Unknown operators and branch errors.
pub fn compare(
    lvalue: &Value,
    operator: &str,
    rvalue: &Value,
    this: &Value,
    blocks: &dyn Branches,
) -> Result<String, Error> {
    if evaluate(lvalue, operator, rvalue)? {
        blocks.primary(this)
    } else {
        blocks.alternate(this)
    }
}

fn map_first_char(s: &str, f: impl Fn(char) -> String) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => f(first) + chars.as_str(),
        None => String::new(),
    }
}

/// Block text with its first letter lowercased.
pub fn lower_first(blocks: &dyn Branches) -> Result<String, Error> {
    let text = blocks.primary(&Value::UNDEFINED)?;
    Ok(map_first_char(&text, |c| c.to_lowercase().collect()))
}

/// Block text with its first letter uppercased.
pub fn upper_first(blocks: &dyn Branches) -> Result<String, Error> {
    let text = blocks.primary(&Value::UNDEFINED)?;
    Ok(map_first_char(&text, |c| c.to_uppercase().collect()))
}

/// Block text lowercased.
pub fn lowercase(blocks: &dyn Branches) -> Result<String, Error> {
    Ok(blocks.primary(&Value::UNDEFINED)?.to_lowercase())
}

/// Block text uppercased.
pub fn uppercase(blocks: &dyn Branches) -> Result<String, Error> {
    Ok(blocks.primary(&Value::UNDEFINED)?.to_uppercase())
}

/// Split `text` before every ASCII uppercase letter and rejoin with `joiner`.
///
/// A leading uppercase letter does not produce an empty first segment, and
/// runs of capitals split letter by letter: `myHTTPRequest` joined with `-`
/// becomes `my-H-T-T-P-Request`.
#[must_use]
pub fn split_on_capitals(text: &str, joiner: &str) -> String {
    let mut out = String::with_capacity(text.len() + joiner.len() * 4);
    for (i, c) in text.char_indices() {
        if i > 0 && c.is_ascii_uppercase() {
            out.push_str(joiner);
        }
        out.push(c);
    }
    out
}

/// Block text split on capital letters and rejoined with `joiner`.
pub fn capsplit(joiner: &str, blocks: &dyn Branches) -> Result<String, Error> {
    Ok(split_on_capitals(&blocks.primary(&Value::UNDEFINED)?, joiner))
}

/// Copy `context[name]` to `context[prop_name]` and render the primary branch
/// with the extended context; render the alternate branch with the untouched
/// context when `name` is absent or null.
///
/// Lets templates reach properties whose names the engine cannot express,
/// such as `x-swagger-router-controller`.
///
/// # Errors
///
/// Propagates branch errors.
pub fn property(
    context: &Value,
    name: &str,
    prop_name: &str,
    blocks: &dyn Branches,
) -> Result<String, Error> {
    let Some(value) = lookup(context, &Value::from(name)) else {
        return blocks.alternate(context);
    };

    let mut pairs: Vec<(Value, Value)> = Vec::new();
    if context.kind() == ValueKind::Map {
        for key in context.try_iter()? {
            if key.as_str() == Some(prop_name) {
                continue;
            }
            let item = context.get_item(&key)?;
            pairs.push((key, item));
        }
    }
    pairs.push((Value::from(prop_name), value));
    blocks.primary(&Value::from_iter(pairs))
}

/// Render the primary branch with `variable` as context when it is truthy,
/// otherwise the alternate branch with an empty mapping.
pub fn with_context(variable: &Value, blocks: &dyn Branches) -> Result<String, Error> {
    if is_present(variable) {
        blocks.primary(variable)
    } else {
        blocks.alternate(&empty_map())
    }
}

/// Reference key carried by `property`: the string itself, or the `$ref` of a
/// schema mapping.
fn reference_of(property: &Value) -> Option<Value> {
    if property.as_str().is_some() {
        return Some(property.clone());
    }
    if property.kind() == ValueKind::Map {
        return lookup(property, &Value::from("$ref")).filter(|v| v.as_str().is_some());
    }
    None
}

/// Render the primary branch with the definition `property` refers to, or the
/// alternate branch with `this` when the reference does not resolve.
///
/// `property` is either a reference key (`#/definitions/Pet`) or a schema
/// mapping holding a `$ref`.
pub fn with_definition(
    property: &Value,
    definition_map: &Value,
    this: &Value,
    blocks: &dyn Branches,
) -> Result<String, Error> {
    let definition = reference_of(property)
        .and_then(|key| lookup(definition_map, &key))
        .filter(Value::is_true);
    match definition {
        Some(def) => blocks.primary(&def),
        None => blocks.alternate(this),
    }
}
