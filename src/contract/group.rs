use super::types::{ContractModel, PathItem};
use crate::error::{GenError, Result};
use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

/// Verbs used when a route rule does not list its own.
pub const DEFAULT_VERBS: [&str; 4] = ["get", "put", "post", "delete"];

/// One verb + path combination selected for rendering.
///
/// Borrows from the [`ContractModel`]; the owning path item is a
/// back-reference.
#[derive(Debug, Clone, Copy)]
pub struct OperationEntry<'a> {
    /// HTTP verb key, e.g. `get`
    pub verb: &'a str,
    /// Path item the operation belongs to
    pub path: &'a PathItem,
    /// Raw operation object
    pub operation: &'a Value,
}

impl OperationEntry<'_> {
    /// The operation annotated with `operationString`, `pathString` and its
    /// owning `pathDef`, as exposed to templates in `members`.
    #[must_use]
    pub fn to_context(&self) -> Value {
        let mut op = self.operation.as_object().cloned().unwrap_or_default();
        op.insert(
            "operationString".to_string(),
            Value::String(self.verb.to_string()),
        );
        op.insert("pathString".to_string(), Value::String(self.path.path.clone()));
        op.insert("pathDef".to_string(), self.path.to_context());
        Value::Object(op)
    }
}

/// Operations sharing one resolved grouping value.
#[derive(Debug, Clone)]
pub struct RouteGroup<'a> {
    /// Resolved grouping value, untrimmed
    pub key: String,
    /// Members in path order, then configured verb order
    pub members: Vec<OperationEntry<'a>>,
}

/// Groups in order of first appearance.
#[derive(Debug, Clone, Default)]
pub struct RouteGroups<'a> {
    groups: IndexMap<String, Vec<OperationEntry<'a>>>,
}

impl<'a> RouteGroups<'a> {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[OperationEntry<'a>]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    /// Groups in construction order.
    pub fn iter(&self) -> impl Iterator<Item = RouteGroup<'a>> + '_ {
        self.groups.iter().map(|(key, members)| RouteGroup {
            key: key.clone(),
            members: members.clone(),
        })
    }

    /// Group keys in construction order.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        self.groups.keys().map(String::as_str).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// A grouping value is usable when it is a non-null scalar.
///
/// Presence is checked explicitly: an empty string is a valid (if odd) group
/// key and does not fall back to the path-level value.
fn group_value(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Bucket the operations of `model` by the `group_by` field.
///
/// Only verbs listed in `verbs` are considered; they are visited in the
/// configured order for each path, and duplicates in `verbs` are ignored.
/// Each operation's group is its own `group_by` value when present, otherwise
/// the path-level `group_by` value.
///
/// # Errors
///
/// Returns [`GenError::Grouping`] for the first included operation that has
/// no grouping value at either level.
pub fn group_operations<'a>(
    model: &'a ContractModel,
    group_by: &str,
    verbs: &[String],
) -> Result<RouteGroups<'a>> {
    let mut allowed: Vec<&str> = Vec::with_capacity(verbs.len());
    for verb in verbs {
        if !allowed.contains(&verb.as_str()) {
            allowed.push(verb.as_str());
        }
    }

    let mut groups: IndexMap<String, Vec<OperationEntry<'a>>> = IndexMap::new();
    for (path_string, item) in &model.paths {
        debug!(path = %path_string, "grouping path");
        let path_key = group_value(item.field(group_by));

        for verb in &allowed {
            let Some((verb, operation)) = item.raw.iter().find(|(k, _)| k.as_str() == *verb)
            else {
                continue;
            };
            let op_key = operation
                .as_object()
                .and_then(|op| group_value(op.get(group_by)));
            let key = op_key
                .or_else(|| path_key.clone())
                .ok_or_else(|| GenError::Grouping {
                    path: path_string.clone(),
                    verb: verb.clone(),
                    group_by: group_by.to_string(),
                })?;
            debug!(path = %path_string, verb = %verb, group = %key, "assigned operation");
            groups.entry(key).or_default().push(OperationEntry {
                verb: verb.as_str(),
                path: item,
                operation,
            });
        }
    }

    Ok(RouteGroups { groups })
}
