use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Root of a parsed contract document.
///
/// Immutable once built; lives for the processing of one document.
#[derive(Debug, Clone)]
pub struct ContractModel {
    /// The whole document as parsed, exposed to templates as `model`
    pub document: Value,
    /// Path string → path item, in document order
    pub paths: IndexMap<String, PathItem>,
    /// Definition name → raw schema body, in document order
    pub definitions: IndexMap<String, Value>,
}

impl ContractModel {
    /// Number of operations across all paths whose key is one of `verbs`.
    #[must_use]
    pub fn operation_count(&self, verbs: &[String]) -> usize {
        self.paths
            .values()
            .map(|item| verbs.iter().filter(|v| item.operation(v).is_some()).count())
            .sum()
    }
}

/// One URL path entry of the contract.
#[derive(Debug, Clone)]
pub struct PathItem {
    /// The path string, e.g. `/pets/{petId}`
    pub path: String,
    /// The raw path object (operations keyed by verb plus path-level fields)
    pub raw: Map<String, Value>,
}

impl PathItem {
    /// Build a path item; anything that is not a mapping is treated as empty.
    pub fn new(path: impl Into<String>, raw: &Value) -> Self {
        PathItem {
            path: path.into(),
            raw: raw.as_object().cloned().unwrap_or_default(),
        }
    }

    /// The operation registered under `verb`, if any.
    #[must_use]
    pub fn operation(&self, verb: &str) -> Option<&Value> {
        self.raw.get(verb)
    }

    /// A path-level field, e.g. the grouping key shared by all operations.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.raw.get(name)
    }

    /// The path object annotated with its own `pathString`.
    #[must_use]
    pub fn to_context(&self) -> Value {
        let mut raw = self.raw.clone();
        raw.insert("pathString".to_string(), Value::String(self.path.clone()));
        Value::Object(raw)
    }
}

/// A named schema entry, annotated for template use.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDefinition {
    /// Definition name, unique within a contract
    pub name: String,
    /// Canonical pointer, `#/definitions/<name>`
    pub reference_key: String,
    /// Schema body carrying `definitionName` and `referencePath`
    pub body: Value,
}
