use super::types::{ContractModel, TypeDefinition};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::debug;

/// Prefix of every definition reference key.
pub const DEFINITIONS_POINTER: &str = "#/definitions/";

/// Canonical reference key of a definition name.
#[must_use]
pub fn reference_key(name: &str) -> String {
    format!("{DEFINITIONS_POINTER}{name}")
}

/// Lookup table from reference key (`#/definitions/<name>`) to definition.
///
/// Built once per document and read-only afterwards. Iteration follows the
/// document order of the `definitions` mapping.
#[derive(Debug, Clone, Default)]
pub struct DefinitionIndex {
    entries: IndexMap<String, TypeDefinition>,
}

impl DefinitionIndex {
    /// Index every definition of `model`.
    ///
    /// Each definition body is copied and annotated with `definitionName` and
    /// `referencePath`. A body that is not a mapping is replaced by a mapping
    /// holding only those two annotations.
    #[must_use]
    pub fn build(model: &ContractModel) -> Self {
        let mut entries = IndexMap::with_capacity(model.definitions.len());
        for (name, raw) in &model.definitions {
            let key = reference_key(name);
            debug!(definition = %name, reference = %key, "indexing definition");
            let mut body = raw.as_object().cloned().unwrap_or_else(Map::new);
            body.insert("definitionName".to_string(), Value::String(name.clone()));
            body.insert("referencePath".to_string(), Value::String(key.clone()));
            entries.insert(
                key.clone(),
                TypeDefinition {
                    name: name.clone(),
                    reference_key: key,
                    body: Value::Object(body),
                },
            );
        }
        DefinitionIndex { entries }
    }

    /// Look a definition up by its reference key.
    #[must_use]
    pub fn get(&self, reference_key: &str) -> Option<&TypeDefinition> {
        self.entries.get(reference_key)
    }

    /// Definitions in document order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.entries.values()
    }

    /// Reference keys in document order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The index as a JSON object, exposed to templates as `definitionMap`.
    #[must_use]
    pub fn to_context(&self) -> Value {
        Value::Object(
            self.entries
                .iter()
                .map(|(k, def)| (k.clone(), def.body.clone()))
                .collect(),
        )
    }
}
