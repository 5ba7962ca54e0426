//! Generator configuration.
//!
//! Maps template identifiers to output rules. Loadable from YAML, JSON or
//! TOML; keys follow the camelCase names used in contract tooling:
//!
//! ```yaml
//! perDefinition:
//!   ./templates/definition.js.j2:
//!     target: ./definitions
//!     extension: .js
//! perPath:
//!   ./templates/controller.js.j2:
//!     target: ./controllers
//!     extension: .js
//!     groupBy: x-swagger-router-controller
//!     operations: [get, put, post, delete]
//!     implementationPath: ../implementation
//! ```

use crate::contract::DEFAULT_VERBS;
use crate::error::{GenError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// Per-definition template rule: one artifact per type definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionSpec {
    /// Output directory, relative to the output root
    #[serde(default)]
    pub target: String,
    /// File suffix appended to the lowercased definition name
    #[serde(default)]
    pub extension: String,
    /// Additional keys, passed to templates untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_operations() -> Vec<String> {
    DEFAULT_VERBS.iter().map(|v| v.to_string()).collect()
}

/// Per-route template rule: one artifact per route group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RouteSpec {
    /// Output directory, relative to the output root
    #[serde(default)]
    pub target: String,
    /// File suffix appended to the group file name
    #[serde(default)]
    pub extension: String,
    /// Field holding the grouping value, at operation or path level
    pub group_by: String,
    /// Verbs to include, in iteration order
    #[serde(default = "default_operations")]
    pub operations: Vec<String>,
    /// Location of hand-written implementations, for templates only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementation_path: Option<String>,
    /// Path from generated controllers to generated definitions, for templates only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defs_relative_to_controller: Option<String>,
    /// Additional keys, passed to templates untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RouteSpec {
    /// A route rule with the default verb set.
    pub fn new(
        target: impl Into<String>,
        extension: impl Into<String>,
        group_by: impl Into<String>,
    ) -> Self {
        RouteSpec {
            target: target.into(),
            extension: extension.into(),
            group_by: group_by.into(),
            operations: default_operations(),
            implementation_path: None,
            defs_relative_to_controller: None,
            extra: Map::new(),
        }
    }

    #[must_use]
    pub fn with_operations<I, S>(mut self, operations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.operations = operations.into_iter().map(Into::into).collect();
        self
    }
}

impl DefinitionSpec {
    pub fn new(target: impl Into<String>, extension: impl Into<String>) -> Self {
        DefinitionSpec {
            target: target.into(),
            extension: extension.into(),
            extra: Map::new(),
        }
    }
}

/// Template rules for one generator run.
///
/// Both maps keep their configured order, which is the emission order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorConfig {
    #[serde(default)]
    pub per_definition: IndexMap<String, DefinitionSpec>,
    #[serde(default)]
    pub per_path: IndexMap<String, RouteSpec>,
}

impl GeneratorConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn per_definition(mut self, template: impl Into<String>, spec: DefinitionSpec) -> Self {
        self.per_definition.insert(template.into(), spec);
        self
    }

    #[must_use]
    pub fn per_path(mut self, template: impl Into<String>, spec: RouteSpec) -> Self {
        self.per_path.insert(template.into(), spec);
        self
    }

    /// True when no template rule is configured; a run is then a no-op.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.per_definition.is_empty() && self.per_path.is_empty()
    }

    /// Every configured template identifier, definitions first.
    pub fn templates(&self) -> impl Iterator<Item = &str> {
        self.per_definition
            .keys()
            .chain(self.per_path.keys())
            .map(String::as_str)
    }

    /// Check rule fields the pipeline depends on.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::Config`] for a route rule with an empty `groupBy`.
    pub fn validate(&self) -> Result<()> {
        for (template, spec) in &self.per_path {
            if spec.group_by.trim().is_empty() {
                return Err(GenError::Config(format!(
                    "perPath `{template}`: groupBy must not be empty"
                )));
            }
        }
        Ok(())
    }

    /// Parse YAML (or JSON) configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::Config`] if the text does not describe a valid config.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: GeneratorConfig =
            serde_yaml::from_str(text).map_err(|e| GenError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse TOML configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::Config`] if the text does not describe a valid config.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: GeneratorConfig =
            toml::from_str(text).map_err(|e| GenError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file; `.toml` files are read as TOML, anything
    /// else as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::Config`] if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| GenError::Config(format!("cannot read {}: {e}", path.display())))?;
        let is_toml = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("toml"))
            .unwrap_or(false);
        let parsed = if is_toml {
            Self::from_toml_str(&text)
        } else {
            Self::from_yaml_str(&text)
        };
        parsed.map_err(|e| match e {
            GenError::Config(reason) => GenError::Config(format!("{}: {reason}", path.display())),
            other => other,
        })
    }
}

/// Template-facing `options` value of a rule.
pub(crate) fn options_value<T: Serialize>(spec: &T) -> Result<Value> {
    serde_json::to_value(spec).map_err(|e| GenError::Config(e.to_string()))
}
