use super::types::{ContractModel, PathItem};
use crate::error::{GenError, Result};
use indexmap::IndexMap;
use serde_json::{Map, Number, Value};
use std::path::Path;
use tracing::debug;

/// Convert a YAML value into JSON, stringifying scalar mapping keys.
///
/// Swagger documents routinely use bare numeric keys (`200:` under
/// `responses`), which JSON objects cannot hold as numbers.
fn yaml_to_json(value: serde_yaml::Value) -> Result<Value> {
    Ok(match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                let f = n.as_f64().unwrap_or(f64::NAN);
                Value::Number(
                    Number::from_f64(f)
                        .ok_or_else(|| GenError::parse(format!("unrepresentable number `{n}`")))?,
                )
            }
        }
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(seq) => Value::Array(
            seq.into_iter()
                .map(yaml_to_json)
                .collect::<Result<Vec<_>>>()?,
        ),
        serde_yaml::Value::Mapping(mapping) => {
            let mut out = Map::with_capacity(mapping.len());
            for (k, v) in mapping {
                out.insert(yaml_key(k)?, yaml_to_json(v)?);
            }
            Value::Object(out)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value)?,
    })
}

fn yaml_key(key: serde_yaml::Value) -> Result<String> {
    match key {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Null => Ok("null".to_string()),
        serde_yaml::Value::Tagged(tagged) => yaml_key(tagged.value),
        other => Err(GenError::parse(format!(
            "unsupported mapping key: {other:?}"
        ))),
    }
}

/// Parse contract text into a [`ContractModel`].
///
/// Accepts YAML or JSON. Only the top-level shape is checked: the document
/// must be a mapping with a `paths` mapping and, optionally, a `definitions`
/// mapping. Everything below is passed through untouched.
///
/// # Errors
///
/// Returns [`GenError::Parse`] when the text is not well-formed or the
/// top-level shape is wrong.
pub fn parse_contract(text: &str) -> Result<ContractModel> {
    let yaml: serde_yaml::Value =
        serde_yaml::from_str(text).map_err(|e| GenError::parse(e.to_string()))?;
    let document = yaml_to_json(yaml)?;

    let root = document
        .as_object()
        .ok_or_else(|| GenError::parse("contract root must be a mapping"))?;

    let paths = match root.get("paths") {
        Some(Value::Object(map)) => map
            .iter()
            .map(|(path, item)| (path.clone(), PathItem::new(path.clone(), item)))
            .collect::<IndexMap<_, _>>(),
        Some(_) => return Err(GenError::parse("`paths` must be a mapping")),
        None => return Err(GenError::parse("missing `paths` mapping")),
    };

    let definitions = match root.get("definitions") {
        Some(Value::Object(map)) => map
            .iter()
            .map(|(name, body)| (name.clone(), body.clone()))
            .collect::<IndexMap<_, _>>(),
        Some(Value::Null) | None => IndexMap::new(),
        Some(_) => return Err(GenError::parse("`definitions` must be a mapping")),
    };

    debug!(
        paths = paths.len(),
        definitions = definitions.len(),
        "parsed contract"
    );

    Ok(ContractModel {
        document,
        paths,
        definitions,
    })
}

/// Read and parse a contract file.
///
/// # Errors
///
/// Returns [`GenError::Parse`] if the file cannot be read or parsed.
pub fn load_contract(path: &Path) -> Result<ContractModel> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| GenError::parse(format!("cannot read {}: {e}", path.display())))?;
    parse_contract(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_contract() {
        let model = parse_contract("paths: {}\n").unwrap();
        assert!(model.paths.is_empty());
        assert!(model.definitions.is_empty());
    }

    #[test]
    fn test_parse_json_contract() {
        let model =
            parse_contract(r#"{"paths": {"/a": {"get": {}}}, "definitions": {"A": {}}}"#).unwrap();
        assert_eq!(model.paths.len(), 1);
        assert!(model.paths["/a"].operation("get").is_some());
        assert_eq!(model.definitions.len(), 1);
    }

    #[test]
    fn test_missing_paths_is_parse_error() {
        let err = parse_contract("definitions: {}\n").unwrap_err();
        assert!(matches!(err, GenError::Parse { .. }));
    }

    #[test]
    fn test_non_mapping_root_is_parse_error() {
        assert!(matches!(
            parse_contract("- a\n- b\n").unwrap_err(),
            GenError::Parse { .. }
        ));
    }

    #[test]
    fn test_malformed_text_is_parse_error() {
        assert!(matches!(
            parse_contract("paths: {unclosed\n").unwrap_err(),
            GenError::Parse { .. }
        ));
    }

    #[test]
    fn test_invalid_definitions_shape() {
        let err = parse_contract("paths: {}\ndefinitions: [1, 2]\n").unwrap_err();
        assert!(err.to_string().contains("definitions"));
    }

    #[test]
    fn test_numeric_keys_are_stringified() {
        let text = r#"
paths:
  /pets:
    get:
      responses:
        200:
          description: ok
"#;
        let model = parse_contract(text).unwrap();
        let op = model.paths["/pets"].operation("get").unwrap();
        assert_eq!(op["responses"]["200"]["description"], "ok");
    }

    #[test]
    fn test_document_order_preserved() {
        let text = "paths: {}\ndefinitions:\n  Zebra: {}\n  Apple: {}\n  Mango: {}\n";
        let model = parse_contract(text).unwrap();
        let names: Vec<_> = model.definitions.keys().cloned().collect();
        assert_eq!(names, vec!["Zebra", "Apple", "Mango"]);
    }

    #[test]
    fn test_null_path_item_is_empty() {
        let model = parse_contract("paths:\n  /ping:\n").unwrap();
        assert!(model.paths["/ping"].raw.is_empty());
    }
}
