#![deny(missing_docs)]

//! # Document Shims
//!
//! Serde structures acting as an Intermediate Deserialization Layer for
//! Swagger 2.0 documents. They map directly to the YAML/JSON objects and are
//! never mutated after parsing.

use crate::oas::models::HttpMethod;
use indexmap::IndexMap;
use serde::de::Error as DeError;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// A Schema Object, inline or a `$ref`.
///
/// Swagger 2.0 puts `$ref` on the same object as the schema keywords, so a
/// single struct covers both the "schema" and the "reference" case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// `$ref` target, e.g. `#/definitions/User`.
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Primitive or structural type (`string`, `object`, `array`, `file`, ...).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    /// Format modifier (`int32`, `date-time`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Closed value set.
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    /// Literal default value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Object properties.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, Schema>,
    /// Names of required properties.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    /// Array item schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    /// Dictionary value schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<AdditionalProperties>,
    /// Composition members.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<Schema>,
    /// Explicit type name override.
    #[serde(rename = "x-model-name", default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    /// Validation keyword, read but not enforced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    /// Validation keyword, read but not enforced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    /// Validation keyword, read but not enforced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    /// Validation keyword, read but not enforced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    /// Validation keyword, read but not enforced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Any other keyword (`example`, `readOnly`, `x-...`).
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Schema {
    /// A schema that is only a `$ref`.
    pub fn reference(target: impl Into<String>) -> Self {
        Self {
            reference: Some(target.into()),
            ..Self::default()
        }
    }

    /// A schema with only a `type` (and optional `format`).
    pub fn primitive(schema_type: &str, format: Option<&str>) -> Self {
        Self {
            schema_type: Some(schema_type.to_string()),
            format: format.map(str::to_string),
            ..Self::default()
        }
    }

    /// The declared type, if any.
    pub fn type_name(&self) -> Option<&str> {
        self.schema_type.as_deref()
    }

    /// Whether the schema declares a non-empty `enum`.
    pub fn is_enum(&self) -> bool {
        self.enum_values.as_ref().is_some_and(|v| !v.is_empty())
    }

    /// Whether the schema describes a composite object with named fields.
    pub fn has_object_shape(&self) -> bool {
        !self.properties.is_empty() || !self.all_of.is_empty()
    }
}

/// `additionalProperties`: either a boolean or a value schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    /// `additionalProperties: true|false`.
    Bool(bool),
    /// `additionalProperties: { ... }`.
    Schema(Box<Schema>),
}

/// A Parameter Object (inline or `$ref` to `#/parameters/...`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    /// `$ref` target, e.g. `#/parameters/Limit`.
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Name of the parameter.
    #[serde(default)]
    pub name: String,
    /// Location (`path`, `query`, `header`, `formData`, `body`).
    #[serde(rename = "in", default)]
    pub location: String,
    /// A brief description of the parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the parameter is required.
    #[serde(default)]
    pub required: bool,
    /// Body schema (only for `in: body`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
    /// Primitive type for non-body parameters.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    /// Format modifier for non-body parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Array item schema for non-body parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    /// Closed value set for non-body parameters.
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    /// Literal default value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Collection format (`csv`, `multi`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_format: Option<String>,
    /// Any other keyword.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Parameter {
    /// Builds the equivalent Schema Object of a non-body parameter so that it
    /// can go through the same type resolution as every other schema.
    pub fn as_schema(&self) -> Schema {
        if let Some(schema) = &self.schema {
            return schema.clone();
        }
        Schema {
            schema_type: self.schema_type.clone(),
            format: self.format.clone(),
            description: self.description.clone(),
            enum_values: self.enum_values.clone(),
            default: self.default.clone(),
            items: self.items.clone(),
            ..Schema::default()
        }
    }
}

/// A Response Object (inline or `$ref` to `#/responses/...`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// `$ref` target, e.g. `#/responses/NotFound`.
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Body schema. `None` means an empty body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
    /// Response headers, kept opaque.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, Value>,
}

/// An Operation Object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Unique operation identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    /// Short summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Long description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Grouping tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Accepted request mime types (overrides the document level list).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumes: Option<Vec<String>>,
    /// Produced response mime types (overrides the document level list).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub produces: Option<Vec<String>>,
    /// Operation level parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    /// Responses keyed by status code (or `default`).
    #[serde(default)]
    pub responses: IndexMap<String, Response>,
    /// Whether the operation is deprecated.
    #[serde(default)]
    pub deprecated: bool,
    /// Specification extensions (`x-internal`, ...).
    #[serde(flatten)]
    pub extensions: BTreeMap<String, Value>,
}

impl Operation {
    /// `x-internal: true` marks an operation as internal.
    pub fn is_marked_internal(&self) -> bool {
        self.extensions
            .get("x-internal")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

/// A Path Item Object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathItem {
    /// GET operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    /// PUT operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    /// POST operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    /// DELETE operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
    /// OPTIONS operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Operation>,
    /// HEAD operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<Operation>,
    /// PATCH operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
    /// Parameters shared by every operation of this path.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
}

impl PathItem {
    /// Operations in a fixed method order.
    pub fn operations(&self) -> Vec<(HttpMethod, &Operation)> {
        [
            (HttpMethod::Get, &self.get),
            (HttpMethod::Put, &self.put),
            (HttpMethod::Post, &self.post),
            (HttpMethod::Delete, &self.delete),
            (HttpMethod::Options, &self.options),
            (HttpMethod::Head, &self.head),
            (HttpMethod::Patch, &self.patch),
        ]
        .into_iter()
        .filter_map(|(method, op)| op.as_ref().map(|o| (method, o)))
        .collect()
    }
}

/// The Paths Object, with `x-` extensions split off.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paths {
    /// Parsed path items keyed by path template.
    pub items: IndexMap<String, PathItem>,
    /// Spec extensions attached to the Paths Object (x-...).
    pub extensions: BTreeMap<String, Value>,
}

impl<'de> Deserialize<'de> for Paths {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = IndexMap::<String, Value>::deserialize(deserializer)?;
        let mut items = IndexMap::new();
        let mut extensions = BTreeMap::new();

        for (key, value) in raw {
            if key.starts_with("x-") {
                extensions.insert(key, value);
                continue;
            }
            let path_item = serde_json::from_value::<PathItem>(value).map_err(|e| {
                DeError::custom(format!("Failed to parse path item '{}': {}", key, e))
            })?;
            items.insert(key, path_item);
        }

        Ok(Self { items, extensions })
    }
}

impl Serialize for Paths {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.items.len() + self.extensions.len()))?;
        for (key, value) in &self.items {
            map.serialize_entry(key, value)?;
        }
        for (key, value) in &self.extensions {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Metadata about the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Info {
    /// The title of the API.
    #[serde(default, deserialize_with = "scalar_string")]
    pub title: String,
    /// The version of the API.
    #[serde(default, deserialize_with = "scalar_string")]
    pub version: String,
    /// A description of the API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Accepts `1.0`, `"1.0"` or `1` for fields that are strings in the
/// specification but are frequently written unquoted in YAML.
pub(crate) fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(DeError::custom(format!(
            "expected a scalar value, found {}",
            other
        ))),
    }
}

/// Optional variant of [`scalar_string`].
pub(crate) fn optional_scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = scalar_string(deserializer)?;
    Ok((!value.is_empty()).then_some(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_reference_and_keywords() {
        let yaml = r#"
type: object
required: [id]
x-model-name: Account
properties:
  id: { type: integer, format: int64 }
  owner: { $ref: '#/definitions/User' }
  tags:
    type: array
    items: { type: string }
  meta:
    type: object
    additionalProperties: true
example: { id: 1 }
"#;
        let schema: Schema = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(schema.model_name.as_deref(), Some("Account"));
        assert_eq!(schema.properties.len(), 4);
        assert_eq!(
            schema.properties["owner"].reference.as_deref(),
            Some("#/definitions/User")
        );
        assert_eq!(
            schema.properties["meta"].additional_properties,
            Some(AdditionalProperties::Bool(true))
        );
        assert!(schema.extra.contains_key("example"));
        assert!(schema.has_object_shape());
    }

    #[test]
    fn test_additional_properties_schema() {
        let schema: Schema = serde_yaml::from_str(
            "type: object\nadditionalProperties: { $ref: '#/definitions/Widget' }",
        )
        .unwrap();
        match &schema.additional_properties {
            Some(AdditionalProperties::Schema(inner)) => {
                assert_eq!(inner.reference.as_deref(), Some("#/definitions/Widget"))
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(!schema.has_object_shape());
    }

    #[test]
    fn test_parameter_as_schema() {
        let yaml = r#"
name: status
in: query
type: string
enum: [open, closed]
default: open
"#;
        let param: Parameter = serde_yaml::from_str(yaml).unwrap();
        let schema = param.as_schema();
        assert_eq!(schema.type_name(), Some("string"));
        assert!(schema.is_enum());
        assert_eq!(schema.default, Some(Value::String("open".into())));
    }

    #[test]
    fn test_paths_split_extensions() {
        let yaml = r#"
/users:
  get:
    responses: { '200': { description: OK } }
x-internal-note: hidden
"#;
        let paths: Paths = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(paths.items.len(), 1);
        assert!(paths.extensions.contains_key("x-internal-note"));
        let ops = paths.items["/users"].operations();
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].0, HttpMethod::Get);
    }

    #[test]
    fn test_operation_internal_marker() {
        let op: Operation =
            serde_yaml::from_str("x-internal: true\nresponses: {}").unwrap();
        assert!(op.is_marked_internal());
    }

    #[test]
    fn test_unquoted_version_numbers() {
        let info: Info = serde_json::from_value(serde_json::json!({
            "title": "Legacy",
            "version": 1.0
        }))
        .unwrap();
        assert_eq!(info.version, "1.0");
    }
}
