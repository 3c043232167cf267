#![deny(missing_docs)]

//! # Model Definitions
//!
//! Named, emittable units of the type graph.

use crate::oas::models::types::ResolvedType;
use crate::oas::naming::{safe_parameter_name, safe_property_name};
use serde::Serialize;

/// A named type handed to the emission layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ModelDefinition {
    /// Closed set of string values.
    Enumeration(EnumDefinition),
    /// Composite type with named fields.
    Object(ObjectDefinition),
    /// Named alias of a non-composite type.
    TypeAlias(AliasDefinition),
    /// One case per response status code.
    ResultVariant(VariantDefinition),
}

impl ModelDefinition {
    /// Type name of the definition.
    pub fn name(&self) -> &str {
        match self {
            ModelDefinition::Enumeration(e) => &e.name,
            ModelDefinition::Object(o) => &o.name,
            ModelDefinition::TypeAlias(a) => &a.name,
            ModelDefinition::ResultVariant(v) => &v.name,
        }
    }

    /// Description, when the source carried one.
    pub fn description(&self) -> Option<&str> {
        match self {
            ModelDefinition::Enumeration(e) => e.description.as_deref(),
            ModelDefinition::Object(o) => o.description.as_deref(),
            ModelDefinition::TypeAlias(a) => a.description.as_deref(),
            ModelDefinition::ResultVariant(_) => None,
        }
    }

    /// Returns the object definition, if this is one.
    pub fn as_object(&self) -> Option<&ObjectDefinition> {
        match self {
            ModelDefinition::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Returns the enumeration definition, if this is one.
    pub fn as_enumeration(&self) -> Option<&EnumDefinition> {
        match self {
            ModelDefinition::Enumeration(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the alias definition, if this is one.
    pub fn as_alias(&self) -> Option<&AliasDefinition> {
        match self {
            ModelDefinition::TypeAlias(a) => Some(a),
            _ => None,
        }
    }

    /// Returns the result variant definition, if this is one.
    pub fn as_variant(&self) -> Option<&VariantDefinition> {
        match self {
            ModelDefinition::ResultVariant(v) => Some(v),
            _ => None,
        }
    }
}

/// A closed set of string values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumDefinition {
    /// Type name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Values, sorted and without duplicates.
    pub values: Vec<String>,
    /// Whether the type is serializable.
    pub is_codable: bool,
    /// Visibility marker.
    pub is_internal_only: bool,
}

/// A composite type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectDefinition {
    /// Type name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Fields sorted by safe property name.
    pub fields: Vec<Field>,
    /// Parents whose fields are merged in by the inheritance pass.
    /// Empty once flattened.
    pub inherits_from: Vec<String>,
    /// Visibility marker.
    pub is_internal_only: bool,
    /// Inline types the fields refer to.
    pub embedded_definitions: Vec<ModelDefinition>,
    /// Whether the type is serializable.
    pub is_codable: bool,
}

impl ObjectDefinition {
    /// Looks up a field by its original (source) name.
    pub fn field(&self, argument_label: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.argument_label == argument_label)
    }

    /// Original names of all fields, in order.
    pub fn field_labels(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.argument_label.as_str()).collect()
    }
}

/// A named alias.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AliasDefinition {
    /// Alias name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Aliased type.
    pub underlying: ResolvedType,
    /// Visibility marker.
    pub is_internal_only: bool,
}

/// A synthesized sum type with one case per response status code.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantDefinition {
    /// Type name (`<Operation>Success` or `<Operation>Error`).
    pub name: String,
    /// Cases in status code order.
    pub cases: Vec<VariantCase>,
    /// Visibility marker.
    pub is_internal_only: bool,
}

/// One case of a [`VariantDefinition`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantCase {
    /// Identifier derived from the status code (`ok`, `created`).
    pub case_name: String,
    /// The status code as written in the document.
    pub status_code: String,
    /// Payload type.
    #[serde(rename = "type")]
    pub resolved_type: ResolvedType,
}

/// A field of an [`ObjectDefinition`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    /// Description.
    pub description: Option<String>,
    /// Field type.
    #[serde(rename = "type")]
    pub resolved_type: ResolvedType,
    /// Whether the field must be present.
    pub required: bool,
    /// The original property name.
    pub argument_label: String,
    /// Keyword-escaped property identifier.
    pub safe_property_name: String,
    /// Keyword-escaped initializer parameter identifier.
    pub safe_parameter_name: String,
    /// Literal default, taken from the primitive type.
    pub default_value: Option<String>,
}

impl Field {
    /// Builds a field, deriving its safe names and default value.
    pub fn new(
        argument_label: &str,
        resolved_type: ResolvedType,
        required: bool,
        description: Option<String>,
    ) -> Self {
        Self {
            description,
            default_value: resolved_type.default_literal(),
            resolved_type,
            required,
            argument_label: argument_label.to_string(),
            safe_property_name: safe_property_name(argument_label),
            safe_parameter_name: safe_parameter_name(argument_label),
        }
    }

    /// Case-insensitive key used to detect colliding field names.
    pub fn collision_key(&self) -> String {
        self.safe_property_name
            .trim_matches('`')
            .to_ascii_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_derives_names_and_default() {
        let field = Field::new(
            "is_active",
            ResolvedType::Boolean(Some(true)),
            false,
            Some("Flag".into()),
        );
        assert_eq!(field.safe_property_name, "isActive");
        assert_eq!(field.safe_parameter_name, "isActive");
        assert_eq!(field.default_value.as_deref(), Some("true"));
        assert_eq!(field.collision_key(), "isactive");
    }

    #[test]
    fn test_field_keyword_escaped() {
        let field = Field::new("default", ResolvedType::String(None), true, None);
        assert_eq!(field.safe_property_name, "`default`");
        assert_eq!(field.collision_key(), "default");
        assert!(field.default_value.is_none());
    }

    #[test]
    fn test_definition_accessors() {
        let def = ModelDefinition::Enumeration(EnumDefinition {
            name: "Color".into(),
            description: Some("Colors".into()),
            values: vec!["blue".into(), "red".into()],
            is_codable: true,
            is_internal_only: false,
        });
        assert_eq!(def.name(), "Color");
        assert_eq!(def.description(), Some("Colors"));
        assert!(def.as_enumeration().is_some());
        assert!(def.as_object().is_none());
    }
}
