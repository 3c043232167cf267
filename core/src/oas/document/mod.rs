#![deny(missing_docs)]

//! # Swagger Document
//!
//! Entry point for reading a Swagger 2.0 document into the shim structures.
//!
//! The resolver never fetches or validates documents beyond the version check
//! performed here; malformed documents are rejected upstream.

pub mod shims;

pub use shims::{
    AdditionalProperties, Info, Operation, Parameter, PathItem, Paths, Response, Schema,
};

use crate::error::{AppError, AppResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Root of a Swagger 2.0 document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwaggerDocument {
    /// Swagger version, must be `2.x`.
    #[serde(
        default,
        deserialize_with = "shims::optional_scalar_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub swagger: Option<String>,
    /// Present on OpenAPI 3.x documents, which are rejected.
    #[serde(
        default,
        deserialize_with = "shims::optional_scalar_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub openapi: Option<String>,
    /// Metadata about the API.
    #[serde(default)]
    pub info: Info,
    /// Host serving the API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Base path prepended to every path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
    /// Transfer protocols.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schemes: Vec<String>,
    /// Default request mime types.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub consumes: Vec<String>,
    /// Default response mime types.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub produces: Vec<String>,
    /// Path items.
    #[serde(default)]
    pub paths: Paths,
    /// Named schemas.
    #[serde(default)]
    pub definitions: IndexMap<String, Schema>,
    /// Named responses.
    #[serde(default)]
    pub responses: IndexMap<String, Response>,
    /// Named parameters.
    #[serde(default)]
    pub parameters: IndexMap<String, Parameter>,
    /// Specification Extensions (x-...).
    #[serde(flatten)]
    pub extensions: BTreeMap<String, Value>,
}

impl SwaggerDocument {
    /// Looks up a definition by its raw (un-normalized) name.
    pub fn definition(&self, name: &str) -> Option<&Schema> {
        self.definitions.get(name)
    }

    /// Looks up a response by its raw name.
    pub fn response(&self, name: &str) -> Option<&Response> {
        self.responses.get(name)
    }

    /// Looks up a parameter by its raw name.
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.get(name)
    }
}

/// Parses a YAML or JSON Swagger 2.0 document.
///
/// JSON is a subset of YAML, so both go through `serde_yaml`. The text is
/// first read into a generic JSON value so that non-string YAML keys (bare
/// status codes such as `200:`) become strings before the shims see them.
pub fn parse_swagger_document(content: &str) -> AppResult<SwaggerDocument> {
    let raw: Value = serde_yaml::from_str(content)?;
    let document: SwaggerDocument = serde_json::from_value(raw)?;
    validate_version(&document)?;
    Ok(document)
}

fn validate_version(document: &SwaggerDocument) -> AppResult<()> {
    if let Some(version) = &document.openapi {
        return Err(AppError::UnsupportedVersion(format!(
            "openapi {}. Only Swagger 2.0 documents are supported.",
            version
        )));
    }
    match &document.swagger {
        Some(version) if version.starts_with("2.") || version == "2" => Ok(()),
        Some(version) => Err(AppError::UnsupportedVersion(format!(
            "swagger {}. Only 2.0 is supported.",
            version
        ))),
        None => Err(AppError::General(
            "Invalid Swagger document: missing 'swagger' version field.".into(),
        )),
    }
}
