#![deny(missing_docs)]

//! # Operation Models
//!
//! Typed function signatures resolved from `paths`.

use crate::oas::models::types::ResolvedType;
use serde::Serialize;
use std::fmt;

/// HTTP verbs supported by Swagger 2.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// GET
    Get,
    /// PUT
    Put,
    /// POST
    Post,
    /// DELETE
    Delete,
    /// OPTIONS
    Options,
    /// HEAD
    Head,
    /// PATCH
    Patch,
}

impl HttpMethod {
    /// Upper case verb.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Patch => "PATCH",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a parameter is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterLocation {
    /// Path template segment.
    Path,
    /// Query string entry.
    Query,
    /// Request header.
    Header,
    /// Multipart or url-encoded form field.
    FormData,
    /// Request body.
    Body,
    /// Unrecognized `in` value.
    #[serde(rename = "none")]
    Unspecified,
}

impl ParameterLocation {
    /// Maps the Swagger `in` keyword.
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "path" => ParameterLocation::Path,
            "query" => ParameterLocation::Query,
            "header" => ParameterLocation::Header,
            "formData" => ParameterLocation::FormData,
            "body" => ParameterLocation::Body,
            _ => ParameterLocation::Unspecified,
        }
    }
}

/// How a query value is turned into a query string entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum QueryValueKind {
    /// Canonical date-time string.
    Date,
    /// Raw enum value.
    Enum,
    /// Default stringification.
    Default,
}

impl QueryValueKind {
    /// Classifies a resolved query parameter type.
    pub fn classify(resolved_type: &ResolvedType) -> Self {
        if resolved_type.is_date() {
            QueryValueKind::Date
        } else if resolved_type.is_enumeration() {
            QueryValueKind::Enum
        } else {
            QueryValueKind::Default
        }
    }
}

/// A parameter of a generated request function.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    /// The wire name.
    pub name: String,
    /// Keyword-escaped identifier for the function signature.
    pub safe_name: String,
    /// Where the value is sent.
    pub location: ParameterLocation,
    /// Parameter type.
    #[serde(rename = "type")]
    pub resolved_type: ResolvedType,
    /// Whether the caller must supply it.
    pub required: bool,
    /// Whether the type is an enumeration.
    pub is_enum_backed: bool,
    /// Stringification rule, only for query parameters.
    pub query_value_kind: Option<QueryValueKind>,
    /// Whether this is a multipart file field.
    pub is_file: bool,
    /// Description.
    pub description: Option<String>,
}

/// One declared response of an operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseType {
    /// Status code as written (`200`, `default`).
    pub status_code: String,
    /// Body type, `Void` when there is no schema.
    #[serde(rename = "type")]
    pub resolved_type: ResolvedType,
    /// Whether this response is a case of a synthesized variant type.
    pub is_multi_variant: bool,
}

impl ResponseType {
    /// Whether the status code is a 2xx code.
    pub fn is_success(&self) -> bool {
        is_success_status(&self.status_code)
    }
}

/// `2xx` status codes (including the `2XX` range form).
pub fn is_success_status(code: &str) -> bool {
    code.len() == 3 && code.starts_with('2')
}

/// A resolved request function.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Generated function name.
    pub function_name: String,
    /// HTTP verb.
    pub http_method: HttpMethod,
    /// Path template, e.g. `/users/{id}`.
    pub service_path: String,
    /// Parameters in signature order.
    pub parameters: Vec<Parameter>,
    /// Every declared response, in status code order.
    pub response_types: Vec<ResponseType>,
    /// Type returned on success.
    pub success_type: ResolvedType,
    /// Type returned on failure.
    pub failure_type: ResolvedType,
    /// Request body mime type.
    pub consumes_mime_type: Option<String>,
    /// Accepted response mime types.
    pub produces: Vec<String>,
    /// Visibility marker.
    pub is_internal_only: bool,
    /// Whether the operation is deprecated.
    pub is_deprecated: bool,
    /// Summary.
    pub summary: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Grouping tags.
    pub tags: Vec<String>,
}

impl Operation {
    /// Looks up a parameter by wire name.
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Looks up a declared response by status code.
    pub fn response(&self, status_code: &str) -> Option<&ResponseType> {
        self.response_types
            .iter()
            .find(|r| r.status_code == status_code)
    }
}
