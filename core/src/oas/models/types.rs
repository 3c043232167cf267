#![deny(missing_docs)]

//! # Resolved Types
//!
//! The emission-ready type descriptor produced for every schema node.
//! Composite types are only ever referenced by name, so a `ResolvedType`
//! never nests an object structurally.

use serde::Serialize;
use std::fmt;

/// Name of the open property bag used for free-form objects.
pub const OPEN_PROPERTY_BAG: &str = "AnyObject";

/// Name of the opaque binary type (`format: binary`, multipart files).
pub const BINARY_TYPE: &str = "Data";

/// Name of the URL type (`format: uri`).
pub const URL_TYPE: &str = "URL";

/// Normalized type of a field, parameter or response body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ResolvedType {
    /// Text, with an optional literal default.
    String(Option<String>),
    /// 32-bit integer, with an optional literal default.
    Int(Option<i64>),
    /// 64-bit integer, with an optional literal default.
    Int64(Option<i64>),
    /// Double precision float, with an optional literal default.
    Double(Option<f64>),
    /// Single precision float, with an optional literal default.
    Float(Option<f64>),
    /// Boolean, with an optional literal default.
    Boolean(Option<bool>),
    /// Ordered homogeneous collection.
    Array(Box<ResolvedType>),
    /// String keyed map.
    Dictionary(Box<ResolvedType>),
    /// Reference to a named composite type.
    Object(String),
    /// Reference to a named closed set of string values.
    Enumeration(String),
    /// Top-level alias of a definition or response.
    TypeAlias {
        /// Alias name.
        name: String,
        /// Aliased type.
        underlying: Box<ResolvedType>,
    },
    /// Calendar date or timestamp.
    Date,
    /// No body.
    Void,
}

impl ResolvedType {
    /// The open property bag type.
    pub fn open_property_bag() -> Self {
        ResolvedType::Object(OPEN_PROPERTY_BAG.to_string())
    }

    /// Whether this is [`ResolvedType::Void`].
    pub fn is_void(&self) -> bool {
        matches!(self, ResolvedType::Void)
    }

    /// Whether this is (an alias of) an enumeration.
    pub fn is_enumeration(&self) -> bool {
        match self {
            ResolvedType::Enumeration(_) => true,
            ResolvedType::TypeAlias { underlying, .. } => underlying.is_enumeration(),
            _ => false,
        }
    }

    /// Whether this is (an alias of) a date.
    pub fn is_date(&self) -> bool {
        match self {
            ResolvedType::Date => true,
            ResolvedType::TypeAlias { underlying, .. } => underlying.is_date(),
            _ => false,
        }
    }

    /// The literal default carried by a primitive, rendered as a JSON literal.
    ///
    /// This is the only source of a field's default value.
    pub fn default_literal(&self) -> Option<String> {
        match self {
            ResolvedType::String(Some(v)) => Some(serde_json::Value::String(v.clone()).to_string()),
            ResolvedType::Int(Some(v)) | ResolvedType::Int64(Some(v)) => Some(v.to_string()),
            ResolvedType::Double(Some(v)) | ResolvedType::Float(Some(v)) => Some(format_float(*v)),
            ResolvedType::Boolean(Some(v)) => Some(v.to_string()),
            _ => None,
        }
    }

    /// Same type with any literal default dropped.
    pub fn without_default(&self) -> Self {
        match self {
            ResolvedType::String(_) => ResolvedType::String(None),
            ResolvedType::Int(_) => ResolvedType::Int(None),
            ResolvedType::Int64(_) => ResolvedType::Int64(None),
            ResolvedType::Double(_) => ResolvedType::Double(None),
            ResolvedType::Float(_) => ResolvedType::Float(None),
            ResolvedType::Boolean(_) => ResolvedType::Boolean(None),
            other => other.clone(),
        }
    }
}

fn format_float(v: f64) -> String {
    if v.fract() == 0.0 && v.is_finite() {
        format!("{:.1}", v)
    } else {
        v.to_string()
    }
}

impl fmt::Display for ResolvedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedType::String(_) => write!(f, "String"),
            ResolvedType::Int(_) => write!(f, "Int"),
            ResolvedType::Int64(_) => write!(f, "Int64"),
            ResolvedType::Double(_) => write!(f, "Double"),
            ResolvedType::Float(_) => write!(f, "Float"),
            ResolvedType::Boolean(_) => write!(f, "Bool"),
            ResolvedType::Array(inner) => write!(f, "[{}]", inner),
            ResolvedType::Dictionary(value) => write!(f, "Dictionary<String, {}>", value),
            ResolvedType::Object(name) | ResolvedType::Enumeration(name) => write!(f, "{}", name),
            ResolvedType::TypeAlias { name, .. } => write!(f, "{}", name),
            ResolvedType::Date => write!(f, "Date"),
            ResolvedType::Void => write!(f, "Void"),
        }
    }
}
