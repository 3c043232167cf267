#![deny(missing_docs)]

//! # Primitive Resolvers
//!
//! Maps a declared primitive `type` + `format` (+ literal `default`) onto a
//! [`ResolvedType`].
//!
//! The mapping is total. A format that makes no sense for the declared type
//! (`type: string, format: int32`) or that is unknown falls back to the
//! nearest usable type and emits exactly one warning.
//!
//! | type      | format                              | result          |
//! |-----------|-------------------------------------|-----------------|
//! | `string`  | none, `string`, `password`, `email` | `String`        |
//! | `string`  | `date`, `date-time`                 | `Date`          |
//! | `string`  | `binary`                            | `Object(Data)`  |
//! | `integer` | none, `int32`                       | `Int`           |
//! | `integer` | `int64`, `long`                     | `Int64`         |
//! | `number`  | none, `double`, `long`              | `Double`        |
//! | `number`  | `float`                             | `Float`         |
//! | `number`  | `int32`                             | `Int`           |
//! | `boolean` | none                                | `Boolean`       |

use crate::oas::models::{ResolvedType, BINARY_TYPE, URL_TYPE};
use crate::oas::resolver::ResolutionContext;
use serde_json::Value;

/// Known values of the Swagger `format` keyword.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataFormat {
    /// `int32`
    Int32,
    /// `int64` is read as `Unsupported("int64")`; `long` is the Swagger 1.x name.
    Long,
    /// `float`
    Float,
    /// `double`
    Double,
    /// `string`
    String,
    /// `byte` (base64 text).
    Byte,
    /// `binary`
    Binary,
    /// `boolean`
    Boolean,
    /// `date`
    Date,
    /// `date-time` or `dateTime`.
    DateTime,
    /// `password`
    Password,
    /// `email`
    Email,
    /// Any other string, kept verbatim.
    Unsupported(String),
}

impl DataFormat {
    /// Parses a raw `format` value.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "int32" => DataFormat::Int32,
            "long" => DataFormat::Long,
            "float" => DataFormat::Float,
            "double" => DataFormat::Double,
            "string" => DataFormat::String,
            "byte" => DataFormat::Byte,
            "binary" => DataFormat::Binary,
            "boolean" => DataFormat::Boolean,
            "date" => DataFormat::Date,
            "date-time" | "dateTime" => DataFormat::DateTime,
            "password" => DataFormat::Password,
            "email" => DataFormat::Email,
            other => DataFormat::Unsupported(other.to_string()),
        }
    }

    /// The format as written in a document.
    pub fn as_str(&self) -> &str {
        match self {
            DataFormat::Int32 => "int32",
            DataFormat::Long => "long",
            DataFormat::Float => "float",
            DataFormat::Double => "double",
            DataFormat::String => "string",
            DataFormat::Byte => "byte",
            DataFormat::Binary => "binary",
            DataFormat::Boolean => "boolean",
            DataFormat::Date => "date",
            DataFormat::DateTime => "date-time",
            DataFormat::Password => "password",
            DataFormat::Email => "email",
            DataFormat::Unsupported(raw) => raw,
        }
    }
}

fn mismatch(ctx: &ResolutionContext<'_>, subject: &str, kind: &str, format: &DataFormat, fallback: &str) {
    ctx.warn(format!(
        "'{}' declares format '{}' on a {} schema; treating it as {}",
        subject,
        format.as_str(),
        kind,
        fallback
    ));
}

fn string_default(default: Option<&Value>) -> Option<String> {
    match default? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn integer_default(default: Option<&Value>) -> Option<i64> {
    match default? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn number_default(default: Option<&Value>) -> Option<f64> {
    match default? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn boolean_default(default: Option<&Value>) -> Option<bool> {
    match default? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Resolves `type: string`.
pub fn resolve_string(
    format: Option<&DataFormat>,
    default: Option<&Value>,
    subject: &str,
    ctx: &ResolutionContext<'_>,
) -> ResolvedType {
    let Some(format) = format else {
        return ResolvedType::String(string_default(default));
    };
    match format {
        DataFormat::String | DataFormat::Password | DataFormat::Email => {
            ResolvedType::String(string_default(default))
        }
        DataFormat::Date | DataFormat::DateTime => ResolvedType::Date,
        DataFormat::Binary => ResolvedType::Object(BINARY_TYPE.to_string()),
        DataFormat::Int32
        | DataFormat::Long
        | DataFormat::Float
        | DataFormat::Double
        | DataFormat::Byte
        | DataFormat::Boolean => {
            mismatch(ctx, subject, "string", format, "String");
            ResolvedType::String(string_default(default))
        }
        DataFormat::Unsupported(raw) => match raw.as_str() {
            "ISO8601" | "datetime" => ResolvedType::Date,
            "uuid" => ResolvedType::String(string_default(default)),
            "uri" => ResolvedType::Object(URL_TYPE.to_string()),
            _ => {
                mismatch(ctx, subject, "string", format, "String");
                ResolvedType::String(string_default(default))
            }
        },
    }
}

/// Resolves `type: integer`.
pub fn resolve_integer(
    format: Option<&DataFormat>,
    default: Option<&Value>,
    subject: &str,
    ctx: &ResolutionContext<'_>,
) -> ResolvedType {
    let value = integer_default(default);
    let Some(format) = format else {
        return ResolvedType::Int(value);
    };
    match format {
        DataFormat::Int32 => ResolvedType::Int(value),
        DataFormat::Long => ResolvedType::Int64(value),
        DataFormat::Unsupported(raw) if raw == "int" => ResolvedType::Int(value),
        DataFormat::Unsupported(raw) if raw == "int64" => ResolvedType::Int64(value),
        _ => {
            mismatch(ctx, subject, "integer", format, "Int");
            ResolvedType::Int(value)
        }
    }
}

/// Resolves `type: number`.
pub fn resolve_number(
    format: Option<&DataFormat>,
    default: Option<&Value>,
    subject: &str,
    ctx: &ResolutionContext<'_>,
) -> ResolvedType {
    let value = number_default(default);
    let Some(format) = format else {
        return ResolvedType::Double(value);
    };
    match format {
        DataFormat::Double | DataFormat::Long => ResolvedType::Double(value),
        DataFormat::Float => ResolvedType::Float(value),
        DataFormat::Int32 => ResolvedType::Int(value.map(|v| v as i64)),
        DataFormat::Unsupported(raw) => match raw.as_str() {
            "int" => ResolvedType::Int(value.map(|v| v as i64)),
            "int64" => ResolvedType::Int64(value.map(|v| v as i64)),
            "decimal" => ResolvedType::Double(value),
            "float64" => {
                ctx.warn(format!(
                    "'{}' uses format 'float64', which is not a Swagger format; use 'double'",
                    subject
                ));
                ResolvedType::Double(value)
            }
            _ => {
                mismatch(ctx, subject, "number", format, "Double");
                ResolvedType::Double(value)
            }
        },
        _ => {
            mismatch(ctx, subject, "number", format, "Double");
            ResolvedType::Double(value)
        }
    }
}

/// Resolves `type: boolean`.
pub fn resolve_boolean(
    format: Option<&DataFormat>,
    default: Option<&Value>,
    subject: &str,
    ctx: &ResolutionContext<'_>,
) -> ResolvedType {
    let value = boolean_default(default);
    match format {
        None | Some(DataFormat::Boolean) => ResolvedType::Boolean(value),
        Some(format) => {
            mismatch(ctx, subject, "boolean", format, "Bool");
            ResolvedType::Boolean(value)
        }
    }
}

/// Dispatches on a primitive `type` keyword.
///
/// Returns `None` when `schema_type` is not one of the four primitives.
pub fn resolve_primitive(
    schema_type: &str,
    format: Option<&str>,
    default: Option<&Value>,
    subject: &str,
    ctx: &ResolutionContext<'_>,
) -> Option<ResolvedType> {
    let format = format.map(DataFormat::parse);
    let format = format.as_ref();
    match schema_type {
        "string" => Some(resolve_string(format, default, subject, ctx)),
        "integer" => Some(resolve_integer(format, default, subject, ctx)),
        "number" => Some(resolve_number(format, default, subject, ctx)),
        "boolean" => Some(resolve_boolean(format, default, subject, ctx)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolverConfig;
    use crate::diagnostics::CollectingSink;
    use crate::oas::resolver::test_support::{context, empty_document};
    use serde_json::json;

    fn run(
        schema_type: &str,
        format: Option<&str>,
        default: Option<Value>,
    ) -> (ResolvedType, usize) {
        let doc = empty_document();
        let config = ResolverConfig::default();
        let sink = CollectingSink::new();
        let ctx = context(&doc, &config, &sink);
        let ty = resolve_primitive(schema_type, format, default.as_ref(), "Subject", &ctx)
            .expect("primitive");
        (ty, sink.diagnostics().len())
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(DataFormat::parse("date-time"), DataFormat::DateTime);
        assert_eq!(DataFormat::parse("dateTime"), DataFormat::DateTime);
        assert_eq!(
            DataFormat::parse("uuid"),
            DataFormat::Unsupported("uuid".into())
        );
        assert_eq!(DataFormat::parse("uuid").as_str(), "uuid");
    }

    #[test]
    fn test_string_matrix() {
        assert_eq!(run("string", None, None), (ResolvedType::String(None), 0));
        assert_eq!(run("string", Some("password"), None), (ResolvedType::String(None), 0));
        assert_eq!(run("string", Some("email"), None), (ResolvedType::String(None), 0));
        assert_eq!(run("string", Some("date"), None), (ResolvedType::Date, 0));
        assert_eq!(run("string", Some("date-time"), None), (ResolvedType::Date, 0));
        assert_eq!(
            run("string", Some("binary"), None),
            (ResolvedType::Object("Data".into()), 0)
        );
        assert_eq!(run("string", Some("ISO8601"), None), (ResolvedType::Date, 0));
        assert_eq!(run("string", Some("datetime"), None), (ResolvedType::Date, 0));
        assert_eq!(run("string", Some("uuid"), None), (ResolvedType::String(None), 0));
        assert_eq!(
            run("string", Some("uri"), None),
            (ResolvedType::Object("URL".into()), 0)
        );
    }

    #[test]
    fn test_string_violations_warn_once() {
        for format in ["int32", "long", "float", "double", "byte", "boolean", "hostname"] {
            assert_eq!(
                run("string", Some(format), None),
                (ResolvedType::String(None), 1),
                "format {format}"
            );
        }
    }

    #[test]
    fn test_string_default() {
        assert_eq!(
            run("string", None, Some(json!("asc"))).0,
            ResolvedType::String(Some("asc".into()))
        );
    }

    #[test]
    fn test_integer_matrix() {
        assert_eq!(run("integer", None, Some(json!(5))), (ResolvedType::Int(Some(5)), 0));
        assert_eq!(run("integer", Some("int32"), None), (ResolvedType::Int(None), 0));
        assert_eq!(run("integer", Some("long"), None), (ResolvedType::Int64(None), 0));
        assert_eq!(run("integer", Some("int64"), None), (ResolvedType::Int64(None), 0));
        assert_eq!(run("integer", Some("int"), None), (ResolvedType::Int(None), 0));
        assert_eq!(run("integer", Some("float"), None), (ResolvedType::Int(None), 1));
    }

    #[test]
    fn test_number_matrix() {
        assert_eq!(run("number", None, None), (ResolvedType::Double(None), 0));
        assert_eq!(run("number", Some("double"), None), (ResolvedType::Double(None), 0));
        assert_eq!(run("number", Some("long"), None), (ResolvedType::Double(None), 0));
        assert_eq!(run("number", Some("float"), Some(json!(1.5))), (ResolvedType::Float(Some(1.5)), 0));
        assert_eq!(run("number", Some("int32"), None), (ResolvedType::Int(None), 0));
        assert_eq!(run("number", Some("int"), None), (ResolvedType::Int(None), 0));
        assert_eq!(run("number", Some("int64"), None), (ResolvedType::Int64(None), 0));
        assert_eq!(run("number", Some("decimal"), None), (ResolvedType::Double(None), 0));
        assert_eq!(run("number", Some("float64"), None), (ResolvedType::Double(None), 1));
        assert_eq!(run("number", Some("byte"), None), (ResolvedType::Double(None), 1));
    }

    #[test]
    fn test_boolean() {
        assert_eq!(
            run("boolean", None, Some(json!(true))),
            (ResolvedType::Boolean(Some(true)), 0)
        );
        assert_eq!(run("boolean", Some("int32"), None), (ResolvedType::Boolean(None), 1));
    }

    #[test]
    fn test_non_primitive_is_none() {
        let doc = empty_document();
        let config = ResolverConfig::default();
        let sink = CollectingSink::new();
        let ctx = context(&doc, &config, &sink);
        assert!(resolve_primitive("array", None, None, "X", &ctx).is_none());
    }
}
