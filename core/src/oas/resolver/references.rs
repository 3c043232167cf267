#![deny(missing_docs)]

//! # Reference Parsing
//!
//! Parses document-internal `$ref` strings of the form `#/<kind>/<name>`.
//!
//! The name is JSON-pointer unescaped (`~1` -> `/`, `~0` -> `~`) and
//! percent-decoded, then normalized with the same rules as every inline type
//! name so referenced and inline types never diverge.

use crate::error::{AppError, AppResult};
use crate::oas::naming::normalize_type_name;
use percent_encoding::percent_decode_str;
use std::fmt;

/// The section of the document a reference points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    /// `#/definitions/...`
    Definitions,
    /// `#/responses/...`
    Responses,
    /// `#/parameters/...`
    Parameters,
}

impl ReferenceKind {
    /// Maps the first path segment.
    pub fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "definitions" => Some(ReferenceKind::Definitions),
            "responses" => Some(ReferenceKind::Responses),
            "parameters" => Some(ReferenceKind::Parameters),
            _ => None,
        }
    }

    /// The segment as written.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceKind::Definitions => "definitions",
            ReferenceKind::Responses => "responses",
            ReferenceKind::Parameters => "parameters",
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed `$ref`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelReference {
    /// Section of the document.
    pub kind: ReferenceKind,
    /// Decoded key inside the section, used for lookups.
    pub raw_name: String,
    /// Normalized type name.
    pub type_name: String,
}

impl ModelReference {
    /// Parses a `$ref` string.
    ///
    /// Fails with [`AppError::InvalidReference`] when the string does not
    /// start with `#/`, does not have exactly two segments, or names an
    /// unknown section.
    pub fn parse(reference: &str) -> AppResult<Self> {
        let Some(pointer) = reference.strip_prefix("#/") else {
            return Err(AppError::invalid_reference(
                reference,
                "expected a document-internal reference starting with '#/'",
            ));
        };

        let segments: Vec<&str> = pointer.split('/').collect();
        let [kind, name] = segments.as_slice() else {
            return Err(AppError::invalid_reference(
                reference,
                format!("expected '#/<kind>/<name>', found {} segment(s)", segments.len()),
            ));
        };

        let kind = ReferenceKind::from_segment(kind).ok_or_else(|| {
            AppError::invalid_reference(reference, format!("unknown section '{}'", kind))
        })?;

        let raw_name = decode_segment(name)
            .ok_or_else(|| AppError::invalid_reference(reference, "name is not valid UTF-8"))?;
        if raw_name.trim().is_empty() {
            return Err(AppError::invalid_reference(reference, "empty name"));
        }

        Ok(Self {
            kind,
            type_name: normalize_type_name(&raw_name),
            raw_name,
        })
    }

    /// Parses a reference that must point into `expected`.
    pub fn parse_kind(reference: &str, expected: ReferenceKind) -> AppResult<Self> {
        let parsed = Self::parse(reference)?;
        if parsed.kind != expected {
            return Err(AppError::invalid_reference(
                reference,
                format!("expected a reference into '{}', found '{}'", expected, parsed.kind),
            ));
        }
        Ok(parsed)
    }
}

fn decode_segment(segment: &str) -> Option<String> {
    let decoded = percent_decode_str(segment).decode_utf8().ok()?;
    Some(decoded.replace("~1", "/").replace("~0", "~"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_definition() {
        let r = ModelReference::parse("#/definitions/user_profile").unwrap();
        assert_eq!(r.kind, ReferenceKind::Definitions);
        assert_eq!(r.raw_name, "user_profile");
        assert_eq!(r.type_name, "UserProfile");
    }

    #[test]
    fn test_parse_response_and_parameter() {
        let r = ModelReference::parse("#/responses/NotFound").unwrap();
        assert_eq!(r.kind, ReferenceKind::Responses);
        let p = ModelReference::parse("#/parameters/limitParam").unwrap();
        assert_eq!(p.kind, ReferenceKind::Parameters);
        assert_eq!(p.type_name, "LimitParam");
    }

    #[test]
    fn test_decoding() {
        let r = ModelReference::parse("#/definitions/Foo%20Bar~1Baz").unwrap();
        assert_eq!(r.raw_name, "Foo Bar/Baz");
        assert_eq!(r.type_name, "FooBarBaz");
    }

    #[test]
    fn test_malformed_is_typed_error() {
        for bad in [
            "notAValidRef",
            "#/definitions",
            "#/definitions/A/B",
            "#/components/schemas/A",
            "#/unknown/A",
            "#/definitions/",
            "other.yaml#/definitions/A",
        ] {
            let err = ModelReference::parse(bad).unwrap_err();
            assert!(
                matches!(err, AppError::InvalidReference { .. }),
                "{bad} gave {err}"
            );
        }
    }

    #[test]
    fn test_parse_kind_mismatch() {
        assert!(ModelReference::parse_kind("#/definitions/A", ReferenceKind::Definitions).is_ok());
        let err = ModelReference::parse_kind("#/definitions/A", ReferenceKind::Responses)
            .unwrap_err();
        assert!(err.to_string().contains("responses"));
    }
}
