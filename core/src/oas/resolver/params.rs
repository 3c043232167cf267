#![deny(missing_docs)]

//! # Parameter Resolution
//!
//! Turns the Swagger parameters of one operation into the parameters of a
//! request function.
//!
//! - `path` and `query` parameters are resolved one by one, query parameters
//!   also record how their value is stringified.
//! - `header` parameters are grouped into a synthesized `<Operation>Headers`
//!   object, minus globally applied headers.
//! - `body` and `formData` are handled in [`crate::oas::resolver::body`].

use crate::error::AppResult;
use crate::oas::document::Parameter as DocParameter;
use crate::oas::models::{
    Field, ModelDefinition, ObjectDefinition, Parameter, ParameterLocation, QueryValueKind,
    ResolvedType,
};
use crate::oas::naming::{header_field_name, nested_type_name, safe_parameter_name, same_header};
use crate::oas::resolver::body::{resolve_body, resolve_form_field};
use crate::oas::resolver::objects::{disambiguate_fields, sort_fields};
use crate::oas::resolver::references::{ModelReference, ReferenceKind};
use crate::oas::resolver::types::{resolve_schema, TypeLevel};
use crate::oas::resolver::{Resolved, ResolutionContext};

/// Name of the grouped headers parameter.
pub const HEADERS_PARAMETER: &str = "headers";

/// Builds a function parameter, deriving its safe name and classifications.
pub fn build_parameter(
    name: &str,
    location: ParameterLocation,
    resolved_type: ResolvedType,
    required: bool,
    description: Option<String>,
) -> Parameter {
    let query_value_kind =
        (location == ParameterLocation::Query).then(|| QueryValueKind::classify(&resolved_type));
    Parameter {
        name: name.to_string(),
        safe_name: safe_parameter_name(name),
        location,
        is_enum_backed: resolved_type.is_enumeration(),
        resolved_type,
        required,
        query_value_kind,
        is_file: false,
        description,
    }
}

/// Follows a `#/parameters/...` reference.
///
/// Returns `None` (after reporting it) when the target does not exist.
pub fn dereference_parameter<'a>(
    parameter: &'a DocParameter,
    ctx: &ResolutionContext<'a>,
) -> AppResult<Option<&'a DocParameter>> {
    let Some(reference) = &parameter.reference else {
        return Ok(Some(parameter));
    };
    let parsed = ModelReference::parse_kind(reference, ReferenceKind::Parameters)?;
    match ctx.document.parameter(&parsed.raw_name) {
        Some(target) => Ok(Some(target)),
        None => {
            ctx.warn(format!("'{}' points to a missing parameter", reference));
            Ok(None)
        }
    }
}

/// Merges path-level and operation-level parameters.
///
/// Operation-level parameters replace path-level ones with the same name and
/// location; order is path-level first, then operation-level additions.
pub fn effective_parameters<'a>(
    path_level: &'a [DocParameter],
    operation_level: &'a [DocParameter],
    ctx: &ResolutionContext<'a>,
) -> AppResult<Vec<&'a DocParameter>> {
    let mut merged: Vec<&'a DocParameter> = Vec::new();
    for parameter in path_level.iter().chain(operation_level) {
        let Some(parameter) = dereference_parameter(parameter, ctx)? else {
            continue;
        };
        match merged
            .iter_mut()
            .find(|p| p.name == parameter.name && p.location == parameter.location)
        {
            Some(existing) => *existing = parameter,
            None => merged.push(parameter),
        }
    }
    Ok(merged)
}

/// Resolves the parameters of one operation, in signature order:
/// path, query, headers, body, form fields.
pub fn resolve_parameters(
    parameters: &[&DocParameter],
    operation_type_name: &str,
    ctx: &ResolutionContext<'_>,
) -> AppResult<Resolved<Vec<Parameter>>> {
    let mut definitions = Vec::new();
    let mut path = Vec::new();
    let mut query = Vec::new();
    let mut headers = Vec::new();
    let mut body = None;
    let mut form = Vec::new();

    for parameter in parameters {
        match ParameterLocation::from_keyword(&parameter.location) {
            ParameterLocation::Path => {
                let resolved = resolve_scalar(parameter, ParameterLocation::Path, operation_type_name, ctx)?;
                if resolved
                    .definitions
                    .iter()
                    .any(|d| matches!(d, ModelDefinition::Object(_)))
                {
                    ctx.warn(format!(
                        "path parameter '{}' of '{}' declares an inline model; path parameters should be scalar",
                        parameter.name, operation_type_name
                    ));
                }
                path.push(resolved.collect_into(&mut definitions));
            }
            ParameterLocation::Query => {
                let resolved = resolve_scalar(parameter, ParameterLocation::Query, operation_type_name, ctx)?;
                query.push(resolved.collect_into(&mut definitions));
            }
            ParameterLocation::Header => headers.push(*parameter),
            ParameterLocation::Body => {
                if body.is_some() {
                    ctx.warn(format!(
                        "'{}' declares more than one body parameter; '{}' is ignored",
                        operation_type_name, parameter.name
                    ));
                    continue;
                }
                body = Some(resolve_body(parameter, operation_type_name, ctx)?.collect_into(&mut definitions));
            }
            ParameterLocation::FormData => {
                if let Some(field) = resolve_form_field(parameter, operation_type_name, ctx)? {
                    form.push(field.collect_into(&mut definitions));
                }
            }
            ParameterLocation::Unspecified => {
                ctx.warn(format!(
                    "parameter '{}' of '{}' has unsupported location '{}'; skipped",
                    parameter.name, operation_type_name, parameter.location
                ));
            }
        }
    }

    let mut signature = path;
    signature.extend(query);
    if let Some(grouped) = resolve_headers(&headers, operation_type_name, ctx)? {
        signature.push(grouped.collect_into(&mut definitions));
    }
    signature.extend(body);
    signature.extend(form);

    Ok(Resolved::new(signature, definitions))
}

fn resolve_scalar(
    parameter: &DocParameter,
    location: ParameterLocation,
    operation_type_name: &str,
    ctx: &ResolutionContext<'_>,
) -> AppResult<Resolved<Parameter>> {
    let prefix = nested_type_name(operation_type_name, &parameter.name);
    let resolved = resolve_schema(&parameter.as_schema(), &prefix, TypeLevel::Nested, ctx)?;
    let required = location == ParameterLocation::Path || parameter.required;
    Ok(resolved.map(|ty| {
        build_parameter(
            &parameter.name,
            location,
            ty,
            required,
            parameter.description.clone(),
        )
    }))
}

/// Groups non-global header parameters into `<Operation>Headers`.
///
/// Returns `None` when every header is global (or there are none).
pub fn resolve_headers(
    headers: &[&DocParameter],
    operation_type_name: &str,
    ctx: &ResolutionContext<'_>,
) -> AppResult<Option<Resolved<Parameter>>> {
    let local: Vec<&DocParameter> = headers
        .iter()
        .copied()
        .filter(|h| {
            !ctx.config
                .global_headers
                .iter()
                .any(|global| same_header(global, &h.name))
        })
        .collect();
    if local.is_empty() {
        return Ok(None);
    }

    let name = nested_type_name(operation_type_name, "Headers");
    let mut embedded = Vec::new();
    let mut fields = Vec::new();
    for header in &local {
        let field_name = header_field_name(&header.name);
        let prefix = nested_type_name(operation_type_name, &field_name);
        let ty = resolve_schema(&header.as_schema(), &prefix, TypeLevel::Nested, ctx)?
            .collect_into(&mut embedded);
        let mut field = Field::new(&field_name, ty, header.required, header.description.clone());
        field.argument_label = header.name.clone();
        fields.push(field);
    }
    disambiguate_fields(&name, &mut fields, ctx);
    sort_fields(&mut fields);

    let definition = ObjectDefinition {
        name: name.clone(),
        description: None,
        fields,
        inherits_from: Vec::new(),
        is_internal_only: ctx.config.internal_only,
        embedded_definitions: embedded,
        is_codable: ctx.config.codable,
    };
    let required = local.iter().any(|h| h.required);
    let parameter = build_parameter(
        HEADERS_PARAMETER,
        ParameterLocation::Header,
        ResolvedType::Object(name),
        required,
        None,
    );
    Ok(Some(Resolved::new(
        parameter,
        vec![ModelDefinition::Object(definition)],
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolverConfig;
    use crate::diagnostics::CollectingSink;
    use crate::oas::resolver::test_support::{context, document};

    const DOC: &str = r#"
swagger: '2.0'
info: {title: t, version: '1'}
paths: {}
parameters:
  limitParam:
    name: limit
    in: query
    type: integer
    format: int32
    default: 20
"#;

    fn params(yaml: &str) -> Vec<DocParameter> {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_path_and_query() {
        let doc = document(DOC);
        let config = ResolverConfig::default();
        let sink = CollectingSink::new();
        let ctx = context(&doc, &config, &sink);
        let raw = params(
            r#"
- {name: id, in: path, type: string}
- {name: since, in: query, type: string, format: date-time}
- {name: sort, in: query, type: string, enum: [desc, asc]}
- {$ref: '#/parameters/limitParam'}
"#,
        );
        let merged = effective_parameters(&[], &raw, &ctx).unwrap();
        let resolved = resolve_parameters(&merged, "ListPets", &ctx).unwrap();
        let names: Vec<_> = resolved.value.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["id", "since", "sort", "limit"]);

        let id = &resolved.value[0];
        assert!(id.required);
        assert!(id.query_value_kind.is_none());
        assert_eq!(resolved.value[1].query_value_kind, Some(QueryValueKind::Date));
        assert_eq!(resolved.value[2].query_value_kind, Some(QueryValueKind::Enum));
        assert!(resolved.value[2].is_enum_backed);
        assert_eq!(resolved.value[3].resolved_type, ResolvedType::Int(Some(20)));
        assert_eq!(resolved.definitions[0].name(), "ListPetsSort");
    }

    #[test]
    fn test_operation_overrides_path_level() {
        let doc = document(DOC);
        let config = ResolverConfig::default();
        let sink = CollectingSink::new();
        let ctx = context(&doc, &config, &sink);
        let path_level = params("- {name: id, in: path, type: string}");
        let op_level = params("- {name: id, in: path, type: integer}");
        let merged = effective_parameters(&path_level, &op_level, &ctx).unwrap();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].schema_type.as_deref(), Some("integer"));
    }

    #[test]
    fn test_headers_grouped_minus_globals() {
        let doc = document(DOC);
        let config = ResolverConfig {
            global_headers: vec!["Authorization".into(), "X-Client-Version".into()],
            ..ResolverConfig::default()
        };
        let sink = CollectingSink::new();
        let ctx = context(&doc, &config, &sink);
        let raw = params(
            r#"
- {name: authorization, in: header, type: string, required: true}
- {name: x-client-version, in: header, type: string}
- {name: X-Request-Id, in: header, type: string, required: true}
"#,
        );
        let merged = effective_parameters(&[], &raw, &ctx).unwrap();
        let resolved = resolve_parameters(&merged, "GetUser", &ctx).unwrap();
        assert_eq!(resolved.value.len(), 1);
        let headers = &resolved.value[0];
        assert_eq!(headers.name, "headers");
        assert!(headers.required);
        assert_eq!(headers.resolved_type, ResolvedType::Object("GetUserHeaders".into()));

        let def = resolved.definitions[0].as_object().unwrap();
        assert_eq!(def.fields.len(), 1);
        assert_eq!(def.fields[0].safe_property_name, "requestId");
        assert_eq!(def.fields[0].argument_label, "X-Request-Id");
    }

    #[test]
    fn test_colliding_header_fields_are_renamed() {
        let doc = document(DOC);
        let config = ResolverConfig::default();
        let sink = CollectingSink::new();
        let ctx = context(&doc, &config, &sink);
        let raw = params(
            r#"
- {name: X-Request-Id, in: header, type: string}
- {name: Request-Id, in: header, type: integer}
"#,
        );
        let merged = effective_parameters(&[], &raw, &ctx).unwrap();
        let resolved = resolve_parameters(&merged, "GetUser", &ctx).unwrap();

        let def = resolved.definitions[0].as_object().unwrap();
        let fields: Vec<_> = def
            .fields
            .iter()
            .map(|f| (f.safe_property_name.as_str(), f.argument_label.as_str()))
            .collect();
        assert_eq!(
            fields,
            vec![("requestId", "X-Request-Id"), ("requestId2", "Request-Id")]
        );
        assert_eq!(sink.diagnostics().len(), 1);
    }

    #[test]
    fn test_only_global_headers_add_nothing() {
        let doc = document(DOC);
        let config = ResolverConfig {
            global_headers: vec!["X-Api-Key".into()],
            ..ResolverConfig::default()
        };
        let sink = CollectingSink::new();
        let ctx = context(&doc, &config, &sink);
        let raw = params("- {name: x-api-key, in: header, type: string}");
        let merged = effective_parameters(&[], &raw, &ctx).unwrap();
        let resolved = resolve_parameters(&merged, "Ping", &ctx).unwrap();
        assert!(resolved.value.is_empty());
        assert!(resolved.definitions.is_empty());
    }

    #[test]
    fn test_missing_and_malformed_parameter_refs() {
        let doc = document(DOC);
        let config = ResolverConfig::default();
        let sink = CollectingSink::new();
        let ctx = context(&doc, &config, &sink);
        let missing = params("- {$ref: '#/parameters/nope'}");
        assert!(effective_parameters(&[], &missing, &ctx).unwrap().is_empty());
        assert_eq!(sink.diagnostics().len(), 1);

        let wrong = params("- {$ref: '#/definitions/Pet'}");
        assert!(effective_parameters(&[], &wrong, &ctx).is_err());
    }

    #[test]
    fn test_inline_object_in_path_warns() {
        let doc = document(DOC);
        let config = ResolverConfig::default();
        let sink = CollectingSink::new();
        let ctx = context(&doc, &config, &sink);
        let raw = params(
            "- {name: key, in: path, required: true, schema: {properties: {a: {type: string}}}}",
        );
        let merged = effective_parameters(&[], &raw, &ctx).unwrap();
        resolve_parameters(&merged, "Odd", &ctx).unwrap();
        assert_eq!(sink.diagnostics().len(), 1);
    }

    #[test]
    fn test_unknown_location_skipped() {
        let doc = document(DOC);
        let config = ResolverConfig::default();
        let sink = CollectingSink::new();
        let ctx = context(&doc, &config, &sink);
        let raw = params("- {name: session, in: cookie, type: string}");
        let merged = effective_parameters(&[], &raw, &ctx).unwrap();
        assert!(resolve_parameters(&merged, "Op", &ctx).unwrap().value.is_empty());
        assert_eq!(sink.diagnostics().len(), 1);
    }
}
