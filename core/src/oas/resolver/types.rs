#![deny(missing_docs)]

//! # Model Type Resolver
//!
//! The recursion root: routes any schema node to the right resolver and
//! returns a uniform `(ResolvedType, definitions)` pair.
//!
//! - `$ref` -> named reference (no new definitions).
//! - `enum` -> synthesized enumeration, values sorted.
//! - `properties` / `allOf` -> object factory.
//! - primitives -> primitive resolvers.
//! - `array` -> element resolved with prefix `<prefix>Item`.
//! - `additionalProperties` -> `Dictionary`, or the open property bag.
//! - `file` -> `Void`.
//!
//! At [`TypeLevel::TopLevel`] (entries of `definitions`) anything that is not
//! an object or an enumeration is wrapped in a named alias.

use crate::error::{AppError, AppResult};
use crate::oas::document::{AdditionalProperties, Schema};
use crate::oas::models::{AliasDefinition, EnumDefinition, ModelDefinition, ResolvedType};
use crate::oas::naming::nested_type_name;
use crate::oas::resolver::objects::{is_object_definition, make_object, object_type_name};
use crate::oas::resolver::primitives::{resolve_primitive, resolve_string, DataFormat};
use crate::oas::resolver::references::{ModelReference, ReferenceKind};
use crate::oas::resolver::{Resolved, ResolutionContext};
use serde_json::Value;

/// Where a schema sits in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeLevel {
    /// An entry of `definitions`; aliases are synthesized here.
    TopLevel,
    /// Anything else (properties, items, parameters, responses).
    Nested,
}

/// Resolves any schema node.
///
/// `prefix` names inline types synthesized for this node (and, with a
/// suffix, for its children).
pub fn resolve_schema(
    schema: &Schema,
    prefix: &str,
    level: TypeLevel,
    ctx: &ResolutionContext<'_>,
) -> AppResult<Resolved<ResolvedType>> {
    if let Some(reference) = &schema.reference {
        let resolved = resolve_reference(reference, ctx)?;
        return Ok(alias_at(level, prefix, schema, resolved, ctx));
    }

    if schema.is_enum() {
        return Ok(enumeration(schema, prefix, ctx));
    }

    if schema.has_object_shape() {
        return make_object(schema, prefix, &[], ctx);
    }

    let resolved = match schema.type_name() {
        Some(kind @ ("string" | "integer" | "number" | "boolean")) => {
            let subject = object_type_name(prefix, schema);
            let ty = resolve_primitive(
                kind,
                schema.format.as_deref(),
                schema.default.as_ref(),
                &subject,
                ctx,
            )
            .unwrap_or_else(ResolvedType::open_property_bag);
            Resolved::bare(ty)
        }
        Some("array") => resolve_array(schema, prefix, ctx)?,
        Some("file") => return Ok(Resolved::bare(ResolvedType::Void)),
        Some("object") | None => return resolve_map(schema, prefix, level, ctx),
        Some(other) => {
            ctx.warn(format!(
                "'{}' has unsupported type '{}'; treating it as a free-form object",
                object_type_name(prefix, schema),
                other
            ));
            Resolved::bare(ResolvedType::open_property_bag())
        }
    };
    Ok(alias_at(level, prefix, schema, resolved, ctx))
}

/// Resolves a `$ref` found where a schema is expected.
///
/// Definition references resolve to `Enumeration(name)` when the target is an
/// enum and `Object(name)` otherwise. A dangling definition reference is
/// reported and still yields `Object(name)`.
pub fn resolve_reference(
    reference: &str,
    ctx: &ResolutionContext<'_>,
) -> AppResult<Resolved<ResolvedType>> {
    let parsed = ModelReference::parse(reference)?;
    match parsed.kind {
        ReferenceKind::Definitions => Ok(Resolved::bare(named_definition(&parsed, ctx))),
        ReferenceKind::Responses => {
            let Some(response) = ctx.document.response(&parsed.raw_name) else {
                ctx.warn(format!("'{}' points to a missing response", reference));
                return Ok(Resolved::bare(ResolvedType::Object(parsed.type_name)));
            };
            match &response.schema {
                None => Ok(Resolved::bare(ResolvedType::Void)),
                Some(schema)
                    if schema
                        .reference
                        .as_deref()
                        .is_some_and(|r| r.starts_with("#/responses/")) =>
                {
                    ctx.warn(format!(
                        "response '{}' refers to another response; use a definition instead",
                        parsed.raw_name
                    ));
                    Ok(Resolved::bare(ResolvedType::Object(parsed.type_name)))
                }
                Some(schema) => resolve_schema(schema, &parsed.raw_name, TypeLevel::Nested, ctx),
            }
        }
        ReferenceKind::Parameters => Err(AppError::invalid_reference(
            reference,
            "a parameter reference cannot describe a schema",
        )),
    }
}

fn named_definition(parsed: &ModelReference, ctx: &ResolutionContext<'_>) -> ResolvedType {
    match ctx.document.definition(&parsed.raw_name) {
        Some(target) => {
            let name = object_type_name(&parsed.raw_name, target);
            if target.is_enum() {
                ResolvedType::Enumeration(name)
            } else {
                ResolvedType::Object(name)
            }
        }
        None => {
            ctx.warn(format!(
                "'#/definitions/{}' points to a missing definition",
                parsed.raw_name
            ));
            ResolvedType::Object(parsed.type_name.clone())
        }
    }
}

/// Resolves `items: {$ref: ...}`.
///
/// Only the kind of the target matters here: objects and enums are named,
/// plain string definitions are passed through as primitives. Any other
/// kind is reported and named like an object.
pub fn resolve_array_item_reference(
    reference: &str,
    ctx: &ResolutionContext<'_>,
) -> AppResult<Resolved<ResolvedType>> {
    let parsed = ModelReference::parse(reference)?;
    if parsed.kind != ReferenceKind::Definitions {
        return resolve_reference(reference, ctx);
    }
    let Some(target) = ctx.document.definition(&parsed.raw_name) else {
        return Ok(Resolved::bare(named_definition(&parsed, ctx)));
    };
    let name = object_type_name(&parsed.raw_name, target);

    if target.is_enum() {
        return Ok(Resolved::bare(ResolvedType::Enumeration(name)));
    }
    if is_object_definition(target) {
        return Ok(Resolved::bare(ResolvedType::Object(name)));
    }
    if target.reference.is_none() && target.type_name() == Some("string") {
        let format = target.format.as_deref().map(DataFormat::parse);
        return Ok(Resolved::bare(resolve_string(
            format.as_ref(),
            target.default.as_ref(),
            &name,
            ctx,
        )));
    }

    ctx.warn(format!(
        "array items refer to '{}', which is neither an object nor a string; using it as a named type",
        parsed.raw_name
    ));
    Ok(Resolved::bare(ResolvedType::Object(name)))
}

fn enumeration(schema: &Schema, prefix: &str, ctx: &ResolutionContext<'_>) -> Resolved<ResolvedType> {
    let name = object_type_name(prefix, schema);
    let mut values: Vec<String> = schema
        .enum_values
        .iter()
        .flatten()
        .filter_map(|v| match v {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        })
        .collect();
    values.sort();
    values.dedup();

    let definition = EnumDefinition {
        name: name.clone(),
        description: schema.description.clone().or_else(|| schema.title.clone()),
        values,
        is_codable: ctx.config.codable,
        is_internal_only: ctx.config.internal_only,
    };
    Resolved::new(
        ResolvedType::Enumeration(name),
        vec![ModelDefinition::Enumeration(definition)],
    )
}

fn resolve_array(
    schema: &Schema,
    prefix: &str,
    ctx: &ResolutionContext<'_>,
) -> AppResult<Resolved<ResolvedType>> {
    let item_prefix = nested_type_name(&object_type_name(prefix, schema), "Item");
    let Some(items) = schema.items.as_deref() else {
        ctx.warn(format!(
            "array '{}' declares no items; using free-form elements",
            object_type_name(prefix, schema)
        ));
        return Ok(Resolved::bare(ResolvedType::Array(Box::new(
            ResolvedType::open_property_bag(),
        ))));
    };

    let element = if let Some(reference) = &items.reference {
        resolve_array_item_reference(reference, ctx)?
    } else if items.has_object_shape() && !items.is_enum() {
        // `required` written next to `items` applies to the item's
        // properties; make_object merges it with the item's own list.
        make_object(items, &item_prefix, &schema.required, ctx)?
    } else {
        resolve_schema(items, &item_prefix, TypeLevel::Nested, ctx)?
    };
    Ok(element.map(|ty| ResolvedType::Array(Box::new(ty))))
}

fn resolve_map(
    schema: &Schema,
    prefix: &str,
    level: TypeLevel,
    ctx: &ResolutionContext<'_>,
) -> AppResult<Resolved<ResolvedType>> {
    let resolved = match &schema.additional_properties {
        Some(AdditionalProperties::Bool(true)) => {
            Resolved::bare(ResolvedType::open_property_bag())
        }
        Some(AdditionalProperties::Schema(value)) if value.as_ref() == &Schema::default() => {
            Resolved::bare(ResolvedType::open_property_bag())
        }
        Some(AdditionalProperties::Schema(value)) => {
            let element = match &value.reference {
                Some(reference) => resolve_reference(reference, ctx)?,
                None => {
                    let value_prefix = nested_type_name(&object_type_name(prefix, schema), "Value");
                    resolve_schema(value, &value_prefix, TypeLevel::Nested, ctx)?
                }
            };
            element.map(|ty| ResolvedType::Dictionary(Box::new(ty)))
        }
        Some(AdditionalProperties::Bool(false)) | None => {
            if level == TypeLevel::TopLevel && schema.type_name() == Some("object") {
                return make_object(schema, prefix, &[], ctx);
            }
            Resolved::bare(ResolvedType::open_property_bag())
        }
    };
    Ok(alias_at(level, prefix, schema, resolved, ctx))
}

/// Wraps a top-level result in a named alias definition.
fn alias_at(
    level: TypeLevel,
    prefix: &str,
    schema: &Schema,
    resolved: Resolved<ResolvedType>,
    ctx: &ResolutionContext<'_>,
) -> Resolved<ResolvedType> {
    if level == TypeLevel::Nested {
        return resolved;
    }
    let name = object_type_name(prefix, schema);
    let underlying = resolved.value;
    let alias = AliasDefinition {
        name: name.clone(),
        description: schema.description.clone().or_else(|| schema.title.clone()),
        underlying: underlying.clone(),
        is_internal_only: ctx.config.internal_only,
    };
    let mut definitions = vec![ModelDefinition::TypeAlias(alias)];
    definitions.extend(resolved.definitions);
    Resolved::new(
        ResolvedType::TypeAlias {
            name,
            underlying: Box::new(underlying),
        },
        definitions,
    )
}
