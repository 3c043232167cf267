#![deny(missing_docs)]

//! # Object Model Factory
//!
//! Builds [`ObjectDefinition`]s from schemas with `properties` and/or `allOf`.
//!
//! - Own properties and inline `allOf` members become fields.
//! - `allOf` references to object definitions become `inherits_from` edges;
//!   their fields are merged later by the inheritance pass.
//! - Inline types required by fields are hoisted into `embedded_definitions`;
//!   a field only ever names its type.

use crate::error::AppResult;
use crate::oas::document::Schema;
use crate::oas::models::{Field, ModelDefinition, ObjectDefinition, ResolvedType};
use crate::oas::naming::{nested_type_name, normalize_type_name};
use crate::oas::resolver::references::{ModelReference, ReferenceKind};
use crate::oas::resolver::types::{resolve_schema, TypeLevel};
use crate::oas::resolver::{Resolved, ResolutionContext};
use std::collections::{BTreeSet, HashSet};

/// The type name of a schema: the `x-model-name` override when present,
/// otherwise the caller's prefix. Either is normalized.
pub fn object_type_name(prefix: &str, schema: &Schema) -> String {
    match schema.model_name.as_deref() {
        Some(name) if !name.trim().is_empty() => normalize_type_name(name),
        _ => normalize_type_name(prefix),
    }
}

/// Resolves an object schema into `Object(name)` plus its definition.
///
/// `required_override` is merged into the schema's own `required` list; it
/// carries the enclosing array's `required` when resolving array items.
pub fn make_object(
    schema: &Schema,
    prefix: &str,
    required_override: &[String],
    ctx: &ResolutionContext<'_>,
) -> AppResult<Resolved<ResolvedType>> {
    let name = object_type_name(prefix, schema);
    let required: BTreeSet<&str> = schema
        .required
        .iter()
        .chain(required_override)
        .map(String::as_str)
        .collect();

    let mut fields = Vec::new();
    let mut embedded = Vec::new();
    let mut inherits_from: Vec<String> = Vec::new();

    for (label, property) in &schema.properties {
        let field = resolve_field(&name, label, property, required.contains(label.as_str()), ctx)?;
        fields.push(field.collect_into(&mut embedded));
    }

    for member in &schema.all_of {
        if let Some(reference) = &member.reference {
            if let Some(parent) = composition_parent(reference, &name, ctx)? {
                if !inherits_from.contains(&parent) {
                    inherits_from.push(parent);
                }
            }
            continue;
        }

        if !member.all_of.is_empty() {
            ctx.warn(format!(
                "'{}' nests allOf inside an allOf member; the nested members are ignored",
                name
            ));
        }
        let member_required: BTreeSet<&str> = member
            .required
            .iter()
            .map(String::as_str)
            .chain(required.iter().copied())
            .collect();
        for (label, property) in &member.properties {
            let field = resolve_field(
                &name,
                label,
                property,
                member_required.contains(label.as_str()),
                ctx,
            )?;
            fields.push(field.collect_into(&mut embedded));
        }
    }

    disambiguate_fields(&name, &mut fields, ctx);
    sort_fields(&mut fields);

    let definition = ObjectDefinition {
        name: name.clone(),
        description: schema.description.clone().or_else(|| schema.title.clone()),
        fields,
        inherits_from,
        is_internal_only: ctx.config.internal_only,
        embedded_definitions: dedupe_by_name(embedded),
        is_codable: ctx.config.codable,
    };

    Ok(Resolved::new(
        ResolvedType::Object(name),
        vec![ModelDefinition::Object(definition)],
    ))
}

fn resolve_field(
    owner: &str,
    label: &str,
    property: &Schema,
    required: bool,
    ctx: &ResolutionContext<'_>,
) -> AppResult<Resolved<Field>> {
    let prefix = nested_type_name(owner, label);
    let resolved = resolve_schema(property, &prefix, TypeLevel::Nested, ctx)?;
    let description = property.description.clone();
    Ok(resolved.map(|ty| Field::new(label, ty, required, description)))
}

/// Decides what an `allOf` reference contributes.
///
/// Object definitions become a parent. Anything else contributes nothing but
/// is still resolved so malformed references surface.
fn composition_parent(
    reference: &str,
    owner: &str,
    ctx: &ResolutionContext<'_>,
) -> AppResult<Option<String>> {
    let parsed = ModelReference::parse(reference)?;
    if parsed.kind != ReferenceKind::Definitions {
        ctx.warn(format!(
            "'{}' composes '{}', which is not a definition; ignored",
            owner, reference
        ));
        return Ok(None);
    }
    match ctx.document.definition(&parsed.raw_name) {
        Some(target) if is_object_definition(target) => {
            Ok(Some(object_type_name(&parsed.raw_name, target)))
        }
        Some(_) => Ok(None),
        None => {
            ctx.warn(format!(
                "'{}' composes missing definition '{}'",
                owner, parsed.raw_name
            ));
            Ok(None)
        }
    }
}

/// Whether a top-level definition resolves to an [`ObjectDefinition`].
pub fn is_object_definition(schema: &Schema) -> bool {
    if schema.reference.is_some() || schema.is_enum() {
        return false;
    }
    schema.has_object_shape()
        || (schema.type_name() == Some("object") && schema.additional_properties.is_none())
}

/// Sorts fields by property name, ignoring keyword escapes.
pub(crate) fn sort_fields(fields: &mut [Field]) {
    fields.sort_by(|a, b| {
        a.safe_property_name
            .trim_matches('`')
            .cmp(b.safe_property_name.trim_matches('`'))
            .then_with(|| a.argument_label.cmp(&b.argument_label))
    });
}

/// Renames fields whose property names collide case-insensitively.
///
/// The first field keeps its name, later ones get a numeric suffix.
pub(crate) fn disambiguate_fields(owner: &str, fields: &mut [Field], ctx: &ResolutionContext<'_>) {
    let mut seen: HashSet<String> = HashSet::new();
    for field in fields.iter_mut() {
        if seen.insert(field.collision_key()) {
            continue;
        }
        let base = field.safe_property_name.trim_matches('`').to_string();
        let mut suffix = 2;
        while seen.contains(&format!("{}{}", base, suffix).to_ascii_lowercase()) {
            suffix += 1;
        }
        let renamed = format!("{}{}", base, suffix);
        ctx.warn(format!(
            "'{}.{}' collides with another field; renamed to '{}'",
            owner, field.argument_label, renamed
        ));
        field.safe_parameter_name = renamed.clone();
        field.safe_property_name = renamed;
        seen.insert(field.collision_key());
    }
}

/// Drops later definitions whose name was already seen.
pub(crate) fn dedupe_by_name(definitions: Vec<ModelDefinition>) -> Vec<ModelDefinition> {
    let mut seen = HashSet::new();
    definitions
        .into_iter()
        .filter(|d| seen.insert(d.name().to_string()))
        .collect()
}
