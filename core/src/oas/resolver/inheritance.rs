#![deny(missing_docs)]

//! # Inheritance Flattening
//!
//! Second pass over a document's definitions: every object's `inherits_from`
//! edges are followed transitively and the ancestors' fields are merged into
//! the object. Afterwards no object carries inheritance edges.
//!
//! Own fields win over inherited ones, and the first ancestor reached (in
//! declaration order, depth first) wins over later ones.

use crate::oas::models::{Field, ModelDefinition, ObjectDefinition};
use crate::oas::resolver::objects::sort_fields;
use crate::oas::resolver::ResolutionContext;
use std::collections::{HashMap, HashSet};

/// Flattens inheritance for every object in `definitions`, including
/// embedded ones. The lookup table is built from the same list.
pub fn resolve_inheritance_tree(
    definitions: Vec<ModelDefinition>,
    ctx: &ResolutionContext<'_>,
) -> Vec<ModelDefinition> {
    let mut lookup: HashMap<String, ObjectDefinition> = HashMap::new();
    index_objects(&definitions, &mut lookup);

    definitions
        .into_iter()
        .map(|definition| flatten_definition(definition, &lookup, ctx))
        .collect()
}

fn index_objects(definitions: &[ModelDefinition], lookup: &mut HashMap<String, ObjectDefinition>) {
    for definition in definitions {
        if let ModelDefinition::Object(object) = definition {
            lookup
                .entry(object.name.clone())
                .or_insert_with(|| object.clone());
            index_objects(&object.embedded_definitions, lookup);
        }
    }
}

fn flatten_definition(
    definition: ModelDefinition,
    lookup: &HashMap<String, ObjectDefinition>,
    ctx: &ResolutionContext<'_>,
) -> ModelDefinition {
    match definition {
        ModelDefinition::Object(object) => {
            ModelDefinition::Object(flatten_object(object, lookup, ctx))
        }
        other => other,
    }
}

/// Flattens a single object against `lookup`.
pub fn flatten_object(
    mut object: ObjectDefinition,
    lookup: &HashMap<String, ObjectDefinition>,
    ctx: &ResolutionContext<'_>,
) -> ObjectDefinition {
    if !object.inherits_from.is_empty() {
        let mut fields = std::mem::take(&mut object.fields);
        let mut keys: HashSet<String> = fields.iter().map(Field::collision_key).collect();
        let mut visited: HashSet<String> = HashSet::from([object.name.clone()]);

        collect_inherited(
            &object.name,
            &object.inherits_from,
            lookup,
            &mut visited,
            &mut keys,
            &mut fields,
            ctx,
        );

        sort_fields(&mut fields);
        object.fields = fields;
        object.inherits_from.clear();
    }

    object.embedded_definitions = std::mem::take(&mut object.embedded_definitions)
        .into_iter()
        .map(|d| flatten_definition(d, lookup, ctx))
        .collect();
    object
}

fn collect_inherited(
    owner: &str,
    parents: &[String],
    lookup: &HashMap<String, ObjectDefinition>,
    visited: &mut HashSet<String>,
    keys: &mut HashSet<String>,
    fields: &mut Vec<Field>,
    ctx: &ResolutionContext<'_>,
) {
    for parent_name in parents {
        if !visited.insert(parent_name.clone()) {
            continue;
        }
        let Some(parent) = lookup.get(parent_name) else {
            ctx.warn(format!(
                "'{}' inherits from unknown object '{}'",
                owner, parent_name
            ));
            continue;
        };
        for field in &parent.fields {
            if keys.insert(field.collision_key()) {
                fields.push(field.clone());
            }
        }
        collect_inherited(
            parent_name,
            &parent.inherits_from,
            lookup,
            visited,
            keys,
            fields,
            ctx,
        );
    }
}
