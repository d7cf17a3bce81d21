use std::collections::HashSet;

use indexmap::{IndexMap, IndexSet};
use tracing::instrument;
use value::Name;

use crate::{
    classify::Classified,
    ConflictPolicy,
    MergeError,
    MergeOptions,
    MetaField,
    MetaType,
    SchemaDocument,
    TypeKind,
    INTROSPECTION_PREFIX,
};

const QUERY: &str = "Query";
const MUTATION: &str = "Mutation";
const SUBSCRIPTION: &str = "Subscription";

/// Folds `incoming` into `schema`.
///
/// Whatever is registered first keeps its slot: object types gain the fields they
/// lack, every other redefinition is handled according to `options.conflicts`. On
/// error `schema` is left partially merged and should be discarded.
pub fn merge(schema: &mut SchemaDocument, incoming: &SchemaDocument, options: &MergeOptions) -> Result<(), MergeError> {
    merge_all(schema, [incoming], options)
}

/// Folds several documents into `schema` as a single step.
#[instrument(skip_all, err(Debug), level = "debug")]
pub fn merge_all<'a>(
    schema: &mut SchemaDocument,
    incoming: impl IntoIterator<Item = &'a SchemaDocument>,
    options: &MergeOptions,
) -> Result<(), MergeError> {
    let classified = Classified::from_documents(incoming);

    register_interfaces(schema, &classified, options.conflicts)?;
    register_types(schema, &classified, options.conflicts)?;
    close_unions(schema);
    register_directives(schema, &classified, options.conflicts)?;
    bind_roots(schema);

    Ok(())
}

fn register_interfaces(
    schema: &mut SchemaDocument,
    classified: &Classified<'_>,
    policy: ConflictPolicy,
) -> Result<(), MergeError> {
    for (name, definitions) in &classified.interfaces {
        for definition in definitions {
            match schema.types.get_mut(name) {
                None => {
                    tracing::debug!(interface = %name, "Register interface.");
                    schema.types.insert(name.clone(), (*definition).clone());
                    schema.add_possible_type(name, name);
                },
                Some(_) if name.starts_with(INTROSPECTION_PREFIX) => {},
                Some(existing) => merge_type(existing, definition, policy)?,
            }
        }
    }
    Ok(())
}

fn register_types(
    schema: &mut SchemaDocument,
    classified: &Classified<'_>,
    policy: ConflictPolicy,
) -> Result<(), MergeError> {
    for (name, definitions) in &classified.types {
        let mut seen = IndexSet::new();

        for definition in definitions {
            if !schema.types.contains_key(name) {
                register_type(schema, classified, definition, &mut seen);
                continue;
            }

            // only one copy of the introspection types
            if name.starts_with(INTROSPECTION_PREFIX) {
                tracing::trace!(type_name = %name, "Skip introspection type.");
                continue;
            }

            if let Some(existing) = schema.types.get_mut(name) {
                merge_type(existing, definition, policy)?;
            }
        }
    }
    Ok(())
}

fn register_type(
    schema: &mut SchemaDocument,
    classified: &Classified<'_>,
    definition: &MetaType,
    seen: &mut IndexSet<Name>,
) {
    let name = &definition.name;
    tracing::debug!(type_name = %name, kind = ?definition.kind, "Register type.");
    schema.types.insert(name.clone(), definition.clone());

    if definition.kind == TypeKind::Union {
        for member in resolve_union_members(schema, classified, definition) {
            if seen.insert(member.clone()) {
                schema.add_possible_type(name, &member);
            }
        }
    } else {
        schema.add_possible_type(name, name);
    }

    for interface in &definition.implements {
        schema.add_possible_type(interface, name);
        schema.add_implements(name, interface);
    }
}

/// The concrete members of a union, with nested unions flattened.
///
/// Nested unions are looked up among the definitions of the current step first,
/// then among those already registered. A union met twice while expanding
/// contributes nothing the second time.
fn resolve_union_members(schema: &SchemaDocument, classified: &Classified<'_>, union: &MetaType) -> IndexSet<Name> {
    let mut resolved = IndexSet::new();
    expand_union(schema, classified, union, &mut HashSet::new(), &mut resolved);
    resolved
}

fn expand_union(
    schema: &SchemaDocument,
    classified: &Classified<'_>,
    union: &MetaType,
    visited: &mut HashSet<Name>,
    resolved: &mut IndexSet<Name>,
) {
    if !visited.insert(union.name.clone()) {
        return;
    }

    for member in &union.members {
        let nested = classified.union(member).or_else(|| {
            schema
                .types
                .get(member)
                .filter(|ty| ty.kind == TypeKind::Union && ty.name != union.name)
        });
        match nested {
            Some(nested) => expand_union(schema, classified, nested, visited, resolved),
            None => {
                resolved.insert(member.clone());
            },
        }
    }
}

/// Re-expands the registered unions whose possible types still name a union, which
/// happens when a member was only defined as a union by a later step.
fn close_unions(schema: &mut SchemaDocument) {
    let is_union = |name: &Name| schema.get_type(name).is_some_and(|ty| ty.kind == TypeKind::Union);
    let stale: Vec<Name> = schema
        .types
        .values()
        .filter(|ty| ty.kind == TypeKind::Union)
        .filter(|ty| {
            schema
                .possible_types(&ty.name)
                .is_some_and(|types| types.iter().any(|name| is_union(name)))
        })
        .map(|ty| ty.name.clone())
        .collect();

    let classified = Classified::default();
    for name in stale {
        let members = resolve_union_members(schema, &classified, &schema.types[&name]);
        tracing::debug!(union = %name, members = ?members, "Re-expand union.");
        schema.possible_types.insert(name, members);
    }
}

fn merge_type(existing: &mut MetaType, incoming: &MetaType, policy: ConflictPolicy) -> Result<(), MergeError> {
    if existing.kind != incoming.kind {
        return match policy {
            ConflictPolicy::FirstWins => {
                tracing::warn!(
                    type_name = %existing.name,
                    kind = ?existing.kind,
                    ignored = ?incoming.kind,
                    "Redefinition with a different kind, keeping the first kind."
                );
                // an object still takes whatever output fields the redefinition carries
                if existing.kind == TypeKind::Object {
                    existing.fields = merge_object_fields(existing, incoming);
                }
                Ok(())
            },
            ConflictPolicy::Reject => Err(MergeError::TypeKindConflicted {
                type_name: existing.name.to_string(),
                kind1: format!("{:?}", existing.kind),
                kind2: format!("{:?}", incoming.kind),
            }),
        };
    }

    match existing.kind {
        TypeKind::Object => merge_object(existing, incoming, policy),
        TypeKind::Interface | TypeKind::Union | TypeKind::Enum | TypeKind::Scalar | TypeKind::InputObject => {
            if existing.same_shape(incoming) {
                return Ok(());
            }
            match policy {
                ConflictPolicy::FirstWins => {
                    tracing::warn!(type_name = %existing.name, "Ignoring conflicting redefinition.");
                    Ok(())
                },
                ConflictPolicy::Reject => Err(MergeError::DefinitionConflicted {
                    type_name: existing.name.to_string(),
                }),
            }
        },
    }
}

fn merge_object(existing: &mut MetaType, incoming: &MetaType, policy: ConflictPolicy) -> Result<(), MergeError> {
    for field in incoming.fields.values() {
        let Some(current) = existing.fields.get(&field.name) else {
            continue;
        };
        if current.ty == field.ty {
            continue;
        }
        match policy {
            ConflictPolicy::FirstWins => tracing::warn!(
                type_name = %existing.name,
                field = %field.name,
                kept = %current.ty,
                ignored = %field.ty,
                "Field types differ, keeping the first one."
            ),
            ConflictPolicy::Reject => {
                return Err(MergeError::FieldTypeConflicted {
                    type_name: existing.name.to_string(),
                    field_name: field.name.to_string(),
                    type1: current.ty.to_string(),
                    type2: field.ty.to_string(),
                })
            },
        }
    }

    existing.fields = merge_object_fields(existing, incoming);
    Ok(())
}

/// The fields `existing` should hold after meeting `incoming`: its own fields followed
/// by those of `incoming` it did not have, in `incoming`'s order.
pub fn merge_object_fields(existing: &MetaType, incoming: &MetaType) -> IndexMap<Name, MetaField> {
    let mut fields = existing.fields.clone();
    for (name, field) in &incoming.fields {
        if !fields.contains_key(name) {
            tracing::trace!(type_name = %existing.name, field = %name, "Append field.");
            fields.insert(name.clone(), field.clone());
        }
    }
    fields
}

fn register_directives(
    schema: &mut SchemaDocument,
    classified: &Classified<'_>,
    policy: ConflictPolicy,
) -> Result<(), MergeError> {
    for (name, definitions) in &classified.directives {
        for definition in definitions {
            match schema.directives.get(name) {
                None => {
                    tracing::debug!(directive = %name, "Register directive.");
                    schema.directives.insert(name.clone(), (*definition).clone());
                },
                Some(existing) if existing.same_shape(definition) => {},
                Some(_) => match policy {
                    ConflictPolicy::FirstWins => {
                        tracing::warn!(directive = %name, "Ignoring conflicting directive redefinition.")
                    },
                    ConflictPolicy::Reject => {
                        return Err(MergeError::DirectiveConflicted { name: name.to_string() });
                    },
                },
            }
        }
    }
    Ok(())
}

/// Points the root operation types at whatever is registered as `Query`, `Mutation`
/// and `Subscription`.
pub fn bind_roots(schema: &mut SchemaDocument) {
    let root = |name: &str| schema.types.get(name).map(|ty| ty.name.clone());
    let (query, mutation, subscription) = (root(QUERY), root(MUTATION), root(SUBSCRIPTION));

    schema.query_type = query;
    schema.mutation_type = mutation;
    schema.subscription_type = subscription;
}
