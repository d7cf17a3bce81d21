use indexmap::{IndexMap, IndexSet};
use parser::{
    types::{
        self,
        ConstDirective,
        DirectiveDefinition,
        DirectiveLocation,
        EnumType,
        InputObjectType,
        InterfaceType,
        ObjectType,
        SchemaDefinition,
        ServiceDocument,
        Type,
        TypeDefinition,
        TypeSystemDefinition,
        UnionType,
    },
    Positioned,
    Result,
};
use tracing::instrument;
use value::{ConstValue, Name};

use crate::merge::bind_roots;

/// Names starting with this prefix belong to the introspection system.
pub const INTROSPECTION_PREFIX: &str = "__";

const BUILTIN_SDL: &str = include_str!("builtin.graphql");

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Deprecation {
    NoDeprecated,
    Deprecated { reason: Option<String> },
}

impl Deprecation {
    #[inline]
    pub fn is_deprecated(&self) -> bool {
        matches!(self, Deprecation::Deprecated { .. })
    }

    #[inline]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Deprecation::NoDeprecated => None,
            Deprecation::Deprecated { reason } => reason.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MetaField {
    pub description: Option<String>,
    pub name: Name,
    pub arguments: IndexMap<Name, MetaInputValue>,
    pub ty: Type,
    pub deprecation: Deprecation,
}

#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MetaEnumValue {
    pub description: Option<String>,
    pub value: Name,
    pub deprecation: Deprecation,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MetaInputValue {
    pub description: Option<String>,
    pub name: Name,
    pub ty: Type,
    pub default_value: Option<ConstValue>,
}

/// A named type definition of any kind.
///
/// Only the collections relevant to `kind` are populated: `fields` for objects and
/// interfaces, `members` for unions, `enum_values` for enums and `input_fields` for
/// input objects.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MetaType {
    pub description: Option<String>,
    pub name: Name,
    pub kind: TypeKind,

    pub implements: IndexSet<Name>,
    pub fields: IndexMap<Name, MetaField>,
    pub members: IndexSet<Name>,
    pub enum_values: IndexMap<Name, MetaEnumValue>,
    pub input_fields: IndexMap<Name, MetaInputValue>,
}

impl MetaType {
    pub fn new(name: Name, kind: TypeKind) -> MetaType {
        MetaType {
            description: None,
            name,
            kind,
            implements: Default::default(),
            fields: Default::default(),
            members: Default::default(),
            enum_values: Default::default(),
            input_fields: Default::default(),
        }
    }

    #[inline]
    pub fn field_by_name(&self, name: &str) -> Option<&MetaField> {
        self.fields.get(name)
    }

    #[inline]
    pub fn is_introspection(&self) -> bool {
        self.name.starts_with(INTROSPECTION_PREFIX)
    }

    /// Compares two definitions by everything that matters to a client, ignoring
    /// descriptions and deprecation reasons.
    pub fn same_shape(&self, other: &MetaType) -> bool {
        self.name == other.name &&
            self.kind == other.kind &&
            self.implements == other.implements &&
            self.members == other.members &&
            self.fields.len() == other.fields.len() &&
            self.fields.iter().all(|(name, field)| {
                other
                    .fields
                    .get(name)
                    .is_some_and(|other_field| same_field_shape(field, other_field))
            }) &&
            self.enum_values.len() == other.enum_values.len() &&
            self.enum_values.keys().all(|value| other.enum_values.contains_key(value)) &&
            same_input_values(&self.input_fields, &other.input_fields)
    }

    fn extend(&mut self, extension: MetaType) {
        self.implements.extend(extension.implements);
        self.members.extend(extension.members);
        for (name, field) in extension.fields {
            self.fields.entry(name).or_insert(field);
        }
        for (name, value) in extension.enum_values {
            self.enum_values.entry(name).or_insert(value);
        }
        for (name, field) in extension.input_fields {
            self.input_fields.entry(name).or_insert(field);
        }
    }
}

fn same_field_shape(a: &MetaField, b: &MetaField) -> bool {
    a.ty == b.ty && same_input_values(&a.arguments, &b.arguments)
}

fn same_input_values(a: &IndexMap<Name, MetaInputValue>, b: &IndexMap<Name, MetaInputValue>) -> bool {
    a.len() == b.len() &&
        a.iter().all(|(name, value)| {
            b.get(name)
                .is_some_and(|other| value.ty == other.ty && value.default_value == other.default_value)
        })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaDirective {
    pub name: Name,
    pub description: Option<String>,
    pub locations: Vec<DirectiveLocation>,
    pub arguments: IndexMap<Name, MetaInputValue>,
    pub is_repeatable: bool,
}

impl MetaDirective {
    pub fn same_shape(&self, other: &MetaDirective) -> bool {
        self.name == other.name &&
            self.is_repeatable == other.is_repeatable &&
            self.locations == other.locations &&
            same_input_values(&self.arguments, &other.arguments)
    }
}

/// One schema: either a single source as parsed, or the accumulator that sources
/// are merged into.
///
/// Root operation types are held by name and resolved through `types`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SchemaDocument {
    pub query_type: Option<Name>,
    pub mutation_type: Option<Name>,
    pub subscription_type: Option<Name>,
    pub types: IndexMap<Name, MetaType>,
    pub directives: IndexMap<Name, MetaDirective>,

    /// Abstract (or concrete) type name to the concrete type names it may resolve to.
    pub possible_types: IndexMap<Name, IndexSet<Name>>,
    /// Type name to the interface names it was registered as implementing.
    pub implements: IndexMap<Name, IndexSet<Name>>,
}

impl SchemaDocument {
    #[instrument(err(Debug), level = "trace")]
    pub fn parse(document: &str) -> Result<SchemaDocument> {
        Ok(Self::new(parser::parse_schema(document)?))
    }

    /// Converts a parsed document.
    ///
    /// `extend` definitions are folded into the definition they extend. A repeated
    /// non-extension definition of a name already seen is ignored.
    pub fn new(document: ServiceDocument) -> SchemaDocument {
        let mut schema = SchemaDocument::default();
        let mut explicit_roots = false;

        for definition in document.definitions {
            match definition {
                TypeSystemDefinition::Schema(schema_definition) => {
                    explicit_roots = true;
                    convert_schema_definition(&mut schema, schema_definition.node);
                },
                TypeSystemDefinition::Type(type_definition) => {
                    let extend = type_definition.node.extend;
                    let meta_type = convert_type_definition(type_definition.node);
                    match schema.types.get_mut(&meta_type.name) {
                        Some(existing) if extend => existing.extend(meta_type),
                        Some(existing) => {
                            tracing::debug!(type_name = %existing.name, "Duplicate type definition ignored.");
                        },
                        None => {
                            schema.types.insert(meta_type.name.clone(), meta_type);
                        },
                    }
                },
                TypeSystemDefinition::Directive(directive_definition) => {
                    let directive = convert_directive_definition(directive_definition.node);
                    if !schema.directives.contains_key(&directive.name) {
                        schema.directives.insert(directive.name.clone(), directive);
                    }
                },
            }
        }

        if !explicit_roots {
            bind_roots(&mut schema);
        }
        schema
    }

    /// The introspection types, built-in scalars and built-in directives.
    ///
    /// Seeding an accumulator with these guarantees that the introspection types
    /// always come from here, whatever the sources declare.
    pub fn with_builtins() -> SchemaDocument {
        let mut schema = Self::new(parser::parse_schema(BUILTIN_SDL).expect("built-in definitions are valid SDL"));
        let names: Vec<Name> = schema
            .types
            .values()
            .filter(|ty| ty.kind != TypeKind::Union)
            .map(|ty| ty.name.clone())
            .collect();
        for name in &names {
            schema.add_possible_type(name, name);
        }
        schema
    }

    #[inline]
    pub fn query(&self) -> Option<&MetaType> {
        self.query_type.as_ref().and_then(|name| self.types.get(name))
    }

    #[inline]
    pub fn mutation(&self) -> Option<&MetaType> {
        self.mutation_type.as_ref().and_then(|name| self.types.get(name))
    }

    #[inline]
    pub fn subscription(&self) -> Option<&MetaType> {
        self.subscription_type.as_ref().and_then(|name| self.types.get(name))
    }

    #[inline]
    pub fn get_type(&self, name: &str) -> Option<&MetaType> {
        self.types.get(name)
    }

    #[inline]
    pub fn possible_types(&self, name: &str) -> Option<&IndexSet<Name>> {
        self.possible_types.get(name)
    }

    #[inline]
    pub fn is_possible_type(&self, abstract_type: &str, type_name: &str) -> bool {
        self.possible_types
            .get(abstract_type)
            .is_some_and(|types| types.contains(type_name))
    }

    /// Records `type_name` as a possible type of `abstract_type`. Returns `false` if it
    /// was already recorded.
    pub fn add_possible_type(&mut self, abstract_type: &Name, type_name: &Name) -> bool {
        self.possible_types
            .entry(abstract_type.clone())
            .or_default()
            .insert(type_name.clone())
    }

    pub fn add_implements(&mut self, type_name: &Name, interface: &Name) -> bool {
        self.implements
            .entry(type_name.clone())
            .or_default()
            .insert(interface.clone())
    }
}

fn get_argument_str<'a>(arguments: &'a [(Positioned<Name>, Positioned<ConstValue>)], name: &str) -> Option<&'a str> {
    arguments.iter().find_map(|(arg_name, value)| match &value.node {
        ConstValue::String(s) if arg_name.node.as_str() == name => Some(s.as_str()),
        _ => None,
    })
}

fn convert_schema_definition(schema: &mut SchemaDocument, schema_definition: SchemaDefinition) {
    if let Some(query) = schema_definition.query {
        schema.query_type = Some(query.node);
    }
    if let Some(mutation) = schema_definition.mutation {
        schema.mutation_type = Some(mutation.node);
    }
    if let Some(subscription) = schema_definition.subscription {
        schema.subscription_type = Some(subscription.node);
    }
}

fn convert_type_definition(definition: TypeDefinition) -> MetaType {
    let mut type_definition = MetaType::new(definition.name.node, TypeKind::Scalar);
    type_definition.description = definition.description.map(|description| description.node);

    match definition.kind {
        types::TypeKind::Scalar => type_definition.kind = TypeKind::Scalar,
        types::TypeKind::Object(ObjectType { implements, fields }) => {
            type_definition.kind = TypeKind::Object;
            type_definition.implements = implements.into_iter().map(|implement| implement.node).collect();
            type_definition.fields = fields
                .into_iter()
                .map(|field| (field.node.name.node.clone(), convert_field_definition(field.node)))
                .collect();
        },
        types::TypeKind::Interface(InterfaceType { implements, fields }) => {
            type_definition.kind = TypeKind::Interface;
            type_definition.implements = implements.into_iter().map(|name| name.node).collect();
            type_definition.fields = fields
                .into_iter()
                .map(|field| (field.node.name.node.clone(), convert_field_definition(field.node)))
                .collect();
        },
        types::TypeKind::Union(UnionType { members }) => {
            type_definition.kind = TypeKind::Union;
            type_definition.members = members.into_iter().map(|name| name.node).collect();
        },
        types::TypeKind::Enum(EnumType { values }) => {
            type_definition.kind = TypeKind::Enum;
            type_definition.enum_values = values
                .into_iter()
                .map(|value| {
                    (value.node.value.node.clone(), MetaEnumValue {
                        description: value.node.description.map(|description| description.node),
                        value: value.node.value.node,
                        deprecation: get_deprecated(&value.node.directives),
                    })
                })
                .collect();
        },
        types::TypeKind::InputObject(InputObjectType { fields }) => {
            type_definition.kind = TypeKind::InputObject;
            type_definition.input_fields = fields
                .into_iter()
                .map(|field| (field.node.name.node.clone(), convert_input_value_definition(field.node)))
                .collect();
        },
    }

    type_definition
}

fn convert_field_definition(definition: types::FieldDefinition) -> MetaField {
    MetaField {
        description: definition.description.map(|description| description.node),
        deprecation: get_deprecated(&definition.directives),
        name: definition.name.node,
        arguments: definition
            .arguments
            .into_iter()
            .map(|arg| (arg.node.name.node.clone(), convert_input_value_definition(arg.node)))
            .collect(),
        ty: definition.ty.node,
    }
}

fn convert_input_value_definition(arg: types::InputValueDefinition) -> MetaInputValue {
    MetaInputValue {
        description: arg.description.map(|description| description.node),
        name: arg.name.node,
        ty: arg.ty.node,
        default_value: arg.default_value.map(|default_value| default_value.node),
    }
}

fn convert_directive_definition(directive_definition: DirectiveDefinition) -> MetaDirective {
    MetaDirective {
        name: directive_definition.name.node,
        description: directive_definition.description.map(|description| description.node),
        locations: directive_definition
            .locations
            .into_iter()
            .map(|location| location.node)
            .collect(),
        arguments: directive_definition
            .arguments
            .into_iter()
            .map(|arg| (arg.node.name.node.clone(), convert_input_value_definition(arg.node)))
            .collect(),
        is_repeatable: directive_definition.is_repeatable,
    }
}

fn get_deprecated(directives: &[Positioned<ConstDirective>]) -> Deprecation {
    directives
        .iter()
        .find(|directive| directive.node.name.node.as_str() == "deprecated")
        .map(|directive| Deprecation::Deprecated {
            reason: get_argument_str(&directive.node.arguments, "reason").map(ToString::to_string),
        })
        .unwrap_or(Deprecation::NoDeprecated)
}
