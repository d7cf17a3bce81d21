use indexmap::IndexMap;
use value::Name;

use crate::{MetaDirective, MetaType, SchemaDocument, TypeKind};

/// The definitions of one merge step, grouped by name.
///
/// Interfaces are kept apart from every other kind because they have to be
/// registered before the object types that implement them. Definitions sharing a
/// name are kept in the order their documents were given.
#[derive(Debug, Default)]
pub struct Classified<'a> {
    pub interfaces: IndexMap<Name, Vec<&'a MetaType>>,
    pub types: IndexMap<Name, Vec<&'a MetaType>>,
    pub directives: IndexMap<Name, Vec<&'a MetaDirective>>,
}

impl<'a> Classified<'a> {
    pub fn new(document: &'a SchemaDocument) -> Classified<'a> {
        Self::from_documents([document])
    }

    pub fn from_documents(documents: impl IntoIterator<Item = &'a SchemaDocument>) -> Classified<'a> {
        let mut classified = Classified::default();

        for document in documents {
            for (name, definition) in &document.types {
                let group = match definition.kind {
                    TypeKind::Interface => &mut classified.interfaces,
                    TypeKind::Object | TypeKind::Union | TypeKind::Enum | TypeKind::Scalar | TypeKind::InputObject => {
                        &mut classified.types
                    },
                };
                group.entry(name.clone()).or_default().push(definition);
            }

            for (name, definition) in &document.directives {
                classified.directives.entry(name.clone()).or_default().push(definition);
            }
        }

        classified
    }

    /// Finds a union among the definitions of this step.
    pub fn union(&self, name: &str) -> Option<&'a MetaType> {
        self.types
            .get(name)
            .and_then(|definitions| definitions.iter().copied().find(|ty| ty.kind == TypeKind::Union))
    }
}
