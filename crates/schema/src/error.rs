use thiserror::Error;

/// A redefinition that cannot be reconciled with what is already registered.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum MergeError {
    #[error(
        "Field '{type_name}.{field_name}' has conflicting types across sources: '{type1}' vs '{type2}'. The \
         first registered field would silently win."
    )]
    FieldTypeConflicted {
        type_name: String,
        field_name: String,
        type1: String,
        type2: String,
    },

    #[error("Type '{type_name}' has different kinds across sources: '{kind1}' vs '{kind2}'.")]
    TypeKindConflicted {
        type_name: String,
        kind1: String,
        kind2: String,
    },

    #[error(
        "Type '{type_name}' has conflicting definitions across sources. Only object types can be extended by \
         another source."
    )]
    DefinitionConflicted { type_name: String },

    #[error("Directive '@{name}' has conflicting definitions across sources.")]
    DirectiveConflicted { name: String },
}
