#![forbid(unsafe_code)]

pub use classify::Classified;
pub use compose::compose;
pub use document::{
    Deprecation,
    MetaDirective,
    MetaEnumValue,
    MetaField,
    MetaInputValue,
    MetaType,
    SchemaDocument,
    TypeKind,
    INTROSPECTION_PREFIX,
};
pub use error::MergeError;
pub use merge::{bind_roots, merge, merge_all, merge_object_fields};
pub use options::{ConflictPolicy, MergeOptions, MergeOrder};

mod classify;
mod compose;
mod document;
mod error;
mod merge;
mod options;
mod sdl;
