use std::fmt::{self, Display, Formatter, Write};

use indexmap::IndexMap;
use parser::types::DirectiveLocation;
use value::{ConstValue, Name};

use crate::{Deprecation, MetaDirective, MetaInputValue, MetaType, SchemaDocument, TypeKind};

const BUILTIN_SCALARS: [&str; 5] = ["Int", "Float", "String", "Boolean", "ID"];
const BUILTIN_DIRECTIVES: [&str; 4] = ["include", "skip", "deprecated", "specifiedBy"];

impl SchemaDocument {
    /// Renders the schema as SDL, leaving out introspection types and built-ins.
    pub fn sdl(&self) -> String {
        self.to_string()
    }
}

impl Display for SchemaDocument {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut first = true;

        if self.has_custom_roots() {
            separate(f, &mut first)?;
            writeln!(f, "schema {{")?;
            for (operation, name) in [
                ("query", &self.query_type),
                ("mutation", &self.mutation_type),
                ("subscription", &self.subscription_type),
            ] {
                if let Some(name) = name {
                    writeln!(f, "  {}: {}", operation, name)?;
                }
            }
            writeln!(f, "}}")?;
        }

        for directive in self
            .directives
            .values()
            .filter(|directive| !BUILTIN_DIRECTIVES.contains(&directive.name.as_str()))
        {
            separate(f, &mut first)?;
            write_directive(f, directive)?;
        }

        for ty in self
            .types
            .values()
            .filter(|ty| !ty.is_introspection() && !BUILTIN_SCALARS.contains(&ty.name.as_str()))
        {
            separate(f, &mut first)?;
            write_type(f, ty)?;
        }

        Ok(())
    }
}

impl SchemaDocument {
    fn has_custom_roots(&self) -> bool {
        [
            (&self.query_type, "Query"),
            (&self.mutation_type, "Mutation"),
            (&self.subscription_type, "Subscription"),
        ]
        .into_iter()
        .any(|(name, conventional)| name.as_ref().is_some_and(|name| name.as_str() != conventional))
    }
}

fn separate(f: &mut Formatter<'_>, first: &mut bool) -> fmt::Result {
    if std::mem::take(first) {
        Ok(())
    } else {
        f.write_char('\n')
    }
}

fn write_description(f: &mut Formatter<'_>, description: Option<&str>, indent: &str) -> fmt::Result {
    match description {
        Some(description) => writeln!(
            f,
            "{indent}\"\"\"\n{indent}{}\n{indent}\"\"\"",
            description.replace("\"\"\"", "\\\"\"\"").replace('\n', &format!("\n{indent}"))
        ),
        None => Ok(()),
    }
}

fn write_type(f: &mut Formatter<'_>, ty: &MetaType) -> fmt::Result {
    write_description(f, ty.description.as_deref(), "")?;

    match ty.kind {
        TypeKind::Scalar => writeln!(f, "scalar {}", ty.name),
        TypeKind::Object | TypeKind::Interface => {
            let keyword = if ty.kind == TypeKind::Object { "type" } else { "interface" };
            write!(f, "{} {}", keyword, ty.name)?;
            if !ty.implements.is_empty() {
                write!(f, " implements {}", join(ty.implements.iter(), " & "))?;
            }
            writeln!(f, " {{")?;
            for field in ty.fields.values() {
                write_description(f, field.description.as_deref(), "  ")?;
                write!(f, "  {}", field.name)?;
                write_arguments(f, &field.arguments)?;
                write!(f, ": {}", field.ty)?;
                write_deprecation(f, &field.deprecation)?;
                writeln!(f)?;
            }
            writeln!(f, "}}")
        },
        TypeKind::Union => writeln!(f, "union {} = {}", ty.name, join(ty.members.iter(), " | ")),
        TypeKind::Enum => {
            writeln!(f, "enum {} {{", ty.name)?;
            for value in ty.enum_values.values() {
                write_description(f, value.description.as_deref(), "  ")?;
                write!(f, "  {}", value.value)?;
                write_deprecation(f, &value.deprecation)?;
                writeln!(f)?;
            }
            writeln!(f, "}}")
        },
        TypeKind::InputObject => {
            writeln!(f, "input {} {{", ty.name)?;
            for field in ty.input_fields.values() {
                write_description(f, field.description.as_deref(), "  ")?;
                write!(f, "  ")?;
                write_input_value(f, field)?;
                writeln!(f)?;
            }
            writeln!(f, "}}")
        },
    }
}

fn write_directive(f: &mut Formatter<'_>, directive: &MetaDirective) -> fmt::Result {
    write_description(f, directive.description.as_deref(), "")?;
    write!(f, "directive @{}", directive.name)?;
    write_arguments(f, &directive.arguments)?;
    if directive.is_repeatable {
        f.write_str(" repeatable")?;
    }
    writeln!(
        f,
        " on {}",
        join(directive.locations.iter().map(location_name), " | ")
    )
}

fn write_arguments(f: &mut Formatter<'_>, arguments: &IndexMap<Name, MetaInputValue>) -> fmt::Result {
    if arguments.is_empty() {
        return Ok(());
    }
    f.write_char('(')?;
    for (idx, argument) in arguments.values().enumerate() {
        if idx > 0 {
            f.write_str(", ")?;
        }
        write_input_value(f, argument)?;
    }
    f.write_char(')')
}

fn write_input_value(f: &mut Formatter<'_>, value: &MetaInputValue) -> fmt::Result {
    write!(f, "{}: {}", value.name, value.ty)?;
    if let Some(default_value) = &value.default_value {
        write!(f, " = {}", default_value)?;
    }
    Ok(())
}

fn write_deprecation(f: &mut Formatter<'_>, deprecation: &Deprecation) -> fmt::Result {
    match deprecation {
        Deprecation::NoDeprecated => Ok(()),
        Deprecation::Deprecated { reason: None } => write!(f, " @deprecated"),
        Deprecation::Deprecated { reason: Some(reason) } => {
            write!(f, " @deprecated(reason: {})", ConstValue::String(reason.clone()))
        },
    }
}

fn join<T: Display>(items: impl Iterator<Item = T>, separator: &str) -> String {
    items.map(|item| item.to_string()).collect::<Vec<_>>().join(separator)
}

/// `FieldDefinition` -> `FIELD_DEFINITION`
fn location_name(location: &DirectiveLocation) -> String {
    let mut name = String::new();
    for (idx, ch) in format!("{:?}", location).chars().enumerate() {
        if idx > 0 && ch.is_ascii_uppercase() {
            name.push('_');
        }
        name.push(ch.to_ascii_uppercase());
    }
    name
}
