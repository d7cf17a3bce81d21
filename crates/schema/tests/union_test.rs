use mergegate_schema::{merge, MergeOptions, SchemaDocument};
use pretty_assertions::assert_eq;

fn possible_types(schema: &SchemaDocument, type_name: &str) -> Vec<String> {
    schema
        .possible_types(type_name)
        .map(|types| types.iter().map(|name| name.to_string()).collect())
        .unwrap_or_default()
}

fn merged(sdls: &[&str]) -> SchemaDocument {
    let mut schema = SchemaDocument::default();
    for sdl in sdls {
        let document = SchemaDocument::parse(sdl).unwrap();
        merge(&mut schema, &document, &MergeOptions::default()).unwrap();
    }
    schema
}

const MEMBERS: &str = r#"
type A { id: ID }
type C { id: ID }
type D { id: ID }
"#;

#[test]
fn test_nested_union_is_flattened() {
    let schema = merged(&[&*format!("{MEMBERS} union B = C | D union U = A | B")]);

    assert_eq!(possible_types(&schema, "U"), ["A", "C", "D"]);
    assert_eq!(possible_types(&schema, "B"), ["C", "D"]);
}

#[test]
fn test_nested_union_declared_later_is_flattened() {
    let schema = merged(&[&*format!("union U = A | B {MEMBERS} union B = C | D")]);

    assert_eq!(possible_types(&schema, "U"), ["A", "C", "D"]);
}

#[test]
fn test_nested_union_from_previous_source_is_flattened() {
    let schema = merged(&[&*format!("{MEMBERS} union B = C | D"), "union U = A | B"]);

    assert_eq!(possible_types(&schema, "U"), ["A", "C", "D"]);
}

#[test]
fn test_union_members_are_not_duplicated() {
    let schema = merged(&[&*format!("{MEMBERS} union B = A | C union U = A | B | C")]);

    assert_eq!(possible_types(&schema, "U"), ["A", "C"]);
}

#[test]
fn test_union_is_not_a_possible_type_of_itself() {
    let schema = merged(&[&*format!("{MEMBERS} union U = A | C")]);

    assert!(!schema.is_possible_type("U", "U"));
    assert!(schema.is_possible_type("A", "A"));
}

#[test]
fn test_union_redefinition_keeps_first_members() {
    let schema = merged(&[
        &*format!("{MEMBERS} union U = A"),
        "union U = C | D",
    ]);

    assert_eq!(possible_types(&schema, "U"), ["A"]);
    assert_eq!(
        schema.types["U"].members.iter().map(|name| name.as_str()).collect::<Vec<_>>(),
        ["A"]
    );
}

#[test]
fn test_nested_union_from_later_source_is_flattened() {
    let schema = merged(&["type A { id: ID } union U = A | B", "type C { id: ID } type D { id: ID } union B = C | D"]);

    assert_eq!(possible_types(&schema, "U"), ["A", "C", "D"]);
    assert_eq!(possible_types(&schema, "B"), ["C", "D"]);
}

#[test]
fn test_union_chain_across_sources_is_flattened() {
    let schema = merged(&[
        "type A { id: ID } union U = A | B",
        "union B = C | E",
        &*format!("{MEMBERS} union E = D"),
    ]);

    assert_eq!(possible_types(&schema, "U"), ["A", "C", "D"]);
    assert_eq!(possible_types(&schema, "B"), ["C", "D"]);
}
