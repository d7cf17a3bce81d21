use mergegate_schema::{compose, merge, MergeError, MergeOptions, SchemaDocument};

fn merge_pair(first: &str, second: &str) -> Result<SchemaDocument, MergeError> {
    let mut schema = SchemaDocument::default();
    merge(&mut schema, &SchemaDocument::parse(first).unwrap(), &MergeOptions::reject_conflicts())?;
    merge(&mut schema, &SchemaDocument::parse(second).unwrap(), &MergeOptions::reject_conflicts())?;
    Ok(schema)
}

#[test]
fn test_field_type_mismatch_is_rejected() {
    let result = merge_pair(
        "type User { id: ID! name: String! }",
        "type User { id: ID! name: Int! email: String }",
    );

    match result {
        Err(MergeError::FieldTypeConflicted {
            type_name,
            field_name,
            type1,
            type2,
        }) => {
            assert_eq!(type_name, "User");
            assert_eq!(field_name, "name");
            assert_eq!(type1, "String!");
            assert_eq!(type2, "Int!");
        },
        Ok(_) => panic!("Expected merge to fail due to incompatible field types"),
        Err(e) => panic!("Expected FieldTypeConflicted error, got: {:?}", e),
    }
}

#[test]
fn test_compatible_objects_still_merge() {
    let schema = merge_pair("type User { id: ID! name: String! }", "type User { id: ID! email: String }")
        .expect("Failed to merge compatible objects");

    assert_eq!(
        schema.types["User"].fields.keys().map(|name| name.as_str()).collect::<Vec<_>>(),
        ["id", "name", "email"]
    );
}

#[test]
fn test_kind_mismatch_is_rejected() {
    let result = merge_pair("type Thing { id: ID }", "enum Thing { A }");

    assert_eq!(
        result.unwrap_err(),
        MergeError::TypeKindConflicted {
            type_name: "Thing".to_string(),
            kind1: "Object".to_string(),
            kind2: "Enum".to_string(),
        }
    );
}

#[test]
fn test_interface_redefinition_is_rejected() {
    let result = merge_pair("interface Node { id: ID! }", "interface Node { id: String! }");

    assert_eq!(result.unwrap_err(), MergeError::DefinitionConflicted {
        type_name: "Node".to_string()
    });
}

#[test]
fn test_enum_redefinition_is_rejected() {
    let result = merge_pair("enum Role { ADMIN USER }", "enum Role { ADMIN }");

    assert_eq!(result.unwrap_err(), MergeError::DefinitionConflicted {
        type_name: "Role".to_string()
    });
}

#[test]
fn test_identical_redefinitions_are_accepted() {
    let sdl = r#"
    "A role" enum Role { ADMIN USER }
    scalar Date
    input Filter { role: Role = ADMIN }
    interface Node { id: ID! }
    directive @cache(maxAge: Int) on FIELD_DEFINITION
    "#;
    let described = r#"
    "Another description" enum Role { ADMIN USER }
    "Dates" scalar Date
    input Filter { role: Role = ADMIN }
    interface Node { id: ID! }
    directive @cache(maxAge: Int) on FIELD_DEFINITION
    "#;

    merge_pair(sdl, described).expect("Descriptions alone must not conflict");
}

#[test]
fn test_directive_redefinition_is_rejected() {
    let result = merge_pair(
        "directive @cache(maxAge: Int) on FIELD_DEFINITION",
        "directive @cache(maxAge: String) on FIELD_DEFINITION",
    );

    assert_eq!(result.unwrap_err(), MergeError::DirectiveConflicted {
        name: "cache".to_string()
    });
}

#[test]
fn test_compose_rejects_conflicting_sources() {
    let users = SchemaDocument::parse("type User { id: ID! } type Query { me: User }").unwrap();
    let accounts = SchemaDocument::parse("type User { id: String! }").unwrap();

    let result = compose(
        [("users".to_string(), users), ("accounts".to_string(), accounts)],
        &MergeOptions::reject_conflicts(),
    );

    // sorted by source name, so `accounts` registers `User` first
    match result {
        Err(MergeError::FieldTypeConflicted { type1, type2, .. }) => {
            assert_eq!(type1, "String!");
            assert_eq!(type2, "ID!");
        },
        other => panic!("Expected FieldTypeConflicted error, got: {:?}", other.map(|_| ())),
    }
}
