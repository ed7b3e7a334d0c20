mod common;

use common::{column, key, nullable, user_columns, FakeSource};
use daogen_schema::{Introspector, NotFoundReason, SchemaError};

#[tokio::test]
async fn test_user_table_fields() {
    let source = FakeSource::new().table("user", user_columns());
    let schema = Introspector::new(&source).introspect("user").await.unwrap();

    assert_eq!(schema.table, "user");
    assert_eq!(schema.fields.len(), 3);
    assert_eq!(
        schema
            .primary_key_fields
            .iter()
            .map(|f| f.column_name.as_str())
            .collect::<Vec<_>>(),
        vec!["id"]
    );

    let name = &schema.fields[1];
    assert_eq!(name.base_type(), "String");
    assert_eq!(name.nullable_type(), "Option<String>");
    assert_eq!(name.comment, "Display name");
    assert!(!name.nullable);

    let created_at = &schema.fields[2];
    assert_eq!(created_at.base_type(), "chrono::NaiveDateTime");
    assert!(created_at.nullable);
    assert_eq!(created_at.zero_literal(), "None");
    assert_eq!(created_at.declared_type(), "Option<chrono::NaiveDateTime>");
}

#[tokio::test]
async fn test_key_columns_come_first() {
    let source = FakeSource::new().table(
        "order_line",
        vec![
            column("qty", "int"),
            key("order_id", "bigint unsigned"),
            nullable("note", "text"),
            key("line", "smallint"),
        ],
    );
    let schema = Introspector::new(&source).introspect("order_line").await.unwrap();

    let order: Vec<_> = schema.fields.iter().map(|f| f.column_name.as_str()).collect();
    assert_eq!(order, vec!["order_id", "line", "qty", "note"]);
    assert_eq!(schema.primary_key_fields.len(), 2);
    assert_eq!(schema.fields[0].base_type(), "u64");
}

#[tokio::test]
async fn test_missing_and_empty_tables_are_distinguished() {
    let source = FakeSource::new().table("ghost", Vec::new());
    let introspector = Introspector::new(&source);

    match introspector.introspect("absent").await.unwrap_err() {
        SchemaError::TableNotFound { table, reason } => {
            assert_eq!(table, "absent");
            assert_eq!(reason, NotFoundReason::Missing);
        }
        other => panic!("unexpected error: {}", other),
    }
    match introspector.introspect("ghost").await.unwrap_err() {
        SchemaError::TableNotFound { reason, .. } => assert_eq!(reason, NotFoundReason::NoColumns),
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn test_unsupported_column_type() {
    let source = FakeSource::new().table("shape", vec![key("id", "int"), column("area", "geometry")]);
    let err = Introspector::new(&source).introspect("shape").await.unwrap_err();
    assert_eq!(err.error_code(), "E_UNSUPPORTED_COLUMN_TYPE");
    assert!(err.to_string().contains("shape.area"));
}

#[tokio::test]
async fn test_catalog_failure_is_not_fatal() {
    let source = FakeSource::new().broken("user");
    let err = Introspector::new(&source).introspect("user").await.unwrap_err();
    assert_eq!(err.error_code(), "E_SCHEMA_QUERY");
    assert!(!err.is_fatal());
}
