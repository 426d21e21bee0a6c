//! Public-surface tests for credential ingestion and DDL generation.
//!
//! These tests exercise the builder and statement rendering through the
//! public API only and require no running database.

use serde_json::json;
use tabsync::{
    create_table_statement, DatabaseCredentials, Error, FieldSchema, FieldType, Registry,
    TableSchema,
};

#[test]
fn empty_credential_id_is_rejected() {
    let result = Registry::builder().credentials(DatabaseCredentials::new("", "db1", "shop", "u", "p"));
    assert!(matches!(result, Err(Error::InvalidArgument { .. })));
}

#[test]
fn credential_document_without_id_is_rejected() {
    let result = Registry::builder().credentials_value(json!({
        "host": "db1",
        "database_name": "shop",
        "user": "u",
        "password": "p"
    }));
    assert!(matches!(result, Err(Error::InvalidArgument { .. })));
}

#[test]
fn credential_array_with_non_object_element_is_rejected() {
    let result = Registry::builder().credentials_value(json!([
        {"id": "main", "host": "db1", "database_name": "shop", "user": "u", "password": "p"},
        "not-an-object"
    ]));
    assert!(matches!(result, Err(Error::InvalidArgument { .. })));
}

#[test]
fn credential_document_accepts_both_database_name_spellings() {
    assert!(Registry::builder()
        .credentials_value(json!({
            "id": "a", "host": "h", "database_name": "d", "user": "u", "password": "p"
        }))
        .is_ok());
    assert!(Registry::builder()
        .credentials_value(json!({
            "id": "b", "host": "h", "databaseName": "d", "user": "u", "password": "p"
        }))
        .is_ok());
}

#[test]
fn scenario_ddl_snake_case_with_constraints() {
    let schema = TableSchema::new("shop::models::User", "main")
        .snake_case()
        .field(
            FieldSchema::new("userId", FieldType::of::<i32>())
                .primary_key()
                .auto_increment(),
        )
        .field(
            FieldSchema::new("email", FieldType::of::<String>())
                .length(120)
                .unique(),
        );

    let statement = create_table_statement(&schema);
    assert!(statement.contains("user_id INT PRIMARY KEY AUTO_INCREMENT"));
    assert!(statement.contains("email VARCHAR(120) NOT NULL UNIQUE"));
}

#[test]
fn ddl_shape_matches_expected_punctuation() {
    let schema = TableSchema::new("shop::models::Session", "main")
        .field(FieldSchema::new("token", FieldType::of::<uuid::Uuid>()).primary_key())
        .field(FieldSchema::new("payload", FieldType::Other).nullable())
        .composite_unique(["token", "payload"]);

    assert_eq!(
        create_table_statement(&schema),
        "CREATE TABLE IF NOT EXISTS session (\n  token CHAR(36) PRIMARY KEY NOT NULL,\n  payload LONGTEXT NULL,\n  UNIQUE (token, payload)\n);"
    );
}

#[test]
fn column_count_matches_non_transient_fields_plus_composites() {
    let schema = TableSchema::new("shop::models::OrderLine", "main")
        .field(FieldSchema::new("orderId", FieldType::of::<i64>()))
        .field(FieldSchema::new("lineNo", FieldType::of::<i16>()))
        .field(FieldSchema::new("scratch", FieldType::Other).transient())
        .composite_primary_key(["orderId", "lineNo"]);

    let statement = create_table_statement(&schema);
    let body = statement
        .strip_prefix("CREATE TABLE IF NOT EXISTS orderline (\n")
        .and_then(|s| s.strip_suffix("\n);"))
        .unwrap();
    // 2 non-transient columns + 1 composite primary key clause
    assert_eq!(body.split(",\n").count(), 3);
}
