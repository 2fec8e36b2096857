//! Integration tests for subset schemas validating frames
//!
//! Supersets and subsets are declared the way applications do it, then
//! frames with extra columns are validated through the subsets.

use std::sync::Arc;
use tabula_frame::{Column, Frame, Value};
use tabula_schema::{ColumnDef, Schema};
use tabula_validation::{Error, FailureKind, ValidationEngine};

fn full_user_model() -> Arc<Schema> {
    Schema::builder("FullUserDataModel")
        .description("Complete user data model with all available fields")
        .column(ColumnDef::integer("user_id").ge(1.0))
        .column(ColumnDef::string("name"))
        .column(ColumnDef::string("email"))
        .column(ColumnDef::integer("age").ge(0.0).le(120.0))
        .column(ColumnDef::float("salary").ge(0.0))
        .column(ColumnDef::string("department"))
        .column(ColumnDef::string("created_at"))
        .build()
        .unwrap()
}

fn full_product_model() -> Arc<Schema> {
    Schema::builder("FullProductDataModel")
        .column(ColumnDef::integer("product_id").ge(1.0))
        .column(ColumnDef::string("name"))
        .column(ColumnDef::float("price").ge(0.0))
        .column(ColumnDef::string("category"))
        .column(ColumnDef::boolean("in_stock"))
        .column(ColumnDef::string("created_at"))
        .build()
        .unwrap()
}

fn sample_user_data() -> Frame {
    Frame::from_columns(vec![
        Column::new("user_id", [1_i64, 2, 3]),
        Column::new("name", ["Alice", "Bob", "Charlie"]),
        Column::new(
            "email",
            ["alice@example.com", "bob@example.com", "charlie@example.com"],
        ),
        Column::new("age", [25_i64, 30, 35]),
        Column::new("salary", [50000.0, 60000.0, 70000.0]),
        Column::new("department", ["Engineering", "Marketing", "Sales"]),
        Column::new("created_at", ["2024-01-01", "2024-01-02", "2024-01-03"]),
        Column::new("extra_column", ["will", "be", "filtered"]),
    ])
    .unwrap()
}

fn sample_product_data() -> Frame {
    Frame::from_columns(vec![
        Column::new("product_id", [101_i64, 102, 103]),
        Column::new("name", ["Widget A", "Gadget B", "Tool C"]),
        Column::new("price", [19.99, 29.99, 39.99]),
        Column::new("category", ["Tools", "Electronics", "Hardware"]),
        Column::new("in_stock", [true, false, true]),
        Column::new("created_at", ["2024-01-01", "2024-01-02", "2024-01-03"]),
        Column::new("extra_product_column", ["will", "be", "filtered"]),
    ])
    .unwrap()
}

fn assert_filtered(schema: &Schema, data: &Frame, expected: &[&str]) {
    let result = ValidationEngine::new().validate(schema, data).unwrap();
    assert_eq!(result.column_names(), expected);
    assert_eq!(result.shape(), (data.height(), expected.len()));
    for name in expected {
        assert_eq!(result.column(name), data.column(name), "column {name} changed");
    }
}

#[test]
fn contact_subset_keeps_contact_columns() {
    let users = full_user_model();
    let contact = Schema::define_subset(
        "ContactDataModel",
        vec![
            ColumnDef::integer("user_id").ge(1.0),
            ColumnDef::string("name"),
            ColumnDef::string("email"),
        ],
        &users,
    )
    .unwrap();
    assert_filtered(&contact, &sample_user_data(), &["user_id", "name", "email"]);
}

#[test]
fn finance_subset_keeps_finance_columns() {
    let users = full_user_model();
    let finance = Schema::project("FinanceDataModel", &users, &["user_id", "salary", "department"])
        .unwrap();
    assert_filtered(&finance, &sample_user_data(), &["user_id", "salary", "department"]);
}

#[test]
fn user_basics_subset_keeps_basic_columns() {
    let users = full_user_model();
    let basics = Schema::project("UserBasicsModel", &users, &["user_id", "name", "age"]).unwrap();
    assert_filtered(&basics, &sample_user_data(), &["user_id", "name", "age"]);
}

#[test]
fn product_subsets_keep_their_columns() {
    let products = full_product_model();
    let summary =
        Schema::project("ProductSummaryModel", &products, &["product_id", "name", "price"]).unwrap();
    let inventory =
        Schema::project("ProductInventoryModel", &products, &["product_id", "name", "in_stock"])
            .unwrap();

    let data = sample_product_data();
    assert_filtered(&summary, &data, &["product_id", "name", "price"]);
    assert_filtered(&inventory, &data, &["product_id", "name", "in_stock"]);
}

#[test]
fn output_follows_declaration_order() {
    let users = full_user_model();
    let reordered = Schema::project("Reordered", &users, &["email", "user_id"]).unwrap();
    assert_filtered(&reordered, &sample_user_data(), &["email", "user_id"]);
}

#[test]
fn single_row_example_is_filtered() {
    let users = Schema::define(
        "Users",
        vec![
            ColumnDef::integer("user_id"),
            ColumnDef::string("name"),
            ColumnDef::string("email"),
            ColumnDef::integer("age"),
        ],
    )
    .unwrap();
    let contact = Schema::project("Contact", &users, &["user_id", "name", "email"]).unwrap();
    let data = Frame::from_columns(vec![
        Column::new("user_id", [1_i64]),
        Column::new("name", ["Alice"]),
        Column::new("email", ["a@x.com"]),
        Column::new("age", [25_i64]),
    ])
    .unwrap();

    let result = ValidationEngine::new().validate(&contact, &data).unwrap();
    assert_eq!(result.column_names(), vec!["user_id", "name", "email"]);
    assert_eq!(
        result.row(0),
        Some(vec![
            &Value::Integer(1),
            &Value::from("Alice"),
            &Value::from("a@x.com")
        ])
    );
}

#[test]
fn validation_with_missing_columns_fails() {
    let users = full_user_model();
    let contact = Schema::project("ContactDataModel", &users, &["user_id", "name", "email"]).unwrap();

    let full = sample_user_data();
    let without_email: Vec<&str> = full
        .column_names()
        .into_iter()
        .filter(|name| *name != "email")
        .collect();
    let data = full.select(&without_email).unwrap();

    let err = ValidationEngine::new().validate(&contact, &data).unwrap_err();
    let failures = &err.data().expect("data failure").failures;
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].column, "email");
    assert_eq!(failures[0].kind, FailureKind::ColumnMissing);
}

#[test]
fn subset_checks_apply_to_subset_columns_only() {
    let users = full_user_model();
    let contact = Schema::project("ContactDataModel", &users, &["user_id", "name", "email"]).unwrap();

    // age violates the superset bound, but contact does not declare age
    let data = Frame::from_columns(vec![
        Column::new("user_id", [1_i64]),
        Column::new("name", ["Old"]),
        Column::new("email", ["old@example.com"]),
        Column::new("age", [500_i64]),
    ])
    .unwrap();
    assert!(ValidationEngine::new().validate(&contact, &data).is_ok());

    let basics = Schema::project("UserBasicsModel", &users, &["user_id", "age"]).unwrap();
    let err = ValidationEngine::new().validate(&basics, &data).unwrap_err();
    assert!(matches!(err, Error::Data(ref d) if d.failures[0].column == "age"));
}

#[test]
fn failed_validation_leaves_schema_usable() {
    let users = full_user_model();
    let contact = Schema::project("ContactDataModel", &users, &["user_id", "name", "email"]).unwrap();
    let engine = ValidationEngine::new();

    assert!(engine.validate(&contact, &Frame::new()).is_err());
    assert!(engine.validate(&contact, &sample_user_data()).is_ok());
}
