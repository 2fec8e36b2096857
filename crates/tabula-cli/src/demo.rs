//! Built-in walkthrough: user and product supersets with five subsets

use std::process::ExitCode;
use std::sync::Arc;
use tabula_frame::{Column, Frame};
use tabula_schema::{ColumnDef, Schema};
use tabula_validation::ValidationEngine;

fn full_user_model() -> tabula_schema::Result<Arc<Schema>> {
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
}

fn full_product_model() -> tabula_schema::Result<Arc<Schema>> {
    Schema::builder("FullProductDataModel")
        .description("Complete product data model")
        .column(ColumnDef::integer("product_id").ge(1.0))
        .column(ColumnDef::string("name"))
        .column(ColumnDef::float("price").ge(0.0))
        .column(ColumnDef::string("category"))
        .column(ColumnDef::boolean("in_stock"))
        .column(ColumnDef::string("created_at"))
        .build()
}

fn sample_users() -> tabula_frame::Result<Frame> {
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
}

fn sample_products() -> tabula_frame::Result<Frame> {
    Frame::from_columns(vec![
        Column::new("product_id", [101_i64, 102, 103]),
        Column::new("name", ["Widget A", "Gadget B", "Tool C"]),
        Column::new("price", [19.99, 29.99, 39.99]),
        Column::new("category", ["Tools", "Electronics", "Hardware"]),
        Column::new("in_stock", [true, false, true]),
        Column::new("created_at", ["2024-01-01", "2024-01-02", "2024-01-03"]),
        Column::new("extra_product_column", ["will", "be", "filtered"]),
    ])
}

fn show(engine: &ValidationEngine, schema: &Schema, data: &Frame) -> anyhow::Result<()> {
    let filtered = engine.validate(schema, data)?;
    let (rows, columns) = filtered.shape();
    println!("{}", schema.name());
    println!("  columns: {}", filtered.column_names().join(", "));
    println!("  shape:   ({rows}, {columns})");
    Ok(())
}

pub fn run() -> anyhow::Result<ExitCode> {
    let users = full_user_model()?;
    let products = full_product_model()?;

    let contact = Schema::define_subset(
        "ContactDataModel",
        vec![
            ColumnDef::integer("user_id").ge(1.0),
            ColumnDef::string("name"),
            ColumnDef::string("email"),
        ],
        &users,
    )?;
    let finance = Schema::project("FinanceDataModel", &users, &["user_id", "salary", "department"])?;
    let basics = Schema::project("UserBasicsModel", &users, &["user_id", "name", "age"])?;
    let summary = Schema::project("ProductSummaryModel", &products, &["product_id", "name", "price"])?;
    let inventory =
        Schema::project("ProductInventoryModel", &products, &["product_id", "name", "in_stock"])?;

    println!("Declared subsets:");
    for subset in [&contact, &finance, &basics, &summary, &inventory] {
        println!("  {subset}");
    }
    println!();

    let engine = ValidationEngine::new();
    let user_data = sample_users()?;
    let (rows, columns) = user_data.shape();
    println!("User data: ({rows}, {columns}) {}", user_data.column_names().join(", "));
    for subset in [&contact, &finance, &basics] {
        show(&engine, subset, &user_data)?;
    }
    println!();

    let product_data = sample_products()?;
    let (rows, columns) = product_data.shape();
    println!("Product data: ({rows}, {columns}) {}", product_data.column_names().join(", "));
    for subset in [&summary, &inventory] {
        show(&engine, subset, &product_data)?;
    }
    println!();

    println!("Declaring a subset with a wrong column type:");
    match Schema::define_subset(
        "BrokenContactModel",
        vec![ColumnDef::string("user_id"), ColumnDef::string("email")],
        &users,
    ) {
        Ok(schema) => anyhow::bail!("{} was accepted", schema.name()),
        Err(err) => println!("  rejected: {err}"),
    }

    println!("Declaring a subset with an unknown column:");
    match Schema::project("GhostModel", &users, &["user_id", "ghost_column"]) {
        Ok(schema) => anyhow::bail!("{} was accepted", schema.name()),
        Err(err) => println!("  rejected: {err}"),
    }

    Ok(ExitCode::SUCCESS)
}
