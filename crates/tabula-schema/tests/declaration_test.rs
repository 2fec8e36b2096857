//! Declaration-time behaviour of subset schemas

use std::path::PathBuf;
use std::sync::Arc;
use tabula_schema::{CatalogLoader, ColumnDef, ColumnType, Error, Schema};

fn users() -> Arc<Schema> {
    Schema::define(
        "Users",
        vec![
            ColumnDef::integer("user_id"),
            ColumnDef::string("name"),
            ColumnDef::string("email"),
            ColumnDef::integer("age"),
        ],
    )
    .unwrap()
}

fn products() -> Arc<Schema> {
    Schema::define(
        "Products",
        vec![
            ColumnDef::integer("product_id"),
            ColumnDef::string("name"),
            ColumnDef::float("price"),
        ],
    )
    .unwrap()
}

fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

#[test]
fn compatible_subset_binds_to_its_superset() {
    let users = users();
    let contact = Schema::define_subset(
        "Contact",
        vec![
            ColumnDef::integer("user_id"),
            ColumnDef::string("name"),
            ColumnDef::string("email"),
        ],
        &users,
    )
    .unwrap();

    assert!(Arc::ptr_eq(contact.superset_of().unwrap(), &users));
    assert_eq!(contact.columns_of(), vec!["user_id", "name", "email"]);
    assert!(users.superset_of().is_none());
}

#[test]
fn wrong_type_is_a_type_mismatch() {
    let err = Schema::define_subset(
        "Contact",
        vec![ColumnDef::string("user_id"), ColumnDef::string("name")],
        &users(),
    )
    .unwrap_err();

    assert!(err.to_string().contains("user_id"));
    let Error::TypeMismatch { mismatches, .. } = err else {
        panic!("expected type mismatch");
    };
    assert_eq!(mismatches.len(), 1);
    assert_eq!(mismatches[0].column, "user_id");
}

#[test]
fn unknown_column_is_missing_column() {
    let err = Schema::define_subset(
        "Ghost",
        vec![ColumnDef::integer("user_id"), ColumnDef::string("ghost")],
        &users(),
    )
    .unwrap_err();

    let Error::MissingColumns {
        subset,
        superset,
        missing,
        available,
        ..
    } = err
    else {
        panic!("expected missing columns");
    };
    assert_eq!(subset, "Ghost");
    assert_eq!(superset, "Users");
    assert_eq!(missing, vec!["ghost"]);
    assert_eq!(available, vec!["age", "email", "name", "user_id"]);
}

#[test]
fn integer_does_not_widen_to_float() {
    let err = Schema::define_subset("Prices", vec![ColumnDef::integer("price")], &products())
        .unwrap_err();
    let Error::TypeMismatch { mismatches, .. } = err else {
        panic!("expected type mismatch");
    };
    assert_eq!(mismatches[0].subset_type, ColumnType::Integer);
    assert_eq!(mismatches[0].superset_type, ColumnType::Float);
}

#[test]
fn empty_subset_is_always_accepted() {
    for superset in [users(), products(), Schema::define("Empty", Vec::new()).unwrap()] {
        let empty = Schema::define_subset("Nothing", Vec::new(), &superset).unwrap();
        assert!(Arc::ptr_eq(empty.superset_of().unwrap(), &superset));
    }
}

#[test]
fn subsets_of_different_supersets_are_independent() {
    let users = users();
    let products = products();

    let user_names = Schema::project("UserNames", &users, &["user_id", "name"]).unwrap();
    let product_names = Schema::project("ProductNames", &products, &["product_id", "name"]).unwrap();
    assert_ne!(
        user_names.superset_of().unwrap().id(),
        product_names.superset_of().unwrap().id()
    );

    // a failure against one superset does not affect the other
    assert!(Schema::project("Bad", &users, &["price"]).is_err());
    assert!(Schema::project("Good", &products, &["price"]).is_ok());
}

#[test]
fn repeated_declarations_have_identical_outcomes() {
    let users = users();
    let columns = || vec![ColumnDef::integer("user_id"), ColumnDef::string("email")];

    let first = Schema::define_subset("Contact", columns(), &users).unwrap();
    let second = Schema::define_subset("Contact", columns(), &users).unwrap();
    assert_ne!(first.id(), second.id());
    assert_eq!(first.columns_of(), second.columns_of());

    let bad = || vec![ColumnDef::float("user_id")];
    let first = Schema::define_subset("Bad", bad(), &users).unwrap_err();
    let second = Schema::define_subset("Bad", bad(), &users).unwrap_err();
    assert_eq!(first.to_string(), second.to_string());
}

#[test]
fn catalog_file_declares_demo_schemas() -> anyhow::Result<()> {
    let loader = CatalogLoader::new();
    let schemas = loader.load_from_file(&repo_root().join("testdata/catalogs/users_products.yaml"))?;
    assert_eq!(schemas.len(), 7);

    let registry = loader.registry();
    let user_subsets: Vec<String> = registry
        .subsets_of("FullUserDataModel")
        .iter()
        .map(|s| s.name().to_string())
        .collect();
    assert_eq!(
        user_subsets,
        vec!["ContactDataModel", "FinanceDataModel", "UserBasicsModel"]
    );
    assert_eq!(registry.subsets_of("FullProductDataModel").len(), 2);
    Ok(())
}

#[test]
fn catalog_with_rejected_subset_fails() {
    let result = CatalogLoader::new()
        .load_from_file(&repo_root().join("testdata/catalogs/invalid_subset.yaml"));
    assert!(matches!(result, Err(ref e) if e.is_incompatibility()));
}

#[test]
fn missing_catalog_file_is_io_error() {
    let result = CatalogLoader::new().load_from_file(&repo_root().join("testdata/catalogs/nope.yaml"));
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn check_that_cannot_apply_fails_declaration() {
    let err = Schema::define("Users", vec![ColumnDef::string("name").ge(1.0)]).unwrap_err();
    assert!(matches!(err, Error::InvalidDeclaration(ref m) if m.contains("requires a numeric column")));

    let catalog = r#"
schemas:
  - name: Users
    columns:
      - { name: user_id, type: int, checks: [ { str_matches: "^[0-9]+$" } ] }
"#;
    let loader = CatalogLoader::new();
    assert!(matches!(
        loader.load_from_yaml(catalog),
        Err(Error::InvalidDeclaration(_))
    ));
    assert!(loader.registry().is_empty());
}
