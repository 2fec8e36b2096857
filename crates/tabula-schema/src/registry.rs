//! Named schema registry

use crate::model::ColumnDef;
use crate::schema::Schema;
use crate::{Error, Result};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use tracing::trace;

/// Thread-safe registry of declared schemas, keyed by schema name
///
/// Names are unique: a name is bound once and never rebound. Subsets are
/// declared against a superset already present in the registry.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: DashMap<String, Arc<Schema>>,
}

impl SchemaRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare and register an unbound schema
    pub fn declare(&self, name: &str, columns: Vec<ColumnDef>) -> Result<Arc<Schema>> {
        match self.schemas.entry(name.to_string()) {
            Entry::Occupied(_) => Err(Error::AlreadyDeclared(name.to_string())),
            Entry::Vacant(slot) => {
                let schema = Schema::define(name, columns)?;
                slot.insert(Arc::clone(&schema));
                Ok(schema)
            }
        }
    }

    /// Declare and register a subset of the registered schema `superset`
    pub fn declare_subset(
        &self,
        name: &str,
        columns: Vec<ColumnDef>,
        superset: &str,
    ) -> Result<Arc<Schema>> {
        // Resolve the superset first so no shard guard is held across the entry call.
        let superset_schema = self.get(superset).ok_or_else(|| {
            Error::NotFound(format!("superset '{superset}' (referenced by '{name}')"))
        })?;

        match self.schemas.entry(name.to_string()) {
            Entry::Occupied(_) => Err(Error::AlreadyDeclared(name.to_string())),
            Entry::Vacant(slot) => {
                let schema = Schema::define_subset(name, columns, &superset_schema)?;
                slot.insert(Arc::clone(&schema));
                Ok(schema)
            }
        }
    }

    /// Register a schema declared elsewhere under its own name
    pub fn register(&self, schema: Arc<Schema>) -> Result<()> {
        match self.schemas.entry(schema.name().to_string()) {
            Entry::Occupied(_) => Err(Error::AlreadyDeclared(schema.name().to_string())),
            Entry::Vacant(slot) => {
                trace!(schema = %schema.name(), id = %schema.id(), "Registered schema");
                slot.insert(schema);
                Ok(())
            }
        }
    }

    /// Remove `schema` if it is the one registered under its name
    pub(crate) fn unregister(&self, schema: &Schema) {
        if self
            .schemas
            .remove_if(schema.name(), |_, registered| registered.id() == schema.id())
            .is_some()
        {
            trace!(schema = %schema.name(), id = %schema.id(), "Unregistered schema");
        }
    }

    /// Get a schema by name
    pub fn get(&self, name: &str) -> Option<Arc<Schema>> {
        self.schemas.get(name).map(|entry| Arc::clone(entry.value()))
    }

    /// Check if a schema exists
    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.schemas.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Registered subsets bound to the registered schema `superset`, sorted by name
    pub fn subsets_of(&self, superset: &str) -> Vec<Arc<Schema>> {
        let Some(parent) = self.get(superset) else {
            return Vec::new();
        };
        let mut subsets: Vec<Arc<Schema>> = self
            .schemas
            .iter()
            .filter(|e| e.value().superset_of().is_some_and(|s| s.id() == parent.id()))
            .map(|e| Arc::clone(e.value()))
            .collect();
        subsets.sort_by(|a, b| a.name().cmp(b.name()));
        subsets
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product_columns() -> Vec<ColumnDef> {
        vec![
            ColumnDef::integer("product_id").ge(1.0),
            ColumnDef::string("name"),
            ColumnDef::float("price").ge(0.0),
            ColumnDef::string("category"),
            ColumnDef::boolean("in_stock"),
        ]
    }

    #[test]
    fn test_declare_and_get() {
        let registry = SchemaRegistry::new();
        let products = registry.declare("Products", product_columns()).unwrap();
        assert!(registry.contains("Products"));
        assert_eq!(registry.get("Products").unwrap().id(), products.id());
        assert!(registry.get("Missing").is_none());
    }

    #[test]
    fn test_declare_subset_by_name() {
        let registry = SchemaRegistry::new();
        let products = registry.declare("Products", product_columns()).unwrap();
        let summary = registry
            .declare_subset(
                "ProductSummary",
                vec![ColumnDef::integer("product_id"), ColumnDef::float("price")],
                "Products",
            )
            .unwrap();
        assert!(Arc::ptr_eq(summary.superset_of().unwrap(), &products));
        assert_eq!(registry.names(), vec!["ProductSummary", "Products"]);
    }

    #[test]
    fn test_rejected_subset_not_registered() {
        let registry = SchemaRegistry::new();
        registry.declare("Products", product_columns()).unwrap();
        let err = registry
            .declare_subset("Bad", vec![ColumnDef::integer("price")], "Products")
            .unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
        assert!(!registry.contains("Bad"));
    }

    #[test]
    fn test_unknown_superset() {
        let registry = SchemaRegistry::new();
        let err = registry
            .declare_subset("Orphan", Vec::new(), "Nowhere")
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_names_are_bound_once() {
        let registry = SchemaRegistry::new();
        registry.declare("Products", product_columns()).unwrap();
        assert!(matches!(
            registry.declare("Products", Vec::new()),
            Err(Error::AlreadyDeclared(_))
        ));
        let other = Schema::define("Products", Vec::new()).unwrap();
        assert!(registry.register(other).is_err());
    }

    #[test]
    fn test_subsets_of() {
        let registry = SchemaRegistry::new();
        registry.declare("Products", product_columns()).unwrap();
        registry.declare("Users", vec![ColumnDef::integer("user_id")]).unwrap();
        registry
            .declare_subset("Stock", vec![ColumnDef::boolean("in_stock")], "Products")
            .unwrap();
        registry
            .declare_subset("Prices", vec![ColumnDef::float("price")], "Products")
            .unwrap();
        registry
            .declare_subset("UserIds", vec![ColumnDef::integer("user_id")], "Users")
            .unwrap();

        let names: Vec<String> = registry
            .subsets_of("Products")
            .iter()
            .map(|s| s.name().to_string())
            .collect();
        assert_eq!(names, vec!["Prices", "Stock"]);
        assert!(registry.subsets_of("Stock").is_empty());
        assert!(registry.subsets_of("Unknown").is_empty());
        assert_eq!(registry.len(), 5);
    }
}
