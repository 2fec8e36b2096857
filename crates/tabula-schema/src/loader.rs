//! Schema catalog loader
//!
//! A catalog file declares many schemas at once. Supersets are declared
//! before the subsets that reference them, independent of file order.

use crate::model::ColumnDef;
use crate::registry::SchemaRegistry;
use crate::schema::Schema;
use crate::{Error, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

/// Serializable catalog format
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    schemas: Vec<SchemaFile>,
}

#[derive(Debug, Deserialize)]
struct SchemaFile {
    name: String,
    #[serde(default)]
    superset: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    columns: Vec<ColumnDef>,
}

/// Loads catalog files into a [`SchemaRegistry`]
pub struct CatalogLoader {
    registry: Arc<SchemaRegistry>,
}

impl CatalogLoader {
    /// Create a loader with a fresh registry
    pub fn new() -> Self {
        Self {
            registry: Arc::new(SchemaRegistry::new()),
        }
    }

    /// Create a loader that declares into an existing registry
    pub fn with_registry(registry: Arc<SchemaRegistry>) -> Self {
        Self { registry }
    }

    /// The registry schemas are declared into
    pub fn registry(&self) -> &Arc<SchemaRegistry> {
        &self.registry
    }

    /// Load a catalog file, YAML or JSON by extension
    ///
    /// Returns the declared schemas in file order.
    pub fn load_from_file(&self, path: &Path) -> Result<Vec<Arc<Schema>>> {
        trace!("Loading catalog from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;

        if path
            .extension()
            .is_some_and(|e| e == "yaml" || e == "yml")
        {
            self.load_from_yaml(&content)
        } else {
            self.load_from_json(&content)
        }
    }

    /// Load a catalog from a JSON string
    pub fn load_from_json(&self, json: &str) -> Result<Vec<Arc<Schema>>> {
        let catalog: CatalogFile = serde_json::from_str(json)
            .map_err(|e| Error::InvalidFormat(format!("JSON parse error: {e}")))?;
        self.declare_all(catalog.schemas)
    }

    /// Load a catalog from a YAML string
    pub fn load_from_yaml(&self, yaml: &str) -> Result<Vec<Arc<Schema>>> {
        let catalog: CatalogFile = serde_yaml::from_str(yaml)
            .map_err(|e| Error::InvalidFormat(format!("YAML parse error: {e}")))?;
        self.declare_all(catalog.schemas)
    }

    fn declare_all(&self, entries: Vec<SchemaFile>) -> Result<Vec<Arc<Schema>>> {
        let mut by_name: HashMap<&str, &SchemaFile> = HashMap::new();
        for entry in &entries {
            if by_name.insert(entry.name.as_str(), entry).is_some()
                || self.registry.contains(&entry.name)
            {
                return Err(Error::AlreadyDeclared(entry.name.clone()));
            }
        }

        // Declarations are staged and only registered once every entry succeeds.
        let mut staged = HashMap::new();
        for entry in &entries {
            let mut visiting = Vec::new();
            self.resolve(entry, &by_name, &mut staged, &mut visiting)?;
        }

        let schemas = entries
            .iter()
            .map(|e| {
                staged
                    .get(e.name.as_str())
                    .map(Arc::clone)
                    .ok_or_else(|| Error::NotFound(e.name.clone()))
            })
            .collect::<Result<Vec<_>>>()?;
        self.commit(&schemas)?;

        info!(count = schemas.len(), "Loaded schema catalog");
        Ok(schemas)
    }

    /// Register every staged schema, or none of them
    fn commit(&self, schemas: &[Arc<Schema>]) -> Result<()> {
        for (index, schema) in schemas.iter().enumerate() {
            if let Err(err) = self.registry.register(Arc::clone(schema)) {
                warn!(schema = %schema.name(), "Catalog registration failed, rolling back");
                for registered in &schemas[..index] {
                    self.registry.unregister(registered);
                }
                return Err(err);
            }
        }
        Ok(())
    }

    /// Declare `entry`, declaring its superset chain first
    fn resolve<'a>(
        &self,
        entry: &'a SchemaFile,
        by_name: &HashMap<&'a str, &'a SchemaFile>,
        staged: &mut HashMap<&'a str, Arc<Schema>>,
        visiting: &mut Vec<&'a str>,
    ) -> Result<()> {
        if staged.contains_key(entry.name.as_str()) {
            return Ok(());
        }
        if visiting.contains(&entry.name.as_str()) {
            visiting.push(&entry.name);
            return Err(Error::Cycle(visiting.join(" -> ")));
        }
        visiting.push(&entry.name);

        let schema = match &entry.superset {
            None => Schema::builder(&entry.name),
            Some(superset) => {
                if let Some(&parent) = by_name.get(superset.as_str()) {
                    self.resolve(parent, by_name, staged, visiting)?;
                }
                let parent = staged
                    .get(superset.as_str())
                    .map(Arc::clone)
                    .or_else(|| self.registry.get(superset))
                    .ok_or_else(|| {
                        Error::NotFound(format!(
                            "superset '{superset}' (referenced by '{}')",
                            entry.name
                        ))
                    })?;
                Schema::builder(&entry.name).subset_of(&parent)
            }
        };

        let mut schema = schema.columns(entry.columns.iter().cloned());
        if let Some(description) = &entry.description {
            schema = schema.description(description);
        }
        let schema = schema.build()?;
        debug!(schema = %schema, "Declared catalog entry");

        visiting.pop();
        staged.insert(entry.name.as_str(), schema);
        Ok(())
    }
}

impl Default for CatalogLoader {
    fn default() -> Self {
        Self::new()
    }
}
