//! Catalog loading
//!
//! The catalog is read once at startup, either from the data file bundled
//! with the crate or from a JSON array on disk.

use std::path::Path;

use super::models::{Catalog, Product};
use crate::error::CatalogError;

/// Product data shipped with the crate
const BUILTIN_CATALOG: &str = include_str!("../../data/store_items.json");

impl Catalog {
    /// Parses a JSON array of products
    pub fn from_json(data: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(data)?;
        Self::new(products)
    }

    /// Reads and parses a catalog file
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let data = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&data)?;
        tracing::info!(path = %path.display(), products = catalog.len(), "Loaded catalog");
        Ok(catalog)
    }

    /// The bundled catalog
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Loads `path` when given, otherwise falls back to the bundled catalog
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(path) => Self::load(path),
            None => Self::builtin(),
        }
    }
}
