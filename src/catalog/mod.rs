//! Product Catalog Module
//!
//! This module contains the static product catalog, including:
//! - Product models and filter dimensions
//! - Loading from the bundled data file or a JSON file on disk
//! - Filter value derivation (distinct brands, genders, categories)

pub mod helpers;
pub mod loader;
pub mod models;

// Re-export commonly used types for convenience
pub use models::{Catalog, FilterDimension, FilterOptions, Product, ProductId, ALL};
