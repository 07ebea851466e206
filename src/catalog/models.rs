//! Product Catalog Models
//!
//! This module contains the data structures describing the products on sale
//! and the dimensions they can be filtered by.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::helpers::{deserialize_flag, distinct_values, serialize_flag};
use crate::error::CatalogError;

// =============================================================================
// Constants
// =============================================================================

/// Sentinel filter value that matches every product
pub const ALL: &str = "ALL";

// =============================================================================
// Catalog Domain Models
// =============================================================================

/// Unique product identifier
pub type ProductId = i64;

/// A product record, created once at load time and never mutated
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique identifier
    pub id: ProductId,

    /// Display name
    pub name: String,

    pub brand: String,
    pub gender: String,
    pub category: String,

    /// Unit price
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    /// Only in-inventory products are ever shown
    pub is_in_inventory: bool,

    /// Remaining stock count
    pub items_left: u32,

    #[serde(rename = "imageURL")]
    pub image_url: String,

    pub slug: String,

    /// Data files carry this as 0/1 and it is emitted the same way
    #[serde(
        serialize_with = "serialize_flag",
        deserialize_with = "deserialize_flag"
    )]
    pub featured: bool,
}

/// One of the three attributes the storefront can filter by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterDimension {
    Brand,
    Gender,
    Category,
}

impl FilterDimension {
    /// Every dimension, in display order
    pub const EVERY: [FilterDimension; 3] = [Self::Brand, Self::Gender, Self::Category];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Brand => "brand",
            Self::Gender => "gender",
            Self::Category => "category",
        }
    }

    /// Returns the product's value for this dimension
    pub fn value_of(self, product: &Product) -> &str {
        match self {
            Self::Brand => &product.brand,
            Self::Gender => &product.gender,
            Self::Category => &product.category,
        }
    }
}

impl fmt::Display for FilterDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterDimension {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "brand" => Ok(Self::Brand),
            "gender" => Ok(Self::Gender),
            "category" => Ok(Self::Category),
            _ => Err(CatalogError::UnknownDimension(s.to_string())),
        }
    }
}

/// Filter values for every dimension, each list starting with `"ALL"`
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FilterOptions {
    pub brands: Vec<String>,
    pub genders: Vec<String>,
    pub categories: Vec<String>,
}

// =============================================================================
// Catalog
// =============================================================================

/// The static, load-time-fixed list of purchasable products
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Builds a catalog, rejecting duplicate identifiers
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = std::collections::HashSet::with_capacity(products.len());
        for product in &products {
            if !seen.insert(product.id) {
                return Err(CatalogError::DuplicateId(product.id));
            }
        }
        Ok(Self { products })
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Looks up a product by identifier
    pub fn find(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// `"ALL"` followed by each distinct value of `dimension`, in first-seen order
    pub fn filter_values(&self, dimension: FilterDimension) -> Vec<String> {
        let mut values = vec![ALL.to_string()];
        values.extend(distinct_values(
            self.products.iter().map(|p| dimension.value_of(p)),
        ));
        values
    }

    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions {
            brands: self.filter_values(FilterDimension::Brand),
            genders: self.filter_values(FilterDimension::Gender),
            categories: self.filter_values(FilterDimension::Category),
        }
    }
}
