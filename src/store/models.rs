//! Store Domain Models
//!
//! This module contains the data structures making up the single mutable
//! aggregate of the storefront: filter selections, cart lines and the two
//! visibility flags.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc};

use crate::catalog::{FilterDimension, Product, ProductId, ALL};

// =============================================================================
// Filter Selection
// =============================================================================

/// A filter field: either the `"ALL"` sentinel or an exact value
///
/// Any string other than `"ALL"` is kept verbatim, known to the catalog or not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Selection {
    #[default]
    All,
    Exact(String),
}

impl Selection {
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::All => true,
            Self::Exact(selected) => selected == value,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL,
            Self::Exact(value) => value,
        }
    }
}

impl From<String> for Selection {
    fn from(value: String) -> Self {
        if value == ALL {
            Self::All
        } else {
            Self::Exact(value)
        }
    }
}

impl From<&str> for Selection {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<Selection> for String {
    fn from(selection: Selection) -> Self {
        match selection {
            Selection::All => ALL.to_string(),
            Selection::Exact(value) => value,
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Cart
// =============================================================================

/// A product plus a quantity; quantity is always at least 1
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CartLine {
    #[serde(flatten)]
    pub product: Product,

    pub quantity: u32,
}

impl CartLine {
    pub fn new(product: Product) -> Self {
        Self {
            product,
            quantity: 1,
        }
    }

    pub fn id(&self) -> ProductId {
        self.product.id
    }

    /// price × quantity
    pub fn subtotal(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

// =============================================================================
// Store State
// =============================================================================

/// Complete snapshot of the storefront state
///
/// Snapshots are never mutated once published; every store action builds a
/// new one.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoreState {
    pub selected_brand: Selection,
    pub selected_gender: Selection,
    pub selected_category: Selection,

    /// Existing lines keep their position; new lines are appended
    pub cart: Vec<CartLine>,

    pub cart_open: bool,
    pub checkout_in_progress: bool,
}

impl StoreState {
    pub fn selection(&self, dimension: FilterDimension) -> &Selection {
        match dimension {
            FilterDimension::Brand => &self.selected_brand,
            FilterDimension::Gender => &self.selected_gender,
            FilterDimension::Category => &self.selected_category,
        }
    }

    pub fn selection_mut(&mut self, dimension: FilterDimension) -> &mut Selection {
        match dimension {
            FilterDimension::Brand => &mut self.selected_brand,
            FilterDimension::Gender => &mut self.selected_gender,
            FilterDimension::Category => &mut self.selected_category,
        }
    }

    /// True when the product passes all three selections
    pub fn matches(&self, product: &Product) -> bool {
        FilterDimension::EVERY
            .iter()
            .all(|d| self.selection(*d).matches(d.value_of(product)))
    }

    pub fn cart_line(&self, id: ProductId) -> Option<&CartLine> {
        self.cart.iter().find(|line| line.id() == id)
    }
}

// =============================================================================
// Change Notifications
// =============================================================================

/// The kind of action that produced a new snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreEvent {
    FilterChanged,
    FiltersReset,
    CartPanelToggled,
    CartChanged,
    CheckoutStarted,
    CheckoutCompleted,
}

impl StoreEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FilterChanged => "filter_changed",
            Self::FiltersReset => "filters_reset",
            Self::CartPanelToggled => "cart_panel_toggled",
            Self::CartChanged => "cart_changed",
            Self::CheckoutStarted => "checkout_started",
            Self::CheckoutCompleted => "checkout_completed",
        }
    }
}

/// Delivered on the store's event channel after every mutation
#[derive(Debug, Clone)]
pub struct StateChange {
    /// Increases by one per mutation
    pub version: u64,
    pub event: StoreEvent,
    pub state: Arc<StoreState>,
}

/// Snapshot plus cart totals, as served to the presentation layer
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreView {
    #[serde(flatten)]
    pub state: StoreState,

    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,

    pub total_items: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_from_sentinel() {
        assert_eq!(Selection::from("ALL"), Selection::All);
        assert_eq!(Selection::from("Nike"), Selection::Exact("Nike".into()));
        assert_eq!(String::from(Selection::All), "ALL");
    }

    #[test]
    fn test_selection_matching() {
        assert!(Selection::All.matches("anything"));
        assert!(Selection::from("Nike").matches("Nike"));
        assert!(!Selection::from("Nike").matches("nike"));
    }

    #[test]
    fn test_state_serializes_selections_as_strings() {
        let state = StoreState {
            selected_brand: Selection::from("Vans"),
            ..StoreState::default()
        };
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["selectedBrand"], "Vans");
        assert_eq!(value["selectedGender"], "ALL");
        assert_eq!(value["cartOpen"], false);
        assert_eq!(value["checkoutInProgress"], false);
    }
}
