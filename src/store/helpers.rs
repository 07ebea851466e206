//! Store Business Logic Helpers
//!
//! Pure functions over catalog, filter and cart state: the derived views the
//! presentation layer renders and the cart transforms the store actions apply.

use rust_decimal::Decimal;

use super::models::{CartLine, StoreState};
use crate::catalog::{Catalog, Product, ProductId};

// =============================================================================
// Derived Views
// =============================================================================

/// Products passing every filter selection and in inventory, in catalog order
pub fn visible_products<'a>(products: &'a [Product], state: &StoreState) -> Vec<&'a Product> {
    products
        .iter()
        .filter(|p| state.matches(p) && p.is_in_inventory)
        .collect()
}

/// Sum of price × quantity over the cart
pub fn cart_total_price(cart: &[CartLine]) -> Decimal {
    cart.iter().map(CartLine::subtotal).sum()
}

/// Sum of quantities over the cart
pub fn cart_total_items(cart: &[CartLine]) -> u64 {
    cart.iter().map(|line| u64::from(line.quantity)).sum()
}

/// Produces a human-readable one-line summary of the cart.
///
/// Example output: `"2x Air Max 90, 1x Samba OG"`.
pub fn format_cart_summary(cart: &[CartLine]) -> String {
    cart.iter()
        .map(|line| format!("{}x {}", line.quantity, line.product.name))
        .collect::<Vec<_>>()
        .join(", ")
}

// =============================================================================
// Cart Transforms
// =============================================================================

/// Increments the line for `id`, or appends a new line when the catalog knows
/// the product.
///
/// Returns `false` when `id` is neither in the cart nor in the catalog.
pub fn add_line(cart: &mut Vec<CartLine>, catalog: &Catalog, id: ProductId) -> bool {
    if let Some(existing) = cart.iter_mut().find(|line| line.id() == id) {
        existing.quantity = existing.quantity.saturating_add(1);
        return true;
    }

    match catalog.find(id) {
        Some(product) => {
            cart.push(CartLine::new(product.clone()));
            true
        }
        None => false,
    }
}

/// Drops the line for `id`. Returns whether a line was removed.
pub fn remove_line(cart: &mut Vec<CartLine>, id: ProductId) -> bool {
    let before = cart.len();
    cart.retain(|line| line.id() != id);
    cart.len() != before
}

/// Replaces the quantity of the line for `id`; zero or below removes it.
///
/// Never creates a line. Returns whether a line was touched.
pub fn set_line_quantity(cart: &mut Vec<CartLine>, id: ProductId, quantity: i64) -> bool {
    if quantity <= 0 {
        return remove_line(cart, id);
    }

    let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
    match cart.iter_mut().find(|line| line.id() == id) {
        Some(line) => {
            line.quantity = quantity;
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::models::Selection;

    fn shoe(id: ProductId, brand: &str, price: i64, in_inventory: bool) -> Product {
        Product {
            id,
            name: format!("Shoe {id}"),
            brand: brand.into(),
            gender: "MEN".into(),
            category: "RUNNING".into(),
            price: Decimal::from(price),
            is_in_inventory: in_inventory,
            items_left: 3,
            image_url: String::new(),
            slug: format!("shoe-{id}"),
            featured: false,
        }
    }

    fn catalog() -> Catalog {
        Catalog::new(vec![
            shoe(1, "Nike", 100, true),
            shoe(2, "Adidas", 50, false),
            shoe(3, "Nike", 25, true),
        ])
        .unwrap()
    }

    #[test]
    fn test_visible_products_all_filters() {
        let catalog = catalog();
        let visible = visible_products(catalog.products(), &StoreState::default());
        let ids: Vec<_> = visible.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3], "only in-inventory products, catalog order");
    }

    #[test]
    fn test_visible_products_unknown_value_is_empty() {
        let catalog = catalog();
        let state = StoreState {
            selected_brand: Selection::from("Puma"),
            ..StoreState::default()
        };
        assert!(visible_products(catalog.products(), &state).is_empty());
    }

    #[test]
    fn test_add_line_aggregates() {
        let catalog = catalog();
        let mut cart = Vec::new();
        assert!(add_line(&mut cart, &catalog, 1));
        assert!(add_line(&mut cart, &catalog, 3));
        assert!(add_line(&mut cart, &catalog, 1));

        assert_eq!(cart.len(), 2);
        assert_eq!(cart[0].id(), 1);
        assert_eq!(cart[0].quantity, 2);
        assert_eq!(cart[1].id(), 3);
    }

    #[test]
    fn test_add_line_unknown_id() {
        let mut cart = Vec::new();
        assert!(!add_line(&mut cart, &catalog(), 42));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_line_quantity_zero_removes() {
        let catalog = catalog();
        let mut cart = Vec::new();
        add_line(&mut cart, &catalog, 1);
        assert!(set_line_quantity(&mut cart, 1, 0));
        assert!(cart.is_empty());
        assert!(!set_line_quantity(&mut cart, 1, -3));
    }

    #[test]
    fn test_set_line_quantity_does_not_create() {
        let mut cart = Vec::new();
        assert!(!set_line_quantity(&mut cart, 1, 4));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_totals_and_summary() {
        let catalog = catalog();
        let mut cart = Vec::new();
        add_line(&mut cart, &catalog, 1);
        add_line(&mut cart, &catalog, 1);
        add_line(&mut cart, &catalog, 3);

        assert_eq!(cart_total_price(&cart), Decimal::from(225));
        assert_eq!(cart_total_items(&cart), 3);
        assert_eq!(format_cart_summary(&cart), "2x Shoe 1, 1x Shoe 3");
    }
}
