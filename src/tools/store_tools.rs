//! Store actions exposed as tools
//!
//! Each tool decodes its arguments, posts a "<name> called" notification and
//! forwards to the matching [`Store`] operation, so an agent drives exactly
//! the same state machine as a human user.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::sync::Arc;

use super::{
    models::{ContentBlock, InputSchema, ParamType, ToolDescriptor, ToolOutput},
    notifications::Notifier,
    registry::{ToolHandle, ToolHost, ToolScope},
};
use crate::{
    catalog::{FilterDimension, ProductId},
    error::ToolError,
    store::Store,
};

// =============================================================================
// Tool Names
// =============================================================================

pub const GET_ALL_STORE_ITEMS: &str = "get_all_store_items";
pub const ADD_TO_CART: &str = "add_to_cart";
pub const DISPLAY_CART: &str = "display_cart";
pub const PURCHASE_CART: &str = "purchase_cart";
pub const GET_FILTER_OPTIONS: &str = "get_filter_options";
pub const FILTER_BY_BRAND: &str = "filter_by_brand";
pub const FILTER_BY_GENDER: &str = "filter_by_gender";
pub const FILTER_BY_CATEGORY: &str = "filter_by_category";

/// Every store tool, in registration order
pub const STORE_TOOL_NAMES: [&str; 8] = [
    GET_ALL_STORE_ITEMS,
    ADD_TO_CART,
    DISPLAY_CART,
    PURCHASE_CART,
    GET_FILTER_OPTIONS,
    FILTER_BY_BRAND,
    FILTER_BY_GENDER,
    FILTER_BY_CATEGORY,
];

// =============================================================================
// Arguments
// =============================================================================

/// `id` is any JSON number; only integral values can name a product
#[derive(Debug, Deserialize)]
struct AddToCartArgs {
    id: Number,
}

#[derive(Debug, Deserialize)]
struct BrandArgs {
    brand: String,
}

#[derive(Debug, Deserialize)]
struct GenderArgs {
    gender: String,
}

#[derive(Debug, Deserialize)]
struct CategoryArgs {
    category: String,
}

// =============================================================================
// Descriptors
// =============================================================================

/// Dependencies every store tool closes over
#[derive(Clone)]
pub struct StoreTools {
    store: Arc<Store>,
    notifier: Arc<dyn Notifier>,
}

impl StoreTools {
    pub fn new(store: Arc<Store>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    /// Builds one descriptor whose execute function announces itself first
    fn tool(
        &self,
        name: &'static str,
        description: &str,
        schema: InputSchema,
        run: impl Fn(&Arc<Store>, Value) -> Result<ToolOutput, ToolError> + Send + Sync + 'static,
    ) -> ToolDescriptor {
        let store = Arc::clone(&self.store);
        let notifier = Arc::clone(&self.notifier);
        ToolDescriptor::new(name, description, schema, move |args| {
            tracing::info!(tool = name, "Tool invoked");
            notifier.notify(&format!("{name} called"));
            run(&store, args)
        })
    }

    /// The fixed catalog of store tools
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        vec![
            self.tool(
                GET_ALL_STORE_ITEMS,
                "Get all available store items",
                InputSchema::empty(),
                |store, _| json_output(store.catalog().products()),
            ),
            self.tool(
                ADD_TO_CART,
                "Add an item to the shopping cart",
                InputSchema::empty().required(
                    "id",
                    ParamType::Number,
                    "The ID of the item to add to the cart",
                ),
                |store, args| {
                    let AddToCartArgs { id } = serde_json::from_value(args)?;
                    let label = match product_id(&id) {
                        Some(product) => {
                            store.add_to_cart(product);
                            product.to_string()
                        }
                        None => {
                            tracing::debug!(%id, "Ignoring non-integral product id");
                            id.to_string()
                        }
                    };
                    Ok(ToolOutput::Text(format!(
                        "Successfully added item {label} to cart"
                    )))
                },
            ),
            self.tool(
                DISPLAY_CART,
                "Display the current shopping cart items to user",
                InputSchema::empty(),
                |store, _| {
                    store.set_cart_open(true);
                    Ok(ToolOutput::Content(vec![ContentBlock::text(
                        "The shopping cart has been opened and is now visible to the user.",
                    )]))
                },
            ),
            self.tool(
                PURCHASE_CART,
                "Purchase the current shopping cart items",
                InputSchema::empty(),
                |store, _| {
                    // Completion runs on its own; the caller is not kept waiting.
                    drop(store.checkout()?);
                    Ok(ToolOutput::Text(
                        "Shopping cart purchased successfully".to_string(),
                    ))
                },
            ),
            self.tool(
                GET_FILTER_OPTIONS,
                "Get available filter options for products",
                InputSchema::empty(),
                |store, _| json_output(store.filter_options()),
            ),
            self.tool(
                FILTER_BY_BRAND,
                "Filter products by brand",
                InputSchema::empty().required("brand", ParamType::String, "The brand to filter by"),
                |store, args| {
                    let BrandArgs { brand } = serde_json::from_value(args)?;
                    Ok(apply_filter(store, FilterDimension::Brand, brand))
                },
            ),
            self.tool(
                FILTER_BY_GENDER,
                "Filter products by gender (e.g., MEN, WOMEN, KIDS)",
                InputSchema::empty().required(
                    "gender",
                    ParamType::String,
                    "The gender to filter by",
                ),
                |store, args| {
                    let GenderArgs { gender } = serde_json::from_value(args)?;
                    Ok(apply_filter(store, FilterDimension::Gender, gender))
                },
            ),
            self.tool(
                FILTER_BY_CATEGORY,
                "Filter products by category",
                InputSchema::empty().required(
                    "category",
                    ParamType::String,
                    "The category to filter by",
                ),
                |store, args| {
                    let CategoryArgs { category } = serde_json::from_value(args)?;
                    Ok(apply_filter(store, FilterDimension::Category, category))
                },
            ),
        ]
    }
}

/// Integral JSON numbers (`1`, `-5`, `1.0`) as a product id
fn product_id(id: &Number) -> Option<ProductId> {
    id.as_i64().or_else(|| {
        id.as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
            .map(|f| f as ProductId)
    })
}

fn json_output(value: impl Serialize) -> Result<ToolOutput, ToolError> {
    serde_json::to_value(value)
        .map(ToolOutput::Json)
        .map_err(ToolError::Output)
}

fn apply_filter(store: &Store, dimension: FilterDimension, value: String) -> ToolOutput {
    let message = format!("Successfully filtered by {dimension} {value}");
    store.set_filter(dimension, value);
    ToolOutput::Text(message)
}

// =============================================================================
// Registration
// =============================================================================

/// Registers every store tool for the rest of the process lifetime
pub fn register_store_tools(host: &dyn ToolHost, tools: &StoreTools) -> Vec<ToolHandle> {
    let handles: Vec<ToolHandle> = tools
        .descriptors()
        .into_iter()
        .map(|descriptor| host.register(descriptor))
        .collect();
    tracing::info!(count = handles.len(), "Registered store tools");
    handles
}

/// Registers every store tool until the returned scope is dropped
pub fn mount_store_tools(host: Arc<dyn ToolHost>, tools: &StoreTools) -> ToolScope {
    let mut scope = ToolScope::new(host);
    for descriptor in tools.descriptors() {
        scope.register(descriptor);
    }
    scope
}
