//! REST API handlers for storefront operations
//!
//! These are the routes the presentation layer drives the store through.
//! Every mutating route answers with the resulting snapshot and totals.

use axum::{
    extract::{Path, State},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
    routing::{get, post, put},
    Json, Router,
};
use futures_util::{stream, Stream};
use serde::Deserialize;
use std::convert::Infallible;
use tokio::sync::broadcast::error::RecvError;

use super::models::StoreView;
use crate::{
    catalog::{FilterDimension, Product, ProductId},
    error::AppError,
    state::SharedState,
};

/// Creates routes for storefront operations
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/api/state", get(get_state))
        .route("/api/catalog", get(get_catalog))
        .route("/api/catalog/:id", get(get_product))
        .route("/api/products", get(get_visible_products))
        .route("/api/filters", get(get_filter_options).post(set_filter))
        .route("/api/filters/reset", post(reset_filters))
        .route("/api/filters/:dimension", get(get_filter_values))
        .route("/api/cart/items", post(add_to_cart))
        .route(
            "/api/cart/items/:id",
            put(set_quantity).delete(remove_from_cart),
        )
        .route("/api/cart/panel", post(set_cart_panel))
        .route("/api/checkout", post(checkout))
        .route("/api/events", get(state_events))
        .route("/api/notifications", get(get_notifications))
}

// =============================================================================
// Request Bodies
// =============================================================================

#[derive(Debug, Deserialize)]
struct SetFilterInput {
    dimension: FilterDimension,
    value: String,
}

#[derive(Debug, Deserialize)]
struct AddToCartInput {
    id: ProductId,
}

#[derive(Debug, Deserialize)]
struct SetQuantityInput {
    quantity: i64,
}

#[derive(Debug, Deserialize)]
struct CartPanelInput {
    open: bool,
}

// =============================================================================
// Queries
// =============================================================================

/// Endpoint: GET /api/state
async fn get_state(State(state): State<SharedState>) -> Json<StoreView> {
    Json(state.store.view())
}

/// Endpoint: GET /api/catalog
async fn get_catalog(State(state): State<SharedState>) -> Json<Vec<Product>> {
    Json(state.store.catalog().products().to_vec())
}

/// Endpoint: GET /api/catalog/:id
async fn get_product(
    State(state): State<SharedState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>, AppError> {
    state
        .store
        .catalog()
        .find(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}

/// Endpoint: GET /api/products
async fn get_visible_products(State(state): State<SharedState>) -> Json<Vec<Product>> {
    Json(state.store.visible_products())
}

/// Endpoint: GET /api/filters
async fn get_filter_options(State(state): State<SharedState>) -> impl IntoResponse {
    Json(state.store.filter_options())
}

/// Endpoint: GET /api/filters/:dimension
async fn get_filter_values(
    State(state): State<SharedState>,
    Path(dimension): Path<String>,
) -> Result<Json<Vec<String>>, AppError> {
    let dimension: FilterDimension = dimension.parse()?;
    Ok(Json(state.store.filter_values(dimension)))
}

/// Endpoint: GET /api/notifications
async fn get_notifications(State(state): State<SharedState>) -> impl IntoResponse {
    Json(state.notifications.active())
}

// =============================================================================
// Actions
// =============================================================================

/// Endpoint: POST /api/filters
async fn set_filter(
    State(state): State<SharedState>,
    Json(payload): Json<SetFilterInput>,
) -> Json<StoreView> {
    state.store.set_filter(payload.dimension, payload.value);
    Json(state.store.view())
}

/// Endpoint: POST /api/filters/reset
async fn reset_filters(State(state): State<SharedState>) -> Json<StoreView> {
    state.store.reset_filters();
    Json(state.store.view())
}

/// Endpoint: POST /api/cart/items
async fn add_to_cart(
    State(state): State<SharedState>,
    Json(payload): Json<AddToCartInput>,
) -> Json<StoreView> {
    state.store.add_to_cart(payload.id);
    Json(state.store.view())
}

/// Endpoint: PUT /api/cart/items/:id
async fn set_quantity(
    State(state): State<SharedState>,
    Path(id): Path<ProductId>,
    Json(payload): Json<SetQuantityInput>,
) -> Json<StoreView> {
    state.store.set_quantity(id, payload.quantity);
    Json(state.store.view())
}

/// Endpoint: DELETE /api/cart/items/:id
async fn remove_from_cart(
    State(state): State<SharedState>,
    Path(id): Path<ProductId>,
) -> Json<StoreView> {
    state.store.remove_from_cart(id);
    Json(state.store.view())
}

/// Endpoint: POST /api/cart/panel
async fn set_cart_panel(
    State(state): State<SharedState>,
    Json(payload): Json<CartPanelInput>,
) -> Json<StoreView> {
    state.store.set_cart_open(payload.open);
    Json(state.store.view())
}

/// Endpoint: POST /api/checkout
/// Starts the simulated checkout; completion is reported on /api/events.
async fn checkout(State(state): State<SharedState>) -> Result<Json<StoreView>, AppError> {
    drop(state.store.checkout()?);
    Ok(Json(state.store.view()))
}

// =============================================================================
// Change Stream
// =============================================================================

/// Endpoint: GET /api/events
/// Streams one `state` event per published snapshot.
async fn state_events(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = state.store.events();

    let events = stream::unfold(receiver, |mut receiver| async move {
        loop {
            match receiver.recv().await {
                Ok(change) => {
                    let event = Event::default()
                        .event("state")
                        .id(change.version.to_string())
                        .json_data(serde_json::json!({
                            "event": change.event,
                            "state": &*change.state,
                        }))
                        .unwrap_or_else(|_| Event::default().comment("serialization failed"));
                    return Some((Ok(event), receiver));
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Event stream lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}
