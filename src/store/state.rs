//! Store State Container
//!
//! `Store` is the single owner of [`StoreState`]. Every action clones the
//! current snapshot, applies its change and publishes the result as a whole,
//! so readers never observe a half-applied update. Listeners are told about
//! each published snapshot in two ways: synchronous callbacks registered with
//! [`Store::subscribe`], and a broadcast channel obtained from
//! [`Store::events`].

use dashmap::DashMap;
use rust_decimal::Decimal;
use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Weak,
    },
    time::Duration,
};
use tokio::{
    sync::{broadcast, watch},
    task::JoinHandle,
};

use super::{
    helpers::{
        add_line, cart_total_items, cart_total_price, format_cart_summary, remove_line,
        set_line_quantity, visible_products,
    },
    models::{Selection, StateChange, StoreEvent, StoreState, StoreView},
};
use crate::{
    catalog::{Catalog, FilterDimension, FilterOptions, Product, ProductId},
    error::CheckoutError,
};

/// Default simulated payment time
pub const DEFAULT_CHECKOUT_DELAY: Duration = Duration::from_secs(2);

/// Capacity of the state-change channel; slower receivers see `Lagged`
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Zero-argument callback invoked after every mutation
pub type Listener = Arc<dyn Fn() + Send + Sync>;

type ListenerTable = DashMap<u64, Listener>;

// =============================================================================
// Subscription
// =============================================================================

/// Deregistration handle returned by [`Store::subscribe`]
///
/// Dropping the handle deregisters the callback.
#[must_use = "dropping a Subscription deregisters its callback"]
pub struct Subscription {
    id: u64,
    listeners: Weak<ListenerTable>,
}

impl Subscription {
    /// Deregisters the callback. Calling this more than once is harmless.
    pub fn unsubscribe(&self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.remove(&self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

// =============================================================================
// Store
// =============================================================================

/// The storefront's authoritative state container
pub struct Store {
    catalog: Arc<Catalog>,
    state: watch::Sender<Arc<StoreState>>,
    events: broadcast::Sender<StateChange>,
    listeners: Arc<ListenerTable>,
    next_listener_id: AtomicU64,
    version: AtomicU64,
    checkout_delay: Duration,
}

impl Store {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self::with_checkout_delay(catalog, DEFAULT_CHECKOUT_DELAY)
    }

    pub fn with_checkout_delay(catalog: Arc<Catalog>, checkout_delay: Duration) -> Self {
        let (state, _) = watch::channel(Arc::new(StoreState::default()));
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Self {
            catalog,
            state,
            events,
            listeners: Arc::new(DashMap::new()),
            next_listener_id: AtomicU64::new(0),
            version: AtomicU64::new(0),
            checkout_delay,
        }
    }

    // -------------------------------------------------------------------------
    // Getters
    // -------------------------------------------------------------------------

    /// Current snapshot
    pub fn state(&self) -> Arc<StoreState> {
        self.state.borrow().clone()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn checkout_delay(&self) -> Duration {
        self.checkout_delay
    }

    /// Number of mutations published so far
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    pub fn filter_values(&self, dimension: FilterDimension) -> Vec<String> {
        self.catalog.filter_values(dimension)
    }

    pub fn filter_options(&self) -> FilterOptions {
        self.catalog.filter_options()
    }

    pub fn visible_products(&self) -> Vec<Product> {
        let state = self.state();
        visible_products(self.catalog.products(), &state)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn cart_total_price(&self) -> Decimal {
        cart_total_price(&self.state().cart)
    }

    pub fn cart_total_items(&self) -> u64 {
        cart_total_items(&self.state().cart)
    }

    /// Snapshot and totals computed from the same snapshot
    pub fn view(&self) -> StoreView {
        let state = self.state();
        StoreView {
            total_price: cart_total_price(&state.cart),
            total_items: cart_total_items(&state.cart),
            state: StoreState::clone(&state),
        }
    }

    // -------------------------------------------------------------------------
    // Actions
    // -------------------------------------------------------------------------

    /// Replaces one filter selection. The value is not validated.
    pub fn set_filter(&self, dimension: FilterDimension, value: impl Into<Selection>) {
        let value = value.into();
        tracing::debug!(%dimension, %value, "Setting filter");
        self.update(StoreEvent::FilterChanged, |state| {
            *state.selection_mut(dimension) = value;
            true
        });
    }

    pub fn reset_filters(&self) {
        self.update(StoreEvent::FiltersReset, |state| {
            for dimension in FilterDimension::EVERY {
                *state.selection_mut(dimension) = Selection::All;
            }
            true
        });
    }

    pub fn set_cart_open(&self, open: bool) {
        self.update(StoreEvent::CartPanelToggled, |state| {
            state.cart_open = open;
            true
        });
    }

    /// Adds one unit of `id` to the cart.
    ///
    /// An id unknown to both cart and catalog is ignored without notifying
    /// anyone; the return value tells whether the state changed.
    pub fn add_to_cart(&self, id: ProductId) -> bool {
        let catalog = Arc::clone(&self.catalog);
        let changed = self.update(StoreEvent::CartChanged, |state| {
            add_line(&mut state.cart, &catalog, id)
        });
        if !changed {
            tracing::debug!(id, "Ignoring add_to_cart for unknown product");
        }
        changed
    }

    /// Drops the line for `id`; notifies even when there was none.
    pub fn remove_from_cart(&self, id: ProductId) {
        self.update(StoreEvent::CartChanged, |state| {
            remove_line(&mut state.cart, id);
            true
        });
    }

    /// Sets the quantity of the line for `id`; zero or below removes it.
    pub fn set_quantity(&self, id: ProductId, quantity: i64) {
        self.update(StoreEvent::CartChanged, |state| {
            set_line_quantity(&mut state.cart, id, quantity);
            true
        });
    }

    /// Starts the simulated checkout.
    ///
    /// Marks checkout as in progress immediately; after the checkout delay the
    /// cart is emptied, the panel hidden and the flag cleared in one step.
    ///
    /// Fails without touching the state when called outside a tokio runtime.
    pub fn checkout(self: &Arc<Self>) -> Result<JoinHandle<()>, CheckoutError> {
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| CheckoutError::NoRuntime)?;

        self.update(StoreEvent::CheckoutStarted, |state| {
            state.checkout_in_progress = true;
            true
        });

        let store = Arc::clone(self);
        Ok(runtime.spawn(async move {
            tokio::time::sleep(store.checkout_delay).await;

            let summary = format_cart_summary(&store.state().cart);
            store.update(StoreEvent::CheckoutCompleted, |state| {
                state.checkout_in_progress = false;
                state.cart.clear();
                state.cart_open = false;
                true
            });
            tracing::info!(items = %summary, "Checkout completed");
        }))
    }

    // -------------------------------------------------------------------------
    // Change notification
    // -------------------------------------------------------------------------

    /// Registers `callback` to run after every mutation
    pub fn subscribe(&self, callback: impl Fn() + Send + Sync + 'static) -> Subscription {
        let id = self.next_listener_id.fetch_add(1, Ordering::Relaxed);
        self.listeners.insert(id, Arc::new(callback));
        Subscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    /// A receiver for every state change published from now on
    pub fn events(&self) -> broadcast::Receiver<StateChange> {
        self.events.subscribe()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Applies `mutate` to a copy of the current snapshot and publishes it.
    ///
    /// `mutate` returns `false` to discard the copy; nothing is published and
    /// no one is notified in that case.
    fn update(&self, event: StoreEvent, mutate: impl FnOnce(&mut StoreState) -> bool) -> bool {
        let published = self.state.send_if_modified(|current| {
            let mut next = StoreState::clone(current);
            if !mutate(&mut next) {
                return false;
            }
            let next = Arc::new(next);
            *current = Arc::clone(&next);
            // Still holding the watch lock: versions follow swap order.
            self.publish(event, next);
            true
        });

        if published {
            self.run_listeners();
        }
        published
    }

    fn publish(&self, event: StoreEvent, state: Arc<StoreState>) {
        let version = self.version.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::debug!(version, event = event.as_str(), "State changed");

        // No receivers is fine; the channel is optional for consumers.
        let _ = self.events.send(StateChange {
            version,
            event,
            state,
        });
    }

    fn run_listeners(&self) {
        // Collect first so callbacks may subscribe or unsubscribe freely.
        let listeners: Vec<Listener> = self
            .listeners
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        for listener in listeners {
            listener();
        }
    }
}
