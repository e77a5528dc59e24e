//! Shared cart handle.
//!
//! Every surface that shows or changes the cart (header badge, sidebar, cart
//! page, checkout, product cards) holds a clone of the same [`CartContext`].
//! Clones share one [`CartStore`]; mutations are serialized through it and
//! each one publishes a fresh [`CartSnapshot`] to subscribers.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use artcrafts_core::ProductId;
use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::watch;

use crate::item::{CartLineItem, Product};
use crate::store::CartStore;

/// Point-in-time view of the cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CartSnapshot {
    pub items: Vec<CartLineItem>,
    pub total: Decimal,
    pub count: u64,
}

impl CartSnapshot {
    fn of(store: &CartStore) -> Self {
        Self {
            items: store.items().to_vec(),
            total: store.cart_total(),
            count: store.cart_items_count(),
        }
    }

    /// Whether the snapshot has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Cheaply cloneable handle to the one cart store.
#[derive(Clone)]
pub struct CartContext {
    inner: Arc<CartContextInner>,
}

struct CartContextInner {
    store: Mutex<CartStore>,
    updates: watch::Sender<CartSnapshot>,
}

impl std::fmt::Debug for CartContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartContext")
            .field("snapshot", &*self.inner.updates.borrow())
            .finish_non_exhaustive()
    }
}

impl CartContext {
    /// Wrap `store` so it can be shared.
    #[must_use]
    pub fn new(store: CartStore) -> Self {
        let (updates, _) = watch::channel(CartSnapshot::of(&store));
        Self {
            inner: Arc::new(CartContextInner {
                store: Mutex::new(store),
                updates,
            }),
        }
    }

    /// Receive a new snapshot after every mutation that changes the cart.
    ///
    /// The receiver starts with the current state marked as seen.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartSnapshot> {
        self.inner.updates.subscribe()
    }

    /// Current state of the cart.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot::of(&self.lock())
    }

    /// Current line items.
    #[must_use]
    pub fn items(&self) -> Vec<CartLineItem> {
        self.lock().items().to_vec()
    }

    /// See [`CartStore::cart_total`].
    #[must_use]
    pub fn cart_total(&self) -> Decimal {
        self.lock().cart_total()
    }

    /// See [`CartStore::cart_items_count`].
    #[must_use]
    pub fn cart_items_count(&self) -> u64 {
        self.lock().cart_items_count()
    }

    /// See [`CartStore::add_to_cart`].
    pub fn add_to_cart(&self, product: &Product) {
        self.mutate(|store| store.add_to_cart(product));
    }

    /// See [`CartStore::remove_from_cart`].
    pub fn remove_from_cart(&self, id: &ProductId) {
        self.mutate(|store| store.remove_from_cart(id));
    }

    /// See [`CartStore::update_quantity`].
    pub fn update_quantity(&self, id: &ProductId, requested: i64) {
        self.mutate(|store| store.update_quantity(id, requested));
    }

    /// See [`CartStore::clear_cart`].
    pub fn clear_cart(&self) {
        self.mutate(CartStore::clear_cart);
    }

    /// Discard in-memory state and re-read the cart from storage.
    pub fn reload(&self) {
        self.mutate(CartStore::reload);
    }

    fn mutate(&self, op: impl FnOnce(&mut CartStore)) {
        let mut store = self.lock();
        op(&mut *store);
        let next = CartSnapshot::of(&store);
        self.inner.updates.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        });
    }

    // Store operations never leave the cart half-updated, so a poisoned lock
    // still guards consistent state.
    fn lock(&self) -> MutexGuard<'_, CartStore> {
        self.inner
            .store
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
