//! The write-through cart store.
//!
//! [`CartStore`] owns the cart's line items and is the only thing that
//! mutates them. Every mutating operation changes the in-memory list first
//! and then writes the whole list to storage before returning.
//!
//! # Invariants
//!
//! - No two lines share a product id.
//! - Every line's quantity is at least 1; asking for 0 or less removes the
//!   line.
//! - Prices are non-negative and the cart total fits in a [`Decimal`]. A
//!   change that would break this is refused and logged.
//!
//! # Failure handling
//!
//! Operations do not return errors. A missing, empty or malformed persisted
//! cart loads as an empty cart. A failed write is logged and the in-memory
//! change stands; the next successful write carries it to storage.

use std::collections::HashSet;

use artcrafts_core::{ProductId, Quantity};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::item::{CartLineItem, Product, checked_total};
use crate::storage::SharedStorage;

/// Storage key the cart is kept under unless configured otherwise.
pub const DEFAULT_CART_KEY: &str = "cart";

/// Reasons a persisted cart is discarded on load.
#[derive(Debug, Error)]
enum CorruptCart {
    #[error("not a list of cart lines: {0}")]
    Shape(#[from] serde_json::Error),
    #[error("product {0} appears more than once")]
    DuplicateId(ProductId),
    #[error("product {0} has a negative price")]
    NegativePrice(ProductId),
    #[error("cart total is too large to represent")]
    TotalOverflow,
}

/// Shopping cart backed by durable storage.
pub struct CartStore {
    items: Vec<CartLineItem>,
    storage: SharedStorage,
    key: String,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("key", &self.key)
            .field("items", &self.items)
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Open the cart stored under `key`, starting empty if there is none.
    ///
    /// Never fails: unreadable or malformed state is logged and discarded.
    #[instrument(skip_all, fields(key = %key.as_ref()))]
    pub fn load(storage: SharedStorage, key: impl AsRef<str>) -> Self {
        let key = key.as_ref().to_owned();
        let items = read_items(&storage, &key);
        debug!(lines = items.len(), "Cart loaded");
        Self {
            items,
            storage,
            key,
        }
    }

    /// Re-read the cart from storage, replacing the in-memory state.
    pub fn reload(&mut self) {
        self.items = read_items(&self.storage, &self.key);
    }

    /// Storage key this cart is persisted under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Current line items, in the order they were first added.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The line for `id`, if present.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Add one unit of `product`.
    ///
    /// An existing line for the same id gets its quantity bumped; otherwise a
    /// new line is appended with the product's current display fields.
    /// Products with a negative price, or that would push the total past
    /// [`Decimal::MAX`], are not added.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add_to_cart(&mut self, product: &Product) {
        let candidate = match self.get(&product.id) {
            Some(item) => {
                let mut item = item.clone();
                item.quantity = item.quantity.incremented();
                item
            }
            None => {
                if product.price < Decimal::ZERO {
                    warn!(price = %product.price, "Refusing product with negative price");
                    return;
                }
                CartLineItem::from_product(product)
            }
        };
        if !self.fits(&candidate) {
            warn!("Refusing add, cart total would overflow");
            return;
        }

        if let Some(item) = self.items.iter_mut().find(|item| item.id == candidate.id) {
            item.quantity = candidate.quantity;
            debug!(quantity = %item.quantity, "Incremented cart line");
        } else {
            self.items.push(candidate);
            debug!("Added cart line");
        }
        self.persist();
    }

    /// Remove the line for `id`. Unknown ids are ignored.
    #[instrument(skip(self, id), fields(product_id = %id))]
    pub fn remove_from_cart(&mut self, id: &ProductId) {
        let before = self.items.len();
        self.items.retain(|item| &item.id != id);
        if self.items.len() == before {
            debug!("No cart line to remove");
            return;
        }
        self.persist();
    }

    /// Set the quantity for `id` to exactly `requested`.
    ///
    /// A request of 0 or less removes the line. Unknown ids are ignored.
    #[instrument(skip(self, id), fields(product_id = %id))]
    pub fn update_quantity(&mut self, id: &ProductId, requested: i64) {
        let Some(quantity) = Quantity::from_requested(requested) else {
            self.remove_from_cart(id);
            return;
        };

        let Some(mut candidate) = self.get(id).cloned() else {
            debug!("No cart line to update");
            return;
        };
        candidate.quantity = quantity;
        if !self.fits(&candidate) {
            warn!(%quantity, "Refusing quantity, cart total would overflow");
            return;
        }

        if let Some(item) = self.items.iter_mut().find(|item| &item.id == id) {
            item.quantity = quantity;
        }
        self.persist();
    }

    /// Remove every line. Storage is rewritten even if the cart was empty.
    #[instrument(skip(self))]
    pub fn clear_cart(&mut self) {
        self.items.clear();
        self.persist();
    }

    /// Sum of `price × quantity` over all lines.
    #[must_use]
    pub fn cart_total(&self) -> Decimal {
        // Loading and every mutation keep the total representable.
        checked_total(&self.items).unwrap_or(Decimal::MAX)
    }

    /// Total units across all lines (not the number of lines).
    #[must_use]
    pub fn cart_items_count(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity.get()))
            .sum()
    }

    /// Whether the cart total still fits with `candidate` replacing (or
    /// joining) the line for its id.
    fn fits(&self, candidate: &CartLineItem) -> bool {
        self.items
            .iter()
            .filter(|item| item.id != candidate.id)
            .chain(std::iter::once(candidate))
            .try_fold(Decimal::ZERO, |total, item| {
                total.checked_add(item.checked_line_total()?)
            })
            .is_some()
    }

    fn persist(&self) {
        let payload = match serde_json::to_string(&self.items) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, key = %self.key, "Failed to serialize cart");
                return;
            }
        };

        if let Err(e) = self.storage.set(&self.key, &payload) {
            warn!(error = %e, key = %self.key, "Failed to persist cart");
        }
    }
}

fn read_items(storage: &SharedStorage, key: &str) -> Vec<CartLineItem> {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(error = %e, key, "Failed to read stored cart, starting empty");
            return Vec::new();
        }
    };

    decode_items(&raw).unwrap_or_else(|e| {
        warn!(error = %e, key, "Discarding stored cart, starting empty");
        Vec::new()
    })
}

fn decode_items(raw: &str) -> Result<Vec<CartLineItem>, CorruptCart> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    let items: Vec<CartLineItem> = serde_json::from_str(raw)?;

    let mut seen = HashSet::with_capacity(items.len());
    if let Some(dup) = items.iter().find(|item| !seen.insert(&item.id)) {
        return Err(CorruptCart::DuplicateId(dup.id.clone()));
    }
    if let Some(item) = items
        .iter()
        .find(|item| item.price < Decimal::ZERO)
    {
        return Err(CorruptCart::NegativePrice(item.id.clone()));
    }
    if checked_total(&items).is_none() {
        return Err(CorruptCart::TotalOverflow);
    }

    Ok(items)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::error::StorageError;
    use crate::storage::{KeyValueStore, MemoryStore};

    fn product(id: i64, price: i64) -> Product {
        Product::new(id, format!("Craft #{id}"), Decimal::new(price, 0))
    }

    fn empty_store() -> (Arc<MemoryStore>, CartStore) {
        let storage = Arc::new(MemoryStore::new());
        let store = CartStore::load(storage.clone(), DEFAULT_CART_KEY);
        (storage, store)
    }

    #[test]
    fn test_distinct_adds_count_each_once() {
        let (_, mut store) = empty_store();
        for id in 1..=5 {
            store.add_to_cart(&product(id, 100));
        }

        assert_eq!(store.cart_items_count(), 5);
        assert_eq!(store.items().len(), 5);
        let ids: HashSet<_> = store.items().iter().map(|item| &item.id).collect();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn test_same_product_twice_is_one_line() {
        let (_, mut store) = empty_store();
        store.add_to_cart(&product(1, 100));
        store.add_to_cart(&product(1, 100));

        assert_eq!(store.items().len(), 1);
        assert_eq!(store.items().first().unwrap().quantity.get(), 2);
        assert_eq!(store.cart_items_count(), 2);
    }

    #[test]
    fn test_add_keeps_first_snapshot_of_display_fields() {
        let (_, mut store) = empty_store();
        store.add_to_cart(&product(1, 100));
        store.add_to_cart(&Product::new(1_i64, "Renamed", Decimal::new(999, 0)));

        let line = store.get(&ProductId::Numeric(1)).unwrap();
        assert_eq!(line.name, "Craft #1");
        assert_eq!(line.price, Decimal::new(100, 0));
    }

    #[test]
    fn test_update_quantity_at_or_below_zero_removes() {
        let (_, mut store) = empty_store();
        store.add_to_cart(&product(1, 100));
        store.add_to_cart(&product(2, 100));

        store.update_quantity(&ProductId::Numeric(1), 0);
        store.update_quantity(&ProductId::Numeric(2), -5);

        assert!(store.is_empty());
        assert_eq!(store.cart_total(), Decimal::ZERO);
    }

    #[test]
    fn test_update_quantity_sets_exactly() {
        let (_, mut store) = empty_store();
        let id = ProductId::Numeric(1);
        store.add_to_cart(&product(1, 100));
        store.add_to_cart(&product(1, 100));

        store.update_quantity(&id, 3);
        assert_eq!(store.get(&id).unwrap().quantity.get(), 3);

        store.update_quantity(&id, 1);
        assert_eq!(store.get(&id).unwrap().quantity.get(), 1);
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let (storage, mut store) = empty_store();
        store.update_quantity(&ProductId::Numeric(42), 3);
        store.remove_from_cart(&ProductId::from("missing"));

        assert!(store.is_empty());
        // Nothing changed, so nothing was written.
        assert_eq!(storage.get(DEFAULT_CART_KEY).unwrap(), None);
    }

    #[test]
    fn test_total_tracks_every_operation() {
        let (_, mut store) = empty_store();
        let expected = |store: &CartStore| {
            store
                .items()
                .iter()
                .map(|item| item.price * Decimal::from(item.quantity.get()))
                .sum::<Decimal>()
        };

        store.add_to_cart(&product(1, 100));
        assert_eq!(store.cart_total(), expected(&store));
        store.add_to_cart(&product(2, 250));
        store.add_to_cart(&product(1, 100));
        assert_eq!(store.cart_total(), Decimal::new(450, 0));
        store.update_quantity(&ProductId::Numeric(2), 4);
        assert_eq!(store.cart_total(), Decimal::new(1200, 0));
        assert_eq!(store.cart_total(), expected(&store));
        store.remove_from_cart(&ProductId::Numeric(1));
        assert_eq!(store.cart_total(), Decimal::new(1000, 0));
    }

    #[test]
    fn test_every_mutation_is_written_through() {
        let (storage, mut store) = empty_store();

        store.add_to_cart(&product(1, 100));
        let reloaded = CartStore::load(storage.clone(), DEFAULT_CART_KEY);
        assert_eq!(reloaded.items(), store.items());

        store.update_quantity(&ProductId::Numeric(1), 5);
        let reloaded = CartStore::load(storage.clone(), DEFAULT_CART_KEY);
        assert_eq!(reloaded.cart_items_count(), 5);

        store.clear_cart();
        assert_eq!(storage.get(DEFAULT_CART_KEY).unwrap().as_deref(), Some("[]"));
        assert!(CartStore::load(storage, DEFAULT_CART_KEY).is_empty());
    }

    #[test]
    fn test_reload_restores_totals() {
        let (storage, mut store) = empty_store();
        store.add_to_cart(&product(1, 100));
        store.add_to_cart(&product(1, 100));
        store.add_to_cart(&product(2, 250));
        drop(store);

        let restored = CartStore::load(storage, DEFAULT_CART_KEY);
        assert_eq!(restored.cart_total(), Decimal::new(450, 0));
        assert_eq!(restored.cart_items_count(), 3);
    }

    #[test]
    fn test_malformed_state_loads_empty() {
        for raw in [
            "",
            "   ",
            "not json",
            "{\"items\": []}",
            r#"[{"id": 1, "name": "x", "price": 10, "quantity": 0}]"#,
            r#"[{"id": 1, "name": "x", "price": 10}]"#,
            r#"[{"id": 1, "name": "x", "price": 10, "quantity": 1},
                {"id": 1, "name": "x", "price": 10, "quantity": 2}]"#,
            r#"[{"id": 1, "name": "x", "price": -10, "quantity": 1}]"#,
        ] {
            let storage = Arc::new(MemoryStore::with_entry(DEFAULT_CART_KEY, raw));
            let store = CartStore::load(storage, DEFAULT_CART_KEY);
            assert!(store.is_empty(), "expected empty cart for {raw:?}");
        }
    }

    #[test]
    fn test_overflowing_stored_total_loads_empty() {
        for raw in [
            r#"[{"id": 1, "name": "x", "price": "79228162514264337593543950335", "quantity": 2}]"#,
            r#"[{"id": 1, "name": "x", "price": "79228162514264337593543950335", "quantity": 1},
                {"id": 2, "name": "y", "price": "1", "quantity": 1}]"#,
        ] {
            let storage = Arc::new(MemoryStore::with_entry(DEFAULT_CART_KEY, raw));
            let store = CartStore::load(storage, DEFAULT_CART_KEY);
            assert!(store.is_empty(), "expected empty cart for {raw:?}");
            assert_eq!(store.cart_total(), Decimal::ZERO);
        }
    }

    #[test]
    fn test_add_that_would_overflow_is_refused() {
        let (storage, mut store) = empty_store();
        let priceless = Product::new(1_i64, "Peacock Throne Replica", Decimal::MAX);

        store.add_to_cart(&priceless);
        let written = storage.get(DEFAULT_CART_KEY).unwrap();
        store.add_to_cart(&priceless);
        store.add_to_cart(&product(2, 1));

        assert_eq!(store.cart_items_count(), 1);
        assert_eq!(store.cart_total(), Decimal::MAX);
        assert_eq!(storage.get(DEFAULT_CART_KEY).unwrap(), written);
        assert_eq!(CartStore::load(storage, DEFAULT_CART_KEY).cart_total(), Decimal::MAX);
    }

    #[test]
    fn test_update_that_would_overflow_is_refused() {
        let (_, mut store) = empty_store();
        let id = ProductId::Numeric(1);
        let third = Decimal::MAX / Decimal::from(3);
        store.add_to_cart(&Product::new(1_i64, "Temple Bell", third));

        store.update_quantity(&id, 4);
        assert_eq!(store.get(&id).unwrap().quantity.get(), 1);

        store.update_quantity(&id, 3);
        assert_eq!(store.get(&id).unwrap().quantity.get(), 3);
        assert_eq!(store.cart_total(), Decimal::MAX);
    }

    #[test]
    fn test_negative_price_is_refused() {
        let (storage, mut store) = empty_store();
        store.add_to_cart(&Product::new(1_i64, "Refund", Decimal::new(-50, 0)));

        assert!(store.is_empty());
        assert_eq!(storage.get(DEFAULT_CART_KEY).unwrap(), None);
    }

    #[test]
    fn test_loads_string_and_numeric_ids() {
        let raw = r#"[
            {"id": 1, "name": "Kantha Quilt", "price": 100, "quantity": 2, "city": "Bolpur", "state": "West Bengal", "tags": ["textile"]},
            {"id": "sandalwood-box", "name": "Sandalwood Box", "price": "250", "quantity": 1}
        ]"#;
        let storage = Arc::new(MemoryStore::with_entry(DEFAULT_CART_KEY, raw));
        let store = CartStore::load(storage, DEFAULT_CART_KEY);

        assert_eq!(store.items().len(), 2);
        assert_eq!(store.cart_total(), Decimal::new(450, 0));
        assert!(store.get(&ProductId::from("sandalwood-box")).is_some());
    }

    struct FailingStorage;

    impl KeyValueStore for FailingStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::LockPoisoned)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::LockPoisoned)
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::LockPoisoned)
        }

        fn clear(&self) -> Result<(), StorageError> {
            Err(StorageError::LockPoisoned)
        }
    }

    #[test]
    fn test_storage_failures_do_not_surface() {
        let mut store = CartStore::load(Arc::new(FailingStorage), DEFAULT_CART_KEY);
        assert!(store.is_empty());

        store.add_to_cart(&product(1, 100));
        assert_eq!(store.cart_items_count(), 1);
        store.clear_cart();
        assert!(store.is_empty());
    }
}
