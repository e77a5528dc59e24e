//! ArtCrafts Cart - the storefront's shopping cart.
//!
//! The cart is a single in-process store that every UI surface shares. All
//! mutations go through [`CartStore`] (usually via a [`CartContext`] handle)
//! and are mirrored to durable key-value storage before the call returns, so
//! a reload right after a mutation never loses it.
//!
//! # Modules
//!
//! - [`storage`] - Durable key-value storage seam (memory and file backed)
//! - [`item`] - Products and cart line items
//! - [`store`] - The write-through cart store
//! - [`context`] - Shared handle and change subscription
//! - [`summary`] - Subtotal, shipping, and grand total
//! - [`checkout`] - Shipping details and simulated order placement
//! - [`preferences`] - Visitor id and location preference
//! - [`config`] - Environment-driven configuration

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod checkout;
pub mod config;
pub mod context;
pub mod error;
pub mod item;
pub mod preferences;
pub mod storage;
pub mod store;
pub mod summary;

pub use checkout::{Checkout, OrderConfirmation, PaymentMethod, ShippingDetails, ShippingForm};
pub use config::{CartConfig, ConfigError, LogFormat};
pub use context::{CartContext, CartSnapshot};
pub use error::{CheckoutError, StorageError};
pub use item::{CartLineItem, Product};
pub use preferences::{LocationPreference, Preferences};
pub use storage::{FileStore, KeyValueStore, MemoryStore, SharedStorage};
pub use store::{CartStore, DEFAULT_CART_KEY};
pub use summary::{OrderSummary, ShippingPolicy, SummaryLine};
