//! Error types for the cart crate.
//!
//! Cart operations themselves never fail from the caller's point of view (see
//! [`crate::store`]); these errors exist at the storage seam and on the
//! checkout path, where the input comes from a shopper.

use std::path::PathBuf;

use artcrafts_core::ContactError;
use thiserror::Error;

/// Errors raised by a [`crate::KeyValueStore`] implementation.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing a backing file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The key cannot be mapped onto the backing store.
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    /// A writer panicked while holding the store lock.
    #[error("Storage lock poisoned")]
    LockPoisoned,
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors that can occur while placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// There is nothing in the cart to order.
    #[error("Cart is empty")]
    EmptyCart,

    /// A required shipping field was left blank.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// A contact field failed validation.
    #[error("Invalid contact details: {0}")]
    InvalidContact(#[from] ContactError),

    /// The payment method is not one we offer.
    #[error("Unknown payment method: {0}. Valid methods: cod, online")]
    UnknownPaymentMethod(String),
}
