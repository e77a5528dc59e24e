//! Integration tests for the ArtCrafts cart.
//!
//! These tests drive the cart, checkout, and preferences through the
//! file-backed store, the same way the CLI does between invocations.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p artcrafts-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_persistence` - Reloading carts and preferences from disk
//! - `checkout_flow` - Summaries, validation, and order placement

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::Path;
use std::sync::Arc;

use artcrafts_cart::{CartContext, CartStore, DEFAULT_CART_KEY, FileStore, SharedStorage};
use tempfile::TempDir;

/// A scratch data directory with a file-backed store.
///
/// The directory is removed when the context is dropped.
pub struct TestContext {
    dir: TempDir,
    pub storage: SharedStorage,
}

impl TestContext {
    /// Create a fresh, empty data directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let storage: SharedStorage = Arc::new(FileStore::new(dir.path()));
        Self { dir, storage }
    }

    /// Root of the data directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Open the default cart, as a new process would.
    #[must_use]
    pub fn open_cart(&self) -> CartContext {
        CartContext::new(CartStore::load(self.storage.clone(), DEFAULT_CART_KEY))
    }

    /// A second store over the same directory, standing in for another session.
    #[must_use]
    pub fn second_session(&self) -> SharedStorage {
        Arc::new(FileStore::new(self.dir.path()))
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
