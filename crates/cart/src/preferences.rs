//! Shopper preferences kept alongside the cart.
//!
//! The storefront remembers an anonymous visitor id (used to key
//! recommendations and click logging) and the shopper's preferred location.
//! Both live in the same key-value storage as the cart, so resetting the
//! demo wipes everything at once.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::StorageError;
use crate::storage::SharedStorage;

/// Key holding the anonymous visitor id.
pub const VISITOR_ID_KEY: &str = "ecom_uid";
/// Key holding the location preference.
pub const LOCATION_KEY: &str = "ecom_location";

const VISITOR_ID_PREFIX: &str = "user_";
const VISITOR_ID_SUFFIX_LEN: usize = 7;

/// The shopper's preferred city and state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationPreference {
    pub city: String,
    pub state: String,
}

/// Read/write access to shopper preferences.
#[derive(Clone)]
pub struct Preferences {
    storage: SharedStorage,
}

impl std::fmt::Debug for Preferences {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preferences").finish_non_exhaustive()
    }
}

impl Preferences {
    /// Preferences backed by `storage`.
    #[must_use]
    pub fn new(storage: SharedStorage) -> Self {
        Self { storage }
    }

    /// The visitor id, generating and storing one on first use.
    ///
    /// If storage is unavailable a fresh id is still returned, it just won't
    /// be remembered.
    pub fn visitor_id(&self) -> String {
        match self.storage.get(VISITOR_ID_KEY) {
            Ok(Some(id)) if !id.trim().is_empty() => return id,
            Ok(_) => {}
            Err(e) => warn!(error = %e, "Failed to read visitor id"),
        }

        let id = new_visitor_id();
        if let Err(e) = self.storage.set(VISITOR_ID_KEY, &id) {
            warn!(error = %e, "Failed to store visitor id");
        }
        id
    }

    /// The saved location, if any. Unreadable values count as unset.
    #[must_use]
    pub fn location(&self) -> Option<LocationPreference> {
        let raw = match self.storage.get(LOCATION_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(error = %e, "Failed to read location preference");
                return None;
            }
        };

        serde_json::from_str(&raw)
            .inspect_err(|e| warn!(error = %e, "Discarding malformed location preference"))
            .ok()
    }

    /// Save the preferred location.
    ///
    /// # Errors
    ///
    /// Returns an error if the preference cannot be written.
    pub fn set_location(
        &self,
        city: impl Into<String>,
        state: impl Into<String>,
    ) -> Result<LocationPreference, StorageError> {
        let location = LocationPreference {
            city: city.into(),
            state: state.into(),
        };
        // Serializing two strings cannot fail.
        let payload = serde_json::to_string(&location).unwrap_or_default();
        self.storage.set(LOCATION_KEY, &payload)?;
        info!(city = %location.city, state = %location.state, "Location preference saved");
        Ok(location)
    }

    /// Wipe every stored value: cart, visitor id, and location.
    ///
    /// Any open [`crate::CartContext`] keeps its in-memory items until it is
    /// reloaded.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be cleared.
    pub fn reset_demo(&self) -> Result<(), StorageError> {
        self.storage.clear()?;
        info!("Demo state reset");
        Ok(())
    }
}

const VISITOR_ID_RADIX: u32 = 36;

/// `user_` followed by random lowercase base-36 digits.
fn new_visitor_id() -> String {
    let mut entropy = Uuid::new_v4().as_u128();
    let suffix: String = std::iter::from_fn(|| {
        let digit = u32::try_from(entropy % u128::from(VISITOR_ID_RADIX))
            .ok()
            .and_then(|d| char::from_digit(d, VISITOR_ID_RADIX));
        entropy /= u128::from(VISITOR_ID_RADIX);
        digit
    })
    .take(VISITOR_ID_SUFFIX_LEN)
    .collect();
    format!("{VISITOR_ID_PREFIX}{suffix}")
}
