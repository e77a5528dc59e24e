//! Preference commands.
//!
//! # Usage
//!
//! ```bash
//! artcrafts prefs show
//! artcrafts prefs location Bhuj Gujarat
//! artcrafts prefs reset
//! ```

use artcrafts_cart::{Preferences, StorageError};

/// Print the visitor id and saved location.
pub fn show(prefs: &Preferences) {
    let visitor_id = prefs.visitor_id();
    let location = prefs.location().map_or_else(
        || "not set".to_string(),
        |location| format!("{}, {}", location.city, location.state),
    );

    #[allow(clippy::print_stdout)]
    {
        println!("Visitor:  {visitor_id}");
        println!("Location: {location}");
    }
}

/// Save a preferred location.
///
/// # Errors
///
/// Returns an error if the preference cannot be stored.
pub fn set_location(prefs: &Preferences, city: &str, state: &str) -> Result<(), StorageError> {
    let location = prefs.set_location(city.trim(), state.trim())?;

    #[allow(clippy::print_stdout)]
    {
        println!("Location set to {}, {}", location.city, location.state);
    }
    Ok(())
}

/// Wipe the cart and every preference.
///
/// # Errors
///
/// Returns an error if storage cannot be cleared.
pub fn reset(prefs: &Preferences) -> Result<(), StorageError> {
    prefs.reset_demo()?;

    #[allow(clippy::print_stdout)]
    {
        println!("Demo reset: cart and preferences cleared");
    }
    Ok(())
}
