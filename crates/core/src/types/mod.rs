//! Core types for ArtCrafts.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod contact;
pub mod id;
pub mod price;
pub mod quantity;

pub use contact::{ContactError, Email, PhoneNumber, PinCode};
pub use id::ProductId;
pub use price::{CurrencyCode, Price, UnknownCurrency};
pub use quantity::Quantity;
