//! ArtCrafts Core - Shared types library.
//!
//! This crate provides common types used across all ArtCrafts components:
//! - `cart` - Cart store, durable storage, checkout simulation
//! - `cli` - Command-line surface over the cart
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no storage
//! access, no HTTP clients. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product IDs, prices, quantities, and contact details

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
