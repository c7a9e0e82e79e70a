//! MarketHub Core - Shared types library.
//!
//! This crate provides common types used across all MarketHub components:
//! - `cart` - Per-business cart store, aggregation, and checkout handoff
//! - `cli` - Command-line client for managing persisted carts
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no persistence,
//! no messaging clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, phone numbers, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
