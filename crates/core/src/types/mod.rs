//! Core types for MarketHub.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod phone;
pub mod price;
pub mod status;

pub use id::*;
pub use phone::{DEFAULT_COUNTRY_CODE, PhoneError, PhoneNumber, digits_only, format_for_messaging};
pub use price::{CurrencyCode, Price};
pub use status::OrderStatus;
