//! MarketHub Cart - per-business carts and messaging checkout handoff.
//!
//! A buyer browsing the marketplace keeps one cart per seller. Checking out
//! does not take payment: it renders the cart into a message and a deep link
//! that opens a chat with the seller, who confirms and arranges delivery.
//!
//! # Architecture
//!
//! - [`store`] - [`CartStore`], the single owner of all carts; persists after every mutation
//! - [`aggregate`] - Item counts, subtotals, and the cross-seller cart view
//! - [`checkout`] - Message templates, deep links, and the checkout state machine
//! - [`persistence`] - Snapshot format and swappable slot storage (memory, file)
//! - [`config`] - Environment configuration
//!
//! # Example
//!
//! ```rust
//! use markethub_cart::{BusinessMeta, BuyerInfo, CartLineInput, CartStore, MessageBuilder};
//! use markethub_cart::persistence::{MemoryStorage, PersistenceAdapter};
//! use markethub_core::{BusinessId, Price};
//!
//! let mut store = CartStore::open(PersistenceAdapter::new(MemoryStorage::new()));
//! let shop = BusinessId::new("1");
//! let line = CartLineInput::new("1-1", "Organic Cotton Fabric", Price::from_minor_units(4599), 2)
//!     .expect("valid line");
//! store.add_item(&shop, BusinessMeta::new("Premium Textiles Co.", "+1 (312) 555-1234"), line);
//!
//! let cart = store.get_cart(&shop).expect("cart exists");
//! let handoff = MessageBuilder::new().checkout(cart, &BuyerInfo::default());
//! assert!(handoff.message_text.contains("Total: 91.98"));
//! assert!(handoff.deep_link.starts_with("https://wa.me/13125551234?text="));
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod aggregate;
pub mod checkout;
pub mod config;
pub mod error;
pub mod models;
pub mod persistence;
pub mod store;

pub use checkout::{BuyerInfo, CheckoutError, CheckoutFlow, CheckoutState, Handoff, MessageBuilder};
pub use config::{CartConfig, ConfigError};
pub use error::{CartError, Result};
pub use models::{BusinessCart, BusinessMeta, CartLine, CartLineInput, Carts, LineError};
pub use store::CartStore;
