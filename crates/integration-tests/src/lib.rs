//! Integration tests for MarketHub.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p markethub-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_isolation` - Per-seller cart isolation and quantity rules
//! - `cart_persistence` - Snapshot round-trips, file storage, legacy data
//! - `cart_checkout` - Checkout messages, deep links, and the handoff flow
//!
//! The helpers below build the same small marketplace for every test.

use std::path::{Path, PathBuf};

use markethub_cart::persistence::{CartStorage, FileStorage, MemoryStorage, PersistenceAdapter};
use markethub_cart::{BusinessMeta, CartLineInput, CartStore};
use markethub_core::{BusinessId, Price};

/// Premium Textiles Co.
pub const TEXTILES: &str = "1";
/// Artisan Food Goods.
pub const FOODS: &str = "3";

#[must_use]
pub fn business(id: &str) -> BusinessId {
    BusinessId::new(id)
}

#[must_use]
pub fn textiles_meta() -> BusinessMeta {
    BusinessMeta::new("Premium Textiles Co.", "+13125551234")
}

#[must_use]
pub fn foods_meta() -> BusinessMeta {
    BusinessMeta::new("Artisan Food Goods", "+1 (312) 555-3456")
}

/// Parse a decimal price literal.
///
/// # Panics
///
/// Panics if `amount` is not a decimal number.
#[must_use]
pub fn price(amount: &str) -> Price {
    Price::new(amount.parse().expect("valid decimal literal"))
}

/// A cart line request.
///
/// # Panics
///
/// Panics if `quantity` is zero or `unit` is negative.
#[must_use]
pub fn line(product_id: &str, name: &str, unit: &str, quantity: u32) -> CartLineInput {
    CartLineInput::new(product_id, name, price(unit), quantity).expect("valid line")
}

/// A store over in-memory storage with nothing in it.
#[must_use]
pub fn memory_store() -> CartStore<MemoryStorage> {
    CartStore::open(PersistenceAdapter::new(MemoryStorage::new()))
}

/// Fill a store with one textiles line and two foods lines.
pub fn seed<S: CartStorage>(store: &mut CartStore<S>) {
    store.add_item(
        &business(TEXTILES),
        textiles_meta(),
        line("1-1", "Organic Cotton Fabric", "45.99", 1),
    );
    store.add_item(
        &business(FOODS),
        foods_meta(),
        line("3-1", "Organic Coffee Beans", "24.99", 2),
    );
    store.add_item(
        &business(FOODS),
        foods_meta(),
        line("3-2", "Wildflower Honey", "12.00", 1),
    );
}

/// A fresh directory under the system temp dir.
#[must_use]
pub fn temp_dir() -> PathBuf {
    std::env::temp_dir().join(format!("markethub-it-{}", uuid::Uuid::new_v4()))
}

/// A file-backed store rooted at `dir`.
#[must_use]
pub fn file_store(dir: &Path) -> CartStore<FileStorage> {
    CartStore::open(PersistenceAdapter::new(FileStorage::new(dir)))
}
