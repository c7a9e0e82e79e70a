//! The cart store: sole owner of every cart a buyer holds.
//!
//! All mutations go through [`CartStore`], which writes a snapshot through its
//! [`PersistenceAdapter`] before returning. Invalid requests (non-positive
//! quantities, unknown products) are silently ignored: they come from stale
//! UI state and double clicks, not from user mistakes worth surfacing.

use tracing::instrument;

use markethub_core::{BusinessId, ProductId};

use crate::models::{BusinessCart, BusinessMeta, CartLineInput, Carts};
use crate::persistence::{CartStorage, PersistenceAdapter};

/// Per-business carts for one buyer session.
#[derive(Debug)]
pub struct CartStore<S> {
    carts: Carts,
    persistence: PersistenceAdapter<S>,
}

impl<S: CartStorage> CartStore<S> {
    /// Hydrate a store from whatever the adapter has saved.
    pub fn open(persistence: PersistenceAdapter<S>) -> Self {
        let carts = persistence.load();
        tracing::debug!(carts = carts.len(), "Cart store opened");
        Self { carts, persistence }
    }

    /// Add a product to a seller's cart.
    ///
    /// Creates the cart from `meta` if this is the first product for the
    /// seller. A product already in the cart has its quantity increased;
    /// its captured price is left alone.
    #[instrument(skip_all, fields(business_id = %business_id, product_id = %line.product_id(), quantity = line.quantity()))]
    pub fn add_item(&mut self, business_id: &BusinessId, meta: BusinessMeta, line: CartLineInput) {
        self.carts
            .entry(business_id.clone())
            .or_insert_with(|| BusinessCart::new(business_id.clone(), meta))
            .merge(line);
        tracing::debug!("Item added to cart");
        self.sync();
    }

    /// Remove a product from a seller's cart. Removing the last product
    /// deletes the cart.
    #[instrument(skip_all, fields(business_id = %business_id, product_id = %product_id))]
    pub fn remove_item(&mut self, business_id: &BusinessId, product_id: &ProductId) {
        if let Some(cart) = self.carts.get_mut(business_id) {
            if cart.remove(product_id) {
                tracing::debug!("Item removed from cart");
            }
            if cart.is_empty() {
                self.carts.remove(business_id);
                tracing::debug!("Cart emptied and removed");
            }
        }
        self.sync();
    }

    /// Set a line's quantity. Zero or negative quantities are ignored; use
    /// [`CartStore::remove_item`] to drop a line.
    #[instrument(skip_all, fields(business_id = %business_id, product_id = %product_id, quantity = quantity))]
    pub fn update_quantity(&mut self, business_id: &BusinessId, product_id: &ProductId, quantity: i64) {
        if quantity <= 0 {
            tracing::debug!("Ignoring non-positive quantity");
        } else if let Some(line) = self
            .carts
            .get_mut(business_id)
            .and_then(|cart| cart.line_mut(product_id))
        {
            line.set_quantity(u32::try_from(quantity).unwrap_or(u32::MAX));
            tracing::debug!("Quantity updated");
        }
        self.sync();
    }

    /// Delete a seller's cart.
    #[instrument(skip_all, fields(business_id = %business_id))]
    pub fn clear_cart(&mut self, business_id: &BusinessId) {
        if self.carts.remove(business_id).is_some() {
            tracing::debug!("Cart cleared");
        }
        self.sync();
    }

    /// Delete every cart. Never called implicitly.
    #[instrument(skip_all)]
    pub fn clear_all(&mut self) {
        let cleared = self.carts.len();
        self.carts.clear();
        tracing::debug!(cleared, "All carts cleared");
        self.sync();
    }

    /// A seller's cart, if the buyer has one.
    #[must_use]
    pub fn get_cart(&self, business_id: &BusinessId) -> Option<&BusinessCart> {
        self.carts.get(business_id)
    }

    /// Every cart, ordered by seller id.
    #[must_use]
    pub const fn carts(&self) -> &Carts {
        &self.carts
    }

    /// An owned copy of every cart.
    #[must_use]
    pub fn snapshot(&self) -> Carts {
        self.carts.clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.carts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.carts.is_empty()
    }

    /// The persistence adapter backing this store.
    #[must_use]
    pub const fn persistence(&self) -> &PersistenceAdapter<S> {
        &self.persistence
    }

    /// Write the current state. Failures are logged and swallowed: the
    /// in-memory state stays authoritative for the session.
    fn sync(&mut self) {
        if let Err(e) = self.persistence.save(&self.carts) {
            tracing::warn!(error = %e, key = %self.persistence.key(), "Failed to persist carts");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use markethub_core::Price;

    use super::*;
    use crate::persistence::{MemoryStorage, StorageError};

    fn store() -> CartStore<MemoryStorage> {
        CartStore::open(PersistenceAdapter::new(MemoryStorage::new()))
    }

    fn meta() -> BusinessMeta {
        BusinessMeta::new("Premium Textiles Co.", "+13125551234")
    }

    fn line(product: &str, price: &str, quantity: u32) -> CartLineInput {
        CartLineInput::new(product, format!("Product {product}"), Price::new(price.parse().unwrap()), quantity)
            .unwrap()
    }

    fn biz(id: &str) -> BusinessId {
        BusinessId::new(id)
    }

    fn prod(id: &str) -> ProductId {
        ProductId::new(id)
    }

    #[test]
    fn test_add_creates_cart_with_meta() {
        let mut store = store();
        store.add_item(&biz("1"), meta(), line("a", "1.00", 1));

        let cart = store.get_cart(&biz("1")).unwrap();
        assert_eq!(cart.business_display_name(), "Premium Textiles Co.");
        assert_eq!(cart.business_contact_handle(), "+13125551234");
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_repeated_add_merges() {
        let mut store = store();
        store.add_item(&biz("1"), meta(), line("a", "1.00", 2));
        store.add_item(&biz("1"), meta(), line("a", "1.00", 3));

        let cart = store.get_cart(&biz("1")).unwrap();
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity(), 5);
    }

    #[test]
    fn test_existing_cart_keeps_original_meta() {
        let mut store = store();
        store.add_item(&biz("1"), meta(), line("a", "1.00", 1));
        store.add_item(&biz("1"), BusinessMeta::new("Renamed", "+999"), line("b", "1.00", 1));

        let cart = store.get_cart(&biz("1")).unwrap();
        assert_eq!(cart.business_display_name(), "Premium Textiles Co.");
    }

    #[test]
    fn test_lines_keep_first_add_order() {
        let mut store = store();
        store.add_item(&biz("1"), meta(), line("z", "1.00", 1));
        store.add_item(&biz("1"), meta(), line("a", "1.00", 1));
        store.add_item(&biz("1"), meta(), line("z", "1.00", 1));

        let order: Vec<&str> = store
            .get_cart(&biz("1"))
            .unwrap()
            .lines()
            .iter()
            .map(|l| l.product_id().as_str())
            .collect();
        assert_eq!(order, ["z", "a"]);
    }

    #[test]
    fn test_remove_last_line_prunes_cart() {
        let mut store = store();
        store.add_item(&biz("1"), meta(), line("a", "1.00", 1));
        store.remove_item(&biz("1"), &prod("a"));

        assert!(store.get_cart(&biz("1")).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut store = store();
        store.add_item(&biz("1"), meta(), line("a", "1.00", 1));
        store.remove_item(&biz("1"), &prod("nope"));
        store.remove_item(&biz("2"), &prod("a"));

        assert_eq!(store.get_cart(&biz("1")).unwrap().lines().len(), 1);
    }

    #[test]
    fn test_update_quantity_sets_value() {
        let mut store = store();
        store.add_item(&biz("1"), meta(), line("a", "1.00", 1));
        store.update_quantity(&biz("1"), &prod("a"), 7);
        assert_eq!(store.get_cart(&biz("1")).unwrap().lines()[0].quantity(), 7);
    }

    #[test]
    fn test_update_quantity_ignores_non_positive() {
        let mut store = store();
        store.add_item(&biz("1"), meta(), line("a", "1.00", 3));
        store.update_quantity(&biz("1"), &prod("a"), 0);
        store.update_quantity(&biz("1"), &prod("a"), -5);

        let cart = store.get_cart(&biz("1")).unwrap();
        assert_eq!(cart.lines()[0].quantity(), 3);
    }

    #[test]
    fn test_update_quantity_clamps_huge_values() {
        let mut store = store();
        store.add_item(&biz("1"), meta(), line("a", "1.00", 1));
        store.update_quantity(&biz("1"), &prod("a"), i64::MAX);
        assert_eq!(store.get_cart(&biz("1")).unwrap().lines()[0].quantity(), u32::MAX);
    }

    #[test]
    fn test_update_quantity_unknown_line_is_noop() {
        let mut store = store();
        store.update_quantity(&biz("1"), &prod("a"), 4);
        assert!(store.is_empty());
    }

    #[test]
    fn test_clear_cart_only_touches_one_business() {
        let mut store = store();
        store.add_item(&biz("A"), meta(), line("a", "1.00", 1));
        store.add_item(&biz("B"), meta(), line("b", "2.00", 2));

        store.clear_cart(&biz("A"));
        store.clear_cart(&biz("A"));

        assert!(store.get_cart(&biz("A")).is_none());
        assert_eq!(store.get_cart(&biz("B")).unwrap().lines()[0].quantity(), 2);
    }

    #[test]
    fn test_clear_all() {
        let mut store = store();
        store.add_item(&biz("A"), meta(), line("a", "1.00", 1));
        store.add_item(&biz("B"), meta(), line("b", "2.00", 2));
        store.clear_all();
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_every_mutation_is_persisted() {
        let mut store = store();
        store.add_item(&biz("1"), meta(), line("a", "1.00", 1));
        assert_eq!(store.persistence().load(), *store.carts());

        store.update_quantity(&biz("1"), &prod("a"), 4);
        assert_eq!(store.persistence().load(), *store.carts());

        store.remove_item(&biz("1"), &prod("a"));
        assert!(store.persistence().load().is_empty());
    }

    #[test]
    fn test_reopen_hydrates() {
        let mut first = store();
        first.add_item(&biz("1"), meta(), line("a", "1.00", 2));
        let storage = first.persistence().storage().clone();

        let second = CartStore::open(PersistenceAdapter::new(storage));
        assert_eq!(second.carts(), first.carts());
    }

    struct ReadOnlyStorage;

    impl CartStorage for ReadOnlyStorage {
        fn read(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn write(&mut self, _key: &str, _data: &str) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::other("read-only")))
        }

        fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::other("read-only")))
        }
    }

    #[test]
    fn test_failed_save_keeps_memory_state() {
        let mut store = CartStore::open(PersistenceAdapter::new(ReadOnlyStorage));
        store.add_item(&biz("1"), meta(), line("a", "1.00", 1));
        assert_eq!(store.get_cart(&biz("1")).unwrap().lines().len(), 1);
    }
}
