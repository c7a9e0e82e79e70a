//! `mh-cart` subcommands.
//!
//! Each command takes the store (and catalog or message builder where it
//! needs one) and returns the text to print, so commands stay testable
//! against in-memory storage.

pub mod cart;
pub mod checkout;

use thiserror::Error;

use markethub_cart::persistence::{FileStorage, PersistenceAdapter};
use markethub_cart::{CartConfig, CartError, CartStore, CheckoutError, LineError};

use crate::catalog::CatalogError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error(transparent)]
    Line(#[from] LineError),
}

/// Open the file-backed store described by `config`.
pub fn open_store(config: &CartConfig) -> CartStore<FileStorage> {
    CartStore::open(PersistenceAdapter::with_key(
        FileStorage::new(&config.data_dir),
        config.cart_key.clone(),
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use crate::catalog::Catalog;

    pub(crate) fn catalog() -> Catalog {
        Catalog::parse(
            r#"
businesses:
  - id: "1"
    name: Premium Textiles Co.
    whatsapp: "+1 (312) 555-1234"
    products:
      - id: "1-1"
        name: Organic Cotton Fabric
        price: "45.99"
        image: /images/cotton.jpg
  - id: "3"
    name: Artisan Food Goods
    whatsapp: "+13125553456"
    products:
      - id: "3-1"
        name: Organic Coffee Beans
        price: "24.99"
"#,
        )
        .unwrap()
    }
}
