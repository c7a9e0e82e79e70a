//! Cart editing and listing commands.
//!
//! # Usage
//!
//! ```bash
//! # Put two of a product in the seller's cart
//! mh-cart add --catalog catalog.yaml --business 1 --product 1-1 --quantity 2
//!
//! # Change or drop a line
//! mh-cart set-quantity --business 1 --product 1-1 --quantity 5
//! mh-cart remove --business 1 --product 1-1
//!
//! # List every cart, or one seller's lines
//! mh-cart show
//! mh-cart show --business 1
//! ```

use std::fmt::Write as _;

use markethub_cart::aggregate::{self, CartSummary};
use markethub_cart::persistence::CartStorage;
use markethub_cart::{BusinessCart, CartLineInput, CartStore, MessageBuilder};
use markethub_core::{BusinessId, ProductId};

use super::CommandError;
use crate::catalog::Catalog;

/// Add `quantity` of a catalog product to its seller's cart.
///
/// # Errors
///
/// Returns an error if the seller or product is not in the catalog, or the
/// quantity is zero.
pub fn add<S: CartStorage>(
    store: &mut CartStore<S>,
    catalog: &Catalog,
    business_id: &BusinessId,
    product_id: &ProductId,
    quantity: u32,
) -> Result<String, CommandError> {
    let business = catalog.business(business_id)?;
    let product = business.product(product_id)?;

    let mut line = CartLineInput::new(product.id.clone(), &product.name, product.price, quantity)?;
    if let Some(image) = &product.image {
        line = line.with_image(image);
    }
    store.add_item(business_id, business.meta(), line);

    let in_cart = store
        .get_cart(business_id)
        .and_then(|cart| cart.line(product_id))
        .map_or(0, |line| line.quantity());
    Ok(format!(
        "Added {quantity} x {} to {} cart ({in_cart} in cart)",
        product.name, business.name
    ))
}

/// Drop a line from a seller's cart.
pub fn remove<S: CartStorage>(
    store: &mut CartStore<S>,
    business_id: &BusinessId,
    product_id: &ProductId,
) -> String {
    let present = store
        .get_cart(business_id)
        .is_some_and(|cart| cart.line(product_id).is_some());
    if !present {
        return format!("Product {product_id} is not in the cart for business {business_id}");
    }

    store.remove_item(business_id, product_id);
    if store.get_cart(business_id).is_none() {
        format!("Removed {product_id}; cart for business {business_id} is now empty")
    } else {
        format!("Removed {product_id} from cart for business {business_id}")
    }
}

/// Set a line's quantity. Values of zero or less leave the line unchanged.
pub fn set_quantity<S: CartStorage>(
    store: &mut CartStore<S>,
    business_id: &BusinessId,
    product_id: &ProductId,
    quantity: i64,
) -> String {
    store.update_quantity(business_id, product_id, quantity);
    // Positive quantities beyond u32 are stored clamped
    let applied = (quantity > 0).then(|| u32::try_from(quantity).unwrap_or(u32::MAX));
    match store.get_cart(business_id).and_then(|cart| cart.line(product_id)) {
        Some(line) if applied == Some(line.quantity()) => {
            format!("{} quantity set to {}", line.name(), line.quantity())
        }
        Some(line) => format!(
            "{} quantity unchanged at {} (use remove to drop a line)",
            line.name(),
            line.quantity()
        ),
        None => format!("Product {product_id} is not in the cart for business {business_id}"),
    }
}

/// Empty one seller's cart.
pub fn clear<S: CartStorage>(store: &mut CartStore<S>, business_id: &BusinessId) -> String {
    store.clear_cart(business_id);
    format!("Cleared cart for business {business_id}")
}

/// Empty every cart.
pub fn clear_all<S: CartStorage>(store: &mut CartStore<S>) -> String {
    let count = store.len();
    store.clear_all();
    format!("Cleared {count} cart(s)")
}

/// Render one seller's cart, or every cart when `business_id` is `None`.
///
/// # Errors
///
/// Returns [`CartError::NotFound`](markethub_cart::CartError::NotFound) if a
/// specific seller was asked for and has no cart.
pub fn show<S: CartStorage>(
    store: &CartStore<S>,
    builder: &MessageBuilder,
    business_id: Option<&BusinessId>,
) -> Result<String, CommandError> {
    if let Some(business_id) = business_id {
        let cart = store.get_cart(business_id).ok_or_else(|| {
            markethub_cart::CartError::NotFound(format!("cart for business {business_id}"))
        })?;
        return Ok(render_cart(cart, builder));
    }

    let summaries = aggregate::summaries(store.carts());
    if summaries.is_empty() {
        return Ok("No carts".to_owned());
    }

    let mut out = String::new();
    for summary in &summaries {
        let _ = writeln!(out, "{}", render_summary(summary, builder));
    }
    let _ = write!(
        out,
        "{} item(s) across {} cart(s), total {}",
        aggregate::total_item_count(store.carts()),
        summaries.len(),
        builder.format_amount(aggregate::grand_total(store.carts()))
    );
    Ok(out)
}

fn render_summary(summary: &CartSummary, builder: &MessageBuilder) -> String {
    format!(
        "[{}] {}: {} line(s), {} item(s), subtotal {}",
        summary.business_id,
        summary.business_name,
        summary.line_count,
        summary.item_count,
        builder.format_amount(summary.subtotal)
    )
}

fn render_cart(cart: &BusinessCart, builder: &MessageBuilder) -> String {
    let mut out = format!("[{}] {}\n", cart.business_id(), cart.business_display_name());
    for line in cart.lines() {
        let _ = writeln!(
            out,
            "  {} {} ({}) x {} = {}",
            line.product_id(),
            line.name(),
            builder.format_amount(line.unit_price()),
            line.quantity(),
            builder.format_amount(line.line_total())
        );
    }
    let _ = write!(
        out,
        "{} item(s), subtotal {}",
        aggregate::item_count(Some(cart)),
        builder.format_amount(aggregate::subtotal(Some(cart)))
    );
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use markethub_cart::persistence::{MemoryStorage, PersistenceAdapter};
    use markethub_core::CurrencyCode;

    use super::*;
    use crate::commands::tests::catalog;

    fn store() -> CartStore<MemoryStorage> {
        CartStore::open(PersistenceAdapter::new(MemoryStorage::new()))
    }

    #[test]
    fn test_add_from_catalog() {
        let mut store = store();
        let catalog = catalog();
        let shop = BusinessId::new("1");

        let out = add(&mut store, &catalog, &shop, &ProductId::new("1-1"), 2).unwrap();
        assert_eq!(out, "Added 2 x Organic Cotton Fabric to Premium Textiles Co. cart (2 in cart)");

        let out = add(&mut store, &catalog, &shop, &ProductId::new("1-1"), 1).unwrap();
        assert!(out.ends_with("(3 in cart)"));

        let cart = store.get_cart(&shop).unwrap();
        assert_eq!(cart.business_contact_handle(), "+1 (312) 555-1234");
        assert_eq!(cart.lines()[0].image_ref(), Some("/images/cotton.jpg"));
    }

    #[test]
    fn test_add_rejects_unknown_and_zero() {
        let mut store = store();
        let catalog = catalog();

        assert!(matches!(
            add(&mut store, &catalog, &BusinessId::new("9"), &ProductId::new("1-1"), 1),
            Err(CommandError::Catalog(_))
        ));
        assert!(matches!(
            add(&mut store, &catalog, &BusinessId::new("1"), &ProductId::new("1-1"), 0),
            Err(CommandError::Line(_))
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_remove_and_prune() {
        let mut store = store();
        let shop = BusinessId::new("1");
        add(&mut store, &catalog(), &shop, &ProductId::new("1-1"), 1).unwrap();

        let out = remove(&mut store, &shop, &ProductId::new("nope"));
        assert!(out.contains("is not in the cart"));

        let out = remove(&mut store, &shop, &ProductId::new("1-1"));
        assert!(out.ends_with("is now empty"));
        assert!(store.get_cart(&shop).is_none());
    }

    #[test]
    fn test_set_quantity_floor() {
        let mut store = store();
        let shop = BusinessId::new("1");
        let product = ProductId::new("1-1");
        add(&mut store, &catalog(), &shop, &product, 2).unwrap();

        assert_eq!(
            set_quantity(&mut store, &shop, &product, 5),
            "Organic Cotton Fabric quantity set to 5"
        );
        assert!(set_quantity(&mut store, &shop, &product, 0).contains("unchanged at 5"));
        assert!(set_quantity(&mut store, &shop, &product, -3).contains("unchanged at 5"));
        assert_eq!(
            set_quantity(&mut store, &shop, &product, i64::MAX),
            "Organic Cotton Fabric quantity set to 4294967295"
        );
    }

    #[test]
    fn test_show_all_and_one() {
        let mut store = store();
        let catalog = catalog();
        add(&mut store, &catalog, &BusinessId::new("1"), &ProductId::new("1-1"), 1).unwrap();
        add(&mut store, &catalog, &BusinessId::new("3"), &ProductId::new("3-1"), 2).unwrap();

        let builder = MessageBuilder::new();
        let all = show(&store, &builder, None).unwrap();
        assert_eq!(
            all,
            "[1] Premium Textiles Co.: 1 line(s), 1 item(s), subtotal 45.99\n\
             [3] Artisan Food Goods: 1 line(s), 2 item(s), subtotal 49.98\n\
             3 item(s) across 2 cart(s), total 95.97"
        );

        let one = show(&store, &builder.with_currency(CurrencyCode::USD), Some(&BusinessId::new("3")))
            .unwrap();
        assert!(one.contains("3-1 Organic Coffee Beans ($24.99) x 2 = $49.98"));
        assert!(one.ends_with("2 item(s), subtotal $49.98"));

        assert!(show(&store, &MessageBuilder::new(), Some(&BusinessId::new("9"))).is_err());
    }

    #[test]
    fn test_clear_commands() {
        let mut store = store();
        let catalog = catalog();
        add(&mut store, &catalog, &BusinessId::new("1"), &ProductId::new("1-1"), 1).unwrap();
        add(&mut store, &catalog, &BusinessId::new("3"), &ProductId::new("3-1"), 1).unwrap();

        clear(&mut store, &BusinessId::new("1"));
        assert_eq!(store.len(), 1);
        assert_eq!(clear_all(&mut store), "Cleared 1 cart(s)");
        assert_eq!(show(&store, &MessageBuilder::new(), None).unwrap(), "No carts");
    }
}
