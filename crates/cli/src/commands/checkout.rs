//! Checkout handoff commands.
//!
//! # Usage
//!
//! ```bash
//! # Print the order message and chat link, then clear the cart
//! mh-cart checkout --business 1 --name "Asha" --phone "+91 98765 43210"
//!
//! # Same, but keep the cart
//! mh-cart checkout --business 1 --keep
//!
//! # One link per seller, nothing cleared
//! mh-cart checkout --all
//!
//! # Ask a seller about a product before carting it
//! mh-cart inquire --catalog catalog.yaml --business 1 --product 1-1 --note "Bulk pricing?"
//! ```

use std::fmt::Write as _;

use markethub_cart::persistence::CartStorage;
use markethub_cart::{BuyerInfo, CartStore, CheckoutFlow, Handoff, MessageBuilder};
use markethub_core::{BusinessId, ProductId};

use super::CommandError;
use crate::catalog::Catalog;

/// Walk one seller's checkout and return the message and link to print.
///
/// With `keep`, the flow stops once the message is built and the cart is
/// left as it was.
///
/// # Errors
///
/// Returns [`CommandError::Checkout`] if the seller has no cart.
pub fn checkout<S: CartStorage>(
    store: &mut CartStore<S>,
    builder: &MessageBuilder,
    business_id: &BusinessId,
    buyer: &BuyerInfo,
    keep: bool,
) -> Result<String, CommandError> {
    let mut flow = CheckoutFlow::new(business_id.clone());
    flow.begin(store)?;

    if keep {
        let handoff = flow.submit_buyer_info(store, builder, buyer)?;
        return Ok(render_handoff(handoff));
    }

    flow.submit_buyer_info(store, builder, buyer)?;
    flow.mark_link_opened()?;
    let handoff = flow.complete(store)?;

    let mut out = render_handoff(&handoff);
    let _ = write!(out, "\n\nCart for business {business_id} cleared");
    Ok(out)
}

/// One message and link per cart. Carts are never cleared.
pub fn checkout_all<S: CartStorage>(
    store: &CartStore<S>,
    builder: &MessageBuilder,
    buyer: &BuyerInfo,
) -> String {
    let handoffs = builder.checkout_all(store.carts(), buyer);
    if handoffs.is_empty() {
        return "No carts".to_owned();
    }

    handoffs
        .iter()
        .map(|(business_id, handoff)| format!("== Business {business_id} ==\n{}", render_handoff(handoff)))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Build a product inquiry for a catalog product.
///
/// # Errors
///
/// Returns [`CommandError::Catalog`] if the seller or product is unknown.
pub fn inquire(
    catalog: &Catalog,
    builder: &MessageBuilder,
    business_id: &BusinessId,
    product_id: &ProductId,
    buyer: &BuyerInfo,
    note: Option<&str>,
) -> Result<String, CommandError> {
    let business = catalog.business(business_id)?;
    let product = business.product(product_id)?;
    let handoff = builder.inquiry(&business.whatsapp, &product.name, buyer, note);
    Ok(render_handoff(&handoff))
}

fn render_handoff(handoff: &Handoff) -> String {
    format!("{}\n\nOpen: {}", handoff.message_text, handoff.deep_link)
}
