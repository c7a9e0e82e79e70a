//! Derived cart values: item counts, subtotals, and the cross-seller view.
//!
//! Everything here is computed on read from store state; nothing is cached.

use markethub_core::{BusinessId, Price};

use crate::models::{BusinessCart, CartLine, Carts};

/// Per-seller totals for a cart listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSummary {
    pub business_id: BusinessId,
    pub business_name: String,
    pub line_count: usize,
    pub item_count: u64,
    pub subtotal: Price,
}

impl From<&BusinessCart> for CartSummary {
    fn from(cart: &BusinessCart) -> Self {
        Self {
            business_id: cart.business_id().clone(),
            business_name: cart.business_display_name().to_owned(),
            line_count: cart.lines().len(),
            item_count: item_count(Some(cart)),
            subtotal: subtotal(Some(cart)),
        }
    }
}

/// `unit_price × quantity` for one line.
#[must_use]
pub fn line_total(line: &CartLine) -> Price {
    line.line_total()
}

/// Total units across a cart's lines; 0 when there is no cart.
#[must_use]
pub fn item_count(cart: Option<&BusinessCart>) -> u64 {
    cart.map_or(0, |c| c.lines().iter().map(|l| u64::from(l.quantity())).sum())
}

/// Sum of line totals, unrounded. Format with [`Price::format`] for display.
#[must_use]
pub fn subtotal(cart: Option<&BusinessCart>) -> Price {
    cart.map_or(Price::ZERO, |c| c.lines().iter().map(CartLine::line_total).sum())
}

/// Every non-empty cart paired with its seller id, in seller-id order.
#[must_use]
pub fn group_all_carts_by_business(carts: &Carts) -> Vec<(&BusinessId, &BusinessCart)> {
    carts.iter().filter(|(_, cart)| !cart.is_empty()).collect()
}

/// One summary per non-empty cart, in seller-id order.
#[must_use]
pub fn summaries(carts: &Carts) -> Vec<CartSummary> {
    group_all_carts_by_business(carts)
        .into_iter()
        .map(|(_, cart)| CartSummary::from(cart))
        .collect()
}

/// Units across every cart.
#[must_use]
pub fn total_item_count(carts: &Carts) -> u64 {
    carts.values().map(|c| item_count(Some(c))).sum()
}

/// Sum of every cart's subtotal.
///
/// Only meaningful when all sellers price in the same currency.
#[must_use]
pub fn grand_total(carts: &Carts) -> Price {
    carts.values().map(|c| subtotal(Some(c))).sum()
}
