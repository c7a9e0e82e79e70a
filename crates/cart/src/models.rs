//! Cart domain models.
//!
//! A buyer holds one [`BusinessCart`] per seller. Each cart holds at most one
//! [`CartLine`] per product; adding a product again bumps its quantity.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use markethub_core::{BusinessId, Price, ProductId};

/// All carts of one buyer, keyed by seller.
///
/// `BTreeMap` keeps iteration order deterministic across reads and sessions.
pub type Carts = BTreeMap<BusinessId, BusinessCart>;

/// Errors raised when building a [`CartLineInput`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LineError {
    /// Quantity must be at least one.
    #[error("quantity must be at least 1")]
    ZeroQuantity,
    /// Unit price must not be negative.
    #[error("unit price cannot be negative (got {0})")]
    NegativePrice(Price),
}

/// One product's presence in a cart.
///
/// The unit price is captured when the product is first added and never
/// refreshed from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    product_id: ProductId,
    name: String,
    #[serde(alias = "price")]
    unit_price: Price,
    quantity: u32,
    #[serde(default, alias = "image", skip_serializing_if = "Option::is_none")]
    image_ref: Option<String>,
}

impl CartLine {
    #[must_use]
    pub const fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn unit_price(&self) -> Price {
        self.unit_price
    }

    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    #[must_use]
    pub fn image_ref(&self) -> Option<&str> {
        self.image_ref.as_deref()
    }

    /// `unit_price × quantity`, unrounded.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }

    pub(crate) const fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }

    pub(crate) const fn add_quantity(&mut self, quantity: u32) {
        self.quantity = self.quantity.saturating_add(quantity);
    }
}

/// A validated add-to-cart request, as supplied by the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineInput {
    product_id: ProductId,
    name: String,
    unit_price: Price,
    quantity: u32,
    image_ref: Option<String>,
}

impl CartLineInput {
    /// Build an add request.
    ///
    /// # Errors
    ///
    /// Returns [`LineError::ZeroQuantity`] for a zero quantity and
    /// [`LineError::NegativePrice`] for a price below zero.
    pub fn new(
        product_id: impl Into<ProductId>,
        name: impl Into<String>,
        unit_price: Price,
        quantity: u32,
    ) -> Result<Self, LineError> {
        if quantity == 0 {
            return Err(LineError::ZeroQuantity);
        }
        if unit_price.is_negative() {
            return Err(LineError::NegativePrice(unit_price));
        }
        Ok(Self {
            product_id: product_id.into(),
            name: name.into(),
            unit_price,
            quantity,
            image_ref: None,
        })
    }

    /// Attach a display image reference.
    #[must_use]
    pub fn with_image(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = Some(image_ref.into());
        self
    }

    #[must_use]
    pub const fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    pub(crate) fn into_line(self) -> CartLine {
        CartLine {
            product_id: self.product_id,
            name: self.name,
            unit_price: self.unit_price,
            quantity: self.quantity,
            image_ref: self.image_ref,
        }
    }
}

/// Seller details captured when their cart is first created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessMeta {
    /// Display name shown in cart views and order summaries.
    pub display_name: String,
    /// Messaging handle (phone number) used at checkout.
    pub contact_handle: String,
}

impl BusinessMeta {
    #[must_use]
    pub fn new(display_name: impl Into<String>, contact_handle: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            contact_handle: contact_handle.into(),
        }
    }
}

/// The aggregate cart for one seller.
///
/// Never empty while held by a store: removing the last line removes the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessCart {
    business_id: BusinessId,
    #[serde(alias = "businessName")]
    business_display_name: String,
    #[serde(alias = "businessPhone")]
    business_contact_handle: String,
    #[serde(alias = "items")]
    lines: Vec<CartLine>,
}

impl BusinessCart {
    pub(crate) fn new(business_id: BusinessId, meta: BusinessMeta) -> Self {
        Self {
            business_id,
            business_display_name: meta.display_name,
            business_contact_handle: meta.contact_handle,
            lines: Vec::new(),
        }
    }

    #[must_use]
    pub const fn business_id(&self) -> &BusinessId {
        &self.business_id
    }

    #[must_use]
    pub fn business_display_name(&self) -> &str {
        &self.business_display_name
    }

    #[must_use]
    pub fn business_contact_handle(&self) -> &str {
        &self.business_contact_handle
    }

    /// Lines in first-add order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn line(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.product_id == product_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Merge a line in: bump the existing quantity or append.
    ///
    /// The existing line keeps its captured price and name.
    pub(crate) fn merge(&mut self, input: CartLineInput) {
        if let Some(existing) = self.line_mut(&input.product_id) {
            existing.add_quantity(input.quantity);
        } else {
            self.lines.push(input.into_line());
        }
    }

    /// Remove a line; returns whether anything was removed.
    pub(crate) fn remove(&mut self, product_id: &ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| &l.product_id != product_id);
        self.lines.len() != before
    }

    pub(crate) fn line_mut(&mut self, product_id: &ProductId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|l| &l.product_id == product_id)
    }

    /// Repair a cart read from storage.
    ///
    /// Drops zero-quantity lines and folds duplicate products into their
    /// first occurrence. The map key wins over the embedded id.
    pub(crate) fn normalized(mut self, business_id: BusinessId) -> Self {
        let mut lines: Vec<CartLine> = Vec::with_capacity(self.lines.len());
        for line in self.lines.drain(..).filter(|l| l.quantity > 0) {
            match lines.iter_mut().find(|l| l.product_id == line.product_id) {
                Some(existing) => existing.add_quantity(line.quantity),
                None => lines.push(line),
            }
        }
        self.lines = lines;
        self.business_id = business_id;
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn price(s: &str) -> Price {
        Price::new(s.parse().unwrap())
    }

    #[test]
    fn test_input_rejects_zero_quantity() {
        assert_eq!(
            CartLineInput::new("p", "Widget", price("1.00"), 0),
            Err(LineError::ZeroQuantity)
        );
    }

    #[test]
    fn test_input_rejects_negative_price() {
        assert!(matches!(
            CartLineInput::new("p", "Widget", price("-0.01"), 1),
            Err(LineError::NegativePrice(_))
        ));
    }

    #[test]
    fn test_input_accepts_free_item() {
        assert!(CartLineInput::new("p", "Sample", Price::ZERO, 1).is_ok());
    }

    #[test]
    fn test_merge_keeps_first_price() {
        let mut cart = BusinessCart::new(BusinessId::new("1"), BusinessMeta::new("Shop", "+1"));
        cart.merge(CartLineInput::new("p", "Widget", price("10.00"), 1).unwrap());
        cart.merge(CartLineInput::new("p", "Widget v2", price("12.00"), 2).unwrap());

        assert_eq!(cart.lines().len(), 1);
        let line = cart.line(&ProductId::new("p")).unwrap();
        assert_eq!(line.quantity(), 3);
        assert_eq!(line.unit_price(), price("10.00"));
        assert_eq!(line.name(), "Widget");
    }

    #[test]
    fn test_quantity_saturates() {
        let mut cart = BusinessCart::new(BusinessId::new("1"), BusinessMeta::new("Shop", "+1"));
        cart.merge(CartLineInput::new("p", "Widget", price("1"), u32::MAX).unwrap());
        cart.merge(CartLineInput::new("p", "Widget", price("1"), 5).unwrap());
        assert_eq!(cart.lines()[0].quantity(), u32::MAX);
    }

    #[test]
    fn test_line_total() {
        let line = CartLineInput::new("p", "Beans", price("24.99"), 2)
            .unwrap()
            .into_line();
        assert_eq!(line.line_total().format(), "49.98");
    }

    #[test]
    fn test_deserialize_legacy_field_names() {
        let json = r#"{
            "businessId": "1",
            "businessName": "Premium Textiles Co.",
            "businessPhone": "+13125551234",
            "items": [
                {"productId": "1-1", "name": "Organic Cotton Fabric", "price": 45.99, "quantity": 1, "image": "https://img/1.jpg"}
            ]
        }"#;
        let cart: BusinessCart = serde_json::from_str(json).unwrap();
        assert_eq!(cart.business_display_name(), "Premium Textiles Co.");
        assert_eq!(cart.business_contact_handle(), "+13125551234");
        let line = &cart.lines()[0];
        assert_eq!(line.unit_price(), price("45.99"));
        assert_eq!(line.image_ref(), Some("https://img/1.jpg"));
    }

    #[test]
    fn test_normalized_folds_duplicates_and_drops_zero() {
        let json = r#"{
            "businessId": "stale",
            "businessDisplayName": "Shop",
            "businessContactHandle": "+1",
            "lines": [
                {"productId": "a", "name": "A", "unitPrice": "1.00", "quantity": 1},
                {"productId": "b", "name": "B", "unitPrice": "2.00", "quantity": 0},
                {"productId": "a", "name": "A", "unitPrice": "3.00", "quantity": 2}
            ]
        }"#;
        let cart: BusinessCart = serde_json::from_str(json).unwrap();
        let cart = cart.normalized(BusinessId::new("1"));

        assert_eq!(cart.business_id().as_str(), "1");
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity(), 3);
        assert_eq!(cart.lines()[0].unit_price(), price("1.00"));
    }
}
