//! Message builders for the messaging handoff.
//!
//! Sellers read these messages by hand, so the layout is fixed and every
//! amount is printed with exactly two decimals. Buyer identity is optional:
//! missing values fall back to placeholders and building never fails.

use markethub_core::{BusinessId, CurrencyCode, OrderStatus, Price, format_for_messaging};

use crate::aggregate;
use crate::config::CartConfig;
use crate::models::{BusinessCart, Carts};

use super::link::{self, DEFAULT_BASE_URL};

/// Placeholder for a buyer who gave no name.
pub const DEFAULT_BUYER_NAME: &str = "Customer";

/// Placeholder for a buyer who gave no phone number.
pub const DEFAULT_BUYER_PHONE: &str = "+1-XXX-XXX-XXXX";

const ORDER_RULE_WIDTH: usize = 30;

/// Contact details a buyer typed in at checkout. Both are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuyerInfo {
    pub name: Option<String>,
    pub phone: Option<String>,
}

impl BuyerInfo {
    #[must_use]
    pub fn new(name: Option<impl Into<String>>, phone: Option<impl Into<String>>) -> Self {
        Self {
            name: name.map(Into::into),
            phone: phone.map(Into::into),
        }
    }

    /// The buyer's name, or [`DEFAULT_BUYER_NAME`] if blank.
    #[must_use]
    pub fn display_name(&self) -> &str {
        non_blank(self.name.as_deref()).unwrap_or(DEFAULT_BUYER_NAME)
    }

    /// The buyer's phone, or [`DEFAULT_BUYER_PHONE`] if blank.
    #[must_use]
    pub fn display_phone(&self) -> &str {
        non_blank(self.phone.as_deref()).unwrap_or(DEFAULT_BUYER_PHONE)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// A rendered message and the link that sends it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handoff {
    pub message_text: String,
    pub deep_link: String,
}

/// Renders carts into seller-facing messages and deep links.
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    base_url: String,
    currency: Option<CurrencyCode>,
    country_code: Option<String>,
}

impl Default for MessageBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            currency: None,
            country_code: None,
        }
    }
}

impl MessageBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder configured from [`CartConfig`].
    #[must_use]
    pub fn from_config(config: &CartConfig) -> Self {
        Self {
            base_url: config.messaging_base_url.as_str().to_owned(),
            currency: config.currency,
            country_code: config.default_country_code.clone(),
        }
    }

    /// Send links to a different messaging host (and optional path).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Prefix amounts with the currency symbol (e.g. `₹45.99`).
    #[must_use]
    pub const fn with_currency(mut self, currency: CurrencyCode) -> Self {
        self.currency = Some(currency);
        self
    }

    /// Treat handles without a `+`/`00` prefix as national numbers in this
    /// country. Without it, handles are used as-is minus punctuation.
    #[must_use]
    pub fn with_country_code(mut self, country_code: impl Into<String>) -> Self {
        self.country_code = Some(country_code.into());
        self
    }

    /// Two-decimal amount, prefixed with the currency symbol when one is set.
    #[must_use]
    pub fn format_amount(&self, price: Price) -> String {
        match self.currency {
            Some(currency) => price.display(currency),
            None => price.format(),
        }
    }

    fn handle_digits(&self, handle: &str) -> String {
        match &self.country_code {
            Some(code) => format_for_messaging(handle, code),
            None => markethub_core::digits_only(handle),
        }
    }

    /// The cart checkout message.
    ///
    /// ```text
    /// Hello, my name is {name}.
    /// My phone number is {phone}.
    ///
    /// I am interested in:
    /// - {product} ({unit}) x {qty} = {line total}
    ///
    /// Total: {subtotal}
    ///
    /// Please confirm availability and arrange delivery. Thank you!
    /// ```
    #[must_use]
    pub fn cart_message(&self, cart: &BusinessCart, buyer: &BuyerInfo) -> String {
        let items = cart
            .lines()
            .iter()
            .map(|line| {
                format!(
                    "- {} ({}) x {} = {}",
                    line.name(),
                    self.format_amount(line.unit_price()),
                    line.quantity(),
                    self.format_amount(line.line_total()),
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "Hello, my name is {name}.\n\
             My phone number is {phone}.\n\
             \n\
             I am interested in:\n\
             {items}\n\
             \n\
             Total: {total}\n\
             \n\
             Please confirm availability and arrange delivery. Thank you!",
            name = buyer.display_name(),
            phone = buyer.display_phone(),
            total = self.format_amount(aggregate::subtotal(Some(cart))),
        )
    }

    /// A numbered order summary for sellers who prefer itemized orders.
    #[must_use]
    pub fn order_summary(&self, cart: &BusinessCart, buyer: &BuyerInfo) -> String {
        let rule = "─".repeat(ORDER_RULE_WIDTH);
        let mut message = format!("*New Order from {}*\n\n", buyer.display_name());
        message.push_str(&format!("*Business:* {}\n", cart.business_display_name()));
        message.push_str(&format!("*Buyer Phone:* {}\n\n", buyer.display_phone()));
        message.push_str("*Order Details:*\n");
        message.push_str(&rule);
        message.push('\n');

        for (index, line) in cart.lines().iter().enumerate() {
            message.push_str(&format!("{}. {}\n", index + 1, line.name()));
            message.push_str(&format!(
                "   Price: {} x {}\n",
                self.format_amount(line.unit_price()),
                line.quantity()
            ));
            message.push_str(&format!("   Subtotal: {}\n\n", self.format_amount(line.line_total())));
        }

        message.push_str(&rule);
        message.push('\n');
        message.push_str(&format!(
            "*Total Amount:* {}",
            self.format_amount(aggregate::subtotal(Some(cart)))
        ));
        message
    }

    /// A question about a single product, sent before anything is carted.
    #[allow(clippy::unused_self)]
    #[must_use]
    pub fn inquiry_message(&self, product_name: &str, buyer: &BuyerInfo, note: Option<&str>) -> String {
        let mut message = format!(
            "Hello, my name is {}.\nMy phone number is {}.\n\nI have a question about: {product_name}\n\n",
            buyer.display_name(),
            buyer.display_phone(),
        );
        if let Some(note) = non_blank(note) {
            message.push_str(note);
            message.push_str("\n\n");
        }
        message.push_str("Please get back to me at your earliest convenience. Thank you!");
        message
    }

    /// A seller-to-buyer notice that an order changed status.
    #[allow(clippy::unused_self)]
    #[must_use]
    pub fn status_update_message(
        &self,
        order_number: &str,
        status: OrderStatus,
        tracking_id: Option<&str>,
    ) -> String {
        let mut message = format!("Order {order_number} update\n\nStatus: {}\n", status.label());
        if let Some(tracking) = non_blank(tracking_id) {
            message.push_str(&format!("Tracking ID: {tracking}\n"));
        }
        message.push_str("\nThank you for shopping with us!");
        message
    }

    /// Deep link sending `message` to `handle`.
    #[must_use]
    pub fn deep_link(&self, handle: &str, message: &str) -> String {
        link::deep_link(&self.base_url, &self.handle_digits(handle), message)
    }

    /// Deep link opening a chat with `handle`, no message.
    #[must_use]
    pub fn contact_link(&self, handle: &str) -> String {
        link::contact_link(&self.base_url, &self.handle_digits(handle))
    }

    /// Cart message plus the link that sends it to the cart's seller.
    #[must_use]
    pub fn checkout(&self, cart: &BusinessCart, buyer: &BuyerInfo) -> Handoff {
        let message_text = self.cart_message(cart, buyer);
        let deep_link = self.deep_link(cart.business_contact_handle(), &message_text);
        Handoff {
            message_text,
            deep_link,
        }
    }

    /// One handoff per non-empty cart, in seller-id order.
    #[must_use]
    pub fn checkout_all(&self, carts: &Carts, buyer: &BuyerInfo) -> Vec<(BusinessId, Handoff)> {
        aggregate::group_all_carts_by_business(carts)
            .into_iter()
            .map(|(id, cart)| (id.clone(), self.checkout(cart, buyer)))
            .collect()
    }

    /// Inquiry message plus the link that sends it to `handle`.
    #[must_use]
    pub fn inquiry(
        &self,
        handle: &str,
        product_name: &str,
        buyer: &BuyerInfo,
        note: Option<&str>,
    ) -> Handoff {
        let message_text = self.inquiry_message(product_name, buyer, note);
        let deep_link = self.deep_link(handle, &message_text);
        Handoff {
            message_text,
            deep_link,
        }
    }
}
