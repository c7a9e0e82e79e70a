//! Checkout handoff: leaving the marketplace to finish the sale in a chat.
//!
//! A checkout walks one seller's cart through
//! `Idle → CollectingBuyerInfo → MessageBuilt → LinkOpened → CartCleared`.
//! The cart is only cleared once the link has been built and opened; walking
//! away while buyer details are being collected leaves it untouched.

pub mod link;
pub mod message;

pub use link::{DEFAULT_BASE_URL, contact_link, deep_link};
pub use message::{BuyerInfo, DEFAULT_BUYER_NAME, DEFAULT_BUYER_PHONE, Handoff, MessageBuilder};

use core::fmt;

use thiserror::Error;
use tracing::instrument;

use markethub_core::BusinessId;

use crate::persistence::CartStorage;
use crate::store::CartStore;

/// Where a checkout is in the handoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CheckoutState {
    #[default]
    Idle,
    CollectingBuyerInfo,
    MessageBuilt,
    LinkOpened,
    CartCleared,
}

impl fmt::Display for CheckoutState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::CollectingBuyerInfo => write!(f, "collecting_buyer_info"),
            Self::MessageBuilt => write!(f, "message_built"),
            Self::LinkOpened => write!(f, "link_opened"),
            Self::CartCleared => write!(f, "cart_cleared"),
        }
    }
}

/// Checkout flow errors. None of these touch cart state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    /// The seller has no cart (or it was emptied mid-checkout).
    #[error("No cart for business {0}")]
    EmptyCart(BusinessId),

    /// The requested step is not valid from the current state.
    #[error("Cannot {action} while checkout is {from}")]
    InvalidTransition {
        /// State the flow was in.
        from: CheckoutState,
        /// Step that was attempted.
        action: &'static str,
    },
}

/// One seller's checkout.
#[derive(Debug, Clone)]
pub struct CheckoutFlow {
    business_id: BusinessId,
    state: CheckoutState,
    handoff: Option<Handoff>,
}

impl CheckoutFlow {
    #[must_use]
    pub const fn new(business_id: BusinessId) -> Self {
        Self {
            business_id,
            state: CheckoutState::Idle,
            handoff: None,
        }
    }

    #[must_use]
    pub const fn state(&self) -> CheckoutState {
        self.state
    }

    #[must_use]
    pub const fn business_id(&self) -> &BusinessId {
        &self.business_id
    }

    /// The built message and link, once past `MessageBuilt`.
    #[must_use]
    pub const fn handoff(&self) -> Option<&Handoff> {
        self.handoff.as_ref()
    }

    fn expect(&self, expected: CheckoutState, action: &'static str) -> Result<(), CheckoutError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(CheckoutError::InvalidTransition {
                from: self.state,
                action,
            })
        }
    }

    /// `Idle → CollectingBuyerInfo`. Fails if the seller has no cart.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InvalidTransition`] unless idle, and
    /// [`CheckoutError::EmptyCart`] if there is nothing to check out.
    #[instrument(skip_all, fields(business_id = %self.business_id))]
    pub fn begin<S: CartStorage>(&mut self, store: &CartStore<S>) -> Result<(), CheckoutError> {
        self.expect(CheckoutState::Idle, "begin checkout")?;
        if store.get_cart(&self.business_id).is_none() {
            return Err(CheckoutError::EmptyCart(self.business_id.clone()));
        }
        self.state = CheckoutState::CollectingBuyerInfo;
        tracing::debug!("Collecting buyer info");
        Ok(())
    }

    /// `CollectingBuyerInfo → Idle`, with no effect on the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InvalidTransition`] unless collecting buyer info.
    #[instrument(skip_all, fields(business_id = %self.business_id))]
    pub fn abandon(&mut self) -> Result<(), CheckoutError> {
        self.expect(CheckoutState::CollectingBuyerInfo, "abandon checkout")?;
        self.state = CheckoutState::Idle;
        tracing::debug!("Checkout abandoned");
        Ok(())
    }

    /// `CollectingBuyerInfo → MessageBuilt`: render the cart as it is now.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InvalidTransition`] unless collecting buyer
    /// info, and [`CheckoutError::EmptyCart`] if the cart vanished meanwhile.
    #[instrument(skip_all, fields(business_id = %self.business_id))]
    pub fn submit_buyer_info<S: CartStorage>(
        &mut self,
        store: &CartStore<S>,
        builder: &MessageBuilder,
        buyer: &BuyerInfo,
    ) -> Result<&Handoff, CheckoutError> {
        self.expect(CheckoutState::CollectingBuyerInfo, "submit buyer info")?;
        let cart = store
            .get_cart(&self.business_id)
            .ok_or_else(|| CheckoutError::EmptyCart(self.business_id.clone()))?;

        self.state = CheckoutState::MessageBuilt;
        tracing::debug!("Checkout message built");
        Ok(self.handoff.insert(builder.checkout(cart, buyer)))
    }

    /// `MessageBuilt → LinkOpened`: the caller has handed the link off.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InvalidTransition`] unless the message is built.
    #[instrument(skip_all, fields(business_id = %self.business_id))]
    pub fn mark_link_opened(&mut self) -> Result<(), CheckoutError> {
        self.expect(CheckoutState::MessageBuilt, "open link")?;
        self.state = CheckoutState::LinkOpened;
        tracing::debug!("Checkout link opened");
        Ok(())
    }

    /// `LinkOpened → CartCleared`: drop the seller's cart.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InvalidTransition`] unless the link was opened.
    #[instrument(skip_all, fields(business_id = %self.business_id))]
    pub fn complete<S: CartStorage>(&mut self, store: &mut CartStore<S>) -> Result<Handoff, CheckoutError> {
        self.expect(CheckoutState::LinkOpened, "complete checkout")?;
        let handoff = self.handoff.take().ok_or(CheckoutError::InvalidTransition {
            from: self.state,
            action: "complete checkout",
        })?;
        store.clear_cart(&self.business_id);
        self.state = CheckoutState::CartCleared;
        tracing::info!("Checkout handed off, cart cleared");
        Ok(handoff)
    }
}
