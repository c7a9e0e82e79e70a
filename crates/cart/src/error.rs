//! Unified error type for cart front-ends.
//!
//! The cart engine itself only fails at its edges (bad input, bad config,
//! illegal checkout steps). Front-ends collect those into [`CartError`].

use thiserror::Error;

use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::models::LineError;
use crate::persistence::StorageError;

/// Application-level error type for cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// An add request was rejected.
    #[error("Invalid line: {0}")]
    Line(#[from] LineError),

    /// Checkout step failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Storage backend failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;

#[cfg(test)]
mod tests {
    use markethub_core::BusinessId;

    use super::*;

    #[test]
    fn test_cart_error_display() {
        let err = CartError::NotFound("product 1-1".to_string());
        assert_eq!(err.to_string(), "Not found: product 1-1");

        let err = CartError::from(LineError::ZeroQuantity);
        assert_eq!(err.to_string(), "Invalid line: quantity must be at least 1");

        let err = CartError::from(CheckoutError::EmptyCart(BusinessId::new("7")));
        assert_eq!(err.to_string(), "Checkout error: No cart for business 7");
    }
}
