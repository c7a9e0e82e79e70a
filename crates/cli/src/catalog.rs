//! Product catalog files.
//!
//! The CLI has no product service to query, so sellers and their products are
//! read from a YAML file:
//!
//! ```yaml
//! businesses:
//!   - id: "1"
//!     name: Premium Textiles Co.
//!     whatsapp: "+13125551234"
//!     products:
//!       - id: "1-1"
//!         name: Organic Cotton Fabric
//!         price: "45.99"
//!         image: /images/cotton.jpg
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use markethub_cart::BusinessMeta;
use markethub_core::{BusinessId, PhoneNumber, Price, ProductId};

/// Catalog loading and lookup errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("{} catalog validation errors: {}", .0.len(), .0.join("; "))]
    Invalid(Vec<String>),

    #[error("Unknown business: {0}")]
    UnknownBusiness(BusinessId),

    #[error("Unknown product {product} for business {business}")]
    UnknownProduct {
        business: BusinessId,
        product: ProductId,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub businesses: Vec<CatalogBusiness>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogBusiness {
    pub id: BusinessId,
    pub name: String,
    pub whatsapp: String,
    #[serde(default)]
    pub products: Vec<CatalogProduct>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogProduct {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub image: Option<String>,
}

impl CatalogBusiness {
    /// Seller metadata as stored on a cart.
    #[must_use]
    pub fn meta(&self) -> BusinessMeta {
        BusinessMeta::new(&self.name, &self.whatsapp)
    }

    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownProduct`] if the seller does not list it.
    pub fn product(&self, product_id: &ProductId) -> Result<&CatalogProduct, CatalogError> {
        self.products
            .iter()
            .find(|p| &p.id == product_id)
            .ok_or_else(|| CatalogError::UnknownProduct {
                business: self.id.clone(),
                product: product_id.clone(),
            })
    }
}

impl Catalog {
    /// Read and validate a catalog file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid YAML, or
    /// fails validation.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::parse(&content)?;
        info!(
            path = %path.display(),
            businesses = catalog.businesses.len(),
            "Loaded catalog"
        );
        Ok(catalog)
    }

    /// Parse and validate catalog YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or fails validation.
    pub fn parse(content: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_yaml::from_str(content)?;
        let errors = catalog.validate();
        if errors.is_empty() {
            Ok(catalog)
        } else {
            Err(CatalogError::Invalid(errors))
        }
    }

    /// Every problem with the catalog, empty if none.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut seen_businesses = HashSet::new();

        for business in &self.businesses {
            if !seen_businesses.insert(&business.id) {
                errors.push(format!("duplicate business id '{}'", business.id));
            }
            if business.name.trim().is_empty() {
                errors.push(format!("business '{}' has no name", business.id));
            }
            if let Err(e) = PhoneNumber::parse(&business.whatsapp) {
                errors.push(format!(
                    "business '{}' has an invalid whatsapp number '{}': {e}",
                    business.id, business.whatsapp
                ));
            }

            let mut seen_products = HashSet::new();
            for product in &business.products {
                if !seen_products.insert(&product.id) {
                    errors.push(format!(
                        "duplicate product id '{}' in business '{}'",
                        product.id, business.id
                    ));
                }
                if product.price.is_negative() {
                    errors.push(format!("product '{}' has a negative price", product.id));
                }
            }
        }

        errors
    }

    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownBusiness`] if no seller has this id.
    pub fn business(&self, business_id: &BusinessId) -> Result<&CatalogBusiness, CatalogError> {
        self.businesses
            .iter()
            .find(|b| &b.id == business_id)
            .ok_or_else(|| CatalogError::UnknownBusiness(business_id.clone()))
    }
}
