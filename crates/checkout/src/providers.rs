//! External collaborator seams.
//!
//! The pricing core consumes, and must not reimplement, the product catalog
//! and the gift-wrap fee source. Embedding services implement these traits;
//! in-memory implementations are provided for tests and small deployments.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use cartwright_core::{DomainError, DomainResult, ProductId};

/// Product/tax-rule provider: per-product data the cart lines do not carry.
///
/// Unit prices and tax rates are captured on the cart line at evaluation time;
/// unit weight is only needed for `ByWeight` carriers and stays behind this
/// seam.
pub trait ProductCatalog {
    /// Unit weight of a product, in the carrier rate table's weight unit.
    fn unit_weight(&self, product_id: ProductId) -> DomainResult<Decimal>;
}

/// Gift-wrapping fee and its tax applicability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftWrapFee {
    /// Tax-excluded fee amount in the cart's currency.
    pub amount: Decimal,
    /// Tax rate applied to the fee in tax-included totals; `None` when the
    /// fee is untaxed.
    pub tax_rate: Option<Decimal>,
}

/// Gift-wrap fee provider, consulted only when `cart.gift` is set.
pub trait GiftWrapProvider {
    fn gift_wrap_fee(&self) -> GiftWrapFee;
}

impl GiftWrapProvider for GiftWrapFee {
    fn gift_wrap_fee(&self) -> GiftWrapFee {
        *self
    }
}

impl GiftWrapFee {
    pub fn untaxed(amount: Decimal) -> Self {
        Self {
            amount,
            tax_rate: None,
        }
    }

    pub fn taxed(amount: Decimal, tax_rate: Decimal) -> Self {
        Self {
            amount,
            tax_rate: Some(tax_rate),
        }
    }
}

/// In-memory product catalog keyed by product id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InMemoryCatalog {
    weights: HashMap<ProductId, Decimal>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unit_weight(&mut self, product_id: ProductId, weight: Decimal) {
        self.weights.insert(product_id, weight);
    }
}

impl ProductCatalog for InMemoryCatalog {
    fn unit_weight(&self, product_id: ProductId) -> DomainResult<Decimal> {
        self.weights
            .get(&product_id)
            .copied()
            .ok_or_else(|| DomainError::not_found(format!("product {product_id} in catalog")))
    }
}
