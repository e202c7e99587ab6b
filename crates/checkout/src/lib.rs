//! Checkout pricing module.
//!
//! This crate contains the cart model, the shipping-cost resolver and the
//! dual-strategy totals engine, implemented as deterministic domain logic
//! (no IO, no HTTP, no storage). External collaborators — the product catalog
//! and the gift-wrap fee source — are consumed through traits.

pub mod cart;
pub mod providers;
pub mod shipping;
pub mod totals;

pub use cart::{Cart, CartLine, SessionContext};
pub use providers::{GiftWrapFee, GiftWrapProvider, InMemoryCatalog, ProductCatalog};
pub use shipping::{ShippingCostResolver, ShippingQuote};
pub use totals::{CalculationStrategy, CheckoutError, TaxMode, TotalsEngine};
