//! Carrier rate-table domain module.
//!
//! This crate contains carriers, their measure ranges and per-zone prices,
//! implemented as deterministic domain logic (no IO, no HTTP, no storage).

pub mod model;
pub mod table;

pub use model::{Carrier, RateRange, ShippingMethod};
pub use table::{CarrierRateTable, RateQuote};
