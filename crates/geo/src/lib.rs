//! Geography domain module.
//!
//! This crate contains the zone/country/state/address hierarchy used purely as
//! a lookup key space for carrier pricing, implemented as deterministic domain
//! logic (no IO, no HTTP, no storage).

pub mod index;
pub mod model;

pub use index::{CountrySnapshot, GeographyIndex};
pub use model::{Address, Contact, Country, State, Zone};
