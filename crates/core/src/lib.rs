//! `cartwright-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! typed identifiers, the domain error model, and currency rounding.

pub mod entity;
pub mod error;
pub mod id;
pub mod money;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{AddressId, CarrierId, CartId, CountryId, ProductId, RangeId, StateId, ZoneId};
pub use money::Rounding;
