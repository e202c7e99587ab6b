//! Currency rounding context.
//!
//! Monetary amounts are `rust_decimal::Decimal` throughout. Rounding is never
//! implicit: the only places an amount is rounded are the ones a calculation
//! strategy explicitly calls out, and they all go through [`Rounding`] so the
//! precision and midpoint behaviour stay configurable per currency.

use rust_decimal::{Decimal, RoundingStrategy};

/// Per-currency rounding context: decimal precision plus midpoint strategy.
///
/// The default matches the engine's observed behaviour: two decimal places,
/// round half away from zero.
#[derive(Debug, Clone, Copy)]
pub struct Rounding {
    scale: u32,
    strategy: RoundingStrategy,
}

impl Rounding {
    /// Rounding context for a currency with the given number of decimal places.
    pub fn currency(scale: u32) -> Self {
        Self {
            scale,
            strategy: RoundingStrategy::MidpointAwayFromZero,
        }
    }

    /// Override the midpoint strategy (some currencies legally require
    /// banker's rounding).
    pub fn with_strategy(mut self, strategy: RoundingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Round an amount to this currency's precision.
    pub fn round(&self, amount: Decimal) -> Decimal {
        amount.round_dp_with_strategy(self.scale, self.strategy)
    }

    /// Smallest representable amount at this precision (one "currency unit").
    pub fn unit(&self) -> Decimal {
        Decimal::new(1, self.scale)
    }
}

impl Default for Rounding {
    fn default() -> Self {
        Self::currency(2)
    }
}
