use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use cartwright_core::{DomainError, Rounding};
use cartwright_geo::GeographyIndex;
use cartwright_rates::CarrierRateTable;

use crate::cart::Cart;
use crate::providers::{GiftWrapProvider, ProductCatalog};
use crate::shipping::{ShippingCostResolver, ShippingQuote};

/// Total-computation algorithm.
///
/// Both strategies are kept simultaneously correct during the migration from
/// V1 to V2 so their outputs can be compared side by side. They are selected
/// by this explicit parameter, never by flags buried in shared state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalculationStrategy {
    /// Legacy: round each line amount to currency precision before summation.
    /// Less numerically stable; retained for backward compatibility and
    /// regression comparison.
    V1,
    /// Current: sum unrounded line amounts, round only the final aggregate.
    V2,
}

impl FromStr for CalculationStrategy {
    type Err = DomainError;

    /// Parse a strategy key. Anything but `v1`/`v2` is a programming error in
    /// the caller, not a runtime condition.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "v1" => Ok(Self::V1),
            "v2" => Ok(Self::V2),
            other => Err(DomainError::validation(format!(
                "unknown calculation strategy: {other}"
            ))),
        }
    }
}

/// Whether line amounts include their tax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxMode {
    Included,
    Excluded,
}

/// Failure of a totals computation.
///
/// Business outcomes a shopper can fix (no address, carrier does not service
/// the zone) are distinguished from configuration errors; none are retried —
/// every computation is deterministic.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("carrier does not service the cart's delivery zone and measure")]
    NotServiced,

    #[error("no delivery address selected")]
    NoAddressSelected,

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Computes cart totals under a selected calculation strategy and tax mode.
///
/// Shipping is added as a fixed add-on already expressed in the requested tax
/// mode: its own tax handling belongs to the external collaborator that priced
/// the rate table, and this engine never re-adjusts it.
pub struct TotalsEngine<'a> {
    geo: &'a GeographyIndex,
    rates: &'a CarrierRateTable,
    catalog: &'a dyn ProductCatalog,
    gift: &'a dyn GiftWrapProvider,
    rounding: Rounding,
}

impl<'a> TotalsEngine<'a> {
    pub fn new(
        geo: &'a GeographyIndex,
        rates: &'a CarrierRateTable,
        catalog: &'a dyn ProductCatalog,
        gift: &'a dyn GiftWrapProvider,
    ) -> Self {
        Self {
            geo,
            rates,
            catalog,
            gift,
            rounding: Rounding::default(),
        }
    }

    /// Use a non-default currency rounding context.
    pub fn with_rounding(mut self, rounding: Rounding) -> Self {
        self.rounding = rounding;
        self
    }

    pub fn rounding(&self) -> Rounding {
        self.rounding
    }

    /// Compute the cart total.
    ///
    /// An empty cart totals `0` under every strategy and tax mode. A cart
    /// without a selected carrier contributes zero shipping (the unset-carrier
    /// override); a selected carrier that cannot service the cart propagates
    /// [`CheckoutError::NotServiced`] rather than guessing a price.
    pub fn compute_total(
        &self,
        cart: &Cart,
        strategy: CalculationStrategy,
        tax_mode: TaxMode,
    ) -> Result<Decimal, CheckoutError> {
        if cart.is_empty() {
            return Ok(Decimal::ZERO);
        }

        let subtotal = self.line_subtotal(cart, strategy, tax_mode);
        let shipping = self.shipping_cost(cart)?;
        let gift = self.gift_fee(cart, tax_mode);

        let total = self.rounding.round(subtotal + shipping + gift);
        debug!(
            cart = %cart.id,
            ?strategy,
            ?tax_mode,
            %subtotal,
            %shipping,
            %gift,
            %total,
            "computed cart total"
        );
        Ok(total)
    }

    /// Line-item subtotal under the given strategy.
    ///
    /// `excl = unit_price × quantity`, `incl = excl × (1 + tax_rate)`.
    /// V1 rounds each line; V2 accumulates unrounded (the aggregate is rounded
    /// once, in [`compute_total`](Self::compute_total)).
    fn line_subtotal(
        &self,
        cart: &Cart,
        strategy: CalculationStrategy,
        tax_mode: TaxMode,
    ) -> Decimal {
        let mut sum = Decimal::ZERO;
        for line in cart.lines() {
            let excl = line.unit_price * Decimal::from(line.quantity);
            let amount = match tax_mode {
                TaxMode::Excluded => excl,
                TaxMode::Included => excl * (Decimal::ONE + line.tax_rate),
            };
            sum += match strategy {
                CalculationStrategy::V1 => self.rounding.round(amount),
                CalculationStrategy::V2 => amount,
            };
        }
        sum
    }

    fn shipping_cost(&self, cart: &Cart) -> Result<Decimal, CheckoutError> {
        if cart.carrier_id.is_none() {
            // Unset carrier: shipping contributes zero rather than failing.
            return Ok(Decimal::ZERO);
        }
        let resolver = ShippingCostResolver::new(self.geo, self.rates, self.catalog);
        match resolver.resolve(cart)? {
            ShippingQuote::Cost(price) => Ok(price),
            ShippingQuote::NotServiced => Err(CheckoutError::NotServiced),
            ShippingQuote::NoAddressSelected => Err(CheckoutError::NoAddressSelected),
            // Carrier presence was checked above; the resolver cannot report
            // it missing, but the override semantics are the same either way.
            ShippingQuote::NoCarrierSelected => Ok(Decimal::ZERO),
        }
    }

    fn gift_fee(&self, cart: &Cart, tax_mode: TaxMode) -> Decimal {
        if !cart.gift {
            return Decimal::ZERO;
        }
        let fee = self.gift.gift_wrap_fee();
        match (tax_mode, fee.tax_rate) {
            (TaxMode::Included, Some(rate)) => fee.amount * (Decimal::ONE + rate),
            _ => fee.amount,
        }
    }
}
