use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use cartwright_core::{DomainError, DomainResult};
use cartwright_geo::GeographyIndex;
use cartwright_rates::{CarrierRateTable, RateQuote, ShippingMethod};

use crate::cart::Cart;
use crate::providers::ProductCatalog;

/// Outcome of resolving a cart's shipping cost.
///
/// Every variant other than `Cost` is an ordinary business outcome the caller
/// must branch on — a checkout flow presents them to the shopper; they are
/// never raised as errors. Configuration errors (dangling references) surface
/// as [`DomainError`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShippingQuote {
    Cost(Decimal),
    NotServiced,
    NoCarrierSelected,
    NoAddressSelected,
}

/// Resolves a cart's shipping cost from the geography index and the carrier
/// rate table. Pure function of current state; no side effects.
pub struct ShippingCostResolver<'a> {
    geo: &'a GeographyIndex,
    rates: &'a CarrierRateTable,
    catalog: &'a dyn ProductCatalog,
}

impl<'a> ShippingCostResolver<'a> {
    pub fn new(
        geo: &'a GeographyIndex,
        rates: &'a CarrierRateTable,
        catalog: &'a dyn ProductCatalog,
    ) -> Self {
        Self {
            geo,
            rates,
            catalog,
        }
    }

    /// Resolve the shipping cost for `cart`.
    ///
    /// Computes the measure (total quantity for `ByPrice` carriers, total
    /// weight for `ByWeight`), resolves the delivery zone, then delegates to
    /// the rate table's range lookup.
    pub fn resolve(&self, cart: &Cart) -> DomainResult<ShippingQuote> {
        let Some(carrier_id) = cart.carrier_id else {
            return Ok(ShippingQuote::NoCarrierSelected);
        };
        let Some(address_id) = cart.delivery_address_id else {
            return Ok(ShippingQuote::NoAddressSelected);
        };

        let carrier = self
            .rates
            .carrier(carrier_id)
            .ok_or_else(|| DomainError::not_found(format!("carrier {carrier_id}")))?;
        let measure = self.measure(cart, carrier.shipping_method)?;

        let address = self
            .geo
            .address(address_id)
            .ok_or_else(|| DomainError::not_found(format!("address {address_id}")))?;
        let zone_id = self.geo.resolve_zone(address)?;

        let quote = match self.rates.lookup_price(carrier_id, zone_id, measure)? {
            RateQuote::Priced(price) => ShippingQuote::Cost(price),
            RateQuote::NotServiced => ShippingQuote::NotServiced,
        };
        debug!(
            cart = %cart.id,
            carrier = %carrier.name,
            %zone_id,
            %measure,
            ?quote,
            "resolved shipping cost"
        );
        Ok(quote)
    }

    fn measure(&self, cart: &Cart, method: ShippingMethod) -> DomainResult<Decimal> {
        match method {
            ShippingMethod::ByPrice => Ok(Decimal::from(cart.total_quantity())),
            ShippingMethod::ByWeight => {
                let mut total = Decimal::ZERO;
                for line in cart.lines() {
                    let unit_weight = self.catalog.unit_weight(line.product_id)?;
                    total += unit_weight * Decimal::from(line.quantity);
                }
                Ok(total)
            }
        }
    }
}
