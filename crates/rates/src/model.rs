use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use cartwright_core::{CarrierId, Entity, RangeId};

/// Which scalar a carrier's rate ranges are indexed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingMethod {
    /// Ranges span the cart's total item quantity.
    ByPrice,
    /// Ranges span the cart's total package weight.
    ByWeight,
}

/// Shipping carrier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Carrier {
    pub id: CarrierId,
    pub name: String,
    pub shipping_method: ShippingMethod,
    /// Estimated-delay descriptor, an opaque display string (never parsed).
    pub delay: String,
    pub active: bool,
}

impl Carrier {
    pub fn new(name: impl Into<String>, shipping_method: ShippingMethod) -> Self {
        Self {
            id: CarrierId::new(),
            name: name.into(),
            shipping_method,
            delay: String::new(),
            active: true,
        }
    }

    pub fn with_delay(mut self, delay: impl Into<String>) -> Self {
        self.delay = delay.into();
        self
    }
}

impl Entity for Carrier {
    type Id = CarrierId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Inclusive interval over measure values, scoped to one carrier.
///
/// Bounds are in the unit implied by the carrier's [`ShippingMethod`]
/// (quantity or weight). Ranges for one carrier must not overlap; the table
/// treats overlap as a configuration error and does not merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateRange {
    pub id: RangeId,
    pub carrier_id: CarrierId,
    pub lower: Decimal,
    pub upper: Decimal,
}

impl RateRange {
    /// True when `measure` falls inside the inclusive `[lower, upper]` bounds.
    pub fn contains(&self, measure: Decimal) -> bool {
        self.lower <= measure && measure <= self.upper
    }

    /// True when this range has exactly the given bounds.
    pub fn has_bounds(&self, lower: Decimal, upper: Decimal) -> bool {
        self.lower == lower && self.upper == upper
    }
}

impl Entity for RateRange {
    type Id = RangeId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(lower: i64, upper: i64) -> RateRange {
        RateRange {
            id: RangeId::new(),
            carrier_id: CarrierId::new(),
            lower: Decimal::from(lower),
            upper: Decimal::from(upper),
        }
    }

    #[test]
    fn containment_is_inclusive_at_both_bounds() {
        let r = range(1, 10);
        assert!(r.contains(Decimal::from(1)));
        assert!(r.contains(Decimal::from(10)));
        assert!(r.contains(Decimal::from(5)));
        assert!(!r.contains(Decimal::ZERO));
        assert!(!r.contains(Decimal::from(11)));
    }

    #[test]
    fn degenerate_single_point_range_contains_only_its_bound() {
        let r = range(3, 3);
        assert!(r.contains(Decimal::from(3)));
        assert!(!r.contains(Decimal::new(31, 1)));
    }
}
