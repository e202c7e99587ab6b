use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use cartwright_core::{CarrierId, DomainError, DomainResult, RangeId, ZoneId};

use crate::model::{Carrier, RateRange};

/// Outcome of a rate lookup.
///
/// `NotServiced` is a normal, non-exceptional outcome: the carrier has no
/// price for the zone/measure combination. Callers must branch on it; it is
/// never collapsed into a silent default price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateQuote {
    Priced(Decimal),
    NotServiced,
}

/// Per-carrier rate table: measure ranges, each carrying a price per zone.
///
/// Ranges are scanned linearly in insertion order, which is acceptable at the
/// small per-carrier range counts this table holds. Should a carrier
/// (invalidly) hold overlapping ranges, lookup picks the first inserted match;
/// that tie-break is deterministic but callers must treat overlap as a
/// configuration error, not behaviour to rely on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarrierRateTable {
    carriers: HashMap<CarrierId, Carrier>,
    /// Insertion-ordered ranges per carrier.
    ranges: HashMap<CarrierId, Vec<RateRange>>,
    /// Range -> owning carrier, kept in lockstep with `ranges`.
    range_owners: HashMap<RangeId, CarrierId>,
    /// Exactly one price per (range, zone); re-adding overwrites.
    prices: HashMap<(RangeId, ZoneId), Decimal>,
}

impl CarrierRateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_carrier(&mut self, carrier: Carrier) -> CarrierId {
        let id = carrier.id;
        self.carriers.insert(id, carrier);
        id
    }

    pub fn carrier(&self, id: CarrierId) -> Option<&Carrier> {
        self.carriers.get(&id)
    }

    pub fn ranges(&self, carrier_id: CarrierId) -> &[RateRange] {
        self.ranges
            .get(&carrier_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Return the existing range for `carrier_id` whose bounds exactly match,
    /// else create one. Exact-match only: ranges with different bounds but
    /// overlapping semantics are distinct.
    pub fn find_or_create_range(
        &mut self,
        carrier_id: CarrierId,
        lower: Decimal,
        upper: Decimal,
    ) -> DomainResult<RangeId> {
        if !self.carriers.contains_key(&carrier_id) {
            return Err(DomainError::not_found(format!("carrier {carrier_id}")));
        }
        if lower.is_sign_negative() || upper.is_sign_negative() {
            return Err(DomainError::validation("range bounds must be non-negative"));
        }
        if lower > upper {
            return Err(DomainError::validation(format!(
                "range lower bound {lower} exceeds upper bound {upper}"
            )));
        }

        let ranges = self.ranges.entry(carrier_id).or_default();
        if let Some(existing) = ranges.iter().find(|r| r.has_bounds(lower, upper)) {
            return Ok(existing.id);
        }

        let range = RateRange {
            id: RangeId::new(),
            carrier_id,
            lower,
            upper,
        };
        let id = range.id;
        ranges.push(range);
        self.range_owners.insert(id, carrier_id);
        Ok(id)
    }

    /// Upsert the price for a (range, zone) pair. Re-adding the same pair
    /// overwrites, never duplicates.
    pub fn set_price(
        &mut self,
        range_id: RangeId,
        zone_id: ZoneId,
        price: Decimal,
    ) -> DomainResult<()> {
        if !self.range_owners.contains_key(&range_id) {
            return Err(DomainError::not_found(format!("rate range {range_id}")));
        }
        if price.is_sign_negative() {
            return Err(DomainError::validation("rate price must be non-negative"));
        }
        self.prices.insert((range_id, zone_id), price);
        Ok(())
    }

    pub fn price(&self, range_id: RangeId, zone_id: ZoneId) -> Option<Decimal> {
        self.prices.get(&(range_id, zone_id)).copied()
    }

    /// Find the carrier's range containing `measure`, then the price entry for
    /// that range in `zone_id`.
    ///
    /// An unknown carrier is a configuration error; a carrier that simply has
    /// no covering range or no price for the zone yields
    /// [`RateQuote::NotServiced`].
    pub fn lookup_price(
        &self,
        carrier_id: CarrierId,
        zone_id: ZoneId,
        measure: Decimal,
    ) -> DomainResult<RateQuote> {
        if !self.carriers.contains_key(&carrier_id) {
            return Err(DomainError::not_found(format!("carrier {carrier_id}")));
        }
        let Some(range) = self
            .ranges(carrier_id)
            .iter()
            .find(|r| r.contains(measure))
        else {
            return Ok(RateQuote::NotServiced);
        };
        Ok(match self.price(range.id, zone_id) {
            Some(price) => RateQuote::Priced(price),
            None => RateQuote::NotServiced,
        })
    }

    /// Remove a range and all its per-zone prices (teardown flows).
    pub fn remove_range(&mut self, range_id: RangeId) -> Option<RateRange> {
        let carrier_id = self.range_owners.remove(&range_id)?;
        self.prices.retain(|(rid, _), _| *rid != range_id);
        let ranges = self.ranges.get_mut(&carrier_id)?;
        let position = ranges.iter().position(|r| r.id == range_id)?;
        Some(ranges.remove(position))
    }

    /// Remove a carrier together with its ranges and prices (teardown flows).
    pub fn remove_carrier(&mut self, carrier_id: CarrierId) -> Option<Carrier> {
        let carrier = self.carriers.remove(&carrier_id)?;
        if let Some(ranges) = self.ranges.remove(&carrier_id) {
            for range in ranges {
                self.range_owners.remove(&range.id);
                self.prices.retain(|(rid, _), _| *rid != range.id);
            }
        }
        Some(carrier)
    }
}
