use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use cartwright_core::{AddressId, CountryId, DomainError, DomainResult, StateId, ZoneId};

use crate::model::{Address, Country, State, Zone};

/// Immutable capture of the mutable fields of a [`Country`].
///
/// Setup flows that temporarily re-zone or activate a country take a snapshot
/// first; teardown restores it with [`GeographyIndex::restore`], which is a
/// pure assignment rather than a re-derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountrySnapshot {
    pub country_id: CountryId,
    pub zone_id: ZoneId,
    pub active: bool,
}

/// In-memory geography hierarchy: zones, countries, states, addresses.
///
/// Answers "what zone does this address belong to". No algorithmic complexity
/// beyond identity lookups; correctness hinges entirely on the referential
/// integrity enforced at insertion time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeographyIndex {
    zones: HashMap<ZoneId, Zone>,
    countries: HashMap<CountryId, Country>,
    states: HashMap<StateId, State>,
    addresses: HashMap<AddressId, Address>,
    /// ISO code -> country, kept in lockstep with `countries`.
    iso_index: HashMap<String, CountryId>,
}

impl GeographyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_zone(&mut self, zone: Zone) -> ZoneId {
        let id = zone.id;
        self.zones.insert(id, zone);
        id
    }

    /// Register a country. The zone reference must resolve and the ISO code
    /// must be unique within the index.
    pub fn add_country(&mut self, country: Country) -> DomainResult<CountryId> {
        if !self.zones.contains_key(&country.zone_id) {
            return Err(DomainError::not_found(format!(
                "zone {} referenced by country {}",
                country.zone_id, country.iso_code
            )));
        }
        if self.iso_index.contains_key(&country.iso_code) {
            return Err(DomainError::conflict(format!(
                "country with iso code {} already registered",
                country.iso_code
            )));
        }
        let id = country.id;
        self.iso_index.insert(country.iso_code.clone(), id);
        self.countries.insert(id, country);
        Ok(id)
    }

    /// Register a state. Its country and zone must resolve, and its zone must
    /// equal its country's zone at creation time (not enforced retroactively).
    pub fn add_state(&mut self, state: State) -> DomainResult<StateId> {
        let country = self.countries.get(&state.country_id).ok_or_else(|| {
            DomainError::not_found(format!("country {} referenced by state", state.country_id))
        })?;
        if !self.zones.contains_key(&state.zone_id) {
            return Err(DomainError::not_found(format!(
                "zone {} referenced by state {}",
                state.zone_id, state.iso_code
            )));
        }
        if state.zone_id != country.zone_id {
            return Err(DomainError::invariant(format!(
                "state {} zone does not match its country's zone",
                state.iso_code
            )));
        }
        let id = state.id;
        self.states.insert(id, state);
        Ok(id)
    }

    /// Register an address. Its country, and state if set, must resolve, and
    /// the state must belong to the country.
    pub fn add_address(&mut self, address: Address) -> DomainResult<AddressId> {
        if !self.countries.contains_key(&address.country_id) {
            return Err(DomainError::not_found(format!(
                "country {} referenced by address",
                address.country_id
            )));
        }
        if let Some(state_id) = address.state_id {
            let state = self.states.get(&state_id).ok_or_else(|| {
                DomainError::not_found(format!("state {state_id} referenced by address"))
            })?;
            if state.country_id != address.country_id {
                return Err(DomainError::invariant(
                    "address state does not belong to address country",
                ));
            }
        }
        let id = address.id;
        self.addresses.insert(id, address);
        Ok(id)
    }

    pub fn zone(&self, id: ZoneId) -> Option<&Zone> {
        self.zones.get(&id)
    }

    pub fn country(&self, id: CountryId) -> Option<&Country> {
        self.countries.get(&id)
    }

    pub fn country_by_iso(&self, iso_code: &str) -> Option<&Country> {
        self.iso_index
            .get(iso_code)
            .and_then(|id| self.countries.get(id))
    }

    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.get(&id)
    }

    pub fn address(&self, id: AddressId) -> Option<&Address> {
        self.addresses.get(&id)
    }

    /// Resolve the pricing zone of an address: the state's zone when a state
    /// is set, else the country's zone.
    pub fn resolve_zone(&self, address: &Address) -> DomainResult<ZoneId> {
        if let Some(state_id) = address.state_id {
            let state = self.states.get(&state_id).ok_or_else(|| {
                DomainError::not_found(format!("state {state_id} referenced by address"))
            })?;
            return Ok(state.zone_id);
        }
        let country = self.countries.get(&address.country_id).ok_or_else(|| {
            DomainError::not_found(format!(
                "country {} referenced by address",
                address.country_id
            ))
        })?;
        Ok(country.zone_id)
    }

    /// Convenience: resolve the zone of an address held by this index.
    pub fn resolve_zone_by_id(&self, address_id: AddressId) -> DomainResult<ZoneId> {
        let address = self
            .addresses
            .get(&address_id)
            .ok_or_else(|| DomainError::not_found(format!("address {address_id}")))?;
        self.resolve_zone(address)
    }

    /// Reassign a country to another zone, in place. Callers needing to undo
    /// this later capture a [`CountrySnapshot`] first.
    pub fn set_country_zone(&mut self, country_id: CountryId, zone_id: ZoneId) -> DomainResult<()> {
        if !self.zones.contains_key(&zone_id) {
            return Err(DomainError::not_found(format!("zone {zone_id}")));
        }
        let country = self
            .countries
            .get_mut(&country_id)
            .ok_or_else(|| DomainError::not_found(format!("country {country_id}")))?;
        country.zone_id = zone_id;
        Ok(())
    }

    pub fn set_country_active(&mut self, country_id: CountryId, active: bool) -> DomainResult<()> {
        let country = self
            .countries
            .get_mut(&country_id)
            .ok_or_else(|| DomainError::not_found(format!("country {country_id}")))?;
        country.active = active;
        Ok(())
    }

    /// Capture the current zone/active flags of a country for later restore.
    pub fn snapshot(&self, country_id: CountryId) -> DomainResult<CountrySnapshot> {
        let country = self
            .countries
            .get(&country_id)
            .ok_or_else(|| DomainError::not_found(format!("country {country_id}")))?;
        Ok(CountrySnapshot {
            country_id,
            zone_id: country.zone_id,
            active: country.active,
        })
    }

    /// Restore a country to a previously captured snapshot.
    pub fn restore(&mut self, snapshot: &CountrySnapshot) -> DomainResult<()> {
        let country = self
            .countries
            .get_mut(&snapshot.country_id)
            .ok_or_else(|| DomainError::not_found(format!("country {}", snapshot.country_id)))?;
        country.zone_id = snapshot.zone_id;
        country.active = snapshot.active;
        Ok(())
    }

    // Teardown operations for setup/configuration flows. Countries are not
    // removed; they are restored from their snapshot instead.

    pub fn remove_zone(&mut self, id: ZoneId) -> Option<Zone> {
        self.zones.remove(&id)
    }

    pub fn remove_state(&mut self, id: StateId) -> Option<State> {
        self.states.remove(&id)
    }

    pub fn remove_address(&mut self, id: AddressId) -> Option<Address> {
        self.addresses.remove(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_with_country() -> (GeographyIndex, ZoneId, CountryId) {
        let mut index = GeographyIndex::new();
        let zone_id = index.add_zone(Zone::new("Europe"));
        let country_id = index
            .add_country(Country::new("France", "FR", zone_id))
            .unwrap();
        (index, zone_id, country_id)
    }

    #[test]
    fn add_country_rejects_unknown_zone() {
        let mut index = GeographyIndex::new();
        let err = index
            .add_country(Country::new("France", "FR", ZoneId::new()))
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn add_country_rejects_duplicate_iso_code() {
        let (mut index, zone_id, _) = index_with_country();
        let err = index
            .add_country(Country::new("France bis", "FR", zone_id))
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn country_is_found_by_iso_code() {
        let (index, _, country_id) = index_with_country();
        let found = index.country_by_iso("FR").unwrap();
        assert_eq!(found.id, country_id);
        assert!(index.country_by_iso("DE").is_none());
    }

    #[test]
    fn add_state_rejects_zone_mismatch_with_country() {
        let (mut index, _, country_id) = index_with_country();
        let other_zone = index.add_zone(Zone::new("Asia"));
        let err = index
            .add_state(State::new("Nowhere", "NW", country_id, other_zone))
            .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn resolve_zone_prefers_state_zone_over_country_zone() {
        let (mut index, zone_id, country_id) = index_with_country();
        let state_id = index
            .add_state(State::new("Île-de-France", "IDF", country_id, zone_id))
            .unwrap();
        let address_id = index
            .add_address(Address::new(country_id, Some(state_id), "75001"))
            .unwrap();

        // The state's zone wins even after the country moves elsewhere.
        let other_zone = index.add_zone(Zone::new("Overseas"));
        index.set_country_zone(country_id, other_zone).unwrap();

        assert_eq!(index.resolve_zone_by_id(address_id).unwrap(), zone_id);
    }

    #[test]
    fn resolve_zone_falls_back_to_country_zone_without_state() {
        let (mut index, zone_id, country_id) = index_with_country();
        let address_id = index
            .add_address(Address::new(country_id, None, "75001"))
            .unwrap();
        assert_eq!(index.resolve_zone_by_id(address_id).unwrap(), zone_id);
    }

    #[test]
    fn resolve_zone_fails_for_unknown_address() {
        let (index, _, _) = index_with_country();
        let err = index.resolve_zone_by_id(AddressId::new()).unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn address_state_must_belong_to_address_country() {
        let (mut index, zone_id, country_id) = index_with_country();
        let other_country = index
            .add_country(Country::new("Germany", "DE", zone_id))
            .unwrap();
        let state_id = index
            .add_state(State::new("Bayern", "BY", other_country, zone_id))
            .unwrap();
        let err = index
            .add_address(Address::new(country_id, Some(state_id), "80331"))
            .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn snapshot_then_mutate_then_restore_round_trips() {
        let (mut index, _, country_id) = index_with_country();
        let before = index.country(country_id).unwrap().clone();
        let snapshot = index.snapshot(country_id).unwrap();

        let other_zone = index.add_zone(Zone::new("Asia"));
        index.set_country_zone(country_id, other_zone).unwrap();
        index.set_country_active(country_id, false).unwrap();
        assert_ne!(index.country(country_id).unwrap(), &before);

        index.restore(&snapshot).unwrap();
        assert_eq!(index.country(country_id).unwrap(), &before);
    }

    #[test]
    fn set_country_zone_rejects_unknown_zone() {
        let (mut index, _, country_id) = index_with_country();
        let err = index.set_country_zone(country_id, ZoneId::new()).unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn teardown_removals_return_the_removed_entities() {
        let (mut index, zone_id, country_id) = index_with_country();
        let state_id = index
            .add_state(State::new("Île-de-France", "IDF", country_id, zone_id))
            .unwrap();
        let address_id = index
            .add_address(Address::new(country_id, Some(state_id), "75001"))
            .unwrap();

        assert!(index.remove_address(address_id).is_some());
        assert!(index.remove_state(state_id).is_some());
        assert!(index.remove_zone(zone_id).is_some());
        assert!(index.remove_zone(zone_id).is_none());
    }
}
