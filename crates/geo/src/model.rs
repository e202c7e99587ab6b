use serde::{Deserialize, Serialize};

use cartwright_core::{AddressId, CountryId, Entity, StateId, ZoneId};

/// Top-level geographic grouping, used only as a pricing key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub id: ZoneId,
    pub name: String,
}

impl Zone {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ZoneId::new(),
            name: name.into(),
        }
    }
}

impl Entity for Zone {
    type Id = ZoneId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Country: belongs to exactly one zone.
///
/// `zone_id` and `active` are mutable in place; callers that temporarily
/// override them capture a [`CountrySnapshot`](crate::CountrySnapshot) first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub id: CountryId,
    pub name: String,
    /// ISO 3166-1 alpha-2 code, unique within the index.
    pub iso_code: String,
    pub zone_id: ZoneId,
    pub active: bool,
}

impl Country {
    pub fn new(name: impl Into<String>, iso_code: impl Into<String>, zone_id: ZoneId) -> Self {
        Self {
            id: CountryId::new(),
            name: name.into(),
            iso_code: iso_code.into(),
            zone_id,
            active: true,
        }
    }
}

impl Entity for Country {
    type Id = CountryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// State: belongs to exactly one country, and (redundantly, for lookup speed)
/// one zone. The zone must equal the country's zone at creation time; the
/// invariant is not enforced retroactively when the country later moves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    pub id: StateId,
    pub name: String,
    pub iso_code: String,
    pub country_id: CountryId,
    pub zone_id: ZoneId,
}

impl State {
    pub fn new(
        name: impl Into<String>,
        iso_code: impl Into<String>,
        country_id: CountryId,
        zone_id: ZoneId,
    ) -> Self {
        Self {
            id: StateId::new(),
            name: name.into(),
            iso_code: iso_code.into(),
            country_id,
            zone_id,
        }
    }
}

impl Entity for State {
    type Id = StateId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Contact fields on an address. Irrelevant to pricing; carried for
/// completeness only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub first_name: String,
    pub last_name: String,
    pub street: String,
    pub city: String,
    pub alias: String,
}

/// Delivery address: one country, optionally one state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: AddressId,
    pub country_id: CountryId,
    pub state_id: Option<StateId>,
    pub postcode: String,
    pub contact: Contact,
}

impl Address {
    pub fn new(country_id: CountryId, state_id: Option<StateId>, postcode: impl Into<String>) -> Self {
        Self {
            id: AddressId::new(),
            country_id,
            state_id,
            postcode: postcode.into(),
            contact: Contact::default(),
        }
    }

    pub fn with_contact(mut self, contact: Contact) -> Self {
        self.contact = contact;
        self
    }
}

impl Entity for Address {
    type Id = AddressId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
