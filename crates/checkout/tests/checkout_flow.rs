//! End-to-end checkout pricing flow: fixture setup, shipping resolution,
//! dual-strategy totals, and teardown with country restoration — the full
//! lifecycle a checkout service drives against the engine.

use std::thread;

use rust_decimal::Decimal;
use uuid::Uuid;

use cartwright_checkout::{
    CalculationStrategy, Cart, CheckoutError, GiftWrapFee, InMemoryCatalog, SessionContext,
    ShippingCostResolver, ShippingQuote, TaxMode, TotalsEngine,
};
use cartwright_core::{CarrierId, ProductId};
use cartwright_geo::{Address, Country, CountrySnapshot, GeographyIndex, State, Zone};
use cartwright_rates::{Carrier, CarrierRateTable, ShippingMethod};

struct PricingFixture {
    geo: GeographyIndex,
    rates: CarrierRateTable,
    catalog: InMemoryCatalog,
    gift: GiftWrapFee,
    carrier_id: CarrierId,
    france_snapshot: CountrySnapshot,
    cart: Cart,
}

fn dec(value: i64, scale: u32) -> Decimal {
    Decimal::new(value, scale)
}

/// Build the reference scenario: zone "Europe" containing France (ISO "FR"),
/// carrier "Colissimo" shipping by quantity with range [1, 10] priced 5.00 in
/// Europe, and a cart delivering to Paris.
fn pricing_fixture() -> PricingFixture {
    cartwright_observability::init();

    let mut geo = GeographyIndex::new();
    let europe = geo.add_zone(Zone::new("Europe"));
    let france = geo
        .add_country(Country::new("France", "FR", europe))
        .unwrap();

    // Setup flows snapshot a country before overriding it, so teardown can
    // put it back exactly as found.
    let france_snapshot = geo.snapshot(france).unwrap();
    geo.set_country_active(france, true).unwrap();

    let idf = geo
        .add_state(State::new("Île-de-France", "IDF", france, europe))
        .unwrap();
    let address = geo
        .add_address(Address::new(france, Some(idf), "75001"))
        .unwrap();

    let mut rates = CarrierRateTable::new();
    let carrier_id = rates.register_carrier(
        Carrier::new("Colissimo", ShippingMethod::ByPrice).with_delay("28 days later"),
    );
    let range = rates
        .find_or_create_range(carrier_id, Decimal::ONE, Decimal::TEN)
        .unwrap();
    rates.set_price(range, europe, dec(500, 2)).unwrap();

    let mut cart = Cart::new(SessionContext {
        language_id: Uuid::now_v7(),
        currency_id: Uuid::now_v7(),
        shop_id: Uuid::now_v7(),
    });
    cart.select_carrier(carrier_id);
    cart.select_delivery_address(address);

    PricingFixture {
        geo,
        rates,
        catalog: InMemoryCatalog::new(),
        gift: GiftWrapFee::untaxed(dec(300, 2)),
        carrier_id,
        france_snapshot,
        cart,
    }
}

#[test]
fn reference_scenario_prices_shipping_and_totals() {
    let mut f = pricing_fixture();
    f.cart.set_line(ProductId::new(), 3, dec(1000, 2), dec(20, 2));

    let resolver = ShippingCostResolver::new(&f.geo, &f.rates, &f.catalog);
    assert_eq!(
        resolver.resolve(&f.cart).unwrap(),
        ShippingQuote::Cost(dec(500, 2))
    );

    let engine = TotalsEngine::new(&f.geo, &f.rates, &f.catalog, &f.gift);
    for strategy in [CalculationStrategy::V1, CalculationStrategy::V2] {
        assert_eq!(
            engine
                .compute_total(&f.cart, strategy, TaxMode::Excluded)
                .unwrap(),
            dec(3500, 2)
        );
        assert_eq!(
            engine
                .compute_total(&f.cart, strategy, TaxMode::Included)
                .unwrap(),
            dec(4100, 2)
        );
    }
}

#[test]
fn uncovered_measure_blocks_checkout_until_carrier_is_unset() {
    let mut f = pricing_fixture();
    let product = ProductId::new();
    f.cart.set_line(product, 11, dec(1000, 2), dec(20, 2));

    let resolver = ShippingCostResolver::new(&f.geo, &f.rates, &f.catalog);
    assert_eq!(resolver.resolve(&f.cart).unwrap(), ShippingQuote::NotServiced);

    let engine = TotalsEngine::new(&f.geo, &f.rates, &f.catalog, &f.gift);
    assert_eq!(
        engine
            .compute_total(&f.cart, CalculationStrategy::V2, TaxMode::Excluded)
            .unwrap_err(),
        CheckoutError::NotServiced
    );

    // Unsetting the carrier takes the zero-shipping override path.
    f.cart.carrier_id = None;
    assert_eq!(
        engine
            .compute_total(&f.cart, CalculationStrategy::V2, TaxMode::Excluded)
            .unwrap(),
        dec(11_000, 2)
    );
}

#[test]
fn teardown_restores_geography_to_its_prior_state() {
    let mut f = pricing_fixture();
    let france = f.france_snapshot.country_id;
    let before = f.france_snapshot;

    // Scenario mutates the country, then teardown restores and removes the
    // fixture-created entities.
    let overseas = f.geo.add_zone(Zone::new("Overseas"));
    f.geo.set_country_zone(france, overseas).unwrap();
    f.geo.set_country_active(france, false).unwrap();

    f.rates.remove_carrier(f.carrier_id);
    f.geo.restore(&before).unwrap();

    let restored = f.geo.country(france).unwrap();
    assert_eq!(restored.zone_id, before.zone_id);
    assert_eq!(restored.active, before.active);
    assert!(f.rates.carrier(f.carrier_id).is_none());
}

#[test]
fn configuration_supports_concurrent_lock_free_reads() {
    let mut f = pricing_fixture();
    f.cart.set_line(ProductId::new(), 3, dec(1000, 2), dec(20, 2));

    // Once loaded, geography and rates are read-only shared state; totals for
    // many carts may be computed concurrently against the same snapshot.
    thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                let engine = TotalsEngine::new(&f.geo, &f.rates, &f.catalog, &f.gift);
                let total = engine
                    .compute_total(&f.cart, CalculationStrategy::V2, TaxMode::Included)
                    .unwrap();
                assert_eq!(total, dec(4100, 2));
            });
        }
    });
}

#[test]
fn session_teardown_empties_the_cart_line_by_line() {
    let mut f = pricing_fixture();
    let first = ProductId::new();
    let second = ProductId::new();
    f.cart.set_line(first, 2, dec(500, 2), dec(20, 2));
    f.cart.set_line(second, 1, dec(250, 2), dec(20, 2));
    assert_eq!(f.cart.distinct_product_count(), 2);
    assert_eq!(f.cart.total_quantity(), 3);

    // The session-end path sets every quantity to zero before dropping the cart.
    f.cart.set_line(first, 0, dec(500, 2), dec(20, 2));
    f.cart.set_line(second, 0, dec(250, 2), dec(20, 2));
    assert!(f.cart.is_empty());

    let engine = TotalsEngine::new(&f.geo, &f.rates, &f.catalog, &f.gift);
    assert_eq!(
        engine
            .compute_total(&f.cart, CalculationStrategy::V1, TaxMode::Included)
            .unwrap(),
        Decimal::ZERO
    );
}
