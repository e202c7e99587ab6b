use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cartwright_core::{AddressId, CarrierId, CartId, Entity, ProductId};

/// Opaque foreign context a cart is created under (language, currency, shop).
///
/// The pricing core never interprets these; they are carried so an embedding
/// checkout service can round-trip its own context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub language_id: Uuid,
    pub currency_id: Uuid,
    pub shop_id: Uuid,
}

/// One cart line: an external product reference with the quantity, unit price
/// and tax rate that apply at cart-evaluation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: u32,
    /// Tax-excluded unit price in the cart's currency.
    pub unit_price: Decimal,
    /// Applicable tax rate as a fraction (0.20 for 20%).
    pub tax_rate: Decimal,
}

/// Shopping cart, owned by one checkout session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub id: CartId,
    pub context: SessionContext,
    pub carrier_id: Option<CarrierId>,
    pub delivery_address_id: Option<AddressId>,
    lines: Vec<CartLine>,
    pub gift: bool,
}

impl Cart {
    pub fn new(context: SessionContext) -> Self {
        Self {
            id: CartId::new(),
            context,
            carrier_id: None,
            delivery_address_id: None,
            lines: Vec::new(),
            gift: false,
        }
    }

    pub fn select_carrier(&mut self, carrier_id: CarrierId) {
        self.carrier_id = Some(carrier_id);
    }

    pub fn select_delivery_address(&mut self, address_id: AddressId) {
        self.delivery_address_id = Some(address_id);
    }

    pub fn select_gift_wrapping(&mut self) {
        self.gift = true;
    }

    /// Set the quantity of a product line, creating the line if absent.
    /// A quantity of zero removes the line (the teardown path).
    pub fn set_line(
        &mut self,
        product_id: ProductId,
        quantity: u32,
        unit_price: Decimal,
        tax_rate: Decimal,
    ) {
        if quantity == 0 {
            self.lines.retain(|l| l.product_id != product_id);
            return;
        }
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
            line.quantity = quantity;
            line.unit_price = unit_price;
            line.tax_rate = tax_rate;
        } else {
            self.lines.push(CartLine {
                product_id,
                quantity,
                unit_price,
                tax_rate,
            });
        }
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct product lines.
    pub fn distinct_product_count(&self) -> usize {
        self.lines.len()
    }

    /// Total unit count across all lines.
    pub fn total_quantity(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Drop every line (session teardown).
    pub fn clear_lines(&mut self) {
        self.lines.clear();
    }
}

impl Entity for Cart {
    type Id = CartId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
