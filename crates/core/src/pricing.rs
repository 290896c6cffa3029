//! Pricing
//!
//! Derives the figures shown on the menu, checkout and navbar from a [`Cart`].
//! Nothing here is stored: a [`PriceBreakdown`] is recomputed on every read so
//! it can never drift from the cart it came from.

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{
    Money,
    iso::{self, Currency},
};

use crate::cart::{Cart, CartLine};

/// Tax, delivery and currency rules applied to a cart.
#[derive(Debug, Clone, Copy)]
pub struct PricingPolicy {
    currency: &'static Currency,
    tax_rate: Percentage,
    free_delivery_above: Decimal,
    delivery_fee: Decimal,
}

impl Default for PricingPolicy {
    /// 5% tax, delivery free strictly above 200 and 30 otherwise, in rupees.
    fn default() -> Self {
        Self {
            currency: iso::INR,
            tax_rate: Percentage::from(Decimal::new(5, 2)),
            free_delivery_above: Decimal::from(200),
            delivery_fee: Decimal::from(30),
        }
    }
}

impl PricingPolicy {
    /// Create a policy with custom rules.
    pub fn new(
        currency: &'static Currency,
        tax_rate: Percentage,
        free_delivery_above: Decimal,
        delivery_fee: Decimal,
    ) -> Self {
        Self {
            currency,
            tax_rate,
            free_delivery_above,
            delivery_fee,
        }
    }

    /// Currency every derived amount is expressed in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Tax on a subtotal, rounded half-up to whole currency units.
    pub fn tax(&self, subtotal: Decimal) -> Decimal {
        (self.tax_rate * subtotal).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Delivery fee, waived only when the subtotal is strictly above the threshold.
    ///
    /// An empty cart is not special-cased and pays the flat fee.
    pub fn delivery_fee(&self, subtotal: Decimal) -> Decimal {
        if subtotal > self.free_delivery_above {
            Decimal::ZERO
        } else {
            self.delivery_fee
        }
    }

    /// Price of a single line.
    pub fn line_total(&self, line: &CartLine) -> Money<'static, Currency> {
        Money::from_decimal(line.total(), self.currency)
    }

    /// Derive the full breakdown for a cart.
    pub fn breakdown(&self, cart: &Cart) -> PriceBreakdown {
        self.breakdown_for_subtotal(cart.subtotal())
    }

    /// Derive the full breakdown from a precomputed subtotal.
    pub fn breakdown_for_subtotal(&self, subtotal: Decimal) -> PriceBreakdown {
        let tax = self.tax(subtotal);
        let delivery_fee = self.delivery_fee(subtotal);
        let total = subtotal + tax + delivery_fee;

        PriceBreakdown {
            subtotal: Money::from_decimal(subtotal, self.currency),
            tax: Money::from_decimal(tax, self.currency),
            delivery_fee: Money::from_decimal(delivery_fee, self.currency),
            total: Money::from_decimal(total, self.currency),
        }
    }
}

/// Derived monetary totals for a cart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBreakdown {
    subtotal: Money<'static, Currency>,
    tax: Money<'static, Currency>,
    delivery_fee: Money<'static, Currency>,
    total: Money<'static, Currency>,
}

impl PriceBreakdown {
    /// Sum of `price × quantity` over every line
    pub fn subtotal(&self) -> Money<'static, Currency> {
        self.subtotal
    }

    /// Tax on the subtotal
    pub fn tax(&self) -> Money<'static, Currency> {
        self.tax
    }

    /// Delivery fee, zero when waived
    pub fn delivery_fee(&self) -> Money<'static, Currency> {
        self.delivery_fee
    }

    /// Whether the delivery fee was waived
    pub fn free_delivery(&self) -> bool {
        self.delivery_fee.is_zero()
    }

    /// `subtotal + tax + delivery_fee`
    pub fn total(&self) -> Money<'static, Currency> {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::INR;

    use crate::menu::{MenuItem, MenuItemId};

    use super::*;

    fn rupees(amount: i64) -> Money<'static, Currency> {
        Money::from_minor(amount * 100, INR)
    }

    fn cart_with(lines: &[(i64, i64, i64)]) -> Cart {
        let mut cart = Cart::new();

        for &(id, price, quantity) in lines {
            cart.add(&MenuItem {
                id: MenuItemId::Int(id),
                name: format!("Item {id}"),
                description: String::new(),
                price: Decimal::from(price),
                category: None,
                is_available: true,
                image_url: None,
            });
            cart.update_quantity(&MenuItemId::Int(id), quantity);
        }

        cart
    }

    #[test]
    fn empty_cart_pays_the_flat_delivery_fee() {
        let breakdown = PricingPolicy::default().breakdown(&Cart::new());

        assert_eq!(breakdown.subtotal(), rupees(0));
        assert_eq!(breakdown.tax(), rupees(0));
        assert_eq!(breakdown.delivery_fee(), rupees(30));
        assert_eq!(breakdown.total(), rupees(30));
        assert!(!breakdown.free_delivery());
    }

    #[test]
    fn tax_rounds_half_up() {
        let policy = PricingPolicy::default();

        // 130 * 5% = 6.5
        assert_eq!(policy.tax(Decimal::from(130)), Decimal::from(7));
        // 129 * 5% = 6.45
        assert_eq!(policy.tax(Decimal::from(129)), Decimal::from(6));
        // 150 * 5% = 7.5
        assert_eq!(policy.tax(Decimal::from(150)), Decimal::from(8));
    }

    #[test]
    fn delivery_fee_waived_only_strictly_above_threshold() {
        let policy = PricingPolicy::default();

        assert_eq!(policy.delivery_fee(Decimal::from(200)), Decimal::from(30));
        assert_eq!(policy.delivery_fee(Decimal::from(201)), Decimal::ZERO);
        assert_eq!(policy.delivery_fee(Decimal::new(20001, 2)), Decimal::ZERO);
    }

    #[test]
    fn mixed_cart_breakdown() {
        let cart = cart_with(&[(1, 50, 2), (2, 30, 1)]);

        let breakdown = PricingPolicy::default().breakdown(&cart);

        assert_eq!(breakdown.subtotal(), rupees(130));
        assert_eq!(breakdown.tax(), rupees(7));
        assert_eq!(breakdown.delivery_fee(), rupees(30));
        assert_eq!(breakdown.total(), rupees(167));
    }

    #[test]
    fn free_delivery_breakdown() {
        let cart = cart_with(&[(1, 120, 2)]);

        let breakdown = PricingPolicy::default().breakdown(&cart);

        assert_eq!(breakdown.subtotal(), rupees(240));
        assert_eq!(breakdown.tax(), rupees(12));
        assert!(breakdown.free_delivery());
        assert_eq!(breakdown.total(), rupees(252));
    }

    #[test]
    fn line_total_multiplies_price_by_quantity() {
        let cart = cart_with(&[(1, 45, 3)]);
        let policy = PricingPolicy::default();

        let totals: Vec<_> = cart
            .lines()
            .iter()
            .map(|line| policy.line_total(line))
            .collect();

        assert_eq!(totals, [rupees(135)]);
    }

    #[test]
    fn custom_policy_uses_its_own_rules() {
        let policy = PricingPolicy::new(
            iso::USD,
            Percentage::from(Decimal::new(10, 2)),
            Decimal::from(50),
            Decimal::from(5),
        );

        let breakdown = policy.breakdown_for_subtotal(Decimal::from(40));

        assert_eq!(breakdown.tax(), Money::from_minor(400, iso::USD));
        assert_eq!(breakdown.delivery_fee(), Money::from_minor(500, iso::USD));
        assert_eq!(breakdown.total(), Money::from_minor(4900, iso::USD));
    }
}
