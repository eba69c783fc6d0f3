//! Per-type ticket defaults and price quoting.
//!
//! [`DiscountTable`] holds the list price, validity window and default
//! discount of every [`TicketType`]. The park service owns one table and
//! admins adjust its discounts at runtime.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ThemeParkError};
use crate::models::{GROUP_DISCOUNT_MIN_SIZE, TicketType};

/// Minimum discount quoted for two-day passes.
const TWO_DAY_MIN_DISCOUNT: f64 = 10.0;
/// Minimum discount quoted for annual memberships.
const ANNUAL_MIN_DISCOUNT: f64 = 15.0;
/// Minimum discount quoted for groups of [`GROUP_DISCOUNT_MIN_SIZE`] or more.
const GROUP_MIN_DISCOUNT: f64 = 20.0;
/// Ages eligible for a child ticket.
const CHILD_AGES: core::ops::RangeInclusive<u32> = 3..=12;

/// Rejects prices that are negative or not finite numbers.
pub(crate) fn check_price(price: f64) -> Result<()> {
    if !price.is_finite() {
        return Err(ThemeParkError::validation("price must be a numeric value"));
    }
    if price < 0.0 {
        return Err(ThemeParkError::validation("price must be non-negative"));
    }
    Ok(())
}

/// Rejects discounts outside `0..=100` percent.
pub(crate) fn check_discount(discount: f64) -> Result<()> {
    if (0.0..=100.0).contains(&discount) {
        Ok(())
    } else {
        Err(ThemeParkError::validation(format!(
            "discount must be between 0 and 100, got {discount}"
        )))
    }
}

/// Defaults applied to newly sold tickets of one type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TicketDefaults {
    /// List price.
    pub price: f64,
    /// Days of admission from the purchase date.
    pub validity_period: u32,
    /// Default discount percentage.
    pub discount: f64,
}

impl TicketDefaults {
    /// Bundles the three defaults.
    #[inline]
    #[must_use]
    pub const fn new(price: f64, validity_period: u32, discount: f64) -> Self {
        Self {
            price,
            validity_period,
            discount,
        }
    }
}

/// Defaults for every ticket type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountTable {
    /// Single-day admission.
    single_day: TicketDefaults,
    /// Two-day pass.
    two_day: TicketDefaults,
    /// Annual membership.
    annual: TicketDefaults,
    /// Child admission.
    child: TicketDefaults,
    /// Group admission.
    group: TicketDefaults,
    /// VIP admission.
    vip: TicketDefaults,
}

impl Default for DiscountTable {
    #[inline]
    fn default() -> Self {
        Self {
            single_day: TicketDefaults::new(275.0, 1, 0.0),
            two_day: TicketDefaults::new(480.0, 2, 10.0),
            annual: TicketDefaults::new(1840.0, 365, 15.0),
            child: TicketDefaults::new(185.0, 1, 0.0),
            group: TicketDefaults::new(220.0, 1, 20.0),
            vip: TicketDefaults::new(550.0, 1, 0.0),
        }
    }
}

impl DiscountTable {
    /// Returns the defaults for `ticket_type`.
    #[inline]
    #[must_use]
    pub const fn get(&self, ticket_type: TicketType) -> &TicketDefaults {
        match ticket_type {
            TicketType::SingleDay => &self.single_day,
            TicketType::TwoDay => &self.two_day,
            TicketType::Annual => &self.annual,
            TicketType::Child => &self.child,
            TicketType::Group => &self.group,
            TicketType::Vip => &self.vip,
        }
    }

    /// Returns mutable defaults for `ticket_type`.
    const fn get_mut(&mut self, ticket_type: TicketType) -> &mut TicketDefaults {
        match ticket_type {
            TicketType::SingleDay => &mut self.single_day,
            TicketType::TwoDay => &mut self.two_day,
            TicketType::Annual => &mut self.annual,
            TicketType::Child => &mut self.child,
            TicketType::Group => &mut self.group,
            TicketType::Vip => &mut self.vip,
        }
    }

    /// Sets the default discount for `ticket_type`.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeParkError::Validation`] unless `percent` is within
    /// `0..=100`; the table is left unchanged.
    #[inline]
    pub fn set_discount(&mut self, ticket_type: TicketType, percent: f64) -> Result<()> {
        check_discount(percent)?;
        self.get_mut(ticket_type).discount = percent;
        Ok(())
    }

    /// Checks every price and discount, as needed after decoding a table.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeParkError::Validation`] for the first ticket type
    /// with a negative or non-finite price or a discount outside `0..=100`.
    pub fn check(&self) -> Result<()> {
        TicketType::ALL.into_iter().try_for_each(|ticket_type| {
            let defaults = self.get(ticket_type);
            check_price(defaults.price)
                .and_then(|()| check_discount(defaults.discount))
                .map_err(|err| ThemeParkError::validation(format!("{ticket_type} defaults: {err}")))
        })
    }

    /// Prices a purchase of `request.quantity` tickets.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeParkError::Validation`] if the quantity is zero, or if
    /// a child ticket is requested without an age in `3..=12`.
    pub fn quote(&self, request: &QuoteRequest) -> Result<Quote> {
        if request.quantity == 0 {
            return Err(ThemeParkError::validation(
                "the number of tickets must be greater than zero",
            ));
        }
        let defaults = self.get(request.ticket_type);
        let discount = match request.ticket_type {
            TicketType::TwoDay => defaults.discount.max(TWO_DAY_MIN_DISCOUNT),
            TicketType::Annual => defaults.discount.max(ANNUAL_MIN_DISCOUNT),
            TicketType::Group => match request.group_size {
                Some(size) if size >= GROUP_DISCOUNT_MIN_SIZE => {
                    defaults.discount.max(GROUP_MIN_DISCOUNT)
                }
                Some(_) | None => 0.0,
            },
            TicketType::Child => {
                if !request.child_age.is_some_and(|age| CHILD_AGES.contains(&age)) {
                    return Err(ThemeParkError::validation(
                        "child ticket is valid for ages 3-12 only",
                    ));
                }
                defaults.discount
            }
            TicketType::SingleDay | TicketType::Vip => defaults.discount,
        };
        let total = defaults.price * (1.0 - discount / 100.0) * f64::from(request.quantity);
        Ok(Quote {
            ticket_type: request.ticket_type,
            unit_price: defaults.price,
            discount,
            quantity: request.quantity,
            total,
        })
    }
}

/// Input to [`DiscountTable::quote`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteRequest {
    /// Ticket type being bought.
    pub ticket_type: TicketType,
    /// Number of tickets.
    pub quantity: u32,
    /// Party size; only consulted for group tickets.
    pub group_size: Option<u32>,
    /// Age of the child; required for child tickets.
    pub child_age: Option<u32>,
}

impl QuoteRequest {
    /// Creates a request with no group size or child age.
    #[inline]
    #[must_use]
    pub const fn new(ticket_type: TicketType, quantity: u32) -> Self {
        Self {
            ticket_type,
            quantity,
            group_size: None,
            child_age: None,
        }
    }

    /// Sets the party size.
    #[inline]
    #[must_use]
    pub const fn group_size(mut self, size: u32) -> Self {
        self.group_size = Some(size);
        self
    }

    /// Sets the child's age.
    #[inline]
    #[must_use]
    pub const fn child_age(mut self, age: u32) -> Self {
        self.child_age = Some(age);
        self
    }
}

/// Priced purchase returned by [`DiscountTable::quote`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    /// Ticket type being bought.
    pub ticket_type: TicketType,
    /// List price per ticket.
    pub unit_price: f64,
    /// Discount percentage applied.
    pub discount: f64,
    /// Number of tickets.
    pub quantity: u32,
    /// Total after discount.
    pub total: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn default_table_matches_price_list() {
        let table = DiscountTable::default();
        let expected = [
            (TicketType::SingleDay, 275.0, 1, 0.0),
            (TicketType::TwoDay, 480.0, 2, 10.0),
            (TicketType::Annual, 1840.0, 365, 15.0),
            (TicketType::Child, 185.0, 1, 0.0),
            (TicketType::Group, 220.0, 1, 20.0),
            (TicketType::Vip, 550.0, 1, 0.0),
        ];
        for (ticket_type, price, validity, discount) in expected {
            let defaults = table.get(ticket_type);
            assert_close(defaults.price, price);
            assert_eq!(defaults.validity_period, validity);
            assert_close(defaults.discount, discount);
        }
    }

    #[test]
    fn set_discount_validates_range() {
        let mut table = DiscountTable::default();
        table.set_discount(TicketType::Vip, 5.0).unwrap();
        assert_close(table.get(TicketType::Vip).discount, 5.0);

        for percent in [-1.0, 100.5, f64::NAN] {
            let err = table.set_discount(TicketType::Vip, percent).unwrap_err();
            assert!(matches!(err, ThemeParkError::Validation(_)));
        }
        assert_close(table.get(TicketType::Vip).discount, 5.0);
    }

    #[test]
    fn quote_single_day() {
        let quote = DiscountTable::default()
            .quote(&QuoteRequest::new(TicketType::SingleDay, 2))
            .unwrap();
        assert_close(quote.unit_price, 275.0);
        assert_close(quote.discount, 0.0);
        assert_close(quote.total, 550.0);
    }

    #[test]
    fn quote_raises_two_day_and_annual_minimums() {
        let mut table = DiscountTable::default();
        table.set_discount(TicketType::TwoDay, 0.0).unwrap();
        table.set_discount(TicketType::Annual, 30.0).unwrap();

        let two_day = table.quote(&QuoteRequest::new(TicketType::TwoDay, 1)).unwrap();
        assert_close(two_day.discount, 10.0);
        assert_close(two_day.total, 432.0);

        let annual = table.quote(&QuoteRequest::new(TicketType::Annual, 1)).unwrap();
        assert_close(annual.discount, 30.0);
        assert_close(annual.total, 1288.0);
    }

    #[test]
    fn quote_group_depends_on_party_size() {
        let table = DiscountTable::default();
        let large = table
            .quote(&QuoteRequest::new(TicketType::Group, 20).group_size(20))
            .unwrap();
        assert_close(large.discount, 20.0);
        assert_close(large.total, 3520.0);

        let small = table
            .quote(&QuoteRequest::new(TicketType::Group, 5).group_size(19))
            .unwrap();
        assert_close(small.discount, 0.0);
        assert_close(small.total, 1100.0);

        let unknown = table.quote(&QuoteRequest::new(TicketType::Group, 1)).unwrap();
        assert_close(unknown.discount, 0.0);
    }

    #[test]
    fn quote_child_requires_eligible_age() {
        let table = DiscountTable::default();
        let ok = table
            .quote(&QuoteRequest::new(TicketType::Child, 1).child_age(12))
            .unwrap();
        assert_close(ok.total, 185.0);

        for request in [
            QuoteRequest::new(TicketType::Child, 1),
            QuoteRequest::new(TicketType::Child, 1).child_age(2),
            QuoteRequest::new(TicketType::Child, 1).child_age(13),
        ] {
            let err = table.quote(&request).unwrap_err();
            assert!(matches!(err, ThemeParkError::Validation(_)));
        }
    }

    #[test]
    fn quote_rejects_zero_quantity() {
        let err = DiscountTable::default()
            .quote(&QuoteRequest::new(TicketType::Vip, 0))
            .unwrap_err();
        assert!(matches!(err, ThemeParkError::Validation(_)));
    }

    #[test]
    fn price_checks() {
        assert!(check_price(0.0).is_ok());
        assert!(check_price(-0.01).is_err());
        assert!(check_price(f64::NAN).is_err());
        assert!(check_discount(100.0).is_ok());
        assert!(check_discount(100.01).is_err());
    }

    #[test]
    fn check_rejects_decoded_out_of_range_discount() {
        assert!(DiscountTable::default().check().is_ok());

        let mut value = serde_json::to_value(DiscountTable::default()).unwrap();
        value["group"]["discount"] = serde_json::json!(120.0);
        let table: DiscountTable = serde_json::from_value(value).unwrap();
        let err = table.check().unwrap_err();
        assert!(err.to_string().contains("Group"), "{err}");
    }
}
