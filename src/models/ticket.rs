//! Admission ticket model and its pricing/validity rules.

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};

use super::{DiscountRule, GuestId, TicketId, TicketStatus, TicketType};
use crate::error::{Result, ThemeParkError};
use crate::pricing::{check_discount, check_price};

/// Discount granted by [`DiscountRule::OnlinePurchase`] on two-day tickets.
const ONLINE_PURCHASE_DISCOUNT: f64 = 10.0;
/// Discount granted by [`DiscountRule::Renewal`] on annual tickets.
const RENEWAL_DISCOUNT: f64 = 15.0;
/// Discount granted by [`DiscountRule::Group`] on large group tickets.
const GROUP_DISCOUNT: f64 = 20.0;
/// Minimum party size for the group discount.
pub const GROUP_DISCOUNT_MIN_SIZE: u32 = 20;

/// Outcome of [`Ticket::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidityReport {
    /// The validity window has closed.
    Expired,
    /// The ticket is still usable.
    Valid {
        /// Whole days left.
        days: i64,
        /// Whole hours left beyond `days`.
        hours: i64,
    },
}

impl core::fmt::Display for ValidityReport {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match *self {
            Self::Expired => f.write_str("Expired"),
            Self::Valid { days, hours } => {
                write!(f, "Valid: {days} days, {hours} hours remaining")
            }
        }
    }
}

/// A ticket, optionally owned by a guest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    /// Unique identifier.
    id: TicketId,
    /// Kind of admission.
    ticket_type: TicketType,
    /// Listed price before discount.
    price: f64,
    /// Validity window in days, counted from the purchase date.
    validity_period: u32,
    /// Calendar day of purchase.
    purchase_date: NaiveDate,
    /// Discount percentage in `0..=100`.
    #[serde(default)]
    discount: f64,
    /// Lifecycle state.
    #[serde(default)]
    status: TicketStatus,
    /// Owning guest; absent in records written before guests owned tickets.
    #[serde(default)]
    guest_id: Option<GuestId>,
}

impl Ticket {
    /// Creates an active ticket purchased today with no discount.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeParkError::Validation`] if `price` is negative or not
    /// a finite number.
    #[inline]
    pub fn new(
        id: TicketId,
        ticket_type: TicketType,
        price: f64,
        validity_period: u32,
        guest_id: Option<GuestId>,
    ) -> Result<Self> {
        check_price(price)?;
        Ok(Self {
            id,
            ticket_type,
            price,
            validity_period,
            purchase_date: Local::now().date_naive(),
            discount: 0.0,
            status: TicketStatus::Active,
            guest_id,
        })
    }

    /// Returns the ticket's identifier.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> TicketId {
        self.id
    }

    /// Returns the kind of admission.
    #[inline]
    #[must_use]
    pub const fn ticket_type(&self) -> TicketType {
        self.ticket_type
    }

    /// Changes the kind of admission. The discount is left as is.
    #[inline]
    pub const fn set_ticket_type(&mut self, ticket_type: TicketType) {
        self.ticket_type = ticket_type;
    }

    /// Returns the listed price before discount.
    #[inline]
    #[must_use]
    pub const fn price(&self) -> f64 {
        self.price
    }

    /// Returns the validity window in days.
    #[inline]
    #[must_use]
    pub const fn validity_period(&self) -> u32 {
        self.validity_period
    }

    /// Returns the purchase date.
    #[inline]
    #[must_use]
    pub const fn purchase_date(&self) -> NaiveDate {
        self.purchase_date
    }

    /// Overrides the purchase date (back-dating imported tickets).
    #[inline]
    pub const fn set_purchase_date(&mut self, purchase_date: NaiveDate) {
        self.purchase_date = purchase_date;
    }

    /// Returns the discount percentage.
    #[inline]
    #[must_use]
    pub const fn discount(&self) -> f64 {
        self.discount
    }

    /// Sets the discount percentage.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeParkError::Validation`] unless `discount` is within
    /// `0..=100`.
    #[inline]
    pub fn set_discount(&mut self, discount: f64) -> Result<()> {
        check_discount(discount)?;
        self.discount = discount;
        Ok(())
    }

    /// Checks the price and discount of a ticket decoded from storage.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeParkError::Validation`] if the price is negative or
    /// not finite, or the discount is outside `0..=100`.
    #[inline]
    pub fn check_invariants(&self) -> Result<()> {
        check_price(self.price)?;
        check_discount(self.discount)
    }

    /// Returns the lifecycle state.
    #[inline]
    #[must_use]
    pub const fn status(&self) -> TicketStatus {
        self.status
    }

    /// Returns the owning guest, if assigned.
    #[inline]
    #[must_use]
    pub const fn guest_id(&self) -> Option<GuestId> {
        self.guest_id
    }

    /// Assigns or clears the owning guest.
    #[inline]
    pub const fn set_guest_id(&mut self, guest_id: Option<GuestId>) {
        self.guest_id = guest_id;
    }

    /// Overwrites the discount according to a named rule.
    ///
    /// | rule | applies to | discount |
    /// |---|---|---|
    /// | online purchase | two-day | 10% |
    /// | renewal | annual | 15% |
    /// | group | group, `group_size >= 20` | 20% |
    ///
    /// Any other combination, including an unrecognized rule name, sets the
    /// discount to zero.
    #[inline]
    pub fn apply_discount(&mut self, rule: &str, group_size: u32) {
        self.discount = match (DiscountRule::parse(rule), self.ticket_type) {
            (Some(DiscountRule::OnlinePurchase), TicketType::TwoDay) => ONLINE_PURCHASE_DISCOUNT,
            (Some(DiscountRule::Renewal), TicketType::Annual) => RENEWAL_DISCOUNT,
            (Some(DiscountRule::Group), TicketType::Group)
                if group_size >= GROUP_DISCOUNT_MIN_SIZE =>
            {
                GROUP_DISCOUNT
            }
            _ => 0.0,
        };
    }

    /// Returns the price after discount: `price * (1 - discount / 100)`.
    #[inline]
    #[must_use]
    pub fn calculate_final_price(&self) -> f64 {
        self.price * (1.0 - self.discount / 100.0)
    }

    /// Returns the last instant the ticket is valid, or `None` if the
    /// window runs past the representable calendar.
    #[must_use]
    pub fn valid_until(&self) -> Option<NaiveDateTime> {
        self.purchase_date
            .and_time(NaiveTime::MIN)
            .checked_add_signed(TimeDelta::try_days(i64::from(self.validity_period))?)
    }

    /// Returns `true` while `now` is within the validity window.
    #[must_use]
    pub fn is_valid_at(&self, now: NaiveDateTime) -> bool {
        self.valid_until().is_none_or(|until| now <= until)
    }

    /// Returns `true` while the local time is within the validity window.
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Local::now().naive_local())
    }

    /// Checks validity at `now`, expiring an active ticket whose window
    /// has closed.
    pub fn validate_at(&mut self, now: NaiveDateTime) -> ValidityReport {
        if !self.is_valid_at(now) {
            if self.status == TicketStatus::Active {
                self.status = TicketStatus::Expired;
            }
            return ValidityReport::Expired;
        }
        let Some(until) = self.valid_until() else {
            return ValidityReport::Valid {
                days: i64::MAX,
                hours: 0,
            };
        };
        let remaining = until - now;
        ValidityReport::Valid {
            days: remaining.num_days(),
            hours: remaining.num_hours() % 24,
        }
    }

    /// Checks validity against the local clock. See [`Self::validate_at`].
    #[inline]
    pub fn validate(&mut self) -> ValidityReport {
        self.validate_at(Local::now().naive_local())
    }

    /// Moves an active ticket to `next`.
    fn transition_from_active(&mut self, next: TicketStatus) -> Result<()> {
        if self.status != TicketStatus::Active {
            return Err(ThemeParkError::validation(format!(
                "ticket {} is {} and cannot become {next}",
                self.id, self.status
            )));
        }
        self.status = next;
        Ok(())
    }

    /// Marks an active ticket as used.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeParkError::Validation`] if the ticket is not active.
    #[inline]
    pub fn redeem(&mut self) -> Result<()> {
        self.transition_from_active(TicketStatus::Used)
    }

    /// Marks an active ticket as expired.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeParkError::Validation`] if the ticket is not active.
    #[inline]
    pub fn expire(&mut self) -> Result<()> {
        self.transition_from_active(TicketStatus::Expired)
    }

    /// Cancels an active ticket.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeParkError::Validation`] if the ticket is not active.
    #[inline]
    pub fn cancel(&mut self) -> Result<()> {
        self.transition_from_active(TicketStatus::Cancelled)
    }

    /// Re-activates the ticket from any state.
    #[inline]
    pub const fn activate(&mut self) {
        self.status = TicketStatus::Active;
    }
}

impl core::fmt::Display for Ticket {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Ticket(ID: {}, Type: {}, Price: {:.2}, Status: {})",
            self.id, self.ticket_type, self.price, self.status
        )
    }
}
