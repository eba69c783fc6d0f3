//! Reservation model: a guest's booking of one or more tickets.

use core::fmt::Write as _;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{Admin, Guest, Payment, ReservationId, Ticket};
use crate::error::{Result, ThemeParkError};

/// A booking of tickets for a guest, optionally paid.
///
/// Tickets, guest, payment and admin are stored as snapshots taken when
/// they were attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    /// Unique identifier.
    id: ReservationId,
    /// Day the reservation was made.
    date: NaiveDate,
    /// Reserved tickets.
    tickets: Vec<Ticket>,
    /// Sum of the listed ticket prices; kept in step with `tickets`.
    total_amount: f64,
    /// Guest the reservation belongs to.
    guest: Option<Guest>,
    /// Payment settling the reservation; set at most once.
    #[serde(default)]
    payment: Option<Payment>,
    /// Admin in charge when the reservation was made.
    #[serde(default)]
    admin: Option<Admin>,
}

impl Reservation {
    /// Creates a reservation dated today.
    #[inline]
    #[must_use]
    pub fn new(id: ReservationId, tickets: Vec<Ticket>, guest: Guest, admin: Option<Admin>) -> Self {
        let mut reservation = Self {
            id,
            date: Local::now().date_naive(),
            tickets,
            total_amount: 0.0,
            guest: Some(guest),
            payment: None,
            admin,
        };
        reservation.total_amount = reservation.calculate_total_amount();
        reservation
    }

    /// Returns the reservation's identifier.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> ReservationId {
        self.id
    }

    /// Returns the reservation date.
    #[inline]
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// Overrides the reservation date.
    #[inline]
    pub const fn set_date(&mut self, date: NaiveDate) {
        self.date = date;
    }

    /// Returns the reserved tickets.
    #[inline]
    #[must_use]
    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    /// Replaces the ticket list and recomputes the total.
    #[inline]
    pub fn set_tickets(&mut self, tickets: Vec<Ticket>) {
        self.tickets = tickets;
        self.total_amount = self.calculate_total_amount();
    }

    /// Adds one ticket and recomputes the total.
    #[inline]
    pub fn add_ticket(&mut self, ticket: Ticket) {
        self.tickets.push(ticket);
        self.total_amount = self.calculate_total_amount();
    }

    /// Returns the stored total amount.
    #[inline]
    #[must_use]
    pub const fn total_amount(&self) -> f64 {
        self.total_amount
    }

    /// Sums the listed (undiscounted) price of every reserved ticket.
    #[inline]
    #[must_use]
    pub fn calculate_total_amount(&self) -> f64 {
        self.tickets.iter().map(Ticket::price).sum()
    }

    /// Returns the guest the reservation belongs to.
    #[inline]
    #[must_use]
    pub const fn guest(&self) -> Option<&Guest> {
        self.guest.as_ref()
    }

    /// Attaches a guest.
    #[inline]
    pub fn set_guest(&mut self, guest: Guest) {
        self.guest = Some(guest);
    }

    /// Returns the attached payment, if any.
    #[inline]
    #[must_use]
    pub const fn payment(&self) -> Option<&Payment> {
        self.payment.as_ref()
    }

    /// Returns the attached payment mutably, if any.
    #[inline]
    pub const fn payment_mut(&mut self) -> Option<&mut Payment> {
        self.payment.as_mut()
    }

    /// Attaches the payment that settles this reservation.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeParkError::Validation`] if a payment is already
    /// attached.
    #[inline]
    pub fn set_payment(&mut self, payment: Payment) -> Result<()> {
        if let Some(existing) = self.payment.as_ref() {
            return Err(ThemeParkError::validation(format!(
                "reservation {} already has payment {}",
                self.id,
                existing.id()
            )));
        }
        self.payment = Some(payment);
        Ok(())
    }

    /// Detaches the payment, returning it.
    #[inline]
    pub const fn take_payment(&mut self) -> Option<Payment> {
        self.payment.take()
    }

    /// Returns the admin in charge, if one was signed in.
    #[inline]
    #[must_use]
    pub const fn admin(&self) -> Option<&Admin> {
        self.admin.as_ref()
    }

    /// Renders a plain-text invoice.
    #[must_use]
    pub fn generate_invoice(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _written = self.write_invoice(&mut out);
        out
    }

    /// Writes the invoice lines into `out`.
    fn write_invoice(&self, out: &mut String) -> core::fmt::Result {
        writeln!(out, "--- Invoice ---")?;
        writeln!(out, "Reservation ID: {}", self.id)?;
        writeln!(out, "Reservation Date: {}", self.date)?;
        match self.guest.as_ref() {
            Some(guest) => writeln!(out, "Guest: {guest}")?,
            None => writeln!(out, "Guest: None")?,
        }
        writeln!(out, "Tickets:")?;
        for ticket in &self.tickets {
            writeln!(out, "Ticket ID: {}, Price: {}", ticket.id(), ticket.price())?;
        }
        writeln!(out, "Total Amount: {}", self.total_amount)?;
        match self.payment.as_ref() {
            Some(payment) => writeln!(out, "Payment Amount: {}", payment.amount_paid())?,
            None => writeln!(out, "Payment: Not made yet")?,
        }
        match self.admin.as_ref() {
            Some(admin) => write!(out, "Admin in Charge: {} ({})", admin.name(), admin.email()),
            None => write!(out, "Admin in Charge: None"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AdminId, GuestId, PaymentId, PaymentMethod, TicketId, TicketType};

    fn guest() -> Guest {
        Guest::new(GuestId::new(1), "Fatima", "fatima@example.com", "123-123-1234").unwrap()
    }

    fn ticket(id: u64, ticket_type: TicketType, price: f64) -> Ticket {
        Ticket::new(TicketId::new(id), ticket_type, price, 1, Some(GuestId::new(1))).unwrap()
    }

    #[test]
    fn total_sums_listed_prices() {
        let mut discounted = ticket(2, TicketType::TwoDay, 480.0);
        discounted.set_discount(10.0).unwrap();
        let reservation = Reservation::new(
            ReservationId::new(1),
            vec![ticket(1, TicketType::SingleDay, 275.0), discounted],
            guest(),
            None,
        );
        assert!((reservation.calculate_total_amount() - 755.0).abs() < f64::EPSILON);
        assert!((reservation.total_amount() - 755.0).abs() < f64::EPSILON);
    }

    #[test]
    fn total_follows_ticket_changes() {
        let mut reservation = Reservation::new(ReservationId::new(1), Vec::new(), guest(), None);
        assert!((reservation.total_amount() - 0.0).abs() < f64::EPSILON);
        reservation.add_ticket(ticket(1, TicketType::Vip, 550.0));
        assert!((reservation.total_amount() - 550.0).abs() < f64::EPSILON);
        reservation.set_tickets(vec![ticket(2, TicketType::Child, 185.0)]);
        assert!((reservation.total_amount() - 185.0).abs() < f64::EPSILON);
    }

    #[test]
    fn payment_is_set_once() {
        let mut reservation = Reservation::new(ReservationId::new(1), Vec::new(), guest(), None);
        let first = Payment::new(PaymentId::new(1), 100.0, PaymentMethod::CreditCard).unwrap();
        let second = Payment::new(PaymentId::new(2), 50.0, PaymentMethod::DebitCard).unwrap();
        reservation.set_payment(first).unwrap();
        let err = reservation.set_payment(second).unwrap_err();
        assert!(matches!(err, ThemeParkError::Validation(_)));
        assert_eq!(reservation.payment().map(Payment::id), Some(PaymentId::new(1)));
    }

    #[test]
    fn invoice_lists_everything() {
        let admin = Admin::new(AdminId::new(3), "Mariam", "mariam@example.com");
        let mut reservation = Reservation::new(
            ReservationId::new(9),
            vec![ticket(4, TicketType::SingleDay, 275.0)],
            guest(),
            Some(admin),
        );
        let unpaid = reservation.generate_invoice();
        assert!(unpaid.starts_with("--- Invoice ---\nReservation ID: 9\n"));
        assert!(unpaid.contains("Ticket ID: 4, Price: 275"));
        assert!(unpaid.contains("Total Amount: 275"));
        assert!(unpaid.contains("Payment: Not made yet"));
        assert!(unpaid.ends_with("Admin in Charge: Mariam (mariam@example.com)"));

        let payment = Payment::new(PaymentId::new(1), 275.0, PaymentMethod::CreditCard).unwrap();
        reservation.set_payment(payment).unwrap();
        assert!(reservation.generate_invoice().contains("Payment Amount: 275"));
    }

    #[test]
    fn serialize_roundtrip() {
        let reservation = Reservation::new(
            ReservationId::new(2),
            vec![ticket(1, TicketType::Annual, 1840.0)],
            guest(),
            Some(Admin::new(AdminId::new(1), "Mariam", "mariam@example.com")),
        );
        let json = serde_json::to_string(&reservation).unwrap();
        let deserialized: Reservation = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, reservation);
    }
}
