//! Payment model.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{PaymentId, PaymentMethod, ReservationId};
use crate::error::{Result, ThemeParkError};
use crate::pricing::check_price;

/// Rejects amounts that are not strictly positive.
fn check_positive(amount: f64, what: &str) -> Result<()> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(ThemeParkError::validation(format!(
            "{what} must be positive, got {amount}"
        )))
    }
}

/// Money received for a reservation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier.
    id: PaymentId,
    /// Amount currently held; never negative.
    amount_paid: f64,
    /// Day the payment was made.
    date: NaiveDate,
    /// How the guest paid.
    method: PaymentMethod,
}

impl Payment {
    /// Creates a payment dated today.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeParkError::Validation`] if `amount` is negative or not
    /// a finite number.
    #[inline]
    pub fn new(id: PaymentId, amount: f64, method: PaymentMethod) -> Result<Self> {
        check_price(amount)?;
        Ok(Self {
            id,
            amount_paid: amount,
            date: Local::now().date_naive(),
            method,
        })
    }

    /// Checks the amount of a payment decoded from storage.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeParkError::Validation`] if the amount is negative or
    /// not a finite number.
    #[inline]
    pub fn check_invariants(&self) -> Result<()> {
        check_price(self.amount_paid)
    }

    /// Returns the payment's identifier.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> PaymentId {
        self.id
    }

    /// Returns the amount currently held.
    #[inline]
    #[must_use]
    pub const fn amount_paid(&self) -> f64 {
        self.amount_paid
    }

    /// Returns the payment date.
    #[inline]
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// Returns the payment method.
    #[inline]
    #[must_use]
    pub const fn method(&self) -> PaymentMethod {
        self.method
    }

    /// Changes the payment method, leaving the amount untouched.
    #[inline]
    pub const fn set_method(&mut self, method: PaymentMethod) {
        self.method = method;
    }

    /// Records an additional amount received.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeParkError::Validation`] unless `amount` is positive.
    #[inline]
    pub fn add_amount(&mut self, amount: f64) -> Result<()> {
        check_positive(amount, "payment amount")?;
        self.amount_paid += amount;
        Ok(())
    }

    /// Returns part of the payment to the guest and a receipt line.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeParkError::Validation`] unless `amount` is positive and
    /// no greater than the amount currently held.
    pub fn issue_refund(&mut self, reservation: ReservationId, amount: f64) -> Result<String> {
        check_positive(amount, "refund amount")?;
        if amount > self.amount_paid {
            return Err(ThemeParkError::validation(format!(
                "refund of {amount} exceeds amount paid {}",
                self.amount_paid
            )));
        }
        self.amount_paid -= amount;
        Ok(format!(
            "Refund of {amount} issued for reservation {reservation}"
        ))
    }
}

impl core::fmt::Display for Payment {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Payment(ID: {}, Amount: {:.2}, Method: {}, Date: {})",
            self.id, self.amount_paid, self.method, self.date
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payment(amount: f64) -> Payment {
        Payment::new(PaymentId::new(1), amount, PaymentMethod::CreditCard).unwrap()
    }

    #[test]
    fn negative_or_nan_amount_is_rejected() {
        for amount in [-1.0, f64::NAN, f64::INFINITY] {
            let err = Payment::new(PaymentId::new(1), amount, PaymentMethod::DebitCard).unwrap_err();
            assert!(matches!(err, ThemeParkError::Validation(_)));
        }
        assert!(Payment::new(PaymentId::new(1), 0.0, PaymentMethod::DebitCard).is_ok());
    }

    #[test]
    fn decoded_negative_amount_fails_invariants() {
        assert!(payment(10.0).check_invariants().is_ok());
        let mut value = serde_json::to_value(payment(10.0)).unwrap();
        value["amount_paid"] = serde_json::json!(-1.0);
        let p: Payment = serde_json::from_value(value).unwrap();
        assert!(matches!(p.check_invariants(), Err(ThemeParkError::Validation(_))));
    }

    #[test]
    fn add_amount_accumulates() {
        let mut p = payment(100.0);
        p.add_amount(50.0).unwrap();
        assert!((p.amount_paid() - 150.0).abs() < f64::EPSILON);
        assert!(p.add_amount(0.0).is_err());
        assert!((p.amount_paid() - 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn refund_bounded_by_amount_paid() {
        let mut p = payment(100.0);
        let receipt = p.issue_refund(ReservationId::new(4), 40.0).unwrap();
        assert_eq!(receipt, "Refund of 40 issued for reservation 4");
        assert!((p.amount_paid() - 60.0).abs() < f64::EPSILON);

        assert!(p.issue_refund(ReservationId::new(4), 60.5).is_err());
        assert!(p.issue_refund(ReservationId::new(4), -5.0).is_err());
        assert!((p.amount_paid() - 60.0).abs() < f64::EPSILON);

        let _receipt = p.issue_refund(ReservationId::new(4), 60.0).unwrap();
        assert!((p.amount_paid() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn set_method_keeps_amount() {
        let mut p = payment(1840.0);
        p.set_method(PaymentMethod::DigitalWallet);
        assert_eq!(p.method(), PaymentMethod::DigitalWallet);
        assert!((p.amount_paid() - 1840.0).abs() < f64::EPSILON);
    }

    #[test]
    fn serialize_roundtrip() {
        let p = payment(275.0);
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains(r#""method":"Credit Card""#));
        let deserialized: Payment = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, p);
    }
}
