//! Park guest model.

use serde::{Deserialize, Serialize};

use super::{GuestId, TicketId};
use crate::error::{Result, ThemeParkError};

/// Placeholder name for records stored before the field existed.
const UNKNOWN_NAME: &str = "Unknown";
/// Placeholder email for records stored before the field existed.
const UNKNOWN_EMAIL: &str = "unknown@example.com";
/// Placeholder phone number for records stored before the field existed.
const UNKNOWN_PHONE: &str = "000-000-0000";

/// Serde default for [`Guest::name`].
fn default_name() -> String {
    UNKNOWN_NAME.to_owned()
}

/// Serde default for [`Guest::email`].
pub(super) fn default_email() -> String {
    UNKNOWN_EMAIL.to_owned()
}

/// Serde default for [`Guest::phone_number`].
fn default_phone() -> String {
    UNKNOWN_PHONE.to_owned()
}

/// A park visitor with an account.
///
/// Fields added after the first release carry serde defaults so older
/// guest files still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guest {
    /// Unique identifier.
    id: GuestId,
    /// Full name.
    #[serde(default = "default_name")]
    name: String,
    /// Contact email; always contains `@` for newly created guests.
    #[serde(default = "default_email")]
    email: String,
    /// Contact phone number.
    #[serde(default = "default_phone")]
    phone_number: String,
    /// Age in years, when known.
    #[serde(default)]
    age: Option<u32>,
    /// Tickets bought by this guest, oldest first.
    #[serde(default)]
    purchase_history: Vec<TicketId>,
}

impl Guest {
    /// Rejects email addresses without an `@`.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeParkError::Validation`] if `email` has no `@`.
    #[inline]
    pub fn validate_email(email: &str) -> Result<()> {
        if email.contains('@') {
            Ok(())
        } else {
            Err(ThemeParkError::validation(format!(
                "invalid email address: {email:?}"
            )))
        }
    }

    /// Creates a guest after validating the email address.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeParkError::Validation`] if `email` has no `@`.
    #[inline]
    pub fn new<N, E, P>(id: GuestId, name: N, email: E, phone_number: P) -> Result<Self>
    where
        N: Into<String>,
        E: Into<String>,
        P: Into<String>,
    {
        let address = email.into();
        Self::validate_email(&address)?;
        Ok(Self {
            id,
            name: name.into(),
            email: address,
            phone_number: phone_number.into(),
            age: None,
            purchase_history: Vec::new(),
        })
    }

    /// Returns the guest's identifier.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> GuestId {
        self.id
    }

    /// Returns the guest's name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replaces the guest's name.
    #[inline]
    pub fn set_name<T: Into<String>>(&mut self, name: T) {
        self.name = name.into();
    }

    /// Returns the guest's email.
    #[inline]
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Replaces the email address.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeParkError::Validation`] if `email` has no `@`; the
    /// stored address is left unchanged.
    #[inline]
    pub fn set_email<T: Into<String>>(&mut self, email: T) -> Result<()> {
        let address = email.into();
        Self::validate_email(&address)?;
        self.email = address;
        Ok(())
    }

    /// Returns the guest's phone number.
    #[inline]
    #[must_use]
    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    /// Replaces the phone number.
    #[inline]
    pub fn set_phone_number<T: Into<String>>(&mut self, phone_number: T) {
        self.phone_number = phone_number.into();
    }

    /// Returns the guest's age, if recorded.
    #[inline]
    #[must_use]
    pub const fn age(&self) -> Option<u32> {
        self.age
    }

    /// Records or clears the guest's age.
    #[inline]
    pub const fn set_age(&mut self, age: Option<u32>) {
        self.age = age;
    }

    /// Returns the IDs of tickets bought by this guest, oldest first.
    #[inline]
    #[must_use]
    pub fn purchase_history(&self) -> &[TicketId] {
        &self.purchase_history
    }

    /// Appends a ticket to the purchase history.
    #[inline]
    pub fn record_purchase(&mut self, ticket: TicketId) {
        self.purchase_history.push(ticket);
    }
}

impl core::fmt::Display for Guest {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Guest(ID: {}, Name: {}, Email: {}",
            self.id, self.name, self.email
        )?;
        match self.age {
            Some(age) => write!(f, ", Age: {age})"),
            None => f.write_str(", Age: None)"),
        }
    }
}
