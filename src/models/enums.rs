//! Enumeration types for constrained domain values.
//!
//! Serialized forms use the park's display names ("Single-Day",
//! "Credit Card", ...). Parsing from user input is lenient: case, spaces,
//! hyphens and underscores are ignored.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ThemeParkError;

/// Reduces free-form input to lowercase ASCII alphanumerics for matching.
fn normalize(input: &str) -> String {
    input
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}

/// Kind of admission ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TicketType {
    /// Single-day admission.
    #[serde(rename = "Single-Day")]
    SingleDay,
    /// Two consecutive days of admission.
    #[serde(rename = "Two-Day")]
    TwoDay,
    /// Annual membership.
    Annual,
    /// Child admission (ages 3 to 12).
    Child,
    /// Group admission.
    Group,
    /// VIP admission.
    #[serde(rename = "VIP")]
    Vip,
}

impl TicketType {
    /// Every ticket type, in display order.
    pub const ALL: [Self; 6] = [
        Self::SingleDay,
        Self::TwoDay,
        Self::Annual,
        Self::Child,
        Self::Group,
        Self::Vip,
    ];

    /// Returns the display name used in storage and output.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SingleDay => "Single-Day",
            Self::TwoDay => "Two-Day",
            Self::Annual => "Annual",
            Self::Child => "Child",
            Self::Group => "Group",
            Self::Vip => "VIP",
        }
    }
}

impl fmt::Display for TicketType {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketType {
    type Err = ThemeParkError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "singleday" => Ok(Self::SingleDay),
            "twoday" => Ok(Self::TwoDay),
            "annual" => Ok(Self::Annual),
            "child" => Ok(Self::Child),
            "group" => Ok(Self::Group),
            "vip" => Ok(Self::Vip),
            _ => Err(ThemeParkError::validation(format!(
                "invalid ticket type: {s:?}"
            ))),
        }
    }
}

/// Lifecycle state of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TicketStatus {
    /// Usable for admission.
    #[default]
    Active,
    /// Redeemed at the gate.
    Used,
    /// Validity period has elapsed.
    Expired,
    /// Cancelled before use.
    Cancelled,
}

impl TicketStatus {
    /// Returns the display name used in storage and output.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Used => "Used",
            Self::Expired => "Expired",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for TicketStatus {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a payment was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Credit card.
    #[serde(rename = "Credit Card")]
    CreditCard,
    /// Debit card.
    #[serde(rename = "Debit Card")]
    DebitCard,
    /// Digital wallet.
    #[serde(rename = "Digital Wallet")]
    DigitalWallet,
}

impl PaymentMethod {
    /// Returns the display name used in storage and output.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreditCard => "Credit Card",
            Self::DebitCard => "Debit Card",
            Self::DigitalWallet => "Digital Wallet",
        }
    }
}

impl fmt::Display for PaymentMethod {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ThemeParkError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "creditcard" => Ok(Self::CreditCard),
            "debitcard" => Ok(Self::DebitCard),
            "digitalwallet" => Ok(Self::DigitalWallet),
            _ => Err(ThemeParkError::validation(format!(
                "invalid payment method: {s:?}"
            ))),
        }
    }
}

/// Named discount policy applied to a single ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiscountRule {
    /// 10% on two-day tickets bought online.
    OnlinePurchase,
    /// 15% on annual membership renewals.
    Renewal,
    /// 20% on group tickets for 20 or more people.
    Group,
}

impl DiscountRule {
    /// Parses a rule name, returning `None` for anything unrecognized.
    ///
    /// Accepts "online purchase", "renewal", "group" and the long form
    /// "group discount", in any case.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match normalize(name).as_str() {
            "onlinepurchase" | "online" => Some(Self::OnlinePurchase),
            "renewal" => Some(Self::Renewal),
            "group" | "groupdiscount" => Some(Self::Group),
            _ => None,
        }
    }
}

/// Independently persisted entity collection.
///
/// Also the key space of the identity generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Guests.
    Guest,
    /// Tickets.
    Ticket,
    /// Reservations.
    Reservation,
    /// Admins.
    Admin,
    /// Payments.
    Payment,
    /// Attractions.
    Attraction,
    /// Events.
    Event,
    /// Park services.
    Service,
}

impl Category {
    /// Every category.
    pub const ALL: [Self; 8] = [
        Self::Guest,
        Self::Ticket,
        Self::Reservation,
        Self::Admin,
        Self::Payment,
        Self::Attraction,
        Self::Event,
        Self::Service,
    ];

    /// Returns the counter name used by the identity generator.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Guest => "guest",
            Self::Ticket => "ticket",
            Self::Reservation => "reservation",
            Self::Admin => "admin",
            Self::Payment => "payment",
            Self::Attraction => "attraction",
            Self::Event => "event",
            Self::Service => "service",
        }
    }

    /// Returns the file name holding this category's collection.
    #[inline]
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Guest => "guests.json",
            Self::Ticket => "tickets.json",
            Self::Reservation => "reservations.json",
            Self::Admin => "admins.json",
            Self::Payment => "payments.json",
            Self::Attraction => "attractions.json",
            Self::Event => "events.json",
            Self::Service => "services.json",
        }
    }
}

impl fmt::Display for Category {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ThemeParkError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| ThemeParkError::UnknownCategory(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticket_type_serde_uses_display_names() {
        let variants = [
            (TicketType::SingleDay, r#""Single-Day""#),
            (TicketType::TwoDay, r#""Two-Day""#),
            (TicketType::Annual, r#""Annual""#),
            (TicketType::Child, r#""Child""#),
            (TicketType::Group, r#""Group""#),
            (TicketType::Vip, r#""VIP""#),
        ];
        for (variant, expected_json) in variants {
            let json = serde_json::to_string(&variant).unwrap();
            assert_eq!(json, expected_json);
            assert_eq!(variant.to_string(), expected_json.trim_matches('"'));
        }
    }

    #[test]
    fn ticket_type_parses_leniently() {
        assert_eq!("single-day".parse::<TicketType>().unwrap(), TicketType::SingleDay);
        assert_eq!("TwoDay".parse::<TicketType>().unwrap(), TicketType::TwoDay);
        assert_eq!("two_day".parse::<TicketType>().unwrap(), TicketType::TwoDay);
        assert_eq!("vip".parse::<TicketType>().unwrap(), TicketType::Vip);
        let err = "season".parse::<TicketType>().unwrap_err();
        assert!(matches!(err, ThemeParkError::Validation(_)));
    }

    #[test]
    fn payment_method_serde_and_parse() {
        let json = serde_json::to_string(&PaymentMethod::DigitalWallet).unwrap();
        assert_eq!(json, r#""Digital Wallet""#);
        let deserialized: PaymentMethod = serde_json::from_str(r#""Debit Card""#).unwrap();
        assert_eq!(deserialized, PaymentMethod::DebitCard);
        assert_eq!(
            "credit card".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::CreditCard
        );
        assert!("cash".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn ticket_status_defaults_to_active() {
        assert_eq!(TicketStatus::default(), TicketStatus::Active);
        let json = serde_json::to_string(&TicketStatus::Cancelled).unwrap();
        assert_eq!(json, r#""Cancelled""#);
    }

    #[test]
    fn discount_rule_names() {
        assert_eq!(
            DiscountRule::parse("Online Purchase"),
            Some(DiscountRule::OnlinePurchase)
        );
        assert_eq!(DiscountRule::parse("renewal"), Some(DiscountRule::Renewal));
        assert_eq!(DiscountRule::parse("Group Discount"), Some(DiscountRule::Group));
        assert_eq!(DiscountRule::parse("group"), Some(DiscountRule::Group));
        assert_eq!(DiscountRule::parse("loyalty"), None);
    }

    #[test]
    fn category_names_roundtrip() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
            assert!(category.file_name().ends_with(".json"));
        }
        let err = "ride".parse::<Category>().unwrap_err();
        assert!(matches!(err, ThemeParkError::UnknownCategory(_)));
    }

    #[test]
    fn invalid_ticket_type_json_fails() {
        let result = serde_json::from_str::<TicketType>(r#""Season""#);
        assert!(result.is_err());
    }
}
