//! Newtype wrappers for entity identifiers.
//!
//! These prevent accidentally mixing up IDs of different entity types
//! at compile time. Every identifier is a positive integer issued by the
//! identity generator for its category.

use serde::{Deserialize, Serialize};

/// Macro to define a newtype ID wrapping a `u64`.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Creates a new identifier from the given value.
            #[inline]
            #[must_use]
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            /// Returns a reference to the inner value.
            #[inline]
            #[must_use]
            pub const fn as_inner(&self) -> &u64 {
                &self.0
            }

            /// Consumes the wrapper and returns the inner value.
            #[inline]
            #[must_use]
            pub const fn into_inner(self) -> u64 {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            #[inline]
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<u64> for $name {
            #[inline]
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl core::str::FromStr for $name {
            type Err = core::num::ParseIntError;

            #[inline]
            fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
                s.trim().parse::<u64>().map(Self)
            }
        }
    };
}

define_id! {
    /// Unique identifier for a guest.
    GuestId
}

define_id! {
    /// Unique identifier for a ticket.
    TicketId
}

define_id! {
    /// Unique identifier for a reservation.
    ReservationId
}

define_id! {
    /// Unique identifier for an admin.
    AdminId
}

define_id! {
    /// Unique identifier for a payment.
    PaymentId
}

define_id! {
    /// Unique identifier for an attraction.
    AttractionId
}

define_id! {
    /// Unique identifier for an event.
    EventId
}

define_id! {
    /// Unique identifier for a park service.
    ServiceId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guest_id_serde_roundtrip() {
        let id = GuestId::new(42);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "42");
        let deserialized: GuestId = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, id);
    }

    #[test]
    fn numeric_id_display() {
        let id = TicketId::new(99);
        assert_eq!(id.to_string(), "99");
    }

    #[test]
    fn id_from_inner() {
        let id: PaymentId = 42_u64.into();
        assert_eq!(*id.as_inner(), 42);
        assert_eq!(id.into_inner(), 42);
    }

    #[test]
    fn id_parses_from_trimmed_text() {
        let id: AdminId = " 12 ".parse().unwrap();
        assert_eq!(id, AdminId::new(12));
        assert!("twelve".parse::<AdminId>().is_err());
        assert!("-1".parse::<AdminId>().is_err());
    }

    #[test]
    fn ids_order_numerically() {
        assert!(ReservationId::new(2) < ReservationId::new(10));
    }
}
