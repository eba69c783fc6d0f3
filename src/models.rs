//! Data models for theme park entities.
//!
//! This module contains strongly-typed representations of every park
//! entity, newtype ID wrappers, and enumeration types for constrained
//! values.

mod admin;
mod attraction;
mod enums;
mod event;
mod guest;
mod ids;
mod payment;
mod reservation;
mod service;
mod ticket;

pub use admin::Admin;
pub use attraction::Attraction;
pub use enums::{Category, DiscountRule, PaymentMethod, TicketStatus, TicketType};
pub use event::Event;
pub use guest::Guest;
pub use ids::{
    AdminId, AttractionId, EventId, GuestId, PaymentId, ReservationId, ServiceId, TicketId,
};
pub use payment::Payment;
pub use reservation::Reservation;
pub use service::Service;
pub use ticket::{GROUP_DISCOUNT_MIN_SIZE, Ticket, ValidityReport};
