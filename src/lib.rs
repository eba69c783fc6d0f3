//! Theme park domain model and persistence layer.
//!
//! This crate models guests, tickets, reservations, payments, admins and
//! park offerings, persists them through a pluggable [`storage::Storage`]
//! backend, and exposes the day-to-day operations through
//! [`theme_park::ThemePark`].

extern crate alloc;

pub mod error;
pub mod identity;
pub mod models;
pub mod pricing;
pub mod storage;
pub mod theme_park;
