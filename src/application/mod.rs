//! Application layer - use cases on top of the domain repositories

pub mod booking;

pub use booking::{BookingService, DeleteMode, ReservationView};
