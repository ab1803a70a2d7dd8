//! Reservation booking use-cases

pub mod service;

pub use service::{BookingService, DeleteMode, ReservationView};
