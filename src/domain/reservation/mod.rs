//! Reservation aggregate
//!
//! Contains the Reservation entity, slot types, and repository interface.

pub mod model;
pub mod repository;

pub use model::{NewReservation, Reservation, Slot, SlotKey, SlotScope};
pub use repository::ReservationRepository;
