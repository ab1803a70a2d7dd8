pub mod repositories;
pub mod reservation;
pub mod theme;

// Re-export commonly used types
pub use repositories::{DomainResult, RepositoryProvider};
pub use reservation::{NewReservation, Reservation, ReservationRepository, Slot, SlotScope};
pub use theme::{NewTheme, Theme, ThemeRepository};

pub use crate::shared::errors::DomainError;
