//! Database entities module

pub mod reservation;
pub mod theme;

pub use reservation::Entity as Reservation;
pub use theme::Entity as Theme;
