//! Theme aggregate
//!
//! Escape-room scenarios that reservations point at.

pub mod model;
pub mod repository;

pub use model::{NewTheme, Theme};
pub use repository::ThemeRepository;
