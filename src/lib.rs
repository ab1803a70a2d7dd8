//! # Room Escape Reservation Service
//!
//! Booking engine for escape-room time slots: create, look up and cancel
//! reservations against a catalogue of themes, with a uniqueness guarantee
//! per slot.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Reservation and theme entities, repository traits, errors
//! - **application**: Booking use-cases (`BookingService`)
//! - **infrastructure**: SeaORM persistence and the in-memory store
//! - **interfaces**: REST API with Swagger documentation
//! - **server**: Runtime wiring and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig, ConfigError, CONFIG_ENV};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, InMemoryStorage, SeaOrmRepositoryProvider};

// Re-export API router
pub use interfaces::http::create_api_router;

pub use application::{BookingService, DeleteMode, ReservationView};
pub use domain::{DomainError, DomainResult, Reservation, SlotScope, Theme};
