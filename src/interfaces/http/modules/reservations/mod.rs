//! Reservation booking endpoints

mod dto;
mod handlers;

pub use dto::*;
pub use handlers::*;
