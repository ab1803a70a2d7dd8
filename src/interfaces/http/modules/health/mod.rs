//! Liveness and storage health

mod handlers;

pub use handlers::*;
