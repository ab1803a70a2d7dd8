//! Non-relational storage backends

mod memory;

pub use memory::InMemoryStorage;
