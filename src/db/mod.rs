//! Storage layer (in-memory mock records).

pub mod memory;
pub mod seed;

pub use memory::{new_id, MockDb};
