//! # coachcal core
//!
//! Domain logic of the booking service: slot generation, timestamp
//! normalization, availability reconciliation, and the booking state machine,
//! plus the traits the storage and integration crates implement.

pub mod availability;
pub mod booking;
pub mod errors;
pub mod mock;
pub mod models;
pub mod normalize;
pub mod schedule;
pub mod store;
