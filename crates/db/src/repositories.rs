pub mod blocked_slot;
pub mod booking;
