pub mod booking;
pub mod meeting;
pub mod slot;
