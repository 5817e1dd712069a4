//! Seams between the booking state machine and the outside world: the
//! persistence layer and the two best-effort collaborators.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::BookingResult;
use crate::models::booking::{BlockedSlot, Booking, NewBooking};
use crate::models::meeting::{BookingConfirmation, Meeting, MeetingRequest};

/// Persistence for bookings and blocked slots.
///
/// All instants passed in are already normalized. Inserts must translate a
/// uniqueness violation into the matching [`crate::errors::Conflict`]:
/// `AlreadyBooked` for bookings and `AlreadyBlocked` for blocked slots.
#[async_trait]
pub trait SlotStore: Send + Sync {
    async fn list_bookings(&self) -> BookingResult<Vec<Booking>>;

    async fn list_blocked_slots(&self) -> BookingResult<Vec<BlockedSlot>>;

    async fn find_booking(&self, slot_time: DateTime<Utc>) -> BookingResult<Option<Booking>>;

    async fn is_blocked(&self, slot_time: DateTime<Utc>) -> BookingResult<bool>;

    async fn insert_booking(&self, booking: NewBooking) -> BookingResult<Booking>;

    /// Removes and returns the booking at `slot_time`, if any.
    async fn delete_booking(&self, slot_time: DateTime<Utc>) -> BookingResult<Option<Booking>>;

    async fn insert_blocked_slot(&self, slot_time: DateTime<Utc>) -> BookingResult<BlockedSlot>;

    /// Returns whether a row was removed.
    async fn delete_blocked_slot(&self, slot_time: DateTime<Utc>) -> BookingResult<bool>;

    /// Returns the number of rows removed.
    async fn clear_blocked_slots(&self) -> BookingResult<u64>;
}

/// Video-conferencing provider issuing meeting links for bookings.
#[async_trait]
pub trait MeetingProvider: Send + Sync {
    async fn create_meeting(&self, request: &MeetingRequest) -> eyre::Result<Meeting>;

    async fn delete_meeting(&self, meeting_ref: &str) -> eyre::Result<()>;
}

/// Sends the booking confirmation to the client.
#[async_trait]
pub trait ConfirmationSender: Send + Sync {
    async fn send_confirmation(&self, confirmation: &BookingConfirmation) -> eyre::Result<()>;
}
