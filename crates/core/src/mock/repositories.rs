use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::mock;

use crate::errors::BookingResult;
use crate::models::booking::{BlockedSlot, Booking, NewBooking};
use crate::models::meeting::{BookingConfirmation, Meeting, MeetingRequest};

// Mock collaborators for testing
mock! {
    pub SlotRepo {}

    #[async_trait]
    impl crate::store::SlotStore for SlotRepo {
        async fn list_bookings(&self) -> BookingResult<Vec<Booking>>;

        async fn list_blocked_slots(&self) -> BookingResult<Vec<BlockedSlot>>;

        async fn find_booking(&self, slot_time: DateTime<Utc>) -> BookingResult<Option<Booking>>;

        async fn is_blocked(&self, slot_time: DateTime<Utc>) -> BookingResult<bool>;

        async fn insert_booking(&self, booking: NewBooking) -> BookingResult<Booking>;

        async fn delete_booking(&self, slot_time: DateTime<Utc>) -> BookingResult<Option<Booking>>;

        async fn insert_blocked_slot(&self, slot_time: DateTime<Utc>) -> BookingResult<BlockedSlot>;

        async fn delete_blocked_slot(&self, slot_time: DateTime<Utc>) -> BookingResult<bool>;

        async fn clear_blocked_slots(&self) -> BookingResult<u64>;
    }
}

mock! {
    pub MeetingApi {}

    #[async_trait]
    impl crate::store::MeetingProvider for MeetingApi {
        async fn create_meeting(&self, request: &MeetingRequest) -> eyre::Result<Meeting>;

        async fn delete_meeting(&self, meeting_ref: &str) -> eyre::Result<()>;
    }
}

mock! {
    pub Mailer {}

    #[async_trait]
    impl crate::store::ConfirmationSender for Mailer {
        async fn send_confirmation(&self, confirmation: &BookingConfirmation) -> eyre::Result<()>;
    }
}
