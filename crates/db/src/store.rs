use async_trait::async_trait;
use chrono::{DateTime, Utc};
use coachcal_core::errors::{BookingError, BookingResult, Conflict};
use coachcal_core::models::booking::{BlockedSlot, Booking, NewBooking};
use coachcal_core::normalize::normalize;
use coachcal_core::store::SlotStore;
use tracing::error;

use crate::repositories::{blocked_slot, booking};
use crate::DbPool;

/// Postgres-backed [`SlotStore`]. The `UNIQUE (slot_time)` constraints decide
/// concurrent inserts; a row rejected by them surfaces as a [`Conflict`].
#[derive(Clone)]
pub struct PgSlotStore {
    pool: DbPool,
}

impl PgSlotStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

fn storage_error(err: eyre::Report) -> BookingError {
    error!("Storage operation failed: {:#}", err);
    BookingError::Database(err)
}

#[async_trait]
impl SlotStore for PgSlotStore {
    async fn list_bookings(&self) -> BookingResult<Vec<Booking>> {
        let rows = booking::get_bookings(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(rows.into_iter().map(Booking::from).collect())
    }

    async fn list_blocked_slots(&self) -> BookingResult<Vec<BlockedSlot>> {
        let rows = blocked_slot::get_blocked_slots(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(rows.into_iter().map(BlockedSlot::from).collect())
    }

    async fn find_booking(&self, slot_time: DateTime<Utc>) -> BookingResult<Option<Booking>> {
        let row = booking::get_booking_by_slot_time(&self.pool, normalize(&slot_time))
            .await
            .map_err(storage_error)?;
        Ok(row.map(Booking::from))
    }

    async fn is_blocked(&self, slot_time: DateTime<Utc>) -> BookingResult<bool> {
        blocked_slot::is_slot_blocked(&self.pool, normalize(&slot_time))
            .await
            .map_err(storage_error)
    }

    async fn insert_booking(&self, new_booking: NewBooking) -> BookingResult<Booking> {
        let row = booking::insert_booking(
            &self.pool,
            normalize(&new_booking.slot_time),
            &new_booking.name,
            &new_booking.email,
            new_booking.meeting_ref.as_deref(),
            new_booking.meeting_url.as_deref(),
        )
        .await
        .map_err(storage_error)?;

        row.map(Booking::from)
            .ok_or(BookingError::Conflict(Conflict::AlreadyBooked))
    }

    async fn delete_booking(&self, slot_time: DateTime<Utc>) -> BookingResult<Option<Booking>> {
        let row = booking::delete_booking(&self.pool, normalize(&slot_time))
            .await
            .map_err(storage_error)?;
        Ok(row.map(Booking::from))
    }

    async fn insert_blocked_slot(&self, slot_time: DateTime<Utc>) -> BookingResult<BlockedSlot> {
        let row = blocked_slot::insert_blocked_slot(&self.pool, normalize(&slot_time))
            .await
            .map_err(storage_error)?;

        row.map(BlockedSlot::from)
            .ok_or(BookingError::Conflict(Conflict::AlreadyBlocked))
    }

    async fn delete_blocked_slot(&self, slot_time: DateTime<Utc>) -> BookingResult<bool> {
        blocked_slot::delete_blocked_slot(&self.pool, normalize(&slot_time))
            .await
            .map_err(storage_error)
    }

    async fn clear_blocked_slots(&self) -> BookingResult<u64> {
        blocked_slot::delete_all_blocked_slots(&self.pool)
            .await
            .map_err(storage_error)
    }
}
