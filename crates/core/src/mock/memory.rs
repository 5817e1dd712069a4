//! In-memory [`SlotStore`] enforcing the same uniqueness rules as the
//! database schema. Used by tests that need real state transitions.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::{BookingError, BookingResult, Conflict};
use crate::models::booking::{BlockedSlot, Booking, NewBooking, SLOT_MINUTES};
use crate::normalize::{normalize, SlotKey};
use crate::store::SlotStore;

#[derive(Default)]
struct Tables {
    bookings: BTreeMap<SlotKey, Booking>,
    blocked: BTreeMap<SlotKey, BlockedSlot>,
}

#[derive(Default)]
pub struct InMemorySlotStore {
    tables: Mutex<Tables>,
}

impl InMemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a blocked row without the booked-slot precondition, for anomaly tests.
    pub fn force_block(&self, slot_time: DateTime<Utc>) {
        if let Ok(mut tables) = self.tables.lock() {
            let slot_time = normalize(&slot_time);
            tables.blocked.insert(
                SlotKey::of(&slot_time),
                BlockedSlot {
                    slot_time,
                    created_at: Utc::now(),
                },
            );
        }
    }

    fn tables(&self) -> BookingResult<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| BookingError::Database(eyre::eyre!("in-memory store lock poisoned")))
    }
}

#[async_trait]
impl SlotStore for InMemorySlotStore {
    async fn list_bookings(&self) -> BookingResult<Vec<Booking>> {
        Ok(self.tables()?.bookings.values().cloned().collect())
    }

    async fn list_blocked_slots(&self) -> BookingResult<Vec<BlockedSlot>> {
        Ok(self.tables()?.blocked.values().cloned().collect())
    }

    async fn find_booking(&self, slot_time: DateTime<Utc>) -> BookingResult<Option<Booking>> {
        Ok(self.tables()?.bookings.get(&SlotKey::of(&slot_time)).cloned())
    }

    async fn is_blocked(&self, slot_time: DateTime<Utc>) -> BookingResult<bool> {
        Ok(self.tables()?.blocked.contains_key(&SlotKey::of(&slot_time)))
    }

    async fn insert_booking(&self, booking: NewBooking) -> BookingResult<Booking> {
        let mut tables = self.tables()?;
        let key = SlotKey::of(&booking.slot_time);
        if tables.bookings.contains_key(&key) {
            return Err(Conflict::AlreadyBooked.into());
        }

        let stored = Booking {
            slot_time: normalize(&booking.slot_time),
            name: booking.name,
            email: booking.email,
            created_at: Utc::now(),
            duration_minutes: SLOT_MINUTES as i32,
            meeting_ref: booking.meeting_ref,
            meeting_url: booking.meeting_url,
        };
        tables.bookings.insert(key, stored.clone());
        Ok(stored)
    }

    async fn delete_booking(&self, slot_time: DateTime<Utc>) -> BookingResult<Option<Booking>> {
        Ok(self.tables()?.bookings.remove(&SlotKey::of(&slot_time)))
    }

    async fn insert_blocked_slot(&self, slot_time: DateTime<Utc>) -> BookingResult<BlockedSlot> {
        let mut tables = self.tables()?;
        let key = SlotKey::of(&slot_time);
        if tables.blocked.contains_key(&key) {
            return Err(Conflict::AlreadyBlocked.into());
        }

        let stored = BlockedSlot {
            slot_time: normalize(&slot_time),
            created_at: Utc::now(),
        };
        tables.blocked.insert(key, stored.clone());
        Ok(stored)
    }

    async fn delete_blocked_slot(&self, slot_time: DateTime<Utc>) -> BookingResult<bool> {
        Ok(self.tables()?.blocked.remove(&SlotKey::of(&slot_time)).is_some())
    }

    async fn clear_blocked_slots(&self) -> BookingResult<u64> {
        let mut tables = self.tables()?;
        let removed = tables.blocked.len() as u64;
        tables.blocked.clear();
        Ok(removed)
    }
}
