use chrono::{DateTime, Utc};
use coachcal_core::models::booking::{BlockedSlot, Booking};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBooking {
    pub id: i32,
    pub slot_time: DateTime<Utc>,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub duration: i32,
    pub meeting_ref: Option<String>,
    pub meeting_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBlockedSlot {
    pub id: i32,
    pub slot_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<DbBooking> for Booking {
    fn from(row: DbBooking) -> Self {
        Booking {
            slot_time: row.slot_time,
            name: row.name,
            email: row.email,
            created_at: row.created_at,
            duration_minutes: row.duration,
            meeting_ref: row.meeting_ref,
            meeting_url: row.meeting_url,
        }
    }
}

impl From<DbBlockedSlot> for BlockedSlot {
    fn from(row: DbBlockedSlot) -> Self {
        BlockedSlot {
            slot_time: row.slot_time,
            created_at: row.created_at,
        }
    }
}
