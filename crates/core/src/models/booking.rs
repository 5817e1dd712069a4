use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every booking covers exactly one slot.
pub const SLOT_MINUTES: i64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub slot_time: DateTime<Utc>,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub duration_minutes: i32,
    pub meeting_ref: Option<String>,
    pub meeting_url: Option<String>,
}

/// A booking about to be inserted; `slot_time` is already normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub slot_time: DateTime<Utc>,
    pub name: String,
    pub email: String,
    pub meeting_ref: Option<String>,
    pub meeting_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedSlot {
    pub slot_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    #[serde(default)]
    pub slot_time: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// Body of every admin request that targets a single slot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlotTimeRequest {
    #[serde(default)]
    pub slot_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingResponse {
    pub message: String,
    pub slot_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearBlockedResponse {
    pub message: String,
    pub rows_affected: u64,
}
