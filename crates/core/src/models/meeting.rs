use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What the meeting provider is asked to schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingRequest {
    pub name: String,
    pub email: String,
    pub start: DateTime<Utc>,
    pub duration_minutes: i64,
}

/// A meeting issued by the provider. `id` is what cancellation deletes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meeting {
    pub id: String,
    pub join_url: String,
}

/// Everything the confirmation message needs about a fresh booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingConfirmation {
    pub name: String,
    pub email: String,
    pub slot_time: DateTime<Utc>,
    pub meeting_url: Option<String>,
}
