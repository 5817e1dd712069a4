use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Available,
    Booked,
    Blocked,
}

impl SlotStatus {
    pub fn is_available(&self) -> bool {
        matches!(self, SlotStatus::Available)
    }
}

/// Who holds a booked slot. Only the admin projection exposes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotHolder {
    pub name: String,
    pub email: String,
}

/// One candidate slot after reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciledSlot {
    pub slot_time: DateTime<Utc>,
    pub status: SlotStatus,
    pub holder: Option<SlotHolder>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicSlot {
    pub slot_time: String,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminSlot {
    pub slot_time: String,
    pub status: SlotStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Diagnostic view of a stored blocked slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedSlotView {
    pub slot_time_utc: String,
    pub slot_time_local: String,
    pub slot_key: i64,
}
