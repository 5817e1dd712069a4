//! # Availability Reconciliation
//!
//! Overlays the two persisted sets (bookings, blocked slots) on the generated
//! candidate slots. Membership is tested on [`SlotKey`]s only, so the zone a
//! record was stored or submitted in never matters.
//!
//! A key present in both sets is a data anomaly the state machine should never
//! produce; it resolves to [`SlotStatus::Booked`].

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::models::booking::{BlockedSlot, Booking};
use crate::models::slot::{
    AdminSlot, BlockedSlotView, PublicSlot, ReconciledSlot, SlotHolder, SlotStatus,
};
use crate::normalize::{format_in_zone, SlotKey};

/// Classifies each candidate, preserving candidate order.
pub fn reconcile(
    candidates: &[DateTime<Utc>],
    bookings: &[Booking],
    blocked: &[BlockedSlot],
) -> Vec<ReconciledSlot> {
    let booked: HashMap<SlotKey, &Booking> = bookings
        .iter()
        .map(|booking| (SlotKey::of(&booking.slot_time), booking))
        .collect();
    let blocked: HashSet<SlotKey> = blocked
        .iter()
        .map(|slot| SlotKey::of(&slot.slot_time))
        .collect();

    candidates
        .iter()
        .map(|slot_time| {
            let key = SlotKey::of(slot_time);
            if let Some(booking) = booked.get(&key) {
                ReconciledSlot {
                    slot_time: *slot_time,
                    status: SlotStatus::Booked,
                    holder: Some(SlotHolder {
                        name: booking.name.clone(),
                        email: booking.email.clone(),
                    }),
                }
            } else if blocked.contains(&key) {
                ReconciledSlot {
                    slot_time: *slot_time,
                    status: SlotStatus::Blocked,
                    holder: None,
                }
            } else {
                ReconciledSlot {
                    slot_time: *slot_time,
                    status: SlotStatus::Available,
                    holder: None,
                }
            }
        })
        .collect()
}

impl ReconciledSlot {
    pub fn public_view(&self, timezone: &Tz) -> PublicSlot {
        PublicSlot {
            slot_time: format_in_zone(&self.slot_time, timezone),
            available: self.status.is_available(),
        }
    }

    pub fn admin_view(&self, timezone: &Tz) -> AdminSlot {
        AdminSlot {
            slot_time: format_in_zone(&self.slot_time, timezone),
            status: self.status,
            name: self.holder.as_ref().map(|holder| holder.name.clone()),
            email: self.holder.as_ref().map(|holder| holder.email.clone()),
        }
    }
}

impl BlockedSlot {
    pub fn diagnostic_view(&self, timezone: &Tz) -> BlockedSlotView {
        BlockedSlotView {
            slot_time_utc: format_in_zone(&self.slot_time, &chrono_tz::UTC),
            slot_time_local: format_in_zone(&self.slot_time, timezone),
            slot_key: SlotKey::of(&self.slot_time).seconds(),
        }
    }
}
