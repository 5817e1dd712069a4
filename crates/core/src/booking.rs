//! # Booking State Machine
//!
//! Per slot instant:
//!
//! ```text
//! available --book--> booked --cancel--> available
//! available --block-> blocked --unblock-> available
//! ```
//!
//! `booked` and `blocked` never coexist. Each mutation checks the opposite set
//! first, and the storage uniqueness constraints remain the authoritative
//! detector of concurrent duplicates.
//!
//! Meeting provisioning and confirmation delivery are best-effort: their
//! failures are logged and never undo a committed booking or cancellation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::availability::reconcile;
use crate::errors::{BookingError, BookingResult, Conflict};
use crate::models::booking::{BlockedSlot, Booking, CreateBookingRequest, NewBooking, SLOT_MINUTES};
use crate::models::meeting::{BookingConfirmation, Meeting, MeetingRequest};
use crate::models::slot::{AdminSlot, BlockedSlotView, PublicSlot, ReconciledSlot};
use crate::normalize::{parse_slot_time, SlotKey};
use crate::schedule::SlotSchedule;
use crate::store::{ConfirmationSender, MeetingProvider, SlotStore};

pub struct BookingService {
    store: Arc<dyn SlotStore>,
    schedule: SlotSchedule,
    meetings: Option<Arc<dyn MeetingProvider>>,
    confirmations: Option<Arc<dyn ConfirmationSender>>,
}

impl BookingService {
    pub fn new(store: Arc<dyn SlotStore>, schedule: SlotSchedule) -> Self {
        Self {
            store,
            schedule,
            meetings: None,
            confirmations: None,
        }
    }

    /// Provision a meeting for every new booking.
    pub fn with_meetings(mut self, provider: Arc<dyn MeetingProvider>) -> Self {
        self.meetings = Some(provider);
        self
    }

    /// Send a confirmation for every new booking.
    pub fn with_confirmations(mut self, sender: Arc<dyn ConfirmationSender>) -> Self {
        self.confirmations = Some(sender);
        self
    }

    pub fn schedule(&self) -> &SlotSchedule {
        &self.schedule
    }

    /// Generates candidates and overlays both persisted sets in one pass.
    pub async fn reconciled_slots(&self, now: DateTime<Utc>) -> BookingResult<Vec<ReconciledSlot>> {
        let candidates = self.schedule.generate(now);
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let bookings = self.store.list_bookings().await?;
        let blocked = self.store.list_blocked_slots().await?;

        Ok(reconcile(&candidates, &bookings, &blocked))
    }

    pub async fn public_slots(&self, now: DateTime<Utc>) -> BookingResult<Vec<PublicSlot>> {
        let timezone = self.schedule.timezone();
        Ok(self
            .reconciled_slots(now)
            .await?
            .iter()
            .map(|slot| slot.public_view(timezone))
            .collect())
    }

    pub async fn admin_slots(&self, now: DateTime<Utc>) -> BookingResult<Vec<AdminSlot>> {
        let timezone = self.schedule.timezone();
        Ok(self
            .reconciled_slots(now)
            .await?
            .iter()
            .map(|slot| slot.admin_view(timezone))
            .collect())
    }

    /// Every stored blocked slot, including ones outside the horizon.
    pub async fn blocked_slots(&self) -> BookingResult<Vec<BlockedSlotView>> {
        let timezone = self.schedule.timezone();
        let mut blocked = self.store.list_blocked_slots().await?;
        blocked.sort_by_key(|slot| slot.slot_time);

        Ok(blocked
            .iter()
            .map(|slot| slot.diagnostic_view(timezone))
            .collect())
    }

    pub async fn create_booking(
        &self,
        request: &CreateBookingRequest,
        now: DateTime<Utc>,
    ) -> BookingResult<Booking> {
        let name = request.name.trim();
        let email = request.email.trim();
        if name.is_empty() || email.is_empty() || request.slot_time.trim().is_empty() {
            return Err(BookingError::Validation(
                "Name, email, and slot_time are required".to_string(),
            ));
        }

        let slot_time = parse_slot_time(&request.slot_time)?;
        if slot_time <= now {
            return Err(BookingError::Validation("Cannot book past slots".to_string()));
        }

        if self.store.is_blocked(slot_time).await? {
            return Err(Conflict::SlotBlocked.into());
        }
        // Saves a wasted meeting; the insert below still decides races.
        if self.store.find_booking(slot_time).await?.is_some() {
            return Err(Conflict::AlreadyBooked.into());
        }

        let meeting = self.provision_meeting(name, email, slot_time).await;

        let new_booking = NewBooking {
            slot_time,
            name: name.to_string(),
            email: email.to_string(),
            meeting_ref: meeting.as_ref().map(|m| m.id.clone()),
            meeting_url: meeting.as_ref().map(|m| m.join_url.clone()),
        };

        let booking = match self.store.insert_booking(new_booking).await {
            Ok(booking) => booking,
            Err(err) => {
                if let Some(meeting) = &meeting {
                    self.release_meeting(&meeting.id).await;
                }
                return Err(err);
            }
        };

        info!(
            "Booking created: slot={} key={}",
            booking.slot_time,
            SlotKey::of(&booking.slot_time)
        );

        self.send_confirmation(&booking).await;

        Ok(booking)
    }

    pub async fn block_slot(&self, raw_slot_time: &str) -> BookingResult<BlockedSlot> {
        let slot_time = parse_slot_time(raw_slot_time)?;

        if self.store.find_booking(slot_time).await?.is_some() {
            return Err(Conflict::SlotBooked.into());
        }

        let blocked = self.store.insert_blocked_slot(slot_time).await?;
        info!("Slot blocked: slot={}", blocked.slot_time);
        Ok(blocked)
    }

    pub async fn unblock_slot(&self, raw_slot_time: &str) -> BookingResult<()> {
        let slot_time = parse_slot_time(raw_slot_time)?;

        if !self.store.delete_blocked_slot(slot_time).await? {
            return Err(BookingError::NotFound(
                "Slot not found in blocked list".to_string(),
            ));
        }

        info!("Slot unblocked: slot={}", slot_time);
        Ok(())
    }

    pub async fn cancel_booking(&self, raw_slot_time: &str) -> BookingResult<Booking> {
        let slot_time = parse_slot_time(raw_slot_time)?;

        let booking = self
            .store
            .delete_booking(slot_time)
            .await?
            .ok_or_else(|| BookingError::NotFound("Booking not found".to_string()))?;

        info!("Booking cancelled: slot={}", booking.slot_time);

        if let Some(meeting_ref) = &booking.meeting_ref {
            self.release_meeting(meeting_ref).await;
        }

        Ok(booking)
    }

    pub async fn clear_blocked_slots(&self) -> BookingResult<u64> {
        let removed = self.store.clear_blocked_slots().await?;
        info!("Cleared {} blocked slots", removed);
        Ok(removed)
    }

    async fn provision_meeting(
        &self,
        name: &str,
        email: &str,
        slot_time: DateTime<Utc>,
    ) -> Option<Meeting> {
        let provider = self.meetings.as_ref()?;
        let request = MeetingRequest {
            name: name.to_string(),
            email: email.to_string(),
            start: slot_time,
            duration_minutes: SLOT_MINUTES,
        };

        match provider.create_meeting(&request).await {
            Ok(meeting) => Some(meeting),
            Err(err) => {
                let err = BookingError::dependency("meeting provider", &err);
                warn!("Booking proceeds without a meeting link: {}", err);
                None
            }
        }
    }

    async fn release_meeting(&self, meeting_ref: &str) {
        let Some(provider) = self.meetings.as_ref() else {
            warn!(
                "Meeting {} left in place: no meeting provider configured",
                meeting_ref
            );
            return;
        };

        if let Err(err) = provider.delete_meeting(meeting_ref).await {
            let err = BookingError::dependency("meeting provider", &err);
            warn!("Failed to delete meeting {}: {}", meeting_ref, err);
        }
    }

    async fn send_confirmation(&self, booking: &Booking) {
        let Some(sender) = self.confirmations.as_ref() else {
            return;
        };

        let confirmation = BookingConfirmation {
            name: booking.name.clone(),
            email: booking.email.clone(),
            slot_time: booking.slot_time,
            meeting_url: booking.meeting_url.clone(),
        };

        if let Err(err) = sender.send_confirmation(&confirmation).await {
            let err = BookingError::dependency("confirmation sender", &err);
            warn!(
                "Booking created but failed to send confirmation to {}: {}",
                booking.email, err
            );
        }
    }
}
