use std::fmt;

use thiserror::Error;

/// Why a mutation was refused because of the slot's current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conflict {
    /// A booking already exists at the instant being booked.
    AlreadyBooked,
    /// The instant being blocked already carries a booking.
    SlotBooked,
    /// The instant being blocked is already blocked.
    AlreadyBlocked,
    /// The instant being booked has been blocked by an administrator.
    SlotBlocked,
}

impl Conflict {
    /// Stable machine-readable code, returned alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            Conflict::AlreadyBooked => "already_booked",
            Conflict::SlotBooked => "slot_booked",
            Conflict::AlreadyBlocked => "already_blocked",
            Conflict::SlotBlocked => "slot_blocked",
        }
    }
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Conflict::AlreadyBooked => "Slot already booked",
            Conflict::SlotBooked => "Cannot block a slot that is already booked",
            Conflict::AlreadyBlocked => "Slot already blocked",
            Conflict::SlotBlocked => "Cannot book a blocked slot",
        };
        f.write_str(message)
    }
}

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(Conflict),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Dependency error: {0}")]
    Dependency(String),
}

impl BookingError {
    /// Failure of an outbound collaborator, keeping the full cause chain.
    pub fn dependency(collaborator: &str, err: &eyre::Report) -> Self {
        BookingError::Dependency(format!("{}: {:#}", collaborator, err))
    }

    /// Short machine-readable code for the error class.
    pub fn code(&self) -> &'static str {
        match self {
            BookingError::NotFound(_) => "not_found",
            BookingError::Validation(_) => "invalid_request",
            BookingError::Conflict(conflict) => conflict.code(),
            BookingError::Database(_) => "storage_unavailable",
            BookingError::Dependency(_) => "dependency_unavailable",
        }
    }
}

impl From<Conflict> for BookingError {
    fn from(conflict: Conflict) -> Self {
        BookingError::Conflict(conflict)
    }
}

pub type BookingResult<T> = Result<T, BookingError>;
