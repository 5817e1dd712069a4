//! Outbound collaborators of the booking service: the confirmation email
//! sender and the Zoom meeting provider.

pub mod config;
pub mod email;
pub mod token;
pub mod zoom;

pub use config::{EmailConfig, ZoomConfig};
pub use email::EmailSender;
pub use zoom::ZoomClient;
